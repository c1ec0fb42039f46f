use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Integer,
    String,
    Symbol,
    Comment,
    Special,
    Eof,
}

/// A scanned token. `integer` is set only for `TokenKind::Integer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub integer: Option<u32>,
    pub line: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, line: usize) -> Self {
        Token {
            text: text.into(),
            kind,
            integer: None,
            line,
        }
    }

    pub fn integer(text: impl Into<String>, value: u32, line: usize) -> Self {
        Token {
            text: text.into(),
            kind: TokenKind::Integer,
            integer: Some(value),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new("", TokenKind::Eof, line)
    }

    pub fn is_symbol(&self, s: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == s
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[TOKEN: {:?}, '{}']", self.kind, self.text)
    }
}
