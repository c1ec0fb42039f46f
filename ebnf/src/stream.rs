use std::fmt::{self, Display};
use std::ops::Index;

use crate::diagnostics::Diagnostics;
use crate::options::WordSeparator;
use crate::token::{Token, TokenKind};

/// A cursor over scanned tokens.
///
/// The stream owns the diagnostics of its session: the scanner hands over
/// whatever it recorded and the parser keeps appending to the same sink.
/// `advance` never moves past the last token, so once the parser reaches
/// `Eof` it stays there.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
    diagnostics: Diagnostics,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_diagnostics(tokens, Diagnostics::new())
    }

    pub fn with_diagnostics(tokens: Vec<Token>, diagnostics: Diagnostics) -> Self {
        TokenStream {
            tokens,
            position: 0,
            diagnostics,
        }
    }

    /// Token under the cursor.
    ///
    /// Panics on an empty stream.
    pub fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    /// Move to the next token. Returns false, without moving, when the
    /// cursor already sits on the last token.
    pub fn advance(&mut self) -> bool {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Step back `count` tokens, stopping at the first one.
    pub fn rewind(&mut self, count: usize) {
        self.position = self.position.saturating_sub(count);
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Restore a saved position. Out of range positions are rejected.
    pub fn seek(&mut self, pos: usize) -> bool {
        if pos < self.tokens.len() {
            self.position = pos;
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn text(&self) -> &str {
        &self.current().text
    }

    pub fn integer(&self) -> Option<u32> {
        self.current().integer
    }

    pub fn line(&self) -> usize {
        self.current().line
    }

    pub fn is_symbol(&self, s: &str) -> bool {
        self.current().is_symbol(s)
    }

    pub fn at_eof(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    /// Record an error at the line of the current token.
    pub fn error(&mut self, message: impl Into<String>) {
        let line = self.line_or_default();
        self.diagnostics.error(line, message);
    }

    /// Record a warning at the line of the current token.
    pub fn warning(&mut self, message: impl Into<String>) {
        let line = self.line_or_default();
        self.diagnostics.warning(line, message);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    fn line_or_default(&self) -> usize {
        self.tokens.get(self.position).map(|t| t.line).unwrap_or(1)
    }

    /// Drop comments and merge multi-word identifiers.
    pub fn fixup(&mut self, separator: WordSeparator) {
        self.delete_comments();
        self.join_words(separator);
    }

    pub fn delete_comments(&mut self) {
        self.tokens.retain(|t| t.kind != TokenKind::Comment);
        self.position = 0;
    }

    /// Merge each run of adjacent identifiers into a single identifier.
    ///
    /// A meta identifier may contain gaps, and digits may follow its first
    /// letter, so integers that directly continue an identifier run are
    /// absorbed as well.
    pub fn join_words(&mut self, separator: WordSeparator) {
        let mut joined: Vec<Token> = Vec::with_capacity(self.tokens.len());
        for token in self.tokens.drain(..) {
            if let Some(last) = joined.last_mut() {
                let continues = matches!(token.kind, TokenKind::Identifier | TokenKind::Integer);
                if last.kind == TokenKind::Identifier && continues {
                    last.text.push(separator.as_char());
                    last.text.push_str(&token.text);
                    continue;
                }
            }
            joined.push(token);
        }
        self.tokens = joined;
        self.position = 0;
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, idx: usize) -> &Token {
        &self.tokens[idx]
    }
}

/// Comma separated token dump.
impl Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
