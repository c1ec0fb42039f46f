//! Turns grammar text into tokens.
//!
//! Sub-token recognizers are small `nom` parsers over the remaining input;
//! the scanner loop dispatches on the first character and records line
//! numbers and diagnostics around them.

use log::debug;
use nom::{
    bytes::complete::{tag, take_until, take_while, take_while_m_n},
    character::complete::{char, digit1},
    combinator::recognize,
    sequence::{delimited, pair},
    IResult,
};

use crate::chars::{is_digit, is_ident_continue, is_ident_start, is_space, is_symbol};
use crate::diagnostics::Diagnostics;
use crate::options::ScanOptions;
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};

/// `Ok` holds a fixed-up stream ready for parsing. `Err` holds whatever was
/// scanned before the failure, along with the diagnostics explaining it.
pub type ScanResult = Result<TokenStream, TokenStream>;

/// Scan `source` into a token stream.
pub fn scan(source: &str, options: &ScanOptions) -> ScanResult {
    let mut scanner = Scanner::new(source, *options);
    let ok = scanner.scan_tokens();
    let Scanner {
        tokens,
        diagnostics,
        ..
    } = scanner;
    let mut stream = TokenStream::with_diagnostics(tokens, diagnostics);
    if ok {
        stream.fixup(options.word_separator);
        debug!("scanned {} tokens", stream.len());
        Ok(stream)
    } else {
        debug!(
            "scan failed after {} tokens with {} errors",
            stream.len(),
            stream.diagnostics().errors().len()
        );
        Err(stream)
    }
}

// integer = decimal digit, {decimal digit};
fn integer(input: &str) -> IResult<&str, &str> {
    digit1(input)
}

// meta identifier = letter, {letter | decimal digit};
fn meta_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while_m_n(1, 1, is_ident_start),
        take_while(is_ident_continue),
    ))(input)
}

/// Body of a string quoted by `quote`. The closing quote must be the same
/// kind as the opening one.
fn terminal_string(input: &str, quote: char) -> IResult<&str, &str> {
    let q = if quote == '"' { "\"" } else { "'" };
    delimited(tag(q), take_until(q), tag(q))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("(*"), take_until("*)"), tag("*)"))(input)
}

fn special_sequence(input: &str) -> IResult<&str, &str> {
    delimited(char('?'), take_until("?"), char('?'))(input)
}

fn space(input: &str) -> IResult<&str, &str> {
    take_while(is_space)(input)
}

/// Keep track of a position within the source, along with its line.
#[derive(Debug, Clone)]
struct Position<'a> {
    input: &'a str,
    idx: usize,
    line: usize,
}

impl<'a> Position<'a> {
    fn new(input: &'a str) -> Self {
        Position {
            input,
            idx: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.idx..]
    }

    fn line(&self) -> usize {
        self.line
    }

    /// Move forward to where a sub-scanner left `rest`.
    fn seek_rest(&mut self, rest: &'a str) {
        let end = self.input.len() - rest.len();
        self.line += self.input[self.idx..end].matches('\n').count();
        self.idx = end;
    }
}

struct Scanner<'a> {
    pos: Position<'a>,
    options: ScanOptions,
    tokens: Vec<Token>,
    diagnostics: Diagnostics,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, options: ScanOptions) -> Self {
        Scanner {
            pos: Position::new(input),
            options,
            tokens: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Scan up to the end of input or the first error. Exactly one `Eof`
    /// token is pushed when the end is reached.
    fn scan_tokens(&mut self) -> bool {
        loop {
            self.skip_space();

            let rest = self.pos.rest();
            let line = self.pos.line();
            let c = match rest.chars().next() {
                Some(c) => c,
                None => {
                    self.tokens.push(Token::eof(line));
                    break;
                }
            };

            let scanned = if is_digit(c) {
                self.scan_integer(rest, line)
            } else if c == '"' || c == '\'' {
                self.scan_terminal_string(rest, c, line)
            } else if is_ident_start(c) {
                self.scan_meta_identifier(rest, line)
            } else if rest.starts_with("(*") {
                self.scan_comment(rest, line)
            } else if c == '?' {
                self.scan_special(rest, line)
            } else if is_symbol(c) {
                self.tokens.push(Token::new(c.to_string(), TokenKind::Symbol, line));
                self.pos.seek_rest(&rest[c.len_utf8()..]);
                true
            } else {
                self.fail(line, format!("invalid character: '{}'", c))
            };

            if !scanned {
                break;
            }
        }

        !self.diagnostics.has_errors()
    }

    fn skip_space(&mut self) {
        if let Ok((rem, _)) = space(self.pos.rest()) {
            self.pos.seek_rest(rem);
        }
    }

    fn fail(&mut self, line: usize, message: impl Into<String>) -> bool {
        self.diagnostics.error(line, message);
        false
    }

    fn scan_integer(&mut self, rest: &'a str, line: usize) -> bool {
        let (rem, digits) = match integer(rest) {
            Ok(res) => res,
            Err(_) => return self.fail(line, "invalid integer"),
        };
        match digits.parse::<u32>() {
            Ok(value) => {
                self.tokens.push(Token::integer(digits, value, line));
                self.pos.seek_rest(rem);
                true
            }
            Err(_) => self.fail(line, format!("integer too large: {}", digits)),
        }
    }

    fn scan_terminal_string(&mut self, rest: &'a str, quote: char, line: usize) -> bool {
        match terminal_string(rest, quote) {
            Ok((_, body)) if body.is_empty() && self.options.iso => {
                self.fail(line, "empty string not acceptable")
            }
            Ok((rem, body)) => {
                self.tokens.push(Token::new(body, TokenKind::String, line));
                self.pos.seek_rest(rem);
                true
            }
            Err(_) => self.fail(line, "no end of string"),
        }
    }

    fn scan_meta_identifier(&mut self, rest: &'a str, line: usize) -> bool {
        match meta_identifier(rest) {
            Ok((rem, name)) => {
                self.tokens.push(Token::new(name, TokenKind::Identifier, line));
                self.pos.seek_rest(rem);
                true
            }
            Err(_) => self.fail(line, "invalid meta identifier"),
        }
    }

    fn scan_comment(&mut self, rest: &'a str, line: usize) -> bool {
        match comment(rest) {
            Ok((rem, body)) => {
                self.tokens.push(Token::new(body, TokenKind::Comment, line));
                self.pos.seek_rest(rem);
                true
            }
            Err(_) => self.fail(line, "no end of comment"),
        }
    }

    fn scan_special(&mut self, rest: &'a str, line: usize) -> bool {
        match special_sequence(rest) {
            Ok((rem, body)) => {
                self.tokens.push(Token::new(body, TokenKind::Special, line));
                self.pos.seek_rest(rem);
                true
            }
            Err(_) => self.fail(line, "no end of special sequence"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::WordSeparator;

    struct TestCase {
        input: &'static str,
        // Some holds the expected (kind, text) pairs, Eof excluded. None means
        // the scan must fail.
        out: Option<Vec<(TokenKind, &'static str)>>,
    }

    fn assert_test_cases(options: &ScanOptions, tests: Vec<TestCase>) {
        for TestCase { input, out } in tests {
            let res = scan(input, options);
            match out {
                Some(out) => {
                    let stream = res.unwrap_or_else(|s| {
                        panic!("scan failed for {:?}:\n{}", input, s.diagnostics())
                    });
                    let got: Vec<_> = stream
                        .tokens()
                        .iter()
                        .filter(|tok| tok.kind != TokenKind::Eof)
                        .map(|tok| (tok.kind, tok.text.as_str()))
                        .collect();
                    assert_eq!(got, out, "input: {:?}", input);
                    assert_eq!(stream.tokens().last().map(|t| t.kind), Some(TokenKind::Eof));
                }
                None => assert!(res.is_err(), "expected error: {:?}", input),
            }
        }
    }

    #[test]
    fn nom_terminal_string() {
        assert_eq!(terminal_string("\"hello\"", '"'), Ok(("", "hello")));
        assert_eq!(terminal_string("'hello' world", '\''), Ok((" world", "hello")));
        assert_eq!(terminal_string("'it\"s' x", '\''), Ok((" x", "it\"s")));
        assert!(terminal_string("'hello\" world", '\'').is_err());
    }

    #[test]
    fn nom_meta_identifier() {
        assert_eq!(meta_identifier("hello"), Ok(("", "hello")));
        assert_eq!(meta_identifier("hello world"), Ok((" world", "hello")));
        assert_eq!(meta_identifier("a1b2=c"), Ok(("=c", "a1b2")));
        assert!(meta_identifier("1abc").is_err());
    }

    #[test]
    fn scan_tokens() {
        use TokenKind::*;
        let tests = vec![
            TestCase {
                input: "list = \"a\";",
                out: Some(vec![
                    (Identifier, "list"),
                    (Symbol, "="),
                    (String, "a"),
                    (Symbol, ";"),
                ]),
            },
            TestCase {
                input: "line = 5 * ' ', ?tab?;",
                out: Some(vec![
                    (Identifier, "line"),
                    (Symbol, "="),
                    (Integer, "5"),
                    (Symbol, "*"),
                    (String, " "),
                    (Symbol, ","),
                    (Special, "tab"),
                    (Symbol, ";"),
                ]),
            },
            TestCase {
                input: "(* leading *) test = test, 'a'; (* trailing *)",
                out: Some(vec![
                    (Identifier, "test"),
                    (Symbol, "="),
                    (Identifier, "test"),
                    (Symbol, ","),
                    (String, "a"),
                    (Symbol, ";"),
                ]),
            },
            TestCase {
                input: "syntax rule = meta identifier;",
                out: Some(vec![
                    (Identifier, "syntax rule"),
                    (Symbol, "="),
                    (Identifier, "meta identifier"),
                    (Symbol, ";"),
                ]),
            },
            TestCase {
                input: "a=[b]|{c}|(d)-e;",
                out: Some(vec![
                    (Identifier, "a"),
                    (Symbol, "="),
                    (Symbol, "["),
                    (Identifier, "b"),
                    (Symbol, "]"),
                    (Symbol, "|"),
                    (Symbol, "{"),
                    (Identifier, "c"),
                    (Symbol, "}"),
                    (Symbol, "|"),
                    (Symbol, "("),
                    (Identifier, "d"),
                    (Symbol, ")"),
                    (Symbol, "-"),
                    (Identifier, "e"),
                    (Symbol, ";"),
                ]),
            },
            TestCase {
                input: "",
                out: Some(vec![]),
            },
            TestCase {
                input: "list = '';",
                out: None,
            },
            TestCase {
                input: "list = \"\";",
                out: None,
            },
            TestCase {
                input: "underline_not_allowed",
                out: None,
            },
            TestCase {
                input: "\"not terminated",
                out: None,
            },
            TestCase {
                input: "'not terminated",
                out: None,
            },
            TestCase {
                input: "?not terminated",
                out: None,
            },
            TestCase {
                input: "(*not terminated",
                out: None,
            },
            TestCase {
                input: "a = 99999999999 * b;",
                out: None,
            },
        ];

        assert_test_cases(&ScanOptions::default(), tests);
    }

    #[test]
    fn invalid_characters() {
        for c in ".:!+%@&#$<>/\\^`~".chars() {
            let input = c.to_string();
            let stream = scan(&input, &ScanOptions::default()).unwrap_err();
            let errors = stream.diagnostics().errors();
            assert_eq!(errors.len(), 1, "input: {:?}", input);
            assert_eq!(errors[0].message, format!("invalid character: '{}'", c));
        }
    }

    #[test]
    fn scanning_stops_at_first_error() {
        let stream = scan("a = b; ! c = d;", &ScanOptions::default()).unwrap_err();
        let texts: Vec<_> = stream.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "=", "b", ";"]);
        assert_eq!(stream.diagnostics().errors().len(), 1);
    }

    #[test]
    fn empty_strings_outside_iso_mode() {
        let opts = ScanOptions {
            iso: false,
            ..ScanOptions::default()
        };
        let tests = vec![TestCase {
            input: "list = '' | \"\";",
            out: Some(vec![
                (TokenKind::Identifier, "list"),
                (TokenKind::Symbol, "="),
                (TokenKind::String, ""),
                (TokenKind::Symbol, "|"),
                (TokenKind::String, ""),
                (TokenKind::Symbol, ";"),
            ]),
        }];
        assert_test_cases(&opts, tests);
    }

    #[test]
    fn hyphen_word_separator() {
        let opts = ScanOptions {
            word_separator: WordSeparator::Hyphen,
            ..ScanOptions::default()
        };
        let stream = scan("gap free symbol = x;", &opts).unwrap();
        assert_eq!(stream[0].text, "gap-free-symbol");
    }

    #[test]
    fn line_numbers() {
        let input = "a = b;\r\nc =\n  'd'\n  (* multi\nline *) ;\n";
        let stream = scan(input, &ScanOptions::default()).unwrap();
        let lines: Vec<_> = stream.tokens().iter().map(|t| (t.text.as_str(), t.line)).collect();
        assert_eq!(
            lines,
            vec![
                ("a", 1),
                ("=", 1),
                ("b", 1),
                (";", 1),
                ("c", 2),
                ("=", 2),
                ("d", 3),
                (";", 5),
                ("", 6),
            ]
        );
    }

    #[test]
    fn error_line_is_token_start() {
        let stream = scan("a = b;\nc = 'open\n\n", &ScanOptions::default()).unwrap_err();
        let errors = stream.diagnostics().errors();
        assert_eq!(errors[0].line, 2);
        assert_eq!(errors[0].message, "no end of string");
    }

    #[test]
    fn integer_values() {
        let stream = scan("x = 007 * y;", &ScanOptions::default()).unwrap();
        assert_eq!(stream[2].integer, Some(7));
        assert_eq!(stream[2].text, "007");
        assert_eq!(stream[0].integer, None);
    }
}
