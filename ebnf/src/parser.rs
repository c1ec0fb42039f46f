//! Recursive descent over a fixed-up token stream.
//!
//! ```text
//! syntax            = syntax rule, {syntax rule};
//! syntax rule       = meta identifier, '=', definitions list, ';';
//! definitions list  = single definition, {'|', single definition};
//! single definition = term, {',', term};
//! term              = factor, ['-', exception];
//! exception         = factor;
//! factor            = [integer, '*'], primary;
//! primary           = optional sequence | repeated sequence
//!                   | grouped sequence | meta identifier
//!                   | terminal string | special sequence | empty;
//! ```
//!
//! Every production returns `None` after recording a diagnostic on the
//! stream. Partial subtrees are dropped on the way up.

use log::trace;

use crate::ast::{BinaryOp, Ident, Node, UnaryOp};
use crate::stream::TokenStream;
use crate::token::TokenKind;

/// Parse a whole grammar. See `Parser::parse`.
pub fn parse(stream: &mut TokenStream) -> Option<Node> {
    Parser::new(stream).parse()
}

pub struct Parser<'a> {
    stream: &'a mut TokenStream,
}

impl<'a> Parser<'a> {
    pub fn new(stream: &'a mut TokenStream) -> Self {
        Parser { stream }
    }

    /// Parse from the current position. Succeeds only when a rule list was
    /// built and the whole stream has been consumed.
    ///
    /// The stream must end with an `Eof` token, as `scan` leaves it.
    pub fn parse(mut self) -> Option<Node> {
        if self.stream.is_empty() {
            self.stream.error("no tokens to parse");
            return None;
        }
        if self.stream.tokens().last().map(|t| t.kind) != Some(TokenKind::Eof) {
            self.stream.error("token stream does not end with Eof");
            return None;
        }
        let ast = self.syntax()?;
        if !self.stream.at_eof() {
            let msg = format!("unexpected token '{}'", self.stream.text());
            self.stream.error(msg);
            return None;
        }
        Some(ast)
    }

    fn enter(&self, production: &str) {
        trace!("{}: {}", production, self.stream.current());
    }

    fn expect_symbol(&mut self, symbol: &str) -> Option<()> {
        if self.stream.is_symbol(symbol) {
            self.stream.advance();
            Some(())
        } else {
            self.stream.error(format!("expected '{}'", symbol));
            None
        }
    }

    fn syntax(&mut self) -> Option<Node> {
        self.enter("syntax");
        let mut rules = Vec::new();
        let mut defined: Vec<Ident> = Vec::new();
        loop {
            if self.stream.kind() == TokenKind::Identifier {
                let name = Ident::new(self.stream.text());
                if defined.contains(&name) {
                    let msg = format!("rule '{}' is defined more than once", name.ebnf_name());
                    self.stream.warning(msg);
                } else {
                    defined.push(name);
                }
            }
            rules.push(self.syntax_rule()?);
            if self.stream.at_eof() {
                break;
            }
        }
        Some(Node::rules(rules))
    }

    fn syntax_rule(&mut self) -> Option<Node> {
        self.enter("syntax_rule");
        if self.stream.kind() != TokenKind::Identifier {
            self.stream.error("expected meta identifier");
            return None;
        }
        let name = Ident::new(self.stream.text());
        self.stream.advance();
        self.expect_symbol("=")?;
        let expr = self.definitions_list()?;
        self.expect_symbol(";")?;
        Some(Node::rule(name, expr))
    }

    fn definitions_list(&mut self) -> Option<Node> {
        self.enter("definitions_list");
        let mut alternatives = vec![self.single_definition()?];
        while self.stream.is_symbol("|") {
            self.stream.advance();
            alternatives.push(self.single_definition()?);
        }
        Some(Node::expr(alternatives))
    }

    fn single_definition(&mut self) -> Option<Node> {
        self.enter("single_definition");
        let mut factors = vec![self.term()?];
        while self.stream.is_symbol(",") {
            self.stream.advance();
            factors.push(self.term()?);
        }
        Some(Node::terms(factors))
    }

    fn term(&mut self) -> Option<Node> {
        self.enter("term");
        let factor = self.factor()?;
        if !self.stream.is_symbol("-") {
            return Some(factor);
        }
        self.stream.advance();
        let exception = self.exception()?;
        Some(Node::binary(BinaryOp::Except, factor, exception))
    }

    fn exception(&mut self) -> Option<Node> {
        self.enter("exception");
        self.factor()
    }

    fn factor(&mut self) -> Option<Node> {
        self.enter("factor");
        let count = match self.stream.integer() {
            Some(n) if self.stream.kind() == TokenKind::Integer => n,
            _ => return self.primary(),
        };
        self.stream.advance();
        if !self.stream.is_symbol("*") {
            self.stream.error("expected '*' after integer");
            return None;
        }
        self.stream.advance();
        let primary = self.primary()?;
        Some(Node::binary(BinaryOp::Times, Node::Integer(count), primary))
    }

    fn primary(&mut self) -> Option<Node> {
        self.enter("primary");
        let node = match self.stream.kind() {
            TokenKind::Identifier => Node::ident(self.stream.text()),
            TokenKind::String => Node::string(self.stream.text()),
            TokenKind::Special => Node::special(self.stream.text()),
            TokenKind::Symbol => match self.stream.text() {
                "[" => return self.optional_sequence(),
                "{" => return self.repeated_sequence(),
                "(" => return self.grouped_sequence(),
                ";" | "|" | "," | ")" | "}" | "]" => return Some(Node::Empty),
                other => {
                    let msg = format!("unexpected token '{}'", other);
                    self.stream.error(msg);
                    return None;
                }
            },
            TokenKind::Eof => {
                self.stream.error("unexpected end of input");
                return None;
            }
            TokenKind::Integer | TokenKind::Comment => {
                let msg = format!("unexpected token '{}'", self.stream.text());
                self.stream.error(msg);
                return None;
            }
        };
        self.stream.advance();
        Some(node)
    }

    fn optional_sequence(&mut self) -> Option<Node> {
        self.enter("optional_sequence");
        self.bracketed(UnaryOp::Optional, "[", "]")
    }

    fn repeated_sequence(&mut self) -> Option<Node> {
        self.enter("repeated_sequence");
        self.bracketed(UnaryOp::Repeated, "{", "}")
    }

    fn grouped_sequence(&mut self) -> Option<Node> {
        self.enter("grouped_sequence");
        self.bracketed(UnaryOp::Group, "(", ")")
    }

    fn bracketed(&mut self, op: UnaryOp, open: &str, close: &str) -> Option<Node> {
        self.expect_symbol(open)?;
        let expr = self.definitions_list()?;
        if !self.stream.is_symbol(close) {
            self.stream.error(format!("'{}' unmatched", close));
            return None;
        }
        self.stream.advance();
        Some(Node::unary(op, expr))
    }
}
