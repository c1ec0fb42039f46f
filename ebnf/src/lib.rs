//! Scanner, parser and tree algebra for ISO/IEC 14977 EBNF.
//!
//! ```
//! use ebnf::{algebra, Node};
//!
//! let a: Node = "a = x | y;".parse().unwrap();
//! let b: Node = "a = y | x;".parse().unwrap();
//! assert!(algebra::ast_equal(&a, &b));
//! assert_eq!(a.bnf().to_string(), "<a> ::= <x> | <y>\n");
//! ```
use std::str::FromStr;

pub mod algebra;
pub mod ast;
pub mod chars;
pub mod diagnostics;
mod error;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod stream;
pub mod token;

pub use ast::{BinaryOp, Ident, Node, SeqKind, UnaryOp};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::Error;
pub use options::{ScanOptions, WordSeparator};
pub use parser::{parse, Parser};
pub use scanner::scan;
pub use stream::TokenStream;
pub use token::{Token, TokenKind};

/// Scan and parse a whole grammar.
pub fn parse_str(source: &str, options: &ScanOptions) -> Result<Node, Error> {
    let mut stream =
        scan(source, options).map_err(|s| Error::ScanError(s.into_diagnostics()))?;
    match parse(&mut stream) {
        Some(ast) => Ok(ast),
        None => Err(Error::ParseError(stream.into_diagnostics())),
    }
}

/// Parses a grammar with the default scan options.
impl FromStr for Node {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s, &ScanOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Debug;
    use std::string::ToString;

    fn assert_lossless_conversion<T, E>(t: T)
    where
        T: ToString + FromStr<Err = E> + Eq + Debug,
        E: std::error::Error,
    {
        let s = t.to_string();
        let t_parse = T::from_str(&s).unwrap();
        assert_eq!(t, t_parse, "To string:\n{}\n", s);
    }

    fn rule(name: &str, alternatives: Vec<Vec<Node>>) -> Node {
        let expr = Node::expr(alternatives.into_iter().map(Node::terms).collect());
        Node::rule(Ident::new(name), expr)
    }

    #[test]
    fn lossless_rules() {
        let tests = vec![
            Node::rules(vec![rule(
                "a",
                vec![vec![Node::binary(
                    BinaryOp::Except,
                    Node::string("hello"),
                    Node::ident("world"),
                )]],
            )]),
            Node::rules(vec![
                rule("syntax_rule", vec![vec![Node::ident("meta_identifier")]]),
                rule(
                    "quoted",
                    vec![
                        vec![Node::string("say \"hi\"")],
                        vec![Node::string("it's")],
                        vec![Node::special(" any char ")],
                    ],
                ),
            ]),
            Node::rules(vec![rule(
                "line",
                vec![vec![
                    Node::binary(BinaryOp::Times, Node::Integer(5), Node::string(" ")),
                    Node::unary(
                        UnaryOp::Repeated,
                        Node::expr(vec![
                            Node::terms(vec![Node::ident("c")]),
                            Node::terms(vec![Node::Empty]),
                        ]),
                    ),
                    Node::unary(
                        UnaryOp::Optional,
                        Node::expr(vec![Node::terms(vec![Node::ident("d")])]),
                    ),
                ]],
            )]),
            Node::rules(vec![
                rule("empty", vec![vec![Node::Empty]]),
                rule("rule_02", vec![vec![Node::Empty], vec![Node::ident("x")]]),
            ]),
        ];

        for test in tests {
            assert_lossless_conversion(test);
        }
    }

    #[test]
    fn parse_str_errors() {
        let opts = ScanOptions::default();
        match parse_str("list = '';", &opts) {
            Err(Error::ScanError(d)) => {
                assert_eq!(d.errors()[0].message, "empty string not acceptable")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        match parse_str("test = 'test';;", &opts) {
            Err(Error::ParseError(d)) => assert!(d.has_errors()),
            other => panic!("unexpected result: {:?}", other),
        }

        let err = "z".parse::<Node>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse:\nERROR: expected '=', at line 1\n");
    }

    #[test]
    fn non_iso_empty_strings() {
        let opts = ScanOptions {
            iso: false,
            ..ScanOptions::default()
        };
        let ast = parse_str("list = '';", &opts).unwrap();
        assert_eq!(
            ast,
            Node::rules(vec![rule("list", vec![vec![Node::string("")]])])
        );
    }
}
