use std::fmt::{self, Display};

use crate::chars::{is_alnum, is_digit, is_letter};

/// Largest count BNF output spells out as repeated copies. Larger counts keep
/// the `n * p` form.
pub const MAX_BNF_REPEAT: u32 = 16;

/// A meta identifier.
///
/// Every ' ' and '-' is stored as '_', so "syntax rule", "syntax-rule" and
/// "syntax_rule" name the same rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident(String);

impl Ident {
    pub fn new(name: &str) -> Self {
        Ident(name.replace(|c: char| c == ' ' || c == '-', "_"))
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with words separated by spaces. Scans back to the same
    /// identifier.
    pub fn ebnf_name(&self) -> String {
        self.0.replace('_', " ")
    }

    /// Whether `ebnf_name` scans back to this identifier.
    ///
    /// The first word must start with a letter. Later words must start with a
    /// letter or be all digits, so "a_2b" is not writable.
    pub fn is_writable(&self) -> bool {
        self.0.split('_').enumerate().all(|(i, word)| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) if is_letter(c) => chars.all(is_alnum),
                Some(c) if i > 0 && is_digit(c) => chars.all(is_digit),
                _ => false,
            }
        })
    }

    /// Name with words separated by hyphens.
    pub fn bnf_name(&self) -> String {
        self.0.replace('_', "-")
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::new(s)
    }
}

/// Operators with two operands. Declaration order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    /// `count * primary`
    Times,
    /// `factor - exception`
    Except,
    /// `name = definitions;`
    Rule,
}

impl BinaryOp {
    pub fn tag(self) -> &'static str {
        match self {
            BinaryOp::Times => "times",
            BinaryOp::Except => "except",
            BinaryOp::Rule => "rule",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnaryOp {
    Group,
    Optional,
    Repeated,
}

impl UnaryOp {
    pub fn tag(self) -> &'static str {
        match self {
            UnaryOp::Group => "group",
            UnaryOp::Optional => "optional",
            UnaryOp::Repeated => "repeated",
        }
    }

    fn delimiters(self) -> (char, char) {
        match self {
            UnaryOp::Group => ('(', ')'),
            UnaryOp::Optional => ('[', ']'),
            UnaryOp::Repeated => ('{', '}'),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeqKind {
    /// Alternatives separated by `|`.
    Expr,
    /// The rules of a grammar.
    Rules,
    /// Factors separated by `,`.
    Terms,
}

impl SeqKind {
    pub fn tag(self) -> &'static str {
        match self {
            SeqKind::Expr => "expr",
            SeqKind::Rules => "rules",
            SeqKind::Terms => "terms",
        }
    }
}

/// A node of a grammar tree.
///
/// Variant order is significant: the derived `Ord` ranks variants by
/// declaration order and then compares payloads, which is the total order
/// used on canonical trees (see `algebra`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    Integer(u32),
    /// Unquoted terminal string.
    Str(String),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Ident(Ident),
    Unary(UnaryOp, Box<Node>),
    Seq(SeqKind, Vec<Node>),
    /// Text of a `?...?` special sequence.
    Special(String),
    Empty,
}

impl Node {
    pub fn ident(name: &str) -> Node {
        Node::Ident(Ident::new(name))
    }

    pub fn string(s: impl Into<String>) -> Node {
        Node::Str(s.into())
    }

    pub fn special(s: impl Into<String>) -> Node {
        Node::Special(s.into())
    }

    pub fn unary(op: UnaryOp, arg: Node) -> Node {
        Node::Unary(op, Box::new(arg))
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
        Node::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn rule(name: Ident, expr: Node) -> Node {
        Node::binary(BinaryOp::Rule, Node::Ident(name), expr)
    }

    pub fn rules(items: Vec<Node>) -> Node {
        Node::Seq(SeqKind::Rules, items)
    }

    pub fn expr(items: Vec<Node>) -> Node {
        Node::Seq(SeqKind::Expr, items)
    }

    pub fn terms(items: Vec<Node>) -> Node {
        Node::Seq(SeqKind::Terms, items)
    }

    /// Whether the node matches only the empty string.
    ///
    /// A rule list is never empty, even without rules.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Str(s) => s.is_empty(),
            Node::Empty => true,
            Node::Seq(SeqKind::Rules, _) => false,
            Node::Seq(_, items) => items.iter().all(Node::is_empty),
            _ => false,
        }
    }

    /// Items of a sequence of the given kind.
    pub fn seq_items(&self, kind: SeqKind) -> Option<&[Node]> {
        match self {
            Node::Seq(k, items) if *k == kind => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Bracketed tree dump.
    pub fn dbg(&self) -> Dbg<'_> {
        Dbg(self)
    }

    pub fn bnf(&self) -> Bnf<'_> {
        Bnf(self)
    }

    /// Same as `to_string`.
    pub fn ebnf(&self) -> String {
        self.to_string()
    }
}

fn write_joined<F>(f: &mut fmt::Formatter, items: &[Node], sep: &str, mut write: F) -> fmt::Result
where
    F: FnMut(&mut fmt::Formatter, &Node) -> fmt::Result,
{
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write(f, item)?;
    }
    Ok(())
}

fn quote_char(s: &str) -> char {
    if s.contains('"') {
        '\''
    } else {
        '"'
    }
}

/// ISO EBNF text.
impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Integer(n) => write!(f, "{}", n),
            Node::Str(s) => {
                let q = quote_char(s);
                write!(f, "{}{}{}", q, s, q)
            }
            Node::Ident(ident) => write!(f, "{}", ident.ebnf_name()),
            Node::Special(s) => write!(f, "?{}?", s),
            Node::Unary(op, arg) => {
                let (open, close) = op.delimiters();
                write!(f, "{}{}{}", open, arg, close)
            }
            Node::Binary(BinaryOp::Rule, name, body) => writeln!(f, "{} = {};", name, body),
            Node::Binary(BinaryOp::Except, l, r) => write!(f, "{} - {}", l, r),
            Node::Binary(BinaryOp::Times, l, r) => write!(f, "{} * {}", l, r),
            Node::Seq(SeqKind::Rules, items) => {
                write_joined(f, items, "", |f, n| write!(f, "{}", n))
            }
            Node::Seq(kind, items) => {
                if self.is_empty() {
                    return Ok(());
                }
                let sep = if *kind == SeqKind::Expr { " | " } else { ", " };
                write_joined(f, items, sep, |f, n| write!(f, "{}", n))
            }
            Node::Empty => Ok(()),
        }
    }
}

/// Renders a node as a bracketed tree, e.g. `[SEQ terms: [IDENT: a]]`.
pub struct Dbg<'a>(&'a Node);

impl Display for Dbg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Node::Integer(n) => write!(f, "[INTEGER: {}]", n),
            Node::Str(s) => write!(f, "[STRING: {}]", s),
            Node::Ident(ident) => write!(f, "[IDENT: {}]", ident),
            Node::Special(s) => write!(f, "[SPECIAL: {}]", s),
            Node::Unary(op, arg) => write!(f, "[UNARY {}: {}]", op.tag(), arg.dbg()),
            Node::Binary(op, l, r) => {
                write!(f, "[BINARY {}: {}, {}]", op.tag(), l.dbg(), r.dbg())
            }
            Node::Seq(kind, items) => {
                write!(f, "[SEQ {}: ", kind.tag())?;
                write_joined(f, items, ", ", |f, n| write!(f, "{}", n.dbg()))?;
                write!(f, "]")
            }
            Node::Empty => write!(f, "[EMPTY]"),
        }
    }
}

/// Renders a node as BNF, one `<name> ::= ...` line per rule.
pub struct Bnf<'a>(&'a Node);

impl Display for Bnf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Node::Integer(n) => write!(f, "{}", n),
            Node::Str(s) => {
                let q = quote_char(s);
                write!(f, "{}{}{}", q, s, q)
            }
            Node::Ident(ident) => write!(f, "<{}>", ident.bnf_name()),
            Node::Special(s) => write!(f, "...{}...", s),
            Node::Unary(op, arg) => {
                let (open, close) = op.delimiters();
                write!(f, "{}{}{}", open, arg.bnf(), close)
            }
            Node::Binary(BinaryOp::Rule, name, body) => {
                writeln!(f, "{} ::= {}", name.bnf(), body.bnf())
            }
            Node::Binary(BinaryOp::Except, l, r) => write!(f, "{} - {}", l.bnf(), r.bnf()),
            Node::Binary(BinaryOp::Times, l, r) => {
                let count = match **l {
                    Node::Integer(n) if n <= MAX_BNF_REPEAT => n,
                    _ => return write!(f, "{} * {}", l.bnf(), r.bnf()),
                };
                if count == 0 {
                    return write!(f, "\"\"");
                }
                for i in 0..count {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", r.bnf())?;
                }
                Ok(())
            }
            Node::Seq(SeqKind::Rules, items) => {
                write_joined(f, items, "", |f, n| write!(f, "{}", n.bnf()))
            }
            Node::Seq(kind, items) => {
                if self.0.is_empty() {
                    return write!(f, "\"\"");
                }
                let sep = if *kind == SeqKind::Expr { " | " } else { " " };
                write_joined(f, items, sep, |f, n| write!(f, "{}", n.bnf()))
            }
            Node::Empty => write!(f, "\"\""),
        }
    }
}
