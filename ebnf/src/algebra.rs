//! Comparison and editing of grammar trees.
//!
//! Alternatives are a set: comparisons work on the canonical form, where
//! alternatives are flattened, sorted and deduplicated. Concatenations keep
//! their order and only lose empty factors and redundant grouping.
//!
//! Functions taking a rule list panic when handed anything else. Malformed
//! trees are a caller bug, not an input error.

use std::cmp::Ordering;

use log::debug;

use crate::ast::{BinaryOp, Ident, Node, SeqKind, UnaryOp};

/// Canonical copy of `node`.
///
/// Canonicalizing a canonical tree returns it unchanged.
pub fn canonical(node: &Node) -> Node {
    match node {
        Node::Str(s) if s.is_empty() => Node::Empty,
        Node::Unary(op, arg) => Node::unary(*op, canonical(arg)),
        Node::Binary(op, l, r) => Node::binary(*op, canonical(l), canonical(r)),
        Node::Seq(SeqKind::Terms, items) => Node::terms(canonical_factors(items)),
        Node::Seq(SeqKind::Expr, items) => Node::expr(canonical_alternatives(items)),
        Node::Seq(SeqKind::Rules, items) => Node::rules(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

/// Alias of `canonical`.
pub fn sorted_clone(node: &Node) -> Node {
    canonical(node)
}

fn canonical_factors(items: &[Node]) -> Vec<Node> {
    let mut factors = Vec::with_capacity(items.len());
    for item in items.iter().map(canonical) {
        if item.is_empty() {
            continue;
        }
        match single_alternative(&item) {
            Some(inner) => factors.extend(inner.iter().cloned()),
            None => factors.push(item),
        }
    }
    factors
}

fn canonical_alternatives(items: &[Node]) -> Vec<Node> {
    let mut alternatives = Vec::with_capacity(items.len());
    for item in items.iter().map(canonical) {
        match grouped_alternatives(&item) {
            Some(inner) => alternatives.extend(inner.iter().cloned()),
            None => alternatives.push(item),
        }
    }
    alternatives.sort();
    alternatives.dedup();
    alternatives
}

/// Factors of a group with exactly one alternative, `(a, b)`.
fn single_alternative(node: &Node) -> Option<&[Node]> {
    match node {
        Node::Unary(UnaryOp::Group, expr) => match expr.seq_items(SeqKind::Expr) {
            Some([only]) => only.seq_items(SeqKind::Terms),
            _ => None,
        },
        _ => None,
    }
}

/// Alternatives of a concatenation made of a single group, `(a | b)`.
fn grouped_alternatives(node: &Node) -> Option<&[Node]> {
    match node.seq_items(SeqKind::Terms) {
        Some([Node::Unary(UnaryOp::Group, expr)]) => expr.seq_items(SeqKind::Expr),
        _ => None,
    }
}

/// Total order on trees, consistent with `ast_equal`.
///
/// Variants rank in declaration order of `Node`. Sequences compare element
/// by element and a sequence that is a prefix of the other sorts first.
pub fn ast_compare(a: &Node, b: &Node) -> Ordering {
    canonical(a).cmp(&canonical(b))
}

pub fn ast_equal(a: &Node, b: &Node) -> bool {
    canonical(a) == canonical(b)
}

pub fn ast_less_than(a: &Node, b: &Node) -> bool {
    ast_compare(a, b) == Ordering::Less
}

pub fn ast_greater_than(a: &Node, b: &Node) -> bool {
    ast_compare(a, b) == Ordering::Greater
}

pub fn ast_get_rules(rules: &Node) -> &[Node] {
    match rules {
        Node::Seq(SeqKind::Rules, items) => items,
        other => panic!("expected a rule list, found {}", other.dbg()),
    }
}

fn rules_mut(rules: &mut Node) -> &mut Vec<Node> {
    match rules {
        Node::Seq(SeqKind::Rules, items) => items,
        other => panic!("expected a rule list, found {}", other.dbg()),
    }
}

pub fn ast_get_rule_name(rule: &Node) -> &Ident {
    match rule {
        Node::Binary(BinaryOp::Rule, name, _) => match &**name {
            Node::Ident(ident) => ident,
            other => panic!("rule name is not an identifier: {}", other.dbg()),
        },
        other => panic!("expected a rule, found {}", other.dbg()),
    }
}

fn rule_body(rule: &Node) -> &Node {
    match rule {
        Node::Binary(BinaryOp::Rule, _, body) => body,
        other => panic!("expected a rule, found {}", other.dbg()),
    }
}

fn rule_body_mut(rule: &mut Node) -> &mut Node {
    match rule {
        Node::Binary(BinaryOp::Rule, _, body) => body,
        other => panic!("expected a rule, found {}", other.dbg()),
    }
}

pub fn ast_get_first_rule_name(rules: &Node) -> Option<&Ident> {
    ast_get_rules(rules).first().map(ast_get_rule_name)
}

/// Names of all rules in definition order, without repeats.
pub fn ast_get_defined_rule_names(rules: &Node) -> Vec<Ident> {
    let mut names: Vec<Ident> = Vec::new();
    for rule in ast_get_rules(rules) {
        let name = ast_get_rule_name(rule);
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

/// Body of the first rule called `name`.
pub fn ast_get_rule_body<'a>(rules: &'a Node, name: &str) -> Option<&'a Node> {
    let name = Ident::new(name);
    ast_get_rules(rules)
        .iter()
        .find(|rule| *ast_get_rule_name(rule) == name)
        .map(rule_body)
}

pub fn ast_get_rule_body_mut<'a>(rules: &'a mut Node, name: &str) -> Option<&'a mut Node> {
    let name = Ident::new(name);
    rules_mut(rules)
        .iter_mut()
        .find(|rule| *ast_get_rule_name(rule) == name)
        .map(rule_body_mut)
}

fn take_alternatives(rule: Node) -> Vec<Node> {
    match rule {
        Node::Binary(BinaryOp::Rule, _, body) => match *body {
            Node::Seq(SeqKind::Expr, alternatives) => alternatives,
            other => panic!("rule body is not an expression: {}", other.dbg()),
        },
        other => panic!("expected a rule, found {}", other.dbg()),
    }
}

/// Merge rules sharing a name into the first of them.
///
/// The alternatives of later definitions are appended to the first one and
/// the later rules are removed. Returns whether anything was merged.
pub fn ast_join_joinable_rules(rules: &mut Node) -> bool {
    let items = rules_mut(rules);
    let mut joined = false;

    let mut i = 0;
    while i < items.len() {
        let mut j = i + 1;
        while j < items.len() {
            if ast_get_rule_name(&items[i]) != ast_get_rule_name(&items[j]) {
                j += 1;
                continue;
            }
            let later = items.remove(j);
            debug!("joining rule '{}'", ast_get_rule_name(&items[i]));
            match rule_body_mut(&mut items[i]) {
                Node::Seq(SeqKind::Expr, alternatives) => {
                    alternatives.extend(take_alternatives(later))
                }
                other => panic!("rule body is not an expression: {}", other.dbg()),
            }
            joined = true;
        }
        i += 1;
    }

    joined
}

/// Next candidate for a generated rule name.
///
/// "expr" becomes "expr_02", "expr_02" becomes "expr_03" and "x9" becomes
/// "x10". A name made only of digits gets the "_02" suffix.
pub fn name_increment(name: &str) -> String {
    let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &name[prefix.len()..];
    if prefix.is_empty() || digits.is_empty() {
        return format!("{}_02", name);
    }
    match digits.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
        Some(n) => format!("{}{:02}", prefix, n),
        None => format!("{}_02", name),
    }
}

/// Add a rule with body `expr`, reusing an existing rule with an equal body.
///
/// Returns the name of the rule holding the body. A new rule is named
/// `name`, or the first `name_increment` of it not already taken, and gets
/// the canonical form of `expr`.
///
/// Rules must have been joined first, `expr` must be an expression and
/// `name` must be writable as EBNF (see `Ident::is_writable`).
pub fn ast_add_rule(rules: &mut Node, name: &str, expr: &Node) -> Ident {
    assert!(
        Ident::new(name).is_writable(),
        "rule name '{}' cannot be written as a meta identifier",
        name
    );
    assert_eq!(
        ast_get_defined_rule_names(rules).len(),
        ast_get_rules(rules).len(),
        "rules must be joined before adding a rule"
    );
    assert!(
        expr.seq_items(SeqKind::Expr).is_some(),
        "rule body must be an expression, found {}",
        expr.dbg()
    );

    let body = canonical(expr);
    for rule in ast_get_rules(rules) {
        if canonical(rule_body(rule)) == body {
            let existing = ast_get_rule_name(rule).clone();
            debug!("reusing rule '{}'", existing);
            return existing;
        }
    }

    let taken = ast_get_defined_rule_names(rules);
    let mut candidate = Ident::new(name);
    while taken.contains(&candidate) {
        candidate = Ident::new(&name_increment(candidate.as_str()));
    }

    debug!("adding rule '{}'", candidate);
    rules_mut(rules).push(Node::rule(candidate.clone(), body));
    candidate
}
