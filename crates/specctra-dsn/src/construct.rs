//! Building typed nodes out of primitive lists.
//!
//! A constructor receives the tail of a list (everything after the head symbol)
//! and never fails: missing fields stay `None`, unrecognized lists become
//! overflow children.

use std::collections::HashMap;

use specctra_sexpr::formatter::format_number;
use specctra_sexpr::{Sexpr, SexprKind};

use crate::{Children, Node, NodeKind, Record, Registry, Scalar, SlotDecl, ValueNode};

/// Context handed to a constructor: which head is being built, as which kind,
/// and the registry used to resolve nested lists.
#[derive(Debug, Clone, Copy)]
pub struct Construction<'a> {
    pub registry: &'a Registry,
    pub head: &'a str,
    pub kind: NodeKind,
}

impl<'a> Construction<'a> {
    /// Construct a nested list, with this node's head as the enclosing context.
    pub fn child(&self, list: &Sexpr) -> Node {
        self.registry.construct(list, Some(self.head))
    }

    /// Construct every nested list of `tail` into `children`.
    pub fn collect(&self, tail: &[Sexpr], children: &mut Children) {
        for item in tail.iter().filter(|item| item.is_list()) {
            children.push(self.child(item));
        }
    }

    /// Shorthand for a fresh [`Children`] filled from `tail`.
    pub fn children(&self, tail: &[Sexpr], layout: &'static [SlotDecl]) -> Children {
        let mut children = Children::new(layout);
        self.collect(tail, &mut children);
        children
    }

    /// Bucket the nested lists of `tail` by head.
    ///
    /// The first list whose head is in `expected` is stored under that name;
    /// every other nested list ends up in [`PropertyMap::rest`] in document order.
    pub fn properties(&self, tail: &[Sexpr], expected: &[&str]) -> PropertyMap {
        let mut map = PropertyMap::default();
        for item in tail.iter().filter(|item| item.is_list()) {
            let node = self.child(item);
            match item.head().filter(|head| expected.contains(head)) {
                Some(head) if !map.named.contains_key(head) => {
                    map.named.insert(head.to_string(), node);
                }
                _ => map.rest.push(node),
            }
        }
        map
    }

    /// Generic composite: leading scalars in document order plus typed children.
    pub fn record(&self, tail: &[Sexpr], layout: &'static [SlotDecl]) -> Record {
        let scalars = tail.iter().filter_map(Scalar::from_sexpr).collect();
        Record::with_children(self.kind, self.head, scalars, self.children(tail, layout))
    }
}

/// Named sub-records of a node, see [`Construction::properties`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    named: HashMap<String, Node>,
    rest: Vec<Node>,
}

impl PropertyMap {
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.named.get(name)
    }

    pub fn take(&mut self, name: &str) -> Option<Node> {
        self.named.remove(name)
    }

    /// Scalar of a named value node.
    ///
    /// A node that is not a value node, or carries no value, goes back to
    /// [`PropertyMap::rest`] so it is still written out.
    pub fn take_value(&mut self, name: &str) -> Option<Scalar> {
        self.take_with(name, |scalar| Some(scalar.clone()))
    }

    /// Like [`PropertyMap::take_value`], keeping the node unless it holds a number.
    pub fn take_number(&mut self, name: &str) -> Option<f64> {
        self.take_with(name, Scalar::as_number)
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.take_with(name, |scalar| scalar.as_text().map(str::to_string))
    }

    fn take_with<T>(
        &mut self,
        name: &str,
        read: impl FnOnce(&Scalar) -> Option<T>,
    ) -> Option<T> {
        let node = self.take(name)?;
        let value = node
            .as_value()
            .and_then(|value| value.value.as_ref())
            .and_then(read);
        if value.is_none() {
            self.rest.push(node);
        }
        value
    }

    pub fn rest(&self) -> &[Node] {
        &self.rest
    }

    /// Remaining nodes: untaken named entries are appended after the rest.
    pub fn into_children(self, layout: &'static [SlotDecl]) -> Children {
        let mut children = Children::new(layout);
        for node in self.rest {
            children.push(node);
        }
        let mut leftovers: Vec<(String, Node)> = self.named.into_iter().collect();
        leftovers.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, node) in leftovers {
            children.push(node);
        }
        children
    }
}

/// Positional access to the scalar atoms of a tail.
///
/// Each accessor filters by primitive type first and then indexes, so
/// `text(0)` is the first string whatever numbers come before it.
#[derive(Debug, Clone, Copy)]
pub struct Scalars<'a> {
    items: &'a [Sexpr],
}

impl<'a> Scalars<'a> {
    pub fn of(items: &'a [Sexpr]) -> Self {
        Self { items }
    }

    /// Symbols and quoted strings.
    pub fn texts(self) -> impl Iterator<Item = &'a str> {
        self.items.iter().filter_map(Sexpr::as_atom)
    }

    pub fn numbers(self) -> impl Iterator<Item = f64> {
        self.items.iter().filter_map(Sexpr::as_number)
    }

    /// Every atom in document order, numbers formatted as text.
    pub fn atoms(self) -> impl Iterator<Item = String> {
        self.items.iter().filter_map(atom_text)
    }

    pub fn text(self, idx: usize) -> Option<String> {
        self.texts().nth(idx).map(str::to_string)
    }

    pub fn number(self, idx: usize) -> Option<f64> {
        self.numbers().nth(idx)
    }

    pub fn atom(self, idx: usize) -> Option<String> {
        self.atoms().nth(idx)
    }

    /// The raw atom at `idx` among all atoms, for fields whose type is positional.
    pub fn raw(self, idx: usize) -> Option<&'a Sexpr> {
        self.items.iter().filter(|item| !item.is_list()).nth(idx)
    }
}

fn atom_text(item: &Sexpr) -> Option<String> {
    match &item.kind {
        SexprKind::Symbol(s) | SexprKind::String(s) => Some(s.clone()),
        SexprKind::Int(n) => Some(n.to_string()),
        SexprKind::F64(f) => Some(format_number(*f)),
        SexprKind::List(_) => None,
    }
}

/// `(head value)` holding the first atom as text.
pub fn value_text(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let value = Scalars::of(tail).atom(0).map(Scalar::Text);
    Node::Value(ValueNode::new(ctx.kind, ctx.head, value))
}

/// `(head number)`. Without a number the first atom is kept as text.
pub fn value_number(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let value = tail
        .iter()
        .filter_map(Scalar::from_sexpr)
        .find(|scalar| scalar.as_number().is_some())
        .or_else(|| Scalars::of(tail).atom(0).map(Scalar::Text));
    Node::Value(ValueNode::new(ctx.kind, ctx.head, value))
}

/// `(head on)` / `(head off)`.
pub fn value_switch(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let value = Scalars::of(tail)
        .texts()
        .next()
        .and_then(Scalar::parse_switch);
    Node::Value(ValueNode::new(ctx.kind, ctx.head, value))
}

/// A [`Record`] that keeps every nested list in overflow.
pub fn record(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Record(ctx.record(tail, &[]))
}
