//! Typed child slots for composite nodes.
//!
//! A composite declares a static layout of [`SlotDecl`]s. Each constructed child
//! is tested against the layout in order and lands in the first slot whose kind
//! matches; anything else goes to the overflow list, so unmodelled content is
//! kept and written back out.

use crate::{Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// At most one node.
    One,
    /// Any number of nodes, in the order they were added.
    Many,
}

/// One typed slot of a composite's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDecl {
    pub kind: NodeKind,
    pub arity: Arity,
}

impl SlotDecl {
    pub const fn one(kind: NodeKind) -> Self {
        Self {
            kind,
            arity: Arity::One,
        }
    }

    pub const fn many(kind: NodeKind) -> Self {
        Self {
            kind,
            arity: Arity::Many,
        }
    }
}

/// Children of a composite node, bucketed by the composite's layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Children {
    layout: &'static [SlotDecl],
    slots: Vec<Vec<Node>>,
    other: Vec<Node>,
}

impl Children {
    pub fn new(layout: &'static [SlotDecl]) -> Self {
        Self {
            layout,
            slots: vec![Vec::new(); layout.len()],
            other: Vec::new(),
        }
    }

    pub fn layout(&self) -> &'static [SlotDecl] {
        self.layout
    }

    fn slot_index(&self, kind: NodeKind) -> Option<usize> {
        self.layout.iter().position(|decl| decl.kind == kind)
    }

    /// Route `node` to the first slot declared for its kind, or to overflow.
    ///
    /// A single-valued slot that is already filled sends later occupants to
    /// overflow rather than dropping them.
    pub fn push(&mut self, node: Node) {
        let Some(idx) = self.slot_index(node.kind()) else {
            self.other.push(node);
            return;
        };

        let slot = &mut self.slots[idx];
        if self.layout[idx].arity == Arity::One && !slot.is_empty() {
            log::trace!(
                "Slot for {} already filled, keeping duplicate in overflow",
                node.kind()
            );
            self.other.push(node);
        } else {
            slot.push(node);
        }
    }

    pub fn one(&self, kind: NodeKind) -> Option<&Node> {
        self.slot_index(kind).and_then(|idx| self.slots[idx].first())
    }

    pub fn one_mut(&mut self, kind: NodeKind) -> Option<&mut Node> {
        let idx = self.slot_index(kind)?;
        self.slots[idx].first_mut()
    }

    pub fn many(&self, kind: NodeKind) -> &[Node] {
        match self.slot_index(kind) {
            Some(idx) => &self.slots[idx],
            None => &[],
        }
    }

    pub fn many_mut(&mut self, kind: NodeKind) -> &mut [Node] {
        match self.slot_index(kind) {
            Some(idx) => &mut self.slots[idx],
            None => &mut [],
        }
    }

    /// Replace the content of the slot declared for `kind`.
    ///
    /// Nodes of a different kind, or for a kind the layout does not declare,
    /// are appended to overflow.
    pub fn set_one(&mut self, kind: NodeKind, node: Option<Node>) {
        self.set_many(kind, node.into_iter().collect());
    }

    pub fn set_many(&mut self, kind: NodeKind, nodes: Vec<Node>) {
        let Some(idx) = self.slot_index(kind) else {
            self.other.extend(nodes);
            return;
        };

        self.slots[idx].clear();
        for node in nodes {
            if node.kind() == kind {
                self.push(node);
            } else {
                self.other.push(node);
            }
        }
    }

    /// Children no slot claimed, in the order they were added.
    pub fn other(&self) -> &[Node] {
        &self.other
    }

    pub fn other_mut(&mut self) -> &mut Vec<Node> {
        &mut self.other
    }

    pub fn set_other(&mut self, other: Vec<Node>) {
        self.other = other;
    }

    /// All children: slots in layout order, then overflow.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.slots.iter().flatten().chain(&self.other)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum::<usize>() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node that owns children.
pub trait Composite {
    fn children(&self) -> &Children;

    fn children_mut(&mut self) -> &mut Children;

    fn other_children(&self) -> &[Node] {
        self.children().other()
    }

    fn set_other_children(&mut self, other: Vec<Node>) {
        self.children_mut().set_other(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Scalar, ValueNode};

    const LAYOUT: &[SlotDecl] = &[
        SlotDecl::one(NodeKind::Unit),
        SlotDecl::many(NodeKind::Width),
    ];

    fn value(kind: NodeKind, n: f64) -> Node {
        let head = kind.head().unwrap_or_default();
        Node::Value(ValueNode::new(kind, head, Some(Scalar::Number(n))))
    }

    #[test]
    fn routes_by_kind_in_layout_order() {
        let mut children = Children::new(LAYOUT);
        children.push(value(NodeKind::Width, 1.0));
        children.push(value(NodeKind::Index, 7.0));
        children.push(value(NodeKind::Unit, 2.0));
        children.push(value(NodeKind::Width, 3.0));

        assert_eq!(children.len(), 4);
        assert_eq!(children.one(NodeKind::Unit), Some(&value(NodeKind::Unit, 2.0)));
        assert_eq!(children.many(NodeKind::Width).len(), 2);
        assert_eq!(children.other(), &[value(NodeKind::Index, 7.0)]);

        let kinds: Vec<NodeKind> = children.iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            [NodeKind::Unit, NodeKind::Width, NodeKind::Width, NodeKind::Index]
        );
    }

    #[test]
    fn filled_single_slot_overflows() {
        let mut children = Children::new(LAYOUT);
        children.push(value(NodeKind::Unit, 1.0));
        children.push(value(NodeKind::Unit, 2.0));

        assert_eq!(children.one(NodeKind::Unit), Some(&value(NodeKind::Unit, 1.0)));
        assert_eq!(children.other(), &[value(NodeKind::Unit, 2.0)]);
    }

    #[test]
    fn setters_replace_slot_content() {
        let mut children = Children::new(LAYOUT);
        children.push(value(NodeKind::Width, 1.0));
        children.set_many(
            NodeKind::Width,
            vec![value(NodeKind::Width, 5.0), value(NodeKind::Index, 0.0)],
        );
        children.set_one(NodeKind::Unit, Some(value(NodeKind::Unit, 9.0)));

        assert_eq!(children.many(NodeKind::Width), &[value(NodeKind::Width, 5.0)]);
        assert_eq!(children.one(NodeKind::Unit), Some(&value(NodeKind::Unit, 9.0)));
        assert_eq!(children.other(), &[value(NodeKind::Index, 0.0)]);

        children.set_one(NodeKind::Unit, None);
        assert!(children.one(NodeKind::Unit).is_none());
    }

    #[test]
    fn undeclared_kinds_have_empty_slots() {
        let children = Children::new(&[]);
        assert!(children.is_empty());
        assert!(children.many(NodeKind::Net).is_empty());
        assert!(children.one(NodeKind::Net).is_none());
    }
}
