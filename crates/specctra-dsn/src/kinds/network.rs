//! `(network ...)`: nets, their pins, and net classes.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_text};
use crate::construct::{Construction, Scalars};
use crate::render::{Atom, WriteForm, write_list};
use crate::{Children, Descriptor, Node, NodeKind, Registry, Rule, SettingsBlock, SlotDecl};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("network", NodeKind::Network, network));
    registry.register(Descriptor::new("net", NodeKind::Net, net).within("network"));
    registry.register(Descriptor::new("net", NodeKind::Net, net).within("wire"));
    registry.register(Descriptor::new("net", NodeKind::Net, net).within("via"));
    registry.register(Descriptor::new("pins", NodeKind::Pins, pins));
    registry.register(Descriptor::new("class", NodeKind::Class, class));
}

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    children: Children,
}

impl Network {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::Net),
        SlotDecl::many(NodeKind::Class),
    ];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.children
            .many(NodeKind::Net)
            .iter()
            .filter_map(Node::as_net)
    }

    pub fn net(&self, name: &str) -> Option<&Net> {
        self.nets().find(|net| net.name.as_deref() == Some(name))
    }

    pub fn set_nets(&mut self, nets: Vec<Net>) {
        let nodes = nets.into_iter().map(Node::from).collect();
        self.children.set_many(NodeKind::Net, nodes);
    }

    pub fn push_net(&mut self, net: Net) {
        self.children.push(Node::Net(net));
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.children
            .many(NodeKind::Class)
            .iter()
            .filter_map(Node::as_class)
    }

    pub fn push_class(&mut self, class: Class) {
        self.children.push(Node::Class(class));
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Network {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn network(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Network(Network {
        children: ctx.children(tail, Network::LAYOUT),
    })
}

/// `(net <name> [pin...] (pins ...))`.
///
/// Pins may be listed inline after the name or in a nested `(pins ...)`;
/// [`Net::pins`] returns both.
#[derive(Debug, Clone, PartialEq)]
pub struct Net {
    pub name: Option<String>,
    /// Pin references written inline after the name.
    pub loose_pins: Vec<String>,
    children: Children,
}

impl Net {
    const LAYOUT: &'static [SlotDecl] = &[SlotDecl::one(NodeKind::Pins)];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            loose_pins: Vec::new(),
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn pins_list(&self) -> Option<&Pins> {
        self.children.one(NodeKind::Pins).and_then(Node::as_pins)
    }

    pub fn set_pins_list(&mut self, pins: Option<Pins>) {
        self.children.set_one(NodeKind::Pins, pins.map(Node::from));
    }

    /// Every pin reference of the net, inline ones first.
    pub fn pins(&self) -> Vec<&str> {
        let listed = self.pins_list().map(|pins| pins.refs.as_slice());
        self.loose_pins
            .iter()
            .chain(listed.unwrap_or_default())
            .map(String::as_str)
            .collect()
    }
}

impl WriteForm for Net {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        atoms.extend(self.loose_pins.iter().map(|pin| Atom::Text(pin)));
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn net(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let mut atoms = Scalars::of(tail).atoms();
    Node::Net(Net {
        name: atoms.next(),
        loose_pins: atoms.collect(),
        children: ctx.children(tail, Net::LAYOUT),
    })
}

/// `(pins <ref>...)`, references like `U1-5`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pins {
    pub refs: Vec<String>,
    children: Children,
}

impl Pins {
    pub fn new(refs: Vec<String>) -> Self {
        Self {
            refs,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Pins {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let atoms: Vec<Atom<'_>> = self.refs.iter().map(|pin| Atom::Text(pin)).collect();
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn pins(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Pins(Pins {
        refs: Scalars::of(tail).atoms().collect(),
        children: ctx.children(tail, &[]),
    })
}

/// `(class <name> <net>... (circuit ...) (rule ...))`: nets sharing routing rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<String>,
    pub net_names: Vec<String>,
    children: Children,
}

impl Class {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Circuit),
        SlotDecl::one(NodeKind::Rule),
    ];

    pub fn new(name: impl Into<String>, net_names: Vec<String>) -> Self {
        Self {
            name: Some(name.into()),
            net_names,
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn circuit(&self) -> Option<&SettingsBlock> {
        self.children.one(NodeKind::Circuit).and_then(Node::as_circuit)
    }

    pub fn set_circuit(&mut self, circuit: Option<SettingsBlock>) {
        self.children
            .set_one(NodeKind::Circuit, circuit.map(Node::Circuit));
    }

    pub fn rule(&self) -> Option<&Rule> {
        self.children.one(NodeKind::Rule).and_then(Node::as_rule)
    }

    pub fn set_rule(&mut self, rule: Option<Rule>) {
        self.children.set_one(NodeKind::Rule, rule.map(Node::from));
    }
}

impl WriteForm for Class {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        atoms.extend(self.net_names.iter().map(|net| Atom::Text(net)));
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn class(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let mut atoms = Scalars::of(tail).atoms();
    Node::Class(Class {
        name: atoms.next(),
        net_names: atoms.collect(),
        children: ctx.children(tail, Class::LAYOUT),
    })
}

impl_composite!(Network, Net, Pins, Class);
