//! The `(pcb ...)` root and its header records.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_number, push_text};
use crate::construct::{Construction, Scalars, value_text};
use crate::render::{Atom, WriteForm, write_list};
use crate::{
    Children, Descriptor, Library, Network, Node, NodeKind, Placement, Registry, SlotDecl,
    Structure, ValueNode, Wiring,
};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("pcb", NodeKind::SpectraDsn, spectra_dsn));
    registry.register(Descriptor::new("parser", NodeKind::Parser, parser).within("pcb"));
    registry.register(Descriptor::new("resolution", NodeKind::Resolution, resolution));
    registry.register(Descriptor::new("unit", NodeKind::Unit, value_text));
    registry.register(Descriptor::new("host_cad", NodeKind::HostCad, value_text));
    registry.register(Descriptor::new("host_version", NodeKind::HostVersion, value_text));
}

/// A design file: `(pcb <name> ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectraDsn {
    pub design: Option<String>,
    children: Children,
}

impl SpectraDsn {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Parser),
        SlotDecl::one(NodeKind::Resolution),
        SlotDecl::one(NodeKind::Unit),
        SlotDecl::one(NodeKind::Structure),
        SlotDecl::one(NodeKind::Placement),
        SlotDecl::one(NodeKind::Library),
        SlotDecl::one(NodeKind::Network),
        SlotDecl::one(NodeKind::Wiring),
    ];

    pub fn new(design: Option<String>) -> Self {
        Self {
            design,
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn design(&self) -> Option<&str> {
        self.design.as_deref()
    }

    pub fn parser(&self) -> Option<&ParserSection> {
        self.children.one(NodeKind::Parser).and_then(Node::as_parser)
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.children
            .one(NodeKind::Resolution)
            .and_then(Node::as_resolution)
    }

    pub fn set_resolution(&mut self, resolution: Option<Resolution>) {
        self.children
            .set_one(NodeKind::Resolution, resolution.map(Node::from));
    }

    /// The design-wide `(unit ...)`.
    pub fn unit(&self) -> Option<&str> {
        self.children
            .one(NodeKind::Unit)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_text)
    }

    pub fn set_unit(&mut self, unit: Option<&str>) {
        let node = unit.map(|unit| Node::Value(ValueNode::of(NodeKind::Unit, unit)));
        self.children.set_one(NodeKind::Unit, node);
    }

    pub fn structure(&self) -> Option<&Structure> {
        self.children
            .one(NodeKind::Structure)
            .and_then(Node::as_structure)
    }

    pub fn structure_mut(&mut self) -> Option<&mut Structure> {
        self.children
            .one_mut(NodeKind::Structure)
            .and_then(Node::as_structure_mut)
    }

    pub fn set_structure(&mut self, structure: Option<Structure>) {
        self.children
            .set_one(NodeKind::Structure, structure.map(Node::from));
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.children
            .one(NodeKind::Placement)
            .and_then(Node::as_placement)
    }

    pub fn set_placement(&mut self, placement: Option<Placement>) {
        self.children
            .set_one(NodeKind::Placement, placement.map(Node::from));
    }

    pub fn library(&self) -> Option<&Library> {
        self.children.one(NodeKind::Library).and_then(Node::as_library)
    }

    pub fn set_library(&mut self, library: Option<Library>) {
        self.children
            .set_one(NodeKind::Library, library.map(Node::from));
    }

    pub fn network(&self) -> Option<&Network> {
        self.children.one(NodeKind::Network).and_then(Node::as_network)
    }

    pub fn network_mut(&mut self) -> Option<&mut Network> {
        self.children
            .one_mut(NodeKind::Network)
            .and_then(Node::as_network_mut)
    }

    pub fn set_network(&mut self, network: Option<Network>) {
        self.children
            .set_one(NodeKind::Network, network.map(Node::from));
    }

    pub fn wiring(&self) -> Option<&Wiring> {
        self.children.one(NodeKind::Wiring).and_then(Node::as_wiring)
    }

    pub fn set_wiring(&mut self, wiring: Option<Wiring>) {
        self.children.set_one(NodeKind::Wiring, wiring.map(Node::from));
    }

    /// Render the whole design file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_form("pcb", 0, &mut out);
        out
    }
}

impl WriteForm for SpectraDsn {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.design);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn spectra_dsn(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::SpectraDsn(SpectraDsn {
        design: Scalars::of(tail).atom(0),
        children: ctx.children(tail, SpectraDsn::LAYOUT),
    })
}

/// `(parser ...)`: which tool wrote the file and how it quotes strings.
///
/// Quoting directives such as `(string_quote ")` are not modelled and travel
/// in the overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserSection {
    pub name: Option<String>,
    children: Children,
}

impl ParserSection {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::HostCad),
        SlotDecl::one(NodeKind::HostVersion),
    ];

    pub fn new() -> Self {
        Self {
            name: None,
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn host_cad(&self) -> Option<&str> {
        self.children
            .one(NodeKind::HostCad)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_text)
    }

    pub fn set_host_cad(&mut self, host_cad: Option<&str>) {
        let node = host_cad.map(|host| Node::Value(ValueNode::of(NodeKind::HostCad, host)));
        self.children.set_one(NodeKind::HostCad, node);
    }

    pub fn host_version(&self) -> Option<&str> {
        self.children
            .one(NodeKind::HostVersion)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_text)
    }

    pub fn set_host_version(&mut self, host_version: Option<&str>) {
        let node = host_version
            .map(|version| Node::Value(ValueNode::of(NodeKind::HostVersion, version)));
        self.children.set_one(NodeKind::HostVersion, node);
    }
}

impl Default for ParserSection {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for ParserSection {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

pub(super) fn parser(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Parser(ParserSection {
        name: Scalars::of(tail).text(0),
        children: ctx.children(tail, ParserSection::LAYOUT),
    })
}

/// `(resolution <unit> <value>)`, e.g. `(resolution mil 10)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub unit: Option<String>,
    pub value: Option<f64>,
    children: Children,
}

impl Resolution {
    pub fn new(unit: Option<String>, value: Option<f64>) -> Self {
        Self {
            unit,
            value,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Resolution {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms: Vec<Atom<'_>> = Vec::new();
        push_text(&mut atoms, &self.unit);
        push_number(&mut atoms, self.value);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn resolution(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    Node::Resolution(Resolution {
        unit: scalars.text(0),
        value: scalars.number(0),
        children: ctx.children(tail, &[]),
    })
}

impl_composite!(SpectraDsn, ParserSection, Resolution);
