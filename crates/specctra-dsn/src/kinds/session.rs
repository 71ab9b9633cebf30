//! The `(session ...)` root written back by autorouters.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_text};
use crate::construct::{Construction, Scalars, value_text};
use crate::render::{WriteForm, write_list};
use crate::{
    Children, Descriptor, Node, NodeKind, Padstack, ParserSection, Pins, Placement, Registry,
    Resolution, RoutedVia, SlotDecl, ValueNode, WirePath,
};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("session", NodeKind::SpectraSes, spectra_ses));
    registry.register(Descriptor::new("base_design", NodeKind::BaseDesign, value_text));
    registry.register(Descriptor::new("was_is", NodeKind::WasIs, was_is));
    registry.register(Descriptor::new("routes", NodeKind::Routes, routes));
    registry.register(
        Descriptor::new("parser", NodeKind::Parser, super::pcb::parser).within("routes"),
    );
    registry.register(Descriptor::new("library_out", NodeKind::LibraryOut, library_out));
    registry.register(Descriptor::new("network_out", NodeKind::NetworkOut, network_out));
    registry.register(
        Descriptor::new("net", NodeKind::RoutedNet, routed_net).within("network_out"),
    );
    registry.register(Descriptor::new("wire", NodeKind::RoutedWire, routed_wire).within("net"));
}

/// A session file: `(session <name> ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectraSes {
    pub name: Option<String>,
    children: Children,
}

impl SpectraSes {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::BaseDesign),
        SlotDecl::one(NodeKind::Placement),
        SlotDecl::one(NodeKind::WasIs),
        SlotDecl::one(NodeKind::Routes),
    ];

    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            children: Children::new(Self::LAYOUT),
        }
    }

    /// The design file the session was routed from.
    pub fn base_design(&self) -> Option<&str> {
        self.children
            .one(NodeKind::BaseDesign)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_text)
    }

    pub fn set_base_design(&mut self, base_design: Option<&str>) {
        let node = base_design
            .map(|design| Node::Value(ValueNode::of(NodeKind::BaseDesign, design)));
        self.children.set_one(NodeKind::BaseDesign, node);
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

    pub fn was_is(&self) -> Option<&WasIs> {
        self.children.one(NodeKind::WasIs).and_then(Node::as_was_is)
    }

    pub fn set_was_is(&mut self, was_is: Option<WasIs>) {
        self.children.set_one(NodeKind::WasIs, was_is.map(Node::from));
    }

    pub fn routes(&self) -> Option<&Routes> {
        self.children.one(NodeKind::Routes).and_then(Node::as_routes)
    }

    pub fn set_routes(&mut self, routes: Option<Routes>) {
        self.children.set_one(NodeKind::Routes, routes.map(Node::from));
    }

    /// Render the whole session file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_form("session", 0, &mut out);
        out
    }
}

impl WriteForm for SpectraSes {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn spectra_ses(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::SpectraSes(SpectraSes {
        name: Scalars::of(tail).atom(0),
        children: ctx.children(tail, SpectraSes::LAYOUT),
    })
}

/// `(was_is (pins A B)...)`: pin swaps made by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct WasIs {
    children: Children,
}

impl WasIs {
    const LAYOUT: &'static [SlotDecl] = &[SlotDecl::many(NodeKind::Pins)];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn swaps(&self) -> impl Iterator<Item = &Pins> {
        self.children
            .many(NodeKind::Pins)
            .iter()
            .filter_map(Node::as_pins)
    }

    pub fn push_swap(&mut self, pins: Pins) {
        self.children.push(Node::Pins(pins));
    }
}

impl Default for WasIs {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for WasIs {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn was_is(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::WasIs(WasIs {
        children: ctx.children(tail, WasIs::LAYOUT),
    })
}

/// `(routes (resolution ...) (parser ...) (library_out ...) (network_out ...))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Routes {
    children: Children,
}

impl Routes {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Resolution),
        SlotDecl::one(NodeKind::Parser),
        SlotDecl::one(NodeKind::LibraryOut),
        SlotDecl::one(NodeKind::NetworkOut),
    ];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
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

    pub fn parser(&self) -> Option<&ParserSection> {
        self.children.one(NodeKind::Parser).and_then(Node::as_parser)
    }

    pub fn set_parser(&mut self, parser: Option<ParserSection>) {
        self.children.set_one(NodeKind::Parser, parser.map(Node::from));
    }

    pub fn library_out(&self) -> Option<&LibraryOut> {
        self.children
            .one(NodeKind::LibraryOut)
            .and_then(Node::as_library_out)
    }

    pub fn set_library_out(&mut self, library_out: Option<LibraryOut>) {
        self.children
            .set_one(NodeKind::LibraryOut, library_out.map(Node::from));
    }

    pub fn network_out(&self) -> Option<&NetworkOut> {
        self.children
            .one(NodeKind::NetworkOut)
            .and_then(Node::as_network_out)
    }

    pub fn set_network_out(&mut self, network_out: Option<NetworkOut>) {
        self.children
            .set_one(NodeKind::NetworkOut, network_out.map(Node::from));
    }
}

impl Default for Routes {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Routes {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn routes(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Routes(Routes {
        children: ctx.children(tail, Routes::LAYOUT),
    })
}

/// `(library_out (padstack ...)...)`: padstacks the router created.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryOut {
    children: Children,
}

impl LibraryOut {
    const LAYOUT: &'static [SlotDecl] = &[SlotDecl::many(NodeKind::Padstack)];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn padstacks(&self) -> impl Iterator<Item = &Padstack> {
        self.children
            .many(NodeKind::Padstack)
            .iter()
            .filter_map(Node::as_padstack)
    }

    pub fn push_padstack(&mut self, padstack: Padstack) {
        self.children.push(Node::Padstack(padstack));
    }
}

impl Default for LibraryOut {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for LibraryOut {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn library_out(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::LibraryOut(LibraryOut {
        children: ctx.children(tail, LibraryOut::LAYOUT),
    })
}

/// `(network_out (net ...)...)`: routed nets.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkOut {
    children: Children,
}

impl NetworkOut {
    const LAYOUT: &'static [SlotDecl] = &[SlotDecl::many(NodeKind::RoutedNet)];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn nets(&self) -> impl Iterator<Item = &RoutedNet> {
        self.children
            .many(NodeKind::RoutedNet)
            .iter()
            .filter_map(Node::as_routed_net)
    }

    pub fn push_net(&mut self, net: RoutedNet) {
        self.children.push(Node::RoutedNet(net));
    }
}

impl Default for NetworkOut {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for NetworkOut {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn network_out(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::NetworkOut(NetworkOut {
        children: ctx.children(tail, NetworkOut::LAYOUT),
    })
}

/// `(net <name> (wire ...)... (via ...)...)` under `network_out`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedNet {
    pub name: Option<String>,
    children: Children,
}

impl RoutedNet {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::RoutedWire),
        SlotDecl::many(NodeKind::RoutedVia),
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn wires(&self) -> impl Iterator<Item = &RoutedWire> {
        self.children
            .many(NodeKind::RoutedWire)
            .iter()
            .filter_map(Node::as_routed_wire)
    }

    pub fn push_wire(&mut self, wire: RoutedWire) {
        self.children.push(Node::RoutedWire(wire));
    }

    pub fn vias(&self) -> impl Iterator<Item = &RoutedVia> {
        self.children
            .many(NodeKind::RoutedVia)
            .iter()
            .filter_map(Node::as_routed_via)
    }

    pub fn push_via(&mut self, via: RoutedVia) {
        self.children.push(Node::RoutedVia(via));
    }
}

impl WriteForm for RoutedNet {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn routed_net(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::RoutedNet(RoutedNet {
        name: Scalars::of(tail).atom(0),
        children: ctx.children(tail, RoutedNet::LAYOUT),
    })
}

/// `(wire (path ...) (type protect))` inside a routed net.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedWire {
    children: Children,
}

impl RoutedWire {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::WirePath),
        SlotDecl::one(NodeKind::Type),
    ];

    pub fn new(path: WirePath) -> Self {
        let mut children = Children::new(Self::LAYOUT);
        children.push(Node::WirePath(path));
        Self { children }
    }

    pub fn paths(&self) -> impl Iterator<Item = &WirePath> {
        self.children
            .many(NodeKind::WirePath)
            .iter()
            .filter_map(Node::as_wire_path)
    }

    pub fn wire_type(&self) -> Option<&str> {
        self.children
            .one(NodeKind::Type)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_text)
    }

    pub fn set_wire_type(&mut self, wire_type: Option<&str>) {
        let node = wire_type.map(|ty| Node::Value(ValueNode::of(NodeKind::Type, ty)));
        self.children.set_one(NodeKind::Type, node);
    }
}

impl WriteForm for RoutedWire {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn routed_wire(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::RoutedWire(RoutedWire {
        children: ctx.children(tail, RoutedWire::LAYOUT),
    })
}

impl_composite!(
    SpectraSes,
    WasIs,
    Routes,
    LibraryOut,
    NetworkOut,
    RoutedNet,
    RoutedWire
);
