//! `(wiring ...)`: pre-routed wires and vias of a design.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_number, push_text};
use crate::construct::{Construction, Scalars};
use crate::render::{WriteForm, write_list};
use crate::{
    Children, Descriptor, Net, Node, NodeKind, Plane, Registry, Resolution, SlotDecl, ValueNode,
    WirePath,
};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("wiring", NodeKind::Wiring, wiring));
    registry.register(Descriptor::new("wire", NodeKind::Wire, wire).within("wiring"));
    registry.register(Descriptor::new("via", NodeKind::RoutedVia, routed_via).within("wiring"));
    registry.register(Descriptor::new("via", NodeKind::RoutedVia, routed_via).within("net"));
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wiring {
    children: Children,
}

impl Wiring {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Resolution),
        SlotDecl::one(NodeKind::Unit),
        SlotDecl::many(NodeKind::Wire),
        SlotDecl::many(NodeKind::RoutedVia),
        SlotDecl::many(NodeKind::Plane),
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

    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.children
            .many(NodeKind::Wire)
            .iter()
            .filter_map(Node::as_wire)
    }

    pub fn push_wire(&mut self, wire: Wire) {
        self.children.push(Node::Wire(wire));
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

    pub fn planes(&self) -> impl Iterator<Item = &Plane> {
        self.children
            .many(NodeKind::Plane)
            .iter()
            .filter_map(Node::as_plane)
    }

    pub fn push_plane(&mut self, plane: Plane) {
        self.children.push(Node::Plane(plane));
    }
}

impl Default for Wiring {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Wiring {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn wiring(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Wiring(Wiring {
        children: ctx.children(tail, Wiring::LAYOUT),
    })
}

/// `(wire (path ...) (net <name>) (type route))`.
///
/// Some writers also put the net id, layer and width inline; those are kept
/// as leading atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub net_id: Option<String>,
    pub layer: Option<String>,
    pub width: Option<f64>,
    children: Children,
}

impl Wire {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::WirePath),
        SlotDecl::one(NodeKind::Net),
        SlotDecl::one(NodeKind::Type),
    ];

    pub fn new() -> Self {
        Self {
            net_id: None,
            layer: None,
            width: None,
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &WirePath> {
        self.children
            .many(NodeKind::WirePath)
            .iter()
            .filter_map(Node::as_wire_path)
    }

    pub fn push_path(&mut self, path: WirePath) {
        self.children.push(Node::WirePath(path));
    }

    pub fn net(&self) -> Option<&Net> {
        self.children.one(NodeKind::Net).and_then(Node::as_net)
    }

    pub fn set_net(&mut self, net: Option<Net>) {
        self.children.set_one(NodeKind::Net, net.map(Node::from));
    }

    /// `route`, `fix`, `protect`, ...
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

impl Default for Wire {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Wire {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.net_id);
        push_text(&mut atoms, &self.layer);
        push_number(&mut atoms, self.width);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn wire(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    Node::Wire(Wire {
        net_id: scalars.text(0),
        layer: scalars.text(1),
        width: scalars.number(0),
        children: ctx.children(tail, Wire::LAYOUT),
    })
}

/// `(via <padstack> x y (net <name>) ...)`: a placed via.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedVia {
    pub padstack: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    children: Children,
}

impl RoutedVia {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Net),
        SlotDecl::one(NodeKind::Type),
    ];

    pub fn new(padstack: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            padstack: Some(padstack.into()),
            x: Some(x),
            y: Some(y),
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn net(&self) -> Option<&Net> {
        self.children.one(NodeKind::Net).and_then(Node::as_net)
    }

    pub fn set_net(&mut self, net: Option<Net>) {
        self.children.set_one(NodeKind::Net, net.map(Node::from));
    }

    pub fn via_type(&self) -> Option<&str> {
        self.children
            .one(NodeKind::Type)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_text)
    }

    pub fn set_via_type(&mut self, via_type: Option<&str>) {
        let node = via_type.map(|ty| Node::Value(ValueNode::of(NodeKind::Type, ty)));
        self.children.set_one(NodeKind::Type, node);
    }
}

impl WriteForm for RoutedVia {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.padstack);
        push_number(&mut atoms, self.x);
        push_number(&mut atoms, self.y);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn routed_via(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    Node::RoutedVia(RoutedVia {
        padstack: scalars.text(0),
        x: scalars.number(0),
        y: scalars.number(1),
        children: ctx.children(tail, RoutedVia::LAYOUT),
    })
}

impl_composite!(Wiring, Wire, RoutedVia);
