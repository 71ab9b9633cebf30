//! `(placement ...)`: where each component instance sits.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_number, push_text};
use crate::construct::{Construction, Scalars};
use crate::render::{WriteForm, write_list};
use crate::{Children, Descriptor, Node, NodeKind, Registry, Resolution, SlotDecl, ValueNode};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("placement", NodeKind::Placement, placement).within("pcb"));
    registry.register(
        Descriptor::new("placement", NodeKind::Placement, placement).within("session"),
    );
    registry.register(Descriptor::new("component", NodeKind::Component, component));
    registry.register(Descriptor::new("place", NodeKind::Place, place));
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    children: Children,
}

impl Placement {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Resolution),
        SlotDecl::one(NodeKind::Unit),
        SlotDecl::many(NodeKind::Component),
    ];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    /// Session files restate the resolution for placement coordinates.
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

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.children
            .many(NodeKind::Component)
            .iter()
            .filter_map(Node::as_component)
    }

    pub fn push_component(&mut self, component: Component) {
        self.children.push(Node::Component(component));
    }

    /// The placement of a reference designator, searching every component.
    pub fn find_place(&self, reference: &str) -> Option<&Place> {
        self.components()
            .flat_map(Component::places)
            .find(|place| place.reference.as_deref() == Some(reference))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Placement {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn placement(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Placement(Placement {
        children: ctx.children(tail, Placement::LAYOUT),
    })
}

/// `(component <image> (place ...)...)`: every instance of one library image.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub image: Option<String>,
    children: Children,
}

impl Component {
    const LAYOUT: &'static [SlotDecl] = &[SlotDecl::many(NodeKind::Place)];

    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.children
            .many(NodeKind::Place)
            .iter()
            .filter_map(Node::as_place)
    }

    pub fn push_place(&mut self, place: Place) {
        self.children.push(Node::Place(place));
    }
}

impl WriteForm for Component {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.image);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn component(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Component(Component {
        image: Scalars::of(tail).atom(0),
        children: ctx.children(tail, Component::LAYOUT),
    })
}

/// `(place <ref> x y <side> <rotation> ...)`, side being `front` or `back`.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub reference: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub side: Option<String>,
    pub rotation: Option<f64>,
    children: Children,
}

impl Place {
    pub fn new(reference: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            reference: Some(reference.into()),
            x: Some(x),
            y: Some(y),
            side: None,
            rotation: None,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Place {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.reference);
        push_number(&mut atoms, self.x);
        push_number(&mut atoms, self.y);
        push_text(&mut atoms, &self.side);
        push_number(&mut atoms, self.rotation);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn place(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    Node::Place(Place {
        reference: scalars.text(0),
        x: scalars.number(0),
        y: scalars.number(1),
        side: scalars.text(1),
        rotation: scalars.number(2),
        children: ctx.children(tail, &[]),
    })
}

impl_composite!(Placement, Component, Place);
