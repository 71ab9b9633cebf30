//! `(library ...)`: footprint images and padstacks.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_number, push_text};
use crate::construct::{Construction, Scalars, value_number, value_switch};
use crate::render::{Atom, WriteForm, write_list};
use crate::{Children, Descriptor, Node, NodeKind, Registry, ShapeGroup, SlotDecl, ValueNode};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("library", NodeKind::Library, library));
    registry.register(Descriptor::new("image", NodeKind::Image, image));
    registry.register(Descriptor::new("pin", NodeKind::Pin, pin));
    registry.register(Descriptor::new("rotate", NodeKind::Rotate, value_number));
    registry.register(Descriptor::new("padstack", NodeKind::Padstack, padstack).within("library"));
    registry.register(
        Descriptor::new("padstack", NodeKind::Padstack, padstack).within("library_out"),
    );
    registry.register(Descriptor::new("attach", NodeKind::Attach, value_switch));
}

#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    children: Children,
}

impl Library {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::Image),
        SlotDecl::many(NodeKind::Padstack),
    ];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.children
            .many(NodeKind::Image)
            .iter()
            .filter_map(Node::as_image)
    }

    pub fn image(&self, name: &str) -> Option<&Image> {
        self.images().find(|image| image.name.as_deref() == Some(name))
    }

    pub fn padstacks(&self) -> impl Iterator<Item = &Padstack> {
        self.children
            .many(NodeKind::Padstack)
            .iter()
            .filter_map(Node::as_padstack)
    }

    pub fn padstack(&self, name: &str) -> Option<&Padstack> {
        self.padstacks()
            .find(|padstack| padstack.name.as_deref() == Some(name))
    }

    pub fn push_image(&mut self, image: Image) {
        self.children.push(Node::Image(image));
    }

    pub fn push_padstack(&mut self, padstack: Padstack) {
        self.children.push(Node::Padstack(padstack));
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Library {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn library(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Library(Library {
        children: ctx.children(tail, Library::LAYOUT),
    })
}

/// `(image <name> (outline ...) (pin ...) (keepout ...))`: a footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub name: Option<String>,
    children: Children,
}

impl Image {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::Outline),
        SlotDecl::many(NodeKind::Pin),
        SlotDecl::many(NodeKind::Keepout),
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn outlines(&self) -> impl Iterator<Item = &ShapeGroup> {
        self.children
            .many(NodeKind::Outline)
            .iter()
            .filter_map(Node::as_outline)
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.children
            .many(NodeKind::Pin)
            .iter()
            .filter_map(Node::as_pin)
    }

    pub fn keepouts(&self) -> impl Iterator<Item = &ShapeGroup> {
        self.children
            .many(NodeKind::Keepout)
            .iter()
            .filter_map(Node::as_keepout)
    }

    pub fn push_outline(&mut self, outline: ShapeGroup) {
        self.children.push(Node::Outline(outline));
    }

    pub fn push_keepout(&mut self, keepout: ShapeGroup) {
        self.children.push(Node::Keepout(keepout));
    }

    pub fn push_pin(&mut self, pin: Pin) {
        self.children.push(Node::Pin(pin));
    }
}

impl WriteForm for Image {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn image(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Image(Image {
        name: Scalars::of(tail).atom(0),
        children: ctx.children(tail, Image::LAYOUT),
    })
}

/// `(pin <padstack> [(rotate r)] <pin id> x y)`.
///
/// Fields are positional over the atoms; the pin id is often numeric. A
/// rotation may be given as a fifth atom or as a `(rotate r)` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub padstack: Option<String>,
    pub id: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    children: Children,
}

impl Pin {
    pub fn new(padstack: impl Into<String>, id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            padstack: Some(padstack.into()),
            id: Some(id.into()),
            x: Some(x),
            y: Some(y),
            rotation: None,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Pin {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms: Vec<Atom<'_>> = Vec::new();
        push_text(&mut atoms, &self.padstack);
        push_text(&mut atoms, &self.id);
        push_number(&mut atoms, self.x);
        push_number(&mut atoms, self.y);
        let rotate = self
            .rotation
            .map(|r| Node::Value(ValueNode::of(NodeKind::Rotate, r)));
        write_list(out, depth, head, &atoms, rotate.iter().chain(self.children.iter()));
    }
}

fn pin(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    let mut props = ctx.properties(tail, &["rotate"]);
    let number_at = |idx| scalars.raw(idx).and_then(Sexpr::as_number);
    let rotation = props.take_number("rotate").or_else(|| number_at(4));

    Node::Pin(Pin {
        padstack: scalars.atom(0),
        id: scalars.atom(1),
        x: number_at(2),
        y: number_at(3),
        rotation,
        children: props.into_children(&[]),
    })
}

/// `(padstack <name> (shape ...) ... (attach off))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Padstack {
    pub name: Option<String>,
    children: Children,
}

impl Padstack {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::Shape),
        SlotDecl::one(NodeKind::Attach),
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapeGroup> {
        self.children
            .many(NodeKind::Shape)
            .iter()
            .filter_map(Node::as_shape)
    }

    pub fn push_shape(&mut self, shape: ShapeGroup) {
        self.children.push(Node::Shape(shape));
    }

    /// Whether vias may be placed on this padstack's pads.
    pub fn attach(&self) -> Option<bool> {
        self.children
            .one(NodeKind::Attach)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_switch)
    }

    pub fn set_attach(&mut self, attach: Option<bool>) {
        let node = attach.map(|on| Node::Value(ValueNode::of(NodeKind::Attach, on)));
        self.children.set_one(NodeKind::Attach, node);
    }
}

impl WriteForm for Padstack {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn padstack(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Padstack(Padstack {
        name: Scalars::of(tail).atom(0),
        children: ctx.children(tail, Padstack::LAYOUT),
    })
}

impl_composite!(Library, Image, Pin, Padstack);
