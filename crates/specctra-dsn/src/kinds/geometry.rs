//! Shapes: rectangles, paths, polygons and circles, and the groups that hold them.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_number, push_text};
use crate::construct::{Construction, Scalars};
use crate::render::{Atom, WriteForm, write_list};
use crate::{Children, Descriptor, Node, NodeKind, Registry, SlotDecl};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("boundary", NodeKind::Boundary, shape_group));
    registry.register(Descriptor::new("outline", NodeKind::Outline, shape_group));
    registry.register(Descriptor::new("keepout", NodeKind::Keepout, shape_group));
    registry.register(Descriptor::new("shape", NodeKind::Shape, shape_group));
    registry.register(Descriptor::new("rect", NodeKind::Rect, rect));
    registry.register(Descriptor::new("path", NodeKind::Path, polyline));
    registry.register(Descriptor::new("polygon", NodeKind::Polygon, polyline));
    registry.register(Descriptor::new("circle", NodeKind::Circle, circle));
    registry.register(Descriptor::new("circ", NodeKind::Circle, circle));
    registry.register(Descriptor::new("path", NodeKind::WirePath, wire_path).within("wire"));
}

/// Shapes grouped under `boundary`, `outline`, `keepout` or a padstack `shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGroup {
    /// Keepouts may carry an identifier, often `""`.
    pub name: Option<String>,
    children: Children,
}

impl ShapeGroup {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::Rect),
        SlotDecl::many(NodeKind::Path),
        SlotDecl::many(NodeKind::Polygon),
        SlotDecl::many(NodeKind::Circle),
    ];

    pub fn new() -> Self {
        Self {
            name: None,
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.children
            .many(NodeKind::Rect)
            .iter()
            .filter_map(Node::as_rect)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Polyline> {
        self.children
            .many(NodeKind::Path)
            .iter()
            .filter_map(Node::as_path)
    }

    pub fn polygons(&self) -> impl Iterator<Item = &Polyline> {
        self.children
            .many(NodeKind::Polygon)
            .iter()
            .filter_map(Node::as_polygon)
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.children
            .many(NodeKind::Circle)
            .iter()
            .filter_map(Node::as_circle)
    }

    pub fn push_rect(&mut self, rect: Rect) {
        self.children.push(Node::Rect(rect));
    }

    pub fn push_path(&mut self, path: Polyline) {
        self.children.push(Node::Path(path));
    }

    pub fn push_polygon(&mut self, polygon: Polyline) {
        self.children.push(Node::Polygon(polygon));
    }

    pub fn push_circle(&mut self, circle: Circle) {
        self.children.push(Node::Circle(circle));
    }
}

impl Default for ShapeGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for ShapeGroup {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn shape_group(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let group = ShapeGroup {
        name: Scalars::of(tail).text(0),
        children: ctx.children(tail, ShapeGroup::LAYOUT),
    };
    match ctx.kind {
        NodeKind::Outline => Node::Outline(group),
        NodeKind::Keepout => Node::Keepout(group),
        NodeKind::Shape => Node::Shape(group),
        _ => Node::Boundary(group),
    }
}

/// `(rect <layer> x1 y1 x2 y2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub layer: Option<String>,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    children: Children,
}

impl Rect {
    pub fn new(layer: impl Into<String>, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            layer: Some(layer.into()),
            x1: Some(x1),
            y1: Some(y1),
            x2: Some(x2),
            y2: Some(y2),
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Rect {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.layer);
        for coord in [self.x1, self.y1, self.x2, self.y2] {
            push_number(&mut atoms, coord);
        }
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn rect(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    Node::Rect(Rect {
        layer: scalars.text(0),
        x1: scalars.number(0),
        y1: scalars.number(1),
        x2: scalars.number(2),
        y2: scalars.number(3),
        children: ctx.children(tail, &[]),
    })
}

/// `(path <layer> <width> x y ...)` or `(polygon <layer> <width> x y ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub layer: Option<String>,
    pub width: Option<f64>,
    /// Flat `x y` pairs.
    pub coords: Vec<f64>,
    children: Children,
}

impl Polyline {
    pub fn new(layer: impl Into<String>, width: f64, coords: Vec<f64>) -> Self {
        Self {
            layer: Some(layer.into()),
            width: Some(width),
            coords,
            children: Children::new(&[]),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.coords.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

impl WriteForm for Polyline {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.layer);
        push_number(&mut atoms, self.width);
        atoms.extend(self.coords.iter().map(|&coord| Atom::Number(coord)));
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn polyline(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    let mut numbers = scalars.numbers();
    let line = Polyline {
        layer: scalars.text(0),
        width: numbers.next(),
        coords: numbers.collect(),
        children: ctx.children(tail, &[]),
    };
    match ctx.kind {
        NodeKind::Polygon => Node::Polygon(line),
        _ => Node::Path(line),
    }
}

/// `(circle <layer> <diameter> [x y])`, also read from `circ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    head: String,
    pub layer: Option<String>,
    pub diameter: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    children: Children,
}

impl Circle {
    pub fn new(layer: impl Into<String>, diameter: f64) -> Self {
        Self {
            head: "circle".to_string(),
            layer: Some(layer.into()),
            diameter: Some(diameter),
            x: None,
            y: None,
            children: Children::new(&[]),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// `circle` or `circ`, whichever the node was read from.
    pub fn head(&self) -> &str {
        &self.head
    }
}

impl WriteForm for Circle {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.layer);
        for value in [self.diameter, self.x, self.y] {
            push_number(&mut atoms, value);
        }
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn circle(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    Node::Circle(Circle {
        head: ctx.head.to_string(),
        layer: scalars.text(0),
        diameter: scalars.number(0),
        x: scalars.number(1),
        y: scalars.number(2),
        children: ctx.children(tail, &[]),
    })
}

/// `(path <layer> <width> x y ...)` inside a wire.
///
/// Routers sometimes write layers by number, so the layer is the first atom
/// whatever its type, and width and coordinates are the numbers after it.
#[derive(Debug, Clone, PartialEq)]
pub struct WirePath {
    pub layer: Option<String>,
    pub width: Option<f64>,
    pub coords: Vec<f64>,
    children: Children,
}

impl WirePath {
    pub fn new(layer: impl Into<String>, width: f64, coords: Vec<f64>) -> Self {
        Self {
            layer: Some(layer.into()),
            width: Some(width),
            coords,
            children: Children::new(&[]),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.coords.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

impl WriteForm for WirePath {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.layer);
        push_number(&mut atoms, self.width);
        atoms.extend(self.coords.iter().map(|&coord| Atom::Number(coord)));
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn wire_path(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    let mut numbers = tail
        .iter()
        .filter(|item| !item.is_list())
        .skip(1)
        .filter_map(Sexpr::as_number);
    Node::WirePath(WirePath {
        layer: scalars.atom(0),
        width: numbers.next(),
        coords: numbers.collect(),
        children: ctx.children(tail, &[]),
    })
}

impl_composite!(ShapeGroup, Rect, Polyline, Circle, WirePath);
