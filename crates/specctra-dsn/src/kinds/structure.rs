//! `(structure ...)`: layers, board outline and design rules.

use specctra_sexpr::Sexpr;

use super::{impl_composite, push_number, push_text};
use crate::construct::{Construction, Scalars, value_number, value_text};
use crate::render::{Atom, WriteForm, write_list};
use crate::{
    Children, Descriptor, Node, NodeKind, Polyline, Registry, Scalar, ShapeGroup, SlotDecl,
    ValueNode,
};

pub(super) fn register(registry: &mut Registry) {
    registry.register(Descriptor::new("structure", NodeKind::Structure, structure));
    registry.register(Descriptor::new("layer", NodeKind::Layer, layer));
    registry.register(
        Descriptor::new("property", NodeKind::LayerProperty, layer_property).within("layer"),
    );
    registry.register(Descriptor::new("type", NodeKind::Type, value_text));
    registry.register(Descriptor::new("index", NodeKind::Index, value_number));
    registry.register(Descriptor::new("rule", NodeKind::Rule, rule));
    registry.register(Descriptor::new("width", NodeKind::Width, value_number));
    registry.register(Descriptor::new("clearance", NodeKind::Clearance, clearance));
    registry.register(Descriptor::new("grid", NodeKind::Grid, grid));
    registry.register(Descriptor::new("control", NodeKind::Control, settings));
    registry.register(Descriptor::new("place_control", NodeKind::PlaceControl, settings));
    registry.register(Descriptor::new("circuit", NodeKind::Circuit, settings));
    registry.register(Descriptor::new("plane", NodeKind::Plane, plane).within("structure"));
    registry.register(Descriptor::new("plane", NodeKind::Plane, plane).within("wiring"));
    registry.register(Descriptor::new("via", NodeKind::Via, via).within("structure"));
}

/// `(structure ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    children: Children,
}

impl Structure {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::many(NodeKind::Layer),
        SlotDecl::one(NodeKind::Boundary),
        SlotDecl::many(NodeKind::Plane),
        SlotDecl::one(NodeKind::Via),
        SlotDecl::one(NodeKind::Rule),
        SlotDecl::many(NodeKind::Grid),
        SlotDecl::one(NodeKind::Control),
        SlotDecl::many(NodeKind::Keepout),
    ];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.children
            .many(NodeKind::Layer)
            .iter()
            .filter_map(Node::as_layer)
    }

    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        let nodes = layers.into_iter().map(Node::from).collect();
        self.children.set_many(NodeKind::Layer, nodes);
    }

    pub fn push_layer(&mut self, layer: Layer) {
        self.children.push(Node::Layer(layer));
    }

    /// The board outline.
    pub fn boundary(&self) -> Option<&ShapeGroup> {
        self.children
            .one(NodeKind::Boundary)
            .and_then(Node::as_boundary)
    }

    pub fn set_boundary(&mut self, boundary: Option<ShapeGroup>) {
        self.children
            .set_one(NodeKind::Boundary, boundary.map(Node::Boundary));
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

    pub fn via(&self) -> Option<&Via> {
        self.children.one(NodeKind::Via).and_then(Node::as_via)
    }

    pub fn set_via(&mut self, via: Option<Via>) {
        self.children.set_one(NodeKind::Via, via.map(Node::from));
    }

    pub fn rule(&self) -> Option<&Rule> {
        self.children.one(NodeKind::Rule).and_then(Node::as_rule)
    }

    pub fn set_rule(&mut self, rule: Option<Rule>) {
        self.children.set_one(NodeKind::Rule, rule.map(Node::from));
    }

    pub fn grids(&self) -> impl Iterator<Item = &Grid> {
        self.children
            .many(NodeKind::Grid)
            .iter()
            .filter_map(Node::as_grid)
    }

    pub fn push_grid(&mut self, grid: Grid) {
        self.children.push(Node::Grid(grid));
    }

    pub fn control(&self) -> Option<&SettingsBlock> {
        self.children.one(NodeKind::Control).and_then(Node::as_control)
    }

    pub fn set_control(&mut self, control: Option<SettingsBlock>) {
        self.children
            .set_one(NodeKind::Control, control.map(Node::Control));
    }

    pub fn keepouts(&self) -> impl Iterator<Item = &ShapeGroup> {
        self.children
            .many(NodeKind::Keepout)
            .iter()
            .filter_map(Node::as_keepout)
    }

    pub fn push_keepout(&mut self, keepout: ShapeGroup) {
        self.children.push(Node::Keepout(keepout));
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Structure {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn structure(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Structure(Structure {
        children: ctx.children(tail, Structure::LAYOUT),
    })
}

/// `(layer <name> (type signal) (property (index 0)))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: Option<String>,
    children: Children,
}

impl Layer {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Type),
        SlotDecl::one(NodeKind::LayerProperty),
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            children: Children::new(Self::LAYOUT),
        }
    }

    /// `signal`, `power`, `mixed` or `jumper`.
    pub fn layer_type(&self) -> Option<&str> {
        self.children
            .one(NodeKind::Type)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_text)
    }

    pub fn set_layer_type(&mut self, layer_type: Option<&str>) {
        let node = layer_type.map(|ty| Node::Value(ValueNode::of(NodeKind::Type, ty)));
        self.children.set_one(NodeKind::Type, node);
    }

    pub fn property(&self) -> Option<&LayerProperty> {
        self.children
            .one(NodeKind::LayerProperty)
            .and_then(Node::as_layer_property)
    }

    pub fn set_property(&mut self, property: Option<LayerProperty>) {
        self.children
            .set_one(NodeKind::LayerProperty, property.map(Node::from));
    }

    /// Stack-up position from `(property (index n))`.
    pub fn index(&self) -> Option<i64> {
        self.property().and_then(|property| property.index)
    }
}

impl WriteForm for Layer {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.name);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn layer(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Layer(Layer {
        name: Scalars::of(tail).atom(0),
        children: ctx.children(tail, Layer::LAYOUT),
    })
}

/// `(property (index n) ...)` inside a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerProperty {
    pub index: Option<i64>,
    children: Children,
}

impl LayerProperty {
    pub fn new(index: Option<i64>) -> Self {
        Self {
            index,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for LayerProperty {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let index = self
            .index
            .map(|index| Node::Value(ValueNode::of(NodeKind::Index, index)));
        write_list(out, depth, head, &[], index.iter().chain(self.children.iter()));
    }
}

fn layer_property(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let mut props = ctx.properties(tail, &["index"]);
    let index = props.take_number("index").map(|n| n as i64);
    Node::LayerProperty(LayerProperty {
        index,
        children: props.into_children(&[]),
    })
}

/// `(rule (width 250) (clearance 200) ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    children: Children,
}

impl Rule {
    const LAYOUT: &'static [SlotDecl] = &[
        SlotDecl::one(NodeKind::Width),
        SlotDecl::many(NodeKind::Clearance),
    ];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn width(&self) -> Option<f64> {
        self.children
            .one(NodeKind::Width)
            .and_then(Node::as_value)
            .and_then(ValueNode::as_number)
    }

    pub fn set_width(&mut self, width: Option<f64>) {
        let node = width.map(|width| Node::Value(ValueNode::of(NodeKind::Width, width)));
        self.children.set_one(NodeKind::Width, node);
    }

    pub fn clearances(&self) -> impl Iterator<Item = &Clearance> {
        self.children
            .many(NodeKind::Clearance)
            .iter()
            .filter_map(Node::as_clearance)
    }

    pub fn set_clearances(&mut self, clearances: Vec<Clearance>) {
        let nodes = clearances.into_iter().map(Node::from).collect();
        self.children.set_many(NodeKind::Clearance, nodes);
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for Rule {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn rule(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Rule(Rule {
        children: ctx.children(tail, Rule::LAYOUT),
    })
}

/// `(clearance <value> (type <class>))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clearance {
    pub value: Option<f64>,
    pub clearance_type: Option<String>,
    children: Children,
}

impl Clearance {
    pub fn new(value: Option<f64>, clearance_type: Option<String>) -> Self {
        Self {
            value,
            clearance_type,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Clearance {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms: Vec<Atom<'_>> = Vec::new();
        push_number(&mut atoms, self.value);
        let ty = self
            .clearance_type
            .as_deref()
            .map(|ty| Node::Value(ValueNode::of(NodeKind::Type, ty)));
        write_list(out, depth, head, &atoms, ty.iter().chain(self.children.iter()));
    }
}

fn clearance(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let mut props = ctx.properties(tail, &["type"]);
    Node::Clearance(Clearance {
        value: Scalars::of(tail).number(0),
        clearance_type: props.take_text("type"),
        children: props.into_children(&[]),
    })
}

/// `(grid <type> <spacing> ...)`, e.g. `(grid via 0.1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub grid_type: Option<String>,
    pub spacing: Option<f64>,
    children: Children,
}

impl Grid {
    pub fn new(grid_type: Option<String>, spacing: Option<f64>) -> Self {
        Self {
            grid_type,
            spacing,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Grid {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.grid_type);
        push_number(&mut atoms, self.spacing);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn grid(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let scalars = Scalars::of(tail);
    Node::Grid(Grid {
        grid_type: scalars.text(0),
        spacing: scalars.number(0),
        children: ctx.children(tail, &[]),
    })
}

/// A block of `(key value)` settings: `control`, `place_control` or `circuit`.
///
/// Each flat `(key value)` list the registry does not know becomes a
/// [`NodeKind::Setting`] value node keyed by its head; `on`/`off` read as switches.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsBlock {
    children: Children,
}

impl SettingsBlock {
    const LAYOUT: &'static [SlotDecl] = &[SlotDecl::many(NodeKind::Setting)];

    pub fn new() -> Self {
        Self {
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn settings(&self) -> impl Iterator<Item = &ValueNode> {
        self.children
            .many(NodeKind::Setting)
            .iter()
            .filter_map(Node::as_value)
    }

    pub fn setting(&self, key: &str) -> Option<&Scalar> {
        self.settings()
            .find(|setting| setting.head == key)
            .and_then(|setting| setting.value.as_ref())
    }

    /// Replace the value of `key`, or append it.
    pub fn set(&mut self, key: &str, value: impl Into<Scalar>) {
        let value = Some(value.into());
        let existing = self
            .children
            .many_mut(NodeKind::Setting)
            .iter_mut()
            .filter_map(Node::as_value_mut)
            .find(|setting| setting.head == key);
        match existing {
            Some(setting) => setting.value = value,
            None => self
                .children
                .push(Node::Value(ValueNode::new(NodeKind::Setting, key, value))),
        }
    }
}

impl Default for SettingsBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteForm for SettingsBlock {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        write_list(out, depth, head, &[], self.children.iter());
    }
}

fn settings(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    let mut children = Children::new(SettingsBlock::LAYOUT);
    for item in tail.iter().filter(|item| item.is_list()) {
        let node = match setting(ctx, item) {
            Some(setting) => Node::Value(setting),
            None => ctx.child(item),
        };
        children.push(node);
    }

    let block = SettingsBlock { children };
    match ctx.kind {
        NodeKind::PlaceControl => Node::PlaceControl(block),
        NodeKind::Circuit => Node::Circuit(block),
        _ => Node::Control(block),
    }
}

/// A flat `(key [value])` list with no registration scoped to this block.
///
/// Unscoped registrations do not apply here: `(width 5)` inside a block is a
/// setting, not the rule width.
fn setting(ctx: &Construction<'_>, item: &Sexpr) -> Option<ValueNode> {
    let items = item.as_list()?;
    let key = items.first()?.as_sym()?;
    if items.len() > 2 || ctx.registry.resolve_within(key, ctx.head).is_some() {
        return None;
    }

    let value = match items.get(1) {
        None => None,
        Some(value) => {
            let scalar = Scalar::from_sexpr(value)?;
            let switch = scalar.as_text().and_then(Scalar::parse_switch);
            Some(switch.unwrap_or(scalar))
        }
    };
    Some(ValueNode::new(NodeKind::Setting, key, value))
}

/// `(plane <net> (polygon ...))`: a copper pour.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub net: Option<String>,
    children: Children,
}

impl Plane {
    const LAYOUT: &'static [SlotDecl] = &[SlotDecl::one(NodeKind::Polygon)];

    pub fn new(net: impl Into<String>) -> Self {
        Self {
            net: Some(net.into()),
            children: Children::new(Self::LAYOUT),
        }
    }

    pub fn polygon(&self) -> Option<&Polyline> {
        self.children.one(NodeKind::Polygon).and_then(Node::as_polygon)
    }

    pub fn set_polygon(&mut self, polygon: Option<Polyline>) {
        self.children
            .set_one(NodeKind::Polygon, polygon.map(Node::Polygon));
    }
}

impl WriteForm for Plane {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let mut atoms = Vec::new();
        push_text(&mut atoms, &self.net);
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn plane(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Plane(Plane {
        net: Scalars::of(tail).atom(0),
        children: ctx.children(tail, Plane::LAYOUT),
    })
}

/// `(via <padstack>...)` under `structure`: the padstacks the router may use.
#[derive(Debug, Clone, PartialEq)]
pub struct Via {
    pub padstacks: Vec<String>,
    children: Children,
}

impl Via {
    pub fn new(padstacks: Vec<String>) -> Self {
        Self {
            padstacks,
            children: Children::new(&[]),
        }
    }
}

impl WriteForm for Via {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let atoms: Vec<Atom<'_>> = self.padstacks.iter().map(|p| Atom::Text(p)).collect();
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

fn via(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Via(Via {
        padstacks: Scalars::of(tail).atoms().collect(),
        children: ctx.children(tail, &[]),
    })
}

impl_composite!(
    Structure,
    Layer,
    LayerProperty,
    Rule,
    Clearance,
    Grid,
    SettingsBlock,
    Plane,
    Via
);
