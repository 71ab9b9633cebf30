//! The typed document tree.

use std::fmt;

use specctra_sexpr::formatter::{push_indent, write_nested};
use specctra_sexpr::{Sexpr, SexprKind};

use crate::container::{Children, Composite, SlotDecl};
use crate::render::{Atom, WriteForm, write_list};
use crate::{
    Circle, Clearance, Class, Component, Grid, Image, Layer, LayerProperty, Library, LibraryOut,
    Net, Network, NetworkOut, NodeKind, Padstack, ParserSection, Pin, Pins, Place, Placement,
    Plane, Polyline, Rect, Resolution, RoutedNet, RoutedVia, RoutedWire, Routes, Rule,
    SettingsBlock, ShapeGroup, SpectraDsn, SpectraSes, Structure, Via, WasIs, Wire, WirePath,
    Wiring,
};

/// A scalar carried by a value node or a record.
///
/// Integers keep their exact value. An `Int` compares equal to a `Number`
/// holding the same integral value, so `5` and `5.0` are the same scalar.
#[derive(Debug, Clone)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Number(f64),
    Switch(bool),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Number(a), Scalar::Number(b)) => a == b,
            (Scalar::Switch(a), Scalar::Switch(b)) => a == b,
            (Scalar::Int(i), Scalar::Number(f)) | (Scalar::Number(f), Scalar::Int(i)) => {
                *f == *i as f64 && *f as i64 == *i
            }
            _ => false,
        }
    }
}

impl Scalar {
    /// Text for symbols and strings, numbers for numbers, nothing for lists.
    pub fn from_sexpr(item: &Sexpr) -> Option<Self> {
        match &item.kind {
            SexprKind::Symbol(s) | SexprKind::String(s) => Some(Scalar::Text(s.clone())),
            SexprKind::Int(n) => Some(Scalar::Int(*n)),
            SexprKind::F64(f) => Some(Scalar::Number(*f)),
            SexprKind::List(_) => None,
        }
    }

    pub fn parse_switch(text: &str) -> Option<Self> {
        match text {
            "on" => Some(Scalar::Switch(true)),
            "off" => Some(Scalar::Switch(false)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_switch(&self) -> Option<bool> {
        match self {
            Scalar::Switch(on) => Some(*on),
            _ => None,
        }
    }

    pub fn atom(&self) -> Atom<'_> {
        match self {
            Scalar::Text(text) => Atom::Text(text),
            Scalar::Int(n) => Atom::Int(*n),
            Scalar::Number(n) => Atom::Number(*n),
            Scalar::Switch(on) => Atom::Switch(*on),
        }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::Text(text.to_string())
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Scalar::Text(text)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(on: bool) -> Self {
        Scalar::Switch(on)
    }
}

/// `(head value)`: one optional scalar, no children.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub kind: NodeKind,
    pub head: String,
    pub value: Option<Scalar>,
}

impl ValueNode {
    pub fn new(kind: NodeKind, head: impl Into<String>, value: Option<Scalar>) -> Self {
        Self {
            kind,
            head: head.into(),
            value,
        }
    }

    /// A value node written with the kind's canonical head.
    pub fn of(kind: NodeKind, value: impl Into<Scalar>) -> Self {
        Self::new(kind, kind.head().unwrap_or_default(), Some(value.into()))
    }

    pub fn as_text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Scalar::as_text)
    }

    pub fn as_number(&self) -> Option<f64> {
        self.value.as_ref().and_then(Scalar::as_number)
    }

    pub fn as_switch(&self) -> Option<bool> {
        self.value.as_ref().and_then(Scalar::as_switch)
    }
}

impl WriteForm for ValueNode {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let atoms: Vec<Atom<'_>> = self.value.iter().map(Scalar::atom).collect();
        write_list(out, depth, head, &atoms, std::iter::empty::<&Node>());
    }
}

/// Generic composite for kinds outside the built-in catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: NodeKind,
    pub head: String,
    /// Leading atoms, in document order.
    pub scalars: Vec<Scalar>,
    children: Children,
}

impl Record {
    pub fn new(kind: NodeKind, head: impl Into<String>, scalars: Vec<Scalar>) -> Self {
        Self::with_children(kind, head, scalars, Children::new(&[]))
    }

    pub fn with_children(
        kind: NodeKind,
        head: impl Into<String>,
        scalars: Vec<Scalar>,
        children: Children,
    ) -> Self {
        Self {
            kind,
            head: head.into(),
            scalars,
            children,
        }
    }

    /// The `idx`-th text scalar.
    pub fn text(&self, idx: usize) -> Option<&str> {
        self.scalars.iter().filter_map(Scalar::as_text).nth(idx)
    }

    pub fn number(&self, idx: usize) -> Option<f64> {
        self.scalars.iter().filter_map(Scalar::as_number).nth(idx)
    }

    pub fn layout(&self) -> &'static [SlotDecl] {
        self.children.layout()
    }
}

impl Composite for Record {
    fn children(&self) -> &Children {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }
}

impl WriteForm for Record {
    fn write_form(&self, head: &str, depth: usize, out: &mut String) {
        let atoms: Vec<Atom<'_>> = self.scalars.iter().map(Scalar::atom).collect();
        write_list(out, depth, head, &atoms, self.children.iter());
    }
}

/// A list no registration claimed, kept as read.
#[derive(Debug, Clone, PartialEq)]
pub struct Opaque {
    sexpr: Sexpr,
}

impl Opaque {
    pub fn new(sexpr: Sexpr) -> Self {
        Self { sexpr }
    }

    pub fn head(&self) -> &str {
        self.sexpr.head().unwrap_or_default()
    }

    pub fn sexpr(&self) -> &Sexpr {
        &self.sexpr
    }

    pub fn into_sexpr(self) -> Sexpr {
        self.sexpr
    }
}

impl WriteForm for Opaque {
    fn write_form(&self, _head: &str, depth: usize, out: &mut String) {
        write_nested(&self.sexpr, depth, out);
    }
}

/// A node of a parsed or constructed DSN/SES tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    SpectraDsn(SpectraDsn),
    Parser(ParserSection),
    Resolution(Resolution),
    Structure(Structure),
    Boundary(ShapeGroup),
    Outline(ShapeGroup),
    Keepout(ShapeGroup),
    Shape(ShapeGroup),
    Layer(Layer),
    LayerProperty(LayerProperty),
    Rule(Rule),
    Clearance(Clearance),
    Grid(Grid),
    Control(SettingsBlock),
    PlaceControl(SettingsBlock),
    Circuit(SettingsBlock),
    Plane(Plane),
    Via(Via),
    Rect(Rect),
    Path(Polyline),
    Polygon(Polyline),
    Circle(Circle),
    WirePath(WirePath),
    Placement(Placement),
    Component(Component),
    Place(Place),
    Library(Library),
    Image(Image),
    Pin(Pin),
    Padstack(Padstack),
    Network(Network),
    Net(Net),
    Pins(Pins),
    Class(Class),
    Wiring(Wiring),
    Wire(Wire),
    RoutedVia(RoutedVia),

    SpectraSes(SpectraSes),
    WasIs(WasIs),
    Routes(Routes),
    LibraryOut(LibraryOut),
    NetworkOut(NetworkOut),
    RoutedNet(RoutedNet),
    RoutedWire(RoutedWire),

    /// Unit, type, index, width, settings and other single-scalar records.
    Value(ValueNode),
    Record(Record),
    Opaque(Opaque),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::SpectraDsn(_) => NodeKind::SpectraDsn,
            Node::Parser(_) => NodeKind::Parser,
            Node::Resolution(_) => NodeKind::Resolution,
            Node::Structure(_) => NodeKind::Structure,
            Node::Boundary(_) => NodeKind::Boundary,
            Node::Outline(_) => NodeKind::Outline,
            Node::Keepout(_) => NodeKind::Keepout,
            Node::Shape(_) => NodeKind::Shape,
            Node::Layer(_) => NodeKind::Layer,
            Node::LayerProperty(_) => NodeKind::LayerProperty,
            Node::Rule(_) => NodeKind::Rule,
            Node::Clearance(_) => NodeKind::Clearance,
            Node::Grid(_) => NodeKind::Grid,
            Node::Control(_) => NodeKind::Control,
            Node::PlaceControl(_) => NodeKind::PlaceControl,
            Node::Circuit(_) => NodeKind::Circuit,
            Node::Plane(_) => NodeKind::Plane,
            Node::Via(_) => NodeKind::Via,
            Node::Rect(_) => NodeKind::Rect,
            Node::Path(_) => NodeKind::Path,
            Node::Polygon(_) => NodeKind::Polygon,
            Node::Circle(_) => NodeKind::Circle,
            Node::WirePath(_) => NodeKind::WirePath,
            Node::Placement(_) => NodeKind::Placement,
            Node::Component(_) => NodeKind::Component,
            Node::Place(_) => NodeKind::Place,
            Node::Library(_) => NodeKind::Library,
            Node::Image(_) => NodeKind::Image,
            Node::Pin(_) => NodeKind::Pin,
            Node::Padstack(_) => NodeKind::Padstack,
            Node::Network(_) => NodeKind::Network,
            Node::Net(_) => NodeKind::Net,
            Node::Pins(_) => NodeKind::Pins,
            Node::Class(_) => NodeKind::Class,
            Node::Wiring(_) => NodeKind::Wiring,
            Node::Wire(_) => NodeKind::Wire,
            Node::RoutedVia(_) => NodeKind::RoutedVia,
            Node::SpectraSes(_) => NodeKind::SpectraSes,
            Node::WasIs(_) => NodeKind::WasIs,
            Node::Routes(_) => NodeKind::Routes,
            Node::LibraryOut(_) => NodeKind::LibraryOut,
            Node::NetworkOut(_) => NodeKind::NetworkOut,
            Node::RoutedNet(_) => NodeKind::RoutedNet,
            Node::RoutedWire(_) => NodeKind::RoutedWire,
            Node::Value(value) => value.kind,
            Node::Record(record) => record.kind,
            Node::Opaque(_) => NodeKind::Opaque,
        }
    }

    /// The head symbol this node is written with.
    pub fn head(&self) -> &str {
        match self {
            Node::Value(value) => &value.head,
            Node::Record(record) => &record.head,
            Node::Opaque(opaque) => opaque.head(),
            Node::Circle(circle) => circle.head(),
            other => other.kind().head().unwrap_or_default(),
        }
    }

    fn form(&self) -> &dyn WriteForm {
        match self {
            Node::SpectraDsn(n) => n,
            Node::Parser(n) => n,
            Node::Resolution(n) => n,
            Node::Structure(n) => n,
            Node::Boundary(n) | Node::Outline(n) | Node::Keepout(n) | Node::Shape(n) => n,
            Node::Layer(n) => n,
            Node::LayerProperty(n) => n,
            Node::Rule(n) => n,
            Node::Clearance(n) => n,
            Node::Grid(n) => n,
            Node::Control(n) | Node::PlaceControl(n) | Node::Circuit(n) => n,
            Node::Plane(n) => n,
            Node::Via(n) => n,
            Node::Rect(n) => n,
            Node::Path(n) | Node::Polygon(n) => n,
            Node::Circle(n) => n,
            Node::WirePath(n) => n,
            Node::Placement(n) => n,
            Node::Component(n) => n,
            Node::Place(n) => n,
            Node::Library(n) => n,
            Node::Image(n) => n,
            Node::Pin(n) => n,
            Node::Padstack(n) => n,
            Node::Network(n) => n,
            Node::Net(n) => n,
            Node::Pins(n) => n,
            Node::Class(n) => n,
            Node::Wiring(n) => n,
            Node::Wire(n) => n,
            Node::RoutedVia(n) => n,
            Node::SpectraSes(n) => n,
            Node::WasIs(n) => n,
            Node::Routes(n) => n,
            Node::LibraryOut(n) => n,
            Node::NetworkOut(n) => n,
            Node::RoutedNet(n) => n,
            Node::RoutedWire(n) => n,
            Node::Value(n) => n,
            Node::Record(n) => n,
            Node::Opaque(n) => n,
        }
    }

    /// Children of a composite node; `None` for value and opaque nodes.
    pub fn composite(&self) -> Option<&dyn Composite> {
        let composite: &dyn Composite = match self {
            Node::SpectraDsn(n) => n,
            Node::Parser(n) => n,
            Node::Resolution(n) => n,
            Node::Structure(n) => n,
            Node::Boundary(n) | Node::Outline(n) | Node::Keepout(n) | Node::Shape(n) => n,
            Node::Layer(n) => n,
            Node::LayerProperty(n) => n,
            Node::Rule(n) => n,
            Node::Clearance(n) => n,
            Node::Grid(n) => n,
            Node::Control(n) | Node::PlaceControl(n) | Node::Circuit(n) => n,
            Node::Plane(n) => n,
            Node::Via(n) => n,
            Node::Rect(n) => n,
            Node::Path(n) | Node::Polygon(n) => n,
            Node::Circle(n) => n,
            Node::WirePath(n) => n,
            Node::Placement(n) => n,
            Node::Component(n) => n,
            Node::Place(n) => n,
            Node::Library(n) => n,
            Node::Image(n) => n,
            Node::Pin(n) => n,
            Node::Padstack(n) => n,
            Node::Network(n) => n,
            Node::Net(n) => n,
            Node::Pins(n) => n,
            Node::Class(n) => n,
            Node::Wiring(n) => n,
            Node::Wire(n) => n,
            Node::RoutedVia(n) => n,
            Node::SpectraSes(n) => n,
            Node::WasIs(n) => n,
            Node::Routes(n) => n,
            Node::LibraryOut(n) => n,
            Node::NetworkOut(n) => n,
            Node::RoutedNet(n) => n,
            Node::RoutedWire(n) => n,
            Node::Record(n) => n,
            Node::Value(_) | Node::Opaque(_) => return None,
        };
        Some(composite)
    }

    /// Write this node with the cursor already placed at its indent.
    pub fn write_to(&self, out: &mut String, depth: usize) {
        self.form().write_form(self.head(), depth, out);
    }

    pub fn render(&self) -> String {
        self.render_indented(0)
    }

    /// Render as a child line at `depth`, indentation included.
    pub fn render_indented(&self, depth: usize) -> String {
        let mut out = String::new();
        push_indent(&mut out, depth);
        self.write_to(&mut out, depth);
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

macro_rules! downcasts {
    ($($variant:ident => $as_ref:ident, $as_mut:ident: $ty:ty;)*) => {
        impl Node {
            $(
                pub fn $as_ref(&self) -> Option<&$ty> {
                    match self {
                        Node::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        Node::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            )*
        }
    };
}

downcasts! {
    SpectraDsn => as_spectra_dsn, as_spectra_dsn_mut: SpectraDsn;
    Parser => as_parser, as_parser_mut: ParserSection;
    Resolution => as_resolution, as_resolution_mut: Resolution;
    Structure => as_structure, as_structure_mut: Structure;
    Boundary => as_boundary, as_boundary_mut: ShapeGroup;
    Outline => as_outline, as_outline_mut: ShapeGroup;
    Keepout => as_keepout, as_keepout_mut: ShapeGroup;
    Shape => as_shape, as_shape_mut: ShapeGroup;
    Layer => as_layer, as_layer_mut: Layer;
    LayerProperty => as_layer_property, as_layer_property_mut: LayerProperty;
    Rule => as_rule, as_rule_mut: Rule;
    Clearance => as_clearance, as_clearance_mut: Clearance;
    Grid => as_grid, as_grid_mut: Grid;
    Control => as_control, as_control_mut: SettingsBlock;
    PlaceControl => as_place_control, as_place_control_mut: SettingsBlock;
    Circuit => as_circuit, as_circuit_mut: SettingsBlock;
    Plane => as_plane, as_plane_mut: Plane;
    Via => as_via, as_via_mut: Via;
    Rect => as_rect, as_rect_mut: Rect;
    Path => as_path, as_path_mut: Polyline;
    Polygon => as_polygon, as_polygon_mut: Polyline;
    Circle => as_circle, as_circle_mut: Circle;
    WirePath => as_wire_path, as_wire_path_mut: WirePath;
    Placement => as_placement, as_placement_mut: Placement;
    Component => as_component, as_component_mut: Component;
    Place => as_place, as_place_mut: Place;
    Library => as_library, as_library_mut: Library;
    Image => as_image, as_image_mut: Image;
    Pin => as_pin, as_pin_mut: Pin;
    Padstack => as_padstack, as_padstack_mut: Padstack;
    Network => as_network, as_network_mut: Network;
    Net => as_net, as_net_mut: Net;
    Pins => as_pins, as_pins_mut: Pins;
    Class => as_class, as_class_mut: Class;
    Wiring => as_wiring, as_wiring_mut: Wiring;
    Wire => as_wire, as_wire_mut: Wire;
    RoutedVia => as_routed_via, as_routed_via_mut: RoutedVia;
    SpectraSes => as_spectra_ses, as_spectra_ses_mut: SpectraSes;
    WasIs => as_was_is, as_was_is_mut: WasIs;
    Routes => as_routes, as_routes_mut: Routes;
    LibraryOut => as_library_out, as_library_out_mut: LibraryOut;
    NetworkOut => as_network_out, as_network_out_mut: NetworkOut;
    RoutedNet => as_routed_net, as_routed_net_mut: RoutedNet;
    RoutedWire => as_routed_wire, as_routed_wire_mut: RoutedWire;
    Value => as_value, as_value_mut: ValueNode;
    Record => as_record, as_record_mut: Record;
    Opaque => as_opaque, as_opaque_mut: Opaque;
}

macro_rules! node_from {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(inner: $ty) -> Self {
                    Node::$ty(inner)
                }
            }
        )*
    };
}

// Types shared by several variants (ShapeGroup, SettingsBlock, Polyline)
// are wrapped explicitly with the variant for their head.
node_from!(
    SpectraDsn,
    Resolution,
    Structure,
    Layer,
    LayerProperty,
    Rule,
    Clearance,
    Grid,
    Plane,
    Via,
    Rect,
    Circle,
    WirePath,
    Placement,
    Component,
    Place,
    Library,
    Image,
    Pin,
    Padstack,
    Network,
    Net,
    Pins,
    Class,
    Wiring,
    Wire,
    RoutedVia,
    SpectraSes,
    WasIs,
    Routes,
    LibraryOut,
    NetworkOut,
    RoutedNet,
    RoutedWire,
    Record,
    Opaque,
);

impl From<ParserSection> for Node {
    fn from(parser: ParserSection) -> Self {
        Node::Parser(parser)
    }
}

impl From<ValueNode> for Node {
    fn from(value: ValueNode) -> Self {
        Node::Value(value)
    }
}
