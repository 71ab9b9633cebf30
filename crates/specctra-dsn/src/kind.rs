use std::fmt;

/// Identity of a node kind.
///
/// Children are routed into typed slots by comparing kinds, so two heads that
/// must land in different slots need different kinds even when they share a
/// Rust type (`boundary` and `keepout` are both [`crate::ShapeGroup`]s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Design file
    SpectraDsn,
    Parser,
    Resolution,
    Unit,
    HostCad,
    HostVersion,
    Structure,
    Boundary,
    Outline,
    Keepout,
    Shape,
    Layer,
    LayerProperty,
    Type,
    Index,
    Rule,
    Width,
    Clearance,
    Grid,
    Control,
    PlaceControl,
    Circuit,
    Setting,
    Plane,
    Via,
    Rect,
    Path,
    Polygon,
    Circle,
    WirePath,
    Placement,
    Component,
    Place,
    Library,
    Image,
    Pin,
    Rotate,
    Padstack,
    Attach,
    Network,
    Net,
    Pins,
    Class,
    Wiring,
    Wire,
    RoutedVia,

    // Session file
    SpectraSes,
    BaseDesign,
    WasIs,
    Routes,
    LibraryOut,
    NetworkOut,
    RoutedNet,
    RoutedWire,

    /// A well-formed list no registration claimed.
    Opaque,
    /// A kind registered by a caller outside the built-in catalog.
    Custom(&'static str),
}

impl NodeKind {
    /// Display name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::SpectraDsn => "SpectraDsn",
            NodeKind::Parser => "Parser",
            NodeKind::Resolution => "Resolution",
            NodeKind::Unit => "Unit",
            NodeKind::HostCad => "HostCad",
            NodeKind::HostVersion => "HostVersion",
            NodeKind::Structure => "Structure",
            NodeKind::Boundary => "Boundary",
            NodeKind::Outline => "Outline",
            NodeKind::Keepout => "Keepout",
            NodeKind::Shape => "Shape",
            NodeKind::Layer => "Layer",
            NodeKind::LayerProperty => "LayerProperty",
            NodeKind::Type => "Type",
            NodeKind::Index => "Index",
            NodeKind::Rule => "Rule",
            NodeKind::Width => "Width",
            NodeKind::Clearance => "Clearance",
            NodeKind::Grid => "Grid",
            NodeKind::Control => "Control",
            NodeKind::PlaceControl => "PlaceControl",
            NodeKind::Circuit => "Circuit",
            NodeKind::Setting => "Setting",
            NodeKind::Plane => "Plane",
            NodeKind::Via => "Via",
            NodeKind::Rect => "Rect",
            NodeKind::Path => "Path",
            NodeKind::Polygon => "Polygon",
            NodeKind::Circle => "Circle",
            NodeKind::WirePath => "WirePath",
            NodeKind::Placement => "Placement",
            NodeKind::Component => "Component",
            NodeKind::Place => "Place",
            NodeKind::Library => "Library",
            NodeKind::Image => "Image",
            NodeKind::Pin => "Pin",
            NodeKind::Rotate => "Rotate",
            NodeKind::Padstack => "Padstack",
            NodeKind::Attach => "Attach",
            NodeKind::Network => "Network",
            NodeKind::Net => "Net",
            NodeKind::Pins => "Pins",
            NodeKind::Class => "Class",
            NodeKind::Wiring => "Wiring",
            NodeKind::Wire => "Wire",
            NodeKind::RoutedVia => "RoutedVia",
            NodeKind::SpectraSes => "SpectraSes",
            NodeKind::BaseDesign => "BaseDesign",
            NodeKind::WasIs => "WasIs",
            NodeKind::Routes => "Routes",
            NodeKind::LibraryOut => "LibraryOut",
            NodeKind::NetworkOut => "NetworkOut",
            NodeKind::RoutedNet => "RoutedNet",
            NodeKind::RoutedWire => "RoutedWire",
            NodeKind::Opaque => "Opaque",
            NodeKind::Custom(name) => name,
        }
    }

    /// Canonical head symbol for nodes of this kind.
    ///
    /// `None` for kinds whose head varies per node: settings are keyed by their
    /// head, and opaque lists keep whatever head they were read with.
    pub fn head(self) -> Option<&'static str> {
        let head = match self {
            NodeKind::SpectraDsn => "pcb",
            NodeKind::Parser => "parser",
            NodeKind::Resolution => "resolution",
            NodeKind::Unit => "unit",
            NodeKind::HostCad => "host_cad",
            NodeKind::HostVersion => "host_version",
            NodeKind::Structure => "structure",
            NodeKind::Boundary => "boundary",
            NodeKind::Outline => "outline",
            NodeKind::Keepout => "keepout",
            NodeKind::Shape => "shape",
            NodeKind::Layer => "layer",
            NodeKind::LayerProperty => "property",
            NodeKind::Type => "type",
            NodeKind::Index => "index",
            NodeKind::Rule => "rule",
            NodeKind::Width => "width",
            NodeKind::Clearance => "clearance",
            NodeKind::Grid => "grid",
            NodeKind::Control => "control",
            NodeKind::PlaceControl => "place_control",
            NodeKind::Circuit => "circuit",
            NodeKind::Plane => "plane",
            NodeKind::Via | NodeKind::RoutedVia => "via",
            NodeKind::Rect => "rect",
            NodeKind::Path | NodeKind::WirePath => "path",
            NodeKind::Polygon => "polygon",
            NodeKind::Circle => "circle",
            NodeKind::Placement => "placement",
            NodeKind::Component => "component",
            NodeKind::Place => "place",
            NodeKind::Library => "library",
            NodeKind::Image => "image",
            NodeKind::Pin => "pin",
            NodeKind::Rotate => "rotate",
            NodeKind::Padstack => "padstack",
            NodeKind::Attach => "attach",
            NodeKind::Network => "network",
            NodeKind::Net | NodeKind::RoutedNet => "net",
            NodeKind::Pins => "pins",
            NodeKind::Class => "class",
            NodeKind::Wiring => "wiring",
            NodeKind::Wire | NodeKind::RoutedWire => "wire",
            NodeKind::SpectraSes => "session",
            NodeKind::BaseDesign => "base_design",
            NodeKind::WasIs => "was_is",
            NodeKind::Routes => "routes",
            NodeKind::LibraryOut => "library_out",
            NodeKind::NetworkOut => "network_out",
            NodeKind::Custom(name) => name,
            NodeKind::Setting | NodeKind::Opaque => return None,
        };
        Some(head)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
