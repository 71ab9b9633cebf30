//! Typed document model for Specctra DSN design files and SES session files.
//!
//! Text is read into [`specctra_sexpr::Sexpr`] primitives, then every list is
//! handed to the [`Registry`], which picks a constructor by the list's head
//! symbol and the head of the list that encloses it. Constructors fill typed
//! fields and route nested nodes into typed [`Children`] slots; lists nobody
//! registered are kept as [`Opaque`] overflow so a document can always be
//! written back out.
//!
//! ```
//! let dsn = specctra_dsn::parse_spectra_dsn(
//!     r#"(pcb demo (resolution mil 10) (network (net GND U1-1 C1-2)))"#,
//! )?;
//! assert_eq!(dsn.design(), Some("demo"));
//! let net = dsn.network().and_then(|n| n.nets().next()).unwrap();
//! assert_eq!(net.pins(), ["U1-1", "C1-2"]);
//! # Ok::<(), specctra_dsn::Error>(())
//! ```

mod construct;
mod container;
mod document;
mod error;
mod kind;
mod kinds;
mod node;
mod registry;
mod render;

pub use construct::{
    Construction, PropertyMap, Scalars, record, value_number, value_switch, value_text,
};
pub use container::{Arity, Children, Composite, SlotDecl};
pub use document::{RootNode, parse, parse_root, parse_spectra_dsn, parse_spectra_ses, parse_with};
pub use error::{Error, Result};
pub use kind::NodeKind;
pub use kinds::geometry::{Circle, Polyline, Rect, ShapeGroup, WirePath};
pub use kinds::library::{Image, Library, Padstack, Pin};
pub use kinds::network::{Class, Net, Network, Pins};
pub use kinds::pcb::{ParserSection, Resolution, SpectraDsn};
pub use kinds::placement::{Component, Place, Placement};
pub use kinds::session::{
    LibraryOut, NetworkOut, RoutedNet, RoutedWire, Routes, SpectraSes, WasIs,
};
pub use kinds::structure::{
    Clearance, Grid, Layer, LayerProperty, Plane, Rule, SettingsBlock, Structure, Via,
};
pub use kinds::wiring::{RoutedVia, Wire, Wiring};
pub use node::{Node, Opaque, Record, Scalar, ValueNode};
pub use registry::{ConstructFn, Descriptor, Registry, default_registry};
pub use render::Atom;
