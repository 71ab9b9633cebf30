//! The DSN and SES record catalog.
//!
//! Every struct here keeps its nested nodes in a [`Children`] built from a
//! static layout, so anything a record does not model is carried along in its
//! overflow and written back after the typed slots.

pub mod geometry;
pub mod library;
pub mod network;
pub mod pcb;
pub mod placement;
pub mod session;
pub mod structure;
pub mod wiring;

use crate::render::Atom;
use crate::Registry;

pub(crate) fn register_all(registry: &mut Registry) {
    pcb::register(registry);
    structure::register(registry);
    geometry::register(registry);
    library::register(registry);
    network::register(registry);
    placement::register(registry);
    wiring::register(registry);
    session::register(registry);
}

/// Implement [`crate::Composite`] for structs holding a `children` field.
macro_rules! impl_composite {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Composite for $ty {
                fn children(&self) -> &$crate::Children {
                    &self.children
                }

                fn children_mut(&mut self) -> &mut $crate::Children {
                    &mut self.children
                }
            }
        )*
    };
}
pub(crate) use impl_composite;

/// Leading text atom, skipped when absent.
fn push_text<'a>(atoms: &mut Vec<Atom<'a>>, text: &'a Option<String>) {
    if let Some(text) = text {
        atoms.push(Atom::Text(text));
    }
}

fn push_number(atoms: &mut Vec<Atom<'_>>, number: Option<f64>) {
    if let Some(number) = number {
        atoms.push(Atom::Number(number));
    }
}
