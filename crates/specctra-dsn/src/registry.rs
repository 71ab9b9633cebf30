//! Head-symbol dispatch.
//!
//! The same head means different things in different places: `via` directly
//! under `structure` lists the usable padstacks, while `via` under `wiring` or
//! a routed `net` is a placed via. Descriptors may therefore be registered for
//! a head within a specific enclosing head, with an unscoped registration as
//! the fallback.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use specctra_sexpr::Sexpr;

use crate::construct::Construction;
use crate::{Node, NodeKind, Opaque, kinds};

/// Builds a node from the tail of its list.
pub type ConstructFn = fn(&Construction<'_>, &[Sexpr]) -> Node;

#[derive(Debug, Clone)]
pub struct Descriptor {
    pub head: String,
    /// Head of the enclosing list this registration is limited to.
    pub parent: Option<String>,
    pub kind: NodeKind,
    pub construct: ConstructFn,
}

impl Descriptor {
    pub fn new(head: impl Into<String>, kind: NodeKind, construct: ConstructFn) -> Self {
        Self {
            head: head.into(),
            parent: None,
            kind,
            construct,
        }
    }

    /// Limit this registration to lists directly inside `(parent ...)`.
    pub fn within(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
struct Entry {
    fallback: Option<Descriptor>,
    scoped: HashMap<String, Descriptor>,
}

/// Maps (head, enclosing head) to the descriptor that builds it.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

static SPECTRA: Lazy<Registry> = Lazy::new(Registry::spectra);

/// The built-in DSN/SES catalog, built on first use.
pub fn default_registry() -> &'static Registry {
    &SPECTRA
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the DSN and SES catalog.
    pub fn spectra() -> Self {
        let mut registry = Self::new();
        kinds::register_all(&mut registry);
        log::debug!(
            "Built Specctra registry with {} descriptors",
            registry.len()
        );
        registry
    }

    /// Add a descriptor. A later registration for the same head and parent
    /// replaces the earlier one.
    pub fn register(&mut self, descriptor: Descriptor) {
        let head = descriptor.head.clone();
        let parent = descriptor.parent.clone();
        let kind = descriptor.kind;

        let entry = self.entries.entry(head.clone()).or_default();
        let previous = match parent.as_deref() {
            Some(parent) => entry.scoped.insert(parent.to_string(), descriptor),
            None => entry.fallback.replace(descriptor),
        };

        if let Some(previous) = previous {
            log::debug!(
                "Registration of `{head}` (within {}) as {kind} overrides {}",
                parent.as_deref().unwrap_or("any"),
                previous.kind
            );
        }
    }

    /// Find the descriptor for `head` inside `enclosing`, falling back to the
    /// unscoped registration.
    pub fn resolve(&self, head: &str, enclosing: Option<&str>) -> Option<&Descriptor> {
        let entry = self.entries.get(head)?;
        enclosing
            .and_then(|parent| entry.scoped.get(parent))
            .or(entry.fallback.as_ref())
    }

    /// The registration for `head` limited to `parent`, ignoring the fallback.
    pub fn resolve_within(&self, head: &str, parent: &str) -> Option<&Descriptor> {
        self.entries.get(head)?.scoped.get(parent)
    }

    /// Construct a node for `list` as a child of `enclosing`.
    ///
    /// Lists with no head symbol or no matching registration come back as
    /// [`Node::Opaque`] holding the list unchanged.
    pub fn construct(&self, list: &Sexpr, enclosing: Option<&str>) -> Node {
        let Some(items) = list.as_list() else {
            return Node::Opaque(Opaque::new(list.clone()));
        };
        let Some(head) = items.first().and_then(Sexpr::as_sym) else {
            log::trace!("List without a head symbol kept as opaque");
            return Node::Opaque(Opaque::new(list.clone()));
        };

        match self.resolve(head, enclosing) {
            Some(descriptor) => {
                let ctx = Construction {
                    registry: self,
                    head,
                    kind: descriptor.kind,
                };
                (descriptor.construct)(&ctx, &items[1..])
            }
            None => {
                log::trace!(
                    "No registration for `{head}` within {}, keeping it opaque",
                    enclosing.unwrap_or("document root")
                );
                Node::Opaque(Opaque::new(list.clone()))
            }
        }
    }

    /// Every registered descriptor, in no particular order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.entries
            .values()
            .flat_map(|entry| entry.fallback.iter().chain(entry.scoped.values()))
    }

    pub fn len(&self) -> usize {
        self.entries
            .values()
            .map(|entry| usize::from(entry.fallback.is_some()) + entry.scoped.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
