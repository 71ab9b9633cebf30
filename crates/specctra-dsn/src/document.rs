//! Entry points that turn text into typed trees.

use crate::{Error, Node, NodeKind, Registry, Result, SpectraDsn, SpectraSes, default_registry};

/// A node kind that can be the root of a document.
pub trait RootNode: Sized {
    const KIND: NodeKind;

    fn from_node(node: Node) -> Option<Self>;
}

impl RootNode for SpectraDsn {
    const KIND: NodeKind = NodeKind::SpectraDsn;

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::SpectraDsn(dsn) => Some(dsn),
            _ => None,
        }
    }
}

impl RootNode for SpectraSes {
    const KIND: NodeKind = NodeKind::SpectraSes;

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::SpectraSes(ses) => Some(ses),
            _ => None,
        }
    }
}

/// Parse every top-level form of `text` with the built-in catalog.
pub fn parse(text: &str) -> Result<Vec<Node>> {
    parse_with(default_registry(), text)
}

/// Parse every top-level form of `text`, resolving heads with `registry`.
///
/// Top-level atoms carry no head and are skipped.
pub fn parse_with(registry: &Registry, text: &str) -> Result<Vec<Node>> {
    let forms = specctra_sexpr::read(text)?;
    let mut roots = Vec::with_capacity(forms.len());
    for form in &forms {
        if !form.is_list() {
            log::warn!("Skipping top-level atom at byte {}", form.span.start);
            continue;
        }
        roots.push(registry.construct(form, None));
    }
    log::debug!("Parsed {} root node(s)", roots.len());
    Ok(roots)
}

/// Parse a document that must hold exactly one root of kind `T`.
pub fn parse_root<T: RootNode>(registry: &Registry, text: &str) -> Result<T> {
    let mut roots = parse_with(registry, text)?;
    let root = match roots.len() {
        1 => roots.pop(),
        _ => None,
    };
    let Some(root) = root else {
        let actual = match roots.len() {
            0 => "no root node".to_string(),
            n => format!("{n} root nodes"),
        };
        return Err(Error::RootKindMismatch {
            expected: T::KIND,
            actual,
        });
    };

    let actual = format!("{} with token \"{}\"", root.kind(), root.head());
    T::from_node(root).ok_or(Error::RootKindMismatch {
        expected: T::KIND,
        actual,
    })
}

/// Parse a `(pcb ...)` design file.
pub fn parse_spectra_dsn(text: &str) -> Result<SpectraDsn> {
    parse_root(default_registry(), text)
}

/// Parse a `(session ...)` routing result.
pub fn parse_spectra_ses(text: &str) -> Result<SpectraSes> {
    parse_root(default_registry(), text)
}
