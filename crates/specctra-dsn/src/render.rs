//! Shared layout for rendering nodes back to text.

use specctra_sexpr::formatter::{format_atom, format_number, push_indent};

use crate::Node;

/// A leading scalar written on a node's head line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Atom<'a> {
    /// Text, quoted when it contains anything outside `[A-Za-z0-9._-]`.
    Text(&'a str),
    /// Written exactly, without going through `f64`.
    Int(i64),
    Number(f64),
    /// `on` / `off`.
    Switch(bool),
}

impl Atom<'_> {
    pub fn write(&self, out: &mut String) {
        match self {
            Atom::Text(text) => out.push_str(&format_atom(text)),
            Atom::Int(n) => out.push_str(&n.to_string()),
            Atom::Number(n) => out.push_str(&format_number(*n)),
            Atom::Switch(on) => out.push_str(if *on { "on" } else { "off" }),
        }
    }
}

/// Implemented by every node payload; `head` is the symbol the node is written with.
pub(crate) trait WriteForm {
    fn write_form(&self, head: &str, depth: usize, out: &mut String);
}

/// Write `(head atoms... children...)` with the cursor already at the node's indent.
///
/// Without children the form stays on one line. With children, each one gets
/// its own line one level deeper and the closing paren goes on a line of its own.
pub fn write_list<'n>(
    out: &mut String,
    depth: usize,
    head: &str,
    atoms: &[Atom<'_>],
    children: impl IntoIterator<Item = &'n Node>,
) {
    out.push('(');
    out.push_str(head);
    for atom in atoms {
        out.push(' ');
        atom.write(out);
    }

    let mut multiline = false;
    for child in children {
        multiline = true;
        out.push('\n');
        push_indent(out, depth + 1);
        child.write_to(out, depth + 1);
    }
    if multiline {
        out.push('\n');
        push_indent(out, depth);
    }
    out.push(')');
}
