//! Text helpers for writing S-expressions back out.
//!
//! This module contains:
//! - The quoting rule for text atoms (`needs_quotes`, `format_atom`)
//! - Number formatting that drops redundant decimals (`format_number`)
//! - A two-space indenting tree writer (`write_indented`, `format_tree`)

use std::borrow::Cow;

use crate::{Sexpr, SexprKind};

/// One nesting level of indentation.
pub const INDENT: &str = "  ";

/// Append `depth` levels of indentation to `out`.
pub fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Whether a text value has to be written as a quoted string.
///
/// Anything outside `[A-Za-z0-9._-]`, as well as the empty string, is quoted.
pub fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
}

/// Write a text value bare when it is safe to do so, quoted otherwise.
pub fn format_atom(value: &str) -> Cow<'_, str> {
    if needs_quotes(value) {
        Cow::Owned(quote_string(value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Format a number with no trailing zeros and no decimal point for integral values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return (value as i64).to_string();
    }
    trim_float(value.to_string())
}

pub fn quote_string(value: &str) -> String {
    let escaped = escape_string(value);
    let mut quoted = String::with_capacity(escaped.len() + 2);
    quoted.push('"');
    quoted.push_str(&escaped);
    quoted.push('"');
    quoted
}

pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(ch),
        }
    }
    result
}

/// Format a tree with a trailing newline, the way it would be saved to disk.
pub fn format_tree(sexpr: &Sexpr) -> String {
    let mut out = String::new();
    write_indented(sexpr, 0, &mut out);
    out.push('\n');
    out
}

/// Write `sexpr` at the given nesting depth.
///
/// Atoms before the first nested list share the opening line; every item from the
/// first nested list on gets its own line, and the closing paren lines up with the
/// opening one. Symbols are written verbatim so unknown content survives as-is.
pub fn write_indented(sexpr: &Sexpr, depth: usize, out: &mut String) {
    push_indent(out, depth);
    write_nested(sexpr, depth, out);
}

/// Like [`write_indented`], for a caller that already positioned the cursor.
pub fn write_nested(sexpr: &Sexpr, depth: usize, out: &mut String) {
    let SexprKind::List(items) = &sexpr.kind else {
        write_atom(sexpr, out);
        return;
    };

    let split = items.iter().position(Sexpr::is_list).unwrap_or(items.len());
    out.push('(');
    for (idx, item) in items[..split].iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        write_atom(item, out);
    }

    if split == items.len() {
        out.push(')');
        return;
    }

    for item in &items[split..] {
        out.push('\n');
        push_indent(out, depth + 1);
        write_nested(item, depth + 1, out);
    }
    out.push('\n');
    push_indent(out, depth);
    out.push(')');
}

fn write_atom(sexpr: &Sexpr, out: &mut String) {
    match &sexpr.kind {
        SexprKind::Symbol(s) => out.push_str(s),
        SexprKind::String(s) => out.push_str(&quote_string(s)),
        SexprKind::Int(n) => out.push_str(&n.to_string()),
        SexprKind::F64(f) => out.push_str(&format_number(*f)),
        SexprKind::List(_) => write_nested(sexpr, 0, out),
    }
}

fn trim_float(mut s: String) -> String {
    if !s.contains('.') {
        return s;
    }

    while let Some(stripped) = s.strip_suffix('0') {
        s = stripped.to_string();
    }
    if let Some(stripped) = s.strip_suffix('.') {
        s = stripped.to_string();
    }

    if s.is_empty() { "0".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::{format_atom, format_number, format_tree, needs_quotes};
    use crate::{Sexpr, parse};

    #[test]
    fn quoting_rule() {
        for bare in ["F.Cu", "board_1", "U1-1", "0.25", "signal"] {
            assert!(!needs_quotes(bare), "{bare}");
        }
        for quoted in ["", "my board", "Net:1", "R[1]", "a(b)", "\"", "ü"] {
            assert!(needs_quotes(quoted), "{quoted:?}");
        }
        assert_eq!(format_atom("F.Cu"), "F.Cu");
        assert_eq!(format_atom("my board"), "\"my board\"");
        assert_eq!(format_atom(""), "\"\"");
        assert_eq!(format_atom("say \"hi\""), r#""say \"hi\"""#);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-2540.0), "-2540");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(1.5e-3), "0.0015");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn flat_list_stays_on_one_line() {
        let sexpr = Sexpr::list(vec![Sexpr::symbol("resolution"), "mil".into(), Sexpr::int(10)]);
        assert_eq!(format_tree(&sexpr), "(resolution mil 10)\n");
    }

    #[test]
    fn nested_lists_are_indented() {
        let sexpr = parse("(layer F.Cu (type signal) (property (index 0)))").unwrap();
        insta::assert_snapshot!(sexpr.to_string(), @r"
        (layer F.Cu
          (type signal)
          (property
            (index 0)
          )
        )
        ");
    }

    #[test]
    fn strings_and_floats_round_trip_through_text() {
        let sexpr = parse(r#"(wire (path F.Cu 0.2 1.50 -3) (net "N$1"))"#).unwrap();
        let text = format_tree(&sexpr);
        assert_eq!(parse(&text).unwrap(), sexpr);
        assert!(text.contains("(path F.Cu 0.2 1.5 -3)"));
        assert!(text.contains("(net \"N$1\")"));
    }

    #[test]
    fn built_atoms_match_parsed_ones() {
        let built = Sexpr::list(vec![
            Sexpr::symbol("host_cad"),
            Sexpr::string("KiCad's Pcbnew"),
            Sexpr::float(0.5),
        ]);
        let text = format_tree(&built);
        assert_eq!(text, "(host_cad \"KiCad's Pcbnew\" 0.5)\n");

        let parsed = parse(&text).unwrap();
        assert_eq!(parsed, built);
        assert_eq!(parsed.as_list().unwrap()[2].as_float(), Some(0.5));
    }

    #[test]
    fn empty_list() {
        assert_eq!(Sexpr::list(vec![]).to_string(), "()");
    }
}
