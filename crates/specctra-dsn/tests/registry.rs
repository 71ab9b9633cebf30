use specctra_dsn::{
    Composite, Construction, Descriptor, Node, NodeKind, Registry, SlotDecl, parse_root,
    Scalar, parse_with, record, value_number, value_text,
};
use specctra_sexpr::Sexpr;

const ITEM: NodeKind = NodeKind::Custom("item");
const GROUP_LAYOUT: &[SlotDecl] = &[SlotDecl::many(ITEM)];

fn group(ctx: &Construction<'_>, tail: &[Sexpr]) -> Node {
    Node::Record(ctx.record(tail, GROUP_LAYOUT))
}

fn board_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(Descriptor::new("board", NodeKind::Custom("board"), record));
    registry.register(Descriptor::new("group", NodeKind::Custom("group"), group));
    registry.register(Descriptor::new("item", ITEM, value_text).within("group"));
    registry
}

#[test]
fn items_fill_the_group_slot_in_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = board_registry();
    let roots = parse_with(&registry, r#"(board "x" (group (item "a") (item "b")))"#).unwrap();
    assert_eq!(roots.len(), 1);

    let board = roots[0].as_record().unwrap();
    assert_eq!(board.kind, NodeKind::Custom("board"));
    assert_eq!(board.text(0), Some("x"));

    let group = board.children().other()[0].as_record().unwrap();
    let items: Vec<&str> = group
        .children()
        .many(ITEM)
        .iter()
        .filter_map(Node::as_value)
        .filter_map(|item| item.as_text())
        .collect();
    assert_eq!(items, ["a", "b"]);
    assert!(group.other_children().is_empty());

    insta::assert_snapshot!(roots[0].render(), @r"
    (board x
      (group
        (item a)
        (item b)
      )
    )
    ");
}

#[test]
fn item_outside_its_group_is_opaque() {
    let registry = board_registry();
    let roots = parse_with(&registry, "(board (item a))").unwrap();
    let board = roots[0].as_record().unwrap();
    assert_eq!(board.children().other()[0].kind(), NodeKind::Opaque);
}

#[test]
fn enclosing_head_selects_the_kind() {
    let mut registry = Registry::new();
    registry.register(Descriptor::new("outer", NodeKind::Custom("outer"), record));
    registry.register(Descriptor::new("other", NodeKind::Custom("other"), record));
    registry.register(Descriptor::new("x", NodeKind::Custom("x"), value_text));
    registry.register(
        Descriptor::new("x", NodeKind::Custom("outer-x"), value_number).within("outer"),
    );

    let roots = parse_with(&registry, "(outer (x 1)) (other (x 1))").unwrap();
    let inner: Vec<&Node> = roots
        .iter()
        .map(|root| &root.composite().unwrap().other_children()[0])
        .collect();

    assert_eq!(inner[0].kind(), NodeKind::Custom("outer-x"));
    assert_eq!(inner[0].as_value().and_then(|v| v.as_number()), Some(1.0));
    assert_eq!(inner[1].kind(), NodeKind::Custom("x"));
    assert_eq!(inner[1].as_value().and_then(|v| v.as_text()), Some("1"));
}

#[test]
fn catalog_can_be_extended() {
    let mut registry = Registry::spectra();
    let builtin = registry.len();
    registry.register(
        Descriptor::new("fancy_new", NodeKind::Custom("fancy_new"), record).within("layer"),
    );
    assert_eq!(registry.len(), builtin + 1);

    let dsn: specctra_dsn::SpectraDsn = parse_root(
        &registry,
        "(pcb x (structure (layer F.Cu (type signal) (fancy_new 1 two))))",
    )
    .unwrap();
    let layer = dsn.structure().unwrap().layers().next().unwrap();
    let extra = layer.other_children()[0].as_record().unwrap();
    assert_eq!(extra.number(0), Some(1.0));
    assert_eq!(extra.text(0), Some("two"));

    // The shared catalog is untouched.
    let plain = specctra_dsn::parse_spectra_dsn(
        "(pcb x (structure (layer F.Cu (fancy_new 1 two))))",
    )
    .unwrap();
    let layer = plain.structure().unwrap().layers().next().unwrap();
    assert_eq!(layer.other_children()[0].kind(), NodeKind::Opaque);
}

#[test]
fn later_registration_replaces_the_builtin() {
    let mut registry = Registry::spectra();
    registry.register(Descriptor::new("unit", NodeKind::Custom("unit"), record));

    let dsn: specctra_dsn::SpectraDsn = parse_root(&registry, "(pcb x (unit mm))").unwrap();
    // No longer a Unit value node, so it lands in overflow.
    assert_eq!(dsn.unit(), None);
    assert_eq!(dsn.other_children()[0].kind(), NodeKind::Custom("unit"));
    assert_eq!(dsn.render(), "(pcb x\n  (unit mm)\n)");
}

#[test]
fn large_integers_are_written_exactly() {
    let mut registry = Registry::new();
    registry.register(Descriptor::new("big", NodeKind::Custom("big"), record));

    let roots = parse_with(&registry, "(big 9007199254740993 -42 0.5)").unwrap();
    let big = roots[0].as_record().unwrap();
    assert_eq!(big.scalars[0], Scalar::Int(9_007_199_254_740_993));
    assert_eq!(big.scalars[0].as_int(), Some(9_007_199_254_740_993));
    assert_eq!(big.number(1), Some(-42.0));
    assert_eq!(roots[0].render(), "(big 9007199254740993 -42 0.5)");
}
