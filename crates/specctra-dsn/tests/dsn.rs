use specctra_dsn::{
    Circle, Class, Component, Composite, Grid, Image, Layer, LayerProperty, Library, Net, Network,
    Node, NodeKind, Pin, Pins, Place, Placement, Plane, Polyline, Rect, Resolution, RoutedVia,
    Rule, Scalar, SettingsBlock, ShapeGroup, SpectraDsn, Structure, Via, Wiring, parse,
    parse_spectra_dsn,
};

const BOARD: &str = r#"
(pcb "board1"
  (parser
    (string_quote ")
    (space_in_quoted_tokens on)
    (host_cad "KiCad's Pcbnew")
    (host_version "8.0.4")
  )
  (resolution mil 10)
  (unit mil)
  (structure
    (layer F.Cu (type signal) (property (index 0)))
    (layer B.Cu (type signal) (property (index 1)))
    (boundary (rect pcb 0 0 1000 800))
    (via "Via[0-1]_600:300_um")
    (rule (width 250) (clearance 200) (clearance 50 (type smd_smd)))
    (control (via_at_smd off) (off_grid on))
  )
  (placement
    (component "Resistor_SMD:R_0603"
      (place R1 100 200 front 90)
      (place R2 300 200 back 0)
    )
  )
  (library
    (image "Resistor_SMD:R_0603"
      (outline (path signal 5 -10 -10 10 10))
      (pin Round[A]Pad_800_um 1 -30 0)
      (pin Round[A]Pad_800_um (rotate 90) 2 30 0)
    )
    (padstack Round[A]Pad_800_um
      (shape (circle F.Cu 800))
      (attach off)
    )
  )
  (network
    (net "GND" (pins "U1-1" "C1-2"))
    (net VCC U1-8 C1-1)
    (class kicad_default GND VCC (circuit (use_via Via)) (rule (width 250)))
  )
  (wiring
    (wire (path F.Cu 250 0 0 100 0) (net GND) (type route))
    (via "Via[0-1]_600:300_um" 100 0 (net GND))
  )
)
"#;

fn board() -> SpectraDsn {
    let _ = env_logger::builder().is_test(true).try_init();
    parse_spectra_dsn(BOARD).unwrap()
}

#[test]
fn header_records() {
    let dsn = board();
    assert_eq!(dsn.design(), Some("board1"));
    assert_eq!(dsn.unit(), Some("mil"));

    let resolution = dsn.resolution().unwrap();
    assert_eq!(resolution.unit.as_deref(), Some("mil"));
    assert_eq!(resolution.value, Some(10.0));
    assert_eq!(Node::from(resolution.clone()).render(), "(resolution mil 10)");

    let parser = dsn.parser().unwrap();
    assert_eq!(parser.host_cad(), Some("KiCad's Pcbnew"));
    assert_eq!(parser.host_version(), Some("8.0.4"));

    // Quoting directives are kept but not modelled.
    let heads: Vec<&str> = parser.children().other().iter().map(Node::head).collect();
    assert_eq!(heads, ["string_quote", "space_in_quoted_tokens"]);
}

#[test]
fn structure_layers_and_rules() {
    let dsn = board();
    let structure = dsn.structure().unwrap();

    let layers: Vec<_> = structure.layers().collect();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].name.as_deref(), Some("F.Cu"));
    assert_eq!(layers[0].layer_type(), Some("signal"));
    assert_eq!(layers[1].index(), Some(1));

    insta::assert_snapshot!(Node::from(layers[0].clone()).render(), @r"
    (layer F.Cu
      (type signal)
      (property
        (index 0)
      )
    )
    ");

    let boundary = structure.boundary().unwrap();
    let rect = boundary.rects().next().unwrap();
    assert_eq!(rect.layer.as_deref(), Some("pcb"));
    assert_eq!((rect.x2, rect.y2), (Some(1000.0), Some(800.0)));

    let via = structure.via().unwrap();
    assert_eq!(via.padstacks, ["Via[0-1]_600:300_um"]);

    let rule = structure.rule().unwrap();
    assert_eq!(rule.width(), Some(250.0));
    let clearances: Vec<_> = rule.clearances().collect();
    assert_eq!(clearances.len(), 2);
    assert_eq!(clearances[0].clearance_type, None);
    assert_eq!(clearances[1].value, Some(50.0));
    assert_eq!(clearances[1].clearance_type.as_deref(), Some("smd_smd"));

    let control = structure.control().unwrap();
    assert_eq!(control.setting("via_at_smd"), Some(&Scalar::Switch(false)));
    assert_eq!(control.setting("off_grid"), Some(&Scalar::Switch(true)));
}

#[test]
fn placement_and_library() {
    let dsn = board();

    let placement = dsn.placement().unwrap();
    let component = placement.components().next().unwrap();
    assert_eq!(component.image.as_deref(), Some("Resistor_SMD:R_0603"));

    let r1 = placement.find_place("R1").unwrap();
    assert_eq!((r1.x, r1.y), (Some(100.0), Some(200.0)));
    assert_eq!(r1.side.as_deref(), Some("front"));
    assert_eq!(r1.rotation, Some(90.0));
    assert_eq!(
        placement.find_place("R2").unwrap().side.as_deref(),
        Some("back")
    );
    assert!(placement.find_place("R3").is_none());

    let library = dsn.library().unwrap();
    let image = library.image("Resistor_SMD:R_0603").unwrap();
    assert_eq!(image.outlines().count(), 1);

    let pins: Vec<_> = image.pins().collect();
    assert_eq!(pins[0].padstack.as_deref(), Some("Round[A]Pad_800_um"));
    assert_eq!(pins[0].id.as_deref(), Some("1"));
    assert_eq!((pins[0].x, pins[0].y), (Some(-30.0), Some(0.0)));
    assert_eq!(pins[0].rotation, None);
    assert_eq!(pins[1].id.as_deref(), Some("2"));
    assert_eq!(pins[1].rotation, Some(90.0));

    let padstack = library.padstack("Round[A]Pad_800_um").unwrap();
    assert_eq!(padstack.attach(), Some(false));
    let circle = padstack.shapes().next().unwrap().circles().next().unwrap();
    assert_eq!(circle.diameter, Some(800.0));
}

#[test]
fn nets_and_classes() {
    let dsn = board();
    let network = dsn.network().unwrap();

    assert_eq!(network.net("GND").unwrap().pins(), ["U1-1", "C1-2"]);
    assert_eq!(network.net("VCC").unwrap().pins(), ["U1-8", "C1-1"]);

    let class = network.classes().next().unwrap();
    assert_eq!(class.name.as_deref(), Some("kicad_default"));
    assert_eq!(class.net_names, ["GND", "VCC"]);
    assert_eq!(
        class.circuit().unwrap().setting("use_via"),
        Some(&Scalar::Text("Via".to_string()))
    );
    assert_eq!(class.rule().unwrap().width(), Some(250.0));
}

#[test]
fn same_head_resolves_by_context() {
    let dsn = board();

    let structure_via = dsn.structure().unwrap().via().unwrap();
    assert_eq!(Node::from(structure_via.clone()).kind(), NodeKind::Via);

    let wiring = dsn.wiring().unwrap();
    let routed = wiring.vias().next().unwrap();
    assert_eq!(routed.padstack.as_deref(), Some("Via[0-1]_600:300_um"));
    assert_eq!((routed.x, routed.y), (Some(100.0), Some(0.0)));
    assert_eq!(routed.net().unwrap().name.as_deref(), Some("GND"));

    let wire = wiring.wires().next().unwrap();
    assert_eq!(wire.wire_type(), Some("route"));
    assert_eq!(wire.net().unwrap().name.as_deref(), Some("GND"));
    let path = wire.paths().next().unwrap();
    assert_eq!(path.layer.as_deref(), Some("F.Cu"));
    assert_eq!(path.width, Some(250.0));
    assert_eq!(path.points().collect::<Vec<_>>(), [(0.0, 0.0), (100.0, 0.0)]);

    // `path` outside a wire is a plain polyline.
    let outline = dsn
        .library()
        .and_then(|library| library.images().next())
        .and_then(|image| image.outlines().next())
        .unwrap();
    let line = outline.paths().next().unwrap();
    assert_eq!(line.width, Some(5.0));
    assert_eq!(line.coords, [-10.0, -10.0, 10.0, 10.0]);
}

#[test]
fn rendered_board_reads_back_to_the_same_tree() {
    let dsn = board();
    let text = dsn.render();
    assert!(text.starts_with("(pcb board1\n  (parser\n    (host_cad \"KiCad's Pcbnew\")"));

    let again = parse_spectra_dsn(&text).unwrap();
    assert_eq!(again, dsn);
    assert_eq!(again.render(), text);
}

#[test]
fn unknown_content_survives_in_overflow() {
    let dsn = parse_spectra_dsn(
        "(pcb x (structure (layer In1.Cu (type power) (fancy_new 1 2)) (future_thing (y 3))))",
    )
    .unwrap();
    let structure = dsn.structure().unwrap();

    let layer = structure.layers().next().unwrap();
    assert_eq!(layer.layer_type(), Some("power"));
    let extra = &layer.children().other()[0];
    assert_eq!(extra.kind(), NodeKind::Opaque);
    assert_eq!(extra.render(), "(fancy_new 1 2)");

    let future = &structure.children().other()[0];
    assert_eq!(future.head(), "future_thing");

    let text = dsn.render();
    assert!(text.contains("(fancy_new 1 2)"));
    assert!(text.contains("    (future_thing\n      (y 3)\n    )"));
}

#[test]
fn short_records_degrade_to_missing_fields() {
    let dsn = parse_spectra_dsn("(pcb x (structure (boundary (rect pcb 0 0))))").unwrap();
    let rect: &Rect = dsn
        .structure()
        .and_then(|s| s.boundary())
        .and_then(|b| b.rects().next())
        .unwrap();
    assert_eq!((rect.x1, rect.y1), (Some(0.0), Some(0.0)));
    assert_eq!((rect.x2, rect.y2), (None, None));
    assert_eq!(Node::from(rect.clone()).render(), "(rect pcb 0 0)");
}

#[test]
fn built_trees_render_like_parsed_ones() {
    let mut dsn = SpectraDsn::new(Some("built".to_string()));
    dsn.set_unit(Some("um"));

    let mut boundary = ShapeGroup::new();
    boundary.push_rect(Rect::new("pcb", 0.0, 0.0, 10.5, 20.0));
    let mut structure = specctra_dsn::Structure::new();
    structure.set_boundary(Some(boundary));
    dsn.set_structure(Some(structure));

    insta::assert_snapshot!(dsn.render(), @r"
    (pcb built
      (unit um)
      (structure
        (boundary
          (rect pcb 0 0 10.5 20)
        )
      )
    )
    ");

    let roots = parse(&dsn.render()).unwrap();
    assert_eq!(roots, [Node::SpectraDsn(dsn)]);
}

#[test]
fn settings_read_back_as_settings() {
    let mut control = SettingsBlock::new();
    control.set("width", 5.0);
    control.set("via_at_smd", false);

    let text = Node::Control(control.clone()).render();
    assert_eq!(text, "(control\n  (width 5)\n  (via_at_smd off)\n)");

    let roots = parse(&text).unwrap();
    let again = roots[0].as_control().unwrap();
    assert_eq!(again.setting("width"), Some(&Scalar::Number(5.0)));
    assert_eq!(again.setting("via_at_smd"), Some(&Scalar::Switch(false)));
    assert!(again.other_children().is_empty());
    assert_eq!(again, &control);

    // Still the rule width outside a settings block.
    let rule = parse("(rule (width 5))").unwrap();
    assert_eq!(rule[0].as_rule().unwrap().width(), Some(5.0));
}

#[test]
fn unusable_properties_stay_in_overflow() {
    let dsn = parse_spectra_dsn(
        "(pcb x (structure (layer F.Cu (property (index abc))) (rule (clearance 1 (type)))))",
    )
    .unwrap();
    let structure = dsn.structure().unwrap();

    let property = structure.layers().next().unwrap().property().unwrap();
    assert_eq!(property.index, None);
    assert_eq!(Node::from(property.clone()).render(), "(property\n  (index abc)\n)");

    let clearance = structure.rule().unwrap().clearances().next().unwrap();
    assert_eq!(clearance.clearance_type, None);
    assert_eq!(Node::from(clearance.clone()).render(), "(clearance 1\n  (type)\n)");

    let again = parse_spectra_dsn(&dsn.render()).unwrap();
    assert_eq!(again, dsn);
}

#[test]
fn text_outside_the_bare_set_is_quoted() {
    let name = r#"a b(c)"d\e"#;
    let mut network = Network::new();
    network.push_net(Net::new(name));
    network.push_net(Net::new("GND"));

    let text = Node::from(network.clone()).render();
    insta::assert_snapshot!(text, @r#"
    (network
      (net "a b(c)\"d\\e")
      (net GND)
    )
    "#);

    let roots = parse(&text).unwrap();
    let again = roots[0].as_network().unwrap();
    assert_eq!(again.net(name).and_then(|net| net.name.as_deref()), Some(name));
    assert_eq!(again, &network);
}

fn built_board() -> SpectraDsn {
    let mut structure = Structure::new();

    let mut layer = Layer::new("F.Cu");
    layer.set_layer_type(Some("signal"));
    layer.set_property(Some(LayerProperty::new(Some(0))));
    structure.push_layer(layer);

    let mut plane = Plane::new("GND");
    plane.set_polygon(Some(Polyline::new(
        "F.Cu",
        0.0,
        vec![0.0, 0.0, 100.0, 0.0, 100.0, 50.0],
    )));
    structure.push_plane(plane);

    structure.set_via(Some(Via::new(vec!["Via[0-1]_600:300_um".to_string()])));

    let mut rule = Rule::new();
    rule.set_width(Some(250.0));
    structure.set_rule(Some(rule.clone()));
    structure.push_grid(Grid::new(Some("via".to_string()), Some(0.1)));

    let mut control = SettingsBlock::new();
    control.set("via_at_smd", false);
    structure.set_control(Some(control));

    let mut keepout = ShapeGroup::new();
    keepout.name = Some(String::new());
    keepout.push_circle(Circle::new("signal", 100.0).at(5.0, 5.0));
    structure.push_keepout(keepout);

    let mut network = Network::new();
    let mut net = Net::new("GND");
    net.set_pins_list(Some(Pins::new(vec!["U1-1".to_string(), "C1-2".to_string()])));
    network.push_net(net);
    let mut class = Class::new("kicad_default", vec!["GND".to_string()]);
    let mut circuit = SettingsBlock::new();
    circuit.set("use_via", "Via[0-1]_600:300_um");
    class.set_circuit(Some(circuit));
    class.set_rule(Some(rule));
    network.push_class(class);

    let mut place = Place::new("R1", 100.0, 200.0);
    place.side = Some("front".to_string());
    place.rotation = Some(90.0);
    let mut component = Component::new("Resistor_SMD:R_0603");
    component.push_place(place);
    let mut placement = Placement::new();
    placement.push_component(component);

    let mut dsn = SpectraDsn::new(Some("built".to_string()));
    dsn.set_structure(Some(structure));
    dsn.set_placement(Some(placement));
    dsn.set_network(Some(network));
    dsn
}

#[test]
fn built_board_reads_back_to_the_same_tree() {
    let dsn = built_board();
    let text = dsn.render();
    insta::assert_snapshot!(text, @r#"
    (pcb built
      (structure
        (layer F.Cu
          (type signal)
          (property
            (index 0)
          )
        )
        (plane GND
          (polygon F.Cu 0 0 0 100 0 100 50)
        )
        (via "Via[0-1]_600:300_um")
        (rule
          (width 250)
        )
        (grid via 0.1)
        (control
          (via_at_smd off)
        )
        (keepout ""
          (circle signal 100 5 5)
        )
      )
      (placement
        (component "Resistor_SMD:R_0603"
          (place R1 100 200 front 90)
        )
      )
      (network
        (net GND
          (pins U1-1 C1-2)
        )
        (class kicad_default GND
          (circuit
            (use_via "Via[0-1]_600:300_um")
          )
          (rule
            (width 250)
          )
        )
      )
    )
    "#);

    let again = parse_spectra_dsn(&text).unwrap();
    assert_eq!(again, dsn);
    assert_eq!(again.render(), text);

    let keepout = again.structure().unwrap().keepouts().next().unwrap();
    assert_eq!(keepout.name.as_deref(), Some(""));
    let circle = keepout.circles().next().unwrap();
    assert_eq!((circle.x, circle.y), (Some(5.0), Some(5.0)));
}

#[test]
fn circ_keeps_its_head() {
    let dsn =
        parse_spectra_dsn("(pcb x (library (padstack p (shape (circ F.Cu 800)))))").unwrap();
    let padstack = dsn.library().unwrap().padstack("p").unwrap();
    let circle = padstack.shapes().next().unwrap().circles().next().unwrap();
    assert_eq!(circle.head(), "circ");
    assert_eq!(circle.diameter, Some(800.0));

    let text = dsn.render();
    assert!(text.contains("(circ F.Cu 800)"));
    assert_eq!(parse_spectra_dsn(&text).unwrap(), dsn);
}

#[test]
fn built_library_and_wiring_read_back() {
    let mut outline = ShapeGroup::new();
    outline.push_path(Polyline::new("signal", 5.0, vec![-10.0, -10.0, 10.0, 10.0]));
    let mut keepout = ShapeGroup::new();
    keepout.push_rect(Rect::new("signal", 0.0, 0.0, 1.0, 1.0));
    let mut image = Image::new("R_0603");
    image.push_outline(outline);
    image.push_pin(Pin::new("Round[A]Pad_800_um", "1", -30.0, 0.0));
    image.push_keepout(keepout);
    let mut library = Library::new();
    library.push_image(image);

    let mut placement = Placement::new();
    placement.set_resolution(Some(Resolution::new(Some("um".to_string()), Some(1.0))));
    placement.set_unit(Some("um"));

    let mut wiring = Wiring::new();
    wiring.set_resolution(Some(Resolution::new(Some("mil".to_string()), Some(10.0))));
    wiring.set_unit(Some("mil"));
    wiring.push_via(RoutedVia::new("via0", 100.0, 0.0));
    wiring.push_plane(Plane::new("GND"));

    let mut dsn = SpectraDsn::new(Some("lib".to_string()));
    dsn.set_placement(Some(placement));
    dsn.set_library(Some(library));
    dsn.set_wiring(Some(wiring));

    let again = parse_spectra_dsn(&dsn.render()).unwrap();
    assert_eq!(again, dsn);

    let image = again.library().unwrap().image("R_0603").unwrap();
    assert_eq!(image.outlines().count(), 1);
    assert_eq!(image.keepouts().count(), 1);
    assert_eq!(image.pins().next().unwrap().id.as_deref(), Some("1"));

    assert_eq!(again.placement().unwrap().unit(), Some("um"));
    let wiring = again.wiring().unwrap();
    assert_eq!(wiring.unit(), Some("mil"));
    assert_eq!(wiring.resolution().unwrap().value, Some(10.0));
    assert_eq!(wiring.planes().next().unwrap().net.as_deref(), Some("GND"));
}
