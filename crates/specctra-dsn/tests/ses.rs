use specctra_dsn::{
    Circle, Error, LibraryOut, Net, Node, NetworkOut, Padstack, ParserSection, Pins, Resolution,
    RoutedNet, RoutedVia, RoutedWire, Routes, ShapeGroup, SpectraSes, WasIs, WirePath,
    parse_spectra_dsn, parse_spectra_ses,
};

const SESSION: &str = r#"
(session "board1.ses"
  (base_design "board1.dsn")
  (placement
    (resolution mil 10)
    (component "Resistor_SMD:R_0603"
      (place R1 100 200 front 90)
    )
  )
  (was_is
    (pins U1-1 U1-2)
  )
  (routes
    (resolution mil 10)
    (parser
      (host_cad "KiCad's Pcbnew")
      (host_version "8.0.4")
    )
    (library_out
      (padstack "Via[0-1]_600:300_um"
        (shape (circle F.Cu 600))
        (attach off)
      )
    )
    (network_out
      (net GND
        (wire (path F.Cu 250 0 0 100 0))
        (wire (path 2 250 100 0 100 100) (type protect))
        (via "Via[0-1]_600:300_um" 100 0)
      )
    )
  )
)
"#;

#[test]
fn reads_session_sections() {
    let _ = env_logger::builder().is_test(true).try_init();
    let ses = parse_spectra_ses(SESSION).unwrap();

    assert_eq!(ses.name.as_deref(), Some("board1.ses"));
    assert_eq!(ses.base_design(), Some("board1.dsn"));

    let placement = ses.placement().unwrap();
    assert_eq!(placement.resolution().unwrap().value, Some(10.0));
    assert_eq!(placement.find_place("R1").unwrap().rotation, Some(90.0));

    let swaps: Vec<_> = ses.was_is().unwrap().swaps().collect();
    assert_eq!(swaps.len(), 1);
    assert_eq!(swaps[0].refs, ["U1-1", "U1-2"]);

    let routes = ses.routes().unwrap();
    assert_eq!(routes.resolution().unwrap().unit.as_deref(), Some("mil"));
    assert_eq!(routes.parser().unwrap().host_version(), Some("8.0.4"));

    let padstack = routes.library_out().unwrap().padstacks().next().unwrap();
    assert_eq!(padstack.name.as_deref(), Some("Via[0-1]_600:300_um"));
    assert_eq!(padstack.attach(), Some(false));
}

#[test]
fn reads_routed_nets() {
    let ses = parse_spectra_ses(SESSION).unwrap();
    let network_out = ses.routes().and_then(|routes| routes.network_out()).unwrap();

    let net = network_out.nets().next().unwrap();
    assert_eq!(net.name.as_deref(), Some("GND"));

    let wires: Vec<_> = net.wires().collect();
    assert_eq!(wires.len(), 2);
    assert_eq!(wires[0].wire_type(), None);
    assert_eq!(wires[1].wire_type(), Some("protect"));

    // Routers may name layers by number.
    let path = wires[1].paths().next().unwrap();
    assert_eq!(path.layer.as_deref(), Some("2"));
    assert_eq!(path.width, Some(250.0));
    assert_eq!(path.points().count(), 2);

    let via = net.vias().next().unwrap();
    assert_eq!((via.x, via.y), (Some(100.0), Some(0.0)));
}

#[test]
fn session_reads_back_after_rendering() {
    let ses = parse_spectra_ses(SESSION).unwrap();
    let text = ses.render();
    assert!(text.starts_with("(session board1.ses\n  (base_design board1.dsn)\n"));

    let again = parse_spectra_ses(&text).unwrap();
    assert_eq!(again, ses);
}

#[test]
fn built_network_out() {
    let mut net = RoutedNet::new("GND");
    net.push_wire(RoutedWire::new(WirePath::new(
        "F.Cu",
        250.0,
        vec![0.0, 0.0, 10.0, 0.0],
    )));
    net.push_via(RoutedVia::new("via0", 10.0, 0.0));
    let mut network_out = NetworkOut::new();
    network_out.push_net(net);

    insta::assert_snapshot!(Node::from(network_out).render(), @r"
    (network_out
      (net GND
        (wire
          (path F.Cu 250 0 0 10 0)
        )
        (via via0 10 0)
      )
    )
    ");
}

#[test]
fn built_session_reads_back_to_the_same_tree() {
    let mut was_is = WasIs::new();
    was_is.push_swap(Pins::new(vec!["U1-1".to_string(), "U1-2".to_string()]));

    let mut shape = ShapeGroup::new();
    shape.push_circle(Circle::new("F.Cu", 600.0));
    let mut padstack = Padstack::new("Via[0-1]_600:300_um");
    padstack.push_shape(shape);
    padstack.set_attach(Some(false));
    let mut library_out = LibraryOut::new();
    library_out.push_padstack(padstack);

    let mut parser = ParserSection::new();
    parser.set_host_cad(Some("KiCad's Pcbnew"));

    let mut wire = RoutedWire::new(WirePath::new("2", 250.0, vec![0.0, 0.0, 0.0, 100.0]));
    wire.set_wire_type(Some("protect"));
    let mut via = RoutedVia::new("Via[0-1]_600:300_um", 0.0, 100.0);
    via.set_via_type(Some("protect"));
    let mut net = RoutedNet::new("GND");
    net.push_wire(wire);
    net.push_via(via);
    let mut network_out = NetworkOut::new();
    network_out.push_net(net);

    let mut routes = Routes::new();
    routes.set_resolution(Some(Resolution::new(Some("mil".to_string()), Some(10.0))));
    routes.set_parser(Some(parser));
    routes.set_library_out(Some(library_out));
    routes.set_network_out(Some(network_out));

    let mut ses = SpectraSes::new(Some("board1.ses".to_string()));
    ses.set_base_design(Some("board 1.dsn"));
    ses.set_was_is(Some(was_is));
    ses.set_routes(Some(routes));

    let text = ses.render();
    insta::assert_snapshot!(text, @r#"
    (session board1.ses
      (base_design "board 1.dsn")
      (was_is
        (pins U1-1 U1-2)
      )
      (routes
        (resolution mil 10)
        (parser
          (host_cad "KiCad's Pcbnew")
        )
        (library_out
          (padstack "Via[0-1]_600:300_um"
            (shape
              (circle F.Cu 600)
            )
            (attach off)
          )
        )
        (network_out
          (net GND
            (wire
              (path 2 250 0 0 0 100)
              (type protect)
            )
            (via "Via[0-1]_600:300_um" 0 100
              (type protect)
            )
          )
        )
      )
    )
    "#);

    let again = parse_spectra_ses(&text).unwrap();
    assert_eq!(again, ses);
    assert_eq!(again.base_design(), Some("board 1.dsn"));
    let swaps: Vec<_> = again.was_is().unwrap().swaps().collect();
    assert_eq!(swaps[0].refs, ["U1-1", "U1-2"]);
    let padstack = again
        .routes()
        .and_then(Routes::library_out)
        .and_then(|library_out| library_out.padstacks().next())
        .unwrap();
    assert_eq!(padstack.attach(), Some(false));
}

#[test]
fn routed_via_net_is_settable() {
    let mut via = RoutedVia::new("via0", 1.0, 2.0);
    via.set_net(Some(Net::new("GND")));
    assert_eq!(Node::from(via).render(), "(via via0 1 2\n  (net GND)\n)");
}

#[test]
fn wrong_root_is_rejected() {
    let err = parse_spectra_ses(r#"(pcb "test")"#).unwrap_err();
    assert!(matches!(err, Error::RootKindMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "expected SpectraSes root with token \"session\", got SpectraDsn with token \"pcb\""
    );

    let err = parse_spectra_dsn(SESSION).unwrap_err();
    assert!(err.to_string().contains("got SpectraSes with token \"session\""));
}
