use approx::assert_relative_eq;
use arcstr::ArcStr;
use indexmap::IndexMap;
use test_log::test;

use crate::*;

const TEMPLATE: &str = r#"
name = "filter"

[[pins]]
name = "in"
direction = "input"

[[pins]]
name = "out"
direction = "output"

[[pins]]
name = "BULK"
direction = "inout"

[[instances]]
name = "XRES"
cell = "res_unit"
connections = { PLUS = "out", MINUS = "in", BULK = "BULK" }
params = { l = 2000, w = 400, intent = "standard" }

[[instances]]
name = "XCAP"
cell = "cap_ideal"
connections = { PLUS = "in", MINUS = "out" }
params = { c = 1e-12 }
"#;

fn module() -> Module {
    Module::from_template(TEMPLATE).unwrap()
}

fn unit_params() -> IndexMap<ArcStr, ParamValue> {
    IndexMap::from_iter([
        (ArcStr::from("l"), ParamValue::from(1000i64)),
        (ArcStr::from("w"), ParamValue::from(200i64)),
    ])
}

fn conns(module: &Module, inst: &str) -> Vec<(String, String)> {
    module
        .instance(inst)
        .unwrap()
        .connections()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn net(module: &Module, inst: &str, terminal: &str) -> String {
    module
        .instance(inst)
        .unwrap()
        .connection(terminal)
        .unwrap()
        .to_string()
}

#[test]
fn template_is_parsed_in_order() {
    let module = module();
    assert_eq!(module.name(), "filter");
    let pins: Vec<_> = module.pins().map(|p| (p.name.as_str(), p.direction)).collect();
    assert_eq!(
        pins,
        vec![
            ("in", PinDirection::Input),
            ("out", PinDirection::Output),
            ("BULK", PinDirection::InOut)
        ]
    );
    let xres = module.instance("XRES").unwrap();
    assert_eq!(xres.cell(), "res_unit");
    assert_eq!(xres.param("l"), Some(&ParamValue::Int(2000)));
    assert_eq!(xres.param("intent").and_then(|p| p.as_str()), Some("standard"));
    assert_relative_eq!(
        module.instance("XCAP").unwrap().param("c").unwrap().as_f64().unwrap(),
        1e-12
    );
}

#[test]
fn bad_template_is_rejected() {
    assert!(matches!(
        Module::from_template("name = 3"),
        Err(SchematicError::Template(_))
    ));
    let dup = r#"
name = "dup"
[[pins]]
name = "a"
direction = "input"
[[pins]]
name = "a"
direction = "output"
"#;
    assert!(matches!(
        Module::from_template(dup),
        Err(SchematicError::DuplicatePin { .. })
    ));
}

#[test]
fn rename_pin_renames_nets() {
    let mut module = module();
    module.rename_pin("BULK", "VSS").unwrap();
    assert!(module.pin("BULK").is_none());
    assert_eq!(module.pins().nth(2).unwrap().name, "VSS");
    assert_eq!(net(&module, "XRES", "BULK"), "VSS");

    // Renaming to the same name is a no-op.
    module.rename_pin("VSS", "VSS").unwrap();
    assert!(matches!(
        module.rename_pin("in", "out"),
        Err(SchematicError::DuplicatePin { .. })
    ));
    assert!(matches!(
        module.rename_pin("nope", "x"),
        Err(SchematicError::MissingPin { .. })
    ));
}

#[test]
fn remove_pin_and_instance() {
    let mut module = module();
    let pin = module.remove_pin("out").unwrap();
    assert_eq!(pin.direction, PinDirection::Output);
    assert_eq!(module.pins().count(), 2);
    // Connections are untouched.
    assert_eq!(net(&module, "XRES", "PLUS"), "out");

    module.remove_instance("XCAP").unwrap();
    assert!(matches!(
        module.instance("XCAP"),
        Err(SchematicError::MissingInstance { .. })
    ));
    assert!(module.remove_instance("XCAP").is_err());
}

#[test]
fn array_instance_replaces_in_place() {
    let mut module = module();
    module.array_instance("XRES", &["XR0", "XR1"]).unwrap();
    let names: Vec<_> = module.instances().map(|i| i.name().as_str()).collect();
    assert_eq!(names, vec!["XR0", "XR1", "XCAP"]);
    assert_eq!(conns(&module, "XR1"), conns(&module, "XR0"));

    assert!(matches!(
        module.array_instance("XR0", &["XCAP"]),
        Err(SchematicError::DuplicateInstance { .. })
    ));
    module.array_instance::<&str>("XCAP", &[]).unwrap();
    assert_eq!(module.instances().count(), 2);
}

#[test]
fn reconnect_requires_existing_terminals() {
    let mut module = module();
    module
        .reconnect_instance("XCAP", [("PLUS", "a"), ("MINUS", "b")])
        .unwrap();
    assert_eq!(
        conns(&module, "XCAP"),
        vec![
            ("PLUS".to_string(), "a".to_string()),
            ("MINUS".to_string(), "b".to_string())
        ]
    );
    module
        .reconnect_instance_terminal("XCAP", "MINUS", "c")
        .unwrap();
    assert_eq!(net(&module, "XCAP", "MINUS"), "c");
    assert!(matches!(
        module.reconnect_instance_terminal("XCAP", "BULK", "c"),
        Err(SchematicError::MissingTerminal { .. })
    ));
}

#[test]
fn single_unit_resistor_keeps_name() {
    let mut module = module();
    module
        .design_resistor("XRES", &unit_params(), 1, 1, "a", "b", "m", "VDD", false)
        .unwrap();
    let xres = module.instance("XRES").unwrap();
    assert_eq!(xres.param("l"), Some(&ParamValue::Int(1000)));
    assert_eq!(xres.param("intent").and_then(|p| p.as_str()), Some("standard"));
    assert_eq!(
        conns(&module, "XRES"),
        vec![
            ("PLUS".to_string(), "a".to_string()),
            ("MINUS".to_string(), "b".to_string()),
            ("BULK".to_string(), "VDD".to_string())
        ]
    );
}

#[test]
fn series_resistor_chain() {
    let mut module = module();
    module
        .design_resistor("XRES", &unit_params(), 3, 1, "out", "in", "out_x", "BULK", false)
        .unwrap();
    let names: Vec<_> = module.instances().map(|i| i.name().to_string()).collect();
    assert_eq!(names, vec!["XRES<0>", "XRES<1>", "XRES<2>", "XCAP"]);
    let chain: Vec<_> = (0..3)
        .map(|k| {
            let name = format!("XRES<{k}>");
            (net(&module, &name, "PLUS"), net(&module, &name, "MINUS"))
        })
        .collect();
    assert_eq!(
        chain,
        vec![
            ("out".to_string(), "out_x<0>".to_string()),
            ("out_x<0>".to_string(), "out_x<1>".to_string()),
            ("out_x<1>".to_string(), "in".to_string()),
        ]
    );
}

#[test]
fn parallel_branches_share_mid_nets_only_when_connected() {
    let mut module = module();
    module
        .design_resistor("XRES", &unit_params(), 2, 2, "a", "a", "d", "BULK", false)
        .unwrap();
    assert_eq!(net(&module, "XRES<0>", "MINUS"), "d<0>");
    assert_eq!(net(&module, "XRES<2>", "MINUS"), "d<1>");
    assert_eq!(net(&module, "XRES<3>", "PLUS"), "d<1>");

    let mut module = self::module();
    module
        .design_resistor("XRES", &unit_params(), 2, 2, "a", "a", "d", "BULK", true)
        .unwrap();
    assert_eq!(net(&module, "XRES<0>", "MINUS"), "d<0>");
    assert_eq!(net(&module, "XRES<2>", "MINUS"), "d<0>");

    assert!(matches!(
        module.design_resistor("XCAP", &unit_params(), 0, 1, "a", "b", "m", "BULK", false),
        Err(SchematicError::InvalidResistorCount { .. })
    ));
}

#[test]
fn validation_reports_issues() {
    let mut module = module();
    assert!(module.validate().is_empty());

    module.add_pin("en", PinDirection::Input).unwrap();
    module
        .add_instance(Instance::new("XBAD", "").with_connection("A", "").with_connection("B", "lonely"))
        .unwrap();
    let issues = module.validate();
    assert_eq!(issues.num_errors(), 2);
    assert_eq!(issues.num_warnings(), 2);
    assert!(issues.has_error());
    let causes: Vec<_> = issues.iter().map(|i| i.cause().clone()).collect();
    assert!(causes.contains(&Cause::UnconnectedPin {
        pin: ArcStr::from("en")
    }));
    assert!(causes.contains(&Cause::FloatingNet {
        net: ArcStr::from("lonely")
    }));
    assert!(causes.contains(&Cause::EmptyCell {
        inst: ArcStr::from("XBAD")
    }));
}

#[test]
fn spice_netlist() {
    let mut module = module();
    module
        .instance_mut("XCAP")
        .unwrap()
        .set_param("c", si_string(1e-12));
    let spice = module.to_spice().unwrap();
    let lines: Vec<_> = spice.lines().collect();
    assert_eq!(
        lines,
        vec![
            "* filter",
            ".SUBCKT filter in out BULK",
            "XRES out in BULK res_unit l=2000 w=400 intent=standard",
            "XCAP in out cap_ideal c=1p",
            ".ENDS filter",
        ]
    );
}
