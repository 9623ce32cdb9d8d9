use arcstr::ArcStr;
use test_log::test;

use super::*;
use crate::error::Error;

const HPF: &str = include_str!("../../../configs/hpf.toml");

const MINIMAL: &str = r#"
l = 2000
w = 400
intent = "standard"
nser = 1
ndum = 1
"#;

fn params(extra: &str) -> HighPassDiffParams {
    HighPassDiffParams::from_toml(&format!("{MINIMAL}{extra}")).unwrap()
}

fn pins(module: &::schematic::Module) -> Vec<&str> {
    module.pins().map(|pin| pin.name.as_str()).collect()
}

fn insts(module: &::schematic::Module) -> Vec<&str> {
    module.instances().map(|inst| inst.name().as_str()).collect()
}

fn conns(module: &::schematic::Module, inst: &str) -> Vec<(String, String)> {
    module
        .instance(inst)
        .unwrap()
        .connections()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn parameter_defaults() {
    let p = params("");
    assert_eq!(p.sub_name, "VDD");
    assert!(p.bias_diff);
    assert!(p.connect_res_to_cap_res_metal);
    assert!(!p.connect_dum_to_sub);
    assert!(!p.extracted);
    assert_eq!(p.cap_val, CapVal::Ideal(1e-9));
    assert_eq!(p.res_in_info, None);
    assert_eq!(p.ndum, DummyCount::Count(1));
}

#[test]
fn dummy_count_forms() {
    let p = HighPassDiffParams::from_toml(&MINIMAL.replace("ndum = 1", "ndum = [2, 3]")).unwrap();
    assert_eq!(p.ndum.resolve(), (2, 3, true));
    let p =
        HighPassDiffParams::from_toml(&MINIMAL.replace("ndum = 1", "ndum = [2, 3, false]")).unwrap();
    assert_eq!(p.ndum.resolve(), (2, 3, false));
    assert!(DummyCount::Count(0).is_empty());
    assert!(DummyCount::Grid(2, 0).is_empty());
    assert!(!DummyCount::GridMid(1, 1, false).is_empty());
}

#[test]
fn default_filter() {
    let module = design(&params("")).unwrap();
    assert_eq!(
        pins(&module),
        vec!["inp", "inn", "outp", "outn", "biasp", "biasn", "VDD"]
    );
    assert_eq!(
        insts(&module),
        vec!["XRESP", "XRESN", "XRESPD", "XRESND", "XCAPPC", "XCAPNC"]
    );
    assert_eq!(
        conns(&module, "XRESP"),
        pairs(&[("PLUS", "outp"), ("MINUS", "biasp"), ("BULK", "VDD")])
    );
    assert_eq!(
        conns(&module, "XRESND"),
        pairs(&[("PLUS", "biasn"), ("MINUS", "biasn"), ("BULK", "VDD")])
    );
    assert_eq!(
        conns(&module, "XCAPNC"),
        pairs(&[("PLUS", "inn"), ("MINUS", "outn")])
    );
    let cap = module.instance("XCAPPC").unwrap();
    assert_eq!(cap.param("c").unwrap().as_str(), Some("1n"));
    let res = module.instance("XRESP").unwrap();
    assert_eq!(res.param("l").unwrap().as_f64(), Some(2000.));
    assert_eq!(res.param("intent").unwrap().as_str(), Some("standard"));
    assert!(!module.validate().has_error());
}

#[test]
fn common_mode_bias() {
    let p = HighPassDiffParams::from_toml(&format!(
        "{}bias_diff = false\n",
        MINIMAL.replace("ndum = 1", "ndum = [2, 2]")
    ))
    .unwrap();
    let module = design(&p).unwrap();
    assert_eq!(pins(&module), vec!["inp", "inn", "outp", "outn", "bias", "VDD"]);
    assert!(module.pin("biasp").is_none());
    assert!(module.pin("biasn").is_none());
    assert_eq!(module.instance("XRESN").unwrap().connection("MINUS").unwrap(), "bias");

    // Both dummy groups tie to `bias`, so their internal nets take the substrate name.
    assert_eq!(
        conns(&module, "XRESPD<0>"),
        pairs(&[("PLUS", "bias"), ("MINUS", "VDD_p_dum_x<0>"), ("BULK", "VDD")])
    );
    assert_eq!(
        conns(&module, "XRESND<3>"),
        pairs(&[("PLUS", "VDD_n_dum_x<0>"), ("MINUS", "bias"), ("BULK", "VDD")])
    );
    assert!(module.instance("XRESPD").is_err());
}

#[test]
fn extracted_removes_capacitors() {
    let module = design(&params("extracted = true\n")).unwrap();
    assert!(module.instances().all(|inst| inst.cell() != "cap_ideal"));
    assert!(module.instance("XCAPP").is_err());
    assert!(module.instance("XCAPPC").is_err());
}

#[test]
fn zero_dummies_are_removed() {
    for ndum in ["0", "[0, 3]", "[2, 0]", "[0, 1, false]"] {
        let src = MINIMAL.replace("ndum = 1", &format!("ndum = {ndum}"));
        let module = design(&HighPassDiffParams::from_toml(&src).unwrap()).unwrap();
        assert!(
            module
                .instances()
                .all(|inst| !inst.name().starts_with("XRESPD") && !inst.name().starts_with("XRESND")),
            "dummies left with ndum = {ndum}"
        );
    }
}

#[test]
fn dummies_on_substrate() {
    let module = design(&params("connect_dum_to_sub = true\n")).unwrap();
    assert_eq!(
        conns(&module, "XRESPD"),
        pairs(&[("PLUS", "VDD"), ("MINUS", "VDD"), ("BULK", "VDD")])
    );
}

#[test]
fn metal_resistors_and_parasitics() {
    let module = design(&HighPassDiffParams::from_toml(HPF).unwrap()).unwrap();
    assert_eq!(
        insts(&module),
        vec![
            "XRESP<0>", "XRESP<1>", "XRESN<0>", "XRESN<1>", "XRESPD", "XRESND", "XMRESP1",
            "XMRESN1", "XMRESP2", "XMRESN2", "XCAPPC", "XCAPPPB", "XCAPPPO", "XCAPNC",
            "XCAPNPB", "XCAPNPO",
        ]
    );

    // The resistors connect to the floating side of the output metal resistor.
    assert_eq!(
        conns(&module, "XRESP<0>"),
        pairs(&[("PLUS", "nc_outp"), ("MINUS", "nc_outp_x<0>"), ("BULK", "VDD")])
    );
    assert_eq!(
        conns(&module, "XRESP<1>"),
        pairs(&[("PLUS", "nc_outp_x<0>"), ("MINUS", "biasp"), ("BULK", "VDD")])
    );

    let mres = module.instance("XMRESN1").unwrap();
    assert_eq!(mres.param("layer").unwrap().as_f64(), Some(3.));
    assert_eq!(mres.param("w").unwrap().as_f64(), Some(400.));
    assert_eq!(mres.param("l").unwrap().as_f64(), Some(1000.));

    assert_eq!(
        conns(&module, "XCAPPC"),
        pairs(&[("PLUS", "nc_inp"), ("MINUS", "nc_outp")])
    );
    assert_eq!(
        conns(&module, "XCAPNPB"),
        pairs(&[("PLUS", "biasn"), ("MINUS", "VDD")])
    );
    assert_eq!(
        conns(&module, "XCAPPPO"),
        pairs(&[("PLUS", "outp"), ("MINUS", "VDD")])
    );
    let c = |inst: &str| {
        module
            .instance(inst)
            .unwrap()
            .param("c")
            .unwrap()
            .as_str()
            .map(ArcStr::from)
    };
    assert_eq!(c("XCAPPC").as_deref(), Some("1p"));
    assert_eq!(c("XCAPPPB").as_deref(), Some("2f"));
    assert_eq!(c("XCAPNPO").as_deref(), Some("1f"));
    assert!(!module.validate().has_error());
}

#[test]
fn resistors_bypass_metal_when_disabled() {
    let src = format!("{HPF}connect_res_to_cap_res_metal = false\n");
    let module = design(&HighPassDiffParams::from_toml(&src).unwrap()).unwrap();
    assert_eq!(
        module.instance("XRESN<0>").unwrap().connection("PLUS").unwrap(),
        "outn"
    );
    assert_eq!(
        module.instance("XRESN<0>").unwrap().connection("MINUS").unwrap(),
        "outn_x<0>"
    );
}

#[test]
fn empty_sub_name_keeps_bulk() {
    let module = design(&params("sub_name = \"\"\n")).unwrap();
    assert_eq!(pins(&module).last(), Some(&"BULK"));
    assert_eq!(module.instance("XRESP").unwrap().connection("BULK").unwrap(), "BULK");
}

#[test]
fn zero_series_resistors_is_an_error() {
    let src = MINIMAL.replace("nser = 1", "nser = 0");
    let err = design(&HighPassDiffParams::from_toml(&src).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        Error::Schematic(::schematic::SchematicError::InvalidResistorCount { nser: 0, .. })
    ));
}

#[test]
fn filter_netlist() {
    let spice = design(&params("")).unwrap().to_spice().unwrap();
    assert!(spice.starts_with("* high_pass_diff\n"));
    assert!(spice.contains(".SUBCKT high_pass_diff inp inn outp outn biasp biasn VDD\n"));
    assert!(spice.contains("XCAPPC inp outp cap_ideal c=1n\n"));
    assert!(spice.contains("XRESP outp biasp VDD res_unit l=2000 w=400 intent=standard\n"));
    assert!(spice.ends_with(".ENDS high_pass_diff\n"));
}
