use ::layout::{Layout, Master, PinShape, TemplateDb};
use geometry::prelude::*;
use routing::{HalfInt, LayerId, WireArray};
use test_log::test;

use super::schematic::design;
use super::{Rdac, RdacParams, RdacSchParams};
use crate::error::Error;
use crate::rdac_decoder::RdacDecoderSchParams;
use crate::res_ladder::ResLadderSchParams;
use crate::tech::{Tech, EXAMPLE_TECH};

const RDAC: &str = include_str!("../../../configs/rdac.toml");
const RDAC_DUAL: &str = include_str!("../../../configs/rdac_dual.toml");

fn db() -> TemplateDb {
    TemplateDb::new(Tech::from_toml(EXAMPLE_TECH).unwrap().grid().unwrap())
}

fn generate(params: RdacParams) -> crate::error::Result<Master<RdacSchParams>> {
    db().new_template(&Rdac::new(params))
}

fn pin_wires(layout: &Layout, name: &str) -> Vec<WireArray> {
    layout
        .pin(name)
        .unwrap()
        .shapes()
        .iter()
        .map(|shape| match shape {
            PinShape::Wire(warr) => *warr,
            PinShape::Rect { .. } => panic!("pin {name} has a rectangle shape"),
        })
        .collect()
}

/// `(base track, pitch)` of every wire array of a pin, times two.
fn tracks(layout: &Layout, name: &str) -> Vec<(i64, i64)> {
    pin_wires(layout, name)
        .iter()
        .map(|warr| (warr.track_id().base_index().dbl(), warr.track_id().pitch().dbl()))
        .collect()
}

fn num_vias(layout: &Layout, bot: i32) -> usize {
    layout
        .vias()
        .iter()
        .filter(|via| via.bot == LayerId(bot) && via.top == LayerId(bot + 1))
        .count()
}

/// Asserts that tap `out<i>` of the ladder has exactly one via onto `in<i>` of each decoder.
fn assert_taps_reach_inputs(layout: &Layout, decoders: &[&str], num_in: usize) {
    let inst = |name: &str| {
        layout
            .instances()
            .iter()
            .find(|inst| inst.name().as_str() == name)
            .unwrap()
    };
    let res = inst("XRES");
    for idx in 0..num_in {
        let tap = res
            .get_pin_wire(&format!("out<{idx}>"))
            .unwrap()
            .bbox(layout.grid())
            .unwrap();
        for dec in decoders {
            let input = inst(dec).get_pin_bbox(&format!("in<{idx}>")).unwrap();
            let hits = layout
                .vias()
                .iter()
                .filter(|via| via.bot == LayerId(2) && via.top == LayerId(3))
                .filter(|via| input.left() <= via.rect.left() && via.rect.right() <= input.right())
                .filter(|via| tap.bot() <= via.rect.bot() && via.rect.top() <= tap.top())
                .count();
            assert_eq!(hits, 1, "tap {idx} of {dec}");
        }
    }
}

#[test]
fn rdac_single_decoder() {
    let master = generate(RdacParams::from_toml(RDAC).unwrap()).unwrap();
    let layout = master.layout();
    assert_eq!(layout.bound_box(), Rect::from_sides(0, 0, 3200, 2400));
    assert_eq!(layout.top_layer(), LayerId(6));

    let summary = layout.summary();
    let insts: Vec<_> = summary
        .instances
        .iter()
        .map(|inst| (inst.name.as_str(), inst.cell.as_str(), inst.bbox))
        .collect();
    assert_eq!(
        insts,
        vec![
            ("XDEC", "rdac_decoder", Rect::from_sides(1600, 0, 3200, 2400)),
            ("XRES", "res_ladder", Rect::from_sides(0, 160, 1600, 1920)),
        ]
    );
    let pins: Vec<_> = summary.pins.keys().map(|pin| pin.as_str()).collect();
    assert_eq!(
        pins,
        vec!["sel<0>", "sel<1>", "sel<2>", "sel<3>", "out", "VDD", "VSS"]
    );

    let sel0 = pin_wires(layout, "sel<0>");
    assert_eq!(sel0.len(), 1);
    assert_eq!(sel0[0].layer_id(), LayerId(2));
    assert_eq!(sel0[0].track_id().base_index(), HalfInt::new(44));
    assert_eq!((sel0[0].lower(), sel0[0].upper()), (0, 320));
    assert_eq!(
        summary.pins["sel<0>"][0].rect,
        Rect::from_sides(1770, 0, 1790, 160)
    );

    let out = pin_wires(layout, "out");
    assert_eq!(out[0].layer_id(), LayerId(4));
    assert_eq!(out[0].track_id().base_index(), HalfInt::new(29));
    assert_eq!((out[0].lower(), out[0].upper()), (1920, 2400));

    // One via per ladder tap.
    assert_eq!(num_vias(layout, 2), 16);
    assert_taps_reach_inputs(layout, &["XDEC"], 16);
    assert_eq!(num_vias(layout, 3), 4);
    assert_eq!(num_vias(layout, 4), 4);
    assert_eq!(num_vias(layout, 5), 7);

    assert_eq!(tracks(layout, "VDD"), vec![(1, 16), (25, 12)]);
    assert_eq!(tracks(layout, "VSS"), vec![(9, 0), (19, 12)]);
    for warr in pin_wires(layout, "VDD")
        .into_iter()
        .chain(pin_wires(layout, "VSS"))
    {
        assert_eq!(warr.layer_id(), LayerId(6));
        assert_eq!((warr.lower(), warr.upper()), (0, 2400));
    }

    assert_eq!(
        *master.data(),
        RdacSchParams {
            res_params: ResLadderSchParams { nx: 4, ny: 4 },
            dec_params: RdacDecoderSchParams {
                num_sel_row: 2,
                num_sel_col: 2,
            },
            num_dec: 1,
        }
    );
}

#[test]
fn rdac_dual_decoder() {
    let master = generate(RdacParams::from_toml(RDAC_DUAL).unwrap()).unwrap();
    let layout = master.layout();
    assert_eq!(layout.bound_box(), Rect::from_sides(0, 0, 4800, 2400));

    let summary = layout.summary();
    let insts: Vec<_> = summary
        .instances
        .iter()
        .map(|inst| (inst.name.as_str(), inst.bbox))
        .collect();
    assert_eq!(
        insts,
        vec![
            ("XDEC1", Rect::from_sides(0, 0, 1600, 2400)),
            ("XDEC0", Rect::from_sides(3200, 0, 4800, 2400)),
            ("XRES", Rect::from_sides(1600, 160, 3200, 1920)),
        ]
    );
    assert_eq!(
        summary.instances[0].xform,
        Transformation::new(Point::new(1600, 0), Orientation::ReflectHoriz)
    );

    let pins: Vec<_> = summary.pins.keys().map(|pin| pin.as_str()).collect();
    assert_eq!(
        pins,
        vec![
            "sel0<0>", "sel1<0>", "sel0<1>", "sel1<1>", "sel0<2>", "sel1<2>", "sel0<3>",
            "sel1<3>", "out0", "out1", "VDD", "VSS"
        ]
    );
    assert!(layout.pin("sel<0>").is_none());
    assert!(layout.pin("out").is_none());

    let track = |name: &str| pin_wires(layout, name)[0].track_id().base_index();
    assert_eq!(track("sel0<0>"), HalfInt::new(84));
    assert_eq!(track("sel1<0>"), HalfInt::new(35));
    assert_eq!(track("sel1<3>"), HalfInt::new(29));
    assert_eq!(track("out0"), HalfInt::new(49));
    assert_eq!(track("out1"), HalfInt::new(10));

    // Every tap reaches both decoders.
    assert_eq!(num_vias(layout, 2), 32);
    assert_taps_reach_inputs(layout, &["XDEC0", "XDEC1"], 16);

    assert_eq!(tracks(layout, "VDD"), vec![(21, 16), (45, 12), (0, 12)]);
    assert_eq!(tracks(layout, "VSS"), vec![(29, 0), (39, 12), (6, 12)]);
    assert_eq!(master.data().num_dec, 2);
}

#[test]
fn taps_are_extended_to_decoder_inputs() {
    let master = generate(RdacParams::from_toml(RDAC).unwrap()).unwrap();
    let layout = master.layout();
    let via = layout
        .vias()
        .iter()
        .filter(|via| via.bot == LayerId(2))
        .min_by_key(|via| via.rect.bot())
        .copied()
        .unwrap();
    // Tap 0 sits on xm track 6 after the ladder is raised by one pitch.
    assert_eq!(via.rect, Rect::from_sides(1770, 500, 1790, 540));
    assert!(layout
        .wires()
        .iter()
        .any(|warr| warr.layer_id() == LayerId(3)
            && warr.track_id().base_index() == HalfInt::new(6)
            && warr.span() == Span::new(0, 1790)));
}

#[test]
fn unsupported_decoder_count() {
    for num_dec in [0, 3] {
        let mut params = RdacParams::from_toml(RDAC).unwrap();
        params.num_dec = num_dec;
        let err = generate(params).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDecoderCount(n) if n == num_dec));
    }
}

#[test]
fn pass_gates_must_start_above_ladder_core() {
    let mut params = RdacParams::from_toml(RDAC).unwrap();
    params.dec_params.pg_coord0 = 320;
    assert!(matches!(generate(params).unwrap_err(), Error::Precondition(_)));
}

#[test]
fn ladder_taps_must_match_decoder_inputs() {
    let mut params = RdacParams::from_toml(RDAC).unwrap();
    params.res_params.nx = 2;
    assert!(matches!(generate(params).unwrap_err(), Error::InvalidParams(_)));
}

#[test]
fn num_dec_defaults_to_one() {
    let src = RDAC.replace("num_dec = 1\n", "");
    assert_eq!(RdacParams::from_toml(&src).unwrap().num_dec, 1);
}

#[test]
fn rdac_schematic_single_decoder() {
    let master = generate(RdacParams::from_toml(RDAC).unwrap()).unwrap();
    let module = design(master.data()).unwrap();
    let pins: Vec<_> = module.pins().map(|pin| pin.name.as_str()).collect();
    assert_eq!(
        pins,
        vec!["sel<0>", "sel<1>", "sel<2>", "sel<3>", "out", "VDD", "VSS"]
    );
    let insts: Vec<_> = module.instances().map(|inst| inst.name().as_str()).collect();
    assert_eq!(insts, vec!["XRES", "XDEC"]);

    let xres = module.instance("XRES").unwrap();
    assert_eq!(xres.cell(), "res_ladder");
    assert_eq!(xres.connection("out<15>").unwrap(), "in<15>");
    let xdec = module.instance("XDEC").unwrap();
    assert_eq!(xdec.connection("in<15>").unwrap(), "in<15>");
    assert_eq!(xdec.connection("sel<2>").unwrap(), "sel<2>");
    assert_eq!(xdec.connection("out").unwrap(), "out");
    assert!(module.validate().is_empty());

    let spice = module.to_spice().unwrap();
    assert!(spice.contains(".SUBCKT rdac sel<0> sel<1> sel<2> sel<3> out VDD VSS\n"));
    assert!(spice.contains(" rdac_decoder num_sel_row=2 num_sel_col=2\n"));
}

#[test]
fn rdac_schematic_dual_decoder() {
    let master = generate(RdacParams::from_toml(RDAC_DUAL).unwrap()).unwrap();
    let module = design(master.data()).unwrap();
    assert!(module.pin("sel1<3>").is_some());
    assert!(module.pin("out1").is_some());
    assert!(module.pin("sel<0>").is_none());
    let xdec1 = module.instance("XDEC1").unwrap();
    assert_eq!(xdec1.connection("sel<3>").unwrap(), "sel1<3>");
    assert_eq!(xdec1.connection("out").unwrap(), "out1");
    assert_eq!(
        module.instance("XDEC0").unwrap().connection("in<7>").unwrap(),
        "in<7>"
    );
    assert!(!module.validate().has_error());
}
