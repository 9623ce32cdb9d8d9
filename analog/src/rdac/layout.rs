//! RDAC layout assembly.

use arcstr::ArcStr;
use geometry::prelude::*;
use layout::{Direction, Instance, LayoutError, MinLenMode, PinMode, Template, TemplateBuilder};
use routing::{HalfInt, LayerId, RoundMode, TrackId, TrackManager, WireArray};

use super::{dec_pin_name, RdacParams, RdacSchParams};
use crate::error::{Error, Result};
use crate::rdac_decoder::RdacDecoder;
use crate::res_ladder::ResLadder;

const SUP: &str = "sup";

/// The RDAC layout generator.
///
/// The decoder's top layer `xxm` sets the routing layers used by the assembly:
/// `vm = xxm - 3` through `yym = xxm + 1`. The resistor ladder must route its taps
/// on `xm = xxm - 2`.
#[derive(Debug, Clone)]
pub struct Rdac {
    params: RdacParams,
}

impl Rdac {
    /// Creates a new [`Rdac`].
    pub fn new(params: RdacParams) -> Self {
        Self { params }
    }
}

/// A placed decoder and its index in pin names.
struct PlacedDecoder {
    idx: usize,
    inst: Instance,
}

fn pin_wire(inst: &Instance, name: &str, layer: LayerId) -> Result<WireArray> {
    let shape = inst.get_pin_on_layer(name, layer)?;
    shape.as_wire().copied().ok_or_else(|| {
        LayoutError::NotAWire {
            inst: inst.name().clone(),
            pin: ArcStr::from(name),
        }
        .into()
    })
}

fn first_wire(warrs: &[WireArray], what: &str) -> Result<WireArray> {
    warrs
        .first()
        .copied()
        .ok_or_else(|| Error::Precondition(arcstr::format!("{what} has no wires")))
}

impl Template for Rdac {
    type Data = RdacSchParams;
    type Error = Error;

    fn name(&self) -> ArcStr {
        arcstr::literal!("rdac")
    }

    fn draw_layout(&self, b: &mut TemplateBuilder) -> Result<Self::Data> {
        let params = &self.params;
        let num_dec = params.num_dec;
        if !(1..=2).contains(&num_dec) {
            return Err(Error::UnsupportedDecoderCount(num_dec));
        }
        let tr_manager = TrackManager::new(&params.track_specs())?;

        let res_master = b.new_template(&ResLadder::new(params.res_params.clone()))?;
        let dec_master = b.new_template(&RdacDecoder::new(params.dec_params.clone()))?;
        let res_sch = res_master.data().sch_params;
        let dec_sch = dec_master.data().sch_params;
        let num_sel = dec_sch.num_sel();
        let num_in = dec_sch.num_in();
        if res_sch.num_taps() != num_in {
            return Err(Error::InvalidParams(arcstr::format!(
                "resistor ladder has {} taps but the decoder has {num_in} inputs",
                res_sch.num_taps()
            )));
        }

        let xxm = dec_master.top_layer();
        let yym = xxm + 1;
        let ym = xxm - 1;
        let xm = ym - 1;
        let vm = xm - 1;
        if res_master.top_layer() != xm {
            return Err(Error::InvalidParams(arcstr::format!(
                "resistor ladder top layer must be {xm}, got {}",
                res_master.top_layer()
            )));
        }
        let grid = b.grid().clone();

        // Placement
        let (res_w, res_h) = (res_master.bound_box().width(), res_master.bound_box().height());
        let (dec_w, dec_h) = (dec_master.bound_box().width(), dec_master.bound_box().height());
        let res_coord0 = res_master.data().core_coord0;
        let dec_coord0 = dec_master.data().pg_coord0;
        let (_, h_pitch) = grid.get_size_pitch(xxm)?;
        let tot_w = res_w + num_dec as i64 * dec_w;
        if res_coord0 >= dec_coord0 {
            return Err(Error::Precondition(arcstr::format!(
                "decoder pass gates at {dec_coord0} must start above the resistor core at {res_coord0}"
            )));
        }

        let mut decs = Vec::with_capacity(num_dec);
        let start_x = if num_dec == 2 {
            let xform = Transformation::new(Point::new(dec_w, 0), Orientation::ReflectHoriz);
            let inst = b.add_instance(&dec_master, "XDEC1", xform)?;
            decs.push(PlacedDecoder { idx: 1, inst });
            dec_w
        } else {
            0
        };
        let dec0_name = if num_dec == 2 { "XDEC0" } else { "XDEC" };
        let inst = b.add_instance(
            &dec_master,
            dec0_name,
            Transformation::translate(start_x + res_w, 0),
        )?;
        decs.insert(0, PlacedDecoder { idx: 0, inst });

        // Lines the resistor taps up with the pass-gate array.
        let off_y = std::cmp::max(0, snap_down(dec_coord0 - res_coord0, h_pitch) - h_pitch);
        let res_inst = b.add_instance(&res_master, "XRES", Transformation::translate(start_x, off_y))?;
        let tot_h = std::cmp::max(dec_h, res_h + off_y);
        b.set_size_from_bound_box(yym, Rect::from_sides(0, 0, tot_w, tot_h), true)?;
        let bbox = b.bound_box()?;
        tracing::debug!(num_dec, start_x, off_y, ?bbox, "placed rdac sub-blocks");

        // Select signals
        let sel0 = decs[0].inst.get_pin_bbox("sel<0>")?;
        let w_sel_vm = b.find_track_width(vm, sel0.width())?;
        for bit in 0..num_sel {
            for dec in decs.iter() {
                let sel = dec.inst.get_pin_bbox(&format!("sel<{bit}>"))?;
                let tidx = grid.coord_to_track(vm, sel.center().x, RoundMode::Nearest)?;
                let warr = b.add_wires(vm, tidx, 0, sel.top(), w_sel_vm, 1, HalfInt::default())?;
                b.add_pin(
                    dec_pin_name("sel", dec.idx, num_dec, Some(bit)),
                    [warr],
                    PinMode::Lower,
                    false,
                )?;
            }
        }

        // Outputs
        let out0 = decs[0].inst.get_pin_bbox("out")?;
        let w_out_ym = b.find_track_width(ym, out0.width())?;
        for dec in decs.iter() {
            let out = dec.inst.get_pin_bbox("out")?;
            let tidx = grid.coord_to_track(ym, out.center().x, RoundMode::Nearest)?;
            let warr = b.add_wires(ym, tidx, out.bot(), bbox.top(), w_out_ym, 1, HalfInt::default())?;
            b.add_pin(
                dec_pin_name("out", dec.idx, num_dec, None),
                [warr],
                PinMode::Upper,
                false,
            )?;
        }

        // Ladder taps to decoder inputs
        for idx in 0..num_in {
            for dec in decs.iter() {
                let input = dec.inst.get_pin_bbox(&format!("in<{idx}>"))?;
                let tap = res_inst.get_pin_wire(&format!("out<{idx}>"))?;
                b.connect_bbox_to_track_wires(Direction::Lower, vm, input, &tap)?;
            }
        }

        // Ladder supplies, from xm up to xxm
        let res_vss_xm = res_inst.get_all_port_pins("VSS")?;
        let res_vdd_xm = res_inst.get_all_port_pins("VDD")?;
        let vdd_ref = first_wire(&res_vdd_xm, "resistor ladder VDD")?;
        let vdd_ym_lidx = grid.coord_to_track(ym, vdd_ref.lower(), RoundMode::GreaterEq)?;
        let vss_ym_lidx = tr_manager.get_next_track(ym, vdd_ym_lidx, SUP, SUP, 1);
        let vdd_ym_ridx = grid.coord_to_track(ym, vdd_ref.upper(), RoundMode::LessEq)?;
        let vss_ym_ridx = tr_manager.get_next_track(ym, vdd_ym_ridx, SUP, SUP, -1);
        let w_sup_ym = tr_manager.get_width(ym, SUP);
        let w_sup_xxm = tr_manager.get_width(xxm, SUP);
        let w_sup_yym = tr_manager.get_width(yym, SUP);
        let vdd_ym_tid = TrackId::new(ym, vdd_ym_lidx, w_sup_ym, 2, vdd_ym_ridx - vdd_ym_lidx)?;
        let vss_ym_tid = TrackId::new(ym, vss_ym_lidx, w_sup_ym, 2, vss_ym_ridx - vss_ym_lidx)?;

        let mut res_vss_xxm = Vec::new();
        let mut res_vdd_xxm = Vec::new();
        for (sup_xm, sup_xxm, tid) in [
            (&res_vss_xm, &mut res_vss_xxm, vss_ym_tid),
            (&res_vdd_xm, &mut res_vdd_xxm, vdd_ym_tid),
        ] {
            for warr in sup_xm.iter() {
                for single in warr.warr_iter() {
                    let ym_warr = b.connect_to_tracks(&[single], tid, None, None, MinLenMode::Middle)?;
                    let xxm_tidx =
                        grid.coord_to_track(xxm, ym_warr.middle(), RoundMode::Nearest)?;
                    sup_xxm.push(b.connect_to_tracks(
                        &[ym_warr],
                        TrackId::single(xxm, xxm_tidx, w_sup_xxm)?,
                        None,
                        None,
                        MinLenMode::None,
                    )?);
                }
            }
        }

        // Ladder supplies on yym
        let vdd_xxm_ref = first_wire(&res_vdd_xxm, "resistor ladder VDD")?;
        let vdd_yym_lidx = grid.coord_to_track(yym, vdd_xxm_ref.lower(), RoundMode::Greater)?;
        let vdd_yym_ridx = grid.coord_to_track(yym, vdd_xxm_ref.upper(), RoundMode::Less)?;
        let yym_locs = tr_manager.spread_wires(
            yym,
            &[SUP, SUP, SUP],
            vdd_yym_lidx,
            vdd_yym_ridx,
            (SUP, SUP),
        )?;
        let yh = bbox.top();
        let mut vdd_yym = vec![b.connect_to_tracks(
            &res_vdd_xxm,
            TrackId::new(yym, vdd_yym_lidx, w_sup_yym, 2, vdd_yym_ridx - vdd_yym_lidx)?,
            Some(0),
            Some(yh),
            MinLenMode::None,
        )?];
        let mut vss_yym = vec![b.connect_to_tracks(
            &res_vss_xxm,
            TrackId::single(yym, yym_locs[1], w_sup_yym)?,
            Some(0),
            Some(yh),
            MinLenMode::None,
        )?];
        let avail_lidx = tr_manager.get_next_track(yym, vdd_yym_lidx, SUP, SUP, -1);
        let avail_ridx = tr_manager.get_next_track(yym, vdd_yym_ridx, SUP, SUP, 1);

        // Decoder supplies on yym, in the columns beside the ladder
        let res_xm = res_inst.bound_box().center().x;
        for dec in decs.iter() {
            let dec_box = dec.inst.bound_box();
            let (vdd_tidx, vss_tidx, locs) = if dec_box.center().x > res_xm {
                let ridx = grid.coord_to_track(yym, dec_box.right(), RoundMode::Less)?;
                let locs =
                    tr_manager.spread_wires(yym, &[SUP; 4], avail_ridx, ridx, (SUP, SUP))?;
                (locs[1], locs[0], locs)
            } else {
                let lidx = grid.coord_to_track(yym, dec_box.left(), RoundMode::Greater)?;
                let locs =
                    tr_manager.spread_wires(yym, &[SUP; 4], lidx, avail_lidx, (SUP, SUP))?;
                (locs[0], locs[1], locs)
            };
            let pitch: HalfInt = locs[2] - locs[0];
            tracing::debug!(dec = dec.idx, ?locs, "spread decoder supplies");
            vdd_yym.push(b.connect_to_tracks(
                &[pin_wire(&dec.inst, "VDD", xxm)?],
                TrackId::new(yym, vdd_tidx, w_sup_yym, 2, pitch)?,
                Some(0),
                Some(yh),
                MinLenMode::None,
            )?);
            vss_yym.push(b.connect_to_tracks(
                &[pin_wire(&dec.inst, "VSS", xxm)?],
                TrackId::new(yym, vss_tidx, w_sup_yym, 2, pitch)?,
                Some(0),
                Some(yh),
                MinLenMode::None,
            )?);
        }

        b.add_pin("VDD", vdd_yym, PinMode::All, true)?;
        b.add_pin("VSS", vss_yym, PinMode::All, true)?;

        Ok(RdacSchParams {
            res_params: res_sch,
            dec_params: dec_sch,
            num_dec,
        })
    }
}
