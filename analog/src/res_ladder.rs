//! Abstract view of a resistor ladder.
//!
//! The view reproduces the boundary and pin geometry of a resistor ladder
//! from its parameters: one tap per unit resistor on consecutive horizontal
//! tracks of the top layer, and a supply wire in each margin.

use arcstr::ArcStr;
use geometry::prelude::*;
use layout::{PinMode, Template, TemplateBuilder};
use routing::{HalfInt, LayerId, RoundMode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of a resistor ladder.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResLadderParams {
    /// Number of unit resistors in each row.
    pub nx: usize,
    /// Number of rows.
    pub ny: usize,
    /// Width of a unit resistor.
    pub unit_w: i64,
    /// Height of a unit resistor.
    pub unit_h: i64,
    /// Bottom of the resistor core.
    pub core_y0: i64,
    /// Space above the resistor core.
    pub top_margin: i64,
    /// Space to the left and right of the resistor core.
    pub side_margin: i64,
    /// The layer carrying taps and supplies. Must route horizontally.
    pub top_layer: LayerId,
}

/// Schematic parameters of a resistor ladder.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResLadderSchParams {
    /// Number of unit resistors in each row.
    pub nx: usize,
    /// Number of rows.
    pub ny: usize,
}

impl ResLadderSchParams {
    /// The number of taps.
    pub fn num_taps(&self) -> usize {
        self.nx * self.ny
    }
}

/// Data produced by the resistor ladder layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResLadderData {
    /// The bottom of the resistor core.
    pub core_coord0: i64,
    /// Schematic parameters.
    pub sch_params: ResLadderSchParams,
}

/// A resistor ladder generator.
#[derive(Debug, Clone)]
pub struct ResLadder {
    params: ResLadderParams,
}

impl ResLadder {
    /// Creates a new [`ResLadder`].
    pub fn new(params: ResLadderParams) -> Self {
        Self { params }
    }
}

fn invalid(msg: impl Into<ArcStr>) -> Error {
    Error::InvalidParams(msg.into())
}

impl Template for ResLadder {
    type Data = ResLadderData;
    type Error = Error;

    fn name(&self) -> ArcStr {
        arcstr::literal!("res_ladder")
    }

    fn draw_layout(&self, b: &mut TemplateBuilder) -> Result<Self::Data> {
        let p = &self.params;
        if p.nx == 0 || p.ny == 0 {
            return Err(invalid("resistor ladder needs at least one unit"));
        }
        if p.unit_w <= 0 || p.unit_h <= 0 || p.core_y0 < 0 || p.top_margin < 0 || p.side_margin < 0
        {
            return Err(invalid("resistor ladder dimensions must not be negative"));
        }
        let grid = b.grid().clone();
        let xm = p.top_layer;
        if grid.dir(xm)? != Dir::Horiz {
            return Err(invalid(arcstr::format!(
                "resistor ladder top layer {xm} must route horizontally"
            )));
        }

        let core_top = p.core_y0 + p.ny as i64 * p.unit_h;
        let w = 2 * p.side_margin + p.nx as i64 * p.unit_w;
        let h = core_top + p.top_margin;
        b.set_size_from_bound_box(xm, Rect::from_sides(0, 0, w, h), true)?;
        let bbox = b.bound_box()?;

        let num_taps = p.nx * p.ny;
        let first = HalfInt::new(grid.coord_to_track(xm, p.core_y0, RoundMode::GreaterEq)?.ceil());
        let last = first + (num_taps as i64 - 1);
        if grid.track_span(xm, last, 1)?.stop() > core_top {
            return Err(invalid(arcstr::format!(
                "{num_taps} taps do not fit in a core of height {}",
                core_top - p.core_y0
            )));
        }
        for i in 0..num_taps {
            let warr = b.add_wires(
                xm,
                first + i as i64,
                0,
                bbox.width(),
                1,
                1,
                HalfInt::default(),
            )?;
            b.add_pin(arcstr::format!("out<{i}>"), [warr], PinMode::All, false)?;
        }

        let vss = HalfInt::new(grid.coord_to_track(xm, p.core_y0 / 2, RoundMode::Nearest)?.floor());
        let vdd = HalfInt::new(
            grid.coord_to_track(xm, bbox.top() - p.top_margin / 2, RoundMode::Nearest)?
                .floor(),
        );
        let vss_span = grid.track_span(xm, vss, 1)?;
        let vdd_span = grid.track_span(xm, vdd, 1)?;
        if vss_span.start() < 0 || vss >= first {
            return Err(invalid("no room for VSS below the resistor core"));
        }
        if vdd_span.stop() > bbox.top() || vdd <= last {
            return Err(invalid("no room for VDD above the resistor core"));
        }
        let (lower, upper) = (p.side_margin, bbox.width() - p.side_margin);
        for (name, idx) in [("VSS", vss), ("VDD", vdd)] {
            let warr = b.add_wires(xm, idx, lower, upper, 1, 1, HalfInt::default())?;
            b.add_pin(name, [warr], PinMode::All, false)?;
        }

        tracing::debug!(
            num_taps,
            first_tap = %first,
            %vss,
            %vdd,
            "drew resistor ladder"
        );
        Ok(ResLadderData {
            core_coord0: p.core_y0,
            sch_params: ResLadderSchParams {
                nx: p.nx,
                ny: p.ny,
            },
        })
    }
}
