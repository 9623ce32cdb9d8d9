//! Abstract view of an RDAC decoder.
//!
//! The decoder selects one of `2^num_sel` inputs and drives it onto a single
//! output. Only the geometry visible to an assembler is drawn: select and
//! input pins on the lowest routing layer, the output on the layer below the
//! top layer, and full-width supply wires on the top layer.

use arcstr::ArcStr;
use geometry::prelude::*;
use layout::{PinMode, Template, TemplateBuilder};
use routing::{HalfInt, LayerId, RoundMode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of an RDAC decoder.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RdacDecoderParams {
    /// Number of row select bits.
    pub num_sel_row: usize,
    /// Number of column select bits.
    pub num_sel_col: usize,
    /// Width of the decoder.
    pub width: i64,
    /// Height of the decoder.
    pub height: i64,
    /// Bottom of the pass-gate region.
    pub pg_coord0: i64,
    /// Height of the pass-gate region.
    pub pg_height: i64,
    /// The top routing layer. Must route horizontally.
    pub top_layer: LayerId,
}

/// Schematic parameters of an RDAC decoder.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RdacDecoderSchParams {
    /// Number of row select bits.
    pub num_sel_row: usize,
    /// Number of column select bits.
    pub num_sel_col: usize,
}

impl RdacDecoderSchParams {
    /// The total number of select bits.
    pub fn num_sel(&self) -> usize {
        self.num_sel_row + self.num_sel_col
    }

    /// The number of decoder inputs.
    pub fn num_in(&self) -> usize {
        1 << self.num_sel()
    }
}

/// Data produced by the decoder layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RdacDecoderData {
    /// The bottom of the pass-gate region.
    pub pg_coord0: i64,
    /// Schematic parameters.
    pub sch_params: RdacDecoderSchParams,
}

/// An RDAC decoder generator.
#[derive(Debug, Clone)]
pub struct RdacDecoder {
    params: RdacDecoderParams,
}

impl RdacDecoder {
    /// Creates a new [`RdacDecoder`].
    pub fn new(params: RdacDecoderParams) -> Self {
        Self { params }
    }
}

impl Template for RdacDecoder {
    type Data = RdacDecoderData;
    type Error = Error;

    fn name(&self) -> ArcStr {
        arcstr::literal!("rdac_decoder")
    }

    fn draw_layout(&self, b: &mut TemplateBuilder) -> Result<Self::Data> {
        let p = &self.params;
        let sch_params = RdacDecoderSchParams {
            num_sel_row: p.num_sel_row,
            num_sel_col: p.num_sel_col,
        };
        let num_sel = sch_params.num_sel();
        if num_sel == 0 || num_sel > 16 {
            return Err(Error::InvalidParams(arcstr::format!(
                "decoder must have between 1 and 16 select bits, got {num_sel}"
            )));
        }
        let grid = b.grid().clone();
        let xxm = p.top_layer;
        let (ym, xm) = (xxm - 1, xxm - 2);
        let vm = xm - 1;
        if grid.dir(xxm)? != Dir::Horiz {
            return Err(Error::InvalidParams(arcstr::format!(
                "decoder top layer {xxm} must route horizontally"
            )));
        }
        grid.layer(vm)?;

        b.set_size_from_bound_box(xxm, Rect::from_sides(0, 0, p.width, p.height), false)?;
        let bbox = b.bound_box()?;

        let pg_top = p.pg_coord0 + p.pg_height;
        let out_top = pg_top + 2 * grid.pitch(ym)?;
        if p.pg_coord0 <= 0 || p.pg_height <= 0 || out_top > bbox.top() {
            return Err(Error::InvalidParams(arcstr::format!(
                "pass-gate region [{}, {pg_top}] does not fit in a decoder of height {}",
                p.pg_coord0,
                bbox.height()
            )));
        }

        // Select and input pins alternate with empty tracks.
        let vm_span = |idx: usize| grid.track_span(vm, HalfInt::new(4 + 2 * idx as i64), 1);
        let num_in = sch_params.num_in();
        if vm_span(std::cmp::max(num_sel, num_in) - 1)?.stop() > bbox.right() {
            return Err(Error::InvalidParams(arcstr::format!(
                "{num_in} inputs do not fit in a decoder of width {}",
                bbox.width()
            )));
        }
        for i in 0..num_sel {
            let rect = Rect::from_spans(vm_span(i)?, Span::new(0, p.pg_coord0 / 2));
            b.add_pin_rect(arcstr::format!("sel<{i}>"), vm, rect)?;
        }
        for j in 0..num_in {
            let rect = Rect::from_spans(vm_span(j)?, Span::new(p.pg_coord0, pg_top));
            b.add_pin_rect(arcstr::format!("in<{j}>"), vm, rect)?;
        }

        let out_idx = HalfInt::new(
            grid.coord_to_track(ym, bbox.center().x, RoundMode::Nearest)?
                .floor(),
        );
        let out = Rect::from_spans(grid.track_span(ym, out_idx, 1)?, Span::new(pg_top, out_top));
        b.add_pin_rect("out", ym, out)?;

        let sup_w = grid.track_width(xxm, 1)?;
        let vdd = HalfInt::new(
            grid.coord_to_track(xxm, bbox.top() - sup_w / 2, RoundMode::LessEq)?
                .floor(),
        );
        if grid.track_span(xxm, vdd, 1)?.start() < out_top {
            return Err(Error::InvalidParams(arcstr::literal!(
                "no room for VDD above the decoder output"
            )));
        }
        for (name, idx) in [("VSS", HalfInt::new(0)), ("VDD", vdd)] {
            let warr = b.add_wires(xxm, idx, 0, bbox.width(), 1, 1, HalfInt::default())?;
            b.add_pin(name, [warr], PinMode::All, false)?;
        }

        tracing::debug!(num_sel, num_in, %out_idx, %vdd, "drew rdac decoder");
        Ok(RdacDecoderData {
            pg_coord0: p.pg_coord0,
            sch_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use layout::{LayoutError, PinShape, TemplateDb};
    use test_log::test;

    use super::*;
    use crate::tech::{Tech, EXAMPLE_TECH};

    fn params() -> RdacDecoderParams {
        RdacDecoderParams {
            num_sel_row: 2,
            num_sel_col: 2,
            width: 1600,
            height: 2400,
            pg_coord0: 640,
            pg_height: 1280,
            top_layer: LayerId(5),
        }
    }

    fn db() -> TemplateDb {
        TemplateDb::new(Tech::from_toml(EXAMPLE_TECH).unwrap().grid().unwrap())
    }

    fn rect(shape: &PinShape) -> (LayerId, Rect) {
        match shape {
            PinShape::Rect { layer, rect } => (*layer, *rect),
            PinShape::Wire(_) => panic!("expected a rectangle"),
        }
    }

    #[test]
    fn decoder_pins() {
        let master = db().new_template(&RdacDecoder::new(params())).unwrap();
        let layout = master.layout();
        assert_eq!(master.data().pg_coord0, 640);
        assert_eq!(master.data().sch_params.num_in(), 16);

        let pin = |name: &str| rect(&layout.pin(name).unwrap().shapes()[0]);
        assert_eq!(pin("sel<1>"), (LayerId(2), Rect::from_sides(250, 0, 270, 320)));
        assert_eq!(pin("in<15>"), (LayerId(2), Rect::from_sides(1370, 640, 1390, 1920)));
        assert_eq!(pin("out"), (LayerId(4), Rect::from_sides(740, 1920, 780, 2080)));
        assert!(layout.pin("sel<4>").is_none());

        let vdd = layout.pin("VDD").unwrap().shapes()[0].as_wire().copied().unwrap();
        assert_eq!(vdd.layer_id(), LayerId(5));
        assert_eq!(vdd.track_id().base_index(), HalfInt::new(14));
        assert_eq!((vdd.lower(), vdd.upper()), (0, 1600));
    }

    #[test]
    fn inputs_must_fit() {
        let params = RdacDecoderParams {
            num_sel_col: 3,
            ..params()
        };
        let err = db().new_template(&RdacDecoder::new(params)).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[test]
    fn size_must_be_on_pitch() {
        let params = RdacDecoderParams {
            width: 1620,
            ..params()
        };
        let err = db().new_template(&RdacDecoder::new(params)).unwrap_err();
        assert!(matches!(
            err,
            Error::Layout(LayoutError::BadBoundingBox { .. })
        ));
    }
}
