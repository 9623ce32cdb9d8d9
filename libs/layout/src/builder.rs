//! Incremental construction of a layout.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;
use routing::{HalfInt, LayerId, RoutingGrid, TrackId, WireArray};

use crate::cell::{Instance, Layout, Pin, PinLabel, PinShape, Shape, Via};
use crate::error::{LayoutError, Result};
use crate::options::{Direction, MinLenMode, PinMode};
use crate::template::{Master, Template, TemplateDb};

/// A layout under construction.
///
/// Handed to [`Template::draw_layout`].
#[derive(Debug)]
pub struct TemplateBuilder {
    db: TemplateDb,
    name: ArcStr,
    size: Option<(LayerId, Rect)>,
    instances: Vec<Instance>,
    wires: Vec<WireArray>,
    rects: Vec<Shape>,
    vias: Vec<Via>,
    pins: IndexMap<ArcStr, Pin>,
}

impl TemplateBuilder {
    pub(crate) fn new(db: TemplateDb, name: ArcStr) -> Self {
        Self {
            db,
            name,
            size: None,
            instances: Vec::new(),
            wires: Vec::new(),
            rects: Vec::new(),
            vias: Vec::new(),
            pins: IndexMap::new(),
        }
    }

    /// The routing grid.
    pub fn grid(&self) -> &Arc<RoutingGrid> {
        self.db.grid()
    }

    /// The name of the cell being drawn.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Generates the layout of a sub-template.
    pub fn new_template<T: Template>(&self, template: &T) -> Result<Master<T::Data>, T::Error> {
        self.db.new_template(template)
    }

    /// Places `master` with the given transformation.
    pub fn add_instance<D>(
        &mut self,
        master: &Master<D>,
        name: impl Into<ArcStr>,
        xform: Transformation,
    ) -> Result<Instance> {
        let name = name.into();
        if self.instances.iter().any(|inst| inst.name() == &name) {
            return Err(LayoutError::DuplicateInstance(name));
        }
        let inst = Instance::new(name, master.layout().clone(), xform);
        tracing::debug!(inst = %inst.name(), bbox = ?inst.bound_box(), "placed instance");
        self.instances.push(inst.clone());
        Ok(inst)
    }

    /// Sets the cell boundary from a bounding box anchored at the origin.
    ///
    /// The width and height are quantized to the size pitch of `top_layer`:
    /// rounded up if `round_up` is set, otherwise they must already be on pitch.
    pub fn set_size_from_bound_box(
        &mut self,
        top_layer: LayerId,
        rect: Rect,
        round_up: bool,
    ) -> Result<()> {
        let bad = |reason: &str| LayoutError::BadBoundingBox {
            rect,
            reason: ArcStr::from(reason),
        };
        if rect.lower_left() != Point::zero() {
            return Err(bad("lower left corner must be at the origin"));
        }
        if rect.width() <= 0 || rect.height() <= 0 {
            return Err(bad("bounding box is empty"));
        }
        let (w_pitch, h_pitch) = self.grid().get_size_pitch(top_layer)?;
        let (w, h) = (snap_up(rect.width(), w_pitch), snap_up(rect.height(), h_pitch));
        if !round_up && (w, h) != (rect.width(), rect.height()) {
            return Err(bad("dimensions are not multiples of the size pitch"));
        }
        self.size = Some((top_layer, Rect::from_sides(0, 0, w, h)));
        Ok(())
    }

    /// The cell boundary.
    pub fn bound_box(&self) -> Result<Rect> {
        self.size
            .map(|(_, rect)| rect)
            .ok_or(LayoutError::SizeNotSet)
    }

    /// The highest routing layer of the cell.
    pub fn top_layer(&self) -> Result<LayerId> {
        self.size
            .map(|(layer, _)| layer)
            .ok_or(LayoutError::SizeNotSet)
    }

    /// The number of tracks needed for a wire at least `width` wide.
    pub fn find_track_width(&self, layer: LayerId, width: i64) -> Result<i64> {
        Ok(self.grid().find_track_width(layer, width)?)
    }

    /// Draws wires on `num` tracks starting at track `idx`, spanning `[lower, upper]`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_wires(
        &mut self,
        layer: LayerId,
        idx: HalfInt,
        lower: i64,
        upper: i64,
        width: i64,
        num: i64,
        pitch: HalfInt,
    ) -> Result<WireArray> {
        self.grid().layer(layer)?;
        let tid = TrackId::new(layer, idx, width, num, pitch)?;
        let warr = WireArray::new(tid, lower, upper);
        self.wires.push(warr);
        Ok(warr)
    }

    /// Draws a rectangle on `layer`.
    pub fn add_rect(&mut self, layer: LayerId, rect: Rect) -> Result<()> {
        self.grid().layer(layer)?;
        self.rects.push(Shape { layer, rect });
        Ok(())
    }

    fn pin_entry(&mut self, name: ArcStr, connect: bool) -> Result<&mut Pin> {
        if self.pins.contains_key(&name) && !connect {
            return Err(LayoutError::DuplicatePin(name));
        }
        Ok(self
            .pins
            .entry(name.clone())
            .or_insert_with(|| Pin::new(name)))
    }

    /// Exports wire arrays as pin `name`.
    ///
    /// `mode` selects the labeled portion of each wire. If a pin named `name` already
    /// exists, the wires are merged into it when `connect` is set; otherwise it is an error.
    pub fn add_pin(
        &mut self,
        name: impl Into<ArcStr>,
        warrs: impl IntoIterator<Item = WireArray>,
        mode: PinMode,
        connect: bool,
    ) -> Result<()> {
        let grid = self.grid().clone();
        let mut shapes = Vec::new();
        for warr in warrs {
            let dir = grid.dir(warr.layer_id())?;
            let rect = warr
                .bbox(&grid)?
                .with_span(mode.label_span(warr.span()), dir);
            let label = PinLabel {
                layer: warr.layer_id(),
                rect,
            };
            shapes.push((PinShape::Wire(warr), label));
        }
        let pin = self.pin_entry(name.into(), connect)?;
        for (shape, label) in shapes {
            pin.push(shape, label);
        }
        Ok(())
    }

    /// Exports a rectangle on `layer` as pin `name`.
    pub fn add_pin_rect(&mut self, name: impl Into<ArcStr>, layer: LayerId, rect: Rect) -> Result<()> {
        self.add_rect(layer, rect)?;
        let pin = self.pin_entry(name.into(), false)?;
        pin.push(PinShape::Rect { layer, rect }, PinLabel { layer, rect });
        Ok(())
    }

    fn check_crossing(&self, a: LayerId, b: LayerId) -> Result<()> {
        if (a.0 - b.0).abs() != 1 {
            return Err(LayoutError::NonAdjacentLayers(a, b));
        }
        if self.grid().dir(a)? == self.grid().dir(b)? {
            return Err(LayoutError::ParallelLayers(a, b));
        }
        Ok(())
    }

    fn add_vias(&mut self, a: &WireArray, b_layer: LayerId, b_rects: &[Rect]) -> Result<()> {
        let (bot, top) = if a.layer_id() < b_layer {
            (a.layer_id(), b_layer)
        } else {
            (b_layer, a.layer_id())
        };
        for ra in a.track_rects(self.grid())? {
            for rb in b_rects {
                if let Some(rect) = ra.intersection(*rb) {
                    self.vias.push(Via { bot, top, rect });
                }
            }
        }
        Ok(())
    }

    /// Connects wire arrays on an adjacent layer to new wires on the tracks of `tid`.
    ///
    /// The new wires span every input wire, and `track_lower`/`track_upper` if given.
    /// Each input wire is extended to reach every new track, and a via is placed at each
    /// crossing. Wires shorter than the layer's minimum length are extended according to
    /// `min_len_mode`.
    pub fn connect_to_tracks(
        &mut self,
        warrs: &[WireArray],
        tid: TrackId,
        track_lower: Option<i64>,
        track_upper: Option<i64>,
        min_len_mode: MinLenMode,
    ) -> Result<WireArray> {
        let grid = self.grid().clone();
        let tr_layer = grid.layer(tid.layer_id())?;
        let tr_dir = tr_layer.dir;
        if warrs.is_empty() {
            return Err(LayoutError::EmptyConnection(tr_layer.id));
        }

        let tracks = tr_layer.tracks();
        let tr_perp = tracks
            .get(tid.base_index(), tid.width())
            .union(tracks.get(tid.last_index(), tid.width()));

        let mut span: Option<Span> = None;
        let mut extended = Vec::with_capacity(warrs.len());
        for warr in warrs {
            self.check_crossing(warr.layer_id(), tr_layer.id)?;
            let perp = warr.bbox(&grid)?.span(tr_dir);
            span = Some(span.map_or(perp, |s| s.union(perp)));
            extended.push(warr.with_span(warr.span().union(tr_perp)));
        }
        let mut span = span.ok_or(LayoutError::EmptyConnection(tr_layer.id))?;
        if let Some(lower) = track_lower {
            span = span.add_point(lower);
        }
        if let Some(upper) = track_upper {
            span = span.add_point(upper);
        }
        let span = min_len_mode.extend(span, tr_layer.min_length);

        let warr = WireArray::new(tid, span.start(), span.stop());
        let tr_rects = warr.track_rects(&grid)?;
        for ext in extended {
            self.add_vias(&ext, tr_layer.id, &tr_rects)?;
            self.wires.push(ext);
        }
        self.wires.push(warr);
        Ok(warr)
    }

    /// Connects a rectangle on the layer adjacent to `track_wires` in `direction`.
    ///
    /// The wires are extended to cover the rectangle, the rectangle is extended to reach
    /// every wire, and a via is placed at each crossing. Returns the extended wires.
    pub fn connect_bbox_to_track_wires(
        &mut self,
        direction: Direction,
        layer: LayerId,
        rect: Rect,
        track_wires: &WireArray,
    ) -> Result<WireArray> {
        let grid = self.grid().clone();
        let tw_layer = track_wires.layer_id();
        if layer != tw_layer + direction.step() {
            return Err(LayoutError::NonAdjacentLayers(layer, tw_layer));
        }
        self.check_crossing(layer, tw_layer)?;

        let tr_dir = grid.dir(tw_layer)?;
        let ext_warr = track_wires.with_span(track_wires.span().union(rect.span(tr_dir)));
        let tracks_perp = ext_warr.bbox(&grid)?.span(tr_dir.other());
        let ext_rect = rect.expand_to_contain(tracks_perp, tr_dir.other());

        self.add_vias(&ext_warr, layer, &[ext_rect])?;
        self.rects.push(Shape {
            layer,
            rect: ext_rect,
        });
        self.wires.push(ext_warr);
        Ok(ext_warr)
    }

    pub(crate) fn finish(self) -> Result<Layout> {
        let (top_layer, bbox) = self.size.ok_or(LayoutError::SizeNotSet)?;
        Ok(Layout {
            name: self.name,
            grid: self.db.grid().clone(),
            bbox,
            top_layer,
            instances: self.instances,
            wires: self.wires,
            rects: self.rects,
            vias: self.vias,
            pins: self.pins,
        })
    }
}
