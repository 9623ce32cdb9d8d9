//! Finished layouts and their instances.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;
use routing::{LayerId, RoutingGrid, WireArray};
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// A shape belonging to a pin.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PinShape {
    /// Wires on routing tracks.
    Wire(WireArray),
    /// An arbitrary rectangle.
    Rect {
        /// The layer of the rectangle.
        layer: LayerId,
        /// The rectangle.
        rect: Rect,
    },
}

impl PinShape {
    /// The layer this shape is drawn on.
    pub fn layer(&self) -> LayerId {
        match self {
            PinShape::Wire(warr) => warr.layer_id(),
            PinShape::Rect { layer, .. } => *layer,
        }
    }

    /// The bounding box of this shape.
    pub fn bbox(&self, grid: &RoutingGrid) -> Result<Rect> {
        Ok(match self {
            PinShape::Wire(warr) => warr.bbox(grid)?,
            PinShape::Rect { rect, .. } => *rect,
        })
    }

    /// Returns the wire array if this shape is on routing tracks.
    pub fn as_wire(&self) -> Option<&WireArray> {
        match self {
            PinShape::Wire(warr) => Some(warr),
            PinShape::Rect { .. } => None,
        }
    }

    /// Maps this shape through `xform`.
    pub fn transform(&self, grid: &RoutingGrid, xform: Transformation) -> Result<Self> {
        Ok(match self {
            PinShape::Wire(warr) => PinShape::Wire(grid.transform_warr(warr, xform)?),
            PinShape::Rect { layer, rect } => PinShape::Rect {
                layer: *layer,
                rect: rect.transform(xform),
            },
        })
    }
}

/// A labeled rectangle identifying a pin location.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PinLabel {
    /// The layer of the label.
    pub layer: LayerId,
    /// The labeled area.
    pub rect: Rect,
}

/// A named terminal of a layout.
///
/// All shapes of a pin belong to the same net.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    name: ArcStr,
    shapes: Vec<PinShape>,
    labels: Vec<PinLabel>,
}

impl Pin {
    pub(crate) fn new(name: ArcStr) -> Self {
        Self {
            name,
            shapes: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, shape: PinShape, label: PinLabel) {
        self.shapes.push(shape);
        self.labels.push(label);
    }

    /// The name of the pin.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The shapes making up the pin.
    pub fn shapes(&self) -> &[PinShape] {
        &self.shapes
    }

    /// The labeled portions of the pin's shapes.
    pub fn labels(&self) -> &[PinLabel] {
        &self.labels
    }
}

/// A rectangle drawn directly on a layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Shape {
    /// The layer.
    pub layer: LayerId,
    /// The rectangle.
    pub rect: Rect,
}

/// A via connecting two adjacent layers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Via {
    /// The lower layer.
    pub bot: LayerId,
    /// The upper layer.
    pub top: LayerId,
    /// The overlap between the connected shapes.
    pub rect: Rect,
}

/// A finished layout cell.
#[derive(Debug, Clone)]
pub struct Layout {
    pub(crate) name: ArcStr,
    pub(crate) grid: Arc<RoutingGrid>,
    pub(crate) bbox: Rect,
    pub(crate) top_layer: LayerId,
    pub(crate) instances: Vec<Instance>,
    pub(crate) wires: Vec<WireArray>,
    pub(crate) rects: Vec<Shape>,
    pub(crate) vias: Vec<Via>,
    pub(crate) pins: IndexMap<ArcStr, Pin>,
}

impl Layout {
    /// The name of the cell.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The routing grid the cell was drawn on.
    pub fn grid(&self) -> &Arc<RoutingGrid> {
        &self.grid
    }

    /// The boundary of the cell.
    pub fn bound_box(&self) -> Rect {
        self.bbox
    }

    /// The highest routing layer the cell may use.
    pub fn top_layer(&self) -> LayerId {
        self.top_layer
    }

    /// Instances of other cells.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Wires drawn on routing tracks.
    pub fn wires(&self) -> &[WireArray] {
        &self.wires
    }

    /// Rectangles drawn off the routing grid.
    pub fn rects(&self) -> &[Shape] {
        &self.rects
    }

    /// Vias between adjacent layers.
    pub fn vias(&self) -> &[Via] {
        &self.vias
    }

    /// The pins of the cell, in the order they were added.
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    /// Gets a pin by name.
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.get(name)
    }

    /// Summarizes the cell for reporting.
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            name: self.name.clone(),
            bbox: self.bbox,
            top_layer: self.top_layer,
            instances: self
                .instances
                .iter()
                .map(|inst| InstanceSummary {
                    name: inst.name.clone(),
                    cell: inst.layout.name.clone(),
                    xform: inst.xform,
                    bbox: inst.bound_box(),
                })
                .collect(),
            pins: self
                .pins
                .values()
                .map(|pin| (pin.name.clone(), pin.labels.clone()))
                .collect(),
            num_wires: self.wires.iter().map(|w| w.track_id().num() as usize).sum(),
            num_rects: self.rects.len(),
            num_vias: self.vias.len(),
        }
    }
}

/// A placed copy of a [`Layout`].
#[derive(Debug, Clone)]
pub struct Instance {
    name: ArcStr,
    layout: Arc<Layout>,
    xform: Transformation,
}

impl Instance {
    pub(crate) fn new(name: ArcStr, layout: Arc<Layout>, xform: Transformation) -> Self {
        Self {
            name,
            layout,
            xform,
        }
    }

    /// The instance name.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The instantiated cell.
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// The placement of the instance.
    pub fn transformation(&self) -> Transformation {
        self.xform
    }

    /// The boundary of the instance in the parent's coordinates.
    pub fn bound_box(&self) -> Rect {
        self.layout.bbox.transform(self.xform)
    }

    fn pin_shapes(&self, name: &str) -> Result<&[PinShape]> {
        self.layout
            .pins
            .get(name)
            .map(|pin| pin.shapes())
            .ok_or_else(|| LayoutError::MissingPin {
                inst: self.name.clone(),
                pin: ArcStr::from(name),
            })
    }

    fn single(&self, name: &str, mut shapes: Vec<PinShape>) -> Result<PinShape> {
        if shapes.len() != 1 {
            return Err(LayoutError::AmbiguousPin {
                inst: self.name.clone(),
                pin: ArcStr::from(name),
                count: shapes.len(),
            });
        }
        Ok(shapes.remove(0))
    }

    /// Gets the only shape of pin `name`, in the parent's coordinates.
    pub fn get_pin(&self, name: &str) -> Result<PinShape> {
        let shapes = self.pin_shapes(name)?;
        let shapes = shapes
            .iter()
            .map(|s| s.transform(&self.layout.grid, self.xform))
            .collect::<Result<Vec<_>>>()?;
        self.single(name, shapes)
    }

    /// Gets the only shape of pin `name` on `layer`, in the parent's coordinates.
    pub fn get_pin_on_layer(&self, name: &str, layer: LayerId) -> Result<PinShape> {
        let shapes = self.pin_shapes(name)?;
        let shapes = shapes
            .iter()
            .filter(|s| s.layer() == layer)
            .map(|s| s.transform(&self.layout.grid, self.xform))
            .collect::<Result<Vec<_>>>()?;
        self.single(name, shapes)
    }

    /// Gets the bounding box of the only shape of pin `name`, in the parent's coordinates.
    pub fn get_pin_bbox(&self, name: &str) -> Result<Rect> {
        self.get_pin(name)?.bbox(&self.layout.grid)
    }

    /// Gets the only shape of pin `name` as a wire array, in the parent's coordinates.
    pub fn get_pin_wire(&self, name: &str) -> Result<WireArray> {
        self.get_pin(name)?
            .as_wire()
            .copied()
            .ok_or_else(|| LayoutError::NotAWire {
                inst: self.name.clone(),
                pin: ArcStr::from(name),
            })
    }

    /// Gets every wire array of pin `name`, in the parent's coordinates.
    ///
    /// Rectangle shapes are skipped.
    pub fn get_all_port_pins(&self, name: &str) -> Result<Vec<WireArray>> {
        self.pin_shapes(name)?
            .iter()
            .filter_map(|s| s.as_wire())
            .map(|warr| Ok(self.layout.grid.transform_warr(warr, self.xform)?))
            .collect()
    }
}

/// A placed instance, as reported in a [`LayoutSummary`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct InstanceSummary {
    /// The instance name.
    pub name: ArcStr,
    /// The instantiated cell.
    pub cell: ArcStr,
    /// The placement.
    pub xform: Transformation,
    /// The boundary in the parent's coordinates.
    pub bbox: Rect,
}

/// A serializable overview of a [`Layout`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    /// The cell name.
    pub name: ArcStr,
    /// The cell boundary.
    pub bbox: Rect,
    /// The highest routing layer.
    pub top_layer: LayerId,
    /// The placed instances.
    pub instances: Vec<InstanceSummary>,
    /// The labels of each pin.
    pub pins: IndexMap<ArcStr, Vec<PinLabel>>,
    /// The number of individual routing wires.
    pub num_wires: usize,
    /// The number of off-grid rectangles.
    pub num_rects: usize,
    /// The number of vias.
    pub num_vias: usize,
}
