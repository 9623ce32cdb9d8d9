//! Uniform routing grids and layer stacks.

use std::fmt::Display;

use arcstr::ArcStr;
use geometry::dir::Dir;
use geometry::span::Span;
use geometry::transform::Transformation;
use indexmap::IndexMap;
use num::integer::lcm;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::halfint::HalfInt;
use crate::tracks::{RoundMode, TrackId, UniformTracks, WireArray};

/// A routing layer number.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub i32);

impl Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add<i32> for LayerId {
    type Output = Self;
    fn add(self, rhs: i32) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl std::ops::Sub<i32> for LayerId {
    type Output = Self;
    fn sub(self, rhs: i32) -> Self::Output {
        Self(self.0 - rhs)
    }
}

/// A routing layer with uniformly spaced tracks.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RoutingLayer {
    /// The layer number.
    pub id: LayerId,
    /// The preferred routing direction.
    pub dir: Dir,
    /// The width of a single-track wire.
    pub line: i64,
    /// The space between adjacent single-track wires.
    pub space: i64,
    /// The minimum length of any wire drawn on this layer.
    #[serde(default)]
    pub min_length: i64,
}

impl RoutingLayer {
    /// The line + space of this layer.
    #[inline]
    pub fn pitch(&self) -> i64 {
        self.line + self.space
    }

    /// The (infinite) set of tracks on this layer.
    ///
    /// Track 0 is centered half a pitch above the origin.
    pub fn tracks(&self) -> UniformTracks {
        UniformTracks::with_offset(self.line, self.space, self.pitch() / 2)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| RoutingError::InvalidLayer {
            layer: self.id,
            reason: ArcStr::from(reason),
        };
        if self.line <= 0 || self.space <= 0 {
            return Err(invalid("line and space must be positive"));
        }
        if self.line % 2 != 0 || self.space % 2 != 0 {
            return Err(invalid("line and space must be even"));
        }
        if self.min_length < 0 {
            return Err(invalid("minimum length must not be negative"));
        }
        Ok(())
    }
}

/// A stack of routing layers, ordered from bottom to top.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoutingGrid {
    layers: IndexMap<LayerId, RoutingLayer>,
}

impl RoutingGrid {
    /// Creates a routing grid from a list of layers in any order.
    pub fn new(layers: impl IntoIterator<Item = RoutingLayer>) -> Result<Self> {
        let mut layers: Vec<RoutingLayer> = layers.into_iter().collect();
        layers.sort_by_key(|layer| layer.id);
        let mut map = IndexMap::with_capacity(layers.len());
        for layer in layers {
            layer.validate()?;
            let id = layer.id;
            if map.insert(id, layer).is_some() {
                return Err(RoutingError::DuplicateLayer(id));
            }
        }
        tracing::debug!(num_layers = map.len(), "created routing grid");
        Ok(Self { layers: map })
    }

    /// Gets the layer with the given ID.
    pub fn layer(&self, id: LayerId) -> Result<&RoutingLayer> {
        self.layers.get(&id).ok_or(RoutingError::UnknownLayer(id))
    }

    /// Iterates over all layers from bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &RoutingLayer> {
        self.layers.values()
    }

    /// The preferred routing direction of the given layer.
    pub fn dir(&self, id: LayerId) -> Result<Dir> {
        Ok(self.layer(id)?.dir)
    }

    /// The track pitch of the given layer.
    pub fn pitch(&self, id: LayerId) -> Result<i64> {
        Ok(self.layer(id)?.pitch())
    }

    /// Converts a coordinate to a half-track index on layer `id`.
    ///
    /// With [`RoundMode::None`], `coord` must lie exactly on a half-track.
    pub fn coord_to_track(&self, id: LayerId, coord: i64, mode: RoundMode) -> Result<HalfInt> {
        self.layer(id)?
            .tracks()
            .to_track_idx(coord, mode)
            .ok_or(RoutingError::OffGrid { layer: id, coord })
    }

    /// The center coordinate of track `idx` on layer `id`.
    pub fn track_to_coord(&self, id: LayerId, idx: HalfInt) -> Result<i64> {
        Ok(self.layer(id)?.tracks().center(idx))
    }

    /// The physical width of a wire `ntr` tracks wide.
    pub fn track_width(&self, id: LayerId, ntr: i64) -> Result<i64> {
        Ok(self.layer(id)?.tracks().width(ntr))
    }

    /// The perpendicular extent of a wire `ntr` tracks wide centered on track `idx`.
    pub fn track_span(&self, id: LayerId, idx: HalfInt, ntr: i64) -> Result<Span> {
        Ok(self.layer(id)?.tracks().get(idx, ntr))
    }

    /// The smallest number of tracks whose physical width is at least `width`.
    pub fn find_track_width(&self, id: LayerId, width: i64) -> Result<i64> {
        let layer = self.layer(id)?;
        if width <= layer.line {
            return Ok(1);
        }
        Ok(1 + num::integer::div_ceil(width - layer.line, layer.pitch()))
    }

    /// The quantization of block sizes for a block whose top layer is `id`.
    ///
    /// Returns `(w_pitch, h_pitch)`: the least common multiple of the pitches of all
    /// vertical (resp. horizontal) layers at or below `id`. Blocks whose dimensions are
    /// multiples of these values can be abutted without disturbing any track.
    pub fn get_size_pitch(&self, id: LayerId) -> Result<(i64, i64)> {
        self.layer(id)?;
        let (mut w_pitch, mut h_pitch) = (1, 1);
        for layer in self.layers().filter(|layer| layer.id <= id) {
            match layer.dir {
                Dir::Vert => w_pitch = lcm(w_pitch, layer.pitch()),
                Dir::Horiz => h_pitch = lcm(h_pitch, layer.pitch()),
            }
        }
        Ok((w_pitch, h_pitch))
    }

    /// Maps track `idx` of layer `id` through `xform`.
    ///
    /// Fails if the image of the track center is not on a half-track.
    pub fn transform_track(
        &self,
        id: LayerId,
        idx: HalfInt,
        xform: Transformation,
    ) -> Result<HalfInt> {
        let layer = self.layer(id)?;
        let center = layer.tracks().center(idx);
        let mapped = map_coord(center, layer.dir.other(), xform);
        self.coord_to_track(id, mapped, RoundMode::None)
    }

    /// Maps a wire array through `xform`.
    ///
    /// Reflections reverse the order of the tracks but keep their pitch.
    pub fn transform_warr(&self, warr: &WireArray, xform: Transformation) -> Result<WireArray> {
        let layer = self.layer(warr.layer_id())?;
        let tid = warr.track_id();
        let first = self.transform_track(layer.id, tid.base_index(), xform)?;
        let last = self.transform_track(layer.id, tid.last_index(), xform)?;
        let base = std::cmp::min(first, last);
        let new_tid = TrackId::new(layer.id, base, tid.width(), tid.num(), tid.pitch())?;
        let lower = map_coord(warr.lower(), layer.dir, xform);
        let upper = map_coord(warr.upper(), layer.dir, xform);
        Ok(WireArray::new(new_tid, lower, upper))
    }
}

/// Maps the coordinate along axis `dir` (x for [`Dir::Horiz`], y for [`Dir::Vert`]) through `xform`.
fn map_coord(coord: i64, dir: Dir, xform: Transformation) -> i64 {
    let orient = xform.orientation();
    let offset = xform.offset();
    match dir {
        Dir::Horiz => {
            if orient.flips_x() {
                offset.x - coord
            } else {
                offset.x + coord
            }
        }
        Dir::Vert => {
            if orient.flips_y() {
                offset.y - coord
            } else {
                offset.y + coord
            }
        }
    }
}
