//! Routing track management.

use arcstr::ArcStr;
use geometry::dir::Dir;
use geometry::rect::Rect;
use geometry::span::Span;
use num::integer::{div_ceil, div_floor};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::grid::{LayerId, RoutingGrid};
use crate::halfint::HalfInt;

/// Rounding options for snapping coordinates to tracks.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug, Serialize, Deserialize)]
pub enum RoundMode {
    /// The coordinate must lie exactly on a (half-)track.
    #[default]
    None,
    /// The closest track strictly below the coordinate.
    Less,
    /// The closest track at or below the coordinate.
    LessEq,
    /// The nearest track; ties are broken toward the greater index.
    Nearest,
    /// The closest track at or above the coordinate.
    GreaterEq,
    /// The closest track strictly above the coordinate.
    Greater,
}

/// A uniform set of tracks.
///
/// The track line and space must be even.
///
/// Track 0 is centered at `offset`.
/// Track 1 is centered at `offset + line + space`.
/// Track -1 is centered at `offset - (line + space)`.
/// Track 0.5 is centered halfway between tracks 0 and 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UniformTracks {
    /// The width of each track.
    line: i64,
    /// Spacing between adjacent track edges.
    space: i64,
    /// An offset that translates all tracks.
    offset: i64,
}

impl UniformTracks {
    /// Create a uniform track set with the given line, space, and offset.
    ///
    /// # Panics
    ///
    /// Panics if `line` or `space` is odd or not positive.
    pub fn with_offset(line: i64, space: i64, offset: i64) -> Self {
        assert_eq!(line & 1, 0, "track width must be even");
        assert_eq!(space & 1, 0, "track spacing must be even");
        assert!(line > 0);
        assert!(space > 0);
        Self {
            line,
            space,
            offset,
        }
    }

    /// The pitch (line + space) of the tracks.
    #[inline]
    pub fn pitch(&self) -> i64 {
        self.line + self.space
    }

    /// The distance between adjacent half-tracks.
    #[inline]
    fn half_pitch(&self) -> i64 {
        self.pitch() / 2
    }

    /// The center coordinate of track `idx`.
    pub fn center(&self, idx: HalfInt) -> i64 {
        self.offset + idx.dbl() * self.half_pitch()
    }

    /// The physical width of a wire occupying `ntr` adjacent tracks.
    pub fn width(&self, ntr: i64) -> i64 {
        self.line + (ntr - 1) * self.pitch()
    }

    /// Gets the coordinates of a wire `ntr` tracks wide centered on track `idx`.
    pub fn get(&self, idx: HalfInt, ntr: i64) -> Span {
        Span::from_center_span(self.center(idx), self.width(ntr))
    }

    /// Converts a geometric coordinate to a half-track index.
    ///
    /// Returns `None` if `mode` is [`RoundMode::None`] and `coord`
    /// does not lie exactly on a half-track.
    pub fn to_track_idx(&self, coord: i64, mode: RoundMode) -> Option<HalfInt> {
        let hp = self.half_pitch();
        let delta = coord - self.offset;
        let exact = delta.rem_euclid(hp) == 0;
        let dbl = match mode {
            RoundMode::None if exact => delta / hp,
            RoundMode::None => return None,
            RoundMode::LessEq => div_floor(delta, hp),
            RoundMode::Less if exact => delta / hp - 1,
            RoundMode::Less => div_floor(delta, hp),
            RoundMode::GreaterEq => div_ceil(delta, hp),
            RoundMode::Greater if exact => delta / hp + 1,
            RoundMode::Greater => div_ceil(delta, hp),
            RoundMode::Nearest => div_floor(2 * delta + hp, 2 * hp),
        };
        Some(HalfInt::from_dbl(dbl))
    }
}

/// A set of parallel tracks on one routing layer.
///
/// `num` tracks, each `width` tracks wide, starting at `index` and
/// separated by `pitch` tracks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TrackId {
    layer: LayerId,
    index: HalfInt,
    width: i64,
    num: i64,
    pitch: HalfInt,
}

impl TrackId {
    /// Creates a new track identifier.
    ///
    /// A negative `pitch` is normalized so that `index` always names the lowest track.
    /// The pitch of a single track is always zero.
    pub fn new(layer: LayerId, index: HalfInt, width: i64, num: i64, pitch: HalfInt) -> Result<Self> {
        let invalid = |reason: &str| RoutingError::InvalidTrackId {
            layer,
            reason: ArcStr::from(reason),
        };
        if width < 1 {
            return Err(invalid("track width must be at least 1"));
        }
        if num < 1 {
            return Err(invalid("number of tracks must be at least 1"));
        }
        if num == 1 {
            return Ok(Self {
                layer,
                index,
                width,
                num,
                pitch: HalfInt::default(),
            });
        }
        if pitch == HalfInt::default() {
            return Err(invalid("multiple tracks must have a non-zero pitch"));
        }
        let (index, pitch) = if pitch < HalfInt::default() {
            (index + pitch * (num - 1), -pitch)
        } else {
            (index, pitch)
        };
        Ok(Self {
            layer,
            index,
            width,
            num,
            pitch,
        })
    }

    /// Creates an identifier for a single track.
    pub fn single(layer: LayerId, index: HalfInt, width: i64) -> Result<Self> {
        Self::new(layer, index, width, 1, HalfInt::default())
    }

    /// The routing layer.
    #[inline]
    pub fn layer_id(&self) -> LayerId {
        self.layer
    }

    /// The index of the lowest track.
    #[inline]
    pub fn base_index(&self) -> HalfInt {
        self.index
    }

    /// The index of the highest track.
    #[inline]
    pub fn last_index(&self) -> HalfInt {
        self.index + self.pitch * (self.num - 1)
    }

    /// The width of each track, in number of tracks.
    #[inline]
    pub fn width(&self) -> i64 {
        self.width
    }

    /// The number of tracks.
    #[inline]
    pub fn num(&self) -> i64 {
        self.num
    }

    /// The separation between adjacent tracks.
    #[inline]
    pub fn pitch(&self) -> HalfInt {
        self.pitch
    }

    /// Iterates over the indices of every track, from lowest to highest.
    pub fn indices(&self) -> impl Iterator<Item = HalfInt> + '_ {
        (0..self.num).map(move |i| self.index + self.pitch * i)
    }

    /// Iterates over single-track identifiers for every track.
    pub fn iter(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.indices().map(move |index| TrackId {
            layer: self.layer,
            index,
            width: self.width,
            num: 1,
            pitch: HalfInt::default(),
        })
    }
}

/// Wires drawn on every track of a [`TrackId`], spanning `[lower, upper]`
/// along the layer's routing direction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WireArray {
    track_id: TrackId,
    lower: i64,
    upper: i64,
}

impl WireArray {
    /// Creates a new wire array. The endpoints are sorted.
    pub fn new(track_id: TrackId, lower: i64, upper: i64) -> Self {
        let span = Span::new(lower, upper);
        Self {
            track_id,
            lower: span.start(),
            upper: span.stop(),
        }
    }

    /// The tracks occupied by this wire array.
    #[inline]
    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }

    /// The routing layer.
    #[inline]
    pub fn layer_id(&self) -> LayerId {
        self.track_id.layer_id()
    }

    /// The lower end of the wires.
    #[inline]
    pub fn lower(&self) -> i64 {
        self.lower
    }

    /// The upper end of the wires.
    #[inline]
    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// The midpoint of the wires, rounded down.
    #[inline]
    pub fn middle(&self) -> i64 {
        Span::new(self.lower, self.upper).center()
    }

    /// The extent of the wires along the routing direction.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.lower, self.upper)
    }

    /// Returns a copy of this wire array with the given extent.
    pub fn with_span(&self, span: Span) -> Self {
        Self::new(self.track_id, span.start(), span.stop())
    }

    /// Iterates over single-track wire arrays, one per track.
    pub fn warr_iter(&self) -> impl Iterator<Item = WireArray> + '_ {
        self.track_id
            .iter()
            .map(move |track_id| WireArray::new(track_id, self.lower, self.upper))
    }

    /// The rectangle occupied by each individual wire.
    pub fn track_rects(&self, grid: &RoutingGrid) -> Result<Vec<Rect>> {
        let layer = grid.layer(self.layer_id())?;
        let tracks = layer.tracks();
        Ok(self
            .track_id
            .indices()
            .map(|idx| {
                Rect::from_dir_spans(
                    layer.dir,
                    self.span(),
                    tracks.get(idx, self.track_id.width()),
                )
            })
            .collect())
    }

    /// The bounding box of all wires in this array.
    pub fn bbox(&self, grid: &RoutingGrid) -> Result<Rect> {
        let layer = grid.layer(self.layer_id())?;
        let tracks = layer.tracks();
        let perp = tracks
            .get(self.track_id.base_index(), self.track_id.width())
            .union(tracks.get(self.track_id.last_index(), self.track_id.width()));
        Ok(Rect::from_dir_spans(layer.dir, self.span(), perp))
    }

    /// The routing direction of the wires.
    pub fn dir(&self, grid: &RoutingGrid) -> Result<Dir> {
        grid.dir(self.layer_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_tracks_centers() {
        let tracks = UniformTracks::with_offset(20, 20, 20);
        assert_eq!(tracks.center(HalfInt::new(0)), 20);
        assert_eq!(tracks.center(HalfInt::new(2)), 100);
        assert_eq!(tracks.center(HalfInt::from_dbl(3)), 80);
        assert_eq!(tracks.center(HalfInt::new(-1)), -20);
        assert_eq!(tracks.get(HalfInt::new(1), 1), Span::new(50, 70));
        assert_eq!(tracks.get(HalfInt::new(1), 2), Span::new(30, 90));
    }

    #[test]
    fn uniform_tracks_to_track_idx() {
        let tracks = UniformTracks::with_offset(20, 20, 20);
        // Half-tracks are every 20 units, starting at 20.
        assert_eq!(tracks.to_track_idx(60, RoundMode::None), Some(HalfInt::new(1)));
        assert_eq!(tracks.to_track_idx(70, RoundMode::None), None);
        assert_eq!(tracks.to_track_idx(70, RoundMode::LessEq), Some(HalfInt::from_dbl(2)));
        assert_eq!(tracks.to_track_idx(60, RoundMode::LessEq), Some(HalfInt::from_dbl(2)));
        assert_eq!(tracks.to_track_idx(60, RoundMode::Less), Some(HalfInt::from_dbl(1)));
        assert_eq!(tracks.to_track_idx(70, RoundMode::Less), Some(HalfInt::from_dbl(2)));
        assert_eq!(tracks.to_track_idx(70, RoundMode::GreaterEq), Some(HalfInt::from_dbl(3)));
        assert_eq!(tracks.to_track_idx(60, RoundMode::Greater), Some(HalfInt::from_dbl(3)));
        assert_eq!(tracks.to_track_idx(69, RoundMode::Nearest), Some(HalfInt::from_dbl(2)));
        assert_eq!(tracks.to_track_idx(70, RoundMode::Nearest), Some(HalfInt::from_dbl(3)));
        assert_eq!(tracks.to_track_idx(-5, RoundMode::LessEq), Some(HalfInt::from_dbl(-2)));
    }

    #[test]
    fn track_id_normalizes_negative_pitch() {
        let tid = TrackId::new(LayerId(3), HalfInt::new(10), 1, 3, HalfInt::new(-2)).unwrap();
        assert_eq!(tid.base_index(), HalfInt::new(6));
        assert_eq!(tid.last_index(), HalfInt::new(10));
        assert_eq!(
            tid.indices().collect::<Vec<_>>(),
            vec![HalfInt::new(6), HalfInt::new(8), HalfInt::new(10)]
        );
    }

    #[test]
    fn track_id_rejects_zero_pitch_arrays() {
        assert!(TrackId::new(LayerId(3), HalfInt::new(1), 1, 2, HalfInt::new(0)).is_err());
        assert!(TrackId::new(LayerId(3), HalfInt::new(1), 0, 1, HalfInt::new(0)).is_err());
    }
}
