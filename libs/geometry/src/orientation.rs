//! Instance orientations.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A reflection about one or both axes.
///
/// Quarter turns are not representable.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// No reflections.
    #[default]
    R0,
    /// Reflect vertically (ie. about the x-axis).
    ReflectVert,
    /// Reflect horizontally (ie. about the y-axis).
    ReflectHoriz,
    /// Rotate 180 degrees.
    R180,
}

impl Orientation {
    /// Creates an orientation from its two reflection flags.
    ///
    /// `flip_x` negates x-coordinates; `flip_y` negates y-coordinates.
    pub const fn from_flips(flip_x: bool, flip_y: bool) -> Self {
        match (flip_x, flip_y) {
            (false, false) => Self::R0,
            (true, false) => Self::ReflectHoriz,
            (false, true) => Self::ReflectVert,
            (true, true) => Self::R180,
        }
    }

    /// Whether this orientation negates x-coordinates.
    pub const fn flips_x(&self) -> bool {
        matches!(self, Self::ReflectHoriz | Self::R180)
    }

    /// Whether this orientation negates y-coordinates.
    pub const fn flips_y(&self) -> bool {
        matches!(self, Self::ReflectVert | Self::R180)
    }

    /// Applies the orientation to a point, without any translation.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let p = Point::new(10, 20);
    /// assert_eq!(Orientation::ReflectHoriz.apply(p), Point::new(-10, 20));
    /// assert_eq!(Orientation::R180.apply(p), Point::new(-10, -20));
    /// ```
    pub const fn apply(&self, p: Point) -> Point {
        Point::new(
            if self.flips_x() { -p.x } else { p.x },
            if self.flips_y() { -p.y } else { p.y },
        )
    }

    /// Returns the orientation equivalent to applying `inner` and then `self`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(
    ///     Orientation::ReflectHoriz.compose(Orientation::ReflectVert),
    ///     Orientation::R180,
    /// );
    /// assert_eq!(
    ///     Orientation::ReflectHoriz.compose(Orientation::ReflectHoriz),
    ///     Orientation::R0,
    /// );
    /// ```
    pub const fn compose(&self, inner: Orientation) -> Self {
        Self::from_flips(
            self.flips_x() ^ inner.flips_x(),
            self.flips_y() ^ inner.flips_y(),
        )
    }
}
