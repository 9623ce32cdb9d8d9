//! Transformation types and traits.

use serde::{Deserialize, Serialize};

use crate::orientation::Orientation;
use crate::point::Point;

/// A transformation representing a Manhattan reflection followed by a translation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    orientation: Orientation,
    offset: Point,
}

impl Transformation {
    /// Returns the identity transform, leaving any transformed object unmodified.
    pub const fn identity() -> Self {
        Self {
            orientation: Orientation::R0,
            offset: Point::zero(),
        }
    }

    /// Creates a transformation that reflects according to `orientation` and then
    /// translates by `offset`.
    pub const fn new(offset: Point, orientation: Orientation) -> Self {
        Self {
            orientation,
            offset,
        }
    }

    /// Returns a translation by `(x, y)`.
    pub const fn translate(x: i64, y: i64) -> Self {
        Self::new(Point::new(x, y), Orientation::R0)
    }

    /// The orientation applied before translating.
    #[inline]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The translation applied after reflecting.
    #[inline]
    pub const fn offset(&self) -> Point {
        self.offset
    }

    /// Returns the transformation equivalent to applying `child` and then `parent`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let parent = Transformation::new(Point::new(100, 0), Orientation::ReflectHoriz);
    /// let child = Transformation::translate(10, 5);
    /// let p = Point::new(1, 1);
    /// let cascaded = Transformation::cascade(parent, child);
    /// assert_eq!(p.transform(cascaded), p.transform(child).transform(parent));
    /// ```
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        Self {
            orientation: parent.orientation.compose(child.orientation),
            offset: parent.orientation.apply(child.offset) + parent.offset,
        }
    }
}

/// A trait for specifying how an object is changed by a [`Transformation`].
pub trait TransformMut {
    /// Applies matrix-vector [`Transformation`] `trans`.
    fn transform_mut(&mut self, trans: Transformation);
}

/// A trait for specifying how a shape is transformed by a [`Transformation`].
///
/// Takes in an owned copy of the shape and returns the transformed version.
pub trait Transform: TransformMut + Sized {
    /// Applies matrix-vector [`Transformation`] `trans`.
    ///
    /// Creates a new shape at a location equal to the transformation of the original.
    fn transform(mut self, trans: Transformation) -> Self {
        self.transform_mut(trans);
        self
    }
}

impl<T: TransformMut + Sized> Transform for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Rect;

    #[test]
    fn reflect_horiz_then_translate() {
        let xform = Transformation::new(Point::new(50, 0), Orientation::ReflectHoriz);
        assert_eq!(Point::new(10, 7).transform(xform), Point::new(40, 7));
        assert_eq!(
            Rect::from_sides(0, 0, 20, 10).transform(xform),
            Rect::from_sides(30, 0, 50, 10)
        );
    }

    #[test]
    fn cascade_matches_sequential_application() {
        let parent = Transformation::new(Point::new(-30, 12), Orientation::ReflectVert);
        let child = Transformation::new(Point::new(7, 9), Orientation::ReflectHoriz);
        let cascaded = Transformation::cascade(parent, child);
        assert_eq!(cascaded.orientation(), Orientation::R180);
        for p in [Point::new(0, 0), Point::new(3, -4), Point::new(-100, 25)] {
            assert_eq!(p.transform(cascaded), p.transform(child).transform(parent));
        }
    }
}
