//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;
use crate::point::Point;
use crate::span::Span;
use crate::transform::{Transform, TransformMut, Transformation};

/// An axis-aligned rectangle.
///
/// Corners are kept sorted, so `p0` is always the lower left corner.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    p0: Point,
    p1: Point,
}

impl Rect {
    /// The rectangle with opposite corners `a` and `b`.
    pub fn new(a: Point, b: Point) -> Self {
        Self::from_spans(Span::new(a.x, b.x), Span::new(a.y, b.y))
    }

    /// The rectangle with the given edges.
    ///
    /// Swapped edges are sorted.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(15, 20, 30, 40);
    /// assert_eq!((rect.left(), rect.bot(), rect.right(), rect.top()), (15, 20, 30, 40));
    /// assert_eq!(Rect::from_sides(30, 40, 15, 20), rect);
    /// ```
    pub fn from_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        Self::from_spans(Span::new(left, right), Span::new(bot, top))
    }

    /// The rectangle covering `h` horizontally and `v` vertically.
    pub fn from_spans(h: Span, v: Span) -> Self {
        Self {
            p0: Point::new(h.start(), v.start()),
            p1: Point::new(h.stop(), v.stop()),
        }
    }

    /// The rectangle covering `parallel` along `dir` and `perp` across it.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_dir_spans(Dir::Vert, Span::new(0, 100), Span::new(10, 20));
    /// assert_eq!(rect, Rect::from_sides(10, 0, 20, 100));
    /// ```
    pub fn from_dir_spans(dir: Dir, parallel: Span, perp: Span) -> Self {
        match dir {
            Dir::Horiz => Self::from_spans(parallel, perp),
            Dir::Vert => Self::from_spans(perp, parallel),
        }
    }

    /// The center, with each coordinate rounded toward zero.
    pub const fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }

    /// The lower left corner.
    pub const fn lower_left(&self) -> Point {
        self.p0
    }

    /// The smallest x coordinate.
    pub const fn left(&self) -> i64 {
        self.p0.x
    }

    /// The smallest y coordinate.
    pub const fn bot(&self) -> i64 {
        self.p0.y
    }

    /// The largest x coordinate.
    pub const fn right(&self) -> i64 {
        self.p1.x
    }

    /// The largest y coordinate.
    pub const fn top(&self) -> i64 {
        self.p1.y
    }

    /// Extent along x.
    pub const fn width(&self) -> i64 {
        self.p1.x - self.p0.x
    }

    /// Extent along y.
    pub const fn height(&self) -> i64 {
        self.p1.y - self.p0.y
    }

    /// The projection onto the axis of `dir`.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 10, 40, 30);
    /// assert_eq!(rect.span(Dir::Horiz), Span::new(0, 40));
    /// assert_eq!(rect.span(Dir::Vert), Span::new(10, 30));
    /// ```
    pub fn span(&self, dir: Dir) -> Span {
        match dir {
            Dir::Horiz => Span::new(self.p0.x, self.p1.x),
            Dir::Vert => Span::new(self.p0.y, self.p1.y),
        }
    }

    /// This rectangle with its projection onto the axis of `dir` replaced by `span`.
    pub fn with_span(&self, span: Span, dir: Dir) -> Self {
        Self::from_dir_spans(dir, span, self.span(dir.other()))
    }

    /// The bounding box of both rectangles.
    pub fn union(self, other: Self) -> Self {
        Self::from_spans(
            self.span(Dir::Horiz).union(other.span(Dir::Horiz)),
            self.span(Dir::Vert).union(other.span(Dir::Vert)),
        )
    }

    /// The overlap of both rectangles, if any. Edge contact yields a degenerate rectangle.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = Rect::from_sides(0, 0, 20, 20);
    /// assert_eq!(
    ///     a.intersection(Rect::from_sides(10, 10, 40, 40)),
    ///     Some(Rect::from_sides(10, 10, 20, 20))
    /// );
    /// assert_eq!(a.intersection(Rect::from_sides(30, 30, 40, 40)), None);
    /// ```
    pub fn intersection(self, other: Self) -> Option<Self> {
        Some(Self::from_spans(
            self.span(Dir::Horiz).intersection(other.span(Dir::Horiz))?,
            self.span(Dir::Vert).intersection(other.span(Dir::Vert))?,
        ))
    }

    /// Grows the rectangle along `dir` until it covers `span`.
    pub fn expand_to_contain(&self, span: Span, dir: Dir) -> Self {
        self.with_span(self.span(dir).union(span), dir)
    }
}

impl TransformMut for Rect {
    fn transform_mut(&mut self, trans: Transformation) {
        *self = Rect::new(self.p0.transform(trans), self.p1.transform(trans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;

    #[test]
    fn transformed_rect_is_normalized() {
        let rect = Rect::from_sides(10, 20, 30, 60);
        let xform = Transformation::new(Point::new(0, 0), Orientation::R180);
        assert_eq!(rect.transform(xform), Rect::from_sides(-30, -60, -10, -20));
    }

    #[test]
    fn expand_to_contain_only_grows() {
        let rect = Rect::from_sides(0, 0, 10, 10);
        assert_eq!(
            rect.expand_to_contain(Span::new(5, 40), Dir::Vert),
            Rect::from_sides(0, 0, 10, 40)
        );
        assert_eq!(rect.expand_to_contain(Span::new(2, 8), Dir::Horiz), rect);
    }
}
