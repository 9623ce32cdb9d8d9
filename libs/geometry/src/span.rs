//! Closed intervals.

use std::cmp::{max, min};

use serde::{Deserialize, Serialize};

/// The closed interval `[start, stop]` along one axis.
#[derive(
    Debug, Default, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize, PartialEq, Eq,
)]
pub struct Span {
    start: i64,
    stop: i64,
}

impl Span {
    /// Creates the interval between `a` and `b`, in either order.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            start: min(a, b),
            stop: max(a, b),
        }
    }

    /// Creates an interval of length `len` centered at `center`.
    ///
    /// An odd `len` puts the extra unit above the center.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Span::from_center_span(100, 40), Span::new(80, 120));
    /// ```
    pub fn from_center_span(center: i64, len: i64) -> Self {
        let start = center - len / 2;
        Self::new(start, start + len)
    }

    /// The lower end.
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// The upper end.
    pub const fn stop(&self) -> i64 {
        self.stop
    }

    /// The midpoint, rounded toward zero.
    pub const fn center(&self) -> i64 {
        (self.start + self.stop) / 2
    }

    /// `stop - start`.
    pub const fn length(&self) -> i64 {
        self.stop - self.start
    }

    /// The smallest interval covering both spans.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: min(self.start, other.start),
            stop: max(self.stop, other.stop),
        }
    }

    /// The common part of both spans. Touching spans share a single point.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Span::new(0, 10).intersection(Span::new(5, 30)), Some(Span::new(5, 10)));
    /// assert_eq!(Span::new(0, 10).intersection(Span::new(15, 30)), None);
    /// ```
    pub fn intersection(self, other: Self) -> Option<Self> {
        let start = max(self.start, other.start);
        let stop = min(self.stop, other.stop);
        (start <= stop).then_some(Self { start, stop })
    }

    /// Grows the span to cover `x`.
    pub fn add_point(self, x: i64) -> Self {
        self.union(Self { start: x, stop: x })
    }
}
