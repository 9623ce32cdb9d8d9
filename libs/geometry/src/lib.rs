//! 2-D integer geometry for grid-based integrated circuit layout.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect) and mirror it about the y-axis:
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(10, 20, 30, 40);
//! let xform = Transformation::new(Point::new(100, 0), Orientation::ReflectHoriz);
//! assert_eq!(rect.transform(xform), Rect::from_sides(70, 20, 90, 40));
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod dir;
pub mod orientation;
pub mod point;
pub mod prelude;
pub mod rect;
pub mod snap;
pub mod span;
pub mod transform;
