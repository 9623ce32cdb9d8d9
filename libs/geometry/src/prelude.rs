//! Commonly used traits and types.

pub use crate::dir::Dir;
pub use crate::orientation::Orientation;
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::snap::{snap_down, snap_up};
pub use crate::span::Span;
pub use crate::transform::{Transform, TransformMut, Transformation};
