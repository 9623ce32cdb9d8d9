//! Layout result and error types.

use arcstr::ArcStr;
use geometry::rect::Rect;
use routing::{LayerId, RoutingError};

/// The [`LayoutError`] result type.
pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

/// A layout error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// An error in a routing grid computation.
    #[error(transparent)]
    Routing(#[from] RoutingError),
    /// An instance has no pin of the given name.
    #[error("instance `{inst}` has no pin named `{pin}`")]
    MissingPin {
        /// The instance name.
        inst: ArcStr,
        /// The requested pin.
        pin: ArcStr,
    },
    /// A pin was expected to consist of exactly one shape.
    #[error("pin `{pin}` of instance `{inst}` has {count} shapes, expected exactly one")]
    AmbiguousPin {
        /// The instance name.
        inst: ArcStr,
        /// The requested pin.
        pin: ArcStr,
        /// The number of matching shapes.
        count: usize,
    },
    /// A pin shape is not of the expected kind.
    #[error("pin `{pin}` of instance `{inst}` is not drawn on routing tracks")]
    NotAWire {
        /// The instance name.
        inst: ArcStr,
        /// The requested pin.
        pin: ArcStr,
    },
    /// Two layers that must be adjacent are not.
    #[error("layers {0} and {1} are not adjacent")]
    NonAdjacentLayers(LayerId, LayerId),
    /// Two layers that must route in perpendicular directions do not.
    #[error("layers {0} and {1} route in the same direction")]
    ParallelLayers(LayerId, LayerId),
    /// A pin with the given name already exists.
    #[error("pin `{0}` already exists")]
    DuplicatePin(ArcStr),
    /// An instance with the given name already exists.
    #[error("instance `{0}` already exists")]
    DuplicateInstance(ArcStr),
    /// A connection was requested with nothing to connect.
    #[error("nothing to connect to track on layer {0}")]
    EmptyConnection(LayerId),
    /// The size of the layout was never set.
    #[error("layout size was not set")]
    SizeNotSet,
    /// A bounding box is not usable as a layout boundary.
    #[error("invalid bounding box {rect:?}: {reason}")]
    BadBoundingBox {
        /// The offending bounding box.
        rect: Rect,
        /// What is wrong with it.
        reason: ArcStr,
    },
}
