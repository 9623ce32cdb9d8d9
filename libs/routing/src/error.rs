//! Routing result and error types.

use arcstr::ArcStr;

use crate::grid::LayerId;
use crate::halfint::HalfInt;

/// The [`RoutingError`] result type.
pub type Result<T, E = RoutingError> = std::result::Result<T, E>;

/// A routing error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The requested layer is not part of the routing grid.
    #[error("layer {0} is not defined in the routing grid")]
    UnknownLayer(LayerId),
    /// A layer was defined more than once.
    #[error("layer {0} is defined more than once")]
    DuplicateLayer(LayerId),
    /// A layer definition violates the grid's constraints.
    #[error("invalid definition of layer {layer}: {reason}")]
    InvalidLayer {
        /// The offending layer.
        layer: LayerId,
        /// What is wrong with it.
        reason: ArcStr,
    },
    /// A coordinate that must lie on a track does not.
    #[error("coordinate {coord} does not lie on a track of layer {layer}")]
    OffGrid {
        /// The layer whose tracks were considered.
        layer: LayerId,
        /// The offending coordinate.
        coord: i64,
    },
    /// Not enough tracks are available to place the requested wires.
    #[error("cannot fit {num} wires between tracks {lower} and {upper} on layer {layer}")]
    NotEnoughTracks {
        /// The routing layer.
        layer: LayerId,
        /// The lowest usable track.
        lower: HalfInt,
        /// The highest usable track.
        upper: HalfInt,
        /// The number of wires requested.
        num: usize,
    },
    /// A track identifier could not be constructed.
    #[error("invalid track id on layer {layer}: {reason}")]
    InvalidTrackId {
        /// The routing layer.
        layer: LayerId,
        /// What is wrong with it.
        reason: ArcStr,
    },
    /// A track manager rule is malformed.
    #[error("invalid track manager rule: {0}")]
    InvalidRule(ArcStr),
}
