//! Uniform routing grids and track management.
//!
//! A [`RoutingGrid`](grid::RoutingGrid) is a stack of [`RoutingLayer`](grid::RoutingLayer)s,
//! each carrying an infinite set of evenly spaced tracks running in the layer's preferred
//! direction. Tracks are addressed by [`HalfInt`](halfint::HalfInt) indices so that
//! positions midway between two tracks can be named.
//!
//! Track `i` of a layer with pitch `p` is centered at `p / 2 + i * p`.
#![warn(missing_docs)]

pub mod error;
pub mod grid;
pub mod halfint;
pub mod manager;
pub mod tracks;


pub use error::{Result, RoutingError};
pub use grid::{LayerId, RoutingGrid, RoutingLayer};
pub use halfint::HalfInt;
pub use manager::{SpaceRule, TrackManager, TrackSpecs, WidthRule};
pub use tracks::{RoundMode, TrackId, UniformTracks, WireArray};
