//! Technology files.

use std::sync::Arc;

use routing::{RoutingGrid, RoutingLayer};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The routing layers of a technology, as read from a TOML file.
///
/// ```toml
/// [[layers]]
/// id = 1
/// dir = "horiz"
/// line = 20
/// space = 20
/// min_length = 0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tech {
    /// The routing layers, in any order.
    pub layers: Vec<RoutingLayer>,
}

impl Tech {
    /// Parses a technology from TOML.
    pub fn from_toml(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Builds the routing grid described by this technology.
    pub fn grid(&self) -> Result<Arc<RoutingGrid>> {
        Ok(Arc::new(RoutingGrid::new(self.layers.iter().cloned())?))
    }
}

/// A six layer example technology with alternating routing directions.
pub const EXAMPLE_TECH: &str = include_str!("../../configs/tech.toml");
