//! Routing directions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The direction a routing layer runs in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Along the x axis.
    Horiz,
    /// Along the y axis.
    Vert,
}

impl Dir {
    /// The perpendicular direction.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dir::Vert.other(), Dir::Horiz);
    /// ```
    pub const fn other(&self) -> Self {
        match self {
            Dir::Horiz => Dir::Vert,
            Dir::Vert => Dir::Horiz,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Dir::Horiz => "horiz",
            Dir::Vert => "vert",
        })
    }
}
