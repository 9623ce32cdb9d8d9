//! Layout templates drawn on a uniform routing grid.
//!
//! A [`Template`] draws its layout through a [`TemplateBuilder`]: it places
//! [`Instance`]s of previously generated [`Master`]s, draws wires on routing tracks,
//! connects wires on adjacent layers and exports pins. [`TemplateDb::new_template`]
//! runs a template and freezes the result into a [`Layout`].
#![warn(missing_docs)]

pub mod builder;
pub mod cell;
pub mod error;
pub mod options;
pub mod template;


pub use builder::TemplateBuilder;
pub use cell::{Instance, Layout, LayoutSummary, Pin, PinLabel, PinShape, Shape, Via};
pub use error::{LayoutError, Result};
pub use options::{Direction, MinLenMode, PinMode};
pub use template::{Master, Template, TemplateDb};
