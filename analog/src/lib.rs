//! Analog circuit generators.
//!
//! - [`rdac`]: a resistor DAC layout assembled from a [`res_ladder`] and one or two
//!   [`rdac_decoder`]s, together with its schematic.
//! - [`high_pass_diff`]: a differential high-pass filter schematic.
//!
//! # Examples
//!
//! ```
//! use analog::rdac::{Rdac, RdacParams};
//! use analog::tech::{Tech, EXAMPLE_TECH};
//! use layout::TemplateDb;
//!
//! let grid = Tech::from_toml(EXAMPLE_TECH).unwrap().grid().unwrap();
//! let src = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/rdac.toml"));
//! let params = RdacParams::from_toml(src).unwrap();
//! let master = TemplateDb::new(grid).new_template(&Rdac::new(params)).unwrap();
//! assert!(master.layout().pin("VDD").is_some());
//!
//! let netlist = analog::rdac::schematic::design(master.data()).unwrap().to_spice().unwrap();
//! assert!(netlist.starts_with("* rdac"));
//! ```
#![warn(missing_docs)]

pub mod error;
pub mod high_pass_diff;
pub mod rdac;
pub mod rdac_decoder;
pub mod res_ladder;
pub mod tech;

pub use error::{Error, Result};
