//! Schematic modules built from netlist templates.
//!
//! A [`Module`] is usually loaded from a TOML netlist template with
//! [`Module::from_template`], then edited by a generator: pins renamed or
//! removed, instances arrayed, designed and reconnected. The result is checked
//! with [`Module::validate`] and written out with [`Module::write_spice`].
#![warn(missing_docs)]

pub mod error;
pub mod instance;
pub mod module;
pub mod netlist;
pub mod units;
pub mod validation;

#[cfg(test)]
mod tests;

pub use error::{Result, SchematicError};
pub use instance::{Instance, ParamValue};
pub use module::{Module, Pin, PinDirection};
pub use units::si_string;
pub use validation::{Cause, IssueSet, Severity, ValidatorIssue};
