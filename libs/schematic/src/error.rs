//! Schematic result and error types.

use arcstr::ArcStr;

/// The [`SchematicError`] result type.
pub type Result<T, E = SchematicError> = std::result::Result<T, E>;

/// A schematic error.
#[derive(thiserror::Error, Debug)]
pub enum SchematicError {
    /// A netlist template could not be parsed.
    #[error("error parsing netlist template: {0}")]
    Template(#[from] toml::de::Error),
    /// The module has no pin of the given name.
    #[error("module `{module}` has no pin named `{pin}`")]
    MissingPin {
        /// The module name.
        module: ArcStr,
        /// The requested pin.
        pin: ArcStr,
    },
    /// A pin with the given name already exists.
    #[error("module `{module}` already has a pin named `{pin}`")]
    DuplicatePin {
        /// The module name.
        module: ArcStr,
        /// The duplicated pin.
        pin: ArcStr,
    },
    /// The module has no instance of the given name.
    #[error("module `{module}` has no instance named `{inst}`")]
    MissingInstance {
        /// The module name.
        module: ArcStr,
        /// The requested instance.
        inst: ArcStr,
    },
    /// An instance with the given name already exists.
    #[error("module `{module}` already has an instance named `{inst}`")]
    DuplicateInstance {
        /// The module name.
        module: ArcStr,
        /// The duplicated instance.
        inst: ArcStr,
    },
    /// An instance has no terminal of the given name.
    #[error("instance `{inst}` has no terminal named `{terminal}`")]
    MissingTerminal {
        /// The instance name.
        inst: ArcStr,
        /// The requested terminal.
        terminal: ArcStr,
    },
    /// A resistor cannot be built from the requested number of units.
    #[error("cannot design resistor `{inst}` with {nser} in series and {npar} in parallel")]
    InvalidResistorCount {
        /// The instance name.
        inst: ArcStr,
        /// Number of units in series.
        nser: usize,
        /// Number of units in parallel.
        npar: usize,
    },
    /// Validation found errors.
    #[error("module `{module}` failed validation with {num_errors} error(s)")]
    Validation {
        /// The module name.
        module: ArcStr,
        /// The number of errors found.
        num_errors: usize,
    },
}
