//! Generator result and error types.

use arcstr::ArcStr;
use layout::LayoutError;
use routing::RoutingError;
use schematic::SchematicError;

/// A result type returning generator errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for the analog generators.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error in a layout-related routine.
    #[error("error in layout: {0}")]
    Layout(#[from] LayoutError),
    /// An error in a routing grid computation.
    #[error("error in routing: {0}")]
    Routing(#[from] RoutingError),
    /// An error in a schematic-related routine.
    #[error("error in schematic: {0}")]
    Schematic(#[from] SchematicError),
    /// A configuration file could not be parsed.
    #[error("error parsing configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// The requested number of decoders is not supported.
    #[error("num_dec={0} is not supported; use 1 or 2")]
    UnsupportedDecoderCount(usize),
    /// The sub-blocks violate a geometric assumption of the assembler.
    #[error("precondition violated: {0}")]
    Precondition(ArcStr),
    /// The generator parameters are inconsistent.
    #[error("invalid parameters: {0}")]
    InvalidParams(ArcStr),
}
