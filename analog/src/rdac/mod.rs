//! Resistor DAC: one resistor ladder feeding one or two decoders.
//!
//! The layout assembler places the sub-blocks, aligns the ladder taps with
//! the decoder pass gates and routes selects, outputs and supplies up to the
//! layer above the decoder's top layer. The schematic is derived from the
//! parameters reported by the layout.

use routing::TrackSpecs;
use serde::{Deserialize, Serialize};

use crate::rdac_decoder::{RdacDecoderParams, RdacDecoderSchParams};
use crate::res_ladder::{ResLadderParams, ResLadderSchParams};

pub mod layout;
pub mod schematic;

#[cfg(test)]
mod tests;

pub use self::layout::Rdac;

fn num_dec_default() -> usize {
    1
}

/// Parameters of the RDAC assembly.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RdacParams {
    /// Track widths for the track manager.
    #[serde(default)]
    pub tr_widths: Vec<routing::WidthRule>,
    /// Track spaces for the track manager.
    #[serde(default)]
    pub tr_spaces: Vec<routing::SpaceRule>,
    /// Parameters of the resistor ladder.
    pub res_params: ResLadderParams,
    /// Parameters of each decoder.
    pub dec_params: RdacDecoderParams,
    /// Number of decoders sharing the resistor ladder.
    #[serde(default = "num_dec_default")]
    pub num_dec: usize,
}

impl RdacParams {
    /// Parses parameters from TOML.
    pub fn from_toml(src: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub(crate) fn track_specs(&self) -> TrackSpecs {
        TrackSpecs {
            widths: self.tr_widths.clone(),
            spaces: self.tr_spaces.clone(),
        }
    }
}

/// Schematic parameters reported by the RDAC layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RdacSchParams {
    /// Schematic parameters of the resistor ladder.
    pub res_params: ResLadderSchParams,
    /// Schematic parameters of each decoder.
    pub dec_params: RdacDecoderSchParams,
    /// Number of decoders.
    pub num_dec: usize,
}

/// Returns the name of pin `base` on decoder `dec`, suffixed with the decoder index
/// when there are two decoders.
pub(crate) fn dec_pin_name(base: &str, dec: usize, num_dec: usize, bit: Option<usize>) -> String {
    let prefix = if num_dec == 1 {
        base.to_string()
    } else {
        format!("{base}{dec}")
    };
    match bit {
        Some(bit) => format!("{prefix}<{bit}>"),
        None => prefix,
    }
}
