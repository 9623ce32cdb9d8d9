//! Differential high-pass filter.
//!
//! Each side of the filter is a capacitor from input to output and a resistor
//! from output to a bias node. The schematic is edited from a netlist template
//! according to [`HighPassDiffParams`].

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod schematic;

#[cfg(test)]
mod tests;

pub use self::schematic::design;

/// The number of dummy resistors on each side.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DummyCount {
    /// A number of dummies in parallel.
    Count(usize),
    /// `(parallel, series)` dummies with shared intermediate nets.
    Grid(usize, usize),
    /// `(parallel, series, connect_mid)` dummies.
    GridMid(usize, usize, bool),
}

impl DummyCount {
    /// Returns `(parallel, series, connect_mid)`.
    pub fn resolve(&self) -> (usize, usize, bool) {
        match *self {
            DummyCount::Count(par) => (par, 1, true),
            DummyCount::Grid(par, ser) => (par, ser, true),
            DummyCount::GridMid(par, ser, connect_mid) => (par, ser, connect_mid),
        }
    }

    /// Returns `true` if no dummies are drawn.
    pub fn is_empty(&self) -> bool {
        let (par, ser, _) = self.resolve();
        par == 0 || ser == 0
    }
}

/// A metal resistor given as `(layer, w, l)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MetalResInfo(pub i64, pub i64, pub i64);

/// The schematic value of each filter capacitor.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapVal {
    /// An ideal capacitor.
    Ideal(f64),
    /// The main capacitance followed by parasitics at the bias, input and output nodes.
    WithParasitics([f64; 4]),
}

impl CapVal {
    /// Returns `[cc, cpb, cpi, cpo]`.
    pub fn values(&self) -> [f64; 4] {
        match *self {
            CapVal::Ideal(cc) => [cc, 0., 0., 0.],
            CapVal::WithParasitics(vals) => vals,
        }
    }
}

impl Default for CapVal {
    fn default() -> Self {
        CapVal::Ideal(1e-9)
    }
}

fn sub_name_default() -> ArcStr {
    arcstr::literal!("VDD")
}

fn true_default() -> bool {
    true
}

/// Parameters of the differential high-pass filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighPassDiffParams {
    /// Unit resistor length, in resolution units.
    pub l: i64,
    /// Unit resistor width, in resolution units.
    pub w: i64,
    /// Resistor type.
    pub intent: ArcStr,
    /// Number of resistors in series in a branch.
    pub nser: usize,
    /// Number of dummy resistors.
    pub ndum: DummyCount,
    /// Input metal resistor, if any.
    #[serde(default)]
    pub res_in_info: Option<MetalResInfo>,
    /// Output metal resistor, if any.
    #[serde(default)]
    pub res_out_info: Option<MetalResInfo>,
    /// Substrate net name. Empty to keep the `BULK` pin.
    #[serde(default = "sub_name_default")]
    pub sub_name: ArcStr,
    /// Differential bias (`biasp`, `biasn`) if `true`, common-mode `bias` otherwise.
    #[serde(default = "true_default")]
    pub bias_diff: bool,
    /// Connect the resistors to the floating node of the output metal resistor
    /// instead of the outputs.
    #[serde(default = "true_default")]
    pub connect_res_to_cap_res_metal: bool,
    /// Connect the dummy resistors to the substrate instead of the bias nets.
    #[serde(default)]
    pub connect_dum_to_sub: bool,
    /// Capacitor values.
    #[serde(default)]
    pub cap_val: CapVal,
    /// Removes the ideal capacitors for LVS and extraction.
    #[serde(default)]
    pub extracted: bool,
}

impl HighPassDiffParams {
    /// Parses parameters from TOML.
    pub fn from_toml(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// The substrate net name.
    pub fn sub(&self) -> ArcStr {
        if self.sub_name.is_empty() {
            arcstr::literal!("BULK")
        } else {
            self.sub_name.clone()
        }
    }
}
