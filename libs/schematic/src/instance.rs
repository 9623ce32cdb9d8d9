//! Instances of cells within a schematic module.

use std::fmt::Display;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchematicError};

/// The value of an instance parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string, such as an SI-formatted number.
    String(ArcStr),
}

impl ParamValue {
    /// The value as a float, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(ArcStr::from(value))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(ArcStr::from(value))
    }
}

impl From<ArcStr> for ParamValue {
    fn from(value: ArcStr) -> Self {
        Self::String(value)
    }
}

/// An instance of a cell.
///
/// Connections map each terminal of the cell to a net of the parent module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    name: ArcStr,
    cell: ArcStr,
    #[serde(default)]
    connections: IndexMap<ArcStr, ArcStr>,
    #[serde(default)]
    params: IndexMap<ArcStr, ParamValue>,
}

impl Instance {
    /// Creates an unconnected instance of `cell`.
    pub fn new(name: impl Into<ArcStr>, cell: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            cell: cell.into(),
            connections: IndexMap::new(),
            params: IndexMap::new(),
        }
    }

    /// Connects `terminal` to `net`, returning the instance.
    pub fn with_connection(mut self, terminal: impl Into<ArcStr>, net: impl Into<ArcStr>) -> Self {
        self.connect(terminal, net);
        self
    }

    /// Sets parameter `key`, returning the instance.
    pub fn with_param(mut self, key: impl Into<ArcStr>, value: impl Into<ParamValue>) -> Self {
        self.set_param(key, value);
        self
    }

    /// The instance name.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: ArcStr) {
        self.name = name;
    }

    /// The name of the instantiated cell.
    pub fn cell(&self) -> &ArcStr {
        &self.cell
    }

    /// Terminal to net connections, in terminal order.
    pub fn connections(&self) -> &IndexMap<ArcStr, ArcStr> {
        &self.connections
    }

    /// The net connected to `terminal`.
    pub fn connection(&self, terminal: &str) -> Option<&ArcStr> {
        self.connections.get(terminal)
    }

    pub(crate) fn connections_mut(&mut self) -> &mut IndexMap<ArcStr, ArcStr> {
        &mut self.connections
    }

    /// Connects `terminal` to `net`, adding the terminal if it is new.
    pub fn connect(&mut self, terminal: impl Into<ArcStr>, net: impl Into<ArcStr>) {
        self.connections.insert(terminal.into(), net.into());
    }

    /// Reconnects an existing terminal to `net`.
    pub fn reconnect(&mut self, terminal: &str, net: impl Into<ArcStr>) -> Result<()> {
        let slot = self
            .connections
            .get_mut(terminal)
            .ok_or_else(|| SchematicError::MissingTerminal {
                inst: self.name.clone(),
                terminal: ArcStr::from(terminal),
            })?;
        *slot = net.into();
        Ok(())
    }

    /// Instance parameters.
    pub fn params(&self) -> &IndexMap<ArcStr, ParamValue> {
        &self.params
    }

    /// Gets parameter `key`.
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Sets parameter `key` to `value`.
    pub fn set_param(&mut self, key: impl Into<ArcStr>, value: impl Into<ParamValue>) {
        self.params.insert(key.into(), value.into());
    }

    /// Sets every parameter in `params`.
    pub fn design<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<ArcStr>,
        V: Into<ParamValue>,
    {
        for (key, value) in params {
            self.set_param(key, value);
        }
    }
}
