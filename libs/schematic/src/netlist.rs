//! SPICE netlisting.

use std::io::Write;

use crate::module::Module;

impl Module {
    /// Writes the module as a SPICE subcircuit.
    ///
    /// Instances are written as subcircuit calls, with nets in terminal order
    /// followed by the cell name and parameters.
    pub fn write_spice<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "* {}", self.name())?;
        write!(out, ".SUBCKT {}", self.name())?;
        for pin in self.pins() {
            write!(out, " {}", pin.name)?;
        }
        writeln!(out)?;

        for inst in self.instances() {
            write!(out, "{}", inst.name())?;
            for net in inst.connections().values() {
                write!(out, " {}", net)?;
            }
            write!(out, " {}", inst.cell())?;
            for (key, value) in inst.params() {
                write!(out, " {key}={value}")?;
            }
            writeln!(out)?;
        }

        writeln!(out, ".ENDS {}", self.name())
    }

    /// Returns the SPICE netlist of the module as a string.
    pub fn to_spice(&self) -> std::io::Result<String> {
        let mut buf = Vec::new();
        self.write_spice(&mut buf)?;
        String::from_utf8(buf).map_err(std::io::Error::other)
    }
}
