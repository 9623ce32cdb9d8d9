//! RDAC schematic.

use schematic::{Instance, Module, PinDirection, SchematicError};
use tracing::{span, Level};

use super::{dec_pin_name, RdacSchParams};
use crate::error::{Error, Result};

/// Builds the RDAC schematic from the parameters reported by its layout.
pub fn design(params: &RdacSchParams) -> Result<Module> {
    let span = span!(Level::INFO, "design", cell = "rdac", num_dec = params.num_dec);
    let _guard = span.enter();

    let num_dec = params.num_dec;
    if !(1..=2).contains(&num_dec) {
        return Err(Error::UnsupportedDecoderCount(num_dec));
    }
    let num_sel = params.dec_params.num_sel();
    let num_in = params.dec_params.num_in();
    if params.res_params.num_taps() != num_in {
        return Err(Error::InvalidParams(arcstr::format!(
            "resistor ladder has {} taps but the decoder has {num_in} inputs",
            params.res_params.num_taps()
        )));
    }

    let mut module = Module::new("rdac");
    for dec in 0..num_dec {
        for bit in 0..num_sel {
            module.add_pin(dec_pin_name("sel", dec, num_dec, Some(bit)), PinDirection::Input)?;
        }
    }
    for dec in 0..num_dec {
        module.add_pin(dec_pin_name("out", dec, num_dec, None), PinDirection::Output)?;
    }
    module.add_pin("VDD", PinDirection::InOut)?;
    module.add_pin("VSS", PinDirection::InOut)?;

    let mut res = Instance::new("XRES", "res_ladder")
        .with_param("nx", params.res_params.nx)
        .with_param("ny", params.res_params.ny);
    for idx in 0..num_in {
        res.connect(arcstr::format!("out<{idx}>"), arcstr::format!("in<{idx}>"));
    }
    module.add_instance(res.with_connection("VDD", "VDD").with_connection("VSS", "VSS"))?;

    for dec in 0..num_dec {
        let name = if num_dec == 1 {
            "XDEC".to_string()
        } else {
            format!("XDEC{dec}")
        };
        let mut inst = Instance::new(name, "rdac_decoder")
            .with_param("num_sel_row", params.dec_params.num_sel_row)
            .with_param("num_sel_col", params.dec_params.num_sel_col);
        for idx in 0..num_in {
            let net = arcstr::format!("in<{idx}>");
            inst.connect(net.clone(), net);
        }
        for bit in 0..num_sel {
            inst.connect(
                arcstr::format!("sel<{bit}>"),
                dec_pin_name("sel", dec, num_dec, Some(bit)),
            );
        }
        inst.connect("out", dec_pin_name("out", dec, num_dec, None));
        module.add_instance(inst.with_connection("VDD", "VDD").with_connection("VSS", "VSS"))?;
    }

    let issues = module.validate();
    if issues.has_error() {
        return Err(SchematicError::Validation {
            module: module.name().clone(),
            num_errors: issues.num_errors(),
        }
        .into());
    }
    Ok(module)
}
