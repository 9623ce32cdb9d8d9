//! Differential high-pass filter schematic.

use arcstr::ArcStr;
use indexmap::IndexMap;
use schematic::{si_string, Module, ParamValue, SchematicError};
use tracing::{span, Level};

use super::{HighPassDiffParams, MetalResInfo};
use crate::error::Result;

const TEMPLATE: &str = include_str!("../../netlist_info/high_pass_diff.toml");

/// Designs the differential high-pass filter.
pub fn design(params: &HighPassDiffParams) -> Result<Module> {
    let span = span!(Level::INFO, "design", cell = "high_pass_diff");
    let _guard = span.enter();

    let mut module = Module::from_template(TEMPLATE)?;
    let sub = params.sub();
    let has_res_in = params.res_in_info.is_some();
    let has_res_out = params.res_out_info.is_some();
    let res_out_pfx = if params.connect_res_to_cap_res_metal && has_res_out {
        "nc_"
    } else {
        ""
    };

    let (bias_p, bias_n) = if params.bias_diff {
        (arcstr::literal!("biasp"), arcstr::literal!("biasn"))
    } else {
        module.rename_pin("biasp", "bias")?;
        module.remove_pin("biasn")?;
        (arcstr::literal!("bias"), arcstr::literal!("bias"))
    };

    let unit_params: IndexMap<ArcStr, ParamValue> = [
        (arcstr::literal!("l"), ParamValue::from(params.l)),
        (arcstr::literal!("w"), ParamValue::from(params.w)),
        (arcstr::literal!("intent"), ParamValue::from(params.intent.clone())),
    ]
    .into_iter()
    .collect();

    // Resistors
    for (inst, out, bias) in [
        ("XRESP", format!("{res_out_pfx}outp"), &bias_p),
        ("XRESN", format!("{res_out_pfx}outn"), &bias_n),
    ] {
        module.design_resistor(
            inst,
            &unit_params,
            params.nser,
            1,
            &out,
            bias,
            &format!("{out}_x"),
            &sub,
            true,
        )?;
    }

    // Dummies
    let dum_conns = if params.connect_dum_to_sub {
        [sub.clone(), sub.clone()]
    } else {
        [bias_p.clone(), bias_n.clone()]
    };
    let dum_mid_pfx = if dum_conns[0] == dum_conns[1] {
        [arcstr::format!("{sub}_p"), arcstr::format!("{sub}_n")]
    } else {
        dum_conns.clone()
    };
    let (ndum_par, ndum_ser, dum_connect_mid) = params.ndum.resolve();
    for ((inst, conn), mid_pfx) in ["XRESPD", "XRESND"]
        .into_iter()
        .zip(dum_conns.iter())
        .zip(dum_mid_pfx.iter())
    {
        if params.ndum.is_empty() {
            module.remove_instance(inst)?;
        } else {
            module.design_resistor(
                inst,
                &unit_params,
                ndum_ser,
                ndum_par,
                conn,
                conn,
                &format!("{mid_pfx}_dum_x"),
                &sub,
                dum_connect_mid,
            )?;
        }
    }

    // Metal resistors
    for (info, insts) in [
        (params.res_in_info, ["XMRESP1", "XMRESN1"]),
        (params.res_out_info, ["XMRESP2", "XMRESN2"]),
    ] {
        for inst in insts {
            match info {
                Some(MetalResInfo(layer, w, l)) => {
                    module
                        .instance_mut(inst)?
                        .design([("layer", layer), ("w", w), ("l", l)]);
                }
                None => {
                    module.remove_instance(inst)?;
                }
            }
        }
    }

    // Capacitors
    let caps = [
        ("XCAPP", "inp", "outp", &bias_p),
        ("XCAPN", "inn", "outn", &bias_n),
    ];
    if params.extracted {
        for (inst, ..) in caps {
            module.remove_instance(inst)?;
        }
    } else {
        let cap_in_pfx = if has_res_in { "nc_" } else { "" };
        let cap_out_pfx = if has_res_out { "nc_" } else { "" };
        let [cc, cpb, cpi, cpo] = params.cap_val.values();
        for (inst, in_name, out_name, bias) in caps {
            let mut cap_info = vec![(
                format!("{inst}C"),
                cc,
                arcstr::format!("{cap_in_pfx}{in_name}"),
                arcstr::format!("{cap_out_pfx}{out_name}"),
            )];
            for (suffix, val, plus) in [
                ("PB", cpb, bias.clone()),
                ("PI", cpi, ArcStr::from(in_name)),
                ("PO", cpo, ArcStr::from(out_name)),
            ] {
                if val != 0. {
                    cap_info.push((format!("{inst}{suffix}"), val, plus, sub.clone()));
                }
            }
            let names: Vec<&str> = cap_info.iter().map(|(name, ..)| name.as_str()).collect();
            module.array_instance(inst, &names)?;
            for (name, val, plus, minus) in cap_info {
                module.instance_mut(&name)?.set_param("c", si_string(val));
                module.reconnect_instance(&name, [("PLUS", plus), ("MINUS", minus)])?;
            }
        }
    }

    module.rename_pin("BULK", sub.clone())?;
    tracing::debug!(
        num_instances = module.instances().count(),
        %sub,
        "designed high-pass filter"
    );

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
