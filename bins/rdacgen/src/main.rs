use anyhow::Context;
use clap::{Parser, Subcommand};
use layout::TemplateDb;
use schematic::Module;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use analog::high_pass_diff::{self, HighPassDiffParams};
use analog::rdac::{self, Rdac, RdacParams};
use analog::tech::Tech;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Rdac {
            tech,
            params,
            out,
            netlist,
        } => generate_rdac(&tech, &params, out.as_deref(), netlist.as_deref()),
        Command::Hpf { params, out } => generate_hpf(&params, out.as_deref()),
    }
}

/// Command line arguments.
#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "Generate resistor DAC layouts and differential high-pass filter netlists"
)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a resistor DAC layout.
    Rdac {
        /// The path to the technology file.
        #[arg(short, long)]
        tech: PathBuf,
        /// The path to the RDAC parameters.
        #[arg(short, long)]
        params: PathBuf,
        /// The path where the JSON layout summary should be saved.
        ///
        /// If unspecified, the summary will be written to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// The path where the SPICE netlist of the RDAC should be saved.
        #[arg(short, long)]
        netlist: Option<PathBuf>,
    },
    /// Design a differential high-pass filter.
    Hpf {
        /// The path to the filter parameters.
        #[arg(short, long)]
        params: PathBuf,
        /// The path where the SPICE netlist should be saved.
        ///
        /// If unspecified, the netlist will be written to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}.", path))
}

/// Writes `contents` to `path`, creating parent directories as needed, or to stdout.
fn write_output(path: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    if let Some(path) = path {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}.", parent))?;
        }
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}.", path))?;
        eprintln!("output: {:?}", path);
    } else {
        io::stdout()
            .lock()
            .write_all(contents.as_bytes())
            .with_context(|| "Failed to write to stdout.")?;
    }
    Ok(())
}

fn netlist(module: &Module) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    module
        .write_spice(&mut buf)
        .with_context(|| format!("Failed to netlist {}.", module.name()))?;
    Ok(String::from_utf8(buf)?)
}

/// Assembles an RDAC and writes its layout summary and, optionally, its netlist.
pub fn generate_rdac(
    tech: &Path,
    params: &Path,
    out: Option<&Path>,
    netlist_out: Option<&Path>,
) -> anyhow::Result<()> {
    let tech = Tech::from_toml(&read(tech)?).with_context(|| "Failed to parse technology file.")?;
    let params =
        RdacParams::from_toml(&read(params)?).with_context(|| "Failed to parse RDAC parameters.")?;
    let grid = tech.grid().with_context(|| "Invalid routing grid.")?;

    let master = TemplateDb::new(grid)
        .new_template(&Rdac::new(params))
        .with_context(|| "Failed to generate RDAC layout.")?;
    tracing::info!(bbox = ?master.bound_box(), "generated RDAC layout");

    let summary = serde_json::to_string_pretty(&master.layout().summary())?;
    write_output(out, &(summary + "\n"))?;

    if let Some(path) = netlist_out {
        let module =
            rdac::schematic::design(master.data()).with_context(|| "Failed to design RDAC schematic.")?;
        write_output(Some(path), &netlist(&module)?)?;
    }
    Ok(())
}

/// Designs a differential high-pass filter and writes its netlist.
pub fn generate_hpf(params: &Path, out: Option<&Path>) -> anyhow::Result<()> {
    let params = HighPassDiffParams::from_toml(&read(params)?)
        .with_context(|| "Failed to parse filter parameters.")?;
    let module =
        high_pass_diff::design(&params).with_context(|| "Failed to design high-pass filter.")?;
    write_output(out, &netlist(&module)?)
}
