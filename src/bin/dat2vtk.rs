// src/bin/dat2vtk.rs
//
// Convert a phase-field snapshot (.dat) into a VTK ImageData file (.vti).
// The quadrant is mirrored into the full four-fold crystal unless --no-mirror.
//
// Run:
//   cargo run --release --bin dat2vtk -- --input output/pf_step004900.dat
//
// Output:
//   vtk/pf_step004900.vti

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use dendrite_sim::error::{PhaseFieldError, Result};
use dendrite_sim::io::read_snapshot;
use dendrite_sim::logging::init_logging;
use dendrite_sim::vtk::{mirror_four_fold, write_vti};

#[derive(Parser, Debug)]
#[command(name = "dat2vtk", about = "Convert a .dat snapshot to VTK ImageData")]
struct Args {
    /// Input .dat file
    #[arg(long)]
    input: PathBuf,

    /// Output folder
    #[arg(long, default_value = "vtk")]
    output: PathBuf,

    /// Output file name [default: <input basename>.vti]
    #[arg(long)]
    name: Option<PathBuf>,

    /// Export the stored quadrant only
    #[arg(long)]
    no_mirror: bool,
}

fn output_name(args: &Args) -> Result<PathBuf> {
    if let Some(name) = &args.name {
        return Ok(name.clone());
    }
    let stem = args
        .input
        .file_name()
        .ok_or_else(|| PhaseFieldError::file(&args.input, "has no file name"))?;
    Ok(PathBuf::from(stem).with_extension("vti"))
}

fn run(args: &Args) -> Result<PathBuf> {
    let field = read_snapshot(&args.input)?;
    let image = if args.no_mirror {
        field
    } else {
        mirror_four_fold(&field)
    };
    let path = args.output.join(output_name(args)?);
    write_vti(&path, &image)?;
    info!(shape = %image.shape(), "wrote {}", path.display());
    Ok(path)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(&args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
