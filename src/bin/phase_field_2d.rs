// src/bin/phase_field_2d.rs
//
// Grow a pure-nickel dendrite from a corner nucleus.
//
// Run:
//   cargo run --release --bin phase_field_2d -- --output output --verbose
//
// Outputs (per output directory):
//   output/
//     ├── out.log              parameter table
//     ├── config.json          run provenance
//     ├── pf_stepNNNNNN.dat    snapshots every --save-every steps
//     └── pf_stepNNNNNN.png    (with --png)
//
// Convert a snapshot for ParaView with the `dat2vtk` binary.

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use dendrite_sim::config::{GeometryConfig, NumericsConfig, RunConfig, RunInfo};
use dendrite_sim::error::Result;
use dendrite_sim::grid::Shape2D;
use dendrite_sim::initial_states::set_nucleus_at_corner;
use dendrite_sim::io::SnapshotSeries;
use dendrite_sim::logging::init_logging;
use dendrite_sim::params::SimulationParameters;
use dendrite_sim::scalar_field::ScalarField2D;
use dendrite_sim::solver::{PhaseField2D, PredictScratch};
use dendrite_sim::stencil::Boundary;
use dendrite_sim::visualisation::{fmt_visual_square, save_phase_plot};

const DEFAULT_LAMBDA: f64 = 16.0;
const DEFAULT_U: f64 = -0.2;

#[derive(Parser, Debug)]
#[command(name = "phase_field_2d")]
#[command(about = "Anisotropic phase-field dendrite growth on a 2D grid")]
struct Args {
    /// Show the field in the terminal every snapshot
    #[arg(long)]
    verbose: bool,

    /// Output folder
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Number of time steps
    #[arg(long, default_value_t = 5000)]
    steps: usize,

    /// Snapshot stride in steps
    #[arg(long = "save-every", default_value_t = 100)]
    save_every: usize,

    /// Grid size (cells per side)
    #[arg(long, default_value_t = 80)]
    size: usize,

    /// Radius of the corner nucleus in cells
    #[arg(long, default_value_t = 10)]
    radius: usize,

    /// Coupling constant [default: 16.0, or the value in --params]
    #[arg(long, allow_negative_numbers = true)]
    lambda: Option<f64>,

    /// Dimensionless undercooling [default: -0.2, or the value in --params]
    #[arg(long, allow_negative_numbers = true)]
    u: Option<f64>,

    /// JSON file with physical parameters (defaults to pure Ni)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Stencil boundary policy: replicate | reflect | zero | periodic
    #[arg(long, default_value = "replicate")]
    boundary: Boundary,

    /// Also save a PNG heatmap with every snapshot
    #[arg(long)]
    png: bool,
}

fn load_params(args: &Args) -> Result<SimulationParameters> {
    let base = match &args.params {
        Some(path) => SimulationParameters::from_json_file(path)?,
        None => SimulationParameters::pure_ni(),
    };
    let or_default = |v: f64, d: f64| if v == 0.0 { d } else { v };
    let u = args.u.unwrap_or(or_default(base.u, DEFAULT_U));
    let lambda = args.lambda.unwrap_or(or_default(base.lambda, DEFAULT_LAMBDA));
    let mut params = base.with_inputs(u, lambda);
    params.setup()?;
    Ok(params)
}

fn write_param_log(out_dir: &Path, params: &SimulationParameters) -> Result<()> {
    let mut f = File::create(out_dir.join("out.log"))?;
    writeln!(f, "{params}")?;
    Ok(())
}

fn wait_for_enter() -> io::Result<()> {
    println!("[Enter] to continue...");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn show(step: usize, dt: f64, phi: &ScalarField2D) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // Clear screen, cursor home.
    write!(out, "\x1B[2J\x1B[H")?;
    writeln!(
        out,
        "time: {:>10.4} [ns] (step:{:>6})",
        step as f64 * dt * 1.0e9,
        step
    )?;
    fmt_visual_square(&mut out, phi)?;
    writeln!(out)?;
    out.flush()
}

fn run(args: &Args) -> Result<()> {
    fs::create_dir_all(&args.output)?;

    let params = load_params(args)?;
    info!("simulation parameters:\n{params}");
    write_param_log(&args.output, &params)?;

    let dt = params.dt()?;
    let run_config = RunConfig {
        geometry: GeometryConfig {
            shape: Shape2D::new(args.size, args.size),
            dx: params.dx()?,
            nucleus_radius: args.radius,
        },
        material: params.clone(),
        numerics: NumericsConfig {
            integrator: "euler".to_string(),
            dt,
            steps: args.steps,
            output_stride: args.save_every,
            boundary: args.boundary,
        },
        run: RunInfo {
            binary: "phase_field_2d".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };
    run_config.write_to_dir(&args.output)?;

    let solver = PhaseField2D::with_boundary(&params, args.boundary)?;
    let mut phi = ScalarField2D::new(Shape2D::new(args.size, args.size));
    set_nucleus_at_corner(&mut phi, args.radius)?;
    let mut phi_next = ScalarField2D::like(&phi);
    let mut scratch = PredictScratch::new(phi.shape());
    let mut series = SnapshotSeries::new(args.output.clone(), args.save_every)?;

    if args.verbose {
        wait_for_enter()?;
    }

    for step in 0..args.steps {
        if let Some(path) = series.maybe_write(step, &phi)? {
            if args.verbose {
                show(step, dt, &phi)?;
            }
            if args.png {
                save_phase_plot(&phi, &path.with_extension("png"))?;
            }
        }
        solver.predict_with_scratch(&phi, &mut phi_next, &mut scratch)?;
        std::mem::swap(&mut phi, &mut phi_next);
    }
    let path = series.write_final(args.steps, &phi)?;
    if args.png {
        save_phase_plot(&phi, &path.with_extension("png"))?;
    }

    info!(
        snapshots = series.written(),
        elapsed_ns = args.steps as f64 * dt * 1.0e9,
        "result is saved in {}",
        args.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
