//! Command line interface for orbitplot

use clap::Parser;
use ndarray::Array1;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::energy::relative_energy_drift;
use crate::error::Error;
use crate::physics::integrators::IntegratorKind;
use crate::physics::{NewtonianGravity, Scalar};
use crate::plotting::{
    Colormap, Figure, OutputFormat, plot_energy_evolution, plot_trajectories_with,
    render_to_file,
};
use crate::scenario::Scenario;
use crate::simulation::{Recording, simulate};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ")");

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration file could not be loaded
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    /// Configuration file could not be written
    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    /// A setting is outside the range the simulation can run with
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// orbitplot - energy and trajectory plots for N-body gravity simulations
#[derive(Parser, Debug)]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial conditions to simulate
    #[arg(long, value_enum, value_name = "SCENARIO")]
    pub scenario: Option<Scenario>,

    /// Number of bodies in a random cluster (overrides config file)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub bodies: Option<usize>,

    /// Random seed for cluster generation
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Gravitational constant (overrides config file)
    #[arg(short = 'g', long, value_name = "VALUE")]
    pub gravity: Option<Scalar>,

    /// Integration scheme
    #[arg(short = 'i', long, value_enum, value_name = "TYPE")]
    pub integrator: Option<IntegratorKind>,

    /// Total simulated time
    #[arg(long, value_name = "TIME")]
    pub iteration_time: Option<Scalar>,

    /// Integration step
    #[arg(long, value_name = "STEP")]
    pub dt: Option<Scalar>,

    /// Simulated time between recorded snapshots
    #[arg(long, value_name = "TIME")]
    pub record_interval: Option<Scalar>,

    /// Keep the initial center-of-mass velocity
    #[arg(long)]
    pub no_zero_momentum: bool,

    /// Directory the plots are written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Image format of the plots
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Colormap for time-colored trajectory points
    #[arg(long, value_enum, value_name = "NAME")]
    pub colormap: Option<Colormap>,

    /// Disable timestamp in filenames for predictable names
    #[arg(long)]
    pub no_timestamp: bool,

    /// Write the effective configuration to FILE
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<AnalysisConfig, CliError> {
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        AnalysisConfig::load_or_default(config_path)
    } else {
        AnalysisConfig::load_from_user_config()
    };

    let config = apply_overrides(config, args);
    validate(&config)?;
    Ok(config)
}

fn apply_overrides(mut config: AnalysisConfig, args: &Args) -> AnalysisConfig {
    if let Some(scenario) = args.scenario {
        info!("Using scenario: {}", scenario.name());
        config.scenario.kind = scenario;
    }

    if let Some(body_count) = args.bodies {
        info!("Overriding body count to: {body_count}");
        config.scenario.body_count = body_count;
    }

    if let Some(seed) = args.seed {
        info!("Using random seed: {seed}");
        config.scenario.seed = Some(seed);
    }

    if let Some(gravity) = args.gravity {
        info!("Overriding gravitational constant to: {gravity}");
        config.physics.gravitational_constant = gravity;
    }

    if let Some(integrator) = args.integrator {
        info!("Using integrator: {integrator:?}");
        config.physics.integrator = integrator;
    }

    if let Some(iteration_time) = args.iteration_time {
        config.simulation.iteration_time = iteration_time;
    }

    if let Some(dt) = args.dt {
        config.simulation.dt = dt;
    }

    if let Some(record_interval) = args.record_interval {
        config.simulation.record_interval = record_interval;
    }

    if args.no_zero_momentum {
        config.simulation.zero_momentum = false;
    }

    if let Some(output_dir) = &args.output_dir {
        config.output.directory = output_dir.clone();
    }

    if let Some(format) = args.format {
        config.rendering.format = format;
    }

    if let Some(colormap) = args.colormap {
        config.rendering.trajectories.colormap = colormap;
    }

    if args.no_timestamp {
        config.output.timestamp = false;
    }

    config
}

fn validate(config: &AnalysisConfig) -> Result<(), CliError> {
    let simulation = &config.simulation;
    let checks = [
        ("dt", simulation.dt, simulation.dt > 0.0),
        (
            "record_interval",
            simulation.record_interval,
            simulation.record_interval > 0.0,
        ),
        (
            "iteration_time",
            simulation.iteration_time,
            simulation.iteration_time >= 0.0,
        ),
        (
            "gravitational_constant",
            config.physics.gravitational_constant,
            config.physics.gravitational_constant >= 0.0,
        ),
        (
            "cluster_radius",
            config.scenario.cluster_radius,
            config.scenario.cluster_radius > 0.0,
        ),
    ];

    for (name, value, in_range) in checks {
        if !value.is_finite() || !in_range {
            return Err(CliError::InvalidSetting(format!("{name} = {value}")));
        }
    }
    Ok(())
}

/// Writes the effective configuration so a run can be repeated
pub fn write_config(config: &AnalysisConfig, path: &Path) -> Result<(), CliError> {
    config
        .save(path)
        .map_err(|err| CliError::ConfigSave(format!("{}: {err}", path.display())))?;
    info!("Wrote configuration to {}", path.display());
    Ok(())
}

/// Figures and summary numbers produced by one run
#[derive(Debug)]
pub struct AnalysisOutput {
    pub recording: Recording,
    pub energy: Figure,
    pub trajectories: Figure,
    pub energy_drift: Scalar,
}

/// Builds the scenario, simulates it, and records both plots.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisOutput, Error> {
    let gravity = NewtonianGravity::new(config.physics.gravitational_constant);
    let initial = config
        .scenario
        .kind
        .initial_conditions(&config.scenario, gravity.gravitational_constant)?;
    let integrator = config.physics.integrator.create();

    let recording = simulate(
        &gravity,
        integrator.as_ref(),
        initial.r,
        initial.v,
        0.0,
        initial.mass.view(),
        &config.simulation,
    )?;

    let mut energy = Figure::new();
    plot_energy_evolution(
        &mut energy,
        &gravity,
        recording.rs.view(),
        recording.vs.view(),
        recording.ts.view(),
        initial.mass.view(),
    )?;

    let mut trajectories = Figure::new();
    plot_trajectories_with(
        &mut trajectories,
        recording.rs.view(),
        recording.ts.view(),
        config.simulation.iteration_time,
        &config.rendering.trajectories,
    )?;

    let energy_drift = energy
        .lines()
        .next()
        .map(|line| relative_energy_drift(&Array1::from_vec(line.ys.clone())))
        .unwrap_or(0.0);

    Ok(AnalysisOutput {
        recording,
        energy,
        trajectories,
        energy_drift,
    })
}

/// Output file for a plot, e.g. `energy_20240101_120000.svg`
pub fn output_path(config: &AnalysisConfig, stem: &str, timestamp: Option<&str>) -> PathBuf {
    let extension = config.rendering.format.extension();
    let name = match timestamp {
        Some(timestamp) if config.output.timestamp => format!("{stem}_{timestamp}.{extension}"),
        _ => format!("{stem}.{extension}"),
    };
    config.output.directory.join(name)
}

/// Renders both figures into the configured output directory.
pub fn save_figures(
    config: &AnalysisConfig,
    output: &AnalysisOutput,
    timestamp: Option<&str>,
) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(&config.output.directory)?;

    let mut written = Vec::new();
    for (stem, figure) in [
        ("energy", &output.energy),
        ("trajectories", &output.trajectories),
    ] {
        let path = output_path(config, stem, timestamp);
        render_to_file(figure, &path, &config.rendering.canvas)?;
        info!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}
