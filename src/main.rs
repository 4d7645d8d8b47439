use anyhow::Context;
use clap::Parser;
use orbitplot::cli::{self, Args};
use tracing::{Level, info, warn};

/// Relative drift above which a run is reported as poorly conserving energy
const DRIFT_WARNING_THRESHOLD: f64 = 1e-2;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .init();

    let config = cli::load_and_apply_config(&args)?;

    if let Some(path) = &args.write_config {
        cli::write_config(&config, path)?;
    }

    let output = cli::run_analysis(&config).context("analysis failed")?;

    if output.energy_drift > DRIFT_WARNING_THRESHOLD {
        warn!(
            "Relative energy drift {:.3e} exceeds {:.0e}; consider a smaller --dt",
            output.energy_drift, DRIFT_WARNING_THRESHOLD
        );
    } else {
        info!("Relative energy drift: {:.3e}", output.energy_drift);
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let written = cli::save_figures(&config, &output, Some(&timestamp))
        .with_context(|| format!("failed to write plots to {}", config.output.directory.display()))?;

    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}
