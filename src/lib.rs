//! orbitplot library
//!
//! Energy conservation and trajectory plots for N-body gravity simulations,
//! exposed as a library so the binary, benches, and integration tests share
//! one implementation.

pub mod cli;
pub mod config;
pub mod energy;
pub mod error;
pub mod physics;
pub mod plotting;
pub mod scenario;
pub mod simulation;

pub use config::AnalysisConfig;
pub use energy::{relative_energy_drift, total_energy_over_time};
pub use error::{Error, Result};
pub use physics::{NewtonianGravity, PhysicsProvider};
pub use plotting::{Figure, plot_energy_evolution, plot_trajectories};
pub use simulation::{Recording, SimulationSettings, simulate};
