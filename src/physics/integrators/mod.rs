//! Numerical integration methods for recording n-body trajectories

use crate::error::Result;
use crate::physics::math::{Scalar, Snapshot, SnapshotView};
use serde::{Deserialize, Serialize};

pub mod stormer_verlet;
pub mod symplectic_euler;

pub use stormer_verlet::StormerVerlet;
pub use symplectic_euler::SymplecticEuler;

/// Acceleration of every particle as a function of all positions.
pub trait AccelerationField {
    /// Returns the `(dim, N)` acceleration for the `(dim, N)` positions `r`.
    fn at(&self, r: SnapshotView<'_>) -> Result<Snapshot>;
}

/// Positions, velocities and the acceleration evaluated at the current
/// positions, all `(dim, N)`, plus the current time.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    pub r: Snapshot,
    pub v: Snapshot,
    pub a: Snapshot,
    pub t: Scalar,
}

impl PhaseState {
    /// Builds a state and evaluates the initial acceleration.
    pub fn new(r: Snapshot, v: Snapshot, t: Scalar, field: &dyn AccelerationField) -> Result<Self> {
        let a = field.at(r.view())?;
        Ok(Self { r, v, a, t })
    }
}

/// Base trait for all integrators
pub trait Integrator {
    /// Advance the state by one time step.
    ///
    /// On return `state.a` holds the acceleration at the new positions, so
    /// consecutive steps never evaluate the field twice for the same `r`.
    /// Time bookkeeping is left to the caller.
    fn step(&self, state: &mut PhaseState, field: &dyn AccelerationField, dt: Scalar) -> Result<()>;

    fn name(&self) -> &'static str;

    fn convergence_order(&self) -> usize;
}

/// Integrators selectable from configuration and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[default]
    StormerVerlet,
    SymplecticEuler,
}

impl IntegratorKind {
    pub fn create(self) -> Box<dyn Integrator> {
        match self {
            IntegratorKind::StormerVerlet => Box::new(StormerVerlet),
            IntegratorKind::SymplecticEuler => Box::new(SymplecticEuler),
        }
    }
}
