//! Physics layer: the provider interface the analysis code consumes, a
//! Newtonian reference implementation, and the integrators used to record
//! trajectories.

pub mod integrators;
pub mod math;
pub mod newtonian;

pub use math::Scalar;
pub use newtonian::NewtonianGravity;

use crate::error::Result;
use math::{MassMatrix, MassView, SnapshotView};
use ndarray::{Array1, Array2, ArrayView2};

/// Source of the per-snapshot energy terms.
///
/// Implementations must be pure and deterministic. `gravity_potential` returns
/// one entry per ordered pair, so each unordered pair appears twice in the sum.
pub trait PhysicsProvider {
    /// Builds the `(N, N)` pairwise mass structure used by `gravity_potential`.
    fn mass_matrix(&self, mass: MassView<'_>) -> Result<MassMatrix>;

    /// Pairwise potential energies for one position snapshot, `(N, N)`.
    fn gravity_potential(
        &self,
        r: SnapshotView<'_>,
        mass_matrix: ArrayView2<'_, Scalar>,
    ) -> Result<Array2<Scalar>>;

    /// Per-particle kinetic energies for one velocity snapshot, length `N`.
    fn kinetic_energy(&self, v: SnapshotView<'_>, mass: MassView<'_>) -> Result<Array1<Scalar>>;
}
