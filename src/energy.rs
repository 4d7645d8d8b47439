//! Total mechanical energy over a recorded trajectory.

use crate::error::{Error, Result};
use crate::physics::PhysicsProvider;
use crate::physics::math::{MassView, Scalar, SnapshotSeriesView};
use ndarray::{Array1, Axis};

/// Potential plus kinetic energy at every recorded timestep.
///
/// `rs` and `vs` are `(timesteps, dim, N)`. The pairwise potential counts
/// every unordered pair twice, so its sum is halved. Errors raised by the
/// provider are passed through unchanged.
pub fn total_energy_over_time<P: PhysicsProvider + ?Sized>(
    provider: &P,
    rs: SnapshotSeriesView<'_>,
    vs: SnapshotSeriesView<'_>,
    mass: MassView<'_>,
) -> Result<Array1<Scalar>> {
    if rs.shape()[0] != vs.shape()[0] {
        return Err(Error::shape_mismatch(
            "velocity snapshot count",
            rs.shape()[0],
            vs.shape()[0],
        ));
    }

    let mass_matrix = provider.mass_matrix(mass)?;

    rs.axis_iter(Axis(0))
        .zip(vs.axis_iter(Axis(0)))
        .map(|(r, v)| {
            let potential = provider.gravity_potential(r, mass_matrix.view())?.sum() / 2.0;
            let kinetic = provider.kinetic_energy(v, mass)?.sum();
            Ok(potential + kinetic)
        })
        .collect::<Result<Vec<_>>>()
        .map(Array1::from)
}

/// Largest relative deviation of the series from its first value.
///
/// Falls back to the absolute deviation when the initial energy is ~0.
/// Any non-finite energy in the series yields infinite drift.
pub fn relative_energy_drift(energies: &Array1<Scalar>) -> Scalar {
    let Some(&initial) = energies.iter().next() else {
        return 0.0;
    };
    if energies.iter().any(|e| !e.is_finite()) {
        return Scalar::INFINITY;
    }
    let scale = if initial.abs() > 1e-12 {
        initial.abs()
    } else {
        1.0
    };
    energies
        .iter()
        .map(|e| (e - initial).abs() / scale)
        .fold(0.0, Scalar::max)
}
