use super::figure::{Figure, LineStyle};
use crate::energy::total_energy_over_time;
use crate::error::{Error, Result};
use crate::physics::PhysicsProvider;
use crate::physics::math::{MassView, Scalar, SnapshotSeriesView};
use ndarray::ArrayView1;

/// Draws total energy against time as a single line on `figure`.
///
/// Nothing is recorded on the figure if any input shape disagrees.
pub fn plot_energy_evolution<P: PhysicsProvider + ?Sized>(
    figure: &mut Figure,
    provider: &P,
    rs: SnapshotSeriesView<'_>,
    vs: SnapshotSeriesView<'_>,
    ts: ArrayView1<'_, Scalar>,
    mass: MassView<'_>,
) -> Result<()> {
    if ts.len() != rs.shape()[0] {
        return Err(Error::shape_mismatch("timestamp count", rs.shape()[0], ts.len()));
    }
    let energies = total_energy_over_time(provider, rs, vs, mass)?;

    figure.set_title("Energy evolution");
    figure.set_xlabel("Time");
    figure.set_ylabel("Energy");
    figure.plot(ts.to_vec(), energies.to_vec(), LineStyle::default())
}
