use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayView3};

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// Per-particle masses, length `N`
pub type MassVector = Array1<Scalar>;

/// Pairwise mass products, `(N, N)`
pub type MassMatrix = Array2<Scalar>;

/// One snapshot of positions or velocities, `(dimension, N)`
pub type Snapshot = Array2<Scalar>;

/// Snapshots over time, `(timesteps, dimension, N)`
pub type SnapshotSeries = Array3<Scalar>;

pub type SnapshotView<'a> = ArrayView2<'a, Scalar>;
pub type SnapshotSeriesView<'a> = ArrayView3<'a, Scalar>;
pub type MassView<'a> = ArrayView1<'a, Scalar>;

/// Round to the nearest 1e-10 so accumulated step times stay on the record grid.
pub fn round_time(value: Scalar) -> Scalar {
    libm::round(value * 1e10) * 1e-10
}
