//! Newtonian point-mass gravity
//!
//! All pairwise quantities are indexed `[i, j]` for the effect of particle `j`
//! on particle `i`. Self-interaction entries are zero.

use super::PhysicsProvider;
use super::integrators::AccelerationField;
use super::math::{MassMatrix, MassView, Scalar, Snapshot, SnapshotView};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Array3, ArrayView2, ArrayView3, Axis};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub gravitational_constant: Scalar,
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self {
            gravitational_constant: 1.0,
        }
    }
}

impl NewtonianGravity {
    pub fn new(gravitational_constant: Scalar) -> Self {
        Self {
            gravitational_constant,
        }
    }

    /// Signed coordinate differences between all pairs, `(dim, N, N)`.
    ///
    /// `d[[k, i, j]] = r[[k, i]] - r[[k, j]]`
    pub fn pairwise_difference(&self, r: SnapshotView<'_>) -> Array3<Scalar> {
        let (dim, n) = r.dim();
        Array3::from_shape_fn((dim, n, n), |(k, i, j)| r[[k, i]] - r[[k, j]])
    }

    /// Gravity force on every particle `i` from every particle `j`, `(dim, N, N)`.
    pub fn gravity_force(
        &self,
        r: SnapshotView<'_>,
        mass_matrix: ArrayView2<'_, Scalar>,
    ) -> Result<Array3<Scalar>> {
        check_mass_matrix(r, mass_matrix)?;
        let diff = self.pairwise_difference(r);
        let distance_squared = diff.map_axis(Axis(0), |d| d.dot(&d));

        let (dim, n, _) = diff.dim();
        let force = Array3::from_shape_fn((dim, n, n), |(k, i, j)| {
            if i == j {
                return 0.0;
            }
            let d2 = distance_squared[[i, j]];
            let common = self.gravitational_constant * mass_matrix[[i, j]] / (d2 * libm::sqrt(d2));
            -common * diff[[k, i, j]]
        });
        Ok(force)
    }

    /// Sums pairwise forces per particle and divides by its mass, `(dim, N)`.
    pub fn acceleration(&self, force: ArrayView3<'_, Scalar>, mass: MassView<'_>) -> Result<Snapshot> {
        let (_, n, m) = force.dim();
        if n != m {
            return Err(Error::shape_mismatch("force matrix columns", n, m));
        }
        if mass.len() != n {
            return Err(Error::shape_mismatch("mass vector length", n, mass.len()));
        }
        Ok(force.sum_axis(Axis(2)) / &mass)
    }

    /// Shifts velocities so the total momentum of the system is zero.
    pub fn zero_momentum_frame(&self, v: SnapshotView<'_>, mass: MassView<'_>) -> Result<Snapshot> {
        check_particle_count("velocity snapshot", v, mass)?;
        let total_mass = mass.sum();
        if total_mass <= 0.0 {
            return Err(Error::InvalidMass(format!(
                "total mass must be positive, got {total_mass}"
            )));
        }
        let momentum = (&v * &mass).sum_axis(Axis(1));
        let center_velocity = momentum / total_mass;
        Ok(&v - &center_velocity.insert_axis(Axis(1)))
    }
}

impl PhysicsProvider for NewtonianGravity {
    fn mass_matrix(&self, mass: MassView<'_>) -> Result<MassMatrix> {
        if let Some((index, value)) = mass
            .iter()
            .enumerate()
            .find(|(_, m)| !(m.is_finite() && **m > 0.0))
        {
            return Err(Error::InvalidMass(format!(
                "particle {index} has mass {value}"
            )));
        }
        let n = mass.len();
        Ok(Array2::from_shape_fn((n, n), |(i, j)| mass[i] * mass[j]))
    }

    fn gravity_potential(
        &self,
        r: SnapshotView<'_>,
        mass_matrix: ArrayView2<'_, Scalar>,
    ) -> Result<Array2<Scalar>> {
        check_mass_matrix(r, mass_matrix)?;
        let n = r.ncols();
        let potential = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                return 0.0;
            }
            let d = &r.column(i) - &r.column(j);
            -self.gravitational_constant * mass_matrix[[i, j]] / libm::sqrt(d.dot(&d))
        });
        Ok(potential)
    }

    fn kinetic_energy(&self, v: SnapshotView<'_>, mass: MassView<'_>) -> Result<Array1<Scalar>> {
        check_particle_count("velocity snapshot", v, mass)?;
        let speed_squared = v.map_axis(Axis(0), |column| column.dot(&column));
        Ok(0.5 * &mass * &speed_squared)
    }
}

/// Acceleration of every particle under Newtonian gravity, with the mass
/// matrix built once up front.
pub struct GravityField<'a> {
    gravity: NewtonianGravity,
    mass: MassView<'a>,
    mass_matrix: MassMatrix,
}

impl<'a> GravityField<'a> {
    pub fn new(gravity: NewtonianGravity, mass: MassView<'a>) -> Result<Self> {
        let mass_matrix = gravity.mass_matrix(mass)?;
        Ok(Self {
            gravity,
            mass,
            mass_matrix,
        })
    }
}

impl AccelerationField for GravityField<'_> {
    fn at(&self, r: SnapshotView<'_>) -> Result<Snapshot> {
        let force = self.gravity.gravity_force(r, self.mass_matrix.view())?;
        self.gravity.acceleration(force.view(), self.mass)
    }
}

fn check_particle_count(what: &str, snapshot: SnapshotView<'_>, mass: MassView<'_>) -> Result<()> {
    if snapshot.ncols() != mass.len() {
        return Err(Error::shape_mismatch(what, mass.len(), snapshot.ncols()));
    }
    Ok(())
}

fn check_mass_matrix(r: SnapshotView<'_>, mass_matrix: ArrayView2<'_, Scalar>) -> Result<()> {
    let n = r.ncols();
    let (rows, cols) = mass_matrix.dim();
    if rows != n || cols != n {
        return Err(Error::ShapeMismatch(format!(
            "mass matrix is {rows}x{cols} but the snapshot holds {n} particles"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    #[test]
    fn test_mass_matrix_is_outer_product() {
        let gravity = NewtonianGravity::default();
        let mass = array![1.0, 2.0, 3.0];
        let mm = gravity.mass_matrix(mass.view()).unwrap();

        assert_eq!(mm.dim(), (3, 3));
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(mm[[i, j]], mass[i] * mass[j]);
                assert_eq!(mm[[i, j]], mm[[j, i]]);
            }
        }
    }

    #[test]
    fn test_mass_matrix_rejects_non_positive_mass() {
        let gravity = NewtonianGravity::default();
        for bad in [0.0, -1.0, Scalar::NAN] {
            let mass = array![1.0, bad];
            let err = gravity.mass_matrix(mass.view()).unwrap_err();
            assert!(matches!(err, Error::InvalidMass(_)), "got {err:?}");
        }
    }

    #[test]
    fn test_two_body_potential() {
        let gravity = NewtonianGravity::default();
        let r = array![[0.0, 2.0], [0.0, 0.0]];
        let mm = gravity.mass_matrix(array![3.0, 4.0].view()).unwrap();
        let potential = gravity.gravity_potential(r.view(), mm.view()).unwrap();

        assert_eq!(potential[[0, 0]], 0.0);
        assert_eq!(potential[[1, 1]], 0.0);
        assert_relative_eq!(potential[[0, 1]], -6.0);
        assert_relative_eq!(potential[[1, 0]], -6.0);
    }

    #[test]
    fn test_potential_scales_with_gravitational_constant() {
        let r = array![[0.0, 1.0], [0.0, 0.0]];
        let mm = Array2::from_elem((2, 2), 1.0);
        let unit = NewtonianGravity::default()
            .gravity_potential(r.view(), mm.view())
            .unwrap();
        let scaled = NewtonianGravity::new(10.0)
            .gravity_potential(r.view(), mm.view())
            .unwrap();
        assert_relative_eq!(scaled[[0, 1]], 10.0 * unit[[0, 1]]);
    }

    #[test]
    fn test_potential_rejects_mismatched_mass_matrix() {
        let gravity = NewtonianGravity::default();
        let r = array![[0.0, 1.0, 2.0], [0.0, 0.0, 0.0]];
        let mm = Array2::from_elem((2, 2), 1.0);
        let err = gravity.gravity_potential(r.view(), mm.view()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_kinetic_energy() {
        let gravity = NewtonianGravity::default();
        let v = array![[3.0, 0.0], [4.0, 2.0]];
        let ke = gravity.kinetic_energy(v.view(), array![2.0, 1.0].view()).unwrap();
        assert_relative_eq!(ke[0], 25.0);
        assert_relative_eq!(ke[1], 2.0);
    }

    #[test]
    fn test_kinetic_energy_rejects_mismatched_mass() {
        let gravity = NewtonianGravity::default();
        let v = array![[1.0, 0.0], [0.0, 1.0]];
        let err = gravity
            .kinetic_energy(v.view(), array![1.0, 1.0, 1.0].view())
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_pairwise_difference_is_antisymmetric() {
        let gravity = NewtonianGravity::default();
        let r = array![[0.0, 1.0, 3.0], [2.0, -1.0, 0.5]];
        let diff = gravity.pairwise_difference(r.view());
        assert_eq!(diff.dim(), (2, 3, 3));
        for k in 0..2 {
            for i in 0..3 {
                for j in 0..3 {
                    assert_eq!(diff[[k, i, j]], -diff[[k, j, i]]);
                }
            }
        }
        assert_eq!(diff[[0, 2, 0]], 3.0);
    }

    #[test]
    fn test_forces_obey_third_law() {
        let gravity = NewtonianGravity::default();
        let r = array![[0.0, 1.0, -0.5], [0.0, 0.3, 2.0]];
        let mass = array![1.0, 2.0, 0.5];
        let mm = gravity.mass_matrix(mass.view()).unwrap();
        let force = gravity.gravity_force(r.view(), mm.view()).unwrap();

        let net = force.sum_axis(Axis(2)).sum_axis(Axis(1));
        for component in net.iter() {
            assert!(component.abs() < 1e-12, "net force {component}");
        }
    }

    #[test]
    fn test_acceleration_points_toward_partner() {
        let gravity = NewtonianGravity::default();
        let r = array![[0.0, 1.0], [0.0, 0.0]];
        let mass = array![100.0, 1.0];
        let mm = gravity.mass_matrix(mass.view()).unwrap();
        let force = gravity.gravity_force(r.view(), mm.view()).unwrap();
        let a = gravity.acceleration(force.view(), mass.view()).unwrap();

        // a_i = G * m_j / d^2
        assert_relative_eq!(a[[0, 0]], 1.0);
        assert_relative_eq!(a[[0, 1]], -100.0);
        assert_eq!(a[[1, 0]], 0.0);
    }

    #[test]
    fn test_zero_momentum_frame() {
        let gravity = NewtonianGravity::default();
        let v = array![[1.0, -3.0, 2.0], [0.5, 0.0, 4.0]];
        let mass = array![2.0, 1.0, 3.0];
        let shifted = gravity.zero_momentum_frame(v.view(), mass.view()).unwrap();

        let momentum = (&shifted * &mass).sum_axis(Axis(1));
        for p in momentum.iter() {
            assert!(p.abs() < 1e-12, "residual momentum {p}");
        }
    }
}
