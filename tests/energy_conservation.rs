//! Energy conservation checks for the aggregator and the recording loop
//!
//! Synthetic trajectories follow the analytic circular two-body orbit, so any
//! drift in the computed energy comes from the aggregator itself.

use approx::assert_relative_eq;
use ndarray::{Array1, Array3, array};
use orbitplot::physics::Scalar;
use orbitplot::physics::integrators::{IntegratorKind, StormerVerlet};
use orbitplot::{
    NewtonianGravity, SimulationSettings, relative_energy_drift, simulate, total_energy_over_time,
};
use proptest::prelude::*;

/// Circular orbit of two bodies around their common barycenter
struct CircularOrbit {
    masses: [Scalar; 2],
    separation: Scalar,
    gravitational_constant: Scalar,
}

impl CircularOrbit {
    fn angular_velocity(&self) -> Scalar {
        let total = self.masses[0] + self.masses[1];
        (self.gravitational_constant * total / self.separation.powi(3)).sqrt()
    }

    /// Distance of each body from the barycenter
    fn radii(&self) -> [Scalar; 2] {
        let total = self.masses[0] + self.masses[1];
        [
            self.separation * self.masses[1] / total,
            self.separation * self.masses[0] / total,
        ]
    }

    /// Positions and velocities sampled at `ts`, each `(timesteps, 2, 2)`
    fn sample(&self, ts: &Array1<Scalar>) -> (Array3<Scalar>, Array3<Scalar>) {
        let omega = self.angular_velocity();
        let radii = self.radii();
        let mut rs = Array3::zeros((ts.len(), 2, 2));
        let mut vs = Array3::zeros((ts.len(), 2, 2));

        for (step, &t) in ts.iter().enumerate() {
            let (sin, cos) = (omega * t).sin_cos();
            for (body, sign) in [(0, -1.0), (1, 1.0)] {
                let radius = sign * radii[body];
                rs[[step, 0, body]] = radius * cos;
                rs[[step, 1, body]] = radius * sin;
                vs[[step, 0, body]] = -radius * omega * sin;
                vs[[step, 1, body]] = radius * omega * cos;
            }
        }

        (rs, vs)
    }

    fn mass(&self) -> Array1<Scalar> {
        Array1::from(self.masses.to_vec())
    }

    /// Analytic total energy, `-G m1 m2 / 2d`
    fn energy(&self) -> Scalar {
        -self.gravitational_constant * self.masses[0] * self.masses[1] / (2.0 * self.separation)
    }
}

#[test]
fn test_circular_orbit_energy_is_constant() {
    let orbit = CircularOrbit {
        masses: [3.0, 1.0],
        separation: 2.0,
        gravitational_constant: 1.0,
    };
    let ts = Array1::linspace(0.0, 10.0, 200);
    let (rs, vs) = orbit.sample(&ts);
    let mass = orbit.mass();

    let energies = total_energy_over_time(
        &NewtonianGravity::default(),
        rs.view(),
        vs.view(),
        mass.view(),
    )
    .unwrap();

    assert_eq!(energies.len(), ts.len());
    for energy in &energies {
        assert_relative_eq!(*energy, orbit.energy(), max_relative = 1e-9);
    }
}

proptest! {
    #[test]
    fn prop_synthetic_orbits_conserve_energy(
        m1 in 0.1f64..10.0,
        m2 in 0.1f64..10.0,
        separation in 0.5f64..5.0,
        g in 0.1f64..10.0,
        steps in 2usize..64,
    ) {
        let orbit = CircularOrbit {
            masses: [m1, m2],
            separation,
            gravitational_constant: g,
        };
        let ts = Array1::linspace(0.0, 5.0, steps);
        let (rs, vs) = orbit.sample(&ts);
        let mass = orbit.mass();

        let energies = total_energy_over_time(
            &NewtonianGravity::new(g),
            rs.view(),
            vs.view(),
            mass.view(),
        )
        .unwrap();

        prop_assert_eq!(energies.len(), steps);
        for pair in energies.windows(2) {
            let relative = (pair[1] - pair[0]).abs() / pair[0].abs();
            prop_assert!(relative < 1e-6, "consecutive energies differ by {}", relative);
        }
    }
}

#[test]
fn test_resting_pair_has_constant_potential_energy() {
    let rs = Array3::from_shape_fn((5, 2, 2), |(_, axis, particle)| {
        if axis == 0 && particle == 1 { 1.0 } else { 0.0 }
    });
    let vs = Array3::zeros((5, 2, 2));

    let energies = total_energy_over_time(
        &NewtonianGravity::default(),
        rs.view(),
        vs.view(),
        array![1.0, 1.0].view(),
    )
    .unwrap();

    assert_eq!(energies.len(), 5);
    for energy in &energies {
        assert_eq!(*energy, -1.0);
    }
}

#[test]
fn test_stormer_verlet_two_body_run_conserves_energy() {
    let gravity = NewtonianGravity::default();
    let mass = array![100.0, 1.0];
    let settings = SimulationSettings {
        iteration_time: 0.7,
        dt: 0.0002,
        record_interval: 0.01,
        zero_momentum: true,
    };

    let recording = simulate(
        &gravity,
        &StormerVerlet,
        array![[0.0, 1.0], [0.0, 0.0]],
        array![[0.0, 0.0], [0.0, 10.0]],
        0.0,
        mass.view(),
        &settings,
    )
    .unwrap();

    let energies =
        total_energy_over_time(&gravity, recording.rs.view(), recording.vs.view(), mass.view())
            .unwrap();
    let drift = relative_energy_drift(&energies);
    assert!(drift < 1e-4, "relative drift {drift}");
}

#[test]
fn test_stormer_verlet_beats_symplectic_euler() {
    let gravity = NewtonianGravity::default();
    let mass = array![100.0, 1.0];
    let settings = SimulationSettings {
        iteration_time: 0.5,
        dt: 0.001,
        record_interval: 0.01,
        zero_momentum: true,
    };

    let drift_of = |kind: IntegratorKind| {
        let integrator = kind.create();
        let recording = simulate(
            &gravity,
            integrator.as_ref(),
            array![[0.0, 1.0], [0.0, 0.0]],
            array![[0.0, 0.0], [0.0, 10.0]],
            0.0,
            mass.view(),
            &settings,
        )
        .unwrap();
        let energies = total_energy_over_time(
            &gravity,
            recording.rs.view(),
            recording.vs.view(),
            mass.view(),
        )
        .unwrap();
        relative_energy_drift(&energies)
    };

    let verlet = drift_of(IntegratorKind::StormerVerlet);
    let euler = drift_of(IntegratorKind::SymplecticEuler);
    assert!(verlet < euler, "verlet {verlet} vs euler {euler}");
}
