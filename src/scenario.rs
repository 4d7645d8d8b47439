//! Initial conditions for the bundled simulation scenarios.

use crate::error::{Error, Result};
use crate::physics::math::{MassVector, Scalar, Snapshot};
use ndarray::{Array1, Array2, Axis, array};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Seeded random source shared by scenario generators
#[derive(Debug, Clone, PartialEq)]
pub struct SharedRng(pub ChaCha8Rng);

impl SharedRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::default(),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

impl Deref for SharedRng {
    type Target = ChaCha8Rng;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SharedRng {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Heavy central body with a light body on a fast tangential orbit
    #[default]
    TwoBody,
    /// Three equal masses chasing each other around a figure-eight
    FigureEight,
    /// Seeded random disc of bodies on roughly circular orbits
    RandomCluster,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScenarioSettings {
    pub kind: Scenario,
    /// Number of bodies in a random cluster
    pub body_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Radius of the disc a random cluster is drawn from
    pub cluster_radius: Scalar,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            kind: Scenario::TwoBody,
            body_count: 10,
            seed: None,
            cluster_radius: 1.0,
        }
    }
}

/// Positions and velocities `(dim, N)` with one mass per body.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    pub r: Snapshot,
    pub v: Snapshot,
    pub mass: MassVector,
}

impl InitialConditions {
    pub fn new(r: Snapshot, v: Snapshot, mass: MassVector) -> Result<Self> {
        if r.dim() != v.dim() {
            return Err(Error::ShapeMismatch(format!(
                "positions are {:?} but velocities are {:?}",
                r.dim(),
                v.dim()
            )));
        }
        if r.ncols() != mass.len() {
            return Err(Error::shape_mismatch("mass vector length", r.ncols(), mass.len()));
        }
        Ok(Self { r, v, mass })
    }

    pub fn particle_count(&self) -> usize {
        self.mass.len()
    }
}

impl Scenario {
    pub fn name(self) -> &'static str {
        match self {
            Scenario::TwoBody => "two_body",
            Scenario::FigureEight => "figure_eight",
            Scenario::RandomCluster => "random_cluster",
        }
    }

    /// Builds the scenario's initial state for the given gravitational constant.
    pub fn initial_conditions(
        self,
        settings: &ScenarioSettings,
        gravitational_constant: Scalar,
    ) -> Result<InitialConditions> {
        match self {
            Scenario::TwoBody => two_body(),
            Scenario::FigureEight => figure_eight(gravitational_constant),
            Scenario::RandomCluster => {
                let mut rng = SharedRng::from_optional_seed(settings.seed);
                random_cluster(
                    &mut rng,
                    settings.body_count,
                    settings.cluster_radius,
                    gravitational_constant,
                )
            }
        }
    }
}

fn two_body() -> Result<InitialConditions> {
    InitialConditions::new(
        array![[0.0, 1.0], [0.0, 0.0]],
        array![[0.0, 0.0], [0.0, 10.0]],
        array![100.0, 1.0],
    )
}

/// Chenciner-Montgomery choreography for unit masses at G = 1. Velocities are
/// rescaled by `sqrt(G)` so the orbit keeps its shape for other constants.
fn figure_eight(gravitational_constant: Scalar) -> Result<InitialConditions> {
    let (x, y) = (0.970_004_36, -0.243_087_53);
    let (vx, vy) = (-0.932_407_37, -0.864_731_46);
    let scale = libm::sqrt(gravitational_constant.max(0.0));

    let r = array![[x, -x, 0.0], [y, -y, 0.0]];
    let v = array![[-vx / 2.0, -vx / 2.0, vx], [-vy / 2.0, -vy / 2.0, vy]] * scale;
    InitialConditions::new(r, v, Array1::ones(3))
}

/// Bodies uniform in a disc of `radius`, each moving tangentially at the
/// circular speed for the mass enclosed by its orbit, with a little jitter.
pub fn random_cluster(
    rng: &mut SharedRng,
    body_count: usize,
    radius: Scalar,
    gravitational_constant: Scalar,
) -> Result<InitialConditions> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "cluster radius must be positive, found {radius}"
        )));
    }

    let mass: MassVector = (0..body_count).map(|_| rng.random_range(0.5..1.5)).collect();
    let mut r = Array2::zeros((2, body_count));
    for mut column in r.columns_mut() {
        let distance = radius * libm::sqrt(rng.random::<Scalar>());
        let angle = std::f64::consts::TAU * rng.random::<Scalar>();
        column[0] = distance * libm::cos(angle);
        column[1] = distance * libm::sin(angle);
    }

    let total_mass = mass.sum();
    if body_count > 0 {
        let barycenter = r.dot(&mass) / total_mass;
        r -= &barycenter.insert_axis(Axis(1));
    }

    let mut v = Array2::zeros((2, body_count));
    for (position, mut velocity) in r.columns().into_iter().zip(v.columns_mut()) {
        let distance = libm::hypot(position[0], position[1]);
        if distance <= Scalar::EPSILON {
            continue;
        }
        // Enclosed mass of a uniform disc grows with the square of the radius
        let enclosed = total_mass * (distance / radius).powi(2).min(1.0);
        let speed = libm::sqrt(gravitational_constant * enclosed / distance)
            * rng.random_range(0.9..1.1);
        velocity[0] = -speed * position[1] / distance;
        velocity[1] = speed * position[0] / distance;
    }

    debug!(
        "Generated random cluster of {} bodies with total mass {:.3}",
        body_count, total_mass
    );
    InitialConditions::new(r, v, mass)
}
