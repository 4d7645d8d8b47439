//! Recording loop: integrates the equations of motion and samples the state
//! at a fixed record interval, producing the `rs`/`vs`/`ts` arrays the
//! analysis layer consumes.

use crate::error::{Error, Result};
use crate::physics::NewtonianGravity;
use crate::physics::integrators::{Integrator, PhaseState};
use crate::physics::math::{MassView, Scalar, Snapshot, SnapshotSeries, round_time};
use crate::physics::newtonian::GravityField;
use ndarray::{Array1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    /// Total simulated time
    pub iteration_time: Scalar,
    /// Integration step
    pub dt: Scalar,
    /// Simulated time between recorded snapshots
    pub record_interval: Scalar,
    /// Remove the center-of-mass velocity before integrating
    pub zero_momentum: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            iteration_time: 1.0,
            dt: 0.0005,
            record_interval: 0.01,
            zero_momentum: true,
        }
    }
}

/// Snapshots sampled during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Positions, `(timesteps, dim, N)`
    pub rs: SnapshotSeries,
    /// Velocities, `(timesteps, dim, N)`
    pub vs: SnapshotSeries,
    /// Timestamps, one per snapshot
    pub ts: Array1<Scalar>,
}

impl Recording {
    pub fn len(&self) -> usize {
        self.ts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ts.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.rs.shape()[2]
    }
}

struct Recorder {
    rs: Vec<Snapshot>,
    vs: Vec<Snapshot>,
    ts: Vec<Scalar>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            rs: Vec::new(),
            vs: Vec::new(),
            ts: Vec::new(),
        }
    }

    fn push(&mut self, state: &PhaseState, t: Scalar) {
        self.rs.push(state.r.clone());
        self.vs.push(state.v.clone());
        self.ts.push(t);
    }

    fn finish(self) -> Result<Recording> {
        let rs: Vec<ArrayView2<'_, Scalar>> = self.rs.iter().map(|r| r.view()).collect();
        let vs: Vec<ArrayView2<'_, Scalar>> = self.vs.iter().map(|v| v.view()).collect();
        Ok(Recording {
            rs: ndarray::stack(Axis(0), &rs)?,
            vs: ndarray::stack(Axis(0), &vs)?,
            ts: Array1::from(self.ts),
        })
    }
}

/// Integrates from the initial state for `settings.iteration_time` and
/// returns every recorded snapshot, starting with the initial one.
///
/// `r` and `v` are `(dim, N)`; the initial time is `t0`.
pub fn simulate(
    gravity: &NewtonianGravity,
    integrator: &dyn Integrator,
    r: Snapshot,
    v: Snapshot,
    t0: Scalar,
    mass: MassView<'_>,
    settings: &SimulationSettings,
) -> Result<Recording> {
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

    let v = if settings.zero_momentum {
        gravity.zero_momentum_frame(v.view(), mass)?
    } else {
        v
    };

    let field = GravityField::new(*gravity, mass)?;
    let mut state = PhaseState::new(r, v, t0, &field)?;

    let dt = settings.dt;
    let step_count = if dt > 0.0 {
        libm::round(settings.iteration_time / dt).max(0.0) as usize
    } else {
        0
    };

    info!(
        "Simulating {} bodies with {} for {} steps (dt = {}, record every {})",
        mass.len(),
        integrator.name(),
        step_count,
        dt,
        settings.record_interval
    );

    let mut recorder = Recorder::new();
    recorder.push(&state, state.t);
    let mut last_record_time = state.t;
    let progress_stride = (step_count / 10).max(1);

    for step in 0..step_count {
        integrator.step(&mut state, &field, dt)?;
        state.t = round_time(state.t + dt);

        if state.t - last_record_time >= settings.record_interval - dt / 4.0 {
            last_record_time = round_time(last_record_time + settings.record_interval);
            recorder.push(&state, last_record_time);
        }

        if (step + 1) % progress_stride == 0 {
            debug!(
                "Simulation {:.0}% complete (t = {:.6})",
                100.0 * (step + 1) as Scalar / step_count as Scalar,
                state.t
            );
        }
    }

    let recording = recorder.finish()?;
    info!("Simulation finished with {} snapshots", recording.len());
    Ok(recording)
}
