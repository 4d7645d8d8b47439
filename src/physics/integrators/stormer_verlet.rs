//! Störmer-Verlet (velocity form) integration method

use super::{AccelerationField, Integrator, PhaseState};
use crate::error::Result;
use crate::physics::math::Scalar;

/// Störmer-Verlet integrator
///
/// A second-order symplectic, time-reversible method with bounded energy
/// error for gravitational n-body systems. One field evaluation per step;
/// the acceleration from the end of the previous step is reused.
///
/// ```text
/// x(t+dt)   = x(t) + v(t)*dt + 0.5*a(t)*dt²
/// v(t+dt/2) = v(t) + 0.5*a(t)*dt
/// a(t+dt)   = F(x(t+dt))/m
/// v(t+dt)   = v(t+dt/2) + 0.5*a(t+dt)*dt
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct StormerVerlet;

impl Integrator for StormerVerlet {
    fn step(&self, state: &mut PhaseState, field: &dyn AccelerationField, dt: Scalar) -> Result<()> {
        state.r.scaled_add(dt, &state.v);
        state.r.scaled_add(0.5 * dt * dt, &state.a);
        state.v.scaled_add(0.5 * dt, &state.a);

        state.a = field.at(state.r.view())?;
        state.v.scaled_add(0.5 * dt, &state.a);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stormer_verlet"
    }

    fn convergence_order(&self) -> usize {
        2
    }
}
