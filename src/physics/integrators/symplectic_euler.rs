//! Symplectic Euler integration method

use super::{AccelerationField, Integrator, PhaseState};
use crate::error::Result;
use crate::physics::math::Scalar;

/// Symplectic Euler integrator (also known as semi-implicit Euler)
///
/// First order, but velocity-first ordering keeps the map symplectic so the
/// energy error oscillates instead of drifting.
///
/// ```text
/// v(t+dt) = v(t) + a(t) * dt
/// x(t+dt) = x(t) + v(t+dt) * dt
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct SymplecticEuler;

impl Integrator for SymplecticEuler {
    fn step(&self, state: &mut PhaseState, field: &dyn AccelerationField, dt: Scalar) -> Result<()> {
        state.v.scaled_add(dt, &state.a);
        state.r.scaled_add(dt, &state.v);
        state.a = field.at(state.r.view())?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "symplectic_euler"
    }

    fn convergence_order(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::math::{Snapshot, SnapshotView};
    use ndarray::array;

    struct Spring;

    impl AccelerationField for Spring {
        fn at(&self, r: SnapshotView<'_>) -> Result<Snapshot> {
            Ok(-&r)
        }
    }

    #[test]
    fn test_symplectic_euler_energy_conservation() {
        let mut state = PhaseState::new(array![[1.0]], array![[0.0]], 0.0, &Spring).unwrap();
        let energy = |s: &PhaseState| 0.5 * (s.r[[0, 0]].powi(2) + s.v[[0, 0]].powi(2));
        let initial = energy(&state);
        let mut max_error = 0.0f64;

        for _ in 0..10_000 {
            SymplecticEuler.step(&mut state, &Spring, 0.001).unwrap();
            max_error = max_error.max(((energy(&state) - initial) / initial).abs());
        }

        // Bounded oscillation of order dt
        assert!(max_error < 0.01, "energy drift {max_error}");
    }
}
