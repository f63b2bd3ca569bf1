use crate::dynamics::{self, Params, State};
use crate::error::{LorenzError, Result};

use super::grid::{self, StepPolicy, TimeGrid};

// ---------------------------------------------------------------------------
// Explicit Euler integrator
// ---------------------------------------------------------------------------

/// Single explicit Euler step: advance state by dt.
pub fn euler_step(state: &State, params: &Params, dt: f64) -> State {
    let d = dynamics::derivatives(state, params);
    state.apply(&d, dt)
}

/// Integrate the Lorenz system from `initial` over `times`.
///
/// Returns one state per grid point, element 0 being `initial` itself. Each
/// later element is one Euler step of size `step_size` from its predecessor,
/// whatever the actual spacing of the grid. Inf/NaN output from extreme
/// parameters is returned as-is.
pub fn integrate(initial: State, times: &[f64], params: &Params, step_size: f64) -> Result<Vec<State>> {
    grid::validate(times)?;
    if !(step_size.is_finite() && step_size > 0.0) {
        return Err(LorenzError::InvalidStepSize(step_size));
    }

    let mut trajectory = Vec::with_capacity(times.len());
    let mut state = initial;
    trajectory.push(state);
    for _ in 1..times.len() {
        state = euler_step(&state, params, step_size);
        trajectory.push(state);
    }
    Ok(trajectory)
}

/// Integrate over a validated grid with the step chosen by `policy`.
pub fn integrate_grid(initial: State, grid: &TimeGrid, params: &Params, policy: StepPolicy) -> Result<Vec<State>> {
    let dt = policy.step_size(grid)?;
    integrate(initial, grid.times(), params, dt)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_point_grid_returns_initial_state() {
        let s = State::new(3.5, -2.0, 17.0);
        let traj = integrate(s, &[4.0], &Params::classic(), 0.01).unwrap();
        assert_eq!(traj, vec![s]);
    }

    #[test]
    fn output_length_matches_grid() {
        for n in [1, 2, 3, 10, 1_000] {
            let grid = TimeGrid::linspace(0.0, 10.0, n).unwrap();
            let traj = integrate_grid(State::new(1.0, 1.0, 1.0), &grid, &Params::classic(), StepPolicy::GridSpacing)
                .unwrap();
            assert_eq!(traj.len(), n);
        }
    }

    #[test]
    fn worked_example_first_step() {
        let traj = integrate(State::new(1.0, 1.0, 1.0), &[0.0, 0.01], &Params::classic(), 0.01).unwrap();
        assert_eq!(traj[0], State::new(1.0, 1.0, 1.0));
        assert_relative_eq!(traj[1].x, 1.0);
        assert_relative_eq!(traj[1].y, 1.26, epsilon = 1e-12);
        assert_relative_eq!(traj[1].z, 1.0 + (1.0 - 8.0 / 3.0) * 0.01, epsilon = 1e-12);
    }

    #[test]
    fn deterministic() {
        let grid = TimeGrid::linspace(0.0, 20.0, 5_000).unwrap();
        let s = State::new(1.0, 1.0, 1.0);
        let a = integrate_grid(s, &grid, &Params::classic(), StepPolicy::GridSpacing).unwrap();
        let b = integrate_grid(s, &grid, &Params::classic(), StepPolicy::GridSpacing).unwrap();
        assert!(a.iter().zip(&b).all(|(p, q)| {
            p.x.to_bits() == q.x.to_bits() && p.y.to_bits() == q.y.to_bits() && p.z.to_bits() == q.z.to_bits()
        }));
    }

    #[test]
    fn origin_stays_at_origin() {
        let grid = TimeGrid::linspace(0.0, 50.0, 2_000).unwrap();
        for p in [Params::classic(), Params::new(45.0, 99.0, 19.0), Params::new(0.0, 0.0, 0.0)] {
            let traj = integrate_grid(State::ORIGIN, &grid, &p, StepPolicy::GridSpacing).unwrap();
            assert!(traj.iter().all(|s| *s == State::ORIGIN));
        }
    }

    #[test]
    fn nearby_states_diverge() {
        let grid = TimeGrid::linspace(0.0, 100.0, 20_000).unwrap();
        let p = Params::classic();
        let a = integrate_grid(State::new(1.0, 1.0, 1.0), &grid, &p, StepPolicy::GridSpacing).unwrap();
        let b = integrate_grid(State::new(1.01, 1.0, 1.0), &grid, &p, StepPolicy::GridSpacing).unwrap();
        let d = a.last().unwrap().distance(b.last().unwrap());
        assert!(d > 10.0 * 0.01, "final separation {d} should exceed 10x the initial 0.01");
    }

    #[test]
    fn step_applied_per_index_not_per_spacing() {
        let p = Params::classic();
        let s = State::new(1.0, 1.0, 1.0);
        let uneven = integrate(s, &[0.0, 0.5, 0.6, 7.0], &p, 0.01).unwrap();
        let even = integrate(s, &[0.0, 1.0, 2.0, 3.0], &p, 0.01).unwrap();
        assert_eq!(uneven, even);
    }

    #[test]
    fn blow_up_is_not_an_error() {
        let traj = integrate(State::new(1.0, 1.0, 1.0), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &Params::new(1e200, 1e200, 1e200), 1.0)
            .unwrap();
        assert_eq!(traj.len(), 6);
        assert!(traj.iter().any(|s| !s.is_finite()));
    }

    #[test]
    fn rejects_invalid_inputs() {
        let p = Params::classic();
        let s = State::new(1.0, 1.0, 1.0);
        assert!(matches!(integrate(s, &[], &p, 0.01), Err(LorenzError::EmptyTimeGrid)));
        assert!(matches!(
            integrate(s, &[0.0, 0.0], &p, 0.01),
            Err(LorenzError::NonIncreasingTimeGrid { index: 1 })
        ));
        assert!(matches!(integrate(s, &[0.0, 1.0], &p, 0.0), Err(LorenzError::InvalidStepSize(_))));
        assert!(matches!(integrate(s, &[0.0, 1.0], &p, f64::NAN), Err(LorenzError::InvalidStepSize(_))));
    }
}
