use crate::dynamics::{Params, State};
use crate::error::Result;

use super::grid::{StepPolicy, TimeGrid};
use super::integrator::integrate_grid;

// ---------------------------------------------------------------------------
// Initial conditions and trajectories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct InitialCondition {
    pub label: String,
    pub state: State,
}

impl InitialCondition {
    /// Labelled the way plot legends show it: `Initial state: (x, y, z)`.
    pub fn new(state: State) -> Self {
        Self {
            label: format!("Initial state: {state}"),
            state,
        }
    }

    pub fn labelled(label: impl Into<String>, state: State) -> Self {
        Self { label: label.into(), state }
    }
}

/// One integrated trajectory together with the grid it was sampled on.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub label: String,
    pub times: Vec<f64>,
    pub states: Vec<State>,
}

impl Trajectory {
    /// `None` only for a hand-built trajectory with no states.
    pub fn initial(&self) -> Option<State> {
        self.states.first().copied()
    }

    pub fn last(&self) -> Option<State> {
        self.states.last().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Ensemble: shared grid and parameters, several initial conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Ensemble {
    pub grid: TimeGrid,
    pub params: Params,
    pub step: StepPolicy,
    pub members: Vec<InitialCondition>,
}

impl Ensemble {
    /// Integrate every member independently, in order.
    pub fn run(&self) -> Result<Vec<Trajectory>> {
        let dt = self.step.step_size(&self.grid)?;
        tracing::info!(
            members = self.members.len(),
            points = self.grid.len(),
            dt,
            sigma = self.params.sigma,
            rho = self.params.rho,
            beta = self.params.beta,
            "integrating ensemble"
        );

        self.members
            .iter()
            .map(|ic| -> Result<Trajectory> {
                tracing::debug!(label = %ic.label, initial = %ic.state, "integrating member");
                let states = integrate_grid(ic.state, &self.grid, &self.params, self.step)?;
                Ok(Trajectory {
                    label: ic.label.clone(),
                    times: self.grid.times().to_vec(),
                    states,
                })
            })
            .collect()
    }

    /// Same ensemble with new parameters; nothing from a previous run is reused.
    pub fn with_params(&self, params: Params) -> Self {
        Self { params, ..self.clone() }
    }
}

// ---------------------------------------------------------------------------
// Ensemble builder
// ---------------------------------------------------------------------------

pub struct EnsembleBuilder {
    grid: TimeGrid,
    params: Params,
    step: StepPolicy,
    members: Vec<InitialCondition>,
}

impl EnsembleBuilder {
    pub fn new(grid: TimeGrid) -> Self {
        Self {
            grid,
            params: Params::default(),
            step: StepPolicy::default(),
            members: vec![],
        }
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn step(mut self, step: StepPolicy) -> Self {
        self.step = step;
        self
    }

    pub fn member(mut self, state: State) -> Self {
        self.members.push(InitialCondition::new(state));
        self
    }

    pub fn labelled_member(mut self, label: impl Into<String>, state: State) -> Self {
        self.members.push(InitialCondition::labelled(label, state));
        self
    }

    pub fn build(self) -> Ensemble {
        Ensemble {
            grid: self.grid,
            params: self.params,
            step: self.step,
            members: self.members,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset ensembles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    pub const BUTTERFLY_T_END: f64 = 100.0;
    pub const BUTTERFLY_POINTS: usize = 20_000;

    /// Two nearly identical starts, 0.01 apart in x, over t = 0..100.
    pub fn butterfly() -> Result<Ensemble> {
        let grid = TimeGrid::linspace(0.0, BUTTERFLY_T_END, BUTTERFLY_POINTS)?;
        Ok(EnsembleBuilder::new(grid)
            .params(Params::classic())
            .member(State::new(1.0, 1.0, 1.0))
            .member(State::new(1.01, 1.0, 1.0))
            .build())
    }

    /// Interactive viewer setup: grid spaced exactly 0.01 so the grid-derived
    /// step and the viewer's fixed step agree.
    pub fn interactive(points: usize) -> Result<Ensemble> {
        let grid = TimeGrid::with_spacing(0.0, 0.01, points)?;
        Ok(EnsembleBuilder::new(grid)
            .params(Params::interactive_default())
            .member(State::new(1.0, 1.0, 1.0))
            .member(State::new(1.01, 1.0, 1.0))
            .build())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn small_ensemble() -> Ensemble {
        EnsembleBuilder::new(TimeGrid::linspace(0.0, 5.0, 501).unwrap())
            .member(State::new(1.0, 1.0, 1.0))
            .member(State::new(1.01, 1.0, 1.0))
            .labelled_member("rest", State::ORIGIN)
            .build()
    }

    #[test]
    fn one_trajectory_per_member() {
        let trajs = small_ensemble().run().unwrap();
        assert_eq!(trajs.len(), 3);
        for t in &trajs {
            assert_eq!(t.len(), 501);
            assert_eq!(t.times.len(), t.states.len());
        }
        assert_eq!(trajs[0].label, "Initial state: (1, 1, 1)");
        assert_eq!(trajs[1].label, "Initial state: (1.01, 1, 1)");
        assert_eq!(trajs[2].label, "rest");
        assert_eq!(trajs[2].last(), Some(State::ORIGIN));
    }

    #[test]
    fn members_do_not_interact() {
        let all = small_ensemble().run().unwrap();
        let alone = EnsembleBuilder::new(TimeGrid::linspace(0.0, 5.0, 501).unwrap())
            .member(State::new(1.01, 1.0, 1.0))
            .build()
            .run()
            .unwrap();
        assert_eq!(all[1].states, alone[0].states);
    }

    #[test]
    fn reparameterised_run_is_fresh() {
        let e = small_ensemble();
        let before = e.run().unwrap();
        let changed = e.with_params(Params::new(10.0, 15.0, 8.0 / 3.0)).run().unwrap();
        let again = e.run().unwrap();
        assert_ne!(before[0].last(), changed[0].last());
        assert_eq!(before[0].states, again[0].states);
    }

    #[test]
    fn empty_trajectory_has_no_endpoints() {
        let t = Trajectory { label: "empty".into(), times: vec![], states: vec![] };
        assert!(t.is_empty());
        assert_eq!(t.initial(), None);
        assert_eq!(t.last(), None);
    }

    #[test]
    fn butterfly_preset_shape() {
        let e = presets::butterfly().unwrap();
        assert_eq!(e.members.len(), 2);
        assert_eq!(e.grid.len(), presets::BUTTERFLY_POINTS);
        assert_eq!(e.params, Params::classic());
    }

    #[test]
    fn interactive_preset_steps_at_one_hundredth() {
        let e = presets::interactive(3_000).unwrap();
        assert_eq!(e.step.step_size(&e.grid).unwrap(), 0.01);
        assert_eq!(e.params, Params::interactive_default());
    }
}
