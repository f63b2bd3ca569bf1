pub mod analysis;
pub mod grid;
pub mod integrator;
pub mod runner;

pub use grid::{StepPolicy, TimeGrid};
pub use integrator::{euler_step, integrate, integrate_grid};
pub use runner::{presets, Ensemble, EnsembleBuilder, InitialCondition, Trajectory};
