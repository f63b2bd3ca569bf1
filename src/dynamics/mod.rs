pub mod lorenz;
pub mod state;

pub use lorenz::{derivatives, equilibria, Params};
pub use state::{Deriv, State};
