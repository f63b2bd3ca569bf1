//! Lorenz attractor trajectories by explicit Euler integration.
//!
//! The numerical core lives in [`sim::integrator`]; everything else turns
//! trajectories into pictures or files.

pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod render;
pub mod sim;
pub mod telemetry;

pub use dynamics::{Params, State};
pub use error::{LorenzError, Result};
pub use sim::integrator::integrate;
