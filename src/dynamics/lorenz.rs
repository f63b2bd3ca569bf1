use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::state::{Deriv, State};

// ---------------------------------------------------------------------------
// System parameters
// ---------------------------------------------------------------------------

/// Lorenz parameters. Held constant for one integration call.
///
/// No validation happens here: negative or zero values are legal and simply
/// produce whatever the equations produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub sigma: f64, // Prandtl number, momentum / thermal diffusivity
    pub rho: f64,   // Rayleigh number, driving force
    pub beta: f64,  // geometric aspect ratio of the convection cell
}

pub const SIGMA_RANGE: RangeInclusive<f64> = 0.0..=50.0;
pub const RHO_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const BETA_RANGE: RangeInclusive<f64> = 0.0..=20.0;

/// Rayleigh number above which the classic attractor turns chaotic
/// (sigma = 10, beta = 8/3).
pub const RHO_CHAOS_ONSET: f64 = 24.74;

impl Params {
    pub const fn new(sigma: f64, rho: f64, beta: f64) -> Self {
        Self { sigma, rho, beta }
    }

    /// Lorenz's 1963 values: sigma = 10, rho = 28, beta = 8/3.
    pub const fn classic() -> Self {
        Self::new(10.0, 28.0, 8.0 / 3.0)
    }

    /// Starting slider positions of the interactive viewer.
    pub const fn interactive_default() -> Self {
        Self::new(10.0, 28.0, 8.0)
    }

    /// Clamp every parameter into its slider range.
    pub fn clamped(self) -> Self {
        Self {
            sigma: self.sigma.clamp(*SIGMA_RANGE.start(), *SIGMA_RANGE.end()),
            rho: self.rho.clamp(*RHO_RANGE.start(), *RHO_RANGE.end()),
            beta: self.beta.clamp(*BETA_RANGE.start(), *BETA_RANGE.end()),
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::classic()
    }
}

// ---------------------------------------------------------------------------
// Equations of motion
// ---------------------------------------------------------------------------

/// Lorenz vector field at `state`.
///
///   dx/dt = sigma (y - x)
///   dy/dt = x (rho - z) - y
///   dz/dt = x y - beta z
pub fn derivatives(state: &State, params: &Params) -> Deriv {
    let State { x, y, z } = *state;
    Deriv {
        dx: params.sigma * (y - x),
        dy: x * (params.rho - z) - y,
        dz: x * y - params.beta * z,
    }
}

/// Fixed points of the system.
///
/// The origin is always one. For rho > 1 (and beta >= 0) the two convection
/// rolls C+ and C- exist at (±sqrt(beta (rho - 1)), ±sqrt(beta (rho - 1)), rho - 1).
pub fn equilibria(params: &Params) -> Vec<State> {
    let mut points = vec![State::ORIGIN];
    let r = params.beta * (params.rho - 1.0);
    if params.rho > 1.0 && r > 0.0 {
        let c = r.sqrt();
        let z = params.rho - 1.0;
        points.push(State::new(c, c, z));
        points.push(State::new(-c, -c, z));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_stationary() {
        for p in [Params::classic(), Params::new(3.0, 0.5, 1.0), Params::new(-2.0, 90.0, 17.0)] {
            let d = derivatives(&State::ORIGIN, &p);
            assert_eq!(d, Deriv { dx: 0.0, dy: 0.0, dz: 0.0 });
        }
    }

    #[test]
    fn convection_rolls_are_stationary() {
        let p = Params::classic();
        let eq = equilibria(&p);
        assert_eq!(eq.len(), 3);
        for s in &eq {
            assert!(derivatives(s, &p).norm() < 1e-9, "{} is not a fixed point", s);
        }
    }

    #[test]
    fn only_origin_below_rho_one() {
        assert_eq!(equilibria(&Params::new(10.0, 0.5, 8.0 / 3.0)), vec![State::ORIGIN]);
    }

    #[test]
    fn derivative_matches_hand_computation() {
        let d = derivatives(&State::new(1.0, 1.0, 1.0), &Params::classic());
        assert_eq!(d.dx, 0.0);
        assert_eq!(d.dy, 26.0);
        assert!((d.dz - (1.0 - 8.0 / 3.0)).abs() < 1e-15);
    }

    #[test]
    fn clamp_respects_slider_ranges() {
        let p = Params::new(-1.0, 250.0, 8.0).clamped();
        assert_eq!(p, Params::new(0.0, 100.0, 8.0));
    }
}
