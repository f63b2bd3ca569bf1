use serde::{Deserialize, Serialize};

use crate::error::{LorenzError, Result};

// ---------------------------------------------------------------------------
// Time grid
// ---------------------------------------------------------------------------

/// Non-empty, finite, strictly increasing sequence of sample times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

/// Check the grid invariants without taking ownership.
pub fn validate(times: &[f64]) -> Result<()> {
    let first = times.first().ok_or(LorenzError::EmptyTimeGrid)?;
    if !first.is_finite() {
        return Err(LorenzError::NonIncreasingTimeGrid { index: 0 });
    }
    for (i, pair) in times.windows(2).enumerate() {
        if !pair[1].is_finite() || pair[1] <= pair[0] {
            return Err(LorenzError::NonIncreasingTimeGrid { index: i + 1 });
        }
    }
    Ok(())
}

impl TimeGrid {
    pub fn new(times: Vec<f64>) -> Result<Self> {
        validate(&times)?;
        Ok(Self { times })
    }

    /// `count` evenly spaced points over `[start, end]`, both ends included.
    pub fn linspace(start: f64, end: f64, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(LorenzError::EmptyTimeGrid);
        }
        if count == 1 {
            return Self::new(vec![start]);
        }
        if !(end > start) {
            return Err(LorenzError::InvalidGridSpec(format!(
                "end ({end}) must be greater than start ({start})"
            )));
        }
        let span = end - start;
        let n = (count - 1) as f64;
        let mut times: Vec<f64> = (0..count).map(|i| start + span * (i as f64 / n)).collect();
        // pin the last sample so it is exactly `end`
        times[count - 1] = end;
        Self::new(times)
    }

    /// Grid starting at `start` with `count` points spaced exactly `dt` apart.
    pub fn with_spacing(start: f64, dt: f64, count: usize) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(LorenzError::InvalidStepSize(dt));
        }
        Self::new((0..count).map(|i| start + dt * i as f64).collect())
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.times[0]
    }

    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Spacing of the first interval, or `None` for a single-point grid.
    pub fn spacing(&self) -> Option<f64> {
        match self.times.as_slice() {
            [t0, t1, ..] => Some(t1 - t0),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Step-size policy
// ---------------------------------------------------------------------------

/// How the integrator's step size is chosen for a grid.
///
/// The Euler update is applied once per grid index either way; the policy
/// only decides the `dt` used in that update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum StepPolicy {
    /// dt = t[1] - t[0]
    #[default]
    GridSpacing,
    /// dt fixed, independent of the grid values.
    Fixed { dt: f64 },
}

impl StepPolicy {
    /// Resolve the step size for `grid`.
    ///
    /// A single-point grid never steps, so `GridSpacing` falls back to 1.0
    /// there; the value is never used.
    pub fn step_size(&self, grid: &TimeGrid) -> Result<f64> {
        let dt = match *self {
            StepPolicy::GridSpacing => grid.spacing().unwrap_or(1.0),
            StepPolicy::Fixed { dt } => dt,
        };
        if dt.is_finite() && dt > 0.0 {
            Ok(dt)
        } else {
            Err(LorenzError::InvalidStepSize(dt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_matches_endpoints_and_count() {
        let g = TimeGrid::linspace(0.0, 100.0, 20_000).unwrap();
        assert_eq!(g.len(), 20_000);
        assert_eq!(g.start(), 0.0);
        assert_eq!(g.end(), 100.0);
        let dt = g.spacing().unwrap();
        assert!((dt - 100.0 / 19_999.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_grid() {
        let g = TimeGrid::linspace(2.5, 2.5, 1).unwrap();
        assert_eq!(g.times(), &[2.5]);
        assert_eq!(g.spacing(), None);
        assert_eq!(StepPolicy::GridSpacing.step_size(&g).unwrap(), 1.0);
    }

    #[test]
    fn rejects_empty_and_unordered() {
        assert!(matches!(TimeGrid::new(vec![]), Err(LorenzError::EmptyTimeGrid)));
        assert!(matches!(
            TimeGrid::new(vec![0.0, 1.0, 1.0]),
            Err(LorenzError::NonIncreasingTimeGrid { index: 2 })
        ));
        assert!(matches!(
            TimeGrid::new(vec![0.0, -1.0]),
            Err(LorenzError::NonIncreasingTimeGrid { index: 1 })
        ));
        assert!(matches!(
            TimeGrid::new(vec![f64::NAN]),
            Err(LorenzError::NonIncreasingTimeGrid { index: 0 })
        ));
        assert!(matches!(TimeGrid::linspace(0.0, 1.0, 0), Err(LorenzError::EmptyTimeGrid)));
        assert!(matches!(
            TimeGrid::linspace(1.0, 0.0, 10),
            Err(LorenzError::InvalidGridSpec(_))
        ));
    }

    #[test]
    fn with_spacing_is_exact() {
        let g = TimeGrid::with_spacing(0.0, 0.01, 5).unwrap();
        assert_eq!(g.spacing(), Some(0.01));
        assert_eq!(StepPolicy::GridSpacing.step_size(&g).unwrap(), 0.01);
        assert!(TimeGrid::with_spacing(0.0, 0.0, 5).is_err());
    }

    #[test]
    fn default_policy_is_grid_spacing() {
        assert_eq!(StepPolicy::default(), StepPolicy::GridSpacing);
    }

    #[test]
    fn fixed_policy_ignores_grid() {
        let g = TimeGrid::linspace(0.0, 100.0, 11).unwrap();
        assert_eq!(StepPolicy::Fixed { dt: 0.01 }.step_size(&g).unwrap(), 0.01);
        assert!(matches!(
            StepPolicy::Fixed { dt: -0.1 }.step_size(&g),
            Err(LorenzError::InvalidStepSize(_))
        ));
    }
}
