use nalgebra::Vector3;
use serde::Serialize;

use crate::dynamics::State;

use super::runner::Trajectory;

// ---------------------------------------------------------------------------
// Bounding box
// ---------------------------------------------------------------------------

/// Axis-aligned box around the finite states of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds {
    /// `None` when no state is finite.
    pub fn of(states: &[State]) -> Option<Bounds> {
        let mut finite = states.iter().filter(|s| s.is_finite()).map(State::as_vector);
        let first = finite.next()?;
        let (lo, hi) = finite.fold((first, first), |(lo, hi), v| (lo.inf(&v), hi.sup(&v)));
        Some(Bounds { min: lo.into(), max: hi.into() })
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let lo = Vector3::from(self.min).inf(&Vector3::from(other.min));
        let hi = Vector3::from(self.max).sup(&Vector3::from(other.max));
        Bounds { min: lo.into(), max: hi.into() }
    }

    pub fn center(&self) -> Vector3<f64> {
        (Vector3::from(self.min) + Vector3::from(self.max)) * 0.5
    }

    pub fn extent(&self) -> Vector3<f64> {
        Vector3::from(self.max) - Vector3::from(self.min)
    }
}

// ---------------------------------------------------------------------------
// Trajectory summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub label: String,
    pub steps: usize,
    pub t_start: f64,
    pub t_end: f64,
    pub initial: Option<[f64; 3]>,
    pub last: Option<[f64; 3]>,
    pub bounds: Option<Bounds>,
    pub max_radius: f64,
    pub finite: bool,
    pub first_non_finite: Option<usize>,
}

impl Summary {
    pub fn from_trajectory(traj: &Trajectory) -> Self {
        let first_non_finite = traj.states.iter().position(|s| !s.is_finite());
        let max_radius = traj
            .states
            .iter()
            .filter(|s| s.is_finite())
            .map(|s| s.as_vector().norm())
            .fold(0.0_f64, f64::max);

        Summary {
            label: traj.label.clone(),
            steps: traj.len(),
            t_start: traj.times.first().copied().unwrap_or(0.0),
            t_end: traj.times.last().copied().unwrap_or(0.0),
            initial: traj.initial().map(Into::into),
            last: traj.last().map(Into::into),
            bounds: Bounds::of(&traj.states),
            max_radius,
            finite: first_non_finite.is_none(),
            first_non_finite,
        }
    }
}

// ---------------------------------------------------------------------------
// Divergence between trajectories
// ---------------------------------------------------------------------------

/// Euclidean distance between `a[i]` and `b[i]` for every shared index.
pub fn divergence(a: &[State], b: &[State]) -> Vec<f64> {
    a.iter().zip(b).map(|(p, q)| p.distance(q)).collect()
}

/// First time at which the two trajectories are more than `threshold` apart.
pub fn separation_time(times: &[f64], a: &[State], b: &[State], threshold: f64) -> Option<f64> {
    divergence(a, b)
        .iter()
        .zip(times)
        .find(|(d, _)| **d > threshold)
        .map(|(_, t)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::runner::presets;

    fn line() -> Trajectory {
        Trajectory {
            label: "line".into(),
            times: vec![0.0, 1.0, 2.0],
            states: vec![State::new(0.0, -1.0, 2.0), State::new(1.0, 1.0, 1.0), State::new(2.0, 3.0, 0.0)],
        }
    }

    #[test]
    fn bounds_cover_all_states() {
        let b = Bounds::of(&line().states).unwrap();
        assert_eq!(b.min, [0.0, -1.0, 0.0]);
        assert_eq!(b.max, [2.0, 3.0, 2.0]);
        assert_eq!(b.center(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn bounds_skip_non_finite() {
        let states = vec![State::new(f64::NAN, 0.0, 0.0), State::new(1.0, 2.0, 3.0)];
        let b = Bounds::of(&states).unwrap();
        assert_eq!(b.min, [1.0, 2.0, 3.0]);
        assert!(Bounds::of(&[State::new(f64::INFINITY, 0.0, 0.0)]).is_none());
    }

    #[test]
    fn summary_reports_endpoints() {
        let s = Summary::from_trajectory(&line());
        assert_eq!(s.steps, 3);
        assert_eq!(s.t_end, 2.0);
        assert_eq!(s.last, Some([2.0, 3.0, 0.0]));
        assert!(s.finite);
        assert!((s.max_radius - 13.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn summary_of_empty_trajectory() {
        let empty = Trajectory { label: "empty".into(), times: vec![], states: vec![] };
        let s = Summary::from_trajectory(&empty);
        assert_eq!(s.steps, 0);
        assert_eq!(s.initial, None);
        assert_eq!(s.last, None);
        assert!(s.bounds.is_none());
        assert!(s.finite);
    }

    #[test]
    fn butterfly_separates() {
        let trajs = presets::butterfly().unwrap().run().unwrap();
        let d = divergence(&trajs[0].states, &trajs[1].states);
        assert_eq!(d.len(), trajs[0].len());
        assert!((d[0] - 0.01).abs() < 1e-12);
        let t = separation_time(&trajs[0].times, &trajs[0].states, &trajs[1].states, 1.0);
        assert!(t.is_some(), "butterfly pair never separated by 1.0");
    }
}
