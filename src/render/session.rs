use crate::dynamics::Params;
use crate::error::Result;
use crate::sim::{Ensemble, Trajectory};

use super::png::Figure;
use super::view::Camera;

/// One projected polyline, ready for any 2D plotting backend.
#[derive(Debug, Clone)]
pub struct PlotLine {
    pub label: String,
    pub color: [u8; 3],
    pub points: Vec<[f64; 2]>,
}

/// State behind the interactive viewer: the ensemble, its latest
/// trajectories, and the parameters they were computed with.
///
/// Every parameter change integrates all members again from scratch.
#[derive(Debug)]
pub struct Session {
    ensemble: Ensemble,
    trajectories: Vec<Trajectory>,
    generation: u64,
}

impl Session {
    pub fn new(ensemble: Ensemble) -> Result<Self> {
        let trajectories = ensemble.run()?;
        Ok(Self { ensemble, trajectories, generation: 0 })
    }

    pub fn params(&self) -> Params {
        self.ensemble.params
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    /// Number of recomputations since the session started.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Slider handler. Returns whether a recomputation happened.
    pub fn set_params(&mut self, params: Params) -> Result<bool> {
        if params == self.ensemble.params {
            return Ok(false);
        }
        let next = self.ensemble.with_params(params);
        self.trajectories = next.run()?;
        self.ensemble = next;
        self.generation += 1;
        tracing::debug!(generation = self.generation, ?params, "recomputed trajectories");
        Ok(true)
    }

    /// Project every trajectory, cutting each line at its first
    /// non-finite point.
    pub fn lines(&self, camera: &Camera) -> Vec<PlotLine> {
        self.trajectories
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let finite = t.states.iter().take_while(|s| s.is_finite()).count();
                PlotLine {
                    label: t.label.clone(),
                    color: Figure::color_for(i),
                    points: camera.project_all(&t.states[..finite]),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::presets;

    #[test]
    fn unchanged_params_do_not_recompute() {
        let mut s = Session::new(presets::interactive(200).unwrap()).unwrap();
        assert!(!s.set_params(s.params()).unwrap());
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn changed_params_recompute_everything() {
        let mut s = Session::new(presets::interactive(200).unwrap()).unwrap();
        let before = s.trajectories()[0].last();
        assert!(s.set_params(Params::new(10.0, 14.0, 8.0)).unwrap());
        assert_eq!(s.generation(), 1);
        assert_ne!(s.trajectories()[0].last(), before);

        // returning to the first parameters reproduces the first result exactly
        s.set_params(Params::interactive_default()).unwrap();
        assert_eq!(s.trajectories()[0].last(), before);
    }

    #[test]
    fn lines_stop_at_blow_up() {
        let mut s = Session::new(presets::interactive(400).unwrap()).unwrap();
        let lines = s.lines(&Camera::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].points.len(), 400);
        assert_ne!(lines[0].color, lines[1].color);

        s.set_params(Params::new(1e150, 1e150, 1e150)).unwrap();
        let lines = s.lines(&Camera::default());
        assert!(lines[0].points.len() < 400);
    }
}
