use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::dynamics::{equilibria, Params};
use crate::error::Result;
use crate::sim::analysis::{self, Summary};
use crate::sim::{Ensemble, StepPolicy, Trajectory};

/// Everything worth keeping about one ensemble run, minus the raw states.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub params: Params,
    pub step: StepPolicy,
    pub step_size: f64,
    pub equilibria: Vec<[f64; 3]>,
    pub trajectories: Vec<Summary>,
    /// Final distance between the first two trajectories, if there are two.
    pub final_separation: Option<f64>,
}

impl RunReport {
    pub fn new(ensemble: &Ensemble, trajectories: &[Trajectory]) -> Result<Self> {
        let final_separation = match trajectories {
            [a, b, ..] => a.last().zip(b.last()).map(|(p, q)| p.distance(&q)),
            _ => None,
        };
        Ok(RunReport {
            params: ensemble.params,
            step: ensemble.step,
            step_size: ensemble.step.step_size(&ensemble.grid)?,
            equilibria: equilibria(&ensemble.params).into_iter().map(Into::into).collect(),
            trajectories: trajectories.iter().map(Summary::from_trajectory).collect(),
            final_separation,
        })
    }

    /// Time at which the first two trajectories are first `threshold` apart.
    pub fn separation_time(trajectories: &[Trajectory], threshold: f64) -> Option<f64> {
        match trajectories {
            [a, b, ..] => analysis::separation_time(&a.times, &a.states, &b.states, threshold),
            _ => None,
        }
    }
}

/// Write the run report as pretty JSON.
pub fn write_summary<W: Write>(writer: &mut W, report: &RunReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the run report JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, report)
}
