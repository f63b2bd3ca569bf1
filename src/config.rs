use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dynamics::{Params, State};
use crate::error::{LorenzError, Result};
use crate::render::{Camera, Figure};
use crate::sim::{Ensemble, EnsembleBuilder, StepPolicy, TimeGrid};

/// Run configuration, read from TOML. Every table is optional.
///
/// ```toml
/// [params]
/// sigma = 10.0
/// rho = 28.0
/// beta = 2.6666666666666665
///
/// [grid]
/// start = 0.0
/// end = 100.0
/// count = 20000
///
/// [step]
/// policy = "fixed"
/// dt = 0.01
///
/// [[initial]]
/// state = [1.0, 1.0, 1.0]
///
/// [render]
/// width = 3600
/// height = 2400
/// annotate = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub step: StepPolicy,
    #[serde(default)]
    pub initial: Vec<InitialConfig>,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    #[serde(default)]
    pub start: f64,
    #[serde(default = "default_end")]
    pub end: f64,
    #[serde(default = "default_count")]
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitialConfig {
    pub label: Option<String>,
    pub state: [f64; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_elevation")]
    pub elevation: f64,
    #[serde(default = "default_azimuth")]
    pub azimuth: f64,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Title, axis labels and legend.
    #[serde(default = "default_annotate")]
    pub annotate: bool,
}

fn default_end() -> f64 {
    100.0
}

fn default_count() -> usize {
    20_000
}

fn default_width() -> u32 {
    3600
}

fn default_height() -> u32 {
    2400
}

fn default_elevation() -> f64 {
    30.0
}

fn default_azimuth() -> f64 {
    45.0
}

fn default_output() -> PathBuf {
    PathBuf::from("lorenz_attractor_3d.png")
}

fn default_annotate() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { start: 0.0, end: default_end(), count: default_count() }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            elevation: default_elevation(),
            azimuth: default_azimuth(),
            output: default_output(),
            annotate: default_annotate(),
        }
    }
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LorenzError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| LorenzError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Build the ensemble; an empty `[[initial]]` list means the
    /// (1, 1, 1) / (1.01, 1, 1) pair.
    pub fn ensemble(&self) -> Result<Ensemble> {
        let grid = TimeGrid::linspace(self.grid.start, self.grid.end, self.grid.count)?;
        let mut builder = EnsembleBuilder::new(grid).params(self.params).step(self.step);
        if self.initial.is_empty() {
            builder = builder.member(State::new(1.0, 1.0, 1.0)).member(State::new(1.01, 1.0, 1.0));
        }
        for ic in &self.initial {
            let state = State::from(ic.state);
            builder = match &ic.label {
                Some(label) => builder.labelled_member(label.clone(), state),
                None => builder.member(state),
            };
        }
        Ok(builder.build())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.render.elevation, self.render.azimuth)
    }

    pub fn figure(&self) -> Figure {
        let figure = Figure::new(self.render.width, self.render.height);
        if self.render.annotate {
            figure
        } else {
            Figure { draw_box: figure.draw_box, ..Figure::bare(figure.width, figure.height) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_the_butterfly() {
        let cfg = RunConfig::parse("").unwrap();
        let e = cfg.ensemble().unwrap();
        assert_eq!(e.params, Params::classic());
        assert_eq!(e.grid.len(), 20_000);
        assert_eq!(e.step, StepPolicy::GridSpacing);
        assert_eq!(e.members.len(), 2);
        assert_eq!(cfg.camera(), Camera::default());
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let cfg = RunConfig::parse(
            r#"
            [params]
            sigma = 12.0
            rho = 99.0
            beta = 1.5

            [grid]
            count = 500

            [step]
            policy = "fixed"
            dt = 0.002

            [[initial]]
            label = "near origin"
            state = [0.1, 0.0, 0.0]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.params, Params::new(12.0, 99.0, 1.5));
        assert_eq!(cfg.grid.end, 100.0);
        assert_eq!(cfg.step, StepPolicy::Fixed { dt: 0.002 });
        assert_eq!((cfg.render.width, cfg.render.height), (3600, 2400));
        assert!(cfg.figure().legend);

        let e = cfg.ensemble().unwrap();
        assert_eq!(e.members.len(), 1);
        assert_eq!(e.members[0].label, "near origin");
        assert_eq!(e.grid.len(), 500);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(RunConfig::parse("[grid]\nsteps = 10\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RunConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, LorenzError::ConfigRead { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[render]\nazimuth = -60.0\n").unwrap();
        let cfg = RunConfig::load(&path).unwrap();
        assert_eq!(cfg.camera(), Camera::new(30.0, -60.0));
    }

    #[test]
    fn annotations_can_be_switched_off() {
        let cfg = RunConfig::parse("[render]
width = 300
height = 200
annotate = false
").unwrap();
        let fig = cfg.figure();
        assert_eq!((fig.width, fig.height), (300, 200));
        assert!(fig.draw_box);
        assert!(fig.title.is_none() && fig.axis_labels.is_none() && !fig.legend);
    }

    #[test]
    fn bad_grid_surfaces_as_error() {
        let cfg = RunConfig::parse("[grid]\nstart = 5.0\nend = 1.0\n").unwrap();
        assert!(matches!(cfg.ensemble(), Err(LorenzError::InvalidGridSpec(_))));
    }
}
