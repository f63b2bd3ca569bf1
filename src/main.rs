use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use lorenz_sim::config::RunConfig;
use lorenz_sim::dynamics::{equilibria, Params};
use lorenz_sim::io::csv;
use lorenz_sim::io::json::{self, RunReport};
use lorenz_sim::sim::analysis::Summary;
use lorenz_sim::sim::{StepPolicy, Trajectory};
use lorenz_sim::telemetry;
use lorenz_sim::Result;

#[derive(Parser)]
#[command(name = "lorenz-sim")]
#[command(about = "Integrate the Lorenz system and render or export the trajectories")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
struct Overrides {
    /// TOML run configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    sigma: Option<f64>,
    #[arg(long, global = true)]
    rho: Option<f64>,
    #[arg(long, global = true)]
    beta: Option<f64>,
    /// End of the time grid
    #[arg(long, global = true)]
    t_end: Option<f64>,
    /// Number of grid points
    #[arg(long, global = true)]
    steps: Option<usize>,
    /// Fixed integration step instead of the grid spacing
    #[arg(long, global = true)]
    dt: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate and print a summary table (default)
    Run,
    /// Write a static 3D render as PNG
    Render {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long, allow_hyphen_values = true)]
        elevation: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        azimuth: Option<f64>,
        /// Omit the title, axis labels and legend
        #[arg(long)]
        plain: bool,
    },
    /// Write one CSV per trajectory plus summary.json
    Export {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    telemetry::init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.overrides)?;
    let ensemble = config.ensemble()?;
    let trajectories = ensemble.run()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let report = RunReport::new(&ensemble, &trajectories)?;
            print_report(&report, &trajectories);
        }
        Commands::Render { output, width, height, elevation, azimuth, plain } => {
            let mut render = config.render.clone();
            render.output = output.unwrap_or(render.output);
            render.width = width.unwrap_or(render.width);
            render.height = height.unwrap_or(render.height);
            render.elevation = elevation.unwrap_or(render.elevation);
            render.azimuth = azimuth.unwrap_or(render.azimuth);
            render.annotate &= !plain;
            let config = RunConfig { render, ..config };
            config.figure().save(&config.render.output, &trajectories, &config.camera())?;
            println!("Rendered {} trajectories to {}", trajectories.len(), config.render.output.display());
        }
        Commands::Export { dir } => export(&dir, &ensemble, &trajectories)?,
    }
    Ok(())
}

fn load_config(o: &Overrides) -> Result<RunConfig> {
    let mut config = match &o.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let p = config.params;
    config.params = Params::new(
        o.sigma.unwrap_or(p.sigma),
        o.rho.unwrap_or(p.rho),
        o.beta.unwrap_or(p.beta),
    );
    if let Some(end) = o.t_end {
        config.grid.end = end;
    }
    if let Some(count) = o.steps {
        config.grid.count = count;
    }
    if let Some(dt) = o.dt {
        config.step = StepPolicy::Fixed { dt };
    }
    Ok(config)
}

fn export(dir: &Path, ensemble: &lorenz_sim::sim::Ensemble, trajectories: &[Trajectory]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for (i, traj) in trajectories.iter().enumerate() {
        let path = dir.join(format!("{i}_trajectory.csv"));
        csv::write_trajectory_file(&path, traj)?;
        tracing::info!(path = %path.display(), label = %traj.label, "wrote trajectory");
    }
    let report = RunReport::new(ensemble, trajectories)?;
    let path = dir.join("summary.json");
    json::write_summary_file(&path, &report)?;
    println!("Exported {} trajectories and {}", trajectories.len(), path.display());
    Ok(())
}

fn print_report(report: &RunReport, trajectories: &[Trajectory]) {
    let p = report.params;
    println!();
    println!("====================================================================");
    println!("  LORENZ SYSTEM — explicit Euler");
    println!("====================================================================");
    println!();
    println!("  Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  sigma: {:>8.4}    rho: {:>8.4}    beta: {:>8.4}", p.sigma, p.rho, p.beta);
    println!("  step:  {:>8.5}    ({:?})", report.step_size, report.step);
    println!();

    println!("  Equilibria");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in equilibria(&p) {
        println!("  ({:>9.4}, {:>9.4}, {:>9.4})", e.x, e.y, e.z);
    }
    println!();

    println!("  Trajectories");
    println!("  ──────────────────────────────────────────────────────────────────");
    for s in &report.trajectories {
        print_summary(s);
    }

    if let Some(d) = report.final_separation {
        println!("  Final separation of first pair: {:.4}", d);
        match RunReport::separation_time(trajectories, 1.0) {
            Some(t) => println!("  Pair first 1.0 apart at t = {:.2}", t),
            None => println!("  Pair never more than 1.0 apart"),
        }
    }
    println!("====================================================================");
    println!();
}

fn print_summary(s: &Summary) {
    println!("  {}", s.label);
    println!(
        "    points {:>7}   t = {:.2} .. {:.2}   max |r| = {:.3}",
        s.steps, s.t_start, s.t_end, s.max_radius
    );
    if let Some([x, y, z]) = s.last {
        println!("    final ({:.4}, {:.4}, {:.4})", x, y, z);
    }
    if let Some(i) = s.first_non_finite {
        println!("    diverged to non-finite values at index {}", i);
    }
    println!();
}
