use lorenz_sim::io::json::{self, RunReport};
use lorenz_sim::render::{Camera, Figure};
use lorenz_sim::sim::presets;

fn main() {
    let ensemble = presets::butterfly().expect("Failed to build ensemble");

    println!("Integrating {} trajectories over {} points ...", ensemble.members.len(), ensemble.grid.len());
    let trajectories = ensemble.run().expect("Integration failed");

    let report = RunReport::new(&ensemble, &trajectories).expect("Failed to build report");
    for s in &report.trajectories {
        if let Some([x, y, z]) = s.last {
            println!("{}: final ({:.3}, {:.3}, {:.3})", s.label, x, y, z);
        }
    }
    if let Some(d) = report.final_separation {
        println!("Final separation: {:.3}", d);
    }
    if let Some(t) = RunReport::separation_time(&trajectories, 1.0) {
        println!("Trajectories first 1.0 apart at t = {:.2}", t);
    }

    Figure::default()
        .save("lorenz_attractor_3d.png", &trajectories, &Camera::default())
        .expect("Failed to write PNG");
    json::write_summary_file("butterfly_summary.json", &report).expect("Failed to write JSON");

    println!("Exported: lorenz_attractor_3d.png, butterfly_summary.json");
}
