use lorenz_sim::dynamics::lorenz::RHO_CHAOS_ONSET;
use lorenz_sim::dynamics::{equilibria, Params, State};
use lorenz_sim::sim::analysis::Summary;
use lorenz_sim::sim::{EnsembleBuilder, TimeGrid};

fn main() {
    let grid = TimeGrid::linspace(0.0, 50.0, 5_001).expect("Failed to build grid");
    let start = State::new(1.0, 1.0, 1.0);

    println!("{:>6}  {:>10}  {:>10}  {:>10}  {:>8}", "rho", "final x", "final z", "max |r|", "regime");
    for rho in [0.5, 10.0, 20.0, 24.0, 28.0, 50.0, 99.96] {
        let params = Params { rho, ..Params::classic() };
        let trajectories = EnsembleBuilder::new(grid.clone())
            .params(params)
            .member(start)
            .build()
            .run()
            .expect("Integration failed");

        let s = Summary::from_trajectory(&trajectories[0]);
        let regime = if rho < 1.0 {
            "origin"
        } else if rho < RHO_CHAOS_ONSET {
            "fixed pt"
        } else {
            "chaotic"
        };
        match s.last {
            Some([x, _, z]) if s.finite => {
                println!("{:>6.2}  {:>10.4}  {:>10.4}  {:>10.3}  {:>8}", rho, x, z, s.max_radius, regime)
            }
            _ => println!("{:>6.2}  diverged at index {:?}", rho, s.first_non_finite),
        }
    }

    println!();
    println!("Equilibria at rho = 28:");
    for e in equilibria(&Params::classic()) {
        println!("  {}", e);
    }
}
