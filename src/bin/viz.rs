use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use lorenz_sim::dynamics::lorenz::{BETA_RANGE, RHO_CHAOS_ONSET, RHO_RANGE, SIGMA_RANGE};
use lorenz_sim::dynamics::{equilibria, Params};
use lorenz_sim::render::{Camera, Session};
use lorenz_sim::sim::presets;
use lorenz_sim::telemetry;

const POINTS: usize = 10_000;

fn main() -> eframe::Result {
    telemetry::init_tracing();

    let session = match presets::interactive(POINTS).and_then(Session::new) {
        Ok(s) => s,
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    };

    let app = LorenzViz {
        params: session.params(),
        session,
        camera: Camera::default(),
        error: None,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Interactive Lorenz Attractor", options, Box::new(|_| Ok(Box::new(app))))
}

struct LorenzViz {
    session: Session,
    /// Slider positions; pushed into the session when they move.
    params: Params,
    camera: Camera,
    error: Option<String>,
}

impl LorenzViz {
    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Parameters");
        ui.add(egui::Slider::new(&mut self.params.sigma, SIGMA_RANGE).text("σ (sigma)"));
        ui.add(egui::Slider::new(&mut self.params.rho, RHO_RANGE).text("ρ (rho)"));
        ui.add(egui::Slider::new(&mut self.params.beta, BETA_RANGE).text("β (beta)"));
        if ui.button("Reset").clicked() {
            self.params = Params::interactive_default();
        }

        ui.separator();
        ui.heading("View");
        ui.add(egui::Slider::new(&mut self.camera.elevation_deg, -90.0..=90.0).text("elevation"));
        ui.add(egui::Slider::new(&mut self.camera.azimuth_deg, -180.0..=180.0).text("azimuth"));

        ui.separator();
        let regime = if self.params.rho > RHO_CHAOS_ONSET { "chaotic range" } else { "below chaos onset" };
        ui.label(format!("ρ = {:.2} ({regime})", self.params.rho));
        ui.label(format!("Recomputed {} times", self.session.generation()));
        for e in equilibria(&self.params) {
            ui.label(format!("fixed point ({:.2}, {:.2}, {:.2})", e.x, e.y, e.z));
        }
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::RED, err);
        }
    }

    fn apply_params(&mut self) {
        match self.session.set_params(self.params) {
            Ok(_) => self.error = None,
            Err(err) => {
                tracing::warn!("{err}");
                self.error = Some(err.to_string());
            }
        }
    }
}

impl eframe::App for LorenzViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").resizable(false).show(ctx, |ui| {
            self.controls(ui);
        });

        self.apply_params();

        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("attractor")
                .data_aspect(1.0)
                .show_axes(false)
                .show_grid(false)
                .legend(Legend::default())
                .show(ui, |plot_ui| {
                    for line in self.session.lines(&self.camera) {
                        let [r, g, b] = line.color;
                        let points: PlotPoints = line.points.into_iter().collect();
                        plot_ui.line(
                            Line::new(line.label, points)
                                .color(egui::Color32::from_rgb(r, g, b))
                                .width(1.0),
                        );
                    }
                });
        });
    }
}
