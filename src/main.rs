mod app;
mod astig;
mod bounds;
mod config;
mod diagram;
mod plan;
mod predict;

use app::ArcplanApp;

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([820.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Arcplan — Arcuate Incision Planner",
        native_options,
        Box::new(|cc| Ok(Box::new(ArcplanApp::new(&cc.egui_ctx)))),
    )
}
