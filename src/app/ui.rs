//! Panel layout: top toolbar, side measurement form, central diagram, and
//! the status bar.

mod center;
mod side;
mod top;

use super::ArcplanApp;

impl ArcplanApp {
    pub(crate) fn ui_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(status) = &self.last_status {
                ui.label(status);
            } else {
                ui.weak("Enter measurements, then request a plan.");
            }
            ui.with_layout(
                egui::Layout::right_to_left(egui::Align::Center),
                |ui| {
                    if self.pending_prediction.is_some() {
                        ui.label("Predicting…");
                        ui.spinner();
                    } else if self.pending_health_check.is_some() {
                        ui.label("Checking service…");
                        ui.spinner();
                    }
                },
            );
        });
    }
}
