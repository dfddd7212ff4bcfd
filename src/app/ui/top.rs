use super::super::ArcplanApp;
use crate::plan::Laterality;
use crate::predict::PredictMode;

impl ArcplanApp {
    pub(crate) fn ui_top(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::widgets::global_theme_preference_switch(ui);
            ui.separator();

            ui.label("Mode:");
            for mode in PredictMode::ALL {
                if ui
                    .selectable_label(self.mode == mode, mode.label())
                    .on_hover_text(mode.description())
                    .clicked()
                {
                    self.mode = mode;
                }
            }
            ui.separator();

            ui.label("Eye:");
            for laterality in Laterality::ALL {
                if ui
                    .selectable_label(self.form.laterality == laterality, laterality.code())
                    .on_hover_text(laterality.label())
                    .clicked()
                {
                    self.form.laterality = laterality;
                }
            }
            ui.separator();

            let predict = egui::Button::new("Predict").shortcut_text("Ctrl+Enter");
            if ui
                .add_enabled(self.pending_prediction.is_none(), predict)
                .on_hover_text("Request an incision plan from the prediction service (Ctrl+Enter)")
                .clicked()
            {
                self.start_prediction();
            }

            if ui
                .add_enabled(
                    self.outcome.is_some(),
                    egui::Button::new("Copy recommendation"),
                )
                .on_hover_text("Copy the recommendation text to the clipboard")
                .clicked()
            {
                self.copy_recommendation();
            }
            ui.separator();

            if ui
                .button("Check service")
                .on_hover_text("Ping the prediction service health endpoint")
                .clicked()
            {
                self.start_health_check();
            }

            let clear = egui::Button::new("Clear").shortcut_text("Ctrl+Shift+D");
            if ui
                .add(clear)
                .on_hover_text("Clear all measurements and the current plan (Ctrl+Shift+D)")
                .clicked()
            {
                self.clear_all();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let side_label = if self.side_open {
                    "Hide form"
                } else {
                    "Show form"
                };
                let toggle = egui::Button::new(side_label).shortcut_text("Ctrl+B");
                if ui
                    .add(toggle)
                    .on_hover_text("Toggle the measurement form (Ctrl+B)")
                    .clicked()
                {
                    self.side_open = !self.side_open;
                }
            });
        });
    }
}
