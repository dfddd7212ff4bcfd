//! Side panel UI: the measurement form, derived model features, and advisory
//! training-range warnings.

use super::super::{APP_VERSION, ArcplanApp};
use crate::app::form::sanitize_numeric_text;
use crate::astig::ProjectedMagnitude;
use crate::bounds::check_bounds;
use egui::{Color32, RichText, TextEdit};

const WARNING_COLOR: Color32 = Color32::from_rgb(222, 166, 40);

fn numeric_row(ui: &mut egui::Ui, label: &str, hint: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.label(format!("{label}:")).on_hover_text(hint);
        let response = ui.add_sized(
            [90.0, ui.spacing().interact_size.y],
            TextEdit::singleline(value),
        );
        if response.changed() {
            sanitize_numeric_text(value);
        }
    });
}

fn feature_row(ui: &mut egui::Ui, label: &str, projected: Option<ProjectedMagnitude>) {
    ui.horizontal(|ui| {
        ui.label(format!("{label}:"));
        match projected {
            Some(p) => ui.monospace(format!("{:+.2} D @ {:.0}°", p.value, p.target_axis_degrees)),
            None => ui.weak("—"),
        };
    });
}

impl ArcplanApp {
    pub(crate) fn ui_side_form(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Patient");
            ui.separator();
            numeric_row(ui, "Age", "Patient age in years", &mut self.form.age);
            numeric_row(
                ui,
                "Axial length",
                "Axial length in mm",
                &mut self.form.axial_length,
            );
            ui.separator();

            ui.heading("Manifest refraction");
            ui.separator();
            numeric_row(
                ui,
                "Cylinder",
                "Manifest cylinder in diopters (negative notation accepted)",
                &mut self.form.manifest_cylinder,
            );
            numeric_row(
                ui,
                "Axis",
                "Manifest axis in degrees (1–180)",
                &mut self.form.manifest_axis,
            );
            ui.separator();

            ui.heading("Barrett Integrated-K");
            ui.separator();
            numeric_row(
                ui,
                "Magnitude",
                "Barrett Integrated-K magnitude in diopters",
                &mut self.form.barrett_k_magnitude,
            );
            numeric_row(
                ui,
                "Axis",
                "Barrett Integrated-K axis in degrees (1–180); the incision axis",
                &mut self.form.barrett_k_axis,
            );
            ui.separator();

            ui.heading("IOLMaster 700");
            ui.separator();
            numeric_row(
                ui,
                "ΔK magnitude",
                "ΔK IOL 700 magnitude in diopters",
                &mut self.form.delta_k_iol700_magnitude,
            );
            numeric_row(
                ui,
                "ΔK axis",
                "ΔK IOL 700 axis in degrees",
                &mut self.form.delta_k_iol700_axis,
            );
            numeric_row(
                ui,
                "ΔTK magnitude",
                "ΔTK IOL 700 magnitude in diopters",
                &mut self.form.delta_tk_iol700_magnitude,
            );
            numeric_row(
                ui,
                "ΔTK axis",
                "ΔTK IOL 700 axis in degrees",
                &mut self.form.delta_tk_iol700_axis,
            );
            numeric_row(
                ui,
                "Post. astig. magnitude",
                "Posterior astigmatism IOL 700 magnitude in diopters",
                &mut self.form.post_astig_iol700_magnitude,
            );
            numeric_row(
                ui,
                "Post. astig. axis",
                "Posterior astigmatism IOL 700 axis in degrees",
                &mut self.form.post_astig_iol700_axis,
            );
            ui.separator();

            ui.heading("Pentacam");
            ui.separator();
            numeric_row(
                ui,
                "ΔK magnitude",
                "ΔK Pentacam magnitude in diopters",
                &mut self.form.pentacam_delta_k_magnitude,
            );
            numeric_row(
                ui,
                "ΔK axis",
                "ΔK Pentacam axis in degrees",
                &mut self.form.pentacam_delta_k_axis,
            );
            ui.separator();

            self.ui_derived_features(ui);
            self.ui_range_warnings(ui);

            ui.separator();
            ui.label(
                RichText::new(format!("Version {APP_VERSION}"))
                    .small()
                    .color(Color32::from_gray(160)),
            );
        });
    }

    fn ui_derived_features(&self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Derived features")
            .default_open(false)
            .show(ui, |ui| {
                let Some(features) = self.form.derived_features() else {
                    ui.weak("Enter the Barrett Integrated-K axis to see features.");
                    return;
                };
                ui.horizontal(|ui| {
                    ui.label("Orientation:");
                    ui.monospace(features.orientation.label());
                });
                ui.horizontal(|ui| {
                    ui.label("Axis components:");
                    ui.monospace(format!(
                        "cos 2θ {:+.3}, sin 2θ {:+.3}",
                        features.bik_axis_cos, features.bik_axis_sin
                    ));
                });
                ui.label("Magnitudes at the Barrett IK axis:");
                feature_row(ui, "Manifest", features.manifest_at_bik);
                feature_row(ui, "ΔK IOL 700", features.delta_k_at_bik);
                feature_row(ui, "ΔTK IOL 700", features.delta_tk_at_bik);
                feature_row(ui, "Post. astigmatism", features.post_astig_at_bik);
                feature_row(ui, "ΔK Pentacam", features.pentacam_at_bik);
            });
    }

    fn ui_range_warnings(&self, ui: &mut egui::Ui) {
        let warnings = check_bounds(&self.form.values(), &self.config.training_ranges);
        if warnings.is_empty() {
            return;
        }
        ui.separator();
        ui.label(
            RichText::new("Outside the model's training range:").color(WARNING_COLOR),
        );
        for warning in &warnings {
            ui.label(RichText::new(format!("• {}", warning.message())).color(WARNING_COLOR))
                .on_hover_text(format!(
                    "Field `{}`: advisory only, the prediction will still run",
                    warning.field_id
                ));
        }
    }
}
