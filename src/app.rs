//! Main egui/eframe application state and UI orchestration.

use crate::config::AppConfig;
use crate::plan::{IncisionPlan, Laterality};
use crate::predict::PredictMode;
use egui::{ColorImage, Context, Key, TextureHandle};
use std::sync::mpsc::Receiver;
use std::time::Duration;

mod clipboard;
mod form;
mod prediction;
mod template_loader;
mod ui;

use form::MeasurementForm;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

struct PendingPrediction {
    rx: Receiver<PredictionOutcome>,
}

enum PredictionOutcome {
    Success {
        plan: IncisionPlan,
        recommendation: String,
    },
    Error(String),
}

struct PendingHealthCheck {
    rx: Receiver<Result<(), String>>,
}

struct PendingTemplateTask {
    rx: Receiver<TemplateLoadResult>,
    generation: u64,
    laterality: Laterality,
}

enum TemplateLoadResult {
    Success(ColorImage),
    Error(String),
}

pub(crate) struct EyeTemplate {
    texture: TextureHandle,
}

/// Outcome of a template load. Failures are cached too, so a broken template
/// file does not trigger a reload every frame.
enum TemplateSlot {
    Loaded(EyeTemplate),
    Failed,
}

#[derive(Default)]
struct TemplateCache {
    right: Option<TemplateSlot>,
    left: Option<TemplateSlot>,
}

impl TemplateCache {
    fn slot(&self, laterality: Laterality) -> Option<&TemplateSlot> {
        match laterality {
            Laterality::Right => self.right.as_ref(),
            Laterality::Left => self.left.as_ref(),
        }
    }

    fn get(&self, laterality: Laterality) -> Option<&EyeTemplate> {
        match self.slot(laterality) {
            Some(TemplateSlot::Loaded(template)) => Some(template),
            _ => None,
        }
    }

    fn set(&mut self, laterality: Laterality, slot: TemplateSlot) {
        match laterality {
            Laterality::Right => self.right = Some(slot),
            Laterality::Left => self.left = Some(slot),
        }
    }
}

/// A plan accepted from the service, together with its recommendation text.
#[derive(Clone)]
struct PlannedOutcome {
    plan: IncisionPlan,
    recommendation: String,
}

/// Top-level application state for the Arcplan UI.
pub struct ArcplanApp {
    form: MeasurementForm,
    mode: PredictMode,
    outcome: Option<PlannedOutcome>,
    pending_prediction: Option<PendingPrediction>,
    pending_health_check: Option<PendingHealthCheck>,
    templates: TemplateCache,
    pending_template: Option<PendingTemplateTask>,
    template_generation: u64,
    last_status: Option<String>,
    side_open: bool,
    config: AppConfig,
}

impl Default for ArcplanApp {
    fn default() -> Self {
        Self {
            form: MeasurementForm::default(),
            mode: PredictMode::Auto,
            outcome: None,
            pending_prediction: None,
            pending_health_check: None,
            templates: TemplateCache::default(),
            pending_template: None,
            template_generation: 0,
            last_status: None,
            side_open: true,
            config: AppConfig::load(),
        }
    }
}

impl ArcplanApp {
    pub fn new(_ctx: &Context) -> Self {
        Self::default()
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.last_status = Some(msg.into());
    }

    fn clear_all(&mut self) {
        self.form.clear();
        self.outcome = None;
        self.set_status("Cleared measurements and plan.");
    }

    fn has_pending_job(&self) -> bool {
        self.pending_prediction.is_some()
            || self.pending_template.is_some()
            || self.pending_health_check.is_some()
    }
}

impl eframe::App for ArcplanApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_template_loader(ctx);
        self.poll_prediction_job();
        self.poll_health_check();
        if self.has_pending_job() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // Ctrl/Cmd + Enter submits even while a text field has focus; the
        // modifier keeps it from clashing with typing.
        if ctx.input(|i| i.key_pressed(Key::Enter) && i.modifiers.command) {
            self.start_prediction();
        }
        // Remaining hotkeys are ignored while typing in text fields.
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(Key::B) && i.modifiers.command) {
                self.side_open = !self.side_open;
            }
            if ctx.input(|i| i.key_pressed(Key::D) && i.modifiers.command && i.modifiers.shift) {
                self.clear_all();
            }
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_top(ui));
        egui::SidePanel::right("side")
            .resizable(true)
            .default_width(330.0)
            .show_animated(ctx, self.side_open, |ui| self.ui_side_form(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.ui_central_diagram(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
    }
}
