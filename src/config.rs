use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use egui::Color32;
use serde::Deserialize;

use crate::bounds::RangeEnvelope;
use crate::plan::Laterality;
use crate::predict::field;

const CONFIG_FILE_NAME: &str = "arcplan.toml";

fn alpha_to_u8(alpha: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArcStyle {
    pub color: [u8; 3],
    pub alpha: f32,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            color: [210, 70, 60],
            alpha: 1.0,
        }
    }
}

impl ArcStyle {
    pub fn color32(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(
            self.color[0],
            self.color[1],
            self.color[2],
            alpha_to_u8(self.alpha),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramStyle {
    pub primary_arc: ArcStyle,
    pub secondary_arc: ArcStyle,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            primary_arc: ArcStyle::default(),
            secondary_arc: ArcStyle {
                color: [60, 110, 210],
                alpha: 1.0,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.clamp(500, 120_000))
    }
}

/// Optional file overrides for the bundled eye templates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateOverrides {
    pub right_eye: Option<PathBuf>,
    pub left_eye: Option<PathBuf>,
}

impl TemplateOverrides {
    pub fn path_for(&self, laterality: Laterality) -> Option<&Path> {
        match laterality {
            Laterality::Right => self.right_eye.as_deref(),
            Laterality::Left => self.left_eye.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub diagram: DiagramStyle,
    pub templates: TemplateOverrides,
    pub training_ranges: Vec<RangeEnvelope>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            diagram: DiagramStyle::default(),
            templates: TemplateOverrides::default(),
            training_ranges: default_training_ranges(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match toml::from_str::<Self>(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {}: {err}", path.display());
                    }
                }
            }
        }
        Self::default()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "Arcplan", "Arcplan") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(
                base_dirs
                    .config_dir()
                    .join("arcplan")
                    .join(CONFIG_FILE_NAME),
            );
        }

        paths
    }
}

/// Envelope of the model's training data, one entry per clinically bounded
/// measurement. Values are configuration, revisable without touching the
/// validation logic.
pub fn default_training_ranges() -> Vec<RangeEnvelope> {
    let entry = |field_id: &str, min: f64, max: f64, label: &str| RangeEnvelope {
        field_id: field_id.to_string(),
        min,
        max,
        label: label.to_string(),
    };
    vec![
        entry(field::AGE, 40.0, 94.0, "Age"),
        entry(field::MANIFEST_CYLINDER, -4.5, 0.0, "Manifest Cylinder"),
        entry(
            field::BARRETT_K_MAGNITUDE,
            0.0,
            1.94,
            "Barrett Integrated-K Magnitude",
        ),
        entry(
            field::DELTA_K_IOL700_MAGNITUDE,
            0.0,
            2.49,
            "ΔK IOL 700 Magnitude",
        ),
        entry(
            field::DELTA_TK_IOL700_MAGNITUDE,
            0.0,
            2.61,
            "ΔTK IOL 700 Magnitude",
        ),
        entry(
            field::POST_ASTIG_IOL700_MAGNITUDE,
            0.0,
            1.16,
            "Posterior Astigmatism IOL 700 Magnitude",
        ),
        entry(field::AXIAL_LENGTH, 20.97, 28.06, "Axial Length"),
    ]
}
