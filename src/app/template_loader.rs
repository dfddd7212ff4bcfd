//! Laterality-keyed eye template acquisition.
//!
//! Templates decode on a worker thread. Every request carries a generation
//! token; a completed load whose token no longer matches the latest request
//! is discarded without touching any texture (last-request-wins, no queued
//! draws).

use super::{ArcplanApp, EyeTemplate, PendingTemplateTask, TemplateLoadResult, TemplateSlot};
use crate::plan::Laterality;
use anyhow::Context as _;
use egui::{ColorImage, Context, TextureOptions};
use image::ImageReader;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

const EYE_OD_PNG: &[u8] = include_bytes!("../../assets/eye_od.png");
const EYE_OS_PNG: &[u8] = include_bytes!("../../assets/eye_os.png");

const fn bundled_template_bytes(laterality: Laterality) -> &'static [u8] {
    match laterality {
        Laterality::Right => EYE_OD_PNG,
        Laterality::Left => EYE_OS_PNG,
    }
}

/// A completed load only proceeds to draw if its token still matches the
/// latest request.
pub(crate) const fn is_stale_generation(task_generation: u64, latest: u64) -> bool {
    task_generation != latest
}

fn decode_template(
    override_path: Option<PathBuf>,
    bundled: &'static [u8],
) -> anyhow::Result<ColorImage> {
    let image = match override_path {
        Some(path) => ImageReader::open(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .with_guessed_format()
            .context("Failed to detect image format")?
            .decode()
            .with_context(|| format!("Failed to decode {}", path.display()))?,
        None => ImageReader::new(Cursor::new(bundled))
            .with_guessed_format()
            .context("Failed to detect image format")?
            .decode()
            .context("Failed to decode bundled template")?,
    };
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        &rgba,
    ))
}

impl ArcplanApp {
    /// Kick off a template load for `laterality` unless it is already
    /// resolved (loaded or failed) or already being fetched.
    pub(crate) fn ensure_template(&mut self, laterality: Laterality) {
        if self.templates.slot(laterality).is_some() {
            return;
        }
        if self
            .pending_template
            .as_ref()
            .is_some_and(|task| task.laterality == laterality)
        {
            return;
        }

        self.template_generation += 1;
        let generation = self.template_generation;
        let override_path = self
            .config
            .templates
            .path_for(laterality)
            .map(std::path::Path::to_path_buf);
        let bundled = bundled_template_bytes(laterality);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let msg = match decode_template(override_path, bundled) {
                Ok(color) => TemplateLoadResult::Success(color),
                Err(err) => TemplateLoadResult::Error(err.to_string()),
            };
            let _ = tx.send(msg);
        });
        self.pending_template = Some(PendingTemplateTask {
            rx,
            generation,
            laterality,
        });
    }

    pub(crate) fn poll_template_loader(&mut self, ctx: &Context) {
        let Some(task) = self.pending_template.take() else {
            return;
        };
        if is_stale_generation(task.generation, self.template_generation) {
            // Superseded by a newer request; drop the stale completion.
            return;
        }
        match task.rx.try_recv() {
            Ok(TemplateLoadResult::Success(color)) => {
                let texture = ctx.load_texture(
                    format!("eye_template_{}", task.laterality.code()),
                    color,
                    TextureOptions::LINEAR,
                );
                self.templates
                    .set(task.laterality, TemplateSlot::Loaded(EyeTemplate { texture }));
            }
            Ok(TemplateLoadResult::Error(err)) => {
                self.templates.set(task.laterality, TemplateSlot::Failed);
                self.set_status(format!(
                    "Failed to load {} template: {err}",
                    task.laterality.code()
                ));
            }
            Err(TryRecvError::Empty) => {
                self.pending_template = Some(task);
            }
            Err(TryRecvError::Disconnected) => {
                self.templates.set(task.laterality, TemplateSlot::Failed);
                self.set_status(format!(
                    "Loading {} template failed: worker disconnected.",
                    task.laterality.code()
                ));
            }
        }
    }

    pub(crate) fn template_texture(&self, laterality: Laterality) -> Option<&EyeTemplate> {
        self.templates.get(laterality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_generations_are_detected() {
        assert!(!is_stale_generation(3, 3));
        assert!(is_stale_generation(2, 3));
        assert!(is_stale_generation(4, 3));
    }

    #[test]
    fn bundled_templates_decode() {
        for laterality in Laterality::ALL {
            let color = decode_template(None, bundled_template_bytes(laterality)).unwrap();
            assert!(color.size[0] > 0);
            assert_eq!(color.size[0], color.size[1]);
        }
    }

    #[test]
    fn missing_override_path_is_an_error() {
        let result = decode_template(
            Some(PathBuf::from("/nonexistent/arcplan-template.png")),
            EYE_OD_PNG,
        );
        assert!(result.is_err());
    }
}
