use super::ArcplanApp;
use arboard::{Clipboard, Error as ClipboardError};

impl ArcplanApp {
    pub(crate) fn copy_recommendation(&mut self) {
        let Some(outcome) = self.outcome.as_ref() else {
            self.set_status("No recommendation to copy.");
            return;
        };
        let text = outcome.recommendation.clone();
        match copy_text(&text) {
            Ok(()) => self.set_status("Recommendation copied."),
            Err(err) => self.set_status(err),
        }
    }
}

fn copy_text(text: &str) -> Result<(), String> {
    let mut clipboard = Clipboard::new().map_err(format_clipboard_error)?;
    clipboard
        .set_text(text.to_owned())
        .map_err(format_clipboard_error)
}

fn format_clipboard_error(err: ClipboardError) -> String {
    match err {
        ClipboardError::ClipboardNotSupported => {
            "Copy failed: clipboard access is not supported in this environment.".to_string()
        }
        ClipboardError::ClipboardOccupied => {
            "Copy failed: clipboard is busy; try again in a moment.".to_string()
        }
        ClipboardError::Unknown { description } => {
            format!("Copy failed: {description}")
        }
        _ => {
            format!("Copy failed: {err}")
        }
    }
}
