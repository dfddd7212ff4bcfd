//! Advisory training-range validation.
//!
//! Warnings annotate inputs that fall outside the envelope the prediction
//! model was trained on. They never block a prediction.

use serde::Deserialize;

/// Per-field numeric envelope, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RangeEnvelope {
    pub field_id: String,
    pub min: f64,
    pub max: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Below,
    Above,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeWarning {
    pub field_id: String,
    pub value: f64,
    pub bound: f64,
    pub side: BoundSide,
    pub label: String,
}

impl RangeWarning {
    pub fn message(&self) -> String {
        match self.side {
            BoundSide::Below => format!(
                "{} {:.2} is below the training range minimum {:.2}",
                self.label, self.value, self.bound
            ),
            BoundSide::Above => format!(
                "{} {:.2} is above the training range maximum {:.2}",
                self.label, self.value, self.bound
            ),
        }
    }
}

/// Check a snapshot of field values against the training envelopes.
///
/// Warnings follow envelope iteration order. Absent and non-finite values
/// are silently skipped. Pure function of the snapshot: safe to re-run on
/// every input change.
pub fn check_bounds(
    values: &[(&str, Option<f64>)],
    envelopes: &[RangeEnvelope],
) -> Vec<RangeWarning> {
    let mut warnings = Vec::new();
    for envelope in envelopes {
        let Some(value) = lookup(values, &envelope.field_id) else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        if value < envelope.min {
            warnings.push(RangeWarning {
                field_id: envelope.field_id.clone(),
                value,
                bound: envelope.min,
                side: BoundSide::Below,
                label: envelope.label.clone(),
            });
        } else if value > envelope.max {
            warnings.push(RangeWarning {
                field_id: envelope.field_id.clone(),
                value,
                bound: envelope.max,
                side: BoundSide::Above,
                label: envelope.label.clone(),
            });
        }
    }
    warnings
}

fn lookup(values: &[(&str, Option<f64>)], field_id: &str) -> Option<f64> {
    values
        .iter()
        .find(|(id, _)| *id == field_id)
        .and_then(|(_, value)| *value)
}
