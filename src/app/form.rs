//! Measurement form state: per-field text buffers, numeric parsing, and the
//! derived features shown alongside the inputs.

use crate::astig::{
    AstigOrientation, AstigmatismVector, ProjectedMagnitude, axis_double_angle, project_to_axis,
};
use crate::plan::Laterality;
use crate::predict::{PatientInput, field};

/// Text-buffer state for every measurement input. Parsing happens on demand;
/// nothing is persisted.
pub(crate) struct MeasurementForm {
    pub laterality: Laterality,
    pub age: String,
    pub manifest_cylinder: String,
    pub manifest_axis: String,
    pub barrett_k_magnitude: String,
    pub barrett_k_axis: String,
    pub delta_k_iol700_magnitude: String,
    pub delta_k_iol700_axis: String,
    pub delta_tk_iol700_magnitude: String,
    pub delta_tk_iol700_axis: String,
    pub post_astig_iol700_magnitude: String,
    pub post_astig_iol700_axis: String,
    pub pentacam_delta_k_magnitude: String,
    pub pentacam_delta_k_axis: String,
    pub axial_length: String,
}

impl Default for MeasurementForm {
    fn default() -> Self {
        Self {
            laterality: Laterality::Right,
            age: String::new(),
            manifest_cylinder: String::new(),
            manifest_axis: String::new(),
            barrett_k_magnitude: String::new(),
            barrett_k_axis: String::new(),
            delta_k_iol700_magnitude: String::new(),
            delta_k_iol700_axis: String::new(),
            delta_tk_iol700_magnitude: String::new(),
            delta_tk_iol700_axis: String::new(),
            post_astig_iol700_magnitude: String::new(),
            post_astig_iol700_axis: String::new(),
            pentacam_delta_k_magnitude: String::new(),
            pentacam_delta_k_axis: String::new(),
            axial_length: String::new(),
        }
    }
}

/// Projected magnitudes at the Barrett Integrated-K axis, the model's input
/// features, recomputed from the current snapshot.
pub(crate) struct DerivedFeatures {
    pub bik_axis_cos: f64,
    pub bik_axis_sin: f64,
    pub orientation: AstigOrientation,
    pub manifest_at_bik: Option<ProjectedMagnitude>,
    pub delta_k_at_bik: Option<ProjectedMagnitude>,
    pub delta_tk_at_bik: Option<ProjectedMagnitude>,
    pub post_astig_at_bik: Option<ProjectedMagnitude>,
    pub pentacam_at_bik: Option<ProjectedMagnitude>,
}

impl MeasurementForm {
    /// Parse a field's text. Empty, unparseable, and non-finite entries are
    /// all treated as absent.
    pub fn parse_value(text: &str) -> Option<f64> {
        text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Current snapshot as (field id, optional value) pairs for the advisory
    /// bounds check.
    pub fn values(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            (field::AGE, Self::parse_value(&self.age)),
            (
                field::MANIFEST_CYLINDER,
                Self::parse_value(&self.manifest_cylinder),
            ),
            (field::MANIFEST_AXIS, Self::parse_value(&self.manifest_axis)),
            (
                field::BARRETT_K_MAGNITUDE,
                Self::parse_value(&self.barrett_k_magnitude),
            ),
            (
                field::BARRETT_K_AXIS,
                Self::parse_value(&self.barrett_k_axis),
            ),
            (
                field::DELTA_K_IOL700_MAGNITUDE,
                Self::parse_value(&self.delta_k_iol700_magnitude),
            ),
            (
                field::DELTA_K_IOL700_AXIS,
                Self::parse_value(&self.delta_k_iol700_axis),
            ),
            (
                field::DELTA_TK_IOL700_MAGNITUDE,
                Self::parse_value(&self.delta_tk_iol700_magnitude),
            ),
            (
                field::DELTA_TK_IOL700_AXIS,
                Self::parse_value(&self.delta_tk_iol700_axis),
            ),
            (
                field::POST_ASTIG_IOL700_MAGNITUDE,
                Self::parse_value(&self.post_astig_iol700_magnitude),
            ),
            (
                field::POST_ASTIG_IOL700_AXIS,
                Self::parse_value(&self.post_astig_iol700_axis),
            ),
            (
                field::PENTACAM_DELTA_K_MAGNITUDE,
                Self::parse_value(&self.pentacam_delta_k_magnitude),
            ),
            (
                field::PENTACAM_DELTA_K_AXIS,
                Self::parse_value(&self.pentacam_delta_k_axis),
            ),
            (field::AXIAL_LENGTH, Self::parse_value(&self.axial_length)),
        ]
    }

    /// Build the request body, or the labels of the fields still missing.
    pub fn patient_input(&self) -> Result<PatientInput, Vec<&'static str>> {
        let mut missing = Vec::new();
        let mut require = |label: &'static str, text: &str| {
            let value = Self::parse_value(text);
            if value.is_none() {
                missing.push(label);
            }
            value.unwrap_or(0.0)
        };

        let age = require("Age", &self.age);
        let manifest_cylinder = require("Manifest cylinder", &self.manifest_cylinder);
        let manifest_axis = require("Manifest axis", &self.manifest_axis);
        let barrett_k_magnitude = require("Barrett IK magnitude", &self.barrett_k_magnitude);
        let barrett_k_axis = require("Barrett IK axis", &self.barrett_k_axis);
        let delta_k_iol700_magnitude =
            require("ΔK IOL 700 magnitude", &self.delta_k_iol700_magnitude);
        let delta_k_iol700_axis = require("ΔK IOL 700 axis", &self.delta_k_iol700_axis);
        let delta_tk_iol700_magnitude =
            require("ΔTK IOL 700 magnitude", &self.delta_tk_iol700_magnitude);
        let delta_tk_iol700_axis = require("ΔTK IOL 700 axis", &self.delta_tk_iol700_axis);
        let post_astig_iol700_magnitude = require(
            "Posterior astigmatism magnitude",
            &self.post_astig_iol700_magnitude,
        );
        let post_astig_iol700_axis =
            require("Posterior astigmatism axis", &self.post_astig_iol700_axis);
        let pentacam_delta_k_magnitude =
            require("Pentacam ΔK magnitude", &self.pentacam_delta_k_magnitude);
        let pentacam_delta_k_axis = require("Pentacam ΔK axis", &self.pentacam_delta_k_axis);
        let axial_length = require("Axial length", &self.axial_length);

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(PatientInput {
            age: rounded_age(age),
            laterality: self.laterality,
            manifest_cylinder,
            manifest_axis,
            barrett_k_magnitude,
            barrett_k_axis,
            delta_k_iol700_magnitude,
            delta_k_iol700_axis,
            delta_tk_iol700_magnitude,
            delta_tk_iol700_axis,
            post_astig_iol700_magnitude,
            post_astig_iol700_axis,
            pentacam_delta_k_magnitude,
            pentacam_delta_k_axis,
            axial_length,
        })
    }

    /// Derived model features, available once the Barrett axis parses.
    pub fn derived_features(&self) -> Option<DerivedFeatures> {
        let bik_axis = Self::parse_value(&self.barrett_k_axis)?;
        let (bik_axis_cos, bik_axis_sin) = axis_double_angle(bik_axis);

        let project = |magnitude: &str, axis: &str| -> Option<ProjectedMagnitude> {
            let vector = AstigmatismVector::new(
                Self::parse_value(magnitude)?.abs(),
                Self::parse_value(axis)?,
            );
            Some(project_to_axis(&vector, bik_axis))
        };
        // The manifest cylinder may arrive in negative notation and is
        // converted to positive-cylinder form before projection.
        let manifest_at_bik = Self::parse_value(&self.manifest_cylinder).and_then(|cyl| {
            let axis = Self::parse_value(&self.manifest_axis)?;
            let vector = AstigmatismVector::from_cylinder(cyl, axis);
            Some(project_to_axis(&vector, bik_axis))
        });

        Some(DerivedFeatures {
            bik_axis_cos,
            bik_axis_sin,
            orientation: AstigOrientation::classify(bik_axis),
            manifest_at_bik,
            delta_k_at_bik: project(&self.delta_k_iol700_magnitude, &self.delta_k_iol700_axis),
            delta_tk_at_bik: project(&self.delta_tk_iol700_magnitude, &self.delta_tk_iol700_axis),
            post_astig_at_bik: project(
                &self.post_astig_iol700_magnitude,
                &self.post_astig_iol700_axis,
            ),
            pentacam_at_bik: project(
                &self.pentacam_delta_k_magnitude,
                &self.pentacam_delta_k_axis,
            ),
        })
    }

    pub fn clear(&mut self) {
        let laterality = self.laterality;
        *self = Self::default();
        self.laterality = laterality;
    }
}

/// Normalize numeric input text: decimal commas become points, anything that
/// can never be part of a float is dropped.
pub(crate) fn sanitize_numeric_text(value: &mut String) {
    if value.is_empty() {
        return;
    }
    if value.contains(',') {
        *value = value.replace(',', ".");
    }
    value.retain(numeric_char_allowed);
}

const fn numeric_char_allowed(ch: char) -> bool {
    ch.is_ascii_digit()
        || ch.is_ascii_whitespace()
        || matches!(ch, '+' | '-' | '.' | ',')
        || matches!(ch, 'e' | 'E')
}

fn rounded_age(value: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.round().clamp(0.0, f64::from(u32::MAX)) as u32
    }
}
