//! Wire types and blocking client for the prediction service.

use crate::plan::{IncisionPlan, IncisionType, Laterality};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Field identifiers shared by the request body, the measurement form, and
/// the training-range table.
pub mod field {
    pub const AGE: &str = "age";
    pub const MANIFEST_CYLINDER: &str = "manifest_cylinder";
    pub const MANIFEST_AXIS: &str = "manifest_axis";
    pub const BARRETT_K_MAGNITUDE: &str = "barrett_k_magnitude";
    pub const BARRETT_K_AXIS: &str = "barrett_k_axis";
    pub const DELTA_K_IOL700_MAGNITUDE: &str = "delta_k_iol700_magnitude";
    pub const DELTA_K_IOL700_AXIS: &str = "delta_k_iol700_axis";
    pub const DELTA_TK_IOL700_MAGNITUDE: &str = "delta_tk_iol700_magnitude";
    pub const DELTA_TK_IOL700_AXIS: &str = "delta_tk_iol700_axis";
    pub const POST_ASTIG_IOL700_MAGNITUDE: &str = "post_astig_iol700_magnitude";
    pub const POST_ASTIG_IOL700_AXIS: &str = "post_astig_iol700_axis";
    pub const PENTACAM_DELTA_K_MAGNITUDE: &str = "pentacam_delta_k_magnitude";
    pub const PENTACAM_DELTA_K_AXIS: &str = "pentacam_delta_k_axis";
    pub const AXIAL_LENGTH: &str = "axial_length";
}

/// Which prediction endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictMode {
    Auto,
    Single,
    Paired,
}

impl PredictMode {
    pub const ALL: [Self; 3] = [Self::Auto, Self::Single, Self::Paired];

    pub const fn endpoint_path(self) -> &'static str {
        match self {
            Self::Auto => "/predict/auto",
            Self::Single => "/predict/single",
            Self::Paired => "/predict/paired",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto select",
            Self::Single => "Single only",
            Self::Paired => "Paired only",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Auto => "Let the service decide between no, single, or paired incisions",
            Self::Single => "Ask for a single-incision plan regardless of classification",
            Self::Paired => "Ask for a paired-incision plan regardless of classification",
        }
    }
}

/// Flat request body posted to every prediction endpoint.
///
/// Field names are wire contract; renaming any of them breaks the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientInput {
    pub age: u32,
    pub laterality: Laterality,
    pub manifest_cylinder: f64,
    pub manifest_axis: f64,
    pub barrett_k_magnitude: f64,
    pub barrett_k_axis: f64,
    pub delta_k_iol700_magnitude: f64,
    pub delta_k_iol700_axis: f64,
    pub delta_tk_iol700_magnitude: f64,
    pub delta_tk_iol700_axis: f64,
    pub post_astig_iol700_magnitude: f64,
    pub post_astig_iol700_axis: f64,
    pub pentacam_delta_k_magnitude: f64,
    pub pentacam_delta_k_axis: f64,
    pub axial_length: f64,
}

/// Successful response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub arcuate_type: String,
    pub arcuate_code: u8,
    pub lri_length: Option<f64>,
    pub lri_axis: Option<f64>,
    pub num_arcuates: u8,
    pub recommendation: String,
}

impl PredictionResponse {
    /// Map the wire response into a validated plan plus the service's
    /// human-readable recommendation. Inconsistent responses (unknown type,
    /// code mismatch, missing geometry for a concrete type) are rejected.
    pub fn into_plan(self) -> anyhow::Result<(IncisionPlan, String)> {
        let incision_type = match self.arcuate_type.as_str() {
            "None" => IncisionType::None,
            "Single" => IncisionType::Single,
            "Paired" => IncisionType::Paired,
            other => anyhow::bail!("unknown arcuate type {other:?} in prediction response"),
        };
        if self.arcuate_code != incision_type.wire_code() {
            anyhow::bail!(
                "arcuate code {} does not match type {}",
                self.arcuate_code,
                incision_type.label()
            );
        }
        let plan = IncisionPlan {
            incision_type,
            arc_length_degrees: self.lri_length,
            axis_degrees: self.lri_axis,
            incision_count: self.num_arcuates,
        };
        plan.validate()?;
        Ok((plan, self.recommendation))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// POST the patient input to the mode's endpoint and decode the response.
///
/// Non-2xx responses carry an `{ "error": ... }` body which becomes the
/// error message. No retries: a failure requires explicit resubmission.
pub fn request_prediction(
    base_url: &str,
    timeout: Duration,
    mode: PredictMode,
    input: &PatientInput,
) -> anyhow::Result<PredictionResponse> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), mode.endpoint_path());
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client.post(url).json(input).send()?;
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .map_or_else(|_| format!("HTTP {status}"), |body| body.error);
        anyhow::bail!("prediction service error: {message}");
    }
    Ok(response.json::<PredictionResponse>()?)
}

/// GET the service health endpoint.
pub fn check_service_health(base_url: &str, timeout: Duration) -> anyhow::Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    client.get(url).send()?.error_for_status()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Laterality;

    fn sample_input() -> PatientInput {
        PatientInput {
            age: 68,
            laterality: Laterality::Right,
            manifest_cylinder: -1.5,
            manifest_axis: 180.0,
            barrett_k_magnitude: 1.25,
            barrett_k_axis: 85.0,
            delta_k_iol700_magnitude: 0.45,
            delta_k_iol700_axis: 88.0,
            delta_tk_iol700_magnitude: 0.52,
            delta_tk_iol700_axis: 92.0,
            post_astig_iol700_magnitude: 0.1,
            post_astig_iol700_axis: 178.0,
            pentacam_delta_k_magnitude: 0.41,
            pentacam_delta_k_axis: 87.0,
            axial_length: 23.5,
        }
    }

    #[test]
    fn request_body_uses_the_wire_field_names() {
        let value = serde_json::to_value(sample_input()).unwrap();
        let object = value.as_object().unwrap();
        let expected = [
            field::AGE,
            "laterality",
            field::MANIFEST_CYLINDER,
            field::MANIFEST_AXIS,
            field::BARRETT_K_MAGNITUDE,
            field::BARRETT_K_AXIS,
            field::DELTA_K_IOL700_MAGNITUDE,
            field::DELTA_K_IOL700_AXIS,
            field::DELTA_TK_IOL700_MAGNITUDE,
            field::DELTA_TK_IOL700_AXIS,
            field::POST_ASTIG_IOL700_MAGNITUDE,
            field::POST_ASTIG_IOL700_AXIS,
            field::PENTACAM_DELTA_K_MAGNITUDE,
            field::PENTACAM_DELTA_K_AXIS,
            field::AXIAL_LENGTH,
        ];
        assert_eq!(object.len(), expected.len());
        for key in expected {
            assert!(object.contains_key(key), "missing field {key}");
        }
        assert_eq!(object["laterality"], "OD");
        assert_eq!(object["age"], 68);
    }

    #[test]
    fn laterality_serializes_as_clinical_code() {
        let mut input = sample_input();
        input.laterality = Laterality::Left;
        let value = serde_json::to_value(input).unwrap();
        assert_eq!(value["laterality"], "OS");
    }

    #[test]
    fn single_response_maps_to_a_valid_plan() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{
                "arcuate_type": "Single",
                "arcuate_code": 1,
                "lri_length": 28.5,
                "lri_axis": 85,
                "num_arcuates": 1,
                "recommendation": "Single arcuate: 28.5° length at 85° axis"
            }"#,
        )
        .unwrap();
        let (plan, recommendation) = response.into_plan().unwrap();
        assert_eq!(plan.incision_type, IncisionType::Single);
        assert_eq!(plan.incision_count, 1);
        assert!((plan.arc_length_degrees.unwrap() - 28.5).abs() < 1e-9);
        assert!((plan.axis_degrees.unwrap() - 85.0).abs() < 1e-9);
        assert!(recommendation.contains("Single arcuate"));
    }

    #[test]
    fn none_response_maps_to_an_empty_plan() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{
                "arcuate_type": "None",
                "arcuate_code": 0,
                "lri_length": null,
                "lri_axis": null,
                "num_arcuates": 0,
                "recommendation": "No arcuates recommended"
            }"#,
        )
        .unwrap();
        let (plan, _) = response.into_plan().unwrap();
        assert_eq!(plan.incision_type, IncisionType::None);
        assert_eq!(plan.incision_count, 0);
        assert!(plan.arc_length_degrees.is_none());
        assert!(plan.axis_degrees.is_none());
    }

    #[test]
    fn paired_response_maps_to_a_paired_plan() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{
                "arcuate_type": "Paired",
                "arcuate_code": 2,
                "lri_length": 22.0,
                "lri_axis": 100,
                "num_arcuates": 2,
                "recommendation": "Paired arcuates: 22.0° length each at 100° axis"
            }"#,
        )
        .unwrap();
        let (plan, _) = response.into_plan().unwrap();
        assert_eq!(plan.incision_type, IncisionType::Paired);
        assert_eq!(plan.incision_count, 2);
    }

    #[test]
    fn inconsistent_responses_are_rejected() {
        // Single without geometry.
        let missing_geometry = PredictionResponse {
            arcuate_type: "Single".to_string(),
            arcuate_code: 1,
            lri_length: None,
            lri_axis: Some(85.0),
            num_arcuates: 1,
            recommendation: String::new(),
        };
        assert!(missing_geometry.into_plan().is_err());

        // Count disagrees with type.
        let count_mismatch = PredictionResponse {
            arcuate_type: "Paired".to_string(),
            arcuate_code: 2,
            lri_length: Some(22.0),
            lri_axis: Some(100.0),
            num_arcuates: 1,
            recommendation: String::new(),
        };
        assert!(count_mismatch.into_plan().is_err());

        // Code disagrees with type.
        let code_mismatch = PredictionResponse {
            arcuate_type: "Single".to_string(),
            arcuate_code: 2,
            lri_length: Some(28.5),
            lri_axis: Some(85.0),
            num_arcuates: 1,
            recommendation: String::new(),
        };
        assert!(code_mismatch.into_plan().is_err());

        let unknown_type = PredictionResponse {
            arcuate_type: "Triple".to_string(),
            arcuate_code: 3,
            lri_length: Some(28.5),
            lri_axis: Some(85.0),
            num_arcuates: 3,
            recommendation: String::new(),
        };
        assert!(unknown_type.into_plan().is_err());
    }

    #[test]
    fn error_body_decodes() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "Missing required fields: ['age']"}"#).unwrap();
        assert!(body.error.contains("Missing required fields"));
    }

    #[test]
    fn endpoint_paths_follow_the_mode() {
        assert_eq!(PredictMode::Auto.endpoint_path(), "/predict/auto");
        assert_eq!(PredictMode::Single.endpoint_path(), "/predict/single");
        assert_eq!(PredictMode::Paired.endpoint_path(), "/predict/paired");
    }
}
