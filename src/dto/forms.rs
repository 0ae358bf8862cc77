//! Bodies of the `/api/forms/{form}/*` endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a successful full-form validation.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedForm {
    /// The draft after normalization, in UI shape.
    pub form: Value,
    /// The backend DTO the draft maps to.
    pub dto: Value,
    pub reference: String,
}

/// Re-validates `field` after merging `value` into `draft`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldValidationRequest {
    pub draft: Value,
    pub field: String,
    pub value: Value,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldValidationResponse {
    pub field: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldValidationResponse {
    pub fn new(field: String, error: Option<String>) -> Self {
        Self {
            field,
            valid: error.is_none(),
            error,
        }
    }
}

/// Query parameters of the submission list endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListParams {
    pub reference: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}
