//! Bodies of the `/api/input/*` endpoints.

use serde::{Deserialize, Serialize};

use crate::input::clamp::NumericBounds;
use crate::input::date::DateFormat;
use crate::input::restriction::KeyPress;
use crate::input::{Exceeded, InputConfig};

/// A raw value typed or pasted into an input configured by `config`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeRequest {
    pub config: InputConfig,
    pub value: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyPressRequest {
    pub config: InputConfig,
    pub event: KeyPress,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct KeyPressResponse {
    pub allowed: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClampRequest {
    #[serde(flatten)]
    pub bounds: NumericBounds,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClampResponse {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exceeded: Option<Exceeded>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRequest {
    pub value: String,
    pub format: DateFormat,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DateResponse {
    pub value: String,
}
