//! Validated form payloads recorded after a successful submit.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{SubmissionId, TypeConstraintError};

/// The onboarding and configuration forms handled by the service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    BasicInfo,
    Kyc,
    Form60,
    Nominee,
    Lead,
    AdditionalOptional,
    ChargeMaster,
    LoanScheme,
}

impl FormKind {
    pub const ALL: [FormKind; 8] = [
        FormKind::BasicInfo,
        FormKind::Kyc,
        FormKind::Form60,
        FormKind::Nominee,
        FormKind::Lead,
        FormKind::AdditionalOptional,
        FormKind::ChargeMaster,
        FormKind::LoanScheme,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FormKind::BasicInfo => "basic-info",
            FormKind::Kyc => "kyc",
            FormKind::Form60 => "form60",
            FormKind::Nominee => "nominee",
            FormKind::Lead => "lead",
            FormKind::AdditionalOptional => "additional-optional",
            FormKind::ChargeMaster => "charge-master",
            FormKind::LoanScheme => "loan-scheme",
        }
    }

    /// Human readable title used in notifications.
    pub const fn label(self) -> &'static str {
        match self {
            FormKind::BasicInfo => "Basic information",
            FormKind::Kyc => "KYC details",
            FormKind::Form60 => "Form 60",
            FormKind::Nominee => "Nominee details",
            FormKind::Lead => "Lead",
            FormKind::AdditionalOptional => "Additional details",
            FormKind::ChargeMaster => "Charge",
            FormKind::LoanScheme => "Loan scheme",
        }
    }
}

impl Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown form `{s}`")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub form: FormKind,
    /// Business reference of the record (customer id, charge code, ...).
    pub reference: String,
    /// API DTO produced by the form transform.
    pub payload: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSubmission {
    pub form: FormKind,
    pub reference: String,
    pub payload: Value,
}

impl NewSubmission {
    #[must_use]
    pub fn new(form: FormKind, reference: impl Into<String>, payload: Value) -> Self {
        Self {
            form,
            reference: reference.into().trim().to_string(),
            payload,
        }
    }
}
