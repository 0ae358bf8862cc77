//! Reference lists (banks, occupations, risk categories, ...) that populate
//! select inputs across the onboarding forms.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MasterCode, MasterName, MasterRecordId, TypeConstraintError};

/// The family a master record belongs to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MasterKind {
    Bank,
    Occupation,
    RiskCategory,
    DocumentType,
    Relationship,
    ChargeType,
    LoanProduct,
}

impl MasterKind {
    pub const ALL: [MasterKind; 7] = [
        MasterKind::Bank,
        MasterKind::Occupation,
        MasterKind::RiskCategory,
        MasterKind::DocumentType,
        MasterKind::Relationship,
        MasterKind::ChargeType,
        MasterKind::LoanProduct,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MasterKind::Bank => "bank",
            MasterKind::Occupation => "occupation",
            MasterKind::RiskCategory => "risk-category",
            MasterKind::DocumentType => "document-type",
            MasterKind::Relationship => "relationship",
            MasterKind::ChargeType => "charge-type",
            MasterKind::LoanProduct => "loan-product",
        }
    }
}

impl Display for MasterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MasterKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MasterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown master kind `{s}`")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MasterRecord {
    pub id: MasterRecordId,
    pub kind: MasterKind,
    pub code: MasterCode,
    pub name: MasterName,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMasterRecord {
    pub kind: MasterKind,
    pub code: MasterCode,
    pub name: MasterName,
    pub description: Option<String>,
    pub is_active: bool,
}

impl NewMasterRecord {
    #[must_use]
    pub fn new(
        kind: MasterKind,
        code: MasterCode,
        name: MasterName,
        description: Option<String>,
        is_active: bool,
    ) -> Self {
        Self {
            kind,
            code,
            name,
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            is_active,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateMasterRecord {
    pub code: MasterCode,
    pub name: MasterName,
    pub description: Option<String>,
    pub is_active: bool,
}

impl UpdateMasterRecord {
    #[must_use]
    pub fn new(
        code: MasterCode,
        name: MasterName,
        description: Option<String>,
        is_active: bool,
    ) -> Self {
        Self {
            code,
            name,
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            is_active,
        }
    }
}

/// `{ value, label, identity? }` entry used to populate select inputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionRecord {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<i32>,
}

impl From<&MasterRecord> for OptionRecord {
    fn from(record: &MasterRecord) -> Self {
        Self {
            value: record.code.to_string(),
            label: record.name.to_string(),
            identity: Some(record.id.get()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_path_segment() {
        for kind in MasterKind::ALL {
            assert_eq!(kind.as_str().parse::<MasterKind>().unwrap(), kind);
        }
        assert!("branch".parse::<MasterKind>().is_err());
    }

    #[test]
    fn kind_serializes_as_kebab_case() {
        let json = serde_json::to_string(&MasterKind::RiskCategory).unwrap();
        assert_eq!(json, "\"risk-category\"");
    }

    #[test]
    fn new_record_drops_blank_description() {
        let record = NewMasterRecord::new(
            MasterKind::Bank,
            MasterCode::new("SBI").unwrap(),
            MasterName::new("State Bank of India").unwrap(),
            Some("   ".to_string()),
            true,
        );
        assert_eq!(record.description, None);
    }
}
