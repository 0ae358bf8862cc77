//! Validators built from server-provided field descriptors.
//!
//! Descriptors are compiled once, when configuration is loaded, into a list of
//! composed check functions. Validation then only runs the closures.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::domain::types::normalize_mobile;
use crate::validation::FieldErrors;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
    Email,
    Phone,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, alias = "max_length", alias = "maxlength")]
    pub max_length: Option<usize>,
}

type Check = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

#[derive(Clone)]
struct CompiledField {
    key: String,
    mandatory: bool,
    label: String,
    check: Check,
}

/// Validator compiled from a descriptor list.
#[derive(Clone, Default)]
pub struct CompiledSchema {
    fields: Vec<CompiledField>,
}

impl Debug for CompiledSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn kind_check(kind: FieldKind, label: String) -> Check {
    match kind {
        FieldKind::Text => Arc::new(|_: &str| Ok::<(), String>(())),
        FieldKind::Number => Arc::new(move |value: &str| {
            value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|_| ())
                .ok_or_else(|| format!("{label} must be a number"))
        }),
        FieldKind::Date => Arc::new(move |value: &str| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| format!("{label} must be a valid date"))
        }),
        FieldKind::Email => Arc::new(move |value: &str| {
            if value.validate_email() {
                Ok(())
            } else {
                Err(format!("{label} must be a valid email address"))
            }
        }),
        FieldKind::Phone => Arc::new(move |value: &str| {
            normalize_mobile(value)
                .map(|_| ())
                .map_err(|_| format!("{label} must be a valid mobile number"))
        }),
    }
}

fn compile_field(descriptor: &FieldDescriptor) -> CompiledField {
    let format = kind_check(descriptor.kind, descriptor.label.clone());
    let check: Check = match descriptor.max_length {
        Some(max) => {
            let label = descriptor.label.clone();
            Arc::new(move |value: &str| {
                if value.chars().count() > max {
                    return Err(format!("{label} must be at most {max} characters"));
                }
                format(value)
            })
        }
        None => format,
    };

    CompiledField {
        key: descriptor.key.clone(),
        mandatory: descriptor.mandatory,
        label: descriptor.label.clone(),
        check,
    }
}

impl CompiledSchema {
    pub fn compile(descriptors: &[FieldDescriptor]) -> Self {
        Self {
            fields: descriptors.iter().map(compile_field).collect(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates `values`, recording failures as `{prefix}.{key}`.
    ///
    /// Keys without a descriptor are ignored.
    pub fn validate(
        &self,
        values: &BTreeMap<String, String>,
        prefix: &str,
        errors: &mut FieldErrors,
    ) {
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.key.clone()
            } else {
                format!("{prefix}.{}", field.key)
            };
            let value = values.get(&field.key).map(|v| v.trim()).unwrap_or_default();

            if value.is_empty() {
                if field.mandatory {
                    errors.insert(path, format!("{} is required", field.label));
                }
                continue;
            }

            if let Err(message) = (field.check)(value) {
                errors.insert(path, message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors() -> Vec<FieldDescriptor> {
        serde_json::from_str(
            r#"[
                {"key": "employer", "label": "Employer", "mandatory": true, "maxLength": 10},
                {"key": "income", "label": "Monthly income", "kind": "number"},
                {"key": "joined", "label": "Joining date", "kind": "date"},
                {"key": "hrEmail", "label": "HR email", "kind": "email"},
                {"key": "hrPhone", "label": "HR phone", "kind": "phone"}
            ]"#,
        )
        .unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn mandatory_fields_are_required() {
        let schema = CompiledSchema::compile(&descriptors());
        let mut errors = FieldErrors::new();
        schema.validate(&values(&[]), "moreDetails", &mut errors);
        assert_eq!(errors.get("moreDetails.employer"), Some("Employer is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn kinds_and_lengths_are_checked() {
        let schema = CompiledSchema::compile(&descriptors());
        let mut errors = FieldErrors::new();
        schema.validate(
            &values(&[
                ("employer", "A very long employer"),
                ("income", "lots"),
                ("joined", "2024-02-30"),
                ("hrEmail", "hr"),
                ("hrPhone", "123"),
                ("unknown", "ignored"),
            ]),
            "",
            &mut errors,
        );
        assert_eq!(
            errors.get("employer"),
            Some("Employer must be at most 10 characters")
        );
        assert_eq!(errors.get("income"), Some("Monthly income must be a number"));
        assert_eq!(errors.get("joined"), Some("Joining date must be a valid date"));
        assert_eq!(errors.get("hrEmail"), Some("HR email must be a valid email address"));
        assert_eq!(errors.get("hrPhone"), Some("HR phone must be a valid mobile number"));
        assert!(!errors.contains("unknown"));
    }

    #[test]
    fn valid_values_pass() {
        let schema = CompiledSchema::compile(&descriptors());
        let mut errors = FieldErrors::new();
        schema.validate(
            &values(&[
                ("employer", "Acme"),
                ("income", "45000"),
                ("joined", "2020-06-01"),
                ("hrEmail", "hr@acme.in"),
                ("hrPhone", "9876543210"),
            ]),
            "",
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(schema.keys().count(), 5);
    }
}
