//! Cross-field rules evaluated against the whole draft object.
//!
//! A rule reads "when `depends_on` satisfies `condition`, `field` must meet
//! `then`". Rules are plain data so a rule set can be serialized, listed by
//! the API and tested without a form type.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidateEmail;

use crate::validation::{FieldErrors, is_blank, lookup};

/// Test applied to the field a rule depends on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum Condition {
    /// Unconditional; used for "format when present" checks.
    Always,
    Equals(Value),
    NotEquals(Value),
    In(Vec<Value>),
    IsTrue,
    IsFalse,
    Present,
}

impl Condition {
    pub fn holds(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Always => true,
            Condition::Equals(expected) => value.unwrap_or(&Value::Null) == expected,
            Condition::NotEquals(expected) => value.unwrap_or(&Value::Null) != expected,
            Condition::In(options) => value.is_some_and(|v| options.contains(v)),
            Condition::IsTrue => matches!(value, Some(Value::Bool(true))),
            Condition::IsFalse => !matches!(value, Some(Value::Bool(true))),
            Condition::Present => !is_blank(value),
        }
    }
}

/// What the dependent field must satisfy once the condition holds.
///
/// Every requirement except `Required` and `MustBeTrue` passes on blank
/// values, so format rules can be paired with a separate presence rule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum Requirement {
    Required,
    MustBeTrue,
    Pattern { pattern: String },
    MaxLength { max: usize },
    Range { min: Option<f64>, max: Option<f64> },
    Email,
}

/// Compiled `Pattern` requirements keyed by source. Invalid patterns are kept
/// as `None` so they are reported once.
static PATTERNS: LazyLock<RwLock<HashMap<String, Option<Regex>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn compiled(pattern: &str) -> Option<Regex> {
    if let Some(cached) = PATTERNS.read().get(pattern) {
        return cached.clone();
    }

    let re = Regex::new(pattern)
        .inspect_err(|err| log::warn!("Rule pattern `{pattern}` failed to compile: {err}"))
        .ok();
    PATTERNS
        .write()
        .entry(pattern.to_string())
        .or_insert(re)
        .clone()
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

impl Requirement {
    pub fn is_met(&self, value: Option<&Value>) -> bool {
        match self {
            Requirement::Required => !is_blank(value),
            Requirement::MustBeTrue => matches!(value, Some(Value::Bool(true))),
            _ if is_blank(value) => true,
            Requirement::Pattern { pattern } => {
                let Some(Value::String(text)) = value else {
                    return false;
                };
                compiled(pattern).is_some_and(|re| re.is_match(text.trim()))
            }
            Requirement::MaxLength { max } => match value {
                Some(Value::String(text)) => text.chars().count() <= *max,
                _ => true,
            },
            Requirement::Range { min, max } => match value.and_then(as_number) {
                Some(n) => min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max),
                None => false,
            },
            Requirement::Email => match value {
                Some(Value::String(text)) => text.trim().validate_email(),
                _ => false,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    /// Path of the field that receives the message.
    pub field: String,
    /// Path of the field the condition reads. Defaults to `field`.
    pub depends_on: String,
    pub condition: Condition,
    pub then: Requirement,
    pub message: String,
}

impl ConditionalRule {
    /// `field` must satisfy `then` whenever `depends_on` satisfies `condition`.
    pub fn when(
        field: impl Into<String>,
        depends_on: impl Into<String>,
        condition: Condition,
        then: Requirement,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            depends_on: depends_on.into(),
            condition,
            then,
            message: message.into(),
        }
    }

    /// Unconditional check of `field` against `then`.
    pub fn always(field: impl Into<String>, then: Requirement, message: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            depends_on: field.clone(),
            field,
            condition: Condition::Always,
            then,
            message: message.into(),
        }
    }

    /// Returns the message when the rule applies and is violated.
    pub fn evaluate(&self, draft: &Value) -> Option<&str> {
        if !self.condition.holds(lookup(draft, &self.depends_on)) {
            return None;
        }
        if self.then.is_met(lookup(draft, &self.field)) {
            None
        } else {
            Some(&self.message)
        }
    }
}

/// Evaluates `rules` against `scope`, recording failures under `prefix`.
pub fn apply_rules(rules: &[ConditionalRule], scope: &Value, prefix: &str, errors: &mut FieldErrors) {
    for rule in rules {
        if let Some(message) = rule.evaluate(scope) {
            let path = if prefix.is_empty() {
                rule.field.clone()
            } else {
                format!("{prefix}.{}", rule.field)
            };
            errors.insert(path, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn guardian_rule() -> ConditionalRule {
        ConditionalRule::when(
            "guardianCustomerId",
            "isMinor",
            Condition::IsTrue,
            Requirement::Required,
            "Guardian Customer ID is required for minor customers",
        )
    }

    #[test]
    fn guardian_required_only_for_minors() {
        let rule = guardian_rule();
        assert_eq!(
            rule.evaluate(&json!({ "isMinor": true, "guardianCustomerId": "" })),
            Some("Guardian Customer ID is required for minor customers")
        );
        assert_eq!(rule.evaluate(&json!({ "isMinor": true, "guardianCustomerId": "C100" })), None);
        assert_eq!(rule.evaluate(&json!({ "isMinor": false, "guardianCustomerId": "" })), None);
        assert_eq!(rule.evaluate(&json!({})), None);
    }

    #[test]
    fn equals_and_in_conditions() {
        let spouse = ConditionalRule::when(
            "spouseName",
            "maritalStatus",
            Condition::Equals(json!("MARRIED")),
            Requirement::Required,
            "Spouse name is required",
        );
        assert!(spouse.evaluate(&json!({ "maritalStatus": "MARRIED" })).is_some());
        assert!(spouse.evaluate(&json!({ "maritalStatus": "SINGLE" })).is_none());

        let cond = Condition::In(vec![json!("A"), json!("B")]);
        assert!(cond.holds(Some(&json!("B"))));
        assert!(!cond.holds(None));
    }

    #[test]
    fn format_requirements_pass_on_blank() {
        let pan = ConditionalRule::always(
            "pan",
            Requirement::Pattern {
                pattern: r"^[A-Z]{5}[0-9]{4}[A-Z]$".to_string(),
            },
            "PAN must be in the format AAAAA9999A",
        );
        assert_eq!(pan.evaluate(&json!({ "pan": "" })), None);
        assert_eq!(pan.evaluate(&json!({ "pan": "ABCDE1234F" })), None);
        assert!(pan.evaluate(&json!({ "pan": "ABC" })).is_some());
    }

    #[test]
    fn patterns_compile_once() {
        let rule = Requirement::Pattern {
            pattern: r"^[0-9]{6}$".to_string(),
        };
        assert!(rule.is_met(Some(&json!("411001"))));
        assert!(!rule.is_met(Some(&json!("4110"))));
        assert!(PATTERNS.read().contains_key(r"^[0-9]{6}$"));

        let broken = Requirement::Pattern {
            pattern: "[unclosed".to_string(),
        };
        assert!(!broken.is_met(Some(&json!("x"))));
        assert!(matches!(PATTERNS.read().get("[unclosed"), Some(None)));
    }

    #[test]
    fn range_accepts_numeric_strings() {
        let range = Requirement::Range {
            min: Some(0.0),
            max: Some(100.0),
        };
        assert!(range.is_met(Some(&json!(50))));
        assert!(range.is_met(Some(&json!("99.5"))));
        assert!(!range.is_met(Some(&json!(101))));
        assert!(!range.is_met(Some(&json!("abc"))));
        assert!(range.is_met(Some(&json!(""))));
    }

    #[test]
    fn must_be_true_and_email() {
        assert!(!Requirement::MustBeTrue.is_met(Some(&json!(false))));
        assert!(Requirement::MustBeTrue.is_met(Some(&json!(true))));
        assert!(Requirement::Email.is_met(Some(&json!("a@b.co"))));
        assert!(!Requirement::Email.is_met(Some(&json!("nope"))));
    }

    #[test]
    fn rules_are_serializable() {
        let json = serde_json::to_value(guardian_rule()).unwrap();
        assert_eq!(json["dependsOn"], "isMinor");
        assert_eq!(json["condition"]["op"], "isTrue");
        assert_eq!(json["then"]["rule"], "required");
        let back: ConditionalRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, guardian_rule());
    }

    #[test]
    fn apply_rules_prefixes_paths() {
        let mut errors = FieldErrors::new();
        apply_rules(
            &[guardian_rule()],
            &json!({ "isMinor": true }),
            "nominees[1]",
            &mut errors,
        );
        assert!(errors.contains("nominees[1].guardianCustomerId"));
    }
}
