//! Form schemas for the onboarding and configuration screens.
//!
//! Every form follows the same single pass: a camelCase draft is read
//! leniently, normalized, checked (derive rules, then conditional rules, then
//! cross-field invariants) and finally mapped to its API DTO.

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::Validate;

use crate::domain::submission::FormKind;
use crate::validation::dynamic::CompiledSchema;
use crate::validation::rules::{Condition, ConditionalRule, Requirement, apply_rules};
use crate::validation::{FieldErrors, set_path, strip_nulls};

pub mod additional_optional;
pub mod basic_info;
pub mod charge_master;
pub mod form60;
pub mod kyc;
pub mod lead;
pub mod lenient;
pub mod loan_scheme;
pub mod master_data;
pub mod nominee;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(FieldErrors),

    #[error("malformed form data: {0}")]
    Malformed(String),

    #[error("unknown field `{0}`")]
    UnknownField(String),
}

impl From<FieldErrors> for FormError {
    fn from(errors: FieldErrors) -> Self {
        FormError::Validation(errors)
    }
}

/// Runtime inputs a schema may need beyond the draft itself.
#[derive(Clone, Debug)]
pub struct FormContext {
    /// Reference date for "not in the future" and age checks.
    pub today: NaiveDate,
    pub more_details: CompiledSchema,
    pub additional_references: CompiledSchema,
}

impl FormContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            more_details: CompiledSchema::default(),
            additional_references: CompiledSchema::default(),
        }
    }

    pub fn with_dynamic_schemas(
        mut self,
        more_details: CompiledSchema,
        additional_references: CompiledSchema,
    ) -> Self {
        self.more_details = more_details;
        self.additional_references = additional_references;
        self
    }

    /// Same schemas, evaluated against another reference date.
    pub fn on(&self, today: NaiveDate) -> Self {
        Self {
            today,
            ..self.clone()
        }
    }
}

/// Declarative schema of one form plus its DTO mapping.
pub trait FormSchema: Serialize + DeserializeOwned + Validate + Default {
    const KIND: FormKind;

    /// Wire shape expected by the backend.
    type Dto: Serialize + DeserializeOwned;

    /// Cross-field "required when" rules evaluated against the whole draft.
    fn conditional_rules() -> Vec<ConditionalRule> {
        Vec::new()
    }

    /// Invariants that need typed access (sums, date ordering, ...).
    fn cross_field(&self, _ctx: &FormContext, _errors: &mut FieldErrors) {}

    /// Whole-object transform: trims, case conventions, clears fields that
    /// no longer apply. Never fails.
    fn normalize(self) -> Self;

    fn to_dto(&self) -> Self::Dto;

    fn from_dto(dto: Self::Dto) -> Self;

    /// Business reference recorded alongside a submission.
    fn reference(&self) -> String;

    /// Reads a (possibly partial) camelCase draft. Missing and `null` members
    /// take their defaults. Members that cannot be read (`"ten"` in a number
    /// field) also keep their defaults and are reported under their own path.
    fn read_draft(draft: Value) -> (Self, FieldErrors) {
        let draft = strip_nulls(draft);
        if let Ok(form) = serde_json::from_value(draft.clone()) {
            return (form, FieldErrors::new());
        }

        let mut accepted = Value::Object(Map::new());
        let mut errors = FieldErrors::new();
        if let Value::Object(members) = draft {
            for (key, member) in members {
                sift::<Self>(&mut accepted, &key, member, &mut errors);
            }
        }
        let form = serde_json::from_value(accepted).unwrap_or_else(|err| {
            log::error!("Failed to read sifted {} draft: {err}", Self::KIND);
            Self::default()
        });
        (form, errors)
    }

    fn check(&self, ctx: &FormContext) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(derived) = self.validate() {
            errors.extend_from_validator(&derived);
        }

        match serde_json::to_value(self) {
            Ok(draft) => apply_rules(&Self::conditional_rules(), &draft, "", &mut errors),
            Err(err) => log::error!("Failed to serialize {} draft for rules: {err}", Self::KIND),
        }

        self.cross_field(ctx, &mut errors);
        errors.into_result()
    }
}

/// Merges `value` into `accepted` at `path` when the result still reads as
/// an `F`. Objects and lists that do not read as a whole are descended into so
/// the message lands on the offending member.
fn sift<F: DeserializeOwned>(
    accepted: &mut Value,
    path: &str,
    value: Value,
    errors: &mut FieldErrors,
) {
    let reads = |candidate: &Value| serde_json::from_value::<F>(candidate.clone());

    let mut candidate = accepted.clone();
    set_path(&mut candidate, path, value.clone());
    let err = match reads(&candidate) {
        Ok(_) => {
            *accepted = candidate;
            return;
        }
        Err(err) => err,
    };

    let shell = match &value {
        Value::Object(members) if !members.is_empty() => Some(Value::Object(Map::new())),
        Value::Array(items) if !items.is_empty() => {
            Some(Value::Array(vec![Value::Object(Map::new()); items.len()]))
        }
        _ => None,
    };
    if let Some(shell) = shell {
        let mut candidate = accepted.clone();
        set_path(&mut candidate, path, shell);
        if reads(&candidate).is_ok() {
            *accepted = candidate;
            match value {
                Value::Object(members) => {
                    for (key, member) in members {
                        sift::<F>(accepted, &format!("{path}.{key}"), member, errors);
                    }
                }
                Value::Array(items) => {
                    for (index, item) in items.into_iter().enumerate() {
                        sift::<F>(accepted, &format!("{path}[{index}]"), item, errors);
                    }
                }
                _ => {}
            }
            return;
        }
    }

    errors.insert(path, unreadable_message(path, &err.to_string()));
}

/// `nominees[0].sharePercent` → `Share percent`.
fn field_label(path: &str) -> String {
    let last = path.rsplit('.').next().unwrap_or(path);
    let name = last.split('[').next().unwrap_or(last);
    let mut label = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() && !label.is_empty() {
            label.push(' ');
            label.extend(c.to_lowercase());
        } else if label.is_empty() {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
    }
    label
}

fn unreadable_message(path: &str, reason: &str) -> String {
    if reason.starts_with("must be") {
        format!("{} {reason}", field_label(path))
    } else {
        format!("{} is invalid", field_label(path))
    }
}

/// Reads, normalizes and checks a full draft.
pub fn validate_draft<F: FormSchema>(draft: Value, ctx: &FormContext) -> Result<F, FormError> {
    let (form, mut errors) = F::read_draft(draft);
    let form = form.normalize();
    if let Err(failed) = form.check(ctx) {
        errors.merge(failed);
    }
    errors.into_result()?;
    Ok(form)
}

/// Validates one field against the draft it belongs to.
///
/// `value` is merged into `draft` at `field` (dot paths allowed) and the
/// merged form is checked. Returns the message for `field` only, `None` when
/// the field is valid.
pub fn validate_field<F: FormSchema>(
    draft: &Value,
    field: &str,
    value: Value,
    ctx: &FormContext,
) -> Result<Option<String>, FormError> {
    let root = field.split(['.', '[']).next().unwrap_or_default();
    let known = serde_json::to_value(F::default()).map_err(|e| FormError::Malformed(e.to_string()))?;
    if known.get(root).is_none() {
        return Err(FormError::UnknownField(field.to_string()));
    }

    let mut merged = match draft {
        Value::Object(_) => draft.clone(),
        _ => Value::Object(Map::new()),
    };
    set_path(&mut merged, field, value);

    let (form, mut errors) = F::read_draft(merged);
    if let Err(failed) = form.normalize().check(ctx) {
        errors.merge(failed);
    }
    Ok(errors.get(field).map(str::to_string))
}

/// Maps a backend DTO back into the UI form shape.
pub fn draft_from_dto<F: FormSchema>(dto: Value) -> Result<Value, FormError> {
    let dto: F::Dto =
        serde_json::from_value(strip_nulls(dto)).map_err(|e| FormError::Malformed(e.to_string()))?;
    serde_json::to_value(F::from_dto(dto)).map_err(|e| FormError::Malformed(e.to_string()))
}

// Normalization helpers shared by the form modules.

pub(crate) fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

pub(crate) fn upper(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Collapses inner whitespace and upper-cases a person's name.
pub(crate) fn person_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Strips markup from free text.
pub(crate) fn sanitize(value: &str) -> String {
    ammonia::clean(value.trim()).trim().to_string()
}

pub(crate) fn yes_no(flag: bool) -> String {
    let flag = if flag { "Y" } else { "N" };
    flag.to_string()
}

pub(crate) fn is_yes(value: &str) -> bool {
    matches!(value.trim(), "Y" | "y" | "YES" | "Yes" | "yes" | "true")
}

pub(crate) fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Validates the format of an ISO date field and returns the parsed date.
pub(crate) fn check_date(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        return None;
    }
    let parsed = parse_iso_date(value);
    if parsed.is_none() {
        errors.insert(field, format!("{label} must be a valid date (yyyy-mm-dd)"));
    }
    parsed
}

pub(crate) fn check_not_future(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    date: Option<NaiveDate>,
    today: NaiveDate,
) {
    if date.is_some_and(|date| date > today) {
        errors.insert(field, format!("{label} cannot be in the future"));
    }
}

/// Records `message` on `to_field` when `to` precedes `from`.
pub(crate) fn check_order<T: PartialOrd>(
    errors: &mut FieldErrors,
    to_field: &str,
    from: Option<T>,
    to: Option<T>,
    message: &str,
) {
    if let (Some(from), Some(to)) = (from, to)
        && to < from
    {
        errors.insert(to_field, message);
    }
}

/// Whole years between `birth` and `today`.
pub(crate) fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    today.years_since(birth).map_or(0, |years| years as i32)
}

pub const ADULT_AGE: i32 = 18;

/// Format check applied only when `field` is filled in.
pub(crate) fn format_rule(field: &str, pattern: &str, message: &str) -> ConditionalRule {
    ConditionalRule::always(
        field,
        Requirement::Pattern {
            pattern: pattern.to_string(),
        },
        message,
    )
}

/// `field` is required while `depends_on` is ticked.
pub(crate) fn required_when_true(field: &str, depends_on: &str, message: &str) -> ConditionalRule {
    ConditionalRule::when(field, depends_on, Condition::IsTrue, Requirement::Required, message)
}

/// `field` is required while `depends_on` equals `expected`.
pub(crate) fn required_when_equals(
    field: &str,
    depends_on: &str,
    expected: &str,
    message: &str,
) -> ConditionalRule {
    ConditionalRule::when(
        field,
        depends_on,
        Condition::Equals(Value::String(expected.to_string())),
        Requirement::Required,
        message,
    )
}
