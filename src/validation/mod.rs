//! Library-agnostic validation primitives shared by every form.
//!
//! Failures are collected into [`FieldErrors`], one human readable message
//! per field path. Nothing in this module panics or returns early on the
//! first failure.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

pub mod dynamic;
pub mod rules;

/// Field path → message. The first message recorded for a path wins.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already failed.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    /// Flattens derive-generated errors, translating Rust field names to the
    /// camelCase paths used by the forms on the wire.
    pub fn extend_from_validator(&mut self, errors: &ValidationErrors) {
        collect_validator_errors("", errors, self);
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        out.extend_from_validator(errors);
        out
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn collect_validator_errors(prefix: &str, errors: &ValidationErrors, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, &camel_case(field));
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    out.insert(path, message_for(field, first));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_validator_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validator_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn message_for(field: &str, error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("{} is invalid", humanize(field)),
    }
}

/// `guardian_customer_id` → `guardianCustomerId`.
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// `guardian_customer_id` → `Guardian customer id`.
pub fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits `nominees[2]` into `("nominees", Some(2))`.
fn split_index(segment: &str) -> (&str, Option<usize>) {
    if let Some(open) = segment.find('[')
        && let Some(index) = segment[open + 1..]
            .strip_suffix(']')
            .and_then(|i| i.parse().ok())
    {
        return (&segment[..open], Some(index));
    }
    (segment, None)
}

/// Looks up a dot separated path (`address.pincode`, `nominees[0].name`)
/// inside a draft.
pub fn lookup<'a>(draft: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(draft, |current, segment| {
        let (key, index) = split_index(segment);
        let value = current.get(key)?;
        match index {
            Some(index) => value.get(index),
            None => Some(value),
        }
    })
}

/// Writes `value` at `path`, creating intermediate objects and padding lists
/// with empty objects as needed.
pub fn set_path(draft: &mut Value, path: &str, value: Value) {
    let mut current = draft;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let (key, index) = split_index(segment);
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        let last = segments.peek().is_none();

        let slot = match index {
            None if last => {
                map.insert(key.to_string(), value);
                return;
            }
            None => map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            Some(index) => {
                let list = map
                    .entry(key.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !list.is_array() {
                    *list = Value::Array(Vec::new());
                }
                let Value::Array(items) = list else {
                    return;
                };
                while items.len() <= index {
                    items.push(Value::Object(Map::new()));
                }
                &mut items[index]
            }
        };
        if last {
            *slot = value;
            return;
        }
        current = slot;
    }
}

/// Removes `null` members so partially filled drafts fall back to defaults.
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// A value counts as blank when it is missing, `null`, an all-whitespace
/// string or an empty list.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Address {
        #[validate(length(min = 1, message = "City is required"))]
        city_name: String,
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "First name is required"))]
        first_name: String,
        #[validate(range(min = 1))]
        share_count: i32,
        #[validate(nested)]
        home_address: Address,
    }

    #[test]
    fn first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("pan", "PAN is required");
        errors.insert("pan", "PAN is invalid");
        assert_eq!(errors.get("pan"), Some("PAN is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn validator_errors_use_camel_case_paths() {
        let sample = Sample {
            first_name: String::new(),
            share_count: 0,
            home_address: Address {
                city_name: String::new(),
            },
        };
        let errors = FieldErrors::from(&sample.validate().unwrap_err());
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("shareCount"), Some("Share count is invalid"));
        assert_eq!(errors.get("homeAddress.cityName"), Some("City is required"));
    }

    #[test]
    fn camel_case_and_humanize() {
        assert_eq!(camel_case("guardian_customer_id"), "guardianCustomerId");
        assert_eq!(camel_case("pan"), "pan");
        assert_eq!(humanize("date_of_birth"), "Date of birth");
    }

    #[test]
    fn path_helpers() {
        let mut draft = json!({ "address": { "city": "Pune" } });
        assert_eq!(lookup(&draft, "address.city"), Some(&json!("Pune")));
        assert_eq!(lookup(&draft, "address.pincode"), None);

        set_path(&mut draft, "address.pincode", json!("411001"));
        set_path(&mut draft, "isMinor", json!(true));
        assert_eq!(draft["address"]["pincode"], "411001");
        assert_eq!(draft["isMinor"], true);
    }

    #[test]
    fn path_helpers_index_lists() {
        let mut draft = json!({ "nominees": [ { "name": "A" } ] });
        assert_eq!(lookup(&draft, "nominees[0].name"), Some(&json!("A")));
        assert_eq!(lookup(&draft, "nominees[3].name"), None);

        set_path(&mut draft, "nominees[2].name", json!("C"));
        assert_eq!(draft["nominees"][1], json!({}));
        assert_eq!(draft["nominees"][2]["name"], "C");

        set_path(&mut draft, "nominees[0]", json!({ "name": "Z" }));
        assert_eq!(draft["nominees"][0]["name"], "Z");
    }

    #[test]
    fn strip_nulls_recurses() {
        let cleaned = strip_nulls(json!({ "a": null, "b": { "c": null, "d": 1 }, "e": [ { "f": null } ] }));
        assert_eq!(cleaned, json!({ "b": { "d": 1 }, "e": [ {} ] }));
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&json!("  "))));
        assert!(is_blank(Some(&json!([]))));
        assert!(!is_blank(Some(&json!(false))));
        assert!(!is_blank(Some(&json!(0))));
    }
}
