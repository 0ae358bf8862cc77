//! Deserializers for values typed into text inputs.
//!
//! Browsers hand numbers and checkboxes over as strings as often as not; these
//! helpers accept both shapes and treat a blank string as "not provided".

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::{Deserializer, Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Bool(bool),
    Number(f64),
    Text(String),
}

fn parse_number<E: Error>(text: &str) -> Result<Option<f64>, E> {
    let text = text.trim().replace(',', "");
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Some)
        .ok_or_else(|| E::custom("must be a number"))
}

/// Number or numeric string; blank becomes `None`.
pub fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(Some(n)),
        Raw::Text(text) => parse_number(&text),
        Raw::Bool(_) => Err(D::Error::custom("must be a number")),
    }
}

/// Number or numeric string; blank becomes zero.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    optional_number(deserializer).map(Option::unwrap_or_default)
}

/// Whole non-negative number; blank becomes zero.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = number(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(D::Error::custom("must be a whole number"));
    }
    Ok(value as u32)
}

/// Checkbox value: `true`/`false`, `"Y"`/`"N"`, `"yes"`/`"no"`, `1`/`0`.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Number(n) => Ok(n != 0.0),
        Raw::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "no" | "false" | "0" => Ok(false),
            "y" | "yes" | "true" | "1" => Ok(true),
            _ => Err(D::Error::custom("must be yes or no")),
        },
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(text) => text,
        }
    }
}

fn stringify(raw: BTreeMap<String, Scalar>) -> BTreeMap<String, String> {
    raw.into_iter().map(|(k, v)| (k, v.into())).collect()
}

/// Free-form key/value section whose values may arrive as numbers or flags.
pub fn text_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    BTreeMap::<String, Scalar>::deserialize(deserializer).map(stringify)
}

/// List of [`text_map`] sections.
pub fn text_maps<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<BTreeMap<String, String>>, D::Error> {
    Vec::<BTreeMap<String, Scalar>>::deserialize(deserializer)
        .map(|maps| maps.into_iter().map(stringify).collect())
}
