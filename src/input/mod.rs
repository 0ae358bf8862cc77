//! Keystroke and change handling for form inputs: character restrictions,
//! numeric bounds and date masking.

use serde::{Deserialize, Serialize};

pub mod clamp;
pub mod date;
pub mod restriction;

use clamp::{Bound, NumericBounds};
use date::{DateFormat, format_date_input};
use restriction::{KeyPress, Restriction, RestrictionKind};

/// Legacy `type` attribute of the input.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Number,
    Date,
}

/// Everything an input component needs to process a change.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InputConfig {
    pub input_type: InputType,
    pub restriction: Option<Restriction>,
    pub bounds: NumericBounds,
    pub date_format: DateFormat,
}

/// Result of running a raw value through [`InputConfig::on_change`].
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOutcome {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exceeded: Option<Exceeded>,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Exceeded {
    pub value: f64,
    pub bound: Bound,
}

fn legacy_number_filter(value: &str) -> (String, String) {
    value
        .chars()
        .partition(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
}

impl InputConfig {
    pub fn with_restriction(restriction: Restriction) -> Self {
        Self {
            restriction: Some(restriction),
            ..Self::default()
        }
    }

    /// Clamping is opt-in: numeric input type or a numeric restriction.
    pub fn clamps(&self) -> bool {
        self.input_type == InputType::Number
            || self
                .restriction
                .as_ref()
                .is_some_and(|r| r.kind == RestrictionKind::Numeric)
    }

    /// Processes a change or paste event.
    ///
    /// A configured restriction takes precedence over the legacy number
    /// filter; the two are never applied together.
    pub fn on_change(&self, raw: &str) -> ChangeOutcome {
        let (mut value, removed) = match (&self.restriction, self.input_type) {
            (Some(restriction), _) => {
                let filtered = restriction.filter(raw);
                (filtered.value, filtered.removed)
            }
            (None, InputType::Number) => legacy_number_filter(raw),
            (None, InputType::Date) => (format_date_input(raw, self.date_format), String::new()),
            (None, InputType::Text) => (raw.to_string(), String::new()),
        };

        let mut exceeded = None;
        if self.clamps() && !self.bounds.is_unbounded() {
            value = self
                .bounds
                .clamp(&value, |value, bound| exceeded = Some(Exceeded { value, bound }));
        }

        ChangeOutcome {
            value,
            removed: Some(removed).filter(|r| !r.is_empty()),
            exceeded,
        }
    }

    /// Keystroke gate.
    pub fn on_key(&self, event: &KeyPress) -> bool {
        match (&self.restriction, self.input_type) {
            (Some(restriction), _) => restriction.allows_key(event),
            (None, InputType::Number) | (None, InputType::Date) => {
                let numeric = Restriction::new(RestrictionKind::Numeric);
                numeric.allows_key(event)
                    || (self.input_type == InputType::Number
                        && matches!(event.key.as_str(), "." | "-"))
            }
            (None, InputType::Text) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_restriction_clamps() {
        let config = InputConfig {
            restriction: Some(Restriction::new(RestrictionKind::Numeric)),
            bounds: NumericBounds::new(None, Some(100.0)),
            ..InputConfig::default()
        };
        let outcome = config.on_change("15a0");
        assert_eq!(outcome.value, "100");
        assert_eq!(outcome.removed.as_deref(), Some("a"));
        assert_eq!(
            outcome.exceeded,
            Some(Exceeded {
                value: 150.0,
                bound: Bound::Max
            })
        );
    }

    #[test]
    fn text_input_never_clamps() {
        let config = InputConfig {
            restriction: Some(Restriction::new(RestrictionKind::Alphanumeric)),
            bounds: NumericBounds::new(None, Some(10.0)),
            ..InputConfig::default()
        };
        assert!(!config.clamps());
        assert_eq!(config.on_change("500").value, "500");
    }

    #[test]
    fn restriction_wins_over_legacy_number_type() {
        let config = InputConfig {
            input_type: InputType::Number,
            restriction: Some(Restriction::new(RestrictionKind::Numeric)),
            ..InputConfig::default()
        };
        assert_eq!(config.on_change("-1.5").value, "15");
        assert!(!config.on_key(&KeyPress::new(".")));
    }

    #[test]
    fn legacy_number_type_keeps_sign_and_point() {
        let config = InputConfig {
            input_type: InputType::Number,
            bounds: NumericBounds::new(Some(-10.0), None),
            ..InputConfig::default()
        };
        let outcome = config.on_change("-12.5x");
        assert_eq!(outcome.value, "-10");
        assert_eq!(outcome.removed.as_deref(), Some("x"));
        assert!(config.on_key(&KeyPress::new("-")));
        assert!(!config.on_key(&KeyPress::new("e")));
    }

    #[test]
    fn date_input_masks() {
        let config = InputConfig {
            input_type: InputType::Date,
            date_format: DateFormat::MmDdYyyy,
            ..InputConfig::default()
        };
        assert_eq!(config.on_change("12252024").value, "12/25/2024");
        assert!(!config.on_key(&KeyPress::new("/")));
    }

    #[test]
    fn config_deserializes_from_component_props() {
        let config: InputConfig = serde_json::from_str(
            r#"{"inputType":"number","restriction":{"kind":"numeric"},"bounds":{"maxValue":5}}"#,
        )
        .unwrap();
        assert!(config.clamps());
        assert_eq!(config.bounds.max, Some(5.0));
    }
}
