//! Min/max enforcement for numeric inputs.

use serde::{Deserialize, Serialize};

/// Which bound a value crossed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumericBounds {
    #[serde(default, alias = "minValue")]
    pub min: Option<f64>,
    #[serde(default, alias = "maxValue")]
    pub max: Option<f64>,
}

impl NumericBounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Rewrites out-of-range values to the violated bound.
    ///
    /// Values that do not parse as a finite number are returned unchanged.
    /// When clamping happens `on_exceeded` receives the original number and
    /// the bound that was hit.
    pub fn clamp(&self, value: &str, mut on_exceeded: impl FnMut(f64, Bound)) -> String {
        let Some(number) = parse_number(value) else {
            return value.to_string();
        };

        if let Some(max) = self.max
            && number > max
        {
            on_exceeded(number, Bound::Max);
            return format_number(max);
        }

        if let Some(min) = self.min
            && number < min
        {
            on_exceeded(number, Bound::Min);
            return format_number(min);
        }

        value.to_string()
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Formats a bound the way a user would type it (`100`, not `100.0`).
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clamp(bounds: NumericBounds, value: &str) -> (String, Option<(f64, Bound)>) {
        let mut hit = None;
        let result = bounds.clamp(value, |original, bound| hit = Some((original, bound)));
        (result, hit)
    }

    #[test]
    fn clamps_to_max_and_reports() {
        let bounds = NumericBounds::new(None, Some(100.0));
        assert_eq!(
            clamp(bounds, "150"),
            ("100".to_string(), Some((150.0, Bound::Max)))
        );
    }

    #[test]
    fn clamps_to_min_and_reports() {
        let bounds = NumericBounds::new(Some(1.5), Some(10.0));
        assert_eq!(
            clamp(bounds, "-3"),
            ("1.5".to_string(), Some((-3.0, Bound::Min)))
        );
    }

    #[test]
    fn within_range_is_untouched() {
        let bounds = NumericBounds::new(Some(0.0), Some(100.0));
        for value in ["0", "100", "42.50", " 7 "] {
            assert_eq!(clamp(bounds, value), (value.to_string(), None));
        }
    }

    #[test]
    fn unparseable_input_is_returned_unchanged() {
        let bounds = NumericBounds::new(Some(0.0), Some(1.0));
        for value in ["", "-", "abc", "NaN", "inf"] {
            assert_eq!(clamp(bounds, value), (value.to_string(), None));
        }
    }

    #[test]
    fn deserializes_legacy_prop_names() {
        let bounds: NumericBounds =
            serde_json::from_str(r#"{"minValue": 1, "maxValue": 5}"#).unwrap();
        assert_eq!(bounds, NumericBounds::new(Some(1.0), Some(5.0)));
    }
}
