//! Notification thresholds.
//!
//! A [`NotifyThreshold`] decides whether an event is significant enough to
//! notify about. Producers send rules as loose JSON objects; they are decoded
//! once at ingestion into this closed enum, and evaluation never errors.
//!
//! ```text
//! {"always": true}                    -> Always
//! {"never": true}                     -> Never
//! {"field": "change", "abs_gte": 2.0} -> FieldCompare { change, abs_gte, 2.0 }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::event::EventData;
use crate::error::ThresholdError;

/// Numeric comparison applied by a [`NotifyThreshold::FieldCompare`] rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
    AbsGt,
    AbsGte,
}

impl Comparison {
    /// Precedence used when a rule names more than one operator.
    const DECODE_ORDER: [Comparison; 6] = [
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::AbsGte,
        Self::AbsGt,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::AbsGt => "abs_gt",
            Self::AbsGte => "abs_gte",
        }
    }

    /// Compare `value` against `bound`.
    #[must_use]
    pub fn apply(self, value: f64, bound: f64) -> bool {
        match self {
            Self::Gt => value > bound,
            Self::Gte => value >= bound,
            Self::Lt => value < bound,
            Self::Lte => value <= bound,
            Self::AbsGt => value.abs() > bound,
            Self::AbsGte => value.abs() >= bound,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DECODE_ORDER
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ThresholdError::UnknownOperator(s.to_string()))
    }
}

/// Rule deciding whether an event should trigger a notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotifyThreshold {
    /// Always notify.
    #[default]
    Always,
    /// Never notify.
    Never,
    /// Notify when `data[field] <operator> bound` holds.
    FieldCompare {
        field: String,
        operator: Comparison,
        bound: f64,
    },
}

impl NotifyThreshold {
    /// Shorthand for a [`NotifyThreshold::FieldCompare`] rule.
    pub fn field_compare(field: impl Into<String>, operator: Comparison, bound: f64) -> Self {
        Self::FieldCompare {
            field: field.into(),
            operator,
            bound,
        }
    }

    /// Evaluate the rule against an event payload.
    ///
    /// Fails closed: a missing field or a value that does not coerce to a
    /// finite number yields `false`.
    #[must_use]
    pub fn evaluate(&self, data: &EventData) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::FieldCompare {
                field,
                operator,
                bound,
            } => data
                .get(field)
                .and_then(coerce_number)
                .is_some_and(|value| operator.apply(value, *bound)),
        }
    }

    /// Strictly decode a producer rule.
    ///
    /// `null` and `{}` decode to [`NotifyThreshold::Always`].
    ///
    /// # Errors
    ///
    /// Returns a [`ThresholdError`] for any shape other than the three
    /// documented forms.
    pub fn from_json(value: &Value) -> Result<Self, ThresholdError> {
        let rule = match value {
            Value::Null => return Ok(Self::Always),
            Value::Object(rule) => rule,
            _ => return Err(ThresholdError::NotAnObject),
        };

        if rule.is_empty() || rule.get("always") == Some(&Value::Bool(true)) {
            return Ok(Self::Always);
        }
        if rule.get("never") == Some(&Value::Bool(true)) {
            return Ok(Self::Never);
        }

        let Some(field) = rule.get("field") else {
            return Err(ThresholdError::Unrecognized);
        };
        let field = field.as_str().ok_or(ThresholdError::InvalidField)?;

        let found = Comparison::DECODE_ORDER
            .into_iter()
            .find_map(|op| rule.get(op.as_str()).map(|bound| (op, bound)));

        match found {
            Some((operator, bound)) => {
                let bound = bound
                    .as_f64()
                    .ok_or(ThresholdError::NonNumericBound {
                        operator: operator.as_str(),
                    })?;
                Ok(Self::field_compare(field, operator, bound))
            }
            None => match rule
                .keys()
                .find(|key| !matches!(key.as_str(), "field" | "always" | "never"))
            {
                Some(unknown) => Err(ThresholdError::UnknownOperator(unknown.clone())),
                None => Err(ThresholdError::MissingOperator {
                    field: field.to_string(),
                }),
            },
        }
    }

    /// Decode a producer rule, failing closed to [`NotifyThreshold::Never`]
    /// on anything malformed. A missing rule means [`NotifyThreshold::Always`].
    pub fn from_json_lenient(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::Always;
        };

        match Self::from_json(value) {
            Ok(threshold) => threshold,
            Err(e) => {
                warn!(error = %e, rule = %value, "Malformed notify_threshold, failing closed");
                Self::Never
            }
        }
    }
}

impl fmt::Display for NotifyThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::Never => f.write_str("never"),
            Self::FieldCompare {
                field,
                operator,
                bound,
            } => write!(f, "{field} {operator} {bound}"),
        }
    }
}

/// Coerce a payload value to a finite number.
///
/// Strings are accepted with display formatting stripped, so `"$45,230.50"`
/// and `"+5.3%"` both coerce.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%' | '+'))
                .collect();
            cleaned.trim().parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> EventData {
        match value {
            Value::Object(map) => map,
            _ => EventData::new(),
        }
    }

    #[test]
    fn always_passes_regardless_of_data() {
        assert!(NotifyThreshold::Always.evaluate(&EventData::new()));
        assert!(NotifyThreshold::Always.evaluate(&data(json!({"change": "garbage"}))));
    }

    #[test]
    fn never_fails_regardless_of_data() {
        assert!(!NotifyThreshold::Never.evaluate(&EventData::new()));
        assert!(!NotifyThreshold::Never.evaluate(&data(json!({"change": 100.0}))));
    }

    #[test]
    fn abs_gte_on_change() {
        let rule = NotifyThreshold::field_compare("change", Comparison::AbsGte, 2.0);

        assert!(rule.evaluate(&data(json!({"change": -3.5}))));
        assert!(!rule.evaluate(&data(json!({"change": 1.0}))));
        assert!(!rule.evaluate(&EventData::new()));
    }

    #[test]
    fn each_operator_compares_as_named() {
        let cases = [
            (Comparison::Gt, 5.0, 5.0, false),
            (Comparison::Gte, 5.0, 5.0, true),
            (Comparison::Lt, 4.9, 5.0, true),
            (Comparison::Lte, 5.1, 5.0, false),
            (Comparison::AbsGt, -5.0, 5.0, false),
            (Comparison::AbsGte, -5.0, 5.0, true),
        ];

        for (op, value, bound, expected) in cases {
            assert_eq!(op.apply(value, bound), expected, "{value} {op} {bound}");
        }
    }

    #[test]
    fn formatted_strings_are_coerced() {
        assert_eq!(coerce_number(&json!("+5.3%")), Some(5.3));
        assert_eq!(coerce_number(&json!("$45,230.50")), Some(45230.5));
        assert_eq!(coerce_number(&json!(" -2 ")), Some(-2.0));
    }

    #[test]
    fn non_numeric_values_fail_closed() {
        let rule = NotifyThreshold::field_compare("price", Comparison::Gt, 0.0);

        assert!(!rule.evaluate(&data(json!({"price": "n/a"}))));
        assert!(!rule.evaluate(&data(json!({"price": true}))));
        assert!(!rule.evaluate(&data(json!({"price": null}))));
        assert!(!rule.evaluate(&data(json!({"price": [1, 2]}))));
        assert!(!rule.evaluate(&data(json!({"price": "inf"}))));
        assert!(!rule.evaluate(&data(json!({"price": "NaN"}))));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let rule = NotifyThreshold::field_compare("volume", Comparison::Gt, 100.0);
        let payload = data(json!({"volume": "150"}));

        assert_eq!(rule.evaluate(&payload), rule.evaluate(&payload));
    }

    #[test]
    fn decodes_documented_shapes() {
        assert_eq!(
            NotifyThreshold::from_json(&json!({"always": true})),
            Ok(NotifyThreshold::Always)
        );
        assert_eq!(
            NotifyThreshold::from_json(&json!({"never": true})),
            Ok(NotifyThreshold::Never)
        );
        assert_eq!(
            NotifyThreshold::from_json(&json!({"field": "change", "abs_gte": 2})),
            Ok(NotifyThreshold::field_compare("change", Comparison::AbsGte, 2.0))
        );
        assert_eq!(NotifyThreshold::from_json(&json!({})), Ok(NotifyThreshold::Always));
        assert_eq!(NotifyThreshold::from_json(&Value::Null), Ok(NotifyThreshold::Always));
    }

    #[test]
    fn first_operator_in_precedence_order_wins() {
        let rule = NotifyThreshold::from_json(&json!({"field": "x", "lt": 1, "gte": 10}));
        assert_eq!(
            rule,
            Ok(NotifyThreshold::field_compare("x", Comparison::Gte, 10.0))
        );
    }

    #[test]
    fn rejects_malformed_rules() {
        assert_eq!(
            NotifyThreshold::from_json(&json!({"field": "x", "between": [1, 2]})),
            Err(ThresholdError::UnknownOperator("between".to_string()))
        );
        assert_eq!(
            NotifyThreshold::from_json(&json!({"field": "x"})),
            Err(ThresholdError::MissingOperator {
                field: "x".to_string()
            })
        );
        assert_eq!(
            NotifyThreshold::from_json(&json!({"field": "x", "gt": "ten"})),
            Err(ThresholdError::NonNumericBound { operator: "gt" })
        );
        assert_eq!(
            NotifyThreshold::from_json(&json!({"field": 3, "gt": 1})),
            Err(ThresholdError::InvalidField)
        );
        assert_eq!(
            NotifyThreshold::from_json(&json!("always")),
            Err(ThresholdError::NotAnObject)
        );
        assert_eq!(
            NotifyThreshold::from_json(&json!({"sometimes": true})),
            Err(ThresholdError::Unrecognized)
        );
    }

    #[test]
    fn lenient_decoding_fails_closed() {
        let rule = json!({"field": "change", "approx": 2.0});
        assert_eq!(
            NotifyThreshold::from_json_lenient(Some(&rule)),
            NotifyThreshold::Never
        );
        assert_eq!(NotifyThreshold::from_json_lenient(None), NotifyThreshold::Always);
    }

    #[test]
    fn operator_names_round_trip_through_from_str() {
        for op in Comparison::DECODE_ORDER {
            assert_eq!(op.as_str().parse::<Comparison>(), Ok(op));
        }
        assert!("approx".parse::<Comparison>().is_err());
    }
}
