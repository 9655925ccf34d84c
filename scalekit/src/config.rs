//! One serde entry point for every scale family, for callers that read
//! scale definitions from JSON or similar documents.

use chrono::DateTime;
use paste::paste;
use scalekit_common::color::parse_css_color;
use scalekit_common::value::Value;
use serde::{Deserialize, Serialize};

use crate::band::{BandScale, BandScaleConfig};
use crate::color::diverging::{DivergingScale, DivergingScaleConfig};
use crate::color::sequential::{SequentialScale, SequentialScaleConfig};
use crate::error::ScaleError;
use crate::numeric::identity::{IdentityScale, IdentityScaleConfig};
use crate::numeric::linear::{LinearScale, LinearScaleConfig};
use crate::numeric::log::{LogScale, LogScaleConfig};
use crate::numeric::pow::{PowScale, PowScaleConfig};
use crate::numeric::radial::{RadialScale, RadialScaleConfig};
use crate::numeric::symlog::{SymlogScale, SymlogScaleConfig};
use crate::numeric::ContinuousScale;
use crate::ordinal::{OrdinalScale, OrdinalScaleConfig};
use crate::point::{PointScale, PointScaleConfig};
use crate::quantile::{QuantileScale, QuantileScaleConfig};
use crate::quantize::{QuantizeScale, QuantizeScaleConfig};
use crate::temporal::{TimeScale, TimeScaleConfig};
use crate::threshold::{ThresholdScale, ThresholdScaleConfig};

macro_rules! scale_families {
    ($($family:ident $(<$($arg:ty),*>)? $(=> $fallible:tt)?),* $(,)?) => {
        paste! {
            /// A scale definition tagged by family, e.g.
            /// `{"type": "band", "domain": ["a", "b"], "range": [0, 100]}`.
            #[derive(Clone, Debug, Serialize, Deserialize)]
            #[serde(tag = "type", rename_all = "snake_case")]
            pub enum ScaleConfig {
                $($family([<$family ScaleConfig>] $(<$($arg),*>)?),)*
            }

            /// A scale of any family, producing [`Value`]s.
            #[derive(Clone, Debug)]
            pub enum Scale {
                $($family([<$family Scale>] $(<$($arg),*>)?),)*
            }

            impl ScaleConfig {
                pub fn build(&self) -> Result<Scale, ScaleError> {
                    if let Some(range) = self.interpolated_range() {
                        check_interpolable(range)?;
                    }
                    Ok(match self {
                        $(ScaleConfig::$family(config) => {
                            Scale::$family([<$family Scale>]::new(config) $($fallible)?)
                        })*
                    })
                }
            }
        }
    };
}

scale_families! {
    Linear<Value>,
    Pow<Value>,
    Log<Value>,
    Symlog<Value>,
    Identity,
    Radial,
    Time<Value> => ?,
    Band<Value>,
    Point<Value>,
    Quantile<Value>,
    Quantize<Value>,
    Threshold<f64, Value>,
    Ordinal<Value, Value>,
    Sequential<Value>,
    Diverging<Value>,
}

impl ScaleConfig {
    /// The range of families that interpolate between range values.
    fn interpolated_range(&self) -> Option<&[Value]> {
        match self {
            ScaleConfig::Linear(config) => Some(&config.range),
            ScaleConfig::Pow(config) => Some(&config.range),
            ScaleConfig::Log(config) => Some(&config.range),
            ScaleConfig::Symlog(config) => Some(&config.range),
            ScaleConfig::Time(config) => Some(&config.range),
            ScaleConfig::Sequential(config) => Some(&config.range),
            ScaleConfig::Diverging(config) => Some(&config.range),
            _ => None,
        }
    }
}

/// Rejects ranges that cannot be interpolated: text beside colors must
/// itself be a color, and numbers only mix with numbers or text.
fn check_interpolable(range: &[Value]) -> Result<(), ScaleError> {
    let has_color = range.iter().any(|v| matches!(v, Value::Color(_)));
    let has_number = range.iter().any(|v| matches!(v, Value::Number(_)));
    for value in range {
        match value {
            Value::Text(s) if has_color => {
                parse_css_color(s)?;
            }
            Value::Color(_) | Value::Array(_) | Value::Object(_) if has_number => {
                return Err(ScaleError::NonNumericRange(value.to_string()));
            }
            _ => {}
        }
    }
    Ok(())
}

impl Scale {
    /// Maps one input.
    ///
    /// Numeric families read `x` as a number and time scales as epoch
    /// milliseconds or an RFC 3339 string. Band, point and ordinal scales
    /// use `x` as a key; ordinal scales may grow their domain.
    pub fn apply(&mut self, x: &Value) -> Option<Value> {
        let number = || x.as_number().unwrap_or(f64::NAN);
        match self {
            Scale::Linear(scale) => scale.scale(number()),
            Scale::Pow(scale) => scale.scale(number()),
            Scale::Log(scale) => scale.scale(number()),
            Scale::Symlog(scale) => scale.scale(number()),
            Scale::Identity(scale) => scale.scale(number()).map(Value::Number),
            Scale::Radial(scale) => scale.scale(number()).map(Value::Number),
            Scale::Time(scale) => match x {
                Value::Text(s) => match DateTime::parse_from_rfc3339(s) {
                    Ok(date) => scale.scale_millis(date.timestamp_millis() as f64),
                    Err(_) => scale.scale_millis(f64::NAN),
                },
                _ => scale.scale_millis(number()),
            },
            Scale::Band(scale) => scale.scale(x).map(Value::Number),
            Scale::Point(scale) => scale.scale(x).map(Value::Number),
            Scale::Quantile(scale) => scale.scale(number()),
            Scale::Quantize(scale) => scale.scale(number()),
            Scale::Threshold(scale) => scale.scale(&number()),
            Scale::Ordinal(scale) => scale.lookup_or_insert(x.clone()),
            Scale::Sequential(scale) => scale.scale(number()),
            Scale::Diverging(scale) => scale.scale(number()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalekit_common::color::InvalidColor;

    fn build(json: &str) -> Scale {
        serde_json::from_str::<ScaleConfig>(json)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_linear_color_range() {
        let mut scale = build(r#"{"type": "linear", "domain": [0, 10], "range": ["red", "blue"]}"#);
        let mid = scale.apply(&Value::Number(5.0)).unwrap();
        assert_eq!(mid.to_string(), "rgb(128, 0, 128)");
        assert_eq!(scale.apply(&Value::Text("n/a".into())), None);
    }

    #[test]
    fn test_band_keys() {
        let mut scale =
            build(r#"{"type": "band", "domain": ["a", "b"], "range": [0, 100], "padding_inner": 0}"#);
        assert_eq!(scale.apply(&"b".into()), Some(Value::Number(50.0)));
        assert_eq!(scale.apply(&"c".into()), None);
    }

    #[test]
    fn test_ordinal_grows() {
        let mut scale = build(r#"{"type": "ordinal", "range": ["red", "green"]}"#);
        assert_eq!(scale.apply(&"x".into()), Some(Value::parse("red")));
        assert_eq!(scale.apply(&"y".into()), Some(Value::parse("green")));
        match scale {
            Scale::Ordinal(ordinal) => assert_eq!(ordinal.domain().len(), 2),
            other => panic!("unexpected scale {other:?}"),
        }
    }

    #[test]
    fn test_time_accepts_rfc3339() {
        let mut scale = build(
            r#"{"type": "time", "domain": ["2000-01-01T00:00:00Z", "2000-01-03T00:00:00Z"],
                "range": [0, 100]}"#,
        );
        let y = scale.apply(&Value::Text("2000-01-02T00:00:00Z".into()));
        assert_eq!(y, Some(Value::Number(50.0)));
    }

    #[test]
    fn test_threshold_and_quantize() {
        let mut scale = build(r#"{"type": "threshold", "domain": [0], "range": ["neg", "pos"]}"#);
        assert_eq!(scale.apply(&Value::Number(-3.0)), Some(Value::Text("neg".into())));

        let mut scale = build(r#"{"type": "quantize", "domain": [0, 1], "range": [1, 2]}"#);
        assert_eq!(scale.apply(&Value::Number(0.9)), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_bad_time_zone() {
        let config: ScaleConfig =
            serde_json::from_str(r#"{"type": "time", "time_zone": "Mars/Olympus"}"#).unwrap();
        assert!(matches!(config.build(), Err(ScaleError::UnknownTimeZone(_))));
    }

    #[test]
    fn test_invalid_color_range() {
        for family in ["linear", "sequential", "time"] {
            let config: ScaleConfig = serde_json::from_str(&format!(
                r#"{{"type": "{family}", "range": ["notacolor", "blue"]}}"#
            ))
            .unwrap();
            assert_eq!(
                config.build().err(),
                Some(ScaleError::InvalidColor(InvalidColor("notacolor".to_string())))
            );
        }
    }

    #[test]
    fn test_mixed_number_range() {
        let config: ScaleConfig =
            serde_json::from_str(r#"{"type": "pow", "range": [0, "red"]}"#).unwrap();
        assert!(matches!(config.build(), Err(ScaleError::NonNumericRange(_))));

        // Text ranges interpolate the numbers they embed.
        let mut scale = build(r#"{"type": "linear", "range": ["0px", "10px"]}"#);
        assert_eq!(scale.apply(&Value::Number(0.5)), Some(Value::Text("5px".into())));
    }

    #[test]
    fn test_unknown_type() {
        assert!(serde_json::from_str::<ScaleConfig>(r#"{"type": "spiral"}"#).is_err());
    }
}
