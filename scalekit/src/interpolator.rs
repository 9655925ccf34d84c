use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use palette::{Hsla, IntoColor, Laba, Lcha, Mix, Srgba};
use regex::Regex;
use scalekit_common::color::parse_css_color;
use scalekit_common::value::Value;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"[-+]?(?:\d+\.?\d*|\.?\d+)(?:[eE][-+]?\d+)?").unwrap();
}

/// Blends two range values. `t` is usually in `[0, 1]` but extrapolation
/// outside that interval must be supported.
pub trait Interpolator<R>: Debug + Send + Sync + 'static {
    fn interpolate(&self, a: &R, b: &R, t: f64) -> R;
}

/// A unary interpolator over `[0, 1]`, as consumed by sequential and
/// diverging scales.
pub type Ramp<R> = Arc<dyn Fn(f64) -> R + Send + Sync>;

/// Range element types that continuous scales can produce.
pub trait Interpolate: Clone + Debug + Send + Sync + 'static {
    fn default_interpolator() -> Arc<dyn Interpolator<Self>>;

    /// Interpolator used by `range_round`.
    fn round_interpolator() -> Arc<dyn Interpolator<Self>>;

    /// Numeric view used for inversion; `None` when the value has no numeric meaning.
    fn to_number(&self) -> Option<f64>;

    /// Used to build the default `[0, 1]` range.
    fn from_number(v: f64) -> Self;
}

impl Interpolate for f64 {
    fn default_interpolator() -> Arc<dyn Interpolator<Self>> {
        Arc::new(NumberInterpolator)
    }

    fn round_interpolator() -> Arc<dyn Interpolator<Self>> {
        Arc::new(RoundInterpolator)
    }

    fn to_number(&self) -> Option<f64> {
        Some(*self)
    }

    fn from_number(v: f64) -> Self {
        v
    }
}

impl Interpolate for Value {
    fn default_interpolator() -> Arc<dyn Interpolator<Self>> {
        Arc::new(ValueInterpolator::default())
    }

    fn round_interpolator() -> Arc<dyn Interpolator<Self>> {
        Arc::new(RoundInterpolator)
    }

    fn to_number(&self) -> Option<f64> {
        self.as_number()
    }

    fn from_number(v: f64) -> Self {
        Value::Number(v)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberInterpolator;

impl Interpolator<f64> for NumberInterpolator {
    fn interpolate(&self, a: &f64, b: &f64, t: f64) -> f64 {
        a * (1.0 - t) + b * t
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoundInterpolator;

impl Interpolator<f64> for RoundInterpolator {
    fn interpolate(&self, a: &f64, b: &f64, t: f64) -> f64 {
        (a * (1.0 - t) + b * t).round()
    }
}

impl Interpolator<Value> for RoundInterpolator {
    fn interpolate(&self, a: &Value, b: &Value, t: f64) -> Value {
        match interpolate_value(a, b, t, ColorSpace::Rgb) {
            Value::Number(v) => Value::Number(v.round()),
            other => other,
        }
    }
}

/// Color space used to blend colors.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColorSpace {
    #[default]
    Rgb,
    Hsl,
    Lab,
    Hcl,
}

/// Interpolates [`Value`]s, dispatching on the type of the end value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueInterpolator {
    pub color_space: ColorSpace,
}

impl ValueInterpolator {
    pub fn new(color_space: ColorSpace) -> Self {
        Self { color_space }
    }
}

impl Interpolator<Value> for ValueInterpolator {
    fn interpolate(&self, a: &Value, b: &Value, t: f64) -> Value {
        interpolate_value(a, b, t, self.color_space)
    }
}

/// Adapts a closure into an [`Interpolator`].
#[derive(Clone)]
pub struct FnInterpolator<F>(pub F);

impl<F> Debug for FnInterpolator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnInterpolator")
    }
}

impl<R, F> Interpolator<R> for FnInterpolator<F>
where
    F: Fn(&R, &R, f64) -> R + Send + Sync + 'static,
{
    fn interpolate(&self, a: &R, b: &R, t: f64) -> R {
        (self.0)(a, b, t)
    }
}

/// Interpolate two values the way their end value dictates:
/// - numbers blend linearly (a non-numeric start yields NaN);
/// - colors blend in `space` (a non-color start yields the end color);
/// - text blends the numbers embedded in it, keeping the end value's text;
/// - arrays and objects blend member-wise, members only in `b` are copied.
pub fn interpolate_value(a: &Value, b: &Value, t: f64, space: ColorSpace) -> Value {
    match b {
        Value::Number(b) => {
            let a = a.as_number().unwrap_or(f64::NAN);
            Value::Number(a * (1.0 - t) + b * t)
        }
        Value::Color(b) => match coerce_color(a) {
            Some(a) => Value::Color(mix_colors(a, *b, t as f32, space)),
            None => Value::Color(*b),
        },
        Value::Text(b) => match a {
            Value::Text(a) => Value::Text(interpolate_text(a, b, t)),
            _ => Value::Text(b.clone()),
        },
        Value::Array(b) => {
            let a = a.as_array().unwrap_or_default();
            Value::Array(
                b.iter()
                    .enumerate()
                    .map(|(i, bv)| match a.get(i) {
                        Some(av) => interpolate_value(av, bv, t, space),
                        None => bv.clone(),
                    })
                    .collect(),
            )
        }
        Value::Object(b) => {
            let a = a.as_object();
            let members: IndexMap<String, Value> = b
                .iter()
                .map(|(k, bv)| {
                    let v = match a.and_then(|a| a.get(k)) {
                        Some(av) => interpolate_value(av, bv, t, space),
                        None => bv.clone(),
                    };
                    (k.clone(), v)
                })
                .collect();
            Value::Object(members)
        }
    }
}

fn coerce_color(v: &Value) -> Option<Srgba> {
    match v {
        Value::Color(c) => Some(*c),
        Value::Text(s) => parse_css_color(s).ok(),
        _ => None,
    }
}

fn mix_colors(a: Srgba, b: Srgba, t: f32, space: ColorSpace) -> Srgba {
    match space {
        ColorSpace::Rgb => a.mix(b, t),
        ColorSpace::Hsl => mix_in::<Hsla>(a, b, t),
        ColorSpace::Lab => mix_in::<Laba>(a, b, t),
        ColorSpace::Hcl => mix_in::<Lcha>(a, b, t),
    }
}

fn mix_in<C>(a: Srgba, b: Srgba, t: f32) -> Srgba
where
    C: Mix<Scalar = f32> + Copy + IntoColor<Srgba>,
    Srgba: IntoColor<C>,
{
    let a: C = a.into_color();
    let b: C = b.into_color();
    a.mix(b, t).into_color()
}

/// Blend the numbers embedded in two strings, using `b` as the template.
fn interpolate_text(a: &str, b: &str, t: f64) -> String {
    let starts: Vec<f64> = NUMBER
        .find_iter(a)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    let mut out = String::with_capacity(b.len());
    let mut last = 0;
    for (i, m) in NUMBER.find_iter(b).enumerate() {
        out.push_str(&b[last..m.start()]);
        match (starts.get(i), m.as_str().parse::<f64>()) {
            (Some(a), Ok(b)) => out.push_str(&(a * (1.0 - t) + b * t).to_string()),
            _ => out.push_str(m.as_str()),
        }
        last = m.end();
    }
    out.push_str(&b[last..]);
    out
}

/// Chain pairwise interpolators over `values` into a single ramp over
/// `[0, 1]`, each consecutive pair taking an equal share. `None` when
/// `values` is empty.
pub fn piecewise<R: Clone + Send + Sync + 'static>(
    interpolator: Arc<dyn Interpolator<R>>,
    values: Vec<R>,
) -> Option<Ramp<R>> {
    if values.is_empty() {
        return None;
    }
    let segments = (values.len() - 1) as f64;
    Some(Arc::new(move |t: f64| {
        if segments == 0.0 {
            return values[0].clone();
        }
        let i = (t * segments).floor().clamp(0.0, segments - 1.0);
        let k = if i.is_nan() { 0 } else { i as usize };
        interpolator.interpolate(&values[k], &values[k + 1], t * segments - i)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_number_interpolation_extrapolates() {
        assert_eq!(NumberInterpolator.interpolate(&10.0, &20.0, 0.25), 12.5);
        assert_eq!(NumberInterpolator.interpolate(&10.0, &20.0, 1.5), 25.0);
        assert_eq!(RoundInterpolator.interpolate(&0.0, &10.0, 0.26), 3.0);
    }

    #[test]
    fn test_rgb_midpoint() {
        let mid = interpolate_value(&"red".into(), &"blue".into(), 0.5, ColorSpace::Rgb);
        assert_eq!(mid.to_string(), "rgb(128, 0, 128)");
    }

    #[test]
    fn test_color_spaces_agree_at_endpoints() {
        for space in [ColorSpace::Rgb, ColorSpace::Hsl, ColorSpace::Lab, ColorSpace::Hcl] {
            let end = interpolate_value(&"white".into(), &"steelblue".into(), 1.0, space);
            assert_eq!(end.to_string(), "rgb(70, 130, 180)", "{space}");
        }
    }

    #[test]
    fn test_non_color_start_yields_end_color() {
        let v = interpolate_value(&Value::Number(1.0), &"red".into(), 0.3, ColorSpace::Rgb);
        assert_eq!(v, Value::from("red"));
    }

    #[test]
    fn test_structured_values() {
        let a = Value::from(vec![0.0, 10.0]);
        let b = Value::from(vec![10.0, 20.0, 30.0]);
        assert_eq!(
            interpolate_value(&a, &b, 0.5, ColorSpace::Rgb),
            Value::from(vec![5.0, 15.0, 30.0])
        );

        let a: Value = IndexMap::from([("x".to_string(), Value::Number(0.0))]).into();
        let b: Value = IndexMap::from([
            ("x".to_string(), Value::Number(4.0)),
            ("y".to_string(), Value::Text("fixed".to_string())),
        ])
        .into();
        let mid = interpolate_value(&a, &b, 0.25, ColorSpace::Rgb);
        let mid = mid.as_object().unwrap();
        assert_eq!(mid["x"], Value::Number(1.0));
        assert_eq!(mid["y"], Value::Text("fixed".to_string()));
    }

    #[test]
    fn test_text_with_numbers() {
        assert_eq!(interpolate_text("10px", "20px", 0.5), "15px");
        assert_eq!(interpolate_text("a", "b 2", 0.5), "b 2");
    }

    #[test]
    fn test_piecewise() {
        let ramp = piecewise::<f64>(Arc::new(NumberInterpolator), vec![0.0, 10.0, 100.0]).unwrap();
        assert_approx_eq!(f64, ramp(0.25), 5.0);
        assert_approx_eq!(f64, ramp(0.75), 55.0);
        assert_approx_eq!(f64, ramp(1.0), 100.0);
        assert!(piecewise::<f64>(Arc::new(NumberInterpolator), vec![]).is_none());
    }
}
