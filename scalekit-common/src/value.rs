use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use palette::Srgba;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;

use crate::color::{parse_css_color, to_css_string};

/// A value that can appear in the range of a scale.
///
/// Numbers are interpolated arithmetically, colors in a configurable color
/// space, and arrays/objects member-wise. Text that is not a color cannot be
/// blended and snaps to its end value.
///
/// Equality and hashing treat numbers by bit-pattern ordering so that a
/// `Value` can also be used as a discrete domain key (`NaN == NaN`).
#[derive(Debug, Clone, EnumDiscriminants)]
#[strum_discriminants(name(ValueKind))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "RawValue", into = "RawValue")
)]
pub enum Value {
    Number(f64),
    Color(Srgba),
    Text(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }

    /// Numeric view of the value, used when inverting a scale.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Srgba> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(values) => Some(values),
            _ => None,
        }
    }

    /// Build a value from a string, recognizing CSS colors.
    pub fn parse(s: &str) -> Self {
        match parse_css_color(s) {
            Ok(color) => Value::Color(color),
            Err(_) => Value::Text(s.to_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Value::Color(a), Value::Color(b)) => color_key(a) == color_key(b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Number(v) => OrderedFloat(*v).hash(state),
            Value::Color(c) => color_key(c).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Array(values) => values.hash(state),
            Value::Object(values) => {
                for (k, v) in values {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

fn color_key(c: &Srgba) -> [OrderedFloat<f32>; 4] {
    [
        OrderedFloat(c.red),
        OrderedFloat(c.green),
        OrderedFloat(c.blue),
        OrderedFloat(c.alpha),
    ]
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Color(c) => write!(f, "{}", to_css_string(c)),
            Value::Text(s) => write!(f, "{s}"),
            Value::Array(values) => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
            Value::Object(values) => {
                write!(f, "{{")?;
                for (i, (k, v)) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::parse(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::parse(&s)
    }
}

impl From<Srgba> for Value {
    fn from(c: Srgba) -> Self {
        Value::Color(c)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(values: IndexMap<String, Value>) -> Self {
        Value::Object(values)
    }
}

/// Wire form of [`Value`]: colors travel as CSS strings.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

#[cfg(feature = "serde")]
impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Number(v) => Value::Number(v),
            RawValue::Text(s) => Value::parse(&s),
            RawValue::Array(values) => Value::Array(values),
            RawValue::Object(values) => Value::Object(values),
        }
    }
}

#[cfg(feature = "serde")]
impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(v) => RawValue::Number(v),
            Value::Color(c) => RawValue::Text(to_css_string(&c)),
            Value::Text(s) => RawValue::Text(s),
            Value::Array(values) => RawValue::Array(values),
            Value::Object(values) => RawValue::Object(values),
        }
    }
}
