use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::array::bisect_right;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    default,
    bound(deserialize = "D: Deserialize<'de>, R: Deserialize<'de>")
)]
pub struct ThresholdScaleConfig<D = f64, R = f64> {
    /// Ascending cut points.
    pub domain: Vec<D>,
    pub range: Vec<R>,
}

impl<D, R> Default for ThresholdScaleConfig<D, R> {
    fn default() -> Self {
        Self {
            domain: vec![],
            range: vec![],
        }
    }
}

/// Maps values to range entries by explicit cut points.
///
/// With `n` cut points the scale uses `n + 1` range values: inputs below
/// the first cut map to `range[0]`, inputs at or above the last map to
/// `range[n]`. Cut points may be any ordered type; values that do not
/// compare with themselves (NaN) map to the unknown value.
#[derive(Clone, Debug)]
pub struct ThresholdScale<D: Clone + Debug + PartialOrd = f64, R: Clone + Debug = f64> {
    domain: Vec<D>,
    range: Vec<R>,
    unknown: Option<R>,
}

impl<D: Clone + Debug + PartialOrd, R: Clone + Debug> ThresholdScale<D, R> {
    pub fn new(config: &ThresholdScaleConfig<D, R>) -> Self {
        Self::default()
            .with_domain(config.domain.iter().cloned())
            .with_range(config.range.iter().cloned())
    }

    pub fn domain(&self) -> Vec<D> {
        self.domain.clone()
    }

    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = D>) -> &mut Self {
        self.domain = domain.into_iter().collect();
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = D>) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn range(&self) -> Vec<R> {
        self.range.clone()
    }

    pub fn set_range(&mut self, range: impl IntoIterator<Item = R>) -> &mut Self {
        self.range = range.into_iter().collect();
        self
    }

    pub fn with_range(mut self, range: impl IntoIterator<Item = R>) -> Self {
        self.set_range(range);
        self
    }

    pub fn unknown(&self) -> Option<R> {
        self.unknown.clone()
    }

    pub fn set_unknown(&mut self, unknown: Option<R>) -> &mut Self {
        self.unknown = unknown;
        self
    }

    pub fn scale(&self, x: &D) -> Option<R> {
        if x.partial_cmp(x).is_none() || self.range.is_empty() {
            return self.unknown.clone();
        }
        // Surplus cut points beyond the range are ignored.
        let n = self.domain.len().min(self.range.len() - 1);
        Some(self.range[bisect_right(&self.domain[..n], x)].clone())
    }

    pub fn scale_opt(&self, x: Option<&D>) -> Option<R> {
        match x {
            Some(x) => self.scale(x),
            None => self.unknown.clone(),
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<D: Clone + Debug + PartialOrd, R: Clone + Debug + PartialEq> ThresholdScale<D, R> {
    /// Cut points bounding the first occurrence of `y`. The outer buckets
    /// are open on one side.
    pub fn invert_extent(&self, y: &R) -> Option<(Option<D>, Option<D>)> {
        let i = self.range.iter().position(|r| r == y)?;
        let lo = i.checked_sub(1).and_then(|k| self.domain.get(k)).cloned();
        let hi = self.domain.get(i).cloned();
        Some((lo, hi))
    }
}

impl<D: Clone + Debug + PartialOrd, R: Clone + Debug> Default for ThresholdScale<D, R> {
    fn default() -> Self {
        Self {
            domain: vec![],
            range: vec![],
            unknown: None,
        }
    }
}
