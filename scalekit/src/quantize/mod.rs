use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::array::bisect_right;
use crate::numeric::Linearish;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Deserialize<'de>"))]
pub struct QuantizeScaleConfig<R = f64> {
    pub domain: (f64, f64),
    pub range: Vec<R>,
    /// Tick count passed to `nice` after construction.
    pub nice: Option<f64>,
}

impl<R> Default for QuantizeScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: vec![],
            nice: None,
        }
    }
}

/// Divides a continuous extent into uniform segments, one per range value.
#[derive(Clone, Debug)]
pub struct QuantizeScale<R: Clone + Debug = f64> {
    x0: f64,
    x1: f64,
    range: Vec<R>,
    thresholds: Vec<f64>,
    unknown: Option<R>,
}

impl<R: Clone + Debug> QuantizeScale<R> {
    pub fn new(config: &QuantizeScaleConfig<R>) -> Self {
        let mut this = Self::default()
            .with_domain(config.domain)
            .with_range(config.range.iter().cloned());
        if let Some(count) = config.nice {
            this.nice(count);
        }
        this
    }

    fn rescale(&mut self) {
        let n = self.range.len().saturating_sub(1) as f64;
        let (x0, x1) = (self.x0, self.x1);
        self.thresholds = (0..self.range.len().saturating_sub(1))
            .map(|i| {
                let i = i as f64;
                ((i + 1.0) * x1 - (i - n) * x0) / (n + 1.0)
            })
            .collect();
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x0, self.x1)
    }

    pub fn set_domain(&mut self, domain: (f64, f64)) -> &mut Self {
        (self.x0, self.x1) = domain;
        self.rescale();
        self
    }

    pub fn with_domain(mut self, domain: (f64, f64)) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn range(&self) -> Vec<R> {
        self.range.clone()
    }

    pub fn set_range(&mut self, range: impl IntoIterator<Item = R>) -> &mut Self {
        self.range = range.into_iter().collect();
        self.rescale();
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

    /// The `n - 1` cut points between `n` range values.
    pub fn thresholds(&self) -> Vec<f64> {
        self.thresholds.clone()
    }

    pub fn scale(&self, x: f64) -> Option<R> {
        if x.is_nan() {
            return self.unknown.clone();
        }
        match self.range.get(bisect_right(&self.thresholds, &x)) {
            Some(value) => Some(value.clone()),
            None => self.unknown.clone(),
        }
    }

    pub fn scale_opt(&self, x: Option<f64>) -> Option<R> {
        self.scale(x.unwrap_or(f64::NAN))
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<R: Clone + Debug + PartialEq> QuantizeScale<R> {
    /// Extent `[lo, hi)` of the segment for the first occurrence of `y`.
    pub fn invert_extent(&self, y: &R) -> Option<(f64, f64)> {
        let i = self.range.iter().position(|r| r == y)?;
        let t = &self.thresholds;
        let lo = if i == 0 { self.x0 } else { t[i - 1] };
        let hi = t.get(i).copied().unwrap_or(self.x1);
        Some((lo, hi))
    }
}

impl<R: Clone + Debug> Default for QuantizeScale<R> {
    fn default() -> Self {
        Self {
            x0: 0.0,
            x1: 1.0,
            range: vec![],
            thresholds: vec![],
            unknown: None,
        }
    }
}

impl<R: Clone + Debug> Linearish for QuantizeScale<R> {
    fn linear_domain(&self) -> Vec<f64> {
        vec![self.x0, self.x1]
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        if let [x0, x1] = domain[..] {
            self.set_domain((x0, x1));
        }
    }
}
