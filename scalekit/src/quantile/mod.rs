use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::array::{bisect_right, quantile_sorted};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Deserialize<'de>"))]
pub struct QuantileScaleConfig<R = f64> {
    /// Sample population, in any order.
    pub domain: Vec<f64>,
    pub range: Vec<R>,
}

impl<R> Default for QuantileScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: vec![],
            range: vec![],
        }
    }
}

/// Maps a sampled domain onto a discrete range so that each range value
/// receives an equal share of the sample.
///
/// Thresholds are the R-7 quantiles of the sorted sample at `k / n` for
/// `n` range values, recomputed whenever the domain or range changes.
#[derive(Clone, Debug)]
pub struct QuantileScale<R: Clone + Debug = f64> {
    domain: Vec<f64>,
    range: Vec<R>,
    thresholds: Vec<f64>,
    unknown: Option<R>,
}

impl<R: Clone + Debug> QuantileScale<R> {
    pub fn new(config: &QuantileScaleConfig<R>) -> Self {
        Self::default()
            .with_domain(config.domain.iter().copied())
            .with_range(config.range.iter().cloned())
    }

    fn rescale(&mut self) {
        let n = self.range.len();
        self.thresholds = if self.domain.is_empty() {
            vec![]
        } else {
            (1..n)
                .filter_map(|k| quantile_sorted(&self.domain, k as f64 / n as f64))
                .collect()
        };
    }

    /// The sorted sample.
    pub fn domain(&self) -> Vec<f64> {
        self.domain.clone()
    }

    /// NaN observations are dropped.
    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = f64>) -> &mut Self {
        let mut sample: Vec<f64> = domain.into_iter().filter(|x| !x.is_nan()).collect();
        sample.sort_by(f64::total_cmp);
        self.domain = sample;
        self.rescale();
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = f64>) -> Self {
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

    pub fn quantiles(&self) -> Vec<f64> {
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

    /// The copy is independent of the original.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<R: Clone + Debug + PartialEq> QuantileScale<R> {
    /// Domain interval `[lo, hi)` that maps to the first occurrence of `y`.
    /// The outermost buckets are unbounded.
    pub fn invert_extent(&self, y: &R) -> Option<(f64, f64)> {
        let i = self.range.iter().position(|r| r == y)?;
        let lo = if i > 0 {
            self.thresholds.get(i - 1).copied().unwrap_or(f64::NEG_INFINITY)
        } else {
            f64::NEG_INFINITY
        };
        let hi = self.thresholds.get(i).copied().unwrap_or(f64::INFINITY);
        Some((lo, hi))
    }
}

impl<R: Clone + Debug> Default for QuantileScale<R> {
    fn default() -> Self {
        Self {
            domain: vec![],
            range: vec![],
            thresholds: vec![],
            unknown: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn sample() -> Vec<f64> {
        vec![3.0, 6.0, 7.0, 8.0, 8.0, 10.0, 13.0, 15.0, 16.0, 20.0]
    }

    #[test]
    fn test_r7_quantiles() {
        let scale = QuantileScale::default()
            .with_domain(sample())
            .with_range([0, 1, 2, 3]);
        let q = scale.quantiles();
        assert_eq!(q.len(), 3);
        assert_approx_eq!(f64, q[0], 7.25);
        assert_approx_eq!(f64, q[1], 9.0);
        assert_approx_eq!(f64, q[2], 14.5);
        assert_eq!(scale.scale(3.0), Some(0));
        assert_eq!(scale.scale(8.0), Some(1));
        assert_eq!(scale.scale(9.0), Some(2));
        assert_eq!(scale.scale(20.0), Some(3));
        assert_eq!(scale.scale(100.0), Some(3));
    }

    #[test]
    fn test_domain_is_sorted_and_filtered() {
        let scale = QuantileScale::default()
            .with_domain([6.0, f64::NAN, 3.0, 7.0])
            .with_range(["a", "b"]);
        assert_eq!(scale.domain(), vec![3.0, 6.0, 7.0]);
        assert_eq!(scale.quantiles(), vec![6.0]);
    }

    #[test]
    fn test_skewed_sample() {
        let scale = QuantileScale::default()
            .with_domain([1.0, 1.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0])
            .with_range(["small", "medium", "large"]);
        assert_eq!(scale.scale(1.5), Some("small"));
        assert_eq!(scale.scale(3.0), Some("medium"));
        assert_eq!(scale.scale(4.5), Some("large"));
    }

    #[test]
    fn test_range_change_recomputes_thresholds() {
        let mut scale = QuantileScale::default()
            .with_domain(sample())
            .with_range([0, 1, 2, 3]);
        scale.set_range([0, 1]);
        assert_eq!(scale.quantiles(), vec![9.0]);
        scale.set_range([0]);
        assert!(scale.quantiles().is_empty());
        assert_eq!(scale.scale(1000.0), Some(0));
    }

    #[test]
    fn test_unknown() {
        let mut scale = QuantileScale::default()
            .with_domain(sample())
            .with_range(["a", "b"]);
        assert_eq!(scale.scale(f64::NAN), None);
        assert_eq!(scale.scale_opt(None), None);
        scale.set_unknown(Some("?"));
        assert_eq!(scale.scale(f64::NAN), Some("?"));

        let empty = QuantileScale::<&str>::default();
        assert_eq!(empty.scale(1.0), None);
    }

    #[test]
    fn test_invert_extent() {
        let scale = QuantileScale::default()
            .with_domain(sample())
            .with_range(["a", "b", "c", "d"]);
        assert_eq!(scale.invert_extent(&"a"), Some((f64::NEG_INFINITY, 7.25)));
        assert_eq!(scale.invert_extent(&"b"), Some((7.25, 9.0)));
        assert_eq!(scale.invert_extent(&"d"), Some((14.5, f64::INFINITY)));
        assert_eq!(scale.invert_extent(&"e"), None);
    }

    #[test]
    fn test_from_config() {
        let config: QuantileScaleConfig<String> = serde_json::from_str(
            r#"{"domain": [3, 6, 7, 8, 8, 10, 13, 15, 16, 20], "range": ["lo", "hi"]}"#,
        )
        .unwrap();
        let scale = QuantileScale::new(&config);
        assert_eq!(scale.scale(8.0), Some("lo".to_string()));
        assert_eq!(scale.scale(9.0), Some("hi".to_string()));
    }
}
