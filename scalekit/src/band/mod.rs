use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "D: Deserialize<'de> + Hash + Eq"))]
pub struct BandScaleConfig<D> {
    pub domain: Vec<D>,
    pub range: (f64, f64),
    pub padding_inner: f64,
    pub padding_outer: f64,
    pub align: f64,
    pub round: bool,
}

impl<D> Default for BandScaleConfig<D> {
    fn default() -> Self {
        Self {
            domain: vec![],
            range: (0.0, 1.0),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
        }
    }
}

/// Divides a continuous range into uniform bands, one per domain key.
///
/// The range may be descending, in which case the first key gets the band
/// nearest the range start. Keys outside the domain map to the unknown
/// value; lookups never change the domain.
#[derive(Clone, Debug)]
pub struct BandScale<D: Clone + Debug + Hash + Eq> {
    domain: IndexSet<D>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    unknown: Option<f64>,
    // derived by `rescale`
    step: f64,
    bandwidth: f64,
    positions: Vec<f64>,
}

impl<D: Clone + Debug + Hash + Eq> BandScale<D> {
    pub fn new(config: &BandScaleConfig<D>) -> Self {
        let mut this = Self::default();
        this.domain = config.domain.iter().cloned().collect();
        this.range = config.range;
        this.padding_inner = min_one(config.padding_inner);
        this.padding_outer = config.padding_outer;
        this.align = config.align.clamp(0.0, 1.0);
        this.round = config.round;
        this.rescale();
        this
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };

        let mut step = (stop - start) / max_one(n - self.padding_inner + self.padding_outer * 2.0);
        if self.round {
            step = step.floor();
        }
        let mut start = start + (stop - start - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.floor();
            bandwidth = bandwidth.floor();
        }
        if bandwidth < 0.0 {
            tracing::debug!(
                "band scale padding_inner {} gives a negative bandwidth {bandwidth}",
                self.padding_inner
            );
        }

        let mut positions: Vec<f64> = (0..self.domain.len())
            .map(|i| start + step * i as f64)
            .collect();
        if reverse {
            positions.reverse();
        }
        self.step = step;
        self.bandwidth = bandwidth;
        self.positions = positions;
    }

    pub fn domain(&self) -> Vec<D> {
        self.domain.iter().cloned().collect()
    }

    /// Duplicate keys keep their first position.
    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = D>) -> &mut Self {
        self.domain = domain.into_iter().collect();
        self.rescale();
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = D>) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_range(&mut self, range: (f64, f64)) -> &mut Self {
        self.range = range;
        self.rescale();
        self
    }

    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.set_range(range);
        self
    }

    /// Sets the range and enables rounding.
    pub fn range_round(&mut self, range: (f64, f64)) -> &mut Self {
        self.range = range;
        self.round = true;
        self.rescale();
        self
    }

    pub fn padding_inner(&self) -> f64 {
        self.padding_inner
    }

    /// Values above one are capped at one. Negative values are kept and
    /// widen the bands past their step.
    pub fn set_padding_inner(&mut self, padding: f64) -> &mut Self {
        self.padding_inner = min_one(padding);
        self.rescale();
        self
    }

    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.set_padding_inner(padding);
        self
    }

    pub fn padding_outer(&self) -> f64 {
        self.padding_outer
    }

    pub fn set_padding_outer(&mut self, padding: f64) -> &mut Self {
        self.padding_outer = padding;
        self.rescale();
        self
    }

    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.set_padding_outer(padding);
        self
    }

    /// Returns the inner padding.
    pub fn padding(&self) -> f64 {
        self.padding_inner
    }

    /// Sets inner and outer padding together.
    pub fn set_padding(&mut self, padding: f64) -> &mut Self {
        self.padding_inner = min_one(padding);
        self.padding_outer = padding;
        self.rescale();
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn align(&self) -> f64 {
        self.align
    }

    /// Where leftover space goes: 0 before the bands, 1 after them.
    pub fn set_align(&mut self, align: f64) -> &mut Self {
        self.align = align.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    pub fn with_align(mut self, align: f64) -> Self {
        self.set_align(align);
        self
    }

    pub fn round(&self) -> bool {
        self.round
    }

    pub fn set_round(&mut self, round: bool) -> &mut Self {
        self.round = round;
        self.rescale();
        self
    }

    pub fn with_round(mut self, round: bool) -> Self {
        self.set_round(round);
        self
    }

    pub fn unknown(&self) -> Option<f64> {
        self.unknown
    }

    pub fn set_unknown(&mut self, unknown: Option<f64>) -> &mut Self {
        self.unknown = unknown;
        self
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Start of the band for `key`.
    pub fn scale(&self, key: &D) -> Option<f64> {
        match self.domain.get_index_of(key) {
            Some(i) => Some(self.positions[i]),
            None => self.unknown,
        }
    }

    /// Keys whose bands intersect `[lo, hi]`, in domain order. `None` when
    /// the span lies outside the range or only covers padding.
    pub fn invert_range(&self, lo: f64, hi: f64) -> Option<Vec<D>> {
        if lo.is_nan() || hi.is_nan() || self.domain.is_empty() {
            return None;
        }
        let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        if hi < start || lo > stop {
            return None;
        }

        let mut ascending = self.positions.clone();
        if reverse {
            ascending.reverse();
        }
        let mut a = ascending.partition_point(|x| *x <= lo).saturating_sub(1);
        let b = if lo == hi {
            a
        } else {
            ascending.partition_point(|x| *x <= hi).saturating_sub(1)
        };
        if lo - ascending[a] > self.bandwidth {
            a += 1;
        }

        let last = ascending.len() - 1;
        let (a, b) = if reverse { (last - b, last.checked_sub(a)?) } else { (a, b) };
        if a > b {
            return None;
        }
        Some(
            self.domain
                .iter()
                .skip(a)
                .take(b - a + 1)
                .cloned()
                .collect(),
        )
    }

    /// The key whose band contains `value`.
    pub fn invert(&self, value: f64) -> Option<D> {
        self.invert_range(value, value)
            .and_then(|keys| keys.into_iter().next())
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<D: Clone + Debug + Hash + Eq> Default for BandScale<D> {
    fn default() -> Self {
        let mut this = Self {
            domain: IndexSet::new(),
            range: (0.0, 1.0),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
            unknown: None,
            step: 1.0,
            bandwidth: 1.0,
            positions: vec![],
        };
        this.rescale();
        this
    }
}

/// `min(1, v)` that keeps NaN.
fn min_one(v: f64) -> f64 {
    if v.is_nan() {
        v
    } else {
        v.min(1.0)
    }
}

/// `max(1, v)` that keeps NaN.
fn max_one(v: f64) -> f64 {
    if v.is_nan() {
        v
    } else {
        v.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn abc() -> BandScale<&'static str> {
        BandScale::default().with_domain(["a", "b", "c"])
    }

    #[test]
    fn test_band_scale_defaults() {
        let scale = BandScale::<&str>::default();
        assert!(scale.domain().is_empty());
        assert_eq!(scale.range(), (0.0, 1.0));
        assert_eq!(scale.padding_inner(), 0.0);
        assert_eq!(scale.padding_outer(), 0.0);
        assert_eq!(scale.align(), 0.5);
        assert!(!scale.round());
        assert_eq!(scale.bandwidth(), 1.0);
        assert_eq!(scale.step(), 1.0);
    }

    #[test]
    fn test_band_scale_basic() {
        let scale = abc();
        assert_eq!(scale.scale(&"a"), Some(0.0));
        assert_approx_eq!(f64, scale.scale(&"b").unwrap(), 1.0 / 3.0);
        assert_approx_eq!(f64, scale.scale(&"c").unwrap(), 2.0 / 3.0);
        assert_eq!(scale.scale(&"f"), None);
        assert_approx_eq!(f64, scale.bandwidth(), 1.0 / 3.0);
        assert_approx_eq!(f64, scale.step(), 1.0 / 3.0);
    }

    #[test]
    fn test_band_scale_padding() {
        let scale = abc().with_range((0.0, 120.0)).with_padding(0.2);
        assert_approx_eq!(f64, scale.scale(&"a").unwrap(), 7.5);
        assert_approx_eq!(f64, scale.scale(&"b").unwrap(), 45.0);
        assert_approx_eq!(f64, scale.scale(&"c").unwrap(), 82.5);
        assert_approx_eq!(f64, scale.bandwidth(), 30.0);
        assert_approx_eq!(f64, scale.step(), 37.5);
    }

    #[test]
    fn test_band_scale_round_floors() {
        let mut scale = abc();
        scale.range_round((0.0, 100.0));
        assert_eq!(scale.scale(&"a"), Some(0.0));
        assert_eq!(scale.scale(&"b"), Some(33.0));
        assert_eq!(scale.scale(&"c"), Some(66.0));
        assert_eq!(scale.bandwidth(), 33.0);
    }

    #[test]
    fn test_descending_range() {
        let scale = abc().with_range((120.0, 0.0)).with_padding(0.2);
        assert_approx_eq!(f64, scale.scale(&"a").unwrap(), 82.5);
        assert_approx_eq!(f64, scale.scale(&"c").unwrap(), 7.5);
    }

    #[test]
    fn test_align() {
        let scale = abc()
            .with_range((0.0, 100.0))
            .with_padding_outer(1.0)
            .with_align(0.0);
        assert_approx_eq!(f64, scale.step(), 20.0);
        assert_eq!(scale.scale(&"a"), Some(0.0));

        let scale = scale.with_align(1.0);
        assert_approx_eq!(f64, scale.scale(&"a").unwrap(), 40.0);
        assert_eq!(scale.with_align(7.0).align(), 1.0);
    }

    #[test]
    fn test_padding_inner_coercion() {
        let scale = abc().with_padding_inner(1.5);
        assert_eq!(scale.padding_inner(), 1.0);
        assert_eq!(scale.bandwidth(), 0.0);

        let scale = abc().with_range((0.0, 30.0)).with_padding_inner(-0.5);
        assert_eq!(scale.padding_inner(), -0.5);
        assert_approx_eq!(f64, scale.step(), 30.0 / 3.5);
        assert_approx_eq!(f64, scale.bandwidth(), 1.5 * 30.0 / 3.5);
    }

    #[test]
    fn test_nan_padding_propagates() {
        let scale = abc().with_padding_outer(f64::NAN);
        assert!(scale.step().is_nan());
        assert!(scale.scale(&"a").unwrap().is_nan());
    }

    #[test]
    fn test_duplicate_keys() {
        let scale = BandScale::default().with_domain(["a", "b", "a"]);
        assert_eq!(scale.domain(), vec!["a", "b"]);
        assert_approx_eq!(f64, scale.step(), 0.5);
    }

    #[test]
    fn test_lookup_does_not_grow_domain() {
        let scale = abc().with_range((0.0, 90.0));
        assert_eq!(scale.scale(&"z"), None);
        assert_eq!(scale.domain(), vec!["a", "b", "c"]);

        let mut scale = scale;
        scale.set_unknown(Some(-1.0));
        assert_eq!(scale.scale(&"z"), Some(-1.0));
    }

    #[test]
    fn test_band_scale_invert() {
        let scale = abc().with_range((0.0, 120.0)).with_padding(0.2);
        assert_eq!(scale.invert(7.5), Some("a"));
        assert_eq!(scale.invert(45.0), Some("b"));
        assert_eq!(scale.invert(15.0), Some("a"));
        assert_eq!(scale.invert(40.0), None);
        assert_eq!(scale.invert(-10.0), None);
        assert_eq!(scale.invert(130.0), None);
    }

    #[test]
    fn test_band_scale_invert_range() {
        let scale = abc().with_range((0.0, 120.0)).with_padding(0.2);
        assert_eq!(scale.invert_range(7.5, 82.5), Some(vec!["a", "b", "c"]));
        assert_eq!(scale.invert_range(45.0, 82.5), Some(vec!["b", "c"]));
        assert_eq!(scale.invert_range(82.5, 45.0), Some(vec!["b", "c"]));
        assert_eq!(scale.invert_range(-10.0, -5.0), None);
        assert_eq!(scale.invert_range(130.0, 140.0), None);
        assert_eq!(scale.invert_range(f64::NAN, 50.0), None);
    }

    #[test]
    fn test_invert_range_descending() {
        let scale = abc().with_range((120.0, 0.0)).with_padding(0.2);
        assert_eq!(scale.invert(10.0), Some("c"));
        assert_eq!(scale.invert_range(45.0, 90.0), Some(vec!["a", "b"]));
    }

    #[test]
    fn test_from_config() {
        let config: BandScaleConfig<String> = serde_json::from_str(
            r#"{"domain": ["x", "y"], "range": [0, 100], "padding_inner": 0.5}"#,
        )
        .unwrap();
        let scale = BandScale::new(&config);
        assert_approx_eq!(f64, scale.step(), 100.0 / 1.5);
        assert_approx_eq!(f64, scale.bandwidth(), 50.0 / 1.5);
        assert_approx_eq!(f64, scale.scale(&"y".to_string()).unwrap(), scale.step());
    }
}
