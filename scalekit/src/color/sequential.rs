use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interpolator::{Interpolate, Interpolator, Ramp};
use crate::numeric::Linearish;

use super::{clamp_unit, identity_ramp, ramp_from_range, RampTransform};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Interpolate + Deserialize<'de>"))]
pub struct SequentialScaleConfig<R: Interpolate = f64> {
    pub domain: (f64, f64),
    /// Ramp stops, evenly spaced over `[0, 1]`.
    pub range: Vec<R>,
    pub transform: RampTransform,
    pub clamp: bool,
    pub round: bool,
    pub nice: Option<f64>,
}

impl<R: Interpolate> Default for SequentialScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: vec![R::from_number(0.0), R::from_number(1.0)],
            transform: RampTransform::Linear,
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

/// Maps `[d0, d1]` onto `[0, 1]` and feeds the result to a ramp.
#[derive(Clone)]
pub struct SequentialScale<R: Interpolate = f64> {
    x0: f64,
    x1: f64,
    kind: RampTransform,
    ramp: Ramp<R>,
    clamp: bool,
    unknown: Option<R>,
}

impl<R: Interpolate> SequentialScale<R> {
    pub fn new(config: &SequentialScaleConfig<R>) -> Self {
        let mut this = Self::with_kind(config.transform, config.domain);
        if config.round {
            this.range_round(config.range.iter().cloned());
        } else {
            this.set_range(config.range.iter().cloned());
        }
        this.set_clamp(config.clamp);
        if let Some(count) = config.nice {
            this.nice(count);
        }
        this
    }

    fn with_kind(kind: RampTransform, domain: (f64, f64)) -> Self {
        Self {
            x0: domain.0,
            x1: domain.1,
            kind,
            ramp: identity_ramp(),
            clamp: false,
            unknown: None,
        }
    }

    pub fn linear() -> Self {
        Self::with_kind(RampTransform::Linear, (0.0, 1.0))
    }

    pub fn log() -> Self {
        Self::with_kind(RampTransform::Log { base: 10.0 }, (1.0, 10.0))
    }

    pub fn pow(exponent: f64) -> Self {
        Self::with_kind(RampTransform::Pow { exponent }, (0.0, 1.0))
    }

    pub fn sqrt() -> Self {
        Self::with_kind(RampTransform::Sqrt, (0.0, 1.0))
    }

    pub fn symlog() -> Self {
        Self::with_kind(RampTransform::Symlog { constant: 1.0 }, (0.0, 1.0))
    }

    pub fn transform(&self) -> RampTransform {
        self.kind
    }

    pub fn set_transform(&mut self, kind: RampTransform) -> &mut Self {
        self.kind = kind;
        self
    }

    pub fn domain(&self) -> Vec<f64> {
        vec![self.x0, self.x1]
    }

    pub fn set_domain(&mut self, domain: (f64, f64)) -> &mut Self {
        (self.x0, self.x1) = domain;
        self
    }

    pub fn with_domain(mut self, domain: (f64, f64)) -> Self {
        self.set_domain(domain);
        self
    }

    /// Ramp endpoints.
    pub fn range(&self) -> Vec<R> {
        vec![(self.ramp)(0.0), (self.ramp)(1.0)]
    }

    /// Replaces the ramp with one through `range`. An empty range is ignored.
    pub fn set_range(&mut self, range: impl IntoIterator<Item = impl Into<R>>) -> &mut Self {
        self.set_range_with(R::default_interpolator(), range)
    }

    pub fn with_range(mut self, range: impl IntoIterator<Item = impl Into<R>>) -> Self {
        self.set_range(range);
        self
    }

    pub fn set_range_with(
        &mut self,
        interpolator: Arc<dyn Interpolator<R>>,
        range: impl IntoIterator<Item = impl Into<R>>,
    ) -> &mut Self {
        if let Some(ramp) = ramp_from_range(interpolator, range) {
            self.ramp = ramp;
        }
        self
    }

    pub fn range_round(&mut self, range: impl IntoIterator<Item = impl Into<R>>) -> &mut Self {
        self.set_range_with(R::round_interpolator(), range)
    }

    pub fn interpolator(&self) -> Ramp<R> {
        self.ramp.clone()
    }

    pub fn set_interpolator(&mut self, ramp: Ramp<R>) -> &mut Self {
        self.ramp = ramp;
        self
    }

    pub fn with_interpolator(mut self, ramp: Ramp<R>) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn clamp(&self) -> bool {
        self.clamp
    }

    pub fn set_clamp(&mut self, clamp: bool) -> &mut Self {
        self.clamp = clamp;
        self
    }

    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn unknown(&self) -> Option<R> {
        self.unknown.clone()
    }

    pub fn set_unknown(&mut self, unknown: Option<R>) -> &mut Self {
        self.unknown = unknown;
        self
    }

    /// Position of `x` on the ramp before clamping. A degenerate domain
    /// gives 0.5.
    fn normalize(&self, x: f64) -> f64 {
        let transform = self.kind.transform(self.x0);
        let (t0, t1) = (transform.apply(self.x0), transform.apply(self.x1));
        if t0 == t1 {
            return 0.5;
        }
        (transform.apply(x) - t0) / (t1 - t0)
    }

    pub fn scale(&self, x: f64) -> Option<R> {
        if x.is_nan() {
            return self.unknown.clone();
        }
        let t = self.normalize(x);
        if t.is_nan() {
            return self.unknown.clone();
        }
        Some((self.ramp)(clamp_unit(t, self.clamp)))
    }

    pub fn scale_opt(&self, x: Option<f64>) -> Option<R> {
        self.scale(x.unwrap_or(f64::NAN))
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<R: Interpolate> Default for SequentialScale<R> {
    fn default() -> Self {
        Self::linear()
    }
}

impl<R: Interpolate> fmt::Debug for SequentialScale<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialScale")
            .field("domain", &(self.x0, self.x1))
            .field("transform", &self.kind)
            .field("clamp", &self.clamp)
            .field("unknown", &self.unknown)
            .finish_non_exhaustive()
    }
}

impl<R: Interpolate> Linearish for SequentialScale<R> {
    fn linear_domain(&self) -> Vec<f64> {
        self.domain()
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        if let [x0, x1] = domain[..] {
            self.set_domain((x0, x1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use scalekit_common::value::Value;

    #[test]
    fn test_defaults() {
        let scale = SequentialScale::<f64>::default();
        assert_eq!(scale.domain(), vec![0.0, 1.0]);
        assert_eq!(scale.range(), vec![0.0, 1.0]);
        assert_eq!(scale.scale(0.25), Some(0.25));
        assert!(!scale.clamp());
    }

    #[test]
    fn test_normalizes_domain() {
        let scale = SequentialScale::<f64>::linear().with_domain((2.0, 6.0));
        assert_eq!(scale.scale(3.0), Some(0.25));
        assert_eq!(scale.scale(10.0), Some(2.0));
        assert_eq!(scale.with_clamp(true).scale(10.0), Some(1.0));
    }

    #[test]
    fn test_descending_domain() {
        let scale = SequentialScale::<f64>::linear().with_domain((10.0, 0.0));
        assert_eq!(scale.scale(2.5), Some(0.75));
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = SequentialScale::<f64>::linear().with_domain((5.0, 5.0));
        assert_eq!(scale.scale(5.0), Some(0.5));
        assert_eq!(scale.scale(100.0), Some(0.5));
    }

    #[test]
    fn test_range_builds_ramp() {
        let mut scale = SequentialScale::<f64>::linear().with_range([10.0, 20.0, 40.0]);
        assert_eq!(scale.scale(0.25), Some(15.0));
        assert_eq!(scale.scale(0.75), Some(30.0));
        assert_eq!(scale.range(), vec![10.0, 40.0]);

        scale.range_round([0.0, 10.0]);
        assert_eq!(scale.scale(0.26), Some(3.0));
    }

    #[test]
    fn test_color_ramp() {
        let scale = SequentialScale::<Value>::linear().with_range(["red", "blue"]);
        assert_eq!(scale.scale(0.5).unwrap().to_string(), "rgb(128, 0, 128)");
    }

    #[test]
    fn test_custom_interpolator() {
        let scale = SequentialScale::<f64>::linear().with_interpolator(Arc::new(|t: f64| t * t));
        assert_eq!(scale.scale(0.5), Some(0.25));
    }

    #[test]
    fn test_log() {
        let scale = SequentialScale::<f64>::log();
        assert_eq!(scale.domain(), vec![1.0, 10.0]);
        assert_approx_eq!(f64, scale.scale(10f64.sqrt()).unwrap(), 0.5, epsilon = 1e-12);
        assert_approx_eq!(f64, scale.scale(100.0).unwrap(), 2.0);
        assert_eq!(scale.scale(-5.0), None);

        let negative = SequentialScale::<f64>::log().with_domain((-100.0, -1.0));
        assert_approx_eq!(f64, negative.scale(-10.0).unwrap(), 0.5);
    }

    #[test]
    fn test_sqrt_pow_symlog() {
        let scale = SequentialScale::<f64>::sqrt().with_domain((0.0, 4.0));
        assert_approx_eq!(f64, scale.scale(1.0).unwrap(), 0.5);

        let scale = SequentialScale::<f64>::pow(2.0).with_domain((0.0, 2.0));
        assert_approx_eq!(f64, scale.scale(1.0).unwrap(), 0.25);

        let scale = SequentialScale::<f64>::symlog().with_domain((-10.0, 10.0));
        assert_approx_eq!(f64, scale.scale(0.0).unwrap(), 0.5);
    }

    #[test]
    fn test_unknown() {
        let mut scale = SequentialScale::<f64>::linear();
        assert_eq!(scale.scale(f64::NAN), None);
        assert_eq!(scale.scale_opt(None), None);
        scale.set_unknown(Some(-1.0));
        assert_eq!(scale.scale(f64::NAN), Some(-1.0));
    }

    #[test]
    fn test_ticks_and_nice() {
        let mut scale = SequentialScale::<f64>::linear().with_domain((0.0, 0.96));
        scale.nice(10.0);
        assert_eq!(scale.domain(), vec![0.0, 1.0]);
        assert_eq!(scale.ticks(5.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_from_config() {
        let config: SequentialScaleConfig<Value> = serde_json::from_str(
            r#"{"domain": [0, 100], "range": ["white", "steelblue"], "clamp": true,
                "transform": {"type": "sqrt"}}"#,
        )
        .unwrap();
        let scale = SequentialScale::new(&config);
        assert_eq!(scale.scale(100.0).unwrap().to_string(), "rgb(70, 130, 180)");
        assert_eq!(scale.scale(400.0).unwrap().to_string(), "rgb(70, 130, 180)");
        assert_eq!(scale.transform(), RampTransform::Sqrt);
    }
}
