use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interpolator::{Interpolate, Interpolator, Ramp};
use crate::numeric::Linearish;

use super::{clamp_unit, identity_ramp, ramp_from_range, RampTransform};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Interpolate + Deserialize<'de>"))]
pub struct DivergingScaleConfig<R: Interpolate = f64> {
    /// Low, neutral and high domain values.
    pub domain: (f64, f64, f64),
    pub range: Vec<R>,
    pub transform: RampTransform,
    pub clamp: bool,
    pub round: bool,
    pub nice: Option<f64>,
}

impl<R: Interpolate> Default for DivergingScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: (0.0, 0.5, 1.0),
            range: vec![R::from_number(0.0), R::from_number(0.5), R::from_number(1.0)],
            transform: RampTransform::Linear,
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

/// Maps `[d0, d1]` onto `[0, 0.5]` and `[d1, d2]` onto `[0.5, 1]`, then
/// feeds the result to a ramp.
///
/// The two halves are scaled independently, so the neutral value `d1`
/// always lands on the ramp midpoint even when it is not centered between
/// `d0` and `d2`.
#[derive(Clone)]
pub struct DivergingScale<R: Interpolate = f64> {
    x0: f64,
    x1: f64,
    x2: f64,
    kind: RampTransform,
    ramp: Ramp<R>,
    clamp: bool,
    unknown: Option<R>,
}

impl<R: Interpolate> DivergingScale<R> {
    pub fn new(config: &DivergingScaleConfig<R>) -> Self {
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

    fn with_kind(kind: RampTransform, domain: (f64, f64, f64)) -> Self {
        Self {
            x0: domain.0,
            x1: domain.1,
            x2: domain.2,
            kind,
            ramp: identity_ramp(),
            clamp: false,
            unknown: None,
        }
    }

    pub fn linear() -> Self {
        Self::with_kind(RampTransform::Linear, (0.0, 0.5, 1.0))
    }

    pub fn log() -> Self {
        Self::with_kind(RampTransform::Log { base: 10.0 }, (0.1, 1.0, 10.0))
    }

    pub fn pow(exponent: f64) -> Self {
        Self::with_kind(RampTransform::Pow { exponent }, (-1.0, 0.0, 1.0))
    }

    pub fn sqrt() -> Self {
        Self::with_kind(RampTransform::Sqrt, (-1.0, 0.0, 1.0))
    }

    pub fn symlog() -> Self {
        Self::with_kind(RampTransform::Symlog { constant: 1.0 }, (-1.0, 0.0, 1.0))
    }

    pub fn transform(&self) -> RampTransform {
        self.kind
    }

    pub fn set_transform(&mut self, kind: RampTransform) -> &mut Self {
        self.kind = kind;
        self
    }

    pub fn domain(&self) -> Vec<f64> {
        vec![self.x0, self.x1, self.x2]
    }

    pub fn set_domain(&mut self, domain: (f64, f64, f64)) -> &mut Self {
        (self.x0, self.x1, self.x2) = domain;
        self
    }

    pub fn with_domain(mut self, domain: (f64, f64, f64)) -> Self {
        self.set_domain(domain);
        self
    }

    /// Ramp values at the low end, midpoint and high end.
    pub fn range(&self) -> Vec<R> {
        vec![(self.ramp)(0.0), (self.ramp)(0.5), (self.ramp)(1.0)]
    }

    /// Replaces the ramp with one through `range`, typically three stops.
    /// An empty range is ignored.
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

    /// Position of `x` on the ramp before clamping. A degenerate half
    /// maps to 0.5.
    fn normalize(&self, x: f64) -> f64 {
        let transform = self.kind.transform(self.x0);
        let t0 = transform.apply(self.x0);
        let t1 = transform.apply(self.x1);
        let t2 = transform.apply(self.x2);
        let k10 = if t0 == t1 { 0.0 } else { 0.5 / (t1 - t0) };
        let k21 = if t1 == t2 { 0.0 } else { 0.5 / (t2 - t1) };
        let s = if t1 < t0 { -1.0 } else { 1.0 };

        let tx = transform.apply(x);
        let k = if s * tx < s * t1 { k10 } else { k21 };
        0.5 + (tx - t1) * k
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

impl<R: Interpolate> Default for DivergingScale<R> {
    fn default() -> Self {
        Self::linear()
    }
}

impl<R: Interpolate> fmt::Debug for DivergingScale<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DivergingScale")
            .field("domain", &(self.x0, self.x1, self.x2))
            .field("transform", &self.kind)
            .field("clamp", &self.clamp)
            .field("unknown", &self.unknown)
            .finish_non_exhaustive()
    }
}

impl<R: Interpolate> Linearish for DivergingScale<R> {
    fn linear_domain(&self) -> Vec<f64> {
        self.domain()
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        if let [x0, x1, x2] = domain[..] {
            self.set_domain((x0, x1, x2));
        }
    }
}
