use serde::{Deserialize, Serialize};

use crate::interpolator::Interpolate;

use super::transform::Transform;
use super::{Continuous, ContinuousScale, Linearish};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Interpolate + Deserialize<'de>"))]
pub struct PowScaleConfig<R: Interpolate = f64> {
    pub domain: Vec<f64>,
    pub range: Vec<R>,
    pub exponent: f64,
    pub clamp: bool,
    pub round: bool,
    pub nice: Option<f64>,
}

impl<R: Interpolate> Default for PowScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: vec![0.0, 1.0],
            range: vec![R::from_number(0.0), R::from_number(1.0)],
            exponent: 1.0,
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

/// A continuous scale that raises domain values to an exponent before
/// interpolating. Negative inputs keep their sign.
#[derive(Clone, Debug)]
pub struct PowScale<R: Interpolate = f64> {
    core: Continuous<R>,
    exponent: f64,
}

impl<R: Interpolate> PowScale<R> {
    pub fn new(config: &PowScaleConfig<R>) -> Self {
        let mut this = Self::default()
            .with_exponent(config.exponent)
            .with_domain(config.domain.iter().copied())
            .with_range(config.range.iter().cloned())
            .with_clamp(config.clamp);
        if config.round {
            this.range_round(config.range.iter().cloned());
        }
        if let Some(count) = config.nice {
            this.nice(count);
        }
        this
    }

    /// A pow scale with exponent 0.5.
    pub fn sqrt() -> Self {
        Self::default().with_exponent(0.5)
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn set_exponent(&mut self, exponent: f64) -> &mut Self {
        self.exponent = exponent;
        self.core.set_transform(Transform::Pow { exponent });
        self
    }

    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.set_exponent(exponent);
        self
    }
}

impl<R: Interpolate> Default for PowScale<R> {
    fn default() -> Self {
        Self {
            core: Continuous::new(Transform::Pow { exponent: 1.0 }),
            exponent: 1.0,
        }
    }
}

impl<R: Interpolate> ContinuousScale<R> for PowScale<R> {
    fn core(&self) -> &Continuous<R> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Continuous<R> {
        &mut self.core
    }
}

impl<R: Interpolate> Linearish for PowScale<R> {
    fn linear_domain(&self) -> Vec<f64> {
        self.core.domain().to_vec()
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        self.core.set_domain(domain);
    }
}
