use serde::{Deserialize, Serialize};

use crate::interpolator::Interpolate;

use super::transform::Transform;
use super::{Continuous, ContinuousScale, Linearish};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Interpolate + Deserialize<'de>"))]
pub struct SymlogScaleConfig<R: Interpolate = f64> {
    pub domain: Vec<f64>,
    pub range: Vec<R>,
    pub constant: f64,
    pub clamp: bool,
    pub round: bool,
    pub nice: Option<f64>,
}

impl<R: Interpolate> Default for SymlogScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: vec![0.0, 1.0],
            range: vec![R::from_number(0.0), R::from_number(1.0)],
            constant: 1.0,
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

/// A bi-symmetric log scale: linear near zero, with the width of the
/// linear region set by `constant`, and logarithmic further out.
#[derive(Clone, Debug)]
pub struct SymlogScale<R: Interpolate = f64> {
    core: Continuous<R>,
    constant: f64,
}

impl<R: Interpolate> SymlogScale<R> {
    pub fn new(config: &SymlogScaleConfig<R>) -> Self {
        let mut this = Self::default()
            .with_constant(config.constant)
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

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn set_constant(&mut self, constant: f64) -> &mut Self {
        self.constant = constant;
        self.core.set_transform(Transform::Symlog { constant });
        self
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.set_constant(constant);
        self
    }
}

impl<R: Interpolate> Default for SymlogScale<R> {
    fn default() -> Self {
        Self {
            core: Continuous::new(Transform::Symlog { constant: 1.0 }),
            constant: 1.0,
        }
    }
}

impl<R: Interpolate> ContinuousScale<R> for SymlogScale<R> {
    fn core(&self) -> &Continuous<R> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Continuous<R> {
        &mut self.core
    }
}

impl<R: Interpolate> Linearish for SymlogScale<R> {
    fn linear_domain(&self) -> Vec<f64> {
        self.core.domain().to_vec()
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        self.core.set_domain(domain);
    }
}
