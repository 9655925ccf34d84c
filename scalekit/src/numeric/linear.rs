use serde::{Deserialize, Serialize};

use crate::interpolator::Interpolate;

use super::transform::Transform;
use super::{Continuous, ContinuousScale, Linearish};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Interpolate + Deserialize<'de>"))]
pub struct LinearScaleConfig<R: Interpolate = f64> {
    pub domain: Vec<f64>,
    pub range: Vec<R>,
    pub clamp: bool,
    pub round: bool,
    pub nice: Option<f64>,
}

impl<R: Interpolate> Default for LinearScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: vec![0.0, 1.0],
            range: vec![R::from_number(0.0), R::from_number(1.0)],
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

/// Maps a numeric domain onto a range by piecewise linear interpolation.
#[derive(Clone, Debug)]
pub struct LinearScale<R: Interpolate = f64> {
    core: Continuous<R>,
}

impl<R: Interpolate> LinearScale<R> {
    pub fn new(config: &LinearScaleConfig<R>) -> Self {
        let mut this = Self::default()
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
}

impl<R: Interpolate> Default for LinearScale<R> {
    fn default() -> Self {
        Self {
            core: Continuous::new(Transform::Identity),
        }
    }
}

impl<R: Interpolate> ContinuousScale<R> for LinearScale<R> {
    fn core(&self) -> &Continuous<R> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Continuous<R> {
        &mut self.core
    }
}

impl<R: Interpolate> Linearish for LinearScale<R> {
    fn linear_domain(&self) -> Vec<f64> {
        self.core.domain().to_vec()
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        self.core.set_domain(domain);
    }
}
