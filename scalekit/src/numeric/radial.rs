use serde::{Deserialize, Serialize};

use super::transform::Transform;
use super::{Continuous, Linearish};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialScaleConfig {
    pub domain: Vec<f64>,
    pub range: Vec<f64>,
    pub clamp: bool,
    pub round: bool,
    pub nice: Option<f64>,
}

impl Default for RadialScaleConfig {
    fn default() -> Self {
        Self {
            domain: vec![0.0, 1.0],
            range: vec![0.0, 1.0],
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

/// A linear scale in squared range space, so that equal domain steps give
/// equal areas rather than equal radii. Range values are radii.
#[derive(Clone, Debug)]
pub struct RadialScale {
    squared: Continuous<f64>,
    range: Vec<f64>,
    round: bool,
    unknown: Option<f64>,
}

impl RadialScale {
    pub fn new(config: &RadialScaleConfig) -> Self {
        let mut this = Self::default()
            .with_domain(config.domain.iter().copied())
            .with_range(config.range.iter().copied())
            .with_clamp(config.clamp)
            .with_round(config.round);
        if let Some(count) = config.nice {
            this.nice(count);
        }
        this
    }

    pub fn domain(&self) -> Vec<f64> {
        self.squared.domain().to_vec()
    }

    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = f64>) -> &mut Self {
        self.squared.set_domain(domain.into_iter().collect());
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = f64>) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn range(&self) -> Vec<f64> {
        self.range.clone()
    }

    pub fn set_range(&mut self, range: impl IntoIterator<Item = f64>) -> &mut Self {
        self.range = range.into_iter().collect();
        self.squared
            .set_range(self.range.iter().map(|r| square(*r)).collect());
        self
    }

    pub fn with_range(mut self, range: impl IntoIterator<Item = f64>) -> Self {
        self.set_range(range);
        self
    }

    pub fn range_round(&mut self, range: impl IntoIterator<Item = f64>) -> &mut Self {
        self.set_range(range);
        self.round = true;
        self
    }

    pub fn round(&self) -> bool {
        self.round
    }

    pub fn set_round(&mut self, round: bool) -> &mut Self {
        self.round = round;
        self
    }

    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    pub fn clamp(&self) -> bool {
        self.squared.clamp()
    }

    pub fn set_clamp(&mut self, clamp: bool) -> &mut Self {
        self.squared.set_clamp(clamp);
        self
    }

    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.set_clamp(clamp);
        self
    }

    pub fn unknown(&self) -> Option<f64> {
        self.unknown
    }

    pub fn set_unknown(&mut self, unknown: Option<f64>) -> &mut Self {
        self.unknown = unknown;
        self
    }

    pub fn scale(&self, x: f64) -> Option<f64> {
        let Some(y) = self.squared.scale(x) else {
            return self.unknown;
        };
        let y = signed_sqrt(y);
        if y.is_nan() {
            self.unknown
        } else if self.round {
            Some(y.round())
        } else {
            Some(y)
        }
    }

    pub fn invert(&self, y: f64) -> f64 {
        self.squared.invert(square(y))
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl Default for RadialScale {
    fn default() -> Self {
        Self {
            squared: Continuous::new(Transform::Identity),
            range: vec![0.0, 1.0],
            round: false,
            unknown: None,
        }
    }
}

impl Linearish for RadialScale {
    fn linear_domain(&self) -> Vec<f64> {
        self.domain()
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        self.squared.set_domain(domain);
    }
}

fn square(x: f64) -> f64 {
    x.signum() * x * x
}

fn signed_sqrt(x: f64) -> f64 {
    x.signum() * x.abs().sqrt()
}
