use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::band::{BandScale, BandScaleConfig};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "D: Deserialize<'de> + Hash + Eq"))]
pub struct PointScaleConfig<D> {
    pub domain: Vec<D>,
    pub range: (f64, f64),
    pub padding: f64,
    pub align: f64,
    pub round: bool,
}

impl<D> Default for PointScaleConfig<D> {
    fn default() -> Self {
        Self {
            domain: vec![],
            range: (0.0, 1.0),
            padding: 0.0,
            align: 0.5,
            round: false,
        }
    }
}

/// A band scale with zero-width bands: keys map to evenly spaced points.
/// `padding` is the outer padding in units of step.
#[derive(Clone, Debug)]
pub struct PointScale<D: Clone + Debug + Hash + Eq> {
    band: BandScale<D>,
}

impl<D: Clone + Debug + Hash + Eq> PointScale<D> {
    pub fn new(config: &PointScaleConfig<D>) -> Self {
        Self {
            band: BandScale::new(&BandScaleConfig {
                domain: config.domain.clone(),
                range: config.range,
                padding_inner: 1.0,
                padding_outer: config.padding,
                align: config.align,
                round: config.round,
            }),
        }
    }

    pub fn domain(&self) -> Vec<D> {
        self.band.domain()
    }

    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = D>) -> &mut Self {
        self.band.set_domain(domain);
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = D>) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn range(&self) -> (f64, f64) {
        self.band.range()
    }

    pub fn set_range(&mut self, range: (f64, f64)) -> &mut Self {
        self.band.set_range(range);
        self
    }

    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.set_range(range);
        self
    }

    pub fn range_round(&mut self, range: (f64, f64)) -> &mut Self {
        self.band.range_round(range);
        self
    }

    pub fn padding(&self) -> f64 {
        self.band.padding_outer()
    }

    pub fn set_padding(&mut self, padding: f64) -> &mut Self {
        self.band.set_padding_outer(padding);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn align(&self) -> f64 {
        self.band.align()
    }

    pub fn set_align(&mut self, align: f64) -> &mut Self {
        self.band.set_align(align);
        self
    }

    pub fn with_align(mut self, align: f64) -> Self {
        self.set_align(align);
        self
    }

    pub fn round(&self) -> bool {
        self.band.round()
    }

    pub fn set_round(&mut self, round: bool) -> &mut Self {
        self.band.set_round(round);
        self
    }

    pub fn with_round(mut self, round: bool) -> Self {
        self.set_round(round);
        self
    }

    pub fn unknown(&self) -> Option<f64> {
        self.band.unknown()
    }

    pub fn set_unknown(&mut self, unknown: Option<f64>) -> &mut Self {
        self.band.set_unknown(unknown);
        self
    }

    /// Always zero.
    pub fn bandwidth(&self) -> f64 {
        self.band.bandwidth()
    }

    pub fn step(&self) -> f64 {
        self.band.step()
    }

    pub fn scale(&self, key: &D) -> Option<f64> {
        self.band.scale(key)
    }

    pub fn invert_range(&self, lo: f64, hi: f64) -> Option<Vec<D>> {
        self.band.invert_range(lo, hi)
    }

    pub fn invert(&self, value: f64) -> Option<D> {
        self.band.invert(value)
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<D: Clone + Debug + Hash + Eq> Default for PointScale<D> {
    fn default() -> Self {
        Self::new(&PointScaleConfig::default())
    }
}
