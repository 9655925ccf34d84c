use serde::{Deserialize, Serialize};

use super::Linearish;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityScaleConfig {
    pub domain: Vec<f64>,
    pub nice: Option<f64>,
}

impl Default for IdentityScaleConfig {
    fn default() -> Self {
        Self {
            domain: vec![0.0, 1.0],
            nice: None,
        }
    }
}

/// Passes numbers through unchanged. Domain and range are the same
/// sequence, setting one sets the other.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityScale {
    domain: Vec<f64>,
    unknown: Option<f64>,
}

impl IdentityScale {
    pub fn new(config: &IdentityScaleConfig) -> Self {
        let mut this = Self::default().with_domain(config.domain.iter().copied());
        if let Some(count) = config.nice {
            this.nice(count);
        }
        this
    }

    pub fn domain(&self) -> Vec<f64> {
        self.domain.clone()
    }

    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = f64>) -> &mut Self {
        self.domain = domain.into_iter().collect();
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = f64>) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn range(&self) -> Vec<f64> {
        self.domain()
    }

    pub fn set_range(&mut self, range: impl IntoIterator<Item = f64>) -> &mut Self {
        self.set_domain(range)
    }

    pub fn with_range(self, range: impl IntoIterator<Item = f64>) -> Self {
        self.with_domain(range)
    }

    pub fn unknown(&self) -> Option<f64> {
        self.unknown
    }

    pub fn set_unknown(&mut self, unknown: Option<f64>) -> &mut Self {
        self.unknown = unknown;
        self
    }

    pub fn scale(&self, x: f64) -> Option<f64> {
        if x.is_nan() {
            self.unknown
        } else {
            Some(x)
        }
    }

    pub fn invert(&self, y: f64) -> Option<f64> {
        self.scale(y)
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl Default for IdentityScale {
    fn default() -> Self {
        Self {
            domain: vec![0.0, 1.0],
            unknown: None,
        }
    }
}

impl Linearish for IdentityScale {
    fn linear_domain(&self) -> Vec<f64> {
        self.domain.clone()
    }

    fn replace_domain(&mut self, domain: Vec<f64>) {
        self.domain = domain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_through() {
        let scale = IdentityScale::default();
        assert_eq!(scale.scale(42.5), Some(42.5));
        assert_eq!(scale.invert(-3.0), Some(-3.0));
        assert_eq!(scale.scale(f64::NAN), None);
    }

    #[test]
    fn test_domain_and_range_share_storage() {
        let mut scale = IdentityScale::default();
        scale.set_range([2.0, 8.0]);
        assert_eq!(scale.domain(), vec![2.0, 8.0]);
        scale.set_domain([1.0, 3.0]);
        assert_eq!(scale.range(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_nice_and_ticks() {
        let scale = IdentityScale::new(&IdentityScaleConfig {
            domain: vec![0.96, 9.02],
            nice: Some(10.0),
        });
        assert_eq!(scale.range(), vec![0.0, 10.0]);
        assert_eq!(scale.ticks(2.0), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_unknown() {
        let mut scale = IdentityScale::default();
        scale.set_unknown(Some(-1.0));
        assert_eq!(scale.scale(f64::NAN), Some(-1.0));
    }
}
