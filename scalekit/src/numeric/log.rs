use serde::{Deserialize, Serialize};

use crate::array::{self, nice_extent};
use crate::error::ScaleError;
use crate::formatter::{FormatSpecifier, NumberFormatter};
use crate::interpolator::Interpolate;

use super::transform::{LogBase, Transform};
use super::{Continuous, ContinuousScale};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Interpolate + Deserialize<'de>"))]
pub struct LogScaleConfig<R: Interpolate = f64> {
    pub domain: Vec<f64>,
    pub range: Vec<R>,
    pub base: f64,
    pub clamp: bool,
    pub round: bool,
    /// Tick count as in the other configs. Log niceing rounds to whole
    /// powers of the base, so any count gives the same domain.
    pub nice: Option<f64>,
}

impl<R: Interpolate> Default for LogScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: vec![1.0, 10.0],
            range: vec![R::from_number(0.0), R::from_number(1.0)],
            base: 10.0,
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

/// A continuous scale that interpolates in logarithmic space.
///
/// The domain must be strictly positive or strictly negative. A domain
/// that includes or crosses zero maps every input to the unknown value,
/// produces no ticks and is left alone by [`LogScale::nice`].
#[derive(Clone, Debug)]
pub struct LogScale<R: Interpolate = f64> {
    core: Continuous<R>,
    base: f64,
}

impl<R: Interpolate> LogScale<R> {
    pub fn new(config: &LogScaleConfig<R>) -> Self {
        let mut this = Self::default()
            .with_base(config.base)
            .with_domain(config.domain.iter().copied())
            .with_range(config.range.iter().cloned())
            .with_clamp(config.clamp);
        if config.round {
            this.range_round(config.range.iter().cloned());
        }
        if config.nice.is_some() {
            this.nice();
        }
        this
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn set_base(&mut self, base: f64) -> &mut Self {
        self.base = base;
        self.rescale();
        self
    }

    pub fn with_base(mut self, base: f64) -> Self {
        self.set_base(base);
        self
    }

    fn log_base(&self) -> LogBase {
        LogBase::new(self.base)
    }

    fn transform(&self) -> Transform {
        self.core.transform()
    }

    /// `logs` in the reflected or plain sense of the current domain.
    fn logs(&self, x: f64) -> f64 {
        self.transform().apply(x)
    }

    fn pows(&self, x: f64) -> f64 {
        self.transform().invert(x)
    }

    /// True when the domain does not lie strictly on one side of zero.
    pub fn straddles_zero(&self) -> bool {
        let d = self.core.domain();
        d.iter().any(|v| *v == 0.0)
            || (d.iter().any(|v| *v < 0.0) && d.iter().any(|v| *v > 0.0))
    }

    pub fn ticks(&self, count: impl Into<Option<f64>>) -> Vec<f64> {
        let n = count.into().unwrap_or(10.0);
        let d = self.core.domain();
        let (Some(&first), Some(&last)) = (d.first(), d.last()) else {
            return vec![];
        };
        if self.straddles_zero() || !(n > 0.0) {
            return vec![];
        }

        let reverse = last < first;
        let (u, v) = if reverse { (last, first) } else { (first, last) };
        let mut i = self.logs(u);
        let mut j = self.logs(v);
        let base = self.base;

        let mut z = Vec::new();
        if base.fract() == 0.0 && j - i < n {
            i = i.floor();
            j = j.ceil();
            let kmax = base as i64;
            for e in (i as i64)..=(j as i64) {
                let e = e as f64;
                if u > 0.0 {
                    for k in 1..kmax {
                        let t = if e < 0.0 {
                            k as f64 / self.pows(-e)
                        } else {
                            k as f64 * self.pows(e)
                        };
                        if t < u {
                            continue;
                        }
                        if t > v {
                            break;
                        }
                        z.push(t);
                    }
                } else {
                    for k in (1..kmax).rev() {
                        let t = if e > 0.0 {
                            k as f64 / self.pows(-e)
                        } else {
                            k as f64 * self.pows(e)
                        };
                        if t < u {
                            continue;
                        }
                        if t > v {
                            break;
                        }
                        z.push(t);
                    }
                }
            }
            if (z.len() as f64) * 2.0 < n {
                z = array::ticks(u, v, n);
            }
        } else {
            z = array::ticks(i, j, n.min(j - i))
                .into_iter()
                .map(|x| self.pows(x))
                .collect();
        }

        if reverse {
            z.reverse();
        }
        z
    }

    /// Tick labels that blank out the minor ticks once they would crowd.
    /// Defaults to `"s"` for base 10 and `","` otherwise; an integer base
    /// trims insignificant zeros unless a precision is given.
    pub fn tick_format(
        &self,
        count: impl Into<Option<f64>>,
        specifier: Option<&str>,
    ) -> Result<LogTickFormat, ScaleError> {
        let count = count.into().unwrap_or(10.0);
        let specifier = specifier.unwrap_or(if self.base == 10.0 { "s" } else { "," });
        let mut spec: FormatSpecifier = specifier.parse()?;
        if self.base.fract() == 0.0 && spec.precision.is_none() {
            spec.trim = true;
        }

        let limit = if count.is_infinite() {
            f64::INFINITY
        } else {
            let ticks = self.ticks(None).len().max(1) as f64;
            (self.base * count / ticks).max(1.0)
        };

        Ok(LogTickFormat {
            formatter: NumberFormatter::new(spec),
            transform: self.transform(),
            base: self.base,
            limit,
        })
    }

    /// Extend the domain to whole powers of the base.
    pub fn nice(&mut self) -> &mut Self {
        let d = self.core.domain().to_vec();
        let degenerate = d.first() == d.last();
        if d.len() < 2 || degenerate || self.straddles_zero() {
            return self;
        }
        let t = self.transform();
        let niced = nice_extent(
            &d,
            |x| t.invert(t.apply(x).floor()),
            |x| t.invert(t.apply(x).ceil()),
        );
        self.core.set_domain(niced);
        self
    }

    pub fn with_nice(mut self) -> Self {
        self.nice();
        self
    }
}

impl<R: Interpolate> Default for LogScale<R> {
    fn default() -> Self {
        let mut core = Continuous::new(Transform::log(10.0));
        core.set_domain(vec![1.0, 10.0]);
        Self { core, base: 10.0 }
    }
}

impl<R: Interpolate> ContinuousScale<R> for LogScale<R> {
    fn core(&self) -> &Continuous<R> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Continuous<R> {
        &mut self.core
    }

    fn rescale(&mut self) {
        let reflect = self.core.domain().first().is_some_and(|d| *d < 0.0);
        let base = self.log_base();
        self.core.set_transform(Transform::Log { base, reflect });
        if self.straddles_zero() {
            tracing::warn!(
                "log scale domain {:?} includes or crosses zero, all inputs map to unknown",
                self.core.domain()
            );
        }
    }
}

/// Formats log scale ticks, returning an empty label for minor ticks
/// beyond the display limit.
#[derive(Clone, Debug)]
pub struct LogTickFormat {
    formatter: NumberFormatter,
    transform: Transform,
    base: f64,
    limit: f64,
}

impl LogTickFormat {
    pub fn format(&self, value: f64) -> String {
        let mut i = value / self.transform.invert(self.transform.apply(value).round());
        if i * self.base < self.base - 0.5 {
            i *= self.base;
        }
        if i <= self.limit {
            self.formatter.format(value)
        } else {
            String::new()
        }
    }

    pub fn formatter(&self) -> &NumberFormatter {
        &self.formatter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_defaults() {
        let scale = LogScale::<f64>::new(&Default::default());
        assert_eq!(scale.domain(), vec![1.0, 10.0]);
        assert_eq!(scale.range(), vec![0.0, 1.0]);
        assert_eq!(scale.base(), 10.0);
        assert!(!scale.clamp());
        assert_approx_eq!(f64, scale.scale(5.0).unwrap(), 0.69897, epsilon = 1e-5);
        assert_approx_eq!(f64, scale.invert(0.69897), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_domain_coercion() {
        let scale = LogScale::<f64>::default().with_domain([1.0, 2.0]);
        let result: Vec<f64> = scale
            .scale_all(&[0.5, 1.0, 1.5, 2.0, 2.5])
            .into_iter()
            .flatten()
            .collect();
        assert_approx_eq!(f64, result[0], -1.0);
        assert_approx_eq!(f64, result[1], 0.0);
        assert_approx_eq!(f64, result[2], 0.5849625, epsilon = 1e-7);
        assert_approx_eq!(f64, result[3], 1.0);
        assert_approx_eq!(f64, result[4], 1.3219281, epsilon = 1e-7);
    }

    #[test]
    fn test_negative_domain() {
        let scale = LogScale::<f64>::default().with_domain([-100.0, -1.0]);
        assert_approx_eq!(f64, scale.scale(-50.0).unwrap(), 0.150515, epsilon = 1e-6);
        assert_approx_eq!(f64, scale.invert(0.150515), -50.0, epsilon = 1e-3);
        assert_eq!(scale.scale(5.0), None);
    }

    #[test]
    fn test_clamping() {
        let scale = LogScale::<f64>::default();
        assert_approx_eq!(f64, scale.scale(0.5).unwrap(), -0.30103, epsilon = 1e-5);
        assert_approx_eq!(f64, scale.scale(15.0).unwrap(), 1.176091, epsilon = 1e-5);

        let scale = scale.with_clamp(true);
        assert_eq!(scale.scale(-1.0), Some(0.0));
        assert_approx_eq!(f64, scale.scale(5.0).unwrap(), 0.69897, epsilon = 1e-5);
        assert_eq!(scale.scale(15.0), Some(1.0));
    }

    #[test]
    fn test_domain_crossing_zero_is_unknown() {
        let mut scale = LogScale::<f64>::default().with_domain([-1.0, 10.0]);
        assert!(scale.straddles_zero());
        assert_eq!(scale.scale(5.0), None);
        assert!(scale.invert(0.5).is_nan());
        assert!(scale.ticks(None).is_empty());
        scale.nice();
        assert_eq!(scale.domain(), vec![-1.0, 10.0]);

        scale.set_unknown(Some(-1.0));
        assert_eq!(scale.scale(5.0), Some(-1.0));

        let scale = LogScale::<f64>::default().with_domain([0.0, 10.0]);
        assert_eq!(scale.scale(5.0), None);
    }

    #[test]
    fn test_nice() {
        let cases = [
            ([1.1, 10.9], [1.0, 100.0]),
            ([10.9, 1.1], [100.0, 1.0]),
            ([0.7, 11.001], [0.1, 100.0]),
            ([123.1, 6.7], [1000.0, 1.0]),
            ([0.01, 0.49], [0.01, 1.0]),
            ([-123.1, -6.7], [-1000.0, -1.0]),
        ];
        for (domain, expected) in cases {
            let scale = LogScale::<f64>::default().with_domain(domain).with_nice();
            assert_eq!(scale.domain(), expected.to_vec(), "{domain:?}");
        }
    }

    #[test]
    fn test_nice_degenerate_is_noop() {
        let scale = LogScale::<f64>::default().with_domain([5.0, 5.0]).with_nice();
        assert_eq!(scale.domain(), vec![5.0, 5.0]);
    }

    #[test]
    fn test_ticks() {
        let scale = LogScale::<f64>::default().with_domain([0.1, 10.0]);
        assert_eq!(
            scale.ticks(None),
            vec![
                0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0,
                8.0, 9.0, 10.0
            ]
        );

        let scale = LogScale::<f64>::default().with_domain([10.0, 1.0]);
        assert_eq!(
            scale.ticks(None),
            vec![10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_ticks_negative_domain() {
        let scale = LogScale::<f64>::default().with_domain([-10.0, -1.0]);
        assert_eq!(
            scale.ticks(None),
            vec![-10.0, -9.0, -8.0, -7.0, -6.0, -5.0, -4.0, -3.0, -2.0, -1.0]
        );
    }

    #[test]
    fn test_ticks_wide_domain() {
        let scale = LogScale::<f64>::default().with_domain([1.0, 1e20]);
        assert_eq!(
            scale.ticks(None),
            vec![1.0, 1e2, 1e4, 1e6, 1e8, 1e10, 1e12, 1e14, 1e16, 1e18, 1e20]
        );
    }

    #[test]
    fn test_base() {
        let scale = LogScale::<f64>::default()
            .with_base(2.0)
            .with_domain([1.0, 32.0]);
        assert_eq!(scale.ticks(None), vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0]);
        assert_approx_eq!(f64, scale.scale(4.0).unwrap(), 0.4);
    }

    #[test]
    fn test_tick_format_blanks_minor_ticks() -> Result<(), ScaleError> {
        let scale = LogScale::<f64>::default().with_domain([1.0, 10000.0]);
        let format = scale.tick_format(5.0, None)?;
        let labels: Vec<String> = [1.0, 2.0, 3.0, 5.0, 10.0, 20.0, 1000.0]
            .iter()
            .map(|v| format.format(*v))
            .collect();
        assert_eq!(labels, vec!["1", "", "", "", "10", "", "1k"]);
        Ok(())
    }

    #[test]
    fn test_tick_format_all_labels() -> Result<(), ScaleError> {
        let scale = LogScale::<f64>::default().with_domain([1.0, 10.0]);
        let format = scale.tick_format(f64::INFINITY, Some(".1f"))?;
        assert_eq!(format.format(2.0), "2.0");
        assert_eq!(format.format(9.0), "9.0");
        Ok(())
    }

    #[test]
    fn test_from_config() {
        let config: LogScaleConfig =
            serde_json::from_str(r#"{"domain": [1.1, 10.9], "base": 10, "nice": 10}"#).unwrap();
        let scale = LogScale::new(&config);
        assert_eq!(scale.domain(), vec![1.0, 100.0]);

        let config: LogScaleConfig =
            serde_json::from_str(r#"{"domain": [1.1, 10.9], "nice": 3}"#).unwrap();
        assert_eq!(LogScale::new(&config).domain(), vec![1.0, 100.0]);

        let config: LogScaleConfig = serde_json::from_str(r#"{"domain": [1.1, 10.9]}"#).unwrap();
        assert_eq!(LogScale::new(&config).domain(), vec![1.1, 10.9]);
    }
}
