pub mod identity;
pub mod linear;
pub mod log;
pub mod pow;
pub mod radial;
pub mod symlog;
pub mod transform;

use std::sync::Arc;

use crate::array::{self, bisect_right};
use crate::error::ScaleError;
use crate::formatter::{self, NumberFormatter};
use crate::interpolator::{Interpolate, Interpolator};

use transform::Transform;

/// State shared by every continuous scale: a numeric domain mapped through
/// a transform and piecewise interpolated onto a range.
///
/// Nothing derived is cached; each call resolves the bracketing segment
/// from the current domain and range.
#[derive(Clone, Debug)]
pub struct Continuous<R: Interpolate = f64> {
    transform: Transform,
    domain: Vec<f64>,
    range: Vec<R>,
    interpolator: Arc<dyn Interpolator<R>>,
    clamp: bool,
    unknown: Option<R>,
}

impl<R: Interpolate> Continuous<R> {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            domain: vec![0.0, 1.0],
            range: vec![R::from_number(0.0), R::from_number(1.0)],
            interpolator: R::default_interpolator(),
            clamp: false,
            unknown: None,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn set_domain(&mut self, domain: Vec<f64>) {
        self.domain = domain;
    }

    pub fn range(&self) -> &[R] {
        &self.range
    }

    pub fn set_range(&mut self, range: Vec<R>) {
        self.range = range;
    }

    pub fn interpolator(&self) -> Arc<dyn Interpolator<R>> {
        self.interpolator.clone()
    }

    pub fn set_interpolator(&mut self, interpolator: Arc<dyn Interpolator<R>>) {
        self.interpolator = interpolator;
    }

    pub fn clamp(&self) -> bool {
        self.clamp
    }

    pub fn set_clamp(&mut self, clamp: bool) {
        self.clamp = clamp;
    }

    pub fn unknown(&self) -> Option<R> {
        self.unknown.clone()
    }

    pub fn set_unknown(&mut self, unknown: Option<R>) {
        self.unknown = unknown;
    }

    /// Number of usable domain/range pairs.
    fn pairs(&self) -> usize {
        self.domain.len().min(self.range.len())
    }

    fn transformed_domain(&self, n: usize) -> Option<Vec<f64>> {
        let td: Vec<f64> = self.domain[..n]
            .iter()
            .map(|d| self.transform.apply(*d))
            .collect();
        td.iter().all(|d| d.is_finite()).then_some(td)
    }

    pub fn scale(&self, x: f64) -> Option<R> {
        if x.is_nan() {
            return self.unknown.clone();
        }
        let n = self.pairs();
        match n {
            0 => return self.unknown.clone(),
            1 => return Some(self.range[0].clone()),
            _ => {}
        }

        let x = if self.clamp {
            clamp_to(x, self.domain[0], self.domain[n - 1])
        } else {
            x
        };
        let tx = self.transform.apply(x);
        if tx.is_nan() {
            return self.unknown.clone();
        }
        let Some(td) = self.transformed_domain(n) else {
            return self.unknown.clone();
        };

        let (i, t) = locate(&td, tx);
        Some(
            self.interpolator
                .interpolate(&self.range[i], &self.range[i + 1], t),
        )
    }

    /// Maps a range value back to the domain. NaN when the range is not
    /// numeric or the input is NaN.
    pub fn invert(&self, y: f64) -> f64 {
        let n = self.pairs();
        if y.is_nan() || n < 2 {
            return f64::NAN;
        }
        let Some(range) = self.range[..n]
            .iter()
            .map(|r| r.to_number())
            .collect::<Option<Vec<f64>>>()
        else {
            return f64::NAN;
        };
        let Some(td) = self.transformed_domain(n) else {
            return f64::NAN;
        };

        let y = if self.clamp {
            clamp_to(y, range[0], range[n - 1])
        } else {
            y
        };
        let (i, t) = locate(&range, y);
        let tx = td[i] * (1.0 - t) + td[i + 1] * t;
        self.transform.invert(tx)
    }
}

/// Segment index and normalized position of `x` within breakpoints `d`
/// (at least two, ascending or descending).
fn locate(d: &[f64], x: f64) -> (usize, f64) {
    let j = d.len() - 1;
    let i = if j == 1 {
        0
    } else if d[j] < d[0] {
        // descending: bisect the mirrored breakpoints
        let mirrored: Vec<f64> = d[1..j].iter().map(|v| -v).collect();
        bisect_right(&mirrored, &-x)
    } else {
        bisect_right(&d[1..j], &x)
    };
    (i, normalize(d[i], d[i + 1], x))
}

fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span != 0.0 {
        (x - a) / span
    } else if span.is_nan() {
        f64::NAN
    } else {
        0.5
    }
}

fn clamp_to(x: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    x.max(lo).min(hi)
}

/// The accessor/mutator surface shared by the transform-based continuous
/// scales (linear, pow, log, symlog).
pub trait ContinuousScale<R: Interpolate>: Clone {
    fn core(&self) -> &Continuous<R>;

    fn core_mut(&mut self) -> &mut Continuous<R>;

    /// Called after the domain changes.
    fn rescale(&mut self) {}

    fn domain(&self) -> Vec<f64> {
        self.core().domain().to_vec()
    }

    fn set_domain(&mut self, domain: impl IntoIterator<Item = f64>) -> &mut Self {
        self.core_mut().set_domain(domain.into_iter().collect());
        self.rescale();
        self
    }

    fn with_domain(mut self, domain: impl IntoIterator<Item = f64>) -> Self {
        self.set_domain(domain);
        self
    }

    fn range(&self) -> Vec<R> {
        self.core().range().to_vec()
    }

    fn set_range(&mut self, range: impl IntoIterator<Item = impl Into<R>>) -> &mut Self {
        self.core_mut()
            .set_range(range.into_iter().map(Into::into).collect());
        self
    }

    fn with_range(mut self, range: impl IntoIterator<Item = impl Into<R>>) -> Self {
        self.set_range(range);
        self
    }

    /// Sets the range and switches to the rounding interpolator.
    fn range_round(&mut self, range: impl IntoIterator<Item = impl Into<R>>) -> &mut Self {
        self.set_range(range);
        self.core_mut().set_interpolator(R::round_interpolator());
        self
    }

    fn clamp(&self) -> bool {
        self.core().clamp()
    }

    fn set_clamp(&mut self, clamp: bool) -> &mut Self {
        self.core_mut().set_clamp(clamp);
        self
    }

    fn with_clamp(mut self, clamp: bool) -> Self {
        self.set_clamp(clamp);
        self
    }

    fn interpolator(&self) -> Arc<dyn Interpolator<R>> {
        self.core().interpolator()
    }

    fn set_interpolator(&mut self, interpolator: Arc<dyn Interpolator<R>>) -> &mut Self {
        self.core_mut().set_interpolator(interpolator);
        self
    }

    fn unknown(&self) -> Option<R> {
        self.core().unknown()
    }

    fn set_unknown(&mut self, unknown: Option<R>) -> &mut Self {
        self.core_mut().set_unknown(unknown);
        self
    }

    fn scale(&self, x: f64) -> Option<R> {
        self.core().scale(x)
    }

    /// Like `scale`, with `None` standing for a missing input.
    fn scale_opt(&self, x: Option<f64>) -> Option<R> {
        self.scale(x.unwrap_or(f64::NAN))
    }

    fn scale_all(&self, xs: &[f64]) -> Vec<Option<R>> {
        xs.iter().map(|x| self.scale(*x)).collect()
    }

    fn invert(&self, y: f64) -> f64 {
        self.core().invert(y)
    }

    fn invert_all(&self, ys: &[f64]) -> Vec<f64> {
        ys.iter().map(|y| self.invert(*y)).collect()
    }

    /// An independent deep copy.
    fn copy(&self) -> Self {
        self.clone()
    }
}

/// Ticks, tick formatting and niceing computed directly on a numeric domain.
pub trait Linearish {
    fn linear_domain(&self) -> Vec<f64>;

    fn replace_domain(&mut self, domain: Vec<f64>);

    fn ticks(&self, count: impl Into<Option<f64>>) -> Vec<f64> {
        let d = self.linear_domain();
        match (d.first(), d.last()) {
            (Some(start), Some(stop)) => array::ticks(*start, *stop, count.into().unwrap_or(10.0)),
            _ => vec![],
        }
    }

    fn tick_format(
        &self,
        count: impl Into<Option<f64>>,
        specifier: Option<&str>,
    ) -> Result<NumberFormatter, ScaleError> {
        let d = self.linear_domain();
        let (start, stop) = match (d.first(), d.last()) {
            (Some(start), Some(stop)) => (*start, *stop),
            _ => (0.0, 0.0),
        };
        formatter::tick_format(start, stop, count.into().unwrap_or(10.0), specifier)
    }

    /// Extend the domain to values that are multiples of the tick step.
    fn nice(&mut self, count: impl Into<Option<f64>>) -> &mut Self
    where
        Self: Sized,
    {
        let domain = self.linear_domain();
        if let Some(niced) = nice_linear(&domain, count.into().unwrap_or(10.0)) {
            self.replace_domain(niced);
        }
        self
    }

    fn with_nice(mut self, count: impl Into<Option<f64>>) -> Self
    where
        Self: Sized,
    {
        self.nice(count);
        self
    }
}

/// Nice the extremes of `domain` so they land on tick-step multiples.
/// `None` when the domain is degenerate or no stable step is found.
pub fn nice_linear(domain: &[f64], count: f64) -> Option<Vec<f64>> {
    if domain.len() < 2 {
        return None;
    }
    let mut d = domain.to_vec();
    let (mut i0, mut i1) = (0, d.len() - 1);
    let (mut start, mut stop) = (d[i0], d[i1]);
    if stop < start {
        std::mem::swap(&mut start, &mut stop);
        std::mem::swap(&mut i0, &mut i1);
    }

    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = array::tick_increment(start, stop, count);
        if step == prestep {
            d[i0] = start;
            d[i1] = stop;
            return Some(d);
        } else if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    None
}
