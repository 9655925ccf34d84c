pub mod format;
pub mod interval;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::array::{nice_extent, tick_step};
use crate::error::ScaleError;
use crate::interpolator::{Interpolate, Interpolator};
use crate::numeric::transform::Transform;
use crate::numeric::Continuous;

use format::TimeFormat;
use interval::{
    SteppedInterval, TimeInterval, DURATION_DAY, DURATION_HOUR, DURATION_MINUTE, DURATION_MONTH,
    DURATION_SECOND, DURATION_WEEK, DURATION_YEAR,
};

/// Candidate tick intervals, finest first, with their approximate length.
const TICK_INTERVALS: [(TimeInterval, u32, f64); 18] = [
    (TimeInterval::Second, 1, DURATION_SECOND),
    (TimeInterval::Second, 5, 5.0 * DURATION_SECOND),
    (TimeInterval::Second, 15, 15.0 * DURATION_SECOND),
    (TimeInterval::Second, 30, 30.0 * DURATION_SECOND),
    (TimeInterval::Minute, 1, DURATION_MINUTE),
    (TimeInterval::Minute, 5, 5.0 * DURATION_MINUTE),
    (TimeInterval::Minute, 15, 15.0 * DURATION_MINUTE),
    (TimeInterval::Minute, 30, 30.0 * DURATION_MINUTE),
    (TimeInterval::Hour, 1, DURATION_HOUR),
    (TimeInterval::Hour, 3, 3.0 * DURATION_HOUR),
    (TimeInterval::Hour, 6, 6.0 * DURATION_HOUR),
    (TimeInterval::Hour, 12, 12.0 * DURATION_HOUR),
    (TimeInterval::Day, 1, DURATION_DAY),
    (TimeInterval::Day, 2, 2.0 * DURATION_DAY),
    (TimeInterval::WEEK, 1, DURATION_WEEK),
    (TimeInterval::Month, 1, DURATION_MONTH),
    (TimeInterval::Month, 3, 3.0 * DURATION_MONTH),
    (TimeInterval::Year, 1, DURATION_YEAR),
];

/// How `ticks` and `nice` pick their calendar interval: from an
/// approximate tick count or explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeTicks {
    Count(f64),
    Interval(SteppedInterval),
}

impl Default for TimeTicks {
    fn default() -> Self {
        TimeTicks::Count(10.0)
    }
}

impl From<f64> for TimeTicks {
    fn from(count: f64) -> Self {
        TimeTicks::Count(count)
    }
}

impl From<Option<f64>> for TimeTicks {
    fn from(count: Option<f64>) -> Self {
        count.map(TimeTicks::Count).unwrap_or_default()
    }
}

impl From<SteppedInterval> for TimeTicks {
    fn from(interval: SteppedInterval) -> Self {
        TimeTicks::Interval(interval)
    }
}

impl From<TimeInterval> for TimeTicks {
    fn from(interval: TimeInterval) -> Self {
        TimeTicks::Interval(interval.every(1))
    }
}

/// The finest interval whose duration is at least `span / count`. The
/// number of steps does not exceed `count`, but both endpoints are
/// included when they fall on the interval, so a 10 second domain with
/// `count = 10` gives 11 ticks. Spans below a second step in milliseconds
/// and spans beyond a year step in whole years, both using the linear tick
/// step. A non-positive or non-finite count gives no interval.
pub fn tick_interval(start: f64, stop: f64, count: f64) -> Option<SteppedInterval> {
    let target = (stop - start).abs() / count;
    if !(count > 0.0) || !count.is_finite() || !target.is_finite() {
        return None;
    }
    if target < DURATION_SECOND {
        let step = tick_step(start, stop, count).abs().max(1.0);
        return Some(TimeInterval::Millisecond.every(step as u32));
    }
    match TICK_INTERVALS.iter().find(|(_, _, duration)| *duration >= target) {
        Some((interval, step, _)) => Some(interval.every(*step)),
        None => {
            let years = tick_step(start / DURATION_YEAR, stop / DURATION_YEAR, count);
            Some(TimeInterval::Year.every(years.abs().max(1.0) as u32))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Interpolate + Deserialize<'de>"))]
pub struct TimeScaleConfig<R: Interpolate = f64> {
    pub domain: Vec<DateTime<Utc>>,
    pub range: Vec<R>,
    /// IANA name of the calendar time zone.
    pub time_zone: String,
    pub clamp: bool,
    pub round: bool,
    pub nice: Option<TimeTicks>,
}

impl<R: Interpolate> Default for TimeScaleConfig<R> {
    fn default() -> Self {
        Self {
            domain: default_domain().to_vec(),
            range: vec![R::from_number(0.0), R::from_number(1.0)],
            time_zone: "UTC".to_string(),
            clamp: false,
            round: false,
            nice: None,
        }
    }
}

fn default_domain() -> [DateTime<Utc>; 2] {
    let start = DateTime::<Utc>::from_timestamp_millis(946_684_800_000).unwrap_or_default();
    [start, start + chrono::Duration::days(1)]
}

/// A linear scale over instants. Mapping happens on epoch milliseconds;
/// ticks, nice and labels follow the calendar of the scale's time zone.
#[derive(Clone, Debug)]
pub struct TimeScale<R: Interpolate = f64> {
    core: Continuous<R>,
    tz: Tz,
}

impl<R: Interpolate> TimeScale<R> {
    pub fn new(config: &TimeScaleConfig<R>) -> Result<Self, ScaleError> {
        let tz: Tz = config
            .time_zone
            .parse()
            .map_err(|_| ScaleError::UnknownTimeZone(config.time_zone.clone()))?;
        let mut this = Self::local(tz)
            .with_domain(config.domain.iter().copied())
            .with_range(config.range.iter().cloned())
            .with_clamp(config.clamp);
        if config.round {
            this.range_round(config.range.iter().cloned());
        }
        if let Some(nice) = config.nice {
            this.nice(nice);
        }
        Ok(this)
    }

    /// A time scale on the UTC calendar.
    pub fn utc() -> Self {
        Self::local(Tz::UTC)
    }

    /// A time scale on the calendar of `tz`.
    pub fn local(tz: Tz) -> Self {
        let mut core = Continuous::new(Transform::Identity);
        core.set_domain(default_domain().iter().map(to_millis).collect());
        Self { core, tz }
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    pub fn set_time_zone(&mut self, tz: Tz) -> &mut Self {
        self.tz = tz;
        self
    }

    pub fn domain(&self) -> Vec<DateTime<Utc>> {
        self.core
            .domain()
            .iter()
            .filter_map(|ms| from_millis(*ms))
            .collect()
    }

    pub fn domain_millis(&self) -> Vec<f64> {
        self.core.domain().to_vec()
    }

    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = DateTime<Utc>>) -> &mut Self {
        self.core
            .set_domain(domain.into_iter().map(|d| to_millis(&d)).collect());
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn set_domain_millis(&mut self, domain: impl IntoIterator<Item = f64>) -> &mut Self {
        self.core.set_domain(domain.into_iter().collect());
        self
    }

    pub fn range(&self) -> Vec<R> {
        self.core.range().to_vec()
    }

    pub fn set_range(&mut self, range: impl IntoIterator<Item = impl Into<R>>) -> &mut Self {
        self.core.set_range(range.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_range(mut self, range: impl IntoIterator<Item = impl Into<R>>) -> Self {
        self.set_range(range);
        self
    }

    pub fn range_round(&mut self, range: impl IntoIterator<Item = impl Into<R>>) -> &mut Self {
        self.set_range(range);
        self.core.set_interpolator(R::round_interpolator());
        self
    }

    pub fn clamp(&self) -> bool {
        self.core.clamp()
    }

    pub fn set_clamp(&mut self, clamp: bool) -> &mut Self {
        self.core.set_clamp(clamp);
        self
    }

    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.set_clamp(clamp);
        self
    }

    pub fn interpolator(&self) -> Arc<dyn Interpolator<R>> {
        self.core.interpolator()
    }

    pub fn set_interpolator(&mut self, interpolator: Arc<dyn Interpolator<R>>) -> &mut Self {
        self.core.set_interpolator(interpolator);
        self
    }

    pub fn unknown(&self) -> Option<R> {
        self.core.unknown()
    }

    pub fn set_unknown(&mut self, unknown: Option<R>) -> &mut Self {
        self.core.set_unknown(unknown);
        self
    }

    pub fn scale(&self, date: &DateTime<Utc>) -> Option<R> {
        self.core.scale(to_millis(date))
    }

    pub fn scale_opt(&self, date: Option<&DateTime<Utc>>) -> Option<R> {
        match date {
            Some(date) => self.scale(date),
            None => self.core.unknown(),
        }
    }

    /// Scale epoch milliseconds; NaN maps to the unknown value.
    pub fn scale_millis(&self, millis: f64) -> Option<R> {
        self.core.scale(millis)
    }

    /// `None` when `y` is NaN or the range is not numeric.
    pub fn invert(&self, y: f64) -> Option<DateTime<Utc>> {
        from_millis(self.core.invert(y))
    }

    pub fn invert_millis(&self, y: f64) -> f64 {
        self.core.invert(y)
    }

    pub fn ticks(&self, request: impl Into<TimeTicks>) -> Vec<DateTime<Utc>> {
        let d = self.core.domain();
        let (Some(&first), Some(&last)) = (d.first(), d.last()) else {
            return vec![];
        };
        let reverse = last < first;
        let (start, stop) = if reverse { (last, first) } else { (first, last) };

        let interval = match request.into() {
            TimeTicks::Count(count) => match tick_interval(start, stop, count) {
                Some(interval) => interval,
                None => return vec![],
            },
            TimeTicks::Interval(interval) => interval,
        };
        let (Some(start), Some(stop)) = (self.calendar(start), self.calendar(stop + 1.0)) else {
            return vec![];
        };

        let mut ticks: Vec<DateTime<Utc>> = interval
            .range(&start, &stop)
            .into_iter()
            .map(|d| d.with_timezone(&Utc))
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }

    /// Extend the domain to interval boundaries. A no-op on a degenerate
    /// domain.
    pub fn nice(&mut self, request: impl Into<TimeTicks>) -> &mut Self {
        let d = self.core.domain().to_vec();
        let (Some(&first), Some(&last)) = (d.first(), d.last()) else {
            return self;
        };
        if first == last {
            return self;
        }
        let interval = match request.into() {
            TimeTicks::Count(count) => tick_interval(first.min(last), first.max(last), count),
            TimeTicks::Interval(interval) => Some(interval),
        };
        let Some(interval) = interval else {
            return self;
        };

        let niced = nice_extent(
            &d,
            |ms| self.snap(ms, |date| interval.floor(date)),
            |ms| self.snap(ms, |date| interval.ceil(date)),
        );
        self.core.set_domain(niced);
        self
    }

    pub fn with_nice(mut self, request: impl Into<TimeTicks>) -> Self {
        self.nice(request);
        self
    }

    /// The multi-scale tick formatter, or a fixed strftime pattern.
    pub fn tick_format(&self, specifier: Option<&str>) -> Result<TimeFormat, ScaleError> {
        match specifier {
            Some(pattern) => TimeFormat::strftime(pattern, self.tz),
            None => Ok(TimeFormat::multi(self.tz)),
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn calendar(&self, millis: f64) -> Option<DateTime<Tz>> {
        from_millis(millis).map(|d| self.tz.from_utc_datetime(&d.naive_utc()))
    }

    fn snap(&self, millis: f64, f: impl Fn(&DateTime<Tz>) -> DateTime<Tz>) -> f64 {
        self.calendar(millis)
            .map(|d| f(&d).timestamp_millis() as f64)
            .unwrap_or(millis)
    }
}

impl<R: Interpolate> Default for TimeScale<R> {
    fn default() -> Self {
        Self::utc()
    }
}

fn to_millis(date: &DateTime<Utc>) -> f64 {
    date.timestamp_millis() as f64
}

fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
}
