use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone,
    Timelike, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::error::ScaleError;

pub const DURATION_SECOND: f64 = 1_000.0;
pub const DURATION_MINUTE: f64 = DURATION_SECOND * 60.0;
pub const DURATION_HOUR: f64 = DURATION_MINUTE * 60.0;
pub const DURATION_DAY: f64 = DURATION_HOUR * 24.0;
pub const DURATION_WEEK: f64 = DURATION_DAY * 7.0;
pub const DURATION_MONTH: f64 = DURATION_DAY * 30.0;
pub const DURATION_YEAR: f64 = DURATION_DAY * 365.0;

/// A calendar interval evaluated in the time zone of the dates it is
/// given. Weeks start on the contained weekday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeInterval {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week(Weekday),
    Month,
    Year,
}

impl TimeInterval {
    /// Sunday-based weeks.
    pub const WEEK: TimeInterval = TimeInterval::Week(Weekday::Sun);

    /// Every `step`-th boundary of this interval. Steps below one are
    /// treated as one.
    pub fn every(self, step: u32) -> SteppedInterval {
        SteppedInterval {
            interval: self,
            step: step.max(1),
        }
    }

    pub fn floor<Z: TimeZone>(&self, date: &DateTime<Z>) -> DateTime<Z> {
        let tz = date.timezone();
        let local = date.naive_local();
        match self {
            TimeInterval::Millisecond => at_millis(&tz, date.timestamp_millis()),
            TimeInterval::Second => at_millis(&tz, date.timestamp_millis().div_euclid(1000) * 1000),
            TimeInterval::Minute => {
                let second = at_millis(&tz, date.timestamp_millis().div_euclid(1000) * 1000);
                second - Duration::seconds(local.second() as i64)
            }
            TimeInterval::Hour => {
                let minute = TimeInterval::Minute.floor(date);
                minute - Duration::minutes(local.minute() as i64)
            }
            TimeInterval::Day => localize(&tz, local.date()),
            TimeInterval::Week(start) => {
                let back = (local.weekday().num_days_from_sunday() + 7
                    - start.num_days_from_sunday())
                    % 7;
                localize(&tz, local.date() - Duration::days(back as i64))
            }
            TimeInterval::Month => localize(&tz, local.date().with_day(1).unwrap_or(local.date())),
            TimeInterval::Year => localize(
                &tz,
                NaiveDate::from_ymd_opt(local.year(), 1, 1).unwrap_or(local.date()),
            ),
        }
    }

    /// Move `date` by `step` whole intervals. Sub-day intervals move by
    /// exact durations, longer ones by calendar fields in local time.
    pub fn offset<Z: TimeZone>(&self, date: &DateTime<Z>, step: i64) -> DateTime<Z> {
        let tz = date.timezone();
        let local = date.naive_local();
        match self {
            TimeInterval::Millisecond => date.clone() + Duration::milliseconds(step),
            TimeInterval::Second => date.clone() + Duration::seconds(step),
            TimeInterval::Minute => date.clone() + Duration::minutes(step),
            TimeInterval::Hour => date.clone() + Duration::hours(step),
            TimeInterval::Day => localize_time(&tz, local + Duration::days(step)),
            TimeInterval::Week(_) => localize_time(&tz, local + Duration::weeks(step)),
            TimeInterval::Month => add_months(&tz, local, step).unwrap_or_else(|| date.clone()),
            TimeInterval::Year => {
                add_months(&tz, local, step.saturating_mul(12)).unwrap_or_else(|| date.clone())
            }
        }
    }

    pub fn ceil<Z: TimeZone>(&self, date: &DateTime<Z>) -> DateTime<Z> {
        self.every(1).ceil(date)
    }

    pub fn round<Z: TimeZone>(&self, date: &DateTime<Z>) -> DateTime<Z> {
        self.every(1).round(date)
    }

    pub fn range<Z: TimeZone>(&self, start: &DateTime<Z>, stop: &DateTime<Z>) -> Vec<DateTime<Z>> {
        self.every(1).range(start, stop)
    }

    /// Number of interval boundaries after `start` and up to `end`.
    pub fn count<Z: TimeZone>(&self, start: &DateTime<Z>, end: &DateTime<Z>) -> i64 {
        let (start, end) = (self.floor(start), self.floor(end));
        let millis = |unit: i64| (end.timestamp_millis() - start.timestamp_millis()).div_euclid(unit);
        match self {
            TimeInterval::Millisecond => millis(1),
            TimeInterval::Second => millis(1_000),
            TimeInterval::Minute => millis(60_000),
            TimeInterval::Hour => millis(3_600_000),
            TimeInterval::Day => (end.date_naive() - start.date_naive()).num_days(),
            TimeInterval::Week(_) => (end.date_naive() - start.date_naive()).num_days().div_euclid(7),
            TimeInterval::Month => {
                let months = |d: &DateTime<Z>| {
                    let local = d.naive_local();
                    local.year() as i64 * 12 + local.month0() as i64
                };
                months(&end) - months(&start)
            }
            TimeInterval::Year => (end.naive_local().year() - start.naive_local().year()) as i64,
        }
    }

    /// The calendar field tested by `every(k)`: a boundary is kept when
    /// this value is a multiple of `k`.
    fn field<Z: TimeZone>(&self, date: &DateTime<Z>) -> i64 {
        let local = date.naive_local();
        match self {
            TimeInterval::Millisecond => date.timestamp_millis(),
            TimeInterval::Second => local.second() as i64,
            TimeInterval::Minute => local.minute() as i64,
            TimeInterval::Hour => local.hour() as i64,
            TimeInterval::Day => local.day0() as i64,
            TimeInterval::Week(_) => {
                let epoch = localize(&date.timezone(), NaiveDate::default());
                self.count(&epoch, date)
            }
            TimeInterval::Month => local.month0() as i64,
            TimeInterval::Year => local.year() as i64,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TimeInterval::Millisecond => "millisecond",
            TimeInterval::Second => "second",
            TimeInterval::Minute => "minute",
            TimeInterval::Hour => "hour",
            TimeInterval::Day => "day",
            TimeInterval::Week(Weekday::Sun) => "week",
            TimeInterval::Week(Weekday::Mon) => "monday",
            TimeInterval::Week(Weekday::Tue) => "tuesday",
            TimeInterval::Week(Weekday::Wed) => "wednesday",
            TimeInterval::Week(Weekday::Thu) => "thursday",
            TimeInterval::Week(Weekday::Fri) => "friday",
            TimeInterval::Week(Weekday::Sat) => "saturday",
            TimeInterval::Month => "month",
            TimeInterval::Year => "year",
        }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeInterval {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let interval = match name.as_str() {
            "ms" | "millisecond" | "milliseconds" => TimeInterval::Millisecond,
            "s" | "sec" | "secs" | "second" | "seconds" => TimeInterval::Second,
            "min" | "mins" | "minute" | "minutes" => TimeInterval::Minute,
            "h" | "hr" | "hrs" | "hour" | "hours" => TimeInterval::Hour,
            "d" | "day" | "days" => TimeInterval::Day,
            "w" | "week" | "weeks" => TimeInterval::WEEK,
            "month" | "months" => TimeInterval::Month,
            "y" | "yr" | "yrs" | "year" | "years" => TimeInterval::Year,
            other => {
                let singular = other
                    .strip_suffix('s')
                    .filter(|n| n.ends_with("day"))
                    .unwrap_or(other);
                let weekday = singular
                    .parse::<Weekday>()
                    .map_err(|_| ScaleError::InvalidTimeInterval(s.to_string()))?;
                TimeInterval::Week(weekday)
            }
        };
        Ok(interval)
    }
}

/// A [`TimeInterval`] that keeps every `step`-th boundary, aligned to the
/// calendar: `minute.every(15)` yields minutes divisible by 15 and
/// `day.every(2)` the odd days of each month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SteppedInterval {
    interval: TimeInterval,
    step: u32,
}

impl SteppedInterval {
    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    fn matches<Z: TimeZone>(&self, date: &DateTime<Z>) -> bool {
        self.interval.field(date).rem_euclid(self.step as i64) == 0
    }

    pub fn floor<Z: TimeZone>(&self, date: &DateTime<Z>) -> DateTime<Z> {
        let tz = date.timezone();
        let step = self.step as i64;
        match self.interval {
            _ if step == 1 => self.interval.floor(date),
            TimeInterval::Millisecond => at_millis(&tz, date.timestamp_millis().div_euclid(step) * step),
            TimeInterval::Year => {
                let year = (date.naive_local().year() as i64).div_euclid(step) * step;
                NaiveDate::from_ymd_opt(year as i32, 1, 1)
                    .map(|d| localize(&tz, d))
                    .unwrap_or_else(|| self.interval.floor(date))
            }
            interval => {
                let mut d = interval.floor(date);
                while !self.matches(&d) {
                    d = interval.floor(&(d - Duration::milliseconds(1)));
                }
                d
            }
        }
    }

    pub fn offset<Z: TimeZone>(&self, date: &DateTime<Z>, step: i64) -> DateTime<Z> {
        let k = self.step as i64;
        match self.interval {
            interval if k == 1 => interval.offset(date, step),
            interval @ (TimeInterval::Millisecond | TimeInterval::Year) => {
                interval.offset(date, step.saturating_mul(k))
            }
            interval => {
                let direction = step.signum();
                let mut d = date.clone();
                for _ in 0..step.unsigned_abs() {
                    d = interval.offset(&d, direction);
                    while !self.matches(&d) {
                        d = interval.offset(&d, direction);
                    }
                }
                d
            }
        }
    }

    /// The earliest boundary at or after `date`.
    pub fn ceil<Z: TimeZone>(&self, date: &DateTime<Z>) -> DateTime<Z> {
        let floored = self.floor(&(date.clone() - Duration::milliseconds(1)));
        self.floor(&self.offset(&floored, 1))
    }

    /// The nearest boundary, preferring the later one on ties.
    pub fn round<Z: TimeZone>(&self, date: &DateTime<Z>) -> DateTime<Z> {
        let d0 = self.floor(date);
        let d1 = self.ceil(date);
        if date.clone() - d0.clone() < d1.clone() - date.clone() {
            d0
        } else {
            d1
        }
    }

    /// Boundaries in `[start, stop)`.
    pub fn range<Z: TimeZone>(&self, start: &DateTime<Z>, stop: &DateTime<Z>) -> Vec<DateTime<Z>> {
        self.range_step(start, stop, 1)
    }

    /// Every `step`-th boundary in `[start, stop)`.
    pub fn range_step<Z: TimeZone>(
        &self,
        start: &DateTime<Z>,
        stop: &DateTime<Z>,
        step: i64,
    ) -> Vec<DateTime<Z>> {
        let mut out = Vec::new();
        let mut current = self.ceil(start);
        if current >= *stop || step < 1 {
            return out;
        }
        loop {
            out.push(current.clone());
            let next = self.floor(&self.offset(&current, step));
            if next <= current || next >= *stop {
                return out;
            }
            current = next;
        }
    }
}

impl From<TimeInterval> for SteppedInterval {
    fn from(interval: TimeInterval) -> Self {
        interval.every(1)
    }
}

impl fmt::Display for SteppedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == 1 {
            write!(f, "{}", self.interval)
        } else {
            write!(f, "{} {}s", self.step, self.interval)
        }
    }
}

/// Accepts `"month"`, `"3 months"` and `"every 15 minutes"`.
impl FromStr for SteppedInterval {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScaleError::InvalidTimeInterval(s.to_string());
        let lower = s.trim().to_ascii_lowercase();
        let text = lower.strip_prefix("every").unwrap_or(&lower).trim();
        let mut parts = text.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(unit), None, None) => Ok(unit.parse::<TimeInterval>()?.every(1)),
            (Some(step), Some(unit), None) => {
                let step: u32 = step.parse().map_err(|_| invalid())?;
                if step == 0 {
                    return Err(invalid());
                }
                Ok(unit.parse::<TimeInterval>()?.every(step))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for SteppedInterval {
    type Error = ScaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SteppedInterval> for String {
    fn from(value: SteppedInterval) -> Self {
        value.to_string()
    }
}

fn at_millis<Z: TimeZone>(tz: &Z, millis: i64) -> DateTime<Z> {
    let utc = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
    tz.from_utc_datetime(&utc.naive_utc())
}

fn localize<Z: TimeZone>(tz: &Z, date: NaiveDate) -> DateTime<Z> {
    localize_time(tz, date.and_time(Default::default()))
}

/// Resolve a local wall-clock time, taking the earlier instant when it is
/// ambiguous and skipping forward over a gap.
fn localize_time<Z: TimeZone>(tz: &Z, local: NaiveDateTime) -> DateTime<Z> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(d) => d,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&local)),
    }
}

fn add_months<Z: TimeZone>(tz: &Z, local: NaiveDateTime, months: i64) -> Option<DateTime<Z>> {
    let delta = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    let shifted = if months >= 0 {
        local.checked_add_months(delta)?
    } else {
        local.checked_sub_months(delta)?
    };
    Some(localize_time(tz, shifted))
}
