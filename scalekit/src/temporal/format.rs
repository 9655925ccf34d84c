use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::ScaleError;

use super::interval::TimeInterval;

const FORMAT_MILLISECOND: &str = ".%3f";
const FORMAT_SECOND: &str = ":%S";
const FORMAT_MINUTE: &str = "%I:%M";
const FORMAT_HOUR: &str = "%I %p";
const FORMAT_DAY: &str = "%a %d";
const FORMAT_WEEK: &str = "%b %d";
const FORMAT_MONTH: &str = "%B";
const FORMAT_YEAR: &str = "%Y";

/// Formats time ticks in a calendar time zone. The multi-scale variant
/// picks the coarsest label that still distinguishes the date, for
/// example `"%B"` for the first of a month and `"%I %p"` on the hour.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeFormat {
    pattern: Option<String>,
    tz: Tz,
}

impl TimeFormat {
    pub fn multi(tz: Tz) -> Self {
        Self { pattern: None, tz }
    }

    /// A fixed strftime pattern. Fails on unknown directives.
    pub fn strftime(pattern: &str, tz: Tz) -> Result<Self, ScaleError> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ScaleError::InvalidFormatSpecifier(pattern.to_string()));
        }
        Ok(Self {
            pattern: Some(pattern.to_string()),
            tz,
        })
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn format(&self, date: &DateTime<Utc>) -> String {
        let local = date.with_timezone(&self.tz);
        let pattern = match &self.pattern {
            Some(pattern) => pattern.as_str(),
            None => multi_pattern(&local),
        };
        local.format(pattern).to_string()
    }
}

fn multi_pattern(date: &DateTime<Tz>) -> &'static str {
    let below = |interval: TimeInterval| interval.floor(date) < *date;
    if below(TimeInterval::Second) {
        FORMAT_MILLISECOND
    } else if below(TimeInterval::Minute) {
        FORMAT_SECOND
    } else if below(TimeInterval::Hour) {
        FORMAT_MINUTE
    } else if below(TimeInterval::Day) {
        FORMAT_HOUR
    } else if below(TimeInterval::Month) {
        if below(TimeInterval::WEEK) {
            FORMAT_DAY
        } else {
            FORMAT_WEEK
        }
    } else if below(TimeInterval::Year) {
        FORMAT_MONTH
    } else {
        FORMAT_YEAR
    }
}
