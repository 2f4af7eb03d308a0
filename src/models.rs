//! Contest record data model.
//!
//! This module defines the shapes that flow out of every adapter:
//! - [`ContestRecord`]: one normalized contest, the unit of downstream upsert
//! - [`TimeValue`] / [`DurationValue`]: loosely typed time fields, kept verbatim
//! - [`Length`]: the winning time specification under the precedence rule
//!
//! Time fields are deliberately not parsed into instants here. Sites publish
//! epoch seconds, ISO strings and locale-specific text, and the downstream
//! store owns the conversion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A point in time as published by a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// Unix timestamp in seconds.
    Epoch(i64),
    /// Any textual representation: ISO 8601, `DD.MM.YYYY HH:MM`, ...
    Text(String),
}

impl TimeValue {
    /// `true` when the value carries nothing usable (empty text).
    pub fn is_blank(&self) -> bool {
        matches!(self, TimeValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Epoch(secs) => write!(f, "@{secs}"),
            TimeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TimeValue {
    fn from(secs: i64) -> Self {
        TimeValue::Epoch(secs)
    }
}

impl From<&str> for TimeValue {
    fn from(s: &str) -> Self {
        TimeValue::Text(s.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(s: String) -> Self {
        TimeValue::Text(s)
    }
}

/// A contest length as published by a site: a minute count or `"HH:MM"` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Minutes(i64),
    Text(String),
}

impl DurationValue {
    /// Length in seconds, if the value is a minute count or well-formed
    /// `"HH:MM"` / `"D:HH:MM"` text. `None` when the value overflows.
    pub fn as_secs(&self) -> Option<i64> {
        match self {
            DurationValue::Minutes(m) => m.checked_mul(60),
            DurationValue::Text(s) => {
                let parts = s
                    .trim()
                    .split(':')
                    .map(|p| p.parse::<i64>().ok())
                    .collect::<Option<Vec<_>>>()?;
                let minutes = match parts.as_slice() {
                    [m] => Some(*m),
                    [h, m] => h.checked_mul(60)?.checked_add(*m),
                    [d, h, m] => d.checked_mul(24)?.checked_add(*h)?.checked_mul(60)?.checked_add(*m),
                    _ => None,
                };
                minutes?.checked_mul(60)
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, DurationValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationValue::Minutes(m) => write!(f, "{m}m"),
            DurationValue::Text(s) => f.write_str(s),
        }
    }
}

/// The time specification that wins for a record.
///
/// Precedence: `duration_in_secs` > `duration` > `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length<'a> {
    Seconds(i64),
    Duration(&'a DurationValue),
    Until(&'a TimeValue),
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One scraped contest, normalized and ready for upsert by `(host, key)`.
///
/// Built only through [`crate::normalize::normalize`], so every instance has
/// non-empty `title`, `url`, `key`, `host` and `timezone`, plus a sufficient
/// time specification unless `skip_check_time` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestRecord {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_secs: Option<i64>,
    pub key: String,
    pub host: String,
    pub rid: i64,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standings_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standings_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub info: Map<String, Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub invisible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_update_key: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_check_time: bool,
}

impl ContestRecord {
    /// The time specification that wins under the precedence rule, if any.
    pub fn length(&self) -> Option<Length<'_>> {
        if let Some(secs) = self.duration_in_secs {
            return Some(Length::Seconds(secs));
        }
        if let Some(duration) = self.duration.as_ref().filter(|d| !d.is_blank()) {
            return Some(Length::Duration(duration));
        }
        self.end_time
            .as_ref()
            .filter(|t| !t.is_blank())
            .map(Length::Until)
    }

    /// Length in seconds when it can be known without date parsing: exact
    /// seconds, a parseable duration, or two epoch timestamps.
    pub fn length_secs(&self) -> Option<i64> {
        match self.length()? {
            Length::Seconds(secs) => Some(secs),
            Length::Duration(d) => d.as_secs(),
            Length::Until(TimeValue::Epoch(end)) => match self.start_time {
                Some(TimeValue::Epoch(start)) => end.checked_sub(start),
                _ => None,
            },
            Length::Until(TimeValue::Text(_)) => None,
        }
    }

    /// Upsert identity.
    pub fn identity(&self) -> (&str, &str) {
        (&self.host, &self.key)
    }
}
