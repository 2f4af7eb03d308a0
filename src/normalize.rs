//! Turning raw scraped fields into [`ContestRecord`]s.
//!
//! Adapters fill a [`ContestDraft`] with whatever the site offers and hand
//! it to [`normalize`] (usually through the accumulator). The normalizer:
//!
//! 1. cleans `title` and `key` (whitespace) and rejects them when empty
//! 2. resolves `url`, `standings_url` and `registration_url` against the
//!    context URL
//! 3. copies `host`, `rid` and `timezone` from the context, unless the draft
//!    explicitly overrides host or timezone
//! 4. checks that the time specification is sufficient
//!
//! Time values pass through verbatim. No end time is ever computed from a
//! duration or vice versa.

use crate::context::RunContext;
use crate::error::NormalizeError;
use crate::models::{ContestRecord, DurationValue, TimeValue};
use crate::utils::{collapse_whitespace, resolve_url};
use serde_json::{Map, Value};

/// All-optional pre-normalization form of a [`ContestRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContestDraft {
    pub title: Option<String>,
    pub url: Option<String>,
    pub key: Option<String>,
    pub start_time: Option<TimeValue>,
    pub end_time: Option<TimeValue>,
    pub duration: Option<DurationValue>,
    pub duration_in_secs: Option<i64>,
    pub host: Option<String>,
    pub timezone: Option<String>,
    pub standings_url: Option<String>,
    pub registration_url: Option<String>,
    pub kind: Option<String>,
    pub standings_kind: Option<String>,
    pub info: Map<String, Value>,
    pub invisible: bool,
    pub skip_update_key: bool,
    pub skip_check_time: bool,
}

impl ContestDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn key(mut self, key: impl ToString) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn start(mut self, start: impl Into<TimeValue>) -> Self {
        self.start_time = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<TimeValue>) -> Self {
        self.end_time = Some(end.into());
        self
    }

    pub fn duration(mut self, duration: DurationValue) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn duration_in_secs(mut self, secs: i64) -> Self {
        self.duration_in_secs = Some(secs);
        self
    }

    /// Override the context host, for adapters fanning out to sub-hosts.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Explicit zone published by the site.
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn standings_url(mut self, url: impl Into<String>) -> Self {
        self.standings_url = Some(url.into());
        self
    }

    pub fn registration_url(mut self, url: impl Into<String>) -> Self {
        self.registration_url = Some(url.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn standings_kind(mut self, kind: impl Into<String>) -> Self {
        self.standings_kind = Some(kind.into());
        self
    }

    pub fn info(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.info.insert(name.to_string(), value.into());
        self
    }

    pub fn invisible(mut self, invisible: bool) -> Self {
        self.invisible = invisible;
        self
    }

    pub fn skip_update_key(mut self, skip: bool) -> Self {
        self.skip_update_key = skip;
        self
    }

    pub fn skip_check_time(mut self, skip: bool) -> Self {
        self.skip_check_time = skip;
        self
    }
}

/// Normalize `draft` against `ctx`.
///
/// # Errors
///
/// - [`NormalizeError::MissingField`] for an empty title, url or key
/// - [`NormalizeError::BadUrl`] when a link cannot be resolved
/// - [`NormalizeError::MissingStart`] / [`NormalizeError::MissingLength`] for
///   an insufficient time specification, unless `skip_check_time` is set
pub fn normalize(ctx: &RunContext, draft: ContestDraft) -> Result<ContestRecord, NormalizeError> {
    let title = cleaned(draft.title).ok_or(NormalizeError::MissingField("title"))?;
    let key = cleaned(draft.key).ok_or(NormalizeError::MissingField("key"))?;
    let url = cleaned(draft.url).ok_or(NormalizeError::MissingField("url"))?;
    let url = resolve(&ctx.url, &url)?;
    let standings_url = cleaned(draft.standings_url)
        .map(|u| resolve(&url, &u))
        .transpose()?;
    let registration_url = cleaned(draft.registration_url)
        .map(|u| resolve(&url, &u))
        .transpose()?;

    let start_time = draft.start_time.filter(|t| !t.is_blank());
    let end_time = draft.end_time.filter(|t| !t.is_blank());
    let duration = draft.duration.filter(|d| !d.is_blank());

    if !draft.skip_check_time {
        if start_time.is_none() {
            return Err(NormalizeError::MissingStart);
        }
        if end_time.is_none() && duration.is_none() && draft.duration_in_secs.is_none() {
            return Err(NormalizeError::MissingLength);
        }
    }

    let host = cleaned(draft.host)
        .or_else(|| cleaned(Some(ctx.host.clone())))
        .ok_or(NormalizeError::MissingField("host"))?;
    let timezone = cleaned(draft.timezone)
        .or_else(|| cleaned(Some(ctx.timezone.clone())))
        .ok_or(NormalizeError::MissingField("timezone"))?;

    Ok(ContestRecord {
        title,
        url,
        start_time,
        end_time,
        duration,
        duration_in_secs: draft.duration_in_secs,
        key,
        host,
        rid: ctx.rid,
        timezone,
        standings_url,
        registration_url,
        kind: cleaned(draft.kind),
        standings_kind: cleaned(draft.standings_kind),
        info: draft.info,
        invisible: draft.invisible,
        skip_update_key: draft.skip_update_key,
        skip_check_time: draft.skip_check_time,
    })
}

fn cleaned(value: Option<String>) -> Option<String> {
    value
        .map(|v| collapse_whitespace(&v))
        .filter(|v| !v.is_empty())
}

fn resolve(base: &str, href: &str) -> Result<String, NormalizeError> {
    resolve_url(base, href).map_err(|e| NormalizeError::BadUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })
}
