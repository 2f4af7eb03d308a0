//! Per-run context handed to every adapter.
//!
//! A [`RunContext`] is resolved once from caller-supplied [`ContextOptions`]
//! and the adapter's [`SiteDefaults`], and is never mutated afterwards.
//! Adapters that iterate over yearly pages or sub-hosts derive a fresh
//! context per iteration with [`RunContext::with_url`] and friends.

use crate::utils::host_of;
use chrono::{NaiveDate, Utc};

/// Resource id meaning "standalone/debug run".
pub const DEBUG_RID: i64 = -1;

/// Language tag used when neither caller nor config specify one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Defaults an adapter declares for its site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteDefaults {
    pub url: &'static str,
    pub timezone: &'static str,
}

/// Caller-supplied values; anything left `None` falls back to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOptions {
    pub url: Option<String>,
    pub host: Option<String>,
    pub rid: Option<i64>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub full_list: bool,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub url: String,
    pub host: String,
    pub rid: i64,
    pub language: String,
    pub timezone: String,
    pub full_list: bool,
    /// Calendar date the run considers "today"; used to pick seasons/years.
    pub today: NaiveDate,
}

impl RunContext {
    /// Substitute defaults for every missing option. Never fails.
    ///
    /// The host falls back to the URL's authority, or to the raw URL when it
    /// has none.
    pub fn resolve(options: ContextOptions, defaults: SiteDefaults) -> Self {
        let url = non_empty(options.url).unwrap_or_else(|| defaults.url.to_string());
        let host = non_empty(options.host)
            .or_else(|| host_of(&url))
            .unwrap_or_else(|| url.clone());

        RunContext {
            host,
            rid: options.rid.unwrap_or(DEBUG_RID),
            language: non_empty(options.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            timezone: non_empty(options.timezone).unwrap_or_else(|| defaults.timezone.to_string()),
            full_list: options.full_list,
            today: options.today.unwrap_or_else(|| Utc::now().date_naive()),
            url,
        }
    }

    pub fn is_debug(&self) -> bool {
        self.rid == DEBUG_RID
    }

    /// Same run, different page. The host is kept.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        RunContext {
            url: url.into(),
            ..self.clone()
        }
    }

    /// Same run, different sub-host (e.g. a yearly subdomain).
    pub fn with_host(&self, host: impl Into<String>) -> Self {
        RunContext {
            host: host.into(),
            ..self.clone()
        }
    }

    pub fn with_timezone(&self, timezone: impl Into<String>) -> Self {
        RunContext {
            timezone: timezone.into(),
            ..self.clone()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
