//! Error types shared by adapters, the normalizer and configuration loading.
//!
//! Only conditions that end an adapter run are errors. Shape problems on a
//! single page or record are reported as [`crate::report::Warning`]s through
//! the accumulator instead, and duplicates are not reported at all.

use crate::utils::truncate_for_log;
use thiserror::Error;

/// Maximum number of payload bytes kept in an [`AdapterError::Upstream`] message.
const PAYLOAD_PREVIEW: usize = 500;

/// A failure that ends one adapter run.
///
/// The records accumulated before the failure are kept; see
/// [`crate::report::RunStatus::Aborted`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The server tried to send us elsewhere. Redirects are never followed.
    #[error("unexpected redirect from {url} to {location}")]
    Redirect { url: String, location: String },

    /// The body could not be decoded at all (not JSON, broken XML, ...).
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The API answered with an explicit error payload.
    #[error("upstream API reported an error: {payload}")]
    Upstream { payload: String },
}

impl AdapterError {
    pub fn upstream(payload: impl AsRef<str>) -> Self {
        AdapterError::Upstream {
            payload: truncate_for_log(payload.as_ref(), PAYLOAD_PREVIEW),
        }
    }

    pub fn decode(url: &str, reason: impl ToString) -> Self {
        AdapterError::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// `true` for failures of the transport itself, as opposed to content problems.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AdapterError::Network { .. } | AdapterError::Status { .. } | AdapterError::Redirect { .. }
        )
    }
}

/// Why a draft could not become a [`crate::models::ContestRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),

    #[error("missing start time")]
    MissingStart,

    #[error("no end_time, duration or duration_in_secs")]
    MissingLength,

    #[error("cannot resolve url `{url}`: {reason}")]
    BadUrl { url: String, reason: String },
}

/// Errors raised while loading the YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
