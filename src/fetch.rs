//! HTTP access for adapters.
//!
//! Adapters never talk to `reqwest` directly. They receive a `&dyn Fetch`,
//! which lets tests replay frozen pages and lets the driver share one
//! connection pool between concurrent runs.
//!
//! # Failure policy
//!
//! - No automatic retry: a failed request aborts the adapter run
//! - Redirects are not followed and surface as [`AdapterError::Redirect`]
//! - Any non-2xx status surfaces as [`AdapterError::Status`]
//! - Timeouts come from the client configuration

use crate::config::HttpConfig;
use crate::error::AdapterError;
use crate::utils::looks_truncated;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Source of page bodies.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and return the body as text.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the page
    ///
    /// # Errors
    ///
    /// [`AdapterError`] when the request fails, is redirected or returns a
    /// non-2xx status. Each of these ends the run.
    async fn get_text(&self, url: &str) -> Result<String, AdapterError>;
}

/// GET `url` and decode the body as JSON.
///
/// Bodies that are not JSON at all become [`AdapterError::Decode`]; checking
/// the shape of the decoded value is the adapter's job.
///
/// # Arguments
///
/// * `fetch` - The page source of the current run
/// * `url` - Absolute URL of the API endpoint
///
/// # Returns
///
/// The decoded JSON value.
///
/// # Errors
///
/// Any [`Fetch::get_text`] error as is, or [`AdapterError::Decode`] when the
/// body is not valid JSON (with a `truncated body` reason for a cut-off one).
pub async fn get_json(fetch: &dyn Fetch, url: &str) -> Result<Value, AdapterError> {
    let body = fetch.get_text(url).await?;
    serde_json::from_str(&body).map_err(|e| {
        if looks_truncated(&e) {
            AdapterError::decode(url, format!("truncated body: {e}"))
        } else {
            AdapterError::decode(url, e)
        }
    })
}

/// [`Fetch`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build the shared client.
    ///
    /// # Arguments
    ///
    /// * `config` - Timeout and User-Agent from the `http` config section
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error when the TLS backend cannot be initialized.
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn get_text(&self, url: &str) -> Result<String, AdapterError> {
        let t0 = Instant::now();
        let network = |e: reqwest::Error| AdapterError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Err(AdapterError::Redirect {
                url: url.to_string(),
                location,
            });
        }
        if !status.is_success() {
            return Err(AdapterError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StaticPages;
    use super::*;

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let pages = StaticPages::new().page("https://x.test/a", r#"{"ok": true}"#);
        let value = get_json(&pages, "https://x.test/a").await.unwrap();
        assert_eq!(value["ok"], Value::Bool(true));
        assert_eq!(pages.requests(), vec!["https://x.test/a".to_string()]);
    }

    #[tokio::test]
    async fn test_get_json_reports_truncation() {
        let pages = StaticPages::new().page("https://x.test/a", r#"{"ok": tr"#);
        match get_json(&pages, "https://x.test/a").await {
            Err(AdapterError::Decode { reason, .. }) => assert!(reason.starts_with("truncated body")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_page_is_status_error() {
        let pages = StaticPages::new();
        let err = pages.get_text("https://x.test/missing").await.unwrap_err();
        assert_eq!(
            err,
            AdapterError::Status {
                url: "https://x.test/missing".into(),
                status: 404
            }
        );
    }

    #[test]
    fn test_http_fetcher_builds_from_config() {
        assert!(HttpFetcher::new(&HttpConfig::default()).is_ok());
    }
}
