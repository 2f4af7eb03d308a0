//! DMOJ contests via the paginated v2 API.
//!
//! ```json
//! {"api_version": "2.0", "method": "get", "fetched": "...",
//!  "data": {"current_object_count": 2, "objects_per_page": 1000, "page_index": 1,
//!           "has_more": false, "objects": [{"key": "dmopc23c1", "name": "...",
//!           "start_time": "2023-11-03T23:00:00+00:00", "end_time": "...",
//!           "time_limit": 10800.0, "is_rated": true, "rate_all": false, "tags": []}]}}
//! ```
//!
//! Failures come back as `{"error": {"code": 404, "message": "..."}}` and abort
//! the run. The API lives on the context host, so DMOJ mirrors work too.

use super::{Adapter, json_str};
use crate::accumulator::Accumulator;
use crate::context::{RunContext, SiteDefaults};
use crate::error::AdapterError;
use crate::fetch::{Fetch, get_json};
use crate::normalize::ContestDraft;
use crate::pagination::Pagination;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

pub struct Dmoj;

#[async_trait]
impl Adapter for Dmoj {
    fn name(&self) -> &'static str {
        "dmoj"
    }

    fn defaults(&self) -> SiteDefaults {
        SiteDefaults {
            url: "https://dmoj.ca/contests/",
            timezone: "UTC",
        }
    }

    #[instrument(level = "info", skip_all, fields(host = %ctx.host, full_list = ctx.full_list))]
    async fn collect(
        &self,
        ctx: &RunContext,
        fetch: &dyn Fetch,
        acc: &mut Accumulator,
    ) -> Result<(), AdapterError> {
        let mut pages = Pagination::new(ctx.full_list, 1);
        while let Some(page) = pages.next_page() {
            let api_url = format!("https://{}/api/v2/contests?page={page}", ctx.host);
            let payload = get_json(fetch, &api_url).await?;
            if payload.get("error").is_some() {
                return Err(AdapterError::upstream(payload.to_string()));
            }

            let data = payload.get("data");
            let Some(objects) = data.and_then(|d| d.get("objects")).and_then(Value::as_array) else {
                acc.warn(format!("page {page}"), "response has no `data.objects` array");
                break;
            };

            let added = acc.extend_in(ctx, objects.iter().map(draft));
            info!(page, listed = objects.len(), added, "Collected DMOJ contests");
            pages.record(added);

            let has_more = data
                .and_then(|d| d.get("has_more"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if !has_more {
                pages.finish();
            }
        }
        Ok(())
    }
}

fn draft(contest: &Value) -> ContestDraft {
    let key = json_str(contest, "key");
    let mut draft = ContestDraft {
        title: json_str(contest, "name"),
        url: key.as_ref().map(|k| format!("/contest/{k}")),
        standings_url: key.as_ref().map(|k| format!("/contest/{k}/ranking/")),
        key,
        ..ContestDraft::default()
    };
    if let Some(start) = json_str(contest, "start_time") {
        draft = draft.start(start);
    }
    if let Some(end) = json_str(contest, "end_time") {
        draft = draft.end(end);
    }
    if let Some(limit) = contest.get("time_limit").and_then(Value::as_f64) {
        // windowed contest: each participant gets `time_limit` seconds
        draft = draft.info("time_limit", limit);
    }
    for field in ["is_rated", "rate_all", "tags"] {
        if let Some(value) = contest.get(field) {
            draft = draft.info(field, value.clone());
        }
    }
    draft
}
