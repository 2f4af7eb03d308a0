//! CodeChef contests via the contest-list JSON API.
//!
//! The `all` endpoint answers with three arrays:
//!
//! ```json
//! {"status": "success", "present_contests": [...], "future_contests": [...], "past_contests": [...]}
//! ```
//!
//! Each entry carries `contest_code`, `contest_name`,
//! `contest_start_date_iso`, `contest_end_date_iso` and `contest_duration`
//! (minutes, as a string). Full-list runs then page through the `past`
//! endpoint, [`PAST_PAGE_SIZE`] contests at a time.

use super::{Adapter, json_i64, json_str};
use crate::accumulator::Accumulator;
use crate::context::{RunContext, SiteDefaults};
use crate::error::AdapterError;
use crate::fetch::{Fetch, get_json};
use crate::models::DurationValue;
use crate::normalize::ContestDraft;
use crate::pagination::Pagination;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

const API_BASE: &str = "https://www.codechef.com/api/list/contests";
const SECTIONS: [&str; 3] = ["present_contests", "future_contests", "past_contests"];
pub const PAST_PAGE_SIZE: i64 = 20;

pub struct CodeChef;

#[async_trait]
impl Adapter for CodeChef {
    fn name(&self) -> &'static str {
        "codechef"
    }

    fn defaults(&self) -> SiteDefaults {
        SiteDefaults {
            url: "https://www.codechef.com/contests",
            timezone: "Asia/Kolkata",
        }
    }

    #[instrument(level = "info", skip_all, fields(host = %ctx.host, full_list = ctx.full_list))]
    async fn collect(
        &self,
        ctx: &RunContext,
        fetch: &dyn Fetch,
        acc: &mut Accumulator,
    ) -> Result<(), AdapterError> {
        let all_url = format!("{API_BASE}/all?sort_by=START&sorting_order=asc&offset=0&mode=all");
        let payload = get_json(fetch, &all_url).await?;
        check_status(&payload)?;

        let mut found = false;
        for section in SECTIONS {
            if let Some(contests) = payload.get(section).and_then(Value::as_array) {
                found = true;
                let added = acc.extend_in(ctx, contests.iter().map(draft));
                info!(section, listed = contests.len(), added, "Collected CodeChef contests");
            }
        }
        if !found {
            acc.warn(all_url, "response has none of the contest arrays");
            return Ok(());
        }

        if !ctx.full_list {
            return Ok(());
        }

        let mut pages = Pagination::with_step(true, 0, PAST_PAGE_SIZE);
        while let Some(offset) = pages.next_page() {
            let past_url = format!(
                "{API_BASE}/past?sort_by=START&sorting_order=desc&offset={offset}&count={PAST_PAGE_SIZE}&mode=all"
            );
            let payload = get_json(fetch, &past_url).await?;
            check_status(&payload)?;

            let Some(contests) = payload.get("contests").and_then(Value::as_array) else {
                acc.warn(past_url, "response has no `contests` array");
                break;
            };
            let added = acc.extend_in(ctx, contests.iter().map(draft));
            pages.record(added);

            let total = json_i64(&payload, "count").unwrap_or(i64::MAX);
            if contests.is_empty() || offset + PAST_PAGE_SIZE >= total {
                pages.finish();
            }
        }
        Ok(())
    }
}

fn check_status(payload: &Value) -> Result<(), AdapterError> {
    match payload.get("status").and_then(Value::as_str) {
        Some("error") | Some("failure") => Err(AdapterError::upstream(payload.to_string())),
        _ => Ok(()),
    }
}

fn draft(contest: &Value) -> ContestDraft {
    let code = json_str(contest, "contest_code");
    let mut draft = ContestDraft {
        title: json_str(contest, "contest_name"),
        url: code.as_ref().map(|c| format!("/{c}")),
        standings_url: code.as_ref().map(|c| format!("/rankings/{c}")),
        key: code,
        ..ContestDraft::default()
    };
    if let Some(start) = json_str(contest, "contest_start_date_iso") {
        draft = draft.start(start);
    }
    if let Some(end) = json_str(contest, "contest_end_date_iso") {
        draft = draft.end(end);
    }
    if let Some(minutes) = json_i64(contest, "contest_duration") {
        draft = draft.duration(DurationValue::Minutes(minutes));
    }
    if let Some(users) = contest.get("distinct_users") {
        draft = draft.info("distinct_users", users.clone());
    }
    draft
}
