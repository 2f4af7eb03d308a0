//! Codeforces contests via the public JSON API.
//!
//! `GET /api/contest.list?gym=false` returns every contest ever held:
//!
//! ```json
//! {"status": "OK", "result": [{"id": 1966, "name": "Codeforces Round 941 (Div. 1)",
//!   "type": "CF", "phase": "BEFORE", "frozen": false, "durationSeconds": 7200,
//!   "startTimeSeconds": 1714487700}]}
//! ```
//!
//! A `"status": "FAILED"` payload aborts the run. Routine runs keep only
//! unfinished contests and those started within the last [`RECENT_DAYS`];
//! full-list runs keep everything and also walk the gym list.

use super::{Adapter, json_i64, json_str};
use crate::accumulator::Accumulator;
use crate::context::{RunContext, SiteDefaults};
use crate::error::AdapterError;
use crate::fetch::{Fetch, get_json};
use crate::normalize::ContestDraft;
use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use tracing::{info, instrument};

const API_URL: &str = "https://codeforces.com/api/contest.list";

/// How far back a routine run looks for finished contests.
pub const RECENT_DAYS: i64 = 30;

pub struct Codeforces;

#[async_trait]
impl Adapter for Codeforces {
    fn name(&self) -> &'static str {
        "codeforces"
    }

    fn defaults(&self) -> SiteDefaults {
        SiteDefaults {
            url: "https://codeforces.com/contests",
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
        collect_list(ctx, fetch, acc, false).await?;
        if ctx.full_list {
            collect_list(ctx, fetch, acc, true).await?;
        }
        Ok(())
    }
}

async fn collect_list(
    ctx: &RunContext,
    fetch: &dyn Fetch,
    acc: &mut Accumulator,
    gym: bool,
) -> Result<(), AdapterError> {
    let api_url = format!(
        "{API_URL}?gym={gym}&lang={}",
        urlencoding::encode(&ctx.language)
    );
    let payload = get_json(fetch, &api_url).await?;

    match payload.get("status").and_then(Value::as_str) {
        Some("OK") => {}
        Some(_) => return Err(AdapterError::upstream(payload.to_string())),
        None => {
            acc.warn(api_url, "response has no `status` field");
            return Ok(());
        }
    }
    let Some(contests) = payload.get("result").and_then(Value::as_array) else {
        acc.warn(api_url, "response has no `result` array");
        return Ok(());
    };

    let cutoff = ctx
        .today
        .and_hms_opt(0, 0, 0)
        .map(|midnight| (midnight - Duration::days(RECENT_DAYS)).and_utc().timestamp())
        .unwrap_or(i64::MIN);

    let section = if gym { "gym" } else { "contest" };
    let before = acc.len();
    for contest in contests {
        if !ctx.full_list && !is_recent(contest, cutoff) {
            continue;
        }
        acc.submit(draft(contest, section));
    }

    info!(
        listed = contests.len(),
        added = acc.len() - before,
        gym,
        "Collected Codeforces contests"
    );
    Ok(())
}

fn is_recent(contest: &Value, cutoff: i64) -> bool {
    let finished = contest.get("phase").and_then(Value::as_str) == Some("FINISHED");
    let start = json_i64(contest, "startTimeSeconds");
    !finished || start.is_some_and(|s| s >= cutoff)
}

fn draft(contest: &Value, section: &str) -> ContestDraft {
    let mut draft = ContestDraft {
        title: json_str(contest, "name"),
        key: json_str(contest, "id"),
        ..ContestDraft::default()
    };
    if let Some(id) = &draft.key {
        draft.url = Some(format!("/{section}/{id}"));
        draft.standings_url = Some(format!("/{section}/{id}/standings"));
    }
    if let Some(start) = json_i64(contest, "startTimeSeconds") {
        draft = draft.start(start);
    }
    if let Some(secs) = json_i64(contest, "durationSeconds") {
        draft = draft.duration_in_secs(secs);
    }
    if let Some(kind) = json_str(contest, "type") {
        draft = draft.kind(kind.clone()).standings_kind(kind.to_lowercase());
    }
    for field in ["phase", "frozen", "preparedBy", "difficulty"] {
        if let Some(value) = contest.get(field) {
            draft = draft.info(field, value.clone());
        }
    }
    draft
}
