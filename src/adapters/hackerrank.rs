//! HackerRank contests from the public calendar RSS feed.
//!
//! ```xml
//! <rss version="2.0">
//!   <channel>
//!     <title>HackerRank Calendar</title>
//!     <item>
//!       <title>Week of Code 38</title>
//!       <url>https://www.hackerrank.com/contests/w38</url>
//!       <startTime>2024-05-13T16:00:00Z</startTime>
//!       <endTime>2024-05-20T16:00:00Z</endTime>
//!     </item>
//!   </channel>
//! </rss>
//! ```
//!
//! The feed has no stable id, so the contest URL is the key. It always
//! lists everything it knows, so `full_list` changes nothing here.

use super::Adapter;
use crate::accumulator::Accumulator;
use crate::context::{RunContext, SiteDefaults};
use crate::error::AdapterError;
use crate::fetch::Fetch;
use crate::normalize::ContestDraft;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

const FEED_URL: &str = "https://www.hackerrank.com/calendar/feed.rss";

pub struct HackerRank;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    title: Option<String>,
    url: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    description: Option<String>,
}

#[async_trait]
impl Adapter for HackerRank {
    fn name(&self) -> &'static str {
        "hackerrank"
    }

    fn defaults(&self) -> SiteDefaults {
        SiteDefaults {
            url: "https://www.hackerrank.com/contests",
            timezone: "UTC",
        }
    }

    #[instrument(level = "info", skip_all, fields(host = %ctx.host))]
    async fn collect(
        &self,
        ctx: &RunContext,
        fetch: &dyn Fetch,
        acc: &mut Accumulator,
    ) -> Result<(), AdapterError> {
        let xml = fetch.get_text(FEED_URL).await?;
        let feed: Rss = quick_xml::de::from_str(&xml).map_err(|e| AdapterError::decode(FEED_URL, e))?;

        let Some(channel) = feed.channel else {
            acc.warn(FEED_URL, "feed has no <channel>");
            return Ok(());
        };

        let listed = channel.items.len();
        let added = acc.extend_in(ctx, channel.items.into_iter().map(draft));
        info!(listed, added, "Collected HackerRank calendar");
        Ok(())
    }
}

fn draft(item: Item) -> ContestDraft {
    let url = item.url.or(item.link).or(item.guid);
    let mut draft = ContestDraft {
        title: item.title,
        key: url.clone(),
        url,
        ..ContestDraft::default()
    };
    if let Some(start) = item.start_time {
        draft = draft.start(start);
    }
    if let Some(end) = item.end_time {
        draft = draft.end(end);
    }
    if let Some(description) = item.description.filter(|d| !d.trim().is_empty()) {
        draft = draft.info("description", description.trim());
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextOptions;
    use crate::fetch::testing::StaticPages;
    use crate::report::RunStatus;
    use crate::runner::run;

    fn ctx() -> RunContext {
        RunContext::resolve(ContextOptions::default(), HackerRank.defaults())
    }

    fn item(title: &str, slug: &str, times: &str) -> String {
        format!(
            "<item><title>{title}</title><url>https://www.hackerrank.com/contests/{slug}</url>{times}</item>"
        )
    }

    fn feed(items: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0"><channel><title>HackerRank Calendar</title>
            <link>https://www.hackerrank.com/calendar</link>
            {}
            </channel></rss>"#,
            items.join("\n")
        )
    }

    const TIMES: &str = "<startTime>2024-05-13T16:00:00Z</startTime><endTime>2024-05-20T16:00:00Z</endTime>";

    #[tokio::test]
    async fn test_feed_items_become_records() {
        let body = feed(&[
            item("Week of Code 38", "w38", TIMES),
            item("Data &amp; Algorithms Cup", "dac", TIMES),
        ]);
        let pages = StaticPages::new().page(FEED_URL, body);
        let report = run(&HackerRank, &ctx(), &pages).await;

        assert!(report.is_complete());
        assert_eq!(report.records.len(), 2);
        let w38 = &report.records[0];
        assert_eq!(w38.key, "https://www.hackerrank.com/contests/w38");
        assert_eq!(w38.url, w38.key);
        assert_eq!(w38.start_time, Some("2024-05-13T16:00:00Z".into()));
        assert_eq!(w38.end_time, Some("2024-05-20T16:00:00Z".into()));
        assert_eq!(w38.host, "www.hackerrank.com");
        assert_eq!(report.records[1].title, "Data & Algorithms Cup");
    }

    #[tokio::test]
    async fn test_item_without_times_is_warned_and_skipped() {
        let body = feed(&[
            item("Week of Code 38", "w38", TIMES),
            item("Undated", "undated", ""),
        ]);
        let pages = StaticPages::new().page(FEED_URL, body);
        let report = run(&HackerRank, &ctx(), &pages).await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_duplicate_items_collapse() {
        let body = feed(&[item("W38", "w38", TIMES), item("W38 again", "w38", TIMES)]);
        let pages = StaticPages::new().page(FEED_URL, body);
        let report = run(&HackerRank, &ctx(), &pages).await;
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].title, "W38");
    }

    #[tokio::test]
    async fn test_missing_channel_is_one_warning() {
        let pages = StaticPages::new().page(FEED_URL, r#"<rss version="2.0"></rss>"#);
        let report = run(&HackerRank, &ctx(), &pages).await;
        assert!(report.records.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_broken_xml_aborts() {
        let pages = StaticPages::new().page(FEED_URL, "<rss><channel><item>");
        let report = run(&HackerRank, &ctx(), &pages).await;
        assert!(matches!(report.status, RunStatus::Aborted { .. }));
    }
}
