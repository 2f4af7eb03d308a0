//! AtCoder contests scraped from the HTML contest tables.
//!
//! The front page (`/contests/`) has one table each for running, upcoming
//! and recent contests. Full-list runs then page through
//! `/contests/archive?page=N` until a page adds nothing new.
//!
//! Each row looks like:
//!
//! ```html
//! <tr>
//!   <td><a href="http://www.timeanddate.com/..."><time class="fixtime fixtime-full">2024-05-11 21:00:00+0900</time></a></td>
//!   <td><span title="Algorithm">Ⓐ</span> <a href="/contests/abc353">AtCoder Beginner Contest 353</a></td>
//!   <td class="text-center">01:40</td>
//!   <td class="text-center"> - 1999</td>
//! </tr>
//! ```

use super::Adapter;
use crate::accumulator::Accumulator;
use crate::context::{RunContext, SiteDefaults};
use crate::error::AdapterError;
use crate::fetch::Fetch;
use crate::models::DurationValue;
use crate::normalize::ContestDraft;
use crate::pagination::Pagination;
use crate::utils::collapse_whitespace;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, instrument};
use url::Url;

const ARCHIVE_PATH: &str = "/contests/archive";

static FRONT_TABLES: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    ["action", "upcoming", "recent"]
        .into_iter()
        .map(|name| {
            let css = format!("#contest-table-{name} table");
            (name, Selector::parse(&css).unwrap())
        })
        .collect()
});
static ARCHIVE_TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".table-responsive table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());
static CONTEST_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href*='/contests/']").unwrap());

pub struct AtCoder;

#[async_trait]
impl Adapter for AtCoder {
    fn name(&self) -> &'static str {
        "atcoder"
    }

    fn defaults(&self) -> SiteDefaults {
        SiteDefaults {
            url: "https://atcoder.jp/contests/",
            timezone: "Asia/Tokyo",
        }
    }

    #[instrument(level = "info", skip_all, fields(host = %ctx.host, full_list = ctx.full_list))]
    async fn collect(
        &self,
        ctx: &RunContext,
        fetch: &dyn Fetch,
        acc: &mut Accumulator,
    ) -> Result<(), AdapterError> {
        let front_url = with_query(&ctx.url, &[("lang", ctx.language.as_str())]);
        let html = fetch.get_text(&front_url).await?;
        for (name, rows) in parse_front(&html) {
            let added = acc.extend_in(ctx, rows);
            info!(table = name, added, "Parsed AtCoder contest table");
        }

        if !ctx.full_list {
            return Ok(());
        }

        let archive = archive_url(&ctx.url);
        let mut pages = Pagination::new(true, 1);
        while let Some(page) = pages.next_page() {
            let page_url = with_query(
                &archive,
                &[("lang", ctx.language.as_str()), ("page", page.to_string().as_str())],
            );
            let html = fetch.get_text(&page_url).await?;
            let Some(rows) = parse_table(&html, &ARCHIVE_TABLE) else {
                acc.warn(format!("page {page}"), "archive page has no contest table");
                break;
            };
            let added = acc.extend_in(&ctx.with_url(page_url), rows);
            info!(page, added, "Parsed AtCoder archive page");
            pages.record(added);
        }
        Ok(())
    }
}

/// Archive listing on the same origin as `base`.
fn archive_url(base: &str) -> String {
    match Url::parse(base) {
        Ok(mut url) => {
            url.set_path(ARCHIVE_PATH);
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => base.to_string(),
    }
}

/// Set each query pair on `base`, replacing any value it already has.
fn with_query(base: &str, pairs: &[(&str, &str)]) -> String {
    match Url::parse(base) {
        Ok(mut url) => {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(k, _)| !pairs.iter().any(|(name, _)| k == name))
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            url.query_pairs_mut().clear().extend_pairs(kept).extend_pairs(pairs);
            url.to_string()
        }
        Err(_) => base.to_string(),
    }
}

/// Rows of every front-page table that is present.
fn parse_front(html: &str) -> Vec<(&'static str, Vec<ContestDraft>)> {
    let document = Html::parse_document(html);
    FRONT_TABLES
        .iter()
        .filter_map(|(name, selector)| {
            let table = document.select(selector).next()?;
            Some((*name, table.select(&ROW).map(parse_row).collect()))
        })
        .collect()
}

/// Rows of the first table matching `selector`, or `None` if there is none.
fn parse_table(html: &str, selector: &Selector) -> Option<Vec<ContestDraft>> {
    let document = Html::parse_document(html);
    let table = document.select(selector).next()?;
    Some(table.select(&ROW).map(parse_row).collect())
}

fn parse_row(row: ElementRef<'_>) -> ContestDraft {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    let text = |el: &ElementRef<'_>| collapse_whitespace(&el.text().collect::<String>());

    let mut draft = ContestDraft::new();
    if let Some(time) = cells.first().and_then(|c| c.select(&TIME).next()) {
        draft = draft.start(text(&time));
    }
    if let Some(link) = cells.get(1).and_then(|c| c.select(&CONTEST_LINK).next()) {
        draft.title = Some(text(&link));
        if let Some(href) = link.value().attr("href") {
            let slug = href.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
            draft.key = Some(slug.to_string());
            draft.url = Some(href.to_string());
            draft.standings_url = Some(format!("{}/standings", href.trim_end_matches('/')));
        }
    }
    if let Some(cell) = cells.get(2) {
        draft = draft.duration(DurationValue::Text(text(cell)));
    }
    if let Some(cell) = cells.get(3) {
        draft = draft.info("rated", text(cell));
    }
    draft.kind("atcoder")
}
