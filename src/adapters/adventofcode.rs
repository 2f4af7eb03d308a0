//! Advent of Code puzzles, one record per unlocked day.
//!
//! Each event's calendar page (`/{year}`) links the days unlocked so far:
//!
//! ```html
//! <a aria-label="Day 1, two stars" href="/2023/day/1" class="calendar-day1 calendar-verycomplete">...</a>
//! ```
//!
//! Puzzles unlock at midnight US Eastern and stay open for a day. Routine
//! runs read the latest event only: the current year in December, the
//! previous year otherwise. Full-list runs walk back to [`FIRST_YEAR`].

use super::Adapter;
use crate::accumulator::Accumulator;
use crate::context::{RunContext, SiteDefaults};
use crate::error::AdapterError;
use crate::fetch::Fetch;
use crate::models::DurationValue;
use crate::normalize::ContestDraft;
use crate::pagination::Pagination;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

pub const FIRST_YEAR: i64 = 2015;

static DAY_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="/(\d{4})/day/(\d{1,2})""#).unwrap());

pub struct AdventOfCode;

#[async_trait]
impl Adapter for AdventOfCode {
    fn name(&self) -> &'static str {
        "adventofcode"
    }

    fn defaults(&self) -> SiteDefaults {
        SiteDefaults {
            url: "https://adventofcode.com/",
            timezone: "America/New_York",
        }
    }

    #[instrument(level = "info", skip_all, fields(host = %ctx.host, full_list = ctx.full_list))]
    async fn collect(
        &self,
        ctx: &RunContext,
        fetch: &dyn Fetch,
        acc: &mut Accumulator,
    ) -> Result<(), AdapterError> {
        let mut years = Pagination::with_step(ctx.full_list, latest_event(ctx.today), -1);
        while let Some(year) = years.next_page() {
            if year < FIRST_YEAR {
                break;
            }
            let calendar_url = format!("https://{}/{year}", ctx.host);
            let html = fetch.get_text(&calendar_url).await?;

            let days = unlocked_days(&html, year);
            if days.is_empty() {
                acc.warn(format!("year {year}"), "calendar page links no puzzle days");
            }
            let added = acc.extend_in(&ctx.with_url(calendar_url), days.into_iter().map(|d| draft(year, d)));
            info!(year, added, "Collected Advent of Code calendar");

            years.record(added);
            if year == FIRST_YEAR {
                years.finish();
            }
        }
        Ok(())
    }
}

/// Year of the most recent event on `today`.
fn latest_event(today: NaiveDate) -> i64 {
    let year = i64::from(today.year());
    if today.month() == 12 { year } else { year - 1 }
}

/// Day numbers linked from `year`'s calendar, in page order.
fn unlocked_days(html: &str, year: i64) -> Vec<u32> {
    DAY_LINK
        .captures_iter(html)
        .filter(|c| c[1].parse::<i64>().ok() == Some(year))
        .filter_map(|c| c[2].parse::<u32>().ok())
        .filter(|d| (1..=25).contains(d))
        .unique()
        .collect()
}

fn draft(year: i64, day: u32) -> ContestDraft {
    ContestDraft::new()
        .title(format!("Advent of Code {year} Day {day}"))
        .key(format!("{year}/day/{day}"))
        .url(format!("/{year}/day/{day}"))
        .standings_url(format!("/{year}/leaderboard/day/{day}"))
        .start(format!("{year}-12-{day:02}T00:00:00"))
        .duration(DurationValue::Text("24:00".into()))
        .kind("puzzle")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextOptions;
    use crate::fetch::testing::StaticPages;
    use crate::runner::run;

    fn ctx(full_list: bool, today: NaiveDate) -> RunContext {
        RunContext::resolve(
            ContextOptions {
                full_list,
                today: Some(today),
                ..Default::default()
            },
            AdventOfCode.defaults(),
        )
    }

    fn calendar(year: i64, days: u32) -> String {
        let links: String = (1..=days)
            .rev()
            .map(|d| {
                format!(
                    r#"<a aria-label="Day {d}" href="/{year}/day/{d}" class="calendar-day{d}">Day {d}</a>"#
                )
            })
            .collect();
        format!(r#"<html><body><a href="/{year}/about">About</a><pre class="calendar">{links}</pre></body></html>"#)
    }

    #[test]
    fn test_latest_event() {
        assert_eq!(latest_event(NaiveDate::from_ymd_opt(2024, 12, 2).unwrap()), 2024);
        assert_eq!(latest_event(NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()), 2023);
        assert_eq!(latest_event(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()), 2024);
    }

    #[test]
    fn test_unlocked_days_dedups_and_filters_other_years() {
        let html = r#"<a href="/2023/day/2">2</a><a href="/2023/day/1">1</a>
                      <a href="/2023/day/2">again</a><a href="/2022/day/9">old</a>"#;
        assert_eq!(unlocked_days(html, 2023), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_december_run_reads_current_event() {
        let pages = StaticPages::new().page("https://adventofcode.com/2024", calendar(2024, 3));
        let report = run(&AdventOfCode, &ctx(false, NaiveDate::from_ymd_opt(2024, 12, 3).unwrap()), &pages).await;

        assert!(report.is_complete());
        assert_eq!(report.records.len(), 3);
        let day1 = report.records.iter().find(|r| r.key == "2024/day/1").unwrap();
        assert_eq!(day1.title, "Advent of Code 2024 Day 1");
        assert_eq!(day1.url, "https://adventofcode.com/2024/day/1");
        assert_eq!(
            day1.standings_url.as_deref(),
            Some("https://adventofcode.com/2024/leaderboard/day/1")
        );
        assert_eq!(day1.start_time, Some("2024-12-01T00:00:00".into()));
        assert_eq!(day1.duration, Some(DurationValue::Text("24:00".into())));
        assert_eq!(day1.timezone, "America/New_York");
        assert_eq!(pages.requests(), vec!["https://adventofcode.com/2024".to_string()]);
    }

    #[tokio::test]
    async fn test_full_list_walks_back_to_first_year() {
        let today = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
        let pages = StaticPages::new()
            .page("https://adventofcode.com/2016", calendar(2016, 25))
            .page("https://adventofcode.com/2015", calendar(2015, 25));

        let report = run(&AdventOfCode, &ctx(true, today), &pages).await;

        assert!(report.is_complete());
        assert_eq!(report.records.len(), 50);
        assert_eq!(
            pages.requests(),
            vec![
                "https://adventofcode.com/2016".to_string(),
                "https://adventofcode.com/2015".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_calendar_warns_and_stops() {
        let today = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
        let pages = StaticPages::new().page("https://adventofcode.com/2016", "<html></html>");
        let report = run(&AdventOfCode, &ctx(true, today), &pages).await;

        assert!(report.records.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].scope, "year 2016");
        assert_eq!(pages.requests().len(), 1);
    }
}
