//! Plain-text dump of a run, used when `rid == -1`.
//!
//! Every accumulated record is printed, in encounter order, followed by the
//! warnings and the final status. Nothing is filtered.

use crate::models::ContestRecord;
use crate::report::{RunReport, RunStatus};
use itertools::Itertools;
use std::io::{self, Write};

pub fn write_report(report: &RunReport, out: &mut (dyn Write + Send)) -> io::Result<()> {
    let status = match &report.status {
        RunStatus::Complete => "complete".to_string(),
        RunStatus::Aborted { error } => format!("aborted: {error}"),
    };
    writeln!(
        out,
        "== {} ({}, rid {}): {} record(s), {} warning(s), {}",
        report.adapter,
        report.host,
        report.rid,
        report.records.len(),
        report.warnings.len(),
        status
    )?;

    for (i, record) in report.records.iter().enumerate() {
        write_record(i + 1, record, out)?;
    }
    for warning in &report.warnings {
        writeln!(out, "warning [{}]: {}", warning.scope, warning.message)?;
    }
    out.flush()
}

fn write_record(n: usize, r: &ContestRecord, out: &mut (dyn Write + Send)) -> io::Result<()> {
    writeln!(out, "[{n}] {}  ({}/{})", r.title, r.host, r.key)?;
    writeln!(out, "    url:       {}", r.url)?;

    let times = [
        r.start_time.as_ref().map(|t| format!("start {t}")),
        r.end_time.as_ref().map(|t| format!("end {t}")),
        r.duration.as_ref().map(|d| format!("duration {d}")),
        r.duration_in_secs.map(|s| format!("secs {s}")),
    ]
    .into_iter()
    .flatten()
    .join(", ");
    writeln!(out, "    time:      {} [{}]", if times.is_empty() { "-" } else { times.as_str() }, r.timezone)?;
    if r.duration_in_secs.is_none() {
        if let Some(secs) = r.length_secs() {
            writeln!(out, "    length:    {secs}s")?;
        }
    }

    if let Some(url) = &r.standings_url {
        writeln!(out, "    standings: {url}")?;
    }
    if let Some(url) = &r.registration_url {
        writeln!(out, "    register:  {url}")?;
    }
    let kinds = [r.kind.as_deref(), r.standings_kind.as_deref()]
        .into_iter()
        .flatten()
        .unique()
        .join("/");
    if !kinds.is_empty() {
        writeln!(out, "    kind:      {kinds}")?;
    }
    let flags = [
        (r.invisible, "invisible"),
        (r.skip_update_key, "skip_update_key"),
        (r.skip_check_time, "skip_check_time"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .join(" ");
    if !flags.is_empty() {
        writeln!(out, "    flags:     {flags}")?;
    }
    if !r.info.is_empty() {
        writeln!(out, "    info:      {}", serde_json::Value::Object(r.info.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Warning;
    use serde_json::json;

    fn report() -> RunReport {
        let records = vec![
            serde_json::from_value(json!({
                "title": "AtCoder Beginner Contest 353", "url": "https://atcoder.jp/contests/abc353",
                "start_time": "2024-05-11 21:00:00+0900", "duration": "01:40",
                "key": "abc353", "host": "atcoder.jp", "rid": -1, "timezone": "Asia/Tokyo",
                "standings_url": "https://atcoder.jp/contests/abc353/standings",
                "kind": "atcoder", "info": {"rated": " - 1999"}
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "title": "Codeforces Round 941", "url": "https://codeforces.com/contest/1966",
                "start_time": 1714487700, "duration_in_secs": 7200, "invisible": true,
                "key": "1966", "host": "codeforces.com", "rid": -1, "timezone": "UTC"
            }))
            .unwrap(),
        ];
        RunReport {
            adapter: "mixed".into(),
            host: "example.com".into(),
            rid: -1,
            records,
            warnings: vec![Warning {
                scope: "record abc999".into(),
                message: "missing start time".into(),
            }],
            status: RunStatus::Complete,
        }
    }

    #[test]
    fn test_dump_lists_every_record_and_warning() {
        let mut out: Vec<u8> = Vec::new();
        write_report(&report(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("== mixed (example.com, rid -1): 2 record(s), 1 warning(s), complete"));
        assert!(text.contains("[1] AtCoder Beginner Contest 353  (atcoder.jp/abc353)"));
        assert!(text.contains("start 2024-05-11 21:00:00+0900, duration 01:40 [Asia/Tokyo]"));
        assert!(text.contains("length:    6000s"));
        assert!(text.contains("[2] Codeforces Round 941  (codeforces.com/1966)"));
        assert!(text.contains("start @1714487700, secs 7200 [UTC]"));
        assert!(text.contains("flags:     invisible"));
        assert!(text.contains(r#"info:      {"rated":" - 1999"}"#));
        assert!(text.contains("warning [record abc999]: missing start time"));
    }

    #[test]
    fn test_dump_of_empty_aborted_run() {
        let mut r = report();
        r.records.clear();
        r.warnings.clear();
        r.status = RunStatus::Aborted { error: "unexpected status 503".into() };
        let mut out: Vec<u8> = Vec::new();
        write_report(&r, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "== mixed (example.com, rid -1): 0 record(s), 0 warning(s), aborted: unexpected status 503\n"
        );
    }
}
