//! JSON output for the ingesting driver.
//!
//! One file per adapter run: `{output_dir}/{adapter}.json`, holding the
//! serialized [`RunReport`] (records, warnings and status). A later run of
//! the same adapter replaces the file.

use crate::report::RunReport;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `report` to `{output_dir}/{adapter}.json`, creating the directory
/// if needed, and return the written path.
#[instrument(level = "info", skip_all, fields(%output_dir, adapter = %report.adapter))]
pub async fn write_report(report: &RunReport, output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = PathBuf::from(output_dir).join(format!("{}.json", report.adapter));
    fs::write(&path, json).await?;
    info!(path = %path.display(), records = report.records.len(), "Wrote JSON report");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RunStatus;

    #[tokio::test]
    async fn test_write_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("reports");
        let report = RunReport {
            adapter: "dmoj".into(),
            host: "dmoj.ca".into(),
            rid: 12,
            records: vec![],
            warnings: vec![],
            status: RunStatus::Complete,
        };

        let path = write_report(&report, output_dir.to_str().unwrap()).await.unwrap();
        assert_eq!(path, output_dir.join("dmoj.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        let back: RunReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }
}
