//! # Contest Harvest
//!
//! Runs contest-listing adapters and writes their reports.
//!
//! ## Usage
//!
//! ```sh
//! contest_harvest list
//! contest_harvest run codeforces --rid -1
//! contest_harvest --config harvest.yaml all -o ./reports
//! ```
//!
//! Logs go to stderr; stdout carries the `list` table and debug dumps.
//! The process exits non-zero when a run ends without a usable report.

use clap::Parser;
use contest_harvest::adapters::{self, Adapter};
use contest_harvest::config::Config;
use contest_harvest::context::{ContextOptions, DEBUG_RID, RunContext};
use contest_harvest::fetch::HttpFetcher;
use contest_harvest::outputs::{dump, json};
use contest_harvest::report::RunReport;
use contest_harvest::runner::{run_all, run_and_dump};
use contest_harvest::utils::ensure_writable_dir;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.config, ?args.command, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let result = match args.command {
        Command::List => {
            list();
            Ok(())
        }
        Command::Run { adapter, context, output } => {
            let fetcher = HttpFetcher::new(&config.http)?;
            run_one(&config, &fetcher, &adapter, context.into(), output.as_deref()).await
        }
        Command::All { output, parallel, full_list } => {
            let fetcher = HttpFetcher::new(&config.http)?;
            run_every(&config, &fetcher, output.as_deref(), parallel, full_list).await
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    result
}

fn list() {
    for adapter in adapters::registry() {
        let defaults = adapter.defaults();
        println!("{:<14} {:<40} {}", adapter.name(), defaults.url, defaults.timezone);
    }
}

async fn run_one(
    config: &Config,
    fetcher: &HttpFetcher,
    name: &str,
    overrides: ContextOptions,
    output: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let Some(adapter) = adapters::find(name) else {
        error!(adapter = %name, "Unknown adapter (see `list`)");
        return Err(format!("unknown adapter `{name}`").into());
    };

    // Early check: fail before fetching anything if the report cannot be written
    if let Some(dir) = output {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    let options = config.context_options(adapter.name()).overlay(overrides);
    let ctx = RunContext::resolve(options, adapter.defaults());
    info!(adapter = adapter.name(), url = %ctx.url, rid = ctx.rid, full_list = ctx.full_list, "Resolved run context");

    let mut stdout = std::io::stdout();
    let report = run_and_dump(adapter.as_ref(), &ctx, fetcher, &mut stdout).await;

    if let Some(dir) = output {
        if let Err(e) = json::write_report(&report, dir).await {
            error!(error = %e, "Failed to write JSON report");
            return Err(e);
        }
    }

    if report.is_usable() {
        Ok(())
    } else {
        Err(format!("{} produced no usable report", report.adapter).into())
    }
}

async fn run_every(
    config: &Config,
    fetcher: &HttpFetcher,
    output: Option<&str>,
    parallel: usize,
    full_list: bool,
) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = output {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    let adapters = adapters::registry();
    info!(count = adapters.len(), parallel, "Running all adapters");
    let reports = run_all(&adapters, fetcher, parallel, |adapter: &dyn Adapter| {
        let mut options = config.context_options(adapter.name());
        options.full_list |= full_list;
        options
    })
    .await;

    let mut stdout = std::io::stdout();
    for report in &reports {
        if report.rid == DEBUG_RID {
            if let Err(e) = dump::write_report(report, &mut stdout) {
                warn!(error = %e, "Failed to write debug dump");
            }
        }
        if let Some(dir) = output {
            if let Err(e) = json::write_report(report, dir).await {
                error!(adapter = %report.adapter, error = %e, "Failed to write JSON report");
            }
        }
    }

    summarize(&reports);

    let unusable: Vec<&str> = reports
        .iter()
        .filter(|r| !r.is_usable())
        .map(|r| r.adapter.as_str())
        .collect();
    if unusable.is_empty() {
        Ok(())
    } else {
        Err(format!("no usable report from: {}", unusable.join(", ")).into())
    }
}

fn summarize(reports: &[RunReport]) {
    let records: usize = reports.iter().map(|r| r.records.len()).sum();
    let warnings: usize = reports.iter().map(|r| r.warnings.len()).sum();
    let aborted = reports.iter().filter(|r| !r.is_complete()).count();
    info!(
        adapters = reports.len(),
        records,
        warnings,
        aborted,
        "Completed all adapter runs"
    );
}
