//! Running adapters and turning their outcome into a [`RunReport`].
//!
//! Each run gets its own [`Accumulator`]; nothing mutable is shared between
//! runs, so several adapters may run concurrently over one fetcher.

use crate::accumulator::Accumulator;
use crate::adapters::Adapter;
use crate::context::{ContextOptions, RunContext};
use crate::fetch::Fetch;
use crate::outputs::dump;
use crate::report::{RunReport, RunStatus};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Run `adapter` once against `ctx`.
///
/// Never fails: an adapter error ends the run with
/// [`RunStatus::Aborted`] while keeping the records gathered so far.
///
/// # Arguments
///
/// * `adapter` - The site adapter to run
/// * `ctx` - Resolved context of this run
/// * `fetch` - Page source, shared with other runs
///
/// # Returns
///
/// A [`RunReport`] with the records in encounter order, one warning per
/// rejected record or unusable page, and the final status.
#[instrument(level = "info", skip_all, fields(adapter = adapter.name(), host = %ctx.host, rid = ctx.rid))]
pub async fn run(adapter: &dyn Adapter, ctx: &RunContext, fetch: &dyn Fetch) -> RunReport {
    let t0 = Instant::now();
    let mut acc = Accumulator::new(ctx);

    let status = match adapter.collect(ctx, fetch, &mut acc).await {
        Ok(()) => RunStatus::Complete,
        Err(e) => {
            error!(error = %e, transient = e.is_transient(), kept = acc.len(), "Adapter run aborted");
            RunStatus::aborted(&e)
        }
    };

    let (records, warnings) = acc.into_parts();
    info!(
        records = records.len(),
        warnings = warnings.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Adapter run finished"
    );

    RunReport {
        adapter: adapter.name().to_string(),
        host: ctx.host.clone(),
        rid: ctx.rid,
        records,
        warnings,
        status,
    }
}

/// Like [`run`], and for debug runs (`rid == -1`) also write the
/// human-readable dump of the report to `out`.
///
/// # Arguments
///
/// * `out` - Dump destination, usually stdout; untouched for non-debug runs
///
/// # Returns
///
/// The same report [`run`] returns. A failed dump write is logged, not
/// returned.
pub async fn run_and_dump(
    adapter: &dyn Adapter,
    ctx: &RunContext,
    fetch: &dyn Fetch,
    out: &mut (dyn Write + Send),
) -> RunReport {
    let report = run(adapter, ctx, fetch).await;
    if ctx.is_debug() {
        if let Err(e) = dump::write_report(&report, out) {
            warn!(error = %e, "Failed to write debug dump");
        }
    }
    report
}

/// Run several adapters concurrently, `parallel` at a time.
///
/// Each run gets its own context and accumulator; only `fetch` is shared.
///
/// # Arguments
///
/// * `adapters` - Adapters to run
/// * `fetch` - Page source shared by all runs
/// * `parallel` - Maximum number of runs in flight (at least 1)
/// * `options_for` - Context options for each adapter, resolved against its
///   [`Adapter::defaults`]
///
/// # Returns
///
/// One report per adapter, in completion order.
pub async fn run_all<F>(
    adapters: &[Box<dyn Adapter>],
    fetch: &dyn Fetch,
    parallel: usize,
    options_for: F,
) -> Vec<RunReport>
where
    F: Fn(&dyn Adapter) -> ContextOptions,
{
    let jobs: Vec<(&dyn Adapter, RunContext)> = adapters
        .iter()
        .map(|adapter| {
            let adapter = adapter.as_ref();
            let ctx = RunContext::resolve(options_for(adapter), adapter.defaults());
            (adapter, ctx)
        })
        .collect();

    stream::iter(jobs)
        .map(|(adapter, ctx)| async move { run(adapter, &ctx, fetch).await })
        .buffer_unordered(parallel.max(1))
        .collect()
        .await
}
