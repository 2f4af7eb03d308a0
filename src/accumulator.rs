//! Append-only record collection owned by one adapter run.
//!
//! The accumulator normalizes each submitted draft, drops later duplicates
//! of an already seen key, and collects warnings for drafts or pages that
//! could not be used. Nothing is ever removed or modified once appended.

use crate::context::RunContext;
use crate::models::ContestRecord;
use crate::normalize::{ContestDraft, normalize};
use crate::report::Warning;
use std::collections::HashSet;
use tracing::{debug, warn};

/// What happened to a submitted draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Added,
    /// Key already emitted earlier in this run; silently dropped.
    Duplicate,
    /// Normalization failed; one warning was recorded.
    Rejected,
}

#[derive(Debug)]
pub struct Accumulator {
    ctx: RunContext,
    records: Vec<ContestRecord>,
    seen: HashSet<String>,
    warnings: Vec<Warning>,
}

impl Accumulator {
    pub fn new(ctx: &RunContext) -> Self {
        Accumulator {
            ctx: ctx.clone(),
            records: Vec::new(),
            seen: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Normalize `draft` against the run's own context and append it.
    pub fn submit(&mut self, draft: ContestDraft) -> Submitted {
        let ctx = self.ctx.clone();
        self.submit_in(&ctx, draft)
    }

    /// Normalize `draft` against a derived context (another page, year or
    /// sub-host of the same run) and append it.
    pub fn submit_in(&mut self, ctx: &RunContext, draft: ContestDraft) -> Submitted {
        let hint = draft
            .key
            .clone()
            .or_else(|| draft.title.clone())
            .unwrap_or_else(|| "<unnamed>".to_string());

        let record = match normalize(ctx, draft) {
            Ok(record) => record,
            Err(e) => {
                self.warn(format!("record {hint}"), e.to_string());
                return Submitted::Rejected;
            }
        };

        if !self.seen.insert(record.key.clone()) {
            debug!(key = %record.key, "Dropping duplicate key");
            return Submitted::Duplicate;
        }
        self.records.push(record);
        Submitted::Added
    }

    /// Submit several drafts, returning how many were newly added.
    pub fn extend_in<I>(&mut self, ctx: &RunContext, drafts: I) -> usize
    where
        I: IntoIterator<Item = ContestDraft>,
    {
        drafts
            .into_iter()
            .map(|draft| self.submit_in(ctx, draft))
            .filter(|s| *s == Submitted::Added)
            .count()
    }

    /// Record a non-fatal diagnostic for a page or record.
    pub fn warn(&mut self, scope: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            scope: scope.into(),
            message: message.into(),
        };
        warn!(host = %self.ctx.host, scope = %warning.scope, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ContestRecord] {
        &self.records
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn into_parts(self) -> (Vec<ContestRecord>, Vec<Warning>) {
        (self.records, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextOptions, SiteDefaults};

    fn ctx() -> RunContext {
        RunContext::resolve(
            ContextOptions::default(),
            SiteDefaults {
                url: "https://example.com/",
                timezone: "UTC",
            },
        )
    }

    fn draft(key: &str, title: &str) -> ContestDraft {
        ContestDraft::new()
            .key(key)
            .title(title)
            .url(format!("/c/{key}"))
            .start(1_700_000_000)
            .duration_in_secs(3600)
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut acc = Accumulator::new(&ctx());
        assert_eq!(acc.submit(draft("a", "First")), Submitted::Added);
        assert_eq!(acc.submit(draft("b", "Second")), Submitted::Added);
        assert_eq!(acc.submit(draft("a", "Edited title")), Submitted::Duplicate);

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.records()[0].title, "First");
        assert!(acc.warnings().is_empty());
    }

    #[test]
    fn test_rejected_draft_adds_one_warning() {
        let mut acc = Accumulator::new(&ctx());
        let broken = ContestDraft::new().key("x").title("No times").url("/c/x");
        assert_eq!(acc.submit(broken), Submitted::Rejected);
        assert!(acc.is_empty());
        assert_eq!(acc.warnings().len(), 1);
        assert_eq!(acc.warnings()[0].scope, "record x");
    }

    #[test]
    fn test_submit_in_uses_derived_context() {
        let base = ctx();
        let mut acc = Accumulator::new(&base);
        let yearly = base.with_host("2024.example.com");
        acc.submit_in(&yearly, draft("y", "Yearly"));
        assert_eq!(acc.records()[0].host, "2024.example.com");
        assert_eq!(acc.context().host, "example.com");
    }

    #[test]
    fn test_blank_host_or_timezone_is_one_warning_each() {
        let base = ctx();
        let mut acc = Accumulator::new(&base);
        assert_eq!(acc.submit_in(&base.with_host(""), draft("h", "No host")), Submitted::Rejected);
        assert_eq!(acc.warnings().len(), 1);
        assert_eq!(acc.warnings()[0].scope, "record h");

        let zoned = base.with_timezone(" ");
        assert_eq!(acc.submit_in(&zoned, draft("t", "No zone").timezone(" ")), Submitted::Rejected);
        assert_eq!(acc.warnings().len(), 2);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_extend_counts_only_new_records() {
        let mut acc = Accumulator::new(&ctx());
        acc.submit(draft("a", "A"));
        let added = acc.extend_in(
            &ctx(),
            vec![draft("a", "A"), draft("b", "B"), ContestDraft::new().key("c")],
        );
        assert_eq!(added, 1);
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.warnings().len(), 1);
    }
}
