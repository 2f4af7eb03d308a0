//! Site adapters.
//!
//! Every site is an independent implementation of [`Adapter`]. Adapters
//! share no behavior beyond the output contract: they read a
//! [`RunContext`], fetch pages through `&dyn Fetch`, and submit drafts to
//! the run's [`Accumulator`].
//!
//! # Supported Sites
//!
//! | Site | Module | Method | Notes |
//! |------|--------|--------|-------|
//! | Codeforces | [`codeforces`] | JSON API | `full_list` adds gym contests |
//! | AtCoder | [`atcoder`] | HTML tables | `full_list` paginates the archive |
//! | CodeChef | [`codechef`] | JSON API | `full_list` pages through past contests |
//! | DMOJ | [`dmoj`] | Paginated JSON API | follows `has_more` |
//! | HackerRank | [`hackerrank`] | RSS calendar feed | |
//! | Advent of Code | [`adventofcode`] | Yearly HTML pages | one record per puzzle day |
//!
//! # Failure Contract
//!
//! - Return `Err` only when nothing more can be produced (fetch failure,
//!   undecodable body, explicit API error payload)
//! - Report shape problems with `acc.warn(..)` and carry on
//! - Never parse HTML across an `.await`: `scraper::Html` is not `Send`

use crate::accumulator::Accumulator;
use crate::context::{RunContext, SiteDefaults};
use crate::error::AdapterError;
use crate::fetch::Fetch;
use async_trait::async_trait;
use serde_json::Value;

pub mod adventofcode;
pub mod atcoder;
pub mod codechef;
pub mod codeforces;
pub mod dmoj;
pub mod hackerrank;

#[async_trait]
pub trait Adapter: Send + Sync {
    /// Stable identifier used on the command line and in config files.
    fn name(&self) -> &'static str;

    fn defaults(&self) -> SiteDefaults;

    /// Fetch the site and submit what it lists.
    ///
    /// Records submitted before an `Err` are kept by the caller.
    async fn collect(
        &self,
        ctx: &RunContext,
        fetch: &dyn Fetch,
        acc: &mut Accumulator,
    ) -> Result<(), AdapterError>;
}

/// Every shipped adapter, in a stable order.
pub fn registry() -> Vec<Box<dyn Adapter>> {
    vec![
        Box::new(codeforces::Codeforces),
        Box::new(atcoder::AtCoder),
        Box::new(codechef::CodeChef),
        Box::new(dmoj::Dmoj),
        Box::new(hackerrank::HackerRank),
        Box::new(adventofcode::AdventOfCode),
    ]
}

pub fn find(name: &str) -> Option<Box<dyn Adapter>> {
    registry()
        .into_iter()
        .find(|a| a.name().eq_ignore_ascii_case(name))
}

/// String field, also accepting numbers.
pub(crate) fn json_str(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer field, also accepting numeric strings.
pub(crate) fn json_i64(value: &Value, field: &str) -> Option<i64> {
    match value.get(field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_are_unique() {
        let names: HashSet<_> = registry().iter().map(|a| a.name()).collect();
        assert_eq!(names.len(), registry().len());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("CodeForces").map(|a| a.name()), Some("codeforces"));
        assert!(find("topcoder").is_none());
    }

    #[test]
    fn test_defaults_are_absolute_urls() {
        for adapter in registry() {
            let defaults = adapter.defaults();
            assert!(url::Url::parse(defaults.url).is_ok(), "{}", adapter.name());
            assert!(!defaults.timezone.is_empty());
        }
    }

    #[test]
    fn test_json_helpers() {
        let v = json!({"a": "12", "b": 7, "c": null});
        assert_eq!(json_str(&v, "a").as_deref(), Some("12"));
        assert_eq!(json_str(&v, "b").as_deref(), Some("7"));
        assert_eq!(json_str(&v, "c"), None);
        assert_eq!(json_i64(&v, "a"), Some(12));
        assert_eq!(json_i64(&v, "b"), Some(7));
        assert_eq!(json_i64(&v, "missing"), None);
    }
}
