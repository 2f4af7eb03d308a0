//! # Contest Harvest
//!
//! Site adapters that turn competitive-programming contest listings into
//! normalized [`ContestRecord`](models::ContestRecord)s.
//!
//! ## Architecture
//!
//! 1. **Context**: resolve a [`RunContext`](context::RunContext) from CLI
//!    flags, the YAML config and the adapter's defaults
//! 2. **Collect**: the [`Adapter`](adapters::Adapter) fetches its site through
//!    [`Fetch`](fetch::Fetch) and submits drafts to an
//!    [`Accumulator`](accumulator::Accumulator), which normalizes and dedups them
//! 3. **Report**: the [`runner`] wraps the outcome into a
//!    [`RunReport`](report::RunReport), dumped for debug runs and written as JSON

pub mod accumulator;
pub mod adapters;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod pagination;
pub mod report;
pub mod runner;
pub mod utils;
