//! Output generation for run reports.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`crate::report::RunReport`] to a JSON file for the ingesting driver
//! - [`dump`]: Renders a report as plain text for standalone/debug runs
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── atcoder.json
//! ├── codeforces.json
//! └── dmoj.json
//! ```

pub mod dump;
pub mod json;
