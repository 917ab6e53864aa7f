//! Statement worker library
//!
//! Periodically scans a directory of per-account transaction CSV files,
//! computes a monthly financial summary for each account, and dispatches a
//! templated email notification through the SendGrid dynamic-template API.
//!
//! The production entry point lives in `src/bin/statements_runtime.rs`; this
//! library exposes the pipeline so tests and alternative frontends can drive
//! it directly.

pub mod config;
pub mod pipeline;

pub use config::Config;
