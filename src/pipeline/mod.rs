//! Statement processing pipeline
//!
//! Data flow:
//!
//! ```text
//! Scheduler (initial delay + fixed-interval ticks)
//!     ↓
//! StatementRunner (one pass over the statements directory)
//!     ↓ per file
//! summary::summarize (incremental single-pass aggregation)
//!     ↓
//! report::build_template_data (notification-ready rendering)
//!     ↓
//! Notifier::send (SendGrid dynamic template)
//! ```
//!
//! Each run owns its summaries and reports exclusively; there is no shared
//! mutable state between runs beyond the scheduler's shutdown signal.
//!
//! ## Module organization
//!
//! - `summary` - per-account aggregation (totals, averages, month counts)
//! - `report` - template data rendering (humanized months, display formatting)
//! - `notifier` - outbound notification contract + SendGrid implementation
//! - `runner` - per-directory batch pass with per-source failure isolation
//! - `scheduler` - start-time arithmetic and the periodic firing loop

pub mod notifier;
pub mod report;
pub mod runner;
pub mod scheduler;
pub mod summary;

// Re-export commonly used types
pub use notifier::{Notifier, NotifyError, SendGridNotifier};
pub use report::{MonthOperation, ReportError, TemplateData};
pub use runner::StatementRunner;
pub use scheduler::{BatchJob, ScheduleConfig, ScheduleError, Scheduler, StartAt};
pub use summary::StatementSummary;
