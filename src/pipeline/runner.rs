//! Batch pass over the statements directory
//!
//! One run enumerates the configured directory and processes every regular
//! file independently: aggregate, render, notify. A failure at any stage
//! (I/O, parsing, formatting, dispatch) is logged and only skips that file;
//! it never aborts the rest of the batch.

use super::notifier::Notifier;
use super::report::build_template_data;
use super::scheduler::BatchJob;
use super::summary::summarize;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Runs the aggregate → report → notify pipeline for every statement file
pub struct StatementRunner {
    dir: PathBuf,
    notifier: Arc<dyn Notifier>,
}

impl StatementRunner {
    pub fn new(dir: impl Into<PathBuf>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            dir: dir.into(),
            notifier,
        }
    }

    /// Process a single statement file
    ///
    /// The account identifier is the file name without its extension; the
    /// file is named after the account's email address.
    async fn process_file(&self, path: &Path) -> Result<(), SourceError> {
        let account_id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();

        let contents = tokio::fs::read(path).await?;
        let summary = summarize(contents.as_slice())?;
        let report = build_template_data(&account_id, &summary)?;
        self.notifier.send(&account_id, &report).await?;
        Ok(())
    }
}

#[async_trait]
impl BatchJob for StatementRunner {
    async fn run_once(&self) {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                log::error!(
                    "cannot read statements directory {}: {}",
                    self.dir.display(),
                    e
                );
                return;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    log::error!("failed to read directory entry: {}", e);
                    break;
                }
            };

            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            }

            log::info!("processing file: {}", path.display());
            match self.process_file(&path).await {
                Ok(()) => log::info!("file processed OK: {}", path.display()),
                Err(e) => log::error!("failed to process {}: {}", path.display(), e),
            }
        }
    }
}
