//! Entry build orchestrator.
//!
//! Converts each configured entry's source spec into a generated output file,
//! running at most `DEFAULT_CONCURRENCY_LIMIT` conversions at a time. Failures
//! local to one entry never prevent the others from running: recoverable
//! problems are reported to the issue sink and the batch continues, while an
//! unexpected read error fails only that entry's task.

// Internal imports (std, crate)
use std::io;
use std::path::{Path, PathBuf};

use crate::document::{SpecDocument, SpecFormat};
use crate::entry::ResolvedEntry;
use crate::report::{BuildIssue, IssueKind, IssueSink};
use crate::typings::TypeGenerator;

// External imports (alphabetized)
use futures::stream::{self, StreamExt};
use tokio::fs;

/// Maximum number of conversions in flight at once
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 5;

/// What a single conversion attempt did to the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// Generated text was written to the resolved output path
    Written,
    /// The source was missing; any stale output was deleted
    RemovedStale,
    /// A recoverable error was reported; the prior output was left untouched
    Skipped,
}

/// Aggregate result of one batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: usize,
    pub removed: usize,
    pub skipped: usize,
    /// Entries whose task failed with an unexpected (fatal) error
    pub failures: Vec<(PathBuf, crate::Error)>,
}

impl BatchSummary {
    /// Total number of conversion attempts
    pub fn attempted(&self) -> usize {
        self.written + self.removed + self.skipped + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run a conversion for every entry with bounded concurrency.
///
/// All entries are attempted regardless of individual failures; completion
/// order is unspecified. Returns once every attempt has finished.
pub async fn run_batch(
    entries: &[ResolvedEntry],
    generator: &dyn TypeGenerator,
    sink: &dyn IssueSink,
    limit: usize,
) -> BatchSummary {
    let results = stream::iter(entries)
        .map(|entry| async move { (entry, convert_entry(entry, generator, sink).await) })
        .buffer_unordered(limit.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut summary = BatchSummary::default();
    for (entry, result) in results {
        match result {
            Ok(ConvertOutcome::Written) => summary.written += 1,
            Ok(ConvertOutcome::RemovedStale) => summary.removed += 1,
            Ok(ConvertOutcome::Skipped) => summary.skipped += 1,
            Err(err) => summary.failures.push((entry.source_path.clone(), err)),
        }
    }
    summary
}

/// Convert one entry: read, parse, generate, write.
///
/// Recoverable problems (missing source, unsupported extension, parse or
/// generation failure, write failure) are reported to the sink and return
/// `Ok`; only an unexpected read error propagates as `Err`.
pub async fn convert_entry(
    entry: &ResolvedEntry,
    generator: &dyn TypeGenerator,
    sink: &dyn IssueSink,
) -> crate::Result<ConvertOutcome> {
    let content = match fs::read_to_string(&entry.resolved_source_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // Issues name the configured path, not the resolved one
            sink.report(BuildIssue::new(
                IssueKind::SourceNotFound,
                &entry.source_path,
                None,
            ));
            remove_if_present(&entry.resolved_output_path).await?;
            return Ok(ConvertOutcome::RemovedStale);
        }
        Err(err) => return Err(err.into()),
    };

    let Some(format) = SpecFormat::from_path(&entry.resolved_source_path) else {
        sink.report(BuildIssue::new(
            IssueKind::UnsupportedFormat,
            &entry.source_path,
            entry
                .source_path
                .extension()
                .map(|ext| format!("extension '{}'", ext.to_string_lossy())),
        ));
        return Ok(ConvertOutcome::Skipped);
    };

    let doc = match SpecDocument::parse(&content, format) {
        Ok(doc) => doc,
        Err(err) => {
            sink.report(BuildIssue::new(
                IssueKind::ParseFailure,
                &entry.source_path,
                Some(err.to_string()),
            ));
            return Ok(ConvertOutcome::Skipped);
        }
    };

    let generated = match generator.generate(&doc).await {
        Ok(generated) => generated,
        Err(err) => {
            sink.report(BuildIssue::new(
                IssueKind::GenerationFailure,
                &entry.source_path,
                Some(err.to_string()),
            ));
            return Ok(ConvertOutcome::Skipped);
        }
    };

    if let Err(err) = write_output(&entry.resolved_output_path, &generated).await {
        sink.report(BuildIssue::new(
            IssueKind::WriteFailure,
            &entry.output_path,
            Some(err.to_string()),
        ));
        return Ok(ConvertOutcome::Skipped);
    }

    log::debug!(
        "converted {} -> {}",
        entry.source_path.display(),
        entry.output_path.display()
    );
    Ok(ConvertOutcome::Written)
}

async fn remove_if_present(path: &Path) -> crate::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

async fn write_output(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, contents).await
}
