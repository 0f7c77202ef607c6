//! Build issue records and the sink they are reported through.
//!
//! Every recoverable error in a build yields exactly one `BuildIssue` naming
//! the offending path. The sink is append-only, safe for concurrent use, and
//! has no return value; the default sink forwards to the `log` facade, and
//! `MemorySink` collects issues for embedders and tests.

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Classification of a recoverable build problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The configured source file does not exist
    SourceNotFound,
    /// The source file extension is neither YAML nor JSON
    UnsupportedFormat,
    /// The source file could not be parsed
    ParseFailure,
    /// The type-generation step failed
    GenerationFailure,
    /// The output file could not be written
    WriteFailure,
    /// The external generator tool exited abnormally or wrote to stderr
    ToolFailure,
    /// The filesystem watcher reported an error
    WatchFailure,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceNotFound => "source not found",
            Self::UnsupportedFormat => "unsupported format",
            Self::ParseFailure => "parse failure",
            Self::GenerationFailure => "generation failure",
            Self::WriteFailure => "write failure",
            Self::ToolFailure => "generator tool failure",
            Self::WatchFailure => "watch failure",
        }
    }
}

/// One recoverable error record: a kind, the offending path, optional cause
#[derive(Debug, Clone)]
pub struct BuildIssue {
    pub kind: IssueKind,
    pub path: PathBuf,
    pub detail: Option<String>,
}

impl BuildIssue {
    pub fn new(kind: IssueKind, path: impl Into<PathBuf>, detail: Option<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            detail,
        }
    }
}

impl fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(
                f,
                "{}: {}: {}",
                self.kind.as_str(),
                self.path.display(),
                detail
            ),
            None => write!(f, "{}: {}", self.kind.as_str(), self.path.display()),
        }
    }
}

/// Sink for build issues. Append-only, no backpressure, no return value.
pub trait IssueSink: Send + Sync {
    fn report(&self, issue: BuildIssue);
}

/// Default sink: forwards every issue to `log::error!`
#[derive(Debug, Default)]
pub struct LogSink;

impl IssueSink for LogSink {
    fn report(&self, issue: BuildIssue) {
        log::error!("{issue}");
    }
}

/// Sink that retains every issue in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    issues: Mutex<Vec<BuildIssue>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in report order
    pub fn issues(&self) -> Vec<BuildIssue> {
        match self.issues.lock() {
            Ok(issues) => issues.clone(),
            Err(err) => err.into_inner().clone(),
        }
    }

    /// Issues whose record names the given path
    pub fn issues_for(&self, path: &Path) -> Vec<BuildIssue> {
        self.issues()
            .into_iter()
            .filter(|issue| issue.path == path)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.issues().is_empty()
    }
}

impl IssueSink for MemorySink {
    fn report(&self, issue: BuildIssue) {
        match self.issues.lock() {
            Ok(mut issues) => issues.push(issue),
            Err(err) => err.into_inner().push(issue),
        }
    }
}
