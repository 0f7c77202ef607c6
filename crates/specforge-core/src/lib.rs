//! Specforge Core Library
//!
//! This library keeps generated artifacts in sync with OpenAPI specification
//! files: it converts configured source/output entry pairs into TypeScript
//! typings, optionally re-converts entries when their sources change, and can
//! drive an external client-code generator as a subprocess.

pub mod assets;
pub mod clientgen;
pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod session;
pub mod typings;
pub mod utils;
pub mod watch;

pub use crate::{
    clientgen::ClientToolRunner,
    config::{ClientToolConfig, TypegenConfig},
    document::{SpecDocument, SpecFormat},
    entry::{resolve_entries, ResolvedEntry, SpecEntry},
    error::{Error, Result},
    orchestrator::{convert_entry, run_batch, BatchSummary, ConvertOutcome, DEFAULT_CONCURRENCY_LIMIT},
    report::{BuildIssue, IssueKind, IssueSink, LogSink, MemorySink},
    session::BuildSession,
    typings::{TsTypingsGenerator, TypeGenerator},
    watch::SpecWatcher,
};

/// Result type for Specforge build operations
pub type SpecforgeResult<T> = std::result::Result<T, Error>;
