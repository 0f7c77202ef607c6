//! Build-session lifecycle.
//!
//! The orchestrator is driven through explicit lifecycle methods on a
//! `BuildSession` rather than callback registration: the host calls
//! `on_pre_compile` to bring outputs up to date, `watch` to keep them in
//! sync, and `on_clean` to remove everything that was generated.

// Internal imports (std, crate)
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::TypegenConfig;
use crate::entry::{resolve_entries, ResolvedEntry};
use crate::orchestrator::{run_batch, BatchSummary, DEFAULT_CONCURRENCY_LIMIT};
use crate::report::IssueSink;
use crate::typings::TypeGenerator;
use crate::watch::SpecWatcher;

// External imports (alphabetized)
use tokio::fs;

/// One typings build session over a fixed set of resolved entries
pub struct BuildSession {
    build_root: PathBuf,
    entries: Vec<ResolvedEntry>,
    generator: Arc<dyn TypeGenerator>,
    sink: Arc<dyn IssueSink>,
    concurrency_limit: usize,
}

impl BuildSession {
    /// Validate the configuration (fail fast) and resolve its entries.
    pub fn new(
        config: &TypegenConfig,
        build_root: impl Into<PathBuf>,
        generator: Arc<dyn TypeGenerator>,
        sink: Arc<dyn IssueSink>,
    ) -> crate::Result<Self> {
        config.validate()?;
        let build_root = build_root.into();
        let entries = resolve_entries(&config.entries, &build_root);
        Ok(Self {
            build_root,
            entries,
            generator,
            sink,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        })
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    /// Bring every output up to date with its source.
    pub async fn on_pre_compile(&self) -> BatchSummary {
        log::info!(
            "building {} typings entries under {}",
            self.entries.len(),
            self.build_root.display()
        );
        run_batch(
            &self.entries,
            &*self.generator,
            &*self.sink,
            self.concurrency_limit,
        )
        .await
    }

    /// Keep outputs in sync until the watcher's event channel closes.
    pub async fn watch(&self) -> crate::Result<()> {
        let watcher = SpecWatcher::new(self.entries.clone())?;
        watcher.run(self.generator.clone(), self.sink.clone()).await;
        Ok(())
    }

    /// Remove every resolved output file. Missing outputs are fine.
    pub async fn on_clean(&self) -> crate::Result<()> {
        for entry in &self.entries {
            match fs::remove_file(&entry.resolved_output_path).await {
                Ok(()) => log::debug!("removed {}", entry.output_path.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
