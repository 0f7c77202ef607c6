//! Watch mode: re-convert entries when their source files change.
//!
//! One `notify` watcher forwards raw events into a tokio channel; the event
//! loop matches event paths against the resolved entries and re-runs the
//! conversion for the matching entries only. Reruns are serialized through
//! the loop, so they never exceed the batch concurrency cap. The loop lives
//! until the event channel closes; there is no explicit unsubscribe.

// Internal imports (std, crate)
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::entry::ResolvedEntry;
use crate::report::{BuildIssue, IssueKind, IssueSink};
use crate::typings::TypeGenerator;

// External imports (alphabetized)
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Long-lived watcher over every entry's source file
pub struct SpecWatcher {
    watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    entries: Vec<ResolvedEntry>,
}

impl SpecWatcher {
    /// Create the watcher without registering any paths yet.
    pub fn new(entries: Vec<ResolvedEntry>) -> crate::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = notify::recommended_watcher(move |result| {
            let _ = tx.send(result);
        })?;
        Ok(Self {
            watcher,
            rx,
            entries,
        })
    }

    /// Watch every entry's source and process events until the channel closes.
    ///
    /// Source files are watched through their parent directories so that
    /// deletion and re-creation of the file itself keep producing events.
    /// Registration and watcher-level errors are reported as issues and do
    /// not stop watching the other entries.
    pub async fn run(mut self, generator: Arc<dyn TypeGenerator>, sink: Arc<dyn IssueSink>) {
        let mut watch_dirs = BTreeSet::new();
        for entry in &self.entries {
            if let Some(parent) = entry.resolved_source_path.parent() {
                watch_dirs.insert(parent.to_path_buf());
            }
        }
        for dir in &watch_dirs {
            if let Err(err) = self.watcher.watch(dir, RecursiveMode::NonRecursive) {
                sink.report(BuildIssue::new(
                    IssueKind::WatchFailure,
                    dir,
                    Some(err.to_string()),
                ));
            }
        }
        log::info!("watching {} spec entries for changes", self.entries.len());

        while let Some(result) = self.rx.recv().await {
            match result {
                Ok(event) if is_relevant(&event.kind) => {
                    for entry in matching_entries(&self.entries, &event.paths) {
                        if let Err(err) =
                            crate::orchestrator::convert_entry(entry, &*generator, &*sink).await
                        {
                            log::warn!(
                                "watch rebuild of {} failed: {err}",
                                entry.source_path.display()
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    sink.report(BuildIssue::new(
                        IssueKind::WatchFailure,
                        failure_subject(&err, &watch_dirs),
                        Some(err.to_string()),
                    ));
                }
            }
        }
        log::debug!("spec watcher event channel closed");
    }
}

/// Path to name for a watcher-level error: the path the watcher blames,
/// or the first watched directory when the error carries none.
fn failure_subject(err: &notify::Error, watch_dirs: &BTreeSet<PathBuf>) -> PathBuf {
    err.paths
        .first()
        .cloned()
        .or_else(|| watch_dirs.iter().next().cloned())
        .unwrap_or_default()
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

fn matching_entries<'a>(
    entries: &'a [ResolvedEntry],
    paths: &[PathBuf],
) -> Vec<&'a ResolvedEntry> {
    entries
        .iter()
        .filter(|entry| paths.iter().any(|p| p == &entry.resolved_source_path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{resolve_entries, SpecEntry};
    use crate::report::MemorySink;
    use crate::typings::TsTypingsGenerator;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::fs;

    fn spec_with_schema(name: &str) -> String {
        format!(
            r#"{{"openapi":"3.0.0","info":{{"title":"T","version":"1"}},"components":{{"schemas":{{"{name}":{{"type":"string"}}}}}}}}"#
        )
    }

    async fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[test]
    fn test_watcher_error_issues_name_a_path() {
        let mut dirs = BTreeSet::new();
        dirs.insert(PathBuf::from("specs"));

        let with_path = notify::Error::generic("queue overflow").add_path(PathBuf::from("specs/api.json"));
        assert_eq!(
            failure_subject(&with_path, &dirs),
            PathBuf::from("specs/api.json")
        );

        // An error without its own path falls back to the watched directory
        let without_path = notify::Error::generic("queue overflow");
        assert_eq!(failure_subject(&without_path, &dirs), PathBuf::from("specs"));
    }

    #[tokio::test]
    async fn test_watch_rebuilds_on_change_and_removes_on_delete() -> crate::Result<()> {
        let dir = tempdir()?;
        let entries = resolve_entries(&[SpecEntry::new("api.json", "gen/api.d.ts")], dir.path());
        let entry = entries[0].clone();
        fs::write(&entry.resolved_source_path, spec_with_schema("First")).await?;

        let generator: Arc<dyn TypeGenerator> = Arc::new(TsTypingsGenerator::new());
        let sink = Arc::new(MemorySink::new());

        // Initial conversion, then keep the output in sync
        crate::orchestrator::convert_entry(&entry, &*generator, &*sink).await?;
        let watcher = SpecWatcher::new(entries)?;
        let handle = tokio::spawn(watcher.run(generator, sink.clone()));

        // Let the watcher register before mutating the directory
        tokio::time::sleep(Duration::from_millis(250)).await;

        fs::write(&entry.resolved_source_path, spec_with_schema("Second")).await?;
        let output_path = entry.resolved_output_path.clone();
        let rebuilt = wait_for(|| {
            std::fs::read_to_string(&output_path)
                .map(|text| text.contains("Second"))
                .unwrap_or(false)
        })
        .await;
        assert!(rebuilt, "output was not rebuilt after source change");

        fs::remove_file(&entry.resolved_source_path).await?;
        let removed = wait_for(|| !output_path.exists()).await;
        assert!(removed, "stale output was not removed after source delete");

        let issues = sink.issues();
        assert!(issues
            .iter()
            .any(|issue| issue.kind == IssueKind::SourceNotFound));

        handle.abort();
        Ok(())
    }
}
