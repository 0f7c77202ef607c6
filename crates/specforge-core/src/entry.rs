//! Entry resolution against the build root.
//!
//! An entry is one source/output path pair supplied by configuration. Entries
//! are resolved once, when a build session starts, into absolute paths joined
//! against the build root. Resolution is purely lexical: it is deterministic
//! and never touches the filesystem.

// Internal imports (std, crate)
use std::path::{Component, Path, PathBuf};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// One source-to-output pair as configured (relative paths)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpecEntry {
    /// Spec file to convert, relative to the build root
    pub source_path: PathBuf,
    /// Typings file to produce, relative to the build root
    pub output_path: PathBuf,
}

impl SpecEntry {
    pub fn new(source_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_path: output_path.into(),
        }
    }
}

/// An entry after resolution. Immutable for the rest of the session.
///
/// The original relative paths are kept alongside the resolved ones so error
/// records can name the path the user actually wrote in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Source path as configured
    pub source_path: PathBuf,
    /// Output path as configured
    pub output_path: PathBuf,
    /// Absolute source path under the build root
    pub resolved_source_path: PathBuf,
    /// Absolute output path under the build root
    pub resolved_output_path: PathBuf,
}

/// Resolve every entry against the build root.
pub fn resolve_entries(entries: &[SpecEntry], build_root: &Path) -> Vec<ResolvedEntry> {
    entries
        .iter()
        .map(|entry| ResolvedEntry {
            source_path: entry.source_path.clone(),
            output_path: entry.output_path.clone(),
            resolved_source_path: normalize_path(&build_root.join(&entry.source_path)),
            resolved_output_path: normalize_path(&build_root.join(&entry.output_path)),
        })
        .collect()
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component where one exists.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_folds_dots() {
        assert_eq!(
            normalize_path(Path::new("/root/./api/../specs/pets.yaml")),
            PathBuf::from("/root/specs/pets.yaml")
        );
        assert_eq!(
            normalize_path(Path::new("/root/a/b/../../c")),
            PathBuf::from("/root/c")
        );
    }

    #[test]
    fn test_normalize_path_keeps_leading_parent_dirs_relative_only() {
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
        // ".." above the root stays at the root
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_resolve_entries_is_deterministic() {
        let entries = vec![
            SpecEntry::new("api/pets.yaml", "types/pets.d.ts"),
            SpecEntry::new("./api/../api/users.json", "types/users.d.ts"),
        ];
        let root = Path::new("/build/root");

        let first = resolve_entries(&entries, root);
        let second = resolve_entries(&entries, root);
        assert_eq!(first, second);

        assert_eq!(
            first[0].resolved_source_path,
            PathBuf::from("/build/root/api/pets.yaml")
        );
        assert_eq!(
            first[1].resolved_source_path,
            PathBuf::from("/build/root/api/users.json")
        );
        // Originals survive resolution for readable error records
        assert_eq!(
            first[1].source_path,
            PathBuf::from("./api/../api/users.json")
        );
    }
}
