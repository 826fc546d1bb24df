//! Read-only audit of files under the existing storage roots
//!
//! Maintenance tooling walks a cache and needs to know, per file, whether it
//! belongs there. A [`crate::Error::Parse`] means "not our file" and a
//! [`crate::Error::Validation`] means "our file, but stale or corrupt".

use crate::resolver::join_partial;
use crate::schema::KeySchema;
use crate::{ArtifactCache, Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Classification of one file found under a storage root
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanEntry<K> {
    /// Decoded, and stored exactly where the cache would look for it
    Cached {
        /// File location
        path: PathBuf,
        /// Decoded key
        key: K,
    },
    /// Decoded, but not at its canonical location within the root
    Misplaced {
        /// File location
        path: PathBuf,
        /// Where the file should be
        expected: PathBuf,
        /// Decoded key
        key: K,
    },
    /// The name does not follow the schema
    Foreign {
        /// File location
        path: PathBuf,
        /// Parse failure
        reason: String,
    },
    /// The name follows the schema but holds invalid values
    Invalid {
        /// File location
        path: PathBuf,
        /// Validation failure
        reason: String,
    },
}

impl<K> ScanEntry<K> {
    /// Location of the scanned file
    pub fn path(&self) -> &Path {
        match self {
            Self::Cached { path, .. }
            | Self::Misplaced { path, .. }
            | Self::Foreign { path, .. }
            | Self::Invalid { path, .. } => path,
        }
    }
}

/// Totals per classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounts {
    /// Files at their canonical location
    pub cached: usize,
    /// Valid files at the wrong location
    pub misplaced: usize,
    /// Files that are not cache artifacts
    pub foreign: usize,
    /// Artifact files with invalid values
    pub invalid: usize,
}

/// Result of scanning every existing root of one cache
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport<K> {
    /// Roots that existed and were walked
    pub roots: Vec<PathBuf>,
    /// One entry per regular file, in walk order
    pub entries: Vec<ScanEntry<K>>,
}

impl<K> ScanReport<K> {
    /// Count entries per classification
    #[must_use]
    pub fn counts(&self) -> ScanCounts {
        let mut counts = ScanCounts::default();
        for entry in &self.entries {
            match entry {
                ScanEntry::Cached { .. } => counts.cached += 1,
                ScanEntry::Misplaced { .. } => counts.misplaced += 1,
                ScanEntry::Foreign { .. } => counts.foreign += 1,
                ScanEntry::Invalid { .. } => counts.invalid += 1,
            }
        }
        counts
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

impl<S: KeySchema> ArtifactCache<S> {
    /// Walk every existing root and classify each regular file.
    ///
    /// Hidden files and directories (leading `.`) are skipped, as producers
    /// stage in-flight writes under such names. Nothing is modified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when a directory cannot be read.
    pub fn scan(&self) -> Result<ScanReport<S::Key>> {
        let roots = self.existing_dirs();
        let mut entries = Vec::new();

        for root in &roots {
            let walker = WalkDir::new(root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !is_hidden(e));
            for entry in walker {
                let entry = entry.map_err(|e| {
                    let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    Error::io(source, path, "walk")
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                entries.push(self.classify(root, entry.into_path()));
            }
        }

        let report = ScanReport { roots, entries };
        let counts = report.counts();
        tracing::info!(
            kind = %self.schema().kind(),
            roots = report.roots.len(),
            cached = counts.cached,
            misplaced = counts.misplaced,
            foreign = counts.foreign,
            invalid = counts.invalid,
            "Cache scan complete"
        );
        Ok(report)
    }

    fn classify(&self, root: &Path, path: PathBuf) -> ScanEntry<S::Key> {
        match self.parse_file_path(&path) {
            Ok(key) => {
                let expected =
                    join_partial(root, &self.partial_path(&key)).join(self.file_name(&key));
                if expected == path {
                    ScanEntry::Cached { path, key }
                } else {
                    tracing::debug!(
                        path = %path.display(),
                        expected = %expected.display(),
                        "Cached file is not at its canonical location"
                    );
                    ScanEntry::Misplaced {
                        path,
                        expected,
                        key,
                    }
                }
            }
            Err(e) if e.is_validation() => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid cached file");
                ScanEntry::Invalid {
                    path,
                    reason: e.to_string(),
                }
            }
            Err(e) => ScanEntry::Foreign {
                path,
                reason: e.to_string(),
            },
        }
    }
}
