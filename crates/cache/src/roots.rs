//! Ordered storage roots for one artifact type

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// The configured top-level directories for one artifact type.
///
/// Order is priority: the first root is searched first and, under the
/// default write policy, receives new files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageRoots {
    dirs: Vec<PathBuf>,
}

impl StorageRoots {
    /// Create a registry from absolute directory paths.
    ///
    /// An empty list is accepted; lookups then yield nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a relative path or a path listed
    /// more than once.
    pub fn new<I, P>(dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut checked: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            let dir = dir.into();
            if !dir.is_absolute() {
                return Err(Error::configuration(format!(
                    "storage root '{}' is not an absolute path",
                    dir.display()
                )));
            }
            if checked.contains(&dir) {
                return Err(Error::configuration(format!(
                    "storage root '{}' is listed more than once",
                    dir.display()
                )));
            }
            checked.push(dir);
        }
        Ok(Self { dirs: checked })
    }

    /// Every configured root, in configuration order
    #[must_use]
    pub fn possible_dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// The configured roots that currently exist as directories, in
    /// configuration order
    #[must_use]
    pub fn existing_dirs(&self) -> Vec<PathBuf> {
        self.dirs
            .iter()
            .filter(|dir| {
                let exists = dir.is_dir();
                if !exists {
                    tracing::debug!(root = %dir.display(), "Storage root does not exist");
                }
                exists
            })
            .cloned()
            .collect()
    }

    /// Highest priority root that currently exists
    #[must_use]
    pub fn first_existing(&self) -> Option<&Path> {
        self.dirs.iter().map(PathBuf::as_path).find(|dir| dir.is_dir())
    }

    /// Number of configured roots
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// True when no roots are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
