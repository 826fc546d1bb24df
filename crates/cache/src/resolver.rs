//! Multi-root path resolution
//!
//! [`ArtifactCache`] combines a [`StorageRoots`] registry with a
//! [`KeySchema`] and expands keys into candidate paths of the form
//! `<root>/<partial_path>/<file_name>`.
//!
//! Candidates are ordered root-major, name-variant-minor. The first
//! candidate that exists on disk is the authoritative cached artifact.

use crate::schema::{AnalysisSchema, AudioSchema, DatasetSchema, KeySchema, SpectrogramSchema};
use crate::{Error, Params, Result, StorageRoots};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How [`ArtifactCache::write_path`] picks a root for a new artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Highest priority configured root, whether or not it exists yet.
    /// Pure: no filesystem access.
    #[default]
    FirstConfigured,
    /// Highest priority root that exists right now
    FirstExisting,
}

/// Path resolver for one artifact type
#[derive(Debug, Clone)]
pub struct ArtifactCache<S> {
    roots: StorageRoots,
    schema: S,
    write_policy: WritePolicy,
}

/// Resolver for cached audio clips
pub type AudioCache = ArtifactCache<AudioSchema>;
/// Resolver for cached spectrograms
pub type SpectrogramCache = ArtifactCache<SpectrogramSchema>;
/// Resolver for cached analysis outputs
pub type AnalysisCache = ArtifactCache<AnalysisSchema>;
/// Resolver for cached datasets
pub type DatasetCache = ArtifactCache<DatasetSchema>;

pub(crate) fn join_partial(root: &Path, partial_path: &str) -> PathBuf {
    let mut dir = root.to_path_buf();
    for segment in partial_path.split('/').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}

impl<S: KeySchema> ArtifactCache<S> {
    /// Create a resolver using the default write policy
    #[must_use]
    pub fn new(roots: StorageRoots, schema: S) -> Self {
        Self {
            roots,
            schema,
            write_policy: WritePolicy::default(),
        }
    }

    /// Replace the write policy
    #[must_use]
    pub fn with_write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    /// The schema used for names and shards
    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// The root registry
    pub fn roots(&self) -> &StorageRoots {
        &self.roots
    }

    /// The configured write policy
    pub fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    /// All configured roots, in priority order
    pub fn possible_dirs(&self) -> &[PathBuf] {
        self.roots.possible_dirs()
    }

    /// Configured roots that exist right now, in priority order
    pub fn existing_dirs(&self) -> Vec<PathBuf> {
        self.roots.existing_dirs()
    }

    /// Validate raw parameters into a key
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the offending field.
    pub fn validate(&self, params: &Params) -> Result<S::Key> {
        self.schema.validate(params)
    }

    /// Canonical file name for a key
    pub fn file_name(&self, key: &S::Key) -> String {
        self.schema.file_name(key)
    }

    /// Name variants for lookups, most specific first
    pub fn file_names(&self, key: &S::Key) -> Vec<String> {
        self.schema.file_names(key)
    }

    /// Shard directory fragment for a key
    pub fn partial_path(&self, key: &S::Key) -> String {
        self.schema.partial_path(key)
    }

    /// Decode the final component of a path found on disk
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for names that do not fit the schema (including
    /// paths without a UTF-8 file name) and [`Error::Validation`] for names
    /// that fit but carry invalid values.
    pub fn parse_file_path(&self, path: impl AsRef<Path>) -> Result<S::Key> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::parse(path.display().to_string(), "no UTF-8 file name"))?;
        self.schema.decode(name)
    }

    /// Every candidate path for a key: each root, then each name variant.
    pub fn possible_paths(&self, key: &S::Key) -> Vec<PathBuf> {
        let partial_path = self.schema.partial_path(key);
        let names = self.schema.file_names(key);
        self.roots
            .possible_dirs()
            .iter()
            .flat_map(|root| {
                let dir = join_partial(root, &partial_path);
                names.iter().map(move |name| dir.join(name))
            })
            .collect()
    }

    /// Candidate paths for a key using a caller-supplied file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when `file_name` is not a bare file name.
    pub fn possible_paths_file(&self, key: &S::Key, file_name: &str) -> Result<Vec<PathBuf>> {
        let is_bare = Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
        if !is_bare {
            return Err(Error::parse(file_name, "not a bare file name"));
        }
        let partial_path = self.schema.partial_path(key);
        Ok(self
            .roots
            .possible_dirs()
            .iter()
            .map(|root| join_partial(root, &partial_path).join(file_name))
            .collect())
    }

    /// Candidate paths that currently exist as files, in priority order
    pub fn existing_paths(&self, key: &S::Key) -> Vec<PathBuf> {
        self.possible_paths(key)
            .into_iter()
            .filter(|path| {
                let found = path.is_file();
                tracing::trace!(path = %path.display(), found, "Checked cache candidate");
                found
            })
            .collect()
    }

    /// The authoritative cached file for a key, if any
    pub fn locate(&self, key: &S::Key) -> Option<PathBuf> {
        self.possible_paths(key).into_iter().find(|path| path.is_file())
    }

    /// Where a newly produced artifact for `key` should be written.
    ///
    /// Always uses the exact file name, never a legacy variant. Parent
    /// directories are not created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the policy finds no root.
    pub fn write_path(&self, key: &S::Key) -> Result<PathBuf> {
        let root = match self.write_policy {
            WritePolicy::FirstConfigured => self.roots.possible_dirs().first().cloned(),
            WritePolicy::FirstExisting => self.roots.first_existing().map(Path::to_path_buf),
        }
        .ok_or_else(|| {
            Error::configuration(format!(
                "no {} storage root available for writing ({} configured, policy {:?})",
                self.schema.kind(),
                self.roots.len(),
                self.write_policy
            ))
        })?;

        let path =
            join_partial(&root, &self.schema.partial_path(key)).join(self.schema.file_name(key));
        tracing::debug!(
            kind = %self.schema.kind(),
            path = %path.display(),
            "Resolved cache write path"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AudioDefaults;
    use tempfile::TempDir;

    const ID: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619";
    const GIVEN: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619_8.1_20.02_0_22050.wav";
    const DEFAULTS: &str = "5498633d-89a7-4b65-8f4a-96aa0c09c619_0.0_20.02_0_22050.mp3";

    fn audio_params() -> Params {
        Params::new()
            .with("id", ID)
            .with("start_offset", 8.1)
            .with("end_offset", 20.02)
            .with("channel", 0)
            .with("sample_rate", 22050)
            .with("format", "wav")
    }

    fn audio_cache(roots: &[&Path]) -> AudioCache {
        ArtifactCache::new(
            StorageRoots::new(roots.iter().copied()).unwrap(),
            AudioSchema::default(),
        )
    }

    #[test]
    fn test_possible_paths_root_major_variant_minor() {
        let cache = audio_cache(&[Path::new("/cache/a"), Path::new("/cache/b")]);
        let key = cache.validate(&audio_params()).unwrap();
        assert_eq!(
            cache.possible_paths(&key),
            vec![
                PathBuf::from("/cache/a/54").join(GIVEN),
                PathBuf::from("/cache/a/54").join(DEFAULTS),
                PathBuf::from("/cache/b/54").join(GIVEN),
                PathBuf::from("/cache/b/54").join(DEFAULTS),
            ]
        );
    }

    #[test]
    fn test_possible_paths_file_uses_given_name() {
        let cache = audio_cache(&[Path::new("/cache/a")]);
        let key = cache.validate(&audio_params()).unwrap();
        assert_eq!(
            cache.possible_paths_file(&key, DEFAULTS).unwrap(),
            vec![PathBuf::from("/cache/a/54").join(DEFAULTS)]
        );
        assert!(cache.possible_paths_file(&key, "../escape.wav").is_err());
        assert!(cache.possible_paths_file(&key, "").is_err());
    }

    #[test]
    fn test_no_roots_no_paths() {
        let cache = audio_cache(&[]);
        let key = cache.validate(&audio_params()).unwrap();
        assert!(cache.possible_paths(&key).is_empty());
        assert!(cache.locate(&key).is_none());
        assert!(matches!(
            cache.write_path(&key).unwrap_err(),
            Error::Configuration { .. }
        ));
    }

    #[test]
    fn test_locate_prefers_earliest_root_then_specific_name() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        let cache = audio_cache(&[a.as_path(), b.as_path()]);
        let key = cache.validate(&audio_params()).unwrap();

        std::fs::create_dir_all(b.join("54")).unwrap();
        std::fs::write(b.join("54").join(GIVEN), b"b-given").unwrap();
        assert_eq!(cache.locate(&key), Some(b.join("54").join(GIVEN)));

        std::fs::create_dir_all(a.join("54")).unwrap();
        std::fs::write(a.join("54").join(DEFAULTS), b"a-default").unwrap();
        assert_eq!(cache.locate(&key), Some(a.join("54").join(DEFAULTS)));

        std::fs::write(a.join("54").join(GIVEN), b"a-given").unwrap();
        assert_eq!(cache.locate(&key), Some(a.join("54").join(GIVEN)));
        assert_eq!(
            cache.existing_paths(&key),
            vec![
                a.join("54").join(GIVEN),
                a.join("54").join(DEFAULTS),
                b.join("54").join(GIVEN),
            ]
        );
    }

    #[test]
    fn test_write_path_policies() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let present = tmp.path().join("present");
        std::fs::create_dir(&present).unwrap();
        let cache = audio_cache(&[missing.as_path(), present.as_path()]);
        let key = cache.validate(&audio_params()).unwrap();

        assert_eq!(
            cache.write_path(&key).unwrap(),
            missing.join("54").join(GIVEN)
        );
        let cache = cache.with_write_policy(WritePolicy::FirstExisting);
        assert_eq!(
            cache.write_path(&key).unwrap(),
            present.join("54").join(GIVEN)
        );
    }

    #[test]
    fn test_parse_file_path_uses_file_name_only() {
        let cache = audio_cache(&[Path::new("/cache/a")]);
        let key = cache.validate(&audio_params()).unwrap();
        let parsed = cache
            .parse_file_path(Path::new("/anywhere/else").join(GIVEN))
            .unwrap();
        assert_eq!(parsed, key);
        assert!(cache.parse_file_path("/").unwrap_err().is_parse());
    }

    #[test]
    fn test_custom_defaults_change_legacy_variant() {
        let schema = AudioSchema::with_defaults(AudioDefaults {
            sample_rate: 44100,
            format: "ogg".to_string(),
            ..AudioDefaults::default()
        })
        .unwrap();
        let cache = ArtifactCache::new(StorageRoots::new(["/c"]).unwrap(), schema);
        let key = cache.validate(&audio_params()).unwrap();
        assert_eq!(
            cache.file_names(&key)[1],
            "5498633d-89a7-4b65-8f4a-96aa0c09c619_0.0_20.02_0_44100.ogg"
        );
    }

    #[test]
    fn test_dataset_paths_are_flat() {
        let cache = ArtifactCache::new(
            StorageRoots::new(["/datasets"]).unwrap(),
            DatasetSchema,
        );
        let key = cache
            .validate(
                &Params::new()
                    .with("saved_search_id", 12)
                    .with("dataset_id", 34)
                    .with("format", "csv"),
            )
            .unwrap();
        assert_eq!(
            cache.possible_paths(&key),
            vec![PathBuf::from("/datasets/12_34.csv")]
        );
    }

    #[test]
    fn test_analysis_paths_nest_job_then_shard() {
        let cache = ArtifactCache::new(
            StorageRoots::new(["/analysis"]).unwrap(),
            AnalysisSchema,
        );
        let key = cache
            .validate(
                &Params::new()
                    .with("id", ID)
                    .with("job_id", 3)
                    .with("result", "indices")
                    .with("format", "csv"),
            )
            .unwrap();
        assert_eq!(
            cache.write_path(&key).unwrap(),
            PathBuf::from("/analysis/3/54").join(format!("{ID}_3_indices.csv"))
        );
    }
}
