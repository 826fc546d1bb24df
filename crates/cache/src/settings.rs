//! Worker settings for the artifact caches
//!
//! Settings are read from the worker's YAML settings file. Only the keys
//! below are interpreted; the rest of the file belongs to other components
//! and is ignored.
//!
//! ```yaml
//! paths:
//!   cached_audios: [/data/cache/audio]
//!   cached_spectrograms: [/data/cache/spectrograms]
//!   cached_analysis_jobs: [/data/cache/analysis]
//!   cached_datasets: [/data/cache/datasets]
//! cached_audio_defaults:
//!   start_offset: 0.0
//!   channel: 0
//!   sample_rate: 22050
//!   format: mp3
//! write_policy: first_configured
//! ```

use crate::schema::{AnalysisSchema, AudioDefaults, AudioSchema, DatasetSchema, SpectrogramSchema};
use crate::{
    AnalysisCache, ArtifactCache, ArtifactKind, AudioCache, DatasetCache, Error, Result,
    SpectrogramCache, StorageRoots, WritePolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage root lists, one per artifact type, in priority order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePaths {
    /// Roots for audio clips
    pub cached_audios: Vec<PathBuf>,
    /// Roots for spectrogram images
    pub cached_spectrograms: Vec<PathBuf>,
    /// Roots for analysis outputs
    pub cached_analysis_jobs: Vec<PathBuf>,
    /// Roots for dataset bundles
    pub cached_datasets: Vec<PathBuf>,
}

impl StoragePaths {
    /// Root list configured for `kind`
    #[must_use]
    pub fn for_kind(&self, kind: ArtifactKind) -> &[PathBuf] {
        match kind {
            ArtifactKind::Audio => &self.cached_audios,
            ArtifactKind::Spectrogram => &self.cached_spectrograms,
            ArtifactKind::Analysis => &self.cached_analysis_jobs,
            ArtifactKind::Dataset => &self.cached_datasets,
        }
    }

    fn all_mut(&mut self) -> [&mut Vec<PathBuf>; 4] {
        [
            &mut self.cached_audios,
            &mut self.cached_spectrograms,
            &mut self.cached_analysis_jobs,
            &mut self.cached_datasets,
        ]
    }
}

/// Cache-related worker settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Storage roots
    pub paths: StoragePaths,
    /// Parameters assumed for audio generated without explicit values
    pub cached_audio_defaults: AudioDefaults,
    /// Root selection for new artifacts
    pub write_policy: WritePolicy,
}

impl Settings {
    /// Parse settings from YAML. Relative roots are left as written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::serialization(format!("Failed to parse settings: {e}")))
    }

    /// Read a settings file, resolving relative roots against its directory.
    ///
    /// A relative settings path is taken from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Serialization`] if it is not valid settings YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::io(e, path, "read"))?;
        let mut settings = Self::from_yaml_str(&yaml)?;
        let absolute = std::path::absolute(path).map_err(|e| Error::io(e, path, "resolve"))?;
        if let Some(base) = absolute.parent() {
            settings.resolve_relative_to(base);
        }
        tracing::debug!(settings = %path.display(), "Loaded cache settings");
        Ok(settings)
    }

    /// Prefix every relative root with `base`
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for dirs in self.paths.all_mut() {
            for dir in dirs.iter_mut() {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
    }

    /// Root registry for one artifact type
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for relative or repeated roots.
    pub fn roots(&self, kind: ArtifactKind) -> Result<StorageRoots> {
        StorageRoots::new(self.paths.for_kind(kind).iter().cloned())
            .map_err(|e| match e {
                Error::Configuration { message } => {
                    Error::configuration(format!("{kind} cache: {message}"))
                }
                other => other,
            })
    }

    /// Build all four caches
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when a root list or the audio
    /// defaults are invalid.
    pub fn build(&self) -> Result<CacheSet> {
        let policy = self.write_policy;
        Ok(CacheSet {
            audio: ArtifactCache::new(
                self.roots(ArtifactKind::Audio)?,
                AudioSchema::with_defaults(self.cached_audio_defaults.clone())?,
            )
            .with_write_policy(policy),
            spectrogram: ArtifactCache::new(
                self.roots(ArtifactKind::Spectrogram)?,
                SpectrogramSchema,
            )
            .with_write_policy(policy),
            analysis: ArtifactCache::new(self.roots(ArtifactKind::Analysis)?, AnalysisSchema)
                .with_write_policy(policy),
            dataset: ArtifactCache::new(self.roots(ArtifactKind::Dataset)?, DatasetSchema)
                .with_write_policy(policy),
        })
    }
}

/// The four artifact caches of one worker, configured together
#[derive(Debug, Clone)]
pub struct CacheSet {
    /// Audio clips
    pub audio: AudioCache,
    /// Spectrogram images
    pub spectrogram: SpectrogramCache,
    /// Analysis outputs
    pub analysis: AnalysisCache,
    /// Dataset bundles
    pub dataset: DatasetCache,
}
