//! Key schemas for the four cached artifact types
//!
//! A schema turns raw [`Params`] into a validated key, encodes that key as a
//! flat file name, derives the shard directory for it, and decodes names
//! found on disk back into keys. All name construction and splitting goes
//! through [`encode_name`] and [`split_name`].
//!
//! File names follow one convention for every artifact:
//!
//! ```text
//! <field>_<field>_..._<field>.<format>
//! ```
//!
//! Field values never contain the separator (`_`) and the format never
//! contains the extension indicator (`.`), so the encoding is unambiguous.

mod analysis;
mod audio;
mod dataset;
pub(crate) mod fields;
mod spectrogram;

pub use analysis::{AnalysisKey, AnalysisSchema};
pub use audio::{AudioDefaults, AudioKey, AudioSchema};
pub use dataset::{DatasetKey, DatasetSchema};
pub use spectrogram::{SpectrogramKey, SpectrogramSchema, WINDOW_SIZES};

use crate::{Error, Params, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between encoded fields
pub const SEPARATOR: char = '_';

/// Marker placed before the format extension
pub const EXTENSION_INDICATOR: char = '.';

/// The kinds of derived artifact the worker caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Audio clips cut from an original recording
    Audio,
    /// Rendered spectrogram images
    Spectrogram,
    /// Outputs of analysis jobs
    Analysis,
    /// Dataset bundles exported from a saved search
    Dataset,
}

impl ArtifactKind {
    /// Returns the string name for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Spectrogram => "spectrogram",
            Self::Analysis => "analysis",
            Self::Dataset => "dataset",
        }
    }

    /// Returns all kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Audio, Self::Spectrogram, Self::Analysis, Self::Dataset]
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Naming, sharding and parsing rules for one artifact type.
///
/// Implementations are pure: no method touches the filesystem, so a schema
/// may be shared freely between threads.
pub trait KeySchema: Send + Sync {
    /// Validated key type
    type Key: Clone + fmt::Debug + PartialEq + Serialize;

    /// Which artifact this schema describes
    fn kind(&self) -> ArtifactKind;

    /// Check every required field and build a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    fn validate(&self, params: &Params) -> Result<Self::Key>;

    /// Canonical, lower-cased file name for a key. Writes always use this name.
    fn file_name(&self, key: &Self::Key) -> String;

    /// Name variants for lookups, most specific first.
    fn file_names(&self, key: &Self::Key) -> Vec<String> {
        vec![self.file_name(key)]
    }

    /// Shard directory, relative to a storage root, using `/` between
    /// segments. Empty for flat layouts.
    fn partial_path(&self, key: &Self::Key) -> String;

    /// Recover a key from a bare file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the name does not have this schema's
    /// shape, or [`Error::Validation`] when it does but a value is invalid.
    fn decode(&self, file_name: &str) -> Result<Self::Key>;
}

/// Join already-rendered field values and a format into a file name.
pub(crate) fn encode_name(fields: &[String], format: &str) -> String {
    let separator = SEPARATOR.to_string();
    let mut name = fields.join(&separator);
    name.push(EXTENSION_INDICATOR);
    name.push_str(format);
    name.to_lowercase()
}

/// Split a file name into exactly `expected` field segments and a format.
pub(crate) fn split_name(file_name: &str, expected: usize) -> Result<(Vec<&str>, &str)> {
    let (stem, format) = file_name
        .rsplit_once(EXTENSION_INDICATOR)
        .ok_or_else(|| Error::parse(file_name, "missing extension"))?;
    if format.is_empty() {
        return Err(Error::parse(file_name, "empty extension"));
    }

    let segments: Vec<&str> = stem.split(SEPARATOR).collect();
    if segments.len() != expected {
        return Err(Error::parse(
            file_name,
            format!(
                "expected {expected} segments separated by '{SEPARATOR}', found {}",
                segments.len()
            ),
        ));
    }
    if let Some(position) = segments.iter().position(|s| s.is_empty()) {
        return Err(Error::parse(
            file_name,
            format!("segment {} is empty", position + 1),
        ));
    }

    Ok((segments, format))
}
