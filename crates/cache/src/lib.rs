//! Cache path resolution for derived media artifacts
//!
//! Workers cache artifacts derived from original audio recordings: audio
//! clips, spectrogram images, analysis outputs and dataset bundles. There is
//! no index or database; the path of a file *is* the index.
//!
//! # Overview
//!
//! - [`StorageRoots`]: the ordered directories configured for one artifact type
//! - [`KeySchema`]: validates [`Params`] into a typed key, names it, shards it,
//!   and decodes names found on disk
//! - [`ArtifactCache`]: expands a key into every candidate path across all
//!   roots, root-major and name-variant-minor
//! - [`Settings`]: builds a [`CacheSet`] of all four caches from the worker
//!   settings file
//!
//! Everything except existence checks and [`ArtifactCache::scan`] is pure
//! string and path arithmetic. Nothing in this crate creates, moves or
//! deletes cached files.
//!
//! # Example
//!
//! ```
//! use baw_cache::{AudioCache, AudioSchema, Params, StorageRoots};
//!
//! let cache = AudioCache::new(
//!     StorageRoots::new(["/data/cache/audio"])?,
//!     AudioSchema::default(),
//! );
//! let key = cache.validate(
//!     &Params::new()
//!         .with("id", "5498633d-89a7-4b65-8f4a-96aa0c09c619")
//!         .with("start_offset", 8.1)
//!         .with("end_offset", 20.02)
//!         .with("channel", 0)
//!         .with("sample_rate", 22050)
//!         .with("format", "wav"),
//! )?;
//! assert_eq!(
//!     cache.file_name(&key),
//!     "5498633d-89a7-4b65-8f4a-96aa0c09c619_8.1_20.02_0_22050.wav"
//! );
//! assert_eq!(cache.partial_path(&key), "54");
//! # Ok::<(), baw_cache::Error>(())
//! ```

mod error;
mod params;
mod resolver;
mod roots;
mod scan;
pub mod schema;
mod settings;

// Re-export error types at crate root
pub use error::{Error, Result, ValidationReason};

// Re-export main types
pub use params::Params;
pub use resolver::{
    AnalysisCache, ArtifactCache, AudioCache, DatasetCache, SpectrogramCache, WritePolicy,
};
pub use roots::StorageRoots;
pub use scan::{ScanCounts, ScanEntry, ScanReport};
pub use schema::{
    AnalysisKey, AnalysisSchema, ArtifactKind, AudioDefaults, AudioKey, AudioSchema, DatasetKey,
    DatasetSchema, KeySchema, SpectrogramKey, SpectrogramSchema,
};
pub use settings::{CacheSet, Settings, StoragePaths};
