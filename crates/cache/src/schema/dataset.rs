//! Cached dataset bundles
//!
//! ```text
//! <saved_search_id>_<dataset_id>.<format>
//! ```
//!
//! No sub-folders: the id space is small, so files live directly under each
//! storage root.

use super::{ArtifactKind, KeySchema, encode_name, fields, split_name};
use crate::{Params, Result};
use serde::Serialize;

const FIELD_COUNT: usize = 2;

/// Validated key of one cached dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetKey {
    saved_search_id: u64,
    dataset_id: u64,
    format: String,
}

impl DatasetKey {
    /// Saved search the dataset was exported from
    #[must_use]
    pub const fn saved_search_id(&self) -> u64 {
        self.saved_search_id
    }

    /// Dataset id
    #[must_use]
    pub const fn dataset_id(&self) -> u64 {
        self.dataset_id
    }

    /// Normalized format extension
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }
}

/// Schema for cached datasets
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetSchema;

impl KeySchema for DatasetSchema {
    type Key = DatasetKey;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Dataset
    }

    fn validate(&self, params: &Params) -> Result<DatasetKey> {
        Ok(DatasetKey {
            saved_search_id: fields::positive_id(params, "saved_search_id")?,
            dataset_id: fields::positive_id(params, "dataset_id")?,
            format: fields::format(params)?,
        })
    }

    fn file_name(&self, key: &DatasetKey) -> String {
        encode_name(
            &[key.saved_search_id.to_string(), key.dataset_id.to_string()],
            &key.format,
        )
    }

    fn partial_path(&self, _key: &DatasetKey) -> String {
        String::new()
    }

    fn decode(&self, file_name: &str) -> Result<DatasetKey> {
        let (segments, format) = split_name(file_name, FIELD_COUNT)?;
        let params = Params::new()
            .with(
                "saved_search_id",
                fields::parse_integer(file_name, "saved_search_id", segments[0])?,
            )
            .with(
                "dataset_id",
                fields::parse_integer(file_name, "dataset_id", segments[1])?,
            )
            .with("format", format);
        self.validate(&params)
    }
}
