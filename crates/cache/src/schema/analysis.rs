//! Cached analysis job outputs
//!
//! ```text
//! <job_id>/<id[0..2]>/<id>_<job_id>_<result>.<format>
//! ```
//!
//! Outputs are grouped per analysis job first, then sharded by recording.

use super::{ArtifactKind, KeySchema, encode_name, fields, split_name};
use crate::{Params, Result};
use serde::Serialize;
use uuid::Uuid;

const FIELD_COUNT: usize = 3;

/// Validated key of one cached analysis output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisKey {
    id: Uuid,
    job_id: u64,
    result: String,
    format: String,
}

impl AnalysisKey {
    /// Recording id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Analysis job that produced the output
    #[must_use]
    pub const fn job_id(&self) -> u64 {
        self.job_id
    }

    /// Name of the output within the job, e.g. `indices`
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Normalized format extension
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }
}

/// Schema for cached analysis outputs
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisSchema;

impl KeySchema for AnalysisSchema {
    type Key = AnalysisKey;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Analysis
    }

    fn validate(&self, params: &Params) -> Result<AnalysisKey> {
        Ok(AnalysisKey {
            id: fields::recording_id(params, "id")?,
            job_id: fields::positive_id(params, "job_id")?,
            result: fields::token(params, "result")?,
            format: fields::format(params)?,
        })
    }

    fn file_name(&self, key: &AnalysisKey) -> String {
        encode_name(
            &[
                key.id.hyphenated().to_string(),
                key.job_id.to_string(),
                key.result.clone(),
            ],
            &key.format,
        )
    }

    fn partial_path(&self, key: &AnalysisKey) -> String {
        format!("{}/{}", key.job_id, fields::shard(&key.id))
    }

    fn decode(&self, file_name: &str) -> Result<AnalysisKey> {
        let (segments, format) = split_name(file_name, FIELD_COUNT)?;
        let params = Params::new()
            .with("id", segments[0])
            .with(
                "job_id",
                fields::parse_integer(file_name, "job_id", segments[1])?,
            )
            .with("result", segments[2])
            .with("format", format);
        self.validate(&params)
    }
}
