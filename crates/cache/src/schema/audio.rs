//! Cached audio clips
//!
//! ```text
//! <id>_<start_offset>_<end_offset>_<channel>_<sample_rate>.<format>
//! ```
//!
//! Clips are sharded by the first two characters of the recording id.

use super::{ArtifactKind, KeySchema, encode_name, fields, split_name};
use crate::{Error, Params, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const FIELD_COUNT: usize = 5;

/// Parameters a clip is generated with when the caller does not supply them.
///
/// Clips cached before callers passed explicit parameters are stored under
/// names built from these values, so lookups also try that name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioDefaults {
    /// Default start offset in seconds
    pub start_offset: f64,
    /// Default channel (0 mixes all channels)
    pub channel: u32,
    /// Default sample rate in hertz
    pub sample_rate: u32,
    /// Default storage format
    pub format: String,
}

impl Default for AudioDefaults {
    fn default() -> Self {
        Self {
            start_offset: 0.0,
            channel: 0,
            sample_rate: 22050,
            format: "mp3".to_string(),
        }
    }
}

/// Validated key of one cached audio clip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioKey {
    id: Uuid,
    start_offset: f64,
    end_offset: f64,
    channel: u32,
    sample_rate: u32,
    format: String,
}

impl AudioKey {
    /// Recording id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Clip start, in seconds from the start of the recording
    #[must_use]
    pub const fn start_offset(&self) -> f64 {
        self.start_offset
    }

    /// Clip end, in seconds from the start of the recording
    #[must_use]
    pub const fn end_offset(&self) -> f64 {
        self.end_offset
    }

    /// Channel number
    #[must_use]
    pub const fn channel(&self) -> u32 {
        self.channel
    }

    /// Sample rate in hertz
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Normalized format extension
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parameters that validate back to this key
    #[must_use]
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("id", self.id.hyphenated().to_string())
            .with("start_offset", self.start_offset)
            .with("end_offset", self.end_offset)
            .with("channel", self.channel)
            .with("sample_rate", self.sample_rate)
            .with("format", self.format.clone())
    }
}

/// Schema for cached audio clips
#[derive(Debug, Clone, Default)]
pub struct AudioSchema {
    defaults: AudioDefaults,
}

impl AudioSchema {
    /// Create a schema using the given legacy defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the defaults could not produce
    /// a valid name.
    pub fn with_defaults(defaults: AudioDefaults) -> Result<Self> {
        if !defaults.start_offset.is_finite() || defaults.start_offset < 0.0 {
            return Err(Error::configuration(
                "audio default start_offset must be a finite number >= 0",
            ));
        }
        if defaults.sample_rate == 0 {
            return Err(Error::configuration(
                "audio default sample_rate must be greater than 0",
            ));
        }
        let format = fields::normalize_format("format", &defaults.format)
            .map_err(|e| Error::configuration(format!("audio default {e}")))?;

        Ok(Self {
            defaults: AudioDefaults {
                start_offset: defaults.start_offset.abs(),
                format,
                ..defaults
            },
        })
    }

    /// The legacy defaults in use
    #[must_use]
    pub const fn defaults(&self) -> &AudioDefaults {
        &self.defaults
    }

    fn encode(
        key: &AudioKey,
        start_offset: f64,
        channel: u32,
        sample_rate: u32,
        format: &str,
    ) -> String {
        encode_name(
            &[
                key.id.hyphenated().to_string(),
                fields::render_offset(start_offset),
                fields::render_offset(key.end_offset),
                channel.to_string(),
                sample_rate.to_string(),
            ],
            format,
        )
    }

    /// Name the clip would have had if generated with the default parameters.
    ///
    /// `None` when the default start offset is not before the clip's end, as
    /// no such clip could have been generated.
    #[must_use]
    pub fn default_file_name(&self, key: &AudioKey) -> Option<String> {
        let d = &self.defaults;
        (d.start_offset < key.end_offset)
            .then(|| Self::encode(key, d.start_offset, d.channel, d.sample_rate, &d.format))
    }
}

impl KeySchema for AudioSchema {
    type Key = AudioKey;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Audio
    }

    fn validate(&self, params: &Params) -> Result<AudioKey> {
        let id = fields::recording_id(params, "id")?;
        let (start_offset, end_offset) = fields::offsets(params)?;
        let channel = fields::channel(params)?;
        let sample_rate = fields::sample_rate(params)?;
        let format = fields::format(params)?;

        Ok(AudioKey {
            id,
            start_offset,
            end_offset,
            channel,
            sample_rate,
            format,
        })
    }

    fn file_name(&self, key: &AudioKey) -> String {
        Self::encode(
            key,
            key.start_offset,
            key.channel,
            key.sample_rate,
            &key.format,
        )
    }

    fn file_names(&self, key: &AudioKey) -> Vec<String> {
        let exact = self.file_name(key);
        match self.default_file_name(key) {
            Some(legacy) if legacy != exact => vec![exact, legacy],
            _ => vec![exact],
        }
    }

    fn partial_path(&self, key: &AudioKey) -> String {
        fields::shard(&key.id)
    }

    fn decode(&self, file_name: &str) -> Result<AudioKey> {
        let (segments, format) = split_name(file_name, FIELD_COUNT)?;
        let params = Params::new()
            .with("id", segments[0])
            .with(
                "start_offset",
                fields::parse_offset(file_name, "start_offset", segments[1])?,
            )
            .with(
                "end_offset",
                fields::parse_offset(file_name, "end_offset", segments[2])?,
            )
            .with(
                "channel",
                fields::parse_integer(file_name, "channel", segments[3])?,
            )
            .with(
                "sample_rate",
                fields::parse_integer(file_name, "sample_rate", segments[4])?,
            )
            .with("format", format);
        self.validate(&params)
    }
}
