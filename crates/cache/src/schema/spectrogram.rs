//! Cached spectrogram images
//!
//! ```text
//! <id>_<start_offset>_<end_offset>_<channel>_<sample_rate>_<window>_<colour>.<format>
//! ```

use super::{ArtifactKind, KeySchema, encode_name, fields, split_name};
use crate::{Error, Params, Result};
use serde::Serialize;
use uuid::Uuid;

const FIELD_COUNT: usize = 7;

/// FFT window sizes the renderer supports
pub const WINDOW_SIZES: [u32; 6] = [128, 256, 512, 1024, 2048, 4096];

/// Validated key of one cached spectrogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrogramKey {
    id: Uuid,
    start_offset: f64,
    end_offset: f64,
    channel: u32,
    sample_rate: u32,
    window: u32,
    colour: char,
    format: String,
}

impl SpectrogramKey {
    /// Recording id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Start of the rendered segment, in seconds
    #[must_use]
    pub const fn start_offset(&self) -> f64 {
        self.start_offset
    }

    /// End of the rendered segment, in seconds
    #[must_use]
    pub const fn end_offset(&self) -> f64 {
        self.end_offset
    }

    /// Channel number
    #[must_use]
    pub const fn channel(&self) -> u32 {
        self.channel
    }

    /// Sample rate of the source audio in hertz
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// FFT window size
    #[must_use]
    pub const fn window(&self) -> u32 {
        self.window
    }

    /// Colour scheme code
    #[must_use]
    pub const fn colour(&self) -> char {
        self.colour
    }

    /// Normalized image format extension
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }
}

/// Schema for cached spectrograms
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectrogramSchema;

fn window(params: &Params) -> Result<u32> {
    let raw = params.require_i64("window")?;
    u32::try_from(raw)
        .ok()
        .filter(|w| WINDOW_SIZES.contains(w))
        .ok_or_else(|| Error::out_of_range("window", format!("must be one of {WINDOW_SIZES:?}")))
}

fn colour(params: &Params) -> Result<char> {
    let raw = params.require_str("colour")?;
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_lowercase()),
        _ => Err(Error::malformed("colour", "expected a single ASCII letter")),
    }
}

impl KeySchema for SpectrogramSchema {
    type Key = SpectrogramKey;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Spectrogram
    }

    fn validate(&self, params: &Params) -> Result<SpectrogramKey> {
        let id = fields::recording_id(params, "id")?;
        let (start_offset, end_offset) = fields::offsets(params)?;
        Ok(SpectrogramKey {
            id,
            start_offset,
            end_offset,
            channel: fields::channel(params)?,
            sample_rate: fields::sample_rate(params)?,
            window: window(params)?,
            colour: colour(params)?,
            format: fields::format(params)?,
        })
    }

    fn file_name(&self, key: &SpectrogramKey) -> String {
        encode_name(
            &[
                key.id.hyphenated().to_string(),
                fields::render_offset(key.start_offset),
                fields::render_offset(key.end_offset),
                key.channel.to_string(),
                key.sample_rate.to_string(),
                key.window.to_string(),
                key.colour.to_string(),
            ],
            &key.format,
        )
    }

    fn partial_path(&self, key: &SpectrogramKey) -> String {
        fields::shard(&key.id)
    }

    fn decode(&self, file_name: &str) -> Result<SpectrogramKey> {
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
            .with(
                "window",
                fields::parse_integer(file_name, "window", segments[5])?,
            )
            .with("colour", segments[6])
            .with("format", format);
        self.validate(&params)
    }
}
