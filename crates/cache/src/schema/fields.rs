//! Validation and rendering helpers shared by the schemas

use crate::{Error, Params, Result};
use uuid::Uuid;

/// Characters of the recording id used as the shard directory
pub(crate) const SHARD_WIDTH: usize = 2;

const HYPHENATED_UUID_LEN: usize = 36;

pub(crate) fn recording_id(params: &Params, field: &'static str) -> Result<Uuid> {
    let raw = params.require_str(field)?;
    if raw.len() != HYPHENATED_UUID_LEN {
        return Err(Error::malformed(field, "expected a hyphenated UUID"));
    }
    Uuid::try_parse(raw).map_err(|e| Error::malformed(field, format!("not a UUID ({e})")))
}

/// Leading characters of the hyphenated id.
pub(crate) fn shard(id: &Uuid) -> String {
    id.hyphenated().to_string()[..SHARD_WIDTH].to_string()
}

pub(crate) fn offsets(params: &Params) -> Result<(f64, f64)> {
    let start = params.require_f64("start_offset")?;
    if start < 0.0 {
        return Err(Error::out_of_range(
            "start_offset",
            "must be greater than or equal to 0",
        ));
    }
    let end = params.require_f64("end_offset")?;
    if end <= start {
        return Err(Error::out_of_range(
            "end_offset",
            format!("must be greater than start_offset ({start})"),
        ));
    }
    // `abs` folds -0.0 into 0.0 so the rendered name never carries a sign
    Ok((start.abs(), end))
}

pub(crate) fn channel(params: &Params) -> Result<u32> {
    let raw = params.require_i64("channel")?;
    u32::try_from(raw).map_err(|_| {
        Error::out_of_range("channel", "must be a non-negative 32-bit integer")
    })
}

pub(crate) fn sample_rate(params: &Params) -> Result<u32> {
    let raw = params.require_i64("sample_rate")?;
    match u32::try_from(raw) {
        Ok(rate) if rate > 0 => Ok(rate),
        _ => Err(Error::out_of_range(
            "sample_rate",
            "must be a positive 32-bit integer",
        )),
    }
}

pub(crate) fn positive_id(params: &Params, field: &'static str) -> Result<u64> {
    let raw = params.require_i64(field)?;
    match u64::try_from(raw) {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::out_of_range(field, "must be greater than 0")),
    }
}

pub(crate) fn format(params: &Params) -> Result<String> {
    normalize_format("format", params.require_str("format")?)
}

/// Strip leading dots, lower-case, and require ASCII letters and digits only.
pub(crate) fn normalize_format(field: &'static str, raw: &str) -> Result<String> {
    let trimmed = raw.trim_start_matches('.');
    if trimmed.is_empty() {
        return Err(Error::malformed(field, "extension is empty"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::malformed(
            field,
            "extension may only contain ASCII letters and digits",
        ));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Lower-cased token of ASCII letters, digits and `-`.
pub(crate) fn token(params: &Params, field: &'static str) -> Result<String> {
    let raw = params.require_str(field)?;
    if raw.is_empty() {
        return Err(Error::malformed(field, "must not be empty"));
    }
    if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::malformed(
            field,
            "may only contain ASCII letters, digits and '-'",
        ));
    }
    Ok(raw.to_ascii_lowercase())
}

/// Shortest decimal form that parses back to the same value, always with a
/// fractional part for ordinary magnitudes (`0.0`, `8.1`, `20.02`).
pub(crate) fn render_offset(value: f64) -> String {
    format!("{value:?}")
}

/// Parse an offset segment, accepting only the form [`render_offset`] emits.
pub(crate) fn parse_offset(name: &str, field: &'static str, segment: &str) -> Result<f64> {
    let value: f64 = segment
        .parse()
        .map_err(|_| Error::parse(name, format!("{field} '{segment}' is not a number")))?;
    if !value.is_finite() || render_offset(value) != segment {
        return Err(Error::parse(
            name,
            format!("{field} '{segment}' is not in canonical decimal form"),
        ));
    }
    Ok(value)
}

/// Parse an integer segment, accepting only plain decimal digits with an
/// optional leading `-` and no leading zeros.
pub(crate) fn parse_integer(name: &str, field: &'static str, segment: &str) -> Result<i64> {
    let value: i64 = segment
        .parse()
        .map_err(|_| Error::parse(name, format!("{field} '{segment}' is not an integer")))?;
    if value.to_string() != segment {
        return Err(Error::parse(
            name,
            format!("{field} '{segment}' is not in canonical integer form"),
        ));
    }
    Ok(value)
}
