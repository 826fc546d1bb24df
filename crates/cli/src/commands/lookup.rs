//! Read-only lookups: configured roots, candidate paths, decoded names

use crate::errors::Result;
use baw_cache::{ArtifactCache, KeySchema, Params};
use std::io::Write;
use std::path::Path;

fn presence(path: &Path) -> &'static str {
    if path.exists() { "exists" } else { "missing" }
}

/// Print the configured roots in priority order
pub fn dirs<S: KeySchema>(cache: &ArtifactCache<S>, out: &mut dyn Write) -> Result<()> {
    let kind = cache.schema().kind();
    if cache.possible_dirs().is_empty() {
        writeln!(out, "No {kind} roots configured")?;
        return Ok(());
    }
    for dir in cache.possible_dirs() {
        writeln!(out, "{}\t{}", dir.display(), presence(dir))?;
    }
    Ok(())
}

/// Print the name, candidate paths and write target for the given parameters
pub fn paths<S: KeySchema>(
    cache: &ArtifactCache<S>,
    params: &Params,
    out: &mut dyn Write,
) -> Result<()> {
    let key = cache.validate(params)?;
    tracing::info!(kind = %cache.schema().kind(), "Resolving candidate paths");

    writeln!(out, "file name: {}", cache.file_name(&key))?;
    writeln!(out, "partial path: {}", cache.partial_path(&key))?;
    writeln!(out, "candidates:")?;
    for path in cache.possible_paths(&key) {
        writeln!(out, "  {}\t{}", path.display(), presence(&path))?;
    }
    let target = cache.write_path(&key)?;
    writeln!(out, "write target: {}", target.display())?;
    Ok(())
}

/// Decode a file path and print its key as JSON
pub fn parse<S: KeySchema>(
    cache: &ArtifactCache<S>,
    path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let key = cache.parse_file_path(path)?;
    serde_json::to_writer_pretty(&mut *out, &key)?;
    writeln!(out)?;
    Ok(())
}
