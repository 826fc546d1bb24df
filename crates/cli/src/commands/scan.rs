use crate::errors::Result;
use baw_cache::{ArtifactCache, KeySchema, ScanEntry};
use std::io::Write;

/// Audit the existing roots and print a summary plus every entry needing attention
pub fn scan<S: KeySchema>(cache: &ArtifactCache<S>, out: &mut dyn Write) -> Result<()> {
    let report = cache.scan()?;
    let counts = report.counts();

    writeln!(
        out,
        "{} cache: {} root(s) scanned, {} cached, {} misplaced, {} foreign, {} invalid",
        cache.schema().kind(),
        report.roots.len(),
        counts.cached,
        counts.misplaced,
        counts.foreign,
        counts.invalid
    )?;

    for entry in &report.entries {
        match entry {
            ScanEntry::Cached { .. } => {}
            ScanEntry::Misplaced { path, expected, .. } => writeln!(
                out,
                "misplaced\t{}\texpected {}",
                path.display(),
                expected.display()
            )?,
            ScanEntry::Foreign { path, reason } => {
                writeln!(out, "foreign\t{}\t{reason}", path.display())?;
            }
            ScanEntry::Invalid { path, reason } => {
                writeln!(out, "invalid\t{}\t{reason}", path.display())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use baw_cache::{DatasetCache, DatasetSchema, StorageRoots};
    use tempfile::TempDir;

    #[test]
    fn test_scan_output() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("12_34.csv"), b"a,b").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"hello").unwrap();
        std::fs::create_dir(tmp.path().join("old")).unwrap();
        std::fs::write(tmp.path().join("old").join("12_35.csv"), b"a,b").unwrap();

        let cache = DatasetCache::new(StorageRoots::new([tmp.path()]).unwrap(), DatasetSchema);
        let mut out = Vec::new();
        scan(&cache, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "dataset cache: 1 root(s) scanned, 1 cached, 1 misplaced, 1 foreign, 0 invalid"
        );
        assert_eq!(lines.len(), 3);
        assert!(out.contains(&format!(
            "misplaced\t{}\texpected {}",
            tmp.path().join("old").join("12_35.csv").display(),
            tmp.path().join("12_35.csv").display()
        )));
        assert!(out.contains("foreign\t"));
        assert!(!out.contains("12_34.csv"));
    }
}
