pub mod lookup;
pub mod scan;

use crate::errors::{CliError, Result};
use baw_cache::{ArtifactKind, CacheSet, Params, Settings};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Settings file looked up in the user config directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "baw-cache/settings.yml";

#[derive(Debug, Clone)]
pub enum Command {
    Dirs { kind: ArtifactKind },
    Paths { kind: ArtifactKind, params: Vec<String> },
    Parse { kind: ArtifactKind, path: PathBuf },
    Scan { kind: ArtifactKind },
}

/// Runs `$body` with `$cache` bound to the cache of the given kind
macro_rules! with_cache {
    ($caches:expr, $kind:expr, |$cache:ident| $body:expr) => {
        match $kind {
            ArtifactKind::Audio => {
                let $cache = &$caches.audio;
                $body
            }
            ArtifactKind::Spectrogram => {
                let $cache = &$caches.spectrogram;
                $body
            }
            ArtifactKind::Analysis => {
                let $cache = &$caches.analysis;
                $body
            }
            ArtifactKind::Dataset => {
                let $cache = &$caches.dataset;
                $body
            }
        }
    };
}

/// Execute a command against the configured caches, writing its output to `out`
#[instrument(name = "execute_command", skip(caches, out))]
pub fn execute(command: &Command, caches: &CacheSet, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Dirs { kind } => with_cache!(caches, *kind, |cache| lookup::dirs(cache, out)),
        Command::Paths { kind, params } => {
            let params = parse_params(params)?;
            with_cache!(caches, *kind, |cache| lookup::paths(cache, &params, out))
        }
        Command::Parse { kind, path } => {
            with_cache!(caches, *kind, |cache| lookup::parse(cache, path, out))
        }
        Command::Scan { kind } => with_cache!(caches, *kind, |cache| scan::scan(cache, out)),
    }
}

/// Load settings from the explicit path, or from the user config directory.
///
/// An explicit path must exist. Without one, a missing default file yields
/// settings with no roots configured.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(CliError::SettingsNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(Settings::load(path)?);
    }

    match dirs::config_dir().map(|dir| dir.join(DEFAULT_SETTINGS_FILE)) {
        Some(path) if path.is_file() => {
            tracing::debug!(path = %path.display(), "Using default settings file");
            Ok(Settings::load(&path)?)
        }
        _ => {
            tracing::warn!("No settings file found; every cache has an empty root list");
            Ok(Settings::default())
        }
    }
}

/// Turn `field=value` arguments into key parameters.
///
/// Values that read as JSON (numbers, booleans, quoted strings) keep their
/// JSON type; anything else is taken as a plain string.
pub fn parse_params(arguments: &[String]) -> Result<Params> {
    arguments
        .iter()
        .map(|argument| {
            let (field, raw) = argument
                .split_once('=')
                .filter(|(field, _)| !field.is_empty())
                .ok_or_else(|| CliError::invalid_argument(argument))?;
            let value = serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((field.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn caches_under(root: &Path) -> CacheSet {
        let yaml = format!(
            "paths:\n  cached_datasets: [{}]\n",
            root.join("datasets").display()
        );
        Settings::from_yaml_str(&yaml).unwrap().build().unwrap()
    }

    #[test]
    fn test_parse_params_types() {
        let params = parse_params(&[
            "id=5498633d-89a7-4b65-8f4a-96aa0c09c619".to_string(),
            "start_offset=8.1".to_string(),
            "channel=0".to_string(),
            "format=\"wav\"".to_string(),
            "result=".to_string(),
        ])
        .unwrap();

        assert_eq!(
            params.get("id"),
            Some(&Value::from("5498633d-89a7-4b65-8f4a-96aa0c09c619"))
        );
        assert_eq!(params.get("start_offset"), Some(&Value::from(8.1)));
        assert_eq!(params.get("channel"), Some(&Value::from(0)));
        assert_eq!(params.get("format"), Some(&Value::from("wav")));
        assert_eq!(params.get("result"), Some(&Value::from("")));
    }

    #[test]
    fn test_parse_params_rejects_bare_words() {
        for bad in ["channel", "=0"] {
            let err = parse_params(&[bad.to_string()]).unwrap_err();
            assert!(matches!(err, CliError::InvalidArgument { .. }), "{bad}");
        }
    }

    #[test]
    fn test_execute_dirs() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("datasets")).unwrap();
        let caches = caches_under(tmp.path());

        let mut out = Vec::new();
        execute(
            &Command::Dirs {
                kind: ArtifactKind::Dataset,
            },
            &caches,
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("exists"));
        assert!(out.contains(&tmp.path().join("datasets").display().to_string()));
    }

    #[test]
    fn test_execute_paths_reports_validation_error() {
        let tmp = TempDir::new().unwrap();
        let caches = caches_under(tmp.path());
        let mut out = Vec::new();
        let err = execute(
            &Command::Paths {
                kind: ArtifactKind::Dataset,
                params: vec!["saved_search_id=12".to_string(), "format=csv".to_string()],
            },
            &caches,
            &mut out,
        )
        .unwrap_err();
        match err {
            CliError::Cache(e) => assert_eq!(e.field(), Some("dataset_id")),
            other => panic!("expected cache error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_settings_explicit_missing() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.yml");
        let err = load_settings(Some(&missing)).unwrap_err();
        assert!(matches!(err, CliError::SettingsNotFound { .. }));
    }

    #[test]
    fn test_load_settings_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("settings.yml");
        std::fs::write(&file, "paths:\n  cached_audios: [audio]\n").unwrap();
        let settings = load_settings(Some(&file)).unwrap();
        assert_eq!(settings.paths.cached_audios, vec![tmp.path().join("audio")]);
    }
}
