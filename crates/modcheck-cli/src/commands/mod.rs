//! CLI command implementations

pub mod check;
pub mod encode;
pub mod hash;
pub mod run;

mod reporting;

use anyhow::{Context, Result};
use modcheck_core::{HarnessConfig, HashAlgorithm};
use std::path::Path;

/// Exit status for a fingerprint mismatch or stale artifact.
pub const EXIT_TEST_FAILED: u8 = 1;
/// Exit status for harness-level failures (I/O, configuration, spawn).
pub const EXIT_HARNESS_ERROR: u8 = 2;

/// Build the effective configuration: defaults, then the optional JSON file,
/// then command-line overrides.
pub fn load_config(config_path: Option<&str>, hash_algorithm: Option<&str>) -> Result<HarnessConfig> {
    let mut config = match config_path {
        Some(path) => HarnessConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => HarnessConfig::default(),
    };

    if let Some(name) = hash_algorithm {
        config.hash_algorithm = name.parse::<HashAlgorithm>()?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn test_load_config_override_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("modcheck.json");
        fs::write(
            &path,
            r#"{"hash_algorithm": "blake3", "hash_suffix": ".b3"}"#,
        )
        .unwrap();

        let from_file = load_config(path.to_str(), None).unwrap();
        assert_eq!(from_file.hash_algorithm, HashAlgorithm::Blake3);
        assert_eq!(from_file.hash_suffix, ".b3");

        let overridden = load_config(path.to_str(), Some("md5")).unwrap();
        assert_eq!(overridden.hash_algorithm, HashAlgorithm::Md5);
        assert_eq!(overridden.hash_suffix, ".b3");
    }

    #[test]
    fn test_load_config_bad_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config(path.to_str(), None).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
