//! Path conventions shared by the encoder, hasher and regression runner.
//!
//! The suffix contract between the program under test and the harness lives
//! here and nowhere else: the runner derives the produced output path with
//! [`HarnessConfig::output_path`], the hasher discovers outputs with
//! [`HarnessConfig::is_output`] and names sidecars with
//! [`HarnessConfig::reference_path`].

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::fingerprint::HashAlgorithm;

/// Naming and hashing conventions for a golden set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Extension of module fixtures, without the dot (default: `mod`)
    pub module_extension: String,
    /// Suffix appended to a module path for its hex listing (default: `.inc`)
    pub include_suffix: String,
    /// Extension the program under test appends to its input (default: `wav`)
    pub output_extension: String,
    /// Suffix appended to an output file name for its reference (default: `.md5`)
    pub hash_suffix: String,
    /// Directory holding reference fingerprints (default: `hash`)
    pub hash_directory: PathBuf,
    /// Digest used for fingerprints (default: `md5`)
    pub hash_algorithm: HashAlgorithm,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            module_extension: "mod".to_string(),
            include_suffix: ".inc".to_string(),
            output_extension: "wav".to_string(),
            hash_suffix: ".md5".to_string(),
            hash_directory: PathBuf::from("hash"),
            hash_algorithm: HashAlgorithm::Md5,
        }
    }
}

impl HarnessConfig {
    /// Parse a configuration from a JSON file.
    ///
    /// Fields absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_json(&content).map_err(|e| match e {
            HarnessError::Config(msg) => {
                HarnessError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, HarnessError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| HarnessError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every convention yields an unambiguous path.
    pub fn validate(&self) -> Result<(), HarnessError> {
        check_extension("module_extension", &self.module_extension)?;
        check_extension("output_extension", &self.output_extension)?;
        check_suffix("include_suffix", &self.include_suffix)?;
        check_suffix("hash_suffix", &self.hash_suffix)?;
        if self.hash_directory.as_os_str().is_empty() {
            return Err(HarnessError::Config(
                "hash_directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true if `path` names a module fixture.
    pub fn is_module(&self, path: &Path) -> bool {
        has_extension(path, &self.module_extension)
    }

    /// Returns true if `path` names an expected-output file.
    pub fn is_output(&self, path: &Path) -> bool {
        has_extension(path, &self.output_extension)
    }

    /// Hex listing destination for a module: `song.mod` -> `song.mod.inc`.
    pub fn include_path(&self, module: &Path) -> PathBuf {
        append(module, &self.include_suffix)
    }

    /// Output the program under test writes for `input`: `song.mod` -> `song.mod.wav`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        append(input, &format!(".{}", self.output_extension))
    }

    /// Reference fingerprint location for an output file:
    /// `mods/song.mod.wav` -> `<hash_dir>/song.mod.wav.md5`.
    pub fn reference_path(&self, hash_dir: &Path, output: &Path) -> Result<PathBuf, HarnessError> {
        let name = output.file_name().ok_or_else(|| {
            HarnessError::Config(format!("output path has no file name: {}", output.display()))
        })?;
        Ok(hash_dir.join(append(Path::new(name), &self.hash_suffix)))
    }
}

fn append(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn check_extension(field: &str, value: &str) -> Result<(), HarnessError> {
    if value.is_empty() {
        return Err(HarnessError::Config(format!("{} must not be empty", field)));
    }
    if value.starts_with('.') {
        return Err(HarnessError::Config(format!(
            "{} must not start with '.': {:?}",
            field, value
        )));
    }
    check_no_separator(field, value)
}

fn check_suffix(field: &str, value: &str) -> Result<(), HarnessError> {
    if value.is_empty() {
        return Err(HarnessError::Config(format!("{} must not be empty", field)));
    }
    check_no_separator(field, value)
}

fn check_no_separator(field: &str, value: &str) -> Result<(), HarnessError> {
    if value.contains('/') || value.contains('\\') {
        return Err(HarnessError::Config(format!(
            "{} must not contain a path separator: {:?}",
            field, value
        )));
    }
    Ok(())
}
