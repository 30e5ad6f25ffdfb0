//! Content fingerprints used as the correctness oracle.
//!
//! A fingerprint is the lowercase hex digest of a file's full byte content.
//! The reference hasher and the regression runner must agree on the
//! algorithm; nothing else about the digest matters here.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Digest algorithm used for fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 128-bit MD5, compatible with existing `.md5` golden sets.
    #[default]
    Md5,
    /// 256-bit BLAKE3.
    Blake3,
}

impl HashAlgorithm {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Number of hex characters in a digest.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Blake3 => 64,
        }
    }

    /// Whether `fingerprint` has the length this algorithm produces.
    ///
    /// A wrong length can never match, which usually means the reference
    /// was made with a different algorithm.
    pub fn fits(&self, fingerprint: &Fingerprint) -> bool {
        fingerprint.as_str().len() == self.hex_len()
    }

    /// Fingerprint a byte buffer.
    pub fn digest(&self, data: &[u8]) -> Fingerprint {
        let hex = match self {
            HashAlgorithm::Md5 => format!("{:x}", md5::compute(data)),
            HashAlgorithm::Blake3 => blake3::hash(data).to_hex().to_string(),
        };
        Fingerprint(hex)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(HarnessError::Config(format!(
                "unknown hash algorithm '{}' (expected md5 or blake3)",
                other
            ))),
        }
    }
}

/// A digest in canonical form: non-empty lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse a digest string supplied by a user or read from a sidecar file.
    ///
    /// Surrounding whitespace is ignored and upper-case hex is accepted.
    /// Length is not checked against any algorithm; a digest of the wrong
    /// length is well-formed and simply never matches.
    pub fn parse(text: &str) -> Result<Self, HarnessError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(HarnessError::Config("fingerprint must not be empty".to_string()));
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(HarnessError::Config(format!(
                "fingerprint {:?} contains non-hex character {:?}",
                trimmed, bad
            )));
        }
        Ok(Fingerprint(trimmed.to_ascii_lowercase()))
    }

    /// Lowercase hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fingerprint::parse(s)
    }
}

/// Read a whole file and fingerprint it.
pub fn fingerprint_file(algorithm: HashAlgorithm, path: &Path) -> Result<Fingerprint, HarnessError> {
    let data = fs::read(path).map_err(|e| HarnessError::io(path, e))?;
    Ok(algorithm.digest(&data))
}

/// Compare a produced fingerprint against the golden one.
pub fn verify(expected: &Fingerprint, actual: &Fingerprint) -> Result<(), HarnessError> {
    if expected == actual {
        Ok(())
    } else {
        Err(HarnessError::Mismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Read a reference fingerprint sidecar.
pub fn read_reference(path: &Path) -> Result<Fingerprint, HarnessError> {
    let content = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    Fingerprint::parse(&content).map_err(|e| match e {
        HarnessError::Config(msg) => {
            HarnessError::Config(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Write a reference fingerprint sidecar, replacing any previous content.
///
/// The digest is written without a trailing newline.
pub fn write_reference(path: &Path, fingerprint: &Fingerprint) -> Result<(), HarnessError> {
    fs::write(path, fingerprint.as_str()).map_err(|e| HarnessError::io(path, e))
}
