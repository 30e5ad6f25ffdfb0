//! Temporary fixture trees laid out the way a real checkout is.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use modcheck_core::fingerprint::write_reference;
use modcheck_core::{HarnessConfig, HashAlgorithm};

use crate::stub;

/// A scratch checkout with a `mod/` fixture directory and a `hash/`
/// reference directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create an empty workspace with both directories in place.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create work dir");
        fs::create_dir(dir.path().join("mod")).expect("Failed to create mod dir");
        fs::create_dir(dir.path().join("hash")).expect("Failed to create hash dir");
        Self { dir }
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory holding module fixtures.
    pub fn mods_dir(&self) -> PathBuf {
        self.path().join("mod")
    }

    /// Directory holding reference fingerprints.
    pub fn hash_dir(&self) -> PathBuf {
        self.path().join("hash")
    }

    /// Write a module fixture and return its path.
    pub fn write_module(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.mods_dir().join(name);
        fs::write(&path, data).expect("Failed to write module");
        path
    }

    /// Write the reference the stub renderer would produce for `data`.
    ///
    /// Panics for inputs the stub never renders.
    pub fn write_golden(&self, name: &str, data: &[u8]) -> PathBuf {
        let output = stub::expected_output(data).expect("input produces no output");
        let digest = HashAlgorithm::Md5.digest(&output);
        self.write_reference(name, &digest.to_string())
    }

    /// Write an arbitrary reference for module `name`.
    pub fn write_reference(&self, name: &str, hex: &str) -> PathBuf {
        let config = HarnessConfig::default();
        let output = config.output_path(&self.mods_dir().join(name));
        let reference = config
            .reference_path(&self.hash_dir(), &output)
            .expect("Failed to derive reference path");
        let fingerprint = hex.parse().expect("Invalid fingerprint");
        write_reference(&reference, &fingerprint).expect("Failed to write reference");
        reference
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
