//! modcheck core library
//!
//! Building blocks for a golden-file regression workflow around a tracker
//! module player:
//!
//! - **Hex listings**: module fixtures frozen into source-embeddable text
//! - **Fingerprints**: content digests of rendered output, stored as sidecars
//! - **Conventions**: the file naming contract shared with the program under test
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use modcheck_core::{HarnessConfig, HashAlgorithm, Fingerprint};
//! use modcheck_core::fingerprint::verify;
//!
//! let config = HarnessConfig::default();
//! assert_eq!(config.output_path(Path::new("song.mod")), Path::new("song.mod.wav"));
//!
//! let expected = Fingerprint::parse("900150983cd24fb0d6963f7d28e17f72").unwrap();
//! let actual = HashAlgorithm::Md5.digest(b"abc");
//! assert!(verify(&expected, &actual).is_ok());
//! ```
//!
//! # Modules
//!
//! - [`config`]: Path conventions and hash algorithm selection
//! - [`error`]: Error taxonomy
//! - [`fingerprint`]: Digests and reference sidecar files
//! - [`listing`]: Hex array listing encoder
//! - [`report`]: Batch result accumulation

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod listing;
pub mod report;

// Re-export commonly used types at the crate root
pub use config::HarnessConfig;
pub use error::{ErrorKind, HarnessError};
pub use fingerprint::{Fingerprint, HashAlgorithm};
pub use listing::encode_listing;
pub use report::{BatchReport, FileResult};
