//! modcheck End-to-End Test Infrastructure
//!
//! This crate drives the real harness code against a real child process:
//!
//! - Encoding: module fixtures -> hex array listings
//! - Hashing: expected outputs -> reference sidecars
//! - **Regression**: program under test -> output -> fingerprint verdict
//!
//! The program under test is `stub-render`, a tiny deterministic renderer
//! built from [`stub`]. Integration tests locate it with
//! `env!("CARGO_BIN_EXE_stub-render")`.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p modcheck-tests
//! ```

pub mod fixtures;
pub mod stub;

// Re-export commonly used items
pub use fixtures::Workspace;
pub use stub::{render_wav, Directive};
