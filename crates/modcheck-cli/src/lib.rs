//! modcheck CLI library.
//!
//! This crate provides the command implementations behind the `modcheck`
//! binary: the fixture encoder, the reference hasher, the single-case
//! regression runner and the batch regression check, together with the
//! process-invocation capability they share.

pub mod commands;
pub mod discover;
pub mod logging;
pub mod process;
