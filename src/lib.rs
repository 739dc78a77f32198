//! video-weaver library crate.
//!
//! This module exposes the internal components for the CLI binary and for
//! integration testing.

pub mod config;
pub mod veo;
