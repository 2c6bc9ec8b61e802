#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for prewarm.
//!
//! This crate provides pure helper types with no logging/tracing dependencies.
//! Logging is handled by the CLI crate to keep this library lightweight.

pub mod path;

pub use path::SlashPath;
