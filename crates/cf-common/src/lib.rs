//! Shared types for CPU capability detection.
//!
//! This crate provides the foundational types shared by `cf-core` and its
//! command-line front end:
//! - The caller-facing error taxonomy with stable codes
//! - Output format selection

pub mod error;
pub mod output;

pub use error::{Error, ErrorCategory, Result};
pub use output::OutputFormat;
