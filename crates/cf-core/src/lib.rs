//! CPU capability detection.
//!
//! This library answers "does the running CPU/OS combination support
//! capability X?" for PowerPC and AArch64:
//! - A static capability registry per architecture
//! - OS-specific probers (auxiliary vector, cpuinfo text, Darwin sysctl)
//! - A first-wins probe pipeline producing an immutable [`Snapshot`]
//! - Allocation-free text scanning used by the probers
//!
//! ```
//! use cf_core::{detect, Architecture, PpcFeature};
//!
//! let caps = detect(Architecture::Ppc);
//! if caps.has(PpcFeature::Altivec) {
//!     // vector path
//! }
//! ```
//!
//! The binary entry point is in `main.rs`.

pub mod arch;
pub mod bits;
pub mod config;
pub mod exit_codes;
pub mod host;
pub mod logging;
pub mod pipeline;
pub mod platform;
pub mod probe;
pub mod registry;
pub mod report;
pub mod scan;
pub mod snapshot;

pub use arch::Architecture;
pub use config::DetectConfig;
pub use pipeline::{detect, detect_with, Detection, Pipeline, Provenance, SourceRecord};
pub use probe::{ProbeResult, ProbeStatus, Prober, SourceKind, SourceUnavailable};
pub use registry::{
    Aarch64Feature, CapabilityDescriptor, CapabilityId, Identifier, PpcFeature, Registry,
    ScalarId, Word,
};
pub use snapshot::Snapshot;
