//! Error types for CPU capability detection.
//!
//! Only caller-facing misuse is ever reported as an error. Probing itself
//! never fails: an unreachable OS source degrades to "capability unsupported"
//! inside the snapshot and is recorded in provenance, not here.
//!
//! Every variant carries:
//! - A stable error code for machine parsing
//! - A category for grouping
//! - A remediation hint for humans
//!
//! ```text
//! ✗ Lookup Error
//!   Reason: capability 'vsx' is not defined for aarch64
//!   Fix: Run 'cf-core list --arch aarch64' to see the names this architecture defines.
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for capability detection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping used in JSON error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Registry and snapshot queries with a bad identifier.
    Lookup,
    /// Architecture or OS not handled by this build.
    Platform,
    /// Invalid environment or CLI configuration.
    Config,
    /// Reading inputs or writing JSON.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Lookup => write!(f, "lookup"),
            ErrorCategory::Platform => write!(f, "platform"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Lookup errors (10-19)
    /// The architecture's registry does not define the identifier.
    #[error("capability '{identifier}' is not defined for {arch}")]
    NotFound {
        identifier: String,
        arch: &'static str,
    },

    /// A scalar read was requested for a bit flag, or the reverse.
    #[error("'{identifier}' is not a {expected}")]
    NotApplicable {
        identifier: &'static str,
        expected: &'static str,
    },

    // Platform errors (20-29)
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (40-49)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code for this error.
    ///
    /// Codes never change once published; each category owns a range:
    /// - 10-19: Lookup errors
    /// - 20-29: Platform errors
    /// - 30-39: Configuration errors
    /// - 40-49: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::NotFound { .. } => 10,
            Error::NotApplicable { .. } => 11,
            Error::UnsupportedArchitecture(_) => 20,
            Error::Config(_) => 30,
            Error::Io(_) => 40,
            Error::Json(_) => 41,
        }
    }

    /// Category this error is reported under.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound { .. } | Error::NotApplicable { .. } => ErrorCategory::Lookup,
            Error::UnsupportedArchitecture(_) => ErrorCategory::Platform,
            Error::Config(_) => ErrorCategory::Config,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// One-line hint telling the user what to try next.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => {
                "Run 'cf-core list --arch <arch>' to see the names this architecture defines."
            }
            Error::NotApplicable { .. } => {
                "Use Snapshot::has for bit flags and Snapshot::scalar for scalar fields."
            }
            Error::UnsupportedArchitecture(_) => {
                "Pass --arch ppc or --arch aarch64 explicitly; this host is not a supported architecture."
            }
            Error::Config(_) => {
                "Check CF_DISABLE_SOURCES: valid names are getauxval, auxv-file, cpuinfo, sysctl."
            }
            Error::Io(_) => "Check that the input file exists and is readable.",
            Error::Json(_) => "Internal serialization failure; report as a bug.",
        }
    }

    /// Format the error for terminal output.
    pub fn format_human(&self) -> String {
        let headline = match self.category() {
            ErrorCategory::Lookup => "Lookup Error",
            ErrorCategory::Platform => "Platform Error",
            ErrorCategory::Config => "Configuration Error",
            ErrorCategory::Io => "I/O Error",
        };
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            headline,
            self,
            self.remediation()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_grouped_by_category() {
        let not_found = Error::NotFound {
            identifier: "vsx".to_string(),
            arch: "aarch64",
        };
        assert_eq!(not_found.code(), 10);
        assert_eq!(not_found.category(), ErrorCategory::Lookup);

        let not_applicable = Error::NotApplicable {
            identifier: "altivec",
            expected: "scalar field",
        };
        assert_eq!(not_applicable.code(), 11);
        assert_eq!(not_applicable.category(), ErrorCategory::Lookup);

        let config = Error::Config("bad source".into());
        assert_eq!(config.code(), 30);
        assert_eq!(config.category(), ErrorCategory::Config);

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.code(), 40);
        assert_eq!(io.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_error_display_names_identifier() {
        let err = Error::NotFound {
            identifier: "vsx".to_string(),
            arch: "aarch64",
        };
        assert_eq!(err.to_string(), "capability 'vsx' is not defined for aarch64");

        let err = Error::NotApplicable {
            identifier: "cpufamily",
            expected: "bit flag",
        };
        assert_eq!(err.to_string(), "'cpufamily' is not a bit flag");
    }

    #[test]
    fn test_format_human_includes_fix() {
        let err = Error::UnsupportedArchitecture("x86_64".into());
        let text = err.format_human();
        assert!(text.starts_with("✗ Platform Error"));
        assert!(text.contains("Reason: unsupported architecture: x86_64"));
        assert!(text.contains("Fix: "));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Lookup.to_string(), "lookup");
        assert_eq!(ErrorCategory::Io.to_string(), "io");
        let json = serde_json::to_string(&ErrorCategory::Platform).unwrap();
        assert_eq!(json, "\"platform\"");
    }
}
