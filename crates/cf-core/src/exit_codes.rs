//! Exit codes for the cf-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-9: Outcomes (`has` answers yes/no through 0/1)
//! - 10-19: User errors (bad arguments, unknown names)
//! - 20-29: Internal errors (I/O, serialization)

use cf_common::{Error, ErrorCategory};

/// Exit codes for cf-core operations.
///
/// These codes are a stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Outcomes (0-9)
    // ========================================================================
    /// Success; for `has`, the capability is present.
    Clean = 0,

    /// `has`: the capability is absent or its source was unavailable.
    Unsupported = 1,

    // ========================================================================
    // User Errors (10-19)
    // ========================================================================
    /// Invalid arguments or configuration.
    ArgsError = 10,

    /// Lookup misuse (scalar read of a flag and similar).
    LookupError = 11,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// I/O or serialization failure.
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10 and above.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Name used in JSON error output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::Unsupported => "OK_UNSUPPORTED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::LookupError => "ERR_LOOKUP",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }

    /// Exit code for an error surfaced by the library.
    ///
    /// Unknown names count as bad arguments: the user typed them.
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::NotFound { .. } | Error::UnsupportedArchitecture(_) => ExitCode::ArgsError,
            _ => match err.category() {
                ErrorCategory::Lookup => ExitCode::LookupError,
                ErrorCategory::Platform | ErrorCategory::Config => ExitCode::ArgsError,
                ErrorCategory::Io => ExitCode::InternalError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
