//! How a command renders its result on stdout.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Rendering selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned columns for a terminal
    #[default]
    Text,

    /// A single JSON document
    Json,

    /// One line, suitable for scripts that grep
    Summary,
}

impl OutputFormat {
    pub const fn name(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        }
    }

    /// JSON stdout implies JSON on stderr too.
    pub const fn is_machine(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_clap_values() {
        for format in OutputFormat::value_variants() {
            let value = format.to_possible_value().unwrap();
            assert_eq!(value.get_name(), format.name());
            assert_eq!(format.to_string(), format.name());
        }
        assert!(OutputFormat::Json.is_machine());
        assert!(!OutputFormat::Summary.is_machine());
    }
}
