//! Where the logger's level and format come from.
//!
//! Each layer overrides the one before it:
//! 1. built-in defaults (warn, human, no timestamps)
//! 2. `RUST_LOG`, consulted for a level only when `CF_LOG` is unset
//! 3. `CF_LOG`, `CF_LOG_FORMAT`, `CF_LOG_TIMESTAMPS`
//! 4. CLI flags (`-v`, `-q`, `--format`)

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

pub const ENV_LOG: &str = "CF_LOG";
pub const ENV_LOG_FORMAT: &str = "CF_LOG_FORMAT";
pub const ENV_LOG_TIMESTAMPS: &str = "CF_LOG_TIMESTAMPS";

/// How log events are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub const fn name(self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Json => "json",
        }
    }

    fn from_alias(alias: &str) -> Option<Self> {
        let format = match alias {
            "human" | "text" | "pretty" | "console" => LogFormat::Human,
            "json" | "jsonl" | "structured" => LogFormat::Json,
            _ => return None,
        };
        Some(format)
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alias(&s.to_ascii_lowercase()).ok_or_else(|| format!("no log format named '{s}'"))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Minimum severity that reaches the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Most verbose first, paired with the filter each maps to.
    const TABLE: [(LogLevel, &'static str, LevelFilter); 6] = [
        (LogLevel::Trace, "trace", LevelFilter::TRACE),
        (LogLevel::Debug, "debug", LevelFilter::DEBUG),
        (LogLevel::Info, "info", LevelFilter::INFO),
        (LogLevel::Warn, "warn", LevelFilter::WARN),
        (LogLevel::Error, "error", LevelFilter::ERROR),
        (LogLevel::Off, "off", LevelFilter::OFF),
    ];

    pub const fn name(self) -> &'static str {
        Self::TABLE[self as usize].1
    }

    /// Level for `-v` repeated `verbose` times, or `-q`.
    pub fn from_flags(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    /// Most verbose level mentioned anywhere in a `RUST_LOG` directive.
    fn sniff_directive(directive: &str) -> Option<Self> {
        let directive = directive.to_ascii_lowercase();
        Self::TABLE
            .iter()
            .filter(|(level, _, _)| !matches!(level, LogLevel::Warn | LogLevel::Off))
            .find(|(_, name, _)| directive.contains(name))
            .map(|&(level, _, _)| level)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        let canonical = match lowered.as_str() {
            "warning" => "warn",
            "none" | "quiet" => "off",
            other => other,
        };
        Self::TABLE
            .iter()
            .find(|(_, name, _)| *name == canonical)
            .map(|&(level, _, _)| level)
            .ok_or_else(|| format!("no log level named '{s}'"))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LogLevel::TABLE[level as usize].2
    }
}

/// Resolved logger settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Prefix human output with a timestamp.
    pub timestamps: bool,
}

impl LogConfig {
    /// Layer the process environment under the CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), cli_level, cli_format)
    }

    /// Same as [`Self::from_env`] with an explicit variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let env_level = match lookup(ENV_LOG) {
            Some(val) => val.parse().ok(),
            None => lookup("RUST_LOG").as_deref().and_then(LogLevel::sniff_directive),
        };
        let env_format = lookup(ENV_LOG_FORMAT).and_then(|val| val.parse().ok());
        let timestamps = lookup(ENV_LOG_TIMESTAMPS)
            .is_some_and(|val| matches!(val.trim(), "1" | "true" | "yes" | "on"));

        let defaults = LogConfig::default();
        LogConfig {
            level: cli_level.or(env_level).unwrap_or(defaults.level),
            format: cli_format.or(env_format).unwrap_or(defaults.format),
            timestamps,
        }
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        LogConfig { format, ..self }
    }

    pub fn with_level(self, level: LogLevel) -> Self {
        LogConfig { level, ..self }
    }
}
