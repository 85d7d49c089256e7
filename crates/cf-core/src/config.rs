//! Detection configuration.
//!
//! There is no configuration file. Paths and disabled sources come from
//! the environment or are set directly by the caller:
//!
//! | Variable             | Effect                                   |
//! |----------------------|------------------------------------------|
//! | `CF_CPUINFO_PATH`    | cpuinfo file (default `/proc/cpuinfo`)   |
//! | `CF_AUXV_PATH`       | auxv file (default `/proc/self/auxv`)    |
//! | `CF_DISABLE_SOURCES` | comma or space separated source names    |

use crate::probe::{AuxvFile, CpuInfoProber, SourceKind};
use cf_common::Result;
use std::path::PathBuf;

pub const ENV_CPUINFO_PATH: &str = "CF_CPUINFO_PATH";
pub const ENV_AUXV_PATH: &str = "CF_AUXV_PATH";
pub const ENV_DISABLE_SOURCES: &str = "CF_DISABLE_SOURCES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectConfig {
    pub cpuinfo_path: PathBuf,
    pub auxv_path: PathBuf,
    /// Sources the pipeline skips.
    pub disabled: Vec<SourceKind>,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            cpuinfo_path: PathBuf::from(CpuInfoProber::DEFAULT_PATH),
            auxv_path: PathBuf::from(AuxvFile::DEFAULT_PATH),
            disabled: Vec::new(),
        }
    }
}

impl DetectConfig {
    /// Defaults overridden by the `CF_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`cf_common::Error::Config`] when `CF_DISABLE_SOURCES` names an
    /// unknown source.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_CPUINFO_PATH).filter(|v| !v.is_empty()) {
            config.cpuinfo_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_AUXV_PATH).filter(|v| !v.is_empty()) {
            config.auxv_path = PathBuf::from(path);
        }
        if let Some(list) = lookup(ENV_DISABLE_SOURCES) {
            config.disabled = parse_source_list(&list)?;
        }
        Ok(config)
    }

    pub fn with_cpuinfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cpuinfo_path = path.into();
        self
    }

    pub fn disable(mut self, source: SourceKind) -> Self {
        if !self.disabled.contains(&source) {
            self.disabled.push(source);
        }
        self
    }
}

fn parse_source_list(list: &str) -> Result<Vec<SourceKind>> {
    let mut sources = Vec::new();
    for name in list
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
    {
        let source: SourceKind = name.parse()?;
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_common::Error;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DetectConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config, DetectConfig::default());
        assert_eq!(config.cpuinfo_path, PathBuf::from("/proc/cpuinfo"));
        assert_eq!(config.auxv_path, PathBuf::from("/proc/self/auxv"));
        assert!(config.disabled.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = DetectConfig::from_lookup(env(&[
            ("CF_CPUINFO_PATH", "/tmp/cpuinfo"),
            ("CF_AUXV_PATH", ""),
            ("CF_DISABLE_SOURCES", "getauxval, auxv-file getauxval"),
        ]))
        .unwrap();
        assert_eq!(config.cpuinfo_path, PathBuf::from("/tmp/cpuinfo"));
        assert_eq!(config.auxv_path, PathBuf::from("/proc/self/auxv"));
        assert_eq!(
            config.disabled,
            vec![SourceKind::Getauxval, SourceKind::AuxvFile]
        );
    }

    #[test]
    fn test_unknown_source_is_config_error() {
        let err = DetectConfig::from_lookup(env(&[("CF_DISABLE_SOURCES", "cpuinfo,dmesg")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("dmesg")));
        assert_eq!(err.code(), 30);
    }

    #[test]
    fn test_builder() {
        let config = DetectConfig::default()
            .with_cpuinfo_path("fixtures/cpuinfo")
            .disable(SourceKind::Sysctl)
            .disable(SourceKind::Sysctl);
        assert_eq!(config.cpuinfo_path, PathBuf::from("fixtures/cpuinfo"));
        assert_eq!(config.disabled, vec![SourceKind::Sysctl]);
    }
}
