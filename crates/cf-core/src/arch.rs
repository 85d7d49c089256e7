//! Architectures with a capability registry.

use cf_common::Error;
use serde::{Deserialize, Serialize};

/// CPU architecture family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// 32- and 64-bit PowerPC.
    Ppc,
    /// 64-bit Arm.
    Aarch64,
}

impl Architecture {
    /// All architectures this build knows about.
    pub const ALL: [Architecture; 2] = [Architecture::Ppc, Architecture::Aarch64];

    pub const fn name(self) -> &'static str {
        match self {
            Architecture::Ppc => "ppc",
            Architecture::Aarch64 => "aarch64",
        }
    }

    /// The architecture this binary was compiled for, if it has a registry.
    pub const fn host() -> Option<Architecture> {
        if cfg!(any(target_arch = "powerpc", target_arch = "powerpc64")) {
            Some(Architecture::Ppc)
        } else if cfg!(target_arch = "aarch64") {
            Some(Architecture::Aarch64)
        } else {
            None
        }
    }

    pub fn is_host(self) -> bool {
        Self::host() == Some(self)
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Architecture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ppc" | "ppc64" | "ppc64le" | "powerpc" | "powerpc64" => Ok(Architecture::Ppc),
            "aarch64" | "arm64" => Ok(Architecture::Aarch64),
            _ => Err(Error::UnsupportedArchitecture(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("ppc".parse::<Architecture>().unwrap(), Architecture::Ppc);
        assert_eq!("PowerPC64".parse::<Architecture>().unwrap(), Architecture::Ppc);
        assert_eq!("arm64".parse::<Architecture>().unwrap(), Architecture::Aarch64);
        assert!(matches!(
            "x86_64".parse::<Architecture>(),
            Err(Error::UnsupportedArchitecture(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for arch in Architecture::ALL {
            assert_eq!(arch.to_string().parse::<Architecture>().unwrap(), arch);
        }
    }

    #[test]
    fn test_host_matches_target_arch() {
        let expected = if cfg!(any(target_arch = "powerpc", target_arch = "powerpc64")) {
            Some(Architecture::Ppc)
        } else if cfg!(target_arch = "aarch64") {
            Some(Architecture::Aarch64)
        } else {
            None
        };
        assert_eq!(Architecture::host(), expected);
    }
}
