//! Prober set for the OS this crate was built for.
//!
//! The pipeline is platform-agnostic; only this module knows which sources
//! exist on the target, and it decides that at compile time.

use crate::config::DetectConfig;
use crate::probe::{Prober, SourceKind};

#[cfg(any(target_os = "linux", target_os = "android"))]
use crate::probe::{AuxvFile, AuxvProber, CpuInfoProber, GetAuxval};

#[cfg(any(target_os = "macos", target_os = "ios"))]
use crate::probe::{Sysctl, SysctlProber};

#[cfg(any(target_os = "linux", target_os = "android"))]
const PROBER_COUNT: usize = 3;
#[cfg(any(target_os = "macos", target_os = "ios"))]
const PROBER_COUNT: usize = 1;
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
const PROBER_COUNT: usize = 0;

/// Host probers in priority order.
#[derive(Debug, Clone)]
pub struct HostProbers {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    getauxval: AuxvProber<GetAuxval>,
    #[cfg(any(target_os = "linux", target_os = "android"))]
    auxv_file: AuxvProber<AuxvFile>,
    #[cfg(any(target_os = "linux", target_os = "android"))]
    cpuinfo: CpuInfoProber,
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    sysctl: SysctlProber<Sysctl>,
}

impl HostProbers {
    /// Sources probed on this OS, in order.
    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub const SOURCES: [SourceKind; PROBER_COUNT] = [
        SourceKind::Getauxval,
        SourceKind::AuxvFile,
        SourceKind::Cpuinfo,
    ];
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    pub const SOURCES: [SourceKind; PROBER_COUNT] = [SourceKind::Sysctl];
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios"
    )))]
    pub const SOURCES: [SourceKind; PROBER_COUNT] = [];

    #[allow(unused_variables)]
    pub fn new(config: &DetectConfig) -> Self {
        Self {
            #[cfg(any(target_os = "linux", target_os = "android"))]
            getauxval: AuxvProber::new(GetAuxval),
            #[cfg(any(target_os = "linux", target_os = "android"))]
            auxv_file: AuxvProber::new(AuxvFile::new(&config.auxv_path)),
            #[cfg(any(target_os = "linux", target_os = "android"))]
            cpuinfo: CpuInfoProber::new(&config.cpuinfo_path),
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            sysctl: SysctlProber::new(Sysctl),
        }
    }

    /// The probers as trait objects, in [`Self::SOURCES`] order.
    pub fn probers(&self) -> [&dyn Prober; PROBER_COUNT] {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        {
            [&self.getauxval, &self.auxv_file, &self.cpuinfo]
        }
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        {
            [&self.sysctl]
        }
        #[cfg(not(any(
            target_os = "linux",
            target_os = "android",
            target_os = "macos",
            target_os = "ios"
        )))]
        {
            []
        }
    }
}
