//! Capability sources.
//!
//! Each prober reads one OS source and returns a [`ProbeResult`]: a partial
//! snapshot holding the bits and scalars that source reported. A prober
//! never fails: an unreachable source yields
//! [`ProbeResult::unavailable`] and the reason travels into provenance.

pub mod auxv;
pub mod cpuinfo;
pub mod sysctl;

pub use auxv::{parse_auxv, AuxvFile, AuxvProber, AuxvSource, GetAuxval};
pub use cpuinfo::CpuInfoProber;
pub use sysctl::{NamedValueSource, Sysctl, SysctlProber};

use crate::bits;
use crate::registry::{CapabilityDescriptor, Registry, ScalarId};
use cf_common::Error;
use serde::Serialize;

// ============================================================================
// Source identity
// ============================================================================

/// The OS mechanism a prober reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// `getauxval(AT_HWCAP / AT_HWCAP2)`.
    Getauxval,
    /// `/proc/self/auxv` decoded directly.
    AuxvFile,
    /// `/proc/cpuinfo` style text.
    Cpuinfo,
    /// Darwin `sysctlbyname`.
    Sysctl,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Getauxval,
        SourceKind::AuxvFile,
        SourceKind::Cpuinfo,
        SourceKind::Sysctl,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SourceKind::Getauxval => "getauxval",
            SourceKind::AuxvFile => "auxv-file",
            SourceKind::Cpuinfo => "cpuinfo",
            SourceKind::Sysctl => "sysctl",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(format!("unknown capability source '{}'", s)))
    }
}

/// Why a source produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceUnavailable {
    /// The mechanism does not exist on this OS.
    NotSupportedOnOs,
    /// Every named-value query failed.
    QueryFailed,
    /// The source file does not exist.
    FileMissing,
    /// The source file exists but could not be opened.
    Unreadable,
    /// The text source has no line this architecture recognizes.
    MarkerAbsent,
    /// The auxiliary vector carried no capability words.
    EmptyWords,
    /// The host CPU is not the requested architecture.
    ForeignArchitecture,
    /// Turned off by configuration.
    Disabled,
}

impl SourceUnavailable {
    pub const fn describe(self) -> &'static str {
        match self {
            SourceUnavailable::NotSupportedOnOs => "not supported on this OS",
            SourceUnavailable::QueryFailed => "all queries failed",
            SourceUnavailable::FileMissing => "file missing",
            SourceUnavailable::Unreadable => "file unreadable",
            SourceUnavailable::MarkerAbsent => "no recognized capability line",
            SourceUnavailable::EmptyWords => "no capability words",
            SourceUnavailable::ForeignArchitecture => "host is a different architecture",
            SourceUnavailable::Disabled => "disabled",
        }
    }
}

impl std::fmt::Display for SourceUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ProbeStatus {
    Probed,
    Unavailable(SourceUnavailable),
}

impl ProbeStatus {
    pub fn is_probed(self) -> bool {
        matches!(self, ProbeStatus::Probed)
    }
}

// ============================================================================
// Probe result
// ============================================================================

/// Partial snapshot produced by one prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    /// Bits the source reported as present.
    pub words: [u32; 2],
    /// Scalar fields the source answered.
    pub scalars: [Option<u32>; ScalarId::COUNT],
}

impl ProbeResult {
    /// An empty result from a source that was reached.
    pub const fn probed() -> Self {
        Self {
            status: ProbeStatus::Probed,
            words: [0; 2],
            scalars: [None; ScalarId::COUNT],
        }
    }

    /// A result with every field unsupported.
    pub const fn unavailable(reason: SourceUnavailable) -> Self {
        Self {
            status: ProbeStatus::Unavailable(reason),
            ..Self::probed()
        }
    }

    /// Marks one flag present.
    pub fn set_flag(&mut self, desc: &CapabilityDescriptor) {
        let word = desc.word.index();
        self.words[word] = bits::set_mask(self.words[word], desc.mask);
    }

    /// Records a scalar; the first answer for a field is kept.
    pub fn set_scalar(&mut self, id: ScalarId, value: u32) {
        let slot = &mut self.scalars[id.index()];
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    pub fn scalar(&self, id: ScalarId) -> Option<u32> {
        self.scalars[id.index()]
    }

    pub fn is_available(&self) -> bool {
        self.status.is_probed()
    }

    pub fn has(&self, desc: &CapabilityDescriptor) -> bool {
        bits::has_mask(self.words[desc.word.index()], desc.mask)
    }
}

/// One capability source.
pub trait Prober {
    fn source(&self) -> SourceKind;

    /// Reads the source. Must not panic and must not allocate on the
    /// success path of the text and auxv sources.
    fn probe(&self, registry: &Registry) -> ProbeResult;
}
