//! Ordered probe pipeline with first-wins merge.
//!
//! Probers run in priority order. A field set to a non-default value by an
//! earlier source is never overwritten: set bits are never cleared and a
//! non-zero scalar is kept. A later source may only fill fields still at
//! their default. Fields no source set stay unsupported.

use crate::arch::Architecture;
use crate::config::DetectConfig;
use crate::host::HostProbers;
use crate::probe::{ProbeResult, ProbeStatus, Prober, SourceKind, SourceUnavailable};
use crate::registry::{Registry, ScalarId};
use crate::snapshot::Snapshot;
use serde::Serialize;
use tracing::{debug, trace};

/// Upper bound on records kept per run; one per prober plus a spare.
pub const MAX_SOURCES: usize = 8;

// ============================================================================
// Provenance
// ============================================================================

/// What one source contributed to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub source: SourceKind,
    #[serde(flatten)]
    pub status: ProbeStatus,
    /// Bits this source set that no earlier source had answered.
    pub flags_contributed: [u32; 2],
    /// Bit `i` set when this source supplied `ScalarId` index `i`.
    pub scalars_contributed: u32,
}

impl SourceRecord {
    pub fn contributed_scalar(&self, id: ScalarId) -> bool {
        self.scalars_contributed & (1 << id.index()) != 0
    }
}

/// Fixed-capacity list of [`SourceRecord`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    records: [Option<SourceRecord>; MAX_SOURCES],
    len: usize,
}

impl Provenance {
    pub const fn new() -> Self {
        Self {
            records: [None; MAX_SOURCES],
            len: 0,
        }
    }

    /// Appends a record; records past capacity are dropped.
    fn push(&mut self, record: SourceRecord) {
        if let Some(slot) = self.records.get_mut(self.len) {
            *slot = Some(record);
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records[..self.len].iter().flatten()
    }

    pub fn get(&self, source: SourceKind) -> Option<&SourceRecord> {
        self.iter().find(|record| record.source == source)
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Provenance {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A snapshot together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub snapshot: Snapshot,
    pub provenance: Provenance,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Runs probers against one registry.
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: &'static Registry,
    disabled: [bool; SourceKind::ALL.len()],
}

impl Pipeline {
    pub fn new(registry: &'static Registry) -> Self {
        Self {
            registry,
            disabled: [false; SourceKind::ALL.len()],
        }
    }

    /// Skips every prober reading `source`.
    pub fn disable(mut self, source: SourceKind) -> Self {
        self.disabled[source as usize] = true;
        self
    }

    pub fn is_disabled(&self, source: SourceKind) -> bool {
        self.disabled[source as usize]
    }

    /// Runs `probers` in order and merges their results.
    pub fn run(&self, probers: &[&dyn Prober]) -> Detection {
        let mut merged = Merge::new();
        let mut provenance = Provenance::new();

        for prober in probers {
            let source = prober.source();
            if self.is_disabled(source) {
                trace!(%source, "source disabled");
                provenance.push(SourceRecord {
                    source,
                    status: ProbeStatus::Unavailable(SourceUnavailable::Disabled),
                    flags_contributed: [0; 2],
                    scalars_contributed: 0,
                });
                continue;
            }

            let result = prober.probe(self.registry);
            if let ProbeStatus::Unavailable(reason) = result.status {
                debug!(%source, %reason, "capability source unavailable");
            }
            provenance.push(merged.absorb(source, &result));
        }

        let snapshot = Snapshot::from_parts(self.registry.arch(), merged.words, merged.scalars);
        debug!(
            arch = %self.registry.arch(),
            sources = provenance.len(),
            enabled = snapshot.enabled().count(),
            "capability detection complete"
        );
        Detection {
            snapshot,
            provenance,
        }
    }
}

/// Merge state.
struct Merge {
    words: [u32; 2],
    scalars: [u32; ScalarId::COUNT],
}

impl Merge {
    fn new() -> Self {
        Self {
            words: [0; 2],
            scalars: [0; ScalarId::COUNT],
        }
    }

    fn absorb(&mut self, source: SourceKind, result: &ProbeResult) -> SourceRecord {
        let mut record = SourceRecord {
            source,
            status: result.status,
            flags_contributed: [0; 2],
            scalars_contributed: 0,
        };
        if !result.is_available() {
            return record;
        }

        for word in 0..2 {
            let adopted = result.words[word] & !self.words[word];
            self.words[word] |= adopted;
            record.flags_contributed[word] = adopted;
        }

        for (index, value) in result.scalars.iter().enumerate() {
            if let Some(value) = *value {
                if self.scalars[index] == 0 && value != 0 {
                    self.scalars[index] = value;
                    record.scalars_contributed |= 1 << index;
                }
            }
        }
        record
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Detects capabilities for `arch` with the default configuration.
///
/// Never fails; an architecture other than the host's yields
/// [`Snapshot::unsupported`]. Each call probes again, so callers wanting a
/// single detection per process should cache the result themselves:
///
/// ```
/// use std::sync::OnceLock;
/// use cf_core::{detect, Architecture, Snapshot};
///
/// static CAPS: OnceLock<Snapshot> = OnceLock::new();
/// let caps = CAPS.get_or_init(|| detect(Architecture::Aarch64));
/// assert_eq!(caps.arch(), Architecture::Aarch64);
/// ```
pub fn detect(arch: Architecture) -> Snapshot {
    detect_with(arch, &DetectConfig::default()).snapshot
}

/// Detects capabilities for `arch` using `config` for paths and disabled
/// sources, returning provenance alongside the snapshot.
pub fn detect_with(arch: Architecture, config: &DetectConfig) -> Detection {
    let registry = Registry::for_arch(arch);
    let mut pipeline = Pipeline::new(registry);
    for source in config.disabled.iter().copied() {
        pipeline = pipeline.disable(source);
    }

    if !arch.is_host() {
        debug!(%arch, host = ?Architecture::host(), "not probing a foreign architecture");
        let mut provenance = Provenance::new();
        for source in HostProbers::SOURCES {
            let reason = if pipeline.is_disabled(source) {
                SourceUnavailable::Disabled
            } else {
                SourceUnavailable::ForeignArchitecture
            };
            provenance.push(SourceRecord {
                source,
                status: ProbeStatus::Unavailable(reason),
                flags_contributed: [0; 2],
                scalars_contributed: 0,
            });
        }
        return Detection {
            snapshot: Snapshot::unsupported(arch),
            provenance,
        };
    }

    let host = HostProbers::new(config);
    pipeline.run(&host.probers())
}
