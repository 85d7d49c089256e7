//! Serializable views of the registry and of detection results.
//!
//! Used by the CLI for JSON output and text rendering. Unlike the probing
//! path, reports are free to allocate.

use crate::arch::Architecture;
use crate::bits;
use crate::pipeline::{Detection, Provenance};
use crate::platform::PlatformStrings;
use crate::probe::ProbeStatus;
use crate::registry::{Registry, ScalarKind, Word};
use crate::snapshot::Snapshot;
use serde::Serialize;
use std::io::{self, Write};

fn hex(word: u32) -> String {
    format!("{:#010x}", word)
}

// ============================================================================
// Registry listing
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FlagEntry {
    pub name: &'static str,
    pub word: Word,
    pub bit: u32,
    pub mask: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScalarEntry {
    pub name: &'static str,
    pub kind: ScalarKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryReport {
    pub arch: Architecture,
    pub flags: Vec<FlagEntry>,
    pub scalars: Vec<ScalarEntry>,
}

impl RegistryReport {
    pub fn new(registry: &Registry) -> Self {
        Self {
            arch: registry.arch(),
            flags: registry
                .all()
                .iter()
                .map(|desc| FlagEntry {
                    name: desc.name,
                    word: desc.word,
                    bit: bits::bit_index(desc.mask),
                    mask: hex(desc.mask),
                })
                .collect(),
            scalars: registry
                .scalars()
                .iter()
                .map(|desc| ScalarEntry {
                    name: desc.name(),
                    kind: desc.kind,
                    value: None,
                })
                .collect(),
        }
    }

    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "# {} capabilities ({} flags)", self.arch, self.flags.len())?;
        for flag in &self.flags {
            let word = match flag.word {
                Word::Hwcap => "hwcap",
                Word::Hwcap2 => "hwcap2",
            };
            writeln!(out, "{:<16} {:<6} bit {:>2}  {}", flag.name, word, flag.bit, flag.mask)?;
        }
        if !self.scalars.is_empty() {
            writeln!(out)?;
            writeln!(out, "# scalar fields")?;
            for scalar in &self.scalars {
                let kind = match scalar.kind {
                    ScalarKind::Integer => "integer",
                    ScalarKind::Boolean => "boolean",
                };
                writeln!(out, "{:<16} {}", scalar.name, kind)?;
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} flags, {} scalar fields",
            self.arch,
            self.flags.len(),
            self.scalars.len()
        )
    }
}

// ============================================================================
// Detection result
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub arch: Architecture,
    pub enabled: Vec<&'static str>,
    pub words: [String; 2],
    pub scalars: Vec<ScalarEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformStrings>,
}

impl DetectionReport {
    pub fn new(snapshot: &Snapshot) -> Self {
        let words = snapshot.words();
        Self {
            arch: snapshot.arch(),
            enabled: snapshot.enabled().map(|desc| desc.name).collect(),
            words: [hex(words[0]), hex(words[1])],
            scalars: snapshot
                .scalar_values()
                .map(|(desc, value)| ScalarEntry {
                    name: desc.name(),
                    kind: desc.kind,
                    value: Some(value),
                })
                .collect(),
            provenance: None,
            platform: None,
        }
    }

    pub fn with_provenance(mut self, detection: &Detection) -> Self {
        self.provenance = Some(detection.provenance);
        self
    }

    pub fn with_platform(mut self, platform: PlatformStrings) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "arch:     {}", self.arch)?;
        writeln!(out, "hwcap:    {}", self.words[0])?;
        writeln!(out, "hwcap2:   {}", self.words[1])?;
        if self.enabled.is_empty() {
            writeln!(out, "enabled:  (none)")?;
        } else {
            writeln!(out, "enabled:  {}", self.enabled.join(" "))?;
        }
        for scalar in self.scalars.iter().filter(|s| s.value.unwrap_or(0) != 0) {
            writeln!(out, "{:<9} {:#x}", format!("{}:", scalar.name), scalar.value.unwrap_or(0))?;
        }
        if let Some(platform) = &self.platform {
            for (label, value) in [
                ("platform", &platform.platform),
                ("model", &platform.model),
                ("machine", &platform.machine),
                ("cpu", &platform.cpu),
                ("auxv platform", &platform.aux_platform),
                ("auxv base", &platform.aux_base_platform),
            ] {
                if !value.is_empty() {
                    writeln!(out, "{}: {}", label, value)?;
                }
            }
        }
        if let Some(provenance) = &self.provenance {
            writeln!(out)?;
            writeln!(out, "# sources")?;
            for record in provenance.iter() {
                match record.status {
                    ProbeStatus::Probed => writeln!(
                        out,
                        "{:<10} probed       +{} flags",
                        record.source,
                        record.flags_contributed[0].count_ones()
                            + record.flags_contributed[1].count_ones()
                    )?,
                    ProbeStatus::Unavailable(reason) => {
                        writeln!(out, "{:<10} unavailable  {}", record.source, reason)?
                    }
                }
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!("{}: {} capabilities", self.arch, self.enabled.len())
    }
}
