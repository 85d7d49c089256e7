//! Capability registry.
//!
//! One static table per architecture maps every detectable capability to a
//! stable identifier, its canonical name and a bit inside one of the two
//! 32-bit capability words. The same table also carries the per-OS lookup
//! keys the probers use (sysctl names, cpuinfo markers), so a single place
//! decides what each source is asked for.
//!
//! Tables are `const` arrays checked by `const` assertions: every
//! mask is a single bit, no two rows share a bit, names are unique and row
//! order matches the identifier enum.

mod aarch64;
mod ppc;

pub use aarch64::Aarch64Feature;
pub use ppc::PpcFeature;

use crate::arch::Architecture;
use crate::bits;
use cf_common::{Error, Result};
use serde::{Serialize, Serializer};
use std::ffi::CStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Which capability word a bit lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Word {
    /// `AT_HWCAP` on Linux.
    Hwcap = 0,
    /// `AT_HWCAP2` on Linux.
    Hwcap2 = 1,
}

impl Word {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Stable identifier of a bit-flag capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityId {
    Ppc(PpcFeature),
    Aarch64(Aarch64Feature),
}

impl CapabilityId {
    pub const fn arch(self) -> Architecture {
        match self {
            CapabilityId::Ppc(_) => Architecture::Ppc,
            CapabilityId::Aarch64(_) => Architecture::Aarch64,
        }
    }

    /// Row of this identifier within its architecture's table.
    const fn ordinal(self) -> usize {
        match self {
            CapabilityId::Ppc(feature) => feature as usize,
            CapabilityId::Aarch64(feature) => feature as usize,
        }
    }

    /// Descriptor from the identifier's own architecture table.
    pub fn descriptor(self) -> &'static CapabilityDescriptor {
        &Registry::for_arch(self.arch()).flags[self.ordinal()]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl From<PpcFeature> for CapabilityId {
    fn from(feature: PpcFeature) -> Self {
        CapabilityId::Ppc(feature)
    }
}

impl From<Aarch64Feature> for CapabilityId {
    fn from(feature: Aarch64Feature) -> Self {
        CapabilityId::Aarch64(feature)
    }
}

impl Serialize for CapabilityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// How a scalar field should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// An integer code (CPU type, part number, ...).
    Integer,
    /// A 0/1 property not expressible as a registry bit.
    Boolean,
}

/// Stable identifier of a non-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarId {
    CpuType,
    CpuSubtype,
    CpuFamily,
    Implementer,
    Variant,
    Part,
    Revision,
    CpuArchitecture,
    GraphicsOps,
    Fsqrt,
    Stfiwx,
    Dcba,
    DataStreams,
    DcbtStreams,
}

impl ScalarId {
    pub const COUNT: usize = 14;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarId::CpuType => "cputype",
            ScalarId::CpuSubtype => "cpusubtype",
            ScalarId::CpuFamily => "cpufamily",
            ScalarId::Implementer => "implementer",
            ScalarId::Variant => "variant",
            ScalarId::Part => "part",
            ScalarId::Revision => "revision",
            ScalarId::CpuArchitecture => "architecture",
            ScalarId::GraphicsOps => "graphicsops",
            ScalarId::Fsqrt => "fsqrt",
            ScalarId::Stfiwx => "stfiwx",
            ScalarId::Dcba => "dcba",
            ScalarId::DataStreams => "datastreams",
            ScalarId::DcbtStreams => "dcbtstreams",
        }
    }
}

impl Serialize for ScalarId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Either kind of identifier accepted by the query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identifier {
    Flag(CapabilityId),
    Scalar(ScalarId),
}

impl Identifier {
    pub fn name(self) -> &'static str {
        match self {
            Identifier::Flag(id) => id.name(),
            Identifier::Scalar(id) => id.name(),
        }
    }
}

impl From<CapabilityId> for Identifier {
    fn from(id: CapabilityId) -> Self {
        Identifier::Flag(id)
    }
}

impl From<PpcFeature> for Identifier {
    fn from(feature: PpcFeature) -> Self {
        Identifier::Flag(feature.into())
    }
}

impl From<Aarch64Feature> for Identifier {
    fn from(feature: Aarch64Feature) -> Self {
        Identifier::Flag(feature.into())
    }
}

impl From<ScalarId> for Identifier {
    fn from(id: ScalarId) -> Self {
        Identifier::Scalar(id)
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// One registry row: identifier, display name and bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CapabilityDescriptor {
    pub id: CapabilityId,
    pub name: &'static str,
    pub word: Word,
    pub mask: u32,
}

/// Scalar field defined for an architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScalarDescriptor {
    pub id: ScalarId,
    pub kind: ScalarKind,
}

impl ScalarDescriptor {
    pub const fn name(&self) -> &'static str {
        self.id.name()
    }
}

/// A sysctl-style key and the field it answers.
#[derive(Debug, Clone, Copy)]
pub struct NamedValueKey {
    pub target: Identifier,
    pub key: &'static CStr,
}

/// A flag implied by a scalar taking a specific value.
#[derive(Debug, Clone, Copy)]
pub struct Derivation {
    pub scalar: ScalarId,
    pub equals: u32,
    pub flag: CapabilityId,
}

/// Keys recognized in line-oriented `key : value` text sources.
#[derive(Debug, Clone, Copy)]
pub struct TextKeys {
    /// Keys whose value is a whitespace-separated feature list
    /// (matched ASCII case-insensitively).
    pub flag_lists: &'static [&'static str],
    /// Keys whose value is a number for a scalar field.
    pub scalars: &'static [(&'static str, ScalarId)],
}

// ============================================================================
// Registry
// ============================================================================

/// Immutable capability table for one architecture.
#[derive(Debug)]
pub struct Registry {
    arch: Architecture,
    flags: &'static [CapabilityDescriptor],
    scalars: &'static [ScalarDescriptor],
    named_values: &'static [NamedValueKey],
    derivations: &'static [Derivation],
    text_keys: TextKeys,
}

static PPC_REGISTRY: Registry = Registry {
    arch: Architecture::Ppc,
    flags: &ppc::FLAGS,
    scalars: &ppc::SCALARS,
    named_values: &ppc::NAMED_VALUES,
    derivations: &ppc::DERIVATIONS,
    text_keys: ppc::TEXT_KEYS,
};

static AARCH64_REGISTRY: Registry = Registry {
    arch: Architecture::Aarch64,
    flags: &aarch64::FLAGS,
    scalars: &aarch64::SCALARS,
    named_values: &aarch64::NAMED_VALUES,
    derivations: &[],
    text_keys: aarch64::TEXT_KEYS,
};

const _: () = assert!(
    validate_flags(&ppc::FLAGS, Architecture::Ppc),
    "ppc capability table is inconsistent"
);
const _: () = assert!(
    validate_flags(&aarch64::FLAGS, Architecture::Aarch64),
    "aarch64 capability table is inconsistent"
);

impl Registry {
    /// The shared registry for `arch`.
    pub fn for_arch(arch: Architecture) -> &'static Registry {
        match arch {
            Architecture::Ppc => &PPC_REGISTRY,
            Architecture::Aarch64 => &AARCH64_REGISTRY,
        }
    }

    pub fn arch(&self) -> Architecture {
        self.arch
    }

    /// Every bit-flag capability, in table order.
    pub fn all(&self) -> &'static [CapabilityDescriptor] {
        self.flags
    }

    /// Scalar fields defined for this architecture.
    pub fn scalars(&self) -> &'static [ScalarDescriptor] {
        self.scalars
    }

    /// Resolve a bit-flag identifier.
    ///
    /// Fails with [`Error::NotFound`] for identifiers of another architecture.
    pub fn lookup(&self, id: CapabilityId) -> Result<&'static CapabilityDescriptor> {
        if id.arch() != self.arch {
            return Err(Error::NotFound {
                identifier: id.name().to_string(),
                arch: self.arch.name(),
            });
        }
        Ok(&self.flags[id.ordinal()])
    }

    /// Resolve a scalar identifier.
    pub fn lookup_scalar(&self, id: ScalarId) -> Result<&'static ScalarDescriptor> {
        self.scalars
            .iter()
            .find(|desc| desc.id == id)
            .ok_or_else(|| Error::NotFound {
                identifier: id.name().to_string(),
                arch: self.arch.name(),
            })
    }

    /// Resolve any identifier by its canonical name.
    pub fn lookup_name(&self, name: &str) -> Result<Identifier> {
        if let Some(desc) = self.find_by_name(name.as_bytes()) {
            return Ok(Identifier::Flag(desc.id));
        }
        if let Some(desc) = self.scalars.iter().find(|desc| desc.name() == name) {
            return Ok(Identifier::Scalar(desc.id));
        }
        Err(Error::NotFound {
            identifier: name.to_string(),
            arch: self.arch.name(),
        })
    }

    /// Exact, case-sensitive match of a flag name.
    pub fn find_by_name(&self, name: &[u8]) -> Option<&'static CapabilityDescriptor> {
        self.flags.iter().find(|desc| desc.name.as_bytes() == name)
    }

    /// OR of every mask defined in `word`.
    pub fn known_mask(&self, word: Word) -> u32 {
        self.flags
            .iter()
            .filter(|desc| desc.word == word)
            .fold(0, |acc, desc| bits::set_mask(acc, desc.mask))
    }

    pub fn named_values(&self) -> &'static [NamedValueKey] {
        self.named_values
    }

    pub fn derivations(&self) -> &'static [Derivation] {
        self.derivations
    }

    pub fn text_keys(&self) -> &TextKeys {
        &self.text_keys
    }
}

// ============================================================================
// Compile-time validation
// ============================================================================

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn validate_flags(table: &[CapabilityDescriptor], arch: Architecture) -> bool {
    let mut i = 0;
    while i < table.len() {
        let row = &table[i];
        if row.id.ordinal() != i || !bits::is_single_bit(row.mask) || row.name.is_empty() {
            return false;
        }
        if !matches!(
            (row.id, arch),
            (CapabilityId::Ppc(_), Architecture::Ppc)
                | (CapabilityId::Aarch64(_), Architecture::Aarch64)
        ) {
            return false;
        }
        let mut j = i + 1;
        while j < table.len() {
            let other = &table[j];
            let same_bit = other.word as usize == row.word as usize && other.mask == row.mask;
            if same_bit || str_eq(other.name, row.name) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}
