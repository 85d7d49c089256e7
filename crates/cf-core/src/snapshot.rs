//! Immutable result of one probing run.

use crate::arch::Architecture;
use crate::bits;
use crate::registry::{CapabilityDescriptor, Identifier, Registry, ScalarDescriptor, ScalarId};
use cf_common::{Error, Result};

/// Capability words and scalar fields for one architecture.
///
/// A plain `Copy` value with no link back to the OS: queries are pure
/// functions of the stored words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    arch: Architecture,
    words: [u32; 2],
    scalars: [u32; ScalarId::COUNT],
}

impl Snapshot {
    /// The all-unsupported snapshot: every flag clear, every scalar zero.
    pub const fn unsupported(arch: Architecture) -> Self {
        Self {
            arch,
            words: [0; 2],
            scalars: [0; ScalarId::COUNT],
        }
    }

    /// Builds a snapshot from raw words. Bits the registry does not define
    /// are kept but never reported.
    pub const fn from_parts(
        arch: Architecture,
        words: [u32; 2],
        scalars: [u32; ScalarId::COUNT],
    ) -> Self {
        Self {
            arch,
            words,
            scalars,
        }
    }

    pub const fn arch(&self) -> Architecture {
        self.arch
    }

    pub const fn words(&self) -> [u32; 2] {
        self.words
    }

    pub fn registry(&self) -> &'static Registry {
        Registry::for_arch(self.arch)
    }

    /// True when the capability is present.
    ///
    /// Scalars count as present when non-zero. Identifiers of another
    /// architecture are never present.
    pub fn has(&self, id: impl Into<Identifier>) -> bool {
        match id.into() {
            Identifier::Flag(id) => self
                .registry()
                .lookup(id)
                .map(|desc| self.has_descriptor(desc))
                .unwrap_or(false),
            Identifier::Scalar(id) => self
                .registry()
                .lookup_scalar(id)
                .map(|_| self.scalars[id.index()] != 0)
                .unwrap_or(false),
        }
    }

    pub fn has_descriptor(&self, desc: &CapabilityDescriptor) -> bool {
        bits::has_mask(self.words[desc.word.index()], desc.mask)
    }

    /// Reads a scalar field.
    ///
    /// # Errors
    ///
    /// [`Error::NotApplicable`] for bit flags, [`Error::NotFound`] for
    /// scalars this architecture does not define.
    pub fn scalar(&self, id: impl Into<Identifier>) -> Result<u32> {
        match id.into() {
            Identifier::Flag(id) => Err(Error::NotApplicable {
                identifier: id.name(),
                expected: "scalar field",
            }),
            Identifier::Scalar(id) => {
                self.registry().lookup_scalar(id)?;
                Ok(self.scalars[id.index()])
            }
        }
    }

    /// Present flags, in registry order.
    pub fn enabled(&self) -> impl Iterator<Item = &'static CapabilityDescriptor> + '_ {
        self.registry()
            .all()
            .iter()
            .filter(move |desc| self.has_descriptor(desc))
    }

    /// Every scalar the architecture defines, with its value.
    pub fn scalar_values(&self) -> impl Iterator<Item = (&'static ScalarDescriptor, u32)> + '_ {
        self.registry()
            .scalars()
            .iter()
            .map(move |desc| (desc, self.scalars[desc.id.index()]))
    }
}
