//! AArch64 capability table.
//!
//! Bits follow the Linux `HWCAP_*` / `HWCAP2_*` layout so auxiliary-vector
//! words can be used as-is after masking.

use super::{
    CapabilityDescriptor, CapabilityId, Identifier, NamedValueKey, ScalarDescriptor, ScalarId,
    ScalarKind, TextKeys, Word,
};
use std::ffi::CStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aarch64Feature {
    Fp,
    Asimd,
    Evtstrm,
    Aes,
    Pmull,
    Sha1,
    Sha2,
    Crc32,
    Atomics,
    Fphp,
    Asimdhp,
    Cpuid,
    Asimdrdm,
    Jscvt,
    Fcma,
    Lrcpc,
    Dcpop,
    Sha3,
    Sm3,
    Sm4,
    Asimddp,
    Sha512,
    Sve,
    Asimdfhm,
    Dit,
    Uscat,
    Ilrcpc,
    Flagm,
    Ssbs,
    Sb,
    Paca,
    Pacg,
    Dcpodp,
    Sve2,
    Sveaes,
    Svepmull,
    Svebitperm,
    Svesha3,
    Svesm4,
    Flagm2,
    Frint,
    Svei8mm,
    Svef32mm,
    Svef64mm,
    Svebf16,
    I8mm,
    Bf16,
    Dgh,
    Rng,
    Bti,
    Mte,
}

const fn hwcap(id: Aarch64Feature, name: &'static str, bit: u32) -> CapabilityDescriptor {
    CapabilityDescriptor {
        id: CapabilityId::Aarch64(id),
        name,
        word: Word::Hwcap,
        mask: 1 << bit,
    }
}

const fn hwcap2(id: Aarch64Feature, name: &'static str, bit: u32) -> CapabilityDescriptor {
    CapabilityDescriptor {
        id: CapabilityId::Aarch64(id),
        name,
        word: Word::Hwcap2,
        mask: 1 << bit,
    }
}

use Aarch64Feature as F;

pub(super) const FLAGS: [CapabilityDescriptor; 51] = [
    hwcap(F::Fp, "fp", 0),
    hwcap(F::Asimd, "asimd", 1),
    hwcap(F::Evtstrm, "evtstrm", 2),
    hwcap(F::Aes, "aes", 3),
    hwcap(F::Pmull, "pmull", 4),
    hwcap(F::Sha1, "sha1", 5),
    hwcap(F::Sha2, "sha2", 6),
    hwcap(F::Crc32, "crc32", 7),
    hwcap(F::Atomics, "atomics", 8),
    hwcap(F::Fphp, "fphp", 9),
    hwcap(F::Asimdhp, "asimdhp", 10),
    hwcap(F::Cpuid, "cpuid", 11),
    hwcap(F::Asimdrdm, "asimdrdm", 12),
    hwcap(F::Jscvt, "jscvt", 13),
    hwcap(F::Fcma, "fcma", 14),
    hwcap(F::Lrcpc, "lrcpc", 15),
    hwcap(F::Dcpop, "dcpop", 16),
    hwcap(F::Sha3, "sha3", 17),
    hwcap(F::Sm3, "sm3", 18),
    hwcap(F::Sm4, "sm4", 19),
    hwcap(F::Asimddp, "asimddp", 20),
    hwcap(F::Sha512, "sha512", 21),
    hwcap(F::Sve, "sve", 22),
    hwcap(F::Asimdfhm, "asimdfhm", 23),
    hwcap(F::Dit, "dit", 24),
    hwcap(F::Uscat, "uscat", 25),
    hwcap(F::Ilrcpc, "ilrcpc", 26),
    hwcap(F::Flagm, "flagm", 27),
    hwcap(F::Ssbs, "ssbs", 28),
    hwcap(F::Sb, "sb", 29),
    hwcap(F::Paca, "paca", 30),
    hwcap(F::Pacg, "pacg", 31),
    hwcap2(F::Dcpodp, "dcpodp", 0),
    hwcap2(F::Sve2, "sve2", 1),
    hwcap2(F::Sveaes, "sveaes", 2),
    hwcap2(F::Svepmull, "svepmull", 3),
    hwcap2(F::Svebitperm, "svebitperm", 4),
    hwcap2(F::Svesha3, "svesha3", 5),
    hwcap2(F::Svesm4, "svesm4", 6),
    hwcap2(F::Flagm2, "flagm2", 7),
    hwcap2(F::Frint, "frint", 8),
    hwcap2(F::Svei8mm, "svei8mm", 9),
    hwcap2(F::Svef32mm, "svef32mm", 10),
    hwcap2(F::Svef64mm, "svef64mm", 11),
    hwcap2(F::Svebf16, "svebf16", 12),
    hwcap2(F::I8mm, "i8mm", 13),
    hwcap2(F::Bf16, "bf16", 14),
    hwcap2(F::Dgh, "dgh", 15),
    hwcap2(F::Rng, "rng", 16),
    hwcap2(F::Bti, "bti", 17),
    hwcap2(F::Mte, "mte", 18),
];

const fn integer(id: ScalarId) -> ScalarDescriptor {
    ScalarDescriptor {
        id,
        kind: ScalarKind::Integer,
    }
}

pub(super) const SCALARS: [ScalarDescriptor; 8] = [
    integer(ScalarId::CpuType),
    integer(ScalarId::CpuSubtype),
    integer(ScalarId::CpuFamily),
    integer(ScalarId::Implementer),
    integer(ScalarId::Variant),
    integer(ScalarId::Part),
    integer(ScalarId::Revision),
    integer(ScalarId::CpuArchitecture),
];

const fn flag(id: Aarch64Feature, key: &'static CStr) -> NamedValueKey {
    NamedValueKey {
        target: Identifier::Flag(CapabilityId::Aarch64(id)),
        key,
    }
}

const fn scalar(id: ScalarId, key: &'static CStr) -> NamedValueKey {
    NamedValueKey {
        target: Identifier::Scalar(id),
        key,
    }
}

/// Darwin `sysctlbyname` keys (Apple silicon).
pub(super) const NAMED_VALUES: [NamedValueKey; 34] = [
    scalar(ScalarId::CpuType, c"hw.cputype"),
    scalar(ScalarId::CpuSubtype, c"hw.cpusubtype"),
    scalar(ScalarId::CpuFamily, c"hw.cpufamily"),
    flag(F::Fp, c"hw.optional.floatingpoint"),
    flag(F::Asimd, c"hw.optional.AdvSIMD"),
    flag(F::Aes, c"hw.optional.arm.FEAT_AES"),
    flag(F::Pmull, c"hw.optional.arm.FEAT_PMULL"),
    flag(F::Sha1, c"hw.optional.arm.FEAT_SHA1"),
    flag(F::Sha2, c"hw.optional.arm.FEAT_SHA256"),
    flag(F::Crc32, c"hw.optional.armv8_crc32"),
    flag(F::Atomics, c"hw.optional.arm.FEAT_LSE"),
    flag(F::Fphp, c"hw.optional.arm.FEAT_FP16"),
    flag(F::Asimdrdm, c"hw.optional.arm.FEAT_RDM"),
    flag(F::Jscvt, c"hw.optional.arm.FEAT_JSCVT"),
    flag(F::Fcma, c"hw.optional.arm.FEAT_FCMA"),
    flag(F::Lrcpc, c"hw.optional.arm.FEAT_LRCPC"),
    flag(F::Dcpop, c"hw.optional.arm.FEAT_DPB"),
    flag(F::Sha3, c"hw.optional.arm.FEAT_SHA3"),
    flag(F::Asimddp, c"hw.optional.arm.FEAT_DotProd"),
    flag(F::Sha512, c"hw.optional.arm.FEAT_SHA512"),
    flag(F::Asimdfhm, c"hw.optional.arm.FEAT_FHM"),
    flag(F::Dit, c"hw.optional.arm.FEAT_DIT"),
    flag(F::Uscat, c"hw.optional.arm.FEAT_LSE2"),
    flag(F::Ilrcpc, c"hw.optional.arm.FEAT_LRCPC2"),
    flag(F::Flagm, c"hw.optional.arm.FEAT_FlagM"),
    flag(F::Ssbs, c"hw.optional.arm.FEAT_SSBS"),
    flag(F::Sb, c"hw.optional.arm.FEAT_SB"),
    flag(F::Paca, c"hw.optional.arm.FEAT_PAuth"),
    flag(F::Dcpodp, c"hw.optional.arm.FEAT_DPB2"),
    flag(F::Flagm2, c"hw.optional.arm.FEAT_FlagM2"),
    flag(F::Frint, c"hw.optional.arm.FEAT_FRINTTS"),
    flag(F::I8mm, c"hw.optional.arm.FEAT_I8MM"),
    flag(F::Bf16, c"hw.optional.arm.FEAT_BF16"),
    flag(F::Bti, c"hw.optional.arm.FEAT_BTI"),
];

pub(super) const TEXT_KEYS: TextKeys = TextKeys {
    flag_lists: &["Features"],
    scalars: &[
        ("CPU implementer", ScalarId::Implementer),
        ("CPU variant", ScalarId::Variant),
        ("CPU part", ScalarId::Part),
        ("CPU revision", ScalarId::Revision),
        ("CPU architecture", ScalarId::CpuArchitecture),
    ],
};
