//! PowerPC capability table.
//!
//! Word 0 carries the Linux `PPC_FEATURE_*` bits (`AT_HWCAP`), word 1 the
//! `PPC_FEATURE2_*` bits (`AT_HWCAP2`). `g5` has no kernel bit; it sits in
//! the unused word-0 bit `0x20` and is only derived from Darwin's
//! `hw.cpusubtype`.

use super::{
    CapabilityDescriptor, CapabilityId, Derivation, Identifier, NamedValueKey, ScalarDescriptor,
    ScalarId, ScalarKind, TextKeys, Word,
};

/// PowerPC bit-flag capabilities, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PpcFeature {
    Ppc32,
    Ppc64,
    Ppc601Instr,
    Altivec,
    Fpu,
    Mmu,
    Mac4xx,
    UnifiedCache,
    Spe,
    EfpSingle,
    EfpDouble,
    NoTb,
    G5,
    Power4,
    Power5,
    Power5Plus,
    Cell,
    Booke,
    Smt,
    IcacheSnoop,
    Arch205,
    Pa6t,
    Dfp,
    Power6Ext,
    Arch206,
    Vsx,
    PerfmonCompat,
    TrueLe,
    Le,
    Arch207,
    Htm,
    Dscr,
    Ebb,
    Isel,
    Tar,
    VecCrypto,
    HtmNosc,
    Arch300,
    Ieee128,
    Darn,
    Scv,
    HtmNoSuspend,
}

/// Darwin `CPU_TYPE_POWERPC`.
const CPU_TYPE_POWERPC: u32 = 18;
/// Darwin `CPU_TYPE_POWERPC64` (`CPU_TYPE_POWERPC | CPU_ARCH_ABI64`).
const CPU_TYPE_POWERPC64: u32 = CPU_TYPE_POWERPC | 0x0100_0000;
/// Darwin `CPU_SUBTYPE_POWERPC_970`, the G5.
const CPU_SUBTYPE_POWERPC_970: u32 = 100;

const fn hwcap(id: PpcFeature, name: &'static str, mask: u32) -> CapabilityDescriptor {
    CapabilityDescriptor {
        id: CapabilityId::Ppc(id),
        name,
        word: Word::Hwcap,
        mask,
    }
}

const fn hwcap2(id: PpcFeature, name: &'static str, mask: u32) -> CapabilityDescriptor {
    CapabilityDescriptor {
        id: CapabilityId::Ppc(id),
        name,
        word: Word::Hwcap2,
        mask,
    }
}

pub(super) const FLAGS: [CapabilityDescriptor; 42] = [
    hwcap(PpcFeature::Ppc32, "ppc32", 0x8000_0000),
    hwcap(PpcFeature::Ppc64, "ppc64", 0x4000_0000),
    hwcap(PpcFeature::Ppc601Instr, "ppc601", 0x2000_0000),
    hwcap(PpcFeature::Altivec, "altivec", 0x1000_0000),
    hwcap(PpcFeature::Fpu, "fpu", 0x0800_0000),
    hwcap(PpcFeature::Mmu, "mmu", 0x0400_0000),
    hwcap(PpcFeature::Mac4xx, "4xxmac", 0x0200_0000),
    hwcap(PpcFeature::UnifiedCache, "unified_cache", 0x0100_0000),
    hwcap(PpcFeature::Spe, "spe", 0x0080_0000),
    hwcap(PpcFeature::EfpSingle, "efp_single", 0x0040_0000),
    hwcap(PpcFeature::EfpDouble, "efp_double", 0x0020_0000),
    hwcap(PpcFeature::NoTb, "no_tb", 0x0010_0000),
    hwcap(PpcFeature::G5, "g5", 0x0000_0020),
    hwcap(PpcFeature::Power4, "power4", 0x0008_0000),
    hwcap(PpcFeature::Power5, "power5", 0x0004_0000),
    hwcap(PpcFeature::Power5Plus, "power5_plus", 0x0002_0000),
    hwcap(PpcFeature::Cell, "cell", 0x0001_0000),
    hwcap(PpcFeature::Booke, "booke", 0x0000_8000),
    hwcap(PpcFeature::Smt, "smt", 0x0000_4000),
    hwcap(PpcFeature::IcacheSnoop, "icache_snoop", 0x0000_2000),
    hwcap(PpcFeature::Arch205, "arch_2_05", 0x0000_1000),
    hwcap(PpcFeature::Pa6t, "pa6t", 0x0000_0800),
    hwcap(PpcFeature::Dfp, "dfp", 0x0000_0400),
    hwcap(PpcFeature::Power6Ext, "power6_ext", 0x0000_0200),
    hwcap(PpcFeature::Arch206, "isa_2_06", 0x0000_0100),
    hwcap(PpcFeature::Vsx, "vsx", 0x0000_0080),
    hwcap(PpcFeature::PerfmonCompat, "perfmon_compat", 0x0000_0040),
    hwcap(PpcFeature::TrueLe, "true_le", 0x0000_0002),
    hwcap(PpcFeature::Le, "le", 0x0000_0001),
    hwcap2(PpcFeature::Arch207, "isa_2_07", 0x8000_0000),
    hwcap2(PpcFeature::Htm, "htm", 0x4000_0000),
    hwcap2(PpcFeature::Dscr, "dscr", 0x2000_0000),
    hwcap2(PpcFeature::Ebb, "ebb", 0x1000_0000),
    hwcap2(PpcFeature::Isel, "isel", 0x0800_0000),
    hwcap2(PpcFeature::Tar, "tar", 0x0400_0000),
    hwcap2(PpcFeature::VecCrypto, "crypto", 0x0200_0000),
    hwcap2(PpcFeature::HtmNosc, "htm_nosc", 0x0100_0000),
    hwcap2(PpcFeature::Arch300, "arch_3_00", 0x0080_0000),
    hwcap2(PpcFeature::Ieee128, "ieee128", 0x0040_0000),
    hwcap2(PpcFeature::Darn, "darn", 0x0020_0000),
    hwcap2(PpcFeature::Scv, "scv", 0x0010_0000),
    hwcap2(PpcFeature::HtmNoSuspend, "htm_no_suspend", 0x0008_0000),
];

pub(super) const SCALARS: [ScalarDescriptor; 9] = [
    ScalarDescriptor {
        id: ScalarId::CpuType,
        kind: ScalarKind::Integer,
    },
    ScalarDescriptor {
        id: ScalarId::CpuSubtype,
        kind: ScalarKind::Integer,
    },
    ScalarDescriptor {
        id: ScalarId::CpuFamily,
        kind: ScalarKind::Integer,
    },
    ScalarDescriptor {
        id: ScalarId::GraphicsOps,
        kind: ScalarKind::Boolean,
    },
    ScalarDescriptor {
        id: ScalarId::Fsqrt,
        kind: ScalarKind::Boolean,
    },
    ScalarDescriptor {
        id: ScalarId::Stfiwx,
        kind: ScalarKind::Boolean,
    },
    ScalarDescriptor {
        id: ScalarId::Dcba,
        kind: ScalarKind::Boolean,
    },
    ScalarDescriptor {
        id: ScalarId::DataStreams,
        kind: ScalarKind::Boolean,
    },
    ScalarDescriptor {
        id: ScalarId::DcbtStreams,
        kind: ScalarKind::Boolean,
    },
];

const fn scalar_key(id: ScalarId, key: &'static std::ffi::CStr) -> NamedValueKey {
    NamedValueKey {
        target: Identifier::Scalar(id),
        key,
    }
}

const fn flag_key(id: PpcFeature, key: &'static std::ffi::CStr) -> NamedValueKey {
    NamedValueKey {
        target: Identifier::Flag(CapabilityId::Ppc(id)),
        key,
    }
}

/// Darwin `sysctlbyname` keys.
pub(super) const NAMED_VALUES: [NamedValueKey; 12] = [
    scalar_key(ScalarId::CpuType, c"hw.cputype"),
    scalar_key(ScalarId::CpuSubtype, c"hw.cpusubtype"),
    scalar_key(ScalarId::CpuFamily, c"hw.cpufamily"),
    flag_key(PpcFeature::Fpu, c"hw.optional.floatingpoint"),
    flag_key(PpcFeature::Altivec, c"hw.optional.altivec"),
    flag_key(PpcFeature::Ppc64, c"hw.optional.64bitops"),
    scalar_key(ScalarId::GraphicsOps, c"hw.optional.graphicsops"),
    scalar_key(ScalarId::Fsqrt, c"hw.optional.fsqrt"),
    scalar_key(ScalarId::Stfiwx, c"hw.optional.stfiwx"),
    scalar_key(ScalarId::Dcba, c"hw.optional.dcba"),
    scalar_key(ScalarId::DataStreams, c"hw.optional.datastreams"),
    scalar_key(ScalarId::DcbtStreams, c"hw.optional.dcbtstreams"),
];

pub(super) const DERIVATIONS: [Derivation; 3] = [
    Derivation {
        scalar: ScalarId::CpuSubtype,
        equals: CPU_SUBTYPE_POWERPC_970,
        flag: CapabilityId::Ppc(PpcFeature::G5),
    },
    Derivation {
        scalar: ScalarId::CpuType,
        equals: CPU_TYPE_POWERPC,
        flag: CapabilityId::Ppc(PpcFeature::Ppc32),
    },
    Derivation {
        scalar: ScalarId::CpuType,
        equals: CPU_TYPE_POWERPC64,
        flag: CapabilityId::Ppc(PpcFeature::Ppc64),
    },
];

pub(super) const TEXT_KEYS: TextKeys = TextKeys {
    flag_lists: &["flags", "features", "cpu features"],
    scalars: &[],
};
