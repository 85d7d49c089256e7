//! Named-value query prober (Darwin `sysctlbyname`).

use super::{ProbeResult, Prober, SourceKind, SourceUnavailable};
use crate::registry::{Identifier, Registry};
use std::ffi::CStr;
use tracing::{debug, trace};

/// Something that answers `key -> integer` queries.
pub trait NamedValueSource {
    /// Returns `None` when the key does not exist or the query failed.
    fn query(&self, key: &CStr) -> Option<i32>;
}

/// The real `sysctlbyname(3)`. Answers nothing outside Apple platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sysctl;

impl NamedValueSource for Sysctl {
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    fn query(&self, key: &CStr) -> Option<i32> {
        let mut value: libc::c_int = 0;
        let mut size = std::mem::size_of::<libc::c_int>();
        // SAFETY: `key` is NUL-terminated, `value`/`size` describe a valid
        // c_int-sized output buffer and no new value is written.
        let rc = unsafe {
            libc::sysctlbyname(
                key.as_ptr(),
                (&mut value as *mut libc::c_int).cast::<libc::c_void>(),
                &mut size,
                std::ptr::null_mut(),
                0,
            )
        };
        (rc == 0 && size == std::mem::size_of::<libc::c_int>()).then_some(value)
    }

    #[cfg(not(any(target_os = "macos", target_os = "ios")))]
    fn query(&self, _key: &CStr) -> Option<i32> {
        None
    }
}

/// Queries every named value the registry lists.
///
/// An absent key means the capability is absent; only a source that
/// answers no key at all is reported unavailable.
#[derive(Debug, Clone, Default)]
pub struct SysctlProber<Q = Sysctl> {
    source: Q,
}

impl<Q: NamedValueSource> SysctlProber<Q> {
    pub fn new(source: Q) -> Self {
        Self { source }
    }
}

impl<Q: NamedValueSource> Prober for SysctlProber<Q> {
    fn source(&self) -> SourceKind {
        SourceKind::Sysctl
    }

    fn probe(&self, registry: &Registry) -> ProbeResult {
        let mut result = ProbeResult::probed();
        let mut answered = 0usize;

        for entry in registry.named_values() {
            let Some(value) = self.source.query(entry.key) else {
                trace!(key = ?entry.key, "named value absent");
                continue;
            };
            answered += 1;
            let value = value as u32;
            match entry.target {
                Identifier::Flag(id) => match registry.lookup(id) {
                    Ok(desc) if value != 0 => result.set_flag(desc),
                    _ => {}
                },
                Identifier::Scalar(id) => {
                    if registry.lookup_scalar(id).is_ok() {
                        result.set_scalar(id, value);
                    }
                }
            }
        }

        if answered == 0 {
            debug!(arch = %registry.arch(), "sysctl answered no keys");
            return ProbeResult::unavailable(SourceUnavailable::QueryFailed);
        }

        for derivation in registry.derivations() {
            let Some(value) = result.scalar(derivation.scalar) else {
                continue;
            };
            if value != derivation.equals {
                continue;
            }
            if let Ok(desc) = registry.lookup(derivation.flag) {
                result.set_flag(desc);
            }
        }

        debug!(
            arch = %registry.arch(),
            answered,
            hwcap = format_args!("{:#010x}", result.words[0]),
            hwcap2 = format_args!("{:#010x}", result.words[1]),
            "sysctl probe complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::Architecture;
    use crate::registry::{Aarch64Feature, CapabilityId, PpcFeature, ScalarId};

    /// Fixed key/value table standing in for the kernel.
    struct Table(&'static [(&'static CStr, i32)]);

    impl NamedValueSource for Table {
        fn query(&self, key: &CStr) -> Option<i32> {
            self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
        }
    }

    fn has(result: &ProbeResult, registry: &Registry, id: impl Into<CapabilityId>) -> bool {
        result.has(registry.lookup(id.into()).unwrap())
    }

    #[test]
    fn test_power_mac_g5() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let prober = SysctlProber::new(Table(&[
            (c"hw.cputype", 18),
            (c"hw.cpusubtype", 100),
            (c"hw.cpufamily", 0),
            (c"hw.optional.floatingpoint", 1),
            (c"hw.optional.altivec", 1),
            (c"hw.optional.64bitops", 1),
            (c"hw.optional.graphicsops", 1),
            (c"hw.optional.fsqrt", 1),
            (c"hw.optional.stfiwx", 1),
            (c"hw.optional.dcba", 0),
            (c"hw.optional.datastreams", 1),
            (c"hw.optional.dcbtstreams", 1),
        ]));
        let result = prober.probe(registry);

        assert!(result.is_available());
        assert!(has(&result, registry, PpcFeature::Fpu));
        assert!(has(&result, registry, PpcFeature::Altivec));
        assert!(has(&result, registry, PpcFeature::Ppc64));
        assert!(has(&result, registry, PpcFeature::G5));
        assert!(has(&result, registry, PpcFeature::Ppc32));
        assert!(!has(&result, registry, PpcFeature::Vsx));
        assert_eq!(result.scalar(ScalarId::CpuSubtype), Some(100));
        assert_eq!(result.scalar(ScalarId::GraphicsOps), Some(1));
        assert_eq!(result.scalar(ScalarId::Dcba), Some(0));
    }

    #[test]
    fn test_absent_key_is_capability_absent() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let prober = SysctlProber::new(Table(&[(c"hw.cputype", 18), (c"hw.cpusubtype", 9)]));
        let result = prober.probe(registry);

        assert!(result.is_available());
        let altivec = registry.lookup(PpcFeature::Altivec.into()).unwrap();
        assert!(!result.has(altivec));
        assert!(!has(&result, registry, PpcFeature::G5));
        assert_eq!(result.scalar(ScalarId::Fsqrt), None);
    }

    #[test]
    fn test_all_queries_failing_is_unavailable() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let result = SysctlProber::new(Table(&[])).probe(registry);
        assert_eq!(
            result,
            ProbeResult::unavailable(SourceUnavailable::QueryFailed)
        );
    }

    #[test]
    fn test_ppc64_cputype_derives_ppc64() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let prober = SysctlProber::new(Table(&[(c"hw.cputype", 0x0100_0012)]));
        let result = prober.probe(registry);
        assert!(has(&result, registry, PpcFeature::Ppc64));
        assert!(!has(&result, registry, PpcFeature::Ppc32));
    }

    #[test]
    fn test_apple_silicon_keys() {
        let registry = Registry::for_arch(Architecture::Aarch64);
        let prober = SysctlProber::new(Table(&[
            (c"hw.cputype", 0x0100_000c),
            (c"hw.optional.floatingpoint", 1),
            (c"hw.optional.AdvSIMD", 1),
            (c"hw.optional.arm.FEAT_LSE", 1),
            (c"hw.optional.arm.FEAT_SHA3", 0),
            (c"hw.optional.arm.FEAT_BF16", 1),
        ]));
        let result = prober.probe(registry);

        assert!(has(&result, registry, Aarch64Feature::Fp));
        assert!(has(&result, registry, Aarch64Feature::Asimd));
        assert!(has(&result, registry, Aarch64Feature::Atomics));
        assert!(has(&result, registry, Aarch64Feature::Bf16));
        assert!(!has(&result, registry, Aarch64Feature::Sha3));
        assert!(!has(&result, registry, Aarch64Feature::Sve));
        assert_eq!(result.scalar(ScalarId::CpuType), Some(0x0100_000c));
    }

    #[test]
    fn test_real_sysctl_is_silent_off_apple() {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            return;
        }
        assert_eq!(Sysctl.query(c"hw.cputype"), None);
    }
}
