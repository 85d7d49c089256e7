//! Structured text prober (`/proc/cpuinfo`).
//!
//! Only lines whose key is one of the architecture's feature-list markers
//! contribute bits; every whitespace token equal to a registry name sets
//! that bit. Numeric `CPU part`-style keys fill scalar fields. Everything
//! else in the file is ignored.

use super::{ProbeResult, Prober, SourceKind, SourceUnavailable};
use crate::registry::{Registry, ScalarId};
use crate::scan::{StackLineReader, StringView};
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct CpuInfoProber {
    path: PathBuf,
}

impl CpuInfoProber {
    pub const DEFAULT_PATH: &'static str = "/proc/cpuinfo";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for CpuInfoProber {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl Prober for CpuInfoProber {
    fn source(&self) -> SourceKind {
        SourceKind::Cpuinfo
    }

    fn probe(&self, registry: &Registry) -> ProbeResult {
        match std::fs::File::open(&self.path) {
            Ok(file) => scan(registry, file),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "cpuinfo not opened");
                let reason = match err.kind() {
                    ErrorKind::NotFound => SourceUnavailable::FileMissing,
                    _ => SourceUnavailable::Unreadable,
                };
                ProbeResult::unavailable(reason)
            }
        }
    }
}

/// Scans cpuinfo-formatted text from any reader.
///
/// The first value seen for a scalar key wins, matching the first CPU
/// block of a multi-core listing.
pub fn scan<R: Read>(registry: &Registry, reader: R) -> ProbeResult {
    let keys = registry.text_keys();
    let mut lines: StackLineReader<R> = StackLineReader::new(reader);
    let mut result = ProbeResult::probed();
    let mut marker_seen = false;
    let mut scalar_seen = false;

    while let Some(line) = lines.next_line() {
        if !line.full_line {
            trace!(line = %line.view, "cpuinfo line truncated");
        }
        let Some((key, value)) = line.view.split_key_value() else {
            continue;
        };

        if keys
            .flag_lists
            .iter()
            .any(|marker| key.equals_ignore_ascii_case(marker.as_bytes()))
        {
            marker_seen = true;
            let mut tokens = value.tokens().peekable();
            while let Some(token) = tokens.next() {
                if !line.full_line && tokens.peek().is_none() {
                    // The cut may have landed inside this token.
                    trace!(token = %token, "dropping last token of truncated line");
                    break;
                }
                match registry.find_by_name(token.as_bytes()) {
                    Some(desc) => result.set_flag(desc),
                    None => trace!(token = %token, "skipping unknown capability token"),
                }
            }
            continue;
        }

        if let Some(&(_, id)) = keys
            .scalars
            .iter()
            .find(|(name, _)| key.equals(name.as_bytes()))
        {
            if !line.full_line {
                trace!(key = %key, "ignoring scalar on truncated line");
                continue;
            }
            match parse_scalar(id, value) {
                Some(number) => {
                    result.set_scalar(id, number);
                    scalar_seen = true;
                }
                None => trace!(key = %key, value = %value, "unparsed scalar value"),
            }
        }
    }

    if !marker_seen && !scalar_seen {
        debug!(arch = %registry.arch(), "no recognized cpuinfo line");
        return ProbeResult::unavailable(SourceUnavailable::MarkerAbsent);
    }
    result
}

fn parse_scalar(id: ScalarId, value: StringView<'_>) -> Option<u32> {
    // Older kernels print "AArch64" instead of the architecture number.
    if id == ScalarId::CpuArchitecture && value.equals_ignore_ascii_case(b"AArch64") {
        return Some(8);
    }
    value.parse_positive_number()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::Architecture;
    use crate::registry::{Aarch64Feature, CapabilityId, PpcFeature};
    use crate::scan::STACK_LINE_READER_BUFFER_SIZE;

    fn has(result: &ProbeResult, arch: Architecture, id: impl Into<CapabilityId>) -> bool {
        let registry = Registry::for_arch(arch);
        result.has(registry.lookup(id.into()).unwrap())
    }

    #[test]
    fn test_flags_line_sets_known_tokens() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let input = "flags : altivec vsx unknown_future_flag\n";
        let result = scan(registry, input.as_bytes());

        assert!(result.is_available());
        assert!(has(&result, Architecture::Ppc, PpcFeature::Altivec));
        assert!(has(&result, Architecture::Ppc, PpcFeature::Vsx));
        let set = result.words[0].count_ones() + result.words[1].count_ones();
        assert_eq!(set, 2);
    }

    #[test]
    fn test_marker_key_is_case_insensitive() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let result = scan(registry, "CPU Features\t: dfp htm\n".as_bytes());
        assert!(has(&result, Architecture::Ppc, PpcFeature::Dfp));
        assert!(has(&result, Architecture::Ppc, PpcFeature::Htm));
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let result = scan(registry, "flags: ALTIVEC\n".as_bytes());
        assert!(result.is_available());
        assert!(!has(&result, Architecture::Ppc, PpcFeature::Altivec));
    }

    #[test]
    fn test_power9_listing_without_marker() {
        let registry = Registry::for_arch(Architecture::Ppc);
        let input = "processor\t: 0\ncpu\t\t: POWER9, altivec supported\nclock\t\t: 2166.000000MHz\n";
        let result = scan(registry, input.as_bytes());
        assert_eq!(
            result,
            ProbeResult::unavailable(SourceUnavailable::MarkerAbsent)
        );
    }

    #[test]
    fn test_aarch64_features_and_ids() {
        let registry = Registry::for_arch(Architecture::Aarch64);
        let input = "\
processor\t: 0
BogoMIPS\t: 243.75
Features\t: fp asimd evtstrm aes pmull sha1 sha2 crc32 atomics fphp asimdhp cpuid asimdrdm lrcpc dcpop asimddp ssbs
CPU implementer\t: 0x41
CPU architecture: 8
CPU variant\t: 0x3
CPU part\t: 0xd0c
CPU revision\t: 1

processor\t: 1
CPU part\t: 0xd40
";
        let result = scan(registry, input.as_bytes());

        assert!(has(&result, Architecture::Aarch64, Aarch64Feature::Atomics));
        assert!(has(&result, Architecture::Aarch64, Aarch64Feature::Ssbs));
        assert!(!has(&result, Architecture::Aarch64, Aarch64Feature::Sve));
        assert_eq!(result.scalar(ScalarId::Implementer), Some(0x41));
        assert_eq!(result.scalar(ScalarId::CpuArchitecture), Some(8));
        assert_eq!(result.scalar(ScalarId::Variant), Some(3));
        assert_eq!(result.scalar(ScalarId::Part), Some(0xd0c));
        assert_eq!(result.scalar(ScalarId::Revision), Some(1));
    }

    #[test]
    fn test_truncated_line_drops_cut_token() {
        let registry = Registry::for_arch(Architecture::Aarch64);
        // "svebf16" straddles the end of the line buffer, leaving "sve".
        let mut input = String::from("Features\t: fp asimd sha1 ");
        input.push_str(&"x ".repeat(498));
        assert_eq!(input.len() + 3, STACK_LINE_READER_BUFFER_SIZE);
        input.push_str("svebf16\nCPU part\t: 0xd0c\n");

        let result = scan(registry, input.as_bytes());

        assert!(has(&result, Architecture::Aarch64, Aarch64Feature::Fp));
        assert!(has(&result, Architecture::Aarch64, Aarch64Feature::Asimd));
        assert!(!has(&result, Architecture::Aarch64, Aarch64Feature::Sve));
        assert!(!has(&result, Architecture::Aarch64, Aarch64Feature::Svebf16));
        assert_eq!(result.words[0].count_ones() + result.words[1].count_ones(), 3);
        assert_eq!(result.scalar(ScalarId::Part), Some(0xd0c));
    }

    #[test]
    fn test_aarch64_architecture_name() {
        let registry = Registry::for_arch(Architecture::Aarch64);
        let result = scan(registry, "CPU architecture: AArch64\n".as_bytes());
        assert!(result.is_available());
        assert_eq!(result.scalar(ScalarId::CpuArchitecture), Some(8));
        assert_eq!(result.words, [0, 0]);
    }

    #[test]
    fn test_ppc_markers_do_not_apply_to_aarch64() {
        let registry = Registry::for_arch(Architecture::Aarch64);
        let result = scan(registry, "flags : fp asimd\n".as_bytes());
        assert!(!result.is_available());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let prober = CpuInfoProber::new(dir.path().join("cpuinfo"));
        let result = prober.probe(Registry::for_arch(Architecture::Ppc));
        assert_eq!(
            result,
            ProbeResult::unavailable(SourceUnavailable::FileMissing)
        );
    }

    #[test]
    fn test_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpuinfo");
        std::fs::write(&path, "cpu features : altivec fpu mmu\n").unwrap();
        let result = CpuInfoProber::new(&path).probe(Registry::for_arch(Architecture::Ppc));
        assert!(has(&result, Architecture::Ppc, PpcFeature::Fpu));
        assert!(has(&result, Architecture::Ppc, PpcFeature::Mmu));
    }
}
