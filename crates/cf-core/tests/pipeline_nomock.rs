//! No-mock integration tests for the probe pipeline.
//!
//! These tests use captured cpuinfo listings and real auxv-formatted files
//! (no fake probers) and cover:
//! - Text prober against full POWER9 and Graviton2 listings
//! - auxv file preferred over cpuinfo, cpuinfo filling what auxv lacks
//! - Missing sources degrading to an unsupported snapshot
//! - Provenance records for every source

use cf_core::probe::{AuxvFile, AuxvProber, CpuInfoProber};
use cf_core::{
    Aarch64Feature, Architecture, Pipeline, PpcFeature, ProbeStatus, Prober, Registry, ScalarId,
    Snapshot, SourceKind, SourceUnavailable,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, NamedTempFile};

// ============================================================================
// Fixture Helpers
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn auxv_file(hwcap: usize, hwcap2: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create auxv file");
    for (tag, value) in [(6usize, 4096usize), (16, hwcap), (26, hwcap2), (0, 0)] {
        file.write_all(&tag.to_ne_bytes()).unwrap();
        file.write_all(&value.to_ne_bytes()).unwrap();
    }
    file.flush().unwrap();
    file
}

// ============================================================================
// Text prober over captured listings
// ============================================================================

#[test]
fn test_power9_cpuinfo() {
    let registry = Registry::for_arch(Architecture::Ppc);
    let prober = CpuInfoProber::new(fixture("cpuinfo_power9.txt"));
    let detection = Pipeline::new(registry).run(&[&prober]);
    let caps = detection.snapshot;

    for feature in [
        PpcFeature::Ppc64,
        PpcFeature::Altivec,
        PpcFeature::Vsx,
        PpcFeature::Arch206,
        PpcFeature::Arch207,
        PpcFeature::Arch300,
        PpcFeature::Htm,
        PpcFeature::VecCrypto,
        PpcFeature::Darn,
        PpcFeature::HtmNoSuspend,
    ] {
        assert!(caps.has(feature), "expected {:?}", feature);
    }
    assert!(!caps.has(PpcFeature::Spe));
    assert!(!caps.has(PpcFeature::G5));
    assert!(!caps.has(PpcFeature::Scv));
    assert_eq!(caps.enabled().count(), 23);

    let record = detection.provenance.get(SourceKind::Cpuinfo).unwrap();
    assert_eq!(record.status, ProbeStatus::Probed);
}

#[test]
fn test_graviton2_cpuinfo() {
    let registry = Registry::for_arch(Architecture::Aarch64);
    let prober = CpuInfoProber::new(fixture("cpuinfo_graviton2.txt"));
    let caps = Pipeline::new(registry).run(&[&prober]).snapshot;

    assert!(caps.has(Aarch64Feature::Asimd));
    assert!(caps.has(Aarch64Feature::Atomics));
    assert!(caps.has(Aarch64Feature::Asimddp));
    assert!(!caps.has(Aarch64Feature::Sve));
    assert!(!caps.has(Aarch64Feature::Sve2));
    assert_eq!(caps.enabled().count(), 17);
    assert_eq!(caps.scalar(ScalarId::Implementer).unwrap(), 0x41);
    assert_eq!(caps.scalar(ScalarId::Part).unwrap(), 0xd0c);
    assert_eq!(caps.scalar(ScalarId::CpuArchitecture).unwrap(), 8);
}

// ============================================================================
// Multi-source merge
// ============================================================================

#[test]
fn test_auxv_first_cpuinfo_fills_gaps() {
    let registry = Registry::for_arch(Architecture::Aarch64);
    // auxv: fp + asimd + sve, hwcap2: sve2
    let auxv = auxv_file(0b11 | (1 << 22), 1 << 1);
    let auxv_prober = AuxvProber::new(AuxvFile::new(auxv.path()));
    let cpuinfo_prober = CpuInfoProber::new(fixture("cpuinfo_graviton2.txt"));
    let probers: [&dyn Prober; 2] = [&auxv_prober, &cpuinfo_prober];

    let detection = Pipeline::new(registry).run(&probers);
    let caps = detection.snapshot;

    assert!(caps.has(Aarch64Feature::Sve));
    assert!(caps.has(Aarch64Feature::Sve2));
    assert!(caps.has(Aarch64Feature::Atomics));
    assert_eq!(caps.enabled().count(), 19);
    // scalars only come from cpuinfo
    assert_eq!(caps.scalar(ScalarId::Part).unwrap(), 0xd0c);

    let auxv = detection.provenance.get(SourceKind::AuxvFile).unwrap();
    assert_eq!(auxv.flags_contributed, [0b11 | (1 << 22), 1 << 1]);
    let cpuinfo = detection.provenance.get(SourceKind::Cpuinfo).unwrap();
    // fp and asimd were already set by auxv
    assert_eq!(cpuinfo.flags_contributed[0] & 0b11, 0);
    assert_eq!(cpuinfo.flags_contributed[0].count_ones(), 15);
    assert!(cpuinfo.contributed_scalar(ScalarId::Part));
}

#[test]
fn test_missing_auxv_falls_back_to_cpuinfo() {
    let dir = tempdir().unwrap();
    let registry = Registry::for_arch(Architecture::Ppc);
    let auxv_prober = AuxvProber::new(AuxvFile::new(dir.path().join("auxv")));
    let cpuinfo_prober = CpuInfoProber::new(fixture("cpuinfo_power9.txt"));
    let probers: [&dyn Prober; 2] = [&auxv_prober, &cpuinfo_prober];

    let detection = Pipeline::new(registry).run(&probers);

    assert!(detection.snapshot.has(PpcFeature::Vsx));
    let auxv = detection.provenance.get(SourceKind::AuxvFile).unwrap();
    assert_eq!(
        auxv.status,
        ProbeStatus::Unavailable(SourceUnavailable::FileMissing)
    );
}

#[test]
fn test_every_source_missing_is_unsupported() {
    let dir = tempdir().unwrap();
    let registry = Registry::for_arch(Architecture::Ppc);
    let auxv_prober = AuxvProber::new(AuxvFile::new(dir.path().join("auxv")));
    let cpuinfo_prober = CpuInfoProber::new(dir.path().join("cpuinfo"));
    let probers: [&dyn Prober; 2] = [&auxv_prober, &cpuinfo_prober];

    let detection = Pipeline::new(registry).run(&probers);

    assert_eq!(detection.snapshot, Snapshot::unsupported(Architecture::Ppc));
    assert_eq!(detection.provenance.len(), 2);
    assert!(detection
        .provenance
        .iter()
        .all(|record| !record.status.is_probed()));
}

#[test]
fn test_disabled_auxv_lets_cpuinfo_decide() {
    let registry = Registry::for_arch(Architecture::Aarch64);
    let auxv = auxv_file(1 << 22, 0);
    let auxv_prober = AuxvProber::new(AuxvFile::new(auxv.path()));
    let cpuinfo_prober = CpuInfoProber::new(fixture("cpuinfo_graviton2.txt"));
    let probers: [&dyn Prober; 2] = [&auxv_prober, &cpuinfo_prober];

    let caps = Pipeline::new(registry)
        .disable(SourceKind::AuxvFile)
        .run(&probers)
        .snapshot;

    assert!(!caps.has(Aarch64Feature::Sve));
    assert!(caps.has(Aarch64Feature::Atomics));
}

#[test]
fn test_repeated_runs_are_identical() {
    let registry = Registry::for_arch(Architecture::Ppc);
    let prober = CpuInfoProber::new(fixture("cpuinfo_power9.txt"));
    let first = Pipeline::new(registry).run(&[&prober]);
    let second = Pipeline::new(registry).run(&[&prober]);
    assert_eq!(first, second);
}
