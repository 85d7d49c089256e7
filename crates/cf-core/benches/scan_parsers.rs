//! Criterion benchmarks for the text and auxv decoders in `cf-core`.
//!
//! These benchmarks read captured fixtures, never the live `/proc`, so they
//! run deterministically in CI and on developer machines.

use cf_core::probe::{cpuinfo, parse_auxv};
use cf_core::scan::{StackLineReader, StringView};
use cf_core::{Architecture, Registry};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const POWER9: &str = include_str!("../tests/fixtures/cpuinfo_power9.txt");
const GRAVITON2: &str = include_str!("../tests/fixtures/cpuinfo_graviton2.txt");

fn bench_cpuinfo_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_parsers");

    for (name, arch, text) in [
        ("power9", Architecture::Ppc, POWER9),
        ("graviton2", Architecture::Aarch64, GRAVITON2),
    ] {
        let registry = Registry::for_arch(arch);
        group.bench_with_input(BenchmarkId::new("cpuinfo_scan", name), &text, |b, input| {
            b.iter(|| {
                let result = cpuinfo::scan(registry, black_box(input.as_bytes()));
                black_box(result);
            });
        });
    }

    group.finish();
}

fn bench_line_reader(c: &mut Criterion) {
    c.bench_function("scan_parsers/line_reader_tokens", |b| {
        b.iter(|| {
            let mut lines: StackLineReader<&[u8]> = StackLineReader::new(black_box(POWER9.as_bytes()));
            let mut tokens = 0usize;
            while let Some(line) = lines.next_line() {
                if let Some((_, value)) = line.view.split_key_value() {
                    tokens += value.tokens().count();
                }
            }
            black_box(tokens);
        })
    });

    c.bench_function("scan_parsers/parse_positive_number", |b| {
        let view = StringView::of("0xd0c");
        b.iter(|| black_box(black_box(view).parse_positive_number()))
    });
}

fn bench_auxv_decode(c: &mut Criterion) {
    let mut bytes = Vec::new();
    for (tag, value) in [(6usize, 4096usize), (16, 0xdc08_0000), (26, 0xbc00_0000), (0, 0)] {
        bytes.extend_from_slice(&tag.to_ne_bytes());
        bytes.extend_from_slice(&value.to_ne_bytes());
    }

    c.bench_function("scan_parsers/parse_auxv", |b| {
        b.iter(|| {
            let words = parse_auxv(black_box(&bytes[..])).expect("auxv should decode");
            black_box(words);
        })
    });
}

criterion_group!(
    benches,
    bench_cpuinfo_scan,
    bench_line_reader,
    bench_auxv_decode
);
criterion_main!(benches);
