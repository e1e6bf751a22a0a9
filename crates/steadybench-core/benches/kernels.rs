//! Benchmarks for the statistics and fitting kernels themselves.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use steadybench_core::complexity::{self, BigO};
use steadybench_core::stats::SampleStats;

fn bench_rel_ci(c: &mut Criterion) {
    let mut stats = SampleStats::new();
    for i in 0..30 {
        stats.add(1_000.0 + f64::from(i));
    }
    c.bench_function("stats/rel_ci95_half_30", |b| {
        b.iter(|| black_box(&stats).rel_ci95_half());
    });
}

fn bench_auto_fit(c: &mut Criterion) {
    let points: Vec<(u64, f64)> = (0..12)
        .map(|i| {
            let n = 8u64 << i;
            let nf = n as f64;
            (n, 1.7 * nf * nf.log2())
        })
        .collect();
    c.bench_function("complexity/auto_fit_12_points", |b| {
        b.iter(|| complexity::fit(black_box(&points), BigO::Auto));
    });
}

criterion_group!(benches, bench_rel_ci, bench_auto_fit);
criterion_main!(benches);
