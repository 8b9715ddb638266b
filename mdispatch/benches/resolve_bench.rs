//! Resolution benchmarks using criterion.
//!
//! Run with: cargo bench --bench resolve_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mdispatch::{
    ByPartialOrd, Dominates, Implementation, LiftingRule, Resolver, Signature, SignatureDominates,
};

/// Candidates of the given arity forming a chain: candidate `i` has every
/// descriptor equal to `i`, so the lowest one dominates all others.
fn chain(count: u32, arity: usize) -> Vec<Implementation<u32, u32>> {
    (0..count)
        .map(|i| Implementation::new(vec![i; arity], i))
        .collect()
}

/// Candidates that are pairwise incomparable: each is most specific in
/// exactly one position.
fn antichain(count: u32) -> Vec<Implementation<u32, u32>> {
    (0..count)
        .map(|i| {
            let params: Vec<u32> = (0..count).map(|p| if p == i { 0 } else { 1 }).collect();
            Implementation::new(params, i)
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let resolver = Resolver::for_implementations(ByPartialOrd);

    for count in [2u32, 8, 32] {
        let candidates = chain(count, 4);
        group.bench_with_input(BenchmarkId::new("chain", count), &candidates, |b, candidates| {
            b.iter(|| resolver.resolve(black_box(candidates.as_slice())).is_winner());
        });

        let candidates = antichain(count);
        group.bench_with_input(
            BenchmarkId::new("antichain", count),
            &candidates,
            |b, candidates| {
                b.iter(|| resolver.resolve(black_box(candidates.as_slice())).is_ambiguous());
            },
        );
    }

    group.finish();
}

fn bench_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature");
    let specific = Signature::from(vec![1u32; 16]);
    let general = Signature::from(vec![2u32; 16]);

    for rule in [LiftingRule::Pareto, LiftingRule::Lexicographic] {
        let rel = SignatureDominates::with_rule(ByPartialOrd, rule);
        group.bench_function(BenchmarkId::new("dominates", rule), |b| {
            b.iter(|| rel.dominates(black_box(&specific), black_box(&general)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_signature);
criterion_main!(benches);
