use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use secret_santa::{random_pairings, ExclusionGraph, Solver};
use std::collections::BTreeMap;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("N{i}")).collect()
}

/// `n / 2` couples, each excluding their partner.
fn partnered(n: usize) -> (Vec<String>, BTreeMap<String, Vec<String>>) {
    let people = names(n);
    let mut exclusions = BTreeMap::new();
    for couple in people.chunks(2) {
        if let [a, b] = couple {
            exclusions.insert(a.clone(), vec![b.clone()]);
            exclusions.insert(b.clone(), vec![a.clone()]);
        }
    }
    (people, exclusions)
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    for &n in &[5, 10, 20] {
        let people = names(n);
        let graph = ExclusionGraph::from_exclusions(&people, &BTreeMap::new()).unwrap();
        let mut solver = Solver::with_seed(42);
        group.bench_with_input(BenchmarkId::new("no_exclusions", n), &graph, |b, g| {
            b.iter(|| solver.solve(black_box(g)).unwrap())
        });

        let (people, exclusions) = partnered(n);
        let graph = ExclusionGraph::from_exclusions(&people, &exclusions).unwrap();
        let mut solver = Solver::with_seed(42);
        group.bench_with_input(BenchmarkId::new("partnered", n), &graph, |b, g| {
            b.iter(|| solver.solve(black_box(g)).unwrap())
        });
    }

    group.finish();
}

fn bench_random_pairings(c: &mut Criterion) {
    let people = names(20);
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    c.bench_function("random_pairings_20", |b| {
        b.iter(|| random_pairings(black_box(&people), &mut rng).unwrap())
    });
}

criterion_group!(benches, bench_solver, bench_random_pairings);
criterion_main!(benches);
