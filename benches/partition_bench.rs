use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flat_louvain::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// Synthetic Erdos-Renyi graph with integer weights
fn random_graph(n: usize, p: f64, seed: u64) -> CsrGraph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.r#gen::<f64>() < p {
                edges.push((u, v, rng.gen_range(1..=4) as f64));
            }
        }
    }
    CsrGraph::from_undirected(n, &edges).expect("generated graph is valid")
}

fn bench_louvain(c: &mut Criterion) {
    let mut group = c.benchmark_group("louvain");
    group.sample_size(10);

    for &(n, p) in &[(1_000, 0.01), (5_000, 0.002)] {
        let graph = random_graph(n, p, 42);
        for threads in [1, 4] {
            for strategy in [DeltaStrategy::ThreadLocal, DeltaStrategy::SharedLock] {
                let cfg = LouvainConfig::default()
                    .with_threads(threads)
                    .with_strategy(strategy);
                let id = BenchmarkId::new(format!("{strategy:?}/t{threads}"), n);
                group.bench_with_input(id, &graph, |b, g| {
                    b.iter(|| Louvain::new(cfg.clone()).run(g).expect("louvain run"))
                });
            }
        }
    }
    group.finish();
}

criterion_group!(benches, bench_louvain);
criterion_main!(benches);
