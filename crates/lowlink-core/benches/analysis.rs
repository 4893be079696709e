use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lowlink_core::{
    Analysis, AnalysisOptions, BridgeView, Graph, find_bridges_with, tarjan,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_graph(vertices: usize, edges: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::with_vertices(vertices);
    for _ in 0..edges {
        let u = rng.gen_range(0..vertices);
        let v = rng.gen_range(0..vertices);
        graph.add_edge(u, v).expect("endpoints drawn in range");
    }
    graph
}

fn path_graph(vertices: usize) -> Graph {
    let edges: Vec<_> = (0..vertices.saturating_sub(1)).map(|v| (v, v + 1)).collect();
    Graph::from_edges(vertices, &edges).expect("endpoints in range")
}

fn bench_tarjan(c: &mut Criterion) {
    let mut group = c.benchmark_group("tarjan");
    for &n in &[1_000usize, 10_000, 100_000] {
        let g = random_graph(n, n * 3, 7);
        group.bench_with_input(BenchmarkId::new("random", n), &g, |b, g| {
            b.iter(|| tarjan(black_box(g)));
        });
    }
    let deep = path_graph(1_000_000);
    group.bench_function("path_1m", |b| b.iter(|| tarjan(black_box(&deep))));
    group.finish();
}

fn bench_bridges(c: &mut Criterion) {
    let mut group = c.benchmark_group("bridges");
    for &n in &[1_000usize, 10_000, 100_000] {
        let g = random_graph(n, n * 2, 11);
        for view in [BridgeView::Underlying, BridgeView::Directed] {
            group.bench_with_input(BenchmarkId::new(view.as_str(), n), &g, |b, g| {
                b.iter(|| find_bridges_with(black_box(g), view));
            });
        }
    }
    group.finish();
}

fn bench_full_analysis(c: &mut Criterion) {
    let g = random_graph(50_000, 150_000, 23);
    let options = AnalysisOptions::default();
    c.bench_function("analysis_50k", |b| {
        b.iter(|| Analysis::run(black_box(&g), &options));
    });
}

criterion_group!(benches, bench_tarjan, bench_bridges, bench_full_analysis);
criterion_main!(benches);
