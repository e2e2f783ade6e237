use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use seqdag_core::Graph;

/// (label, branch count, branch length) tiers.
const TIERS: [(&str, usize, usize); 3] = [("small", 4, 8), ("medium", 12, 20), ("large", 24, 40)];

/// A fan-out/fan-in workflow: one start node, `branches` parallel chains of
/// `length` steps with cross links between neighbouring chains, and a join.
fn workflow(branches: usize, length: usize) -> Graph<String> {
    let mut graph = Graph::new();
    let node = |b: usize, s: usize| format!("b{b}-s{s}");

    for b in 0..branches {
        let label = if b % 2 == 0 { "even" } else { "odd" };
        graph
            .declare_link(label, "start".to_string(), node(b, 0))
            .expect("workflow graph is acyclic");
        for s in 1..length {
            graph
                .declare_link("", node(b, s - 1), node(b, s))
                .expect("workflow graph is acyclic");
            if b > 0 && s % 5 == 0 {
                graph
                    .declare_link("", node(b - 1, s - 1), node(b, s))
                    .expect("workflow graph is acyclic");
            }
        }
        graph
            .declare_link("", node(b, length - 1), "join".to_string())
            .expect("workflow graph is acyclic");
    }

    graph
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");

    for (name, branches, length) in TIERS {
        let graph = workflow(branches, length);
        group.throughput(Throughput::Elements(graph.len() as u64));

        group.bench_with_input(BenchmarkId::new("layers", name), &graph, |b, graph| {
            b.iter(|| black_box(graph.sorted_layers().len()));
        });

        group.bench_with_input(BenchmarkId::new("steps", name), &graph, |b, graph| {
            b.iter(|| black_box(graph.sorted_with_order().len()));
        });

        group.bench_with_input(BenchmarkId::new("closure", name), &graph, |b, graph| {
            b.iter(|| black_box(graph.dependents("start").len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ordering);
criterion_main!(benches);
