// Criterion benchmarks for Capstone Teams

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use capstone_teams::core::{connected_components, PreferenceEdge, PreferenceGraph, TeamMatcher};

/// Each student nominates up to three classmates inside a block of `block` ids
fn create_edges(students: i64, block: i64) -> Vec<PreferenceEdge> {
    (1..=students)
        .flat_map(|id| {
            let base = (id - 1) / block * block + 1;
            (1..=3).filter_map(move |rank| {
                let target = base + (id - base + rank * 7) % block;
                (target != id && target <= students)
                    .then(|| PreferenceEdge::new(id, target, rank as i32))
            })
        })
        .collect()
}

fn bench_graph_build(c: &mut Criterion) {
    let edges = create_edges(1000, 5);

    c.bench_function("graph_build_1000_students", |b| {
        b.iter(|| PreferenceGraph::build(black_box(1..=1000), black_box(edges.iter().copied())));
    });
}

fn bench_components(c: &mut Criterion) {
    let graph = PreferenceGraph::build(1..=1000, create_edges(1000, 5));

    c.bench_function("connected_components_1000_students", |b| {
        b.iter(|| connected_components(black_box(&graph)));
    });
}

fn bench_assign(c: &mut Criterion) {
    let matcher = TeamMatcher::default();

    let mut group = c.benchmark_group("assign");

    for student_count in [10, 100, 1000, 10_000].iter() {
        let edges = create_edges(*student_count, 6);

        group.bench_with_input(
            BenchmarkId::new("assign", student_count),
            student_count,
            |b, &n| {
                b.iter(|| matcher.assign(black_box(1..=n), black_box(edges.clone())));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_graph_build, bench_components, bench_assign);

criterion_main!(benches);
