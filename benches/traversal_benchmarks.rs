use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nikolaus::fixture::GraphFixture;
use nikolaus::graph::{properties, Direction, GraphStore, PropertyMap};
use nikolaus::traversal::{
    count_paths_from_all_nodes, par_paths_from_all_nodes, Evaluator, TraversalDescription,
    Uniqueness,
};

fn house_description() -> TraversalDescription {
    TraversalDescription::new()
        .relationships("RELATION")
        .direction(Direction::Both)
        .uniqueness(Uniqueness::RelationshipPath)
        .evaluator(Evaluator::AtLength(8))
}

/// Every directed pair of distinct nodes connected once
fn complete_graph(n: usize) -> GraphStore {
    let mut store = GraphStore::with_capacity(n, n * (n - 1) / 2);
    let ids: Vec<_> = (0..n)
        .map(|i| store.create_node(properties([("Name", format!("n{}", i))])))
        .collect();
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            store
                .create_edge(a, b, "RELATION", PropertyMap::new())
                .unwrap();
        }
    }
    store
}

fn chain(n: usize) -> GraphStore {
    let mut store = GraphStore::with_capacity(n, n.saturating_sub(1));
    let mut prev = store.create_node(PropertyMap::new());
    for _ in 1..n {
        let next = store.create_node(PropertyMap::new());
        store
            .create_edge(prev, next, "NEXT", PropertyMap::new())
            .unwrap();
        prev = next;
    }
    store
}

/// One-stroke drawings of the house, sequential vs rayon
fn bench_house(c: &mut Criterion) {
    let store = GraphFixture::house().build().unwrap();
    let description = house_description();

    let mut group = c.benchmark_group("house");
    group.bench_function("sequential", |b| {
        b.iter(|| {
            let total = count_paths_from_all_nodes(&store, &description).unwrap();
            criterion::black_box(total);
        });
    });
    group.bench_function("parallel", |b| {
        b.iter(|| {
            let results = par_paths_from_all_nodes(&store, &description).unwrap();
            criterion::black_box(results.len());
        });
    });
    group.finish();
}

/// Trail enumeration on complete graphs, bounded depth
fn bench_complete_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_graph_trails");

    for size in [5usize, 6, 7].iter() {
        let store = complete_graph(*size);
        let description = TraversalDescription::new()
            .uniqueness(Uniqueness::RelationshipPath)
            .evaluator(Evaluator::ToLength(4));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let total = count_paths_from_all_nodes(&store, &description).unwrap();
                criterion::black_box(total);
            });
        });
    }
    group.finish();
}

/// Deep single-branch walk, exercises stack push/pop
fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    for size in [100usize, 1000, 10_000].iter() {
        let store = chain(*size);
        let start = store.node_ids().next().unwrap();
        let description = TraversalDescription::new()
            .direction(Direction::Outgoing)
            .uniqueness(Uniqueness::NodePath);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let count = description.traverse(&store, start).unwrap().count();
                criterion::black_box(count);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_house, bench_complete_graph, bench_chain);
criterion_main!(benches);
