use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use gfd_rs::discretization::generator::unit_square_cloud;
use gfd_rs::discretization::neighbors::{
    CloudSearch, DEFAULT_MAX_NEIGHBORS, NeighborConfig, NeighborSearch,
};
use gfd_rs::models::stationary::poisson_exponential;
use gfd_rs::numerics::StationarySolver;
use gfd_rs::numerics::stencil::assemble;
use gfd_rs::physics::DifferentialOperator;
use glam::DVec2;

fn grid_sizes() -> Vec<usize> {
    vec![11, 21, 31]
}

fn solver_sizes() -> Vec<usize> {
    vec![11, 21]
}

fn bench_neighbor_search(c: &mut Criterion) {
    let strategies = [
        ("exhaustive", NeighborSearch::Cloud(CloudSearch::Exhaustive)),
        ("vectorized", NeighborSearch::Cloud(CloudSearch::Vectorized)),
        ("spatial_index", NeighborSearch::Cloud(CloudSearch::SpatialIndex)),
        (
            "upwind",
            NeighborSearch::Upwind {
                direction: DVec2::new(1.0, 0.5),
                workers: 4,
            },
        ),
    ];

    for (name, search) in strategies {
        let mut group = c.benchmark_group(format!("neighbors_{name}"));
        let config = NeighborConfig::new(DEFAULT_MAX_NEIGHBORS, search);
        for &n in &grid_sizes() {
            let cloud = unit_square_cloud(n);
            group.bench_with_input(BenchmarkId::from_parameter(n * n), &n, |b, &_| {
                b.iter(|| {
                    let table = config.build(std::hint::black_box(&cloud));
                    std::hint::black_box(table.ok());
                });
            });
        }
        group.finish();
    }
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    let op = DifferentialOperator::new(-0.3, -0.2, 0.2, 0.0, 0.2, 0.0);
    for &n in &grid_sizes() {
        let cloud = unit_square_cloud(n);
        let Ok(table) = NeighborConfig::default().build(&cloud) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(n * n), &n, |b, &_| {
            b.iter(|| {
                let k = assemble(&cloud, &table, std::hint::black_box(&op));
                std::hint::black_box(k.ok());
            });
        });
    }
    group.finish();
}

fn bench_stationary_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("stationary_solve");
    let problem = poisson_exponential();
    let solver = StationarySolver::default();
    for &n in &solver_sizes() {
        let cloud = unit_square_cloud(n);
        group.bench_with_input(BenchmarkId::from_parameter(n * n), &n, |b, &_| {
            b.iter_batched(
                || cloud.clone(),
                |cloud| {
                    let _ = solver.solve(&cloud, &problem);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_neighbor_search,
    bench_assembly,
    bench_stationary_solve
);
criterion_main!(benches);
