use gfd_rs::discretization::cloud::PointCloud;
use gfd_rs::discretization::generator::unit_square_cloud;
use gfd_rs::discretization::neighbors::{NeighborConfig, NeighborSearch, DEFAULT_MAX_NEIGHBORS};
use gfd_rs::models::{stationary, transient};
use gfd_rs::numerics::{StationarySolver, TimeScheme, TransientResult, TransientSolver};
use gfd_rs::processing::csv_writer;
use gfd_rs::processing::summary::RunSummary;
use std::fs;

const GRID: usize = 21;
const LEVELS: usize = 2000;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fs::create_dir_all("output/stationary").expect("Failed to create output directory");
    fs::create_dir_all("output/transient").expect("Failed to create output directory");

    let cloud = unit_square_cloud(GRID);

    run_poisson(&cloud);
    run_heat(&cloud);
    run_advection_diffusion(&cloud);
    run_wave(&cloud);
}

fn run_poisson(cloud: &PointCloud) {
    let problem = stationary::poisson_exponential();
    let result = StationarySolver::default()
        .solve(cloud, &problem)
        .expect("Stationary solve failed");

    csv_writer::write_field(
        "output/stationary/poisson.csv",
        cloud,
        &result.computed,
        &result.reference,
    )
    .expect("Failed to write Poisson field");
    csv_writer::write_neighbor_table("output/stationary/neighbors.csv", &result.neighbors)
        .expect("Failed to write neighbor table");

    report(
        RunSummary::from_stationary("Poisson, exponential", cloud, &result),
        "output/stationary/poisson_summary.txt",
    );
}

fn run_heat(cloud: &PointCloud) {
    let problem = transient::heat(0.2);
    let result = TransientSolver::default()
        .solve_first_order(cloud, &problem)
        .expect("Heat solve failed");

    save_transient(cloud, &result, "heat");
    report(
        RunSummary::from_transient("Heat equation", cloud, &result),
        "output/transient/heat_summary.txt",
    );
}

fn run_advection_diffusion(cloud: &PointCloud) {
    let problem = transient::advection_diffusion(0.1, 0.3, 0.2);
    let solver = TransientSolver::new(LEVELS, TimeScheme::Theta(0.5), NeighborConfig::default());
    let result = solver
        .solve_first_order(cloud, &problem)
        .expect("Advection-diffusion solve failed");

    save_transient(cloud, &result, "advection_diffusion");

    let upwind = NeighborConfig::new(
        DEFAULT_MAX_NEIGHBORS,
        NeighborSearch::upwind_for(&problem.operator, 4),
    )
    .build(cloud)
    .expect("Upwind search failed");
    csv_writer::write_neighbor_table("output/transient/upwind_neighbors.csv", &upwind)
        .expect("Failed to write upwind table");

    report(
        RunSummary::from_transient("Advection-diffusion", cloud, &result),
        "output/transient/advection_diffusion_summary.txt",
    );
}

fn run_wave(cloud: &PointCloud) {
    let problem = transient::wave(0.5_f64.sqrt());
    let result = TransientSolver::default()
        .solve_second_order(cloud, &problem)
        .expect("Wave solve failed");

    save_transient(cloud, &result, "wave");
    report(
        RunSummary::from_transient("Wave equation", cloud, &result),
        "output/transient/wave_summary.txt",
    );
}

fn save_transient(cloud: &PointCloud, result: &TransientResult, name: &str) {
    let last = result.levels() - 1;
    csv_writer::write_field(
        format!("output/transient/{name}_final.csv"),
        cloud,
        &result.computed_level(last),
        &result.reference_level(last),
    )
    .expect("Failed to write final level");

    let snapshots: Vec<usize> = (0..=4).map(|q| q * last / 4).collect();
    csv_writer::write_levels(
        format!("output/transient/{name}_levels.csv"),
        &result.computed,
        &result.times,
        &snapshots,
    )
    .expect("Failed to write level snapshots");
}

fn report(summary: RunSummary, path: &str) {
    summary.write_to_file(path).expect("Failed to write summary");
    summary.print_to_console();
    println!("Summary saved to {path}");
}
