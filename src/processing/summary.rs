use crate::discretization::cloud::PointCloud;
use crate::discretization::neighbors::{cutoff_radius, NeighborTable};
use crate::numerics::{StationaryResult, TransientResult};
use nalgebra::DVector;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub struct RunSummary {
    pub title: String,

    // Cloud info
    pub num_nodes: usize,
    pub num_interior: usize,
    pub num_boundary: usize,
    pub cutoff_radius: f64,

    // Neighbor info
    pub table_width: usize,
    pub min_neighbors: usize,
    pub max_neighbors: usize,
    pub mean_neighbors: f64,
    pub empty_rows: usize,

    // Time grid
    pub levels: Option<usize>,
    pub time_step: Option<f64>,

    // Accuracy
    pub max_abs_error: Option<f64>,
    pub max_rel_error: Option<f64>,
}

impl RunSummary {
    pub fn from_cloud(title: &str, cloud: &PointCloud, table: &NeighborTable) -> Self {
        let counts: Vec<usize> = (0..table.len()).map(|i| table.count(i)).collect();
        let mean = if counts.is_empty() {
            0.0
        } else {
            counts.iter().sum::<usize>() as f64 / counts.len() as f64
        };

        Self {
            title: title.to_string(),
            num_nodes: cloud.len(),
            num_interior: cloud.interior_indices().len(),
            num_boundary: cloud.boundary_indices().len(),
            cutoff_radius: cutoff_radius(cloud),
            table_width: table.width(),
            min_neighbors: counts.iter().copied().min().unwrap_or(0),
            max_neighbors: counts.iter().copied().max().unwrap_or(0),
            mean_neighbors: mean,
            empty_rows: table.empty_rows(),
            levels: None,
            time_step: None,
            max_abs_error: None,
            max_rel_error: None,
        }
    }

    pub fn from_stationary(title: &str, cloud: &PointCloud, result: &StationaryResult) -> Self {
        let mut summary = Self::from_cloud(title, cloud, &result.neighbors);
        summary.add_comparison(&result.computed, &result.reference);
        summary
    }

    /// Compares the final level against the exact solution.
    pub fn from_transient(title: &str, cloud: &PointCloud, result: &TransientResult) -> Self {
        let mut summary = Self::from_cloud(title, cloud, &result.neighbors);
        let levels = result.levels();
        summary.levels = Some(levels);
        summary.time_step = result.times.get(1).copied();
        if levels > 0 {
            summary.add_comparison(
                &result.computed_level(levels - 1),
                &result.reference_level(levels - 1),
            );
        }
        summary
    }

    pub fn add_comparison(&mut self, computed: &DVector<f64>, reference: &DVector<f64>) {
        let abs = (computed - reference).amax();
        let scale = reference.amax();
        self.max_abs_error = Some(abs);
        self.max_rel_error = (scale > 0.0).then(|| abs / scale);
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;

        writeln!(file, "{}", "=".repeat(60))?;
        writeln!(file, "{}", self.title.to_uppercase())?;
        writeln!(file, "{}", "=".repeat(60))?;
        writeln!(file)?;

        writeln!(file, "POINT CLOUD")?;
        writeln!(file, "{}", "-".repeat(60))?;
        writeln!(file, "Number of nodes:     {}", self.num_nodes)?;
        writeln!(file, "Interior nodes:      {}", self.num_interior)?;
        writeln!(file, "Boundary nodes:      {}", self.num_boundary)?;
        writeln!(file, "Cutoff radius:       {:.6e}", self.cutoff_radius)?;
        writeln!(file)?;

        writeln!(file, "NEIGHBORS")?;
        writeln!(file, "{}", "-".repeat(60))?;
        writeln!(file, "Table width:         {}", self.table_width)?;
        writeln!(
            file,
            "Per node:            min {}, max {}, mean {:.3}",
            self.min_neighbors, self.max_neighbors, self.mean_neighbors
        )?;
        writeln!(file, "Rows without any:    {}", self.empty_rows)?;
        writeln!(file)?;

        if let (Some(levels), Some(dt)) = (self.levels, self.time_step) {
            writeln!(file, "TIME GRID")?;
            writeln!(file, "{}", "-".repeat(60))?;
            writeln!(file, "Levels:              {}", levels)?;
            writeln!(file, "Time step:           {:.6e}", dt)?;
            writeln!(file)?;
        }

        if let Some(abs) = self.max_abs_error {
            writeln!(file, "ACCURACY")?;
            writeln!(file, "{}", "-".repeat(60))?;
            writeln!(file, "Max abs. error:      {:.6e}", abs)?;
            if let Some(rel) = self.max_rel_error {
                writeln!(file, "Max rel. error:      {:.6e}", rel)?;
            }
            writeln!(file)?;
        }

        writeln!(file, "{}", "=".repeat(60))?;

        Ok(())
    }

    pub fn print_to_console(&self) {
        println!("\n{}", "=".repeat(60));
        println!("{}", self.title.to_uppercase());
        println!("{}", "=".repeat(60));
        println!(
            "Cloud:         {} nodes ({} interior, {} boundary)",
            self.num_nodes, self.num_interior, self.num_boundary
        );
        println!(
            "Neighbors:     {}..{} per node, cutoff {:.3e}",
            self.min_neighbors, self.max_neighbors, self.cutoff_radius
        );
        if let Some(levels) = self.levels {
            println!("Levels:        {}", levels);
        }
        if let Some(abs) = self.max_abs_error {
            println!("Max error:     {:.3e}", abs);
        }
        if let Some(rel) = self.max_rel_error {
            println!("Rel. error:    {:.3e}", rel);
        }
        println!("{}\n", "=".repeat(60));
    }
}
