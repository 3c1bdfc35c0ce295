use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nalgebra::{DMatrix, DVector};

use crate::discretization::cloud::PointCloud;
use crate::discretization::neighbors::NeighborTable;

/// Write column data under the given headers. Shorter columns leave empty
/// cells.
pub fn write_csv<P: AsRef<Path>>(path: P, headers: &[&str], columns: &[Vec<f64>]) -> io::Result<()> {
    if headers.len() != columns.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Headers count ({}) doesn't match data columns ({})",
                headers.len(),
                columns.len()
            ),
        ));
    }

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", headers.join(","))?;

    let n_rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    for i in 0..n_rows {
        let row: Vec<String> = columns
            .iter()
            .map(|col| col.get(i).map(|v| format!("{v:.15e}")).unwrap_or_default())
            .collect();
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()
}

/// `x, y, tag, computed, reference` per node.
pub fn write_field<P: AsRef<Path>>(
    path: P,
    cloud: &PointCloud,
    computed: &DVector<f64>,
    reference: &DVector<f64>,
) -> io::Result<()> {
    let nodes = cloud.nodes();
    write_csv(
        path,
        &["x", "y", "tag", "computed", "reference"],
        &[
            nodes.iter().map(|n| n.position.x).collect(),
            nodes.iter().map(|n| n.position.y).collect(),
            nodes.iter().map(|n| f64::from(n.tag.code())).collect(),
            computed.iter().copied().collect(),
            reference.iter().copied().collect(),
        ],
    )
}

/// Selected time levels of an N×t field, one column per level, headed by
/// the level time.
pub fn write_levels<P: AsRef<Path>>(
    path: P,
    field: &DMatrix<f64>,
    times: &[f64],
    levels: &[usize],
) -> io::Result<()> {
    let headers: Vec<String> = levels.iter().map(|&k| format!("t={:.6}", times[k])).collect();
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    let columns: Vec<Vec<f64>> = levels
        .iter()
        .map(|&k| field.column(k).iter().copied().collect())
        .collect();
    write_csv(path, &headers, &columns)
}

/// One line per node: the node id followed by its neighbor slots, `-1` for
/// absent entries.
pub fn write_neighbor_table<P: AsRef<Path>>(path: P, table: &NeighborTable) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut header = vec!["node".to_string()];
    header.extend((0..table.width()).map(|j| format!("n{j}")));
    writeln!(out, "{}", header.join(","))?;

    for i in 0..table.len() {
        let mut row = vec![i.to_string()];
        row.extend(
            table
                .row(i)
                .iter()
                .map(|slot| slot.map_or("-1".to_string(), |id| id.to_string())),
        );
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::generator::unit_square_cloud;
    use crate::discretization::neighbors::NeighborConfig;
    use std::fs;

    #[test]
    fn field_and_table_files_have_one_line_per_node() {
        let dir = std::env::temp_dir();
        let field_path = dir.join("gfd_rs_field_test.csv");
        let table_path = dir.join("gfd_rs_table_test.csv");

        let cloud = unit_square_cloud(3);
        let values = DVector::from_element(cloud.len(), 1.5);
        write_field(&field_path, &cloud, &values, &values).expect("write field");
        let content = fs::read_to_string(&field_path).expect("read field");
        assert!(content.starts_with("x,y,tag,computed,reference"));
        assert_eq!(content.lines().count(), cloud.len() + 1);

        let table = NeighborConfig::default().build(&cloud).expect("neighbors");
        write_neighbor_table(&table_path, &table).expect("write table");
        let content = fs::read_to_string(&table_path).expect("read table");
        assert_eq!(content.lines().count(), cloud.len() + 1);
        assert!(content.lines().nth(1).expect("first row").starts_with("0,"));

        fs::remove_file(field_path).ok();
        fs::remove_file(table_path).ok();
    }

    #[test]
    fn mismatched_headers_are_rejected() {
        let path = std::env::temp_dir().join("gfd_rs_mismatch_test.csv");
        let err = write_csv(&path, &["a", "b"], &[vec![1.0]]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
