use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// One row of the pair report: a qualifying ligand/receptor ring pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairRecord {
    pub ligand_ring: usize,
    pub receptor_ring: usize,
    pub receptor_chain: char,
    pub receptor_residue_number: isize,
    pub receptor_insertion_code: Option<char>,
    pub receptor_residue_name: String,
    pub kind: String,
    pub angle: f64,
    pub distance: f64,
    pub ligand_centroid_x: f64,
    pub ligand_centroid_y: f64,
    pub ligand_centroid_z: f64,
    pub receptor_centroid_x: f64,
    pub receptor_centroid_y: f64,
    pub receptor_centroid_z: f64,
}

/// One row of the batch summary: the outcome of a dataset-list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub code: String,
    pub path: String,
    pub total_found: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub legacy_value: i64,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// Serializes `rows` as CSV with a header row into `writer`.
///
/// No header is written when `rows` is empty.
pub fn write_csv<T: Serialize, W: Write>(writer: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
pub fn write_csv_file<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|e| ReportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_csv(file, rows).map_err(|e| ReportError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_pair() -> PairRecord {
        PairRecord {
            ligand_ring: 3,
            receptor_ring: 0,
            receptor_chain: 'A',
            receptor_residue_number: 84,
            receptor_insertion_code: None,
            receptor_residue_name: "TRP".to_string(),
            kind: "parallel".to_string(),
            angle: 12.5,
            distance: 3.75,
            ligand_centroid_x: 0.0,
            ligand_centroid_y: 0.0,
            ligand_centroid_z: 0.0,
            receptor_centroid_x: 0.0,
            receptor_centroid_y: 0.0,
            receptor_centroid_z: 3.75,
        }
    }

    #[test]
    fn pair_rows_are_written_with_header() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[sample_pair()]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("ligand_ring,receptor_ring,receptor_chain"));
        assert_eq!(
            lines.next().unwrap(),
            "3,0,A,84,,TRP,parallel,12.5,3.75,0.0,0.0,0.0,0.0,0.0,3.75"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_report_has_no_rows() {
        let mut buffer = Vec::new();
        write_csv::<BatchRecord, _>(&mut buffer, &[]).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn batch_summary_file_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let record = BatchRecord {
            code: "1ABC".to_string(),
            path: "/data/1abc_d1refined.pdb".to_string(),
            total_found: 2,
            resolved: 1,
            unresolved: 1,
            legacy_value: 2,
            status: "ok".to_string(),
        };
        write_csv_file(&path, &[record]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("1ABC,/data/1abc_d1refined.pdb,2,1,1,2,ok"));
    }

    #[test]
    fn unwritable_path_reports_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            write_csv_file::<BatchRecord>(&path, &[]),
            Err(ReportError::Io { .. })
        ));
    }
}
