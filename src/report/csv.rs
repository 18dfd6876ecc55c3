//! CSV output for usage reports.
//!
//! Every field is quoted. Reports append to the target file so one run
//! can stack both axes into a single file, each with its own header row.

use std::fs::OpenOptions;
use std::path::Path;

use log::info;

use crate::report::Report;

pub fn write(report: &Report, path: &Path) -> Result<(), csv::Error> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(file);

    writer.write_record(report.headers())?;
    for row in &report.rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;

    info!("report saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Axis;
    use crate::report::{Report, Row};

    fn sample_report() -> Report {
        Report {
            axis: Axis::Policy,
            rows: vec![Row {
                key: "2".to_string(),
                path: "/data, raw".to_string(),
                names: "snap_4, snap_5".to_string(),
                size: "16.0KiB".to_string(),
                ids: "4, 5".to_string(),
                expirations: Some("2026-12-31".to_string()),
            }],
            groups: Vec::new(),
            total_snapshots: 2,
            total_bytes: 16384,
        }
    }

    #[test]
    fn writes_header_and_quoted_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write(&sample_report(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"Policy ID\",\"Path\",\"Snapshot Name(s)\",\"Size\",\"Snapshot ID(s)\",\"Expiration Dates\""
        );
        // embedded comma survives because every field is quoted
        assert_eq!(
            lines.next().unwrap(),
            "\"2\",\"/data, raw\",\"snap_4, snap_5\",\"16.0KiB\",\"4, 5\",\"2026-12-31\""
        );
    }

    #[test]
    fn successive_writes_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write(&sample_report(), &path).unwrap();
        write(&sample_report(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 4);
    }
}
