//! Console table rendering for usage reports.
//!
//! Fixed-width columns with per-cell truncation; the truncation here is
//! on top of the merged-list ellipsis applied when rows are built.

use crate::report::Report;
use crate::util::format_bytes;

const COL_WIDTH: usize = 22;

pub fn render(report: &Report) -> String {
    if report.rows.is_empty() {
        return String::from("No snapshots found.\n");
    }

    let mut output = String::new();
    let headers = report.headers();

    for header in headers {
        output.push_str(&format!("{header:<COL_WIDTH$}"));
    }
    output.push('\n');
    output.push_str(&"-".repeat(COL_WIDTH * headers.len()));
    output.push('\n');

    for row in &report.rows {
        for field in row.fields() {
            output.push_str(&format!("{:<COL_WIDTH$}", truncate(field, COL_WIDTH - 2)));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "\nTOTAL: {} across {} snapshots\n",
        format_bytes(report.total_bytes),
        report.total_snapshots
    ));

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}
