//! Turns grouped snapshots and resolved sizes into display-ready rows.

pub mod csv;
pub mod table;

use crate::client::Cluster;
use crate::group::{self, Group};
use crate::model::{Axis, Snapshot};
use crate::size::{self, Resolution};
use crate::util::format_bytes;

pub const POLICY_HEADERS: [&str; 6] = [
    "Policy ID",
    "Path",
    "Snapshot Name(s)",
    "Size",
    "Snapshot ID(s)",
    "Expiration Dates",
];

pub const PATH_HEADERS: [&str; 5] = [
    "Path ID",
    "Path",
    "Snapshot Name(s)",
    "Size",
    "Snapshot ID(s)",
];

// merged list columns show this many members before the ellipsis
const NAME_LIMIT: usize = 3;
const ID_LIMIT: usize = 3;

/// One report line, every field rendered for display.
#[derive(Debug, Clone)]
pub struct Row {
    pub key: String,
    pub path: String,
    pub names: String,
    pub size: String,
    pub ids: String,
    /// Only present on the policy axis.
    pub expirations: Option<String>,
}

impl Row {
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.key.as_str(),
            self.path.as_str(),
            self.names.as_str(),
            self.size.as_str(),
            self.ids.as_str(),
        ];
        if let Some(expirations) = &self.expirations {
            fields.push(expirations);
        }
        fields
    }
}

pub struct Report {
    pub axis: Axis,
    pub rows: Vec<Row>,
    /// The untruncated groups with their resolutions; row truncation is
    /// presentation only.
    pub groups: Vec<(Group, Resolution)>,
    pub total_snapshots: usize,
    pub total_bytes: u64,
}

impl Report {
    pub fn headers(&self) -> &'static [&'static str] {
        match self.axis {
            Axis::Policy => &POLICY_HEADERS,
            Axis::Path => &PATH_HEADERS,
        }
    }
}

/// Generate a report for one axis from an already fetched snapshot set.
///
/// Size resolution runs once per group, in group order. Grouping an
/// empty set produces a report with zero rows and zero totals.
pub fn generate(snapshots: &[Snapshot], axis: Axis, cluster: &dyn Cluster) -> Report {
    let groups = group::group_snapshots(snapshots, axis);

    let mut resolved: Vec<(Group, Resolution)> = Vec::with_capacity(groups.len());
    for group in groups {
        let resolution = size::resolve(&group, cluster);
        resolved.push((group, resolution));
    }

    let rows = resolved
        .iter()
        .map(|(group, resolution)| build_row(group, resolution, axis))
        .collect();

    let total_bytes = resolved
        .iter()
        .fold(0u64, |acc, (_, r)| acc.saturating_add(r.bytes()));

    Report {
        axis,
        rows,
        groups: resolved,
        total_snapshots: snapshots.len(),
        total_bytes,
    }
}

/// Print a report to the console, totals line included.
pub fn print(report: &Report) {
    print!("{}", table::render(report));
}

fn build_row(group: &Group, resolution: &Resolution, axis: Axis) -> Row {
    let names: Vec<&str> = group.members.iter().map(|s| s.name.as_str()).collect();
    let ids: Vec<&str> = group.members.iter().map(|s| s.id.as_str()).collect();

    let expirations = match axis {
        Axis::Policy => Some(merge_expirations(&group.members)),
        Axis::Path => None,
    };

    Row {
        key: group.key.label().to_string(),
        path: group
            .members
            .first()
            .map(|s| s.path.clone())
            .unwrap_or_default(),
        names: merge_list(&names, NAME_LIMIT),
        size: format_bytes(resolution.bytes()),
        ids: merge_list(&ids, ID_LIMIT),
        expirations,
    }
}

/// Join the first `limit` items, marking anything beyond with an ellipsis.
fn merge_list(items: &[&str], limit: usize) -> String {
    if items.len() <= limit {
        items.join(", ")
    } else {
        format!("{}, ...", items[..limit].join(", "))
    }
}

/// Distinct expiration dates across members, first occurrence first.
fn merge_expirations(members: &[Snapshot]) -> String {
    let mut seen: Vec<String> = Vec::new();
    for member in members {
        if let Some(expiration) = &member.expiration {
            let date = expiration_date(expiration);
            if !seen.contains(&date) {
                seen.push(date);
            }
        }
    }

    if seen.is_empty() {
        String::from("N/A")
    } else {
        seen.join(", ")
    }
}

fn expiration_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.split('T').next().unwrap_or(raw).to_string())
}
