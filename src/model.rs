use serde::Deserialize;

/// One snapshot entry as returned by the cluster snapshot listing.
///
/// `policy_id` is null or absent for snapshots taken manually.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
    pub id: String,
    pub source_file_id: String,
    #[serde(default)]
    pub policy_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// How a snapshot came to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRef {
    /// Created by the retention policy with this id.
    Scheduled(String),
    /// Created manually, outside any policy.
    OnDemand,
}

/// Normalized snapshot record with its display path resolved.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: String,
    pub source_file_id: String,
    pub policy: PolicyRef,
    pub name: String,
    pub path: String,
    pub expiration: Option<String>,
}

impl Snapshot {
    pub fn from_raw(raw: RawSnapshot, path: String) -> Self {
        let policy = match raw.policy_id {
            Some(id) => PolicyRef::Scheduled(id),
            None => PolicyRef::OnDemand,
        };

        Snapshot {
            id: raw.id,
            source_file_id: raw.source_file_id,
            policy,
            name: raw.name,
            path,
            expiration: raw.expiration,
        }
    }
}

/// The field snapshots are partitioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Policy,
    Path,
}

impl Axis {
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Policy => "policy_id",
            Axis::Path => "source_file_id",
        }
    }
}
