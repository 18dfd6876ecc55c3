//! Partitions the snapshot inventory into report groups.

use std::collections::HashMap;

use log::info;

use crate::model::{Axis, PolicyRef, Snapshot};

/// Key a group of snapshots is bucketed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// All snapshots created by one retention policy.
    Policy(String),
    /// A single on-demand snapshot, keyed by its own id so manual
    /// snapshots never merge with each other or with a policy group.
    OnDemand(String),
    /// All snapshots protecting one filesystem object.
    Path(String),
}

impl GroupKey {
    /// Label shown in the first report column.
    pub fn label(&self) -> &str {
        match self {
            GroupKey::Policy(id) | GroupKey::Path(id) => id,
            GroupKey::OnDemand(_) => "on_demand",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    pub key: GroupKey,
    pub members: Vec<Snapshot>,
}

/// Partition snapshots into groups under the given axis.
///
/// Groups come back in first-occurrence order of their key and members
/// keep their input order. An empty input yields an empty vec.
pub fn group_snapshots(snapshots: &[Snapshot], axis: Axis) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for snapshot in snapshots {
        let key = match axis {
            Axis::Policy => match &snapshot.policy {
                PolicyRef::Scheduled(policy_id) => GroupKey::Policy(policy_id.clone()),
                PolicyRef::OnDemand => GroupKey::OnDemand(snapshot.id.clone()),
            },
            Axis::Path => GroupKey::Path(snapshot.source_file_id.clone()),
        };

        match index.get(&key) {
            Some(&slot) => groups[slot].members.push(snapshot.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    members: vec![snapshot.clone()],
                });
            }
        }
    }

    info!(
        "grouped {} snapshots into {} groups by {}",
        snapshots.len(),
        groups.len(),
        axis.label()
    );
    groups
}
