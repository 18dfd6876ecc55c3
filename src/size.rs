//! Resolves the capacity figure for one group.
//!
//! The primary source is the aggregate query matching the group's axis.
//! When that query misses or errors, the group's members are summed
//! individually instead and the result is marked degraded.

use log::{debug, warn};

use crate::client::{ApiError, Cluster};
use crate::group::{Group, GroupKey};

/// How a group's size was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The axis-matching aggregate query answered.
    Primary(u64),
    /// Best-effort per-snapshot sum after the aggregate query missed.
    Degraded { bytes: u64, reason: String },
}

impl Resolution {
    pub fn bytes(&self) -> u64 {
        match self {
            Resolution::Primary(bytes) => *bytes,
            Resolution::Degraded { bytes, .. } => *bytes,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Resolution::Degraded { .. })
    }
}

/// Resolve the total size of one group.
///
/// On-demand singletons always use the member's own usage figure; the
/// policy aggregate is never meaningful for them. Never fails: a missed
/// query degrades to a per-member sum.
pub fn resolve(group: &Group, cluster: &dyn Cluster) -> Resolution {
    match &group.key {
        GroupKey::OnDemand(_) => resolve_singleton(group, cluster),
        GroupKey::Policy(policy_id) => match cluster.capacity_by_policy(policy_id) {
            Ok(bytes) => Resolution::Primary(bytes),
            Err(err) => sum_members(
                group,
                cluster,
                format!("policy aggregate for {policy_id} unavailable: {err}"),
            ),
        },
        GroupKey::Path(file_id) => match cluster.capacity_by_path(file_id) {
            Ok(bytes) => Resolution::Primary(bytes),
            Err(err) => sum_members(
                group,
                cluster,
                format!("path aggregate for {file_id} unavailable: {err}"),
            ),
        },
    }
}

fn resolve_singleton(group: &Group, cluster: &dyn Cluster) -> Resolution {
    // grouping guarantees exactly one member for on-demand keys
    let Some(member) = group.members.first() else {
        return Resolution::Degraded {
            bytes: 0,
            reason: "empty group".to_string(),
        };
    };

    match cluster.capacity_by_snapshot(&member.id) {
        Ok(bytes) => Resolution::Primary(bytes),
        Err(err) => {
            warn!("snapshot {}: usage query failed: {err}", member.id);
            Resolution::Degraded {
                bytes: 0,
                reason: format!("usage for snapshot {} unavailable: {err}", member.id),
            }
        }
    }
}

fn sum_members(group: &Group, cluster: &dyn Cluster, reason: String) -> Resolution {
    warn!(
        "group {}: {reason}; summing per-snapshot usage (accuracy degraded)",
        group.key.label()
    );

    let mut total = 0u64;
    for member in &group.members {
        match cluster.capacity_by_snapshot(&member.id) {
            Ok(bytes) => total = total.saturating_add(bytes),
            Err(ApiError::NotFound { .. }) => {
                debug!("snapshot {} no longer exists, skipping", member.id);
            }
            Err(err) => {
                warn!("snapshot {}: usage query failed: {err}", member.id);
            }
        }
    }

    Resolution::Degraded {
        bytes: total,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::model::{PolicyRef, RawSnapshot, Snapshot};

    #[derive(Default)]
    struct FakeCluster {
        snapshot_usage: HashMap<String, u64>,
        policy_usage: HashMap<String, u64>,
        path_usage: HashMap<String, u64>,
        policy_queries: RefCell<Vec<String>>,
    }

    impl Cluster for FakeCluster {
        fn list_snapshots(&self) -> Result<Vec<RawSnapshot>, ApiError> {
            Ok(Vec::new())
        }

        fn capacity_by_snapshot(&self, snapshot_id: &str) -> Result<u64, ApiError> {
            self.snapshot_usage
                .get(snapshot_id)
                .copied()
                .ok_or_else(|| ApiError::NotFound {
                    what: format!("snapshot {snapshot_id}"),
                })
        }

        fn capacity_by_policy(&self, policy_id: &str) -> Result<u64, ApiError> {
            self.policy_queries.borrow_mut().push(policy_id.to_string());
            self.policy_usage
                .get(policy_id)
                .copied()
                .ok_or_else(|| ApiError::NotFound {
                    what: format!("policy {policy_id}"),
                })
        }

        fn capacity_by_path(&self, file_id: &str) -> Result<u64, ApiError> {
            self.path_usage
                .get(file_id)
                .copied()
                .ok_or_else(|| ApiError::NotFound {
                    what: format!("file {file_id}"),
                })
        }

        fn file_path(&self, _file_id: &str) -> Result<String, ApiError> {
            Ok("/data".to_string())
        }

        fn total_snapshot_capacity(&self) -> Result<u64, ApiError> {
            Ok(0)
        }
    }

    fn snapshot(id: &str, policy: PolicyRef) -> Snapshot {
        Snapshot {
            id: id.to_string(),
            source_file_id: "1".to_string(),
            policy,
            name: format!("snap_{id}"),
            path: "/data".to_string(),
            expiration: None,
        }
    }

    fn policy_group(policy_id: &str, ids: &[&str]) -> Group {
        Group {
            key: GroupKey::Policy(policy_id.to_string()),
            members: ids
                .iter()
                .map(|id| snapshot(id, PolicyRef::Scheduled(policy_id.to_string())))
                .collect(),
        }
    }

    #[test]
    fn aggregate_answer_is_primary() {
        let mut cluster = FakeCluster::default();
        cluster.policy_usage.insert("2".to_string(), 16384);

        let group = policy_group("2", &["4", "5"]);
        assert_eq!(resolve(&group, &cluster), Resolution::Primary(16384));
    }

    #[test]
    fn missed_aggregate_falls_back_to_member_sum() {
        let mut cluster = FakeCluster::default();
        cluster.snapshot_usage.insert("4".to_string(), 8192);
        cluster.snapshot_usage.insert("5".to_string(), 8192);

        let group = policy_group("2", &["4", "5"]);
        let resolution = resolve(&group, &cluster);

        assert!(resolution.is_degraded());
        assert_eq!(resolution.bytes(), 16384);
    }

    #[test]
    fn fallback_matches_primary_for_consistent_upstream() {
        let mut primary = FakeCluster::default();
        primary.policy_usage.insert("2".to_string(), 16384);

        let mut fallback = FakeCluster::default();
        fallback.snapshot_usage.insert("4".to_string(), 8192);
        fallback.snapshot_usage.insert("5".to_string(), 8192);

        let group = policy_group("2", &["4", "5"]);
        assert_eq!(
            resolve(&group, &primary).bytes(),
            resolve(&group, &fallback).bytes()
        );
    }

    #[test]
    fn vanished_snapshot_contributes_zero_to_fallback() {
        let mut cluster = FakeCluster::default();
        cluster.snapshot_usage.insert("4".to_string(), 8192);
        // "5" missing upstream entirely

        let group = policy_group("2", &["4", "5"]);
        assert_eq!(resolve(&group, &cluster).bytes(), 8192);
    }

    #[test]
    fn on_demand_singleton_never_queries_policy_aggregate() {
        let mut cluster = FakeCluster::default();
        cluster.snapshot_usage.insert("7".to_string(), 4096);

        let group = Group {
            key: GroupKey::OnDemand("7".to_string()),
            members: vec![snapshot("7", PolicyRef::OnDemand)],
        };

        assert_eq!(resolve(&group, &cluster), Resolution::Primary(4096));
        assert!(cluster.policy_queries.borrow().is_empty());
    }

    #[test]
    fn on_demand_usage_failure_degrades_to_zero() {
        let cluster = FakeCluster::default();

        let group = Group {
            key: GroupKey::OnDemand("7".to_string()),
            members: vec![snapshot("7", PolicyRef::OnDemand)],
        };

        let resolution = resolve(&group, &cluster);
        assert!(resolution.is_degraded());
        assert_eq!(resolution.bytes(), 0);
    }

    #[test]
    fn path_group_uses_path_aggregate() {
        let mut cluster = FakeCluster::default();
        cluster.path_usage.insert("100".to_string(), 2048);

        let group = Group {
            key: GroupKey::Path("100".to_string()),
            members: vec![snapshot("1", PolicyRef::OnDemand)],
        };

        assert_eq!(resolve(&group, &cluster), Resolution::Primary(2048));
    }
}
