//! Client for the cluster management API.
//!
//! The core only ever sees the [`Cluster`] trait, so reports can be
//! generated against a fake provider with no network involved. The real
//! implementation is [`RestClient`]: a synchronous JSON-over-HTTPS client
//! holding a bearer token obtained at login (or supplied directly as an
//! access token).

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{Auth, Config};
use crate::model::{RawSnapshot, Snapshot};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] std::io::Error),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(404, resp) => ApiError::NotFound {
                what: resp.get_url().to_string(),
            },
            ureq::Error::Status(status, resp) => ApiError::Http {
                status,
                body: resp.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
        }
    }
}

/// Upstream calls the report generation depends on.
pub trait Cluster {
    fn list_snapshots(&self) -> Result<Vec<RawSnapshot>, ApiError>;
    fn capacity_by_snapshot(&self, snapshot_id: &str) -> Result<u64, ApiError>;
    fn capacity_by_policy(&self, policy_id: &str) -> Result<u64, ApiError>;
    fn capacity_by_path(&self, file_id: &str) -> Result<u64, ApiError>;
    fn file_path(&self, file_id: &str) -> Result<String, ApiError>;
    fn total_snapshot_capacity(&self) -> Result<u64, ApiError>;
}

#[derive(Deserialize)]
struct SnapshotListing {
    entries: Vec<RawSnapshot>,
}

#[derive(Deserialize)]
struct SnapshotCapacity {
    capacity_used_bytes: u64,
}

#[derive(Deserialize)]
struct AggregateCapacity {
    bytes: u64,
}

#[derive(Deserialize)]
struct FileAttributes {
    path: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    bearer_token: String,
}

pub struct RestClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl RestClient {
    /// Build an authenticated client from the resolved configuration.
    ///
    /// With password credentials this performs the login round-trip; an
    /// access token is used as-is.
    pub fn connect(config: &Config) -> Result<Self, ApiError> {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        let base_url = format!("https://{}:{}/api", config.host, config.port);

        let token = match &config.auth {
            Auth::Token(token) => {
                info!("using access token authentication");
                token.clone()
            }
            Auth::Password { username, password } => {
                let token = login(&agent, &base_url, username, password)?;
                info!("logged in as {username}");
                token
            }
        };

        Ok(RestClient {
            agent,
            base_url,
            token,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {path}");
        let resp = self
            .agent
            .get(&format!("{}{path}", self.base_url))
            .set("Authorization", &format!("Bearer {}", self.token))
            .call()?;
        Ok(resp.into_json()?)
    }
}

fn login(
    agent: &ureq::Agent,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let resp = agent
        .post(&format!("{base_url}/v1/session/login"))
        .send_json(serde_json::json!({
            "username": username,
            "password": password,
        }))
        .map_err(|err| match err {
            ureq::Error::Status(401, _) => {
                ApiError::Auth("invalid username or password".to_string())
            }
            other => other.into(),
        })?;

    let body: LoginResponse = resp.into_json()?;
    Ok(body.bearer_token)
}

impl Cluster for RestClient {
    fn list_snapshots(&self) -> Result<Vec<RawSnapshot>, ApiError> {
        let listing: SnapshotListing = self.get_json("/v1/snapshots")?;
        Ok(listing.entries)
    }

    fn capacity_by_snapshot(&self, snapshot_id: &str) -> Result<u64, ApiError> {
        let capacity: SnapshotCapacity =
            self.get_json(&format!("/v1/snapshots/{snapshot_id}/capacity-used"))?;
        Ok(capacity.capacity_used_bytes)
    }

    fn capacity_by_policy(&self, policy_id: &str) -> Result<u64, ApiError> {
        let capacity: AggregateCapacity =
            self.get_json(&format!("/v1/snapshots/policies/{policy_id}/capacity-used"))?;
        Ok(capacity.bytes)
    }

    fn capacity_by_path(&self, file_id: &str) -> Result<u64, ApiError> {
        let capacity: AggregateCapacity =
            self.get_json(&format!("/v1/files/{file_id}/snapshot-capacity-used"))?;
        Ok(capacity.bytes)
    }

    fn file_path(&self, file_id: &str) -> Result<String, ApiError> {
        let attributes: FileAttributes =
            self.get_json(&format!("/v1/files/{file_id}/attributes"))?;
        Ok(attributes.path)
    }

    fn total_snapshot_capacity(&self) -> Result<u64, ApiError> {
        let capacity: AggregateCapacity = self.get_json("/v1/snapshots/capacity-used")?;
        Ok(capacity.bytes)
    }
}

/// Fetch the full snapshot inventory with display paths resolved.
///
/// A failed path lookup substitutes a placeholder string; only a failed
/// listing is fatal.
pub fn fetch_snapshots(cluster: &dyn Cluster) -> Result<Vec<Snapshot>, ApiError> {
    let raw = cluster.list_snapshots()?;
    info!("retrieved {} snapshots", raw.len());

    let mut snapshots = Vec::with_capacity(raw.len());
    for entry in raw {
        let path = match cluster.file_path(&entry.source_file_id) {
            Ok(path) => path,
            Err(ApiError::NotFound { .. }) => {
                debug!(
                    "snapshot {}: no inode behind path id {}",
                    entry.id, entry.source_file_id
                );
                String::from("Path not found")
            }
            Err(err) => {
                warn!(
                    "snapshot {}: path lookup for {} failed: {err}",
                    entry.id, entry.source_file_id
                );
                String::from("Unknown error")
            }
        };
        snapshots.push(Snapshot::from_raw(entry, path));
    }

    Ok(snapshots)
}
