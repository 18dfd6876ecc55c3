//! Snapshot capacity reporting for storage clusters.
//!
//! Fetches the snapshot inventory from a cluster's management API,
//! groups it by retention policy or by protected path, resolves each
//! group's capacity usage, and renders the result as a console table or
//! CSV file.

pub mod cli;
pub mod client;
pub mod config;
pub mod group;
pub mod model;
pub mod report;
pub mod size;
pub mod util;
