use clap::Parser;
use log::{error, info, warn};

use snapcap::cli::{Cli, Command, ReportArgs};
use snapcap::client::{self, Cluster, RestClient};
use snapcap::config::Config;
use snapcap::model::PolicyRef;
use snapcap::report;
use snapcap::util::format_bytes;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    let cluster = match RestClient::connect(&config) {
        Ok(cluster) => cluster,
        Err(err) => {
            error!("login failed: {err}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Report(args) => run_report(&cluster, &args),
        Command::List => run_list(&cluster),
    }
}

fn run_report(cluster: &RestClient, args: &ReportArgs) {
    match cluster.total_snapshot_capacity() {
        Ok(bytes) => info!("total snapshot capacity reported: {}", format_bytes(bytes)),
        Err(err) => warn!("total capacity query failed: {err}"),
    }

    let snapshots = match client::fetch_snapshots(cluster) {
        Ok(snapshots) => snapshots,
        Err(err) => {
            error!("failed to list snapshots: {err}");
            std::process::exit(1);
        }
    };

    for axis in args.by.axes() {
        let report = report::generate(&snapshots, axis, cluster);

        match &args.output {
            Some(path) => {
                if let Err(err) = report::csv::write(&report, path) {
                    error!("failed to write {}: {err}", path.display());
                    std::process::exit(1);
                }
            }
            None => {
                println!("\nSnapshot usage by {}:", axis.label());
                report::print(&report);
            }
        }
    }
}

fn run_list(cluster: &RestClient) {
    let snapshots = match client::fetch_snapshots(cluster) {
        Ok(snapshots) => snapshots,
        Err(err) => {
            error!("failed to list snapshots: {err}");
            std::process::exit(1);
        }
    };

    if snapshots.is_empty() {
        println!("No snapshots found.");
        return;
    }

    println!(
        "{:<10} {:<24} {:<12} {:<12}",
        "ID", "Name", "Policy", "Expiration"
    );
    println!("{}", "-".repeat(60));

    for snapshot in &snapshots {
        let policy = match &snapshot.policy {
            PolicyRef::Scheduled(id) => id.as_str(),
            PolicyRef::OnDemand => "on_demand",
        };
        let expiration = snapshot.expiration.as_deref().unwrap_or("N/A");

        println!(
            "{:<10} {:<24} {:<12} {:<12}",
            snapshot.id, snapshot.name, policy, expiration
        );
    }
}
