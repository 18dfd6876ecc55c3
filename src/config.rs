use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

use crate::cli::Cli;

/// Connection credentials; one of the two must be available.
#[derive(Debug, Clone)]
pub enum Auth {
    Token(String),
    Password { username: String, password: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub auth: Auth,
    pub timeout: Duration,
    pub verbose: bool,
}

/// Optional connection defaults read from the platform config dir
/// (~/.config/snapcap/snapcap.toml or equivalent). CLI flags win.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    token: Option<String>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, String> {
        let file = FileConfig::load();

        let host = cli
            .host
            .clone()
            .or(file.host)
            .ok_or("no host configured; pass --host or set it in snapcap.toml")?;
        let port = cli.port.or(file.port).unwrap_or(8000);

        let token = cli.token.clone().or(file.token);
        let username = cli.username.clone().or(file.username);

        let auth = if let Some(token) = token {
            Auth::Token(token)
        } else if let Some(username) = username {
            let password = cli
                .password
                .clone()
                .or_else(|| std::env::var("SNAPCAP_PASSWORD").ok())
                .ok_or("no password given; pass --password or set SNAPCAP_PASSWORD")?;
            Auth::Password { username, password }
        } else {
            return Err("either --token or --username must be provided".to_string());
        };

        Ok(Config {
            host,
            port,
            auth,
            timeout: cli.timeout,
            verbose: cli.verbose,
        })
    }
}

impl FileConfig {
    fn load() -> Self {
        let Some(dirs) = directories::ProjectDirs::from("", "", "snapcap") else {
            return FileConfig::default();
        };
        let path = dirs.config_dir().join("snapcap.toml");

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!("loaded connection defaults from {}", path.display());
                    config
                }
                Err(err) => {
                    warn!("ignoring malformed {}: {err}", path.display());
                    FileConfig::default()
                }
            },
            Err(_) => FileConfig::default(),
        }
    }
}
