//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `KYFH__*` environment variables, e.g.
//! `KYFH__SERVER__PORT=9000` or
//! `KYFH__SERVER__CORS_ORIGINS=http://localhost:5173,https://kyfh.example`.
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed to call the API. Empty or `*` allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Store {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Keep the ledger in memory only.
    #[serde(default)]
    pub memory: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            memory: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub store: Store,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("app/db/data.json")
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("KYFH")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
