use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/finances.toml";

/// Where the collection is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Namespaced key/value file on disk. Edits are persisted.
    Local,
    /// Legacy `GET /data/finances.json`. Edits live for the session only.
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: Source,
    pub store_path: String,
    pub store_key: String,
    pub remote_url: String,
    pub log_level: String,
    pub log_file: String,
    #[serde(skip)]
    pub print: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: Source::Local,
            store_path: "data/finances_store.json".to_string(),
            store_key: engine::DEFAULT_STORE_KEY.to_string(),
            remote_url: "http://127.0.0.1:8000".to_string(),
            log_level: "info".to_string(),
            log_file: "data/finances.log".to_string(),
            print: false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "finances", about = "Keep a ledger of dated expenses")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override where entries come from.
    #[arg(long, value_enum)]
    source: Option<Source>,
    /// Override the local store file.
    #[arg(long)]
    store_path: Option<String>,
    /// Override the key the entries are stored under.
    #[arg(long)]
    store_key: Option<String>,
    /// Override the legacy server base URL (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    remote_url: Option<String>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override the log file.
    #[arg(long)]
    log_file: Option<String>,
    /// Print entries and the total to stdout instead of opening the UI.
    #[arg(long)]
    print: bool,
}

pub fn load() -> Result<AppConfig> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FINANCES"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(source) = args.source {
        settings.source = source;
    }
    if let Some(store_path) = args.store_path {
        settings.store_path = store_path;
    }
    if let Some(store_key) = args.store_key {
        settings.store_key = store_key;
    }
    if let Some(remote_url) = args.remote_url {
        settings.remote_url = remote_url;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    settings.print = args.print;

    Ok(settings)
}
