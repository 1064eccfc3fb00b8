use std::{fs::OpenOptions, path::Path, sync::Mutex};

use crate::error::{AppError, Result};

/// Installs the global subscriber. Events go to `log_file` because the
/// terminal is in raw mode while the ledger is open.
pub fn init(level: &str, log_file: &str) -> Result<()> {
    let path = Path::new(log_file);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("finances_tui={level},engine={level}"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
