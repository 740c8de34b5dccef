//! Where bufscope keeps its files
//!
//! Everything lives under one data directory, `~/.bufscope` unless the
//! binary overrides it at startup:
//!
//! ```text
//! <data_dir>/config.toml
//! <data_dir>/world.json
//! <data_dir>/logs/bufscope.log
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DIR_NAME: &str = ".bufscope";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Pin the data directory for the rest of the process. Only the first call
/// has an effect; returns whether this one did.
pub fn init_data_dir(custom_path: Option<PathBuf>) -> bool {
    DATA_DIR
        .set(custom_path.unwrap_or_else(default_data_dir))
        .is_ok()
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(DIR_NAME)
}

pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn log_file_path() -> PathBuf {
    logs_dir().join("bufscope.log")
}

pub fn config_path() -> PathBuf {
    config_path_in(&data_dir())
}

pub fn world_path() -> PathBuf {
    world_path_in(&data_dir())
}

fn config_path_in(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

fn world_path_in(dir: &Path) -> PathBuf {
    dir.join("world.json")
}
