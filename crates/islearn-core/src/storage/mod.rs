mod config;
pub mod database;
mod profile_store;

pub use config::{CatalogConfig, Config, GameConfig, UiConfig};
pub use database::Database;
pub use profile_store::{MemoryProfileStore, ProfileStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/islearn[-dev]/` based on ISLEARN_ENV.
///
/// Set ISLEARN_ENV=dev to use development data directory.
/// ISLEARN_DATA_DIR overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ISLEARN_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ISLEARN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("islearn-dev")
            } else {
                base_dir.join("islearn")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
