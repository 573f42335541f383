//! `.env` loading
//!
//! Priority order (highest to lowest):
//! 1. Environment variables already set
//! 2. Current directory .env
//! 3. ~/.opusctl/.env
//!
//! dotenvy never overwrites a variable that is already set, so loading the
//! files in this order gives the priority above.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Get the opusctl config directory path (~/.opusctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".opusctl"))
}

/// Load ./.env and ~/.opusctl/.env into the process environment.
///
/// Runs before tracing is initialised; results are reported at debug level
/// once a subscriber exists, so missing files are never an error.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(dir) = config_dir() {
        if let Some(path) = load_env_file(&dir.join(".env")) {
            loaded.push(path);
        }
    }

    loaded
}

/// Load one env file if it exists.
fn load_env_file(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }
    match dotenvy::from_path(path) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) => {
            debug!("Failed to load {}: {}", path.display(), e);
            None
        }
    }
}
