//! Save/load of flat JSON files
//!
//! Features:
//! - Missing file is not an error (`Ok(None)`)
//! - Writes go to a temp file first, then replace the target (full overwrite)
//! - A file that exists but cannot be read can be copied aside before it is
//!   overwritten

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("refusing to overwrite unreadable {} that has no backup", path.display())]
    Unreadable { path: PathBuf },
}

/// `path` with `suffix` appended to its file name
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Read and parse `path`. A missing file yields `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Serialize `value` and overwrite `path` with it
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = with_suffix(path, ".tmp");

    let io_err = |source: io::Error| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Copy `path` to `<path>.bak`, replacing an older backup
pub fn backup(path: &Path) -> Result<PathBuf, PersistenceError> {
    let backup = with_suffix(path, ".bak");
    fs::copy(path, &backup).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(backup)
}

/// Load `path`, falling back to `T::default()` when it is missing or broken
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path, what: &str) -> T {
    match load_json(path) {
        Ok(Some(value)) => {
            log::info!("Loaded {} from {}", what, path.display());
            value
        }
        Ok(None) => {
            log::info!("No {} found at {}, using defaults", what, path.display());
            T::default()
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", what, e);
            T::default()
        }
    }
}
