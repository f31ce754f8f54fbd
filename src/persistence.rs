//! JSON snapshot persistence
//!
//! Small state blobs (statistics, achievements, adaptive AI) live as
//! pretty-printed JSON files. Saves go through a temp file and rename so a
//! crash mid-write never corrupts the previous snapshot.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "snapshot io error: {err}"),
            SnapshotError::Format(err) => write!(f, "snapshot format error: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Format(err)
    }
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load a snapshot, falling back to (and writing out) the default when the
/// file is missing. A corrupt file is left in place and logged; the default
/// is used for the session without overwriting the evidence.
pub fn load_or_init<T: Default + Serialize + DeserializeOwned>(path: &Path) -> T {
    if !path.exists() {
        let value = T::default();
        if let Err(err) = save(path, &value) {
            log::warn!("could not initialize {}: {err}", path.display());
        } else {
            log::info!("initialized {}", path.display());
        }
        return value;
    }
    match load(path) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("ignoring corrupt snapshot {}: {err}", path.display());
            T::default()
        }
    }
}
