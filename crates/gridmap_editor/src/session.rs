//! Last-session autosave slot
//!
//! A single snapshot in the platform config directory, overwritten
//! wholesale on every store. Not a history and not versioned; it exists so
//! an interrupted session can be picked up where it left off.

use directories::ProjectDirs;
use gridmap_core::MapSnapshot;
use log::warn;
use std::path::PathBuf;
use thiserror::Error;

const AUTOSAVE_FILE: &str = "last_session.json";

/// Errors that can occur reading or writing the autosave slot
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Handle on the directory holding the autosave slot
#[derive(Debug, Clone)]
pub struct SessionCache {
    dir: PathBuf,
}

impl SessionCache {
    /// Use an explicit directory (tests, portable installs)
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Use the platform config directory
    pub fn default_location() -> Result<Self, SessionError> {
        ProjectDirs::from("com", "gridmap", "gridmap_editor")
            .map(|dirs| Self::at(dirs.config_dir()))
            .ok_or(SessionError::NoConfigDir)
    }

    /// Path of the slot file
    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(AUTOSAVE_FILE)
    }

    /// Overwrite the slot with this snapshot
    pub fn store(&self, snapshot: &MapSnapshot) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| SessionError::SerializeError(e.to_string()))?;
        std::fs::create_dir_all(&self.dir).map_err(|e| SessionError::IoError(e.to_string()))?;
        std::fs::write(self.slot_path(), json).map_err(|e| SessionError::IoError(e.to_string()))
    }

    /// Read the slot back; `Ok(None)` when no autosave exists yet
    pub fn restore(&self) -> Result<Option<MapSnapshot>, SessionError> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }
        let json =
            std::fs::read_to_string(&path).map_err(|e| SessionError::IoError(e.to_string()))?;
        let snapshot =
            MapSnapshot::from_json(&json).map_err(|e| SessionError::ParseError(e.to_string()))?;
        Ok(Some(snapshot))
    }

    /// Read the slot, logging and swallowing failures
    ///
    /// Startup convenience: a corrupt or unreadable autosave should cost
    /// the cached session, not the launch.
    pub fn restore_or_none(&self) -> Option<MapSnapshot> {
        match self.restore() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Could not restore last session: {}. Starting fresh.", e);
                None
            }
        }
    }

    /// Delete the slot if present
    pub fn clear(&self) -> Result<(), SessionError> {
        let path = self.slot_path();
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| SessionError::IoError(e.to_string()))?;
        }
        Ok(())
    }
}
