//! Remembered handle lists between runs
//!
//! Holds only the raw text the user typed last time. Ratings are never
//! written here.

use crate::config::{data_dir, write_toml_file};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const LAST_INPUT_FILE: &str = "last_input.toml";

/// Raw comma-separated handle lists as last entered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastInput {
    pub lichess: String,
    pub chesscom: String,
}

impl LastInput {
    pub fn is_empty(&self) -> bool {
        self.lichess.trim().is_empty() && self.chesscom.trim().is_empty()
    }
}

/// File-backed key-value store for [`LastInput`]
#[derive(Debug, Clone)]
pub struct InputStore {
    path: PathBuf,
}

impl InputStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(data_dir()?.join(LAST_INPUT_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state yields empty input
    pub fn load(&self) -> LastInput {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LastInput::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read remembered input");
                return LastInput::default();
            }
        };

        match toml::from_str(&content) {
            Ok(input) => input,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt remembered input");
                LastInput::default()
            }
        }
    }

    pub fn save(&self, input: &LastInput) -> Result<()> {
        write_toml_file(input, &self.path)?;
        debug!(path = %self.path.display(), "Saved input");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
