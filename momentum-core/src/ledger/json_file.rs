//! JSON position file: one object mapping ticker → position, 2-space indented.
//!
//! A file that cannot be read or parsed loads as an empty ledger and is left
//! untouched. It is only moved aside to `<name>.quarantined` when a new
//! ledger is saved over it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{LedgerError, PositionStore};
use crate::domain::Positions;
use crate::persist::write_atomic;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read: missing file is empty, anything unreadable is `Corrupt`.
    pub fn read(&self) -> Result<Positions, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Positions::new()),
            Err(e) => return Err(self.corrupt(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(Positions::new());
        }
        serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))
    }

    fn corrupt(&self, reason: String) -> LedgerError {
        LedgerError::Corrupt {
            path: self.path.display().to_string(),
            reason,
        }
    }

    fn quarantine(&self) {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".quarantined");
        let target = self.path.with_file_name(name);
        if let Err(e) = fs::rename(&self.path, &target) {
            warn!(path = %self.path.display(), error = %e, "could not quarantine position file");
        }
    }
}

impl PositionStore for JsonFileStore {
    fn load(&self) -> Positions {
        match self.read() {
            Ok(positions) => {
                debug!(path = %self.path.display(), count = positions.len(), "positions loaded");
                positions
            }
            Err(e) => {
                warn!(error = %e, "treating position file as empty");
                Positions::new()
            }
        }
    }

    fn save(&mut self, positions: &Positions) -> Result<(), LedgerError> {
        if self.path.exists() && self.read().is_err() {
            self.quarantine();
        }
        let json = serde_json::to_string_pretty(positions)?;
        write_atomic(&self.path, json.as_bytes()).map_err(|source| LedgerError::Persistence {
            path: self.path.display().to_string(),
            source,
        })
    }
}
