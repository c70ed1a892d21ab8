//! Where keyboard save/restore keeps the board between presses.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chess_core::BoardSnapshot;

use crate::error::ClientError;

pub trait SnapshotStore {
    fn load(&self) -> Result<Option<BoardSnapshot>, ClientError>;

    fn save(&mut self, snapshot: &BoardSnapshot) -> Result<(), ClientError>;

    /// Store `current` if it differs from what is saved, and return the
    /// snapshot the board should be redrawn from.
    fn sync(&mut self, current: &BoardSnapshot) -> Result<BoardSnapshot, ClientError> {
        match self.load()? {
            Some(saved) if &saved == current => Ok(saved),
            _ => {
                self.save(current)?;
                Ok(current.clone())
            }
        }
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self) -> Result<Option<BoardSnapshot>, ClientError> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &BoardSnapshot) -> Result<(), ClientError> {
        (**self).save(snapshot)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Option<BoardSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<BoardSnapshot>, ClientError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, snapshot: &BoardSnapshot) -> Result<(), ClientError> {
        self.saved = Some(snapshot.clone());
        Ok(())
    }
}

/// JSON file holding one snapshot.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<BoardSnapshot>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, snapshot: &BoardSnapshot) -> Result<(), ClientError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "Board snapshot saved");
        Ok(())
    }
}
