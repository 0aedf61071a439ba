//! Save gateway implementations - file-backed and in-memory persistence

use crate::domain::repositories::{PersistenceError, SaveData, SaveGateway};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// One `<session_key>.save.json` per session under a base directory
pub struct JsonSaveGateway {
    base_path: PathBuf,
}

impl JsonSaveGateway {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn save_path(&self, session_key: &str) -> PathBuf {
        self.base_path.join(format!("{session_key}.save.json"))
    }
}

#[async_trait]
impl SaveGateway for JsonSaveGateway {
    async fn load(&self, session_key: &str) -> Result<Option<SaveData>, PersistenceError> {
        let path = self.save_path(session_key);
        if !path.exists() {
            return Ok(None);
        }

        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            PersistenceError::io(format!("failed to read save file {}: {e}", path.display()))
        })?;
        let data = serde_json::from_str(&raw)
            .map_err(|e| PersistenceError::serialization(format!("corrupt save file: {e}")))?;
        Ok(Some(data))
    }

    async fn save(&self, session_key: &str, data: &SaveData) -> Result<(), PersistenceError> {
        let path = self.save_path(session_key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PersistenceError::io(format!("failed to create save directory: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| PersistenceError::serialization(format!("failed to serialize save: {e}")))?;
        tokio::fs::write(&path, json).await.map_err(|e| {
            PersistenceError::io(format!("failed to write save file {}: {e}", path.display()))
        })
    }

    async fn delete(&self, session_key: &str) -> Result<(), PersistenceError> {
        let path = self.save_path(session_key);
        if !path.exists() {
            return Err(PersistenceError::NotFound {
                session_key: session_key.to_string(),
            });
        }
        tokio::fs::remove_file(&path).await.map_err(|e| {
            PersistenceError::io(format!("failed to delete save file {}: {e}", path.display()))
        })
    }
}

/// In-memory gateway for tests, with a switch to make saves start failing
#[derive(Default)]
pub struct InMemorySaveGateway {
    saves: Mutex<HashMap<String, SaveData>>,
    failing: AtomicBool,
}

impl InMemorySaveGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `save` call reports `Unavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self, session_key: &str) -> Option<SaveData> {
        self.saves
            .lock()
            .expect("save gateway lock poisoned")
            .get(session_key)
            .cloned()
    }
}

#[async_trait]
impl SaveGateway for InMemorySaveGateway {
    async fn load(&self, session_key: &str) -> Result<Option<SaveData>, PersistenceError> {
        Ok(self.stored(session_key))
    }

    async fn save(&self, session_key: &str, data: &SaveData) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable {
                reason: "save gateway offline".to_string(),
            });
        }
        self.saves
            .lock()
            .expect("save gateway lock poisoned")
            .insert(session_key.to_string(), data.clone());
        Ok(())
    }

    async fn delete(&self, session_key: &str) -> Result<(), PersistenceError> {
        let removed = self
            .saves
            .lock()
            .expect("save gateway lock poisoned")
            .remove(session_key);
        match removed {
            Some(_) => Ok(()),
            None => Err(PersistenceError::NotFound {
                session_key: session_key.to_string(),
            }),
        }
    }
}
