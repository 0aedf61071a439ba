//! Domain repository traits - Ports for authored content and saved games

use crate::domain::entities::{GameState, QuestDefinition, SceneDefinition};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{QuestId, SceneId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read-only access to the authored quest and scene catalog
///
/// Content is immutable for the process lifetime, so lookups are plain
/// synchronous reads. Implementations load and validate their data up front
/// (file system, embedded, remote snapshot); the engine never cares which.
pub trait ContentStore: Send + Sync {
    /// Look up a quest definition by id
    fn quest(&self, id: QuestId) -> Option<&QuestDefinition>;

    /// Look up a scene definition by id
    fn scene(&self, id: &SceneId) -> Option<&SceneDefinition>;

    /// All quests in authored order
    fn list_quests(&self) -> &[QuestDefinition];

    /// All scenes in authored order, for graph validation
    fn list_scenes(&self) -> &[SceneDefinition];

    /// Fingerprint of the authored content, stored in save envelopes so a
    /// stale save cannot dereference scene ids that no longer exist
    fn digest(&self) -> &str;
}

/// Envelope written by the save gateway: the snapshot plus the digest of the
/// content it was recorded against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub content_digest: String,
    pub state: GameState,
}

/// Persistence port for full game state snapshots
///
/// The engine calls `save` after every mutating operation (write-through).
/// A failed save never blocks gameplay; the engine reports it and carries on
/// with the in-memory state.
#[async_trait]
pub trait SaveGateway: Send + Sync {
    /// Load the snapshot for a session, `None` when no save exists
    async fn load(&self, session_key: &str) -> Result<Option<SaveData>, PersistenceError>;

    /// Persist the snapshot for a session
    async fn save(&self, session_key: &str, data: &SaveData) -> Result<(), PersistenceError>;

    /// Remove the snapshot for a session
    async fn delete(&self, session_key: &str) -> Result<(), PersistenceError>;
}

/// Persistence failures from the external gateway
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("No save data for session '{session_key}'")]
    NotFound { session_key: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Save was written against different content (expected digest {expected}, found {found})")]
    ContentMismatch { expected: String, found: String },

    #[error("Persistence unavailable: {reason}")]
    Unavailable { reason: String },
}

impl PersistenceError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<PersistenceError> for DomainError {
    fn from(error: PersistenceError) -> Self {
        DomainError::invalid_state(error.to_string())
    }
}
