//! Domain errors - Business logic errors

use crate::domain::value_objects::{QuestId, SceneId, SceneKind};
use thiserror::Error;

/// Domain-specific errors that represent business rule violations
///
/// Expected gameplay outcomes (wrong puzzle answer, battle defeat) are never
/// errors; they travel through return values. Only a locked quest, broken
/// authored content, or a corrupted state reaches this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Referenced scene missing from the content store. Authored-content bug,
    /// not recoverable at runtime.
    #[error("Scene '{id}' not found in content store")]
    SceneNotFound { id: SceneId },

    /// Referenced quest missing from the content store
    #[error("Quest {id} not found in content store")]
    QuestNotFound { id: QuestId },

    /// Attempt to start a quest whose prerequisites are unmet. Reported to
    /// the caller as a no-op with explanation; state is untouched.
    #[error("Quest {id} is locked; complete its prerequisite quests first")]
    QuestLocked { id: QuestId },

    /// Authored content failed graph validation
    #[error("Content integrity violation: {reason}")]
    ContentIntegrity { reason: String },

    /// The game state contradicts itself. The only safe recovery is a full
    /// reset; partial repair is never attempted.
    #[error("Game state invariant violated: {detail}")]
    InvariantViolation { detail: String },

    /// Operation does not apply to the current scene kind
    #[error("Expected a {expected} scene, but the current scene is {actual}")]
    WrongSceneKind {
        expected: SceneKind,
        actual: SceneKind,
    },

    /// Operation requires state the session does not have
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },
}

impl DomainError {
    pub fn scene_not_found(id: impl Into<SceneId>) -> Self {
        Self::SceneNotFound { id: id.into() }
    }

    pub fn quest_not_found(id: impl Into<QuestId>) -> Self {
        Self::QuestNotFound { id: id.into() }
    }

    pub fn content_integrity(reason: impl Into<String>) -> Self {
        Self::ContentIntegrity {
            reason: reason.into(),
        }
    }

    pub fn invariant_violation(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Content-integrity and invariant errors are fatal to the session;
    /// everything else is a user-facing no-op.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SceneNotFound { .. }
                | Self::QuestNotFound { .. }
                | Self::ContentIntegrity { .. }
                | Self::InvariantViolation { .. }
        )
    }
}
