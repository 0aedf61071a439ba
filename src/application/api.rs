//! Public API types - External contracts for the questline engine
//!
//! This module contains all public types that host applications depend on.
//! These types form the stable contract and should be changed with care.

use crate::domain::entities::GameState;
use crate::domain::errors::DomainError;
use crate::domain::repositories::PersistenceError;
use crate::domain::services::ProgressionEvent;
use crate::domain::stats::StatsEvent;
use serde::{Deserialize, Serialize};

/// Notification raised by an engine operation, for the host's UI layer
///
/// The engine never renders anything itself; it reports what happened and
/// the host decides how (or whether) to surface it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "args")]
#[non_exhaustive]
pub enum EngineEvent {
    /// A quest became active and its first scene was entered
    QuestStarted { quest_id: u32 },
    /// The player moved to a new scene
    SceneEntered { scene_id: String },
    /// The active quest finished
    QuestCompleted { quest_id: u32 },
    /// A quest's prerequisites are now satisfied
    QuestUnlocked { quest_id: u32 },
    /// A battle defeat sent the player back to the quest's first scene
    QuestRestarted { quest_id: u32 },
    /// The hero reached a new level; health and energy were restored
    LeveledUp { level: i32 },
    /// Loot entered the inventory
    ItemGained { name: String },
    /// The whole session was reset to its initial state
    GameReset,
    /// The write-through save failed; gameplay continued on the in-memory
    /// state and the host may retry or warn the user
    SaveFailed { detail: String },
}

impl From<ProgressionEvent> for EngineEvent {
    fn from(event: ProgressionEvent) -> Self {
        match event {
            ProgressionEvent::QuestStarted(id) => EngineEvent::QuestStarted {
                quest_id: id.value(),
            },
            ProgressionEvent::SceneEntered(id) => EngineEvent::SceneEntered {
                scene_id: id.as_str().to_string(),
            },
            ProgressionEvent::QuestCompleted(id) => EngineEvent::QuestCompleted {
                quest_id: id.value(),
            },
            ProgressionEvent::QuestUnlocked(id) => EngineEvent::QuestUnlocked {
                quest_id: id.value(),
            },
            ProgressionEvent::QuestRestarted(id) => EngineEvent::QuestRestarted {
                quest_id: id.value(),
            },
        }
    }
}

impl From<StatsEvent> for EngineEvent {
    fn from(event: StatsEvent) -> Self {
        match event {
            StatsEvent::LeveledUp { level } => EngineEvent::LeveledUp { level },
            StatsEvent::ItemGained { name } => EngineEvent::ItemGained { name },
        }
    }
}

/// Result of a single mutating engine operation
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    /// The state after the operation (already committed and saved)
    pub state: GameState,
    /// Notifications raised while applying it, in order
    pub events: Vec<EngineEvent>,
}

/// Result of submitting a puzzle answer
#[derive(Clone, Debug, PartialEq)]
pub enum PuzzleReport {
    /// Correct answer; the scene resolved to its success branch
    Solved(TurnReport),
    /// Wrong answer with attempts to spare; only the attempt counter moved
    Incorrect { remaining: u32, report: TurnReport },
    /// Wrong answer on the final attempt; the scene resolved to its failure
    /// branch
    Exhausted(TurnReport),
}

/// How a session came back from the persistence gateway
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResumeKind {
    /// The saved snapshot was restored
    Loaded,
    /// A fresh state was built; `reason` explains why when a save existed
    /// but could not be used
    Fresh { reason: Option<String> },
}

/// Error types returned by the public API
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Business rule or content violation from the domain layer
    #[error("{0}")]
    Domain(#[from] DomainError),
    /// Failure in the persistence gateway severe enough to abort the
    /// operation (write-through save failures are events, not errors)
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl ApiError {
    /// Whether the host should offer a full reset instead of a retry
    pub fn is_fatal(&self) -> bool {
        match self {
            ApiError::Domain(error) => error.is_fatal(),
            ApiError::Persistence(_) => false,
        }
    }
}
