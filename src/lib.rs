//! # questline
//!
//! A deterministic narrative quest engine: players progress through a
//! directed graph of authored scenes (story panels, riddles, branching
//! decisions, turn-based battles) with persistent player and quest state
//! gating what is reachable.
//!
//! The engine performs no I/O of its own. Authored content and save storage
//! are injected ports; every operation computes a complete successor state
//! and commits it atomically, then writes it through the save gateway.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use questline::domain::entities::{QuestDefinition, SceneBody, SceneDefinition};
//! use questline::domain::value_objects::{QuestId, SceneId, SceneOutcome, StoryPanel};
//! use questline::infrastructure::{InMemoryContentStore, InMemorySaveGateway};
//! use questline::{HeroProfile, QuestEngine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let quests = vec![QuestDefinition {
//!     id: QuestId::new(1),
//!     title: "The Lightning Thief".to_string(),
//!     description: "Recover the stolen bolt.".to_string(),
//!     recommended_level: 1,
//!     estimated_time: None,
//!     starting_scene_id: SceneId::from("intro"),
//!     required_quest_ids: vec![],
//! }];
//! let scenes = vec![SceneDefinition {
//!     id: SceneId::from("intro"),
//!     title: "Welcome to Camp".to_string(),
//!     quest_id: QuestId::new(1),
//!     body: SceneBody::Story {
//!         panels: vec![StoryPanel {
//!             dialogue: "Welcome to Camp Half-Blood.".to_string(),
//!             narration: None,
//!             image_description: None,
//!         }],
//!         next_scene: SceneId::from("end"),
//!     },
//! }];
//!
//! let content = Arc::new(InMemoryContentStore::new(quests, scenes)?);
//! let gateway = Arc::new(InMemorySaveGateway::new());
//! let mut engine = QuestEngine::new(content, gateway, "session-1", HeroProfile::default())?;
//!
//! engine.start_quest(QuestId::new(1)).await?;
//! let report = engine.complete_scene(SceneOutcome::Advance).await?;
//! assert!(report.state.quests.is_completed(QuestId::new(1)));
//! # Ok(())
//! # }
//! ```
//!
//! Battles run as a nested session the host drives turn by turn
//! ([`QuestEngine::begin_battle`] / [`QuestEngine::resolve_battle`]);
//! puzzles go through [`QuestEngine::submit_puzzle_answer`] with a
//! three-attempt budget.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

// Stable public contracts - the main API for host applications
pub use application::api::{ApiError, EngineEvent, PuzzleReport, ResumeKind, TurnReport};
pub use application::engine::QuestEngine;

// Domain exports for advanced usage
pub use domain::battle::{BattleAction, BattlePhase, BattleSession, BattleVerdict};
pub use domain::entities::{GameState, HeroProfile};
pub use domain::errors::DomainError;
pub use domain::repositories::{ContentStore, PersistenceError, SaveData, SaveGateway};
pub use domain::value_objects::{
    QuestId, QuestStatus, SceneId, SceneKind, SceneOutcome, SceneProgress, StatAdjustment,
};
