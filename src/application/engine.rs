//! Application engine - the UI-facing progression API
//!
//! `QuestEngine` owns the session's `GameState` and the injected content and
//! persistence ports. Every mutating operation computes a complete successor
//! state, commits it as one atomic replacement, then writes it through the
//! save gateway; a failed save degrades to a `SaveFailed` event instead of
//! blocking play.

use crate::application::api::{ApiError, EngineEvent, PuzzleReport, ResumeKind, TurnReport};
use crate::domain::battle::{BattleSession, BattleVerdict};
use crate::domain::entities::{GameState, HeroProfile, QuestDefinition, SceneBody, SceneDefinition};
use crate::domain::errors::DomainError;
use crate::domain::puzzle::{PuzzleJudgement, PuzzleSession};
use crate::domain::repositories::{ContentStore, PersistenceError, SaveData, SaveGateway};
use crate::domain::services::ProgressionService;
use crate::domain::stats::PlayerStatsService;
use crate::domain::value_objects::{
    QuestId, SceneOutcome, SceneProgress, StatAdjustment,
};
use std::sync::Arc;

/// The scene/quest progression engine
///
/// One instance per session. Operations take `&mut self`, so a second action
/// can never interleave with one still in flight.
pub struct QuestEngine {
    content: Arc<dyn ContentStore>,
    gateway: Arc<dyn SaveGateway>,
    session_key: String,
    state: GameState,
    progression: ProgressionService,
    stats: PlayerStatsService,
}

impl QuestEngine {
    /// Start a brand-new session for `hero`.
    ///
    /// The authored story graph is validated up front; a dangling transition
    /// target is a content bug and refuses to launch rather than surfacing
    /// mid-quest.
    pub fn new(
        content: Arc<dyn ContentStore>,
        gateway: Arc<dyn SaveGateway>,
        session_key: impl Into<String>,
        hero: HeroProfile,
    ) -> Result<Self, ApiError> {
        let progression = ProgressionService::new();
        progression.validate_story_graph(content.as_ref())?;
        let state = GameState::new_game(hero, content.list_quests());
        Ok(Self {
            content,
            gateway,
            session_key: session_key.into(),
            state,
            progression,
            stats: PlayerStatsService::new(),
        })
    }

    /// Resume from the save gateway, falling back to a fresh state when no
    /// usable save exists.
    ///
    /// A save written against different authored content, a corrupt
    /// snapshot, or a gateway failure all degrade to a fresh start with the
    /// reason reported; they never crash the session.
    pub async fn resume(
        content: Arc<dyn ContentStore>,
        gateway: Arc<dyn SaveGateway>,
        session_key: impl Into<String>,
    ) -> Result<(Self, ResumeKind), ApiError> {
        let session_key = session_key.into();
        let mut engine = Self::new(
            content.clone(),
            gateway.clone(),
            session_key.clone(),
            HeroProfile::default(),
        )?;

        let kind = match gateway.load(&session_key).await {
            Ok(Some(save)) => {
                if save.content_digest != content.digest() {
                    ResumeKind::Fresh {
                        reason: Some(
                            PersistenceError::ContentMismatch {
                                expected: content.digest().to_string(),
                                found: save.content_digest,
                            }
                            .to_string(),
                        ),
                    }
                } else if let Err(error) = save.state.check_invariants() {
                    ResumeKind::Fresh {
                        reason: Some(error.to_string()),
                    }
                } else {
                    engine.state = save.state;
                    ResumeKind::Loaded
                }
            }
            Ok(None) => ResumeKind::Fresh { reason: None },
            Err(error) => {
                log::warn!("failed to load save for '{session_key}': {error}");
                ResumeKind::Fresh {
                    reason: Some(error.to_string()),
                }
            }
        };

        Ok((engine, kind))
    }

    /// Read-only view of the full session state
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    /// The scene definition the player is standing in, if any
    pub fn current_scene(&self) -> Option<&SceneDefinition> {
        self.state
            .scene
            .scene_id()
            .and_then(|id| self.content.scene(id))
    }

    /// Authored definition of a quest, for presentation
    pub fn quest_definition(&self, quest_id: QuestId) -> Option<&QuestDefinition> {
        self.content.quest(quest_id)
    }

    /// Begin a quest whose status is `Available` (or `Completed`, for
    /// replay). Starting a locked quest is a no-op error; state is
    /// untouched.
    pub async fn start_quest(&mut self, quest_id: QuestId) -> Result<TurnReport, ApiError> {
        self.state.check_invariants()?;
        let (next, events) =
            self.progression
                .start_quest(&self.state, self.content.as_ref(), quest_id)?;
        Ok(self.commit(next, Self::map_events(events)).await)
    }

    /// Resolve the current scene with `outcome` and move on, or complete
    /// the quest when the resolved target is the terminal sentinel.
    pub async fn complete_scene(&mut self, outcome: SceneOutcome) -> Result<TurnReport, ApiError> {
        self.state.check_invariants()?;
        let (next, events) =
            self.progression
                .complete_scene(&self.state, self.content.as_ref(), &outcome)?;
        Ok(self.commit(next, Self::map_events(events)).await)
    }

    /// Merge transient progress (story panel cursor, puzzle attempts) into
    /// the current scene state. A pure merge; scene and quest ids never
    /// change here.
    pub async fn update_scene_progress(
        &mut self,
        progress: SceneProgress,
    ) -> Result<TurnReport, ApiError> {
        self.state.check_invariants()?;
        let mut next = self.state.clone();
        next.scene.merge_progress(progress);
        Ok(self.commit(next, Vec::new()).await)
    }

    /// Apply a stat adjustment through the player state manager
    pub async fn apply_stats(&mut self, adjustment: StatAdjustment) -> Result<TurnReport, ApiError> {
        self.state.check_invariants()?;
        let mut next = self.state.clone();
        let events = self.stats.apply(&mut next.player, &adjustment);
        Ok(self
            .commit(next, events.into_iter().map(EngineEvent::from).collect())
            .await)
    }

    /// Submit an answer for the puzzle scene the player is standing in.
    ///
    /// A correct answer resolves the scene immediately regardless of
    /// attempts spent; the third miss resolves it to the failure branch.
    pub async fn submit_puzzle_answer(&mut self, answer: &str) -> Result<PuzzleReport, ApiError> {
        self.state.check_invariants()?;
        let scene = self.current_scene_def()?;
        let mut session = PuzzleSession::from_scene(scene, self.state.scene.attempts())?;

        match session.submit(answer)? {
            PuzzleJudgement::Solved => {
                let report = self.complete_scene(SceneOutcome::Success).await?;
                Ok(PuzzleReport::Solved(report))
            }
            PuzzleJudgement::Retry {
                attempts_used,
                remaining,
            } => {
                let report = self
                    .update_scene_progress(SceneProgress::attempts(attempts_used))
                    .await?;
                Ok(PuzzleReport::Incorrect { remaining, report })
            }
            PuzzleJudgement::Exhausted => {
                let report = self.complete_scene(SceneOutcome::Failure).await?;
                Ok(PuzzleReport::Exhausted(report))
            }
        }
    }

    /// Open a battle session against the current battle scene's enemy.
    ///
    /// The session is driven turn by turn by the caller and handed back to
    /// [`QuestEngine::resolve_battle`] once it reaches a verdict.
    pub fn begin_battle(&self) -> Result<BattleSession, ApiError> {
        let scene = self.current_scene_def()?;
        match &scene.body {
            SceneBody::Battle { enemy, .. } => {
                Ok(BattleSession::new(scene, enemy, &self.state.player))
            }
            _ => Err(DomainError::WrongSceneKind {
                expected: crate::domain::value_objects::SceneKind::Battle,
                actual: scene.kind(),
            }
            .into()),
        }
    }

    /// Fold a finished battle back into the progression.
    ///
    /// Victory banks the survivors' health/energy and grants the reward
    /// bundle before resolving to the victory scene. Defeat is never
    /// permanent: resources refill and play resumes at the authored defeat
    /// scene, or the quest restarts from its first scene when none exists.
    pub async fn resolve_battle(&mut self, session: BattleSession) -> Result<TurnReport, ApiError> {
        self.state.check_invariants()?;
        let scene = self.current_scene_def()?;
        if session.scene_id() != &scene.id {
            return Err(DomainError::invalid_state(format!(
                "battle session belongs to scene '{}', but the current scene is '{}'",
                session.scene_id(),
                scene.id
            ))
            .into());
        }
        let verdict = session
            .verdict()
            .ok_or_else(|| DomainError::invalid_state("battle is not decided yet"))?;
        let rewards = match &scene.body {
            SceneBody::Battle { rewards, .. } => rewards.clone(),
            _ => unreachable!("begin_battle only opens sessions on battle scenes"),
        };

        let mut next = self.state.clone();
        let mut events: Vec<EngineEvent> = Vec::new();
        let outcome = match verdict {
            BattleVerdict::Victory => {
                next.player.set_health(session.player_health());
                next.player.set_energy(session.player_energy());
                events.extend(
                    self.stats
                        .grant_rewards(&mut next.player, &rewards)
                        .into_iter()
                        .map(EngineEvent::from),
                );
                SceneOutcome::Success
            }
            BattleVerdict::Defeat => {
                self.stats.restore_after_defeat(&mut next.player);
                SceneOutcome::Failure
            }
        };

        let (after, progression_events) =
            self.progression
                .complete_scene(&next, self.content.as_ref(), &outcome)?;
        events.extend(Self::map_events(progression_events));
        Ok(self.commit(after, events).await)
    }

    /// Throw the session away and rebuild the initial state, keeping the
    /// hero's identity. The recovery path for invariant violations.
    pub async fn reset(&mut self) -> Result<TurnReport, ApiError> {
        let profile = HeroProfile {
            name: self.state.player.name().to_string(),
            god_parent: self.state.player.god_parent().to_string(),
        };
        let next = GameState::new_game(profile, self.content.list_quests());
        Ok(self.commit(next, vec![EngineEvent::GameReset]).await)
    }

    fn current_scene_def(&self) -> Result<&SceneDefinition, DomainError> {
        let scene_id = self
            .state
            .scene
            .scene_id()
            .ok_or_else(|| DomainError::invalid_state("no scene is active"))?;
        self.content
            .scene(scene_id)
            .ok_or_else(|| DomainError::scene_not_found(scene_id.clone()))
    }

    /// Replace the whole state in one assignment, then write it through the
    /// gateway. A failed save is reported as an event; the in-memory state
    /// stands either way.
    async fn commit(&mut self, next: GameState, mut events: Vec<EngineEvent>) -> TurnReport {
        self.state = next;
        let save = SaveData {
            content_digest: self.content.digest().to_string(),
            state: self.state.clone(),
        };
        if let Err(error) = self.gateway.save(&self.session_key, &save).await {
            log::warn!("write-through save failed for '{}': {error}", self.session_key);
            events.push(EngineEvent::SaveFailed {
                detail: error.to_string(),
            });
        }
        TurnReport {
            state: self.state.clone(),
            events,
        }
    }

    fn map_events(
        events: Vec<crate::domain::services::ProgressionEvent>,
    ) -> Vec<EngineEvent> {
        events.into_iter().map(EngineEvent::from).collect()
    }
}
