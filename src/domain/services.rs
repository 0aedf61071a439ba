//! Domain services - Quest and scene progression logic

use crate::domain::entities::{GameState, SceneBody, SceneDefinition, SceneState};
use crate::domain::errors::DomainError;
use crate::domain::repositories::ContentStore;
use crate::domain::value_objects::{QuestId, QuestStatus, SceneId, SceneOutcome};

/// What a progression step did, for the caller's notification layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionEvent {
    QuestStarted(QuestId),
    SceneEntered(SceneId),
    QuestCompleted(QuestId),
    QuestUnlocked(QuestId),
    /// Battle defeat with no authored defeat scene sent the player back to
    /// the quest's starting scene
    QuestRestarted(QuestId),
}

/// Where a resolved scene outcome leads
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    Goto(SceneId),
    RestartQuest,
}

/// Core domain service owning all quest/scene transition rules
///
/// Every operation computes a complete successor `GameState` from the current
/// one; the caller commits it as a single atomic replacement. No partial
/// mutation is ever observable mid-transition.
pub struct ProgressionService;

impl ProgressionService {
    pub fn new() -> Self {
        Self
    }

    /// Begin a quest: precondition `Available` (or `Completed` for replay).
    ///
    /// The successor state carries both the quest activation and the fully
    /// resolved starting scene, so no caller can ever observe a current
    /// quest with a dangling or foreign scene.
    pub fn start_quest(
        &self,
        state: &GameState,
        store: &dyn ContentStore,
        quest_id: QuestId,
    ) -> Result<(GameState, Vec<ProgressionEvent>), DomainError> {
        let quest = store
            .quest(quest_id)
            .ok_or(DomainError::QuestNotFound { id: quest_id })?;
        let status = state
            .quests
            .status_of(quest_id)
            .ok_or(DomainError::QuestNotFound { id: quest_id })?;
        if !status.is_startable() {
            return Err(DomainError::QuestLocked { id: quest_id });
        }

        let first_scene = store
            .scene(&quest.starting_scene_id)
            .ok_or_else(|| DomainError::scene_not_found(quest.starting_scene_id.clone()))?;
        if first_scene.quest_id != quest_id {
            return Err(DomainError::content_integrity(format!(
                "starting scene '{}' of quest {quest_id} belongs to quest {}",
                first_scene.id, first_scene.quest_id
            )));
        }

        let mut next = state.clone();
        next.quests.set_current(Some(quest_id));
        next.quests.set_status(quest_id, QuestStatus::Active);
        next.scene = SceneState::enter(first_scene);

        log::debug!("quest {quest_id} started at scene '{}'", first_scene.id);
        Ok((
            next,
            vec![
                ProgressionEvent::QuestStarted(quest_id),
                ProgressionEvent::SceneEntered(first_scene.id.clone()),
            ],
        ))
    }

    /// Resolve a finished scene into the next position.
    ///
    /// This is the single place where quest completion and quest unlocking
    /// happen; no other code path may flip availability statuses.
    pub fn complete_scene(
        &self,
        state: &GameState,
        store: &dyn ContentStore,
        outcome: &SceneOutcome,
    ) -> Result<(GameState, Vec<ProgressionEvent>), DomainError> {
        let quest_id = state
            .quests
            .current()
            .ok_or_else(|| DomainError::invalid_state("no quest is active"))?;
        let scene_id = state
            .scene
            .scene_id()
            .ok_or_else(|| DomainError::invalid_state("no scene is active"))?;
        let scene = store
            .scene(scene_id)
            .ok_or_else(|| DomainError::scene_not_found(scene_id.clone()))?;

        match Self::resolve(scene, outcome) {
            Resolution::Goto(next_id) if next_id.is_terminal() => {
                Ok(self.complete_quest(state, store, quest_id))
            }
            Resolution::Goto(next_id) => {
                let next_scene = store
                    .scene(&next_id)
                    .ok_or_else(|| DomainError::scene_not_found(next_id.clone()))?;
                let mut next = state.clone();
                next.scene = SceneState::enter(next_scene);
                log::debug!("scene '{}' -> '{}'", scene.id, next_scene.id);
                Ok((next, vec![ProgressionEvent::SceneEntered(next_id)]))
            }
            Resolution::RestartQuest => {
                let (next, mut events) = self.restart_quest(state, store, quest_id)?;
                events.insert(0, ProgressionEvent::QuestRestarted(quest_id));
                Ok((next, events))
            }
        }
    }

    /// Put the player back at the starting scene of the active quest,
    /// progress reset. Quest availability is untouched.
    pub fn restart_quest(
        &self,
        state: &GameState,
        store: &dyn ContentStore,
        quest_id: QuestId,
    ) -> Result<(GameState, Vec<ProgressionEvent>), DomainError> {
        let quest = store
            .quest(quest_id)
            .ok_or(DomainError::QuestNotFound { id: quest_id })?;
        let first_scene = store
            .scene(&quest.starting_scene_id)
            .ok_or_else(|| DomainError::scene_not_found(quest.starting_scene_id.clone()))?;

        let mut next = state.clone();
        next.scene = SceneState::enter(first_scene);
        Ok((
            next,
            vec![ProgressionEvent::SceneEntered(first_scene.id.clone())],
        ))
    }

    /// Deterministic resolution table over (scene kind, outcome)
    fn resolve(scene: &SceneDefinition, outcome: &SceneOutcome) -> Resolution {
        match &scene.body {
            SceneBody::Story { next_scene, .. } => Resolution::Goto(next_scene.clone()),
            SceneBody::Puzzle {
                success_scene,
                failure_scene,
                ..
            } => {
                if *outcome == SceneOutcome::Success {
                    Resolution::Goto(success_scene.clone())
                } else {
                    Resolution::Goto(failure_scene.clone())
                }
            }
            SceneBody::Decision {
                choices,
                default_next_scene,
                ..
            } => {
                let chosen = match outcome {
                    SceneOutcome::Choice(choice_id) => choices
                        .iter()
                        .find(|c| &c.id == choice_id)
                        .map(|c| c.next_scene.clone()),
                    _ => None,
                };
                Resolution::Goto(chosen.unwrap_or_else(|| default_next_scene.clone()))
            }
            SceneBody::Battle {
                victory_scene,
                defeat_scene,
                ..
            } => {
                if *outcome == SceneOutcome::Success {
                    Resolution::Goto(victory_scene.clone())
                } else {
                    match defeat_scene {
                        Some(scene_id) => Resolution::Goto(scene_id.clone()),
                        None => Resolution::RestartQuest,
                    }
                }
            }
        }
    }

    /// Move the active quest into the completed set and unlock every quest
    /// whose prerequisites are now fully satisfied.
    fn complete_quest(
        &self,
        state: &GameState,
        store: &dyn ContentStore,
        quest_id: QuestId,
    ) -> (GameState, Vec<ProgressionEvent>) {
        let mut next = state.clone();
        next.quests.mark_completed(quest_id);

        let mut events = vec![ProgressionEvent::QuestCompleted(quest_id)];
        for quest in store.list_quests() {
            if next.quests.status_of(quest.id) == Some(QuestStatus::Locked)
                && next.quests.prerequisites_met(quest)
            {
                next.quests.set_status(quest.id, QuestStatus::Available);
                events.push(ProgressionEvent::QuestUnlocked(quest.id));
            }
        }

        log::debug!("quest {quest_id} completed");
        // The scene is left pointing at the just-finished scene so the
        // presentation layer can show its summary before returning to the
        // quest board.
        (next, events)
    }

    /// Audit the whole story graph before play begins: every declared
    /// transition target must be the terminal sentinel or a real scene, every
    /// scene must belong to a known quest, every prerequisite must exist.
    pub fn validate_story_graph(&self, store: &dyn ContentStore) -> Result<(), DomainError> {
        for quest in store.list_quests() {
            for required in &quest.required_quest_ids {
                if store.quest(*required).is_none() {
                    return Err(DomainError::content_integrity(format!(
                        "quest {} requires unknown quest {required}",
                        quest.id
                    )));
                }
            }
            let first = store.scene(&quest.starting_scene_id).ok_or_else(|| {
                DomainError::content_integrity(format!(
                    "quest {} starts at unknown scene '{}'",
                    quest.id, quest.starting_scene_id
                ))
            })?;
            if first.quest_id != quest.id {
                return Err(DomainError::content_integrity(format!(
                    "quest {} starts at scene '{}' which belongs to quest {}",
                    quest.id, first.id, first.quest_id
                )));
            }
        }

        for scene in store.list_scenes() {
            if store.quest(scene.quest_id).is_none() {
                return Err(DomainError::content_integrity(format!(
                    "scene '{}' belongs to unknown quest {}",
                    scene.id, scene.quest_id
                )));
            }
            for target in scene.transition_targets() {
                if !target.is_terminal() && store.scene(target).is_none() {
                    return Err(DomainError::content_integrity(format!(
                        "scene '{}' references unknown scene '{target}'",
                        scene.id
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for ProgressionService {
    fn default() -> Self {
        Self::new()
    }
}
