//! Integration tests for quest/scene progression - gating, atomic starts,
//! resolution, completion, and unlock propagation

mod common;

use common::{engine, SESSION};
use questline::domain::value_objects::{ChoiceId, QuestId, SceneId, SceneOutcome};
use questline::{ApiError, DomainError, EngineEvent, PuzzleReport, QuestStatus, SceneKind};

/// Drive quest 1 along its happy path: story, oracle riddle, tunnel choice,
/// gate riddle, closing story, quest completion.
async fn finish_quest_one(engine: &mut questline::QuestEngine) {
    engine.start_quest(QuestId::new(1)).await.unwrap();
    engine.complete_scene(SceneOutcome::Advance).await.unwrap();
    match engine.submit_puzzle_answer("cyclops").await.unwrap() {
        PuzzleReport::Solved(_) => {}
        other => panic!("expected solved riddle, got {other:?}"),
    }
    engine
        .complete_scene(SceneOutcome::Choice(ChoiceId::from("tunnel")))
        .await
        .unwrap();
    match engine.submit_puzzle_answer("night day dawn").await.unwrap() {
        PuzzleReport::Solved(_) => {}
        other => panic!("expected solved riddle, got {other:?}"),
    }
    let report = engine.complete_scene(SceneOutcome::Advance).await.unwrap();
    assert!(report
        .events
        .contains(&EngineEvent::QuestCompleted { quest_id: 1 }));
}

#[tokio::test]
async fn starting_a_locked_quest_is_a_rejected_no_op() {
    let (mut engine, gateway) = engine();

    let before = engine.game_state().clone();
    let error = engine.start_quest(QuestId::new(2)).await.unwrap_err();
    assert!(matches!(
        error,
        ApiError::Domain(DomainError::QuestLocked { .. })
    ));
    assert!(!error.is_fatal());
    assert_eq!(engine.game_state(), &before);
    // The rejected start never reached the gateway either.
    assert!(gateway.stored(SESSION).is_none());
}

#[tokio::test]
async fn starting_an_unknown_quest_is_fatal() {
    let (mut engine, _gateway) = engine();
    let error = engine.start_quest(QuestId::new(99)).await.unwrap_err();
    assert!(matches!(
        error,
        ApiError::Domain(DomainError::QuestNotFound { .. })
    ));
    assert!(error.is_fatal());
}

#[tokio::test]
async fn start_quest_commits_quest_and_scene_together() {
    let (mut engine, _gateway) = engine();

    let report = engine.start_quest(QuestId::new(1)).await.unwrap();

    let state = &report.state;
    assert_eq!(state.quests.current(), Some(QuestId::new(1)));
    assert_eq!(
        state.quests.status_of(QuestId::new(1)),
        Some(QuestStatus::Active)
    );
    assert_eq!(state.scene.quest_id(), Some(QuestId::new(1)));
    assert_eq!(state.scene.scene_id(), Some(&SceneId::from("camp-arrival")));
    assert_eq!(state.scene.kind(), SceneKind::Story);
    assert_eq!(state.scene.panel(), 1);
    assert_eq!(state.scene.attempts(), 0);
    // The committed state is internally consistent by construction.
    state.check_invariants().unwrap();
}

#[tokio::test]
async fn story_scenes_advance_regardless_of_outcome() {
    let (mut engine, _gateway) = engine();
    engine.start_quest(QuestId::new(1)).await.unwrap();

    // Story resolution ignores the reported outcome entirely.
    let report = engine.complete_scene(SceneOutcome::Failure).await.unwrap();
    assert_eq!(
        report.state.scene.scene_id(),
        Some(&SceneId::from("oracle-riddle"))
    );
    assert_eq!(report.state.scene.kind(), SceneKind::Puzzle);
}

#[tokio::test]
async fn completing_a_quest_unlocks_only_satisfied_quests() {
    let (mut engine, _gateway) = engine();
    finish_quest_one(&mut engine).await;

    let state = engine.game_state();
    assert!(state.quests.is_completed(QuestId::new(1)));
    assert_eq!(state.quests.current(), None);
    assert_eq!(
        state.quests.status_of(QuestId::new(1)),
        Some(QuestStatus::Completed)
    );
    // Quest 2's prerequisite (quest 1) is met; quest 3 still needs quest 2.
    assert_eq!(
        state.quests.status_of(QuestId::new(2)),
        Some(QuestStatus::Available)
    );
    assert_eq!(
        state.quests.status_of(QuestId::new(3)),
        Some(QuestStatus::Locked)
    );
}

#[tokio::test]
async fn unlock_events_are_reported_with_completion() {
    let (mut engine, _gateway) = engine();
    engine.start_quest(QuestId::new(2)).await.unwrap_err();

    finish_quest_one(&mut engine).await;

    // Now the chain continues: quest 2 completes and unlocks quest 3.
    engine.start_quest(QuestId::new(2)).await.unwrap();
    let report = engine.complete_scene(SceneOutcome::Advance).await.unwrap();
    assert!(report
        .events
        .contains(&EngineEvent::QuestCompleted { quest_id: 2 }));
    assert!(report
        .events
        .contains(&EngineEvent::QuestUnlocked { quest_id: 3 }));
}

#[tokio::test]
async fn completed_quests_can_be_replayed() {
    let (mut engine, _gateway) = engine();
    finish_quest_one(&mut engine).await;

    let report = engine.start_quest(QuestId::new(1)).await.unwrap();
    assert_eq!(report.state.quests.current(), Some(QuestId::new(1)));
    assert_eq!(
        report.state.scene.scene_id(),
        Some(&SceneId::from("camp-arrival"))
    );
    // Completion history survives the replay.
    assert!(report.state.quests.is_completed(QuestId::new(1)));
}

#[tokio::test]
async fn decision_routes_to_the_matching_choice() {
    let (mut engine, _gateway) = engine();
    engine.start_quest(QuestId::new(1)).await.unwrap();
    engine.complete_scene(SceneOutcome::Advance).await.unwrap();
    engine.submit_puzzle_answer("cyclops").await.unwrap();

    let report = engine
        .complete_scene(SceneOutcome::Choice(ChoiceId::from("mountain")))
        .await
        .unwrap();
    assert_eq!(
        report.state.scene.scene_id(),
        Some(&SceneId::from("minotaur-battle"))
    );
    assert_eq!(report.state.scene.kind(), SceneKind::Battle);
}

#[tokio::test]
async fn decision_falls_back_on_unrecognized_choice() {
    let (mut engine, _gateway) = engine();
    engine.start_quest(QuestId::new(1)).await.unwrap();
    engine.complete_scene(SceneOutcome::Advance).await.unwrap();
    engine.submit_puzzle_answer("cyclops").await.unwrap();

    let report = engine
        .complete_scene(SceneOutcome::Choice(ChoiceId::from("nonexistent-choice")))
        .await
        .unwrap();
    assert_eq!(
        report.state.scene.scene_id(),
        Some(&SceneId::from("gate-riddle"))
    );
}

#[tokio::test]
async fn completing_a_scene_with_no_active_quest_is_invalid() {
    let (mut engine, _gateway) = engine();
    let error = engine
        .complete_scene(SceneOutcome::Advance)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ApiError::Domain(DomainError::InvalidState { .. })
    ));
}

#[tokio::test]
async fn scene_progress_merge_keeps_position() {
    let (mut engine, _gateway) = engine();
    engine.start_quest(QuestId::new(1)).await.unwrap();

    let report = engine
        .update_scene_progress(questline::SceneProgress::panel(2))
        .await
        .unwrap();
    assert_eq!(report.state.scene.panel(), 2);
    assert_eq!(
        report.state.scene.scene_id(),
        Some(&SceneId::from("camp-arrival"))
    );
    assert_eq!(report.state.scene.quest_id(), Some(QuestId::new(1)));
}

#[tokio::test]
async fn reset_rebuilds_the_initial_state() {
    let (mut engine, _gateway) = engine();
    finish_quest_one(&mut engine).await;

    let report = engine.reset().await.unwrap();
    assert!(report.events.contains(&EngineEvent::GameReset));
    let state = &report.state;
    assert!(state.quests.completed().is_empty());
    assert_eq!(state.quests.current(), None);
    assert_eq!(state.scene.scene_id(), None);
    assert_eq!(state.player.level(), 1);
    assert_eq!(
        state.quests.status_of(QuestId::new(2)),
        Some(QuestStatus::Locked)
    );
}
