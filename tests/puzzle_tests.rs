//! Integration tests for puzzle scenes - attempt budget, persistence of the
//! attempt counter, and resolution into success/failure branches

mod common;

use common::engine;
use questline::domain::value_objects::{QuestId, SceneId, SceneOutcome};
use questline::{PuzzleReport, QuestEngine};

async fn reach_oracle(engine: &mut QuestEngine) {
    engine.start_quest(QuestId::new(1)).await.unwrap();
    engine.complete_scene(SceneOutcome::Advance).await.unwrap();
    assert_eq!(
        engine.game_state().scene.scene_id(),
        Some(&SceneId::from("oracle-riddle"))
    );
}

#[tokio::test]
async fn correct_answer_resolves_to_the_success_branch() {
    let (mut engine, _gateway) = engine();
    reach_oracle(&mut engine).await;

    match engine.submit_puzzle_answer("  CYCLOPS  ").await.unwrap() {
        PuzzleReport::Solved(report) => {
            assert_eq!(
                report.state.scene.scene_id(),
                Some(&SceneId::from("crossroads"))
            );
            assert_eq!(report.state.scene.attempts(), 0);
        }
        other => panic!("expected solved, got {other:?}"),
    }
}

#[tokio::test]
async fn two_misses_then_a_hit_still_succeeds() {
    let (mut engine, _gateway) = engine();
    reach_oracle(&mut engine).await;

    match engine.submit_puzzle_answer("harpy").await.unwrap() {
        PuzzleReport::Incorrect { remaining, report } => {
            assert_eq!(remaining, 2);
            assert_eq!(report.state.scene.attempts(), 1);
            // Still standing in the riddle scene.
            assert_eq!(
                report.state.scene.scene_id(),
                Some(&SceneId::from("oracle-riddle"))
            );
        }
        other => panic!("expected incorrect, got {other:?}"),
    }
    match engine.submit_puzzle_answer("satyr").await.unwrap() {
        PuzzleReport::Incorrect { remaining, .. } => assert_eq!(remaining, 1),
        other => panic!("expected incorrect, got {other:?}"),
    }
    match engine.submit_puzzle_answer("cyclops").await.unwrap() {
        PuzzleReport::Solved(report) => {
            assert_eq!(
                report.state.scene.scene_id(),
                Some(&SceneId::from("crossroads"))
            );
        }
        other => panic!("expected solved, got {other:?}"),
    }
}

#[tokio::test]
async fn three_misses_resolve_to_the_failure_branch() {
    let (mut engine, _gateway) = engine();
    reach_oracle(&mut engine).await;

    engine.submit_puzzle_answer("wrong-1").await.unwrap();
    engine.submit_puzzle_answer("wrong-2").await.unwrap();
    match engine.submit_puzzle_answer("wrong-3").await.unwrap() {
        PuzzleReport::Exhausted(report) => {
            // Oracle riddle fails over to the crossroads as well.
            assert_eq!(
                report.state.scene.scene_id(),
                Some(&SceneId::from("crossroads"))
            );
        }
        other => panic!("expected exhausted, got {other:?}"),
    }
    // The failed puzzle already resolved; there is no fourth attempt.
    assert!(engine.submit_puzzle_answer("cyclops").await.is_err());
}

#[tokio::test]
async fn failure_branch_can_route_into_a_battle() {
    let (mut engine, _gateway) = engine();
    reach_oracle(&mut engine).await;
    engine.submit_puzzle_answer("cyclops").await.unwrap();
    engine
        .complete_scene(SceneOutcome::Choice("tunnel".into()))
        .await
        .unwrap();

    // The gate riddle punishes failure with the minotaur.
    engine.submit_puzzle_answer("a").await.unwrap();
    engine.submit_puzzle_answer("b").await.unwrap();
    match engine.submit_puzzle_answer("c").await.unwrap() {
        PuzzleReport::Exhausted(report) => {
            assert_eq!(
                report.state.scene.scene_id(),
                Some(&SceneId::from("minotaur-battle"))
            );
        }
        other => panic!("expected exhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn submitting_outside_a_puzzle_scene_is_rejected() {
    let (mut engine, _gateway) = engine();
    engine.start_quest(QuestId::new(1)).await.unwrap();
    // camp-arrival is a story scene.
    assert!(engine.submit_puzzle_answer("cyclops").await.is_err());
}
