//! Integration tests for authored-content validation - the story graph is
//! audited before any session can start on it

mod common;

use common::{campaign, puzzle, quest, story};
use questline::domain::services::ProgressionService;
use questline::infrastructure::{InMemoryContentStore, InMemorySaveGateway};
use questline::{ApiError, ContentStore, DomainError, HeroProfile, QuestEngine};
use std::sync::Arc;

fn validate(
    quests: Vec<questline::domain::entities::QuestDefinition>,
    scenes: Vec<questline::domain::entities::SceneDefinition>,
) -> Result<(), DomainError> {
    let store = InMemoryContentStore::new(quests, scenes).unwrap();
    ProgressionService::new().validate_story_graph(&store)
}

#[test]
fn the_fixture_campaign_is_sound() {
    let (quests, scenes) = campaign();
    validate(quests, scenes).unwrap();
}

#[test]
fn every_declared_transition_must_resolve() {
    // A story scene pointing at a scene nobody authored.
    let result = validate(
        vec![quest(1, "intro", &[])],
        vec![story("intro", 1, 1, "missing-scene")],
    );
    assert!(matches!(result, Err(DomainError::ContentIntegrity { .. })));

    // Terminal sentinels are always acceptable targets.
    validate(vec![quest(1, "intro", &[])], vec![story("intro", 1, 1, "end")]).unwrap();
}

#[test]
fn puzzle_branches_are_checked_like_any_other_target() {
    let result = validate(
        vec![quest(1, "riddle", &[])],
        vec![puzzle("riddle", 1, "answer", "end", "nowhere")],
    );
    assert!(matches!(result, Err(DomainError::ContentIntegrity { .. })));
}

#[test]
fn quest_starting_scenes_must_exist_and_belong_to_the_quest() {
    let result = validate(vec![quest(1, "missing", &[])], vec![story("intro", 1, 1, "end")]);
    assert!(matches!(result, Err(DomainError::ContentIntegrity { .. })));

    // Starting scene authored under a different quest id.
    let result = validate(
        vec![quest(1, "intro", &[]), quest(2, "intro", &[1])],
        vec![story("intro", 1, 1, "end")],
    );
    assert!(matches!(result, Err(DomainError::ContentIntegrity { .. })));
}

#[test]
fn prerequisites_must_reference_known_quests() {
    let result = validate(
        vec![quest(1, "intro", &[42])],
        vec![story("intro", 1, 1, "end")],
    );
    assert!(matches!(result, Err(DomainError::ContentIntegrity { .. })));
}

#[test]
fn scenes_must_belong_to_known_quests() {
    let result = validate(
        vec![quest(1, "intro", &[])],
        vec![story("intro", 1, 1, "stray"), story("stray", 7, 1, "end")],
    );
    assert!(matches!(result, Err(DomainError::ContentIntegrity { .. })));
}

#[tokio::test]
async fn the_shipped_campaign_loads_and_validates() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("campaigns")
        .join("lightning-thief");
    let store = InMemoryContentStore::load_from_dir(&dir).await.unwrap();
    assert_eq!(store.list_quests().len(), 3);
    ProgressionService::new().validate_story_graph(&store).unwrap();
}

#[test]
fn the_engine_refuses_to_launch_on_broken_content() {
    let store = InMemoryContentStore::new(
        vec![quest(1, "intro", &[])],
        vec![story("intro", 1, 1, "missing-scene")],
    )
    .unwrap();
    let result = QuestEngine::new(
        Arc::new(store),
        Arc::new(InMemorySaveGateway::new()),
        "session",
        HeroProfile::default(),
    );
    assert!(matches!(
        result,
        Err(ApiError::Domain(DomainError::ContentIntegrity { .. }))
    ));
}
