//! Shared campaign fixture for integration tests
//!
//! A compact three-quest campaign exercising every scene kind: quest 1 runs
//! story -> puzzle -> decision -> (puzzle | battle) -> story -> end, quest 2
//! unlocks after quest 1, quest 3 after quest 2.
#![allow(dead_code)]

use questline::domain::entities::{QuestDefinition, SceneBody, SceneDefinition};
use questline::domain::value_objects::{
    ChoiceId, Consumable, DecisionChoice, Enemy, ItemId, QuestId, RewardBundle, SceneId,
    StoryPanel,
};
use questline::infrastructure::{InMemoryContentStore, InMemorySaveGateway};
use questline::{HeroProfile, QuestEngine};
use std::sync::Arc;

pub const SESSION: &str = "test-session";

pub fn quest(id: u32, starting_scene: &str, required: &[u32]) -> QuestDefinition {
    QuestDefinition {
        id: QuestId::new(id),
        title: format!("Quest {id}"),
        description: format!("Test quest {id}"),
        recommended_level: id as i32,
        estimated_time: None,
        starting_scene_id: SceneId::from(starting_scene),
        required_quest_ids: required.iter().map(|&r| QuestId::new(r)).collect(),
    }
}

pub fn panel(dialogue: &str) -> StoryPanel {
    StoryPanel {
        dialogue: dialogue.to_string(),
        narration: None,
        image_description: None,
    }
}

pub fn story(id: &str, quest_id: u32, panels: usize, next: &str) -> SceneDefinition {
    SceneDefinition {
        id: SceneId::from(id),
        title: id.to_string(),
        quest_id: QuestId::new(quest_id),
        body: SceneBody::Story {
            panels: (0..panels).map(|i| panel(&format!("Panel {}", i + 1))).collect(),
            next_scene: SceneId::from(next),
        },
    }
}

pub fn puzzle(id: &str, quest_id: u32, answer: &str, success: &str, failure: &str) -> SceneDefinition {
    SceneDefinition {
        id: SceneId::from(id),
        title: id.to_string(),
        quest_id: QuestId::new(quest_id),
        body: SceneBody::Puzzle {
            riddle: "What am I?".to_string(),
            correct_answer: answer.to_string(),
            hint: None,
            success_message: None,
            failure_message: None,
            success_scene: SceneId::from(success),
            failure_scene: SceneId::from(failure),
        },
    }
}

pub fn minotaur() -> Enemy {
    Enemy {
        name: "Minotaur".to_string(),
        level: 3,
        health: 100,
        base_damage: 15,
        initial_rage: 20,
        description: None,
    }
}

/// The standard campaign: see module docs for the quest 1 scene graph
pub fn campaign() -> (Vec<QuestDefinition>, Vec<SceneDefinition>) {
    let quests = vec![
        quest(1, "camp-arrival", &[]),
        quest(2, "sea-intro", &[1]),
        quest(3, "titan-intro", &[2]),
    ];

    let scenes = vec![
        story("camp-arrival", 1, 2, "oracle-riddle"),
        puzzle("oracle-riddle", 1, "cyclops", "crossroads", "crossroads"),
        SceneDefinition {
            id: SceneId::from("crossroads"),
            title: "A Fateful Decision".to_string(),
            quest_id: QuestId::new(1),
            body: SceneBody::Decision {
                dialogue: "Which way should we go?".to_string(),
                narration: None,
                followup_dialogue: None,
                choices: vec![
                    DecisionChoice {
                        id: ChoiceId::from("tunnel"),
                        title: "Take the Dark Tunnel".to_string(),
                        description: "A direct but treacherous route.".to_string(),
                        hint: None,
                        next_scene: SceneId::from("gate-riddle"),
                    },
                    DecisionChoice {
                        id: ChoiceId::from("mountain"),
                        title: "Climb the Mountain Path".to_string(),
                        description: "Exposed, and something guards it.".to_string(),
                        hint: None,
                        next_scene: SceneId::from("minotaur-battle"),
                    },
                ],
                default_next_scene: SceneId::from("gate-riddle"),
            },
        },
        puzzle("gate-riddle", 1, "night day dawn", "olympus-return", "minotaur-battle"),
        SceneDefinition {
            id: SceneId::from("minotaur-battle"),
            title: "Battle with the Minotaur".to_string(),
            quest_id: QuestId::new(1),
            body: SceneBody::Battle {
                intro_text: None,
                enemy: minotaur(),
                rewards: RewardBundle {
                    drachmas: 5,
                    xp: 50,
                    items: vec![Consumable {
                        id: ItemId::from("minotaur-horn"),
                        name: "Minotaur Horn".to_string(),
                        heal: None,
                        damage: None,
                        quantity: 1,
                        description: None,
                    }],
                },
                victory_text: None,
                defeat_text: None,
                victory_scene: SceneId::from("olympus-return"),
                defeat_scene: Some(SceneId::from("camp-recovery")),
            },
        },
        story("camp-recovery", 1, 1, "crossroads"),
        story("olympus-return", 1, 1, "end"),
        story("sea-intro", 2, 1, "end"),
        story("titan-intro", 3, 1, "end"),
    ];

    (quests, scenes)
}

pub fn campaign_store() -> Arc<InMemoryContentStore> {
    let (quests, scenes) = campaign();
    Arc::new(InMemoryContentStore::new(quests, scenes).expect("fixture campaign must be valid"))
}

pub fn engine() -> (QuestEngine, Arc<InMemorySaveGateway>) {
    let gateway = Arc::new(InMemorySaveGateway::new());
    let engine = QuestEngine::new(
        campaign_store(),
        gateway.clone(),
        SESSION,
        HeroProfile::default(),
    )
    .expect("fixture campaign must validate");
    (engine, gateway)
}
