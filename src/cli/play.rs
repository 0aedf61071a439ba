//! CUI player mode for running quest campaigns
//!
//! An interactive terminal loop that drives the engine the same way a real
//! presentation layer would: quest board, story panels, riddle prompts,
//! decision menus, and turn-based battles.

use crate::application::api::{EngineEvent, PuzzleReport, ResumeKind};
use crate::application::engine::QuestEngine;
use crate::domain::battle::{BattleAction, BattlePhase};
use crate::domain::entities::{SceneBody, SceneDefinition};
use crate::domain::value_objects::{QuestId, QuestStatus, SceneOutcome, SceneProgress};
use crate::infrastructure::content::InMemoryContentStore;
use crate::infrastructure::persistence::JsonSaveGateway;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

const SESSION_KEY: &str = "default";

/// Run the player mode
pub async fn run_play(content_dir: PathBuf, save_dir: PathBuf) -> anyhow::Result<()> {
    let content = Arc::new(InMemoryContentStore::load_from_dir(&content_dir).await?);
    let gateway = Arc::new(JsonSaveGateway::new(save_dir));

    let (mut engine, resume) = QuestEngine::resume(content, gateway, SESSION_KEY).await?;
    match resume {
        ResumeKind::Loaded => println!("(saved game restored)"),
        ResumeKind::Fresh { reason: Some(why) } => {
            println!("(starting a new game: {why})");
        }
        ResumeKind::Fresh { reason: None } => {}
    }

    println!("=== questline ===");
    println!();
    println!("Controls:");
    println!("  Enter: next");
    println!("  1-9:   select");
    println!("  q:     quit");
    println!();

    loop {
        if engine.game_state().quests.current().is_none() {
            if !quest_board(&mut engine).await? {
                break;
            }
            continue;
        }

        let Some(scene) = engine.current_scene().cloned() else {
            println!("[Current scene is missing from the content store]");
            break;
        };

        println!();
        println!("--- {} [{}] ---", scene.title, scene.kind());
        match &scene.body {
            SceneBody::Story { .. } => play_story(&mut engine, &scene).await?,
            SceneBody::Puzzle { .. } => {
                if !play_puzzle(&mut engine, &scene).await? {
                    break;
                }
            }
            SceneBody::Decision { .. } => {
                if !play_decision(&mut engine, &scene).await? {
                    break;
                }
            }
            SceneBody::Battle { .. } => {
                if !play_battle(&mut engine, &scene).await? {
                    break;
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Show the quest board and start the selected quest.
/// Returns false when the player quits.
async fn quest_board(engine: &mut QuestEngine) -> anyhow::Result<bool> {
    let state = engine.game_state().clone();
    let player = &state.player;
    println!();
    println!(
        "{} (child of {}) - level {}, {} xp, {} drachmas",
        player.name(),
        player.god_parent(),
        player.level(),
        player.xp(),
        player.drachmas()
    );
    println!("Quests:");

    let quests: Vec<(QuestId, QuestStatus)> = state.quests.statuses().collect();
    for (index, (quest_id, status)) in quests.iter().enumerate() {
        let title = engine
            .quest_definition(*quest_id)
            .map(|quest| quest.title.clone())
            .unwrap_or_else(|| format!("Quest {quest_id}"));
        let marker = match status {
            QuestStatus::Locked => "locked",
            QuestStatus::Available => "available",
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
        };
        println!("  {}. {title} [{marker}]", index + 1);
    }

    loop {
        let input = get_input("Select quest:")?;
        if input == "q" {
            return Ok(false);
        }
        let Some(selected) = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| quests.get(i))
        else {
            println!("[Pick a number from the list]");
            continue;
        };
        match engine.start_quest(selected.0).await {
            Ok(report) => {
                announce(&report.events);
                return Ok(true);
            }
            Err(error) => println!("[{error}]"),
        }
    }
}

async fn play_story(engine: &mut QuestEngine, scene: &SceneDefinition) -> anyhow::Result<()> {
    let SceneBody::Story { panels, .. } = &scene.body else {
        return Ok(());
    };

    let mut panel = engine.game_state().scene.panel();
    loop {
        let Some(current) = panels.get(panel.saturating_sub(1) as usize) else {
            let report = engine.complete_scene(SceneOutcome::Advance).await?;
            announce(&report.events);
            break;
        };
        if let Some(image) = &current.image_description {
            println!("[{image}]");
        }
        println!("{}", current.dialogue);
        if let Some(narration) = &current.narration {
            println!("({narration})");
        }
        get_input("")?;

        if (panel as usize) < panels.len() {
            panel += 1;
            engine.update_scene_progress(SceneProgress::panel(panel)).await?;
        } else {
            let report = engine.complete_scene(SceneOutcome::Advance).await?;
            announce(&report.events);
            break;
        }
    }
    Ok(())
}

async fn play_puzzle(engine: &mut QuestEngine, scene: &SceneDefinition) -> anyhow::Result<bool> {
    let SceneBody::Puzzle {
        riddle,
        hint,
        success_message,
        failure_message,
        ..
    } = &scene.body
    else {
        return Ok(true);
    };

    println!("{riddle}");
    if let Some(hint) = hint {
        println!("(hint: {hint})");
    }

    loop {
        let answer = get_input("Your answer:")?;
        if answer == "q" {
            return Ok(false);
        }
        match engine.submit_puzzle_answer(&answer).await? {
            PuzzleReport::Solved(report) => {
                if let Some(message) = success_message {
                    println!("{message}");
                }
                announce(&report.events);
                return Ok(true);
            }
            PuzzleReport::Incorrect { remaining, .. } => {
                println!("[Incorrect. Attempts remaining: {remaining}]");
            }
            PuzzleReport::Exhausted(report) => {
                if let Some(message) = failure_message {
                    println!("{message}");
                }
                announce(&report.events);
                return Ok(true);
            }
        }
    }
}

async fn play_decision(engine: &mut QuestEngine, scene: &SceneDefinition) -> anyhow::Result<bool> {
    let SceneBody::Decision {
        dialogue,
        narration,
        followup_dialogue,
        choices,
        ..
    } = &scene.body
    else {
        return Ok(true);
    };

    println!("{dialogue}");
    if let Some(narration) = narration {
        println!("({narration})");
    }
    if let Some(followup) = followup_dialogue {
        println!("{followup}");
    }
    for (index, choice) in choices.iter().enumerate() {
        println!("  {}. {} - {}", index + 1, choice.title, choice.description);
    }

    loop {
        let input = get_input("Choose:")?;
        if input == "q" {
            return Ok(false);
        }
        let Some(choice) = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| choices.get(i))
        else {
            println!("[Pick a number from the list]");
            continue;
        };
        let report = engine
            .complete_scene(SceneOutcome::Choice(choice.id.clone()))
            .await?;
        announce(&report.events);
        return Ok(true);
    }
}

async fn play_battle(engine: &mut QuestEngine, scene: &SceneDefinition) -> anyhow::Result<bool> {
    let SceneBody::Battle {
        intro_text,
        victory_text,
        defeat_text,
        ..
    } = &scene.body
    else {
        return Ok(true);
    };

    let mut session = engine.begin_battle()?;
    if let Some(intro) = intro_text {
        println!("{intro}");
    }
    println!(
        "{} (level {}) blocks your path!",
        session.enemy().name,
        session.enemy().level
    );
    get_input("Press Enter to begin the battle")?;
    session.begin()?;

    while session.phase() == BattlePhase::Combat {
        println!();
        println!(
            "Turn {} | you: {} hp / {} en | {}: {} hp, rage {}",
            session.turn(),
            session.player_health(),
            session.player_energy(),
            session.enemy().name,
            session.enemy_health(),
            session.enemy_rage(),
        );

        let inventory = engine.game_state().player.inventory().clone();
        let mut actions: Vec<(String, BattleAction)> = Vec::new();
        for weapon in &inventory.weapons {
            actions.push((
                format!("{} (damage {}, cost {})", weapon.name, weapon.attack, weapon.cost),
                BattleAction::Weapon(weapon.id.clone()),
            ));
        }
        for power in &inventory.powers {
            let effect = match (power.damage, power.heal) {
                (Some(damage), _) => format!("damage {damage}"),
                (None, Some(heal)) => format!("heal {heal}"),
                (None, None) => "no effect".to_string(),
            };
            actions.push((
                format!("{} ({effect}, cost {})", power.name, power.energy_cost),
                BattleAction::Power(power.id.clone()),
            ));
        }
        for item in inventory.consumables.iter().filter(|i| i.quantity > 0) {
            actions.push((
                format!("{} (x{})", item.name, item.quantity),
                BattleAction::Item(item.id.clone()),
            ));
        }
        actions.push(("Dodge (+2 energy)".to_string(), BattleAction::Dodge));

        for (index, (label, _)) in actions.iter().enumerate() {
            println!("  {}. {label}", index + 1);
        }

        let input = get_input("Action:")?;
        if input == "q" {
            return Ok(false);
        }
        let Some((_, action)) = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| actions.get(i))
        else {
            println!("[Pick a number from the list]");
            continue;
        };

        match session.play_turn(action) {
            Ok(turn) => {
                println!("{}", turn.player_line);
                if let Some(enemy_line) = &turn.enemy_line {
                    println!("{enemy_line}");
                }
            }
            Err(error) => println!("[{error}]"),
        }
    }

    match session.phase() {
        BattlePhase::Victory => {
            println!();
            println!("Victory!");
            if let Some(text) = victory_text {
                println!("{text}");
            }
        }
        BattlePhase::Defeat => {
            println!();
            println!("Defeat!");
            if let Some(text) = defeat_text {
                println!("{text}");
            }
        }
        _ => {}
    }

    let report = engine.resolve_battle(session).await?;
    announce(&report.events);
    Ok(true)
}

/// Print the engine's notifications the way a UI would toast them
fn announce(events: &[EngineEvent]) {
    for event in events {
        match event {
            EngineEvent::QuestCompleted { quest_id } => {
                println!("* Quest {quest_id} completed!");
            }
            EngineEvent::QuestUnlocked { quest_id } => {
                println!("* Quest {quest_id} is now available!");
            }
            EngineEvent::QuestRestarted { .. } => {
                println!("* You will restart from the beginning of this quest.");
            }
            EngineEvent::LeveledUp { level } => {
                println!("* Level up! You are now level {level}.");
            }
            EngineEvent::ItemGained { name } => {
                println!("* Obtained: {name}");
            }
            EngineEvent::SaveFailed { detail } => {
                println!("* Warning: progress could not be saved ({detail})");
            }
            _ => {}
        }
    }
}

fn get_input(prompt: &str) -> io::Result<String> {
    if !prompt.is_empty() {
        print!("{prompt} ");
        io::stdout().flush()?;
    }
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
