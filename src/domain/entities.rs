//! Domain entities - Core business objects with identity and lifecycle

use crate::domain::errors::DomainError;
use crate::domain::value_objects::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable authored quest definition, loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDefinition {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub recommended_level: i32,
    #[serde(default)]
    pub estimated_time: Option<String>,
    pub starting_scene_id: SceneId,
    #[serde(default)]
    pub required_quest_ids: Vec<QuestId>,
}

impl QuestDefinition {
    /// A quest with no prerequisites is available from the first session
    pub fn initially_available(&self) -> bool {
        self.required_quest_ids.is_empty()
    }
}

/// Immutable authored scene definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDefinition {
    pub id: SceneId,
    pub title: String,
    pub quest_id: QuestId,
    pub body: SceneBody,
}

/// Kind-specific payload of a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SceneBody {
    Story {
        panels: Vec<StoryPanel>,
        next_scene: SceneId,
    },
    Puzzle {
        riddle: String,
        correct_answer: String,
        #[serde(default)]
        hint: Option<String>,
        #[serde(default)]
        success_message: Option<String>,
        #[serde(default)]
        failure_message: Option<String>,
        success_scene: SceneId,
        failure_scene: SceneId,
    },
    Decision {
        dialogue: String,
        #[serde(default)]
        narration: Option<String>,
        #[serde(default)]
        followup_dialogue: Option<String>,
        choices: Vec<DecisionChoice>,
        default_next_scene: SceneId,
    },
    Battle {
        #[serde(default)]
        intro_text: Option<String>,
        enemy: Enemy,
        #[serde(default)]
        rewards: RewardBundle,
        #[serde(default)]
        victory_text: Option<String>,
        #[serde(default)]
        defeat_text: Option<String>,
        victory_scene: SceneId,
        /// Absent means a defeat restarts the quest from its starting scene
        #[serde(default)]
        defeat_scene: Option<SceneId>,
    },
}

impl SceneDefinition {
    pub fn kind(&self) -> SceneKind {
        match &self.body {
            SceneBody::Story { .. } => SceneKind::Story,
            SceneBody::Puzzle { .. } => SceneKind::Puzzle,
            SceneBody::Decision { .. } => SceneKind::Decision,
            SceneBody::Battle { .. } => SceneKind::Battle,
        }
    }

    /// Number of story panels; 1 for non-story scenes
    pub fn panel_count(&self) -> u32 {
        match &self.body {
            SceneBody::Story { panels, .. } => panels.len().max(1) as u32,
            _ => 1,
        }
    }

    /// Every transition target this scene declares, for graph validation
    pub fn transition_targets(&self) -> Vec<&SceneId> {
        match &self.body {
            SceneBody::Story { next_scene, .. } => vec![next_scene],
            SceneBody::Puzzle {
                success_scene,
                failure_scene,
                ..
            } => vec![success_scene, failure_scene],
            SceneBody::Decision {
                choices,
                default_next_scene,
                ..
            } => {
                let mut targets: Vec<&SceneId> = choices.iter().map(|c| &c.next_scene).collect();
                targets.push(default_next_scene);
                targets
            }
            SceneBody::Battle {
                victory_scene,
                defeat_scene,
                ..
            } => {
                let mut targets = vec![victory_scene];
                if let Some(defeat) = defeat_scene {
                    targets.push(defeat);
                }
                targets
            }
        }
    }
}

/// Everything the hero is carrying, split into distinct typed lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inventory {
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub powers: Vec<Power>,
    #[serde(default)]
    pub consumables: Vec<Consumable>,
    #[serde(default)]
    pub gems: Vec<Gem>,
}

impl Inventory {
    pub fn weapon(&self, id: &ItemId) -> Option<&Weapon> {
        self.weapons.iter().find(|w| &w.id == id)
    }

    pub fn power(&self, id: &ItemId) -> Option<&Power> {
        self.powers.iter().find(|p| &p.id == id)
    }

    pub fn consumable(&self, id: &ItemId) -> Option<&Consumable> {
        self.consumables.iter().find(|c| &c.id == id)
    }

    /// Add a looted item, merging quantity with an existing stack of the same id
    pub fn add_consumable(&mut self, item: Consumable) {
        match self.consumables.iter_mut().find(|c| c.id == item.id) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.consumables.push(item),
        }
    }
}

/// Name and divine parentage chosen at character creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroProfile {
    pub name: String,
    pub god_parent: String,
}

impl Default for HeroProfile {
    fn default() -> Self {
        Self {
            name: "Alex".to_string(),
            god_parent: "Apollo".to_string(),
        }
    }
}

/// Mutable per-session player state
///
/// Stats move only through the player state manager; the mutators here are
/// deliberately narrow and each one maintains the clamping invariants
/// `0 <= health <= max_health` and `0 <= energy <= max_energy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    name: String,
    god_parent: String,
    level: i32,
    xp: i32,
    health: i32,
    max_health: i32,
    energy: i32,
    max_energy: i32,
    drachmas: i32,
    inventory: Inventory,
}

impl PlayerState {
    pub const STARTING_HEALTH: i32 = 100;
    pub const STARTING_ENERGY: i32 = 100;
    pub const STARTING_DRACHMAS: i32 = 10;

    /// XP needed to clear the current level
    pub fn xp_threshold(level: i32) -> i32 {
        level * 100
    }

    /// A fresh level-1 hero with the standard camp-issue loadout
    pub fn new_hero(profile: HeroProfile) -> Self {
        Self {
            name: profile.name,
            god_parent: profile.god_parent,
            level: 1,
            xp: 0,
            health: Self::STARTING_HEALTH,
            max_health: Self::STARTING_HEALTH,
            energy: Self::STARTING_ENERGY,
            max_energy: Self::STARTING_ENERGY,
            drachmas: Self::STARTING_DRACHMAS,
            inventory: Self::starter_inventory(),
        }
    }

    fn starter_inventory() -> Inventory {
        Inventory {
            weapons: vec![Weapon {
                id: ItemId::from("celestial-bronze-sword"),
                name: "Celestial Bronze Sword".to_string(),
                attack: 15,
                durability: 95,
                cost: 2,
                description: Some("Standard issue for Camp Half-Blood heroes.".to_string()),
            }],
            powers: vec![Power {
                id: ItemId::from("light-arrow"),
                name: "Light Arrow".to_string(),
                damage: Some(25),
                heal: None,
                energy_cost: 4,
                description: Some("A bolt of divine light that strikes your enemy.".to_string()),
            }],
            consumables: vec![Consumable {
                id: ItemId::from("ambrosia"),
                name: "Ambrosia".to_string(),
                heal: Some(20),
                damage: None,
                quantity: 2,
                description: Some("Food of the gods that heals demigods.".to_string()),
            }],
            gems: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn god_parent(&self) -> &str {
        &self.god_parent
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn xp(&self) -> i32 {
        self.xp
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn max_energy(&self) -> i32 {
        self.max_energy
    }

    pub fn drachmas(&self) -> i32 {
        self.drachmas
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Set health to an absolute value, clamped to `[0, max_health]`
    pub fn set_health(&mut self, value: i32) {
        self.health = value.clamp(0, self.max_health);
    }

    /// Set energy to an absolute value, clamped to `[0, max_energy]`
    pub fn set_energy(&mut self, value: i32) {
        self.energy = value.clamp(0, self.max_energy);
    }

    /// Add (or spend) drachmas; the purse never goes negative
    pub fn add_drachmas(&mut self, delta: i32) {
        self.drachmas = (self.drachmas + delta).max(0);
    }

    /// Grant xp; never drops below zero
    pub fn add_xp(&mut self, delta: i32) {
        self.xp = (self.xp + delta).max(0);
    }

    /// Refill health and energy to their maxima
    pub fn restore_full(&mut self) {
        self.health = self.max_health;
        self.energy = self.max_energy;
    }

    /// Consume accumulated xp into level-ups, returning how many levels were
    /// gained. A loop rather than a single check so one large xp grant can
    /// clear several thresholds at once.
    pub fn settle_level_ups(&mut self) -> u32 {
        let mut gained = 0;
        while self.xp >= Self::xp_threshold(self.level) {
            self.xp -= Self::xp_threshold(self.level);
            self.level += 1;
            self.max_health += 10;
            self.max_energy += 5;
            self.restore_full();
            gained += 1;
        }
        gained
    }
}

/// Per-quest availability and completion history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestProgress {
    completed: BTreeSet<QuestId>,
    current: Option<QuestId>,
    available: BTreeMap<QuestId, QuestStatus>,
}

impl QuestProgress {
    /// Derive the initial quest board from the authored catalog
    pub fn from_catalog(quests: &[QuestDefinition]) -> Self {
        let available = quests
            .iter()
            .map(|q| {
                let status = if q.initially_available() {
                    QuestStatus::Available
                } else {
                    QuestStatus::Locked
                };
                (q.id, status)
            })
            .collect();
        Self {
            completed: BTreeSet::new(),
            current: None,
            available,
        }
    }

    pub fn current(&self) -> Option<QuestId> {
        self.current
    }

    pub fn completed(&self) -> &BTreeSet<QuestId> {
        &self.completed
    }

    pub fn is_completed(&self, id: QuestId) -> bool {
        self.completed.contains(&id)
    }

    pub fn status_of(&self, id: QuestId) -> Option<QuestStatus> {
        self.available.get(&id).copied()
    }

    pub fn statuses(&self) -> impl Iterator<Item = (QuestId, QuestStatus)> + '_ {
        self.available.iter().map(|(id, status)| (*id, *status))
    }

    pub fn set_current(&mut self, id: Option<QuestId>) {
        self.current = id;
    }

    pub fn set_status(&mut self, id: QuestId, status: QuestStatus) {
        self.available.insert(id, status);
    }

    pub fn mark_completed(&mut self, id: QuestId) {
        self.completed.insert(id);
        self.available.insert(id, QuestStatus::Completed);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    /// All prerequisites of `quest` already cleared?
    pub fn prerequisites_met(&self, quest: &QuestDefinition) -> bool {
        quest
            .required_quest_ids
            .iter()
            .all(|required| self.completed.contains(required))
    }
}

/// The player's current position in the scene graph, plus transient
/// per-scene progress (story panel cursor, puzzle attempt counter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneState {
    scene_id: Option<SceneId>,
    quest_id: Option<QuestId>,
    kind: SceneKind,
    panel: u32,
    attempts: u32,
}

impl SceneState {
    /// Not inside any quest (quest-selection screen)
    pub fn idle() -> Self {
        Self {
            scene_id: None,
            quest_id: None,
            kind: SceneKind::Story,
            panel: 1,
            attempts: 0,
        }
    }

    /// Position at the start of `scene`, progress reset
    pub fn enter(scene: &SceneDefinition) -> Self {
        Self {
            scene_id: Some(scene.id.clone()),
            quest_id: Some(scene.quest_id),
            kind: scene.kind(),
            panel: 1,
            attempts: 0,
        }
    }

    pub fn scene_id(&self) -> Option<&SceneId> {
        self.scene_id.as_ref()
    }

    pub fn quest_id(&self) -> Option<QuestId> {
        self.quest_id
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    /// 1-based story panel cursor
    pub fn panel(&self) -> u32 {
        self.panel
    }

    /// Puzzle attempts used so far in this scene
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Merge transient progress fields; scene and quest ids are untouched
    pub fn merge_progress(&mut self, progress: SceneProgress) {
        if let Some(panel) = progress.panel {
            self.panel = panel;
        }
        if let Some(attempts) = progress.attempts {
            self.attempts = attempts;
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::idle()
    }
}

/// The full unit of persistence: everything a session needs to resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub player: PlayerState,
    pub quests: QuestProgress,
    pub scene: SceneState,
}

impl GameState {
    /// Fresh state for a new hero against the given quest catalog
    pub fn new_game(profile: HeroProfile, catalog: &[QuestDefinition]) -> Self {
        Self {
            player: PlayerState::new_hero(profile),
            quests: QuestProgress::from_catalog(catalog),
            scene: SceneState::idle(),
        }
    }

    /// Detect self-contradictory state before any mutating operation.
    ///
    /// A violation means an earlier bug corrupted the session; the caller
    /// must reset the whole state rather than attempt a partial repair.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        match self.quests.current() {
            Some(current) => {
                if self.scene.quest_id() != Some(current) {
                    return Err(DomainError::invariant_violation(format!(
                        "current quest is {current} but scene belongs to {:?}",
                        self.scene.quest_id()
                    )));
                }
                match self.scene.scene_id() {
                    None => {
                        return Err(DomainError::invariant_violation(
                            "a quest is active but no scene is set",
                        ));
                    }
                    Some(id) if id.is_terminal() => {
                        return Err(DomainError::invariant_violation(
                            "a quest is active but the scene id is a terminal sentinel",
                        ));
                    }
                    Some(_) => {}
                }
                if self.quests.status_of(current) != Some(QuestStatus::Active) {
                    return Err(DomainError::invariant_violation(format!(
                        "quest {current} is current but not marked active"
                    )));
                }
            }
            None => {
                if let Some((id, _)) = self
                    .quests
                    .statuses()
                    .find(|(_, status)| *status == QuestStatus::Active)
                {
                    return Err(DomainError::invariant_violation(format!(
                        "quest {id} is marked active but no quest is current"
                    )));
                }
            }
        }
        Ok(())
    }
}
