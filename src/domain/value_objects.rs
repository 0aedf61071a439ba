//! Domain value objects - Immutable objects that describe aspects of the domain

use serde::{Deserialize, Serialize};

/// Macro to implement common traits for string wrapper types
macro_rules! impl_string_wrapper {
    ($type:ident) => {
        impl From<String> for $type {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $type {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Unique identifier for an authored quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestId(u32);

impl QuestId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for QuestId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for QuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an authored scene
///
/// The empty string and `"end"` are sentinels: a transition that resolves to
/// either of them terminates the current quest instead of entering a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(String);

impl SceneId {
    pub const END: &'static str = "end";

    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this id marks the end of a quest rather than a real scene
    pub fn is_terminal(&self) -> bool {
        self.0.is_empty() || self.0 == Self::END
    }
}

impl_string_wrapper!(SceneId);

/// Identifier of a decision choice within its scene
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceId(String);

impl ChoiceId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_string_wrapper!(ChoiceId);

/// Identifier of an inventory entry (weapon, power, consumable, gem)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_string_wrapper!(ItemId);

/// The four kinds of authored scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    Story,
    Puzzle,
    Decision,
    Battle,
}

impl std::fmt::Display for SceneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SceneKind::Story => "story",
            SceneKind::Puzzle => "puzzle",
            SceneKind::Decision => "decision",
            SceneKind::Battle => "battle",
        };
        write!(f, "{name}")
    }
}

/// Availability of a quest for the current player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    /// Prerequisites not yet completed
    Locked,
    /// Startable
    Available,
    /// Currently being played
    Active,
    /// Finished at least once; startable again for replay
    Completed,
}

impl QuestStatus {
    /// Whether `start_quest` accepts a quest in this status
    pub fn is_startable(&self) -> bool {
        matches!(self, QuestStatus::Available | QuestStatus::Completed)
    }
}

/// Outcome reported to the engine when the player finishes a scene
///
/// Resolution is total over (scene kind, outcome): Story advances on any
/// outcome, Puzzle and Battle treat anything but `Success` as their failure
/// branch, Decision falls back to its default target for unknown choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args", rename_all = "lowercase")]
pub enum SceneOutcome {
    /// Story scenes ignore the outcome and always advance
    Advance,
    Success,
    Failure,
    /// The chosen option of a decision scene
    Choice(ChoiceId),
}

/// One panel of a story scene: an illustrated beat of dialogue and narration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPanel {
    pub dialogue: String,
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default)]
    pub image_description: Option<String>,
}

/// One selectable option of a decision scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionChoice {
    pub id: ChoiceId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub hint: Option<String>,
    pub next_scene: SceneId,
}

/// Authored enemy for a battle scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub level: i32,
    pub health: i32,
    pub base_damage: i32,
    #[serde(default)]
    pub initial_rage: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Loot granted when a battle ends in victory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RewardBundle {
    #[serde(default)]
    pub drachmas: i32,
    #[serde(default)]
    pub xp: i32,
    #[serde(default)]
    pub items: Vec<Consumable>,
}

/// A weapon the player can swing in battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: ItemId,
    pub name: String,
    pub attack: i32,
    pub durability: i32,
    #[serde(default = "Weapon::default_cost")]
    pub cost: i32,
    #[serde(default)]
    pub description: Option<String>,
}

impl Weapon {
    fn default_cost() -> i32 {
        2
    }
}

/// A demigod power: either damages the enemy or heals the caster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default)]
    pub heal: Option<i32>,
    pub energy_cost: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// A consumable or trophy item; quantity 0 means spent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub heal: Option<i32>,
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default = "Consumable::default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl Consumable {
    fn default_quantity() -> u32 {
        1
    }
}

/// A collectible gem with a passive effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gem {
    pub id: ItemId,
    pub name: String,
    pub effect: String,
    pub power: i32,
    pub quantity: u32,
}

/// Explicit stat adjustment passed to the player state manager
///
/// Health and energy carry absolute "set to" semantics; xp and drachmas are
/// additive deltas. This replaces the mixed absolute/additive calls the
/// engine's callers would otherwise have to disambiguate themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatAdjustment {
    #[serde(default)]
    pub set_health: Option<i32>,
    #[serde(default)]
    pub set_energy: Option<i32>,
    #[serde(default)]
    pub add_xp: i32,
    #[serde(default)]
    pub add_drachmas: i32,
}

impl StatAdjustment {
    pub fn grant_xp(amount: i32) -> Self {
        Self {
            add_xp: amount,
            ..Self::default()
        }
    }

    pub fn grant_drachmas(amount: i32) -> Self {
        Self {
            add_drachmas: amount,
            ..Self::default()
        }
    }
}

/// Partial update of the transient scene progress fields
///
/// A pure merge: `None` fields are left untouched; the scene and quest ids
/// cannot be changed through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SceneProgress {
    #[serde(default)]
    pub panel: Option<u32>,
    #[serde(default)]
    pub attempts: Option<u32>,
}

impl SceneProgress {
    pub fn panel(panel: u32) -> Self {
        Self {
            panel: Some(panel),
            attempts: None,
        }
    }

    pub fn attempts(attempts: u32) -> Self {
        Self {
            panel: None,
            attempts: Some(attempts),
        }
    }
}
