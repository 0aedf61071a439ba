//! Battle resolver - turn-based combat sub-state-machine
//!
//! A battle runs as a nested loop beside the progression engine: the caller
//! drives one player action per turn until the session reaches a terminal
//! outcome, then feeds that outcome back through `complete_scene`. Combat is
//! fully deterministic given the enemy definition and the action sequence.

use crate::domain::entities::{Inventory, PlayerState, SceneDefinition};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{Enemy, ItemId, SceneId};

/// Phase of the battle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Enemy revealed, combat not yet joined
    Intro,
    /// Strictly alternating turns
    Combat,
    Victory,
    Defeat,
}

/// Terminal result of a finished battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleVerdict {
    Victory,
    Defeat,
}

/// One action the player can take on their turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleAction {
    Weapon(ItemId),
    Power(ItemId),
    Item(ItemId),
    /// Avoid the attack and recover 2 energy
    Dodge,
}

/// What a single turn did, for the presentation layer's battle log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleTurn {
    pub player_line: String,
    /// Absent when the player's action ended the battle before the enemy
    /// could act
    pub enemy_line: Option<String>,
    pub verdict: Option<BattleVerdict>,
}

/// Rage is clamped here so the damage bonus tops out at `base_damage + 5`
const RAGE_CAP: i32 = 100;
const RAGE_PER_TURN: i32 = 10;
const DODGE_ENERGY_GAIN: i32 = 2;

/// Turn-based combat against one enemy
///
/// The session works on snapshots of the player's stats and loadout; the
/// engine writes the survivors' values back into `PlayerState` when the
/// battle is resolved.
#[derive(Debug, Clone)]
pub struct BattleSession {
    scene_id: SceneId,
    enemy: Enemy,
    enemy_health: i32,
    enemy_rage: i32,
    player_health: i32,
    player_energy: i32,
    max_health: i32,
    max_energy: i32,
    loadout: Inventory,
    turn: u32,
    phase: BattlePhase,
}

impl BattleSession {
    /// Snapshot the player against the battle scene's enemy
    pub fn new(scene: &SceneDefinition, enemy: &Enemy, player: &PlayerState) -> Self {
        Self {
            scene_id: scene.id.clone(),
            enemy: enemy.clone(),
            enemy_health: enemy.health,
            enemy_rage: enemy.initial_rage,
            player_health: player.health(),
            player_energy: player.energy(),
            max_health: player.max_health(),
            max_energy: player.max_energy(),
            loadout: player.inventory().clone(),
            turn: 1,
            phase: BattlePhase::Intro,
        }
    }

    pub fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn enemy_health(&self) -> i32 {
        self.enemy_health
    }

    pub fn enemy_rage(&self) -> i32 {
        self.enemy_rage
    }

    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    pub fn player_energy(&self) -> i32 {
        self.player_energy
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn verdict(&self) -> Option<BattleVerdict> {
        match self.phase {
            BattlePhase::Victory => Some(BattleVerdict::Victory),
            BattlePhase::Defeat => Some(BattleVerdict::Defeat),
            _ => None,
        }
    }

    /// Join combat. No stat changes; only the Intro -> Combat transition.
    pub fn begin(&mut self) -> Result<(), DomainError> {
        if self.phase != BattlePhase::Intro {
            return Err(DomainError::invalid_state("battle has already begun"));
        }
        self.phase = BattlePhase::Combat;
        Ok(())
    }

    /// Execute one full turn: the player's action, then (if the enemy still
    /// stands) the enemy's counterattack.
    ///
    /// A lethal player hit ends the battle immediately; the enemy never gets
    /// a final swing.
    pub fn play_turn(&mut self, action: &BattleAction) -> Result<BattleTurn, DomainError> {
        if self.phase != BattlePhase::Combat {
            return Err(DomainError::invalid_state(match self.phase {
                BattlePhase::Intro => "battle has not begun",
                _ => "battle is already decided",
            }));
        }

        let player_line = self.apply_player_action(action)?;

        if self.enemy_health == 0 {
            self.phase = BattlePhase::Victory;
            return Ok(BattleTurn {
                player_line,
                enemy_line: None,
                verdict: Some(BattleVerdict::Victory),
            });
        }

        let enemy_line = self.apply_enemy_action();

        if self.player_health == 0 {
            self.phase = BattlePhase::Defeat;
            return Ok(BattleTurn {
                player_line,
                enemy_line: Some(enemy_line),
                verdict: Some(BattleVerdict::Defeat),
            });
        }

        self.turn += 1;
        Ok(BattleTurn {
            player_line,
            enemy_line: Some(enemy_line),
            verdict: None,
        })
    }

    fn apply_player_action(&mut self, action: &BattleAction) -> Result<String, DomainError> {
        let (energy_cost, damage, heal, line) = match action {
            BattleAction::Weapon(id) => {
                let weapon = self
                    .loadout
                    .weapon(id)
                    .ok_or_else(|| DomainError::invalid_state(format!("no weapon '{id}'")))?;
                (
                    weapon.cost,
                    weapon.attack,
                    0,
                    format!(
                        "You attack with your {}, dealing {} damage!",
                        weapon.name, weapon.attack
                    ),
                )
            }
            BattleAction::Power(id) => {
                let power = self
                    .loadout
                    .power(id)
                    .ok_or_else(|| DomainError::invalid_state(format!("no power '{id}'")))?;
                let damage = power.damage.unwrap_or(0);
                let heal = power.heal.unwrap_or(0);
                let line = if damage > 0 {
                    format!("You unleash {}, dealing {damage} damage!", power.name)
                } else {
                    format!("You use {}, healing yourself for {heal} health!", power.name)
                };
                (power.energy_cost, damage, heal, line)
            }
            BattleAction::Item(id) => {
                let item = self
                    .loadout
                    .consumable(id)
                    .ok_or_else(|| DomainError::invalid_state(format!("no item '{id}'")))?;
                if item.quantity == 0 {
                    return Err(DomainError::invalid_state(format!(
                        "'{}' is used up",
                        item.name
                    )));
                }
                let damage = item.damage.unwrap_or(0);
                let heal = item.heal.unwrap_or(0);
                let line = if heal > 0 {
                    format!("You use {}, restoring {heal} health!", item.name)
                } else {
                    format!("You use {}, dealing {damage} damage!", item.name)
                };
                (0, damage, heal, line)
            }
            BattleAction::Dodge => (
                -DODGE_ENERGY_GAIN,
                0,
                0,
                format!("You dodge the attack and recover {DODGE_ENERGY_GAIN} energy!"),
            ),
        };

        self.player_energy = (self.player_energy - energy_cost).clamp(0, self.max_energy);
        if heal > 0 {
            self.player_health = (self.player_health + heal).min(self.max_health);
        }
        if damage > 0 {
            self.enemy_health = (self.enemy_health - damage).max(0);
        }
        Ok(line)
    }

    fn apply_enemy_action(&mut self) -> String {
        let damage = self.enemy.base_damage + self.enemy_rage / 20;
        self.player_health = (self.player_health - damage).max(0);
        self.enemy_rage = (self.enemy_rage + RAGE_PER_TURN).min(RAGE_CAP);
        format!("{} attacks for {damage} damage!", self.enemy.name)
    }
}
