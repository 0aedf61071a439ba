//! Player state manager - stat adjustments, clamping, level-up thresholds

use crate::domain::entities::PlayerState;
use crate::domain::value_objects::{RewardBundle, StatAdjustment};

/// Notification emitted while applying a stat adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsEvent {
    /// The hero reached `level`; health and energy were fully restored
    LeveledUp { level: i32 },
    /// Loot was added to the inventory
    ItemGained { name: String },
}

/// The single gate through which player stats change
///
/// Health and energy are set absolutely and clamped; xp and drachmas are
/// additive. Level-ups are settled after every adjustment so one large xp
/// grant can clear several thresholds in a single call.
pub struct PlayerStatsService;

impl PlayerStatsService {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, player: &mut PlayerState, adjustment: &StatAdjustment) -> Vec<StatsEvent> {
        if let Some(health) = adjustment.set_health {
            player.set_health(health);
        }
        if let Some(energy) = adjustment.set_energy {
            player.set_energy(energy);
        }
        if adjustment.add_drachmas != 0 {
            player.add_drachmas(adjustment.add_drachmas);
        }
        if adjustment.add_xp != 0 {
            player.add_xp(adjustment.add_xp);
        }
        self.settle(player)
    }

    /// Grant a battle reward bundle: currency, xp, and loot items
    pub fn grant_rewards(&self, player: &mut PlayerState, rewards: &RewardBundle) -> Vec<StatsEvent> {
        player.add_drachmas(rewards.drachmas);
        player.add_xp(rewards.xp);

        let mut events: Vec<StatsEvent> = rewards
            .items
            .iter()
            .map(|item| {
                player.inventory_mut().add_consumable(item.clone());
                StatsEvent::ItemGained {
                    name: item.name.clone(),
                }
            })
            .collect();
        events.extend(self.settle(player));
        events
    }

    /// Defeat is never permanent: the hero returns with full resources
    pub fn restore_after_defeat(&self, player: &mut PlayerState) {
        player.restore_full();
    }

    fn settle(&self, player: &mut PlayerState) -> Vec<StatsEvent> {
        let gained = player.settle_level_ups();
        if gained > 0 {
            log::debug!("player leveled up to {}", player.level());
        }
        let final_level = player.level();
        (0..gained)
            .map(|offset| StatsEvent::LeveledUp {
                level: final_level - gained as i32 + offset as i32 + 1,
            })
            .collect()
    }
}

impl Default for PlayerStatsService {
    fn default() -> Self {
        Self::new()
    }
}
