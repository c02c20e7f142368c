//! Economy model: click value, auto accrual and every purchase price.
//!
//! Pure functions of `(GameConfig, ProgressionState)`. Nothing here mutates.

use super::config::{
    BonusTier, GameConfig, RebirthPerk, RebirthUpgradeDef, UpgradeDef, UpgradeEffect,
};
use super::gacha::RandomSource;
use super::state::{OwnedPet, ProgressionState, WorldId};

/// Rebirth price of the first level.
pub const REBIRTH_BASE_COST: f64 = 100_000_000.0;
/// Per-level growth of the rebirth price.
pub const REBIRTH_COST_GROWTH: f64 = 1.8;
/// Equipped pets from another world contribute a third of their multiplier.
pub const CROSS_WORLD_PENALTY: f64 = 3.0;
/// Upgrade prices grow by this factor per world past the first.
pub const WORLD_COST_SCALING: f64 = 2.5;
/// Per-level weight boost of egg luck on non-Common entries.
pub const LUCK_WEIGHT_PER_LEVEL: f64 = 0.2;

/// Result of one click evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickValue {
    pub amount: f64,
    /// The bonus tier that fired, if any.
    pub bonus: Option<BonusTier>,
}

impl ClickValue {
    pub fn is_bonus(&self) -> bool {
        self.bonus.is_some()
    }

    pub fn bonus_label(&self) -> Option<&str> {
        self.bonus.as_ref().map(|b| b.label())
    }
}

/// Rebirth-derived click multiplier: 1 at level 0, then 1.10 + 0.05 per extra level.
pub fn rebirth_multiplier(rebirth_level: u64) -> f64 {
    if rebirth_level == 0 {
        1.0
    } else {
        1.10 + (rebirth_level - 1) as f64 * 0.05
    }
}

/// Upgrade price scaling for a world. World 1 is unscaled.
pub fn world_scaling(world: WorldId) -> f64 {
    if world <= 1 {
        1.0
    } else {
        WORLD_COST_SCALING.powi(world as i32 - 1)
    }
}

/// A pet's contribution while equipped in `current_world`.
pub fn effective_multiplier(pet: &OwnedPet, current_world: WorldId) -> f64 {
    if pet.world == current_world {
        pet.multiplier
    } else {
        pet.multiplier / CROSS_WORLD_PENALTY
    }
}

/// Sum of equipped pets' effective multipliers.
pub fn pet_bonus(state: &ProgressionState) -> f64 {
    state
        .equipped_pets()
        .map(|p| effective_multiplier(p, state.current_world))
        .sum()
}

/// Equip capacity: base slots plus slot perks from the rebirth shop.
pub fn pet_slots(config: &GameConfig, state: &ProgressionState) -> usize {
    let extra: u32 = config
        .rebirth_upgrades
        .iter()
        .map(|u| match u.perk {
            RebirthPerk::ExtraPetSlots(n) => n * state.rebirth_upgrade_level(&u.id),
            _ => 0,
        })
        .sum();
    config.base_pet_slots + extra as usize
}

/// Egg luck level from the rebirth shop.
pub fn luck_level(config: &GameConfig, state: &ProgressionState) -> u32 {
    config.perk_level(state, |p| matches!(p, RebirthPerk::EggLuck))
}

fn divine_multiplier(config: &GameConfig, state: &ProgressionState) -> f64 {
    let level = config.perk_level(state, |p| matches!(p, RebirthPerk::DivinePower));
    1.0 + 0.5 * level as f64
}

fn bonus_level(config: &GameConfig, state: &ProgressionState, tier: BonusTier) -> u32 {
    config
        .upgrades
        .iter()
        .filter(|u| u.effect == UpgradeEffect::ClickBonus(tier))
        .map(|u| state.upgrade_level(&u.id))
        .sum()
}

/// Click value before any random bonus.
fn base_click_value(config: &GameConfig, state: &ProgressionState) -> f64 {
    let mut base = 1.0;
    let mut multiplier = 1.0;
    for upgrade in &config.upgrades {
        let level = state.upgrade_level(&upgrade.id);
        match upgrade.effect {
            UpgradeEffect::ClickFlat { per_level } => base += per_level * level as f64,
            UpgradeEffect::ClickMultiplier { factor } => multiplier *= factor.powi(level as i32),
            _ => {}
        }
    }

    if state.double_click_active {
        multiplier *= 2.0;
    }
    multiplier *= rebirth_multiplier(state.rebirth_level);
    multiplier *= divine_multiplier(config, state);

    // Pets add to each other, then multiply the whole.
    let pets = pet_bonus(state);
    if pets > 0.0 {
        multiplier *= pets;
    }

    base * multiplier
}

/// Value of one click. With `rng`, at most one bonus tier may fire,
/// tried in priority order crit, burst, lucky.
pub fn click_value(
    config: &GameConfig,
    state: &ProgressionState,
    rng: Option<&mut dyn RandomSource>,
) -> ClickValue {
    let amount = base_click_value(config, state);
    let Some(rng) = rng else {
        return ClickValue { amount, bonus: None };
    };

    for &tier in BonusTier::all() {
        let chance = tier.chance_percent(bonus_level(config, state, tier));
        if chance <= 0.0 {
            continue;
        }
        if rng.next_unit() * 100.0 < chance {
            return ClickValue {
                amount: amount * tier.multiplier(),
                bonus: Some(tier),
            };
        }
    }
    ClickValue { amount, bonus: None }
}

/// Auto accrual per second.
pub fn auto_rate(config: &GameConfig, state: &ProgressionState) -> f64 {
    let fraction: f64 = config
        .upgrades
        .iter()
        .map(|u| match u.effect {
            UpgradeEffect::AutoClicker { fraction_per_level } => {
                fraction_per_level * state.upgrade_level(&u.id) as f64
            }
            _ => 0.0,
        })
        .sum();
    if fraction <= 0.0 {
        return 0.0;
    }
    base_click_value(config, state) * fraction
}

/// Price of the next level of a regular upgrade in `world`.
pub fn upgrade_cost(upgrade: &UpgradeDef, current_level: u32, world: WorldId) -> f64 {
    (upgrade.base_cost * upgrade.cost_multiplier.powi(current_level as i32) * world_scaling(world))
        .floor()
}

/// Price of the next level of a rebirth-shop upgrade, in rebirth levels.
pub fn rebirth_upgrade_cost(upgrade: &RebirthUpgradeDef, current_level: u32) -> f64 {
    (upgrade.base_cost * upgrade.cost_multiplier.powi(current_level as i32)).floor()
}

/// Price of `amount` rebirths bought at once from `current_level`.
/// Saturates to infinity once the sum overflows `f64`.
pub fn rebirth_cost(current_level: u64, amount: u64) -> f64 {
    let mut total = 0.0_f64;
    for i in 0..amount {
        let level = current_level.saturating_add(i);
        total += (REBIRTH_BASE_COST * REBIRTH_COST_GROWTH.powf(level as f64)).floor();
        if total.is_infinite() {
            break;
        }
    }
    total
}

/// Unit price of an egg tier in `world`.
pub fn egg_cost(config: &GameConfig, world: WorldId, tier: u32) -> f64 {
    let base = config
        .base_egg_costs
        .get(&world)
        .copied()
        .unwrap_or(config.fallback_egg_cost);
    let tier_multiplier = config
        .egg_tier(world, tier)
        .map(|t| t.cost_multiplier)
        .unwrap_or(1.0);
    base * tier_multiplier
}
