//! Pet game logic: the progression store's operations.
//!
//! Every operation validates first and mutates after, so a returned error
//! means the state is untouched.

use std::cmp::Ordering;

use super::config::GameConfig;
use super::economy::{self, ClickValue};
use super::error::GameError;
use super::gacha::RandomSource;
use super::state::{InstanceId, ProgressionState, WorldId, WorldSnapshot, HOME_WORLD};

/// Apply one manual click.
pub fn click(
    config: &GameConfig,
    state: &mut ProgressionState,
    rng: &mut dyn RandomSource,
) -> ClickValue {
    let value = economy::click_value(config, state, Some(rng));
    state.earn(value.amount);
    state.total_clicks += 1;
    *state.world_click_counts.entry(state.current_world).or_insert(0) += 1;
    value
}

/// Credit auto accrual for `seconds` of elapsed time. Returns the amount.
pub fn accrue(config: &GameConfig, state: &mut ProgressionState, seconds: f64) -> f64 {
    if !(seconds > 0.0) {
        return 0.0;
    }
    let amount = economy::auto_rate(config, state) * seconds;
    state.earn(amount);
    amount
}

/// Buy one level of a regular upgrade. Returns the new level.
pub fn buy_upgrade(
    config: &GameConfig,
    state: &mut ProgressionState,
    id: &str,
) -> Result<u32, GameError> {
    let def = config
        .upgrade(id)
        .ok_or_else(|| GameError::InvalidTarget(format!("unknown upgrade `{id}`")))?;
    if let Some(world) = def.world_req {
        if world != state.current_world {
            return Err(GameError::InvalidTarget(format!("`{id}` is only sold in world {world}")));
        }
    }
    let level = state.upgrade_level(id);
    if def.max_level.is_some_and(|max| level >= max) {
        return Err(GameError::InvalidTarget(format!("`{id}` is at max level")));
    }
    let cost = economy::upgrade_cost(def, level, state.current_world);
    if state.resource < cost {
        return Err(GameError::InsufficientFunds {
            needed: cost,
            available: state.resource,
        });
    }

    state.resource -= cost;
    state.upgrade_levels.insert(def.id.clone(), level + 1);
    tracing::debug!(upgrade = id, level = level + 1, cost, "bought upgrade");
    Ok(level + 1)
}

/// Buy one level of a rebirth-shop upgrade, paid in rebirth levels.
pub fn buy_rebirth_upgrade(
    config: &GameConfig,
    state: &mut ProgressionState,
    id: &str,
) -> Result<u32, GameError> {
    let def = config
        .rebirth_upgrade(id)
        .ok_or_else(|| GameError::InvalidTarget(format!("unknown rebirth upgrade `{id}`")))?;
    let level = state.rebirth_upgrade_level(id);
    if def.max_level.is_some_and(|max| level >= max) {
        return Err(GameError::InvalidTarget(format!("`{id}` is at max level")));
    }
    let cost = economy::rebirth_upgrade_cost(def, level);
    let available = state.rebirth_level as f64;
    if available < cost {
        return Err(GameError::InsufficientFunds { needed: cost, available });
    }

    state.rebirth_level -= cost as u64;
    state.rebirth_upgrade_levels.insert(def.id.clone(), level + 1);
    tracing::info!(upgrade = id, level = level + 1, cost, "bought rebirth upgrade");
    Ok(level + 1)
}

/// Move to another unlocked world, parking the current economy.
///
/// Returns `Ok(false)` when `target` is already active.
pub fn switch_world(state: &mut ProgressionState, target: WorldId) -> Result<bool, GameError> {
    if target == state.current_world {
        return Ok(false);
    }
    if !state.unlocked_worlds.contains(&target) {
        return Err(GameError::InvalidTarget(format!("world {target} is locked")));
    }

    let parked = WorldSnapshot {
        resource: state.resource,
        upgrade_levels: std::mem::take(&mut state.upgrade_levels),
        rebirth_level: state.rebirth_level,
    };
    state.world_snapshots.insert(state.current_world, parked);

    let restored = state.world_snapshots.remove(&target).unwrap_or_default();
    state.resource = restored.resource;
    state.upgrade_levels = restored.upgrade_levels;
    state.rebirth_level = restored.rebirth_level;
    state.current_world = target;
    state.auto_hatch_enabled = false;
    tracing::info!(world = target, "switched world");
    Ok(true)
}

/// Unlock a world, paid in the current world's currency.
pub fn buy_world(
    config: &GameConfig,
    state: &mut ProgressionState,
    target: WorldId,
) -> Result<(), GameError> {
    let world = config
        .world(target)
        .ok_or_else(|| GameError::InvalidTarget(format!("unknown world {target}")))?;
    if state.unlocked_worlds.contains(&target) {
        return Err(GameError::InvalidTarget(format!("world {target} is already unlocked")));
    }
    if state.resource < world.cost {
        return Err(GameError::InsufficientFunds {
            needed: world.cost,
            available: state.resource,
        });
    }

    state.resource -= world.cost;
    state.unlocked_worlds.insert(target);
    tracing::info!(world = target, name = %world.name, "unlocked world");
    Ok(())
}

/// Trade the current economy for `amount` rebirth levels.
///
/// The collection survives: pets, equipped set, discovered and auto-delete
/// species, rebirth-shop levels and per-world click counts.
pub fn do_rebirth(state: &mut ProgressionState, amount: u64) -> Result<(), GameError> {
    if amount == 0 {
        return Err(GameError::InvalidTarget("rebirth amount must be at least 1".into()));
    }
    let cost = economy::rebirth_cost(state.rebirth_level, amount);
    if state.resource < cost {
        return Err(GameError::InsufficientFunds {
            needed: cost,
            available: state.resource,
        });
    }
    let (Some(level), Some(count)) = (
        state.rebirth_level.checked_add(amount),
        state.rebirth_count.checked_add(amount),
    ) else {
        return Err(GameError::InvalidTarget("rebirth level overflow".into()));
    };

    state.resource = 0.0;
    state.upgrade_levels.clear();
    state.rebirth_level = level;
    state.rebirth_count = count;
    state.current_world = HOME_WORLD;
    state.unlocked_worlds.clear();
    state.unlocked_worlds.insert(HOME_WORLD);
    state.world_snapshots.clear();
    state.auto_hatch_enabled = false;
    tracing::info!(amount, level = state.rebirth_level, "rebirth");
    Ok(())
}

/// Equip an owned pet. Returns `Ok(false)` if it was already equipped.
pub fn equip(
    config: &GameConfig,
    state: &mut ProgressionState,
    id: InstanceId,
) -> Result<bool, GameError> {
    if state.pet(&id).is_none() {
        return Err(GameError::unknown_pet(&id));
    }
    if state.is_equipped(&id) {
        return Ok(false);
    }
    let capacity = economy::pet_slots(config, state);
    if state.equipped.len() >= capacity {
        return Err(GameError::InsufficientCapacity {
            current: state.equipped.len(),
            capacity,
        });
    }
    state.equipped.insert(id);
    Ok(true)
}

/// Unequip a pet. Returns `Ok(false)` if it was not equipped.
pub fn unequip(state: &mut ProgressionState, id: InstanceId) -> Result<bool, GameError> {
    if state.pet(&id).is_none() {
        return Err(GameError::unknown_pet(&id));
    }
    Ok(state.equipped.remove(&id))
}

/// Replace the equipped set with the strongest pets for the current world.
pub fn equip_best(config: &GameConfig, state: &mut ProgressionState) -> usize {
    let capacity = economy::pet_slots(config, state);
    let world = state.current_world;
    let mut ranked: Vec<(f64, InstanceId)> = state
        .owned_pets
        .iter()
        .map(|p| (economy::effective_multiplier(p, world), p.instance_id))
        .collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    state.equipped = ranked.into_iter().take(capacity).map(|(_, id)| id).collect();
    state.equipped.len()
}

/// Remove an unequipped pet from the inventory.
pub fn delete_pet(state: &mut ProgressionState, id: InstanceId) -> Result<(), GameError> {
    let index = state
        .owned_pets
        .iter()
        .position(|p| p.instance_id == id)
        .ok_or_else(|| GameError::unknown_pet(&id))?;
    if state.is_equipped(&id) {
        return Err(GameError::InvalidTarget(format!("pet {id} is equipped")));
    }
    state.owned_pets.remove(index);
    Ok(())
}

/// Flip auto-delete for a species. Returns the new flag.
pub fn toggle_auto_delete(
    config: &GameConfig,
    state: &mut ProgressionState,
    species_id: &str,
) -> Result<bool, GameError> {
    let known = config
        .eggs
        .values()
        .flatten()
        .flat_map(|t| &t.pool)
        .any(|e| e.species.id == species_id);
    if !known {
        return Err(GameError::InvalidTarget(format!("unknown species `{species_id}`")));
    }
    if state.auto_delete_species.remove(species_id) {
        Ok(false)
    } else {
        state.auto_delete_species.insert(species_id.to_string());
        Ok(true)
    }
}

/// Factory reset. Clears everything, rebirth shop and collection included.
pub fn reset_all(state: &mut ProgressionState) {
    *state = ProgressionState::new();
    tracing::info!("progress reset");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::pets::config::ids;
    use crate::games::pets::state::{OwnedPet, Rarity, Variant};
    use uuid::Uuid;

    struct NoBonus;

    impl RandomSource for NoBonus {
        fn next_unit(&mut self) -> f64 {
            0.999
        }

        fn next_id(&mut self) -> InstanceId {
            Uuid::nil()
        }
    }

    fn pet(n: u128, multiplier: f64, world: WorldId) -> OwnedPet {
        OwnedPet {
            instance_id: Uuid::from_u128(n),
            species_id: format!("species_{n}"),
            name: "Pet".into(),
            rarity: Rarity::Epic,
            multiplier,
            world,
            variant: Variant::Normal,
            acquired_at_ms: 0.0,
        }
    }

    #[test]
    fn click_power_scenario() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        let err = buy_upgrade(&config, &mut state, ids::CLICK_POWER).unwrap_err();
        assert_eq!(err, GameError::InsufficientFunds { needed: 50.0, available: 0.0 });

        state.resource = 50.0;
        assert_eq!(buy_upgrade(&config, &mut state, ids::CLICK_POWER), Ok(1));
        assert_eq!(state.resource, 0.0);

        let value = click(&config, &mut state, &mut NoBonus);
        assert!((value.amount - 2.0).abs() < 1e-9);
        assert!((state.resource - 2.0).abs() < 1e-9);
        assert_eq!(state.total_clicks, 1);
        assert_eq!(state.world_clicks(1), 1);
    }

    #[test]
    fn unknown_upgrade_is_invalid() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        assert!(matches!(
            buy_upgrade(&config, &mut state, "nope"),
            Err(GameError::InvalidTarget(_))
        ));
    }

    #[test]
    fn max_level_is_enforced() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.resource = 1e300;
        state.upgrade_levels.insert(ids::LUCKY_CLICK.into(), 10);
        assert!(matches!(
            buy_upgrade(&config, &mut state, ids::LUCKY_CLICK),
            Err(GameError::InvalidTarget(_))
        ));
        assert_eq!(state.resource, 1e300);
    }

    #[test]
    fn world_locked_upgrade() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.resource = 1e30;
        state.unlocked_worlds.insert(2);
        switch_world(&mut state, 2).unwrap();
        state.resource = 1e30;
        assert!(matches!(
            buy_upgrade(&config, &mut state, ids::GEM_POLISH),
            Err(GameError::InvalidTarget(_))
        ));
    }

    #[test]
    fn upgrade_price_scales_in_later_worlds() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.unlocked_worlds.insert(2);
        switch_world(&mut state, 2).unwrap();
        state.resource = 125.0;
        assert_eq!(buy_upgrade(&config, &mut state, ids::CLICK_POWER), Ok(1));
        assert_eq!(state.resource, 0.0);
    }

    #[test]
    fn rebirth_upgrade_spends_levels() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.rebirth_level = 4;
        assert_eq!(buy_rebirth_upgrade(&config, &mut state, ids::UNLOCK_GOLDEN), Ok(1));
        assert_eq!(state.rebirth_level, 1);
        assert!(matches!(
            buy_rebirth_upgrade(&config, &mut state, ids::UNLOCK_GOLDEN),
            Err(GameError::InvalidTarget(_))
        ));
        assert!(matches!(
            buy_rebirth_upgrade(&config, &mut state, ids::EGG_LUCK),
            Err(GameError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn egg_luck_price_grows() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.rebirth_level = 17;
        buy_rebirth_upgrade(&config, &mut state, ids::EGG_LUCK).unwrap();
        assert_eq!(state.rebirth_level, 12);
        buy_rebirth_upgrade(&config, &mut state, ids::EGG_LUCK).unwrap();
        assert_eq!(state.rebirth_level, 0);
    }

    #[test]
    fn switch_world_parks_and_restores() {
        let mut state = ProgressionState::new();
        state.resource = 500.0;
        state.rebirth_level = 2;
        state.upgrade_levels.insert(ids::CLICK_POWER.into(), 3);
        state.unlocked_worlds.insert(2);
        state.auto_hatch_enabled = true;

        assert_eq!(switch_world(&mut state, 2), Ok(true));
        assert_eq!(state.current_world, 2);
        assert_eq!(state.resource, 0.0);
        assert_eq!(state.rebirth_level, 0);
        assert!(state.upgrade_levels.is_empty());
        assert!(!state.auto_hatch_enabled);

        state.resource = 7.0;
        switch_world(&mut state, 1).unwrap();
        assert_eq!(state.resource, 500.0);
        assert_eq!(state.rebirth_level, 2);
        assert_eq!(state.upgrade_level(ids::CLICK_POWER), 3);
        assert_eq!(state.world_snapshots[&2].resource, 7.0);
        assert!(!state.world_snapshots.contains_key(&1));
    }

    #[test]
    fn switch_to_current_or_locked_is_noop() {
        let mut state = ProgressionState::new();
        state.resource = 9.0;
        let before = state.clone();
        assert_eq!(switch_world(&mut state, 1), Ok(false));
        assert!(switch_world(&mut state, 3).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn buy_world_debits_current_currency() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.resource = 3e12;
        buy_world(&config, &mut state, 2).unwrap();
        assert!(state.unlocked_worlds.contains(&2));
        assert!((state.resource - 5e11).abs() < 1.0);
        assert!(matches!(buy_world(&config, &mut state, 2), Err(GameError::InvalidTarget(_))));
        assert!(matches!(buy_world(&config, &mut state, 42), Err(GameError::InvalidTarget(_))));
        assert!(matches!(
            buy_world(&config, &mut state, 3),
            Err(GameError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn rebirth_resets_economy() {
        let mut state = ProgressionState::new();
        state.resource = 3e8;
        state.upgrade_levels.insert(ids::CLICK_POWER.into(), 5);
        state.unlocked_worlds.insert(2);
        state.world_snapshots.insert(2, WorldSnapshot::default());
        state.auto_hatch_enabled = true;
        state.world_click_counts.insert(1, 40);

        do_rebirth(&mut state, 2).unwrap();
        assert_eq!(state.resource, 0.0);
        assert!(state.upgrade_levels.is_empty());
        assert_eq!(state.rebirth_level, 2);
        assert_eq!(state.rebirth_count, 2);
        assert_eq!(state.current_world, 1);
        assert_eq!(state.unlocked_worlds.len(), 1);
        assert!(state.world_snapshots.is_empty());
        assert!(!state.auto_hatch_enabled);
        assert_eq!(state.world_clicks(1), 40);
    }

    #[test]
    fn rebirth_needs_funds_and_amount() {
        let mut state = ProgressionState::new();
        state.resource = 99_999_999.0;
        assert!(matches!(do_rebirth(&mut state, 1), Err(GameError::InsufficientFunds { .. })));
        assert!(matches!(do_rebirth(&mut state, 0), Err(GameError::InvalidTarget(_))));
        assert_eq!(state.rebirth_level, 0);
    }

    #[test]
    fn huge_rebirth_request_fails_fast() {
        let mut state = ProgressionState::new();
        state.resource = 1e300;
        assert!(matches!(
            do_rebirth(&mut state, u64::MAX),
            Err(GameError::InsufficientFunds { .. })
        ));
        assert_eq!(state.rebirth_level, 0);
    }

    #[test]
    fn rebirth_level_overflow_is_rejected() {
        let mut state = ProgressionState::new();
        state.resource = f64::INFINITY;
        state.rebirth_level = u64::MAX;
        let before = state.clone();
        assert!(matches!(do_rebirth(&mut state, 1), Err(GameError::InvalidTarget(_))));
        assert_eq!(state, before);
    }

    #[test]
    fn equip_respects_slots() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        for n in 1..=6 {
            state.owned_pets.push(pet(n, 1.0, 1));
        }
        for n in 1..=5 {
            assert_eq!(equip(&config, &mut state, Uuid::from_u128(n)), Ok(true));
        }
        assert_eq!(equip(&config, &mut state, Uuid::from_u128(1)), Ok(false));
        assert_eq!(
            equip(&config, &mut state, Uuid::from_u128(6)),
            Err(GameError::InsufficientCapacity { current: 5, capacity: 5 })
        );
        assert_eq!(unequip(&mut state, Uuid::from_u128(1)), Ok(true));
        assert_eq!(equip(&config, &mut state, Uuid::from_u128(6)), Ok(true));
        assert!(equip(&config, &mut state, Uuid::from_u128(99)).is_err());
    }

    #[test]
    fn equip_best_ranks_with_world_penalty() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.owned_pets = vec![
            pet(1, 1.0, 1),
            pet(2, 9.0, 2), // 3.0 in world 1
            pet(3, 4.0, 1),
            pet(4, 2.0, 1),
            pet(5, 2.5, 1),
            pet(6, 3.5, 1),
            pet(7, 0.5, 1),
        ];
        assert_eq!(equip_best(&config, &mut state), 5);
        let expected: Vec<InstanceId> =
            [2, 3, 4, 5, 6].iter().map(|n| Uuid::from_u128(*n)).collect();
        assert_eq!(state.equipped.iter().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn delete_rejects_equipped() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.owned_pets.push(pet(1, 1.0, 1));
        equip(&config, &mut state, Uuid::from_u128(1)).unwrap();
        assert!(matches!(
            delete_pet(&mut state, Uuid::from_u128(1)),
            Err(GameError::InvalidTarget(_))
        ));
        unequip(&mut state, Uuid::from_u128(1)).unwrap();
        delete_pet(&mut state, Uuid::from_u128(1)).unwrap();
        assert!(state.owned_pets.is_empty());
    }

    #[test]
    fn auto_delete_toggles() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        assert_eq!(toggle_auto_delete(&config, &mut state, "w1_chicken"), Ok(true));
        assert!(state.auto_delete_species.contains("w1_chicken"));
        assert_eq!(toggle_auto_delete(&config, &mut state, "w1_chicken"), Ok(false));
        assert!(toggle_auto_delete(&config, &mut state, "ghost").is_err());
    }

    #[test]
    fn accrue_uses_auto_rate() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.upgrade_levels.insert(ids::AUTO_CLICKER.into(), 10);
        // rate 0.2 per second
        let got = accrue(&config, &mut state, 3600.0);
        assert!((got - 720.0).abs() < 1e-9);
        assert!((state.lifetime_resource - 720.0).abs() < 1e-9);
        assert_eq!(accrue(&config, &mut state, -1.0), 0.0);
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut state = ProgressionState::new();
        state.resource = 10.0;
        state.rebirth_upgrade_levels.insert(ids::EGG_LUCK.into(), 3);
        state.discovered_species.insert("w1_chicken".into());
        state.owned_pets.push(pet(1, 1.0, 1));
        reset_all(&mut state);
        assert_eq!(state, ProgressionState::new());
    }
}
