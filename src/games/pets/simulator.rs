//! Balance simulator for Pet Hatchery.
//! Run with: cargo test simulate_ -- --nocapture

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::games::pets::config::{ids, GameConfig, UpgradeEffect};
    use crate::games::pets::economy;
    use crate::games::pets::format::format_number;
    use crate::games::pets::hatch::{HatchOrigin, HatchRequest, HatchSession};
    use crate::games::pets::logic;
    use crate::games::pets::state::ProgressionState;

    /// Simulated player click speed.
    const CLICKS_PER_SEC: f64 = 6.0;

    /// Income per second from clicking plus auto accrual.
    fn income(config: &GameConfig, state: &ProgressionState) -> f64 {
        economy::click_value(config, state, None).amount * CLICKS_PER_SEC
            + economy::auto_rate(config, state)
    }

    /// Affordable upgrade with the shortest payback time.
    fn find_best_upgrade(config: &GameConfig, state: &ProgressionState) -> Option<String> {
        let base = income(config, state);
        let mut best: Option<(f64, String)> = None;
        for def in &config.upgrades {
            if def.world_req.is_some_and(|w| w != state.current_world) {
                continue;
            }
            let level = state.upgrade_level(&def.id);
            if def.max_level.is_some_and(|m| level >= m) {
                continue;
            }
            let cost = economy::upgrade_cost(def, level, state.current_world);
            if cost > state.resource {
                continue;
            }
            let mut after = state.clone();
            after.upgrade_levels.insert(def.id.clone(), level + 1);
            let mut gain = income(config, &after) - base;
            if let UpgradeEffect::ClickBonus(tier) = def.effect {
                // expected value of the extra chance
                gain += economy::click_value(config, state, None).amount
                    * CLICKS_PER_SEC
                    * (tier.multiplier() - 1.0)
                    * (tier.chance_percent(level + 1) - tier.chance_percent(level))
                    / 100.0;
            }
            if gain <= 0.0 {
                continue;
            }
            let payback = cost / gain;
            if best.as_ref().map_or(true, |(b, _)| payback < *b) {
                best = Some((payback, def.id.clone()));
            }
        }
        best.map(|(_, id)| id)
    }

    fn report_stats(
        state: &ProgressionState,
        config: &GameConfig,
        seconds: u32,
        purchases: u32,
        hatched: u32,
    ) {
        println!(
            "[{:>5}s] resource={:>10} income/s={:>10} pets={:>2} hatched={:>3} purchases={:>3} rebirths={}",
            seconds,
            format_number(state.resource),
            format_number(income(config, state)),
            state.owned_pets.len(),
            hatched,
            purchases,
            state.rebirth_count,
        );
    }

    /// Returns the final state after `total_seconds` of greedy play.
    fn simulate(total_seconds: u32) -> ProgressionState {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        let mut session = HatchSession::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut purchases = 0;
        let mut hatched = 0;

        for second in 1..=total_seconds {
            for _ in 0..CLICKS_PER_SEC as u32 {
                logic::click(&config, &mut state, &mut rng);
            }
            logic::accrue(&config, &mut state, 1.0);

            // Save up for an egg once it costs less than a minute of income.
            let egg = economy::egg_cost(&config, state.current_world, 0);
            let saving = egg < income(&config, &state) * 60.0
                && state.owned_pets.len() < config.max_inventory;
            if saving && state.resource >= egg {
                let request = HatchRequest { amount: 1, tier: 0 };
                if session
                    .request(&config, &mut state, request, HatchOrigin::Manual, &mut rng)
                    .is_ok()
                {
                    session.acknowledge(&mut state, &mut rng, second as f64 * 1000.0);
                    session.end_cooldown();
                    session.release_commit_lock();
                    logic::equip_best(&config, &mut state);
                    hatched += 1;
                }
            }

            if !saving {
                while let Some(id) = find_best_upgrade(&config, &state) {
                    if logic::buy_upgrade(&config, &mut state, &id).is_err() {
                        break;
                    }
                    purchases += 1;
                }
            }

            if state.resource >= economy::rebirth_cost(state.rebirth_level, 1) {
                logic::do_rebirth(&mut state, 1).ok();
            }

            if second % 300 == 0 {
                report_stats(&state, &config, second, purchases, hatched);
            }
        }
        state
    }

    #[test]
    fn simulate_30min() {
        let state = simulate(1800);
        assert!(state.lifetime_resource > 0.0);
        assert!(state.upgrade_level(ids::CLICK_POWER) > 0);
        assert!(state.owned_pets.len() <= 60);
    }

    #[test]
    fn simulate_is_deterministic() {
        let a = simulate(300);
        let b = simulate(300);
        assert_eq!(a.resource, b.resource);
        assert_eq!(a.owned_pets.len(), b.owned_pets.len());
    }
}
