//! Weighted reward draws for egg hatching.

use super::config::{EggTierConfig, RewardEntry};
use super::economy::LUCK_WEIGHT_PER_LEVEL;
use super::error::ConfigError;
use super::state::{InstanceId, Species, Variant};

/// Probability that a drawn pet is promoted to shiny.
pub const SHINY_CHANCE: f64 = 0.001;
/// Multiplier applied to a shiny pet.
pub const SHINY_FACTOR: f64 = 5.5;

/// Source of randomness for draws, click bonuses and instance ids.
///
/// Every `rand::Rng` is a `RandomSource`; tests supply scripted ones.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Fresh instance id.
    fn next_id(&mut self) -> InstanceId;
}

impl<R: rand::Rng> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn next_id(&mut self) -> InstanceId {
        let mut bytes = [0u8; 16];
        self.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// One drawn pet, not yet owned.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnPet {
    pub species: Species,
    pub variant: Variant,
    /// Species multiplier with the shiny factor applied.
    pub multiplier: f64,
}

fn luck_weight(entry: &RewardEntry, luck_level: u32) -> f64 {
    if entry.species.rarity.is_luck_boosted() {
        entry.weight * (1.0 + luck_level as f64 * LUCK_WEIGHT_PER_LEVEL)
    } else {
        entry.weight
    }
}

/// Luck-adjusted weights for `pool`, or the configuration fault that makes it undrawable.
pub fn weights(egg: &EggTierConfig, luck_level: u32) -> Result<(Vec<f64>, f64), ConfigError> {
    let mut out = Vec::with_capacity(egg.pool.len());
    let mut total = 0.0;
    for entry in &egg.pool {
        if !entry.weight.is_finite() || entry.weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                species: entry.species.id.clone(),
                weight: entry.weight,
            });
        }
        let w = luck_weight(entry, luck_level);
        total += w;
        out.push(w);
    }
    if !(total > 0.0) {
        let world = egg.pool.first().map(|e| e.species.world).unwrap_or(0);
        return Err(ConfigError::EmptyPool {
            world,
            tier: egg.tier_id,
            total,
        });
    }
    Ok((out, total))
}

/// Index of the first entry whose cumulative weight reaches `r`.
fn select(weights: &[f64], r: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= r {
            return i;
        }
    }
    // Rounding can leave r just above the final sum.
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}

/// Draw `count` independent pets from `egg`.
pub fn draw(
    egg: &EggTierConfig,
    count: u32,
    luck_level: u32,
    rng: &mut dyn RandomSource,
) -> Result<Vec<DrawnPet>, ConfigError> {
    let (weights, total) = weights(egg, luck_level).map_err(|e| {
        tracing::error!(error = %e, egg = %egg.name, "egg pool is not drawable");
        e
    })?;

    let mut drawn = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let r = rng.next_unit() * total;
        let species = egg.pool[select(&weights, r)].species.clone();
        let shiny = rng.next_unit() < SHINY_CHANCE;
        let (variant, multiplier) = if shiny {
            (Variant::Shiny, species.multiplier * SHINY_FACTOR)
        } else {
            (Variant::Normal, species.multiplier)
        };
        drawn.push(DrawnPet {
            species,
            variant,
            multiplier,
        });
    }
    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::pets::state::Rarity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    struct Scripted(Vec<f64>);

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f64 {
            self.0.remove(0)
        }

        fn next_id(&mut self) -> InstanceId {
            Uuid::nil()
        }
    }

    fn entry(id: &str, rarity: Rarity, weight: f64) -> RewardEntry {
        RewardEntry {
            species: Species {
                id: id.into(),
                name: id.to_uppercase(),
                rarity,
                multiplier: 2.0,
                world: 1,
            },
            weight,
        }
    }

    fn egg(pool: Vec<RewardEntry>) -> EggTierConfig {
        EggTierConfig {
            tier_id: 0,
            name: "Test Egg".into(),
            cost_multiplier: 1.0,
            pool,
        }
    }

    fn a_b() -> EggTierConfig {
        egg(vec![entry("a", Rarity::Common, 3.0), entry("b", Rarity::Common, 1.0)])
    }

    #[test]
    fn low_draw_selects_first_entry() {
        let mut rng = Scripted(vec![0.0, 0.5]);
        let got = draw(&a_b(), 1, 0, &mut rng).unwrap();
        assert_eq!(got[0].species.id, "a");
    }

    #[test]
    fn high_draw_selects_second_entry() {
        let mut rng = Scripted(vec![0.9999, 0.5]);
        let got = draw(&a_b(), 1, 0, &mut rng).unwrap();
        assert_eq!(got[0].species.id, "b");
    }

    #[test]
    fn boundary_resolves_to_earlier_entry() {
        // r == 3.0 exactly: cumulative 3.0 >= 3.0 picks a
        let mut rng = Scripted(vec![0.75, 0.5]);
        let got = draw(&a_b(), 1, 0, &mut rng).unwrap();
        assert_eq!(got[0].species.id, "a");
    }

    #[test]
    fn frequency_converges_to_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let got = draw(&a_b(), 100_000, 0, &mut rng).unwrap();
        let a = got.iter().filter(|p| p.species.id == "a").count() as f64;
        let freq = a / 100_000.0;
        assert!((freq - 0.75).abs() < 0.01, "frequency {}", freq);
    }

    #[test]
    fn shiny_promotion_applies_factor() {
        let mut rng = Scripted(vec![0.0, 0.0005, 0.0, 0.5]);
        let got = draw(&a_b(), 2, 0, &mut rng).unwrap();
        assert_eq!(got[0].variant, Variant::Shiny);
        assert!((got[0].multiplier - 11.0).abs() < 1e-9);
        assert_eq!(got[1].variant, Variant::Normal);
        assert!((got[1].multiplier - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_weight_is_config_error() {
        let pool = egg(vec![entry("a", Rarity::Common, 0.0)]);
        let mut rng = Scripted(vec![]);
        let err = draw(&pool, 1, 0, &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPool { .. }));
    }

    #[test]
    fn empty_pool_is_config_error() {
        let mut rng = Scripted(vec![]);
        assert!(draw(&egg(vec![]), 1, 0, &mut rng).is_err());
    }

    #[test]
    fn nan_weight_is_config_error() {
        let pool = egg(vec![entry("a", Rarity::Common, f64::NAN)]);
        let mut rng = Scripted(vec![]);
        assert!(matches!(
            draw(&pool, 1, 0, &mut rng),
            Err(ConfigError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn luck_boosts_only_non_common() {
        let pool = egg(vec![
            entry("c", Rarity::Common, 10.0),
            entry("r", Rarity::Rare, 10.0),
        ]);
        let (w, total) = weights(&pool, 5).unwrap();
        assert_eq!(w, vec![10.0, 20.0]);
        assert_eq!(total, 30.0);
    }

    #[test]
    fn select_falls_back_to_last_positive_entry() {
        assert_eq!(select(&[1.0, 2.0, 0.0], 3.5), 1);
    }
}
