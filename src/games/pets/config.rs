//! Static content tables and engine tunables.
//!
//! `GameConfig::standard()` carries the shipped tables. A host may replace
//! them with a JSON document through `GameConfig::from_json`, which is
//! validated before the engine sees it. The engine never mutates config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::state::{ProgressionState, Rarity, Species, Variant, WorldId};

/// Upgrade and perk ids referenced by the shipped tables.
pub mod ids {
    pub const AUTO_CLICKER: &str = "auto_clicker_percent";
    pub const CLICK_POWER: &str = "click_power";
    pub const MEGA_CLICK: &str = "mega_click";
    pub const CLICK_FRENZY: &str = "click_frenzy";
    pub const REINFORCED_HANDLE: &str = "reinforced_handle";
    pub const LUCKY_CLICK: &str = "lucky_click";
    pub const BURST_CLICK: &str = "burst_click";
    pub const CRIT_STRIKE: &str = "crit_strike";
    pub const GEM_POLISH: &str = "gem_polish";

    pub const MORE_PETS_1: &str = "more_pets_1";
    pub const MORE_PETS_2: &str = "more_pets_2";
    pub const UNLOCK_GOLDEN: &str = "unlock_golden";
    pub const UNLOCK_RAINBOW: &str = "unlock_rainbow";
    pub const UNLOCK_DARK_MATTER: &str = "unlock_dark_matter";
    pub const EGG_LUCK: &str = "egg_luck";
    pub const UNLOCK_TRIPLE_EGG: &str = "unlock_triple_egg";
    pub const UNLOCK_AUTO_HATCH: &str = "unlock_auto_hatch";
    pub const HATCH_SPEED: &str = "hatch_speed";
    pub const DIVINE_POWER: &str = "divine_power";
}

/// Random click bonus tiers, in evaluation priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusTier {
    Crit,
    Burst,
    Lucky,
}

impl BonusTier {
    /// Priority order: a lower tier is only rolled if every higher one missed.
    pub fn all() -> &'static [BonusTier] {
        &[BonusTier::Crit, BonusTier::Burst, BonusTier::Lucky]
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            BonusTier::Crit => 5.0,
            BonusTier::Burst => 3.0,
            BonusTier::Lucky => 2.0,
        }
    }

    /// Trigger chance in percent at the given upgrade level.
    pub fn chance_percent(&self, level: u32) -> f64 {
        let level = level as f64;
        match self {
            BonusTier::Crit => (level * 1.0).min(50.0),
            BonusTier::Burst => (level * 5.0).min(100.0),
            BonusTier::Lucky => (level * 10.0).min(100.0),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BonusTier::Crit => "CRIT x5!",
            BonusTier::Burst => "Burst x3!",
            BonusTier::Lucky => "Lucky x2!",
        }
    }
}

/// What a regular upgrade does per level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    /// Auto accrual at `fraction_per_level * level` of the no-bonus click value per second.
    AutoClicker { fraction_per_level: f64 },
    /// Flat addition to the base click value.
    ClickFlat { per_level: f64 },
    /// Geometric click multiplier `factor^level`.
    ClickMultiplier { factor: f64 },
    /// Raises the chance of a random click bonus tier.
    ClickBonus(BonusTier),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    #[serde(default)]
    pub max_level: Option<u32>,
    /// Only purchasable while this world is active.
    #[serde(default)]
    pub world_req: Option<WorldId>,
    pub effect: UpgradeEffect,
}

/// What a rebirth-shop upgrade does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RebirthPerk {
    /// Extra equip slots while owned.
    ExtraPetSlots(u32),
    /// Allows crafting up to this variant.
    UnlockVariant(Variant),
    /// Each level scales non-Common draw weights by +20%.
    EggLuck,
    /// Allows hatching more than one egg per round.
    UnlockTripleEgg,
    UnlockAutoHatch,
    /// Reveal animation runs 30% faster.
    HatchSpeed,
    /// +50% click multiplier per level.
    DivinePower,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RebirthUpgradeDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    #[serde(default)]
    pub max_level: Option<u32>,
    pub perk: RebirthPerk,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldDef {
    pub id: WorldId,
    pub name: String,
    /// Unlock price, paid in whatever currency is active at purchase time.
    pub cost: f64,
    pub currency: String,
}

/// One weighted entry of an egg's reward pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub species: Species,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EggTierConfig {
    pub tier_id: u32,
    pub name: String,
    /// Multiplier on the world's base egg cost.
    pub cost_multiplier: f64,
    /// Draw order matters: ties resolve to the earliest entry.
    pub pool: Vec<RewardEntry>,
}

/// A display-only achievement predicate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AchievementCondition {
    TotalClicks(u64),
    Resource(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub condition: AchievementCondition,
}

impl AchievementDef {
    pub fn is_unlocked(&self, state: &ProgressionState) -> bool {
        match self.condition {
            AchievementCondition::TotalClicks(n) => state.total_clicks >= n,
            AchievementCondition::Resource(n) => state.resource >= n,
        }
    }
}

/// All static content the engine consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub upgrades: Vec<UpgradeDef>,
    pub rebirth_upgrades: Vec<RebirthUpgradeDef>,
    pub worlds: Vec<WorldDef>,
    pub eggs: BTreeMap<WorldId, Vec<EggTierConfig>>,
    /// Tier-0 egg price per world. Not formulaic.
    pub base_egg_costs: BTreeMap<WorldId, f64>,
    /// Egg price for a world missing from `base_egg_costs`.
    pub fallback_egg_cost: f64,
    pub base_pet_slots: usize,
    pub max_inventory: usize,
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

impl GameConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every reward pool for usable weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (world, tiers) in &self.eggs {
            for tier in tiers {
                let mut total = 0.0;
                for entry in &tier.pool {
                    if !entry.weight.is_finite() || entry.weight < 0.0 {
                        return Err(ConfigError::InvalidWeight {
                            species: entry.species.id.clone(),
                            weight: entry.weight,
                        });
                    }
                    total += entry.weight;
                }
                if total <= 0.0 {
                    return Err(ConfigError::EmptyPool {
                        world: *world,
                        tier: tier.tier_id,
                        total,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn rebirth_upgrade(&self, id: &str) -> Option<&RebirthUpgradeDef> {
        self.rebirth_upgrades.iter().find(|u| u.id == id)
    }

    pub fn world(&self, id: WorldId) -> Option<&WorldDef> {
        self.worlds.iter().find(|w| w.id == id)
    }

    pub fn egg_tier(&self, world: WorldId, tier: u32) -> Result<&EggTierConfig, ConfigError> {
        self.eggs
            .get(&world)
            .and_then(|tiers| tiers.iter().find(|t| t.tier_id == tier))
            .ok_or(ConfigError::UnknownEggTier { world, tier })
    }

    /// Summed level of every rebirth upgrade whose perk matches.
    pub fn perk_level(
        &self,
        state: &ProgressionState,
        matches: impl Fn(&RebirthPerk) -> bool,
    ) -> u32 {
        self.rebirth_upgrades
            .iter()
            .filter(|u| matches(&u.perk))
            .map(|u| state.rebirth_upgrade_level(&u.id))
            .sum()
    }

    /// Whether any rebirth upgrade with a matching perk is owned.
    pub fn has_perk(
        &self,
        state: &ProgressionState,
        matches: impl Fn(&RebirthPerk) -> bool,
    ) -> bool {
        self.perk_level(state, matches) > 0
    }

    /// The shipped content tables.
    pub fn standard() -> Self {
        Self {
            upgrades: standard_upgrades(),
            rebirth_upgrades: standard_rebirth_upgrades(),
            worlds: standard_worlds(),
            eggs: standard_eggs(),
            base_egg_costs: BTreeMap::from([
                (1, 20_000.0),
                (2, 1e8),
                (3, 1e12),
                (4, 5e14),
                (5, 5e19),
                (6, 5e23),
                (7, 1e25),
                (8, 5e28),
                (9, 1e32),
                (10, 1e33),
            ]),
            fallback_egg_cost: 99_999_999_999_999_999_999.0,
            base_pet_slots: 5,
            max_inventory: 60,
            achievements: standard_achievements(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Timing policy for the hatch loop, autosave and click gate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Session stays busy this long after a commit before returning to Idle.
    pub hatch_cooldown_ms: u32,
    /// Commit re-entrancy lock is released this long after a commit.
    pub commit_lock_release_ms: u32,
    /// Delay between auto-hatch rounds.
    pub auto_hatch_delay_ms: u32,
    /// Reveal animation step; the reveal takes four steps.
    pub crack_interval_ms: u32,
    /// Pause after the reveal before the round is auto-acknowledged.
    pub auto_close_delay_ms: u32,
    pub autosave_interval_ms: u32,
    pub click_window_ms: u32,
    pub max_clicks_per_window: usize,
}

/// Crack steps before the eggs open.
pub const CRACK_STEPS: u32 = 4;

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hatch_cooldown_ms: 50,
            commit_lock_release_ms: 50,
            auto_hatch_delay_ms: 300,
            crack_interval_ms: 800,
            auto_close_delay_ms: 300,
            autosave_interval_ms: 30_000,
            click_window_ms: 1_000,
            max_clicks_per_window: 15,
        }
    }
}

impl EngineSettings {
    /// The auto-hatch loop stalls unless both post-commit delays end
    /// before the next retry fires.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hatch_cooldown_ms >= self.auto_hatch_delay_ms {
            return Err(ConfigError::InvalidSettings(format!(
                "hatch cooldown ({} ms) must be shorter than the auto-hatch delay ({} ms)",
                self.hatch_cooldown_ms, self.auto_hatch_delay_ms
            )));
        }
        if self.commit_lock_release_ms >= self.auto_hatch_delay_ms {
            return Err(ConfigError::InvalidSettings(format!(
                "commit lock release ({} ms) must be shorter than the auto-hatch delay ({} ms)",
                self.commit_lock_release_ms, self.auto_hatch_delay_ms
            )));
        }
        if self.max_clicks_per_window == 0 {
            return Err(ConfigError::InvalidSettings(
                "max_clicks_per_window must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Time from reveal start until the round closes by itself.
    pub fn reveal_duration_ms(&self, fast: bool) -> f64 {
        let step = if fast {
            self.crack_interval_ms as f64 * 0.7
        } else {
            self.crack_interval_ms as f64
        };
        step * CRACK_STEPS as f64 + self.auto_close_delay_ms as f64
    }
}

// ── Content tables ──────────────────────────────────────────────

fn upgrade(
    id: &str,
    name: &str,
    description: &str,
    base_cost: f64,
    cost_multiplier: f64,
    max_level: Option<u32>,
    effect: UpgradeEffect,
) -> UpgradeDef {
    UpgradeDef {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        base_cost,
        cost_multiplier,
        max_level,
        world_req: None,
        effect,
    }
}

fn standard_upgrades() -> Vec<UpgradeDef> {
    let mut polish = upgrade(
        ids::GEM_POLISH,
        "Gem Polish",
        "Global multiplier x1.2",
        2_000_000.0,
        3.0,
        None,
        UpgradeEffect::ClickMultiplier { factor: 1.2 },
    );
    polish.world_req = Some(1);

    vec![
        upgrade(
            ids::AUTO_CLICKER,
            "Auto Clicker",
            "Clicks for 2% of your power (+2% per level)",
            200.0,
            1.6,
            Some(20),
            UpgradeEffect::AutoClicker { fraction_per_level: 0.02 },
        ),
        upgrade(
            ids::CLICK_POWER,
            "Better Hammer",
            "+1 per click",
            50.0,
            1.8,
            None,
            UpgradeEffect::ClickFlat { per_level: 1.0 },
        ),
        upgrade(
            ids::MEGA_CLICK,
            "Mega Click",
            "+5 per click",
            1_000.0,
            1.9,
            None,
            UpgradeEffect::ClickFlat { per_level: 5.0 },
        ),
        upgrade(
            ids::CLICK_FRENZY,
            "Click Frenzy",
            "+10 base click",
            30_000.0,
            1.8,
            None,
            UpgradeEffect::ClickFlat { per_level: 10.0 },
        ),
        upgrade(
            ids::REINFORCED_HANDLE,
            "Reinforced Handle",
            "+15 per click",
            50_000.0,
            1.8,
            None,
            UpgradeEffect::ClickFlat { per_level: 15.0 },
        ),
        upgrade(
            ids::LUCKY_CLICK,
            "Lucky Click",
            "+10% chance of a 2x click",
            10_000.0,
            2.5,
            Some(10),
            UpgradeEffect::ClickBonus(BonusTier::Lucky),
        ),
        upgrade(
            ids::BURST_CLICK,
            "Burst",
            "+5% chance of a 3x click",
            25_000.0,
            2.2,
            Some(20),
            UpgradeEffect::ClickBonus(BonusTier::Burst),
        ),
        upgrade(
            ids::CRIT_STRIKE,
            "Critical Strike",
            "+1% chance of a 5x click",
            20_000.0,
            1.8,
            Some(50),
            UpgradeEffect::ClickBonus(BonusTier::Crit),
        ),
        polish,
    ]
}

fn rebirth_upgrade(
    id: &str,
    name: &str,
    description: &str,
    base_cost: f64,
    cost_multiplier: f64,
    max_level: u32,
    perk: RebirthPerk,
) -> RebirthUpgradeDef {
    RebirthUpgradeDef {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        base_cost,
        cost_multiplier,
        max_level: Some(max_level),
        perk,
    }
}

fn standard_rebirth_upgrades() -> Vec<RebirthUpgradeDef> {
    vec![
        rebirth_upgrade(
            ids::MORE_PETS_1,
            "Bigger Herd I",
            "+3 equip slots",
            15.0,
            1.0,
            1,
            RebirthPerk::ExtraPetSlots(3),
        ),
        rebirth_upgrade(
            ids::MORE_PETS_2,
            "Bigger Herd II",
            "+2 more equip slots",
            75.0,
            1.0,
            1,
            RebirthPerk::ExtraPetSlots(2),
        ),
        rebirth_upgrade(
            ids::UNLOCK_GOLDEN,
            "Golden Transformation",
            "Craft Golden pets (x4.5)",
            3.0,
            1.0,
            1,
            RebirthPerk::UnlockVariant(Variant::Golden),
        ),
        rebirth_upgrade(
            ids::UNLOCK_RAINBOW,
            "Rainbow Transformation",
            "Craft Rainbow pets (x9)",
            15.0,
            1.0,
            1,
            RebirthPerk::UnlockVariant(Variant::Rainbow),
        ),
        rebirth_upgrade(
            ids::UNLOCK_DARK_MATTER,
            "Dark Matter",
            "Craft Dark Matter pets (x36)",
            60.0,
            1.0,
            1,
            RebirthPerk::UnlockVariant(Variant::DarkMatter),
        ),
        rebirth_upgrade(
            ids::EGG_LUCK,
            "Explorer's Luck",
            "+20% weight for rare pets",
            5.0,
            2.5,
            10,
            RebirthPerk::EggLuck,
        ),
        rebirth_upgrade(
            ids::UNLOCK_TRIPLE_EGG,
            "Triple Egg",
            "Open 3 eggs at once",
            10.0,
            1.0,
            1,
            RebirthPerk::UnlockTripleEgg,
        ),
        rebirth_upgrade(
            ids::UNLOCK_AUTO_HATCH,
            "Auto Hatch",
            "Open eggs automatically",
            25.0,
            1.0,
            1,
            RebirthPerk::UnlockAutoHatch,
        ),
        rebirth_upgrade(
            ids::HATCH_SPEED,
            "Fast Hatching",
            "Hatch animation 30% faster",
            5.0,
            1.0,
            1,
            RebirthPerk::HatchSpeed,
        ),
        rebirth_upgrade(
            ids::DIVINE_POWER,
            "Divine Power",
            "Permanent +50% to everything",
            15.0,
            3.0,
            100,
            RebirthPerk::DivinePower,
        ),
    ]
}

fn world(id: WorldId, name: &str, cost: f64, currency: &str) -> WorldDef {
    WorldDef {
        id,
        name: name.into(),
        cost,
        currency: currency.into(),
    }
}

fn standard_worlds() -> Vec<WorldDef> {
    vec![
        world(1, "Earth", 0.0, "Gold"),
        world(2, "Space", 2.5e12, "Cosmic Dust"),
        world(3, "Candy Land", 1e13, "Sticks"),
        world(4, "Cyber World", 5e15, "Bits"),
        world(5, "Atlantis", 5e20, "Shells"),
        world(6, "Shadow Dimension", 5e21, "Dark Matter"),
        world(7, "Inferno", 1e26, "Obsidian"),
        world(8, "Heavens", 5e29, "Feathers"),
        world(9, "Steampunk", 1e33, "Cogs"),
        world(10, "Singularity", 1e34, "Quarks"),
    ]
}

fn pet(
    id: &str,
    name: &str,
    rarity: Rarity,
    multiplier: f64,
    world: WorldId,
    weight: f64,
) -> RewardEntry {
    RewardEntry {
        species: Species {
            id: id.into(),
            name: name.into(),
            rarity,
            multiplier,
            world,
        },
        weight,
    }
}

fn tier(tier_id: u32, name: &str, cost_multiplier: f64, pool: Vec<RewardEntry>) -> EggTierConfig {
    EggTierConfig {
        tier_id,
        name: name.into(),
        cost_multiplier,
        pool,
    }
}

fn standard_eggs() -> BTreeMap<WorldId, Vec<EggTierConfig>> {
    use Rarity::*;
    BTreeMap::from([
        (1, vec![
            tier(0, "Farm Egg", 1.0, vec![
                pet("w1_chicken", "Chicken", Common, 1.05, 1, 35.0),
                pet("w1_dog", "Rocky", Rare, 1.15, 1, 30.0),
                pet("w1_cat", "Cat", Epic, 1.35, 1, 20.0),
                pet("w1_fox", "Fox", Legendary, 1.8, 1, 10.0),
                pet("w1_dragon", "Dragon", Mythical, 4.0, 1, 4.0),
                pet("w1_unicorn", "Unicorn", Secret, 10.0, 1, 1.0),
            ]),
            tier(1, "Forest Egg", 15.0, vec![
                pet("w1_t2_raccoon", "Raccoon", Rare, 2.0, 1, 60.0),
                pet("w1_t2_bear", "Bear", Epic, 3.5, 1, 30.0),
                pet("w1_t2_wolf", "Wolf", Legendary, 6.0, 1, 10.0),
            ]),
            tier(2, "Golden Egg", 250.0, vec![
                pet("w1_t3_goose", "Golden Goose", Legendary, 8.0, 1, 80.0),
                pet("w1_t3_spirit", "Forest Spirit", Mythical, 15.0, 1, 20.0),
            ]),
        ]),
        (2, vec![
            tier(0, "Cosmic Egg", 1.0, vec![
                pet("w2_common", "Space Owl", Common, 1.2, 2, 40.0),
                pet("w2_rare", "Star Bat", Rare, 1.8, 2, 30.0),
                pet("w2_legendary", "Void Ghost", Legendary, 3.5, 2, 20.0),
                pet("w2_mythical_1", "Phoenix", Mythical, 6.0, 2, 5.0),
                pet("w2_mythical_2", "Griffin", Mythical, 8.0, 2, 4.0),
                pet("w2_secret", "Alien", Secret, 25.0, 2, 1.0),
            ]),
            tier(1, "Nebula Egg", 15.0, vec![
                pet("w2_t2_comet", "Comet Shard", Rare, 5.0, 2, 60.0),
                pet("w2_t2_astro", "Astronaut", Epic, 9.0, 2, 40.0),
            ]),
            tier(2, "Galactic Egg", 250.0, vec![
                pet("w2_t3_robot", "Cyber Guardian", Legendary, 15.0, 2, 70.0),
                pet("w2_t3_dragon", "Cyber Dragon", Mythical, 30.0, 2, 30.0),
            ]),
        ]),
        (3, vec![
            tier(0, "Sweet Egg", 1.0, vec![
                pet("w3_common", "Mouse", Common, 2.5, 3, 50.0),
                pet("w3_rare", "Piglet", Rare, 5.0, 3, 30.0),
                pet("w3_epic", "Panda", Epic, 8.0, 3, 15.0),
                pet("w3_mythical", "T-Rex", Mythical, 20.0, 3, 4.5),
                pet("w3_secret", "Sugar King", Secret, 50.0, 3, 0.5),
            ]),
            tier(1, "Frosted Egg", 15.0, vec![
                pet("w3_t2_cookie", "Cookie", Rare, 10.0, 3, 60.0),
                pet("w3_t2_cake", "Mr. Cake", Epic, 18.0, 3, 40.0),
            ]),
            tier(2, "Chocolate Egg", 250.0, vec![
                pet("w3_t3_choco", "Chocolate Bear", Legendary, 30.0, 3, 80.0),
                pet("w3_t3_donut", "Donut Lord", Mythical, 60.0, 3, 20.0),
            ]),
        ]),
        (4, vec![
            tier(0, "Data Egg", 1.0, vec![
                pet("w4_common", "Floppy", Common, 8.0, 4, 50.0),
                pet("w4_rare", "Cog", Rare, 15.0, 4, 35.0),
                pet("w4_legendary", "Rocket", Legendary, 35.0, 4, 12.7),
                pet("w4_mythical", "UFO", Mythical, 75.0, 4, 2.0),
                pet("w4_secret", "Cyber Demon", Secret, 150.0, 4, 0.3),
            ]),
            tier(1, "System Egg", 15.0, vec![
                pet("w4_t2_laptop", "Laptop", Rare, 30.0, 4, 60.0),
                pet("w4_t2_phone", "Smartphone", Epic, 50.0, 4, 40.0),
            ]),
            tier(2, "Virus Egg", 250.0, vec![
                pet("w4_t3_robot", "AI Bot", Legendary, 80.0, 4, 80.0),
                pet("w4_t3_skull", "Virus.exe", Mythical, 200.0, 4, 20.0),
            ]),
        ]),
        (5, vec![
            tier(0, "Water Egg", 1.0, vec![
                pet("w5_common", "Fish", Common, 12.0, 5, 55.0),
                pet("w5_rare", "Dolphin", Rare, 25.0, 5, 30.0),
                pet("w5_epic", "Octopus", Epic, 60.0, 5, 13.9),
                pet("w5_mythical", "Whale", Mythical, 150.0, 5, 1.0),
                pet("w5_secret", "Treasure of Atlantis", Secret, 350.0, 5, 0.1),
            ]),
            tier(1, "Abyss Egg", 15.0, vec![
                pet("w5_t2_shark", "Shark", Rare, 80.0, 5, 60.0),
                pet("w5_t2_shell", "Magic Shell", Epic, 120.0, 5, 40.0),
            ]),
            tier(2, "Poseidon Egg", 250.0, vec![
                pet("w5_t3_coral", "Reef Spirit", Legendary, 250.0, 5, 80.0),
                pet("w5_t3_trident", "Trident Keeper", Mythical, 400.0, 5, 20.0),
            ]),
        ]),
        (6, vec![
            tier(0, "Dark Egg", 1.0, vec![
                pet("w6_common", "Shade", Common, 40.0, 6, 60.0),
                pet("w6_rare", "Spider", Rare, 100.0, 6, 30.0),
                pet("w6_epic", "Chaos Skull", Epic, 250.0, 6, 9.45),
                pet("w6_mythical", "Shadow Wolf", Mythical, 500.0, 6, 0.5),
                pet("w6_secret", "Heart of the Void", Secret, 1000.0, 6, 0.05),
            ]),
            tier(1, "Nightmare Egg", 15.0, vec![
                pet("w6_t2_web", "Dream Weaver", Rare, 300.0, 6, 60.0),
                pet("w6_t2_bat", "Vampire", Epic, 600.0, 6, 40.0),
            ]),
            tier(2, "Abyssal Egg", 250.0, vec![
                pet("w6_t3_ghost", "Wraith", Legendary, 1200.0, 6, 80.0),
                pet("w6_t3_orb", "Orb of Darkness", Mythical, 3000.0, 6, 20.0),
            ]),
        ]),
        (7, vec![
            tier(0, "Fire Egg", 1.0, vec![
                pet("w7_common", "Imp", Common, 150.0, 7, 62.0),
                pet("w7_rare", "Ifrit", Rare, 300.0, 7, 28.0),
                pet("w7_epic", "Cerberus", Epic, 600.0, 7, 9.73),
                pet("w7_mythical", "Lord of Hell", Mythical, 1500.0, 7, 0.25),
                pet("w7_secret", "Eternal Flame", Secret, 3000.0, 7, 0.02),
            ]),
            tier(1, "Magma Egg", 15.0, vec![
                pet("w7_t2_bomb", "Living Bomb", Rare, 800.0, 7, 60.0),
                pet("w7_t2_volcano", "Volcano Spirit", Epic, 1500.0, 7, 40.0),
            ]),
            tier(2, "Hell Egg", 250.0, vec![
                pet("w7_t3_dragon", "Inferno Dragon", Legendary, 3500.0, 7, 80.0),
                pet("w7_t3_devil", "Devil Incarnate", Mythical, 8000.0, 7, 20.0),
            ]),
        ]),
        (8, vec![
            tier(0, "Cloud Egg", 1.0, vec![
                pet("w8_common", "Dove", Common, 400.0, 8, 65.0),
                pet("w8_rare", "Cherub", Rare, 800.0, 8, 25.0),
                pet("w8_epic", "Pegasus", Epic, 1500.0, 8, 9.89),
                pet("w8_mythical", "Archangel", Mythical, 4000.0, 8, 0.1),
                pet("w8_secret", "Divine Light", Secret, 8000.0, 8, 0.01),
            ]),
            tier(1, "Light Egg", 15.0, vec![
                pet("w8_t2_star", "Little Star", Rare, 2000.0, 8, 60.0),
                pet("w8_t2_fairy", "Fairy", Epic, 5000.0, 8, 40.0),
            ]),
            tier(2, "Divine Egg", 250.0, vec![
                pet("w8_t3_seraph", "Seraph", Legendary, 10000.0, 8, 80.0),
                pet("w8_t3_god", "Deity", Mythical, 25000.0, 8, 20.0),
            ]),
        ]),
        (9, vec![
            tier(0, "Brass Egg", 1.0, vec![
                pet("w9_common", "Clockwork Beetle", Common, 1000.0, 9, 70.0),
                pet("w9_rare", "Steam Golem", Rare, 2500.0, 9, 20.0),
                pet("w9_epic", "Clockwork Scorpion", Epic, 5000.0, 9, 9.945),
                pet("w9_mythical", "Time Lord", Mythical, 12000.0, 9, 0.05),
                pet("w9_secret", "Infinity Engine", Secret, 25000.0, 9, 0.005),
            ]),
            tier(1, "Geared Egg", 15.0, vec![
                pet("w9_t2_wrench", "Wrench Spirit", Rare, 6000.0, 9, 60.0),
                pet("w9_t2_loco", "Locomotive", Epic, 15000.0, 9, 40.0),
            ]),
            tier(2, "Time Egg", 250.0, vec![
                pet("w9_t3_compass", "Compass of Fate", Legendary, 30000.0, 9, 80.0),
                pet("w9_t3_factory", "Living Factory", Mythical, 75000.0, 9, 20.0),
            ]),
        ]),
        (10, vec![
            tier(0, "Quark Egg", 1.0, vec![
                pet("w10_common", "Quark", Common, 2500.0, 10, 75.0),
                pet("w10_rare", "Antimatter", Rare, 5000.0, 10, 20.0),
                pet("w10_epic", "Event Horizon", Epic, 12000.0, 10, 4.989),
                pet("w10_mythical", "Black Hole", Mythical, 25000.0, 10, 0.01),
                pet("w10_secret", "THE END", Secret, 50000.0, 10, 0.001),
            ]),
            tier(1, "Horizon Egg", 15.0, vec![
                pet("w10_t2_dna", "Universe DNA", Rare, 15000.0, 10, 60.0),
                pet("w10_t2_galaxy", "Galaxy", Epic, 30000.0, 10, 40.0),
            ]),
            tier(2, "Egg of the End", 250.0, vec![
                pet("w10_t3_singularity", "Singularity", Legendary, 60000.0, 10, 80.0),
                pet("w10_t3_star", "Supernova", Mythical, 100000.0, 10, 20.0),
            ]),
        ]),
    ])
}

fn standard_achievements() -> Vec<AchievementDef> {
    let ach = |id, name: &str, description: &str, condition| AchievementDef {
        id,
        name: name.into(),
        description: description.into(),
        condition,
    };
    vec![
        ach(1, "First Click!", "Click for the first time.", AchievementCondition::TotalClicks(1)),
        ach(2, "A Hundred!", "Hold 100 units.", AchievementCondition::Resource(100.0)),
        ach(3, "A Thousand!", "Hold 1,000 units.", AchievementCondition::Resource(1_000.0)),
        ach(4, "Millionaire", "Hold 1,000,000 units.", AchievementCondition::Resource(1_000_000.0)),
        ach(5, "Click Master", "Click 1,000 times.", AchievementCondition::TotalClicks(1_000)),
    ]
}

/// Achievements whose predicate holds for `state`. Display only.
pub fn unlocked_achievements<'a>(
    config: &'a GameConfig,
    state: &ProgressionState,
) -> Vec<&'a AchievementDef> {
    config
        .achievements
        .iter()
        .filter(|a| a.is_unlocked(state))
        .collect()
}
