//! Pet game state definitions.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type WorldId = u32;
pub type SpeciesId = String;
pub type UpgradeId = String;
pub type InstanceId = Uuid;

/// The starting world. Always unlocked.
pub const HOME_WORLD: WorldId = 1;

/// Rarity tier of a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythical,
    Secret,
}

impl Rarity {
    /// Whether egg luck scales this rarity's draw weight.
    pub fn is_luck_boosted(&self) -> bool {
        !matches!(self, Rarity::Common)
    }
}

/// Post-acquisition tier of an owned pet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Normal,
    Shiny,
    Golden,
    Rainbow,
    DarkMatter,
}

impl Variant {
    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Variant::Normal => "Normal",
            Variant::Shiny => "Shiny",
            Variant::Golden => "Golden",
            Variant::Rainbow => "Rainbow",
            Variant::DarkMatter => "Dark Matter",
        }
    }
}

/// Immutable template a pet instance is drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub rarity: Rarity,
    pub multiplier: f64,
    pub world: WorldId,
}

/// A pet the player owns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnedPet {
    pub instance_id: InstanceId,
    pub species_id: SpeciesId,
    pub name: String,
    pub rarity: Rarity,
    /// Multiplier with the variant already applied.
    pub multiplier: f64,
    pub world: WorldId,
    /// Older saves have no variant; they load as `Normal`.
    #[serde(default)]
    pub variant: Variant,
    /// Wall-clock acquisition time (ms since Unix epoch).
    #[serde(default)]
    pub acquired_at_ms: f64,
}

/// Per-world economy snapshot, kept for every world except the active one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    pub resource: f64,
    pub upgrade_levels: BTreeMap<UpgradeId, u32>,
    pub rebirth_level: u64,
}

/// Full progression state. Mutated only through `logic` and the hatch commit.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionState {
    /// Spendable balance in the current world's currency.
    pub resource: f64,
    /// Total ever earned. Never decreases except on factory reset.
    pub lifetime_resource: f64,
    /// Manual clicks across all worlds.
    pub total_clicks: u64,
    /// Manual clicks per world (cosmetic progression).
    pub world_click_counts: BTreeMap<WorldId, u64>,
    /// Sparse upgrade levels; absent means level 0.
    pub upgrade_levels: BTreeMap<UpgradeId, u32>,
    /// One-time x2 click multiplier.
    pub double_click_active: bool,

    pub rebirth_level: u64,
    /// Cumulative rebirths performed.
    pub rebirth_count: u64,
    /// Rebirth-shop levels. Survive rebirth; cleared only by factory reset.
    pub rebirth_upgrade_levels: BTreeMap<UpgradeId, u32>,

    pub owned_pets: Vec<OwnedPet>,
    pub equipped: BTreeSet<InstanceId>,
    pub discovered_species: BTreeSet<SpeciesId>,
    pub auto_delete_species: BTreeSet<SpeciesId>,

    pub current_world: WorldId,
    pub unlocked_worlds: BTreeSet<WorldId>,
    pub world_snapshots: BTreeMap<WorldId, WorldSnapshot>,

    pub auto_hatch_enabled: bool,
}

impl ProgressionState {
    pub fn new() -> Self {
        Self {
            resource: 0.0,
            lifetime_resource: 0.0,
            total_clicks: 0,
            world_click_counts: BTreeMap::new(),
            upgrade_levels: BTreeMap::new(),
            double_click_active: false,
            rebirth_level: 0,
            rebirth_count: 0,
            rebirth_upgrade_levels: BTreeMap::new(),
            owned_pets: Vec::new(),
            equipped: BTreeSet::new(),
            discovered_species: BTreeSet::new(),
            auto_delete_species: BTreeSet::new(),
            current_world: HOME_WORLD,
            unlocked_worlds: BTreeSet::from([HOME_WORLD]),
            world_snapshots: BTreeMap::new(),
            auto_hatch_enabled: false,
        }
    }

    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.upgrade_levels.get(id).copied().unwrap_or(0)
    }

    pub fn rebirth_upgrade_level(&self, id: &str) -> u32 {
        self.rebirth_upgrade_levels.get(id).copied().unwrap_or(0)
    }

    /// Whether a one-shot rebirth perk has been bought.
    pub fn has_perk(&self, id: &str) -> bool {
        self.rebirth_upgrade_level(id) > 0
    }

    pub fn pet(&self, id: &InstanceId) -> Option<&OwnedPet> {
        self.owned_pets.iter().find(|p| p.instance_id == *id)
    }

    pub fn is_equipped(&self, id: &InstanceId) -> bool {
        self.equipped.contains(id)
    }

    pub fn equipped_pets(&self) -> impl Iterator<Item = &OwnedPet> {
        self.owned_pets
            .iter()
            .filter(move |p| self.equipped.contains(&p.instance_id))
    }

    pub fn world_clicks(&self, world: WorldId) -> u64 {
        self.world_click_counts.get(&world).copied().unwrap_or(0)
    }

    /// Credit earned resource. Ignores non-positive or NaN amounts.
    pub fn earn(&mut self, amount: f64) {
        if !(amount > 0.0) {
            return;
        }
        self.resource += amount;
        self.lifetime_resource += amount;
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}
