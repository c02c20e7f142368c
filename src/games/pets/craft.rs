//! Variant crafting: several pets of one species and variant fuse into one
//! pet of the next variant.

use super::config::{ids, GameConfig, RebirthPerk};
use super::error::GameError;
use super::gacha::RandomSource;
use super::state::{InstanceId, OwnedPet, ProgressionState, Variant};

/// One step of the variant ladder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recipe {
    pub from: Variant,
    pub to: Variant,
    pub ingredients: usize,
    pub factor: f64,
}

pub const RECIPES: [Recipe; 3] = [
    Recipe { from: Variant::Normal, to: Variant::Golden, ingredients: 5, factor: 4.5 },
    Recipe { from: Variant::Golden, to: Variant::Rainbow, ingredients: 3, factor: 2.0 },
    Recipe { from: Variant::Rainbow, to: Variant::DarkMatter, ingredients: 5, factor: 4.0 },
];

pub fn recipe_for(target: Variant) -> Option<&'static Recipe> {
    RECIPES.iter().find(|r| r.to == target)
}

/// Rebirth upgrade that unlocks crafting into `target`.
fn unlock_id(target: Variant) -> Option<&'static str> {
    match target {
        Variant::Golden => Some(ids::UNLOCK_GOLDEN),
        Variant::Rainbow => Some(ids::UNLOCK_RAINBOW),
        Variant::DarkMatter => Some(ids::UNLOCK_DARK_MATTER),
        Variant::Normal | Variant::Shiny => None,
    }
}

/// What a craft would consume and produce.
#[derive(Clone, Debug, PartialEq)]
pub struct CraftPlan {
    pub consumed: Vec<InstanceId>,
    /// The product; its id and timestamp are assigned on apply.
    pub product: OwnedPet,
}

/// Plan a craft of `species_id` into `target` without touching state.
///
/// Ingredients are the first unequipped pets in owned order.
pub fn plan(
    state: &ProgressionState,
    species_id: &str,
    target: Variant,
) -> Result<CraftPlan, GameError> {
    let recipe = recipe_for(target)
        .ok_or_else(|| GameError::InvalidTarget(format!("no recipe produces {}", target.name())))?;

    let candidates: Vec<&OwnedPet> = state
        .owned_pets
        .iter()
        .filter(|p| {
            p.species_id == species_id
                && p.variant == recipe.from
                && !state.is_equipped(&p.instance_id)
        })
        .collect();
    if candidates.len() < recipe.ingredients {
        return Err(GameError::InsufficientIngredients {
            needed: recipe.ingredients,
            available: candidates.len(),
        });
    }

    let used = &candidates[..recipe.ingredients];
    let mut product = used[0].clone();
    product.variant = recipe.to;
    product.multiplier = used[0].multiplier * recipe.factor;
    Ok(CraftPlan {
        consumed: used.iter().map(|p| p.instance_id).collect(),
        product,
    })
}

/// Craft one `target` pet from `species_id`, gated by the matching rebirth perk.
pub fn craft(
    config: &GameConfig,
    state: &mut ProgressionState,
    species_id: &str,
    target: Variant,
    rng: &mut dyn RandomSource,
    now_epoch_ms: f64,
) -> Result<InstanceId, GameError> {
    let perk = RebirthPerk::UnlockVariant(target);
    if !config.has_perk(state, |p| *p == perk) {
        if let Some(id) = unlock_id(target) {
            return Err(GameError::FeatureLocked(id));
        }
    }

    let CraftPlan { consumed, mut product } = plan(state, species_id, target)?;
    product.instance_id = rng.next_id();
    product.acquired_at_ms = now_epoch_ms;
    let id = product.instance_id;

    state.owned_pets.retain(|p| !consumed.contains(&p.instance_id));
    state.owned_pets.push(product);
    tracing::debug!(species = species_id, variant = target.name(), "crafted pet");
    Ok(id)
}
