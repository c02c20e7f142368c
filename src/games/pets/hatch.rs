//! Hatch round state machine.
//!
//! A round goes `Idle -> Charging -> Resolving -> AwaitingAcknowledgment`
//! synchronously inside `request`. `acknowledge` runs the single commit and
//! moves to `Cooldown`; the owner later calls `end_cooldown` and
//! `release_commit_lock` from its timers. A new round may start only when
//! the session is `Idle` and the commit lock is released.

use super::config::{ids, GameConfig};
use super::economy::{egg_cost, luck_level};
use super::error::GameError;
use super::gacha::{self, DrawnPet, RandomSource};
use super::state::{InstanceId, OwnedPet, ProgressionState, Rarity, SpeciesId, Variant, WorldId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HatchPhase {
    Idle,
    Charging,
    Resolving,
    AwaitingAcknowledgment,
    Committing,
    Cooldown,
}

/// Who asked for the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HatchOrigin {
    Manual,
    Auto,
}

/// Last used request, replayed by the auto-hatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HatchRequest {
    pub amount: u32,
    pub tier: u32,
}

/// A drawn pet as shown during the reveal.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealedPet {
    pub species_id: SpeciesId,
    pub name: String,
    pub rarity: Rarity,
    pub variant: Variant,
    pub multiplier: f64,
    /// Flagged for auto-delete; discovered but not kept.
    pub discarded: bool,
}

/// Results held between the draw and the commit.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingRound {
    pub world: WorldId,
    pub request: HatchRequest,
    pub origin: HatchOrigin,
    pub cost: f64,
    pub pets: Vec<RevealedPet>,
    drawn: Vec<DrawnPet>,
}

/// What a commit changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommitReport {
    pub added: Vec<InstanceId>,
    pub discarded: usize,
    pub newly_discovered: Vec<SpeciesId>,
}

#[derive(Clone, Debug)]
pub struct HatchSession {
    phase: HatchPhase,
    /// Re-entrancy guard for the commit. Released on a timer, not by the commit itself.
    commit_lock: bool,
    last_request: Option<HatchRequest>,
    pending: Option<PendingRound>,
}

impl HatchSession {
    pub fn new() -> Self {
        Self {
            phase: HatchPhase::Idle,
            commit_lock: false,
            last_request: None,
            pending: None,
        }
    }

    pub fn phase(&self) -> HatchPhase {
        self.phase
    }

    /// Whether a new round may start.
    pub fn is_ready(&self) -> bool {
        self.phase == HatchPhase::Idle && !self.commit_lock
    }

    pub fn last_request(&self) -> Option<HatchRequest> {
        self.last_request
    }

    pub fn set_last_request(&mut self, request: HatchRequest) {
        self.last_request = Some(request);
    }

    pub fn pending(&self) -> Option<&PendingRound> {
        self.pending.as_ref()
    }

    /// Validate, charge and draw one round.
    ///
    /// Capacity and funds rejections from the auto loop also switch
    /// auto-hatch off before returning the error.
    pub fn request(
        &mut self,
        config: &GameConfig,
        state: &mut ProgressionState,
        request: HatchRequest,
        origin: HatchOrigin,
        rng: &mut dyn RandomSource,
    ) -> Result<&PendingRound, GameError> {
        if !self.is_ready() {
            return Err(GameError::AlreadyInProgress);
        }
        if request.amount == 0 {
            return Err(GameError::InvalidTarget("hatch amount must be at least 1".into()));
        }
        if request.amount > 1 && !state.has_perk(ids::UNLOCK_TRIPLE_EGG) {
            return Err(GameError::FeatureLocked(ids::UNLOCK_TRIPLE_EGG));
        }
        let world = state.current_world;
        let egg = config.egg_tier(world, request.tier).map_err(|e| {
            tracing::error!(error = %e, "hatch requested from a missing egg tier");
            GameError::from(e)
        })?;

        // Rejects only once the inventory is already full, so a batch may
        // overshoot the cap by `amount - 1`.
        let owned = state.owned_pets.len();
        if owned >= config.max_inventory {
            if origin == HatchOrigin::Auto {
                state.auto_hatch_enabled = false;
            }
            return Err(GameError::InsufficientCapacity {
                current: owned,
                capacity: config.max_inventory,
            });
        }

        let cost = egg_cost(config, world, request.tier) * request.amount as f64;
        if state.resource < cost {
            if origin == HatchOrigin::Auto {
                state.auto_hatch_enabled = false;
            }
            return Err(GameError::InsufficientFunds {
                needed: cost,
                available: state.resource,
            });
        }

        self.phase = HatchPhase::Charging;
        let before = state.resource;
        state.resource -= cost;

        self.phase = HatchPhase::Resolving;
        let drawn = match gacha::draw(egg, request.amount, luck_level(config, state), rng) {
            Ok(drawn) => drawn,
            Err(e) => {
                state.resource = before;
                self.phase = HatchPhase::Idle;
                return Err(e.into());
            }
        };

        let pets = drawn
            .iter()
            .map(|d| RevealedPet {
                species_id: d.species.id.clone(),
                name: d.species.name.clone(),
                rarity: d.species.rarity,
                variant: d.variant,
                multiplier: d.multiplier,
                discarded: state.auto_delete_species.contains(&d.species.id),
            })
            .collect();

        self.last_request = Some(request);
        self.phase = HatchPhase::AwaitingAcknowledgment;
        tracing::debug!(
            world,
            tier = request.tier,
            amount = request.amount,
            cost,
            ?origin,
            "hatch round drawn"
        );
        let round = self.pending.insert(PendingRound {
            world,
            request,
            origin,
            cost,
            pets,
            drawn,
        });
        Ok(&*round)
    }

    /// Commit the pending round. Returns `None` when there is nothing to
    /// commit or a commit already ran.
    pub fn acknowledge(
        &mut self,
        state: &mut ProgressionState,
        rng: &mut dyn RandomSource,
        now_epoch_ms: f64,
    ) -> Option<CommitReport> {
        if self.phase != HatchPhase::AwaitingAcknowledgment || self.commit_lock {
            return None;
        }
        let round = self.pending.take()?;
        self.commit_lock = true;
        self.phase = HatchPhase::Committing;

        let mut report = CommitReport::default();
        let mut kept = Vec::new();
        for (drawn, shown) in round.drawn.into_iter().zip(&round.pets) {
            if state.discovered_species.insert(drawn.species.id.clone()) {
                report.newly_discovered.push(drawn.species.id.clone());
            }
            if shown.discarded {
                report.discarded += 1;
                continue;
            }
            let id = rng.next_id();
            report.added.push(id);
            kept.push(OwnedPet {
                instance_id: id,
                species_id: drawn.species.id,
                name: drawn.species.name,
                rarity: drawn.species.rarity,
                multiplier: drawn.multiplier,
                world: drawn.species.world,
                variant: drawn.variant,
                acquired_at_ms: now_epoch_ms,
            });
        }
        state.owned_pets.extend(kept);

        self.phase = HatchPhase::Cooldown;
        tracing::debug!(
            added = report.added.len(),
            discarded = report.discarded,
            "hatch round committed"
        );
        Some(report)
    }

    pub fn end_cooldown(&mut self) {
        if self.phase == HatchPhase::Cooldown {
            self.phase = HatchPhase::Idle;
        }
    }

    pub fn release_commit_lock(&mut self) {
        self.commit_lock = false;
    }

    /// Drop any round in flight without committing it.
    pub fn abort(&mut self) {
        self.phase = HatchPhase::Idle;
        self.commit_lock = false;
        self.pending = None;
    }
}

impl Default for HatchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Always draws the first entry, never shiny; ids count up.
    struct Counting(u128);

    impl RandomSource for Counting {
        fn next_unit(&mut self) -> f64 {
            0.01
        }

        fn next_id(&mut self) -> InstanceId {
            self.0 += 1;
            Uuid::from_u128(self.0)
        }
    }

    fn low_draws() -> Counting {
        Counting(0)
    }

    fn rich_state() -> ProgressionState {
        let mut state = ProgressionState::new();
        state.resource = 1e9;
        state.rebirth_upgrade_levels.insert(ids::UNLOCK_TRIPLE_EGG.into(), 1);
        state
    }

    fn single() -> HatchRequest {
        HatchRequest { amount: 1, tier: 0 }
    }

    fn triple() -> HatchRequest {
        HatchRequest { amount: 3, tier: 0 }
    }

    fn fill_inventory(state: &mut ProgressionState, n: usize) {
        for i in 0..n {
            state.owned_pets.push(OwnedPet {
                instance_id: Uuid::from_u128(10_000 + i as u128),
                species_id: "w1_chicken".into(),
                name: "Chicken".into(),
                rarity: Rarity::Common,
                multiplier: 1.05,
                world: 1,
                variant: Variant::Normal,
                acquired_at_ms: 0.0,
            });
        }
    }

    #[test]
    fn request_charges_and_awaits_ack() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        let mut session = HatchSession::new();
        let round = session
            .request(&config, &mut state, single(), HatchOrigin::Manual, &mut low_draws())
            .unwrap();
        assert_eq!(round.pets.len(), 1);
        assert_eq!(round.cost, 20_000.0);
        assert_eq!(session.phase(), HatchPhase::AwaitingAcknowledgment);
        assert!((state.resource - (1e9 - 20_000.0)).abs() < 1e-6);
        assert!(state.owned_pets.is_empty(), "nothing owned before commit");
    }

    #[test]
    fn double_ack_commits_once() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        let mut session = HatchSession::new();
        let mut rng = low_draws();
        session.request(&config, &mut state, triple(), HatchOrigin::Manual, &mut rng).unwrap();
        let first = session.acknowledge(&mut state, &mut rng, 1.0);
        let second = session.acknowledge(&mut state, &mut rng, 2.0);
        assert_eq!(first.unwrap().added.len(), 3);
        assert!(second.is_none());
        assert_eq!(state.owned_pets.len(), 3);
        assert_eq!(session.phase(), HatchPhase::Cooldown);
        // the lock outlives the cooldown until released
        session.end_cooldown();
        assert!(!session.is_ready());
    }

    #[test]
    fn session_busy_until_cooldown_and_lock_end() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        let mut session = HatchSession::new();
        let mut rng = low_draws();
        session.request(&config, &mut state, single(), HatchOrigin::Manual, &mut rng).unwrap();
        assert_eq!(
            session
                .request(&config, &mut state, single(), HatchOrigin::Manual, &mut rng)
                .unwrap_err(),
            GameError::AlreadyInProgress
        );
        session.acknowledge(&mut state, &mut rng, 0.0);
        session.end_cooldown();
        assert!(!session.is_ready(), "lock still held");
        session.release_commit_lock();
        assert!(session.is_ready());
    }

    #[test]
    fn full_inventory_rejected() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        fill_inventory(&mut state, 60);
        let mut session = HatchSession::new();
        let err = session
            .request(&config, &mut state, single(), HatchOrigin::Manual, &mut low_draws())
            .unwrap_err();
        assert_eq!(err, GameError::InsufficientCapacity { current: 60, capacity: 60 });
        assert_eq!(state.resource, 1e9, "nothing charged");
    }

    #[test]
    fn batch_near_cap_may_overshoot() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        fill_inventory(&mut state, 59);
        let mut session = HatchSession::new();
        let mut rng = low_draws();
        session.request(&config, &mut state, triple(), HatchOrigin::Manual, &mut rng).unwrap();
        session.acknowledge(&mut state, &mut rng, 0.0);
        assert_eq!(state.owned_pets.len(), 62);
        assert!(state.owned_pets.len() <= config.max_inventory + 3 - 1);
    }

    #[test]
    fn auto_rejection_disables_auto_hatch() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.auto_hatch_enabled = true;
        let mut session = HatchSession::new();
        let err = session
            .request(&config, &mut state, single(), HatchOrigin::Auto, &mut low_draws())
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert!(!state.auto_hatch_enabled);
    }

    #[test]
    fn manual_rejection_leaves_auto_flag() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.auto_hatch_enabled = true;
        let mut session = HatchSession::new();
        let _ =
            session.request(&config, &mut state, single(), HatchOrigin::Manual, &mut low_draws());
        assert!(state.auto_hatch_enabled);
    }

    #[test]
    fn multi_egg_needs_perk() {
        let config = GameConfig::standard();
        let mut state = ProgressionState::new();
        state.resource = 1e9;
        let mut session = HatchSession::new();
        let err = session
            .request(&config, &mut state, triple(), HatchOrigin::Manual, &mut low_draws())
            .unwrap_err();
        assert_eq!(err, GameError::FeatureLocked(ids::UNLOCK_TRIPLE_EGG));
    }

    #[test]
    fn auto_deleted_species_discovered_not_kept() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        state.auto_delete_species.insert("w1_chicken".into());
        let mut session = HatchSession::new();
        let mut rng = low_draws();
        let round = session
            .request(&config, &mut state, single(), HatchOrigin::Manual, &mut rng)
            .unwrap();
        assert!(round.pets[0].discarded);
        let report = session.acknowledge(&mut state, &mut rng, 0.0).unwrap();
        assert_eq!(report.discarded, 1);
        assert!(state.owned_pets.is_empty());
        assert!(state.discovered_species.contains("w1_chicken"));
    }

    #[test]
    fn unknown_tier_is_config_error() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        let mut session = HatchSession::new();
        let request = HatchRequest { amount: 1, tier: 7 };
        let err = session
            .request(&config, &mut state, request, HatchOrigin::Manual, &mut low_draws())
            .unwrap_err();
        assert_eq!(err.kind(), crate::games::pets::error::ErrorKind::ConfigurationError);
        assert!(session.is_ready());
    }

    #[test]
    fn broken_pool_refunds_charge() {
        let mut config = GameConfig::standard();
        for entry in &mut config.eggs.get_mut(&1).unwrap()[0].pool {
            entry.weight = 0.0;
        }
        let mut state = rich_state();
        let mut session = HatchSession::new();
        let err = session
            .request(&config, &mut state, single(), HatchOrigin::Manual, &mut low_draws())
            .unwrap_err();
        assert!(matches!(err, GameError::Configuration(_)));
        assert_eq!(state.resource, 1e9);
        assert!(session.is_ready());
    }

    #[test]
    fn abort_drops_pending_round() {
        let config = GameConfig::standard();
        let mut state = rich_state();
        let mut session = HatchSession::new();
        let mut rng = low_draws();
        session.request(&config, &mut state, single(), HatchOrigin::Manual, &mut rng).unwrap();
        session.abort();
        assert!(session.is_ready());
        assert!(session.acknowledge(&mut state, &mut rng, 0.0).is_none());
        assert!(state.owned_pets.is_empty());
    }
}
