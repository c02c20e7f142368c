//! Pet Hatchery: click for currency, hatch eggs, collect pets, rebirth.

pub mod config;
pub mod craft;
pub mod economy;
pub mod error;
pub mod format;
pub mod gacha;
pub mod hatch;
pub mod logic;
pub mod rate_limit;
pub mod save;
pub mod scheduler;
pub mod state;

#[cfg(test)]
mod simulator;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::games::Game;
use crate::time::GameClock;

use config::{ids, AchievementDef, EngineSettings, GameConfig};
use economy::ClickValue;
use error::{ConfigError, ErrorKind, GameError, SaveError};
use hatch::{CommitReport, HatchOrigin, HatchPhase, HatchRequest, HatchSession, RevealedPet};
use rate_limit::ClickRateLimiter;
use scheduler::{Scheduler, TaskHandle};
use state::{InstanceId, ProgressionState, Variant, WorldId};

/// Timer work owned by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerTask {
    AutoHatchRetry,
    ReleaseCommitLock,
    EndCooldown,
    /// Close the reveal and commit if nobody acknowledged it.
    AutoClaim,
    Autosave,
}

/// Why the auto-hatch loop switched itself off.
#[derive(Clone, Debug, PartialEq)]
pub enum AutoHatchStop {
    InventoryFull,
    OutOfFunds,
    NoPreviousHatch,
    Failed(ErrorKind),
}

/// Notifications for the host, drained with `take_events`.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    HatchRevealed {
        origin: HatchOrigin,
        cost: f64,
        pets: Vec<RevealedPet>,
    },
    HatchCommitted(CommitReport),
    AutoHatchStopped(AutoHatchStop),
    /// A save blob for the host to persist.
    Autosave(String),
}

pub struct PetGame {
    config: GameConfig,
    settings: EngineSettings,
    state: ProgressionState,
    session: HatchSession,
    scheduler: Scheduler<TimerTask>,
    retry_task: Option<TaskHandle>,
    claim_task: Option<TaskHandle>,
    lock_task: Option<TaskHandle>,
    cooldown_task: Option<TaskHandle>,
    limiter: ClickRateLimiter,
    clock: GameClock,
    /// Engine time (ms). Advanced by `tick`, set to each task's due time while it runs.
    now_ms: f64,
    /// Wall-clock time at engine time zero, for acquisition timestamps.
    epoch_ms: f64,
    rng: ChaCha8Rng,
    events: Vec<GameEvent>,
}

impl PetGame {
    pub fn new(
        config: GameConfig,
        settings: EngineSettings,
        seed: u64,
        epoch_ms: f64,
    ) -> Result<Self, ConfigError> {
        Self::with_state(config, settings, ProgressionState::new(), seed, epoch_ms)
    }

    /// Restore a game from a save blob.
    pub fn from_save(
        blob: &str,
        config: GameConfig,
        settings: EngineSettings,
        seed: u64,
        epoch_ms: f64,
    ) -> Result<Self, GameLoadError> {
        let state = save::from_blob(blob)?;
        Ok(Self::with_state(config, settings, state, seed, epoch_ms)?)
    }

    fn with_state(
        config: GameConfig,
        settings: EngineSettings,
        mut state: ProgressionState,
        seed: u64,
        epoch_ms: f64,
    ) -> Result<Self, ConfigError> {
        config.validate().map_err(log_config_error)?;
        settings.validate().map_err(log_config_error)?;

        // The replayed hatch request is not persisted.
        if state.auto_hatch_enabled {
            tracing::debug!("auto-hatch was on in the save; starting with it off");
            state.auto_hatch_enabled = false;
        }

        let limiter =
            ClickRateLimiter::new(settings.click_window_ms, settings.max_clicks_per_window);
        let mut scheduler = Scheduler::new();
        scheduler.schedule(settings.autosave_interval_ms as f64, TimerTask::Autosave);
        Ok(Self {
            config,
            settings,
            state,
            session: HatchSession::new(),
            scheduler,
            retry_task: None,
            claim_task: None,
            lock_task: None,
            cooldown_task: None,
            limiter,
            clock: GameClock::new(),
            now_ms: 0.0,
            epoch_ms,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        })
    }

    /// Browser entry point: restore from localStorage or start fresh.
    #[cfg(target_arch = "wasm32")]
    pub fn load_or_new() -> Result<Self, ConfigError> {
        let epoch_ms = js_sys::Date::now();
        let state = save::load_game().unwrap_or_default();
        Self::with_state(
            GameConfig::standard(),
            EngineSettings::default(),
            state,
            epoch_ms.to_bits(),
            epoch_ms,
        )
    }

    /// Write the current state to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn persist(&self) {
        match save::to_blob(&self.state) {
            Ok(blob) => save::save_game(&blob),
            Err(e) => tracing::warn!(error = %e, "save failed"),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn hatch_phase(&self) -> HatchPhase {
        self.session.phase()
    }

    /// The round waiting for acknowledgment, if any.
    pub fn pending_hatch(&self) -> Option<&hatch::PendingRound> {
        self.session.pending()
    }

    /// Click value without random bonuses.
    pub fn click_preview(&self) -> f64 {
        economy::click_value(&self.config, &self.state, None).amount
    }

    pub fn auto_rate(&self) -> f64 {
        economy::auto_rate(&self.config, &self.state)
    }

    pub fn pet_slots(&self) -> usize {
        economy::pet_slots(&self.config, &self.state)
    }

    pub fn achievements(&self) -> Vec<&AchievementDef> {
        config::unlocked_achievements(&self.config, &self.state)
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Drain pending notifications.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Operations ──────────────────────────────────────────────

    /// Advance to `now_ms` like `tick`, then click at that time.
    pub fn click(&mut self, now_ms: f64) -> Result<ClickValue, GameError> {
        self.tick(now_ms);
        if !self.limiter.try_acquire(self.now_ms) {
            return Err(GameError::RateLimited);
        }
        Ok(logic::click(&self.config, &mut self.state, &mut self.rng))
    }

    pub fn buy_upgrade(&mut self, id: &str) -> Result<u32, GameError> {
        logic::buy_upgrade(&self.config, &mut self.state, id)
    }

    pub fn buy_rebirth_upgrade(&mut self, id: &str) -> Result<u32, GameError> {
        logic::buy_rebirth_upgrade(&self.config, &mut self.state, id)
    }

    pub fn switch_world(&mut self, target: WorldId) -> Result<bool, GameError> {
        let switched = logic::switch_world(&mut self.state, target)?;
        if switched {
            self.stop_auto_hatch();
        }
        Ok(switched)
    }

    pub fn buy_world(&mut self, target: WorldId) -> Result<(), GameError> {
        logic::buy_world(&self.config, &mut self.state, target)
    }

    pub fn do_rebirth(&mut self, amount: u64) -> Result<(), GameError> {
        logic::do_rebirth(&mut self.state, amount)?;
        self.stop_auto_hatch();
        Ok(())
    }

    /// Start a manual hatch round. The reveal closes by itself after the
    /// reveal duration unless `acknowledge_hatch` comes first.
    pub fn start_hatch(&mut self, amount: u32, tier: u32) -> Result<(), GameError> {
        self.begin_round(HatchRequest { amount, tier }, HatchOrigin::Manual)
    }

    /// Close the reveal and commit. Returns `None` if nothing was committed.
    pub fn acknowledge_hatch(&mut self) -> Option<CommitReport> {
        if let Some(handle) = self.claim_task.take() {
            self.scheduler.cancel(handle);
        }
        self.commit_round()
    }

    /// Turn the auto-hatch loop on or off. Returns the new flag. The first
    /// round starts after the auto-hatch delay.
    pub fn toggle_auto_hatch(&mut self, tier: u32) -> Result<bool, GameError> {
        if self.state.auto_hatch_enabled {
            self.stop_auto_hatch();
            tracing::info!("auto-hatch off");
            return Ok(false);
        }
        if !self.state.has_perk(ids::UNLOCK_AUTO_HATCH) {
            return Err(GameError::FeatureLocked(ids::UNLOCK_AUTO_HATCH));
        }
        self.config
            .egg_tier(self.state.current_world, tier)
            .map_err(log_config_error)?;

        let amount = if self.state.has_perk(ids::UNLOCK_TRIPLE_EGG) { 3 } else { 1 };
        self.session.set_last_request(HatchRequest { amount, tier });
        self.state.auto_hatch_enabled = true;
        tracing::info!(tier, amount, "auto-hatch on");
        self.schedule_retry();
        Ok(true)
    }

    pub fn equip(&mut self, id: InstanceId) -> Result<bool, GameError> {
        logic::equip(&self.config, &mut self.state, id)
    }

    pub fn unequip(&mut self, id: InstanceId) -> Result<bool, GameError> {
        logic::unequip(&mut self.state, id)
    }

    pub fn equip_best(&mut self) -> usize {
        logic::equip_best(&self.config, &mut self.state)
    }

    pub fn delete_pet(&mut self, id: InstanceId) -> Result<(), GameError> {
        logic::delete_pet(&mut self.state, id)
    }

    pub fn toggle_auto_delete(&mut self, species_id: &str) -> Result<bool, GameError> {
        logic::toggle_auto_delete(&self.config, &mut self.state, species_id)
    }

    pub fn craft(&mut self, species_id: &str, target: Variant) -> Result<InstanceId, GameError> {
        let now = self.wall_clock_ms();
        craft::craft(&self.config, &mut self.state, species_id, target, &mut self.rng, now)
    }

    /// Factory reset. Any round in flight is dropped uncommitted. In the
    /// browser the stored save is removed as well.
    pub fn reset_all(&mut self) {
        self.stop_auto_hatch();
        for handle in [self.claim_task.take(), self.lock_task.take(), self.cooldown_task.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
        self.session.abort();
        self.limiter.reset();
        logic::reset_all(&mut self.state);
        #[cfg(target_arch = "wasm32")]
        save::delete_save();
    }

    // ── Hatch loop ──────────────────────────────────────────────

    fn wall_clock_ms(&self) -> f64 {
        self.epoch_ms + self.now_ms
    }

    fn begin_round(&mut self, request: HatchRequest, origin: HatchOrigin) -> Result<(), GameError> {
        let round = self
            .session
            .request(&self.config, &mut self.state, request, origin, &mut self.rng)?;
        let event = GameEvent::HatchRevealed {
            origin,
            cost: round.cost,
            pets: round.pets.clone(),
        };
        self.events.push(event);

        let fast = self.state.has_perk(ids::HATCH_SPEED);
        let due = self.now_ms + self.settings.reveal_duration_ms(fast);
        self.claim_task = Some(self.scheduler.schedule(due, TimerTask::AutoClaim));
        Ok(())
    }

    fn commit_round(&mut self) -> Option<CommitReport> {
        let now = self.wall_clock_ms();
        let report = self.session.acknowledge(&mut self.state, &mut self.rng, now)?;
        let lock_due = self.now_ms + self.settings.commit_lock_release_ms as f64;
        let cooldown_due = self.now_ms + self.settings.hatch_cooldown_ms as f64;
        self.lock_task = Some(self.scheduler.schedule(lock_due, TimerTask::ReleaseCommitLock));
        self.cooldown_task = Some(self.scheduler.schedule(cooldown_due, TimerTask::EndCooldown));
        self.events.push(GameEvent::HatchCommitted(report.clone()));
        Some(report)
    }

    fn schedule_retry(&mut self) {
        if self.retry_task.is_some() {
            return;
        }
        let due = self.now_ms + self.settings.auto_hatch_delay_ms as f64;
        self.retry_task = Some(self.scheduler.schedule(due, TimerTask::AutoHatchRetry));
    }

    /// Switch auto-hatch off and drop its pending retry. A round already
    /// in flight still commits.
    fn stop_auto_hatch(&mut self) {
        self.state.auto_hatch_enabled = false;
        if let Some(handle) = self.retry_task.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn halt_auto_hatch(&mut self, reason: AutoHatchStop) {
        self.stop_auto_hatch();
        tracing::warn!(?reason, "auto-hatch stopped");
        self.events.push(GameEvent::AutoHatchStopped(reason));
    }

    fn run_auto_round(&mut self) {
        if !self.state.auto_hatch_enabled {
            return;
        }
        if !self.session.is_ready() {
            self.schedule_retry();
            return;
        }
        let Some(request) = self.session.last_request() else {
            self.halt_auto_hatch(AutoHatchStop::NoPreviousHatch);
            return;
        };
        match self.begin_round(request, HatchOrigin::Auto) {
            Ok(()) => {}
            Err(GameError::AlreadyInProgress) => self.schedule_retry(),
            Err(GameError::InsufficientCapacity { .. }) => {
                self.halt_auto_hatch(AutoHatchStop::InventoryFull)
            }
            Err(GameError::InsufficientFunds { .. }) => {
                self.halt_auto_hatch(AutoHatchStop::OutOfFunds)
            }
            Err(e) => self.halt_auto_hatch(AutoHatchStop::Failed(e.kind())),
        }
    }

    fn run_task(&mut self, handle: TaskHandle, task: TimerTask) {
        match task {
            TimerTask::AutoHatchRetry => {
                if self.retry_task == Some(handle) {
                    self.retry_task = None;
                }
                self.run_auto_round();
            }
            TimerTask::ReleaseCommitLock => {
                self.lock_task = None;
                self.session.release_commit_lock();
                if self.state.auto_hatch_enabled {
                    self.schedule_retry();
                }
            }
            TimerTask::EndCooldown => {
                self.cooldown_task = None;
                self.session.end_cooldown();
                if self.state.auto_hatch_enabled {
                    self.schedule_retry();
                }
            }
            TimerTask::AutoClaim => {
                self.claim_task = None;
                self.commit_round();
            }
            TimerTask::Autosave => {
                match save::to_blob(&self.state) {
                    Ok(blob) => self.events.push(GameEvent::Autosave(blob)),
                    Err(e) => tracing::warn!(error = %e, "autosave failed"),
                }
                let due = self.now_ms + self.settings.autosave_interval_ms as f64;
                self.scheduler.schedule(due, TimerTask::Autosave);
            }
        }
    }
}

impl Game for PetGame {
    /// Credit auto accrual for the elapsed time, then run every timer that
    /// fell due, in order, each at its own due time.
    fn tick(&mut self, now_ms: f64) {
        let seconds = self.clock.update(now_ms);
        logic::accrue(&self.config, &mut self.state, seconds);

        let target = self.clock.total_ms;
        while let Some(due) = self.scheduler.next_due() {
            if due > target {
                break;
            }
            let Some((handle, task)) = self.scheduler.pop_due(target) else {
                break;
            };
            self.now_ms = self.now_ms.max(due);
            self.run_task(handle, task);
        }
        self.now_ms = target;
    }

    fn save_blob(&self) -> Result<String, SaveError> {
        save::to_blob(&self.state)
    }
}

/// Failure to restore a game from a save blob.
#[derive(Debug, thiserror::Error)]
pub enum GameLoadError {
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn log_config_error(e: ConfigError) -> ConfigError {
    tracing::error!(error = %e, "configuration rejected");
    e
}
