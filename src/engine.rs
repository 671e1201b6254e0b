//! Economy engine
//!
//! Owns the game state and performs every mutation of it: commands from the
//! input layer, passive accrual, autosave and wallet updates. Observers are
//! notified after each change; the engine knows nothing about rendering.

use crate::economy::{
    AccrualMode, ConfigError, EconomyConfig, GameState, View, WalletStatus, accrual,
};
use crate::elapsed_secs;
use crate::format::format_number;
use crate::persistence::{self, LoadOutcome, Store, StoreError};
use crate::platform::{Clock, Schedule, TaskKind};

/// Discrete player command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tap,
    PurchaseUpgrade(String),
    SwitchView(String),
}

impl Command {
    /// Parse a `data-action` / `data-payload` pair from the page markup
    pub fn from_action(action: &str, payload: Option<&str>) -> Option<Self> {
        let payload = payload.filter(|p| !p.is_empty());
        match action {
            "handle-tap" => Some(Command::Tap),
            "purchase-upgrade" => payload.map(|id| Command::PurchaseUpgrade(id.to_string())),
            "switch-view" => payload.map(|id| Command::SwitchView(id.to_string())),
            _ => None,
        }
    }
}

/// Result of a purchase attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PurchaseOutcome {
    /// Bought; `level` is the new level
    Purchased { level: u32, cost: f64 },
    /// Not enough currency; nothing changed
    Unaffordable { cost: f64 },
    /// No such upgrade in this theme; nothing changed
    UnknownUpgrade,
}

/// State-change notification for observers
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A tap credited `amount` (drives the floating "+N" indicator)
    Tapped { amount: f64 },
    Purchased { id: String, level: u32, cost: f64 },
    /// Passive income credited by a tick
    Accrued { amount: f64 },
    ViewChanged(View),
    WalletChanged,
    Saved,
    Reset,
}

type Observer = Box<dyn FnMut(&EngineEvent, &GameState)>;

/// The game economy with its persistence and timers
pub struct Engine {
    config: EconomyConfig,
    state: GameState,
    store: Box<dyn Store>,
    clock: Box<dyn Clock>,
    schedule: Schedule,
    /// Time of the previous passive tick
    last_tick_ms: f64,
    load_outcome: LoadOutcome,
    observers: Vec<Observer>,
}

impl Engine {
    /// Load (or create) the save for `config` and arm the periodic tasks
    pub fn initialize(
        config: EconomyConfig,
        store: impl Store + 'static,
        clock: impl Clock + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut store: Box<dyn Store> = Box::new(store);
        let now = clock.now_ms();
        let (mut state, load_outcome) = persistence::load_state(store.as_mut(), &config, now);
        state.recompute_income(&config);

        let mut schedule = Schedule::new();
        schedule.every(TaskKind::PassiveTick, config.tick_interval_ms as f64, now);
        schedule.every(TaskKind::Autosave, config.save_interval_ms as f64, now);

        log::info!(
            "{} ready: {} {}, {}/h",
            config.name,
            format_number(state.currency),
            config.currency_name,
            format_number(state.currency_per_hour)
        );

        Ok(Self {
            config,
            state,
            store,
            clock: Box::new(clock),
            schedule,
            last_tick_ms: now,
            load_outcome,
            observers: Vec::new(),
        })
    }

    /// Register a state-change observer
    pub fn subscribe(&mut self, observer: impl FnMut(&EngineEvent, &GameState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: EngineEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event, &self.state);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    /// How the save slot was loaded at startup
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Price of the next level of `id`
    pub fn upgrade_cost(&self, id: &str) -> Option<f64> {
        let upgrade = self.config.upgrade(id)?;
        Some(upgrade.cost_at(self.state.level(id), self.config.growth))
    }

    // --- Commands ---

    /// Run one command; returns whether state changed
    pub fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Tap => {
                self.tap();
                true
            }
            Command::PurchaseUpgrade(id) => {
                matches!(self.purchase_upgrade(&id), PurchaseOutcome::Purchased { .. })
            }
            Command::SwitchView(id) => self.switch_view(&id),
        }
    }

    /// Credit one tap; returns the amount credited
    pub fn tap(&mut self) -> f64 {
        let amount = self.state.currency_per_tap;
        self.state.total_taps += 1;
        self.state.credit(amount);
        self.notify(EngineEvent::Tapped { amount });
        amount
    }

    /// Buy the next level of `id` if it exists and is affordable
    pub fn purchase_upgrade(&mut self, id: &str) -> PurchaseOutcome {
        let Some(upgrade) = self.config.upgrade(id) else {
            return PurchaseOutcome::UnknownUpgrade;
        };
        let level = self.state.level(id);
        let cost = upgrade.cost_at(level, self.config.growth);
        if self.state.currency < cost {
            return PurchaseOutcome::Unaffordable { cost };
        }

        // Income earned at the old rate is credited before the rate changes
        self.settle_at(self.clock.now_ms());

        let level = level.saturating_add(1);
        self.state.currency -= cost;
        self.state.upgrades.insert(id.to_string(), level);
        self.state.recompute_income(&self.config);
        log::debug!(
            "Bought {} level {} for {} ({}/h)",
            id,
            level,
            cost,
            self.state.currency_per_hour
        );

        self.notify(EngineEvent::Purchased {
            id: id.to_string(),
            level,
            cost,
        });
        PurchaseOutcome::Purchased { level, cost }
    }

    /// Select a configured view; returns whether it changed
    pub fn switch_view(&mut self, id: &str) -> bool {
        let Some(view) = self.config.view(id).map(|v| v.id) else {
            return false;
        };
        if view == self.state.active_view {
            return false;
        }
        self.state.active_view = view;
        self.notify(EngineEvent::ViewChanged(view));
        true
    }

    /// Store the latest wallet report verbatim
    pub fn set_wallet(&mut self, status: WalletStatus) {
        self.state.wallet = status;
        self.notify(EngineEvent::WalletChanged);
    }

    // --- Timers ---

    /// Credit passive income for one tick at the current time
    pub fn passive_tick(&mut self) {
        let now = self.clock.now_ms();
        self.accrue_at(now);
    }

    /// Credit income owed since the previous tick, for elapsed-time accrual
    fn settle_at(&mut self, now_ms: f64) {
        if self.config.accrual == AccrualMode::Elapsed {
            self.accrue_at(now_ms);
        }
    }

    fn accrue_at(&mut self, now_ms: f64) {
        let secs = match self.config.accrual {
            AccrualMode::FixedStep => self.config.tick_secs(),
            AccrualMode::Elapsed => elapsed_secs(self.last_tick_ms, now_ms),
        };
        self.last_tick_ms = self.last_tick_ms.max(now_ms);

        if self.state.currency_per_hour <= 0.0 {
            return;
        }
        let amount = accrual(self.state.currency_per_hour, secs);
        if amount <= 0.0 {
            return;
        }
        self.state.credit(amount);
        self.notify(EngineEvent::Accrued { amount });
    }

    /// Run every periodic task due by the current time
    pub fn run_due(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.advance(now)
    }

    /// Run every periodic task due at or before `now_ms`, in deadline order
    ///
    /// Returns the number of tasks run.
    pub fn advance(&mut self, now_ms: f64) -> usize {
        let mut ran = 0;
        while let Some((task, due)) = self.schedule.pop_due(now_ms) {
            match task {
                TaskKind::PassiveTick => self.accrue_at(due),
                TaskKind::Autosave => {
                    if let Err(e) = self.save_at(due) {
                        log::error!("Autosave failed: {}", e);
                    }
                }
            }
            ran += 1;
        }
        ran
    }

    /// Next time a periodic task is due
    pub fn next_deadline(&self) -> Option<f64> {
        self.schedule.next_deadline()
    }

    pub fn is_running(&self) -> bool {
        !self.schedule.is_stopped()
    }

    // --- Persistence ---

    /// Write the state to the store now
    pub fn save(&mut self) -> Result<(), StoreError> {
        let now = self.clock.now_ms();
        self.save_at(now)
    }

    fn save_at(&mut self, now_ms: f64) -> Result<(), StoreError> {
        // Offline earnings count from `lastSaved`, so nothing before it may stay unpaid
        self.settle_at(now_ms);
        persistence::save_state(
            self.store.as_mut(),
            &self.config.storage_key,
            &mut self.state,
            now_ms,
        )?;
        log::info!(
            "Game saved ({} {})",
            format_number(self.state.currency),
            self.config.currency_name
        );
        self.notify(EngineEvent::Saved);
        Ok(())
    }

    /// Delete the save and start over; the wallet connection is kept
    pub fn reset(&mut self) -> Result<(), StoreError> {
        let now = self.clock.now_ms();
        let removed = self.store.remove(&self.config.storage_key);

        let wallet = std::mem::take(&mut self.state.wallet);
        self.state = GameState::fresh(&self.config, now);
        self.state.wallet = wallet;
        self.last_tick_ms = now;

        log::info!("Saved game cleared");
        self.notify(EngineEvent::Reset);
        removed
    }

    /// Stop the periodic tasks and flush a final save
    ///
    /// Calling it again does nothing.
    pub fn shutdown(&mut self) -> Result<(), StoreError> {
        if self.schedule.is_stopped() {
            return Ok(());
        }
        self.schedule.stop();
        log::info!("Shutting down {}", self.config.name);
        self.save()
    }
}
