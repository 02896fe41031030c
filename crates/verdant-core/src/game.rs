//! The game context: one player, one caretaker, one store, one
//! customer stream, and the tick driver that binds them together.
//!
//! Replaces the classic lazily-constructed singleton with an explicit
//! context value. Everything process-wide lives here: the protection
//! flag workers raise on patrol, and the channel their executors
//! dispatch commands through.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{debug, info};

use verdant_logic::clock::speed_multiplier;
use verdant_logic::constants::{REAL_SECONDS_PER_GAME_MINUTE, REAL_SECONDS_PER_PLANT_TICK};

use crate::command::Command;
use crate::customer::{Customer, CustomerFactory};
use crate::persistence::{Caretaker, SaveError};
use crate::player::Player;
use crate::species::SpeciesBook;
use crate::store::{PurchaseError, Store};
use crate::worker::{WorkerContext, WorkerRole};

/// Startup knobs for a game context.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Where the caretaker mirrors its snapshot.
    pub save_path: PathBuf,
    /// Fixed seed for the customer stream; `None` seeds from entropy.
    pub customer_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("game_state.txt"),
            customer_seed: None,
        }
    }
}

/// The aggregate simulation context and tick driver.
pub struct Game {
    player: Player,
    caretaker: Caretaker,
    store: Store,
    species: SpeciesBook,
    customers: CustomerFactory,
    protection: Arc<AtomicBool>,
    dispatch_tx: Sender<Command>,
    dispatch_rx: Receiver<Command>,
    minute_accumulator: f32,
    tick_accumulator: f32,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let species = SpeciesBook::builtin();
        let store = Store::stocked(&species);
        let customers = match config.customer_seed {
            Some(seed) => CustomerFactory::seeded(seed),
            None => CustomerFactory::new(),
        };
        let (dispatch_tx, dispatch_rx) = mpsc::channel();

        Self {
            player: Player::new(),
            caretaker: Caretaker::new(config.save_path),
            store,
            species,
            customers,
            protection: Arc::new(AtomicBool::new(false)),
            dispatch_tx,
            dispatch_rx,
            minute_accumulator: 0.0,
            tick_accumulator: 0.0,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn species(&self) -> &SpeciesBook {
        &self.species
    }

    /// True while a worker patrol has the nursery protected.
    pub fn is_protected(&self) -> bool {
        self.protection.load(Ordering::SeqCst)
    }

    /// Wiring handle for workers: where their commands go and which
    /// flag their patrols raise.
    pub fn worker_context(&self) -> WorkerContext {
        WorkerContext {
            dispatch: self.dispatch_tx.clone(),
            protection: Arc::clone(&self.protection),
        }
    }

    pub fn hire_worker(&mut self, role: WorkerRole, level: u8) {
        let ctx = self.worker_context();
        self.player.hire_worker(role, level, &ctx);
    }

    pub fn fire_worker(&mut self, index: usize) -> bool {
        self.player.fire_worker(index)
    }

    /// Buys the store listing at `index` for this game's player.
    pub fn purchase(&mut self, index: usize) -> Result<(), PurchaseError> {
        self.store.purchase(index, &mut self.player)
    }

    /// Draws the next procedurally generated customer.
    pub fn next_customer(&mut self) -> Option<Customer> {
        self.customers.next(&self.species)
    }

    // ── Tick driver ─────────────────────────────────────────────────────

    /// Converts wall-clock time into game minutes. One real second is
    /// one game minute at 1x speed; nights and patrol protection run at
    /// 10x. Whole minutes are applied in a batch.
    pub fn update_game_time(&mut self, dt: f32) {
        let speed = speed_multiplier(self.player.hour(), self.is_protected());
        self.minute_accumulator += dt * speed;
        if self.minute_accumulator >= REAL_SECONDS_PER_GAME_MINUTE {
            let minutes = (self.minute_accumulator / REAL_SECONDS_PER_GAME_MINUTE) as u32;
            if minutes > 0 {
                self.player.advance_time(minutes);
                self.minute_accumulator -= minutes as f32 * REAL_SECONDS_PER_GAME_MINUTE;
            }
        }
    }

    /// Drains the command channel and applies each command to the
    /// player's plants. Runs on the sim thread; this is the single
    /// place where worker output touches plant state.
    pub fn pump_commands(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.dispatch_rx.try_recv() {
            let name = command.name();
            if self.player.apply_command(command) {
                applied += 1;
            } else {
                debug!(command = name, "target gone, command dropped");
            }
        }
        applied
    }

    /// Ticks every plant and notifies the attached workers.
    pub fn tick_greenhouse(&mut self) {
        self.player.greenhouse_mut().tick_all_plants();
    }

    /// Steady-state frame driver: advances the clock, runs one plant
    /// tick per half second of real time, then applies whatever the
    /// workers dispatched.
    pub fn advance(&mut self, dt: f32) {
        self.update_game_time(dt);
        self.tick_accumulator += dt;
        while self.tick_accumulator >= REAL_SECONDS_PER_PLANT_TICK {
            self.tick_accumulator -= REAL_SECONDS_PER_PLANT_TICK;
            self.tick_greenhouse();
        }
        self.pump_commands();
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Snapshots the player and writes it through the caretaker.
    pub fn save_game(&mut self) -> Result<(), SaveError> {
        let memento = self.player.create_memento();
        self.caretaker.add_memento(memento)
    }

    /// Restores the player from the caretaker's slot, reading the save
    /// file first if the slot is empty. `Ok(false)` when there is
    /// nothing to load.
    pub fn load_game(&mut self) -> Result<bool, SaveError> {
        if self.caretaker.memento().is_none() && !self.caretaker.load_from_file()? {
            return Ok(false);
        }
        let ctx = self.worker_context();
        if let Some(memento) = self.caretaker.memento() {
            self.player.restore_memento(memento, &self.species, &ctx);
            info!("game restored");
            return Ok(true);
        }
        Ok(false)
    }

    /// Clears the snapshot slot and deletes the save file.
    pub fn delete_save(&mut self) -> Result<(), SaveError> {
        self.caretaker.delete_data()
    }
}
