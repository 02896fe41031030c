//! The player: money, rating, the in-game clock, and the owned
//! containers (inventory, greenhouse, hired workers).

use tracing::{debug, info};

use verdant_logic::clock::SimClock;

use crate::command::Command;
use crate::greenhouse::Greenhouse;
use crate::inventory::Inventory;
use crate::persistence::{
    deserialize_greenhouse, deserialize_inventory, serialize_greenhouse, serialize_inventory,
    Memento,
};
use crate::species::SpeciesBook;
use crate::worker::{WorkerContext, WorkerRole};

/// Aggregate player state. All mutation happens on the sim thread.
pub struct Player {
    money: f32,
    rating: i32,
    clock: SimClock,
    inventory: Inventory,
    greenhouse: Greenhouse,
}

impl Player {
    /// A broke newcomer on day 1 at 06:00 with empty containers.
    pub fn new() -> Self {
        Self {
            money: 0.0,
            rating: 0,
            clock: SimClock::new(),
            inventory: Inventory::new(),
            greenhouse: Greenhouse::new(),
        }
    }

    /// As [`Player::new`], with a custom inventory size.
    pub fn with_inventory_slots(max_slots: usize) -> Self {
        Self {
            inventory: Inventory::with_max_slots(max_slots),
            ..Self::new()
        }
    }

    // ── Money and rating ────────────────────────────────────────────────

    pub fn money(&self) -> f32 {
        self.money
    }

    pub fn set_money(&mut self, amount: f32) {
        self.money = amount.max(0.0);
    }

    pub fn add_money(&mut self, amount: f32) {
        self.money += amount;
    }

    /// Debits money, flooring at zero.
    pub fn subtract_money(&mut self, amount: f32) {
        self.money = (self.money - amount).max(0.0);
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn set_rating(&mut self, rating: i32) {
        self.rating = rating.max(0);
    }

    pub fn add_rating(&mut self, amount: i32) {
        self.rating += amount;
    }

    /// Lowers the rating, flooring at zero.
    pub fn subtract_rating(&mut self, amount: i32) {
        self.rating = (self.rating - amount).max(0);
    }

    // ── Time ────────────────────────────────────────────────────────────

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn day(&self) -> u32 {
        self.clock.day
    }

    pub fn hour(&self) -> u8 {
        self.clock.hour
    }

    pub fn minute(&self) -> u8 {
        self.clock.minute
    }

    /// Sets the clock, clamping each component into range.
    pub fn set_time(&mut self, day: u32, hour: u8, minute: u8) {
        self.clock = SimClock::at(day, hour, minute);
    }

    pub fn advance_time(&mut self, minutes: u32) {
        self.clock.advance_minutes(minutes);
    }

    pub fn is_new_day(&self) -> bool {
        self.clock.is_new_day()
    }

    /// "HH:MM".
    pub fn time_string(&self) -> String {
        self.clock.time_string()
    }

    /// "Day D, HH:MM".
    pub fn full_time_string(&self) -> String {
        self.clock.full_time_string()
    }

    // ── Containers ──────────────────────────────────────────────────────

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn greenhouse(&self) -> &Greenhouse {
        &self.greenhouse
    }

    pub fn greenhouse_mut(&mut self) -> &mut Greenhouse {
        &mut self.greenhouse
    }

    // ── Workers ─────────────────────────────────────────────────────────

    /// Hires a worker and attaches it to the greenhouse.
    pub fn hire_worker(&mut self, role: WorkerRole, level: u8, ctx: &WorkerContext) {
        info!(role = role.name(), level, "worker hired");
        self.greenhouse.attach(Box::new(ctx.spawn(role, level)));
    }

    /// Detaches and stops the worker at the given index.
    pub fn fire_worker(&mut self, index: usize) -> bool {
        // Dropping the detached observer stops its executor thread.
        self.greenhouse.detach(index).is_some()
    }

    pub fn worker_count(&self) -> usize {
        self.greenhouse.observer_count()
    }

    // ── Commands and selling ────────────────────────────────────────────

    /// Applies a marshalled command against the owned containers.
    pub fn apply_command(&mut self, command: Command) -> bool {
        command.apply(&mut self.greenhouse, &mut self.inventory)
    }

    /// Sells one plant of the species (most recently stacked first) and
    /// credits its sell price. `None` when out of stock.
    pub fn sell_plant(&mut self, species: &str) -> Option<f32> {
        let plant = self.inventory.remove_by_type(species)?;
        let price = plant.sell_price();
        self.add_money(price);
        info!(species, price, balance = self.money, "plant sold");
        Some(price)
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    /// Captures the aggregate state as an opaque record.
    pub fn create_memento(&self) -> Memento {
        Memento::new(
            serialize_inventory(&self.inventory),
            serialize_greenhouse(&self.greenhouse),
            self.worker_count().to_string(),
            self.money,
            self.rating,
            self.clock.day,
            self.clock.hour,
            self.clock.minute,
        )
    }

    /// Rebuilds the aggregate state from a snapshot, replacing the
    /// current containers. Workers come back as default hires (general,
    /// level 1); only their count survives a snapshot.
    pub fn restore_memento(&mut self, memento: &Memento, book: &SpeciesBook, ctx: &WorkerContext) {
        self.money = memento.money().max(0.0);
        self.rating = memento.rating().max(0);
        self.clock = SimClock::at(memento.day(), memento.hour(), memento.minute());

        deserialize_inventory(&mut self.inventory, memento.inventory_data(), book);
        deserialize_greenhouse(&mut self.greenhouse, memento.greenhouse_data(), book);

        while self.greenhouse.detach(0).is_some() {}
        let workers = memento.worker_data().parse::<usize>().unwrap_or(0);
        for _ in 0..workers {
            self.hire_worker(WorkerRole::General, 1, ctx);
        }
        debug!(workers, "state restored from snapshot");
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
