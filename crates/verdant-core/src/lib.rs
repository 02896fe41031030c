//! Verdant Core - Plant Nursery Simulation Engine
//!
//! A headless real-time simulation of a plant nursery: seeds are bought
//! from a store, planted in a greenhouse grid, watered and fertilized by
//! autonomous workers, and sold to procedurally generated customers.
//! Rendering and input are consumers of this API and live elsewhere.
//!
//! # Architecture
//!
//! - **Plants** are move-only values with exactly one owner at any time:
//!   an inventory slot, a greenhouse plot, or the caller holding a
//!   rejected add.
//! - **Workers** observe the greenhouse and pace their own command queue
//!   on a private executor thread; plant-mutating commands are marshalled
//!   back onto the sim thread through the game's command channel, so all
//!   plant state is touched from one thread only.
//! - **Persistence** is a single-slot memento written through a caretaker
//!   to a line-oriented text file.
//!
//! # Example
//!
//! ```rust,no_run
//! use verdant_core::prelude::*;
//!
//! let mut game = Game::new(GameConfig::default());
//! game.hire_worker(WorkerRole::General, 2);
//! game.purchase(0).ok();
//!
//! // Run simulation
//! loop {
//!     game.advance(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod command;
pub mod customer;
pub mod game;
pub mod greenhouse;
pub mod inventory;
pub mod persistence;
pub mod plant;
pub mod player;
pub mod species;
pub mod store;
pub mod worker;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::customer::{Customer, CustomerFactory};
    pub use crate::game::{Game, GameConfig};
    pub use crate::greenhouse::{Greenhouse, Observer, PlantReport};
    pub use crate::inventory::{Inventory, Slot};
    pub use crate::persistence::{Caretaker, Memento};
    pub use crate::plant::{Plant, PlantId};
    pub use crate::player::Player;
    pub use crate::species::{PlantSpecies, SpeciesBook};
    pub use crate::store::{PurchaseError, SeedListing, Store};
    pub use crate::worker::{Worker, WorkerRole};
    pub use verdant_logic::growth::GrowthCycle;
    pub use verdant_logic::stage::PlantStage;
}
