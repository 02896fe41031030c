//! Procedurally generated customers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use verdant_logic::customers::{kind_for_roll, CustomerKind};

use crate::species::SpeciesBook;

/// A visitor asking for one species. Customers never act on their own;
/// the frontend drives fulfillment through the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    kind: CustomerKind,
    requested: String,
}

impl Customer {
    pub fn new(kind: CustomerKind, requested: impl Into<String>) -> Self {
        Self {
            kind,
            requested: requested.into(),
        }
    }

    pub fn kind(&self) -> CustomerKind {
        self.kind
    }

    pub fn requested_species(&self) -> &str {
        &self.requested
    }

    /// Type-equality test used during serve attempts.
    pub fn wants(&self, species: &str) -> bool {
        self.requested == species
    }
}

/// Weighted random customer generation with an owned, seedable RNG.
pub struct CustomerFactory {
    rng: ChaCha8Rng,
}

impl CustomerFactory {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic factory for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws the next customer: kind from the 85/10/5 weighting, the
    /// requested species uniformly from the book. `None` on an empty
    /// book.
    pub fn next(&mut self, book: &SpeciesBook) -> Option<Customer> {
        let species = book.pick(&mut self.rng)?;
        let kind = kind_for_roll(self.rng.gen_range(0..100));
        debug!(kind = kind.name(), species = %species.name, "customer arrived");
        Some(Customer::new(kind, species.name.clone()))
    }
}

impl Default for CustomerFactory {
    fn default() -> Self {
        Self::new()
    }
}
