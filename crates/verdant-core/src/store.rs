//! The seed store: a priced catalog whose purchases debit money and
//! credit the player's inventory.

use thiserror::Error;
use tracing::info;

use crate::plant::Plant;
use crate::player::Player;
use crate::species::{PlantSpecies, SpeciesBook};

/// Why a purchase failed. Every failure leaves money and inventory
/// untouched.
#[derive(Debug, Error, PartialEq)]
pub enum PurchaseError {
    #[error("no listing at index {index}")]
    UnknownItem { index: usize },
    #[error("insufficient funds: price {price}, available {available}")]
    InsufficientFunds { price: f32, available: f32 },
    #[error("inventory is full")]
    InventoryFull,
    #[error("inventory rejected the plant")]
    AddFailed,
}

/// One purchasable entry: a price and the species it instantiates.
/// Requesting the listing produces a fresh seed-stage plant.
#[derive(Debug, Clone)]
pub struct SeedListing {
    price: f32,
    species: PlantSpecies,
}

impl SeedListing {
    /// Lists a species at its catalog seed price.
    pub fn new(species: PlantSpecies) -> Self {
        Self {
            price: species.seed_price,
            species,
        }
    }

    /// Lists a species at an overridden price.
    pub fn with_price(species: PlantSpecies, price: f32) -> Self {
        Self { price, species }
    }

    pub fn price(&self) -> f32 {
        self.price
    }

    pub fn species(&self) -> &PlantSpecies {
        &self.species
    }

    /// Instantiates the purchased plant.
    pub fn request(&self) -> Plant {
        Plant::from_species(&self.species)
    }
}

/// Ordered list of listings.
#[derive(Debug, Default)]
pub struct Store {
    listings: Vec<SeedListing>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store carrying every species of the book, in catalog order.
    pub fn stocked(book: &SpeciesBook) -> Self {
        Self {
            listings: book.iter().cloned().map(SeedListing::new).collect(),
        }
    }

    pub fn add_listing(&mut self, listing: SeedListing) {
        self.listings.push(listing);
    }

    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }

    pub fn listing(&self, index: usize) -> Option<&SeedListing> {
        self.listings.get(index)
    }

    /// The purchase protocol: bounds check, funds check, capacity
    /// check, instantiate, add, debit. Exclusive access to the player
    /// makes the sequence atomic; a failed add discards the plant and
    /// leaves the player unchanged.
    pub fn purchase(&self, index: usize, player: &mut Player) -> Result<(), PurchaseError> {
        let listing = self
            .listings
            .get(index)
            .ok_or(PurchaseError::UnknownItem { index })?;
        let price = listing.price();

        if player.money() < price {
            return Err(PurchaseError::InsufficientFunds {
                price,
                available: player.money(),
            });
        }
        if player.inventory().is_full() {
            return Err(PurchaseError::InventoryFull);
        }

        let plant = listing.request();
        let species = plant.species().to_string();
        if player.inventory_mut().add(plant).is_err() {
            return Err(PurchaseError::AddFailed);
        }
        player.subtract_money(price);
        info!(%species, price, remaining = player.money(), "seed purchased");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_and_player() -> (Store, Player) {
        let book = SpeciesBook::builtin();
        (Store::stocked(&book), Player::new())
    }

    #[test]
    fn test_purchase_debits_and_credits() {
        let (store, mut player) = store_and_player();
        player.set_money(1000.0);

        // Tomato sits at index 4 of the catalog, price 55.
        store.purchase(4, &mut player).unwrap();
        assert!((player.money() - 945.0).abs() < 1e-4);
        assert_eq!(player.inventory().plant_count("Tomato"), 1);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let (store, mut player) = store_and_player();
        player.set_money(10.0);

        let err = store.purchase(9, &mut player).unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientFunds { .. }));
        assert!((player.money() - 10.0).abs() < 1e-6);
        assert_eq!(player.inventory().total_plants(), 0);
    }

    #[test]
    fn test_unknown_index_is_rejected() {
        let (store, mut player) = store_and_player();
        player.set_money(1000.0);
        assert_eq!(
            store.purchase(99, &mut player),
            Err(PurchaseError::UnknownItem { index: 99 })
        );
    }

    #[test]
    fn test_full_inventory_is_rejected_before_payment() {
        let book = SpeciesBook::builtin();
        let store = Store::stocked(&book);
        let mut player = Player::with_inventory_slots(1);
        player.set_money(10_000.0);

        for _ in 0..64 {
            store.purchase(0, &mut player).unwrap();
        }
        let money_before = player.money();
        assert_eq!(store.purchase(0, &mut player), Err(PurchaseError::InventoryFull));
        assert!((player.money() - money_before).abs() < 1e-4);
    }

    #[test]
    fn test_listing_overridden_price() {
        let book = SpeciesBook::builtin();
        let lettuce = book.get("Lettuce").unwrap().clone();
        let listing = SeedListing::with_price(lettuce, 5.0);
        assert!((listing.price() - 5.0).abs() < 1e-6);
        assert_eq!(listing.request().species(), "Lettuce");
    }
}
