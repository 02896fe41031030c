//! The living plant: species data, lifecycle stage, vitals, growth cycle.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use verdant_logic::constants::DEAD_GROWTH_DECAY;
use verdant_logic::growth::GrowthCycle;
use verdant_logic::stage::{next_stage, PlantStage, Vitals};

use crate::species::PlantSpecies;

/// Process-unique handle for a plant, stable across container moves.
/// Commands target plants by id so executor threads never hold
/// references into the greenhouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlantId(u64);

static NEXT_PLANT_ID: AtomicU64 = AtomicU64::new(1);

impl PlantId {
    fn next() -> Self {
        Self(NEXT_PLANT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for PlantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A plant. Move-only: exactly one container (inventory slot, greenhouse
/// plot, or the caller) owns it at any time.
#[derive(Debug)]
pub struct Plant {
    id: PlantId,
    species: String,
    base_growth_rate: f32,
    sell_price: f32,
    stage: PlantStage,
    vitals: Vitals,
    cycle: GrowthCycle,
}

impl Plant {
    /// A fresh seed of the given species: growth 0, water and nutrients
    /// at the maximum.
    pub fn from_species(species: &PlantSpecies) -> Self {
        Self {
            id: PlantId::next(),
            species: species.name.clone(),
            base_growth_rate: species.base_growth_rate,
            sell_price: species.sell_price,
            stage: PlantStage::Seed,
            vitals: Vitals::fresh(),
            cycle: GrowthCycle::Normal,
        }
    }

    /// Rebuilds a plant mid-life, used when restoring a snapshot.
    pub fn with_state(
        species: impl Into<String>,
        base_growth_rate: f32,
        sell_price: f32,
        stage: PlantStage,
        vitals: Vitals,
    ) -> Self {
        Self {
            id: PlantId::next(),
            species: species.into(),
            base_growth_rate,
            sell_price,
            stage,
            vitals,
            cycle: GrowthCycle::Normal,
        }
    }

    pub fn id(&self) -> PlantId {
        self.id
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn base_growth_rate(&self) -> f32 {
        self.base_growth_rate
    }

    pub fn sell_price(&self) -> f32 {
        self.sell_price
    }

    pub fn stage(&self) -> PlantStage {
        self.stage
    }

    pub fn stage_name(&self) -> &'static str {
        self.stage.name()
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn growth(&self) -> f32 {
        self.vitals.growth()
    }

    /// Growth clamped to 100 for display.
    pub fn growth_percent(&self) -> f32 {
        self.vitals.growth_percent()
    }

    pub fn water_level(&self) -> f32 {
        self.vitals.water()
    }

    pub fn nutrient_level(&self) -> f32 {
        self.vitals.nutrients()
    }

    pub fn is_ripe(&self) -> bool {
        self.stage == PlantStage::Ripe
    }

    pub fn is_dead(&self) -> bool {
        self.stage == PlantStage::Dead
    }

    pub fn growth_cycle(&self) -> GrowthCycle {
        self.cycle
    }

    /// Swaps the growth-rate policy; the old cycle is discarded.
    pub fn set_growth_cycle(&mut self, cycle: GrowthCycle) {
        self.cycle = cycle;
    }

    /// Replaces the lifecycle stage directly. Vitals are untouched;
    /// normal play goes through [`Plant::tick`], this is for restores.
    pub fn set_stage(&mut self, stage: PlantStage) {
        if stage != self.stage {
            debug!(plant = %self.id, species = %self.species, from = self.stage.name(), to = stage.name(), "stage replaced");
            self.stage = stage;
        }
    }

    /// One simulation step: consume resources at the stage rate, then
    /// advance growth (or decay it when dead), then check transitions.
    /// A plant that depletes its last unit of water still receives that
    /// tick's growth before dying.
    pub fn tick(&mut self) {
        let (water_rate, nutrient_rate) = self.stage.consumption();
        self.vitals.consume(water_rate, nutrient_rate, 1.0);

        if self.stage == PlantStage::Dead {
            self.vitals.decay_growth(DEAD_GROWTH_DECAY);
        } else {
            let amount = self.cycle.growth_for(self.base_growth_rate, 1.0);
            self.vitals.apply_growth(amount);
        }

        if let Some(next) = next_stage(self.stage, &self.vitals) {
            debug!(plant = %self.id, species = %self.species, from = self.stage.name(), to = next.name(), "transition");
            self.stage = next;
        }
    }

    /// Adds water, clamped at the maximum. No-op on a dead plant.
    pub fn water(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.vitals.add_water(amount);
    }

    /// Adds nutrients, clamped at the maximum. No-op on a dead plant.
    pub fn fertilize(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.vitals.add_nutrients(amount);
    }
}
