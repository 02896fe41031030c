//! Plant lifecycle stages, vitals, and the transition rules between them.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Lifecycle phase of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantStage {
    Seed,
    Growing,
    Ripe,
    Dead,
}

impl PlantStage {
    /// Stable name used in persistence tokens and UI labels.
    pub fn name(&self) -> &'static str {
        match self {
            PlantStage::Seed => "Seed",
            PlantStage::Growing => "Growing",
            PlantStage::Ripe => "Ripe",
            PlantStage::Dead => "Dead",
        }
    }

    /// Inverse of [`PlantStage::name`]; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Seed" => Some(PlantStage::Seed),
            "Growing" => Some(PlantStage::Growing),
            "Ripe" => Some(PlantStage::Ripe),
            "Dead" => Some(PlantStage::Dead),
            _ => None,
        }
    }

    /// Water and nutrient consumption per tick in this stage.
    pub fn consumption(&self) -> (f32, f32) {
        match self {
            PlantStage::Seed => (
                WATER_BASE_RATE * SEED_RATE_SCALER,
                NUTRIENT_BASE_RATE * SEED_RATE_SCALER,
            ),
            PlantStage::Growing => (WATER_BASE_RATE, NUTRIENT_BASE_RATE),
            PlantStage::Ripe => (
                WATER_BASE_RATE * RIPE_RATE_SCALER,
                NUTRIENT_BASE_RATE * RIPE_RATE_SCALER,
            ),
            PlantStage::Dead => (0.0, 0.0),
        }
    }
}

/// Mutable metrics of a living plant.
///
/// Water and nutrients are clamped to `[0, VITAL_MAX]` on every mutation;
/// growth is unbounded in storage and only ever increases outside the
/// Dead stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    growth: f32,
    water: f32,
    nutrients: f32,
}

impl Vitals {
    /// Vitals of a freshly planted seed.
    pub fn fresh() -> Self {
        Self {
            growth: 0.0,
            water: VITAL_MAX,
            nutrients: VITAL_MAX,
        }
    }

    /// Builds vitals from raw values, clamping each into its valid range.
    pub fn new(growth: f32, water: f32, nutrients: f32) -> Self {
        Self {
            growth: growth.max(0.0),
            water: water.clamp(0.0, VITAL_MAX),
            nutrients: nutrients.clamp(0.0, VITAL_MAX),
        }
    }

    pub fn growth(&self) -> f32 {
        self.growth
    }

    /// Growth clamped to 100 for display.
    pub fn growth_percent(&self) -> f32 {
        self.growth.min(100.0)
    }

    pub fn water(&self) -> f32 {
        self.water
    }

    pub fn nutrients(&self) -> f32 {
        self.nutrients
    }

    /// Consumes resources at the given per-tick rates, scaled by `dt` ticks.
    pub fn consume(&mut self, water_rate: f32, nutrient_rate: f32, dt: f32) {
        self.water = (self.water - water_rate * dt).clamp(0.0, VITAL_MAX);
        self.nutrients = (self.nutrients - nutrient_rate * dt).clamp(0.0, VITAL_MAX);
    }

    pub fn add_water(&mut self, amount: f32) {
        self.water = (self.water + amount).clamp(0.0, VITAL_MAX);
    }

    pub fn add_nutrients(&mut self, amount: f32) {
        self.nutrients = (self.nutrients + amount).clamp(0.0, VITAL_MAX);
    }

    /// Applies a growth increment. Negative amounts are ignored.
    pub fn apply_growth(&mut self, amount: f32) {
        self.growth += amount.max(0.0);
    }

    /// Visual decay once a plant is dead; growth drifts toward zero.
    pub fn decay_growth(&mut self, amount: f32) {
        self.growth = (self.growth - amount).max(0.0);
    }
}

/// Transition rule applied after a tick's consumption and growth.
///
/// Checks, in order: death by depletion, then the stage-specific exit.
/// Returns the next stage, or `None` when the plant stays where it is.
/// Dead is terminal.
pub fn next_stage(stage: PlantStage, vitals: &Vitals) -> Option<PlantStage> {
    if stage == PlantStage::Dead {
        return None;
    }
    if vitals.water() <= 0.0 || vitals.nutrients() <= 0.0 {
        return Some(PlantStage::Dead);
    }
    match stage {
        PlantStage::Seed if vitals.growth() >= SEED_TO_GROWING_THRESHOLD => {
            Some(PlantStage::Growing)
        }
        PlantStage::Growing if vitals.growth() >= GROWING_TO_RIPE_THRESHOLD => {
            Some(PlantStage::Ripe)
        }
        PlantStage::Ripe if vitals.growth() > OVERRIPE_THRESHOLD => Some(PlantStage::Dead),
        _ => None,
    }
}
