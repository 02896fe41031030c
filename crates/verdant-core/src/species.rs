//! Plant species catalog.
//!
//! Species are data, not types: a name plus the growth and pricing
//! numbers everything else derives from. The built-in catalog ships as
//! an embedded JSON file so frontends and the headless harness see the
//! same ten species.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Immutable description of one plant species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSpecies {
    pub name: String,
    /// Growth applied per tick before the growth-cycle multiplier.
    pub base_growth_rate: f32,
    pub sell_price: f32,
    pub seed_price: f32,
}

/// The catalog the built-in species book is parsed from.
const BUILTIN_CATALOG: &str = include_str!("../../../data/species.json");

/// Ordered collection of known species.
#[derive(Debug, Clone, Default)]
pub struct SpeciesBook {
    species: Vec<PlantSpecies>,
}

impl SpeciesBook {
    /// Parses a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let species = serde_json::from_str(json)?;
        Ok(Self { species })
    }

    /// The embedded ten-species catalog.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CATALOG).expect("embedded species catalog is valid JSON")
    }

    /// Looks a species up by name.
    pub fn get(&self, name: &str) -> Option<&PlantSpecies> {
        self.species.iter().find(|s| s.name == name)
    }

    /// Uniform random pick, used by the customer factory.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<&PlantSpecies> {
        if self.species.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.species.len());
        self.species.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantSpecies> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
