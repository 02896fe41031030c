//! Growth-rate policy attached to each plant.

use serde::{Deserialize, Serialize};

use crate::constants::BOOSTED_GROWTH_MULTIPLIER;

/// How fast a plant converts ticks into growth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthCycle {
    /// Growth at the species' base rate.
    #[default]
    Normal,
    /// Growth at twice the species' base rate.
    Boosted,
}

impl GrowthCycle {
    /// Effective growth rate for a plant with the given base rate.
    pub fn rate(&self, base_rate: f32) -> f32 {
        match self {
            GrowthCycle::Normal => base_rate,
            GrowthCycle::Boosted => base_rate * BOOSTED_GROWTH_MULTIPLIER,
        }
    }

    /// Growth produced over `dt` ticks.
    pub fn growth_for(&self, base_rate: f32, dt: f32) -> f32 {
        self.rate(base_rate) * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_rate_is_base_rate() {
        assert!((GrowthCycle::Normal.rate(1.6) - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_boosted_rate_doubles() {
        assert!((GrowthCycle::Boosted.rate(1.6) - 3.2).abs() < 1e-6);
    }

    #[test]
    fn test_growth_scales_with_dt() {
        assert!((GrowthCycle::Normal.growth_for(1.0, 0.5) - 0.5).abs() < 1e-6);
    }
}
