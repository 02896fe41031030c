//! Units of work produced by workers and applied on the sim thread.

use tracing::debug;

use verdant_logic::constants::{FERTILIZER_PER_COMMAND, WATER_PER_COMMAND};
use verdant_logic::customers::CustomerKind;

use crate::greenhouse::Greenhouse;
use crate::inventory::Inventory;
use crate::plant::PlantId;

/// A tagged unit of work. Plant-targeting variants carry an id, never a
/// reference, so commands can cross thread boundaries freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add 50 water to the target plant.
    Water(PlantId),
    /// Add 50 nutrients to the target plant.
    Fertilize(PlantId),
    /// Move the target plant from its plot into the bound inventory.
    Harvest(PlantId),
    /// Raise the nursery-wide protection flag; carries no target.
    Patrol,
    /// Reserved for customer fulfillment; currently a no-op.
    Serve(CustomerKind),
}

impl Command {
    pub fn is_patrol(&self) -> bool {
        matches!(self, Command::Patrol)
    }

    pub fn target(&self) -> Option<PlantId> {
        match self {
            Command::Water(id) | Command::Fertilize(id) | Command::Harvest(id) => Some(*id),
            Command::Patrol | Command::Serve(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Water(_) => "water",
            Command::Fertilize(_) => "fertilize",
            Command::Harvest(_) => "harvest",
            Command::Patrol => "patrol",
            Command::Serve(_) => "serve",
        }
    }

    /// Applies the command on the sim thread. A command whose target is
    /// gone (harvested, removed, or never existed) is a silent no-op;
    /// returns whether anything happened.
    pub fn apply(self, greenhouse: &mut Greenhouse, inventory: &mut Inventory) -> bool {
        match self {
            Command::Water(id) => match greenhouse.find_mut(id) {
                Some(plant) => {
                    plant.water(WATER_PER_COMMAND);
                    true
                }
                None => false,
            },
            Command::Fertilize(id) => match greenhouse.find_mut(id) {
                Some(plant) => {
                    plant.fertilize(FERTILIZER_PER_COMMAND);
                    true
                }
                None => false,
            },
            Command::Harvest(id) => greenhouse.harvest_by_id(id, inventory),
            // Patrol acts on the protection flag at dispatch time, not here.
            Command::Patrol => true,
            Command::Serve(kind) => {
                debug!(customer = kind.name(), "serve command is reserved, no-op");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::Plant;
    use crate::species::SpeciesBook;

    fn planted(species: &str, gh: &mut Greenhouse) -> PlantId {
        let book = SpeciesBook::builtin();
        let plant = Plant::from_species(book.get(species).unwrap());
        let id = plant.id();
        gh.add_plant_anywhere(plant).ok().unwrap();
        id
    }

    #[test]
    fn test_water_command_adds_fifty_clamped() {
        let mut gh = Greenhouse::new();
        let mut inv = Inventory::new();
        let id = planted("Lettuce", &mut gh);
        // Drain some water first.
        for _ in 0..30 {
            if let Some(p) = gh.find_mut(id) {
                p.tick();
            }
        }
        let before = gh.find(id).unwrap().1.water_level();
        assert!(Command::Water(id).apply(&mut gh, &mut inv));
        let after = gh.find(id).unwrap().1.water_level();
        assert!((after - (before + 50.0).min(100.0)).abs() < 1e-4);
    }

    #[test]
    fn test_harvest_command_moves_plant() {
        let mut gh = Greenhouse::new();
        let mut inv = Inventory::new();
        let id = planted("Tomato", &mut gh);
        assert!(Command::Harvest(id).apply(&mut gh, &mut inv));
        assert_eq!(gh.size(), 0);
        assert_eq!(inv.plant_count("Tomato"), 1);
    }

    #[test]
    fn test_missing_target_is_a_no_op() {
        let mut gh = Greenhouse::new();
        let mut inv = Inventory::new();
        let id = planted("Tomato", &mut gh);
        gh.remove_plant(0);
        assert!(!Command::Water(id).apply(&mut gh, &mut inv));
        assert!(!Command::Harvest(id).apply(&mut gh, &mut inv));
    }

    #[test]
    fn test_only_patrol_is_patrol() {
        let mut gh = Greenhouse::new();
        let id = planted("Corn", &mut gh);
        assert!(Command::Patrol.is_patrol());
        assert!(!Command::Water(id).is_patrol());
        assert_eq!(Command::Patrol.target(), None);
        assert_eq!(Command::Water(id).target(), Some(id));
    }
}
