//! The greenhouse: a grid of plots and the subject side of the
//! worker-notification protocol.
//!
//! Ticking the greenhouse ticks every occupied plot, then hands each
//! attached observer one aggregate batch of plant reports. Observers
//! never hold references to plants; they see value snapshots and act
//! through commands.

use tracing::debug;

use verdant_logic::constants::{GREENHOUSE_CAPACITY, GREENHOUSE_MAX_CAPACITY};
use verdant_logic::stage::PlantStage;

use crate::inventory::Inventory;
use crate::plant::{Plant, PlantId};

/// Value snapshot of one plant, passed to observers after a tick pass.
#[derive(Debug, Clone)]
pub struct PlantReport {
    pub id: PlantId,
    pub plot: usize,
    pub species: String,
    pub stage: PlantStage,
    pub growth: f32,
    pub water: f32,
    pub nutrients: f32,
}

impl PlantReport {
    pub fn from_plant(plant: &Plant, plot: usize) -> Self {
        Self {
            id: plant.id(),
            plot,
            species: plant.species().to_string(),
            stage: plant.stage(),
            growth: plant.growth(),
            water: plant.water_level(),
            nutrients: plant.nutrient_level(),
        }
    }
}

/// Receiver of greenhouse notifications. One aggregate call per tick
/// pass; `reports` holds every occupied plot in index order.
pub trait Observer: Send {
    fn update(&mut self, reports: &[PlantReport]);
}

/// Plot grid plus the attached observers.
pub struct Greenhouse {
    plots: Vec<Option<Plant>>,
    observers: Vec<Box<dyn Observer>>,
}

impl Greenhouse {
    pub fn new() -> Self {
        Self::with_capacity(GREENHOUSE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(GREENHOUSE_MAX_CAPACITY);
        Self {
            plots: (0..capacity).map(|_| None).collect(),
            observers: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.plots.len()
    }

    /// Number of occupied plots.
    pub fn size(&self) -> usize {
        self.plots.iter().filter(|p| p.is_some()).count()
    }

    pub fn plant(&self, plot: usize) -> Option<&Plant> {
        self.plots.get(plot).and_then(|p| p.as_ref())
    }

    pub fn plant_mut(&mut self, plot: usize) -> Option<&mut Plant> {
        self.plots.get_mut(plot).and_then(|p| p.as_mut())
    }

    /// Finds a plant and its plot by id.
    pub fn find(&self, id: PlantId) -> Option<(usize, &Plant)> {
        self.plots
            .iter()
            .enumerate()
            .find_map(|(i, p)| match p {
                Some(plant) if plant.id() == id => Some((i, plant)),
                _ => None,
            })
    }

    pub fn find_mut(&mut self, id: PlantId) -> Option<&mut Plant> {
        self.plots
            .iter_mut()
            .flatten()
            .find(|plant| plant.id() == id)
    }

    /// Plants a seedling at a specific plot, which must be empty.
    pub fn add_plant(&mut self, plant: Plant, plot: usize) -> Result<(), Plant> {
        match self.plots.get_mut(plot) {
            Some(cell) if cell.is_none() => {
                *cell = Some(plant);
                Ok(())
            }
            _ => Err(plant),
        }
    }

    /// Plants into the first empty plot, returning its index.
    pub fn add_plant_anywhere(&mut self, plant: Plant) -> Result<usize, Plant> {
        match self.plots.iter().position(|p| p.is_none()) {
            Some(plot) => {
                self.plots[plot] = Some(plant);
                Ok(plot)
            }
            None => Err(plant),
        }
    }

    /// Discards the plant at a plot. Returns false on an empty plot.
    pub fn remove_plant(&mut self, plot: usize) -> bool {
        match self.plots.get_mut(plot) {
            Some(cell) => cell.take().is_some(),
            None => false,
        }
    }

    /// Moves the plant at a plot into the inventory. When the inventory
    /// refuses, the harvest is refused and the plant stays in its plot.
    pub fn harvest_plant(&mut self, plot: usize, inventory: &mut Inventory) -> bool {
        let Some(cell) = self.plots.get_mut(plot) else {
            return false;
        };
        let Some(plant) = cell.take() else {
            return false;
        };
        match inventory.add(plant) {
            Ok(()) => true,
            Err(plant) => {
                debug!(plot, "harvest refused, inventory rejected the plant");
                *cell = Some(plant);
                false
            }
        }
    }

    /// [`Greenhouse::harvest_plant`] addressed by plant id.
    pub fn harvest_by_id(&mut self, id: PlantId, inventory: &mut Inventory) -> bool {
        match self.find(id) {
            Some((plot, _)) => self.harvest_plant(plot, inventory),
            None => false,
        }
    }

    /// Grows the plot grid, up to the hard maximum. Returns the new
    /// capacity.
    pub fn increase_capacity(&mut self, delta: usize) -> usize {
        let target = (self.plots.len() + delta).min(GREENHOUSE_MAX_CAPACITY);
        while self.plots.len() < target {
            self.plots.push(None);
        }
        self.plots.len()
    }

    /// Ticks every occupied plot, then notifies observers with one
    /// aggregate report batch.
    pub fn tick_all_plants(&mut self) {
        let mut reports = Vec::with_capacity(self.size());
        for (plot, cell) in self.plots.iter_mut().enumerate() {
            if let Some(plant) = cell {
                plant.tick();
                reports.push(PlantReport::from_plant(plant, plot));
            }
        }
        self.notify(&reports);
    }

    /// Dispatches a report batch to every attached observer.
    pub fn notify(&mut self, reports: &[PlantReport]) {
        for observer in self.observers.iter_mut() {
            observer.update(reports);
        }
    }

    pub fn attach(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn detach(&mut self, index: usize) -> Option<Box<dyn Observer>> {
        if index < self.observers.len() {
            Some(self.observers.remove(index))
        } else {
            None
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for Greenhouse {
    fn default() -> Self {
        Self::new()
    }
}
