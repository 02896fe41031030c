//! Snapshot and save-file handling.
//!
//! A [`Memento`] is an opaque record of the player-owned aggregate
//! state; the [`Caretaker`] keeps a single memento slot and mirrors it
//! to a line-oriented text file (`KEY:value`, one pair per line).
//! Parsing is best-effort throughout: malformed lines, tokens, and
//! unknown species are skipped and defaults fill the gaps, so a damaged
//! save degrades instead of failing.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use verdant_logic::escape::{escape, split_escaped, unescape};
use verdant_logic::stage::{PlantStage, Vitals};

use crate::greenhouse::Greenhouse;
use crate::inventory::Inventory;
use crate::plant::Plant;
use crate::species::SpeciesBook;

/// Errors surfaced by save-file I/O. Parsing never errors; it degrades.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque snapshot of the aggregate simulation state. Immutable after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Memento {
    inventory_data: String,
    greenhouse_data: String,
    worker_data: String,
    money: f32,
    rating: i32,
    day: u32,
    hour: u8,
    minute: u8,
}

impl Memento {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        inventory_data: String,
        greenhouse_data: String,
        worker_data: String,
        money: f32,
        rating: i32,
        day: u32,
        hour: u8,
        minute: u8,
    ) -> Self {
        Self {
            inventory_data,
            greenhouse_data,
            worker_data,
            money,
            rating,
            day,
            hour,
            minute,
        }
    }

    pub fn inventory_data(&self) -> &str {
        &self.inventory_data
    }

    pub fn greenhouse_data(&self) -> &str {
        &self.greenhouse_data
    }

    pub fn worker_data(&self) -> &str {
        &self.worker_data
    }

    pub fn money(&self) -> f32 {
        self.money
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

// ── Value sub-protocols ─────────────────────────────────────────────────

/// `Type:count|Type:count|…` — per-species totals across all slots, in
/// first-seen slot order.
pub fn serialize_inventory(inventory: &Inventory) -> String {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for slot in inventory.iter() {
        let Some(species) = slot.species() else {
            continue;
        };
        match counts.iter_mut().find(|(name, _)| name == species) {
            Some((_, count)) => *count += slot.count(),
            None => counts.push((species.to_string(), slot.count())),
        }
    }
    counts
        .iter()
        .map(|(name, count)| format!("{}:{}", escape(name), count))
        .collect::<Vec<_>>()
        .join("|")
}

/// Rebuilds inventory contents from the count list. Restored plants are
/// fresh seeds of their species; the count is what round-trips.
pub fn deserialize_inventory(inventory: &mut Inventory, data: &str, book: &SpeciesBook) {
    inventory.clear();
    if data.is_empty() {
        return;
    }
    for entry in split_escaped(data, '|') {
        let Some((name, count)) = entry.rsplit_once(':') else {
            warn!(%entry, "skipping malformed inventory entry");
            continue;
        };
        let Ok(count) = count.parse::<usize>() else {
            warn!(%entry, "skipping inventory entry with bad count");
            continue;
        };
        let name = unescape(name);
        let Some(species) = book.get(&name) else {
            warn!(species = %name, "skipping unknown species in save");
            continue;
        };
        for _ in 0..count {
            if inventory.add(Plant::from_species(species)).is_err() {
                warn!(species = %name, "inventory filled up during restore");
                return;
            }
        }
    }
}

/// `Type|baseGrowthRate|sellPrice|StageName|growth|water|nutrients`.
pub fn serialize_plant(plant: &Plant) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        escape(plant.species()),
        plant.base_growth_rate(),
        plant.sell_price(),
        plant.stage_name(),
        plant.growth(),
        plant.water_level(),
        plant.nutrient_level()
    )
}

/// Rebuilds one plant from its seven token fields. `None` for malformed
/// fields, unknown species, or unknown stage names.
fn plant_from_fields(fields: &[String], book: &SpeciesBook) -> Option<Plant> {
    if fields.len() != 7 {
        return None;
    }
    let name = unescape(&fields[0]);
    book.get(&name)?;
    let base_growth_rate = fields[1].parse::<f32>().ok()?;
    let sell_price = fields[2].parse::<f32>().ok()?;
    let stage = PlantStage::from_name(&fields[3])?;
    let growth = fields[4].parse::<f32>().ok()?;
    let water = fields[5].parse::<f32>().ok()?;
    let nutrients = fields[6].parse::<f32>().ok()?;
    Some(Plant::with_state(
        name,
        base_growth_rate,
        sell_price,
        stage,
        Vitals::new(growth, water, nutrients),
    ))
}

/// `size,capacity|token|…` — one token per plot in index order, `NULL`
/// for an empty plot.
pub fn serialize_greenhouse(greenhouse: &Greenhouse) -> String {
    let mut parts = vec![format!("{},{}", greenhouse.size(), greenhouse.capacity())];
    for plot in 0..greenhouse.capacity() {
        match greenhouse.plant(plot) {
            Some(plant) => parts.push(serialize_plant(plant)),
            None => parts.push("NULL".to_string()),
        }
    }
    parts.join("|")
}

/// Rebuilds the plot grid. Existing plants are discarded first; the
/// grid is grown (up to the hard max) when the snapshot was taken at a
/// larger capacity. Unparseable tokens leave their plot empty.
pub fn deserialize_greenhouse(greenhouse: &mut Greenhouse, data: &str, book: &SpeciesBook) {
    for plot in 0..greenhouse.capacity() {
        greenhouse.remove_plant(plot);
    }
    if data.is_empty() {
        return;
    }

    let parts = split_escaped(data, '|');
    let Some((_, capacity)) = parts[0].split_once(',') else {
        warn!("skipping greenhouse data with malformed header");
        return;
    };
    if let Ok(capacity) = capacity.parse::<usize>() {
        if capacity > greenhouse.capacity() {
            greenhouse.increase_capacity(capacity - greenhouse.capacity());
        }
    }

    let mut plot = 0;
    let mut index = 1;
    while index < parts.len() && plot < greenhouse.capacity() {
        if parts[index] == "NULL" {
            index += 1;
            plot += 1;
            continue;
        }
        if index + 7 > parts.len() {
            break;
        }
        match plant_from_fields(&parts[index..index + 7], book) {
            Some(plant) => {
                if greenhouse.add_plant(plant, plot).is_err() {
                    warn!(plot, "plot occupied during restore, token dropped");
                }
            }
            None => warn!(plot, "skipping unparseable plant token"),
        }
        index += 7;
        plot += 1;
    }
}

// ── File format ─────────────────────────────────────────────────────────

fn render_memento(memento: &Memento) -> String {
    format!(
        "INVENTORY:{}\nGREENHOUSE:{}\nWORKERS:{}\nMONEY:{}\nRATING:{}\nDAY:{}\nHOUR:{}\nMINUTE:{}\n",
        memento.inventory_data,
        memento.greenhouse_data,
        memento.worker_data,
        memento.money,
        memento.rating,
        memento.day,
        memento.hour,
        memento.minute
    )
}

/// Parses the line-oriented format. Missing keys take defaults; a file
/// whose three data strings are all empty yields `None`.
fn parse_memento(contents: &str) -> Option<Memento> {
    let mut inventory_data = String::new();
    let mut greenhouse_data = String::new();
    let mut worker_data = String::new();
    let mut money = 0.0f32;
    let mut rating = 0i32;
    let mut day = 1u32;
    let mut hour = 6u8;
    let mut minute = 0u8;

    for line in contents.lines() {
        let Some((key, value)) = line.split_once(':') else {
            if !line.trim().is_empty() {
                warn!(line, "skipping malformed save line");
            }
            continue;
        };
        match key {
            "INVENTORY" => inventory_data = value.to_string(),
            "GREENHOUSE" => greenhouse_data = value.to_string(),
            "WORKERS" => worker_data = value.to_string(),
            "MONEY" => money = value.parse().unwrap_or(money),
            "RATING" => rating = value.parse().unwrap_or(rating),
            "DAY" => day = value.parse().unwrap_or(day),
            "HOUR" => hour = value.parse().unwrap_or(hour),
            "MINUTE" => minute = value.parse().unwrap_or(minute),
            other => warn!(key = other, "skipping unknown save key"),
        }
    }

    if inventory_data.is_empty() && greenhouse_data.is_empty() && worker_data.is_empty() {
        return None;
    }
    Some(Memento::new(
        inventory_data,
        greenhouse_data,
        worker_data,
        money,
        rating,
        day,
        hour,
        minute,
    ))
}

/// Single-slot persistence: at most one memento, mirrored to a file on
/// every replacement.
#[derive(Debug)]
pub struct Caretaker {
    slot: Option<Memento>,
    path: PathBuf,
}

impl Caretaker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            slot: None,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn memento(&self) -> Option<&Memento> {
        self.slot.as_ref()
    }

    /// Replaces the slot and immediately writes the file.
    pub fn add_memento(&mut self, memento: Memento) -> Result<(), SaveError> {
        let mut file = fs::File::create(&self.path)?;
        file.write_all(render_memento(&memento).as_bytes())?;
        info!(path = %self.path.display(), "game state saved");
        self.slot = Some(memento);
        Ok(())
    }

    /// Fills the slot from the file. `Ok(false)` when the file is
    /// missing or holds no restorable state.
    pub fn load_from_file(&mut self) -> Result<bool, SaveError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        match parse_memento(&contents) {
            Some(memento) => {
                info!(path = %self.path.display(), "game state loaded");
                self.slot = Some(memento);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clears the slot and deletes the file.
    pub fn delete_data(&mut self) -> Result<(), SaveError> {
        self.slot = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
