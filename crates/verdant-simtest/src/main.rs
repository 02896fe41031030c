//! Verdant Headless Simulation Harness
//!
//! Validates the nursery engine end-to-end with no rendering and no
//! input: lifecycle math, inventory stacking, the store protocol, clock
//! arithmetic, snapshot persistence, and the worker command pipeline.
//!
//! Usage:
//!   cargo run -p verdant-simtest
//!   cargo run -p verdant-simtest -- --verbose

use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use verdant_core::prelude::*;
use verdant_logic::clock::SimClock;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Verdant Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Species catalog
    results.extend(validate_catalog());

    // 2. Plant lifecycle
    results.extend(validate_lifecycle());

    // 3. Inventory stacking
    results.extend(validate_inventory());

    // 4. Store purchases
    results.extend(validate_store());

    // 5. Clock arithmetic
    results.extend(validate_clock());

    // 6. Snapshot persistence
    results.extend(validate_persistence());

    // 7. Worker pipeline
    results.extend(validate_workers());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn temp_save_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("verdant-simtest-{}-{}.txt", std::process::id(), tag))
}

fn fresh_game(tag: &str) -> Game {
    Game::new(GameConfig {
        save_path: temp_save_path(tag),
        customer_seed: Some(7),
    })
}

// ── 1. Species catalog ──────────────────────────────────────────────────

fn validate_catalog() -> Vec<TestResult> {
    println!("--- Species Catalog ---");
    let mut results = Vec::new();

    let book = SpeciesBook::builtin();
    results.push(TestResult::check(
        "catalog_size",
        book.len() == 10,
        format!("{} species", book.len()),
    ));

    let lettuce_ok = book
        .get("Lettuce")
        .map(|s| (s.base_growth_rate - 1.6).abs() < 1e-6 && (s.sell_price - 15.0).abs() < 1e-6)
        .unwrap_or(false);
    results.push(TestResult::check(
        "lettuce_entry",
        lettuce_ok,
        "rate 1.6, price 15".to_string(),
    ));

    // Prices rise as growth rates fall across the catalog.
    let mut ordered = true;
    let entries: Vec<_> = book.iter().collect();
    for pair in entries.windows(2) {
        if pair[0].sell_price > pair[1].sell_price
            || pair[0].base_growth_rate < pair[1].base_growth_rate
        {
            ordered = false;
        }
    }
    results.push(TestResult::check(
        "catalog_ordering",
        ordered,
        "slower growers sell higher".to_string(),
    ));

    results
}

// ── 2. Plant lifecycle ──────────────────────────────────────────────────

fn validate_lifecycle() -> Vec<TestResult> {
    println!("--- Plant Lifecycle ---");
    let mut results = Vec::new();
    let book = SpeciesBook::builtin();

    // Sixteen unattended ticks sprout a lettuce with exact numbers.
    let mut lettuce = Plant::from_species(book.get("Lettuce").expect("catalog"));
    for _ in 0..16 {
        lettuce.tick();
    }
    results.push(TestResult::check(
        "lettuce_sprout",
        lettuce.stage() == PlantStage::Growing
            && (lettuce.growth() - 25.6).abs() < 1e-3
            && (lettuce.water_level() - 84.0).abs() < 1e-3
            && (lettuce.nutrient_level() - 92.0).abs() < 1e-3,
        format!(
            "stage {} growth {:.1} water {:.0} nutrients {:.0}",
            lettuce.stage_name(),
            lettuce.growth(),
            lettuce.water_level(),
            lettuce.nutrient_level()
        ),
    ));

    // A neglected tomato dies within 100 ticks and stays dead.
    let mut tomato = Plant::from_species(book.get("Tomato").expect("catalog"));
    let mut died_at = 0;
    for tick in 1..=100 {
        tomato.tick();
        if tomato.is_dead() {
            died_at = tick;
            break;
        }
    }
    let mut stayed_dead = died_at > 0;
    for _ in 0..30 {
        tomato.tick();
        stayed_dead &= tomato.is_dead();
    }
    results.push(TestResult::check(
        "tomato_neglect",
        stayed_dead,
        format!("died at tick {died_at}, never recovered"),
    ));

    // A boosted cycle exactly doubles growth per tick.
    let mut normal = Plant::from_species(book.get("Corn").expect("catalog"));
    let mut boosted = Plant::from_species(book.get("Corn").expect("catalog"));
    boosted.set_growth_cycle(GrowthCycle::Boosted);
    normal.tick();
    boosted.tick();
    results.push(TestResult::check(
        "boosted_cycle",
        (boosted.growth() - 2.0 * normal.growth()).abs() < 1e-4,
        format!("{:.2} vs {:.2}", boosted.growth(), normal.growth()),
    ));

    // Vitals stay clamped through a long unattended run.
    let mut pumpkin = Plant::from_species(book.get("Pumpkin").expect("catalog"));
    let mut in_range = true;
    for _ in 0..500 {
        pumpkin.tick();
        in_range &= (0.0..=100.0).contains(&pumpkin.water_level())
            && (0.0..=100.0).contains(&pumpkin.nutrient_level());
    }
    results.push(TestResult::check(
        "vitals_clamped",
        in_range,
        "500 ticks in range".to_string(),
    ));

    results
}

// ── 3. Inventory stacking ───────────────────────────────────────────────

fn validate_inventory() -> Vec<TestResult> {
    println!("--- Inventory ---");
    let mut results = Vec::new();
    let book = SpeciesBook::builtin();

    let mut inventory = Inventory::new();
    for _ in 0..65 {
        let _ = inventory.add(Plant::from_species(book.get("Lettuce").expect("catalog")));
    }
    results.push(TestResult::check(
        "sixty_five_lettuce",
        inventory.plant_count("Lettuce") == 65
            && inventory.stack_count() == 2
            && inventory.slot(0).map(|s| s.count()) == Some(64),
        format!(
            "{} plants across {} stacks",
            inventory.plant_count("Lettuce"),
            inventory.stack_count()
        ),
    ));

    // Add-then-remove round trip drains to empty.
    let mut inventory = Inventory::new();
    let names = ["Lettuce", "Tomato", "Lettuce", "Corn", "Tomato", "Corn"];
    for name in names {
        let _ = inventory.add(Plant::from_species(book.get(name).expect("catalog")));
    }
    let mut removed = 0;
    for name in names {
        if inventory.remove_by_type(name).is_some() {
            removed += 1;
        }
    }
    results.push(TestResult::check(
        "add_remove_round_trip",
        removed == names.len() && inventory.stack_count() == 0,
        format!("{removed} removed, {} stacks left", inventory.stack_count()),
    ));

    results
}

// ── 4. Store purchases ──────────────────────────────────────────────────

fn validate_store() -> Vec<TestResult> {
    println!("--- Store ---");
    let mut results = Vec::new();

    let mut game = fresh_game("store");
    game.player_mut().set_money(1000.0);
    let purchase = game.purchase(4); // Tomato at 55
    results.push(TestResult::check(
        "tomato_purchase",
        purchase.is_ok()
            && (game.player().money() - 945.0).abs() < 1e-4
            && game.player().inventory().plant_count("Tomato") == 1,
        format!("money {:.2}", game.player().money()),
    ));

    let mut game = fresh_game("store-poor");
    game.player_mut().set_money(10.0);
    let refused = game.purchase(9); // Pumpkin at 200
    results.push(TestResult::check(
        "insufficient_funds",
        matches!(refused, Err(PurchaseError::InsufficientFunds { .. }))
            && (game.player().money() - 10.0).abs() < 1e-6
            && game.player().inventory().total_plants() == 0,
        "no side effects on refusal".to_string(),
    ));

    let unknown = game.purchase(99);
    results.push(TestResult::check(
        "unknown_listing",
        matches!(unknown, Err(PurchaseError::UnknownItem { .. })),
        "index 99 rejected".to_string(),
    ));

    results
}

// ── 5. Clock arithmetic ─────────────────────────────────────────────────

fn validate_clock() -> Vec<TestResult> {
    println!("--- Clock ---");
    let mut results = Vec::new();

    let mut clock = SimClock::at(1, 10, 0);
    clock.advance_minutes(75);
    results.push(TestResult::check(
        "seventy_five_minutes",
        clock == SimClock::at(1, 11, 15),
        clock.full_time_string(),
    ));

    let mut clock = SimClock::at(1, 10, 0);
    clock.advance_minutes(1500);
    results.push(TestResult::check(
        "day_rollover",
        clock == SimClock::at(2, 11, 0),
        clock.full_time_string(),
    ));

    // Night and protection accelerate the game clock tenfold.
    let mut game = fresh_game("clock");
    game.player_mut().set_time(1, 22, 0);
    game.update_game_time(1.0);
    results.push(TestResult::check(
        "night_speed",
        game.player().minute() == 10,
        format!("22:00 + 1s -> {}", game.player().time_string()),
    ));

    results
}

// ── 6. Snapshot persistence ─────────────────────────────────────────────

fn validate_persistence() -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();
    let path = temp_save_path("persistence");
    let book = SpeciesBook::builtin();

    {
        let mut game = Game::new(GameConfig {
            save_path: path.clone(),
            customer_seed: Some(7),
        });
        game.player_mut().set_money(1500.5);
        game.player_mut().set_rating(85);
        game.player_mut().set_time(5, 14, 30);
        for _ in 0..5 {
            let _ = game
                .player_mut()
                .inventory_mut()
                .add(Plant::from_species(book.get("Lettuce").expect("catalog")));
        }
        for _ in 0..3 {
            let _ = game
                .player_mut()
                .inventory_mut()
                .add(Plant::from_species(book.get("Tomato").expect("catalog")));
        }
        if let Err(err) = game.save_game() {
            results.push(TestResult::check("save", false, err.to_string()));
            return results;
        }
    }

    let mut revived = Game::new(GameConfig {
        save_path: path.clone(),
        customer_seed: Some(7),
    });
    let loaded = revived.load_game().unwrap_or(false);
    let player = revived.player();
    results.push(TestResult::check(
        "memento_round_trip",
        loaded
            && player.money() == 1500.5
            && player.rating() == 85
            && player.day() == 5
            && player.hour() == 14
            && player.minute() == 30
            && player.inventory().plant_count("Lettuce") == 5
            && player.inventory().plant_count("Tomato") == 3,
        format!(
            "money {:.2}, rating {}, {}",
            player.money(),
            player.rating(),
            player.full_time_string()
        ),
    ));

    let _ = revived.delete_save();
    results.push(TestResult::check(
        "delete_save",
        !path.exists(),
        "file removed".to_string(),
    ));

    results
}

// ── 7. Worker pipeline ──────────────────────────────────────────────────

fn validate_workers() -> Vec<TestResult> {
    println!("--- Workers ---");
    let mut results = Vec::new();
    let book = SpeciesBook::builtin();

    let mut game = fresh_game("workers");
    let _ = game
        .player_mut()
        .greenhouse_mut()
        .add_plant(Plant::from_species(book.get("Lettuce").expect("catalog")), 0);
    game.hire_worker(WorkerRole::Water, 3);

    // Drain the plant until the worker's low-water branch trips.
    while game
        .player()
        .greenhouse()
        .plant(0)
        .map(|p| p.water_level() > 20.0)
        .unwrap_or(false)
    {
        game.tick_greenhouse();
    }
    let thirsty = game
        .player()
        .greenhouse()
        .plant(0)
        .map(|p| p.water_level())
        .unwrap_or(0.0);

    std::thread::sleep(Duration::from_millis(400));
    let applied = game.pump_commands();
    let watered = game
        .player()
        .greenhouse()
        .plant(0)
        .map(|p| p.water_level())
        .unwrap_or(0.0);
    results.push(TestResult::check(
        "observer_to_command",
        applied >= 1 && (watered - (thirsty + 50.0).min(100.0)).abs() < 1e-3,
        format!("water {thirsty:.0} -> {watered:.0}"),
    ));

    // An idle worker patrols, which raises protection.
    let mut game = fresh_game("patrol");
    game.player_mut().set_time(1, 12, 0);
    game.hire_worker(WorkerRole::General, 3);
    game.tick_greenhouse();
    let mut protected = false;
    for _ in 0..200 {
        if game.is_protected() {
            protected = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    results.push(TestResult::check(
        "patrol_protection",
        protected,
        "flag raised by idle worker".to_string(),
    ));

    // Firing the worker stops its executor and drains its queue.
    let fired = game.fire_worker(0);
    results.push(TestResult::check(
        "fire_worker",
        fired && game.player().worker_count() == 0,
        "worker stopped and detached".to_string(),
    ));

    results
}
