//! End-to-end scenarios exercised through the public engine API only:
//! lifecycle math, death by neglect, inventory stacking, the purchase
//! protocol, snapshot round-trips, and the worker pipeline.

use std::time::Duration;

use tempfile::TempDir;
use verdant_core::prelude::*;

fn seed(book: &SpeciesBook, name: &str) -> Plant {
    Plant::from_species(book.get(name).expect("species in catalog"))
}

// ── S1: lifecycle ───────────────────────────────────────────────────────

#[test]
fn lettuce_sprouts_after_sixteen_unattended_ticks() {
    let book = SpeciesBook::builtin();
    let mut plant = seed(&book, "Lettuce");

    for _ in 0..16 {
        plant.tick();
    }

    assert_eq!(plant.stage(), PlantStage::Growing);
    assert!((plant.growth() - 25.6).abs() < 1e-3);
    assert!((plant.water_level() - 84.0).abs() < 1e-3);
    assert!((plant.nutrient_level() - 92.0).abs() < 1e-3);
}

// ── S2: death by neglect ────────────────────────────────────────────────

#[test]
fn unwatered_tomato_dies_within_a_hundred_ticks() {
    let book = SpeciesBook::builtin();
    let mut plant = seed(&book, "Tomato");

    let mut died_at = None;
    for tick in 1..=100 {
        plant.tick();
        if plant.is_dead() {
            died_at = Some(tick);
            break;
        }
    }
    let died_at = died_at.expect("plant should die by tick 100");
    assert!(died_at > 16, "death cannot precede the seed phase");

    // Once dead, always dead.
    for _ in 0..50 {
        plant.tick();
        assert!(plant.is_dead());
    }
}

// ── S3: inventory merge ─────────────────────────────────────────────────

#[test]
fn sixty_five_lettuce_fill_one_stack_and_start_a_second() {
    let book = SpeciesBook::builtin();
    let mut inventory = Inventory::new();

    for _ in 0..65 {
        inventory.add(seed(&book, "Lettuce")).expect("room for 65");
    }

    assert_eq!(inventory.slot(0).map(|s| s.count()), Some(64));
    assert_eq!(inventory.slot(1).map(|s| s.count()), Some(1));
    assert_eq!(inventory.plant_count("Lettuce"), 65);
    assert_eq!(inventory.stack_count(), 2);
}

// ── S4 / S5: purchases ──────────────────────────────────────────────────

#[test]
fn purchase_debits_exactly_the_price() {
    let dir = TempDir::new().unwrap();
    let mut game = Game::new(GameConfig {
        save_path: dir.path().join("save.txt"),
        customer_seed: Some(0),
    });
    game.player_mut().set_money(1000.0);

    // Tomato: catalog index 4, price 55.
    game.purchase(4).expect("purchase succeeds");

    assert!((game.player().money() - 945.0).abs() < 1e-4);
    assert_eq!(game.player().inventory().plant_count("Tomato"), 1);
    assert_eq!(game.player().inventory().total_plants(), 1);
}

#[test]
fn failed_purchase_has_no_side_effects() {
    let dir = TempDir::new().unwrap();
    let mut game = Game::new(GameConfig {
        save_path: dir.path().join("save.txt"),
        customer_seed: Some(0),
    });
    game.player_mut().set_money(10.0);

    let err = game.purchase(9).unwrap_err();
    assert!(matches!(err, PurchaseError::InsufficientFunds { .. }));
    assert!((game.player().money() - 10.0).abs() < 1e-6);
    assert_eq!(game.player().inventory().total_plants(), 0);
}

// ── S6: save / load ─────────────────────────────────────────────────────

#[test]
fn memento_survives_player_destruction() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game_state.txt");
    let book = SpeciesBook::builtin();

    {
        let mut game = Game::new(GameConfig {
            save_path: path.clone(),
            customer_seed: Some(0),
        });
        game.player_mut().set_money(1500.5);
        game.player_mut().set_rating(85);
        game.player_mut().set_time(5, 14, 30);
        for _ in 0..5 {
            game.player_mut().inventory_mut().add(seed(&book, "Lettuce")).unwrap();
        }
        for _ in 0..3 {
            game.player_mut().inventory_mut().add(seed(&book, "Tomato")).unwrap();
        }
        game.save_game().expect("save");
        // Game (and its player) dropped here.
    }

    let mut revived = Game::new(GameConfig {
        save_path: path,
        customer_seed: Some(0),
    });
    assert!(revived.load_game().expect("load"));

    let player = revived.player();
    assert_eq!(player.money(), 1500.5);
    assert_eq!(player.rating(), 85);
    assert_eq!(player.day(), 5);
    assert_eq!(player.hour(), 14);
    assert_eq!(player.minute(), 30);
    assert_eq!(player.inventory().plant_count("Lettuce"), 5);
    assert_eq!(player.inventory().plant_count("Tomato"), 3);
}

// ── Worker pipeline ─────────────────────────────────────────────────────

#[test]
fn worker_observes_waters_and_the_sim_thread_applies() {
    let dir = TempDir::new().unwrap();
    let mut game = Game::new(GameConfig {
        save_path: dir.path().join("save.txt"),
        customer_seed: Some(0),
    });
    let book = SpeciesBook::builtin();
    game.player_mut()
        .greenhouse_mut()
        .add_plant(seed(&book, "Lettuce"), 0)
        .unwrap();
    game.hire_worker(WorkerRole::Water, 3);

    // Tick until the low-water threshold trips; the final notification
    // makes the worker enqueue a water command.
    while game.player().greenhouse().plant(0).unwrap().water_level() > 20.0 {
        game.tick_greenhouse();
    }
    let before = game.player().greenhouse().plant(0).unwrap().water_level();

    std::thread::sleep(Duration::from_millis(300));
    let applied = game.pump_commands();
    assert!(applied >= 1, "the dispatched command should apply");

    let after = game.player().greenhouse().plant(0).unwrap().water_level();
    assert!((after - (before + 50.0).min(100.0)).abs() < 1e-3);
}

#[test]
fn harvest_worker_moves_ripe_plants_into_the_inventory() {
    let dir = TempDir::new().unwrap();
    let mut game = Game::new(GameConfig {
        save_path: dir.path().join("save.txt"),
        customer_seed: Some(0),
    });
    let book = SpeciesBook::builtin();
    game.player_mut()
        .greenhouse_mut()
        .add_plant(seed(&book, "Lettuce"), 0)
        .unwrap();
    game.hire_worker(WorkerRole::Harvest, 3);

    // Keep the plant fed until it ripens.
    loop {
        game.tick_greenhouse();
        let Some(plant) = game.player_mut().greenhouse_mut().plant_mut(0) else {
            break;
        };
        if plant.is_ripe() {
            break;
        }
        plant.water(100.0);
        plant.fertilize(100.0);
    }
    assert!(game.player().greenhouse().plant(0).is_some_and(|p| p.is_ripe()));

    std::thread::sleep(Duration::from_millis(300));
    game.pump_commands();

    assert_eq!(game.player().greenhouse().size(), 0);
    assert_eq!(game.player().inventory().plant_count("Lettuce"), 1);
}

// ── Protection and the clock ────────────────────────────────────────────

#[test]
fn patrol_accelerates_time_tenfold() {
    let dir = TempDir::new().unwrap();
    let mut game = Game::new(GameConfig {
        save_path: dir.path().join("save.txt"),
        customer_seed: Some(0),
    });
    game.player_mut().set_time(1, 12, 0);
    // An idle general worker has nothing to do and goes on patrol.
    game.hire_worker(WorkerRole::General, 3);
    game.tick_greenhouse();

    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while !game.is_protected() {
        assert!(std::time::Instant::now() < deadline, "patrol never ran");
        std::thread::sleep(Duration::from_millis(10));
    }

    game.update_game_time(1.0);
    assert_eq!(game.player().minute(), 10);
}
