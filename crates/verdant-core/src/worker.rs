//! Autonomous workers: observer, command queue, and executor thread.
//!
//! Each worker owns a FIFO queue guarded by a mutex/condvar pair and one
//! executor thread spawned at construction. Notifications arrive on the
//! sim thread and enqueue at most one command; the executor dequeues at
//! its own level-dependent pace and forwards plant-mutating commands
//! into the game's dispatch channel, where the sim thread applies them.
//! The executor therefore never touches plant state itself.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use verdant_logic::constants::{worker_delay_ms, LOW_NUTRIENT_THRESHOLD, LOW_WATER_THRESHOLD};
use verdant_logic::stage::PlantStage;

use crate::command::Command;
use crate::greenhouse::{Observer, PlantReport};

/// What a worker is trained for. Specialists act only on their own
/// signal and never patrol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    General,
    Water,
    Fertilise,
    Harvest,
}

impl WorkerRole {
    pub fn name(&self) -> &'static str {
        match self {
            WorkerRole::General => "Worker",
            WorkerRole::Water => "Water Worker",
            WorkerRole::Fertilise => "Fertiliser Worker",
            WorkerRole::Harvest => "Harvest Worker",
        }
    }

    /// The command this role would issue for one plant, if any.
    /// For the general role the branches are mutually exclusive and
    /// checked in priority order: nutrients, then water, then ripeness.
    fn command_for(&self, report: &PlantReport) -> Option<Command> {
        match self {
            WorkerRole::General => {
                if report.nutrients <= LOW_NUTRIENT_THRESHOLD {
                    Some(Command::Fertilize(report.id))
                } else if report.water <= LOW_WATER_THRESHOLD {
                    Some(Command::Water(report.id))
                } else if report.stage == PlantStage::Ripe {
                    Some(Command::Harvest(report.id))
                } else {
                    None
                }
            }
            WorkerRole::Water => {
                (report.water <= LOW_WATER_THRESHOLD).then(|| Command::Water(report.id))
            }
            WorkerRole::Fertilise => {
                (report.nutrients <= LOW_NUTRIENT_THRESHOLD).then(|| Command::Fertilize(report.id))
            }
            WorkerRole::Harvest => {
                (report.stage == PlantStage::Ripe).then(|| Command::Harvest(report.id))
            }
        }
    }
}

/// Queue state shared between the owning worker and its executor thread.
struct Shared {
    queue: Mutex<VecDeque<Command>>,
    available: Condvar,
    running: AtomicBool,
    delay_ms: AtomicU64,
}

impl Shared {
    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<Command>> {
        // A panic while holding the lock leaves the queue itself intact;
        // keep going rather than poisoning the whole worker.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Everything a worker needs to be wired into a game: where commands go
/// and which protection flag patrols raise.
#[derive(Clone)]
pub struct WorkerContext {
    pub dispatch: Sender<Command>,
    pub protection: Arc<AtomicBool>,
}

impl WorkerContext {
    pub fn spawn(&self, role: WorkerRole, level: u8) -> Worker {
        Worker::new(role, level, self.dispatch.clone(), self.protection.clone())
    }
}

/// A hired worker. Stops (and drains its queue) on drop.
pub struct Worker {
    role: WorkerRole,
    level: u8,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Hires a worker and starts its executor thread. Levels outside
    /// 1-3 are clamped.
    pub fn new(
        role: WorkerRole,
        level: u8,
        dispatch: Sender<Command>,
        protection: Arc<AtomicBool>,
    ) -> Self {
        let level = level.clamp(1, 3);
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            running: AtomicBool::new(true),
            delay_ms: AtomicU64::new(worker_delay_ms(level)),
        });

        let executor_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || executor_loop(executor_shared, dispatch, protection));

        Self {
            role,
            level,
            shared,
            handle: Some(handle),
        }
    }

    pub fn role(&self) -> WorkerRole {
        self.role
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Changes the worker's level; takes effect from the next command.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.clamp(1, 3);
        self.shared
            .delay_ms
            .store(worker_delay_ms(self.level), Ordering::SeqCst);
    }

    /// Pushes a command onto the queue and wakes the executor.
    pub fn enqueue(&self, command: Command) {
        let mut queue = self.shared.lock_queue();
        queue.push_back(command);
        drop(queue);
        self.shared.available.notify_one();
    }

    pub fn pending_commands(&self) -> usize {
        self.shared.lock_queue().len()
    }

    /// Stops the executor: clears the running flag, wakes the thread,
    /// joins it, then drains whatever was still queued. The in-flight
    /// command finishes; pending ones are discarded.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        self.shared.available.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        let drained = {
            let mut queue = self.shared.lock_queue();
            let n = queue.len();
            queue.clear();
            n
        };
        if drained > 0 {
            debug!(role = self.role.name(), drained, "discarded pending commands on stop");
        }
    }
}

impl Observer for Worker {
    /// Chooses at most one command per notification: the first plant in
    /// plot order this role can act on. A general worker with nothing
    /// to do goes on patrol; specialists stay idle.
    fn update(&mut self, reports: &[PlantReport]) {
        let command = reports.iter().find_map(|r| self.role.command_for(r));
        let command = match command {
            Some(command) => command,
            None if self.role == WorkerRole::General => Command::Patrol,
            None => return,
        };
        debug!(role = self.role.name(), command = command.name(), "enqueued");
        self.enqueue(command);
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The executor: waits for work, forwards it, paces itself. Exits as
/// soon as the running flag clears, leaving any backlog for `stop()`
/// to drain.
fn executor_loop(shared: Arc<Shared>, dispatch: Sender<Command>, protection: Arc<AtomicBool>) {
    loop {
        let command = {
            let mut queue = shared.lock_queue();
            loop {
                if !shared.running.load(Ordering::SeqCst) {
                    return;
                }
                if let Some(command) = queue.pop_front() {
                    break command;
                }
                queue = shared
                    .available
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        if command.is_patrol() {
            protection.store(true, Ordering::SeqCst);
            debug!("patrol started, protection raised");
        } else {
            // The sim thread owns all plant state; hand the command over.
            if dispatch.send(command).is_err() {
                // Game side is gone; nothing left to work for.
                return;
            }
            protection.store(false, Ordering::SeqCst);
        }

        let delay = shared.delay_ms.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(delay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::Plant;
    use crate::species::SpeciesBook;
    use std::sync::mpsc;
    use std::time::Duration;

    fn report(water: f32, nutrients: f32, stage: PlantStage) -> PlantReport {
        let book = SpeciesBook::builtin();
        let plant = Plant::from_species(book.get("Lettuce").unwrap());
        PlantReport {
            id: plant.id(),
            plot: 0,
            species: "Lettuce".to_string(),
            stage,
            growth: 50.0,
            water,
            nutrients,
        }
    }

    fn harness() -> (WorkerContext, mpsc::Receiver<Command>) {
        let (tx, rx) = mpsc::channel();
        let ctx = WorkerContext {
            dispatch: tx,
            protection: Arc::new(AtomicBool::new(false)),
        };
        (ctx, rx)
    }

    #[test]
    fn test_thirsty_plant_yields_one_water_command() {
        let (ctx, rx) = harness();
        let mut worker = ctx.spawn(WorkerRole::General, 3);

        worker.update(&[report(10.0, 100.0, PlantStage::Growing)]);

        let command = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(command, Command::Water(_)));
        // Exactly one: nothing else arrives.
        assert!(rx.recv_timeout(Duration::from_millis(700)).is_err());
    }

    #[test]
    fn test_nutrients_take_priority_over_water() {
        let (ctx, rx) = harness();
        let mut worker = ctx.spawn(WorkerRole::General, 3);

        worker.update(&[report(10.0, 10.0, PlantStage::Growing)]);

        let command = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(command, Command::Fertilize(_)));
        drop(worker);
    }

    #[test]
    fn test_general_worker_harvests_ripe_plants() {
        let (ctx, rx) = harness();
        let mut worker = ctx.spawn(WorkerRole::General, 3);

        worker.update(&[report(80.0, 80.0, PlantStage::Ripe)]);

        let command = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(command, Command::Harvest(_)));
        drop(worker);
    }

    #[test]
    fn test_idle_general_worker_patrols() {
        let (ctx, _rx) = harness();
        let mut worker = ctx.spawn(WorkerRole::General, 3);

        worker.update(&[report(80.0, 80.0, PlantStage::Growing)]);

        // Patrol never reaches the dispatch channel; it raises the flag.
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while !ctx.protection.load(Ordering::SeqCst) {
            assert!(std::time::Instant::now() < deadline, "patrol never ran");
            thread::sleep(Duration::from_millis(10));
        }
        drop(worker);
    }

    #[test]
    fn test_specialist_ignores_other_signals() {
        let (ctx, rx) = harness();
        let mut worker = ctx.spawn(WorkerRole::Water, 3);

        // Thirsty for nutrients and ripe, but not for water.
        worker.update(&[report(80.0, 10.0, PlantStage::Ripe)]);
        assert_eq!(worker.pending_commands(), 0);
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
        // Specialists never patrol either.
        assert!(!ctx.protection.load(Ordering::SeqCst));
        drop(worker);
    }

    #[test]
    fn test_commands_execute_in_enqueue_order() {
        let (ctx, rx) = harness();
        let worker = ctx.spawn(WorkerRole::General, 3);

        let a = report(10.0, 100.0, PlantStage::Growing);
        let b = report(100.0, 10.0, PlantStage::Growing);
        worker.enqueue(Command::Water(a.id));
        worker.enqueue(Command::Fertilize(b.id));

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, Command::Water(a.id));
        assert_eq!(second, Command::Fertilize(b.id));
        drop(worker);
    }

    #[test]
    fn test_stop_drains_pending_commands() {
        let (ctx, _rx) = harness();
        let mut worker = ctx.spawn(WorkerRole::General, 1);

        // Flood the queue far faster than a level-1 worker drains it.
        for _ in 0..50 {
            worker.update(&[report(10.0, 100.0, PlantStage::Growing)]);
        }
        worker.stop();
        assert_eq!(worker.pending_commands(), 0);
        // Stopping twice is harmless.
        worker.stop();
    }

    #[test]
    fn test_level_is_clamped() {
        let (ctx, _rx) = harness();
        let worker = ctx.spawn(WorkerRole::General, 9);
        assert_eq!(worker.level(), 3);
        let mut worker = ctx.spawn(WorkerRole::General, 0);
        assert_eq!(worker.level(), 1);
        worker.set_level(2);
        assert_eq!(worker.level(), 2);
        worker.set_level(42);
        assert_eq!(worker.level(), 3);
    }
}
