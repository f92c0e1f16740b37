//! Owns the authoritative in-memory record and fans load/save calls out to
//! registered consumers. Explicitly constructed and passed by handle; there
//! is no ambient global instance.
//!
//! All operations are synchronous and single-threaded. The autosave timer
//! is tick-driven from the owner's control loop, so a save can never
//! overlap a prior still-running save.

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::data::GameData;
use crate::engine::{FileDataHandler, PersistError};

/// Capability implemented by anything that reads from or writes into the
/// persisted record. Consumers are registered explicitly, in order; there
/// is no runtime discovery.
pub trait DataPersistence {
    fn load_data(&mut self, data: &GameData);
    fn save_data(&self, data: &mut GameData);
}

pub struct PersistenceManager {
    handler: FileDataHandler,
    game_data: GameData,
    consumers: Vec<Box<dyn DataPersistence>>,
}

impl PersistenceManager {
    pub fn new(handler: FileDataHandler) -> Self {
        Self {
            handler,
            game_data: GameData::default(),
            consumers: Vec::new(),
        }
    }

    pub fn register(&mut self, consumer: Box<dyn DataPersistence>) {
        self.consumers.push(consumer);
    }

    pub fn game_data(&self) -> &GameData {
        &self.game_data
    }

    pub fn handler(&self) -> &FileDataHandler {
        &self.handler
    }

    pub fn new_game(&mut self) {
        self.game_data = GameData::default();
    }

    /// Loads the record from disk and pushes it to every consumer. An
    /// absent or unrecoverable save degrades to a fresh default record.
    pub fn load_game(&mut self) {
        match self.handler.load() {
            Some(data) => {
                self.game_data = data;
                for consumer in &mut self.consumers {
                    consumer.load_data(&self.game_data);
                }
            }
            None => {
                info!("no save data found; starting a new game");
                self.new_game();
            }
        }
    }

    /// Collects state from every consumer, stamps the record, and commits
    /// it through the engine. A failed save leaves the previous on-disk
    /// state intact and surfaces the error to the caller.
    pub fn save_game(&mut self) -> Result<(), PersistError> {
        for consumer in &self.consumers {
            consumer.save_data(&mut self.game_data);
        }

        self.game_data.stamp_last_updated();
        self.handler.save(&self.game_data)
    }
}

/// Fires a save when at least `interval` has elapsed since the last one.
/// The interval is measured from the end of each save, so ticks arriving
/// while a save would still be due cannot stack up.
pub struct AutosaveTimer {
    interval: Duration,
    last_save: Instant,
}

impl AutosaveTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_save: Instant::now(),
        }
    }

    /// Returns true if an autosave was attempted on this tick.
    pub fn tick(&mut self, manager: &mut PersistenceManager) -> bool {
        if self.last_save.elapsed() < self.interval {
            return false;
        }

        if let Err(e) = manager.save_game() {
            warn!("autosave failed: {e}");
        } else {
            info!("autosave complete");
        }
        self.last_save = Instant::now();
        true
    }
}
