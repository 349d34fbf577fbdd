//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::GameEngine;
use crate::store::{MemoryStore, RecordStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Handed to query routes directly; the engine holds its own handle.
    pub store: Arc<dyn RecordStore>,
    pub engine: GameEngine,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        // Initialize the record store and wire the engine to it
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let engine = GameEngine::new(store.clone());

        Self {
            config,
            store,
            engine,
        }
    }
}
