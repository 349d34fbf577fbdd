//! In-memory record store

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::game::{Game, GameId, GamePatch};

use super::records::{GameEvent, HistoryRecord, RecordStore, StoreError};

/// Process-local implementation of the record-store contract.
///
/// A patch runs under the owning map entry's lock, so mutations of one game
/// record are serialized. Event and history appends are separate writes with
/// no transaction tying them to the game patch.
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<GameId, Game>,
    events: DashMap<GameId, Vec<GameEvent>>,
    history: RwLock<Vec<HistoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_game(&self, game: Game) -> Result<(), StoreError> {
        self.games.insert(game.id, game);
        Ok(())
    }

    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        Ok(self.games.get(&id).map(|game| game.clone()))
    }

    async fn patch_game(&self, id: GameId, patch: GamePatch) -> Result<(), StoreError> {
        match self.games.get_mut(&id) {
            Some(mut game) => {
                patch.apply(&mut game);
                Ok(())
            }
            None => Err(StoreError::MissingGame(id)),
        }
    }

    async fn append_event(&self, event: GameEvent) -> Result<(), StoreError> {
        if !self.games.contains_key(&event.game_id) {
            return Err(StoreError::MissingGame(event.game_id));
        }
        self.events.entry(event.game_id).or_default().push(event);
        Ok(())
    }

    async fn recent_events(
        &self,
        game_id: GameId,
        limit: usize,
    ) -> Result<Vec<GameEvent>, StoreError> {
        // Appends happen in causal order and timestamps never decrease within
        // a game, so reverse insertion order is newest-first.
        let events = match self.events.get(&game_id) {
            Some(log) => log.iter().rev().take(limit).cloned().collect(),
            None => Vec::new(),
        };
        Ok(events)
    }

    async fn append_history(&self, record: HistoryRecord) -> Result<(), StoreError> {
        self.history.write().push(record);
        Ok(())
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self.history.read().iter().rev().take(limit).cloned().collect())
    }
}
