//! Record-store contract and the record types that travel through it

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{Game, GameId, GamePatch, PlayerNum};

/// Classification of a logged transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    GameStart,
    DiceRoll,
    Move,
    SnakeEncounter,
    LadderEncounter,
    GameEnd,
}

/// One immutable entry in a game's event log.
///
/// Events exist for audit and UI animation. They are never replayed to
/// rebuild state; the game record stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub game_id: GameId,
    pub event_type: EventKind,
    /// The seat the transition is attributed to.
    pub player: PlayerNum,
    /// Kind-specific payload, e.g. `{"diceValue": 4}` for a dice roll.
    pub data: serde_json::Value,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    /// Stamp a new event with the current wall-clock time.
    pub fn now(
        game_id: GameId,
        event_type: EventKind,
        player: PlayerNum,
        data: serde_json::Value,
    ) -> Self {
        Self {
            game_id,
            event_type,
            player,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Write-once summary of a completed game. No update or delete path exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub game_id: GameId,
    pub player1_name: String,
    pub player1_color: String,
    pub player2_name: String,
    pub player2_color: String,
    pub winner: PlayerNum,
    /// Wall-clock game length in milliseconds.
    pub duration: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub completed_at: DateTime<Utc>,
}

/// Storage failures surfaced through the record-store contract.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("game record {0} does not exist")]
    MissingGame(GameId),
}

/// Keyed game records plus two append-only logs, the shape the engine is
/// written against.
///
/// Implementations must apply each [`GamePatch`] atomically with respect to
/// other patches of the same record. Nothing here orders two commands racing
/// on the same game; turn-taking between the two clients keeps real traffic
/// serial, and a lost race costs one overwritten field, not a corrupt record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a freshly created game under its id.
    async fn insert_game(&self, game: Game) -> Result<(), StoreError>;

    /// Fetch a game record, `None` if the id is unknown.
    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError>;

    /// Apply a partial update to one game record.
    async fn patch_game(&self, id: GameId, patch: GamePatch) -> Result<(), StoreError>;

    /// Append to the event log of an existing game.
    async fn append_event(&self, event: GameEvent) -> Result<(), StoreError>;

    /// Up to `limit` events for one game, newest first. Unknown ids yield an
    /// empty list rather than an error.
    async fn recent_events(&self, game_id: GameId, limit: usize)
        -> Result<Vec<GameEvent>, StoreError>;

    /// Archive a finished game.
    async fn append_history(&self, record: HistoryRecord) -> Result<(), StoreError>;

    /// Up to `limit` archived games, most recently completed first.
    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError>;
}
