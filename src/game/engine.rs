//! Game state machine: owns the game record and its legal transitions

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::store::{EventKind, GameEvent, HistoryRecord, RecordStore, StoreError};

use super::board::{BoardTopology, BOARD_CELLS};
use super::{GameId, MoveKind, PlayerNum};

/// Lifecycle of a game. Runs setup, playing, finished, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Setup,
    Playing,
    Finished,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::Setup => "setup",
            GameStatus::Playing => "playing",
            GameStatus::Finished => "finished",
        })
    }
}

/// Authoritative record of one two-player match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub player1_name: String,
    pub player1_color: String,
    /// 0 means not yet on the board; the board itself is cells 1 to 100.
    pub player1_position: u16,
    pub player2_name: String,
    pub player2_color: String,
    pub player2_position: u16,
    pub current_player: PlayerNum,
    pub status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerNum>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Wall-clock game length in milliseconds, set when the game finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_dice_roll: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_move_type: Option<MoveKind>,
    /// Per-game snapshot of the board layout.
    pub board_topology: BoardTopology,
}

impl Game {
    /// Fresh game in `setup` with both players off the board.
    pub fn new(
        player1_name: &str,
        player1_color: &str,
        player2_name: &str,
        player2_color: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1_name: player1_name.to_string(),
            player1_color: player1_color.to_string(),
            player1_position: 0,
            player2_name: player2_name.to_string(),
            player2_color: player2_color.to_string(),
            player2_position: 0,
            current_player: PlayerNum::One,
            status: GameStatus::Setup,
            winner: None,
            start_time: None,
            end_time: None,
            duration: None,
            last_dice_roll: None,
            last_move_type: None,
            board_topology: BoardTopology::default(),
        }
    }
}

/// Partial update to a game record. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct GamePatch {
    pub player1_position: Option<u16>,
    pub player2_position: Option<u16>,
    pub current_player: Option<PlayerNum>,
    pub status: Option<GameStatus>,
    pub winner: Option<PlayerNum>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<u64>,
    pub last_dice_roll: Option<u8>,
    pub last_move_type: Option<MoveKind>,
}

impl GamePatch {
    /// Copy every set field onto the record.
    pub fn apply(self, game: &mut Game) {
        if let Some(position) = self.player1_position {
            game.player1_position = position;
        }
        if let Some(position) = self.player2_position {
            game.player2_position = position;
        }
        if let Some(player) = self.current_player {
            game.current_player = player;
        }
        if let Some(status) = self.status {
            game.status = status;
        }
        if let Some(winner) = self.winner {
            game.winner = Some(winner);
        }
        if let Some(start_time) = self.start_time {
            game.start_time = Some(start_time);
        }
        if let Some(end_time) = self.end_time {
            game.end_time = Some(end_time);
        }
        if let Some(duration) = self.duration {
            game.duration = Some(duration);
        }
        if let Some(dice) = self.last_dice_roll {
            game.last_dice_roll = Some(dice);
        }
        if let Some(kind) = self.last_move_type {
            game.last_move_type = Some(kind);
        }
    }
}

/// Failures surfaced by the state machine.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Malformed input: bad name, color, or dice range.
    #[error("{0}")]
    Validation(String),
    #[error("game not found: {0}")]
    NotFound(GameId),
    /// The operation is not legal for the game's current status.
    #[error("cannot {action}: game is {current}")]
    InvalidState {
        action: &'static str,
        current: GameStatus,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The state machine over the record store.
///
/// Every operation is a short read-modify-write. The store serializes
/// patches of one record; nothing fences two commands racing on the same
/// game, which turn-taking between the two clients keeps out of real
/// traffic. Event and history appends are separate writes, so a failure
/// between them and the patch can leave a transition unlogged while the
/// game record itself stays correct.
#[derive(Clone)]
pub struct GameEngine {
    store: Arc<dyn RecordStore>,
}

impl GameEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a game in `setup` and return its id.
    ///
    /// The browser form enforces the same rules, but the gateway is open to
    /// any HTTP caller, so names must be non-blank here too and the two
    /// colors non-blank and distinct.
    pub async fn create_game(
        &self,
        player1_name: &str,
        player1_color: &str,
        player2_name: &str,
        player2_color: &str,
    ) -> Result<GameId, GameError> {
        for (label, name) in [("player 1", player1_name), ("player 2", player2_name)] {
            if name.trim().is_empty() {
                return Err(GameError::Validation(format!("{label} name must not be empty")));
            }
        }
        for (label, color) in [("player 1", player1_color), ("player 2", player2_color)] {
            if color.trim().is_empty() {
                return Err(GameError::Validation(format!("{label} color must not be empty")));
            }
        }
        if player1_color == player2_color {
            return Err(GameError::Validation("player colors must differ".to_string()));
        }

        let game = Game::new(player1_name, player1_color, player2_name, player2_color);
        let id = game.id;
        self.store.insert_game(game).await?;

        info!(game_id = %id, player1 = player1_name, player2 = player2_name, "Game created");
        Ok(id)
    }

    /// Move a game from `setup` to `playing` and stamp the clock.
    pub async fn start_game(&self, id: GameId) -> Result<(), GameError> {
        let game = self.require_game(id).await?;
        if game.status != GameStatus::Setup {
            return Err(GameError::InvalidState {
                action: "start",
                current: game.status,
            });
        }

        let start_time = Utc::now();
        let patch = GamePatch {
            status: Some(GameStatus::Playing),
            start_time: Some(start_time),
            ..GamePatch::default()
        };
        self.store.patch_game(id, patch).await?;
        self.store
            .append_event(GameEvent::now(
                id,
                EventKind::GameStart,
                PlayerNum::One,
                json!({ "startTime": start_time.timestamp_millis() }),
            ))
            .await?;

        info!(game_id = %id, "Game started");
        Ok(())
    }

    /// Record the die face shown to the players.
    ///
    /// The resulting position change arrives as a separate `move_player`
    /// command; splitting the two lets the physical die report its reading
    /// before the board commits anything.
    pub async fn record_dice_roll(&self, id: GameId, dice_value: u8) -> Result<(), GameError> {
        if !(1..=6).contains(&dice_value) {
            return Err(GameError::Validation(format!(
                "dice value must be between 1 and 6, got {dice_value}"
            )));
        }
        let game = self.require_playing(id, "record a dice roll").await?;

        let patch = GamePatch {
            last_dice_roll: Some(dice_value),
            ..GamePatch::default()
        };
        self.store.patch_game(id, patch).await?;
        self.store
            .append_event(GameEvent::now(
                id,
                EventKind::DiceRoll,
                game.current_player,
                json!({ "diceValue": dice_value }),
            ))
            .await?;

        info!(game_id = %id, player = %game.current_player, dice_value, "Dice roll recorded");
        Ok(())
    }

    /// Apply a caller-resolved destination for whoever holds the turn.
    ///
    /// Reachability is trusted, not checked: callers roll the die, walk the
    /// token, and resolve any snake or ladder themselves, then report where
    /// the token ended up and what carried it there. The engine enforces
    /// state-machine legality only. The game must be `playing`, the turn
    /// flips exactly once, and a destination at or past the last cell
    /// finishes the game with the mover as winner (stored position capped at
    /// the last cell).
    pub async fn move_player(
        &self,
        id: GameId,
        new_position: u16,
        move_type: Option<MoveKind>,
    ) -> Result<(), GameError> {
        let game = self.require_playing(id, "move a player").await?;

        let mover = game.current_player;
        let move_type = move_type.unwrap_or_default();
        let stored_position = new_position.min(BOARD_CELLS);
        let won = new_position >= BOARD_CELLS;

        let mut patch = GamePatch {
            current_player: Some(mover.other()),
            last_move_type: Some(move_type),
            ..GamePatch::default()
        };
        match mover {
            PlayerNum::One => patch.player1_position = Some(stored_position),
            PlayerNum::Two => patch.player2_position = Some(stored_position),
        }

        if won {
            let end_time = Utc::now();
            let duration = game
                .start_time
                .map(|start| (end_time - start).num_milliseconds().max(0) as u64)
                .unwrap_or(0);
            patch.status = Some(GameStatus::Finished);
            patch.winner = Some(mover);
            patch.end_time = Some(end_time);
            patch.duration = Some(duration);

            self.store
                .append_history(HistoryRecord {
                    game_id: id,
                    player1_name: game.player1_name.clone(),
                    player1_color: game.player1_color.clone(),
                    player2_name: game.player2_name.clone(),
                    player2_color: game.player2_color.clone(),
                    winner: mover,
                    duration,
                    completed_at: end_time,
                })
                .await?;
            self.store
                .append_event(GameEvent::now(
                    id,
                    EventKind::GameEnd,
                    mover,
                    json!({ "winner": mover, "position": stored_position }),
                ))
                .await?;
        }

        self.store.patch_game(id, patch).await?;

        let event_kind = match move_type {
            MoveKind::Normal => EventKind::Move,
            MoveKind::Snake => EventKind::SnakeEncounter,
            MoveKind::Ladder => EventKind::LadderEncounter,
        };
        self.store
            .append_event(GameEvent::now(
                id,
                event_kind,
                mover,
                json!({ "newPosition": stored_position, "moveType": move_type }),
            ))
            .await?;

        if won {
            info!(game_id = %id, winner = %mover, "Game finished");
        } else {
            info!(game_id = %id, player = %mover, position = stored_position, "Player moved");
        }
        Ok(())
    }

    async fn require_game(&self, id: GameId) -> Result<Game, GameError> {
        self.store.get_game(id).await?.ok_or(GameError::NotFound(id))
    }

    /// Load a game that must currently accept play commands.
    async fn require_playing(&self, id: GameId, action: &'static str) -> Result<Game, GameError> {
        let game = self.require_game(id).await?;
        if game.status != GameStatus::Playing {
            return Err(GameError::InvalidState {
                action,
                current: game.status,
            });
        }
        Ok(game)
    }
}
