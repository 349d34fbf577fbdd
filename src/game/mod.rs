//! Game rules and state transitions

pub mod board;
pub mod engine;

pub use board::{BoardTopology, Ladder, Resolved, Snake};
pub use engine::{Game, GameEngine, GameError, GamePatch, GameStatus};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a game record. Opaque to clients.
pub type GameId = Uuid;

/// Player seat number. Serialized as the bare number 1 or 2 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerNum {
    One = 1,
    Two = 2,
}

impl PlayerNum {
    /// The other seat, whose turn comes after this player's move.
    pub fn other(self) -> Self {
        match self {
            PlayerNum::One => PlayerNum::Two,
            PlayerNum::Two => PlayerNum::One,
        }
    }
}

impl From<PlayerNum> for u8 {
    fn from(player: PlayerNum) -> u8 {
        player as u8
    }
}

impl TryFrom<u8> for PlayerNum {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(PlayerNum::One),
            2 => Ok(PlayerNum::Two),
            _ => Err(format!("player number must be 1 or 2, got {n}")),
        }
    }
}

impl fmt::Display for PlayerNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// How a move landed: plain, down a snake, or up a ladder.
///
/// Clients resolve transports before issuing a move command, so this is a
/// claim made by the caller, stored and logged as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Normal,
    Snake,
    Ladder,
}

impl Default for MoveKind {
    fn default() -> Self {
        Self::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_num_wire_format() {
        assert_eq!(serde_json::to_string(&PlayerNum::One).unwrap(), "1");
        assert_eq!(serde_json::to_string(&PlayerNum::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<PlayerNum>("2").unwrap(), PlayerNum::Two);
        assert!(serde_json::from_str::<PlayerNum>("3").is_err());
        assert!(serde_json::from_str::<PlayerNum>("0").is_err());
    }

    #[test]
    fn test_other_seat_alternates() {
        assert_eq!(PlayerNum::One.other(), PlayerNum::Two);
        assert_eq!(PlayerNum::Two.other(), PlayerNum::One);
    }

    #[test]
    fn test_move_kind_wire_format() {
        assert_eq!(serde_json::to_string(&MoveKind::Normal).unwrap(), "\"normal\"");
        assert_eq!(serde_json::to_string(&MoveKind::Snake).unwrap(), "\"snake\"");
        assert_eq!(serde_json::to_string(&MoveKind::Ladder).unwrap(), "\"ladder\"");
    }
}
