//! Board topology: snake and ladder placement and landing-cell resolution

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::MoveKind;

/// Number of cells on the board. Reaching this cell (or past it) wins.
pub const BOARD_CELLS: u16 = 100;

/// A snake: landing on `head` carries the player down to `tail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub head: u16,
    pub tail: u16,
}

/// A ladder: landing on `bottom` carries the player up to `top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ladder {
    pub bottom: u16,
    pub top: u16,
}

/// The standard snake placement.
const DEFAULT_SNAKES: [Snake; 10] = [
    Snake { head: 99, tail: 78 },
    Snake { head: 95, tail: 75 },
    Snake { head: 92, tail: 88 },
    Snake { head: 87, tail: 24 },
    Snake { head: 64, tail: 60 },
    Snake { head: 62, tail: 19 },
    Snake { head: 56, tail: 53 },
    Snake { head: 49, tail: 11 },
    Snake { head: 47, tail: 26 },
    Snake { head: 16, tail: 6 },
];

/// The standard ladder placement.
const DEFAULT_LADDERS: [Ladder; 9] = [
    Ladder { bottom: 1, top: 38 },
    Ladder { bottom: 4, top: 14 },
    Ladder { bottom: 9, top: 21 },
    Ladder { bottom: 21, top: 42 },
    Ladder { bottom: 28, top: 84 },
    Ladder { bottom: 36, top: 44 },
    Ladder { bottom: 51, top: 67 },
    Ladder { bottom: 71, top: 91 },
    Ladder { bottom: 80, top: 100 },
];

/// Outcome of resolving a landing cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Final resting cell after at most one transport.
    pub cell: u16,
    /// What the landing triggered, if anything.
    pub kind: MoveKind,
}

/// Snake and ladder placement for one game.
///
/// A copy is embedded in every game record at creation, so a record stays
/// self-describing even if the standard layout ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTopology {
    pub snakes: Vec<Snake>,
    pub ladders: Vec<Ladder>,
}

impl BoardTopology {
    /// Build a validated topology.
    ///
    /// Every endpoint must sit on the board, snakes must descend, ladders
    /// must ascend, and no cell may trigger more than one transport. Where a
    /// transport carries the player TO is not restricted; see [`resolve`].
    ///
    /// [`resolve`]: BoardTopology::resolve
    pub fn new(snakes: Vec<Snake>, ladders: Vec<Ladder>) -> Result<Self, TopologyError> {
        let mut triggers: HashSet<u16> = HashSet::new();

        for snake in &snakes {
            for cell in [snake.head, snake.tail] {
                if !(1..=BOARD_CELLS).contains(&cell) {
                    return Err(TopologyError::OffBoard(cell));
                }
            }
            if snake.head <= snake.tail {
                return Err(TopologyError::SnakeDoesNotDescend(snake.head));
            }
            if !triggers.insert(snake.head) {
                return Err(TopologyError::DuplicateTrigger(snake.head));
            }
        }
        for ladder in &ladders {
            for cell in [ladder.bottom, ladder.top] {
                if !(1..=BOARD_CELLS).contains(&cell) {
                    return Err(TopologyError::OffBoard(cell));
                }
            }
            if ladder.top <= ladder.bottom {
                return Err(TopologyError::LadderDoesNotAscend(ladder.bottom));
            }
            if !triggers.insert(ladder.bottom) {
                return Err(TopologyError::DuplicateTrigger(ladder.bottom));
            }
        }

        Ok(Self { snakes, ladders })
    }

    /// Resolve a raw landing cell to its final resting cell.
    ///
    /// At most one transport applies per landing: the cell the player lands
    /// on is checked, the destination is not, so transports never chain. On
    /// the standard board the ladder from 9 tops out on 21, which is itself a
    /// ladder bottom; a player carried there stays on 21 and does not ride on
    /// to 42.
    pub fn resolve(&self, cell: u16) -> Resolved {
        if let Some(snake) = self.snakes.iter().find(|s| s.head == cell) {
            return Resolved { cell: snake.tail, kind: MoveKind::Snake };
        }
        if let Some(ladder) = self.ladders.iter().find(|l| l.bottom == cell) {
            return Resolved { cell: ladder.top, kind: MoveKind::Ladder };
        }
        Resolved { cell, kind: MoveKind::Normal }
    }
}

impl Default for BoardTopology {
    fn default() -> Self {
        Self {
            snakes: DEFAULT_SNAKES.to_vec(),
            ladders: DEFAULT_LADDERS.to_vec(),
        }
    }
}

/// Rejected board layouts.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("cell {0} is off the board")]
    OffBoard(u16),
    #[error("snake with head {0} does not descend")]
    SnakeDoesNotDescend(u16),
    #[error("ladder with bottom {0} does not ascend")]
    LadderDoesNotAscend(u16),
    #[error("cell {0} triggers more than one transport")]
    DuplicateTrigger(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout_is_valid() {
        let board = BoardTopology::default();
        assert_eq!(board.snakes.len(), 10);
        assert_eq!(board.ladders.len(), 9);
        BoardTopology::new(board.snakes, board.ladders).unwrap();
    }

    #[test]
    fn test_plain_cells_resolve_to_themselves() {
        let board = BoardTopology::default();
        for cell in [2, 25, 50, 79, 100] {
            assert_eq!(board.resolve(cell), Resolved { cell, kind: MoveKind::Normal });
        }
    }

    #[test]
    fn test_snake_head_drops_to_tail() {
        let board = BoardTopology::default();
        assert_eq!(board.resolve(99), Resolved { cell: 78, kind: MoveKind::Snake });
        assert_eq!(board.resolve(16), Resolved { cell: 6, kind: MoveKind::Snake });
    }

    #[test]
    fn test_ladder_bottom_climbs_to_top() {
        let board = BoardTopology::default();
        assert_eq!(board.resolve(1), Resolved { cell: 38, kind: MoveKind::Ladder });
        assert_eq!(board.resolve(80), Resolved { cell: 100, kind: MoveKind::Ladder });
    }

    #[test]
    fn test_transports_never_chain() {
        let board = BoardTopology::default();
        // 21 is both the top of the 9-ladder and the bottom of the 21-ladder.
        assert_eq!(board.resolve(21), Resolved { cell: 42, kind: MoveKind::Ladder });
        assert_eq!(board.resolve(9), Resolved { cell: 21, kind: MoveKind::Ladder });
    }

    #[test]
    fn test_snake_tails_are_never_triggers() {
        let board = BoardTopology::default();
        for snake in &board.snakes {
            let landed = board.resolve(snake.tail);
            assert_eq!(landed, Resolved { cell: snake.tail, kind: MoveKind::Normal });
        }
    }

    #[test]
    fn test_rejects_cell_off_board() {
        let err = BoardTopology::new(vec![Snake { head: 101, tail: 50 }], vec![]).unwrap_err();
        assert_eq!(err, TopologyError::OffBoard(101));
        let err = BoardTopology::new(vec![], vec![Ladder { bottom: 0, top: 10 }]).unwrap_err();
        assert_eq!(err, TopologyError::OffBoard(0));
    }

    #[test]
    fn test_rejects_snake_that_does_not_descend() {
        let err = BoardTopology::new(vec![Snake { head: 30, tail: 30 }], vec![]).unwrap_err();
        assert_eq!(err, TopologyError::SnakeDoesNotDescend(30));
    }

    #[test]
    fn test_rejects_ladder_that_does_not_ascend() {
        let err = BoardTopology::new(vec![], vec![Ladder { bottom: 40, top: 12 }]).unwrap_err();
        assert_eq!(err, TopologyError::LadderDoesNotAscend(40));
    }

    #[test]
    fn test_rejects_duplicate_snake_heads() {
        let snakes = vec![Snake { head: 50, tail: 10 }, Snake { head: 50, tail: 20 }];
        let err = BoardTopology::new(snakes, vec![]).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateTrigger(50));
    }

    #[test]
    fn test_rejects_cell_that_is_head_and_bottom() {
        let err = BoardTopology::new(
            vec![Snake { head: 50, tail: 10 }],
            vec![Ladder { bottom: 50, top: 90 }],
        )
        .unwrap_err();
        assert_eq!(err, TopologyError::DuplicateTrigger(50));
    }
}
