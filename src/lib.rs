//! An agent for playing the board game 'Gomoku' (five in a row)
//!
//! The board tracks every run of same-owner stones along the four axes as it
//! changes, so a player's heuristic value is always one read away. The solver
//! explores the game tree by playing moves on that single board and taking
//! them back, scoring leaves with those values.
//!
//! # Basic Usage
//!
//! ```
//! use gomoku_ai::{board::Board, players::PlayerId, solver::{choose_move, Variant}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut board = Board::standard();
//! board.place(9, 9, PlayerId(0))?;
//! board.place(10, 10, PlayerId(1))?;
//! board.place(10, 9, PlayerId(0))?;
//!
//! let ((x, y), _value) = choose_move(&mut board, PlayerId(1), 2, Variant::AlphaBeta)?;
//! assert!(board.get_at(x, y).is_none());
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod players;

pub mod geometry;

pub mod move_set;

pub mod group;

pub mod board;

pub mod solver;

pub mod record;


/// The side length of a standard board
pub const BOARD_SIZE: usize = 19;

/// The largest supported side length
pub const MAX_BOARD_SIZE: usize = 63;

/// Stones in a row needed to win
pub const WIN_LENGTH: usize = 5;

/// The most players a board can seat
pub const MAX_PLAYERS: usize = 4;

// ensure a row of the board fits in a u64 for the possible-move set
const_assert!(MAX_BOARD_SIZE < 64);
const_assert!(BOARD_SIZE <= MAX_BOARD_SIZE);
// the value table has to reach past a winning run
const_assert!(WIN_LENGTH < group::RUN_VALUES.len());

pub use board::{Board, BoardError, Piece};
pub use geometry::{Pos, Radius};
pub use players::{PlayerId, Roster};
pub use solver::{choose_move, Scoring, SearchConfig, SearchError, Solver, Variant};
