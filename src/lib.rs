//! Tic-tac-toe with a computer player that never loses.
//!
//! The computer runs an exhaustive minmax search with alpha-beta pruning,
//! see [`minmax`]. Boards are plain `Copy` values; every move produces a new
//! board and the player to move is always derived from the marks on it.
//!
//! ```
//! use tictactoe_rs::{Board, Outcome, best_action};
//!
//! let mut board = Board::new();
//! while let Some(action) = best_action(&board) {
//!     board = board.apply_action(action).unwrap();
//! }
//! assert_eq!(board.outcome(), Outcome::Draw);
//! ```

pub mod ai_player;
pub mod game;
pub mod minmax;

pub use ai_player::AiPlayer;
pub use game::{Action, Board, Cell, Game, InvalidAction, Outcome, ParseBoardError, Player};
pub use minmax::{SearchMode, SearchReport, best_action};
