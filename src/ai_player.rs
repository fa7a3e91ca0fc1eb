use tracing::debug;

use crate::{Action, Cell, Game, SearchMode, minmax};

const CENTER: Action = Action::new(1, 1);

/// Computer player. Plays perfectly, whichever side it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiPlayer {
    mode: SearchMode,
    opening_shortcut: bool,
}

impl AiPlayer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: SearchMode::Sequential,
            opening_shortcut: true,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether to take the center without searching in the first two rounds.
    #[must_use]
    pub const fn with_opening_shortcut(mut self, enabled: bool) -> Self {
        self.opening_shortcut = enabled;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Returns the action for the player to move, or `None` if the game is over.
    #[must_use]
    pub fn search_best_action(&self, game: &Game) -> Option<Action> {
        let board = game.board();

        // Optimization: Take the center when it is still free. Never a losing
        // move in the first two rounds.
        if self.opening_shortcut
            && game.round() < 2
            && board.cell_at(CENTER.row, CENTER.col) == Cell::Empty
        {
            debug!(round = game.round(), "took the center without searching");
            return Some(CENTER);
        }

        let report = match self.mode {
            SearchMode::Sequential => minmax::search(board),
            SearchMode::ParallelRoot => minmax::search_parallel(board),
        }?;
        Some(report.action)
    }
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self::new()
    }
}
