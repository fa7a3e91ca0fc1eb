//! Game logic and game board.

use core::fmt::{self, Formatter};
use core::str::FromStr;
use std::collections::HashSet;

use thiserror::Error;

/// Width and height of the board.
pub const SIZE: usize = 3;

/// Number of cells on the board.
pub const CELLS: usize = SIZE * SIZE;

/// Every line that wins the game: three rows, three columns and both diagonals.
const LINES: [[(usize, usize); SIZE]; 8] = [
    // rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A move that can't be played.
#[derive(Debug, Error, PartialOrd, PartialEq, Clone, Copy, Eq)]
pub enum InvalidAction {
    #[error("invalid action: ({row}, {col}) is outside of the board")]
    OutOfRange { row: usize, col: usize },
    #[error("invalid action: ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
    /// Only reported by [`Game::play`]; a bare [`Board`] doesn't track whether it is over.
    #[error("invalid action: the game is already over")]
    GameOver,
}

/// A textual board could not be parsed.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseBoardError {
    #[error("expected {expected} cells, got {got}")]
    CellCount { expected: usize, got: usize },
    #[error("invalid character '{character}' at cell {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("invalid piece counts: X={x_count}, O={o_count} (must be equal or X ahead by 1)")]
    PieceCounts { x_count: usize, o_count: usize },
    #[error("both players have a complete line")]
    BothWin,
    #[error("{winner} has a complete line but did not move last (X={x_count}, O={o_count})")]
    WinnerNotLast {
        winner: Player,
        x_count: usize,
        o_count: usize,
    },
}

#[derive(Copy, Clone, PartialOrd, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    /// Always moves first.
    X,
    O,
}

impl Player {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// The mark this player puts on the board.
    #[must_use]
    pub const fn mark(self) -> Cell {
        match self {
            Self::X => Cell::X,
            Self::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mark().to_char())
    }
}

#[derive(Copy, Clone, PartialOrd, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Returns the player owning the cell, if any.
    #[must_use]
    pub const fn player(self) -> Option<Player> {
        match self {
            Self::Empty => None,
            Self::X => Some(Player::X),
            Self::O => Some(Player::O),
        }
    }

    const fn to_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::X => 'X',
            Self::O => 'O',
        }
    }

    const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | '_' | '-' => Some(Self::Empty),
            'X' | 'x' => Some(Self::X),
            'O' | 'o' => Some(Self::O),
            _ => None,
        }
    }
}

/// Coordinates of the cell to mark. Rows and columns are zero-indexed,
/// `(row=0,col=0)` is the top left cell.
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Creates the action from a row-major cell index in `0..9`.
    ///
    /// Returns `None` if the index is outside of the board.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < CELLS {
            Some(Self::new(index / SIZE, index % SIZE))
        } else {
            None
        }
    }

    /// Row-major index of the cell.
    #[must_use]
    pub const fn index(self) -> usize {
        self.row * SIZE + self.col
    }

    const fn in_range(self) -> bool {
        self.row < SIZE && self.col < SIZE
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of the game, derived from a board.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, Hash)]
pub enum Outcome {
    /// Game continues.
    InProgress,
    XWins,
    OWins,
    /// The board is full without a winner.
    Draw,
}

impl Outcome {
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::XWins => Some(Player::X),
            Self::OWins => Some(Player::O),
            Self::InProgress | Self::Draw => None,
        }
    }

    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Tic-tac-toe board.
///
/// Boards are plain values: every transition returns a new board and leaves
/// the old one untouched. The player to move is always derived from the
/// cells and never stored.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, Hash)]
pub struct Board(
    /*
     * Board: rows --> col --> cell
     * (row=0,col=0) <==> top left of game board
     */
    [[Cell; SIZE]; SIZE],
);

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The empty starting board.
    #[must_use]
    pub const fn new() -> Self {
        Self([[Cell::Empty; SIZE]; SIZE])
    }

    /// Creates a board from raw cells.
    ///
    /// The cells are not checked: callers are responsible for passing a board
    /// that is reachable by alternating moves.
    #[must_use]
    pub const fn from_cells(cells: [[Cell; SIZE]; SIZE]) -> Self {
        Self(cells)
    }

    #[must_use]
    pub const fn cells(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.0
    }

    /// Returns the cell at the given position.
    ///
    /// # Panics
    /// If `row` or `col` is outside of `0..3`.
    #[must_use]
    pub const fn cell_at(&self, row: usize, col: usize) -> Cell {
        self.0[row][col]
    }

    fn count(&self, cell: Cell) -> usize {
        self.0.iter().flatten().filter(|&&c| c == cell).count()
    }

    /// Returns the player whose turn it is. X moves whenever both players
    /// have the same number of marks on the board.
    #[must_use]
    pub fn player_to_move(&self) -> Player {
        if self.count(Cell::X) == self.count(Cell::O) {
            Player::X
        } else {
            Player::O
        }
    }

    /// Emits all legal actions in row-major order.
    pub fn legal_actions_iter(&self) -> impl Iterator<Item = Action> {
        (0..CELLS)
            .filter_map(Action::from_index)
            .filter(move |action| self.0[action.row][action.col] == Cell::Empty)
    }

    /// Returns the set of all legal actions. Empty for a full board.
    #[must_use]
    pub fn legal_actions(&self) -> HashSet<Action> {
        self.legal_actions_iter().collect()
    }

    /// Returns the number of empty cells.
    #[must_use]
    pub fn free_cells(&self) -> usize {
        self.count(Cell::Empty)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free_cells() == 0
    }

    /// Returns the board after the player to move marked the cell of `action`.
    pub fn apply_action(&self, action: Action) -> Result<Self, InvalidAction> {
        let Action { row, col } = action;
        if !action.in_range() {
            return Err(InvalidAction::OutOfRange { row, col });
        }
        if self.0[row][col] != Cell::Empty {
            return Err(InvalidAction::Occupied { row, col });
        }
        Ok(self.with_mark(action))
    }

    /// Infallible transition for actions that come from [`Self::legal_actions_iter`].
    pub(crate) fn with_mark(&self, action: Action) -> Self {
        debug_assert_eq!(self.0[action.row][action.col], Cell::Empty);

        let mut next = *self;
        next.0[action.row][action.col] = self.player_to_move().mark();
        next
    }

    fn has_line(&self, player: Player) -> bool {
        let mark = player.mark();
        LINES
            .iter()
            .any(|line| line.iter().all(|&(row, col)| self.0[row][col] == mark))
    }

    /// Returns the winner, if a player completed a line.
    ///
    /// A reachable board has at most one winner, so the first complete line
    /// decides.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        for [a, b, c] in LINES {
            let cell = self.0[a.0][a.1];
            if cell != Cell::Empty && cell == self.0[b.0][b.1] && cell == self.0[c.0][c.1] {
                return cell.player();
            }
        }
        None
    }

    /// Returns whether the game is over, i.e., someone won or the board is full.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Score of a terminal board from the perspective of X: `1` if X won,
    /// `-1` if O won, `0` otherwise.
    #[must_use]
    pub fn utility(&self) -> i32 {
        match self.winner() {
            Some(Player::X) => 1,
            Some(Player::O) => -1,
            None => 0,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some(Player::X) => Outcome::XWins,
            Some(Player::O) => Outcome::OWins,
            None if self.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses nine cells in row-major order. Whitespace, `/` and `|` are
    /// ignored, so `"XO./.X./..O"` and the [`Display`](fmt::Display) output
    /// both parse. Boards that can't come up in a game are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
            .collect::<Vec<_>>();

        if chars.len() != CELLS {
            return Err(ParseBoardError::CellCount {
                expected: CELLS,
                got: chars.len(),
            });
        }

        let mut board = Self::new();
        for (position, &character) in chars.iter().enumerate() {
            let cell = Cell::from_char(character).ok_or(ParseBoardError::InvalidCharacter {
                character,
                position,
            })?;
            board.0[position / SIZE][position % SIZE] = cell;
        }

        let x_count = board.count(Cell::X);
        let o_count = board.count(Cell::O);
        if x_count != o_count && x_count != o_count + 1 {
            return Err(ParseBoardError::PieceCounts { x_count, o_count });
        }

        // the game stops at the first line, so only the last mover can have one
        let winner = match (board.has_line(Player::X), board.has_line(Player::O)) {
            (true, true) => return Err(ParseBoardError::BothWin),
            (true, false) => Some(Player::X),
            (false, true) => Some(Player::O),
            (false, false) => None,
        };
        if let Some(winner) = winner.filter(|&winner| winner == board.player_to_move()) {
            return Err(ParseBoardError::WinnerNotLast {
                winner,
                x_count,
                o_count,
            });
        }

        Ok(board)
    }
}

/// Game with all its state. Owned by whoever drives the game loop.
#[derive(Debug, PartialOrd, PartialEq, Clone, Eq)]
pub struct Game {
    board: Board,
    round: usize,
}

impl Game {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            board: Board::new(),
            round: 0,
        }
    }

    /// Continues a game from the given position.
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        let round = CELLS - board.free_cells();
        Self { board, round }
    }

    /// Plays `action` for the player to move and returns the new state of the game.
    pub fn play(&mut self, action: Action) -> Result<Outcome, InvalidAction> {
        if self.board.is_terminal() {
            return Err(InvalidAction::GameOver);
        }
        self.board = self.board.apply_action(action)?;
        self.round += 1;
        Ok(self.board.outcome())
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn round(&self) -> usize {
        self.round
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
