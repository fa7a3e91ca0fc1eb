//! Exhaustive minmax search with alpha-beta pruning.
//!
//! X maximizes the utility of the final board, O minimizes it. Tic-tac-toe
//! has at most nine plies, so the search always runs to the end of the game
//! and needs no heuristic evaluation.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{Action, Board, Player};

/// Strictly below every utility.
const MIN_SENTINEL: i32 = -2;
/// Strictly above every utility.
const MAX_SENTINEL: i32 = 2;

/// How the root of the tree is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// One alpha-beta search over the whole tree, see [`search`].
    #[default]
    Sequential,
    /// Each root action on its own thread, see [`search_parallel`].
    ParallelRoot,
}

impl SearchMode {
    /// Name used in log events and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::ParallelRoot => "parallel-root",
        }
    }
}

/// Result of a search from a non-terminal board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    /// Best action for the player to move.
    pub action: Action,
    /// Minmax value of the board after `action`, from the perspective of X.
    pub value: i32,
    /// Boards visited, including the root.
    pub nodes: u64,
    /// Search that produced this report.
    pub mode: SearchMode,
}

/// Value of `board` when X is to move.
fn max_value(board: &Board, mut alpha: i32, beta: i32, nodes: &mut u64) -> i32 {
    *nodes += 1;
    if board.is_terminal() {
        return board.utility();
    }

    let mut value = MIN_SENTINEL;
    for action in board.legal_actions_iter() {
        value = value.max(min_value(&board.with_mark(action), alpha, beta, nodes));
        alpha = alpha.max(value);
        // O will never allow this line
        if beta <= value {
            break;
        }
    }
    value
}

/// Value of `board` when O is to move.
fn min_value(board: &Board, alpha: i32, mut beta: i32, nodes: &mut u64) -> i32 {
    *nodes += 1;
    if board.is_terminal() {
        return board.utility();
    }

    let mut value = MAX_SENTINEL;
    for action in board.legal_actions_iter() {
        value = value.min(max_value(&board.with_mark(action), alpha, beta, nodes));
        beta = beta.min(value);
        if beta <= alpha {
            break;
        }
    }
    value
}

/// Searches the board after `action` from the opponent's side.
fn evaluate_action(board: &Board, action: Action, alpha: i32, beta: i32, nodes: &mut u64) -> i32 {
    let child = board.with_mark(action);
    match board.player_to_move() {
        Player::X => min_value(&child, alpha, beta, nodes),
        Player::O => max_value(&child, alpha, beta, nodes),
    }
}

/// Picks the best `(action, value)` pair for `player`. The first one wins ties.
fn select_best(
    player: Player,
    evaluated: impl IntoIterator<Item = (Action, i32)>,
) -> Option<(Action, i32)> {
    let better_score: fn(i32, i32) -> bool = match player {
        Player::X => |new, best| new > best,
        Player::O => |new, best| new < best,
    };

    evaluated.into_iter().fold(None, |best, (action, value)| match best {
        Some((_, best_value)) if !better_score(value, best_value) => best,
        _ => Some((action, value)),
    })
}

/// Searches the best action for the player to move.
///
/// Root actions are searched in row-major order. The window narrows after
/// each action, so a later action may report only a bound; such an action is
/// never better than the current best and therefore never selected.
///
/// Returns `None` if the board is terminal.
#[must_use]
pub fn search(board: &Board) -> Option<SearchReport> {
    if board.is_terminal() {
        return None;
    }

    let player = board.player_to_move();
    let mut alpha = MIN_SENTINEL;
    let mut beta = MAX_SENTINEL;
    let mut nodes = 1;

    let mut evaluated = Vec::with_capacity(board.free_cells());
    for action in board.legal_actions_iter() {
        let value = evaluate_action(board, action, alpha, beta, &mut nodes);
        trace!(%action, value, "evaluated root action");
        evaluated.push((action, value));

        match player {
            Player::X => alpha = alpha.max(value),
            Player::O => beta = beta.min(value),
        }
    }

    let (action, value) = select_best(player, evaluated)?;
    let mode = SearchMode::Sequential;
    debug!(mode = mode.name(), %player, %action, value, nodes, "search finished");
    Some(SearchReport {
        action,
        value,
        nodes,
        mode,
    })
}

/// Like [`search`], but each root action is searched on its own rayon task.
///
/// Branches don't share their bounds: every branch starts with the full
/// window and reports its exact value. Selection is the same as in
/// [`search`], so both return the same action and value.
#[must_use]
pub fn search_parallel(board: &Board) -> Option<SearchReport> {
    if board.is_terminal() {
        return None;
    }

    let player = board.player_to_move();
    let actions = board.legal_actions_iter().collect::<Vec<_>>();

    // `collect` keeps the order of `actions`
    let evaluated = actions
        .par_iter()
        .map(|&action| {
            let mut nodes = 0;
            let value = evaluate_action(board, action, MIN_SENTINEL, MAX_SENTINEL, &mut nodes);
            trace!(%action, value, nodes, "evaluated root action");
            (action, value, nodes)
        })
        .collect::<Vec<_>>();

    let nodes = 1 + evaluated.iter().map(|&(_, _, nodes)| nodes).sum::<u64>();
    let (action, value) = select_best(
        player,
        evaluated.iter().map(|&(action, value, _)| (action, value)),
    )?;
    let mode = SearchMode::ParallelRoot;
    debug!(mode = mode.name(), %player, %action, value, nodes, "search finished");
    Some(SearchReport {
        action,
        value,
        nodes,
        mode,
    })
}

/// Returns an optimal action for the player to move, or `None` if the game
/// is over.
#[must_use]
pub fn best_action(board: &Board) -> Option<Action> {
    search(board).map(|report| report.action)
}

/// Game-theoretic value of `board` from the perspective of X: the utility
/// reached when both players play perfectly from here.
#[must_use]
pub fn minimax_value(board: &Board) -> i32 {
    search(board).map_or_else(|| board.utility(), |report| report.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn terminal_board_has_no_action() {
        assert_eq!(search(&board("XXX/OO./...")), None);
        assert_eq!(search_parallel(&board("XOX/XOO/OXX")), None);
        assert_eq!(best_action(&board("XX./OOO/X..")), None);
        assert_eq!(minimax_value(&board("XX./OOO/X..")), -1);
    }

    #[test]
    fn takes_immediate_win() {
        let report = search(&board("XX./OO./...")).unwrap();
        assert_eq!(report.action, Action::new(0, 2));
        assert_eq!(report.value, 1);

        let report = search(&board("XX./OO./X..")).unwrap();
        assert_eq!(report.action, Action::new(1, 2));
        assert_eq!(report.value, -1);
    }

    #[test]
    fn blocks_the_opponent() {
        // O to move, X threatens the middle row
        let action = best_action(&board("O../.XX/...")).unwrap();
        assert_eq!(action, Action::new(1, 0));

        // X to move, O threatens the middle column
        let action = best_action(&board("XOX/.O./...")).unwrap();
        assert_eq!(action, Action::new(2, 1));
    }

    #[test]
    fn finds_the_fork() {
        // answering a corner with the opposite corner loses against a second corner
        let report = search(&board("X../.../..O")).unwrap();
        assert_eq!(report.value, 1);
    }

    #[test]
    fn empty_board_is_a_draw() {
        let report = search(&Board::new()).unwrap();
        assert_eq!(report.value, 0);
        assert_eq!(minimax_value(&Board::new()), 0);
    }

    #[test]
    fn pruning_visits_fewer_boards() {
        // every board reachable from the empty board, counted with repetitions
        const FULL_TREE: u64 = 549_946;

        let sequential = search(&Board::new()).unwrap();
        let parallel = search_parallel(&Board::new()).unwrap();
        assert!(sequential.nodes < FULL_TREE);
        assert!(parallel.nodes < FULL_TREE);
    }

    #[test]
    fn parallel_matches_sequential() {
        for b in [
            Board::new(),
            board("X../.../..."),
            board("X../.O./..."),
            board("XO./.X./..."),
            board(".O./.X./X.."),
        ] {
            let sequential = search(&b).unwrap();
            let parallel = search_parallel(&b).unwrap();
            assert_eq!(sequential.action, parallel.action, "{b}");
            assert_eq!(sequential.value, parallel.value, "{b}");
        }
    }

    #[test]
    fn report_names_the_search_mode() {
        let sequential = search(&Board::new()).unwrap();
        let parallel = search_parallel(&Board::new()).unwrap();
        assert_eq!(sequential.mode, SearchMode::Sequential);
        assert_eq!(parallel.mode, SearchMode::ParallelRoot);
        assert_eq!(sequential.mode.name(), "sequential");
        assert_eq!(parallel.mode.name(), "parallel-root");
        assert_eq!(SearchMode::default(), SearchMode::Sequential);
    }

    #[test]
    fn select_best_prefers_first() {
        let evaluated = [
            (Action::new(0, 0), 0),
            (Action::new(0, 1), 1),
            (Action::new(0, 2), 1),
            (Action::new(1, 0), -1),
        ];
        assert_eq!(
            select_best(Player::X, evaluated),
            Some((Action::new(0, 1), 1))
        );
        assert_eq!(
            select_best(Player::O, evaluated),
            Some((Action::new(1, 0), -1))
        );
        assert_eq!(select_best(Player::X, std::iter::empty()), None);
    }
}
