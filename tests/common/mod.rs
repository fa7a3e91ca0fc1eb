//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use tictactoe_rs::{Board, Player};

/// Every board reachable from the empty board by legal play, terminal boards included.
pub fn reachable_boards() -> HashSet<Board> {
    fn visit(board: Board, seen: &mut HashSet<Board>) {
        if !seen.insert(board) || board.is_terminal() {
            return;
        }
        for action in board.legal_actions_iter() {
            visit(board.apply_action(action).unwrap(), seen);
        }
    }

    let mut seen = HashSet::new();
    visit(Board::new(), &mut seen);
    seen
}

/// Plain minmax without pruning, memoized per board. Reference for the real search.
pub fn reference_value(board: &Board, memo: &mut HashMap<Board, i32>) -> i32 {
    if let Some(&value) = memo.get(board) {
        return value;
    }

    let value = if board.is_terminal() {
        board.utility()
    } else {
        let values = board
            .legal_actions_iter()
            .map(|action| reference_value(&board.apply_action(action).unwrap(), memo))
            .collect::<Vec<_>>();
        match board.player_to_move() {
            Player::X => values.into_iter().max().unwrap(),
            Player::O => values.into_iter().min().unwrap(),
        }
    };

    memo.insert(*board, value);
    value
}
