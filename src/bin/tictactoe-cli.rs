//! Play tic-tac-toe against the computer on the terminal.

#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::must_use_candidate,
    // clippy::restriction,
    // clippy::pedantic
)]
// now allow a few rules which are denied by the above statement
// --> they are ridiculous and not necessary
#![allow(
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::fallible_impl_from
)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tictactoe_rs::{Action, AiPlayer, Board, Cell, Game, Player, SearchMode};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    X,
    O,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Self::X,
            Side::O => Self::O,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Sequential,
    ParallelRoot,
}

impl From<Mode> for SearchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sequential => Self::Sequential,
            Mode::ParallelRoot => Self::ParallelRoot,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tictactoe-cli", version, about = "Play tic-tac-toe against the computer")]
struct Cli {
    /// Mark of the human player. X always moves first.
    #[arg(long, value_enum, default_value_t = Side::X)]
    human: Side,

    /// How the computer searches for its move.
    #[arg(long, value_enum, default_value_t = Mode::Sequential)]
    mode: Mode,

    /// Search the full tree also in the opening.
    #[arg(long)]
    no_opening_shortcut: bool,

    /// Let the computer play against itself.
    #[arg(long)]
    self_play: bool,

    /// Start from this position, e.g. "X.O/.X./..O".
    #[arg(long)]
    board: Option<Board>,
}

fn print_board(board: &Board) {
    for (row_id, row) in board.cells().iter().enumerate() {
        if row_id > 0 {
            println!("---+---+---");
        }
        let symbols = row
            .iter()
            .enumerate()
            .map(|(col_id, cell)| match cell {
                // cell number as typed by the human
                Cell::Empty => (Action::new(row_id, col_id).index() + 1).to_string(),
                Cell::X => "X".to_string(),
                Cell::O => "O".to_string(),
            })
            .collect::<Vec<_>>();
        println!(" {} ", symbols.join(" | "));
    }
}

/// Asks until the human typed a free cell. Returns `None` on end of input.
fn read_action(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    board: &Board,
) -> Result<Option<Action>> {
    loop {
        {
            print!("Choose your move (cell): ");
            for action in board.legal_actions_iter() {
                print!("{},", action.index() + 1);
            }
            println!();
            io::stdout().flush().context("failed to flush stdout")?;
        }

        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.context("failed to read from stdin")?;

        let action = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|cell| cell.checked_sub(1))
            .and_then(Action::from_index);

        match action {
            Some(action) if board.legal_actions_iter().any(|legal| legal == action) => {
                return Ok(Some(action));
            }
            _ => println!("'{}' is not a free cell.", line.trim()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let ai = AiPlayer::new()
        .with_mode(cli.mode.into())
        .with_opening_shortcut(!cli.no_opening_shortcut);
    let human = (!cli.self_play).then(|| Player::from(cli.human));
    let mut game = cli.board.map_or_else(Game::new, Game::from_board);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Let's play tic-tac-toe against the computer.");
    loop {
        println!("----------------");
        print_board(game.board());
        println!();

        if game.outcome().is_over() {
            break;
        }

        let player = game.board().player_to_move();
        let action = if human == Some(player) {
            let Some(action) = read_action(&mut lines, game.board())? else {
                println!("Bye.");
                return Ok(());
            };
            action
        } else {
            let action = ai
                .search_best_action(&game)
                .context("computer found no move in a running game")?;
            println!("Computer ({player}) chose cell {}", action.index() + 1);
            action
        };

        game.play(action)?;
    }

    match (game.board().winner(), human) {
        (None, _) => println!("Gameover: draw"),
        (Some(winner), Some(human)) if winner == human => println!("You won!"),
        (Some(winner), Some(_)) => println!("Computer ({winner}) won!"),
        (Some(winner), None) => println!("{winner} won!"),
    }

    Ok(())
}
