//! Tic-Tac-Toe example for the MCTS algorithm
//!
//! Two engines play each other: X searches with the confidence bound, O with
//! visit-proportional selection. Run with `RUST_LOG=debug` to see the
//! engine's own log lines.

use std::collections::HashMap;
use std::fmt;

use duel_mcts::{config::SelectionKind, Board, MCTSConfig, MCTS};

fn main() {
    // Initialize logging
    env_logger::init();

    println!("MCTS Tic-Tac-Toe Example");
    println!("========================");
    println!();

    let mut game = Grid::new();

    while !TicTacToe.is_ended(&game) {
        println!("{}", game);

        let selection = match game.to_move {
            Mark::X => SelectionKind::ConfidenceBound,
            Mark::O => SelectionKind::VisitProportional,
        };
        let config = MCTSConfig::default()
            .with_max_iterations(5_000)
            .with_selection(selection);

        println!("{:?} is thinking ({:?})...", game.to_move, selection);

        let mut mcts = MCTS::new(TicTacToe, game.clone(), config);
        match mcts.search() {
            Ok(Some(index)) => {
                println!(
                    "{:?} chooses: {} (row {}, col {})",
                    game.to_move,
                    index,
                    index / 3,
                    index % 3
                );
                for child in mcts.root_child_stats() {
                    println!(
                        "  cell {}: {} visits, {} wins",
                        child.action, child.visits, child.wins
                    );
                }
                println!("{}", mcts.get_statistics().summary());
                println!();

                game = TicTacToe.next_state(&game, &index);
            }
            Ok(None) => break,
            Err(e) => {
                println!("Error: {}", e);
                break;
            }
        }
    }

    println!("{}", game);

    match game.winner() {
        Some(winner) => println!("Player {:?} wins!", winner),
        None => println!("The game is a draw!"),
    }
}

/// Players in Tic-Tac-Toe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Mark {
    X,
    O,
}

impl Mark {
    fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Tic-Tac-Toe position
#[derive(Clone)]
struct Grid {
    /// Cells 0-8, row by row
    cells: [Option<Mark>; 9],

    to_move: Mark,
}

impl Grid {
    fn new() -> Self {
        Grid {
            cells: [None; 9],
            to_move: Mark::X,
        }
    }

    fn winner(&self) -> Option<Mark> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            [0, 4, 8],
            [2, 4, 6],
        ];

        LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.cells[a]?;
            (self.cells[b] == Some(mark) && self.cells[c] == Some(mark)).then_some(mark)
        })
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// The rules; moves are cell indices
struct TicTacToe;

impl Board for TicTacToe {
    type State = Grid;
    type Action = usize;
    type Player = Mark;

    fn is_ended(&self, grid: &Grid) -> bool {
        grid.winner().is_some() || grid.is_full()
    }

    fn legal_actions(&self, grid: &Grid) -> Vec<usize> {
        (0..9).filter(|&i| grid.cells[i].is_none()).collect()
    }

    fn next_state(&self, grid: &Grid, index: &usize) -> Grid {
        let mut next = grid.clone();
        next.cells[*index] = Some(grid.to_move);
        next.to_move = grid.to_move.other();
        next
    }

    fn current_player(&self, grid: &Grid) -> Mark {
        grid.to_move
    }

    fn points_values(&self, grid: &Grid) -> Option<HashMap<Mark, f64>> {
        if !self.is_ended(grid) {
            return None;
        }

        let points = match grid.winner() {
            Some(winner) => HashMap::from([(winner, 1.0), (winner.other(), -1.0)]),
            None => HashMap::from([(Mark::X, 0.0), (Mark::O, 0.0)]),
        };
        Some(points)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2")?;
        for row in 0..3 {
            write!(f, "{} ", row)?;
            for col in 0..3 {
                let symbol = match self.cells[row * 3 + col] {
                    Some(Mark::X) => "X",
                    Some(Mark::O) => "O",
                    None => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nPlayer {:?}'s turn", self.to_move)?;
        Ok(())
    }
}
