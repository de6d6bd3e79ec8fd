//! # duel-mcts
//!
//! A Monte Carlo Tree Search (MCTS) decision engine for deterministic,
//! perfect-information, turn-based two-player games.
//!
//! Given the current state of a game, the engine grows a search tree through
//! repeated simulated playouts and returns the action that was explored the
//! most once its budget is spent.
//!
//! ## Features
//!
//! - Generic over any game implementing the [`Board`] trait
//! - Two selection strategies: UCB1 and visit-proportional roulette
//! - Pluggable expansion, rollout and backpropagation policies
//! - Seedable randomness for reproducible decisions
//! - Optional wall-clock deadline
//! - Search statistics and tree visualization
//!
//! ## Basic Usage
//!
//! ```
//! use std::collections::HashMap;
//! use duel_mcts::{Board, MCTSConfig, MCTS};
//!
//! /// Players alternately take one or two stones; taking the last one wins.
//! struct Nim;
//!
//! #[derive(Clone, Debug)]
//! struct Pile {
//!     stones: u8,
//!     to_move: u8,
//! }
//!
//! impl Board for Nim {
//!     type State = Pile;
//!     type Action = u8;
//!     type Player = u8;
//!
//!     fn is_ended(&self, state: &Pile) -> bool {
//!         state.stones == 0
//!     }
//!
//!     fn legal_actions(&self, state: &Pile) -> Vec<u8> {
//!         (1..=state.stones.min(2)).collect()
//!     }
//!
//!     fn next_state(&self, state: &Pile, take: &u8) -> Pile {
//!         Pile { stones: state.stones - take, to_move: 1 - state.to_move }
//!     }
//!
//!     fn current_player(&self, state: &Pile) -> u8 {
//!         state.to_move
//!     }
//!
//!     fn points_values(&self, state: &Pile) -> Option<HashMap<u8, f64>> {
//!         if !self.is_ended(state) {
//!             return None;
//!         }
//!         let winner = 1 - state.to_move;
//!         Some(HashMap::from([(winner, 1.0), (1 - winner, -1.0)]))
//!     }
//! }
//!
//! fn main() -> Result<(), duel_mcts::MCTSError> {
//!     let config = MCTSConfig::default()
//!         .with_max_iterations(500)
//!         .with_seed(42);
//!
//!     let mut mcts = MCTS::new(Nim, Pile { stones: 4, to_move: 0 }, config);
//!
//!     // Taking one stone leaves the opponent a losing pile of three.
//!     let best_action = mcts.search()?;
//!     println!("{}", mcts.get_statistics().summary());
//!     assert_eq!(best_action, Some(1));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Each iteration runs four phases:
//!
//! 1. **Selection**: Starting from the root, descend through nodes whose
//!    actions have all been tried, using the selection policy.
//! 2. **Expansion**: Turn one untried action of the node reached into a new
//!    child.
//! 3. **Simulation**: Play the game out from the new child with the rollout
//!    policy.
//! 4. **Backpropagation**: Add one visit, and one win if the player to move at
//!    the root won, to every node from the new child up to the root.
//!
//! After the last iteration the action leading to the most-visited root child
//! is returned.
//!
//! ## Customizing Policies
//!
//! ```
//! # use std::collections::HashMap;
//! # use duel_mcts::Board;
//! # struct Nim;
//! # #[derive(Clone, Debug)]
//! # struct Pile { stones: u8, to_move: u8 }
//! # impl Board for Nim {
//! #     type State = Pile;
//! #     type Action = u8;
//! #     type Player = u8;
//! #     fn is_ended(&self, s: &Pile) -> bool { s.stones == 0 }
//! #     fn legal_actions(&self, s: &Pile) -> Vec<u8> { (1..=s.stones.min(2)).collect() }
//! #     fn next_state(&self, s: &Pile, t: &u8) -> Pile { Pile { stones: s.stones - t, to_move: 1 - s.to_move } }
//! #     fn current_player(&self, s: &Pile) -> u8 { s.to_move }
//! #     fn points_values(&self, s: &Pile) -> Option<HashMap<u8, f64>> {
//! #         if s.stones > 0 { return None; }
//! #         let w = 1 - s.to_move;
//! #         Some(HashMap::from([(w, 1.0), (1 - w, -1.0)]))
//! #     }
//! # }
//! use duel_mcts::{
//!     config::SelectionKind,
//!     policy::simulation::{HeuristicPolicy, MixturePolicy, RandomPolicy},
//!     MCTSConfig, MCTS,
//! };
//!
//! // Greedy rollouts: grab two stones when possible, mixed with random play.
//! let greedy = HeuristicPolicy::new(|_: &Nim, _: &Pile, take: &u8| *take as f64);
//! let rollouts = MixturePolicy::new()
//!     .add_policy(greedy, 0.7)
//!     .add_policy(RandomPolicy::new(), 0.3);
//!
//! let config = MCTSConfig::default()
//!     .with_selection(SelectionKind::VisitProportional)
//!     .with_max_iterations(200);
//!
//! let mut mcts = MCTS::new(Nim, Pile { stones: 5, to_move: 0 }, config)
//!     .with_rollout_policy(rollouts);
//!
//! let action = mcts.search().unwrap();
//! assert!(matches!(action, Some(1) | Some(2)));
//! ```

pub mod config;
pub mod game_state;
pub mod mcts;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;

pub use config::{MCTSConfig, SelectionKind};
pub use game_state::{Action, Board, Player};
pub use mcts::{search, search_with_rollout, ChildStats, MCTS};
pub use policy::{
    BackpropagationPolicy, ExpansionPolicy, RolloutPolicy, SelectionPolicy,
};
pub use stats::SearchStatistics;
pub use tree::{NodeId, SearchNode, SearchTree};

/// Error types for the MCTS algorithm
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MCTSError {
    /// A state that has not ended reported no legal actions
    #[error("No legal actions available from a state that has not ended")]
    NoLegalActions,

    /// Outcome values were requested for a state that has not ended
    #[error("Outcome evaluated on a state that has not ended")]
    NotTerminal,

    /// The outcome map of an ended state has no entry for a player
    #[error("No outcome value for player {0}")]
    MissingOutcome(String),

    /// A rollout policy returned no usable action
    #[error("Rollout policy did not choose one of the legal actions")]
    RolloutPolicyFailed,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MCTSError>;
