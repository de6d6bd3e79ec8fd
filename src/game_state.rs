//! Traits defining the game abstraction consumed by the search.
//!
//! The [`Board`] trait is the only interface the engine needs from a game: it
//! answers questions about opaque state values and produces new states, but
//! never mutates a state in place.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::{MCTSError, Result};

/// Trait for actions that can be taken in a game
///
/// Any cloneable, comparable value works as an action; the blanket
/// implementation covers plain integers, tuples and small structs alike.
pub trait Action: Clone + Debug + PartialEq + Send + Sync {}

impl<T: Clone + Debug + PartialEq + Send + Sync> Action for T {}

/// Trait for player identities
///
/// Players key the outcome map returned by [`Board::points_values`], so they
/// must be hashable.
pub trait Player: Clone + Debug + Eq + Hash + Send + Sync {}

impl<T: Clone + Debug + Eq + Hash + Send + Sync> Player for T {}

/// The game rules, as seen by the search
///
/// A `Board` is a stateless rule book: every method takes the state it is
/// asked about. Implementations must behave as pure functions, calling any
/// method twice with the same arguments must yield equal results.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use duel_mcts::Board;
///
/// /// Take one or two stones; whoever takes the last stone wins.
/// struct Nim;
///
/// #[derive(Clone, Debug)]
/// struct Pile { stones: u8, to_move: u8 }
///
/// impl Board for Nim {
///     type State = Pile;
///     type Action = u8;
///     type Player = u8;
///
///     fn is_ended(&self, state: &Pile) -> bool { state.stones == 0 }
///
///     fn legal_actions(&self, state: &Pile) -> Vec<u8> {
///         (1..=state.stones.min(2)).collect()
///     }
///
///     fn next_state(&self, state: &Pile, take: &u8) -> Pile {
///         Pile { stones: state.stones - take, to_move: 1 - state.to_move }
///     }
///
///     fn current_player(&self, state: &Pile) -> u8 { state.to_move }
///
///     fn points_values(&self, state: &Pile) -> Option<HashMap<u8, f64>> {
///         if !self.is_ended(state) {
///             return None;
///         }
///         // The player who just moved took the last stone.
///         let winner = 1 - state.to_move;
///         Some(HashMap::from([(winner, 1.0), (1 - winner, -1.0)]))
///     }
/// }
/// # let pile = Pile { stones: 3, to_move: 0 };
/// # assert_eq!(Nim.legal_actions(&pile), vec![1, 2]);
/// ```
pub trait Board {
    /// Opaque game state, passed around by value
    type State: Clone;

    /// Moves available to the acting player
    type Action: Action;

    /// Player identities
    type Player: Player;

    /// Returns true if the game is over in this state
    fn is_ended(&self, state: &Self::State) -> bool;

    /// Returns the legal actions in this state
    ///
    /// Must be non-empty for every state where [`Board::is_ended`] is false.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Returns the state reached by applying `action` to `state`
    ///
    /// The input state must not be modified; the search explores many
    /// trajectories from the same state.
    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Returns the player whose turn it is in this state
    fn current_player(&self, state: &Self::State) -> Self::Player;

    /// Returns the outcome value for every player, or `None` if the game
    /// has not ended
    ///
    /// A value of exactly `1.0` denotes a win for that player. Any other value
    /// (draw, loss) is treated the same by the engine.
    fn points_values(&self, state: &Self::State) -> Option<HashMap<Self::Player, f64>>;
}

/// Returns whether `player` won in the terminal `state`
///
/// Evaluating a state that has not ended is a broken precondition in the
/// caller and is reported as [`MCTSError::NotTerminal`].
pub fn is_win<B: Board>(board: &B, state: &B::State, player: &B::Player) -> Result<bool> {
    let outcome = board.points_values(state).ok_or(MCTSError::NotTerminal)?;
    let value = outcome
        .get(player)
        .ok_or_else(|| MCTSError::MissingOutcome(format!("{:?}", player)))?;
    Ok(*value == 1.0)
}

/// Returns the actions a search node for `state` may expand
///
/// Ended states expand nothing. An empty list on a state that has not ended
/// breaks the [`Board`] contract and is reported as
/// [`MCTSError::NoLegalActions`].
pub fn checked_legal_actions<B: Board>(board: &B, state: &B::State) -> Result<Vec<B::Action>> {
    if board.is_ended(state) {
        return Ok(Vec::new());
    }
    let actions = board.legal_actions(state);
    if actions.is_empty() {
        return Err(MCTSError::NoLegalActions);
    }
    Ok(actions)
}
