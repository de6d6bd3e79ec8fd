//! Rollout policies for the MCTS algorithm
//!
//! A rollout plays a simulated game from a leaf state to the end. The policy
//! only decides which legal action to play at each ply; the [`rollout`]
//! function drives the loop.

use std::marker::PhantomData;

use rand::{seq::IteratorRandom, Rng, RngCore};

use crate::{
    game_state::{checked_legal_actions, Board},
    MCTSError, Result,
};

/// Trait for policies that pick moves during a rollout
pub trait RolloutPolicy<B: Board>: Send + Sync {
    /// Returns the index into `legal_actions` of the action to play
    ///
    /// `legal_actions` is never empty. Returning `None`, or an index out of
    /// range, aborts the search with [`MCTSError::RolloutPolicyFailed`].
    fn choose_action(
        &self,
        board: &B,
        state: &B::State,
        legal_actions: &[B::Action],
        rng: &mut dyn RngCore,
    ) -> Option<usize>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn RolloutPolicy<B>>;
}

/// Terminal state reached by a rollout
#[derive(Debug, Clone)]
pub struct RolloutOutcome<S> {
    /// The ended state
    pub state: S,

    /// Number of actions played to get there
    pub plies: usize,
}

/// Plays `state` out to the end of the game using `policy`
///
/// Termination relies on the board never producing an endless game. A state
/// that is already over is returned as is, without consulting the policy.
pub fn rollout<B, P>(
    board: &B,
    state: B::State,
    policy: &P,
    rng: &mut dyn RngCore,
) -> Result<RolloutOutcome<B::State>>
where
    B: Board,
    P: RolloutPolicy<B> + ?Sized,
{
    let mut state = state;
    let mut plies = 0;

    while !board.is_ended(&state) {
        let legal_actions = checked_legal_actions(board, &state)?;
        let action = policy
            .choose_action(board, &state, &legal_actions, rng)
            .and_then(|i| legal_actions.get(i))
            .ok_or(MCTSError::RolloutPolicyFailed)?;
        state = board.next_state(&state, action);
        plies += 1;
    }

    Ok(RolloutOutcome { state, plies })
}

/// Random rollout policy
///
/// Plays a uniformly random legal action at every ply.
#[derive(Debug, Clone, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl<B: Board + 'static> RolloutPolicy<B> for RandomPolicy {
    fn choose_action(
        &self,
        _board: &B,
        _state: &B::State,
        legal_actions: &[B::Action],
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        (0..legal_actions.len()).choose(rng)
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy<B>> {
        Box::new(self.clone())
    }
}

/// Heuristic rollout policy
///
/// Scores every legal action with a user function and plays the best one.
/// Ties go to the action listed first.
///
/// ```
/// # use std::collections::HashMap;
/// # use duel_mcts::Board;
/// # struct Line;
/// # impl Board for Line {
/// #     type State = i32;
/// #     type Action = i32;
/// #     type Player = u8;
/// #     fn is_ended(&self, s: &i32) -> bool { s.abs() >= 3 }
/// #     fn legal_actions(&self, _: &i32) -> Vec<i32> { vec![-1, 1] }
/// #     fn next_state(&self, s: &i32, a: &i32) -> i32 { s + a }
/// #     fn current_player(&self, _: &i32) -> u8 { 0 }
/// #     fn points_values(&self, s: &i32) -> Option<HashMap<u8, f64>> {
/// #         self.is_ended(s).then(|| HashMap::from([(0, if *s > 0 { 1.0 } else { 0.0 })]))
/// #     }
/// # }
/// use duel_mcts::policy::simulation::{rollout, HeuristicPolicy};
///
/// // Always step right.
/// let policy = HeuristicPolicy::new(|_: &Line, _: &i32, step: &i32| *step as f64);
/// let mut rng = rand::thread_rng();
/// let outcome = rollout(&Line, 0, &policy, &mut rng).unwrap();
/// assert_eq!(outcome.state, 3);
/// assert_eq!(outcome.plies, 3);
/// ```
pub struct HeuristicPolicy<F, B> {
    heuristic: F,
    _board: PhantomData<fn(&B)>,
}

impl<F, B> HeuristicPolicy<F, B>
where
    F: Fn(&B, &B::State, &B::Action) -> f64 + Clone + Send + Sync + 'static,
    B: Board + 'static,
{
    /// Creates a new heuristic policy with the given scoring function
    pub fn new(heuristic: F) -> Self {
        HeuristicPolicy {
            heuristic,
            _board: PhantomData,
        }
    }
}

impl<F: Clone, B> Clone for HeuristicPolicy<F, B> {
    fn clone(&self) -> Self {
        HeuristicPolicy {
            heuristic: self.heuristic.clone(),
            _board: PhantomData,
        }
    }
}

impl<F, B> RolloutPolicy<B> for HeuristicPolicy<F, B>
where
    F: Fn(&B, &B::State, &B::Action) -> f64 + Clone + Send + Sync + 'static,
    B: Board + 'static,
{
    fn choose_action(
        &self,
        board: &B,
        state: &B::State,
        legal_actions: &[B::Action],
        _rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;

        for (i, action) in legal_actions.iter().enumerate() {
            let score = (self.heuristic)(board, state, action);
            if best.is_none() || score > best_score {
                best = Some(i);
                best_score = score;
            }
        }

        best
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy<B>> {
        Box::new(self.clone())
    }
}

/// Mixture rollout policy
///
/// At every ply one of the registered policies is drawn with probability
/// proportional to its weight and makes the move. With no policies
/// registered it behaves like [`RandomPolicy`].
pub struct MixturePolicy<B: Board> {
    policies: Vec<(Box<dyn RolloutPolicy<B>>, f64)>,
}

impl<B: Board> std::fmt::Debug for MixturePolicy<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixturePolicy")
            .field("policies_count", &self.policies.len())
            .finish()
    }
}

impl<B: Board> Clone for MixturePolicy<B> {
    fn clone(&self) -> Self {
        MixturePolicy {
            policies: self
                .policies
                .iter()
                .map(|(policy, weight)| (policy.clone_box(), *weight))
                .collect(),
        }
    }
}

impl<B: Board + 'static> MixturePolicy<B> {
    /// Creates a new, empty mixture
    pub fn new() -> Self {
        MixturePolicy {
            policies: Vec::new(),
        }
    }

    /// Adds a policy with the given weight
    ///
    /// Weights that are not positive and finite never get drawn.
    pub fn add_policy<P: RolloutPolicy<B> + 'static>(mut self, policy: P, weight: f64) -> Self {
        self.policies.push((Box::new(policy), weight));
        self
    }

    /// Number of registered policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    fn draw(&self, rng: &mut dyn RngCore) -> Option<&dyn RolloutPolicy<B>> {
        let usable = |w: f64| w.is_finite() && w > 0.0;
        let total: f64 = self
            .policies
            .iter()
            .map(|(_, w)| *w)
            .filter(|w| usable(*w))
            .sum();
        if total <= 0.0 {
            return None;
        }

        let r: f64 = rng.gen_range(0.0..total);
        let mut cumulative = 0.0;
        let mut last = None;
        for (policy, weight) in self.policies.iter().filter(|(_, w)| usable(*w)) {
            cumulative += weight;
            last = Some(&**policy);
            if r < cumulative {
                return last;
            }
        }

        last
    }
}

impl<B: Board + 'static> Default for MixturePolicy<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Board + 'static> RolloutPolicy<B> for MixturePolicy<B> {
    fn choose_action(
        &self,
        board: &B,
        state: &B::State,
        legal_actions: &[B::Action],
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        match self.draw(rng) {
            Some(policy) => policy.choose_action(board, state, legal_actions, rng),
            None => RandomPolicy.choose_action(board, state, legal_actions, rng),
        }
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy<B>> {
        Box::new(self.clone())
    }
}

// Implement RolloutPolicy for Box<dyn RolloutPolicy>
impl<B: Board> RolloutPolicy<B> for Box<dyn RolloutPolicy<B>> {
    fn choose_action(
        &self,
        board: &B,
        state: &B::State,
        legal_actions: &[B::Action],
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        (**self).choose_action(board, state, legal_actions, rng)
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy<B>> {
        (**self).clone_box()
    }
}
