//! Configuration options for the MCTS algorithm
//!
//! This module defines the configuration parameters that control the
//! behavior of the MCTS algorithm.

use std::time::Duration;

use crate::{MCTSError, Result};

/// Which selection strategy the search descends with
///
/// The final move is always the most-visited root child; this only changes
/// how the tree is grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKind {
    /// Upper confidence bound (UCB1), see
    /// [`UCB1Policy`](crate::policy::selection::UCB1Policy)
    ///
    /// Deterministic given the statistics; tries every child once before
    /// revisiting any.
    #[default]
    ConfidenceBound,

    /// Random pick weighted by visit counts, see
    /// [`VisitProportionalPolicy`](crate::policy::selection::VisitProportionalPolicy)
    ///
    /// Reinforces whatever has been visited most so far.
    VisitProportional,
}

/// Configuration for the MCTS algorithm
///
/// Use the builder methods to create a customized configuration. The rollout
/// policy is set on the searcher itself with
/// [`MCTS::with_rollout_policy`](crate::MCTS::with_rollout_policy).
///
/// # Example
///
/// ```
/// use duel_mcts::{MCTSConfig, config::SelectionKind};
/// use std::time::Duration;
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_max_iterations(10_000)
///     .with_max_time(Duration::from_secs(5))
///     .with_selection(SelectionKind::VisitProportional)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MCTSConfig {
    /// Exploration constant `C` for the confidence bound
    ///
    /// Higher values favor exploration of less-visited nodes.
    pub exploration_constant: f64,

    /// Number of iterations (simulated games) per decision
    pub max_iterations: usize,

    /// Maximum time to run the search
    ///
    /// Checked between iterations. When it runs out the best action found so
    /// far is returned.
    pub max_time: Option<Duration>,

    /// Selection strategy used while descending the tree
    pub selection: SelectionKind,

    /// Seed for the search's random number generator
    ///
    /// With a seed, two searches over the same game with the same
    /// configuration pick the same action. Without one the generator is
    /// seeded from the operating system.
    pub seed: Option<u64>,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: 2.0,
            max_iterations: 1000,
            max_time: None,
            selection: SelectionKind::ConfidenceBound,
            seed: None,
        }
    }
}

impl MCTSConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the maximum number of iterations
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the maximum time to run the search
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Sets the selection strategy
    pub fn with_selection(mut self, selection: SelectionKind) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration for values the search cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MCTSError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}
