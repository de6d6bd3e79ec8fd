//! Main implementation of the Monte Carlo Tree Search algorithm
//!
//! This module contains the search driver, orchestrating the four phases of
//! selection, expansion, simulation, and backpropagation, and the final
//! choice of action.

use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{MCTSConfig, SelectionKind},
    game_state::{is_win, Board},
    policy::{
        backpropagation::{backpropagate, BackpropagationPolicy, StandardPolicy},
        expansion::{ExpansionPolicy, RandomExpansionPolicy},
        selection::{SelectionPolicy, UCB1Policy, VisitProportionalPolicy},
        simulation::{rollout, RandomPolicy, RolloutPolicy},
    },
    stats::SearchStatistics,
    tree::{NodeId, SearchTree},
    Result,
};

/// Visit statistics of one root child
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<A> {
    /// Action leading to the child
    pub action: A,
    pub visits: u64,
    pub wins: u64,
}

/// The main Monte Carlo Tree Search implementation
///
/// One `MCTS` value decides moves for one position at a time. Every call to
/// [`MCTS::search`] grows a fresh tree from the current root state and
/// discards the previous one.
pub struct MCTS<B: Board> {
    board: B,

    /// State the search decides a move for
    root_state: B::State,

    /// Tree of the latest search
    tree: SearchTree<B>,

    /// Configuration for the search
    config: MCTSConfig,

    /// Statistics gathered during search
    statistics: SearchStatistics,

    /// Policy for descending through fully expanded nodes
    selection_policy: Box<dyn SelectionPolicy<B>>,

    /// Policy for picking which untried action to expand
    expansion_policy: Box<dyn ExpansionPolicy<B>>,

    /// Policy for moves played during rollouts
    rollout_policy: Box<dyn RolloutPolicy<B>>,

    /// Policy for backpropagating results
    backpropagation_policy: Box<dyn BackpropagationPolicy<B>>,

    /// Source of every random draw in the search
    rng: StdRng,
}

impl<B: Board + 'static> MCTS<B> {
    /// Creates a new MCTS instance for `state` with the given configuration
    ///
    /// The selection policy follows [`MCTSConfig::selection`]; the other
    /// phases use uniform random choices until overridden.
    pub fn new(board: B, state: B::State, config: MCTSConfig) -> Self {
        let selection_policy: Box<dyn SelectionPolicy<B>> = match config.selection {
            SelectionKind::ConfidenceBound => {
                Box::new(UCB1Policy::new(config.exploration_constant))
            }
            SelectionKind::VisitProportional => Box::new(VisitProportionalPolicy::new()),
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let tree = SearchTree::new(Vec::new(), board.current_player(&state));

        MCTS {
            board,
            root_state: state,
            tree,
            config,
            statistics: SearchStatistics::new(),
            selection_policy,
            expansion_policy: Box::new(RandomExpansionPolicy::new()),
            rollout_policy: Box::new(RandomPolicy::new()),
            backpropagation_policy: Box::new(StandardPolicy::new()),
            rng,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy<B> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the expansion policy to use
    pub fn with_expansion_policy<P: ExpansionPolicy<B> + 'static>(mut self, policy: P) -> Self {
        self.expansion_policy = Box::new(policy);
        self
    }

    /// Sets the rollout policy to use
    pub fn with_rollout_policy<P: RolloutPolicy<B> + 'static>(mut self, policy: P) -> Self {
        self.rollout_policy = Box::new(policy);
        self
    }

    /// Sets the backpropagation policy to use
    pub fn with_backpropagation_policy<P: BackpropagationPolicy<B> + 'static>(
        mut self,
        policy: P,
    ) -> Self {
        self.backpropagation_policy = Box::new(policy);
        self
    }

    /// Moves the search to a new position
    ///
    /// The next search starts from `state`; nothing from the previous tree is
    /// carried over.
    pub fn reset_root(&mut self, state: B::State) {
        self.tree = SearchTree::new(Vec::new(), self.board.current_player(&state));
        self.root_state = state;
    }

    /// Runs the search and returns the best action
    ///
    /// Returns `Ok(None)` when there is no move to make: the root state has
    /// already ended, or the iteration budget is zero.
    pub fn search(&mut self) -> Result<Option<B::Action>> {
        self.run(self.config.max_iterations, self.config.max_time)
    }

    /// Runs the search for the specified number of iterations
    pub fn search_for_iterations(&mut self, iterations: usize) -> Result<Option<B::Action>> {
        self.run(iterations, self.config.max_time)
    }

    /// Runs the search until `duration` has passed or the iteration budget
    /// is spent, whichever comes first
    pub fn search_for_time(&mut self, duration: Duration) -> Result<Option<B::Action>> {
        self.run(self.config.max_iterations, Some(duration))
    }

    fn run(&mut self, iterations: usize, max_time: Option<Duration>) -> Result<Option<B::Action>> {
        self.config.validate()?;
        self.statistics = SearchStatistics::new();
        self.tree = SearchTree::for_state(&self.board, &self.root_state)?;

        if self.board.is_ended(&self.root_state) {
            debug!("Root state has ended, no action to search for");
            return Ok(None);
        }

        debug!(
            "Starting search: {} iterations, {:?} selection, player {:?}",
            iterations,
            self.config.selection,
            self.tree.perspective()
        );

        let start_time = Instant::now();

        for i in 0..iterations {
            if let Some(max_duration) = max_time {
                if start_time.elapsed() >= max_duration {
                    self.statistics.stopped_early = true;
                    warn!(
                        "Search stopped after {} of {} iterations due to time limit",
                        i, iterations
                    );
                    break;
                }
            }

            self.execute_iteration()?;
            self.statistics.iterations = i + 1;
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = self.tree.len();

        let best_action = self.select_best_action();
        debug!(
            "Action chosen: {:?} ({} iterations, {} nodes)",
            best_action, self.statistics.iterations, self.statistics.tree_size
        );
        Ok(best_action)
    }

    /// Execute a single iteration of the MCTS algorithm
    fn execute_iteration(&mut self) -> Result<()> {
        // 1. Selection phase
        let (selected, state) = self.traverse();

        // 2. Expansion phase
        let (expanded, state) = self.expand(selected, state)?;

        // 3. Simulation phase
        let outcome = rollout(&self.board, state, &*self.rollout_policy, &mut self.rng)?;
        let won = is_win(&self.board, &outcome.state, self.tree.perspective())?;

        // 4. Backpropagation phase
        backpropagate(
            &mut self.tree,
            expanded,
            won,
            &*self.backpropagation_policy,
        );

        self.statistics.rollout_plies += outcome.plies;
        trace!(
            "Iteration: expanded {} after {} rollout plies, won: {}",
            expanded,
            outcome.plies,
            won
        );

        Ok(())
    }

    /// Selection phase: descend from the root to a node worth expanding
    ///
    /// Stops at an ended state, at a node with untried actions, or at a node
    /// none of whose children has been visited. Returns the node reached and
    /// its state, rebuilt by replaying the actions along the way.
    fn traverse(&mut self) -> (NodeId, B::State) {
        let mut node = self.tree.root();
        let mut state = self.root_state.clone();
        let mut depth = 0;

        while !self.board.is_ended(&state) && self.tree.get(node).is_fully_expanded() {
            if !self.tree.has_visited_child(node) {
                break;
            }

            let Some(child) = self
                .selection_policy
                .select_child(&self.tree, node, &mut self.rng)
            else {
                break;
            };
            let Some(action) = self.tree.get(child).parent_action() else {
                break;
            };

            state = self.board.next_state(&state, action);
            node = child;
            depth += 1;
        }

        self.statistics.max_depth = self.statistics.max_depth.max(depth);
        (node, state)
    }

    /// Expansion phase: turn one untried action into a new child
    ///
    /// A node with nothing to expand is returned unchanged.
    fn expand(&mut self, node: NodeId, state: B::State) -> Result<(NodeId, B::State)> {
        if self.board.is_ended(&state) {
            return Ok((node, state));
        }

        let Some(index) = self
            .expansion_policy
            .select_action_to_expand(self.tree.get(node), &mut self.rng)
        else {
            return Ok((node, state));
        };

        match self.tree.expand(&self.board, node, &state, index)? {
            Some(expanded) => Ok(expanded),
            None => Ok((node, state)),
        }
    }

    /// Picks the root child with the most visits
    ///
    /// Ties go to the child expanded first.
    fn select_best_action(&self) -> Option<B::Action> {
        let root = self.tree.get(self.tree.root());
        let mut best: Option<(&B::Action, u64)> = None;

        for (action, child) in root.children() {
            let visits = self.tree.get(*child).visits();
            if best.map_or(true, |(_, best_visits)| visits > best_visits) {
                best = Some((action, visits));
            }
        }

        best.map(|(action, _)| action.clone())
    }

    /// Returns the search statistics
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns the tree built by the latest search
    pub fn tree(&self) -> &SearchTree<B> {
        &self.tree
    }

    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn root_state(&self) -> &B::State {
        &self.root_state
    }

    /// Visit statistics of every root child, in expansion order
    pub fn root_child_stats(&self) -> Vec<ChildStats<B::Action>> {
        let root = self.tree.get(self.tree.root());
        root.children()
            .iter()
            .map(|(action, id)| {
                let child = self.tree.get(*id);
                ChildStats {
                    action: action.clone(),
                    visits: child.visits(),
                    wins: child.wins(),
                }
            })
            .collect()
    }

    /// Returns a visualization of the search tree
    pub fn visualize_tree(&self) -> String {
        let mut result = String::new();
        self.visualize_node(self.tree.root(), 0, &mut result);
        result
    }

    /// Helper method to visualize a node and its children
    fn visualize_node(&self, id: NodeId, depth: usize, output: &mut String) {
        let node = self.tree.get(id);
        let indent = "  ".repeat(depth);
        let action_str = match node.parent_action() {
            Some(action) => format!("{:?}", action),
            None => "Root".to_string(),
        };

        output.push_str(&format!(
            "{}{} (visits: {}, wins: {}, win rate: {:.3})\n",
            indent,
            action_str,
            node.visits(),
            node.wins(),
            node.win_rate()
        ));

        for (_, child) in node.children() {
            self.visualize_node(*child, depth + 1, output);
        }
    }
}

/// Decides a move for `state` in one call
///
/// Shorthand for building an [`MCTS`] with random rollouts and running
/// [`MCTS::search`] once.
pub fn search<B: Board + 'static>(
    board: B,
    state: B::State,
    config: MCTSConfig,
) -> Result<Option<B::Action>> {
    MCTS::new(board, state, config).search()
}

/// Like [`search`], with a custom rollout policy
pub fn search_with_rollout<B, P>(
    board: B,
    state: B::State,
    config: MCTSConfig,
    rollout_policy: P,
) -> Result<Option<B::Action>>
where
    B: Board + 'static,
    P: RolloutPolicy<B> + 'static,
{
    MCTS::new(board, state, config)
        .with_rollout_policy(rollout_policy)
        .search()
}
