//! Selection policies for the MCTS algorithm
//!
//! Selection policies decide which existing child to descend into once a
//! node has no untried actions left.

use rand::{Rng, RngCore};

use crate::{
    game_state::Board,
    tree::{NodeId, SearchNode, SearchTree},
    utils,
};

/// Trait for policies that select nodes to explore
pub trait SelectionPolicy<B: Board>: Send + Sync {
    /// Picks a child of `node` to descend into
    ///
    /// Returning `None` halts the descent at `node`, which then becomes the
    /// expansion target.
    fn select_child(&self, tree: &SearchTree<B>, node: NodeId, rng: &mut dyn RngCore)
        -> Option<NodeId>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy<B>>;
}

/// Upper Confidence Bound 1 (UCB1) selection policy
///
/// Scores each child with
///
/// ```text
/// UCB1 = ±(wins / visits) + C * sqrt(ln(parent_visits) / visits)
/// ```
///
/// Wins are always counted for the player acting at the root. The win rate
/// is added when the player choosing at `node` is that same player and
/// subtracted otherwise, so each player steers towards its own good results.
/// A child that has never been visited scores infinitely high, which forces
/// every child to be tried once before any is revisited.
///
/// Ties go to the child expanded first.
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant `C`; higher values favour less-visited children.
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 score of `child` as seen by the chooser
    pub fn ucb1_value<B: Board>(
        &self,
        child: &SearchNode<B>,
        parent_visits: u64,
        same_perspective: bool,
    ) -> f64 {
        utils::ucb1_value(
            child.wins(),
            child.visits(),
            parent_visits,
            self.exploration_constant,
            same_perspective,
        )
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl<B: Board + 'static> SelectionPolicy<B> for UCB1Policy {
    fn select_child(
        &self,
        tree: &SearchTree<B>,
        node: NodeId,
        _rng: &mut dyn RngCore,
    ) -> Option<NodeId> {
        let parent = tree.get(node);
        let same_perspective = parent.player() == tree.perspective();

        let mut best: Option<NodeId> = None;
        let mut best_value = f64::NEG_INFINITY;

        for &(_, child_id) in parent.children() {
            let value = self.ucb1_value(tree.get(child_id), parent.visits(), same_perspective);
            if best.is_none() || value > best_value {
                best = Some(child_id);
                best_value = value;
            }
        }

        best
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<B>> {
        Box::new(self.clone())
    }
}

/// Visit-proportional (roulette wheel) selection policy
///
/// Picks a child at random with probability `child.visits / total_visits`.
/// One uniform threshold is drawn in `[0, 1)` and the first child, in
/// expansion order, whose cumulative probability reaches it is chosen.
///
/// A node without children, or whose children are all unvisited, is not
/// ready for this policy; selection halts there so the node gets expanded.
#[derive(Debug, Clone, Default)]
pub struct VisitProportionalPolicy;

impl VisitProportionalPolicy {
    /// Creates a new visit-proportional policy
    pub fn new() -> Self {
        VisitProportionalPolicy
    }

    /// Selects with an explicit threshold instead of a random draw
    pub fn select_with_threshold<B: Board>(
        &self,
        tree: &SearchTree<B>,
        node: NodeId,
        threshold: f64,
    ) -> Option<NodeId> {
        if !tree.has_visited_child(node) {
            return None;
        }

        let children = tree.get(node).children();
        let weights: Vec<u64> = children
            .iter()
            .map(|&(_, id)| tree.get(id).visits())
            .collect();

        utils::roulette_index(&weights, threshold).map(|i| children[i].1)
    }
}

impl<B: Board + 'static> SelectionPolicy<B> for VisitProportionalPolicy {
    fn select_child(
        &self,
        tree: &SearchTree<B>,
        node: NodeId,
        rng: &mut dyn RngCore,
    ) -> Option<NodeId> {
        if !tree.has_visited_child(node) {
            return None;
        }
        let threshold: f64 = rng.gen();
        self.select_with_threshold(tree, node, threshold)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<B>> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl<B: Board> SelectionPolicy<B> for Box<dyn SelectionPolicy<B>> {
    fn select_child(
        &self,
        tree: &SearchTree<B>,
        node: NodeId,
        rng: &mut dyn RngCore,
    ) -> Option<NodeId> {
        (**self).select_child(tree, node, rng)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<B>> {
        (**self).clone_box()
    }
}
