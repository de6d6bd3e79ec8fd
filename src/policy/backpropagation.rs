//! Backpropagation policies for the MCTS algorithm
//!
//! Backpropagation policies determine how to update node statistics
//! after a simulation.

use crate::{
    game_state::Board,
    tree::{NodeId, SearchNode, SearchTree},
};

/// Trait for policies that backpropagate simulation results
pub trait BackpropagationPolicy<B: Board>: Send + Sync {
    /// Updates statistics for one node on the simulated path
    ///
    /// `won` says whether the player acting at the root won the simulated
    /// game. It is the same for every node on the path.
    fn update_stats(&self, node: &mut SearchNode<B>, won: bool);

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<B>>;
}

/// Standard backpropagation policy
///
/// Every node on the path gains one visit, and one win if the root player
/// won.
#[derive(Debug, Clone, Default)]
pub struct StandardPolicy;

impl StandardPolicy {
    /// Creates a new standard policy
    pub fn new() -> Self {
        StandardPolicy
    }
}

impl<B: Board + 'static> BackpropagationPolicy<B> for StandardPolicy {
    fn update_stats(&self, node: &mut SearchNode<B>, won: bool) {
        node.record_outcome(won);
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<B>> {
        Box::new(self.clone())
    }
}

// Implement BackpropagationPolicy for Box<dyn BackpropagationPolicy>
impl<B: Board> BackpropagationPolicy<B> for Box<dyn BackpropagationPolicy<B>> {
    fn update_stats(&self, node: &mut SearchNode<B>, won: bool) {
        (**self).update_stats(node, won)
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<B>> {
        (**self).clone_box()
    }
}

/// Applies `policy` to `leaf` and each of its ancestors up to the root
///
/// Returns the number of nodes updated.
pub fn backpropagate<B, P>(tree: &mut SearchTree<B>, leaf: NodeId, won: bool, policy: &P) -> usize
where
    B: Board,
    P: BackpropagationPolicy<B> + ?Sized,
{
    let mut updated = 0;
    let mut current = Some(leaf);

    while let Some(id) = current {
        let node = tree.get_mut(id);
        policy.update_stats(node, won);
        current = node.parent();
        updated += 1;
    }

    updated
}
