//! Expansion policies determine which untried action to expand
//! when the descent stops at a node that still has some.

use rand::{seq::IteratorRandom, RngCore};

use crate::{game_state::Board, tree::SearchNode};

/// Trait for policies that select which action to expand
pub trait ExpansionPolicy<B: Board>: Send + Sync {
    /// Returns the index into `node.untried_actions()` of the action to
    /// expand, or `None` if the node has nothing left to expand.
    fn select_action_to_expand(&self, node: &SearchNode<B>, rng: &mut dyn RngCore)
        -> Option<usize>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn ExpansionPolicy<B>>;
}

/// Random expansion policy
///
/// Selects an untried action uniformly at random. The order in which actions
/// are expanded only affects how broadly the tree grows early on.
#[derive(Debug, Clone, Default)]
pub struct RandomExpansionPolicy;

impl RandomExpansionPolicy {
    /// Creates a new random expansion policy
    pub fn new() -> Self {
        RandomExpansionPolicy
    }
}

impl<B: Board + 'static> ExpansionPolicy<B> for RandomExpansionPolicy {
    fn select_action_to_expand(
        &self,
        node: &SearchNode<B>,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        (0..node.untried_actions().len()).choose(rng)
    }

    fn clone_box(&self) -> Box<dyn ExpansionPolicy<B>> {
        Box::new(self.clone())
    }
}

/// In-order expansion policy
///
/// Always expands the first untried action, so children appear in the order
/// the board lists its actions.
#[derive(Debug, Clone, Default)]
pub struct FirstUntriedPolicy;

impl FirstUntriedPolicy {
    /// Creates a new in-order expansion policy
    pub fn new() -> Self {
        FirstUntriedPolicy
    }
}

impl<B: Board + 'static> ExpansionPolicy<B> for FirstUntriedPolicy {
    fn select_action_to_expand(
        &self,
        node: &SearchNode<B>,
        _rng: &mut dyn RngCore,
    ) -> Option<usize> {
        (!node.untried_actions().is_empty()).then_some(0)
    }

    fn clone_box(&self) -> Box<dyn ExpansionPolicy<B>> {
        Box::new(self.clone())
    }
}

// Implement ExpansionPolicy for Box<dyn ExpansionPolicy>
impl<B: Board> ExpansionPolicy<B> for Box<dyn ExpansionPolicy<B>> {
    fn select_action_to_expand(
        &self,
        node: &SearchNode<B>,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        (**self).select_action_to_expand(node, rng)
    }

    fn clone_box(&self) -> Box<dyn ExpansionPolicy<B>> {
        (**self).clone_box()
    }
}
