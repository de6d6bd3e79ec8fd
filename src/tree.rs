//! Tree data structures for Monte Carlo Tree Search
//!
//! The search tree is an arena: [`SearchTree`] owns every [`SearchNode`] in a
//! single vector and nodes refer to each other through [`NodeId`] handles.
//! The parent link is a plain index, so ownership stays acyclic and the whole
//! tree is released at once when the arena is dropped.

use std::fmt;

use crate::game_state::{checked_legal_actions, Board};
use crate::Result;

/// Index of a node inside a [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vertex of the search tree
///
/// One node exists per explored (state, path of actions) pair. The node does
/// not store its state; the driver recomputes it by replaying actions from the
/// root state while descending.
pub struct SearchNode<B: Board> {
    parent: Option<NodeId>,
    parent_action: Option<B::Action>,
    children: Vec<(B::Action, NodeId)>,
    untried_actions: Vec<B::Action>,
    visits: u64,
    wins: u64,

    /// Player whose turn it is in this node's state
    player: B::Player,

    /// Depth of this node in the tree (root = 0)
    depth: usize,
}

impl<B: Board> SearchNode<B> {
    /// Creates a detached node
    ///
    /// `untried_actions` is the legal-action set of the node's state; it only
    /// ever shrinks as actions are expanded into children.
    pub fn new(
        parent: Option<NodeId>,
        parent_action: Option<B::Action>,
        untried_actions: Vec<B::Action>,
        player: B::Player,
        depth: usize,
    ) -> Self {
        SearchNode {
            parent,
            parent_action,
            children: Vec::new(),
            untried_actions,
            visits: 0,
            wins: 0,
            player,
            depth,
        }
    }

    /// Node that expanded into this one, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Action that produced this node from its parent's state
    pub fn parent_action(&self) -> Option<&B::Action> {
        self.parent_action.as_ref()
    }

    /// Children in expansion order
    pub fn children(&self) -> &[(B::Action, NodeId)] {
        &self.children
    }

    /// Legal actions not yet expanded into children
    pub fn untried_actions(&self) -> &[B::Action] {
        &self.untried_actions
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn player(&self) -> &B::Player {
        &self.player
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Fraction of visits that ended in a win for the tracked player
    pub fn win_rate(&self) -> f64 {
        crate::utils::win_rate(self.wins, self.visits)
    }

    /// Records one simulation passing through this node
    ///
    /// This is the only way statistics change, which keeps `wins <= visits`.
    pub fn record_outcome(&mut self, won: bool) {
        self.visits += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Returns true if every legal action has been expanded
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena owning every node of one search
pub struct SearchTree<B: Board> {
    nodes: Vec<SearchNode<B>>,

    /// Acting player at the root; wins are recorded from this perspective
    perspective: B::Player,
}

impl<B: Board> SearchTree<B> {
    /// Creates a tree whose root holds the given legal actions
    pub fn new(root_actions: Vec<B::Action>, root_player: B::Player) -> Self {
        let root = SearchNode::new(None, None, root_actions, root_player.clone(), 0);
        SearchTree {
            nodes: vec![root],
            perspective: root_player,
        }
    }

    /// Creates a tree rooted at `state`
    pub fn for_state(board: &B, state: &B::State) -> Result<Self> {
        let actions = checked_legal_actions(board, state)?;
        Ok(Self::new(actions, board.current_player(state)))
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Player the tree tracks wins for
    pub fn perspective(&self) -> &B::Player {
        &self.perspective
    }

    /// Returns the node behind `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn get(&self, id: NodeId) -> &SearchNode<B> {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<B> {
        &mut self.nodes[id.0]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every node with its id
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode<B>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Returns the child reached from `parent` through `action`
    pub fn child_for(&self, parent: NodeId, action: &B::Action) -> Option<NodeId> {
        self.get(parent)
            .children
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }

    /// Returns true if `id` has at least one child with a recorded visit
    ///
    /// When this is false neither selection formula is meaningful and the
    /// node must be expanded instead.
    pub fn has_visited_child(&self, id: NodeId) -> bool {
        self.get(id)
            .children
            .iter()
            .any(|(_, child)| self.get(*child).visits > 0)
    }

    /// Attaches a new child under `parent`, recorded under `action`
    ///
    /// The caller is responsible for having removed `action` from the
    /// parent's untried set.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        action: B::Action,
        untried_actions: Vec<B::Action>,
        player: B::Player,
    ) -> NodeId {
        debug_assert!(
            self.child_for(parent, &action).is_none(),
            "action {:?} already expanded under {}",
            action,
            parent
        );

        let id = NodeId(self.nodes.len());
        let depth = self.get(parent).depth + 1;
        self.nodes.push(SearchNode::new(
            Some(parent),
            Some(action.clone()),
            untried_actions,
            player,
            depth,
        ));
        self.get_mut(parent).children.push((action, id));
        id
    }

    /// Expands one untried action of `parent`
    ///
    /// Applies the action at `action_index` of the parent's untried list to
    /// `parent_state`, creates the child with its own legal-action set and
    /// returns it together with the new state. Returns `None` when the index
    /// is out of bounds. The remaining untried actions keep their order.
    pub fn expand(
        &mut self,
        board: &B,
        parent: NodeId,
        parent_state: &B::State,
        action_index: usize,
    ) -> Result<Option<(NodeId, B::State)>> {
        let Some(action) = self.get(parent).untried_actions.get(action_index).cloned() else {
            return Ok(None);
        };

        let next_state = board.next_state(parent_state, &action);
        let actions = checked_legal_actions(board, &next_state)?;
        let player = board.current_player(&next_state);

        self.get_mut(parent).untried_actions.remove(action_index);
        let child = self.add_child(parent, action, actions, player);
        Ok(Some((child, next_state)))
    }

    /// Walks from `id` up to the root, inclusive
    pub fn path_to_root(&self, id: NodeId) -> Ancestors<'_, B> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Actions leading from the root to `id`, in play order
    pub fn actions_to(&self, id: NodeId) -> Vec<B::Action> {
        let mut actions: Vec<_> = self
            .path_to_root(id)
            .filter_map(|n| self.get(n).parent_action.clone())
            .collect();
        actions.reverse();
        actions
    }
}

/// Iterator over a node and its ancestors, see [`SearchTree::path_to_root`]
pub struct Ancestors<'a, B: Board> {
    tree: &'a SearchTree<B>,
    next: Option<NodeId>,
}

impl<B: Board> Iterator for Ancestors<'_, B> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).parent;
        Some(current)
    }
}
