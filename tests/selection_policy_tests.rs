use std::collections::HashMap;

use duel_mcts::{
    policy::selection::{SelectionPolicy, UCB1Policy, VisitProportionalPolicy},
    Board, NodeId, SearchTree,
};
use rand::{rngs::StdRng, SeedableRng};

/// Board stub; selection only looks at the tree
struct TestBoard;

impl Board for TestBoard {
    type State = ();
    type Action = u8;
    type Player = u8;

    fn is_ended(&self, _state: &()) -> bool {
        false
    }

    fn legal_actions(&self, _state: &()) -> Vec<u8> {
        vec![0, 1, 2]
    }

    fn next_state(&self, _state: &(), _action: &u8) {}

    fn current_player(&self, _state: &()) -> u8 {
        0
    }

    fn points_values(&self, _state: &()) -> Option<HashMap<u8, f64>> {
        None
    }
}

/// Builds a root (player 0) whose children have the given (visits, wins)
/// and records the matching visits on the root.
fn tree_with_children(stats: &[(u64, u64)]) -> (SearchTree<TestBoard>, Vec<NodeId>) {
    let mut tree = SearchTree::<TestBoard>::new(Vec::new(), 0);
    let root = tree.root();
    let mut ids = Vec::new();

    for (i, &(visits, wins)) in stats.iter().enumerate() {
        let id = tree.add_child(root, i as u8, Vec::new(), 1);
        for v in 0..visits {
            tree.get_mut(id).record_outcome(v < wins);
            tree.get_mut(root).record_outcome(v < wins);
        }
        ids.push(id);
    }

    (tree, ids)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(17)
}

#[test]
fn test_ucb1_exploration_exploitation_balance() {
    // Child 0: win rate 0.9 over 50 visits; child 1: 0.4 over 10 visits
    let (tree, ids) = tree_with_children(&[(50, 45), (10, 4)]);

    let exploitative = UCB1Policy::new(0.1);
    assert_eq!(
        exploitative.select_child(&tree, tree.root(), &mut rng()),
        Some(ids[0]),
        "With low exploration constant, should prefer child with higher win rate"
    );

    let explorative = UCB1Policy::new(100.0);
    assert_eq!(
        explorative.select_child(&tree, tree.root(), &mut rng()),
        Some(ids[1]),
        "With very high exploration constant, should prefer less-visited child"
    );
}

#[test]
fn test_ucb1_unvisited_child_has_priority() {
    let (tree, ids) = tree_with_children(&[(40, 40), (0, 0), (5, 5), (0, 0)]);

    let policy = UCB1Policy::new(0.0);
    assert_eq!(
        policy.select_child(&tree, tree.root(), &mut rng()),
        Some(ids[1]),
        "The first unvisited child beats any visited sibling"
    );
}

#[test]
fn test_ucb1_opponent_minimizes_tracked_wins() {
    // Root is player 0. Below it sits a node where player 1 chooses between
    // a child that is good for player 0 and one that is bad for player 0.
    let mut tree = SearchTree::<TestBoard>::new(Vec::new(), 0);
    let root = tree.root();
    let opponent = tree.add_child(root, 0, Vec::new(), 1);
    let good_for_root = tree.add_child(opponent, 0, Vec::new(), 0);
    let bad_for_root = tree.add_child(opponent, 1, Vec::new(), 0);

    for i in 0..20 {
        let won = i < 18;
        tree.get_mut(good_for_root).record_outcome(won);
        tree.get_mut(opponent).record_outcome(won);
        tree.get_mut(root).record_outcome(won);
    }
    for i in 0..20 {
        let won = i < 2;
        tree.get_mut(bad_for_root).record_outcome(won);
        tree.get_mut(opponent).record_outcome(won);
        tree.get_mut(root).record_outcome(won);
    }

    let policy = UCB1Policy::new(0.5);
    assert_eq!(
        policy.select_child(&tree, opponent, &mut rng()),
        Some(bad_for_root),
        "The opponent should steer away from the root player's wins"
    );

    // The same statistics seen from a node where the root player chooses
    let mut own = SearchTree::<TestBoard>::new(Vec::new(), 0);
    let own_root = own.root();
    let good = own.add_child(own_root, 0, Vec::new(), 1);
    let bad = own.add_child(own_root, 1, Vec::new(), 1);
    for i in 0..20 {
        own.get_mut(good).record_outcome(i < 18);
        own.get_mut(bad).record_outcome(i < 2);
        own.get_mut(own_root).record_outcome(true);
    }
    assert_eq!(policy.select_child(&own, own_root, &mut rng()), Some(good));
}

#[test]
fn test_ucb1_ties_go_to_first_child() {
    let (tree, ids) = tree_with_children(&[(10, 5), (10, 5), (10, 5)]);
    let policy = UCB1Policy::new(2.0);
    assert_eq!(
        policy.select_child(&tree, tree.root(), &mut rng()),
        Some(ids[0])
    );
}

#[test]
fn test_ucb1_no_children() {
    let tree = SearchTree::<TestBoard>::new(vec![0, 1], 0);
    let policy = UCB1Policy::default();
    assert_eq!(policy.exploration_constant, 2.0);
    assert_eq!(policy.select_child(&tree, tree.root(), &mut rng()), None);
}

#[test]
fn test_visit_proportional_thresholds() {
    let (tree, ids) = tree_with_children(&[(10, 0), (30, 0), (60, 0)]);
    let policy = VisitProportionalPolicy::new();

    assert_eq!(
        policy.select_with_threshold(&tree, tree.root(), 0.05),
        Some(ids[0])
    );
    assert_eq!(
        policy.select_with_threshold(&tree, tree.root(), 0.35),
        Some(ids[1])
    );
    assert_eq!(
        policy.select_with_threshold(&tree, tree.root(), 0.95),
        Some(ids[2])
    );
}

#[test]
fn test_visit_proportional_halts_before_visits_exist() {
    let policy = VisitProportionalPolicy::new();

    let empty = SearchTree::<TestBoard>::new(vec![0], 0);
    assert_eq!(policy.select_child(&empty, empty.root(), &mut rng()), None);

    let (unvisited, _) = tree_with_children(&[(0, 0), (0, 0)]);
    assert_eq!(
        policy.select_child(&unvisited, unvisited.root(), &mut rng()),
        None
    );
}

#[test]
fn test_visit_proportional_never_picks_unvisited_child() {
    let (tree, ids) = tree_with_children(&[(0, 0), (12, 3), (0, 0)]);
    let policy = VisitProportionalPolicy::new();
    let mut rng = rng();

    for _ in 0..100 {
        assert_eq!(
            policy.select_child(&tree, tree.root(), &mut rng),
            Some(ids[1])
        );
    }
}

#[test]
fn test_visit_proportional_follows_visit_shares() {
    let (tree, ids) = tree_with_children(&[(10, 0), (90, 0)]);
    let policy = VisitProportionalPolicy::new();
    let mut rng = rng();

    let draws = 2000;
    let heavy = (0..draws)
        .filter(|_| policy.select_child(&tree, tree.root(), &mut rng) == Some(ids[1]))
        .count();
    let share = heavy as f64 / draws as f64;
    assert!(
        (0.85..0.95).contains(&share),
        "heavy child picked {:.3} of the time",
        share
    );
}

#[test]
fn test_clone_box() {
    let boxed: Box<dyn SelectionPolicy<TestBoard>> = Box::new(UCB1Policy::new(1.414));
    let cloned = boxed.clone_box();

    let (tree, ids) = tree_with_children(&[(3, 3), (0, 0)]);
    assert_eq!(
        cloned.select_child(&tree, tree.root(), &mut rng()),
        Some(ids[1])
    );
}
