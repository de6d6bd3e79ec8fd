use std::collections::HashMap;

use duel_mcts::{
    policy::expansion::{ExpansionPolicy, FirstUntriedPolicy, RandomExpansionPolicy},
    Board, SearchNode, SearchTree,
};
use rand::{rngs::StdRng, SeedableRng};

/// Counts up by 1, 2 or 3 and ends at 10 or more
struct Counter;

impl Board for Counter {
    type State = u32;
    type Action = u32;
    type Player = u8;

    fn is_ended(&self, state: &u32) -> bool {
        *state >= 10
    }

    fn legal_actions(&self, _state: &u32) -> Vec<u32> {
        vec![1, 2, 3]
    }

    fn next_state(&self, state: &u32, action: &u32) -> u32 {
        state + action
    }

    fn current_player(&self, state: &u32) -> u8 {
        (*state % 2) as u8
    }

    fn points_values(&self, state: &u32) -> Option<HashMap<u8, f64>> {
        self.is_ended(state)
            .then(|| HashMap::from([(0, 1.0), (1, -1.0)]))
    }
}

#[test]
fn test_random_expansion_stays_in_range() {
    let node = SearchNode::<Counter>::new(None, None, vec![1, 2, 3], 0, 0);
    let policy = RandomExpansionPolicy::new();
    let mut rng = StdRng::seed_from_u64(4);

    let mut seen = [false; 3];
    for _ in 0..100 {
        let index = policy.select_action_to_expand(&node, &mut rng).unwrap();
        assert!(index < 3);
        seen[index] = true;
    }
    assert_eq!(seen, [true; 3], "every untried action gets picked eventually");
}

#[test]
fn test_nothing_to_expand() {
    let node = SearchNode::<Counter>::new(None, None, Vec::new(), 0, 0);
    let mut rng = StdRng::seed_from_u64(4);

    assert_eq!(
        RandomExpansionPolicy::new().select_action_to_expand(&node, &mut rng),
        None
    );
    assert_eq!(
        FirstUntriedPolicy::new().select_action_to_expand(&node, &mut rng),
        None
    );
}

#[test]
fn test_first_untried_expands_in_listed_order() {
    let mut tree = SearchTree::for_state(&Counter, &0).unwrap();
    let root = tree.root();
    let policy = FirstUntriedPolicy::new();
    let mut rng = StdRng::seed_from_u64(4);

    let mut expanded = Vec::new();
    while let Some(index) = policy.select_action_to_expand(tree.get(root), &mut rng) {
        let (child, state) = tree.expand(&Counter, root, &0, index).unwrap().unwrap();
        expanded.push(state);
        assert_eq!(tree.get(child).untried_actions(), &[1, 2, 3]);
    }

    assert_eq!(expanded, vec![1, 2, 3]);
    assert!(tree.get(root).is_fully_expanded());
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_expansion_policy_cloning() {
    let boxed: Box<dyn ExpansionPolicy<Counter>> = Box::new(FirstUntriedPolicy::new());
    let cloned = boxed.clone_box();

    let node = SearchNode::<Counter>::new(None, None, vec![2, 3], 0, 0);
    let mut rng = StdRng::seed_from_u64(4);
    assert_eq!(cloned.select_action_to_expand(&node, &mut rng), Some(0));
}
