use std::collections::HashMap;

use duel_mcts::{
    policy::simulation::{rollout, HeuristicPolicy, MixturePolicy, RandomPolicy, RolloutPolicy},
    Board, MCTSError,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// A race along a line: each move steps by the chosen amount, the game ends
/// once the position reaches `goal` or more.
struct Race {
    goal: u32,
    steps: Vec<u32>,
}

impl Board for Race {
    type State = u32;
    type Action = u32;
    type Player = u8;

    fn is_ended(&self, state: &u32) -> bool {
        *state >= self.goal
    }

    fn legal_actions(&self, _state: &u32) -> Vec<u32> {
        self.steps.clone()
    }

    fn next_state(&self, state: &u32, action: &u32) -> u32 {
        state + action
    }

    fn current_player(&self, state: &u32) -> u8 {
        (*state % 2) as u8
    }

    fn points_values(&self, state: &u32) -> Option<HashMap<u8, f64>> {
        self.is_ended(state)
            .then(|| HashMap::from([(0, 1.0), (1, 0.0)]))
    }
}

/// Always plays the action at a fixed index, whether it exists or not
#[derive(Clone)]
struct FixedIndex(Option<usize>);

impl RolloutPolicy<Race> for FixedIndex {
    fn choose_action(
        &self,
        _board: &Race,
        _state: &u32,
        _legal_actions: &[u32],
        _rng: &mut dyn RngCore,
    ) -> Option<usize> {
        self.0
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy<Race>> {
        Box::new(self.clone())
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(99)
}

#[test]
fn test_random_policy_plays_to_the_end() {
    let board = Race {
        goal: 20,
        steps: vec![1, 2, 3],
    };

    let outcome = rollout(&board, 0, &RandomPolicy::new(), &mut rng()).unwrap();
    assert!(board.is_ended(&outcome.state));
    assert!(outcome.state < 23);
    assert!((7..=20).contains(&outcome.plies));
}

#[test]
fn test_rollout_from_ended_state_does_not_consult_policy() {
    let board = Race {
        goal: 5,
        steps: vec![1],
    };

    // A policy that never picks anything would fail if it were asked.
    let outcome = rollout(&board, 7, &FixedIndex(None), &mut rng()).unwrap();
    assert_eq!(outcome.state, 7);
    assert_eq!(outcome.plies, 0);
}

#[test]
fn test_heuristic_policy() {
    let board = Race {
        goal: 10,
        steps: vec![1, 3, 2],
    };

    let greedy = HeuristicPolicy::new(|_: &Race, _: &u32, step: &u32| *step as f64);
    assert_eq!(greedy.choose_action(&board, &0, &[1, 3, 2], &mut rng()), Some(1));

    let outcome = rollout(&board, 0, &greedy, &mut rng()).unwrap();
    assert_eq!(outcome.state, 12);
    assert_eq!(outcome.plies, 4);

    let flat = HeuristicPolicy::new(|_: &Race, _: &u32, _: &u32| 0.0);
    assert_eq!(
        flat.choose_action(&board, &0, &[1, 3, 2], &mut rng()),
        Some(0),
        "Ties go to the first action"
    );
}

#[test]
fn test_mixture_policy() {
    let board = Race {
        goal: 30,
        steps: vec![1, 2, 5],
    };

    let greedy = HeuristicPolicy::new(|_: &Race, _: &u32, step: &u32| *step as f64);
    let mixture = MixturePolicy::new().add_policy(greedy, 1.0);
    assert_eq!(mixture.len(), 1);

    // With one policy it always decides
    let mut rng = rng();
    for _ in 0..10 {
        assert_eq!(mixture.choose_action(&board, &0, &[1, 2, 5], &mut rng), Some(2));
    }

    // Zero weights are never drawn
    let weighted = MixturePolicy::new()
        .add_policy(FixedIndex(Some(0)), 0.0)
        .add_policy(FixedIndex(Some(1)), 2.0);
    for _ in 0..10 {
        assert_eq!(weighted.choose_action(&board, &0, &[1, 2, 5], &mut rng), Some(1));
    }

    // Cloning keeps the registered policies
    let cloned = weighted.clone();
    assert_eq!(cloned.len(), 2);
    assert_eq!(cloned.choose_action(&board, &0, &[1, 2, 5], &mut rng), Some(1));
}

#[test]
fn test_empty_mixture_falls_back_to_random() {
    let board = Race {
        goal: 10,
        steps: vec![1, 2],
    };
    let empty = MixturePolicy::<Race>::new();
    assert!(empty.is_empty());

    let outcome = rollout(&board, 0, &empty, &mut rng()).unwrap();
    assert!(board.is_ended(&outcome.state));
}

#[test]
fn test_policy_choosing_nothing_is_an_error() {
    let board = Race {
        goal: 3,
        steps: vec![1, 2],
    };

    let result = rollout(&board, 0, &FixedIndex(None), &mut rng());
    assert_eq!(result.unwrap_err(), MCTSError::RolloutPolicyFailed);

    let result = rollout(&board, 0, &FixedIndex(Some(5)), &mut rng());
    assert_eq!(result.unwrap_err(), MCTSError::RolloutPolicyFailed);
}

#[test]
fn test_board_without_moves_is_an_error() {
    let board = Race {
        goal: 3,
        steps: vec![],
    };

    let result = rollout(&board, 0, &RandomPolicy::new(), &mut rng());
    assert_eq!(result.unwrap_err(), MCTSError::NoLegalActions);
}

#[test]
fn test_simulation_policy_cloning() {
    let boxed: Box<dyn RolloutPolicy<Race>> = Box::new(RandomPolicy::new());
    let cloned = boxed.clone_box();

    let board = Race {
        goal: 4,
        steps: vec![2],
    };
    let outcome = rollout(&board, 0, &cloned, &mut rng()).unwrap();
    assert_eq!(outcome.state, 4);
    assert_eq!(outcome.plies, 2);
}
