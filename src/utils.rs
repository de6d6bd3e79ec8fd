//! Utility functions for the MCTS algorithm
//!
//! Numeric helpers shared by the selection policies.

/// Safely calculates the win rate from wins and visits
///
/// Returns 0.0 if no visits have occurred.
pub fn win_rate(wins: u64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    wins as f64 / visits as f64
}

/// Calculates the exploitation term of the confidence bound
///
/// The win rate, negated when the choosing player is not the one the wins
/// were recorded for.
pub fn exploitation_term(wins: u64, visits: u64, same_perspective: bool) -> f64 {
    let rate = win_rate(wins, visits);
    if same_perspective {
        rate
    } else {
        -rate
    }
}

/// Calculates the exploration term of the confidence bound
///
/// Unvisited children get an infinite bonus. A parent without visits yields
/// no bonus instead of `ln(0)`; the driver never selects from such a parent.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }
    if parent_visits == 0 {
        return 0.0;
    }

    exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the signed UCB1 score of a child
///
/// `same_perspective` is true when the player choosing among the children is
/// the player whose wins are being counted.
pub fn ucb1_value(
    wins: u64,
    visits: u64,
    parent_visits: u64,
    exploration_constant: f64,
    same_perspective: bool,
) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    exploitation_term(wins, visits, same_perspective)
        + exploration_term(parent_visits, visits, exploration_constant)
}

/// Roulette-wheel pick over visit counts
///
/// Returns the first index whose cumulative share of `weights` reaches
/// `threshold`, which should lie in `[0, 1)`. Rounding can leave the final
/// cumulative sum a hair below 1.0, so the last non-zero weight catches any
/// threshold that falls through. Returns `None` only if every weight is zero.
pub fn roulette_index(weights: &[u64], threshold: f64) -> Option<usize> {
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return None;
    }

    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w as f64 / total as f64;
        if w > 0 && cumulative >= threshold {
            return Some(i);
        }
    }

    weights.iter().rposition(|&w| w > 0)
}
