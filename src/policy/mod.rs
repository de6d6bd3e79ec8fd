//! Policies for different phases of the MCTS algorithm
//!
//! This module contains implementations of various policies used in MCTS:
//! - Selection policies: How to choose which child to descend into
//! - Expansion policies: Which untried action becomes a new node
//! - Simulation policies: How to play out games from a leaf
//! - Backpropagation policies: How to update node statistics

pub mod backpropagation;
pub mod expansion;
pub mod selection;
pub mod simulation;

pub use backpropagation::{BackpropagationPolicy, StandardPolicy};
pub use expansion::{ExpansionPolicy, RandomExpansionPolicy};
pub use selection::{SelectionPolicy, UCB1Policy, VisitProportionalPolicy};
pub use simulation::{RandomPolicy, RolloutPolicy};
