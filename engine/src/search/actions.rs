// engine/src/search/actions.rs
#![forbid(unsafe_code)]

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::engine::Action;

/// Sampling vocabulary; `Undo` is driver-internal and never sampled.
const VOCAB: [Action; 7] = [
    Action::Up,
    Action::Down,
    Action::Left,
    Action::Right,
    Action::SwitchShape,
    Action::SwitchColor,
    Action::Place,
];

/// Weighted action generator. Holds no RNG of its own; the caller owns the stream.
#[derive(Clone, Debug)]
pub struct ActionSampler {
    dist: WeightedIndex<u32>,
}

impl ActionSampler {
    /// `place_weight` is relative to weight 1 for every other action; values below 1
    /// are raised to 1.
    pub fn new(place_weight: u32) -> Self {
        let weights = VOCAB.map(|a| if a == Action::Place { place_weight.max(1) } else { 1 });
        let dist = WeightedIndex::new(weights).expect("action weights are strictly positive");
        Self { dist }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        VOCAB[self.dist.sample(rng)]
    }

    /// Uniform cursor move, used to relocate after repeated illegal placements.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::MOVES[rng.gen_range(0..Action::MOVES.len())]
    }
}
