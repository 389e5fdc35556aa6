// engine/src/search/config.rs
#![forbid(unsafe_code)]

use thiserror::Error;

/// Recovery applied when the no-improvement counter hits its limit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StuckStrategy {
    /// Switch brush and color, reset the counter, keep going. Never ends the run.
    Perturb,
    /// Undo a slice of the most recent placements and count one restart.
    Rollback,
}

impl StuckStrategy {
    pub fn from_cli(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perturb" | "switch" => Some(Self::Perturb),
            "rollback" | "restart" | "undo" => Some(Self::Rollback),
            _ => None,
        }
    }
}

/**
 * Search tuning knobs.
 *
 * Counting rules:
 * - `max_iterations` counts every sampled action across the whole run, restarts included.
 * - Only rejected placements advance the no-improvement counter; cursor moves and
 *   illegal placement attempts never do.
 * - Illegal placement attempts advance `consecutive_failures` instead; past
 *   `failure_threshold` the cursor is relocated by 1..=`relocation_moves` random moves.
 */
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    pub max_iterations: u64,
    /// Rejected placements in a row before the search counts as stuck.
    pub no_improvement_limit: u32,
    /// Rollbacks allowed before giving up (Rollback strategy only).
    pub restart_limit: u32,
    /// Probability of accepting an equal-score placement.
    pub sideways_probability: f64,
    pub failure_threshold: u32,
    pub relocation_moves: u32,
    /// Relative weight of `place` against each single cursor action (weight 1).
    pub place_weight: u32,
    /// Rollback undoes `max(placed / rollback_divisor, rollback_min)` placements,
    /// capped at the number placed.
    pub rollback_divisor: usize,
    pub rollback_min: usize,
    pub stuck_strategy: StuckStrategy,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            no_improvement_limit: 500,
            restart_limit: 5,
            sideways_probability: 0.1,
            failure_threshold: 20,
            relocation_moves: 5,
            place_weight: 5,
            rollback_divisor: 4,
            rollback_min: 5,
            stuck_strategy: StuckStrategy::Rollback,
            seed: 12345,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("sideways_probability must be within [0, 1], got {0}")]
    SidewaysProbability(f64),
    #[error("place_weight must be at least 1")]
    PlaceWeight,
    #[error("no_improvement_limit must be at least 1")]
    NoImprovementLimit,
    #[error("relocation_moves must be at least 1")]
    RelocationMoves,
    #[error("rollback_divisor must be at least 1")]
    RollbackDivisor,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.sideways_probability) {
            return Err(ConfigError::SidewaysProbability(self.sideways_probability));
        }
        if self.place_weight == 0 {
            return Err(ConfigError::PlaceWeight);
        }
        if self.no_improvement_limit == 0 {
            return Err(ConfigError::NoImprovementLimit);
        }
        if self.relocation_moves == 0 {
            return Err(ConfigError::RelocationMoves);
        }
        if self.rollback_divisor == 0 {
            return Err(ConfigError::RollbackDivisor);
        }
        Ok(())
    }

    /// Number of placements a rollback removes when `placed` are on the grid.
    #[inline]
    pub fn rollback_count(&self, placed: usize) -> usize {
        (placed / self.rollback_divisor)
            .max(self.rollback_min)
            .min(placed)
    }
}
