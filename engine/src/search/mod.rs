// engine/src/search/mod.rs
#![forbid(unsafe_code)]

mod actions;
mod config;
mod driver;
mod provider;
mod score;
mod sink;

/**
 * Curated search public API.
 *
 * The driver only ever talks to the grid through `StateProvider`; scoring and
 * action sampling are free-standing so they can be tested in isolation.
 */
pub use actions::ActionSampler;
pub use config::{ConfigError, SearchConfig, StuckStrategy};
pub use driver::{HillClimber, SearchOutcome, SearchReport};
pub use provider::StateProvider;
pub use score::{Score, ScoreBreakdown, ScoreWeights, score, score_breakdown};
pub use sink::{NoopSink, SearchSink};
