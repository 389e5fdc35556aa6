// engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod engine;
pub mod search;
pub mod trace;

// Re-export the bits the CLI and tests need:
pub use engine::{
    Action, Brush, Cell, Color, Cursor, EMPTY, Grid, GridFeatures, MAX_GRID_SIZE, MIN_GRID_SIZE,
    Placement, Pos, Session, SessionConfig, SessionError, Snapshot, can_place,
    compute_grid_features, count_conflicts, count_distinct_colors, count_empty_cells,
};
pub use search::{
    ActionSampler, ConfigError, HillClimber, NoopSink, Score, ScoreBreakdown, ScoreWeights,
    SearchConfig, SearchOutcome, SearchReport, SearchSink, StateProvider, StuckStrategy, score,
    score_breakdown,
};
pub use trace::{Trace, TraceFrame, TraceMeta, TraceRecorder};
