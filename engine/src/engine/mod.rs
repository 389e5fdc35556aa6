// engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod action;
mod brushes;
mod constants;
mod features;
mod grid;
mod palette;
mod session;

/**
 * Curated engine public API.
 *
 * Internal implementation modules remain private; only stable items are re-exported here.
 */
pub use action::Action;
pub use brushes::Brush;
pub use constants::{
    Cell, DEFAULT_GRID_SIZE, DEFAULT_SEEDED_BOXES, EMPTY, MAX_GRID_SIZE, MIN_GRID_SIZE,
    NUM_COLORS,
};
pub use features::{
    GridFeatures, compute_grid_features, count_conflicts, count_distinct_colors,
    count_empty_cells, is_complete,
};
pub use grid::{Grid, Pos, can_place};
pub use palette::Color;
pub use session::{
    Cursor, Placement, Session, SessionConfig, SessionError, Snapshot, render_frame,
};
