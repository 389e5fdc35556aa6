// engine/src/engine/constants.rs
#![forbid(unsafe_code)]

/// Grid cell encoding: `EMPTY` or a palette index `0..NUM_COLORS`.
pub type Cell = i8;

pub const EMPTY: Cell = -1;

pub const NUM_COLORS: usize = 4;

/**
 * Grid size bounds.
 * - The widest/tallest brush spans 4 cells, so smaller grids could not host every brush.
 * - The upper bound keeps the score tiers (see `search::score`) comfortably inside i64.
 */
pub const MIN_GRID_SIZE: usize = 4;
pub const MAX_GRID_SIZE: usize = 30;

pub const DEFAULT_GRID_SIZE: usize = 6;
pub const DEFAULT_SEEDED_BOXES: usize = 5;
