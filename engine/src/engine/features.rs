// engine/src/engine/features.rs
#![forbid(unsafe_code)]

use rustc_hash::FxHashSet;

use crate::engine::constants::EMPTY;
use crate::engine::grid::Grid;
use crate::engine::session::Placement;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GridFeatures {
    /// Adjacent equal-colored pairs (right/down scan, each pair once).
    pub conflicts: u32,
    pub empty: u32,
}

/// Counts a pair once: only the right and below neighbors of each colored cell are
/// inspected, and empty neighbors never match.
pub fn count_conflicts(grid: &Grid) -> u32 {
    let (w, h) = (grid.width(), grid.height());
    let mut conflicts = 0u32;
    for y in 0..h {
        for x in 0..w {
            let v = grid.get(x, y);
            if v == EMPTY {
                continue;
            }
            if x + 1 < w && grid.get(x + 1, y) == v {
                conflicts += 1;
            }
            if y + 1 < h && grid.get(x, y + 1) == v {
                conflicts += 1;
            }
        }
    }
    conflicts
}

pub fn count_empty_cells(grid: &Grid) -> u32 {
    grid.cells().iter().filter(|&&c| c == EMPTY).count() as u32
}

/// Distinct colors among committed placements (pre-seeded boxes are not counted).
pub fn count_distinct_colors(placements: &[Placement]) -> u32 {
    let colors: FxHashSet<_> = placements.iter().map(|p| p.color).collect();
    colors.len() as u32
}

pub fn compute_grid_features(grid: &Grid) -> GridFeatures {
    GridFeatures {
        conflicts: count_conflicts(grid),
        empty: count_empty_cells(grid),
    }
}

/// Completion condition: fully covered with zero conflicts.
pub fn is_complete(grid: &Grid) -> bool {
    let f = compute_grid_features(grid);
    f.empty == 0 && f.conflicts == 0
}
