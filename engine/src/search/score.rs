// engine/src/search/score.rs
#![forbid(unsafe_code)]

use crate::engine::{
    Grid, NUM_COLORS, Placement, compute_grid_features, count_distinct_colors,
};

/// Fitness; higher is better.
pub type Score = i64;

/**
 * Tier weights for the lexicographic objective:
 *   conflicts > empty cells > placed shapes > distinct colors.
 *
 * The tiers are encoded with weight gaps, so every gap must exceed the largest value the
 * tier below can reach on the grid being scored. `for_cells` widens the base weights
 * when the grid is large enough for them to overlap.
 */
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoreWeights {
    pub conflict: i64,
    /// Empty-cell weight while conflicts remain.
    pub empty_with_conflicts: i64,
    pub empty: i64,
    pub shape: i64,
    pub color: i64,
}

impl ScoreWeights {
    pub const BASE: ScoreWeights = ScoreWeights {
        conflict: 100_000,
        empty_with_conflicts: 100,
        empty: 1_000,
        shape: 10,
        color: 1,
    };

    pub fn for_cells(cells: usize) -> Self {
        let n = cells as i64;
        let b = Self::BASE;

        // Full grid: at most one shape per cell and NUM_COLORS colors.
        let empty = b.empty.max(b.shape * n + b.color * NUM_COLORS as i64 + 1);
        // One conflict must outweigh an entirely empty grid in either tier.
        let conflict = b
            .conflict
            .max(empty * n + 1)
            .max(b.empty_with_conflicts * n + 1);

        Self {
            conflict,
            empty,
            ..b
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoreBreakdown {
    pub conflicts: u32,
    pub empty: u32,
    pub shapes: u32,
    pub colors: u32,
    pub score: Score,
}

pub fn score_breakdown(grid: &Grid, placements: &[Placement]) -> ScoreBreakdown {
    let w = ScoreWeights::for_cells(grid.len());
    let f = compute_grid_features(grid);
    let shapes = placements.len() as u32;
    let colors = count_distinct_colors(placements);

    let conflicts = i64::from(f.conflicts);
    let empty = i64::from(f.empty);

    let score = if f.conflicts > 0 {
        -w.conflict * conflicts - w.empty_with_conflicts * empty
    } else if f.empty > 0 {
        -w.empty * empty
    } else {
        -w.shape * i64::from(shapes) - w.color * i64::from(colors)
    };

    ScoreBreakdown {
        conflicts: f.conflicts,
        empty: f.empty,
        shapes,
        colors,
        score,
    }
}

/// Pure objective over (grid, placed shapes).
#[inline]
pub fn score(grid: &Grid, placements: &[Placement]) -> Score {
    score_breakdown(grid, placements).score
}
