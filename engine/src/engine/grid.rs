// engine/src/engine/grid.rs
#![forbid(unsafe_code)]

use crate::engine::brushes::Brush;
use crate::engine::constants::{Cell, EMPTY};

/// Anchor / cursor position: top-left cell of a brush's bounding box.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Row-major cell matrix. Sessions always build square grids; the scoring helpers
/// accept any rectangle.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn square(size: usize) -> Self {
        Self {
            width: size,
            height: size,
            cells: vec![EMPTY; size * size],
        }
    }

    /// Build from explicit rows. Returns None for empty or ragged input.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height: rows.len(),
            cells: rows.concat(),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, v: Cell) {
        self.cells[y * self.width + x] = v;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Owned nested copy, e.g. for trace frames.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    /// Orthogonal neighbors of (x, y) that lie inside the grid.
    pub(crate) fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (self.width, self.height);
        let up = (y > 0).then(|| (x, y - 1));
        let down = (y + 1 < h).then(|| (x, y + 1));
        let left = (x > 0).then(|| (x - 1, y));
        let right = (x + 1 < w).then(|| (x + 1, y));
        [up, down, left, right].into_iter().flatten()
    }
}

/// Legality query: every cell the brush would fill lies inside the grid and is empty.
/// Pure; never mutates.
pub fn can_place(grid: &Grid, brush: Brush, anchor: Pos) -> bool {
    for &(dx, dy) in brush.cells() {
        let gx = anchor.x + dx;
        let gy = anchor.y + dy;
        if gx >= grid.width() || gy >= grid.height() {
            return false;
        }
        if grid.get(gx, gy) != EMPTY {
            return false;
        }
    }
    true
}

/// Write `v` into every cell covered by the brush. Callers check `can_place` first
/// (or are reverting a placement that passed it).
pub(crate) fn paint(grid: &mut Grid, brush: Brush, anchor: Pos, v: Cell) {
    for &(dx, dy) in brush.cells() {
        grid.set(anchor.x + dx, anchor.y + dy, v);
    }
}
