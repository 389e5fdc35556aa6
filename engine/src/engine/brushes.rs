// engine/src/engine/brushes.rs
#![forbid(unsafe_code)]

/// Fixed brush catalog. Discriminant order is the catalog index used in traces and dumps.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Brush {
    Dot,
    DiagDown,
    DiagUp,
    ZigzagTall,
    ZagzigTall,
    ZigzagWide,
    ZagzigWide,
    Caret,
    Vee,
}

impl Brush {
    pub fn all() -> &'static [Brush] {
        use Brush::*;
        &[
            Dot, DiagDown, DiagUp, ZigzagTall, ZagzigTall, ZigzagWide, ZagzigWide, Caret, Vee,
        ]
    }

    /// Catalog index 0..=8.
    pub fn idx(self) -> u8 {
        use Brush::*;
        match self {
            Dot => 0,
            DiagDown => 1,
            DiagUp => 2,
            ZigzagTall => 3,
            ZagzigTall => 4,
            ZigzagWide => 5,
            ZagzigWide => 6,
            Caret => 7,
            Vee => 8,
        }
    }

    /// Inverse of `idx()`. Returns None for invalid ids.
    pub fn from_idx(idx: u8) -> Option<Self> {
        Self::all().get(idx as usize).copied()
    }

    /// Next catalog entry, wrapping around.
    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.idx() as usize + 1) % all.len()]
    }

    /// Filled cells as (dx, dy) offsets from the top-left anchor.
    ///
    /// No brush ever fills two orthogonally adjacent cells, so a single placement
    /// can never conflict with itself.
    pub fn cells(self) -> &'static [(usize, usize)] {
        use Brush::*;
        match self {
            Dot => &[(0, 0)],
            DiagDown => &[(0, 0), (1, 1)],
            DiagUp => &[(1, 0), (0, 1)],
            ZigzagTall => &[(0, 0), (1, 1), (0, 2), (1, 3)],
            ZagzigTall => &[(1, 0), (0, 1), (1, 2), (0, 3)],
            ZigzagWide => &[(0, 0), (2, 0), (1, 1), (3, 1)],
            ZagzigWide => &[(1, 0), (3, 0), (0, 1), (2, 1)],
            Caret => &[(1, 0), (0, 1), (2, 1)],
            Vee => &[(0, 0), (2, 0), (1, 1)],
        }
    }

    /// Bounding box (width, height) of the filled cells.
    #[inline]
    pub fn extent(self) -> (usize, usize) {
        let mut w = 0;
        let mut h = 0;
        for &(dx, dy) in self.cells() {
            w = w.max(dx + 1);
            h = h.max(dy + 1);
        }
        (w, h)
    }
}
