// engine/src/engine/palette.rs
#![forbid(unsafe_code)]

use crate::engine::constants::Cell;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Indigo,
    Taupe,
    Viridian,
    Peach,
}

impl Color {
    pub fn all() -> &'static [Color] {
        use Color::*;
        &[Indigo, Taupe, Viridian, Peach]
    }

    /// Palette index, also the grid cell value.
    pub fn idx(self) -> u8 {
        use Color::*;
        match self {
            Indigo => 0,
            Taupe => 1,
            Viridian => 2,
            Peach => 3,
        }
    }

    pub fn from_idx(idx: u8) -> Option<Self> {
        Self::all().get(idx as usize).copied()
    }

    /// Decode a grid cell. `EMPTY` (and anything out of range) yields None.
    pub fn from_cell(cell: Cell) -> Option<Self> {
        u8::try_from(cell).ok().and_then(Self::from_idx)
    }

    #[inline]
    pub fn cell(self) -> Cell {
        self.idx() as Cell
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.idx() as usize + 1) % all.len()]
    }

    pub fn hex(self) -> &'static str {
        use Color::*;
        match self {
            Indigo => "#988BD0",
            Taupe => "#504136",
            Viridian => "#457F6E",
            Peach => "#F7C59F",
        }
    }

    pub fn name(self) -> &'static str {
        use Color::*;
        match self {
            Indigo => "indigo",
            Taupe => "taupe",
            Viridian => "viridian",
            Peach => "peach",
        }
    }
}
