// engine/src/engine/session.rs
#![forbid(unsafe_code)]

use rand::prelude::*;
use thiserror::Error;

use crate::engine::action::Action;
use crate::engine::brushes::Brush;
use crate::engine::constants::{
    DEFAULT_GRID_SIZE, DEFAULT_SEEDED_BOXES, EMPTY, MAX_GRID_SIZE, MIN_GRID_SIZE, NUM_COLORS,
};
use crate::engine::features::is_complete;
use crate::engine::grid::{Grid, Pos, can_place, paint};
use crate::engine::palette::Color;

/// Salt mixed into the session seed so box seeding has its own RNG stream.
const SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cursor {
    pub pos: Pos,
    pub brush: Brush,
    pub color: Color,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            pos: Pos::default(),
            brush: Brush::Dot,
            color: Color::Indigo,
        }
    }
}

/// One committed brush stroke. Holds everything needed to revert it exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Placement {
    pub brush: Brush,
    pub anchor: Pos,
    pub color: Color,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Cells pre-colored at session start. They are not placements and survive every undo.
    pub seeded_boxes: usize,
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            seeded_boxes: DEFAULT_SEEDED_BOXES,
            seed: 12345,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SessionError {
    #[error("grid size {size} outside supported range {min}..={max}")]
    GridSizeOutOfRange { size: usize, min: usize, max: usize },
    #[error("{requested} seeded boxes requested, at most {max} allowed on a {size}x{size} grid")]
    TooManySeededBoxes {
        requested: usize,
        max: usize,
        size: usize,
    },
    #[error("initial grid must be square with cells in -1..{}", NUM_COLORS)]
    InvalidGrid,
    #[error("brush {brush:?} cannot be placed at ({}, {})", .anchor.x, .anchor.y)]
    IllegalPlacement { brush: Brush, anchor: Pos },
    #[error("undo requested with an empty placement history")]
    EmptyHistory,
}

/// Full read-only state tuple, deep-copied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pub cursor: Cursor,
    pub grid: Grid,
    pub placements: Vec<Placement>,
    pub done: bool,
}

/// Owns the grid, cursor and placement stack. All mutation goes through `execute`
/// (or the `place`/`undo` shortcuts), which keeps undo exactly reversible.
#[derive(Clone, Debug)]
pub struct Session {
    grid: Grid,
    cursor: Cursor,
    placements: Vec<Placement>,
    done: bool,
}

impl Session {
    pub fn new(cfg: SessionConfig) -> Result<Self, SessionError> {
        check_size(cfg.grid_size)?;

        let max_seeded = cfg.grid_size * cfg.grid_size / 4;
        if cfg.seeded_boxes > max_seeded {
            return Err(SessionError::TooManySeededBoxes {
                requested: cfg.seeded_boxes,
                max: max_seeded,
                size: cfg.grid_size,
            });
        }

        let mut grid = Grid::square(cfg.grid_size);
        seed_colored_boxes(&mut grid, cfg.seeded_boxes, cfg.seed);
        Ok(Self::with_grid(grid))
    }

    /// Empty grid, no seeded boxes.
    pub fn empty(grid_size: usize) -> Result<Self, SessionError> {
        Self::new(SessionConfig {
            grid_size,
            seeded_boxes: 0,
            seed: 0,
        })
    }

    /// Start from a caller-provided grid; its colored cells behave like seeded boxes.
    pub fn from_grid(grid: Grid) -> Result<Self, SessionError> {
        if grid.width() != grid.height() {
            return Err(SessionError::InvalidGrid);
        }
        check_size(grid.width())?;
        let valid = grid
            .cells()
            .iter()
            .all(|&c| c == EMPTY || Color::from_cell(c).is_some());
        if !valid {
            return Err(SessionError::InvalidGrid);
        }
        Ok(Self::with_grid(grid))
    }

    fn with_grid(grid: Grid) -> Self {
        let done = is_complete(&grid);
        Self {
            grid,
            cursor: Cursor::default(),
            placements: Vec::new(),
            done,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Completion flag: grid fully covered with no adjacent equal colors.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn export(&self) -> Snapshot {
        Snapshot {
            cursor: self.cursor,
            grid: self.grid.clone(),
            placements: self.placements.clone(),
            done: self.done,
        }
    }

    /// Legality of the current brush at the current cursor.
    pub fn can_place_current(&self) -> bool {
        can_place(&self.grid, self.cursor.brush, self.cursor.pos)
    }

    pub fn execute(&mut self, action: Action) -> Result<(), SessionError> {
        match action {
            Action::Up | Action::Down | Action::Left | Action::Right => self.move_cursor(action),
            Action::SwitchShape => {
                self.cursor.brush = self.cursor.brush.next();
                self.clamp_cursor();
            }
            Action::SwitchColor => self.cursor.color = self.cursor.color.next(),
            Action::Place => {
                self.place()?;
            }
            Action::Undo => {
                self.undo()?;
            }
        }
        Ok(())
    }

    /// Commit the current brush/color at the cursor. Refuses illegal placements
    /// without touching any state.
    pub fn place(&mut self) -> Result<Placement, SessionError> {
        let Cursor { pos, brush, color } = self.cursor;
        if !can_place(&self.grid, brush, pos) {
            return Err(SessionError::IllegalPlacement { brush, anchor: pos });
        }

        paint(&mut self.grid, brush, pos, color.cell());
        let placement = Placement {
            brush,
            anchor: pos,
            color,
        };
        self.placements.push(placement);
        self.done = is_complete(&self.grid);
        Ok(placement)
    }

    /// Revert the most recent placement. The cursor is left where it is.
    pub fn undo(&mut self) -> Result<Placement, SessionError> {
        let last = self.placements.pop().ok_or(SessionError::EmptyHistory)?;
        paint(&mut self.grid, last.brush, last.anchor, EMPTY);
        self.done = is_complete(&self.grid);
        Ok(last)
    }

    /// Cursor moves are clamped so the whole brush stays inside the grid.
    fn move_cursor(&mut self, action: Action) {
        let (w, h) = self.cursor.brush.extent();
        let size = self.grid.width();
        let pos = &mut self.cursor.pos;
        match action {
            Action::Up if pos.y > 0 => pos.y -= 1,
            Action::Down if pos.y + h < size => pos.y += 1,
            Action::Left if pos.x > 0 => pos.x -= 1,
            Action::Right if pos.x + w < size => pos.x += 1,
            _ => {}
        }
    }

    /// Pull the anchor back after a brush switch so the new brush fits.
    fn clamp_cursor(&mut self) {
        let (w, h) = self.cursor.brush.extent();
        let size = self.grid.width();
        self.cursor.pos.x = self.cursor.pos.x.min(size - w);
        self.cursor.pos.y = self.cursor.pos.y.min(size - h);
    }

    pub fn render_ascii(&self) -> String {
        let mut s = render_frame(&self.grid, self.cursor);
        s.push_str(&format!(
            "placed={} done={}\n",
            self.placements.len(),
            self.done
        ));
        s
    }
}

/// ASCII frame: palette digits, `.` for empty, `+` for empty cells under the brush.
pub fn render_frame(grid: &Grid, cursor: Cursor) -> String {
    let brush_cells: Vec<(usize, usize)> = cursor
        .brush
        .cells()
        .iter()
        .map(|&(dx, dy)| (cursor.pos.x + dx, cursor.pos.y + dy))
        .collect();

    let border = format!("+{}+\n", "-".repeat(grid.width()));
    let mut s = border.clone();
    for (y, row) in grid.rows().enumerate() {
        s.push('|');
        for (x, &v) in row.iter().enumerate() {
            let ch = match Color::from_cell(v) {
                Some(c) => char::from(b'0' + c.idx()),
                None if brush_cells.contains(&(x, y)) => '+',
                None => '.',
            };
            s.push(ch);
        }
        s.push_str("|\n");
    }
    s.push_str(&border);
    s.push_str(&format!(
        "brush={:?} color={} pos=({},{})\n",
        cursor.brush,
        cursor.color.name(),
        cursor.pos.x,
        cursor.pos.y
    ));
    s
}

fn check_size(size: usize) -> Result<(), SessionError> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        return Err(SessionError::GridSizeOutOfRange {
            size,
            min: MIN_GRID_SIZE,
            max: MAX_GRID_SIZE,
        });
    }
    Ok(())
}

/// Color `count` random cells. A box never matches a colored neighbor and never leaves
/// an empty neighbor with every palette color already around it.
fn seed_colored_boxes(grid: &mut Grid, count: usize, seed: u64) {
    if count == 0 {
        return;
    }

    let mut rng = StdRng::seed_from_u64(seed ^ SEED_SALT);

    let (w, h) = (grid.width(), grid.height());
    let mut coords: Vec<(usize, usize)> = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .collect();
    coords.shuffle(&mut rng);

    let mut colors = Color::all().to_vec();
    let mut seeded = 0;
    for (x, y) in coords {
        if seeded == count {
            break;
        }
        colors.shuffle(&mut rng);
        if let Some(c) = colors.iter().copied().find(|&c| seed_fits(grid, x, y, c)) {
            grid.set(x, y, c.cell());
            seeded += 1;
        }
    }
}

fn seed_fits(grid: &Grid, x: usize, y: usize, color: Color) -> bool {
    if grid.neighbors(x, y).any(|(nx, ny)| grid.get(nx, ny) == color.cell()) {
        return false;
    }

    let mut trial = grid.clone();
    trial.set(x, y, color.cell());
    trial
        .neighbors(x, y)
        .filter(|&(nx, ny)| trial.get(nx, ny) == EMPTY)
        .all(|(nx, ny)| has_free_color(&trial, nx, ny))
}

fn has_free_color(grid: &Grid, x: usize, y: usize) -> bool {
    Color::all()
        .iter()
        .any(|c| grid.neighbors(x, y).all(|(nx, ny)| grid.get(nx, ny) != c.cell()))
}
