// engine/src/engine/action.rs
#![forbid(unsafe_code)]

/// Command vocabulary understood by a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    SwitchShape,
    SwitchColor,
    Place,
    Undo,
}

impl Action {
    pub const MOVES: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn label(self) -> &'static str {
        use Action::*;
        match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
            SwitchShape => "switchshape",
            SwitchColor => "switchcolor",
            Place => "place",
            Undo => "undo",
        }
    }

    /// Cursor-only actions: they never touch the grid or the placement history.
    #[inline]
    pub fn is_cursor_only(self) -> bool {
        !matches!(self, Action::Place | Action::Undo)
    }
}
