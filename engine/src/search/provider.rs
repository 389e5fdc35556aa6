// engine/src/search/provider.rs
#![forbid(unsafe_code)]

use crate::engine::{
    Action, Cursor, Grid, Placement, Session, SessionError, Snapshot, can_place,
};

/// Command interface the search core drives. Object-safe so the driver can take
/// `&mut dyn StateProvider`.
pub trait StateProvider {
    fn grid(&self) -> &Grid;
    fn placements(&self) -> &[Placement];
    fn cursor(&self) -> Cursor;
    /// Completion flag as judged by the provider.
    fn is_done(&self) -> bool;
    fn execute(&mut self, action: Action) -> Result<(), SessionError>;

    fn can_place_current(&self) -> bool {
        let c = self.cursor();
        can_place(self.grid(), c.brush, c.pos)
    }

    fn export(&self) -> Snapshot {
        Snapshot {
            cursor: self.cursor(),
            grid: self.grid().clone(),
            placements: self.placements().to_vec(),
            done: self.is_done(),
        }
    }
}

impl StateProvider for Session {
    fn grid(&self) -> &Grid {
        Session::grid(self)
    }

    fn placements(&self) -> &[Placement] {
        Session::placements(self)
    }

    fn cursor(&self) -> Cursor {
        Session::cursor(self)
    }

    fn is_done(&self) -> bool {
        Session::is_done(self)
    }

    fn execute(&mut self, action: Action) -> Result<(), SessionError> {
        Session::execute(self, action)
    }

    fn can_place_current(&self) -> bool {
        Session::can_place_current(self)
    }

    fn export(&self) -> Snapshot {
        Session::export(self)
    }
}
