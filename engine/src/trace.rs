// engine/src/trace.rs
#![forbid(unsafe_code)]

/*
Transition trace

Every state-changing action applied during a search is captured as one frame:
action label, cursor, brush/color index and a deep copy of the grid. The serialized
form is what the offline renderer consumes:

{
  "meta":   { "grid_size": 6, "colors": ["#988BD0", ...] },
  "frames": [ { "action": "place", "shape_pos": [x, y], "current_shape": 0,
                "current_color": 2, "grid": [[-1, 0, ...], ...] }, ... ]
}

Frames are owned copies; later mutation of the live grid never reaches them.
*/

use serde::Serialize;

use crate::engine::{Action, Cell, Color, Cursor, Grid};
use crate::search::SearchSink;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TraceMeta {
    pub grid_size: usize,
    pub colors: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TraceFrame {
    pub action: String,
    pub shape_pos: [usize; 2],
    pub current_shape: u8,
    pub current_color: u8,
    pub grid: Vec<Vec<Cell>>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Trace {
    pub meta: TraceMeta,
    pub frames: Vec<TraceFrame>,
}

impl Trace {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Debug)]
pub struct TraceRecorder {
    trace: Trace,
}

impl TraceRecorder {
    pub fn new(grid_size: usize) -> Self {
        Self {
            trace: Trace {
                meta: TraceMeta {
                    grid_size,
                    colors: Color::all().iter().map(|c| c.hex().to_string()).collect(),
                },
                frames: Vec::new(),
            },
        }
    }

    pub fn record(&mut self, action: Action, cursor: Cursor, grid: &Grid) {
        self.trace.frames.push(TraceFrame {
            action: action.label().to_string(),
            shape_pos: [cursor.pos.x, cursor.pos.y],
            current_shape: cursor.brush.idx(),
            current_color: cursor.color.idx(),
            grid: grid.to_rows(),
        });
    }

    pub fn frames(&self) -> &[TraceFrame] {
        &self.trace.frames
    }

    pub fn len(&self) -> usize {
        self.trace.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.frames.is_empty()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }
}

impl SearchSink for TraceRecorder {
    fn on_transition(&mut self, action: Action, cursor: Cursor, grid: &Grid) {
        self.record(action, cursor, grid);
    }
}
