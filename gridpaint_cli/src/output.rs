// gridpaint_cli/src/output.rs
#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use gridpaint_engine::{Grid, Placement, Trace};

use crate::error::CliError;

pub const INITIAL_GRID_FILE: &str = "initial_grid.txt";
pub const GRID_FILE: &str = "grid.txt";
pub const SHAPES_FILE: &str = "shapes.txt";
pub const TRACE_FILE: &str = "trace.json";

/// One row per line, space-separated integers, `-1` for empty.
pub fn format_grid(grid: &Grid) -> String {
    let mut s = String::new();
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        s.push_str(&line.join(" "));
        s.push('\n');
    }
    s
}

/// `[[brush, (x, y), color], ...]` in commit order.
pub fn format_placements(placements: &[Placement]) -> String {
    let items: Vec<String> = placements
        .iter()
        .map(|p| {
            format!(
                "[{}, ({}, {}), {}]",
                p.brush.idx(),
                p.anchor.x,
                p.anchor.y,
                p.color.idx()
            )
        })
        .collect();
    format!("[{}]", items.join(", "))
}

/// Write to a sibling temp file, then rename over the target so readers never see a
/// half-written artifact.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CliError> {
    let io_err = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

/// Artifact locations for one run.
pub struct Artifacts {
    dir: PathBuf,
}

impl Artifacts {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CliError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CliError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write_initial_grid(&self, grid: &Grid) -> Result<(), CliError> {
        write_atomic(&self.path(INITIAL_GRID_FILE), &format_grid(grid))
    }

    pub fn write_final(&self, grid: &Grid, placements: &[Placement]) -> Result<(), CliError> {
        write_atomic(&self.path(GRID_FILE), &format_grid(grid))?;
        write_atomic(&self.path(SHAPES_FILE), &format_placements(placements))?;
        info!(dir = %self.dir.display(), placed = placements.len(), "wrote final grid and shapes");
        Ok(())
    }

    pub fn write_trace(&self, trace: &Trace) -> Result<(), CliError> {
        write_atomic(&self.path(TRACE_FILE), &trace.to_json_pretty()?)?;
        info!(frames = trace.frames.len(), "wrote trace");
        Ok(())
    }
}
