// gridpaint_cli/src/run/runner.rs
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use gridpaint_engine::engine::render_frame;
use gridpaint_engine::{
    Action, Cursor, Grid, HillClimber, Score, SearchConfig, SearchSink, Session, Trace,
    TraceRecorder,
};

use super::sinks::ReportSink;
use super::stats::{FinalReport, RunStats};
use crate::error::CliError;

/// Fixed internal cadence for progress-bar live message updates.
/// (No CLI knob on purpose.)
const LIVE_EVERY: u64 = 500;

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    pub search: SearchConfig,

    /// Capture every transition for `trace.json`.
    pub record_trace: bool,

    // ---------------- output ----------------
    /// 0 = final summary only
    /// 1 = progress bar
    /// 2 = progress bar + periodic table (via sink)
    pub verbosity: u8,

    /// Print a table row every N iterations (only used when verbosity == 2).
    /// 0 disables table reporting.
    pub report_every: u64,

    // ---------------- rendering ----------------
    /// If Some(ms): render every transition; sleep ms between frames (0 = no sleep).
    pub render_ms: Option<u64>,
}

pub struct RunResult {
    pub report: FinalReport,
    pub trace: Option<Trace>,
}

pub struct Runner {
    cfg: RunnerConfig,
    sink: Box<dyn ReportSink>,
    cancel: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(cfg: RunnerConfig, sink: Box<dyn ReportSink>, cancel: Arc<AtomicBool>) -> Self {
        Self { cfg, sink, cancel }
    }

    pub fn run(&mut self, session: &mut Session) -> Result<RunResult, CliError> {
        let cfg = self.cfg.clone();
        let mut climber = HillClimber::new(cfg.search)?.with_cancel_flag(self.cancel.clone());

        // Progress bar is UI only; search logic does not depend on it.
        let pb = if cfg.verbosity >= 1 {
            let pb = ProgressBar::new(climber.config().max_iterations);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>9}/{len:<9}  {percent:>3}%  {elapsed_precise}  {msg}",
                )
                .expect("static progress template")
                .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        if cfg.render_ms.is_some() {
            print!("{}", session.render_ascii());
        }

        let mut observer = RunObserver {
            cfg: &cfg,
            stats: RunStats::new(),
            pb: pb.as_ref(),
            sink: self.sink.as_mut(),
            trace: cfg
                .record_trace
                .then(|| TraceRecorder::new(session.grid_size())),
        };

        let report = climber.run(session, &mut observer)?;

        let RunObserver { stats, trace, .. } = observer;

        if let Some(pb) = pb {
            pb.finish_with_message(report.outcome.label());
        }

        Ok(RunResult {
            report: stats.final_report(&report, session),
            trace: trace.map(TraceRecorder::into_trace),
        })
    }
}

/// Bridges search hooks to stats, progress, table rows, rendering and the trace.
struct RunObserver<'a> {
    cfg: &'a RunnerConfig,
    stats: RunStats,
    pb: Option<&'a ProgressBar>,
    sink: &'a mut dyn ReportSink,
    trace: Option<TraceRecorder>,
}

impl SearchSink for RunObserver<'_> {
    fn on_iteration(&mut self, iteration: u64) {
        self.stats.on_iteration(iteration);

        if let Some(pb) = self.pb {
            pb.inc(1);
            if iteration % LIVE_EVERY == 0 {
                pb.set_message(self.stats.live_msg());
            }
        }

        // Periodic table report (verbosity == 2 only).
        if self.cfg.verbosity == 2
            && self.cfg.report_every > 0
            && iteration % self.cfg.report_every == 0
        {
            let row = self.stats.report_row(self.cfg.search.max_iterations);
            self.sink.on_report_row(&row, self.pb);
        }
    }

    fn on_transition(&mut self, action: Action, cursor: Cursor, grid: &Grid) {
        self.stats.on_transition(action);

        if let Some(trace) = self.trace.as_mut() {
            trace.record(action, cursor, grid);
        }

        if let Some(ms) = self.cfg.render_ms {
            println!(
                "iter={} action={} placed={}",
                self.stats.iterations,
                action.label(),
                self.stats.placed
            );
            print!("{}", render_frame(grid, cursor));
            if ms > 0 {
                std::thread::sleep(Duration::from_millis(ms));
            }
        }
    }

    fn on_evaluate(&mut self, before: Score, after: Score, accepted: bool) {
        self.stats.on_evaluate(before, after, accepted);
    }

    fn on_restart(&mut self, restart: u32, undone: usize) {
        self.stats.on_restart(restart);
        if let Some(pb) = self.pb {
            pb.println(format!(
                "restart {}/{}: undid {} placements",
                restart, self.cfg.search.restart_limit, undone
            ));
        }
    }
}
