// gridpaint_cli/src/run/stats.rs
#![forbid(unsafe_code)]

use std::time::Instant;

use gridpaint_engine::{Action, Score, SearchOutcome, SearchReport, Session, score_breakdown};

use super::sinks::ReportRow;

/// Live counters fed by the runner's search observer.
#[derive(Clone, Debug)]
pub struct RunStats {
    pub iterations: u64,
    pub transitions: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub sideways: u64,
    pub restarts: u32,
    /// Placements currently on the grid (commits minus undos).
    pub placed: u64,
    pub best_score: Option<Score>,

    t0: Instant,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            iterations: 0,
            transitions: 0,
            accepted: 0,
            rejected: 0,
            sideways: 0,
            restarts: 0,
            placed: 0,
            best_score: None,
            t0: Instant::now(),
        }
    }

    pub fn on_iteration(&mut self, iteration: u64) {
        self.iterations = iteration;
    }

    pub fn on_transition(&mut self, action: Action) {
        self.transitions += 1;
        match action {
            Action::Place => self.placed += 1,
            Action::Undo => self.placed = self.placed.saturating_sub(1),
            _ => {}
        }
    }

    pub fn on_evaluate(&mut self, before: Score, after: Score, accepted: bool) {
        if !accepted {
            self.rejected += 1;
            return;
        }
        self.accepted += 1;
        if after == before {
            self.sideways += 1;
        }
        self.best_score = Some(self.best_score.map_or(after, |b| b.max(after)));
    }

    pub fn on_restart(&mut self, restart: u32) {
        self.restarts = restart;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    pub fn iterations_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.iterations as f64 / dt
        } else {
            0.0
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        let evaluated = self.accepted + self.rejected;
        if evaluated > 0 {
            self.accepted as f64 / evaluated as f64
        } else {
            0.0
        }
    }

    pub fn report_row(&self, iterations_total: u64) -> ReportRow {
        ReportRow {
            iteration: self.iterations,
            iterations_total,
            ips: self.iterations_per_sec(),
            transitions: self.transitions,
            accepted: self.accepted,
            rejected: self.rejected,
            sideways: self.sideways,
            restarts: self.restarts,
            placed: self.placed,
            best_score: self.best_score,
        }
    }

    pub fn live_msg(&self) -> String {
        format!(
            "it/s={:.0} placed={} acc={:.2} rst={} best={}",
            self.iterations_per_sec(),
            self.placed,
            self.acceptance_rate(),
            self.restarts,
            self.best_score
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
        )
    }

    pub fn final_report(&self, report: &SearchReport, session: &Session) -> FinalReport {
        let b = score_breakdown(session.grid(), session.placements());
        FinalReport {
            outcome: report.outcome,
            done: session.is_done(),

            iterations: report.iterations,
            restarts: report.restarts,
            transitions: report.transitions,
            accepted: report.accepted,
            sideways: report.sideways,
            rejected: report.rejected,
            illegal_attempts: report.illegal_attempts,

            elapsed_s: self.elapsed_secs(),
            iterations_per_s: self.iterations_per_sec(),

            shapes: b.shapes,
            colors: b.colors,
            empty: b.empty,
            conflicts: b.conflicts,
            score: b.score,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FinalReport {
    pub outcome: SearchOutcome,
    pub done: bool,

    pub iterations: u64,
    pub restarts: u32,
    pub transitions: u64,
    pub accepted: u64,
    pub sideways: u64,
    pub rejected: u64,
    pub illegal_attempts: u64,

    pub elapsed_s: f64,
    pub iterations_per_s: f64,

    pub shapes: u32,
    pub colors: u32,
    pub empty: u32,
    pub conflicts: u32,
    pub score: Score,
}
