// engine/src/search/driver.rs
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::prelude::*;
use tracing::{debug, info};

use crate::engine::{Action, SessionError};
use crate::search::actions::ActionSampler;
use crate::search::config::{ConfigError, SearchConfig, StuckStrategy};
use crate::search::provider::StateProvider;
use crate::search::score::{Score, score};
use crate::search::sink::SearchSink;

/// How a run ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchOutcome {
    /// Provider reported completion.
    Done,
    /// `max_iterations` used up without completion.
    Exhausted,
    /// Stuck again after `restart_limit` rollbacks.
    RestartLimit,
    /// Cancel flag observed.
    Cancelled,
}

impl SearchOutcome {
    pub fn is_done(self) -> bool {
        self == SearchOutcome::Done
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchOutcome::Done => "done",
            SearchOutcome::Exhausted => "exhausted",
            SearchOutcome::RestartLimit => "restart_limit",
            SearchOutcome::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub iterations: u64,
    pub restarts: u32,
    /// Applied state-changing actions (moves, switches, placements, undos).
    pub transitions: u64,
    pub accepted: u64,
    /// Subset of `accepted` taken on an equal score.
    pub sideways: u64,
    pub rejected: u64,
    pub illegal_attempts: u64,
    pub final_score: Score,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Exploring,
    Evaluating { before: Score },
    Stuck,
    Restarting,
}

/// First-choice hill climber with sideways moves and rollback restarts.
pub struct HillClimber {
    cfg: SearchConfig,
    rng: StdRng,
    sampler: ActionSampler,
    cancel: Option<Arc<AtomicBool>>,
}

impl HillClimber {
    pub fn new(cfg: SearchConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(cfg.seed),
            sampler: ActionSampler::new(cfg.place_weight),
            cfg,
            cancel: None,
        })
    }

    /// Polled once per iteration; setting it ends the run with `Cancelled`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|f| f.load(Ordering::Relaxed))
    }

    /// Run until the provider reports done or a budget runs out. The provider is left
    /// in whatever state was last reached.
    ///
    /// Errors only surface provider contract violations; the driver checks legality
    /// before placing and never undoes past its own placements.
    pub fn run(
        &mut self,
        provider: &mut dyn StateProvider,
        sink: &mut dyn SearchSink,
    ) -> Result<SearchReport, SessionError> {
        let mut report = SearchReport {
            outcome: SearchOutcome::Exhausted,
            iterations: 0,
            restarts: 0,
            transitions: 0,
            accepted: 0,
            sideways: 0,
            rejected: 0,
            illegal_attempts: 0,
            final_score: score(provider.grid(), provider.placements()),
        };

        let mut phase = Phase::Exploring;
        let mut no_improvement: u32 = 0;
        let mut consecutive_failures: u32 = 0;

        let outcome = loop {
            match phase {
                Phase::Exploring => {
                    if provider.is_done() {
                        break SearchOutcome::Done;
                    }
                    if self.cancelled() {
                        break SearchOutcome::Cancelled;
                    }
                    if report.iterations >= self.cfg.max_iterations {
                        break SearchOutcome::Exhausted;
                    }

                    report.iterations += 1;
                    sink.on_iteration(report.iterations);

                    let action = self.sampler.sample(&mut self.rng);
                    if action.is_cursor_only() {
                        apply(provider, sink, action, &mut report)?;
                        continue;
                    }

                    if !provider.can_place_current() {
                        report.illegal_attempts += 1;
                        consecutive_failures += 1;
                        if consecutive_failures > self.cfg.failure_threshold {
                            self.relocate(provider, sink, &mut report)?;
                            consecutive_failures = 0;
                        }
                        continue;
                    }

                    consecutive_failures = 0;
                    let before = score(provider.grid(), provider.placements());
                    apply(provider, sink, Action::Place, &mut report)?;
                    phase = Phase::Evaluating { before };
                }

                Phase::Evaluating { before } => {
                    let after = score(provider.grid(), provider.placements());
                    let accepted = if after > before {
                        true
                    } else if after == before {
                        let take = self.rng.gen_bool(self.cfg.sideways_probability);
                        if take {
                            report.sideways += 1;
                        }
                        take
                    } else {
                        false
                    };
                    sink.on_evaluate(before, after, accepted);

                    if accepted {
                        report.accepted += 1;
                        no_improvement = 0;
                    } else {
                        apply(provider, sink, Action::Undo, &mut report)?;
                        report.rejected += 1;
                        no_improvement += 1;
                    }

                    phase = if no_improvement >= self.cfg.no_improvement_limit {
                        Phase::Stuck
                    } else {
                        Phase::Exploring
                    };
                }

                Phase::Stuck => {
                    debug!(
                        iteration = report.iterations,
                        placed = provider.placements().len(),
                        "no improvement limit reached"
                    );
                    match self.cfg.stuck_strategy {
                        StuckStrategy::Perturb => {
                            apply(provider, sink, Action::SwitchShape, &mut report)?;
                            apply(provider, sink, Action::SwitchColor, &mut report)?;
                            no_improvement = 0;
                            phase = Phase::Exploring;
                        }
                        StuckStrategy::Rollback => phase = Phase::Restarting,
                    }
                }

                Phase::Restarting => {
                    if report.restarts >= self.cfg.restart_limit {
                        break SearchOutcome::RestartLimit;
                    }
                    report.restarts += 1;

                    let undone = self.cfg.rollback_count(provider.placements().len());
                    for _ in 0..undone {
                        apply(provider, sink, Action::Undo, &mut report)?;
                    }
                    info!(
                        restart = report.restarts,
                        limit = self.cfg.restart_limit,
                        undone,
                        iteration = report.iterations,
                        "rolling back placements"
                    );
                    sink.on_restart(report.restarts, undone);

                    no_improvement = 0;
                    consecutive_failures = 0;
                    phase = Phase::Exploring;
                }
            }
        };

        report.outcome = outcome;
        report.final_score = score(provider.grid(), provider.placements());
        info!(
            outcome = outcome.label(),
            iterations = report.iterations,
            restarts = report.restarts,
            placed = provider.placements().len(),
            score = report.final_score,
            "search finished"
        );
        Ok(report)
    }

    /// Random walk of 1..=relocation_moves cursor moves.
    fn relocate(
        &mut self,
        provider: &mut dyn StateProvider,
        sink: &mut dyn SearchSink,
        report: &mut SearchReport,
    ) -> Result<(), SessionError> {
        let n = self.rng.gen_range(1..=self.cfg.relocation_moves);
        for _ in 0..n {
            let mv = self.sampler.random_move(&mut self.rng);
            apply(provider, sink, mv, report)?;
        }
        Ok(())
    }
}

/// Apply through the provider, then notify the sink with the post-action state.
fn apply(
    provider: &mut dyn StateProvider,
    sink: &mut dyn SearchSink,
    action: Action,
    report: &mut SearchReport,
) -> Result<(), SessionError> {
    provider.execute(action)?;
    report.transitions += 1;
    sink.on_transition(action, provider.cursor(), provider.grid());
    Ok(())
}
