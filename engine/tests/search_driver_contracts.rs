// engine/tests/search_driver_contracts.rs
#![forbid(unsafe_code)]

/**
 * Hill-climbing driver contract tests.
 *
 * Purpose:
 * - Lock the driver's observable behavior against a real session, independent of
 *   any particular random stream.
 *
 * What is tested:
 * - Accepted placements never lower the score; rejected ones never raise it.
 * - One trace frame per applied action, in application order, holding owned grid copies.
 * - Terminal outcomes: done, iteration budget, restart limit, cancellation.
 * - Rollback restarts undo the configured number of real placements, newest first.
 * - Repeated illegal placements relocate the cursor with moves only and never count
 *   toward stagnation.
 * - Done runs end on a full conflict-free grid.
 * - Identical seeds replay identically.
 * - Seeded 6x6 runs terminate in the large majority of cases.
 */
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use gridpaint_engine::{
    Action, Cursor, Grid, HillClimber, NoopSink, Placement, Score, SearchConfig, SearchOutcome,
    SearchSink, Session, SessionConfig, SessionError, StateProvider, StuckStrategy, TraceRecorder,
    count_conflicts, count_empty_cells,
};

/// Records every accept/reject decision.
#[derive(Default)]
struct EvalLog {
    decisions: Vec<(Score, Score, bool)>,
    restarts: Vec<(u32, usize)>,
}

impl SearchSink for EvalLog {
    fn on_evaluate(&mut self, before: Score, after: Score, accepted: bool) {
        self.decisions.push((before, after, accepted));
    }

    fn on_restart(&mut self, restart: u32, undone: usize) {
        self.restarts.push((restart, undone));
    }
}

/// Session wrapper that logs what actually reached the provider.
struct Recording {
    inner: Session,
    applied: Vec<(Action, Grid)>,
}

impl StateProvider for Recording {
    fn grid(&self) -> &Grid {
        self.inner.grid()
    }

    fn placements(&self) -> &[Placement] {
        self.inner.placements()
    }

    fn cursor(&self) -> Cursor {
        self.inner.cursor()
    }

    fn is_done(&self) -> bool {
        self.inner.is_done()
    }

    fn execute(&mut self, action: Action) -> Result<(), SessionError> {
        self.inner.execute(action)?;
        self.applied.push((action, self.inner.grid().clone()));
        Ok(())
    }
}

fn seeded_session(seed: u64) -> Session {
    Session::new(SessionConfig {
        grid_size: 6,
        seeded_boxes: 5,
        seed,
    })
    .unwrap()
}

/// Single empty cell whose neighbors already hold every palette color: any fill conflicts.
fn blocked_session() -> Session {
    let g = Grid::from_rows(&[
        vec![2, 0, 1, 0],
        vec![1, -1, 2, 3],
        vec![0, 3, 0, 1],
        vec![1, 0, 1, 0],
    ])
    .unwrap();
    Session::from_grid(g).unwrap()
}

fn cfg(seed: u64) -> SearchConfig {
    SearchConfig {
        seed,
        ..SearchConfig::default()
    }
}

#[test]
fn accept_decisions_are_monotone() {
    let mut s = seeded_session(3);
    let mut log = EvalLog::default();
    let report = HillClimber::new(SearchConfig {
        max_iterations: 20_000,
        ..cfg(11)
    })
    .unwrap()
    .run(&mut s, &mut log)
    .unwrap();

    assert!(!log.decisions.is_empty());
    for &(before, after, accepted) in &log.decisions {
        if accepted {
            assert!(after >= before, "accepted {before} -> {after}");
        } else {
            assert!(after <= before, "rejected {before} -> {after}");
        }
    }

    let accepted = log.decisions.iter().filter(|d| d.2).count() as u64;
    let sideways = log.decisions.iter().filter(|d| d.2 && d.0 == d.1).count() as u64;
    assert_eq!(accepted, report.accepted);
    assert_eq!(sideways, report.sideways);
    assert_eq!(log.decisions.len() as u64, report.accepted + report.rejected);
    assert_eq!(log.restarts.len() as u32, report.restarts);
}

#[test]
fn trace_has_one_owned_frame_per_applied_action() {
    let mut provider = Recording {
        inner: seeded_session(5),
        applied: Vec::new(),
    };
    let mut rec = TraceRecorder::new(6);
    let report = HillClimber::new(SearchConfig {
        max_iterations: 3_000,
        ..cfg(21)
    })
    .unwrap()
    .run(&mut provider, &mut rec)
    .unwrap();

    assert_eq!(rec.len() as u64, report.transitions);
    assert_eq!(rec.len(), provider.applied.len());
    for (frame, (action, grid)) in rec.frames().iter().zip(&provider.applied) {
        assert_eq!(frame.action, action.label());
        assert_eq!(&frame.grid, &grid.to_rows());
    }

    let last = rec.frames().last().cloned().unwrap();
    let cur = provider.inner.cursor();
    assert_eq!(last.shape_pos, [cur.pos.x, cur.pos.y]);
    assert_eq!(last.current_shape, cur.brush.idx());
    assert_eq!(last.current_color, cur.color.idx());

    // Mutating the live session afterwards must not reach recorded frames.
    if provider.inner.placements().is_empty() {
        provider.inner.place().ok();
    } else {
        provider.inner.undo().unwrap();
    }
    assert_eq!(rec.frames().last(), Some(&last));

    let places = rec.frames().iter().filter(|f| f.action == "place").count() as u64;
    assert_eq!(places, report.accepted + report.rejected);

    let json = rec.trace().to_json_pretty().unwrap();
    assert!(json.contains("\"meta\""));
    assert!(json.contains("#988BD0"));
}

#[test]
fn iteration_budget_ends_with_exhausted() {
    let mut s = seeded_session(1);
    let report = HillClimber::new(SearchConfig {
        max_iterations: 10,
        ..cfg(2)
    })
    .unwrap()
    .run(&mut s, &mut NoopSink)
    .unwrap();

    assert_eq!(report.outcome, SearchOutcome::Exhausted);
    assert_eq!(report.iterations, 10);
    assert_eq!(report.restarts, 0);
}

#[test]
fn preset_cancel_flag_stops_before_first_iteration() {
    let mut s = seeded_session(1);
    let before = s.export();
    let flag = Arc::new(AtomicBool::new(true));
    let report = HillClimber::new(cfg(2))
        .unwrap()
        .with_cancel_flag(flag)
        .run(&mut s, &mut NoopSink)
        .unwrap();

    assert_eq!(report.outcome, SearchOutcome::Cancelled);
    assert_eq!(report.iterations, 0);
    assert_eq!(report.transitions, 0);
    assert_eq!(s.export(), before);
}

#[test]
fn unsolvable_grid_hits_restart_limit() {
    let mut s = blocked_session();
    let start = s.grid().clone();
    let mut rec = TraceRecorder::new(4);
    let mut log = EvalLog::default();

    let report = HillClimber::new(SearchConfig {
        max_iterations: 1_000_000,
        no_improvement_limit: 3,
        restart_limit: 2,
        ..cfg(8)
    })
    .unwrap()
    .run(&mut s, &mut (&mut rec, &mut log))
    .unwrap();

    assert_eq!(report.outcome, SearchOutcome::RestartLimit);
    assert_eq!(report.restarts, 2);
    assert_eq!(report.accepted, 0);
    assert_eq!(report.rejected, 9);
    assert_eq!(log.restarts, vec![(1, 0), (2, 0)]);

    // Every committed fill was undone; nothing else could be.
    let undos = rec.frames().iter().filter(|f| f.action == "undo").count() as u64;
    assert_eq!(undos, report.rejected);
    assert!(s.placements().is_empty());
    assert_eq!(s.grid(), &start);
}

#[test]
fn perturb_strategy_never_restarts() {
    let mut s = blocked_session();
    let report = HillClimber::new(SearchConfig {
        max_iterations: 10_000,
        no_improvement_limit: 3,
        stuck_strategy: StuckStrategy::Perturb,
        ..cfg(8)
    })
    .unwrap()
    .run(&mut s, &mut NoopSink)
    .unwrap();

    assert_eq!(report.outcome, SearchOutcome::Exhausted);
    assert_eq!(report.iterations, 10_000);
    assert_eq!(report.restarts, 0);
    assert!(report.rejected > 3);
}

#[test]
fn zero_sideways_probability_never_accepts_ties() {
    let mut s = seeded_session(9);
    let report = HillClimber::new(SearchConfig {
        max_iterations: 20_000,
        sideways_probability: 0.0,
        ..cfg(4)
    })
    .unwrap()
    .run(&mut s, &mut NoopSink)
    .unwrap();

    assert_eq!(report.sideways, 0);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let bad = SearchConfig {
        sideways_probability: 1.5,
        ..SearchConfig::default()
    };
    assert!(HillClimber::new(bad).is_err());

    let bad = SearchConfig {
        place_weight: 0,
        ..SearchConfig::default()
    };
    assert!(HillClimber::new(bad).is_err());
}

#[test]
fn identical_seeds_replay_identically() {
    let run = || {
        let mut s = seeded_session(77);
        let r = HillClimber::new(SearchConfig {
            max_iterations: 15_000,
            ..cfg(1076)
        })
        .unwrap()
        .run(&mut s, &mut NoopSink)
        .unwrap();
        (r, s.export())
    };
    assert_eq!(run(), run());
}

#[test]
fn seeded_six_by_six_runs_mostly_terminate() {
    let seeds = 0u64..64;
    let mut done = 0;
    for seed in seeds.clone() {
        let mut s = seeded_session(seed);
        let report = HillClimber::new(cfg(seed + 999))
            .unwrap()
            .run(&mut s, &mut NoopSink)
            .unwrap();

        assert!(report.iterations <= SearchConfig::default().max_iterations);
        if report.outcome.is_done() {
            done += 1;
            assert!(s.is_done());
            assert_eq!(count_conflicts(s.grid()), 0);
            assert_eq!(count_empty_cells(s.grid()), 0);
            assert_eq!(report.final_score, gridpaint_engine::score(s.grid(), s.placements()));
        }
    }
    let total = seeds.count();
    assert!(done * 5 >= total * 4, "only {done}/{total} runs terminated");
}

/// Mirrors the provider's placement stack from the transition stream and checks every
/// undo against it.
struct RollbackAudit {
    cfg: SearchConfig,
    grid: Grid,
    /// Grid as it was before each live placement.
    before_place: Vec<Grid>,
    pending_reject: bool,
    rollback_undos: usize,
    /// (undone, placed before the rollback) per restart.
    restarts: Vec<(usize, usize)>,
}

impl RollbackAudit {
    fn new(cfg: SearchConfig, start: &Grid) -> Self {
        Self {
            cfg,
            grid: start.clone(),
            before_place: Vec::new(),
            pending_reject: false,
            rollback_undos: 0,
            restarts: Vec::new(),
        }
    }
}

impl SearchSink for RollbackAudit {
    fn on_transition(&mut self, action: Action, _cursor: Cursor, grid: &Grid) {
        match action {
            Action::Place => self.before_place.push(self.grid.clone()),
            Action::Undo => {
                let restored = self.before_place.pop().expect("undo without a placement");
                assert_eq!(grid, &restored, "undo must restore the pre-placement grid");
                if self.pending_reject {
                    self.pending_reject = false;
                } else {
                    self.rollback_undos += 1;
                }
            }
            _ => assert_eq!(grid, &self.grid, "cursor actions must not touch the grid"),
        }
        self.grid = grid.clone();
    }

    fn on_evaluate(&mut self, _before: Score, _after: Score, accepted: bool) {
        self.pending_reject = !accepted;
    }

    fn on_restart(&mut self, _restart: u32, undone: usize) {
        let placed_before = self.before_place.len() + self.rollback_undos;
        assert_eq!(undone, self.rollback_undos);
        assert_eq!(undone, self.cfg.rollback_count(placed_before));
        self.restarts.push((undone, placed_before));
        self.rollback_undos = 0;
    }
}

#[test]
fn rollback_undoes_newest_placements_first() {
    let search = SearchConfig {
        max_iterations: 200_000,
        no_improvement_limit: 2,
        restart_limit: 20,
        ..cfg(3)
    };
    let mut s = seeded_session(3);
    let mut audit = RollbackAudit::new(search, s.grid());

    let report = HillClimber::new(search)
        .unwrap()
        .run(&mut s, &mut audit)
        .unwrap();

    assert_eq!(audit.restarts.len() as u32, report.restarts);
    assert!(report.restarts > 0);
    assert!(
        audit.restarts.iter().any(|&(undone, _)| undone > 0),
        "no rollback undid anything: {:?}",
        audit.restarts
    );
    for &(undone, placed) in &audit.restarts {
        assert!(undone <= placed);
        assert!(undone >= placed.min(search.rollback_min));
    }

    // The mirrored stack matches the live history and grid.
    assert_eq!(audit.before_place.len(), s.placements().len());
    assert_eq!(&audit.grid, s.grid());
}

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Iteration,
    LegalityQuery,
    Applied(Action),
}

/// Provider that refuses every placement.
struct NeverLegal {
    inner: Session,
    events: Rc<RefCell<Vec<Event>>>,
}

impl StateProvider for NeverLegal {
    fn grid(&self) -> &Grid {
        self.inner.grid()
    }

    fn placements(&self) -> &[Placement] {
        self.inner.placements()
    }

    fn cursor(&self) -> Cursor {
        self.inner.cursor()
    }

    fn is_done(&self) -> bool {
        false
    }

    fn execute(&mut self, action: Action) -> Result<(), SessionError> {
        self.events.borrow_mut().push(Event::Applied(action));
        self.inner.execute(action)
    }

    fn can_place_current(&self) -> bool {
        self.events.borrow_mut().push(Event::LegalityQuery);
        false
    }
}

struct IterationMarks(Rc<RefCell<Vec<Event>>>);

impl SearchSink for IterationMarks {
    fn on_iteration(&mut self, _iteration: u64) {
        self.0.borrow_mut().push(Event::Iteration);
    }
}

#[test]
fn repeated_illegal_placements_relocate_with_moves_only() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut provider = NeverLegal {
        inner: seeded_session(4),
        events: events.clone(),
    };
    let search = SearchConfig {
        max_iterations: 5_000,
        // Any stagnation would end the run immediately.
        no_improvement_limit: 1,
        restart_limit: 0,
        failure_threshold: 3,
        relocation_moves: 4,
        ..cfg(6)
    };

    let report = HillClimber::new(search)
        .unwrap()
        .run(&mut provider, &mut IterationMarks(events.clone()))
        .unwrap();

    assert_eq!(report.outcome, SearchOutcome::Exhausted);
    assert_eq!(report.iterations, 5_000);
    assert_eq!(report.accepted + report.rejected, 0);
    assert_eq!(report.restarts, 0);
    assert!(provider.inner.placements().is_empty());

    // Split the event stream into per-iteration segments.
    let events = events.borrow();
    let mut segments: Vec<&[Event]> = Vec::new();
    let mut start = None;
    for (i, e) in events.iter().enumerate() {
        if *e == Event::Iteration {
            if let Some(st) = start {
                segments.push(&events[st..i]);
            }
            start = Some(i + 1);
        }
    }
    if let Some(st) = start {
        segments.push(&events[st..]);
    }
    assert_eq!(segments.len() as u64, report.iterations);

    let mut failures = 0u32;
    let mut relocations = 0u32;
    let mut queries = 0u64;
    for seg in segments {
        match seg {
            [Event::Applied(a)] => {
                assert!(a.is_cursor_only(), "sampled {a:?}");
            }
            [Event::LegalityQuery, rest @ ..] => {
                queries += 1;
                failures += 1;
                if failures > search.failure_threshold {
                    failures = 0;
                    relocations += 1;
                    assert!((1..=search.relocation_moves as usize).contains(&rest.len()));
                    for e in rest {
                        match e {
                            Event::Applied(a) => assert!(Action::MOVES.contains(a)),
                            other => panic!("unexpected {other:?} during relocation"),
                        }
                    }
                } else {
                    assert!(rest.is_empty(), "moved after only {failures} failures");
                }
            }
            other => panic!("unexpected iteration shape {other:?}"),
        }
    }

    assert_eq!(queries, report.illegal_attempts);
    assert!(relocations > 0);
    assert_eq!(
        report.transitions,
        events.iter().filter(|e| matches!(e, Event::Applied(_))).count() as u64
    );
}

#[test]
fn rare_legal_fills_exhaust_budget_before_stagnation() {
    // One boxed-in empty cell: legal fills are rare, so the rejection count stays far
    // below the default stagnation limit and no restart ever fires.
    let mut s = blocked_session();
    let search = SearchConfig {
        max_iterations: 50_000,
        ..cfg(13)
    };
    let report = HillClimber::new(search)
        .unwrap()
        .run(&mut s, &mut NoopSink)
        .unwrap();

    assert_eq!(report.outcome, SearchOutcome::Exhausted);
    assert_eq!(report.restarts, 0);
    assert!(report.rejected > 0);
    assert!(report.rejected < u64::from(search.no_improvement_limit));
}
