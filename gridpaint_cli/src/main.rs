// gridpaint_cli/src/main.rs
#![forbid(unsafe_code)]

mod error;
mod output;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use gridpaint_engine::engine::{DEFAULT_GRID_SIZE, DEFAULT_SEEDED_BOXES};
use gridpaint_engine::{SearchConfig, Session, SessionConfig, StuckStrategy};

use crate::error::CliError;
use crate::output::Artifacts;
use crate::run::{NoopSink, ReportSink, Runner, RunnerConfig, TableSink};

const DEFAULT_SEED: u64 = 12345;

#[derive(Parser, Debug)]
#[command(name = "gridpaint_cli")]
struct Args {
    // ---------------- session ----------------
    /// Side length of the square grid.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: usize,

    /// Randomly pre-colored cells at session start (never undone).
    #[arg(long, default_value_t = DEFAULT_SEEDED_BOXES)]
    seeded_boxes: usize,

    /// Base RNG seed (session uses it directly, search uses seed + 999). If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    // ---------------- search ----------------
    /// Sampled-action budget for the whole run.
    #[arg(long, default_value_t = 100_000)]
    max_iterations: u64,

    /// Rejected placements in a row before the search counts as stuck.
    #[arg(long, default_value_t = 500)]
    no_improvement_limit: u32,

    /// Rollbacks allowed before giving up.
    #[arg(long, default_value_t = 5)]
    restart_limit: u32,

    /// Probability of accepting an equal-score placement.
    #[arg(long, default_value_t = 0.1)]
    sideways_probability: f64,

    /// Illegal placement attempts in a row before the cursor is relocated.
    #[arg(long, default_value_t = 20)]
    failure_threshold: u32,

    /// Upper bound of random cursor moves applied when relocating.
    #[arg(long, default_value_t = 5)]
    relocation_moves: u32,

    /// Weight of `place` relative to each other action.
    #[arg(long, default_value_t = 5)]
    place_weight: u32,

    /// A rollback undoes max(placed / divisor, rollback_min) placements, capped at placed.
    #[arg(long, default_value_t = 4)]
    rollback_divisor: usize,

    #[arg(long, default_value_t = 5)]
    rollback_min: usize,

    /// Stuck recovery: rollback | perturb
    #[arg(long, default_value = "rollback")]
    strategy: String,

    // ---------------- output ----------------
    /// Directory for initial_grid.txt, grid.txt, shapes.txt and trace.json.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Record every transition and write trace.json.
    #[arg(long)]
    trace: bool,

    /**
     * Render the grid as ASCII after every transition; value is sleep in ms (e.g. 30).
     * Examples:
     *   --render 0    (render as fast as possible)
     *   --render 30   (sleep 30ms between frames)
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    /// Verbosity: 0=silent (final summary only), 1=progress bar, 2=progress bar + periodic table.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Print a table row every N iterations (only used with --verbosity 2).
    #[arg(long, default_value_t = 5000)]
    report_every: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Flags -> search knobs. The search seed is derived from the base seed so the session
/// and the search draw from different streams.
fn search_config(args: &Args) -> Result<SearchConfig, CliError> {
    let strategy = StuckStrategy::from_cli(&args.strategy)
        .ok_or_else(|| CliError::UnknownStrategy(args.strategy.clone()))?;

    let search = SearchConfig {
        max_iterations: args.max_iterations,
        no_improvement_limit: args.no_improvement_limit,
        restart_limit: args.restart_limit,
        sideways_probability: args.sideways_probability,
        failure_threshold: args.failure_threshold,
        relocation_moves: args.relocation_moves,
        place_weight: args.place_weight,
        rollback_divisor: args.rollback_divisor,
        rollback_min: args.rollback_min,
        stuck_strategy: strategy,
        seed: args.seed.unwrap_or(DEFAULT_SEED).wrapping_add(999),
    };
    search.validate()?;
    Ok(search)
}

fn run(args: Args) -> Result<(), CliError> {
    let base_seed = args.seed.unwrap_or(DEFAULT_SEED);
    let search = search_config(&args)?;

    let mut session = Session::new(SessionConfig {
        grid_size: args.grid_size,
        seeded_boxes: args.seeded_boxes,
        seed: base_seed,
    })?;

    let artifacts = Artifacts::new(&args.out_dir)?;
    artifacts.write_initial_grid(session.grid())?;

    // Interrupt: flag is polled by the search loop; artifacts are still written below.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            warn!("interrupt received, stopping search");
            cancel.store(true, Ordering::Relaxed);
        })?;
    }

    let cfg = RunnerConfig {
        search,
        record_trace: args.trace,
        verbosity: args.verbosity,
        report_every: args.report_every,
        render_ms: args.render,
    };

    // Reporting sink:
    // - verbosity 2 => periodic table (unless report_every == 0)
    // - otherwise   => no-op
    let sink: Box<dyn ReportSink> = if cfg.verbosity >= 2 && cfg.report_every > 0 {
        Box::new(TableSink::new(20))
    } else {
        Box::new(NoopSink)
    };

    let mut runner = Runner::new(cfg, sink, cancel);
    let result = runner.run(&mut session);

    // Persist whatever state was reached, even if the run itself failed.
    artifacts.write_final(session.grid(), session.placements())?;
    let result = result?;
    if let Some(trace) = &result.trace {
        artifacts.write_trace(trace)?;
    }

    let r = &result.report;
    if !r.done {
        warn!(
            outcome = r.outcome.label(),
            "terminal condition not met; wrote best-effort state"
        );
    }

    // Final one-line summary (useful for logs / grep).
    println!(
        "DONE: outcome={} done={} iterations={} restarts={} transitions={} accepted={} sideways={} rejected={} illegal={} shapes={} colors={} empty={} conflicts={} score={} elapsed={:.3}s it/s={:.1}",
        r.outcome.label(),
        r.done,
        r.iterations,
        r.restarts,
        r.transitions,
        r.accepted,
        r.sideways,
        r.rejected,
        r.illegal_attempts,
        r.shapes,
        r.colors,
        r.empty,
        r.conflicts,
        r.score,
        r.elapsed_s,
        r.iterations_per_s,
    );

    Ok(())
}
