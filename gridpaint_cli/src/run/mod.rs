// gridpaint_cli/src/run/mod.rs
#![forbid(unsafe_code)]

pub mod runner;
pub mod sinks;
pub mod stats;

pub use runner::{RunResult, Runner, RunnerConfig};
pub use sinks::{NoopSink, ReportSink, TableSink};
