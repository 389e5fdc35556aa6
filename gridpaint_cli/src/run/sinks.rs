// gridpaint_cli/src/run/sinks.rs
#![forbid(unsafe_code)]

/// One periodic row emitted by the runner.
///
/// Transport struct: runner/stats compute fields, sinks only format/emit.
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub iteration: u64,
    pub iterations_total: u64,

    pub ips: f64,

    pub transitions: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub sideways: u64,
    pub restarts: u32,

    pub placed: u64,
    /// Highest score accepted so far.
    pub best_score: Option<i64>,
}

/// Sink interface for periodic reporting.
pub trait ReportSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>);
}

/// Default sink: does nothing.
#[derive(Default)]
pub struct NoopSink;

impl ReportSink for NoopSink {
    fn on_report_row(&mut self, _row: &ReportRow, _pb: Option<&indicatif::ProgressBar>) {}
}

/// Human-readable periodic table sink.
///
/// Cadence (every N iterations) is handled by the runner. This sink prints whenever called.
pub struct TableSink {
    header_every: u64,
    rows_printed: u64,
}

impl TableSink {
    const DEFAULT_HEADER_EVERY: u64 = 20;

    /// If `header_every == 0`, a reasonable default is used.
    pub fn new(header_every: u64) -> Self {
        Self {
            header_every: if header_every == 0 {
                Self::DEFAULT_HEADER_EVERY
            } else {
                header_every
            },
            rows_printed: 0,
        }
    }

    fn header_line(&self) -> String {
        // Keep widths aligned with row_line() below.
        format!(
            "{:>21} {:>9} {:>8} {:>8} {:>8} {:>7} {:>5} {:>6} {:>10}",
            "iter/total", "it/s", "trans", "accept", "reject", "sidew", "rst", "placed", "best",
        )
    }

    fn sep_line(&self) -> String {
        "-".repeat(self.header_line().len())
    }

    fn row_line(&self, r: &ReportRow) -> String {
        let best = r
            .best_score
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        format!(
            "{:>10}/{:<10} {:>9.1} {:>8} {:>8} {:>8} {:>7} {:>5} {:>6} {:>10}",
            r.iteration,
            r.iterations_total,
            r.ips,
            r.transitions,
            r.accepted,
            r.rejected,
            r.sideways,
            r.restarts,
            r.placed,
            best,
        )
    }
}

impl ReportSink for TableSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>) {
        let mut lines: Vec<String> = Vec::new();

        if self.rows_printed % self.header_every == 0 {
            lines.push(self.header_line());
            lines.push(self.sep_line());
        }

        lines.push(self.row_line(row));
        self.rows_printed += 1;

        if let Some(pb) = pb {
            for l in lines {
                pb.println(l);
            }
        } else {
            for l in lines {
                println!("{l}");
            }
        }
    }
}
