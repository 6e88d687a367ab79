//! Per-iteration diagnostics.
//!
//! The runner hands one [`TraceRecord`] per iteration to a [`TraceSink`].
//! Tracing is observability only: a failing sink is logged and the run
//! carries on.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};

/// Timestamp format used by [`CsvTrace`].
pub const TIMESTAMP_FORMAT: &str = "%y/%m/%d-%H:%M:%S";

/// Snapshot of one annealing iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord<V> {
    /// 0-based iteration index.
    pub iteration: usize,
    pub temperature: f64,
    pub visit_scale: f64,
    /// Accepted state before this iteration.
    pub current: Vec<V>,
    /// Cost of `current`.
    pub current_cost: f64,
    /// Candidate generated in this iteration.
    pub candidate: Vec<V>,
    /// Cost of `candidate`.
    pub candidate_cost: f64,
    pub acceptance_probability: f64,
    /// Uniform draw in `[0, 1)` compared against the acceptance probability.
    pub random_draw: f64,
    pub accepted: bool,
    pub timestamp: DateTime<Local>,
}

/// Receives trace records from a run over candidates of type `V`.
pub trait TraceSink<V> {
    /// Handles the record of one iteration.
    fn record(&mut self, record: &TraceRecord<V>) -> io::Result<()>;

    /// Called once after the last iteration.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl<V> TraceSink<V> for NoTrace {
    fn record(&mut self, _record: &TraceRecord<V>) -> io::Result<()> {
        Ok(())
    }
}

/// Emits every record as a `tracing` event at `TRACE` level.
///
/// Only the scalar fields are logged; use [`CsvTrace`] to follow the
/// candidates themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl<V> TraceSink<V> for LogTrace {
    fn record(&mut self, r: &TraceRecord<V>) -> io::Result<()> {
        tracing::trace!(
            k = r.iteration,
            temp = r.temperature,
            fun = r.current_cost,
            fun_new = r.candidate_cost,
            p = r.acceptance_probability,
            rn = r.random_draw,
            accept = r.accepted,
            "annealing step"
        );
        Ok(())
    }
}

/// Collects records in memory.
impl<V: Clone> TraceSink<V> for Vec<TraceRecord<V>> {
    fn record(&mut self, record: &TraceRecord<V>) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes records as space-delimited rows under a header, one row per
/// iteration, flushing after each row.
///
/// Columns are `k temp fun x0..xN fun_new x_new0..x_newN visit_scale p rn
/// accept time`, where `x*` is the current state and `x_new*` the candidate.
/// The header is sized from the first record.
///
/// # Examples
///
/// ```
/// use u_anneal::sa::{AnnealConfig, AnnealRunner, Continuous, CsvTrace};
///
/// let domain = Continuous::new([(-1.0, 1.0)]);
/// let config = AnnealConfig::default().with_niter(5).with_seed(1);
/// let mut trace = CsvTrace::new(Vec::new());
/// let mut rng = config.rng();
/// AnnealRunner::try_run_with(
///     &domain,
///     &config,
///     |x: &[f64]| Ok::<_, std::convert::Infallible>(x[0] * x[0]),
///     &mut rng,
///     &mut trace,
///     None,
/// )
/// .unwrap();
/// let text = String::from_utf8(trace.into_inner().unwrap()).unwrap();
/// assert_eq!(text.lines().count(), 6);
/// assert!(text.starts_with("k temp fun x0 fun_new x_new0 visit_scale"));
/// ```
#[derive(Debug)]
pub struct CsvTrace<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvTrace<W> {
    pub fn new(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(inner);
        Self {
            writer,
            header_written: false,
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))
    }

    fn header(dim: usize) -> Vec<String> {
        let mut header = vec!["k".to_string(), "temp".into(), "fun".into()];
        header.extend((0..dim).map(|i| format!("x{i}")));
        header.push("fun_new".into());
        header.extend((0..dim).map(|i| format!("x_new{i}")));
        header.extend(
            ["visit_scale", "p", "rn", "accept", "time"]
                .iter()
                .map(|s| s.to_string()),
        );
        header
    }
}

impl CsvTrace<File> {
    /// Creates (or truncates) the trace file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<V: Display, W: Write> TraceSink<V> for CsvTrace<W> {
    fn record(&mut self, r: &TraceRecord<V>) -> io::Result<()> {
        if !self.header_written {
            self.writer.write_record(Self::header(r.current.len()))?;
            self.header_written = true;
        }
        let mut row = vec![
            r.iteration.to_string(),
            format!("{:.6}", r.temperature),
            format!("{:.6}", r.current_cost),
        ];
        row.extend(r.current.iter().map(ToString::to_string));
        row.push(format!("{:.6}", r.candidate_cost));
        row.extend(r.candidate.iter().map(ToString::to_string));
        row.extend([
            format!("{:.6}", r.visit_scale),
            format!("{:.6}", r.acceptance_probability),
            format!("{:.6}", r.random_draw),
            r.accepted.to_string(),
            r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ]);
        self.writer.write_record(&row)?;
        self.writer.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
