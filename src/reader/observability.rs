//! Open/reset reporting.
//!
//! A [`super::TabularReader`] reports the outcome of every open sequence (construction and each
//! [`super::TabularReader::reset`]) to the observer set in [`super::ReaderOptions`]. Row-level
//! work (`advance`, field access) is never reported.

use std::fmt;
use std::path::PathBuf;

use crate::error::ReaderError;

/// How bad a failed open sequence is. Ordered, so it can serve as an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReaderSeverity {
    /// Configuration or parse problem; the file itself was reachable.
    Error,
    /// The file could not be opened or read.
    Critical,
}

/// Which step of the reader lifecycle ran the open sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderEvent {
    Open,
    Reset,
}

impl fmt::Display for ReaderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReaderEvent::Open => "open",
            ReaderEvent::Reset => "reset",
        })
    }
}

/// What the reader was asked to do when the event happened.
#[derive(Debug, Clone)]
pub struct ReaderContext {
    pub path: PathBuf,
    pub event: ReaderEvent,
    /// Delimiter as configured (possibly invalid, for configuration failures).
    pub delimiter: String,
    pub has_header: bool,
}

/// Result of a successful pre-scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderStats {
    /// Data rows counted by the pre-scan.
    pub rows: usize,
    /// Header width; 0 without a header.
    pub header_fields: usize,
}

/// Receives open/reset outcomes. All methods default to no-ops.
pub trait ReaderObserver: Send + Sync {
    /// The open sequence finished and the first row is current.
    fn on_open(&self, _ctx: &ReaderContext, _stats: ReaderStats) {}

    /// Construction or reset failed; the reader (if any) is closed.
    fn on_failure(&self, _ctx: &ReaderContext, _severity: ReaderSeverity, _error: &ReaderError) {}

    /// A failure at or above `ReaderOptions::alert_at_or_above`. Called after `on_failure`.
    fn on_alert(&self, _ctx: &ReaderContext, _severity: ReaderSeverity, _error: &ReaderError) {}
}

/// Writes one line per event to stderr, e.g.
/// `[tabular-reader] reset ok path=people.csv delimiter=',' header=true rows=2 header_fields=2`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl StdErrObserver {
    fn prefix(ctx: &ReaderContext) -> String {
        format!(
            "path={} delimiter={:?} header={}",
            ctx.path.display(),
            ctx.delimiter,
            ctx.has_header
        )
    }
}

impl ReaderObserver for StdErrObserver {
    fn on_open(&self, ctx: &ReaderContext, stats: ReaderStats) {
        eprintln!(
            "[tabular-reader] {} ok {} rows={} header_fields={}",
            ctx.event,
            Self::prefix(ctx),
            stats.rows,
            stats.header_fields
        );
    }

    fn on_failure(&self, ctx: &ReaderContext, severity: ReaderSeverity, error: &ReaderError) {
        eprintln!(
            "[tabular-reader] {} failed ({severity:?}) {} err={error}",
            ctx.event,
            Self::prefix(ctx)
        );
    }

    fn on_alert(&self, ctx: &ReaderContext, severity: ReaderSeverity, error: &ReaderError) {
        eprintln!(
            "[tabular-reader][ALERT] {} failed ({severity:?}) {} err={error}",
            ctx.event,
            Self::prefix(ctx)
        );
    }
}
