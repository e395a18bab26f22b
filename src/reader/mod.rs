//! Reader entrypoints.
//!
//! Most callers construct a [`TabularReader`] with [`TabularReader::new`] (path, delimiter,
//! header flag) or [`TabularReader::with_options`] when they also want open/reset outcomes
//! reported to a [`ReaderObserver`].

pub mod observability;
pub mod options;
pub mod tabular;

pub use observability::{ReaderContext, ReaderEvent, ReaderObserver, ReaderSeverity, ReaderStats, StdErrObserver};
pub use options::ReaderOptions;
pub use tabular::{Rows, TabularReader};
