//! Reader configuration.

use std::fmt;
use std::sync::Arc;

use crate::error::{ReaderError, ReaderResult};

use super::observability::{ReaderObserver, ReaderSeverity};

/// Options controlling how a [`super::TabularReader`] parses its source.
///
/// Use [`Default`] for a comma-delimited file with a header line.
#[derive(Clone)]
pub struct ReaderOptions {
    /// Field delimiter. Must be exactly one byte (e.g. `","`, `";"`, `"\t"`).
    pub delimiter: String,
    /// Whether the first physical line holds the field names.
    pub has_header: bool,
    /// Optional observer for open/reset outcomes.
    pub observer: Option<Arc<dyn ReaderObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReaderSeverity,
}

impl fmt::Debug for ReaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderOptions")
            .field("delimiter", &self.delimiter)
            .field("has_header", &self.has_header)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            has_header: true,
            observer: None,
            alert_at_or_above: ReaderSeverity::Critical,
        }
    }
}

impl ReaderOptions {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ReaderObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_alert_threshold(mut self, severity: ReaderSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    /// Validate the delimiter and return it as the byte the record parser expects.
    pub(crate) fn delimiter_byte(&self) -> ReaderResult<u8> {
        match self.delimiter.as_bytes() {
            [] => Err(ReaderError::InvalidConfiguration {
                message: "no delimiter provided".to_string(),
            }),
            [b] => Ok(*b),
            _ => Err(ReaderError::InvalidConfiguration {
                message: format!(
                    "delimiter must be a single byte, got {:?} ({} bytes)",
                    self.delimiter,
                    self.delimiter.len()
                ),
            }),
        }
    }
}
