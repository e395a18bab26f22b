//! The [`TabularReader`] cursor.
//!
//! The reader walks a delimited file forward one line at a time. A line is one physical line,
//! extended over the following lines while a quoted field is still open, and is parsed into
//! fields by a `csv` parser configured with the reader's delimiter. A blank line is a row with a
//! single empty field.
//!
//! Each open sequence (at construction and on every [`TabularReader::reset`]):
//!
//! 1. drops the previous file handle, if any
//! 2. opens the file ([`ReaderError::OpenFailure`] on error)
//! 3. parses the header line when configured (blank or missing gives an empty header)
//! 4. pre-scans the remaining lines to compute the row count
//! 5. rewinds the same handle to the start of the file
//! 6. skips the header again so the stream sits on the first data line
//!
//! and is followed by one [`TabularReader::advance`], so the first data row is current as soon
//! as the reader is constructed.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::ByteRecord;

use crate::error::{ReaderError, ReaderResult};
use crate::types::{FieldKey, FieldView, Row};

use super::observability::{ReaderContext, ReaderEvent, ReaderObserver, ReaderSeverity, ReaderStats};
use super::options::ReaderOptions;

/// Sequential, read-only cursor over a delimited text file.
///
/// # Examples
///
/// ```no_run
/// use tabular_reader::TabularReader;
///
/// # fn main() -> Result<(), tabular_reader::ReaderError> {
/// let mut reader = TabularReader::new("people.csv", ",", true)?;
/// println!("rows={}", reader.row_count());
///
/// while reader.is_valid() {
///     let fields = reader.fields();
///     println!("#{} name={:?}", reader.key(), fields.get("name"));
///     reader.advance()?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct TabularReader {
    path: PathBuf,
    delimiter: u8,
    has_header: bool,
    observer: Option<Arc<dyn ReaderObserver>>,
    alert_at_or_above: ReaderSeverity,

    parser: csv::ReaderBuilder,
    source: Option<BufReader<File>>,
    header: Vec<String>,
    line: Vec<u8>,
    record: ByteRecord,
    current: Option<Row>,
    // Number of advances since the last open sequence. The first advance lands on row 0, so the
    // current row's index is one less than this.
    position: usize,
    total: usize,
}

impl TabularReader {
    /// Open `path` with the given delimiter and header flag.
    ///
    /// The delimiter is validated before the file is touched: an empty (or multi-byte) delimiter
    /// fails with [`ReaderError::InvalidConfiguration`]. An unreadable path fails with
    /// [`ReaderError::NotReadable`].
    pub fn new(path: impl AsRef<Path>, delimiter: &str, has_header: bool) -> ReaderResult<Self> {
        let options = ReaderOptions::default()
            .with_delimiter(delimiter)
            .with_header(has_header);
        Self::with_options(path, &options)
    }

    /// Open `path` using [`ReaderOptions`].
    ///
    /// When an observer is configured, this reports `on_open` on success, `on_failure` on any
    /// error, and `on_alert` when the error's severity is >= `options.alert_at_or_above`.
    pub fn with_options(path: impl AsRef<Path>, options: &ReaderOptions) -> ReaderResult<Self> {
        let path = path.as_ref();
        let result = Self::open(path, options);
        let ctx = ReaderContext {
            path: path.to_path_buf(),
            event: ReaderEvent::Open,
            delimiter: options.delimiter.clone(),
            has_header: options.has_header,
        };
        notify(
            options.observer.as_deref(),
            options.alert_at_or_above,
            ctx,
            result.as_ref().map(TabularReader::stats),
        );
        result
    }

    fn open(path: &Path, options: &ReaderOptions) -> ReaderResult<Self> {
        let delimiter = options.delimiter_byte()?;
        probe_readable(path)?;

        let mut parser = csv::ReaderBuilder::new();
        parser.delimiter(delimiter).has_headers(false).flexible(true);

        let mut reader = Self {
            path: path.to_path_buf(),
            delimiter,
            has_header: options.has_header,
            observer: options.observer.clone(),
            alert_at_or_above: options.alert_at_or_above,
            parser,
            source: None,
            header: Vec::new(),
            line: Vec::new(),
            record: ByteRecord::new(),
            current: None,
            position: 0,
            total: 0,
        };
        reader.open_source()?;
        reader.advance()?;
        Ok(reader)
    }

    fn open_source(&mut self) -> ReaderResult<()> {
        self.source = None;
        self.header.clear();
        self.current = None;
        self.total = 0;

        let file = File::open(&self.path).map_err(|source| ReaderError::OpenFailure {
            path: self.path.clone(),
            source,
        })?;
        let mut src = BufReader::new(file);

        if self.has_header && read_line(&mut src, &mut self.line)? && !is_blank(&self.line) {
            self.header = parse_line(&self.parser, &self.line, &mut self.record)?;
        }

        // Data lines only: the header line (if any) is already consumed.
        let mut total = 0;
        while read_line(&mut src, &mut self.line)? {
            total += 1;
        }

        src.rewind()?;
        if self.has_header {
            read_line(&mut src, &mut self.line)?;
        }

        self.total = total;
        self.source = Some(src);
        Ok(())
    }

    /// Move to the next line.
    ///
    /// At end of data the current row becomes `None` and [`Self::is_valid`] turns `false`.
    /// The position advances on every call, including past the end and on error.
    pub fn advance(&mut self) -> ReaderResult<()> {
        let read = match self.source.as_mut() {
            Some(src) => next_fields(src, &self.parser, &mut self.line, &mut self.record),
            None => Ok(None),
        };
        self.position += 1;

        match read {
            Ok(fields) => {
                let row = fields.map(|fields| Row::from_fields(self.header_names(), fields));
                self.current = row;
                Ok(())
            }
            Err(err) => {
                self.current = None;
                Err(err)
            }
        }
    }

    /// Return to the first data row.
    ///
    /// Re-runs the whole open sequence (reopen, header, pre-scan) and advances once. If it fails
    /// the reader is left closed: no current row and [`Self::is_valid`] is `false`.
    pub fn reset(&mut self) -> ReaderResult<()> {
        let result = self.reopen();
        let ctx = ReaderContext {
            path: self.path.clone(),
            event: ReaderEvent::Reset,
            delimiter: self.delimiter().to_string(),
            has_header: self.has_header,
        };
        notify(
            self.observer.as_deref(),
            self.alert_at_or_above,
            ctx,
            result.as_ref().map(|_| self.stats()),
        );
        result
    }

    fn reopen(&mut self) -> ReaderResult<()> {
        self.position = 0;
        self.open_source()?;
        self.advance()
    }

    /// Rewind and iterate over owned copies of every row.
    pub fn rows(&mut self) -> ReaderResult<Rows<'_>> {
        self.reset()?;
        Ok(Rows {
            reader: self,
            started: false,
            done: false,
        })
    }

    /// The current row, or `None` once the data is exhausted.
    pub fn current(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    /// Zero-based index of the current row (0 right after construction or reset).
    ///
    /// This is one less than the internal advance counter, which [`Self::advance`] bumps on every
    /// call; past the end it keeps growing, so after walking N rows `key()` is N.
    pub fn key(&self) -> usize {
        self.position.saturating_sub(1)
    }

    /// `true` while a current row exists.
    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// Number of data rows, excluding the header line. Computed by the pre-scan; no I/O.
    pub fn row_count(&self) -> usize {
        self.total
    }

    /// Read-only access to the current row's fields.
    pub fn fields(&self) -> FieldView<'_> {
        FieldView::new(self.current.as_ref())
    }

    /// Shorthand for `self.fields().get(key)`.
    pub fn get<'k>(&self, key: impl Into<FieldKey<'k>>) -> Option<&str> {
        self.fields().get(key)
    }

    /// Shorthand for `self.fields().contains(key)`.
    pub fn contains<'k>(&self, key: impl Into<FieldKey<'k>>) -> bool {
        self.fields().contains(key)
    }

    /// Header names; empty without a header.
    pub fn headers(&self) -> &[String] {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delimiter(&self) -> char {
        char::from(self.delimiter)
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Whether a file handle is currently held.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    fn header_names(&self) -> Option<&[String]> {
        self.has_header.then_some(self.header.as_slice())
    }

    fn stats(&self) -> ReaderStats {
        ReaderStats {
            rows: self.total,
            header_fields: self.header.len(),
        }
    }
}

impl fmt::Debug for TabularReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabularReader")
            .field("path", &self.path)
            .field("delimiter", &self.delimiter())
            .field("has_header", &self.has_header)
            .field("header", &self.header)
            .field("position", &self.key())
            .field("rows", &self.total)
            .field("open", &self.is_open())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Iterator returned by [`TabularReader::rows`].
///
/// Yields each row in order and stops after the last row or the first error.
#[derive(Debug)]
pub struct Rows<'r> {
    reader: &'r mut TabularReader,
    started: bool,
    done: bool,
}

impl Iterator for Rows<'_> {
    type Item = ReaderResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            if let Err(err) = self.reader.advance() {
                self.done = true;
                return Some(Err(err));
            }
        }
        self.started = true;

        match self.reader.current() {
            Some(row) => Some(Ok(row.clone())),
            None => {
                self.done = true;
                None
            }
        }
    }
}

fn probe_readable(path: &Path) -> ReaderResult<()> {
    let not_readable = |source| ReaderError::NotReadable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(not_readable)?;
    let meta = file.metadata().map_err(not_readable)?;
    if meta.is_dir() {
        return Err(not_readable(ErrorKind::IsADirectory.into()));
    }
    Ok(())
}

/// Read one line into `line`, terminator included.
///
/// A physical line whose quotes are unbalanced (a quoted field spans the line break) is
/// extended with the following physical lines. Returns `false` at end of stream.
fn read_line<R: BufRead>(src: &mut R, line: &mut Vec<u8>) -> std::io::Result<bool> {
    line.clear();
    loop {
        let n = src.read_until(b'\n', line)?;
        if n == 0 || quotes_balanced(line) {
            return Ok(!line.is_empty());
        }
    }
}

fn quotes_balanced(line: &[u8]) -> bool {
    line.iter().filter(|&&b| b == b'"').count() % 2 == 0
}

fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn is_blank(line: &[u8]) -> bool {
    trim_terminator(line).is_empty()
}

/// Split one line into fields. A blank line is a single empty field.
fn parse_line(parser: &csv::ReaderBuilder, line: &[u8], record: &mut ByteRecord) -> csv::Result<Vec<String>> {
    let body = trim_terminator(line);
    if body.is_empty() || !parser.from_reader(body).read_byte_record(record)? {
        return Ok(vec![String::new()]);
    }
    Ok(decode_fields(record))
}

fn next_fields<R: BufRead>(
    src: &mut R,
    parser: &csv::ReaderBuilder,
    line: &mut Vec<u8>,
    record: &mut ByteRecord,
) -> ReaderResult<Option<Vec<String>>> {
    if !read_line(src, line)? {
        return Ok(None);
    }
    Ok(Some(parse_line(parser, line, record)?))
}

fn decode_fields(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

fn notify(
    observer: Option<&dyn ReaderObserver>,
    alert_at_or_above: ReaderSeverity,
    ctx: ReaderContext,
    outcome: Result<ReaderStats, &ReaderError>,
) {
    let Some(obs) = observer else {
        return;
    };
    match outcome {
        Ok(stats) => obs.on_open(&ctx, stats),
        Err(e) => {
            let sev = e.severity();
            obs.on_failure(&ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(&ctx, sev, e);
            }
        }
    }
}
