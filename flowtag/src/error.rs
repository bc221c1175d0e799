use std::{
    error::Error,
    fmt, io,
    num::ParseIntError,
    path::{Path, PathBuf},
};

/// Every failure the pipeline can raise. All of them abort the run.
#[derive(Debug)]
pub enum FlowTagError {
    /// A lookup row names a protocol that is not in the registry.
    UnknownProtocolName(String),
    /// A lookup row has the wrong number of columns or an empty required value.
    MalformedRow { line: u64, reason: String },
    /// A lookup row has a `dstport` that is not a port number.
    InvalidPort {
        line: u64,
        value: String,
        source: ParseIntError,
    },
    /// A flow-log line does not split into the expected number of fields.
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: String,
    },
    /// A flow-log integer field could not be parsed.
    FieldTypeError {
        line: String,
        field: &'static str,
        value: String,
        source: ParseIntError,
    },
    /// An input file could not be opened or read.
    SourceReadError { path: PathBuf, source: io::Error },
    /// Any other failure reported by the CSV reader.
    Csv(csv::Error),
    /// A report could not be written.
    ReportWriteError { target: String, source: io::Error },
}

impl FlowTagError {
    /// Maps a CSV reader error onto the lookup-table error kinds.
    pub(crate) fn from_csv(err: csv::Error, origin: &Path) -> Self {
        if let csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } = err.kind()
        {
            return FlowTagError::MalformedRow {
                line: pos.as_ref().map_or(0, |p| p.line()),
                reason: format!("expected {} columns, found {}", expected_len, len),
            };
        }
        if err.is_io_error() {
            return FlowTagError::SourceReadError {
                path: origin.to_path_buf(),
                source: io::Error::from(err),
            };
        }
        FlowTagError::Csv(err)
    }
}

impl fmt::Display for FlowTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowTagError::UnknownProtocolName(name) => {
                write!(f, "unknown protocol name '{}'", name)
            }
            FlowTagError::MalformedRow { line, reason } => {
                write!(f, "malformed lookup row at line {}: {}", line, reason)
            }
            FlowTagError::InvalidPort { line, value, .. } => {
                write!(f, "invalid port '{}' in lookup row at line {}", value, line)
            }
            FlowTagError::FieldCountMismatch {
                expected,
                found,
                line,
            } => write!(
                f,
                "flow version 2 format must have {} fields, found {} in line '{}'",
                expected, found, line
            ),
            FlowTagError::FieldTypeError {
                line, field, value, ..
            } => write!(
                f,
                "can't convert field '{}' (value '{}') of log line '{}'",
                field, value, line
            ),
            FlowTagError::SourceReadError { path, .. } => {
                write!(f, "error reading file '{}'", path.display())
            }
            FlowTagError::Csv(err) => write!(f, "csv error: {}", err),
            FlowTagError::ReportWriteError { target, .. } => {
                write!(f, "failed to write report '{}'", target)
            }
        }
    }
}

impl Error for FlowTagError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FlowTagError::InvalidPort { source, .. } => Some(source),
            FlowTagError::FieldTypeError { source, .. } => Some(source),
            FlowTagError::SourceReadError { source, .. } => Some(source),
            FlowTagError::ReportWriteError { source, .. } => Some(source),
            FlowTagError::Csv(err) => Some(err),
            FlowTagError::UnknownProtocolName(_)
            | FlowTagError::MalformedRow { .. }
            | FlowTagError::FieldCountMismatch { .. } => None,
        }
    }
}
