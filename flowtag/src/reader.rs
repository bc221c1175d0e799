use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::{Path, PathBuf},
};

use log::{debug, error};

use crate::{error::FlowTagError, flow_record::FlowRecord};

/// Pulls flow records out of a line oriented source, one line at a time.
///
/// The iterator stops for good after the first error it yields, so callers
/// can treat any `Err` as the end of the stream.
pub struct FlowLogReader<R> {
    lines: Lines<R>,
    origin: PathBuf,
    line_number: u64,
    failed: bool,
}

impl FlowLogReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FlowTagError> {
        let path = path.as_ref();
        debug!("Opening the flow log file: {:?} ...", path);

        let file = File::open(path).map_err(|source| {
            error!("Error opening file {:?}: {}", path, source);
            FlowTagError::SourceReadError {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> FlowLogReader<R> {
    /// `origin` names the source in read errors.
    pub fn new<P: Into<PathBuf>>(reader: R, origin: P) -> Self {
        Self {
            lines: reader.lines(),
            origin: origin.into(),
            line_number: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for FlowLogReader<R> {
    type Item = Result<FlowRecord, FlowTagError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(source) => {
                self.failed = true;
                return Some(Err(FlowTagError::SourceReadError {
                    path: self.origin.clone(),
                    source,
                }));
            }
        };
        self.line_number += 1;

        let record = FlowRecord::parse(&line);
        if let Err(e) = &record {
            error!("Line {} of {:?}: {}", self.line_number, self.origin, e);
            self.failed = true;
        }
        Some(record)
    }
}
