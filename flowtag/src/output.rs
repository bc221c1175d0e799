use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Serialize;

use crate::{analyzer::Analysis, args::ExportMethodType, error::FlowTagError};

pub const TAGS_FILE_NAME: &str = "tags.csv";
pub const PORT_PROTOCOL_FILE_NAME: &str = "port_protocol.csv";

#[derive(Debug, Serialize)]
struct TagRow<'a> {
    tag: &'a str,
    count: u64,
}

#[derive(Debug, Serialize)]
struct PortProtocolRow {
    port: i64,
    protocol: i64,
    count: u64,
}

/// Writes the tag and port/protocol reports of a finished analysis.
pub struct ReportWriter {
    export_type: ExportMethodType,
    output_dir: Option<PathBuf>,
}

impl ReportWriter {
    pub fn new(export_type: ExportMethodType, output_dir: Option<PathBuf>) -> Self {
        ReportWriter {
            export_type,
            output_dir,
        }
    }

    /// Writes both reports and returns where they went.
    ///
    /// For `Csv` the output dir is created first if it does not exist yet.
    pub fn write(&self, analysis: &Analysis) -> Result<Vec<PathBuf>, FlowTagError> {
        match self.export_type {
            ExportMethodType::Csv => {
                let dir = self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
                fs::create_dir_all(&dir).map_err(|source| FlowTagError::ReportWriteError {
                    target: dir.display().to_string(),
                    source,
                })?;

                let tags_path = dir.join(TAGS_FILE_NAME);
                write_file(&tags_path, |w| write_tag_counts(w, analysis))?;
                info!("Tags written to '{}'", tags_path.display());

                let port_protocol_path = dir.join(PORT_PROTOCOL_FILE_NAME);
                write_file(&port_protocol_path, |w| {
                    write_port_protocol_counts(w, analysis)
                })?;
                info!(
                    "Ports & protocols written to '{}'",
                    port_protocol_path.display()
                );

                Ok(vec![tags_path, port_protocol_path])
            }
            ExportMethodType::Print => {
                let mut stdout = io::stdout().lock();
                print_reports(&mut stdout, analysis).map_err(|source| {
                    FlowTagError::ReportWriteError {
                        target: "<stdout>".to_string(),
                        source,
                    }
                })?;
                Ok(Vec::new())
            }
        }
    }
}

fn write_file<F>(path: &Path, write_report: F) -> Result<(), FlowTagError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    debug!("Writing report to {:?}", path);
    let to_error = |source| FlowTagError::ReportWriteError {
        target: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write_report(&mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)
}

/// Both reports, separated by an empty line.
pub fn print_reports<W: Write>(writer: &mut W, analysis: &Analysis) -> io::Result<()> {
    write_tag_counts(&mut *writer, analysis)?;
    writeln!(writer)?;
    write_port_protocol_counts(&mut *writer, analysis)?;
    writer.flush()
}

/// Report rows by tag spelling. A real tag named `untagged` shares its row
/// with the untagged count.
fn tag_rows(analysis: &Analysis) -> Vec<TagRow<'_>> {
    let mut rows: Vec<TagRow<'_>> = Vec::new();
    for (tag, count) in analysis.sorted_tag_counts() {
        match rows.iter_mut().find(|row| row.tag == tag.as_str()) {
            Some(row) => row.count += count,
            None => rows.push(TagRow {
                tag: tag.as_str(),
                count,
            }),
        }
    }
    rows
}

/// `tag,count` report, one row per tag including `untagged`.
pub fn write_tag_counts<W: Write>(writer: W, analysis: &Analysis) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in tag_rows(analysis) {
        wtr.serialize(row)?;
    }
    if analysis.tag_counts.is_empty() {
        wtr.write_record(["tag", "count"])?;
    }
    wtr.flush()
}

/// `port,protocol,count` report, tagged pairs only.
pub fn write_port_protocol_counts<W: Write>(writer: W, analysis: &Analysis) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (key, count) in analysis.sorted_port_protocol_counts() {
        wtr.serialize(PortProtocolRow {
            port: key.port,
            protocol: key.protocol,
            count,
        })?;
    }
    if analysis.port_protocol_counts.is_empty() {
        wtr.write_record(["port", "protocol", "count"])?;
    }
    wtr.flush()
}
