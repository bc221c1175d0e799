use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::Read,
    path::Path,
};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};

use crate::{error::FlowTagError, protocol};

/// Aggregate key used for flows whose (port, protocol) has no tag.
pub const UNTAGGED_KEY: &str = "untagged";

static UNTAGGED: TagKey = TagKey::Untagged;

/// Composite (destination port, protocol number) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortProtocol {
    pub port: i64,
    pub protocol: i64,
}

impl PortProtocol {
    pub fn new(port: i64, protocol: i64) -> Self {
        Self { port, protocol }
    }
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.port, self.protocol)
    }
}

/// Result of a tag lookup, also the key of the tag aggregate.
///
/// `Untagged` never compares equal to a `Tagged` value, not even to a tag
/// spelled `"untagged"`. Ordering puts every real tag before `Untagged`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKey {
    Tagged(String),
    Untagged,
}

impl TagKey {
    pub fn as_str(&self) -> &str {
        match self {
            TagKey::Tagged(tag) => tag,
            TagKey::Untagged => UNTAGGED_KEY,
        }
    }

    pub fn is_tagged(&self) -> bool {
        matches!(self, TagKey::Tagged(_))
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRow {
    pub destination_port: u32,
    pub protocol_number: u8,
    pub tag: String,
}

impl LookupRow {
    pub fn key(&self) -> PortProtocol {
        PortProtocol::new(
            i64::from(self.destination_port),
            i64::from(self.protocol_number),
        )
    }

    /// Builds a row from the positional `dstport,protocol,tag` columns.
    fn from_record(record: &StringRecord, line: u64) -> Result<Self, FlowTagError> {
        let dstport = required_field(record, 0, "dstport", line)?;
        let protocol_name = required_field(record, 1, "protocol", line)?;
        let tag = required_field(record, 2, "tag", line)?;

        let destination_port =
            dstport
                .parse::<u32>()
                .map_err(|source| FlowTagError::InvalidPort {
                    line,
                    value: dstport.to_string(),
                    source,
                })?;
        let protocol_number = protocol::resolve(protocol_name)?;

        Ok(LookupRow {
            destination_port,
            protocol_number,
            tag: tag.to_string(),
        })
    }
}

fn required_field<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, FlowTagError> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FlowTagError::MalformedRow {
            line,
            reason: format!("no value for '{}'", name),
        }),
    }
}

/// Tag table indexed by (destination port, protocol number).
///
/// Rows sharing a key do not raise an error: the row loaded last decides the
/// tag. `rows` keeps every loaded row in file order, duplicates included.
#[derive(Debug, Default)]
pub struct LookupTable {
    rows: Vec<LookupRow>,
    port_proto_map: HashMap<PortProtocol, TagKey>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the lookup CSV at `path`.
    ///
    /// ### Errors
    ///
    /// `SourceReadError` if the file cannot be read. `MalformedRow`,
    /// `InvalidPort` or `UnknownProtocolName` for the first bad data row.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FlowTagError> {
        let path = path.as_ref();
        info!("Loading lookup file '{}'", path.display());

        let file = File::open(path).map_err(|source| FlowTagError::SourceReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_table(file, path)
    }

    /// Loads a lookup table from any CSV source.
    #[cfg(test)]
    ///
    /// The first record is the header and is skipped without checking its
    /// text. Every data row must have as many columns as the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FlowTagError> {
        Self::read_table(reader, Path::new("<reader>"))
    }

    fn read_table<R: Read>(reader: R, origin: &Path) -> Result<Self, FlowTagError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| FlowTagError::from_csv(e, origin))?
            .clone();
        debug!("Lookup header: {:?}", headers);

        let mut table = LookupTable::new();
        for result in rdr.records() {
            let record = result.map_err(|e| FlowTagError::from_csv(e, origin))?;
            let line = record.position().map_or(0, |p| p.line());
            table.add(LookupRow::from_record(&record, line)?);
        }

        info!(
            "Loaded lookup table, row count={}, distinct keys={}",
            table.len(),
            table.key_count()
        );
        debug!("Lookup table rows={:?}", table.rows());
        Ok(table)
    }

    /// Appends a row and indexes it, replacing any tag already stored for
    /// the same key.
    pub fn add(&mut self, row: LookupRow) {
        if row.tag == UNTAGGED_KEY {
            warn!(
                "Tag '{}' for {} is spelled like the untagged count, their report rows are merged",
                row.tag,
                row.key()
            );
        }
        if let Some(previous) = self
            .port_proto_map
            .insert(row.key(), TagKey::Tagged(row.tag.clone()))
        {
            debug!(
                "Tag '{}' for {} replaced by '{}'",
                previous,
                row.key(),
                row.tag
            );
        }
        self.rows.push(row);
    }

    /// Tag for a destination port and protocol number, `TagKey::Untagged`
    /// when no row matches.
    pub fn get_tag(&self, port: i64, protocol: i64) -> &TagKey {
        self.port_proto_map
            .get(&PortProtocol::new(port, protocol))
            .unwrap_or(&UNTAGGED)
    }

    pub fn rows(&self) -> &[LookupRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct (port, protocol) keys.
    pub fn key_count(&self) -> usize {
        self.port_proto_map.len()
    }
}
