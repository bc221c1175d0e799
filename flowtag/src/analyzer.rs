use std::{collections::HashMap, path::Path};

use log::{debug, info};

use crate::{
    error::FlowTagError,
    flow_record::FlowRecord,
    lookup::{LookupTable, PortProtocol, TagKey},
    protocol::protocol_name,
    reader::FlowLogReader,
};

pub type TagCounts = HashMap<TagKey, u64>;
pub type PortProtocolCounts = HashMap<PortProtocol, u64>;

/// Aggregates of one completed analysis run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Records per tag, untagged records under `TagKey::Untagged`.
    pub tag_counts: TagCounts,
    /// Records per (destination port, protocol), tagged records only.
    pub port_protocol_counts: PortProtocolCounts,
}

impl Analysis {
    pub fn records_processed(&self) -> u64 {
        self.tag_counts.values().sum()
    }

    pub fn untagged_count(&self) -> u64 {
        self.tag_counts
            .get(&TagKey::Untagged)
            .copied()
            .unwrap_or(0)
    }

    pub fn tagged_count(&self) -> u64 {
        self.port_protocol_counts.values().sum()
    }

    /// Tag counts ordered by tag, with the untagged entry last.
    pub fn sorted_tag_counts(&self) -> Vec<(&TagKey, u64)> {
        let mut counts: Vec<_> = self.tag_counts.iter().map(|(k, &v)| (k, v)).collect();
        counts.sort_by(|a, b| a.0.cmp(b.0));
        counts
    }

    /// Port/protocol counts ordered by port, then protocol.
    pub fn sorted_port_protocol_counts(&self) -> Vec<(PortProtocol, u64)> {
        let mut counts: Vec<_> = self
            .port_protocol_counts
            .iter()
            .map(|(&k, &v)| (k, v))
            .collect();
        counts.sort_by_key(|&(key, _)| key);
        counts
    }
}

/// Single pass aggregator over flow records.
pub struct Analyzer<'a> {
    lookup_table: &'a LookupTable,
    analysis: Analysis,
}

impl<'a> Analyzer<'a> {
    pub fn new(lookup_table: &'a LookupTable) -> Self {
        Self {
            lookup_table,
            analysis: Analysis::default(),
        }
    }

    /// Counts one record against its tag, and against its (port, protocol)
    /// pair when the pair is tagged.
    pub fn process_record(&mut self, record: &FlowRecord) {
        debug!("Processing record: {:?}", record);

        let lookup_table = self.lookup_table;
        let tag = lookup_table.get_tag(record.dst_port, record.protocol);
        if tag.is_tagged() {
            debug!(
                "Found tag {} for port={}, protocol={} ({})",
                tag,
                record.dst_port,
                record.protocol,
                protocol_name(record.protocol).unwrap_or("unknown")
            );
            *self
                .analysis
                .port_protocol_counts
                .entry(record.port_protocol())
                .or_insert(0) += 1;
        } else {
            debug!(
                "Untagged port={}, protocol={}",
                record.dst_port, record.protocol
            );
        }
        *self.analysis.tag_counts.entry(tag.clone()).or_insert(0) += 1;
    }

    pub fn finish(self) -> Analysis {
        debug!("tag_counts={:?}", self.analysis.tag_counts);
        debug!("port_protocol_counts={:?}", self.analysis.port_protocol_counts);
        self.analysis
    }
}

/// Aggregates every record of `records`, in order.
///
/// ### Errors
///
/// The first error produced by `records` aborts the run and is returned
/// as-is. No partial aggregates are returned.
pub fn analyze<I>(records: I, lookup_table: &LookupTable) -> Result<Analysis, FlowTagError>
where
    I: IntoIterator<Item = Result<FlowRecord, FlowTagError>>,
{
    let mut analyzer = Analyzer::new(lookup_table);
    for record in records {
        analyzer.process_record(&record?);
    }
    Ok(analyzer.finish())
}

/// Reads the flow log at `path` and aggregates it against `lookup_table`.
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    lookup_table: &LookupTable,
) -> Result<Analysis, FlowTagError> {
    let path = path.as_ref();
    info!("Reading flow logs from '{}'", path.display());

    let reader = FlowLogReader::open(path)?;
    let analysis = analyze(reader, lookup_table)?;

    info!(
        "Processed {} records, {} tagged, {} untagged",
        analysis.records_processed(),
        analysis.tagged_count(),
        analysis.untagged_count()
    );
    Ok(analysis)
}
