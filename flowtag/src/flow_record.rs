use std::str::FromStr;

use crate::{error::FlowTagError, lookup::PortProtocol};

/// Number of whitespace separated fields in a version 2 flow log record.
pub const FLOW_VERSION_2_TOTAL_FIELDS: usize = 14;

/// One version 2 VPC flow log record.
///
/// Values are taken as they appear in the log: ports, counters and
/// timestamps are not range checked and strings keep their case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord {
    pub version: i64,
    pub account_id: String,
    pub interface_id: String,
    pub src_addr: String,
    pub dst_addr: String,
    pub src_port: i64,
    pub dst_port: i64,
    pub protocol: i64,
    pub packets: i64,
    pub bytes: i64,
    /// Start of the capture window, epoch seconds.
    pub start: i64,
    /// End of the capture window, epoch seconds.
    pub end: i64,
    pub action: String,
    pub log_status: String,
}

impl FlowRecord {
    /// Parses one flow log line.
    ///
    /// ### Errors
    ///
    /// * `FieldCountMismatch` if the line does not have exactly
    ///   [`FLOW_VERSION_2_TOTAL_FIELDS`] fields, whatever its version field says.
    /// * `FieldTypeError` if an integer field is not an integer. Decimal
    ///   values are rejected, never truncated. So are integers outside the
    ///   `i64` range, e.g. a byte counter above `i64::MAX`.
    pub fn parse(line: &str) -> Result<Self, FlowTagError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FLOW_VERSION_2_TOTAL_FIELDS {
            return Err(FlowTagError::FieldCountMismatch {
                expected: FLOW_VERSION_2_TOTAL_FIELDS,
                found: fields.len(),
                line: line.to_string(),
            });
        }

        let int_field = |index: usize, field: &'static str| -> Result<i64, FlowTagError> {
            fields[index]
                .parse::<i64>()
                .map_err(|source| FlowTagError::FieldTypeError {
                    line: line.to_string(),
                    field,
                    value: fields[index].to_string(),
                    source,
                })
        };

        Ok(FlowRecord {
            version: int_field(0, "version")?,
            account_id: fields[1].to_string(),
            interface_id: fields[2].to_string(),
            src_addr: fields[3].to_string(),
            dst_addr: fields[4].to_string(),
            src_port: int_field(5, "srcport")?,
            dst_port: int_field(6, "dstport")?,
            protocol: int_field(7, "protocol")?,
            packets: int_field(8, "packets")?,
            bytes: int_field(9, "bytes")?,
            start: int_field(10, "start")?,
            end: int_field(11, "end")?,
            action: fields[12].to_string(),
            log_status: fields[13].to_string(),
        })
    }

    pub fn port_protocol(&self) -> PortProtocol {
        PortProtocol::new(self.dst_port, self.protocol)
    }
}

impl FromStr for FlowRecord {
    type Err = FlowTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlowRecord::parse(s)
    }
}
