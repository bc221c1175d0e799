#[cfg(test)]
mod tests {
    use crate::error::FlowTagError;
    use crate::flow_record::FlowRecord;
    use crate::reader::FlowLogReader;
    use crate::tests::fixtures::{flow_line, flow_log, write_file};
    use std::io::{BufReader, Cursor};
    use tempfile::TempDir;

    #[test]
    fn test_reads_records_in_order() {
        let log = flow_log(&[(25, 6), (68, 17), (443, 6)]);
        let ports: Vec<i64> = FlowLogReader::new(Cursor::new(log), "flows.log")
            .map(|record| record.unwrap().dst_port)
            .collect();
        assert_eq!(ports, vec![25, 68, 443]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let log = format!("{}\n{}", flow_line(25, 6), flow_line(68, 17));
        let reader = FlowLogReader::new(Cursor::new(log), "flows.log");
        assert_eq!(reader.filter(|r| r.is_ok()).count(), 2);
    }

    #[test]
    fn test_stops_after_first_error() {
        let log = format!(
            "{}\nnot a flow record\n{}\n",
            flow_line(25, 6),
            flow_line(68, 17)
        );
        let mut reader = FlowLogReader::new(Cursor::new(log), "flows.log");
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(FlowTagError::FieldCountMismatch { found: 4, .. }))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_blank_line_is_an_error() {
        let log = format!("{}\n\n{}\n", flow_line(25, 6), flow_line(68, 17));
        let results: Vec<_> = FlowLogReader::new(Cursor::new(log), "flows.log").collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(FlowTagError::FieldCountMismatch { found: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let bytes: Vec<u8> = vec![0xff, 0xfe, b'\n'];
        let mut reader = FlowLogReader::new(BufReader::new(Cursor::new(bytes)), "bad.log");
        match reader.next() {
            Some(Err(err @ FlowTagError::SourceReadError { .. })) => {
                assert!(err.to_string().contains("bad.log"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.log");
        match FlowLogReader::open(&path) {
            Err(err @ FlowTagError::SourceReadError { .. }) => {
                assert!(err.to_string().contains("missing.log"));
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("opening a missing file should fail"),
        }
    }

    #[test]
    fn test_open_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "flows.log", &flow_log(&[(993, 6)]));
        let records: Vec<FlowRecord> = FlowLogReader::open(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dst_port, 993);
    }
}
