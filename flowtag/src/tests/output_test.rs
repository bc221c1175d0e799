#[cfg(test)]
mod tests {
    use crate::analyzer::{analyze, Analysis};
    use crate::args::ExportMethodType;
    use crate::flow_record::FlowRecord;
    use crate::lookup::LookupTable;
    use crate::output::{
        print_reports, write_port_protocol_counts, write_tag_counts, ReportWriter,
        PORT_PROTOCOL_FILE_NAME, TAGS_FILE_NAME,
    };
    use crate::tests::fixtures::{flow_line, LOOKUP_CSV};
    use std::fs;
    use tempfile::TempDir;

    fn setup_analysis() -> Analysis {
        let table = LookupTable::from_reader(LOOKUP_CSV.as_bytes()).unwrap();
        let lines = [
            flow_line(25, 6),
            flow_line(68, 17),
            flow_line(23, 6),
            flow_line(443, 6),
            flow_line(25, 6),
        ];
        analyze(lines.iter().map(|line| FlowRecord::parse(line)), &table).unwrap()
    }

    fn to_string<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_tag_counts() {
        let analysis = setup_analysis();
        let csv = to_string(|w| write_tag_counts(w, &analysis));
        assert_eq!(csv, "tag,count\nsv_P1,3\nsv_P2,1\nuntagged,1\n");
    }

    #[test]
    fn test_write_port_protocol_counts() {
        let analysis = setup_analysis();
        let csv = to_string(|w| write_port_protocol_counts(w, &analysis));
        assert_eq!(csv, "port,protocol,count\n23,6,1\n25,6,2\n68,17,1\n");
    }

    #[test]
    fn test_empty_reports_keep_headers() {
        let analysis = Analysis::default();
        assert_eq!(
            to_string(|w| write_tag_counts(w, &analysis)),
            "tag,count\n"
        );
        assert_eq!(
            to_string(|w| write_port_protocol_counts(w, &analysis)),
            "port,protocol,count\n"
        );
    }

    #[test]
    fn test_print_reports_contains_both_tables() {
        let analysis = setup_analysis();
        let printed = to_string(|w| print_reports(w, &analysis));
        assert_eq!(
            printed,
            "tag,count\nsv_P1,3\nsv_P2,1\nuntagged,1\n\nport,protocol,count\n23,6,1\n25,6,2\n68,17,1\n"
        );
    }

    #[test]
    fn test_csv_reports_create_output_dir() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("nested").join("out");
        let analysis = setup_analysis();

        let writer = ReportWriter::new(ExportMethodType::Csv, Some(output_dir.clone()));
        let written = writer.write(&analysis).unwrap();
        assert_eq!(
            written,
            vec![
                output_dir.join(TAGS_FILE_NAME),
                output_dir.join(PORT_PROTOCOL_FILE_NAME)
            ]
        );

        let tags = fs::read_to_string(output_dir.join(TAGS_FILE_NAME)).unwrap();
        assert!(tags.starts_with("tag,count\n"));
        assert!(tags.contains("untagged,1\n"));
        let ports = fs::read_to_string(output_dir.join(PORT_PROTOCOL_FILE_NAME)).unwrap();
        assert!(ports.contains("25,6,2\n"));

        // an existing output dir is not an error
        assert!(writer.write(&analysis).is_ok());
    }

    #[test]
    fn test_output_dir_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("out");
        fs::write(&blocker, "").unwrap();

        let writer = ReportWriter::new(ExportMethodType::Csv, Some(blocker));
        assert!(writer.write(&setup_analysis()).is_err());
    }

    #[test]
    fn test_tag_spelled_untagged_shares_the_untagged_row() {
        let table =
            LookupTable::from_reader("dstport,protocol,tag\n25,tcp,untagged\n".as_bytes())
                .unwrap();
        let lines = [flow_line(25, 6), flow_line(26, 6), flow_line(25, 6)];
        let analysis =
            analyze(lines.iter().map(|line| FlowRecord::parse(line)), &table).unwrap();
        assert_eq!(analysis.tag_counts.len(), 2);

        let csv = to_string(|w| write_tag_counts(w, &analysis));
        assert_eq!(csv, "tag,count\nuntagged,3\n");
    }
}
