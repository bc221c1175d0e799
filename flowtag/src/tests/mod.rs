mod output_test;
mod reader_test;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::{fs, path::PathBuf};

    use tempfile::TempDir;

    pub const LOOKUP_CSV: &str = "dstport,protocol,tag\n25,tcp,sv_P1\n68,udp,sv_P2\n23,tcp,sv_P1";

    /// Flow log line with the given destination port and protocol.
    pub fn flow_line(dst_port: u32, protocol: u32) -> String {
        format!(
            "2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 443 {} {} 25 20000 1620140761 1620140821 ACCEPT OK",
            dst_port, protocol
        )
    }

    pub fn flow_log(pairs: &[(u32, u32)]) -> String {
        pairs
            .iter()
            .map(|&(port, protocol)| flow_line(port, protocol) + "\n")
            .collect()
    }

    pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}
