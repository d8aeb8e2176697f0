//! Archive fixtures.

use std::path::Path;

/// Minimal bytes that look like a zip (local file header magic).
pub fn archive_bytes(filename: &str) -> Vec<u8> {
    let mut data = b"PK\x03\x04".to_vec();
    data.extend_from_slice(filename.as_bytes());
    data
}

pub fn write_archive(dir: &Path, filename: &str) {
    std::fs::create_dir_all(dir).expect("create storage dir");
    std::fs::write(dir.join(filename), archive_bytes(filename)).expect("write archive");
}
