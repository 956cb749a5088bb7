use crate::utils::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Human-readable size in kilobytes, two decimal places
pub fn format_kb(bytes: usize) -> String {
    format!("{:.2}kb", bytes as f64 / 1024.0)
}

/// Gzip-compressed size of `code`, for reporting only.
/// The compressed bytes are never persisted.
pub fn gzip_size(code: &str) -> Result<usize> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(code.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(compressed.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(1024), "1.00kb");
        assert_eq!(format_kb(1536), "1.50kb");
        assert_eq!(format_kb(0), "0.00kb");
    }

    #[test]
    fn test_gzip_size_smaller_for_repetitive_input() {
        let code = "function f() { return 1; }\n".repeat(100);
        let zipped = gzip_size(&code).unwrap();
        assert!(zipped > 0);
        assert!(zipped < code.len());
    }

    #[test]
    fn test_gzip_size_empty_input() {
        // Header + trailer only, still a valid report value
        let zipped = gzip_size("").unwrap();
        assert!(zipped > 0);
    }
}
