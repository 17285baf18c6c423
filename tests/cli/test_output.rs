//! Tests for output formatting helpers

use spacerini::cli::output::{format_bytes, format_duration, truncate};

#[test]
fn test_format_bytes_units() {
    assert_eq!(format_bytes(512), "512 B");
    assert_eq!(format_bytes(10 * 1024 * 1024), "10.0 MB");
}

#[test]
fn test_format_duration_ranges() {
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(90.0), "1m 30.0s");
}

#[test]
fn test_truncate_flattens_newlines() {
    assert_eq!(truncate("line one\nline two", 100), "line one line two");
    assert_eq!(truncate("abcdefghij", 6), "abc...");
}
