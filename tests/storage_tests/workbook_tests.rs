//! Workbook Tests
//!
//! Tests verify:
//! - Container encode/decode
//! - Corruption detection (magic, version, length, checksum)
//! - Atomic file replacement

use redirect_engine::storage::{Sheet, Workbook};
use redirect_engine::RedirectError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_workbook() -> Workbook {
    let mut wb = Workbook::new();
    wb.ensure_sheet("Redirect Library", &["Request URL", "Redirect URL"]);
    wb.sheet_mut("Redirect Library").unwrap().rows = vec![
        vec!["a.com/x".to_string(), "https://b.com".to_string()],
        vec!["c.com/y".to_string(), "https://d.com".to_string()],
    ];
    wb.ensure_sheet("Login Credentials", &["Username", "Password"]);
    wb
}

fn assert_corrupt(bytes: &[u8]) {
    match Workbook::decode(bytes) {
        Err(RedirectError::StoreCorrupt(_)) => {}
        other => panic!("expected StoreCorrupt, got {:?}", other),
    }
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_decode_preserves_sheets() {
    let wb = sample_workbook();
    let decoded = Workbook::decode(&wb.encode().unwrap()).unwrap();
    assert_eq!(decoded, wb);
    assert_eq!(decoded.sheets[0].name, "Redirect Library");
    assert_eq!(decoded.sheets[1].name, "Login Credentials");
}

#[test]
fn test_encoding_is_deterministic() {
    let wb = sample_workbook();
    assert_eq!(wb.encode().unwrap(), wb.encode().unwrap());
}

#[test]
fn test_ensure_sheet_is_idempotent() {
    let mut wb = Workbook::new();
    assert!(wb.ensure_sheet("S", &["a", "b"]));
    assert!(!wb.ensure_sheet("S", &["a", "b"]));
    assert_eq!(wb.sheets.len(), 1);
    assert_eq!(wb.sheet("S"), Some(&Sheet::new("S", &["a", "b"])));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_decode_rejects_bad_magic() {
    let mut bytes = sample_workbook().encode().unwrap();
    bytes[0] = b'X';
    assert_corrupt(&bytes);
}

#[test]
fn test_decode_rejects_unknown_version() {
    let mut bytes = sample_workbook().encode().unwrap();
    bytes[4] = 0xFF;
    assert_corrupt(&bytes);
}

#[test]
fn test_decode_rejects_checksum_mismatch() {
    let mut bytes = sample_workbook().encode().unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x01;
    assert_corrupt(&bytes);
}

#[test]
fn test_decode_rejects_short_and_empty_input() {
    assert_corrupt(&[]);
    assert_corrupt(b"RDLB");
}

#[test]
fn test_decode_rejects_trailing_garbage() {
    let mut bytes = sample_workbook().encode().unwrap();
    bytes.extend_from_slice(b"junk");
    assert_corrupt(&bytes);
}

// =============================================================================
// File I/O Tests
// =============================================================================

#[test]
fn test_read_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    let result = Workbook::read_from(&dir.path().join("missing.rdlb")).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_write_atomic_replaces_file_and_cleans_temp() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib.rdlb");

    let mut wb = sample_workbook();
    wb.write_atomic(&path).unwrap();
    assert_eq!(Workbook::read_from(&path).unwrap(), Some(wb.clone()));

    wb.sheet_mut("Redirect Library").unwrap().rows.clear();
    let written = wb.write_atomic(&path).unwrap();
    assert_eq!(written, std::fs::metadata(&path).unwrap().len());
    assert_eq!(Workbook::read_from(&path).unwrap(), Some(wb));

    // Only the store itself remains; no temp files left behind.
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("lib.rdlb")]);
}

#[test]
fn test_write_atomic_into_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_such_dir").join("lib.rdlb");
    match sample_workbook().write_atomic(&path) {
        Err(RedirectError::Io(_)) => {}
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_write_new_never_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib.rdlb");

    let first = sample_workbook();
    assert!(first.write_new(&path).unwrap());

    let mut second = sample_workbook();
    second.sheet_mut("Redirect Library").unwrap().rows.clear();
    assert!(!second.write_new(&path).unwrap());

    assert_eq!(Workbook::read_from(&path).unwrap(), Some(first));
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("lib.rdlb")]);
}

#[cfg(unix)]
#[test]
fn test_write_atomic_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib.rdlb");
    let mode = |p: &std::path::Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;

    sample_workbook().write_new(&path).unwrap();
    assert_eq!(mode(&path), 0o644);

    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();
    sample_workbook().write_atomic(&path).unwrap();
    assert_eq!(mode(&path), 0o640);
}
