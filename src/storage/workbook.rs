//! Workbook container
//!
//! Named sheets of string rows, encoded into a single checksummed file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{RedirectError, Result};

use super::{FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// A named table: one label row plus data rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name, unique within a workbook
    pub name: String,
    /// Label row (not data)
    pub header: Vec<String>,
    /// Data rows; an empty string is an empty cell
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create a sheet with a label row and no data
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Every sheet stored in one container file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Mutable sheet by name
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Append a sheet unless one with this name exists.
    ///
    /// Returns true if the sheet was created.
    pub fn ensure_sheet(&mut self, name: &str, header: &[&str]) -> bool {
        if self.sheet(name).is_some() {
            return false;
        }
        self.sheets.push(Sheet::new(name, header));
        true
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    /// Encode to the container format: header, bincode payload, CRC footer
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        let crc = crc32fast::hash(&payload);

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len() + FOOTER_SIZE);
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        buf.extend_from_slice(&payload);
        buf.extend_from_slice(&crc.to_le_bytes());

        Ok(buf)
    }

    /// Decode a container, verifying magic, version, length and checksum
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(RedirectError::StoreCorrupt(format!(
                "file is {} bytes, shorter than header and footer",
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(RedirectError::StoreCorrupt(format!(
                "invalid magic: expected RDLB, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(RedirectError::StoreCorrupt(format!(
                "unsupported container version: {}",
                version
            )));
        }

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&bytes[6..HEADER_SIZE]);
        let payload_len = u64::from_le_bytes(len_bytes);

        let expected = (HEADER_SIZE + FOOTER_SIZE) as u64 + payload_len;
        if expected != bytes.len() as u64 {
            return Err(RedirectError::StoreCorrupt(format!(
                "payload length {} does not match file size {}",
                payload_len,
                bytes.len()
            )));
        }

        let payload_end = bytes.len() - FOOTER_SIZE;
        let payload = &bytes[HEADER_SIZE..payload_end];

        let mut crc_bytes = [0u8; 4];
        crc_bytes.copy_from_slice(&bytes[payload_end..]);
        let stored_crc = u32::from_le_bytes(crc_bytes);
        let actual_crc = crc32fast::hash(payload);
        if stored_crc != actual_crc {
            return Err(RedirectError::StoreCorrupt(format!(
                "checksum mismatch: stored {:#010x}, computed {:#010x}",
                stored_crc, actual_crc
            )));
        }

        bincode::deserialize(payload)
            .map_err(|e| RedirectError::StoreCorrupt(format!("undecodable payload: {}", e)))
    }

    // =========================================================================
    // File I/O
    // =========================================================================

    /// Read a workbook from disk; `Ok(None)` if the file does not exist
    pub fn read_from(path: &Path) -> Result<Option<Self>> {
        match fs::read(path) {
            Ok(bytes) => Self::decode(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the file at `path` with this workbook.
    ///
    /// Writes and fsyncs a uniquely named sibling temp file, then renames it
    /// over `path`, so concurrent readers see either the old or the new file
    /// in full. Returns the number of bytes written.
    pub fn write_atomic(&self, path: &Path) -> Result<u64> {
        let bytes = self.encode()?;
        let tmp = write_temp(path, &bytes)?;
        tmp.persist(path).map_err(|e| RedirectError::Io(e.error))?;

        sync_parent_dir(path)?;
        Ok(bytes.len() as u64)
    }

    /// Write this workbook to `path` only if nothing exists there yet.
    ///
    /// Returns `false`, leaving the existing file untouched, when another
    /// writer created `path` first.
    pub fn write_new(&self, path: &Path) -> Result<bool> {
        let bytes = self.encode()?;
        let tmp = write_temp(path, &bytes)?;
        match tmp.persist_noclobber(path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.error.into()),
        }

        sync_parent_dir(path)?;
        Ok(true)
    }
}

/// Fresh temp file next to `path` holding `bytes`, synced to disk.
///
/// Takes over the permissions of the file it replaces (0644 for a new one).
/// Removed on drop unless persisted.
fn write_temp(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut prefix = path.file_name().unwrap_or_default().to_os_string();
    prefix.push(".");
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent_dir(path))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)
            .map(|m| m.permissions().mode())
            .unwrap_or(0o644);
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))?;
    }

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    fs::File::open(parent_dir(path))?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}
