//! Redirect Store
//!
//! Persistence adapter between the container file and `SortedTable`.
//!
//! ## Responsibilities
//! - Create the container (both sheets, label rows only) on first use
//! - Load the redirect sheet, ignoring trailing blank capacity rows
//! - Commit a table by rewriting the redirect sheet and replacing the file
//! - Fingerprint the file so readers can tell when it changed

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{RedirectError, Result};
use crate::table::{index_of_last_occupied_row, Entry, SortedTable};

use super::{
    Sheet, Workbook, CREDENTIALS_HEADER, CREDENTIALS_SHEET, REDIRECT_HEADER, REDIRECT_SHEET,
    FOOTER_SIZE,
};

/// Identity of the store file: `stat` fields plus the container's CRC footer.
///
/// Every commit renames a fresh file into place, so a returned commit always
/// yields a different fingerprint (new inode on Unix). The footer covers a
/// file of equal length rewritten within one mtime tick on a reused inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
    inode: u64,
    footer: [u8; FOOTER_SIZE],
}

/// Persistence adapter for the redirect table
///
/// Holds no table state: every `load` reads the file and every `commit`
/// replaces it. Any number of processes may hold a `RedirectStore` for the
/// same path; writers are expected to be serialized by the caller.
#[derive(Debug, Clone)]
pub struct RedirectStore {
    /// Container file path
    path: PathBuf,
}

impl RedirectStore {
    /// Bind to a container path (no I/O until `load`/`commit`)
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the redirect table.
    ///
    /// Creates the container if it is missing, and appends the redirect sheet
    /// if the container lacks it. Both happen at most once: the next load
    /// finds them and writes nothing.
    pub fn load(&self) -> Result<SortedTable> {
        let workbook = self.load_workbook()?;
        let sheet = workbook.sheet(REDIRECT_SHEET).ok_or_else(|| {
            RedirectError::StoreCorrupt(format!("sheet {:?} missing after creation", REDIRECT_SHEET))
        })?;

        let table = table_from_sheet(sheet)?;
        tracing::debug!(path = %self.path.display(), entries = table.len(), "Loaded redirect table");
        Ok(table)
    }

    /// Write `table` as the redirect sheet, replacing the file atomically.
    ///
    /// A table that breaks ordering or contains blank cells is refused before
    /// anything touches the disk. Other sheets are carried over unchanged.
    pub fn commit(&self, table: &SortedTable) -> Result<()> {
        table.validate()?;

        let mut workbook = self.load_workbook()?;
        let sheet = workbook.sheet_mut(REDIRECT_SHEET).ok_or_else(|| {
            RedirectError::StoreCorrupt(format!("sheet {:?} missing after creation", REDIRECT_SHEET))
        })?;
        sheet.rows = table
            .iter()
            .map(|e| vec![e.key.clone(), e.value.clone()])
            .collect();

        let bytes = workbook.write_atomic(&self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            entries = table.len(),
            bytes,
            "Committed redirect table"
        );
        Ok(())
    }

    /// Current fingerprint of the store file, `None` if it does not exist
    pub fn fingerprint(&self) -> Result<Option<Fingerprint>> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // Stat and footer both come from this handle, i.e. one inode.
        let meta = file.metadata()?;

        let mut footer = [0u8; FOOTER_SIZE];
        if meta.len() >= FOOTER_SIZE as u64 {
            file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
            file.read_exact(&mut footer)?;
        }

        #[cfg(unix)]
        let inode = {
            use std::os::unix::fs::MetadataExt;
            meta.ino()
        };
        #[cfg(not(unix))]
        let inode = 0;

        Ok(Some(Fingerprint {
            len: meta.len(),
            modified: meta.modified().ok(),
            inode,
            footer,
        }))
    }

    /// Get the container path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read the container, creating it or its redirect sheet when absent.
    ///
    /// Creation never replaces an existing file: when another thread or
    /// process creates (or commits) the store first, its file is read instead.
    fn load_workbook(&self) -> Result<Workbook> {
        loop {
            if let Some(mut workbook) = Workbook::read_from(&self.path)? {
                if workbook.ensure_sheet(REDIRECT_SHEET, &REDIRECT_HEADER) {
                    tracing::info!(path = %self.path.display(), "Adding missing redirect sheet");
                    workbook.write_atomic(&self.path)?;
                }
                return Ok(workbook);
            }

            let mut workbook = Workbook::new();
            workbook.ensure_sheet(REDIRECT_SHEET, &REDIRECT_HEADER);
            workbook.ensure_sheet(CREDENTIALS_SHEET, &CREDENTIALS_HEADER);
            if workbook.write_new(&self.path)? {
                tracing::info!(path = %self.path.display(), "Created redirect store");
                return Ok(workbook);
            }
            tracing::debug!(path = %self.path.display(), "Store created concurrently, rereading");
        }
    }
}

/// Convert the redirect sheet into a table, rejecting anything malformed
fn table_from_sheet(sheet: &Sheet) -> Result<SortedTable> {
    if sheet.header != REDIRECT_HEADER {
        return Err(RedirectError::StoreCorrupt(format!(
            "sheet {:?} has header {:?}, expected {:?}",
            sheet.name, sheet.header, REDIRECT_HEADER
        )));
    }

    let occupied = match index_of_last_occupied_row(&sheet.rows) {
        Some(last) => &sheet.rows[..=last],
        None => &[],
    };

    let mut entries = Vec::with_capacity(occupied.len());
    for (i, row) in occupied.iter().enumerate() {
        match row.as_slice() {
            [key, value] => entries.push(Entry {
                key: key.clone(),
                value: value.clone(),
            }),
            _ => {
                return Err(RedirectError::StoreCorrupt(format!(
                    "row {} has {} cells, expected 2",
                    i,
                    row.len()
                )));
            }
        }
    }

    SortedTable::from_sorted(entries)
}
