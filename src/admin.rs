//! Admin Mutation API
//!
//! Coordinates add/update/delete against the sorted table and the store.
//!
//! ## Responsibilities
//! - Validate input and resolve selectors before touching anything
//! - Enforce key uniqueness through `SortedTable`
//! - Commit exactly once per successful mutation, never on failure
//! - Serialize mutations within the process

use std::path::Path;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{RedirectError, Result};
use crate::storage::RedirectStore;
use crate::table::{Entry, SortedTable};

/// Addresses an existing row for update or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Zero-based data row position
    Position(usize),

    /// Request URL located by binary search
    Key(String),
}

impl Selector {
    /// Resolve to a position in `table`.
    ///
    /// Positions past the end fail with `OutOfRange`; unknown keys with
    /// `SelectorNotFound`.
    pub fn resolve(&self, table: &SortedTable) -> Result<usize> {
        match self {
            Selector::Position(position) if *position < table.len() => Ok(*position),
            Selector::Position(position) => Err(RedirectError::OutOfRange {
                position: *position,
                len: table.len(),
            }),
            Selector::Key(key) => table
                .find(key.trim())
                .ok_or(RedirectError::SelectorNotFound),
        }
    }
}

/// A validated mutation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert a new entry
    Add { key: String, value: String },

    /// Rewrite the selected entry (possibly renaming its key)
    Update {
        selector: Selector,
        key: String,
        value: String,
    },

    /// Remove the selected entry
    Delete { selector: Selector },
}

/// The admin-side service
///
/// ## Concurrency Model: Single Writer
///
/// Every mutation holds `write_lock` across load → mutate → commit, so two
/// admin requests in this process can never interleave their read-modify-write
/// cycles. Readers in other processes are never blocked; they see the file
/// before or after a commit thanks to the store's atomic replace.
pub struct AdminService {
    /// Persistence adapter (stateless, file is the source of truth)
    store: RedirectStore,

    /// Serializes mutations
    write_lock: Mutex<()>,
}

impl AdminService {
    /// Create an admin service from config
    pub fn new(config: &Config) -> Self {
        Self::open_path(&config.store_path)
    }

    /// Create an admin service for a store path (convenience method)
    pub fn open_path(path: &Path) -> Self {
        Self {
            store: RedirectStore::open(path),
            write_lock: Mutex::new(()),
        }
    }

    /// All entries in key order
    pub fn list(&self) -> Result<Vec<Entry>> {
        Ok(self.store.load()?.into_entries())
    }

    /// Execute a mutation, returning the affected position
    pub fn execute(&self, mutation: Mutation) -> Result<usize> {
        match mutation {
            Mutation::Add { key, value } => self.add(&key, &value),
            Mutation::Update {
                selector,
                key,
                value,
            } => self.update(&selector, &key, &value),
            Mutation::Delete { selector } => self.delete(&selector),
        }
    }

    /// Add a new entry, returning its position
    pub fn add(&self, key: &str, value: &str) -> Result<usize> {
        let entry = Entry::new(key, value)?;

        let _write_guard = self.write_lock.lock();
        let mut table = self.store.load()?;

        let position = table.insert_entry(entry.clone()).inspect_err(|e| {
            tracing::warn!(key = %entry.key, error = %e, "Add rejected");
        })?;

        self.store.commit(&table)?;
        tracing::info!(key = %entry.key, position, "Entry added");
        Ok(position)
    }

    /// Update the selected entry, returning its final position
    ///
    /// Renames are checked for collisions before the old row is removed; a
    /// failed rename leaves both the table and the store untouched.
    pub fn update(&self, selector: &Selector, key: &str, value: &str) -> Result<usize> {
        let entry = Entry::new(key, value)?;

        let _write_guard = self.write_lock.lock();
        let mut table = self.store.load()?;

        let result = selector
            .resolve(&table)
            .and_then(|position| table.update(position, &entry.key, &entry.value));
        let position = result.inspect_err(|e| {
            tracing::warn!(selector = ?selector, key = %entry.key, error = %e, "Update rejected");
        })?;

        self.store.commit(&table)?;
        tracing::info!(key = %entry.key, position, "Entry updated");
        Ok(position)
    }

    /// Delete the selected entry, returning the position it occupied
    pub fn delete(&self, selector: &Selector) -> Result<usize> {
        let _write_guard = self.write_lock.lock();
        let mut table = self.store.load()?;

        let position = selector.resolve(&table).inspect_err(|e| {
            tracing::warn!(selector = ?selector, error = %e, "Delete rejected");
        })?;
        let removed = table.delete(position)?;

        self.store.commit(&table)?;
        tracing::info!(key = %removed.key, position, "Entry deleted");
        Ok(position)
    }

    /// Get the underlying store
    pub fn store(&self) -> &RedirectStore {
        &self.store
    }
}
