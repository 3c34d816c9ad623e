//! SortedTable implementation
//!
//! Vec-backed ordered table searched with binary search.

use crate::error::{RedirectError, Result};

use super::{Entry, InsertionPoint};

/// Ordered table of unique request URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedTable {
    /// Entries sorted ascending by key (byte-wise `str` ordering)
    entries: Vec<Entry>,
}

impl SortedTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries that must already be sorted.
    ///
    /// Out-of-order, duplicate, blank or untrimmed rows are rejected with
    /// `StoreCorrupt`; they are never re-sorted or repaired here.
    pub fn from_sorted(entries: Vec<Entry>) -> Result<Self> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    /// Check every table invariant
    pub fn validate(&self) -> Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if !entry.is_well_formed() {
                return Err(RedirectError::StoreCorrupt(format!(
                    "row {} has a blank or untrimmed cell",
                    i
                )));
            }
        }

        for (i, pair) in self.entries.windows(2).enumerate() {
            if pair[0].key >= pair[1].key {
                return Err(RedirectError::StoreCorrupt(format!(
                    "rows {} and {} are out of order ({:?} >= {:?})",
                    i,
                    i + 1,
                    pair[0].key,
                    pair[1].key
                )));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Position of the entry with exactly this key
    pub fn find(&self, key: &str) -> Option<usize> {
        match self.insertion_point(key) {
            InsertionPoint::Occupied(p) => Some(p),
            InsertionPoint::Vacant(_) => None,
        }
    }

    /// Smallest position whose key is >= `key`, flagged as occupied when the
    /// key is already present.
    ///
    /// An empty table yields `Vacant(0)` without touching any entry.
    pub fn insertion_point(&self, key: &str) -> InsertionPoint {
        match self
            .entries
            .binary_search_by(|probe| probe.key.as_str().cmp(key))
        {
            Ok(p) => InsertionPoint::Occupied(p),
            Err(p) => InsertionPoint::Vacant(p),
        }
    }

    /// Value stored for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|p| self.entries[p].value.as_str())
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert a new entry at its sorted position.
    ///
    /// Returns the position taken, or `DuplicateKey` carrying the position of
    /// the existing entry (table unchanged).
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<usize> {
        let entry = Entry::new(key, value)?;
        self.insert_entry(entry)
    }

    /// Insert an already-validated entry
    pub fn insert_entry(&mut self, entry: Entry) -> Result<usize> {
        match self.insertion_point(&entry.key) {
            InsertionPoint::Occupied(position) => Err(RedirectError::DuplicateKey { position }),
            InsertionPoint::Vacant(position) => {
                self.entries.insert(position, entry);
                Ok(position)
            }
        }
    }

    /// Remove and return the entry at `position`
    pub fn delete(&mut self, position: usize) -> Result<Entry> {
        self.check_position(position)?;
        Ok(self.entries.remove(position))
    }

    /// Overwrite the entry at `position`.
    ///
    /// Same key: the value is replaced in place. New key: the entry moves to
    /// the new key's sorted position. The new key is checked for collisions
    /// before anything is removed, so a rename onto another entry's key fails
    /// with `DuplicateKey` and leaves the table as it was.
    ///
    /// Returns the entry's final position.
    pub fn update(
        &mut self,
        position: usize,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<usize> {
        self.check_position(position)?;
        let entry = Entry::new(key, value)?;

        if self.entries[position].key == entry.key {
            self.entries[position].value = entry.value;
            return Ok(position);
        }

        let target = match self.insertion_point(&entry.key) {
            InsertionPoint::Occupied(existing) => {
                return Err(RedirectError::DuplicateKey { position: existing });
            }
            InsertionPoint::Vacant(p) => p,
        };

        // Removing `position` shifts everything after it up by one.
        let target = if position < target { target - 1 } else { target };
        self.entries.remove(position);
        self.entries.insert(target, entry);

        Ok(target)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Entry at `position`
    pub fn entry(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    /// All entries in key order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consume the table, returning its entries in key order
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.entries.len() {
            return Err(RedirectError::OutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SortedTable {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
