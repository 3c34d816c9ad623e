//! Sorted Table Module
//!
//! Ordered array of unique request URLs and their redirect targets.
//!
//! ## Responsibilities
//! - Binary search for point lookups and insertion points
//! - Shift-based ordered insert and delete
//! - Key rename as remove + reinsert so order is never "almost sorted"
//! - Validate rows handed over by the storage layer
//!
//! ## Invariants
//! - Keys strictly ascending by byte-wise (ordinal) comparison, no duplicates
//! - Every entry sits exactly where binary search would place it
//! - No empty or whitespace-padded key or value
//! - Values added through `Entry::new` hold no control characters
//!
//! ## Data Structure Choice
//! A plain `Vec<Entry>`: the table is rebuilt from the store for every
//! request and mutated at most once, so O(n) shifts are cheap and the
//! length is always exact (no reserved trailing capacity).

mod sorted;

use crate::error::{RedirectError, Result};

pub use sorted::SortedTable;

/// A (request URL, redirect URL) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Host concatenated with path, compared ordinally
    pub key: String,

    /// Destination URL
    pub value: String,
}

impl Entry {
    /// Build an entry from raw input, trimming surrounding whitespace.
    ///
    /// Fails with `MissingField` if either side is blank after trimming, and
    /// with `InvalidRequest` if the value holds control characters (it must
    /// fit in a `Location` header).
    pub fn new(key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref().trim();
        let value = value.as_ref().trim();

        if key.is_empty() {
            return Err(RedirectError::MissingField("request_url"));
        }
        if value.is_empty() {
            return Err(RedirectError::MissingField("redirect_url"));
        }
        if value.chars().any(char::is_control) {
            return Err(RedirectError::InvalidRequest(
                "redirect_url contains control characters".to_string(),
            ));
        }

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// True if both cells are non-empty and already trimmed
    pub(crate) fn is_well_formed(&self) -> bool {
        is_clean_cell(&self.key) && is_clean_cell(&self.value)
    }
}

/// Where a key lives, or must go, in a sorted table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// No entry has this key; inserting here keeps the table sorted
    Vacant(usize),

    /// An entry with this key already sits at this position
    Occupied(usize),
}

impl InsertionPoint {
    /// The position regardless of occupancy
    pub fn position(&self) -> usize {
        match *self {
            InsertionPoint::Vacant(p) | InsertionPoint::Occupied(p) => p,
        }
    }
}

/// Index of the last row holding any non-empty cell.
///
/// Row-oriented backends may keep blank trailing rows as spare capacity;
/// everything after the returned index is ignored. `None` means every row
/// is blank.
pub fn index_of_last_occupied_row<R: AsRef<[String]>>(rows: &[R]) -> Option<usize> {
    rows.iter()
        .rposition(|row| row.as_ref().iter().any(|cell| !cell.is_empty()))
}

fn is_clean_cell(cell: &str) -> bool {
    !cell.is_empty() && cell.trim() == cell
}
