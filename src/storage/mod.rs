//! Storage Module
//!
//! Durable, row-oriented container for the redirect table.
//!
//! ## Responsibilities
//! - Load the redirect sheet into a `SortedTable`, rejecting corrupt rows
//! - Create the container and its sheets on first use
//! - Commit a table by atomically replacing the whole file
//! - Preserve sheets the redirect engine does not own
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "RDLB" (4) | Version: u16 (2) | Len: u64 (8)   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload (Len bytes, bincode)                            │
//! │   Workbook { sheets: [Sheet { name, header, rows }] }   │
//! │   rows: [[cell, cell], ...]   ("" = empty cell)         │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                        │
//! │   PayloadCRC: u32                                       │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod store;
mod workbook;

pub use store::{Fingerprint, RedirectStore};
pub use workbook::{Sheet, Workbook};

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes identifying a redirect library container
pub(crate) const MAGIC: &[u8; 4] = b"RDLB";

/// Current container format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + PayloadLen (8) = 14 bytes
pub(crate) const HEADER_SIZE: usize = 14;

/// Footer size: PayloadCRC (4) = 4 bytes
pub(crate) const FOOTER_SIZE: usize = 4;

// =============================================================================
// Sheet Layout
// =============================================================================

/// Sheet holding the sorted (request URL, redirect URL) rows
pub const REDIRECT_SHEET: &str = "Redirect Library";

/// Label row of the redirect sheet
pub const REDIRECT_HEADER: [&str; 2] = ["Request URL", "Redirect URL"];

/// Sheet holding the admin login; owned by the authentication layer
pub const CREDENTIALS_SHEET: &str = "Login Credentials";

/// Label row of the credentials sheet
pub const CREDENTIALS_HEADER: [&str; 2] = ["Username", "Password"];
