//! # Redirect Engine
//!
//! Maps "host+path" request URLs to destination URLs and serves redirects:
//! - Sorted table searched and mutated by binary search
//! - One flat container file as the single source of truth
//! - Atomic replace-on-commit so readers never see a half-written file
//! - Separate redirect (read) and admin (write) HTTP services
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │     Redirect Server      │        │       Admin Server       │
//! │   GET /?host=..&uri=..   │        │   GET/POST /api/redirects│
//! └────────────┬─────────────┘        └────────────┬─────────────┘
//!              │                                   │
//! ┌────────────▼─────────────┐        ┌────────────▼─────────────┐
//! │      LookupService       │        │       AdminService       │
//! │ (snapshot per file ver.) │        │  (single-writer lock)    │
//! └────────────┬─────────────┘        └────────────┬─────────────┘
//!              │                                   │
//!              │        ┌─────────────────┐        │
//!              └───────▶│   SortedTable   │◀───────┘
//!                       │ (binary search) │
//!                       └────────┬────────┘
//!                                │ load / commit
//!                       ┌────────▼────────┐
//!                       │  RedirectStore  │
//!                       │ (atomic rename) │
//!                       └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod storage;
pub mod lookup;
pub mod admin;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RedirectError, Result};
pub use config::Config;
pub use table::{Entry, InsertionPoint, SortedTable};
pub use storage::RedirectStore;
pub use lookup::{LookupService, Resolution};
pub use admin::{AdminService, Mutation, Selector};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the redirect engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
