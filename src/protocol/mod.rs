//! Protocol Module
//!
//! JSON wire types for the admin API and their validation into `Mutation`.
//!
//! ## Request Format (`POST /api/redirects`)
//! ```text
//! {
//!   "action": "add" | "update" | "delete",
//!   "request_url":      string?,   add/update: new key; delete: key selector
//!   "redirect_url":     string?,   add/update: new value
//!   "index":            int?,      update/delete: zero-based row selector
//!   "init_request_url": string?    update: key selector when no index
//! }
//! ```
//!
//! ## Response Format
//! ```text
//! { "success": bool, "message": string, "index": int }
//! ```
//! `index` is the zero-based data row of the affected entry, or of the
//! conflicting entry on a duplicate, and -1 when no row could be resolved.

mod command;
mod response;

pub use command::{Action, MutationRequest};
pub use response::{MutationResponse, RedirectRecord};
