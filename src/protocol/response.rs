//! Response definitions
//!
//! Bodies returned by the admin API.

use serde::{Deserialize, Serialize};

use crate::error::{RedirectError, Result};
use crate::table::Entry;

use super::command::MISSING_ACTION;
use super::Action;

/// One row of `GET /api/redirects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRecord {
    pub request_url: String,
    pub redirect_url: String,
}

impl From<Entry> for RedirectRecord {
    fn from(entry: Entry) -> Self {
        Self {
            request_url: entry.key,
            redirect_url: entry.value,
        }
    }
}

/// Result body of `POST /api/redirects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    pub index: i64,
}

impl MutationResponse {
    /// Successful mutation at `position`
    pub fn ok(action: Action, position: usize) -> Self {
        let message = match action {
            Action::Add => "Entry successfully added.",
            Action::Update => "Entry successfully updated.",
            Action::Delete => "Entry successfully deleted.",
        };
        Self {
            success: true,
            message: message.to_string(),
            index: position as i64,
        }
    }

    /// Failed mutation
    pub fn failure(message: impl Into<String>, index: i64) -> Self {
        Self {
            success: false,
            message: message.into(),
            index,
        }
    }

    /// Describe a rejected mutation; `action` is `None` when the action itself
    /// was missing or unknown
    pub fn from_error(action: Option<Action>, error: &RedirectError) -> Self {
        match (action, error) {
            (None, RedirectError::InvalidRequest(msg)) if msg == MISSING_ACTION => {
                Self::failure("Action not received by backend.", -1)
            }
            (None, _) => Self::failure("Not a valid action.", -1),

            (Some(Action::Add | Action::Update), RedirectError::MissingField(field))
                if *field == "request_url" || *field == "redirect_url" =>
            {
                Self::failure("URLs not received by backend.", -1)
            }
            (Some(Action::Update), RedirectError::MissingField(_)) => Self::failure(
                "Neither the index nor the initial request url of the entry to be edited were received by the backend.",
                -1,
            ),
            (Some(Action::Delete), RedirectError::MissingField(_)) => Self::failure(
                "Neither the index nor the request url of the entry to be deleted were received by the backend.",
                -1,
            ),

            (Some(Action::Add), RedirectError::DuplicateKey { position }) => Self::failure(
                format!("Request URL already exists at index {}", position),
                *position as i64,
            ),
            (Some(_), RedirectError::DuplicateKey { position }) => Self::failure(
                format!(
                    "Failed to update entry. You tried to update the request URL for this entry to one that already exists at index {}.",
                    position
                ),
                *position as i64,
            ),

            (Some(Action::Delete), RedirectError::SelectorNotFound) => {
                Self::failure("Index of delete entry could not be retrieved.", -1)
            }
            (Some(_), RedirectError::SelectorNotFound) => {
                Self::failure("Entry to be edited could not be found.", -1)
            }
            (Some(_), RedirectError::OutOfRange { position, len }) => Self::failure(
                format!("Index {} is out of range for {} entries.", position, len),
                -1,
            ),

            (Some(_), e) => Self::failure(e.to_string(), -1),
        }
    }

    /// Build the body for an executed (or rejected) mutation
    pub fn from_result(action: Option<Action>, result: &Result<usize>) -> Self {
        match (action, result) {
            (Some(action), Ok(position)) => Self::ok(action, *position),
            (None, Ok(_)) => Self::failure("Not a valid action.", -1),
            (action, Err(e)) => Self::from_error(action, e),
        }
    }
}
