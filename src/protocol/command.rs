//! Request definitions
//!
//! Loosely-typed admin payloads and their conversion to `Mutation`.

use serde::Deserialize;

use crate::admin::{Mutation, Selector};
use crate::error::{RedirectError, Result};

/// `InvalidRequest` detail for a body without an action
pub(crate) const MISSING_ACTION: &str = "missing action";

/// Admin actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Delete,
}

impl Action {
    /// Parse the `action` field
    pub fn parse(action: &str) -> Option<Self> {
        match action.trim() {
            "add" => Some(Action::Add),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

/// Raw `POST /api/redirects` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub request_url: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub init_request_url: Option<String>,
}

impl MutationRequest {
    /// The requested action, if present and recognized
    pub fn action(&self) -> Result<Action> {
        let action = non_blank(&self.action)
            .ok_or_else(|| RedirectError::InvalidRequest(MISSING_ACTION.to_string()))?;
        Action::parse(action)
            .ok_or_else(|| RedirectError::InvalidRequest(format!("unknown action {:?}", action)))
    }

    /// Validate into a typed mutation.
    ///
    /// Field checks happen here so nothing reaches the table unless the
    /// request is complete.
    pub fn into_mutation(self) -> Result<Mutation> {
        match self.action()? {
            Action::Add => {
                let (key, value) = self.urls()?;
                Ok(Mutation::Add { key, value })
            }
            Action::Update => {
                let (key, value) = self.urls()?;
                let selector = self
                    .selector(&self.init_request_url)?
                    .ok_or(RedirectError::MissingField("index"))?;
                Ok(Mutation::Update {
                    selector,
                    key,
                    value,
                })
            }
            Action::Delete => {
                let selector = self
                    .selector(&self.request_url)?
                    .ok_or(RedirectError::MissingField("index"))?;
                Ok(Mutation::Delete { selector })
            }
        }
    }

    fn urls(&self) -> Result<(String, String)> {
        let key = non_blank(&self.request_url).ok_or(RedirectError::MissingField("request_url"))?;
        let value =
            non_blank(&self.redirect_url).ok_or(RedirectError::MissingField("redirect_url"))?;
        Ok((key.to_string(), value.to_string()))
    }

    /// Explicit index wins; otherwise fall back to a key selector
    fn selector(&self, key_field: &Option<String>) -> Result<Option<Selector>> {
        if let Some(index) = self.index {
            let position = usize::try_from(index).map_err(|_| {
                RedirectError::InvalidRequest(format!("index {} is negative", index))
            })?;
            return Ok(Some(Selector::Position(position)));
        }
        Ok(non_blank(key_field).map(|k| Selector::Key(k.to_string())))
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
