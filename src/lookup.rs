//! Lookup Service
//!
//! Read-only path used by the redirect server.
//!
//! Each `resolve` works from the store file, never from memory shared with a
//! writer. With the snapshot cache enabled the last loaded table is reused
//! only while the file's fingerprint is unchanged, so a commit that has
//! returned is visible to the next lookup that stats the file.

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;
use crate::storage::{Fingerprint, RedirectStore};
use crate::table::SortedTable;

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The request URL has an entry
    Found(String),

    /// No entry; callers redirect to the fallback
    NotFound,
}

/// Table loaded for a specific version of the store file
struct Snapshot {
    fingerprint: Fingerprint,
    table: SortedTable,
}

/// Answers single-key queries against the store
pub struct LookupService {
    store: RedirectStore,
    fallback_url: String,

    /// `None` when caching is disabled
    cache: Option<RwLock<Option<Snapshot>>>,
}

impl LookupService {
    /// Create a lookup service from config
    pub fn new(config: &Config) -> Self {
        Self {
            store: RedirectStore::open(&config.store_path),
            fallback_url: config.fallback_url.clone(),
            cache: config.lookup_cache.then(|| RwLock::new(None)),
        }
    }

    /// Resolve a request URL to its redirect target
    pub fn resolve(&self, key: &str) -> Result<Resolution> {
        let found = match &self.cache {
            None => self.store.load()?.get(key).map(str::to_string),
            Some(cache) => self.resolve_cached(cache, key)?,
        };

        Ok(match found {
            Some(value) => Resolution::Found(value),
            None => Resolution::NotFound,
        })
    }

    /// Resolve `host` + `uri` to the URL to redirect to, using the fallback
    /// when there is no entry
    pub fn redirect_target(&self, host: &str, uri: &str) -> Result<String> {
        let key = request_key(host, uri);
        match self.resolve(&key)? {
            Resolution::Found(value) => {
                tracing::debug!(key = %key, target = %value, "Resolved redirect");
                Ok(value)
            }
            Resolution::NotFound => {
                tracing::debug!(key = %key, "No redirect entry, using fallback");
                Ok(self.fallback_url.clone())
            }
        }
    }

    /// Get the fallback URL
    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    /// Get the underlying store
    pub fn store(&self) -> &RedirectStore {
        &self.store
    }

    fn resolve_cached(
        &self,
        cache: &RwLock<Option<Snapshot>>,
        key: &str,
    ) -> Result<Option<String>> {
        let current = self.store.fingerprint()?;

        if let Some(fingerprint) = current {
            let guard = cache.read();
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.fingerprint == fingerprint {
                    return Ok(snapshot.table.get(key).map(str::to_string));
                }
            }
        }

        let table = self.store.load()?;
        let value = table.get(key).map(str::to_string);

        // Only keep the table if the file is still the one stat'ed before
        // loading. A file created or replaced mid-load is picked up next time.
        let after = self.store.fingerprint()?;
        let mut guard = cache.write();
        match (current, after) {
            (Some(before), Some(after)) if before == after => {
                *guard = Some(Snapshot {
                    fingerprint: after,
                    table,
                });
            }
            _ => *guard = None,
        }

        Ok(value)
    }
}

/// Request key: host and path concatenated verbatim
pub fn request_key(host: &str, uri: &str) -> String {
    let mut key = String::with_capacity(host.len() + uri.len());
    key.push_str(host);
    key.push_str(uri);
    key
}
