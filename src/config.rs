//! Configuration for the redirect engine
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Fallback target when a request URL has no entry
pub const DEFAULT_FALLBACK_URL: &str = "https://online.citi.com/US/ag/pageNotFound";

/// Main configuration shared by the redirect server, admin server, and CLI
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// The single durable container holding every sheet.
    /// Commits write a uniquely named temp file next to it, then rename.
    pub store_path: PathBuf,

    // -------------------------------------------------------------------------
    // Lookup Configuration
    // -------------------------------------------------------------------------
    /// Where unresolved request URLs are sent
    pub fallback_url: String,

    /// Keep the last loaded table while the store file is unchanged
    pub lookup_cache: bool,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Redirect server listen address
    pub redirect_listen_addr: String,

    /// Admin API listen address
    pub admin_listen_addr: String,

    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./RedirectLibrary.rdlb"),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            lookup_cache: true,
            redirect_listen_addr: "127.0.0.1:5000".to_string(),
            admin_listen_addr: "127.0.0.1:5001".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Set the fallback redirect target
    pub fn fallback_url(mut self, url: impl Into<String>) -> Self {
        self.config.fallback_url = url.into();
        self
    }

    /// Enable or disable the lookup snapshot cache
    pub fn lookup_cache(mut self, enabled: bool) -> Self {
        self.config.lookup_cache = enabled;
        self
    }

    /// Set the redirect server listen address
    pub fn redirect_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.redirect_listen_addr = addr.into();
        self
    }

    /// Set the admin API listen address
    pub fn admin_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.admin_listen_addr = addr.into();
        self
    }

    /// Set the request timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
