//! # Core Configuration Module
//!
//! Provides configuration management for firebreak.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance holding every endpoint, local address and file location the tools
//! need. Defaults point at the public Box and WildFire services; every value
//! can be overridden, which is how tests point the crates at local doubles.
//!
//! `build()` validates eagerly so a bad override fails before any network or
//! filesystem work starts.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .listen_port(8080)
//!     .secrets_filename(".firebreak-box.json")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.redirect_uri(), "http://localhost:8080");
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let result = CoreConfig::builder().token_url("not a url").build();
//! assert!(result.is_err());
//! ```

use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Box OAuth2 authorization endpoint
pub const DEFAULT_AUTHORIZE_URL: &str = "https://app.box.com/api/oauth2/authorize";

/// Box OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://app.box.com/api/oauth2/token";

/// Box content API base (trailing slash required)
pub const DEFAULT_BOX_API_BASE: &str = "https://api.box.com/2.0/";

/// Default host for the WildFire public API
pub const DEFAULT_WILDFIRE_HOSTNAME: &str = "wildfire.paloaltonetworks.com";

/// Address the OAuth callback listener binds to
pub const DEFAULT_LISTEN_ADDR: &str = "localhost";

/// Port the OAuth callback listener binds to
pub const DEFAULT_LISTEN_PORT: u16 = 8000;

/// File holding tag-keyed Box credentials
pub const DEFAULT_SECRETS_FILENAME: &str = ".firebreak-box.json";

/// File holding WildFire API keys
pub const DEFAULT_PANRC_FILENAME: &str = ".panrc";

/// Runtime configuration shared by the firebreak binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// OAuth2 authorization endpoint the operator visits
    pub authorize_url: String,

    /// OAuth2 token endpoint for code and refresh-token grants
    pub token_url: String,

    /// Base URL for Box folder/file requests
    pub box_api_base: String,

    /// Host the callback listener binds to; also used in `redirect_uri`
    pub listen_addr: String,

    /// Port the callback listener binds to
    pub listen_port: u16,

    /// Name of the credentials file
    pub secrets_filename: String,

    /// Directories searched, in order, for an existing credentials file
    pub secrets_search_path: Vec<String>,

    /// Name of the WildFire key file
    pub panrc_filename: String,

    /// Directories searched, in order, for the WildFire key file
    pub panrc_search_path: Vec<String>,

    /// WildFire host used when `.panrc` does not name one
    pub wildfire_hostname: String,

    /// Per-request transport timeout
    pub http_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            box_api_base: DEFAULT_BOX_API_BASE.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            secrets_filename: DEFAULT_SECRETS_FILENAME.to_string(),
            secrets_search_path: default_search_path(),
            panrc_filename: DEFAULT_PANRC_FILENAME.to_string(),
            panrc_search_path: default_search_path(),
            wildfire_hostname: DEFAULT_WILDFIRE_HOSTNAME.to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

fn default_search_path() -> Vec<String> {
    vec![".".to_string(), "~".to_string()]
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// The `redirect_uri` registered with the OAuth2 provider.
    pub fn redirect_uri(&self) -> String {
        format!("http://{}:{}", self.listen_addr, self.listen_port)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Endpoint URLs parse and use http(s)
    /// - The Box API base ends with `/` so relative joins keep the version path
    /// - The listen port is non-zero (the redirect URI must be fixed)
    /// - File names and search paths are non-empty
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("authorize_url", &self.authorize_url),
            ("token_url", &self.token_url),
            ("box_api_base", &self.box_api_base),
        ] {
            let url = Url::parse(value)
                .map_err(|e| Error::Config(format!("Invalid {}: '{}': {}", name, value, e)))?;
            if url.scheme() != "https" && url.scheme() != "http" {
                return Err(Error::Config(format!(
                    "Invalid {}: unsupported scheme '{}'",
                    name,
                    url.scheme()
                )));
            }
        }

        if !self.box_api_base.ends_with('/') {
            return Err(Error::Config(
                "box_api_base must end with '/'".to_string(),
            ));
        }

        if self.listen_addr.trim().is_empty() {
            return Err(Error::Config("Listen address cannot be empty".to_string()));
        }

        if self.listen_port == 0 {
            return Err(Error::Config(
                "Listen port must be fixed; 0 would change the redirect URI".to_string(),
            ));
        }

        if self.secrets_filename.is_empty() || self.panrc_filename.is_empty() {
            return Err(Error::Config("File names cannot be empty".to_string()));
        }

        if self.secrets_search_path.is_empty() || self.panrc_search_path.is_empty() {
            return Err(Error::Config("Search paths cannot be empty".to_string()));
        }

        if self.wildfire_hostname.trim().is_empty() {
            return Err(Error::Config("WildFire hostname cannot be empty".to_string()));
        }

        if self.http_timeout.is_zero() {
            return Err(Error::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Unset values fall back to the `DEFAULT_*` constants.
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    authorize_url: Option<String>,
    token_url: Option<String>,
    box_api_base: Option<String>,
    listen_addr: Option<String>,
    listen_port: Option<u16>,
    secrets_filename: Option<String>,
    secrets_search_path: Option<Vec<String>>,
    panrc_filename: Option<String>,
    panrc_search_path: Option<Vec<String>>,
    wildfire_hostname: Option<String>,
    http_timeout: Option<Duration>,
}

impl CoreConfigBuilder {
    /// Sets the OAuth2 authorization endpoint.
    pub fn authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = Some(url.into());
        self
    }

    /// Sets the OAuth2 token endpoint.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Sets the Box API base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let config = CoreConfig::builder()
    ///     .box_api_base("http://127.0.0.1:9000/2.0/")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.box_api_base, "http://127.0.0.1:9000/2.0/");
    /// ```
    pub fn box_api_base(mut self, url: impl Into<String>) -> Self {
        self.box_api_base = Some(url.into());
        self
    }

    /// Sets the callback listener host.
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = Some(addr.into());
        self
    }

    /// Sets the callback listener port.
    pub fn listen_port(mut self, port: u16) -> Self {
        self.listen_port = Some(port);
        self
    }

    /// Sets the credentials file name.
    pub fn secrets_filename(mut self, name: impl Into<String>) -> Self {
        self.secrets_filename = Some(name.into());
        self
    }

    /// Sets the directories searched for the credentials file.
    pub fn secrets_search_path<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secrets_search_path = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the WildFire key file name.
    pub fn panrc_filename(mut self, name: impl Into<String>) -> Self {
        self.panrc_filename = Some(name.into());
        self
    }

    /// Sets the directories searched for the WildFire key file.
    pub fn panrc_search_path<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.panrc_search_path = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the fallback WildFire host.
    pub fn wildfire_hostname(mut self, host: impl Into<String>) -> Self {
        self.wildfire_hostname = Some(host.into());
        self
    }

    /// Sets the per-request transport timeout.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Builds the final configuration, validating every field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid value.
    pub fn build(self) -> Result<CoreConfig> {
        let defaults = CoreConfig::default();

        let config = CoreConfig {
            authorize_url: self.authorize_url.unwrap_or(defaults.authorize_url),
            token_url: self.token_url.unwrap_or(defaults.token_url),
            box_api_base: self.box_api_base.unwrap_or(defaults.box_api_base),
            listen_addr: self.listen_addr.unwrap_or(defaults.listen_addr),
            listen_port: self.listen_port.unwrap_or(defaults.listen_port),
            secrets_filename: self.secrets_filename.unwrap_or(defaults.secrets_filename),
            secrets_search_path: self
                .secrets_search_path
                .unwrap_or(defaults.secrets_search_path),
            panrc_filename: self.panrc_filename.unwrap_or(defaults.panrc_filename),
            panrc_search_path: self.panrc_search_path.unwrap_or(defaults.panrc_search_path),
            wildfire_hostname: self.wildfire_hostname.unwrap_or(defaults.wildfire_hostname),
            http_timeout: self.http_timeout.unwrap_or(defaults.http_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
