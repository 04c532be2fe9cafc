//! Client configuration for the vault REST API.
//!
//! Follows a builder pattern with validation. The configuration is
//! constructed once at startup, is immutable afterwards, and is passed by
//! reference into the client — no ambient global lookups in core logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default port of the Obsidian Local REST API.
pub const DEFAULT_PORT: u16 = 27124;

/// Default per-client request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

/// URL scheme used to reach the vault API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl std::str::FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(Error::config(format!(
                "Invalid protocol '{other}': expected http or https"
            ))),
        }
    }
}

/// Connection configuration for a single vault API endpoint.
///
/// Owned by the client for its lifetime; the timeout is a per-client value,
/// not a per-call one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer token for the vault API
    pub api_key: String,
    /// URL scheme (the local REST plugin serves https by default)
    pub protocol: Protocol,
    /// Host address of the vault API
    pub host: String,
    /// Port of the vault API
    pub port: u16,
    /// Whether to verify TLS certificates (the plugin uses a self-signed
    /// certificate, so this defaults to false)
    pub verify_ssl: bool,
    /// Request timeout applied to every call
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new config builder with the given API key
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(api_key)
    }

    /// Base URL of the vault API, without a trailing slash
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol.as_str(), self.host, self.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::config(
                "API key is required (set OBSIDIAN_API_KEY or the api_key setting)",
            ));
        }
        if self.host.is_empty() {
            return Err(Error::config("Host cannot be empty"));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("Timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration by layering an optional settings file under
    /// `OBSIDIAN_*` environment variables.
    ///
    /// Absence of the API key is a startup-time fatal condition.
    pub fn load(settings_file: Option<&Path>) -> Result<ClientConfig> {
        let mut builder = config::Config::builder();
        if let Some(path) = settings_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("OBSIDIAN"))
            .build()
            .map_err(|e| Error::config(format!("Failed to read settings: {e}")))?;

        let raw: RawSettings = settings
            .try_deserialize()
            .map_err(|e| Error::config(format!("Invalid settings: {e}")))?;

        let mut b = ClientConfig::builder(raw.api_key.unwrap_or_default());
        if let Some(protocol) = raw.protocol {
            b = b.protocol(protocol.parse()?);
        }
        if let Some(host) = raw.host {
            b = b.host(host);
        }
        if let Some(port) = raw.port {
            b = b.port(port);
        }
        if let Some(verify) = raw.verify_ssl {
            b = b.verify_ssl(verify);
        }
        if let Some(secs) = raw.timeout_secs {
            b = b.timeout(Duration::from_secs(secs));
        }
        b.build()
    }
}

/// Flat settings shape shared by the file and environment sources.
#[derive(Debug, Deserialize)]
struct RawSettings {
    api_key: Option<String>,
    protocol: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    verify_ssl: Option<bool>,
    timeout_secs: Option<u64>,
}

/// Builder for [`ClientConfig`]
pub struct ClientConfigBuilder {
    api_key: String,
    protocol: Protocol,
    host: String,
    port: u16,
    verify_ssl: bool,
    timeout: Duration,
}

impl ClientConfigBuilder {
    /// Create a new builder with defaults matching the local REST plugin
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            protocol: Protocol::Https,
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            verify_ssl: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the URL scheme
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the host address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set TLS certificate verification
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set the per-client request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<ClientConfig> {
        let config = ClientConfig {
            api_key: self.api_key,
            protocol: self.protocol,
            host: self.host,
            port: self.port,
            verify_ssl: self.verify_ssl,
            timeout: self.timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder("secret").build().unwrap();
        assert_eq!(config.protocol, Protocol::Https);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.verify_ssl);
        assert_eq!(config.base_url(), "https://127.0.0.1:27124");
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = ClientConfig::builder("").build().unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_protocol_parse() {
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert!("ftp".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_load_from_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restvault.toml");
        std::fs::write(
            &path,
            "api_key = \"from-file\"\nprotocol = \"http\"\nport = 8080\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = ClientConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.protocol, Protocol::Http);
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
