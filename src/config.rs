//! Configuration management for sparql-batch.
//!
//! Handles the endpoint settings threaded through a run, and the optional
//! TOML config file that can override the built-in defaults.

use crate::error::{Result, SparqlBatchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Endpoint used when none is given on the command line or in the config file.
pub const DEFAULT_ENDPOINT: &str = "http://live.dbpedia.org/sparql";

/// Result format requested from the endpoint.
pub const DEFAULT_FORMAT: &str = "application/json";

/// Config file contents.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Endpoint to use when the command line does not name one.
    pub endpoint: Option<String>,

    /// Client-side transport timeout in seconds. Absent means no timeout.
    pub timeout_secs: Option<u64>,

    /// Overrides for the auxiliary request parameters.
    #[serde(default)]
    pub params: RequestParams,
}

/// Auxiliary form parameters sent alongside every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    /// Graph scope (`default-graph`).
    pub default_graph: String,
    pub debug: String,
    /// Server-side timeout; empty asks the server for no limit.
    pub timeout: String,
    pub save: String,
    pub fname: String,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            default_graph: String::new(),
            debug: "on".to_string(),
            timeout: String::new(),
            save: "display".to_string(),
            fname: String::new(),
        }
    }
}

/// Everything needed to talk to one endpoint for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Endpoint URL.
    pub url: String,

    /// Result format identifier sent as the `format` parameter.
    pub format: String,

    /// Auxiliary request parameters.
    pub params: RequestParams,

    /// Client-side transport timeout.
    pub timeout: Option<Duration>,
}

impl EndpointConfig {
    /// Creates a config for `url` with default format and parameters.
    ///
    /// Fails if `url` is not an absolute URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Url::parse(&url)
            .map_err(|e| SparqlBatchError::config(format!("Invalid endpoint URL '{url}': {e}")))?;

        Ok(Self {
            url,
            format: DEFAULT_FORMAT.to_string(),
            params: RequestParams::default(),
            timeout: None,
        })
    }

    /// Sets the auxiliary request parameters.
    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the client-side transport timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the form body fields for `query`, in the order they are sent.
    pub fn form_fields<'a>(&'a self, query: &'a str) -> [(&'static str, &'a str); 7] {
        [
            ("query", query),
            ("format", self.format.as_str()),
            ("default-graph", self.params.default_graph.as_str()),
            ("debug", self.params.debug.as_str()),
            ("timeout", self.params.timeout.as_str()),
            ("save", self.params.save.as_str()),
            ("fname", self.params.fname.as_str()),
        ]
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sparql-batch")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SparqlBatchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SparqlBatchError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Returns the configured default endpoint, or the built-in one.
    pub fn default_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Builds the endpoint config for `url` using this file's settings.
    pub fn endpoint_config(&self, url: &str) -> Result<EndpointConfig> {
        Ok(EndpointConfig::new(url)?
            .with_params(self.params.clone())
            .with_timeout(self.timeout_secs.map(Duration::from_secs)))
    }
}
