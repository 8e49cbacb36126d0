//! HTTP client for remote query endpoints.
//!
//! Sends the query as a URL-form-encoded POST and parses the JSON body.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use crate::client::QueryClient;
use crate::config::EndpointConfig;
use crate::error::{Result, SparqlBatchError};
use crate::results::ResultSet;

/// Media types accepted in responses.
const ACCEPT_RESULTS: &str = "application/sparql-results+json, application/json";

/// Query client backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpQueryClient {
    config: EndpointConfig,
    client: Client,
}

impl HttpQueryClient {
    /// Creates a new client for the given endpoint.
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            SparqlBatchError::transport(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self { config, client })
    }

    /// Returns the endpoint configuration.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

#[async_trait]
impl QueryClient for HttpQueryClient {
    async fn submit(&self, query: &str) -> Result<ResultSet> {
        debug!(endpoint = %self.config.url, bytes = query.len(), "Submitting query");

        let response = self
            .client
            .post(&self.config.url)
            .header(ACCEPT, ACCEPT_RESULTS)
            .form(&self.config.form_fields(query))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, bytes = body.len(), "Received response");

        if !status.is_success() {
            return Err(SparqlBatchError::transport(format!(
                "Endpoint returned {}: {}",
                status,
                String::from_utf8_lossy(&body).trim()
            )));
        }

        ResultSet::from_json(std::str::from_utf8(&body)?)
    }

    fn endpoint(&self) -> &str {
        &self.config.url
    }
}
