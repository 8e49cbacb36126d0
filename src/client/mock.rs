//! Mock query client for testing.
//!
//! Returns canned response documents based on the query text.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::client::QueryClient;
use crate::error::{Result, SparqlBatchError};
use crate::results::ResultSet;

/// Endpoint reported by the mock.
const MOCK_ENDPOINT: &str = "mock://endpoint";

/// Canned outcome for a query.
#[derive(Debug, Clone)]
enum MockResponse {
    /// Raw response body, parsed like a real one.
    Body(String),
    /// Transport failure with the given message.
    TransportError(String),
}

/// Mock client that answers from pattern-matched canned responses.
///
/// Used for unit testing without a live endpoint. Every submitted query is
/// recorded so tests can assert on what was sent.
#[derive(Debug, Default)]
pub struct MockQueryClient {
    /// Custom response mappings (pattern -> response).
    responses: Vec<(String, MockResponse)>,
    /// Queries received, in order.
    submitted: Mutex<Vec<String>>,
}

impl MockQueryClient {
    /// Creates a new mock client. Unmatched queries get an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a response body for queries containing `pattern`.
    pub fn with_response(mut self, pattern: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .push((pattern.into(), MockResponse::Body(body.into())));
        self
    }

    /// Makes queries containing `pattern` fail as if the endpoint were down.
    pub fn with_transport_error(
        mut self,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.responses
            .push((pattern.into(), MockResponse::TransportError(message.into())));
        self
    }

    /// Returns the queries submitted so far.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    fn respond(&self, query: &str) -> Result<ResultSet> {
        let response = self
            .responses
            .iter()
            .find(|(pattern, _)| query.contains(pattern.as_str()))
            .map(|(_, response)| response);

        match response {
            Some(MockResponse::Body(body)) => ResultSet::from_json(body),
            Some(MockResponse::TransportError(message)) => {
                Err(SparqlBatchError::transport(message.clone()))
            }
            None => ResultSet::from_json("{}"),
        }
    }
}

#[async_trait]
impl QueryClient for MockQueryClient {
    async fn submit(&self, query: &str) -> Result<ResultSet> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(query.to_string());
        }
        self.respond(query)
    }

    fn endpoint(&self) -> &str {
        MOCK_ENDPOINT
    }
}
