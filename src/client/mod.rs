//! Query endpoint clients.
//!
//! Provides the trait the runner talks to and its implementations.

pub mod http;
pub mod mock;

pub use http::HttpQueryClient;
pub use mock::MockQueryClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::results::ResultSet;

/// Trait for clients that can answer a query document.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Submits `query` and returns the classified response.
    ///
    /// Transport and decoding failures are errors; a query that matches
    /// nothing is an empty `ResultSet`.
    async fn submit(&self, query: &str) -> Result<ResultSet>;

    /// Returns the endpoint URL, for progress reporting.
    fn endpoint(&self) -> &str;
}
