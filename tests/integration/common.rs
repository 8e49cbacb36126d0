//! Shared helpers for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// SELECT response with a single `name` binding.
pub const ALICE: &str =
    r#"{"head":{"vars":["name"]},"results":{"bindings":[{"name":{"value":"Alice"}}]}}"#;

/// RDF/JSON response with one subject and two objects.
pub const GRAPH: &str = r#"{"http://ex.org/alice":{"http://xmlns.com/foaf/0.1/knows":[{"value":"http://ex.org/bob","type":"uri"},{"value":"Carol","type":"literal"}]}}"#;

/// Writes a query file into `dir`.
pub fn write_query(dir: &Path, name: &str, query: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, query).unwrap();
    path
}

/// Reads `<path>.<ext>`, or `None` if it was not written.
pub fn read_artifact(path: &Path, ext: &str) -> Option<String> {
    fs::read_to_string(sparql_batch::runner::artifact_path(path, ext)).ok()
}

/// Answers POSTs whose body contains `needle` with `status` and `body`.
pub async fn respond(server: &MockServer, needle: &str, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains(needle))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Endpoint URL served by `server`.
pub fn endpoint(server: &MockServer) -> String {
    format!("{}/sparql", server.uri())
}
