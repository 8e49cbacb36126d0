//! End-to-end batch runs through the HTTP client against a mock endpoint.

use super::common::{endpoint, read_artifact, respond, write_query, ALICE, GRAPH};
use pretty_assertions::assert_eq;
use serde_json::Value;
use sparql_batch::client::HttpQueryClient;
use sparql_batch::config::EndpointConfig;
use sparql_batch::runner::{BatchSummary, FailurePolicy, QueryRunner};
use tempfile::tempdir;
use wiremock::MockServer;

fn runner_for(server: &MockServer) -> QueryRunner<HttpQueryClient, Vec<u8>> {
    let config = EndpointConfig::new(endpoint(server)).unwrap();
    let client = HttpQueryClient::new(config).unwrap();
    QueryRunner::with_output(client, Vec::new())
}

#[tokio::test]
async fn test_select_writes_json_and_html() {
    let server = MockServer::start().await;
    respond(&server, "query=SELECT", 200, ALICE).await;

    let dir = tempdir().unwrap();
    let path = write_query(dir.path(), "names.rq", "SELECT ?name WHERE { ?s ?p ?name }");

    let mut runner = runner_for(&server);
    let summary = runner.run_all(&[path.clone()]).await;
    assert_eq!(summary.succeeded, 1);

    let json: Value = serde_json::from_str(&read_artifact(&path, "json").unwrap()).unwrap();
    let expected: Value = serde_json::from_str(ALICE).unwrap();
    assert_eq!(json, expected);

    assert_eq!(
        read_artifact(&path, "html").unwrap(),
        "<html><body><table border=\"1\"><thead><tr><th> name </th></tr></thead>\
         <tbody><tr><td>Alice</td></tr></tbody></table></body></html>"
    );

    let output = String::from_utf8(runner.into_output()).unwrap();
    assert_eq!(
        output,
        format!("query {}\nQuery returned 1 results\n\n", path.display())
    );
}

#[tokio::test]
async fn test_graph_writes_one_row_per_triple() {
    let server = MockServer::start().await;
    respond(&server, "query=CONSTRUCT", 200, GRAPH).await;

    let dir = tempdir().unwrap();
    let path = write_query(dir.path(), "knows.rq", "CONSTRUCT WHERE { ?s ?p ?o }");

    let mut runner = runner_for(&server);
    let outcome = runner.run_one(&path).await.unwrap();

    // Graph results count subjects, not triples.
    assert_eq!(outcome.count, 1);

    let html = read_artifact(&path, "html").unwrap();
    assert_eq!(html.matches("<tr>").count(), 2);
    assert!(!html.contains("<th>"));
    assert!(html.contains("<td><a href=\"http://ex.org/bob\">http://ex.org/bob</a></td>"));
    assert!(html.contains("<td>Carol</td>"));

    // Key order from the response is kept.
    assert_eq!(read_artifact(&path, "json").unwrap(), GRAPH);
}

#[tokio::test]
async fn test_failures_are_isolated_per_file() {
    let server = MockServer::start().await;
    respond(&server, "broken", 500, "Virtuoso 37000 Error SP030").await;
    respond(&server, "garbled", 200, "<html>not json</html>").await;
    respond(&server, "%3Fname", 200, ALICE).await;

    let dir = tempdir().unwrap();
    let broken = write_query(dir.path(), "broken.rq", "SELECT broken");
    let garbled = write_query(dir.path(), "garbled.rq", "SELECT garbled");
    let missing = dir.path().join("missing.rq");
    let good = write_query(dir.path(), "good.rq", "SELECT ?name WHERE {}");

    let mut runner = runner_for(&server);
    let summary = runner
        .run_all(&[broken.clone(), garbled.clone(), missing.clone(), good.clone()])
        .await;

    assert_eq!(
        summary,
        BatchSummary {
            succeeded: 1,
            failed: 3,
            skipped: 0,
            aborted: false,
        }
    );
    for failed in [&broken, &garbled, &missing] {
        assert!(read_artifact(failed, "json").is_none());
        assert!(read_artifact(failed, "html").is_none());
    }
    assert!(read_artifact(&good, "json").is_some());

    let output = String::from_utf8(runner.into_output()).unwrap();
    assert!(output.contains(&format!("Query {} failed: Transport error", broken.display())));
    assert!(output.contains(&format!("Query {} failed: Decode error", garbled.display())));
    assert!(output.contains(&format!("Query {} failed: File error", missing.display())));
}

#[tokio::test]
async fn test_fail_fast_skips_remaining_files() {
    let server = MockServer::start().await;
    respond(&server, "broken", 503, "unavailable").await;
    respond(&server, "%3Fname", 200, ALICE).await;

    let dir = tempdir().unwrap();
    let broken = write_query(dir.path(), "broken.rq", "SELECT broken");
    let good = write_query(dir.path(), "good.rq", "SELECT ?name WHERE {}");
    let also_good = write_query(dir.path(), "also_good.rq", "SELECT ?name WHERE {}");

    let mut runner = runner_for(&server).with_policy(FailurePolicy::FailFast);
    let summary = runner.run_all(&[broken, good.clone(), also_good]).await;

    assert!(summary.aborted);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 2);
    assert!(read_artifact(&good, "json").is_none());
}

#[tokio::test]
async fn test_ask_result_keeps_boolean() {
    let server = MockServer::start().await;
    respond(&server, "query=ASK", 200, r#"{"head":{},"boolean":true}"#).await;

    let dir = tempdir().unwrap();
    let path = write_query(dir.path(), "ask.rq", "ASK { ?s ?p ?o }");

    let mut runner = runner_for(&server);
    let outcome = runner.run_one(&path).await.unwrap();

    assert_eq!(outcome.count, 0);
    assert_eq!(read_artifact(&path, "json").unwrap(), r#"{"head":{},"boolean":true}"#);
}

#[test]
fn test_mock_client_batch_blocking() {
    use sparql_batch::client::MockQueryClient;

    let dir = tempdir().unwrap();
    let path = write_query(dir.path(), "names.rq", "SELECT ?name WHERE {}");

    let client = MockQueryClient::new().with_response("?name", ALICE);
    let mut runner = QueryRunner::with_output(client, Vec::new());
    let summary = tokio_test::block_on(runner.run_all(&[path.clone()]));

    assert_eq!(summary.succeeded, 1);
    assert!(read_artifact(&path, "html").unwrap().contains("<td>Alice</td>"));
}
