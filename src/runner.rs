//! Batch execution of query files.
//!
//! Each file is read, submitted and rendered before the next one starts.
//! For a query file `F` the runner writes `F.json` and `F.html` next to it.

use std::ffi::OsString;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::client::QueryClient;
use crate::error::{Result, SparqlBatchError};
use crate::html::render_document;
use crate::results::{count_results, ResultSet};

/// What to do when one file in a batch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure and move on to the next file.
    #[default]
    Continue,
    /// Stop the batch at the first failure.
    FailFast,
}

/// The two rendered outputs for one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    /// Compact JSON serialization of the result.
    pub json: String,
    /// HTML document containing the result table.
    pub html: String,
}

impl RenderedArtifacts {
    /// Renders both outputs for `result`.
    pub fn render(result: &ResultSet) -> Result<Self> {
        Ok(Self {
            json: result.to_json()?,
            html: render_document(result).into_string(),
        })
    }

    /// Writes `<query_path>.json`, then `<query_path>.html`.
    pub async fn write(&self, query_path: &Path) -> Result<(PathBuf, PathBuf)> {
        let json_path = artifact_path(query_path, "json");
        write_file(&json_path, &self.json).await?;

        let html_path = artifact_path(query_path, "html");
        write_file(&html_path, &self.html).await?;

        Ok((json_path, html_path))
    }
}

/// Appends `.ext` to the full file name: `q1.rq` becomes `q1.rq.json`.
pub fn artifact_path(query_path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(query_path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| SparqlBatchError::file_io(path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
    Ok(())
}

/// Outcome of one successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of results (rows, or subjects for a graph).
    pub count: usize,
    pub json_path: PathBuf,
    pub html_path: PathBuf,
}

/// Totals for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Files not attempted because the batch stopped early.
    pub skipped: usize,
    /// Set when a failure stopped the batch under [`FailurePolicy::FailFast`].
    pub aborted: bool,
}

/// Runs query files against one endpoint, reporting progress to `out`.
pub struct QueryRunner<C, W = std::io::Stdout> {
    client: C,
    policy: FailurePolicy,
    out: W,
}

impl<C: QueryClient> QueryRunner<C> {
    /// Creates a runner that reports to stdout.
    pub fn new(client: C) -> Self {
        Self::with_output(client, std::io::stdout())
    }
}

impl<C: QueryClient, W: Write> QueryRunner<C, W> {
    /// Creates a runner that reports to `out`.
    pub fn with_output(client: C, out: W) -> Self {
        Self {
            client,
            policy: FailurePolicy::default(),
            out,
        }
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Consumes the runner, returning its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Reads, submits and renders one query file.
    ///
    /// Nothing is written for the file unless the query succeeds.
    pub async fn run_one(&mut self, path: &Path) -> Result<RunOutcome> {
        self.say(format_args!("query {}", path.display()));

        let query = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SparqlBatchError::file_io(path, e))?;
        info!(path = %path.display(), endpoint = self.client.endpoint(), "Running query");

        let result = self.client.submit(&query).await?;
        let count = count_results(Some(&result));
        self.say(format_args!("Query returned {count} results"));

        let artifacts = RenderedArtifacts::render(&result)?;
        let (json_path, html_path) = artifacts.write(path).await?;

        Ok(RunOutcome {
            count,
            json_path,
            html_path,
        })
    }

    /// Runs every file in order, isolating failures unless failing fast.
    pub async fn run_all(&mut self, paths: &[PathBuf]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (index, path) in paths.iter().enumerate() {
            let outcome = self.run_one(path).await;
            match &outcome {
                Ok(outcome) => {
                    info!(path = %path.display(), count = outcome.count, "Query succeeded");
                    summary.succeeded += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), "{}: {}", e.category(), e);
                    self.say(format_args!("Query {} failed: {}", path.display(), e));
                    summary.failed += 1;
                }
            }
            self.say("");

            if outcome.is_err() && self.policy == FailurePolicy::FailFast {
                summary.skipped = paths.len() - index - 1;
                summary.aborted = true;
                break;
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "Batch finished"
        );
        summary
    }

    fn say(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.out, "{line}") {
            debug!("Failed to write progress: {e}");
        }
    }
}
