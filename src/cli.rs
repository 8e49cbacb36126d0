//! Command-line argument parsing for sparql-batch.
//!
//! Uses clap for flags; the positional arguments keep the
//! `[endpoint] file1 [file2 ...]` shape, where the endpoint is recognised by
//! its scheme.

use crate::config::{Config, EndpointConfig, DEFAULT_ENDPOINT};
use crate::error::{Result, SparqlBatchError};
use crate::runner::FailurePolicy;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Printed when no query files are given.
pub const USAGE: &str = "USAGE: sparql-batch [endpoint] q1file q2file ... qnfile";

/// Run SPARQL query files against an endpoint and save the results as JSON and HTML.
///
/// The query in file F is sent to the endpoint and the results are written
/// to F.json and F.html.
#[derive(Parser, Debug)]
#[command(name = "sparql-batch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Endpoint URL (optional, recognised by its http prefix) followed by query files
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Stop at the first query that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Client-side request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Endpoint and query files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub endpoint: String,
    pub files: Vec<PathBuf>,
}

/// Splits positional arguments into an endpoint and query files.
///
/// The first argument is the endpoint if it starts with `http`, ignoring
/// case; otherwise `default_endpoint` is used and every argument is a file.
pub fn resolve_config(args: &[String], default_endpoint: &str) -> Result<RunPlan> {
    let Some(first) = args.first() else {
        return Err(SparqlBatchError::usage(USAGE));
    };

    let (endpoint, files) = if first.to_lowercase().starts_with("http") {
        (first.clone(), &args[1..])
    } else {
        (default_endpoint.to_string(), args)
    };

    if files.is_empty() {
        return Err(SparqlBatchError::usage(USAGE));
    }

    Ok(RunPlan {
        endpoint,
        files: files.iter().map(PathBuf::from).collect(),
    })
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Fails with the usage message when no query files were given.
    ///
    /// Does not depend on the config file, so it can run before loading it.
    pub fn check_usage(&self) -> Result<()> {
        resolve_config(&self.args, DEFAULT_ENDPOINT).map(|_| ())
    }

    /// Resolves the run plan against the config file's default endpoint.
    pub fn run_plan(&self, config: &Config) -> Result<RunPlan> {
        resolve_config(&self.args, config.default_endpoint())
    }

    /// Builds the endpoint config, with CLI flags taking precedence over the file.
    pub fn endpoint_config(&self, config: &Config, endpoint: &str) -> Result<EndpointConfig> {
        let endpoint = config.endpoint_config(endpoint)?;
        Ok(match self.timeout {
            Some(secs) => endpoint.with_timeout(Some(Duration::from_secs(secs))),
            None => endpoint,
        })
    }

    /// Returns the failure policy selected by --fail-fast.
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        }
    }
}
