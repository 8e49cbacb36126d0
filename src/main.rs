//! sparql-batch - run SPARQL query files against an endpoint.

use sparql_batch::cli::Cli;
use sparql_batch::client::HttpQueryClient;
use sparql_batch::config::Config;
use sparql_batch::error::{Result, SparqlBatchError};
use sparql_batch::logging;
use sparql_batch::runner::{BatchSummary, QueryRunner};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();

    match run().await {
        Ok(summary) if summary.aborted => std::process::exit(1),
        Ok(_) => {}
        Err(SparqlBatchError::Usage(usage)) => {
            eprintln!("{usage}");
            std::process::exit(1);
        }
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<BatchSummary> {
    let cli = Cli::parse_args();
    cli.check_usage()?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let plan = cli.run_plan(&config)?;
    info!(endpoint = %plan.endpoint, files = plan.files.len(), "Starting batch");

    let client = HttpQueryClient::new(cli.endpoint_config(&config, &plan.endpoint)?)?;
    let mut runner = QueryRunner::new(client).with_policy(cli.failure_policy());

    Ok(runner.run_all(&plan.files).await)
}
