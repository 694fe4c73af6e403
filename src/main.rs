use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};

mod config;
mod report;
mod runner;
mod schema;
mod service;
mod util;

use crate::config::{AppConfig, CliArgs};
use crate::runner::TestRunner;
use crate::schema::sample::{customer_migration_request, load_request};
use crate::service::http::HttpMappingService;
use crate::util::logging::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_tracing(args.log_format);

    let failure = if args.fail_on_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    };

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            println!("Error: {}", e);
            return failure;
        }
    };

    let request = match &args.request {
        Some(path) => {
            info!("Loading schema request from {}", path.display());
            match load_request(path) {
                Ok(request) => request,
                Err(e) => {
                    error!("Failed to load schema request: {}", e);
                    println!("Error: {}", e);
                    return failure;
                }
            }
        }
        None => customer_migration_request(),
    };

    let service = match HttpMappingService::new(&config.service) {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to create service client: {}", e);
            println!("Error: {}", e);
            return failure;
        }
    };

    info!("Running mapping service smoke test against {}", config.service.base_url);
    let mut runner = TestRunner::new(service, io::stdout().lock());
    let outcome = runner.run(&request).await;

    info!("Smoke test {}", outcome);
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        failure
    }
}
