use crate::report;
use crate::schema::{ColumnIndex, PredictionResponse, SchemaError, SchemaRequest, SchemaSide};
use crate::service::{MappingService, ServiceError};
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use tracing::{error, info, warn};

#[derive(Debug)]
pub enum RunError {
    Service(ServiceError),
    Schema(SchemaError),
    Output(io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Service(err) => write!(f, "{}", err),
            RunError::Schema(err) => write!(f, "{}", err),
            RunError::Output(err) => write!(f, "Failed to write report: {}", err),
        }
    }
}

impl Error for RunError {}

impl From<ServiceError> for RunError {
    fn from(err: ServiceError) -> Self {
        RunError::Service(err)
    }
}

impl From<SchemaError> for RunError {
    fn from(err: SchemaError) -> Self {
        RunError::Schema(err)
    }
}

impl From<io::Error> for RunError {
    fn from(err: io::Error) -> Self {
        RunError::Output(err)
    }
}

/// How a smoke test run ended. Errors have already been printed.
#[derive(Debug)]
pub enum RunOutcome {
    Passed { predictions: usize },
    /// The prediction endpoint answered with a non-200 status.
    Rejected { status: u16 },
    Failed(RunError),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Passed { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Passed { predictions } => {
                write!(f, "passed with {} mapping predictions", predictions)
            }
            RunOutcome::Rejected { status } => {
                write!(f, "rejected: prediction endpoint answered {}", status)
            }
            RunOutcome::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

pub struct TestRunner<S, W> {
    service: S,
    out: W,
}

impl<S: MappingService, W: Write> TestRunner<S, W> {
    pub fn new(service: S, out: W) -> Self {
        Self { service, out }
    }

    /// Runs the health check then the prediction test. Never returns an error:
    /// any failure stops the sequence and is printed as `Error: ...`.
    pub async fn run(&mut self, request: &SchemaRequest) -> RunOutcome {
        match self.run_sequence(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("Smoke test failed: {}", err);
                if let Err(write_err) = report::write_error(&mut self.out, &err.to_string()) {
                    warn!("Could not print error to report: {}", write_err);
                }
                RunOutcome::Failed(err)
            }
        }
    }

    async fn run_sequence(&mut self, request: &SchemaRequest) -> Result<RunOutcome, RunError> {
        report::write_banner(&mut self.out)?;
        self.check_health().await?;
        self.run_prediction_test(request).await
    }

    pub async fn check_health(&mut self) -> Result<(), RunError> {
        let health = self.service.health().await?;
        info!("Health check returned {}", health.status);
        report::write_health_status(&mut self.out, health.status)?;

        let body = health.json()?;
        report::write_health_body(&mut self.out, &body)?;
        Ok(())
    }

    pub async fn run_prediction_test(&mut self, request: &SchemaRequest) -> Result<RunOutcome, RunError> {
        let reply = self.service.predict_mappings(request).await?;
        report::write_prediction_status(&mut self.out, reply.status)?;

        if !reply.is_ok() {
            warn!("Prediction endpoint answered {}", reply.status);
            report::write_error(&mut self.out, &reply.body)?;
            return Ok(RunOutcome::Rejected { status: reply.status });
        }

        let response = PredictionResponse::from_json(&reply.body)?;
        let sources = ColumnIndex::new(SchemaSide::Source, &request.source_schema);
        let destinations = ColumnIndex::new(SchemaSide::Destination, &request.destination_schema);

        report::write_suggestions_header(&mut self.out, response.predictions.len())?;
        for (i, prediction) in response.predictions.iter().enumerate() {
            let source = sources.resolve(&prediction.source_column_id)?;
            let destination = destinations.resolve(&prediction.destination_column_id)?;
            report::write_suggestion(&mut self.out, i + 1, source, destination, prediction)?;
        }

        info!("Received {} mapping predictions", response.predictions.len());
        Ok(RunOutcome::Passed {
            predictions: response.predictions.len(),
        })
    }
}
