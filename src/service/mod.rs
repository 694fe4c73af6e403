pub mod http;

use crate::schema::SchemaRequest;
use async_trait::async_trait;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    /// Nothing is listening at the target (host:port).
    Unreachable(String),
    RequestError(String),
    ResponseError(String),
    ConfigError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unreachable(target) => write!(
                f,
                "Could not connect to ML service. Make sure it's running on {}",
                target
            ),
            ServiceError::RequestError(msg) => write!(f, "Request failed: {}", msg),
            ServiceError::ResponseError(msg) => write!(f, "Invalid response: {}", msg),
            ServiceError::ConfigError(msg) => write!(f, "Service configuration error: {}", msg),
        }
    }
}

impl Error for ServiceError {}

/// Health endpoint answer with the body still unparsed, so the status can be
/// shown even when the body is not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: u16,
    pub body: String,
}

impl HealthReport {
    pub fn json(&self) -> Result<serde_json::Value, ServiceError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ServiceError::ResponseError(format!("Health body is not JSON: {}", e)))
    }
}

/// Raw outcome of a prediction call; body parsing is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReply {
    pub status: u16,
    pub body: String,
}

impl PredictionReply {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait MappingService: Send + Sync {
    async fn health(&self) -> Result<HealthReport, ServiceError>;

    async fn predict_mappings(&self, request: &SchemaRequest) -> Result<PredictionReply, ServiceError>;
}
