use crate::config::ServiceConfig;
use crate::schema::SchemaRequest;
use crate::service::{HealthReport, MappingService, PredictionReply, ServiceError};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, error, info};

pub struct HttpMappingService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpMappingService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ServiceError::ConfigError(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    // host:port as shown to the user when nothing answers
    fn target(&self) -> String {
        let host = self.base_url.host_str().unwrap_or("unknown-host");
        match self.base_url.port_or_known_default() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_connect() {
            error!("Could not connect to {}: {}", self.target(), err);
            ServiceError::Unreachable(self.target())
        } else {
            error!("Request to {} failed: {}", self.base_url, err);
            ServiceError::RequestError(err.to_string())
        }
    }
}

#[async_trait]
impl MappingService for HttpMappingService {
    async fn health(&self) -> Result<HealthReport, ServiceError> {
        let url = self.endpoint("/health");
        info!("Checking service health at {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::ResponseError(format!("Failed to read health body: {}", e)))?;

        debug!("Health response {}: {}", status, body);
        Ok(HealthReport { status, body })
    }

    async fn predict_mappings(&self, request: &SchemaRequest) -> Result<PredictionReply, ServiceError> {
        let url = self.endpoint("/predict-mappings");
        info!(
            "Requesting mapping predictions for {} source and {} destination columns",
            request.source_schema.len(),
            request.destination_schema.len()
        );

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::ResponseError(format!("Failed to read response body: {}", e)))?;

        debug!("Prediction response {}: {}", status, body);
        Ok(PredictionReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TestRunner;
    use crate::schema::sample::customer_migration_request;
    use axum::{
        http::{header, HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn spawn_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn service_for(base_url: &str) -> HttpMappingService {
        HttpMappingService::new(&ServiceConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn health_returns_status_and_json() {
        let app = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "model_loaded": true})) }),
        );
        let base_url = spawn_service(app).await;

        let report = service_for(&base_url).health().await.unwrap();
        assert_eq!(report.status, 200);
        assert_eq!(report.json().unwrap(), json!({"status": "healthy", "model_loaded": true}));
    }

    #[tokio::test]
    async fn runner_reports_status_of_non_json_health() {
        let app = Router::new().route(
            "/health",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
        );
        let base_url = spawn_service(app).await;

        let report = service_for(&base_url).health().await.unwrap();
        assert_eq!(report.status, 503);
        assert_eq!(report.body, "down for maintenance");
        assert!(report.json().is_err());

        let mut out = Vec::new();
        let outcome = TestRunner::new(service_for(&base_url), &mut out)
            .run(&customer_migration_request())
            .await;
        assert!(!outcome.is_success());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Health Check Status: 503\n"));
        assert!(text.contains("Error: Invalid response: Health body is not JSON:"));
    }

    #[tokio::test]
    async fn predict_posts_request_as_json() {
        async fn echo_counts(headers: HeaderMap, Json(request): Json<SchemaRequest>) -> Json<Value> {
            assert_eq!(
                headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
                Some("application/json")
            );
            Json(json!({
                "sources": request.source_schema.len(),
                "destinations": request.destination_schema.len(),
                "first": request.source_schema[0].name,
            }))
        }

        let app = Router::new().route("/predict-mappings", post(echo_counts));
        let base_url = spawn_service(app).await;

        let reply = service_for(&base_url)
            .predict_mappings(&customer_migration_request())
            .await
            .unwrap();
        assert!(reply.is_ok());
        let body: Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(body, json!({"sources": 6, "destinations": 6, "first": "customer_id"}));
    }

    #[tokio::test]
    async fn predict_keeps_raw_body_on_failure_status() {
        let app = Router::new().route(
            "/predict-mappings",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal error") }),
        );
        let base_url = spawn_service(app).await;

        let reply = service_for(&base_url)
            .predict_mappings(&customer_migration_request())
            .await
            .unwrap();
        assert_eq!(
            reply,
            PredictionReply {
                status: 500,
                body: "internal error".to_string()
            }
        );
        assert!(!reply.is_ok());
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let service = service_for(&format!("http://127.0.0.1:{}", port));

        match service.health().await {
            Err(ServiceError::Unreachable(target)) => {
                assert_eq!(target, format!("127.0.0.1:{}", port))
            }
            other => panic!("expected unreachable, got {:?}", other),
        }
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let result = HttpMappingService::new(&ServiceConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(ServiceError::ConfigError(_))));
    }

    #[test]
    fn default_target_matches_local_service() {
        let service = service_for("http://localhost:5000");
        assert_eq!(service.target(), "localhost:5000");
        assert_eq!(service.endpoint("/health"), "http://localhost:5000/health");
    }
}
