//! Backend REST API Client
//!
//! HTTP client for the ZeroGEX backend's JSON API.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::endpoints::Endpoint;
use crate::models::HealthStatus;

/// Backend REST API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Absolute URL for an endpoint path such as `/api/gex/summary`
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// GET an endpoint and decode its JSON body
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(self.client.get(self.url(endpoint))).await
    }

    /// POST a JSON body
    pub async fn post<T, B>(&self, endpoint: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.post(self.url(endpoint));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    /// PUT a JSON body
    pub async fn put<T, B>(&self, endpoint: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.put(self.url(endpoint));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(self.client.delete(self.url(endpoint))).await
    }

    /// Check backend health
    pub async fn health_check(&self) -> ApiResult<HealthStatus> {
        self.get(&Endpoint::Health.path()).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(ApiError::from_send)?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

            tracing::debug!(status = status.as_u16(), message = %message, "Backend returned error status");

            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(ApiError::from_send)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route(
                "/api/gex/summary",
                get(|| async {
                    Json(json!({
                        "timestamp": "2026-10-16T14:30:00Z",
                        "net_gex": 1.25e9,
                        "total_call_gex": 2.0e9,
                        "total_put_gex": -7.5e8,
                        "put_call_ratio": 0.82,
                        "gamma_flip": 583.5
                    }))
                }),
            )
            .route("/api/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/api/broken",
                get(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"message": "database offline"})),
                    )
                }),
            )
            .route("/api/bare-error", get(|| async { StatusCode::BAD_GATEWAY }))
            .route("/api/garbage", get(|| async { "this is not json" }))
            .route(
                "/api/echo",
                axum::routing::post(|Json(body): Json<Value>| async move { Json(body) }),
            )
            .route(
                "/api/alerts/:id",
                axum::routing::put(|Path(id): Path<u32>, Json(body): Json<Value>| async move {
                    Json(json!({"id": id, "updated": body}))
                })
                .delete(|Path(id): Path<u32>| async move { Json(json!({"deleted": id})) }),
            )
            .route(
                "/api/health",
                get(|| async {
                    Json(json!({
                        "status": "healthy",
                        "timestamp": "2026-10-16T14:30:00Z",
                        "services": {"database": "ok"}
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url,
            request_timeout_ms: 2000,
        })
        .unwrap()
    }

    #[test]
    fn test_url_join() {
        let client = client_for("http://localhost:8000/".to_string());
        assert_eq!(
            client.url("/api/gex/summary"),
            "http://localhost:8000/api/gex/summary"
        );
    }

    #[tokio::test]
    async fn test_get_typed_summary() {
        let client = client_for(spawn_backend().await);

        let summary: crate::models::GexSummary = client.get("/api/gex/summary").await.unwrap();
        assert_eq!(summary.net_gex, 1.25e9);
        assert_eq!(summary.gamma_flip, Some(583.5));
        assert_eq!(summary.call_wall, None);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_empty_state() {
        let client = client_for(spawn_backend().await);

        let err = client.get::<Value>("/api/missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.to_string(), "No data available yet");
    }

    #[tokio::test]
    async fn test_error_status_keeps_server_message() {
        let client = client_for(spawn_backend().await);

        let err = client.get::<Value>("/api/broken").await.unwrap_err();
        match &err {
            ApiError::Status { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "database offline");
            }
            other => panic!("Expected Status, got {:?}", other),
        }
        assert_eq!(err.to_string(), "API error: 500");

        let err = client.get::<Value>("/api/bare-error").await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "HTTP 502");
            }
            other => panic!("Expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let client = client_for(spawn_backend().await);

        let err = client.get::<Value>("/api/garbage").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_post_round_trips_body() {
        let client = client_for(spawn_backend().await);

        let body = json!({"symbol": "SPY", "limit": 10});
        let echoed: Value = client.post("/api/echo", Some(&body)).await.unwrap();
        assert_eq!(echoed, body);
    }

    #[tokio::test]
    async fn test_put_and_delete() {
        let client = client_for(spawn_backend().await);

        let updated: Value = client
            .put("/api/alerts/7", Some(&json!({"threshold": 1.0e9})))
            .await
            .unwrap();
        assert_eq!(updated, json!({"id": 7, "updated": {"threshold": 1.0e9}}));

        let deleted: Value = client.delete("/api/alerts/7").await.unwrap();
        assert_eq!(deleted, json!({"deleted": 7}));

        // No such route
        let err = client.delete::<Value>("/api/alerts").await.unwrap_err();
        assert!(err.is_empty_state());
    }

    #[tokio::test]
    async fn test_health_check() {
        let client = client_for(spawn_backend().await);

        let health = client.health_check().await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(
            health.services.unwrap().get("database"),
            Some(&json!("ok"))
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        let err = client.get::<Value>("/api/gex/summary").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_) | ApiError::Timeout));
        assert_eq!(err.to_string(), "Failed to fetch data");
    }
}
