//! Backend Client
//!
//! REST access to the ZeroGEX backend.
//!
//! - **ApiClient**: reqwest-based JSON client (`GET`/`POST`/`PUT`/`DELETE`)
//! - **Fetcher**: the seam the polling feed fetches through, so feeds can be
//!   driven by something other than a live backend

mod error;
mod http;

pub use error::{ApiError, ApiResult};
pub use http::ApiClient;

use async_trait::async_trait;
use serde_json::Value;

/// Source of JSON payloads for an endpoint path
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the JSON body served at `endpoint`
    async fn fetch(&self, endpoint: &str) -> ApiResult<Value>;
}

#[async_trait]
impl Fetcher for ApiClient {
    async fn fetch(&self, endpoint: &str) -> ApiResult<Value> {
        self.get(endpoint).await
    }
}
