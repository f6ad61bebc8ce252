//! # ZeroGEX
//!
//! Client-side data layer for the ZeroGEX options analytics dashboard.
//!
//! ## Features
//!
//! - **Polling feeds**: re-fetch a REST endpoint on a fixed interval
//! - **Live feeds**: hold a WebSocket open with bounded reconnects
//! - **Observable state**: every feed publishes its state on a `watch` channel
//! - **Typed endpoints**: paths and cadences for the backend's REST surface
//!
//! ## Modules
//!
//! - [`polling`]: Interval-driven REST feeds
//! - [`stream`]: WebSocket feeds with reconnect
//! - [`client`]: REST client and the [`client::Fetcher`] seam
//! - [`endpoints`]: Backend endpoint catalogue
//! - [`config`]: File and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zerogex::client::ApiClient;
//! use zerogex::config::Config;
//! use zerogex::polling::{PollOptions, PollingFeed};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = Arc::new(ApiClient::new(config.api.clone())?);
//!
//!     let feed: PollingFeed<serde_json::Value> = PollingFeed::new(
//!         client,
//!         "/api/gex/summary",
//!         PollOptions::from_config(&config.polling),
//!     );
//!
//!     let mut updates = feed.subscribe();
//!     updates.changed().await?;
//!     println!("{:?}", updates.borrow().data);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod logging;
pub mod models;
pub mod polling;
pub mod session;
pub mod stream;
pub mod timer;

pub use client::{ApiClient, ApiError, Fetcher};
pub use config::Config;
pub use endpoints::Endpoint;
pub use polling::{FetchState, PollOptions, PollingFeed};
pub use stream::{ConnectionState, LiveFeed, StreamOptions};
