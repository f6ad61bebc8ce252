//! Polling Feeds
//!
//! Keeps a dashboard panel in sync with a backend endpoint by re-fetching it
//! on a fixed interval.
//!
//! ## Behavior
//!
//! - One request on activation, then one per `refresh_interval` tick
//! - `loading` is only true until the first response (or after `refetch`)
//! - 404 is reported as "No data available yet" and keeps the last data
//! - Ticks are independent: a slow response may land after a newer one
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zerogex::client::ApiClient;
//! use zerogex::config::Config;
//! use zerogex::endpoints::Endpoint;
//! use zerogex::models::GexSummary;
//! use zerogex::polling::PollingFeed;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let client = Arc::new(ApiClient::new(config.api)?);
//!
//!     let feed: PollingFeed<GexSummary> = PollingFeed::for_endpoint(client, &Endpoint::GexSummary);
//!     let mut updates = feed.subscribe();
//!
//!     while updates.changed().await.is_ok() {
//!         let state = updates.borrow_and_update().clone();
//!         if let Some(summary) = state.data {
//!             println!("net GEX: {:.2e}", summary.net_gex);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod feed;
mod state;

pub use feed::PollingFeed;
pub use state::{ErrorCallback, FetchState, PollOptions};
