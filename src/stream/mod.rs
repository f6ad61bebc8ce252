//! Live Feeds
//!
//! Keeps a dashboard panel in sync with a backend WebSocket channel.
//!
//! ## Behavior
//!
//! - Connects on creation unless disabled
//! - Every text frame is parsed as JSON; unparseable frames are dropped
//! - After a close, waits `reconnect_delay` and tries again, at most
//!   `max_reconnect_attempts` times in a row; a successful open resets the count
//! - `disconnect` (or dropping the feed) closes the socket and cancels any
//!   pending reconnect
//!
//! ## Example
//!
//! ```rust,no_run
//! use zerogex::config::Config;
//! use zerogex::models::UnderlyingQuote;
//! use zerogex::stream::LiveFeed;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env();
//!     let feed: LiveFeed<UnderlyingQuote> = LiveFeed::connect(&config.stream, "/market");
//!     let mut updates = feed.subscribe();
//!
//!     while updates.changed().await.is_ok() {
//!         if let Some(quote) = &updates.borrow_and_update().data {
//!             println!("{} {:.2}", quote.symbol, quote.close);
//!         }
//!     }
//! }
//! ```

mod feed;
mod state;
mod transport;

pub use feed::LiveFeed;
pub use state::{
    ConnectionPhase, ConnectionState, ErrorCallback, MessageCallback, StreamOptions,
    CONNECTION_ERROR, CREATE_FAILED, RECONNECT_FAILED,
};
pub use transport::{Connection, Connector, StreamError, TransportEvent, WsConnector};
