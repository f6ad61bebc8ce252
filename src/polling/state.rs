//! Polling Feed State
//!
//! The observable result of a polling feed and the options that drive it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::PollingConfig;

/// Called with the message of every failed request
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Latest result of a polling feed
///
/// After the first settled response exactly one of `data`/`error` describes
/// the most recent outcome: a success sets `data` and clears `error`, a
/// failure sets `error` and leaves `data` at the last success.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    /// Nothing has been fetched and nothing is pending
    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.error.is_none() && !self.loading
    }
}

/// Options for a polling feed
#[derive(Clone)]
pub struct PollOptions {
    /// Fixed period between requests; zero fetches once
    pub refresh_interval: Duration,
    /// A disabled feed issues no requests
    pub enabled: bool,
    pub on_error: Option<ErrorCallback>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(5000),
            enabled: true,
            on_error: None,
        }
    }
}

impl PollOptions {
    /// Options using the configured default refresh interval
    pub fn from_config(config: &PollingConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            ..Default::default()
        }
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for PollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollOptions")
            .field("refresh_interval", &self.refresh_interval)
            .field("enabled", &self.enabled)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
