//! Live Feed State

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::StreamConfig;

/// Shown after a transport error event
pub const CONNECTION_ERROR: &str = "Connection error";

/// Shown once the reconnect budget is spent
pub const RECONNECT_FAILED: &str = "Failed to reconnect after multiple attempts";

/// Shown when a socket cannot even be created (e.g. a malformed URL)
pub const CREATE_FAILED: &str = "Failed to create connection";

/// Called with every successfully parsed message
pub type MessageCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Called with the error message on every transport error event
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Where a live feed is in its connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting out the reconnect delay
    Reconnecting,
    /// Gave up; only an explicit `reconnect` leaves this phase
    Failed,
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionPhase::Disconnected => write!(f, "disconnected"),
            ConnectionPhase::Connecting => write!(f, "connecting"),
            ConnectionPhase::Connected => write!(f, "connected"),
            ConnectionPhase::Reconnecting => write!(f, "reconnecting"),
            ConnectionPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Observable state of a live feed
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState<T> {
    /// Last successfully parsed message
    pub data: Option<T>,
    pub is_connected: bool,
    pub error: Option<String>,
    pub phase: ConnectionPhase,
    /// Consecutive reconnect attempts since the last successful open
    pub reconnect_attempts: u32,
}

impl<T> Default for ConnectionState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_connected: false,
            error: None,
            phase: ConnectionPhase::Disconnected,
            reconnect_attempts: 0,
        }
    }
}

/// Options for a live feed
pub struct StreamOptions<T> {
    /// A disabled feed never connects
    pub enabled: bool,
    pub reconnect_delay: Duration,
    pub max_reconnect_attempts: u32,
    pub on_message: Option<MessageCallback<T>>,
    pub on_error: Option<ErrorCallback>,
}

impl<T> Default for StreamOptions<T> {
    fn default() -> Self {
        Self {
            enabled: true,
            reconnect_delay: Duration::from_millis(3000),
            max_reconnect_attempts: 5,
            on_message: None,
            on_error: None,
        }
    }
}

impl<T> Clone for StreamOptions<T> {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            reconnect_delay: self.reconnect_delay,
            max_reconnect_attempts: self.max_reconnect_attempts,
            on_message: self.on_message.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> StreamOptions<T> {
    pub fn from_config(config: &StreamConfig) -> Self {
        Self {
            reconnect_delay: config.reconnect_delay(),
            max_reconnect_attempts: config.max_reconnect_attempts,
            ..Default::default()
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    pub fn on_message<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_message = Some(Arc::new(callback));
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

impl<T> fmt::Debug for StreamOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamOptions")
            .field("enabled", &self.enabled)
            .field("reconnect_delay", &self.reconnect_delay)
            .field("max_reconnect_attempts", &self.max_reconnect_attempts)
            .field("on_message", &self.on_message.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
