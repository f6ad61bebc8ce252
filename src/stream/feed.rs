//! Live Feed
//!
//! Holds one WebSocket open to a backend endpoint and reconnects after a
//! fixed delay when it drops, up to a bounded number of consecutive
//! attempts.

use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use super::state::{
    ConnectionPhase, ConnectionState, StreamOptions, CONNECTION_ERROR, CREATE_FAILED,
    RECONNECT_FAILED,
};
use super::transport::{Connector, StreamError, TransportEvent, WsConnector};
use crate::config::StreamConfig;
use crate::timer::{set_timeout, TimerHandle};

/// A live-updating WebSocket subscription
///
/// Connects on creation (unless disabled). Must be created inside a tokio
/// runtime. Dropping the feed disconnects it and cancels any pending
/// reconnect.
pub struct LiveFeed<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    id: String,
    url: String,
    connector: Arc<dyn Connector>,
    options: StreamOptions<T>,
    state: watch::Sender<ConnectionState<T>>,
    control: Mutex<Control>,
}

struct Control {
    /// Bumped whenever a socket is opened or torn down; events from a socket
    /// of an older generation are ignored
    generation: u64,
    attempts: u32,
    socket: Option<SocketHandle>,
    reconnect: Option<TimerHandle>,
    /// Set by `disconnect`, cleared by `reconnect`
    stopped: bool,
    /// Set once on teardown
    closed: bool,
}

struct SocketHandle {
    close_tx: Option<oneshot::Sender<()>>,
}

impl SocketHandle {
    fn close(mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl<T> LiveFeed<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Open `<base_url><endpoint>` through `connector`
    pub fn new(
        connector: Arc<dyn Connector>,
        base_url: &str,
        endpoint: &str,
        options: StreamOptions<T>,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::default());

        let inner = Arc::new(Inner {
            id: Uuid::new_v4().to_string(),
            url: format!("{}{}", base_url, endpoint),
            connector,
            options,
            state,
            control: Mutex::new(Control {
                generation: 0,
                attempts: 0,
                socket: None,
                reconnect: None,
                stopped: false,
                closed: false,
            }),
        });

        {
            let mut control = inner.control();
            inner.connect(&mut control);
        }

        Self { inner }
    }

    /// Open `endpoint` on the configured WebSocket base URL
    pub fn connect(config: &StreamConfig, endpoint: &str) -> Self {
        Self::new(
            Arc::new(WsConnector),
            &config.base_url,
            endpoint,
            StreamOptions::from_config(config),
        )
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ConnectionState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState<T>> {
        self.inner.state.subscribe()
    }

    /// Start a new connection cycle, e.g. after a terminal failure
    ///
    /// The attempt counter only resets once the connection opens.
    pub fn reconnect(&self) {
        let mut control = self.inner.control();
        if control.closed {
            return;
        }
        control.stopped = false;
        self.inner.connect(&mut control);
    }

    /// Close the socket and cancel any pending reconnect. Idempotent.
    pub fn disconnect(&self) {
        let mut control = self.inner.control();
        control.stopped = true;
        self.inner.teardown(&mut control);
    }

    /// Disconnect for good. Safe to call more than once.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl<T> Drop for LiveFeed<T> {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

impl<T> Inner<T> {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn shutdown(&self) {
        let mut control = self.control();
        if control.closed {
            return;
        }
        control.closed = true;
        control.stopped = true;
        self.teardown(&mut control);
        tracing::debug!(feed_id = %self.id, url = %self.url, "Live feed shut down");
    }

    fn teardown(&self, control: &mut Control) {
        control.generation += 1;
        if let Some(timer) = control.reconnect.take() {
            timer.cancel();
        }
        if let Some(socket) = control.socket.take() {
            socket.close();
            tracing::info!(feed_id = %self.id, url = %self.url, "WebSocket disconnected");
        }

        self.state.send_if_modified(|s| {
            let before = (s.is_connected, s.phase);
            s.is_connected = false;
            if s.phase != ConnectionPhase::Failed {
                s.phase = ConnectionPhase::Disconnected;
            }
            before != (s.is_connected, s.phase)
        });
    }
}

impl<T> Inner<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn connect(self: &Arc<Self>, control: &mut Control) {
        if control.closed || !self.options.enabled {
            return;
        }

        control.generation += 1;
        if let Some(timer) = control.reconnect.take() {
            timer.cancel();
        }
        if let Some(socket) = control.socket.take() {
            socket.close();
        }

        let generation = control.generation;
        let (close_tx, close_rx) = oneshot::channel();
        control.socket = Some(SocketHandle {
            close_tx: Some(close_tx),
        });

        self.state.send_modify(|s| {
            s.is_connected = false;
            s.phase = ConnectionPhase::Connecting;
        });

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            inner.run_socket(generation, close_rx).await;
        });
    }

    /// Drive one socket from connect to close
    async fn run_socket(self: Arc<Self>, generation: u64, mut close_rx: oneshot::Receiver<()>) {
        tracing::debug!(feed_id = %self.id, url = %self.url, "Connecting");

        let connected = tokio::select! {
            result = self.connector.connect(&self.url) => result,
            _ = &mut close_rx => return,
        };

        let mut connection = match connected {
            Ok(connection) => connection,
            Err(StreamError::InvalidUrl(e)) => {
                tracing::error!(feed_id = %self.id, url = %self.url, error = %e, "Failed to create WebSocket");
                self.on_create_failed(generation);
                return;
            }
            Err(e) => {
                tracing::warn!(feed_id = %self.id, url = %self.url, error = %e, "WebSocket error");
                self.on_error(generation);
                self.on_close(generation);
                return;
            }
        };

        if !self.on_open(generation) {
            connection.close().await;
            return;
        }

        loop {
            tokio::select! {
                _ = &mut close_rx => {
                    connection.close().await;
                    return;
                }
                event = connection.next_event() => match event {
                    Some(TransportEvent::Message(text)) => self.on_message(generation, &text),
                    Some(TransportEvent::Error(e)) => {
                        tracing::warn!(feed_id = %self.id, url = %self.url, error = %e, "WebSocket error");
                        self.on_error(generation);
                    }
                    None => {
                        self.on_close(generation);
                        return;
                    }
                },
            }
        }
    }

    fn on_open(&self, generation: u64) -> bool {
        let mut control = self.control();
        if control.generation != generation || control.stopped {
            return false;
        }
        control.attempts = 0;

        self.state.send_modify(|s| {
            s.is_connected = true;
            s.error = None;
            s.phase = ConnectionPhase::Connected;
            s.reconnect_attempts = 0;
        });

        tracing::info!(feed_id = %self.id, url = %self.url, "WebSocket connected");
        true
    }

    fn on_message(&self, generation: u64, text: &str) {
        let message: T = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(feed_id = %self.id, error = %e, "Failed to parse WebSocket message");
                return;
            }
        };

        {
            let control = self.control();
            if control.generation != generation || control.stopped {
                return;
            }
            self.state.send_modify(|s| s.data = Some(message.clone()));
        }

        if let Some(callback) = &self.options.on_message {
            callback(&message);
        }
    }

    fn on_error(&self, generation: u64) {
        {
            let control = self.control();
            if control.generation != generation || control.stopped {
                return;
            }
            self.state
                .send_modify(|s| s.error = Some(CONNECTION_ERROR.to_string()));
        }

        if let Some(callback) = &self.options.on_error {
            callback(CONNECTION_ERROR);
        }
    }

    fn on_create_failed(&self, generation: u64) {
        let mut control = self.control();
        if control.generation != generation || control.stopped {
            return;
        }
        control.socket = None;

        self.state.send_modify(|s| {
            s.is_connected = false;
            s.error = Some(CREATE_FAILED.to_string());
            s.phase = ConnectionPhase::Failed;
        });
    }

    fn on_close(self: &Arc<Self>, generation: u64) {
        let mut control = self.control();
        if control.generation != generation || control.stopped {
            return;
        }
        control.socket = None;

        tracing::info!(feed_id = %self.id, url = %self.url, "WebSocket disconnected");

        let max = self.options.max_reconnect_attempts;
        if control.attempts < max {
            control.attempts += 1;
            let attempt = control.attempts;

            self.state.send_modify(|s| {
                s.is_connected = false;
                s.phase = ConnectionPhase::Reconnecting;
                s.reconnect_attempts = attempt;
            });

            tracing::info!(
                feed_id = %self.id,
                attempt = attempt,
                max_attempts = max,
                "Reconnecting..."
            );

            let weak: Weak<Self> = Arc::downgrade(self);
            control.reconnect = Some(set_timeout(self.options.reconnect_delay, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.reconnect_after_delay(generation);
                }
            }));
        } else {
            tracing::error!(feed_id = %self.id, url = %self.url, attempts = control.attempts, "Giving up on WebSocket");

            self.state.send_modify(|s| {
                s.is_connected = false;
                s.error = Some(RECONNECT_FAILED.to_string());
                s.phase = ConnectionPhase::Failed;
            });
        }
    }

    fn reconnect_after_delay(self: &Arc<Self>, generation: u64) {
        let mut control = self.control();
        if control.closed || control.stopped || control.generation != generation {
            return;
        }
        self.connect(&mut control);
    }
}
