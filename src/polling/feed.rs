//! Polling Feed
//!
//! Fetches an endpoint immediately on activation, then again on every tick
//! of a fixed interval. Results land in a `watch` channel that consumers
//! read or subscribe to.

use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::watch;
use uuid::Uuid;

use super::state::{ErrorCallback, FetchState, PollOptions};
use crate::client::{ApiError, ApiResult, Fetcher};
use crate::endpoints::Endpoint;
use crate::timer::{set_interval, TimerHandle};

/// A live-updating view of one backend endpoint
///
/// Must be created inside a tokio runtime. Dropping the feed stops polling;
/// responses still in flight at that point are discarded.
pub struct PollingFeed<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    id: String,
    fetcher: Arc<dyn Fetcher>,
    state: watch::Sender<FetchState<T>>,
    control: Mutex<Control>,
}

struct Control {
    /// Bumped on every (re)activation and on shutdown; responses tagged
    /// with an older generation are dropped
    generation: u64,
    endpoint: String,
    options: PollOptions,
    interval: Option<TimerHandle>,
    closed: bool,
}

impl<T> PollingFeed<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Start polling `endpoint`
    pub fn new(fetcher: Arc<dyn Fetcher>, endpoint: impl Into<String>, options: PollOptions) -> Self {
        let (state, _) = watch::channel(FetchState::default());

        let inner = Arc::new(Inner {
            id: Uuid::new_v4().to_string(),
            fetcher,
            state,
            control: Mutex::new(Control {
                generation: 0,
                endpoint: endpoint.into(),
                options,
                interval: None,
                closed: false,
            }),
        });

        {
            let mut control = inner.control();
            inner.activate(&mut control);
        }

        Self { inner }
    }

    /// Poll a known endpoint at its usual dashboard cadence
    pub fn for_endpoint(fetcher: Arc<dyn Fetcher>, endpoint: &Endpoint) -> Self {
        let options = PollOptions::default().refresh_interval(endpoint.default_refresh_interval());
        Self::new(fetcher, endpoint.path(), options)
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }

    pub fn endpoint(&self) -> String {
        self.inner.control().endpoint.clone()
    }

    /// Fetch now, outside the regular cadence
    ///
    /// Sets `loading` until the response settles. The interval timer keeps
    /// its schedule. Does nothing on a disabled or shut down feed.
    pub fn refetch(&self) {
        let control = self.inner.control();
        if control.closed || !control.options.enabled {
            return;
        }

        self.inner.state.send_modify(|s| s.loading = true);
        self.inner.spawn_fetch(&control);
    }

    /// Replace the options and restart the fetch cycle
    pub fn reconfigure(&self, options: PollOptions) {
        let mut control = self.inner.control();
        if control.closed {
            return;
        }
        control.options = options;
        self.inner.activate(&mut control);
    }

    /// Point the feed at a different endpoint and restart the fetch cycle
    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        let mut control = self.inner.control();
        if control.closed {
            return;
        }
        control.endpoint = endpoint.into();
        self.inner.activate(&mut control);
    }

    /// Enable or disable polling; disabling keeps the last fetched data
    pub fn set_enabled(&self, enabled: bool) {
        let mut control = self.inner.control();
        if control.closed || control.options.enabled == enabled {
            return;
        }
        control.options.enabled = enabled;
        self.inner.activate(&mut control);
    }

    /// Stop polling for good. Safe to call more than once.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl<T> Drop for PollingFeed<T> {
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
        control.generation += 1;
        if let Some(timer) = control.interval.take() {
            timer.cancel();
        }

        tracing::debug!(feed_id = %self.id, endpoint = %control.endpoint, "Polling feed shut down");
    }
}

impl<T> Inner<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn activate(self: &Arc<Self>, control: &mut Control) {
        control.generation += 1;
        if let Some(timer) = control.interval.take() {
            timer.cancel();
        }

        if !control.options.enabled {
            self.state.send_modify(|s| s.loading = false);
            tracing::debug!(feed_id = %self.id, endpoint = %control.endpoint, "Polling disabled");
            return;
        }

        // Initial fetch
        self.spawn_fetch(control);

        let period = control.options.refresh_interval;
        if !period.is_zero() {
            let generation = control.generation;
            let weak: Weak<Self> = Arc::downgrade(self);
            control.interval = Some(set_interval(period, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.tick(generation);
                }
            }));
        }

        tracing::debug!(
            feed_id = %self.id,
            endpoint = %control.endpoint,
            interval_ms = period.as_millis() as u64,
            "Polling started"
        );
    }

    fn tick(self: &Arc<Self>, generation: u64) {
        let control = self.control();
        if control.closed || control.generation != generation {
            return;
        }
        self.spawn_fetch(&control);
    }

    /// Issue one request; in-flight requests are never de-duplicated
    fn spawn_fetch(self: &Arc<Self>, control: &Control) {
        let inner = Arc::clone(self);
        let generation = control.generation;
        let endpoint = control.endpoint.clone();

        tokio::spawn(async move {
            let result = inner.fetch(&endpoint).await;
            inner.apply(generation, &endpoint, result);
        });
    }

    async fn fetch(&self, endpoint: &str) -> ApiResult<T> {
        let value = self.fetcher.fetch(endpoint).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn apply(&self, generation: u64, endpoint: &str, result: ApiResult<T>) {
        let callback: Option<(ErrorCallback, String)> = {
            let control = self.control();
            if control.closed || control.generation != generation {
                tracing::trace!(feed_id = %self.id, endpoint = %endpoint, "Discarding stale response");
                return;
            }

            match result {
                Ok(data) => {
                    self.state.send_modify(|s| {
                        s.data = Some(data);
                        s.error = None;
                        s.loading = false;
                    });
                    None
                }
                Err(e) => {
                    if e.is_empty_state() {
                        tracing::debug!(feed_id = %self.id, endpoint = %endpoint, "No data available yet");
                    } else {
                        tracing::warn!(feed_id = %self.id, endpoint = %endpoint, error = %e, "Fetch failed");
                    }

                    let message = e.to_string();
                    self.state.send_modify(|s| {
                        s.error = Some(message.clone());
                        s.loading = false;
                    });
                    control
                        .options
                        .on_error
                        .clone()
                        .map(|callback| (callback, message))
                }
            }
        };

        // Invoked outside the lock so the callback may call back into the feed
        if let Some((callback, message)) = callback {
            callback(&message);
        }
    }
}
