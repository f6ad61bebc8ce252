//! Cancellable Timers
//!
//! `set_interval` and `set_timeout` spawn a tokio task that fires a callback
//! and return a [`TimerHandle`]. Cancelling the handle (explicitly or by
//! dropping it) aborts the task, so no callback fires afterwards.

use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Handle to a scheduled timer
///
/// `cancel` may be called any number of times. Dropping the handle cancels
/// the timer as well.
#[derive(Debug)]
pub struct TimerHandle {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TimerHandle {
    fn new(task: JoinHandle<()>) -> Self {
        Self {
            task: Mutex::new(Some(task)),
        }
    }

    /// Stop any pending firings
    pub fn cancel(&self) {
        let task = match self.task.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(task) = task {
            task.abort();
        }
    }

    /// Whether the timer may still fire
    pub fn is_active(&self) -> bool {
        match self.task.lock() {
            Ok(guard) => guard.as_ref().map(|t| !t.is_finished()).unwrap_or(false),
            Err(_) => false,
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Fire `callback` every `period`, first at `now + period`
///
/// The schedule is anchored at the call, not at the first poll of the task.
pub fn set_interval<F>(period: Duration, mut callback: F) -> TimerHandle
where
    F: FnMut() + Send + 'static,
{
    let start = Instant::now() + period;
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            callback();
        }
    });

    TimerHandle::new(task)
}

/// Fire `callback` once after `delay`
pub fn set_timeout<F>(delay: Duration, callback: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let deadline = Instant::now() + delay;
    let task = tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        callback();
    });

    TimerHandle::new(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn advance(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        // Let spawned timer tasks observe the new time
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_fires_every_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let _timer = set_interval(Duration::from_millis(100), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        advance(50).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        advance(50).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        advance(100).await;
        advance(100).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let timer = set_timeout(Duration::from_millis(100), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(timer.is_active());

        advance(500).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_starts_when_set() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let fired = Arc::new(AtomicUsize::new(0));
        let t = Arc::clone(&ticks);
        let f = Arc::clone(&fired);
        let _interval = set_interval(Duration::from_millis(1000), move || {
            t.fetch_add(1, Ordering::SeqCst);
        });
        let _timeout = set_timeout(Duration::from_millis(1000), move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        // Neither task has been polled yet; one period later both are due
        advance(1000).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        advance(1000).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let timer = set_interval(Duration::from_millis(100), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        timer.cancel();
        timer.cancel();
        assert!(!timer.is_active());

        advance(1000).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let timer = set_timeout(Duration::from_millis(100), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(timer);

        advance(1000).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
