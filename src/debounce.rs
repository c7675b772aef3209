//! Quiescence-window debouncing for document change notifications.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Default quiescence window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Coalesces bursts of notifications into a single delayed call.
///
/// Holds at most one scheduled task. Each [`notify`](Self::notify) aborts the
/// pending task and schedules a fresh one, so only the last producer of a
/// burst runs, one window after the burst ends.
#[derive(Debug)]
pub struct ChangeDebouncer {
    window: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ChangeDebouncer {
    pub fn new(window: Duration, runtime: Handle) -> Self {
        Self {
            window,
            runtime,
            pending: Mutex::new(None),
        }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `producer` after the window, replacing anything pending.
    pub fn notify(&self, producer: impl FnOnce() + Send + 'static) {
        let window = self.window;
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            producer();
        });
        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    /// Abort the pending call, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for ChangeDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn debouncer() -> ChangeDebouncer {
        ChangeDebouncer::new(DEFAULT_DEBOUNCE, Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_notify_fires_after_window() {
        let debouncer = debouncer();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        debouncer.notify(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_only_last_producer() {
        let debouncer = debouncer();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let sink = Arc::clone(&seen);
            debouncer.notify(move || sink.lock().push(i));
            tokio::time::sleep(Duration::from_millis(30)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*seen.lock(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let debouncer = debouncer();
        let fired = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let counter = Arc::clone(&fired);
            debouncer.notify(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let debouncer = debouncer();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        debouncer.notify(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = debouncer();
            let counter = Arc::clone(&fired);
            debouncer.notify(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
