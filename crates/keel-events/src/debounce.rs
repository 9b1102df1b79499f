//! Single-slot debounce timers
//!
//! Each debounced operation owns exactly one pending timer slot: a new
//! event inside the window aborts the pending task and re-arms it, so
//! deferred work is never queued twice per burst.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

pub struct Debounce {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `work` to run after the delay, cancelling any pending run.
    pub fn arm<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.pending.lock();
        if let Some(handle) = slot.take() {
            handle.abort();
        }

        // Anchor the deadline at arm time, not at the task's first poll.
        let sleep = tokio::time::sleep(self.delay);
        *slot = Some(tokio::spawn(async move {
            sleep.await;
            work.await;
        }));
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}
