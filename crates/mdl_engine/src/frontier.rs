use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use mdl_core::FrontierState;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Work queue shared by every worker of a run.
///
/// All bookkeeping sits behind one mutex, which makes enqueue and claim
/// atomic insert-if-absent operations. The lock is never held across an
/// await point.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    arrivals: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        // A worker panicking mid-update cannot leave the sets half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enqueues every seed, returning how many were new.
    pub fn seed<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        urls.into_iter()
            .filter(|url| self.enqueue(url.as_ref()))
            .count()
    }

    /// Adds `url` unless it was queued or processed before.
    pub fn enqueue(&self, url: &str) -> bool {
        let added = self.lock().push(url);
        if added {
            self.arrivals.notify_one();
        }
        added
    }

    /// Next URL, waiting up to `timeout` for one to show up. `None` means the
    /// queue stayed empty for the whole wait.
    pub async fn dequeue(&self, timeout: Duration) -> Option<String> {
        let deadline = Instant::now() + timeout;
        loop {
            let notified = self.arrivals.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(url) = self.lock().pop() {
                return Some(url);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.lock().pop();
            }
        }
    }

    /// Marks `url` processed; `false` if some worker already did.
    pub fn claim(&self, url: &str) -> bool {
        self.lock().claim(url)
    }

    pub fn is_processed(&self, url: &str) -> bool {
        self.lock().is_processed(url)
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending_len()
    }

    pub fn queued_len(&self) -> usize {
        self.lock().queued_len()
    }

    pub fn processed_len(&self) -> usize {
        self.lock().processed_len()
    }
}
