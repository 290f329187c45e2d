use std::collections::{HashSet, VecDeque};

/// Queue of pending URLs plus the two membership sets that keep a URL from
/// being enqueued or processed twice.
///
/// Every operation is a single insert-if-absent, so wrapping one instance in a
/// lock is enough to make enqueue and claim atomic across workers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierState {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    processed: HashSet<String>,
}

impl FrontierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` unless it was ever queued or already processed.
    pub fn push(&mut self, url: &str) -> bool {
        if self.processed.contains(url) || self.queued.contains(url) {
            return false;
        }
        self.queued.insert(url.to_owned());
        self.queue.push_back(url.to_owned());
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Marks `url` as processed; `false` means another worker got there first.
    pub fn claim(&mut self, url: &str) -> bool {
        if self.processed.contains(url) {
            return false;
        }
        self.processed.insert(url.to_owned());
        true
    }

    pub fn is_processed(&self, url: &str) -> bool {
        self.processed.contains(url)
    }

    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }
}
