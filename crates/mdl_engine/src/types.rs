use std::fmt;
use std::path::PathBuf;

/// Page as seen by a fetcher once navigation and waits are done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub requested_url: String,
    pub final_url: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Navigation,
    Browser,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Navigation => write!(f, "navigation failed"),
            FailureKind::Browser => write!(f, "browser error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// What happened to one dequeued URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Saved { path: PathBuf, links_enqueued: usize },
    /// Another worker already claimed the URL.
    AlreadyProcessed,
    /// Output file was present before fetching.
    AlreadyOnDisk(PathBuf),
    /// Page converted to nothing.
    Empty,
    Failed(FetchError),
    WriteFailed(String),
}

/// Totals for a whole run, reported once every worker has exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub saved: usize,
    pub already_processed: usize,
    pub already_on_disk: usize,
    pub empty: usize,
    pub failed: usize,
    pub write_failed: usize,
    pub links_enqueued: usize,
    pub workers_started: usize,
    pub processed: usize,
    pub queued: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Saved { links_enqueued, .. } => {
                self.saved += 1;
                self.links_enqueued += links_enqueued;
            }
            JobOutcome::AlreadyProcessed => self.already_processed += 1,
            JobOutcome::AlreadyOnDisk(_) => self.already_on_disk += 1,
            JobOutcome::Empty => self.empty += 1,
            JobOutcome::Failed(_) => self.failed += 1,
            JobOutcome::WriteFailed(_) => self.write_failed += 1,
        }
    }

    pub fn merge(&mut self, other: &RunSummary) {
        self.saved += other.saved;
        self.already_processed += other.already_processed;
        self.already_on_disk += other.already_on_disk;
        self.empty += other.empty;
        self.failed += other.failed;
        self.write_failed += other.write_failed;
        self.links_enqueued += other.links_enqueued;
        self.workers_started += other.workers_started;
    }

    /// Number of URLs a fetch was attempted for.
    pub fn fetch_attempts(&self) -> usize {
        self.saved + self.empty + self.failed + self.write_failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "saved={} on_disk={} empty={} failed={} write_failed={} duplicates={} links_enqueued={} processed={} queued={}",
            self.saved,
            self.already_on_disk,
            self.empty,
            self.failed,
            self.write_failed,
            self.already_processed,
            self.links_enqueued,
            self.processed,
            self.queued
        )
    }
}
