use std::path::PathBuf;
use std::time::Duration;

use crate::browser::BrowserSettings;
use crate::extract::DEFAULT_CONTENT_SELECTORS;
use crate::fetch::FetchSettings;
use crate::scrub::{default_scrub_rules, ScrubRule};

pub const DEFAULT_WORKERS: usize = 4;

/// Which fetcher each worker owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Headless Chrome through the DevTools protocol.
    #[default]
    Browser,
    /// Plain HTTP GET, for sites that render without JavaScript.
    Http,
}

/// Pauses and bounded waits used by workers and fetchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    /// Upper bound of the random delay before each fetch.
    pub jitter_max: Duration,
    /// Fixed wait after navigation for scripts to render.
    pub settle: Duration,
    /// How long each content selector may take to appear.
    pub selector_wait: Duration,
    pub navigation_timeout: Duration,
    /// How long an idle worker waits for new work before exiting.
    pub dequeue_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            jitter_max: Duration::from_secs(1),
            settle: Duration::from_secs(3),
            selector_wait: Duration::from_secs(5),
            navigation_timeout: Duration::from_secs(30),
            dequeue_timeout: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub output_dir: PathBuf,
    pub workers: usize,
    pub backend: Backend,
    pub crawl_prefix: Option<String>,
    pub content_selectors: Vec<String>,
    pub scrub_rules: Vec<ScrubRule>,
    pub timing: Timing,
    pub browser: BrowserSettings,
    pub http: FetchSettings,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            workers: DEFAULT_WORKERS,
            backend: Backend::default(),
            crawl_prefix: None,
            content_selectors: DEFAULT_CONTENT_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scrub_rules: default_scrub_rules(),
            timing: Timing::default(),
            browser: BrowserSettings::default(),
            http: FetchSettings::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_with_output(default_output_dir())
    }
}

/// `<Downloads>/markdown-dl`, falling back to `~/Downloads` and finally to
/// the working directory when no home is known.
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("markdown-dl")
}
