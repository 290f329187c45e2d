//! Headless Chrome fetcher over the DevTools protocol.
//!
//! Every worker launches its own browser process with its own profile
//! directory; no session state is shared between workers.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::Timing;
use crate::fetch::{Fetcher, FetcherFactory};
use crate::{FailureKind, FetchError, FetchedPage};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Executable names searched for when no explicit browser path is configured.
const BROWSER_CANDIDATES: &[&str] = &["chrome", "google-chrome", "chromium", "chromium-browser"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Explicit executable; wins over every search.
    pub executable: Option<PathBuf>,
    /// Bundled browser directories searched ahead of `PATH`.
    pub search_dirs: Vec<PathBuf>,
    pub headless: bool,
    pub no_sandbox: bool,
    pub extra_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            search_dirs: vec![PathBuf::from("chrome").join("chrome-linux64")],
            headless: true,
            no_sandbox: true,
            extra_args: vec!["--disable-dev-shm-usage".to_string()],
        }
    }
}

/// Resolve the browser binary: explicit path, then the bundled directories
/// prepended to `PATH`. `None` leaves detection to chromiumoxide.
pub fn locate_browser(settings: &BrowserSettings) -> Option<PathBuf> {
    if let Some(explicit) = &settings.executable {
        return Some(explicit.clone());
    }
    let search_path = augmented_path(&settings.search_dirs)?;
    let cwd = std::env::current_dir().ok()?;
    BROWSER_CANDIDATES
        .iter()
        .find_map(|name| which::which_in(name, Some(&search_path), &cwd).ok())
}

fn augmented_path(dirs: &[PathBuf]) -> Option<OsString> {
    let inherited = std::env::var_os("PATH").unwrap_or_default();
    let mut entries: Vec<PathBuf> = dirs.to_vec();
    entries.extend(std::env::split_paths(&inherited));
    std::env::join_paths(entries).ok()
}

fn browser_error(err: CdpError) -> FetchError {
    match err {
        CdpError::Timeout => FetchError::new(FailureKind::Timeout, err.to_string()),
        other => FetchError::new(FailureKind::Browser, other.to_string()),
    }
}

pub struct BrowserFetcher {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    content_selectors: Vec<String>,
    timing: Timing,
    // Removed when the fetcher drops.
    _profile: TempDir,
}

impl BrowserFetcher {
    pub async fn launch(
        settings: &BrowserSettings,
        content_selectors: Vec<String>,
        timing: Timing,
    ) -> Result<Self, FetchError> {
        let profile = TempDir::with_prefix("markdown-dl-profile-")
            .map_err(|err| FetchError::new(FailureKind::Browser, err.to_string()))?;

        let mut builder = BrowserConfig::builder()
            .request_timeout(timing.navigation_timeout)
            .user_data_dir(profile.path());
        if !settings.headless {
            builder = builder.with_head();
        }
        if settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        for arg in &settings.extra_args {
            builder = builder.arg(arg.clone());
        }
        if let Some(executable) = locate_browser(settings) {
            engine_debug!("Using browser executable {:?}", executable);
            builder = builder.chrome_executable(executable);
        }
        let config = builder
            .build()
            .map_err(|msg| FetchError::new(FailureKind::Browser, msg))?;

        let (mut browser, mut events) = Browser::launch(config).await.map_err(browser_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(err) = event {
                    engine_debug!("browser event error: {}", err);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(browser_error(err));
            }
        };

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
            content_selectors,
            timing,
            _profile: profile,
        })
    }
}

/// Looks up the first element matching a selector on a live page.
#[async_trait::async_trait]
trait ContentLookup: Send + Sync {
    /// `None` while no element matches; otherwise its inner HTML, empty when
    /// the element cannot be read.
    async fn lookup_inner_html(&self, selector: &str) -> Option<String>;
}

#[async_trait::async_trait]
impl ContentLookup for Page {
    async fn lookup_inner_html(&self, selector: &str) -> Option<String> {
        let element = self.find_element(selector).await.ok()?;
        Some(element.inner_html().await.ok().flatten().unwrap_or_default())
    }
}

/// Polls each selector in priority order for up to `wait`. Returns the first
/// one whose element is present with non-blank inner HTML; a
/// present-but-empty element moves on to the next selector.
async fn wait_for_content<'a>(
    page: &dyn ContentLookup,
    selectors: &'a [String],
    wait: Duration,
) -> Option<&'a str> {
    for selector in selectors {
        let deadline = Instant::now() + wait;
        loop {
            if let Some(inner) = page.lookup_inner_html(selector).await {
                if !inner.trim().is_empty() {
                    return Some(selector.as_str());
                }
                break;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL.min(deadline - now)).await;
        }
    }
    None
}

#[async_trait::async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        url::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        match tokio::time::timeout(self.timing.navigation_timeout, self.page.goto(url)).await {
            Err(_) => {
                return Err(FetchError::new(
                    FailureKind::Timeout,
                    format!("navigation exceeded {:?}", self.timing.navigation_timeout),
                ))
            }
            Ok(Err(err)) => return Err(FetchError::new(FailureKind::Navigation, err.to_string())),
            Ok(Ok(_)) => {}
        }

        tokio::time::sleep(self.timing.settle).await;

        let ready = wait_for_content(
            &self.page,
            &self.content_selectors,
            self.timing.selector_wait,
        )
        .await;
        match ready {
            Some(selector) => engine_debug!("{}: content ready at {:?}", url, selector),
            None => engine_debug!("{}: no content selector appeared", url),
        }

        let html = self.page.content().await.map_err(browser_error)?;
        let final_url = self
            .page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        Ok(FetchedPage {
            requested_url: url.to_string(),
            final_url,
            html,
        })
    }

    async fn shutdown(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(err) = browser.close().await {
            engine_warn!("Failed to close browser: {}", err);
        }
        let _ = browser.wait().await;
        self.handler.abort();
    }
}

/// Launches one [`BrowserFetcher`] per worker.
#[derive(Debug, Clone)]
pub struct BrowserFetcherFactory {
    settings: BrowserSettings,
    content_selectors: Vec<String>,
    timing: Timing,
}

impl BrowserFetcherFactory {
    pub fn new(settings: BrowserSettings, content_selectors: Vec<String>, timing: Timing) -> Self {
        Self {
            settings,
            content_selectors,
            timing,
        }
    }
}

#[async_trait::async_trait]
impl FetcherFactory for BrowserFetcherFactory {
    async fn create(&self, worker_id: usize) -> Result<Box<dyn Fetcher>, FetchError> {
        engine_debug!("worker {} launching browser", worker_id);
        let fetcher = BrowserFetcher::launch(
            &self.settings,
            self.content_selectors.clone(),
            self.timing.clone(),
        )
        .await?;
        Ok(Box::new(fetcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    /// Selector -> (lookups before the element appears, its inner HTML).
    struct ScriptedPage {
        elements: HashMap<String, (usize, String)>,
        lookups: StdMutex<HashMap<String, usize>>,
    }

    impl ScriptedPage {
        fn new(elements: &[(&str, usize, &str)]) -> Self {
            Self {
                elements: elements
                    .iter()
                    .map(|(sel, after, inner)| (sel.to_string(), (*after, inner.to_string())))
                    .collect(),
                lookups: StdMutex::new(HashMap::new()),
            }
        }

        fn lookups(&self, selector: &str) -> usize {
            self.lookups
                .lock()
                .unwrap()
                .get(selector)
                .copied()
                .unwrap_or(0)
        }
    }

    #[async_trait::async_trait]
    impl ContentLookup for ScriptedPage {
        async fn lookup_inner_html(&self, selector: &str) -> Option<String> {
            let seen = {
                let mut lookups = self.lookups.lock().unwrap();
                let count = lookups.entry(selector.to_string()).or_insert(0);
                *count += 1;
                *count
            };
            let (after, inner) = self.elements.get(selector)?;
            (seen > *after).then(|| inner.clone())
        }
    }

    fn selectors(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn first_present_selector_stops_the_wait() {
        let page = ScriptedPage::new(&[("#content", 0, "<p>a</p>"), ("article", 0, "<p>b</p>")]);
        let order = selectors(&["#content", "article"]);

        let ready = wait_for_content(&page, &order, Duration::from_secs(5)).await;

        assert_eq!(ready, Some("#content"));
        assert_eq!(page.lookups("#content"), 1);
        assert_eq!(page.lookups("article"), 0);
    }

    #[tokio::test]
    async fn empty_element_moves_on_without_waiting() {
        let page = ScriptedPage::new(&[("#content", 0, "  \n "), ("article", 0, "<p>b</p>")]);
        let order = selectors(&["#content", "article"]);
        let started = Instant::now();

        let ready = wait_for_content(&page, &order, Duration::from_secs(5)).await;

        assert_eq!(ready, Some("article"));
        assert_eq!(page.lookups("#content"), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn late_element_is_picked_up_by_polling() {
        let page = ScriptedPage::new(&[("main", 2, "<p>late</p>")]);
        let order = selectors(&["main"]);

        let ready = wait_for_content(&page, &order, Duration::from_secs(5)).await;

        assert_eq!(ready, Some("main"));
        assert_eq!(page.lookups("main"), 3);
    }

    #[tokio::test]
    async fn absent_selectors_each_get_their_own_bounded_wait() {
        let page = ScriptedPage::new(&[]);
        let order = selectors(&["#content", "article"]);
        let wait = Duration::from_millis(60);
        let started = Instant::now();

        let ready = wait_for_content(&page, &order, wait).await;

        assert_eq!(ready, None);
        assert!(started.elapsed() >= wait * 2);
        assert!(page.lookups("#content") >= 2);
        assert!(page.lookups("article") >= 2);
    }

    #[test]
    fn explicit_executable_wins() {
        let settings = BrowserSettings {
            executable: Some(PathBuf::from("/opt/chrome/chrome")),
            ..BrowserSettings::default()
        };
        assert_eq!(
            locate_browser(&settings),
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn bundled_dirs_come_first_on_the_search_path() {
        let dirs = vec![PathBuf::from("/bundle/a"), PathBuf::from("/bundle/b")];
        let joined = augmented_path(&dirs).unwrap();
        let entries: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(&entries[..2], &dirs[..]);
    }

    #[test]
    fn default_settings_match_container_friendly_flags() {
        let settings = BrowserSettings::default();
        assert!(settings.headless);
        assert!(settings.no_sandbox);
        assert!(settings
            .extra_args
            .iter()
            .any(|arg| arg == "--disable-dev-shm-usage"));
    }
}
