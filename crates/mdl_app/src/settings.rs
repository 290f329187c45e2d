use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mdl_engine::{EngineConfig, ScrubRule};
use serde::Deserialize;

use crate::cli::{BackendArg, Cli};

/// Contents of the `--config` RON file. Every field is optional; command-line
/// flags win over the file, and the file wins over built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub workers: Option<usize>,
    pub backend: Option<BackendArg>,
    pub crawl_prefix: Option<String>,
    pub content_selectors: Option<Vec<String>>,
    pub scrub_rules: Option<Vec<ScrubRule>>,
    pub timing: TimingFile,
    pub browser: BrowserFile,
    pub http: HttpFile,
}

/// Durations in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingFile {
    pub jitter_max_ms: Option<u64>,
    pub settle_ms: Option<u64>,
    pub selector_wait_ms: Option<u64>,
    pub navigation_timeout_ms: Option<u64>,
    pub dequeue_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserFile {
    pub executable: Option<PathBuf>,
    pub search_dirs: Option<Vec<PathBuf>>,
    pub headless: Option<bool>,
    pub no_sandbox: Option<bool>,
    pub extra_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpFile {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub redirect_limit: Option<usize>,
    pub max_bytes: Option<u64>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(content)?)
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn set_ms(slot: &mut Duration, value: Option<u64>) {
    set(slot, value.map(Duration::from_millis));
}

/// Layer the file and then the command line over the engine defaults.
pub fn resolve(cli: &Cli, file: FileConfig) -> EngineConfig {
    let mut config = EngineConfig::default();

    set(&mut config.output_dir, file.output_dir);
    set(&mut config.workers, file.workers);
    set(&mut config.backend, file.backend.map(Into::into));
    if file.crawl_prefix.is_some() {
        config.crawl_prefix = file.crawl_prefix;
    }
    set(&mut config.content_selectors, file.content_selectors);
    set(&mut config.scrub_rules, file.scrub_rules);

    let timing = &mut config.timing;
    set_ms(&mut timing.jitter_max, file.timing.jitter_max_ms);
    set_ms(&mut timing.settle, file.timing.settle_ms);
    set_ms(&mut timing.selector_wait, file.timing.selector_wait_ms);
    set_ms(&mut timing.navigation_timeout, file.timing.navigation_timeout_ms);
    set_ms(&mut timing.dequeue_timeout, file.timing.dequeue_timeout_ms);

    let browser = &mut config.browser;
    if file.browser.executable.is_some() {
        browser.executable = file.browser.executable;
    }
    set(&mut browser.search_dirs, file.browser.search_dirs);
    set(&mut browser.headless, file.browser.headless);
    set(&mut browser.no_sandbox, file.browser.no_sandbox);
    set(&mut browser.extra_args, file.browser.extra_args);

    let http = &mut config.http;
    set_ms(&mut http.connect_timeout, file.http.connect_timeout_ms);
    set_ms(&mut http.request_timeout, file.http.request_timeout_ms);
    set(&mut http.redirect_limit, file.http.redirect_limit);
    set(&mut http.max_bytes, file.http.max_bytes);
    if file.http.user_agent.is_some() {
        http.user_agent = file.http.user_agent;
    }

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    set(&mut config.workers, cli.workers);
    set(&mut config.backend, cli.backend.map(Into::into));
    if cli.crawl_prefix.is_some() {
        config.crawl_prefix = cli.crawl_prefix.clone();
    }
    if cli.browser.is_some() {
        config.browser.executable = cli.browser.clone();
    }
    if cli.headful {
        config.browser.headless = false;
    }

    config
}
