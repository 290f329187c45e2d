use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

/// Download web pages as Markdown, optionally crawling links under a prefix.
#[derive(Debug, Parser)]
#[command(name = "markdown-dl", version, about)]
pub struct Cli {
    /// Newline-delimited list of URLs to download.
    #[arg(default_value = "urls.txt")]
    pub urls_file: PathBuf,

    /// Follow links whose absolute URL starts with this prefix.
    #[arg(long)]
    pub crawl_prefix: Option<String>,

    /// Number of workers, each with its own browser.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Directory receiving the `.md` files.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// RON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How pages are fetched.
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Chrome/Chromium executable to launch.
    #[arg(long)]
    pub browser: Option<PathBuf>,

    /// Show the browser window instead of running headless.
    #[arg(long)]
    pub headful: bool,

    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendArg {
    Browser,
    Http,
}

impl From<BackendArg> for mdl_engine::Backend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Browser => mdl_engine::Backend::Browser,
            BackendArg::Http => mdl_engine::Backend::Http,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn urls_file_defaults_to_urls_txt() {
        let cli = Cli::parse_from(["markdown-dl"]);
        assert_eq!(cli.urls_file, PathBuf::from("urls.txt"));
        assert_eq!(cli.crawl_prefix, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn crawl_prefix_and_backend_parse() {
        let cli = Cli::parse_from([
            "markdown-dl",
            "seeds.txt",
            "--crawl-prefix",
            "https://docs.example.com/",
            "--backend",
            "http",
            "-w",
            "2",
        ]);
        assert_eq!(cli.urls_file, PathBuf::from("seeds.txt"));
        assert_eq!(cli.crawl_prefix.as_deref(), Some("https://docs.example.com/"));
        assert_eq!(cli.backend, Some(BackendArg::Http));
        assert_eq!(cli.workers, Some(2));
    }
}
