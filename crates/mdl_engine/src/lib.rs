//! markdown-dl engine: fetching, extraction, conversion, persistence and the
//! worker pool that drives them.
mod browser;
mod config;
mod convert;
mod decode;
mod engine;
mod extract;
mod fetch;
mod filename;
mod frontier;
mod links;
mod persist;
mod scrub;
mod types;

pub use browser::{locate_browser, BrowserFetcher, BrowserFetcherFactory, BrowserSettings};
pub use config::{default_output_dir, Backend, EngineConfig, Timing, DEFAULT_WORKERS};
pub use convert::{Converter, Html2MdConverter};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use engine::{process_url, Dispatcher, EngineError, Pipeline};
pub use extract::{
    ExtractedContent, Extractor, SelectorError, SelectorExtractor, DEFAULT_CONTENT_SELECTORS,
};
pub use fetch::{FetchSettings, Fetcher, FetcherFactory, HttpFetcher, HttpFetcherFactory};
pub use filename::{url_to_filename, OUTPUT_EXTENSION};
pub use frontier::Frontier;
pub use links::LinkHarvester;
pub use persist::{ensure_output_dir, AtomicFileWriter, MarkdownWriter, PersistError, WriteOutcome};
pub use scrub::{default_scrub_rules, ScrubError, ScrubRule, Scrubber};
pub use types::{FailureKind, FetchError, FetchedPage, JobOutcome, RunSummary};
