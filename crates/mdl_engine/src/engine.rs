use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use tokio::task::JoinSet;

use crate::browser::BrowserFetcherFactory;
use crate::config::{Backend, EngineConfig};
use crate::convert::{Converter, Html2MdConverter};
use crate::extract::{Extractor, SelectorError, SelectorExtractor};
use crate::fetch::{Fetcher, FetcherFactory, HttpFetcherFactory};
use crate::frontier::Frontier;
use crate::links::LinkHarvester;
use crate::persist::{ensure_output_dir, MarkdownWriter, PersistError, WriteOutcome};
use crate::scrub::{ScrubError, Scrubber};
use crate::{FetchedPage, JobOutcome, RunSummary};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Scrub(#[from] ScrubError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// The per-URL stages that run after a fetch: extract, convert, write, and
/// in crawl mode harvest links.
pub struct Pipeline {
    extractor: Box<dyn Extractor>,
    converter: Box<dyn Converter>,
    writer: MarkdownWriter,
    harvester: Option<LinkHarvester>,
    jitter_max: Duration,
}

impl Pipeline {
    pub fn new(
        extractor: Box<dyn Extractor>,
        converter: Box<dyn Converter>,
        writer: MarkdownWriter,
    ) -> Self {
        Self {
            extractor,
            converter,
            writer,
            harvester: None,
            jitter_max: Duration::ZERO,
        }
    }

    pub fn with_harvester(mut self, harvester: Option<LinkHarvester>) -> Self {
        self.harvester = harvester;
        self
    }

    pub fn with_jitter(mut self, jitter_max: Duration) -> Self {
        self.jitter_max = jitter_max;
        self
    }

    async fn jitter(&self) {
        if self.jitter_max.is_zero() {
            return;
        }
        tokio::time::sleep(self.jitter_max.mul_f64(fastrand::f64())).await;
    }

    fn enqueue_links(&self, page: &FetchedPage, frontier: &Frontier) -> usize {
        let Some(harvester) = &self.harvester else {
            return 0;
        };
        let links = harvester.extract_links(&page.html, &page.final_url);
        engine_info!("Found {} links under {}", links.len(), harvester.prefix());
        links
            .iter()
            .filter(|link| {
                let added = frontier.enqueue(link);
                if added {
                    engine_info!("Added to queue: {}", link);
                }
                added
            })
            .count()
    }
}

/// Runs a fixed pool of workers over a shared [`Frontier`] until it drains.
pub struct Dispatcher {
    frontier: Arc<Frontier>,
    factory: Arc<dyn FetcherFactory>,
    pipeline: Arc<Pipeline>,
    workers: usize,
    dequeue_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        frontier: Arc<Frontier>,
        factory: Arc<dyn FetcherFactory>,
        pipeline: Pipeline,
        workers: usize,
        dequeue_timeout: Duration,
    ) -> Self {
        Self {
            frontier,
            factory,
            pipeline: Arc::new(pipeline),
            workers,
            dequeue_timeout,
        }
    }

    /// Validates selectors, scrub rules and the output directory, then wires
    /// the fetcher backend named in `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        if config.workers == 0 {
            return Err(EngineError::NoWorkers);
        }
        let extractor = SelectorExtractor::new(&config.content_selectors)?;
        let scrubber = Scrubber::new(&config.scrub_rules)?;
        ensure_output_dir(&config.output_dir)?;

        let harvester = config
            .crawl_prefix
            .as_deref()
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .map(LinkHarvester::new);

        let pipeline = Pipeline::new(
            Box::new(extractor),
            Box::new(Html2MdConverter::new(scrubber)),
            MarkdownWriter::new(config.output_dir.clone()),
        )
        .with_harvester(harvester)
        .with_jitter(config.timing.jitter_max);

        let factory: Arc<dyn FetcherFactory> = match config.backend {
            Backend::Browser => Arc::new(BrowserFetcherFactory::new(
                config.browser.clone(),
                config.content_selectors.clone(),
                config.timing.clone(),
            )),
            Backend::Http => Arc::new(HttpFetcherFactory::new(config.http.clone())),
        };

        Ok(Self::new(
            Arc::new(Frontier::new()),
            factory,
            pipeline,
            config.workers,
            config.timing.dequeue_timeout,
        ))
    }

    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    /// Spawns the workers and waits for every one of them to exit.
    pub async fn run(&self) -> RunSummary {
        let mut tasks = JoinSet::new();
        for worker_id in 0..self.workers {
            tasks.spawn(run_worker(
                worker_id,
                self.frontier.clone(),
                self.factory.clone(),
                self.pipeline.clone(),
                self.dequeue_timeout,
            ));
        }

        let mut summary = RunSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(worker_summary) => summary.merge(&worker_summary),
                Err(err) => engine_error!("Worker task failed: {}", err),
            }
        }
        summary.processed = self.frontier.processed_len();
        summary.queued = self.frontier.queued_len();
        summary
    }
}

async fn run_worker(
    worker_id: usize,
    frontier: Arc<Frontier>,
    factory: Arc<dyn FetcherFactory>,
    pipeline: Arc<Pipeline>,
    dequeue_timeout: Duration,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let fetcher = match factory.create(worker_id).await {
        Ok(fetcher) => fetcher,
        Err(err) => {
            engine_error!("Worker {} could not start its fetcher: {}", worker_id, err);
            return summary;
        }
    };
    summary.workers_started = 1;

    while let Some(url) = frontier.dequeue(dequeue_timeout).await {
        let outcome = process_url(&url, fetcher.as_ref(), &frontier, &pipeline).await;
        summary.record(&outcome);
    }
    engine_debug!("Worker {}: queue is empty, exiting", worker_id);

    fetcher.shutdown().await;
    summary
}

/// One job: claim, skip if already on disk, fetch, extract, convert, write,
/// then enqueue discovered links. Every failure is logged and turned into an
/// outcome; nothing here stops the worker.
pub async fn process_url(
    url: &str,
    fetcher: &dyn Fetcher,
    frontier: &Frontier,
    pipeline: &Pipeline,
) -> JobOutcome {
    if !frontier.claim(url) {
        engine_debug!("Already processed: {}", url);
        return JobOutcome::AlreadyProcessed;
    }
    engine_info!("Processing: {}", url);

    if pipeline.writer.exists(url) {
        let target = pipeline.writer.target_path(url);
        engine_info!("File {} already exists. Skipping.", target.display());
        return JobOutcome::AlreadyOnDisk(target);
    }

    pipeline.jitter().await;
    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(err) => {
            engine_warn!("Error processing {}: {}", url, err);
            return JobOutcome::Failed(err);
        }
    };

    let extracted = pipeline.extractor.extract(&page.html);
    if extracted.matched_selector.is_none() {
        engine_info!("{}: No content found with selectors, using page body", url);
    }
    let markdown = pipeline.converter.to_markdown(&extracted.content_html);
    if markdown.trim().is_empty() {
        engine_warn!("Failed to retrieve content for {}", url);
        return JobOutcome::Empty;
    }

    let path = match pipeline.writer.write(url, &markdown) {
        Ok(WriteOutcome::Written(path)) => path,
        Ok(WriteOutcome::Skipped(path)) => {
            engine_info!("File {} appeared meanwhile. Skipping.", path.display());
            return JobOutcome::AlreadyOnDisk(path);
        }
        Err(err) => {
            engine_error!("Failed to write {}: {}", url, err);
            return JobOutcome::WriteFailed(err.to_string());
        }
    };
    match &extracted.title {
        Some(title) => engine_info!("Saved {} ({:?}) to {}", url, title, path.display()),
        None => engine_info!("Saved {} to {}", url, path.display()),
    }

    let links_enqueued = pipeline.enqueue_links(&page, frontier);
    JobOutcome::Saved {
        path,
        links_enqueued,
    }
}
