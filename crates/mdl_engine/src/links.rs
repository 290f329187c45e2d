use std::collections::BTreeSet;

use mdl_core::{matches_prefix, strip_fragment};
use scraper::{Html, Selector};
use url::Url;

/// Finds follow-on URLs on a loaded page for crawl mode.
#[derive(Debug, Clone)]
pub struct LinkHarvester {
    prefix: String,
}

impl LinkHarvester {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Absolute, fragment-free targets of every `<a href>` on the page that
    /// start with the crawl prefix. Relative hrefs resolve against the
    /// document's `<base href>` when present, else against `page_url`; if
    /// neither parses, only already-absolute hrefs survive.
    pub fn extract_links(&self, html: &str, page_url: &str) -> BTreeSet<String> {
        let Ok(anchor) = Selector::parse("a[href]") else {
            return BTreeSet::new();
        };
        let document = Html::parse_document(html);
        let base = document_base(&document, page_url);

        document
            .select(&anchor)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve_url(href, base.as_ref()))
            .map(String::from)
            .filter(|absolute| matches_prefix(absolute, &self.prefix))
            .map(|absolute| strip_fragment(&absolute))
            .collect()
    }
}

/// The first `<base href>` wins, itself resolved against the page URL.
fn document_base(document: &Html, page_url: &str) -> Option<Url> {
    let page = Url::parse(page_url).ok();
    let declared = Selector::parse("base[href]").ok().and_then(|sel| {
        document
            .select(&sel)
            .next()
            .and_then(|base| base.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .and_then(|href| match &page {
                Some(page) => page.join(href).ok(),
                None => Url::parse(href).ok(),
            })
    });
    declared.or(page)
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}
