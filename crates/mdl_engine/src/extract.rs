use scraper::{Html, Selector};

/// Selectors tried, in order, to find the article region of a page.
pub const DEFAULT_CONTENT_SELECTORS: &[&str] = &[
    "#content",
    "article",
    "main",
    ".article-content",
    ".post-content",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: Option<String>,
    pub content_html: String,
    /// `None` when no selector matched and the body was used.
    pub matched_selector: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid content selector {selector:?}: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> ExtractedContent;
}

/// Reader-mode extractor driven by a priority-ordered selector list.
///
/// For each selector only the first matching element is considered; the
/// first one with non-blank inner HTML wins. Falls back to `<body>`, then to
/// the whole document.
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    rules: Vec<(String, Selector)>,
}

impl SelectorExtractor {
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Result<Self, SelectorError> {
        let rules = selectors
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Selector::parse(raw)
                    .map(|sel| (raw.to_string(), sel))
                    .map_err(|err| SelectorError {
                        selector: raw.to_string(),
                        message: err.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }
}

impl Default for SelectorExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_SELECTORS).expect("built-in selectors parse")
    }
}

impl Extractor for SelectorExtractor {
    fn extract(&self, html: &str) -> ExtractedContent {
        let doc = Html::parse_document(html);

        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| {
                doc.select(&sel)
                    .next()
                    .map(|t| t.text().collect::<String>().trim().to_string())
            })
            .filter(|t| !t.is_empty());

        for (raw, sel) in &self.rules {
            if let Some(node) = doc.select(sel).next() {
                let inner = node.inner_html();
                if !inner.trim().is_empty() {
                    return ExtractedContent {
                        title,
                        content_html: inner,
                        matched_selector: Some(raw.clone()),
                    };
                }
            }
        }

        ExtractedContent {
            title,
            content_html: extract_body(&doc),
            matched_selector: None,
        }
    }
}

fn extract_body(doc: &Html) -> String {
    if let Ok(sel) = Selector::parse("body") {
        if let Some(node) = doc.select(&sel).next() {
            return node.inner_html();
        }
    }
    doc.root_element().html()
}
