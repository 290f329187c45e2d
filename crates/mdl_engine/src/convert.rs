use crate::scrub::Scrubber;

pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// `html2md` keeps both `[text](href)` links and `![alt](src)` images; the
/// scrubber then strips site boilerplate from the Markdown.
#[derive(Debug, Default, Clone)]
pub struct Html2MdConverter {
    scrubber: Scrubber,
}

impl Html2MdConverter {
    pub fn new(scrubber: Scrubber) -> Self {
        Self { scrubber }
    }
}

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        self.scrubber.apply(&html2md::parse_html(html))
    }
}
