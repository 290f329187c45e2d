use url::Url;

/// Drops the `#fragment` part of a URL.
///
/// Parseable URLs go through [`Url`] so the result is serialized the same way
/// as every other link the crawler produces; anything else is split on the
/// first `#`.
pub fn strip_fragment(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => url.split('#').next().unwrap_or(url).to_string(),
    }
}

/// Crawl filter: plain string prefix on the absolute URL. An empty prefix
/// matches nothing, so a blank `--crawl-prefix` cannot turn into "follow
/// every link on the web".
pub fn matches_prefix(url: &str, prefix: &str) -> bool {
    !prefix.is_empty() && url.starts_with(prefix)
}
