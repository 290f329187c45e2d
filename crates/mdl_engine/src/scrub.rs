use regex::Regex;
use serde::Deserialize;

/// One post-conversion cleanup rule, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum ScrubRule {
    /// Replace every occurrence of `find` verbatim.
    Literal { find: String, replace: String },
    /// Replace every regex match; `replace` may use `$1`-style captures.
    Pattern { regex: String, replace: String },
}

impl ScrubRule {
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        ScrubRule::Literal {
            find: find.into(),
            replace: replace.into(),
        }
    }

    pub fn pattern(regex: impl Into<String>, replace: impl Into<String>) -> Self {
        ScrubRule::Pattern {
            regex: regex.into(),
            replace: replace.into(),
        }
    }
}

/// Rules applied when none are configured: drop the stray "copy" label that
/// code-block copy buttons leave between paragraphs.
pub fn default_scrub_rules() -> Vec<ScrubRule> {
    vec![ScrubRule::literal("\n\ncopy\n\n", "\n\n")]
}

#[derive(Debug, thiserror::Error)]
#[error("invalid scrub pattern {pattern:?}: {source}")]
pub struct ScrubError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Clone)]
enum CompiledRule {
    Literal { find: String, replace: String },
    Pattern { regex: Regex, replace: String },
}

/// Ordered, compiled scrub rules.
#[derive(Debug, Clone, Default)]
pub struct Scrubber {
    rules: Vec<CompiledRule>,
}

impl Scrubber {
    pub fn new(rules: &[ScrubRule]) -> Result<Self, ScrubError> {
        let rules = rules
            .iter()
            .filter_map(|rule| match rule {
                // An empty needle would splice `replace` between every char.
                ScrubRule::Literal { find, .. } if find.is_empty() => None,
                ScrubRule::Literal { find, replace } => Some(Ok(CompiledRule::Literal {
                    find: find.clone(),
                    replace: replace.clone(),
                })),
                ScrubRule::Pattern { regex, replace } => Some(
                    Regex::new(regex)
                        .map(|compiled| CompiledRule::Pattern {
                            regex: compiled,
                            replace: replace.clone(),
                        })
                        .map_err(|source| ScrubError {
                            pattern: regex.clone(),
                            source,
                        }),
                ),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| match rule {
                CompiledRule::Literal { find, replace } => acc.replace(find.as_str(), replace),
                CompiledRule::Pattern { regex, replace } => {
                    regex.replace_all(&acc, replace.as_str()).into_owned()
                }
            })
    }
}
