//! Classification oracles
//!
//! The core treats a classifier as an opaque dependency: it hands over a word
//! and gets back a free-form label for the token it is about to create.

/// Label for a whitelisted query
pub const VALID_QUERY: &str = "valid query";
/// Label for a query outside the whitelist
pub const INVALID_QUERY: &str = "invalid query";

/// Queries the demo whitelist resolves
pub const DEFAULT_WHITELIST: &[&str] = &[
    "東京駅",
    "東京",
    "東",
    "とうきょうえき",
    "とうきょうえ",
    "とうきょう",
    "とうき",
    "とう",
    "と",
];

/// Word -> token label
pub trait Classifier: std::fmt::Debug {
    fn classify(&self, word: &str) -> String;

    /// Whether a token carrying this label resolves to something.
    /// Unresolvable tokens are created with `disabled = true`.
    fn is_resolvable(&self, _label: &str) -> bool {
        true
    }
}

/// Labels every word as `text is {word}` (space-split editor)
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceSplitLabel;

impl Classifier for SpaceSplitLabel {
    fn classify(&self, word: &str) -> String {
        format!("text is {}", word)
    }
}

/// Valid/invalid labels against a fixed whitelist
#[derive(Debug, Clone)]
pub struct WhitelistClassifier {
    entries: Vec<String>,
}

impl Default for WhitelistClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_WHITELIST.iter().copied())
    }
}

impl WhitelistClassifier {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.iter().any(|e| e == word)
    }
}

impl Classifier for WhitelistClassifier {
    fn classify(&self, word: &str) -> String {
        if self.contains(word) {
            VALID_QUERY.to_string()
        } else {
            INVALID_QUERY.to_string()
        }
    }

    fn is_resolvable(&self, label: &str) -> bool {
        label != INVALID_QUERY
    }
}
