//! Word list and prefix lookup.

use smol_str::SmolStr;

/// Words offered when no dictionary is configured.
pub const DEFAULT_WORDS: &[&str] = &[
    "donkey", "dolphin", "dog", "zebra", "snake", "snail", "sparrow", "spider", "shark", "lion",
    "lobster", "lizard", "lama", "locust",
];

/// Anything that can produce completion candidates for a prefix.
pub trait SuggestionSource {
    /// Candidates for `prefix`, best first.
    fn suggest(&self, prefix: &str) -> Vec<String>;
}

/// A fixed, ordered word list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<SmolStr>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}

impl Dictionary {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn words(&self) -> &[SmolStr] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SuggestionSource for Dictionary {
    /// Every word longer than `prefix` that starts with it, ignoring case,
    /// in dictionary order.
    fn suggest(&self, prefix: &str) -> Vec<String> {
        let prefix_len = prefix.chars().count();
        let prefix = prefix.to_lowercase();
        self.words
            .iter()
            .filter(|w| w.chars().count() > prefix_len && w.to_lowercase().starts_with(&prefix))
            .map(|w| w.to_string())
            .collect()
    }
}
