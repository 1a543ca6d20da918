use std::{
    collections::HashSet,
    sync::{Arc, LazyLock},
};

const ENGLISH: &[&str] = &[
    "the", "and", "for", "that", "with", "you", "this", "have", "but", "not", "are", "from", "they",
    "his", "her", "she", "which", "will", "one", "all", "their", "has", "more", "was", "can",
    "what", "when", "there", "were", "been", "its", "had", "out", "who", "may",
];

static ENGLISH_SET: LazyLock<Arc<StopwordSet>> =
    LazyLock::new(|| Arc::new(StopwordSet::from_words(ENGLISH.iter().copied())));

/// Words that never count towards a sentence score. Stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// Process-wide English list, built on first use and shared read-only.
    pub fn english() -> Arc<StopwordSet> {
        Arc::clone(&ENGLISH_SET)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
