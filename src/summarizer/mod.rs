//! Extractive summarization by word frequency.
//!
//! Sentences are scored by summing how often each of their content words occurs
//! in the whole document; the best ones are returned in document order.

pub mod sentence;
pub mod stopwords;
pub mod tokenizer;

use std::{collections::HashMap, sync::Arc};

use crate::error::{DigestError, DigestResult};

pub use sentence::{split_sentences, Sentence};
pub use stopwords::StopwordSet;
pub use tokenizer::{AsciiWordTokenizer, Tokenizer};

pub const DEFAULT_MAX_SENTENCES: usize = 5;

/// Per-document counts of content words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(word, count)| (word.as_str(), *count))
    }
}

#[derive(Clone)]
pub struct Summarizer {
    tokenizer: Arc<dyn Tokenizer>,
    stopwords: Arc<StopwordSet>,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Summarizer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, stopwords: Arc<StopwordSet>) -> Self {
        Self {
            tokenizer,
            stopwords,
        }
    }

    pub fn english() -> Self {
        Self::new(
            Arc::new(AsciiWordTokenizer::default()),
            StopwordSet::english(),
        )
    }

    /// Pick at most `max_sentences` sentences of `text`, keeping document order.
    ///
    /// Text that already has no more than `max_sentences` sentences is returned
    /// byte-for-byte. `max_sentences` of zero is treated as one.
    pub fn summarize(&self, text: &str, max_sentences: usize) -> DigestResult<String> {
        if text.trim().is_empty() {
            return Err(DigestError::invalid_input("text to summarize is empty"));
        }

        let max_sentences = max_sentences.max(1);
        let sentences = split_sentences(text);
        if sentences.len() <= max_sentences {
            return Ok(text.to_string());
        }

        let table = self.frequency_table(text);
        let mut scored: Vec<(u64, Sentence<'_>)> = sentences
            .into_iter()
            .map(|sentence| (self.score(sentence.text, &table), sentence))
            .collect();

        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score.cmp(a_score).then(a.position.cmp(&b.position))
        });
        scored.truncate(max_sentences);
        scored.sort_by_key(|(_, sentence)| sentence.position);

        tracing::trace!(
            selected = scored.len(),
            vocabulary = table.len(),
            "sentences selected"
        );

        Ok(scored
            .iter()
            .map(|(_, sentence)| sentence.text.trim())
            .collect::<Vec<_>>()
            .join(" "))
    }

    pub fn frequency_table(&self, text: &str) -> FrequencyTable {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for word in self.tokenizer.tokenize(text) {
            if self.stopwords.contains(&word) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
        FrequencyTable { counts }
    }

    pub fn score(&self, sentence: &str, table: &FrequencyTable) -> u64 {
        self.tokenizer
            .tokenize(sentence)
            .iter()
            .map(|word| table.count(word))
            .sum()
    }
}

/// Summarize with the English stopword list and the default tokenizer.
pub fn summarize(text: &str, max_sentences: usize) -> DigestResult<String> {
    Summarizer::english().summarize(text, max_sentences)
}
