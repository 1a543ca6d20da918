use regex::Regex;
use std::sync::LazyLock;

// Punctuation-only boundaries. Abbreviations ("Dr."), decimals ("3.5") and
// quoted speech are split too; this is accepted.
#[allow(clippy::expect_used)]
static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid regex"));

/// A slice of the source text ending in one or more of `.`, `!`, `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Untrimmed text, including leading whitespace and the terminator run.
    pub text: &'a str,
    pub position: usize,
}

/// Split `text` into terminated sentences in document order.
///
/// An unterminated tail after the last terminator is dropped. Text without any
/// terminator comes back as a single sentence covering all of it.
pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences: Vec<Sentence<'_>> = SENTENCE_RE
        .find_iter(text)
        .enumerate()
        .map(|(position, m)| Sentence {
            text: m.as_str(),
            position,
        })
        .collect();

    if sentences.is_empty() {
        sentences.push(Sentence { text, position: 0 });
    }

    sentences
}
