/// Turns text into the word tokens used for frequency counting and scoring.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Lowercases the input and keeps maximal runs of ASCII letters.
///
/// A run is delimited by anything that is not an ASCII word character, so
/// `cats2` or `snake_case` are dropped whole instead of yielding `cats` or
/// `snake`. Runs shorter than `min_len` are dropped as well.
#[derive(Debug, Clone, Copy)]
pub struct AsciiWordTokenizer {
    pub min_len: usize,
}

impl Default for AsciiWordTokenizer {
    fn default() -> Self {
        Self { min_len: 3 }
    }
}

impl Tokenizer for AsciiWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        lower
            .split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
            .filter(|run| run.len() >= self.min_len && run.bytes().all(|b| b.is_ascii_lowercase()))
            .map(str::to_string)
            .collect()
    }
}
