//! Text processing shared by index construction and querying.
//!
//! Steps run in the order listed in [`PIPELINE`]; the names are stored in
//! the index artifact so a loader can refuse an index built differently.

use rust_stemmers::{Algorithm, Stemmer};

/// Step names, in execution order.
pub const PIPELINE: [&str; 3] = ["trimmer", "stopWordFilter", "stemmer"];

/// English stop words, sorted for binary search.
pub const STOP_WORDS: &[&str] = &[
    "a", "able", "about", "across", "after", "all", "almost", "also", "am", "among", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "but", "by", "can", "cannot", "could",
    "dear", "did", "do", "does", "either", "else", "ever", "every", "for", "from", "get", "got",
    "had", "has", "have", "he", "her", "hers", "him", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "just", "least", "let", "like", "likely", "may", "me", "might",
    "most", "must", "my", "neither", "no", "nor", "not", "of", "off", "often", "on", "only", "or",
    "other", "our", "own", "rather", "said", "say", "says", "she", "should", "since", "so",
    "some", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "tis", "to", "too", "twas", "us", "wants", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "yet", "you", "your",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Tokenizer + filters + Snowball English stemmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPipeline {
    /// Tokens with fewer chars are dropped before stemming.
    pub min_token_len: usize,
}

impl Default for TextPipeline {
    fn default() -> Self {
        Self { min_token_len: 2 }
    }
}

impl TextPipeline {
    pub const fn new(min_token_len: usize) -> Self {
        Self { min_token_len }
    }

    /// Step names of this pipeline, as stored in the index.
    pub fn names() -> Vec<String> {
        PIPELINE.iter().map(|s| s.to_string()).collect()
    }

    /// Run `text` through every step, keeping token order and duplicates.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let stemmer = Stemmer::create(Algorithm::English);
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|raw| !raw.is_empty())
            .map(str::to_lowercase)
            .filter(|t| t.chars().count() >= self.min_token_len && !is_stop_word(t))
            .map(|t| stemmer.stem(&t).into_owned())
            .collect()
    }
}
