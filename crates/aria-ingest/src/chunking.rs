//! Sentence-based chunking with word overlap between neighbours.
//!
//! Sentences are packed into chunks of at most `max_words` words. Every chunk
//! after the first is prefixed with the tail of the previous chunk so that
//! context spanning a boundary stays retrievable.

use once_cell::sync::Lazy;
use regex::Regex;

use aria_core::Chunk;

/// Words carried over from the previous chunk.
pub const OVERLAP_WORDS: usize = 25;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.?!]\s+").unwrap());

/// Split `text` into overlapping chunks tagged with `source`.
///
/// A sentence longer than `max_words` is kept whole as its own chunk.
pub fn chunk_text(text: &str, source: &str, max_words: usize) -> Vec<Chunk> {
    let mut bodies: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut word_count = 0usize;

    for sentence in split_sentences(text) {
        let words = sentence.split_whitespace().count();
        if word_count + words > max_words && !current.is_empty() {
            bodies.push(current.join(" ").trim().to_string());
            current.clear();
            word_count = 0;
        }
        current.push(sentence);
        word_count += words;
    }

    if !current.is_empty() {
        bodies.push(current.join(" ").trim().to_string());
    }

    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let text = if i == 0 {
                body.clone()
            } else {
                format!("{} {}", tail_words(&bodies[i - 1], OVERLAP_WORDS), body)
            };
            Chunk::new(text, source)
        })
        .collect()
}

/// Split on `.`, `?` or `!` followed by whitespace. Punctuation stays with its
/// sentence; blank pieces are dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        // The terminator is a single ASCII byte.
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn tail_words(text: &str, n: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let skip = words.len().saturating_sub(n);
    words[skip..].join(" ")
}
