//! Transcript normalization: lowercase word tokens, sentences and cleaned text

/// A transcript split into the forms the analyzers consume.
///
/// Construction never fails. An empty or whitespace-only transcript yields
/// no words, no sentences and a word count of zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedText {
    original: String,
    clean: String,
    words: Vec<String>,
    sentences: Vec<String>,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let clean = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        Self {
            original: text.to_string(),
            clean,
            words: tokenize(text),
            sentences: split_sentences(text),
        }
    }

    /// The transcript exactly as received
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercase transcript with whitespace runs collapsed to single spaces
    pub fn clean(&self) -> &str {
        &self.clean
    }

    /// Lowercase word tokens in order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Trimmed sentences in order
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of distinct word tokens
    pub fn unique_word_count(&self) -> usize {
        self.words
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    /// Word index of the first occurrence of `phrase` as a contiguous token sequence
    pub fn find_phrase(&self, phrase: &str) -> Option<usize> {
        self.phrase_positions(phrase).into_iter().next()
    }

    /// Word indices of every occurrence of `phrase` (overlapping allowed)
    pub fn phrase_positions(&self, phrase: &str) -> Vec<usize> {
        let needle = tokenize(phrase);
        if needle.is_empty() || needle.len() > self.words.len() {
            return Vec::new();
        }
        self.words
            .windows(needle.len())
            .enumerate()
            .filter(|(_, window)| *window == needle.as_slice())
            .map(|(i, _)| i)
            .collect()
    }

    /// Count non-overlapping occurrences of `phrase` as a token sequence
    pub fn count_phrase(&self, phrase: &str) -> usize {
        count_sequence(&self.words, &tokenize(phrase))
    }

    /// Case-insensitive substring match over the cleaned text
    pub fn contains_substring(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        !needle.is_empty() && self.clean.contains(&needle)
    }
}

/// Count non-overlapping occurrences of `needle` in `words`, scanning left to right
pub fn count_sequence<S: AsRef<str>>(words: &[S], needle: &[String]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let matches_at = |i: usize| {
        words[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(w, n)| w.as_ref() == n)
    };
    let mut count = 0;
    let mut i = 0;
    while i + needle.len() <= words.len() {
        if matches_at(i) {
            count += 1;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    count
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Split into lowercase tokens: runs of alphanumerics, keeping apostrophes
/// that sit between two word characters ("I'm" -> "i'm").
pub fn tokenize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if is_apostrophe(c)
            && !current.is_empty()
            && chars.peek().is_some_and(|next| next.is_alphanumeric())
        {
            current.push('\'');
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn split_sentences(text: &str) -> Vec<String> {
    text.split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}
