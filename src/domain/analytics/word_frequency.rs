//! Word frequency table for free-text answers.

use std::collections::HashMap;

use super::summary::WordWeight;

/// Maximum number of words returned.
pub const MAX_WORDS: usize = 50;

/// Words shorter than this are ignored.
pub const MIN_WORD_LENGTH: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "and", "but", "for", "with", "are", "was", "were", "been", "have", "has", "had",
    "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "this",
    "that", "these", "those", "you", "she", "they", "him", "her", "them", "your", "his", "its",
    "our", "their", "very", "really", "quite", "just", "only", "also", "too", "when", "where",
    "why", "how", "what", "who", "which", "there", "here", "now", "then", "than", "more", "most",
    "some", "any", "all", "both", "each", "every", "not", "yes",
];

/// Counts words across `texts`.
///
/// A word is a run of at least three ASCII letters bounded by non-word
/// characters, compared case-insensitively. Stop words are dropped. The
/// result holds at most [`MAX_WORDS`] entries, most frequent first, ties in
/// alphabetical order.
pub fn word_frequency<S: AsRef<str>>(texts: &[S]) -> Vec<WordWeight> {
    let mut counts: HashMap<String, u32> = HashMap::new();

    for text in texts {
        for token in text
            .as_ref()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        {
            if token.len() < MIN_WORD_LENGTH || !token.chars().all(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            let word = token.to_ascii_lowercase();
            if STOP_WORDS.contains(&word.as_str()) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut words: Vec<WordWeight> = counts
        .into_iter()
        .map(|(text, weight)| WordWeight { text, weight })
        .collect();
    words.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.text.cmp(&b.text)));
    words.truncate(MAX_WORDS);
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(words: &[WordWeight]) -> Vec<(&str, u32)> {
        words.iter().map(|w| (w.text.as_str(), w.weight)).collect()
    }

    #[test]
    fn counts_case_insensitively_and_drops_stop_words() {
        let texts = ["Great course, GREAT teacher", "The labs were great"];
        let words = word_frequency(&texts);
        assert_eq!(
            weights(&words),
            vec![("great", 3), ("course", 1), ("labs", 1), ("teacher", 1)]
        );
    }

    #[test]
    fn ignores_short_words_and_mixed_tokens() {
        let texts = ["ok go lab2 fun"];
        let words = word_frequency(&texts);
        assert_eq!(weights(&words), vec![("fun", 1)]);
    }

    #[test]
    fn caps_the_table() {
        let text: Vec<String> = (0..60u8)
            .map(|i| format!("w{}{}", (b'a' + i / 26) as char, (b'a' + i % 26) as char))
            .collect();
        let words = word_frequency(&[text.join(" ")]);
        assert_eq!(words.len(), MAX_WORDS);
        assert_eq!(words[0].text, "waa");
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let texts: [&str; 0] = [];
        assert!(word_frequency(&texts).is_empty());
    }
}
