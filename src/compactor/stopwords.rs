//! Common English function words ignored by topic extraction

use once_cell::sync::Lazy;
use std::collections::HashSet;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by", "from", "as", "is", "was", "are", "were", "been",
    "be", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "shall", "can", "need",
    "that", "this", "these", "those", "it", "its", "i", "you", "he",
    "she", "we", "they", "what", "which", "who", "whom", "how", "when",
    "where", "why", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same",
    "so", "than", "too", "very", "just", "also", "now", "here", "there",
    "then", "if", "because", "about", "into", "through", "during", "before",
    "after", "above", "below", "between", "under", "again", "further",
    "once", "any", "your", "my", "his", "her", "their", "our",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Whether a lower-cased word is a stop word
pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}
