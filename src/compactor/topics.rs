//! Topic extraction: frequent meaningful words from headers and bodies

use super::frequency::FrequencyTable;
use super::patterns::{header_texts, tokenize};
use super::stopwords::is_stopword;
use crate::scanner::ScannedNote;

/// Words shorter than this are never topics
pub const MIN_TOPIC_LENGTH: usize = 3;

/// A word must appear this often to count as a topic
pub const MIN_TOPIC_FREQUENCY: usize = 3;

pub const MAX_TOPICS: usize = 30;

/// Count candidate topic words across `notes`.
///
/// Header text is counted in addition to the body it also appears in, so
/// words in headers weigh double.
pub fn topic_frequencies<'a>(notes: impl IntoIterator<Item = &'a ScannedNote>) -> FrequencyTable {
    let mut table = FrequencyTable::new();

    for note in notes {
        let text = format!("{} {}", header_texts(&note.content).join(" "), note.content);
        for word in tokenize(&text) {
            let lower = word.to_lowercase();
            if lower.chars().count() < MIN_TOPIC_LENGTH || is_stopword(&lower) {
                continue;
            }
            table.add(lower);
        }
    }

    table
}

/// Most frequent topic words, most frequent first
pub fn extract_topics<'a>(notes: impl IntoIterator<Item = &'a ScannedNote>) -> Vec<String> {
    topic_frequencies(notes).top_terms(MIN_TOPIC_FREQUENCY, MAX_TOPICS)
}
