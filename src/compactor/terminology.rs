//! Terminology extraction: wiki links, tags and capitalized phrases

use super::frequency::FrequencyTable;
use super::patterns::{capitalized_phrases, tags, wiki_link_targets};
use crate::scanner::ScannedNote;

pub const MIN_TERM_FREQUENCY: usize = 2;

pub const MAX_TERMS: usize = 30;

/// Count wiki links (as `[[Target]]`), tags and capitalized phrases across
/// `notes` in one shared table
pub fn term_frequencies<'a>(notes: impl IntoIterator<Item = &'a ScannedNote>) -> FrequencyTable {
    let mut table = FrequencyTable::new();

    for note in notes {
        for target in wiki_link_targets(&note.content) {
            table.add(format!("[[{}]]", target));
        }
        for tag in tags(&note.content) {
            table.add(tag);
        }
        for phrase in capitalized_phrases(&note.content) {
            table.add(phrase);
        }
    }

    table
}

/// Recurring terms, most frequent first
pub fn extract_terminology<'a>(notes: impl IntoIterator<Item = &'a ScannedNote>) -> Vec<String> {
    term_frequencies(notes).top_terms(MIN_TERM_FREQUENCY, MAX_TERMS)
}
