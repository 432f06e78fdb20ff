//! Frequency counting with first-seen tie-breaking

use indexmap::IndexMap;

/// Occurrence counts that remember the order terms were first seen
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: IndexMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: impl Into<String>) {
        *self.counts.entry(term.into()).or_insert(0) += 1;
    }

    pub fn count(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Terms seen at least `min_count` times, most frequent first, at most `limit`.
    ///
    /// Equal counts keep first-seen order.
    pub fn ranked(&self, min_count: usize, limit: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .counts
            .iter()
            .filter(|(_, &count)| count >= min_count)
            .map(|(term, &count)| (term.clone(), count))
            .collect();

        // stable sort keeps insertion order among equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }

    /// Like [`ranked`](Self::ranked) but without the counts
    pub fn top_terms(&self, min_count: usize, limit: usize) -> Vec<String> {
        self.ranked(min_count, limit)
            .into_iter()
            .map(|(term, _)| term)
            .collect()
    }
}
