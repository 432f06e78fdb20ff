//! Writing-style heuristics

use super::patterns::{
    bullet_line_count, code_fence_count, header_line_count, sentence_count, tokenize,
};
use crate::scanner::ScannedNote;

/// Style string used when there is nothing to analyze
pub const NO_NOTES_STYLE: &str = "No notes to analyze";

/// Aggregate style measurements over a set of notes
#[derive(Debug, Clone, PartialEq)]
pub struct StyleProfile {
    pub note_count: usize,
    pub sentences: usize,
    pub words: usize,
    pub bullets: usize,
    pub headers: usize,
    /// Fence count halved; fractional when a fence is unbalanced
    pub code_blocks: f64,
}

impl StyleProfile {
    pub fn measure(notes: &[ScannedNote]) -> Self {
        let mut profile = Self {
            note_count: notes.len(),
            sentences: 0,
            words: 0,
            bullets: 0,
            headers: 0,
            code_blocks: 0.0,
        };

        for note in notes {
            profile.sentences += sentence_count(&note.content);
            profile.words += tokenize(&note.content).len();
            profile.bullets += bullet_line_count(&note.content);
            profile.headers += header_line_count(&note.content);
            profile.code_blocks += code_fence_count(&note.content) as f64 / 2.0;
        }

        profile
    }

    /// Rounded average words per sentence, 0 without sentences
    pub fn avg_words_per_sentence(&self) -> u64 {
        rounded_ratio(self.words, self.sentences)
    }

    pub fn avg_bullets_per_note(&self) -> u64 {
        rounded_ratio(self.bullets, self.note_count)
    }

    pub fn avg_headers_per_note(&self) -> u64 {
        rounded_ratio(self.headers, self.note_count)
    }

    /// Descriptive phrases in fixed order: sentence length, bullets, headers, code
    pub fn descriptors(&self) -> Vec<&'static str> {
        let mut descriptors = Vec::new();

        let avg_words = self.avg_words_per_sentence();
        descriptors.push(if avg_words < 12 {
            "concise sentences"
        } else if avg_words > 20 {
            "detailed sentences"
        } else {
            "moderate sentence length"
        });

        let avg_bullets = self.avg_bullets_per_note();
        if avg_bullets > 5 {
            descriptors.push("heavy use of bullet points");
        } else if avg_bullets > 0 {
            descriptors.push("occasional bullet points");
        }

        if self.avg_headers_per_note() > 3 {
            descriptors.push("well-structured with headers");
        }

        if self.code_blocks > self.note_count as f64 * 0.1 {
            descriptors.push("includes code blocks");
        }

        descriptors
    }

    /// One-line description, e.g. `"9 words/sentence avg, concise sentences"`
    pub fn describe(&self) -> String {
        if self.note_count == 0 {
            return NO_NOTES_STYLE.to_string();
        }
        format!(
            "{} words/sentence avg, {}",
            self.avg_words_per_sentence(),
            self.descriptors().join(", ")
        )
    }
}

/// Describe the writing style of `notes`
pub fn analyze_writing_style(notes: &[ScannedNote]) -> String {
    StyleProfile::measure(notes).describe()
}

fn rounded_ratio(numerator: usize, denominator: usize) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as u64
}
