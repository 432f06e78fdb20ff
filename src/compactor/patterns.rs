//! Markdown pattern matching used by the compactor
//!
//! Every extractor here is line- or token-level and purely lexical. Regex
//! classes such as `[A-Z]` are ASCII; `\s` and `\b` follow Unicode rules.

use once_cell::sync::Lazy;
use regex::Regex;

/// `^#+\s+(.+)$` per line: one or more `#`, whitespace, then the header text
static HEADER_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s+(.+)$").expect("valid header regex"));

/// `^#+\s` per line: a header marker followed by whitespace
static HEADER_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s").expect("valid header line regex"));

/// `^\s*[-*+]\s` per line: optional indentation, a list marker, whitespace
static BULLET_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-*+]\s").expect("valid bullet regex"));

/// `[[Target]]` or `[[Target|Alias]]`; group 1 is the target
static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]+)?\]\]").expect("valid wiki link regex"));

/// `#` followed by an ASCII letter, then letters, digits, `_` or `-`
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[a-zA-Z][a-zA-Z0-9_-]*").expect("valid tag regex"));

/// Two or more whitespace-separated capitalized words between word boundaries
static CAPITALIZED_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("valid capitalized phrase regex")
});

/// Characters stripped from text before splitting it into words
const MARKDOWN_PUNCTUATION: [char; 7] = ['#', '[', ']', '`', '*', '_', '~'];

const CODE_FENCE: &str = "```";

/// Text of every header line, in document order
pub fn header_texts(content: &str) -> Vec<&str> {
    HEADER_TEXT_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Split text into words after blanking markdown emphasis, heading, link and
/// code punctuation
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || MARKDOWN_PUNCTUATION.contains(&c))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Targets of wiki links, without any alias
pub fn wiki_link_targets(content: &str) -> Vec<&str> {
    WIKI_LINK_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Hashtags including the leading `#`
pub fn tags(content: &str) -> Vec<&str> {
    TAG_RE.find_iter(content).map(|m| m.as_str()).collect()
}

/// Runs of two or more capitalized words, verbatim.
///
/// Word boundaries are Unicode-aware: a word running into a non-ASCII letter
/// (`Dupré`) is not cut short, so the phrase is skipped.
pub fn capitalized_phrases(content: &str) -> Vec<&str> {
    CAPITALIZED_PHRASE_RE
        .find_iter(content)
        .map(|m| m.as_str())
        .collect()
}

/// Number of sentence fragments: text between runs of `.`, `!` or `?` that is
/// not blank
pub fn sentence_count(content: &str) -> usize {
    content
        .split(|c: char| matches!(c, '.' | '!' | '?'))
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
}

pub fn bullet_line_count(content: &str) -> usize {
    BULLET_LINE_RE.find_iter(content).count()
}

pub fn header_line_count(content: &str) -> usize {
    HEADER_LINE_RE.find_iter(content).count()
}

/// Non-overlapping occurrences of a triple backtick
pub fn code_fence_count(content: &str) -> usize {
    content.matches(CODE_FENCE).count()
}
