//! Assembly of the compacted context string and budget truncation

use super::folders::leading_count;
use indexmap::IndexMap;
use std::fmt::Write;

/// Approximate characters per token used for budgeting
pub const CHARS_PER_TOKEN: usize = 4;

/// Topics and terms listed in the compacted context
pub const CONTEXT_LIST_LIMIT: usize = 15;

/// Folders listed in the compacted context
pub const CONTEXT_FOLDER_LIMIT: usize = 10;

/// Marker appended to truncated context
pub const TRUNCATION_MARKER: &str = "...";

/// Character budget for a token budget
pub fn char_budget(max_tokens: usize) -> usize {
    max_tokens.saturating_mul(CHARS_PER_TOKEN)
}

/// Build the multi-line context block and fit it into `max_tokens`
pub fn assemble_context(
    note_count: usize,
    topics: &[String],
    terminology: &[String],
    writing_style: &str,
    folder_summary: &IndexMap<String, String>,
    max_tokens: usize,
) -> String {
    let mut context = String::new();

    // writing into a String cannot fail
    let _ = writeln!(context, "VAULT CONTEXT ({} notes):", note_count);
    let _ = writeln!(context, "Topics: {}", head(topics, CONTEXT_LIST_LIMIT));
    let _ = writeln!(context, "Terms: {}", head(terminology, CONTEXT_LIST_LIMIT));
    let _ = writeln!(context, "Style: {}", writing_style);

    let mut folders: Vec<(&String, &String)> = folder_summary.iter().collect();
    folders.sort_by(|a, b| leading_count(b.1).cmp(&leading_count(a.1)));
    folders.truncate(CONTEXT_FOLDER_LIMIT);

    if !folders.is_empty() {
        context.push_str("Folders:\n");
        for (folder, description) in folders {
            let _ = writeln!(context, "  - {}: {}", folder, description);
        }
    }

    truncate_to_budget(&context, char_budget(max_tokens))
        .trim()
        .to_string()
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut
pub fn truncate_to_budget(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let marker_len = TRUNCATION_MARKER.len();
    if max_chars < marker_len {
        return text.chars().take(max_chars).collect();
    }

    let mut truncated: String = text.chars().take(max_chars - marker_len).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

fn head(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_layout() {
        let mut folders = IndexMap::new();
        folders.insert("Root".to_string(), "3 notes about apollo".to_string());
        folders.insert("Projects".to_string(), "1 notes".to_string());

        let context = assemble_context(
            4,
            &strings(&["apollo", "launch"]),
            &strings(&["#space"]),
            "8 words/sentence avg, concise sentences",
            &folders,
            2000,
        );

        assert_eq!(
            context,
            "VAULT CONTEXT (4 notes):\n\
             Topics: apollo, launch\n\
             Terms: #space\n\
             Style: 8 words/sentence avg, concise sentences\n\
             Folders:\n  \
             - Root: 3 notes about apollo\n  \
             - Projects: 1 notes"
        );
    }

    #[test]
    fn test_no_folder_block_without_folders() {
        let context = assemble_context(0, &[], &[], "No notes to analyze", &IndexMap::new(), 2000);
        assert_eq!(
            context,
            "VAULT CONTEXT (0 notes):\nTopics: \nTerms: \nStyle: No notes to analyze"
        );
    }

    #[test]
    fn test_folders_sorted_by_count_and_limited() {
        let mut folders = IndexMap::new();
        for i in 0..12 {
            folders.insert(format!("F{}", i), format!("{} notes", i + 1));
        }
        let context = assemble_context(0, &[], &[], "s", &folders, 2000);
        let listed: Vec<&str> = context.lines().filter(|l| l.starts_with("  - ")).collect();

        assert_eq!(listed.len(), 10);
        assert_eq!(listed[0], "  - F11: 12 notes");
        assert_eq!(listed[9], "  - F2: 3 notes");
    }

    #[test]
    fn test_lists_limited_to_fifteen() {
        let topics: Vec<String> = (0..30).map(|i| format!("t{}", i)).collect();
        let context = assemble_context(0, &topics, &[], "s", &IndexMap::new(), 2000);
        let line = context.lines().find(|l| l.starts_with("Topics: ")).unwrap();
        assert_eq!(line.split(", ").count(), 15);
        assert!(line.ends_with("t14"));
    }

    #[test]
    fn test_truncate_to_budget() {
        let text = "x".repeat(80);
        let truncated = truncate_to_budget(&text, 40);
        assert_eq!(truncated.chars().count(), 40);
        assert!(truncated.ends_with("..."));
        assert_eq!(&truncated[..37], &text[..37]);
    }

    #[test]
    fn test_truncate_within_budget_untouched() {
        assert_eq!(truncate_to_budget("short", 40), "short");
        assert_eq!(truncate_to_budget(&"y".repeat(40), 40), "y".repeat(40));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "é".repeat(10);
        let truncated = truncate_to_budget(&text, 8);
        assert_eq!(truncated, "ééééé...");
    }

    #[test]
    fn test_truncate_tiny_budget() {
        assert_eq!(truncate_to_budget("abcdef", 2), "ab");
    }

    #[test]
    fn test_assembled_context_respects_budget() {
        let topics: Vec<String> = (0..15).map(|i| format!("topic{}", i)).collect();
        let context = assemble_context(99, &topics, &topics, "style", &IndexMap::new(), 10);
        assert_eq!(context.chars().count(), 40);
        assert!(context.ends_with("..."));
        assert!(context.starts_with("VAULT CONTEXT (99 notes):"));
    }
}
