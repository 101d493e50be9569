// src/modules/chat/references.rs
//! File-name extraction from finished assistant replies.
//!
//! This is a heuristic. Any dotted run of text matches, so abbreviations
//! ("e.g.") and version numbers ("v1.2") come back as references too, and the
//! names are never checked against the assistant's real file list.

use regex::Regex;
use std::sync::LazyLock;

use super::state::Reference;

/// Anything without a colon or newline, then a dot and an alphanumeric extension.
static FILE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^:\n]+\.[a-zA-Z0-9]+").expect("file name pattern is valid")
});

pub fn extract_references(content: &str) -> Vec<Reference> {
    FILE_NAME_PATTERN
        .find_iter(content)
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .map(Reference::named)
        .collect()
}

/// Whether `reference` points at `file_name`. Matches whole names and
/// references that end with the file name after a separator, since the
/// pattern above happily swallows the words leading up to a file name.
pub fn references_file(reference: &Reference, file_name: &str) -> bool {
    if file_name.is_empty() {
        return false;
    }
    if reference.name == file_name {
        return true;
    }
    match reference.name.strip_suffix(file_name) {
        Some(prefix) => prefix.ends_with(|c: char| c.is_whitespace() || "/\\(\"'`*".contains(c)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streamed_reply_yields_file_token() {
        let refs = extract_references("Hello, see notes.txt");
        assert_eq!(refs.len(), 1);
        assert!(refs[0].name.ends_with("notes.txt"));
        assert!(refs[0].url.is_none());
        assert!(references_file(&refs[0], "notes.txt"));
    }

    #[test]
    fn test_one_reference_per_line() {
        let content = "Sources:\nsyllabus.pdf\n  calendar 2024.xlsx  \nno file here";
        let names: Vec<String> = extract_references(content).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["syllabus.pdf", "calendar 2024.xlsx"]);
    }

    #[test]
    fn test_colon_splits_candidates() {
        let names: Vec<String> = extract_references("File: report.docx")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["report.docx"]);
    }

    #[test]
    fn test_plain_text_has_no_references() {
        assert!(extract_references("nothing to see here").is_empty());
        assert!(extract_references("").is_empty());
    }

    #[test]
    fn test_known_false_positives() {
        assert!(!extract_references("upgrade to v1.2 soon").is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "Check notes.txt and plan.md:\nthen e.g. readme.rst";
        assert_eq!(extract_references(text), extract_references(text));
    }

    #[test]
    fn test_references_file_requires_separator() {
        let reference = Reference::named("mynotes.txt");
        assert!(!references_file(&reference, "notes.txt"));
        assert!(references_file(&Reference::named("see (notes.txt"), "notes.txt"));
        assert!(!references_file(&reference, ""));
    }
}
