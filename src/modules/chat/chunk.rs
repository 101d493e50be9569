// src/modules/chat/chunk.rs
// Decoding of streamed completion chunks: only choices[0].delta.content matters

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Parses one serialized chunk. `Ok(None)` covers keep-alives, role-only
/// deltas and empty strings; `Err` means the chunk was not valid JSON of the
/// expected shape.
pub fn parse_delta(chunk: &str) -> Result<Option<String>, serde_json::Error> {
    let parsed: CompletionChunk = serde_json::from_str(chunk)?;

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_delta() {
        let chunk = r#"{"id":"c1","choices":[{"index":0,"delta":{"role":"assistant","content":"Hel"}}]}"#;
        assert_eq!(parse_delta(chunk).unwrap().as_deref(), Some("Hel"));
    }

    #[test]
    fn test_deltas_without_text() {
        assert_eq!(parse_delta(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap(), None);
        assert_eq!(parse_delta(r#"{"choices":[{"delta":{"content":""}}]}"#).unwrap(), None);
        assert_eq!(parse_delta(r#"{"choices":[{"delta":{"content":null}}]}"#).unwrap(), None);
        assert_eq!(parse_delta(r#"{"choices":[]}"#).unwrap(), None);
        assert_eq!(parse_delta(r#"{"choices":[{"finish_reason":"stop"}]}"#).unwrap(), None);
    }

    #[test]
    fn test_only_first_choice_counts() {
        let chunk = r#"{"choices":[{"delta":{"content":"a"}},{"delta":{"content":"b"}}]}"#;
        assert_eq!(parse_delta(chunk).unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_malformed_chunk_is_an_error() {
        assert!(parse_delta("{not json").is_err());
        assert!(parse_delta(r#"{"choices":[{"delta":{"content":5}}]}"#).is_err());
    }

    #[test]
    fn test_whitespace_delta_is_kept_verbatim() {
        assert_eq!(parse_delta(r#"{"choices":[{"delta":{"content":" \n"}}]}"#).unwrap().as_deref(), Some(" \n"));
    }
}
