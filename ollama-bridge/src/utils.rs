// ollama-bridge/src/utils.rs
//! Small helpers shared by the provider code.

/// Longest request/response body written to debug logs.
pub const LOG_BODY_MAX_CHARS: usize = 2000;

/// Truncates to at most `max_chars` characters, marking the cut with `...`.
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    if max_chars < 3 {
        return input.chars().take(max_chars).collect();
    }
    let kept: String = input.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

/// Truncation used for bodies in log lines.
pub fn for_log(body: &str) -> String {
    truncate_string(body, LOG_BODY_MAX_CHARS)
}
