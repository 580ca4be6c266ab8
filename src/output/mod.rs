// Output formatting: terminal display of analysis results.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and never panics on multi-byte characters such as Devanagari or emoji.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// File name for a company's narration audio, e.g. `tesla_motors_analysis.mp3`.
pub fn audio_file_name(company: &str) -> String {
    let stem: String = crate::db::company_key(company)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_analysis.mp3")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_file_name_is_filesystem_safe() {
        assert_eq!(audio_file_name(" Tesla Motors "), "tesla_motors_analysis.mp3");
        assert_eq!(audio_file_name("AT&T"), "at_t_analysis.mp3");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("नमस्ते", 20), "नमस्ते");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
    }
}
