//! Derives a download filename from the generation prompt.

use chrono::Utc;

/// Maximum length of the prompt-derived stem, before the extension.
const MAX_STEM_LENGTH: usize = 50;

/// Suggested filename for a saved result: the prompt lowercased, stripped
/// of punctuation, whitespace collapsed to single hyphens, truncated to 50
/// characters, with a `.jpg` extension. Prompts that are empty fall back to
/// a timestamp-based name.
pub fn suggested_filename(prompt: &str) -> String {
    if prompt.is_empty() {
        return format!("lumen-image-{}.jpg", Utc::now().timestamp_millis());
    }

    let cleaned: String = prompt
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let stem: String = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_STEM_LENGTH)
        .collect();

    format!("{}.jpg", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_slugified() {
        assert_eq!(
            suggested_filename("A Fox! In the SNOW."),
            "a-fox-in-the-snow.jpg"
        );
    }

    #[test]
    fn whitespace_runs_collapse_to_single_hyphens() {
        assert_eq!(suggested_filename("red   fox\tjumping"), "red-fox-jumping.jpg");
    }

    #[test]
    fn stem_is_truncated_before_extension() {
        let prompt = "x".repeat(80);
        let name = suggested_filename(&prompt);
        assert_eq!(name.len(), MAX_STEM_LENGTH + 4);
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn empty_prompt_falls_back_to_timestamp_name() {
        let name = suggested_filename("");
        assert!(name.starts_with("lumen-image-"));
        assert!(name.ends_with(".jpg"));
    }
}
