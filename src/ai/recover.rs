//! Best-effort recovery of a JSON payload embedded in free-text model output.
//!
//! Vision models rarely return bare JSON even when told to: the object is
//! usually wrapped in prose, a fenced code block, or both. Recovery precedence:
//!
//! 1. Content between the first ```json fence and the next ``` fence.
//! 2. The greedy span from the first `{` to the last `}`.
//! 3. The raw text unchanged — downstream JSON parsing then reports the error.
//!
//! Stage 2 is knowingly fooled by multiple JSON objects or stray braces in
//! the same response; callers must treat the result as a candidate, not a
//! guarantee.

use std::sync::LazyLock;

use regex::Regex;

static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fenced block regex"));

static BRACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("brace span regex"));

/// Locate the JSON object substring in a raw model response.
pub fn recover_json(text: &str) -> &str {
    if let Some(found) = FENCED.captures(text).and_then(|c| c.get(1)) {
        return found.as_str();
    }
    if let Some(found) = BRACED.find(text) {
        return found.as_str();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_selected() {
        let text = "Sure, here you go:\n```json\n{\"patient_name\": \"Jane Doe\"}\n```\nDone.";
        assert_eq!(recover_json(text), "{\"patient_name\": \"Jane Doe\"}");
    }

    #[test]
    fn fenced_block_wins_over_bare_braces() {
        let text = "{\"decoy\": 1}\n```json\n{\"real\": 2}\n```";
        assert_eq!(recover_json(text), "{\"real\": 2}");
    }

    #[test]
    fn first_fenced_block_wins_over_later_ones() {
        let text = "```json\n{\"a\": 1}\n```\ntext\n```json\n{\"b\": 2}\n```";
        assert_eq!(recover_json(text), "{\"a\": 1}");
    }

    #[test]
    fn bare_braces_fallback() {
        let text = "The patient record is {\"patient_age\": 41} as requested.";
        assert_eq!(recover_json(text), "{\"patient_age\": 41}");
    }

    #[test]
    fn bare_braces_are_greedy_across_multiple_objects() {
        // Known limitation: the greedy span swallows both objects.
        let text = "{\"a\": 1} and {\"b\": 2}";
        assert_eq!(recover_json(text), "{\"a\": 1} and {\"b\": 2}");
    }

    #[test]
    fn nested_braces_kept_whole() {
        let text = "result: {\"medicines\": [{\"medicine_name\": \"Metformin\"}]}";
        assert_eq!(
            recover_json(text),
            "{\"medicines\": [{\"medicine_name\": \"Metformin\"}]}"
        );
    }

    #[test]
    fn no_json_returns_raw_text() {
        let text = "I could not read the image, sorry.";
        assert_eq!(recover_json(text), text);
        // Downstream parsing fails with a parse error, not a crash
        assert!(serde_json::from_str::<serde_json::Value>(recover_json(text)).is_err());
    }

    #[test]
    fn unclosed_fence_falls_back_to_braces() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(recover_json(text), "{\"a\": 1}");
    }
}
