//! Final validation of a complete model response.
//!
//! Runs once, after the token source has ended, over the full accumulated
//! text. Whatever the model produced, a usable [`DecodedStory`] comes out as
//! long as there is any text at all.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event::DecodedStory;

/// Suggestions offered when the model's own could not be recovered.
pub const DEFAULT_SUGGESTIONS: [&str; 5] = [
    "Continue with the next dramatic moment",
    "Introduce a new character or element",
    "Explore the character's thoughts and feelings",
    "Add a plot twist or unexpected development",
    "Move to a different location or time",
];

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*").expect("code fence pattern is valid"));

/// The JSON object the story prompts ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoryPayload {
    /// The story text.
    pub content: String,
    /// Directions the writer could take next.
    pub suggestions: Vec<String>,
}

/// Remove every markdown fence marker (optionally tagged `json`) together
/// with the whitespace after it, then trim.
///
/// ```rust
/// use storyweave_decoder::validate::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```\n"), "{\"a\":1}");
/// ```
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_owned()
}

/// Parse fence-stripped text as a [`StoryPayload`] with non-empty content.
pub fn parse_payload(cleaned: &str) -> Option<StoryPayload> {
    match serde_json::from_str::<StoryPayload>(cleaned) {
        Ok(payload) if !payload.content.is_empty() => Some(payload),
        Ok(_) => {
            warn!("story payload has empty content");
            None
        }
        Err(err) => {
            warn!(error = %err, "story payload did not match the expected shape");
            None
        }
    }
}

/// Best-effort result for a complete response; `None` only when no text is
/// left after stripping fences.
pub fn recover(raw: &str) -> Option<DecodedStory> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return None;
    }

    let story = match parse_payload(&cleaned) {
        Some(StoryPayload {
            content,
            suggestions,
        }) => DecodedStory::new(content, suggestions),
        None => {
            warn!(
                preview = %cleaned.chars().take(100).collect::<String>(),
                "falling back to plain text with default suggestions"
            );
            DecodedStory::new(cleaned, default_suggestions())
        }
    };
    Some(story)
}

pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}
