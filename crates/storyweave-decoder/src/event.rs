use serde::{Deserialize, Serialize};

/// One event of a decoding session, serialised with a `type` tag:
///
/// ```json
/// {"type":"content","content":"Once upon a"}
/// {"type":"generating_suggestions"}
/// {"type":"suggestion","suggestion":"Meet a fox","suggestionIndex":0}
/// {"type":"complete","content":"...","suggestions":["..."],"wordCount":42}
/// {"type":"error","error":"Failed to generate story"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoryEvent {
    /// Cumulative decoded story text.
    Content { content: String },
    /// The story text is complete; suggestions follow.
    GeneratingSuggestions,
    /// One closed element of the suggestions array.
    Suggestion {
        suggestion: String,
        #[serde(rename = "suggestionIndex")]
        suggestion_index: usize,
    },
    /// Terminal: the validated result.
    Complete(DecodedStory),
    /// Terminal: the token source failed.
    Error { error: String },
}

impl StoryEvent {
    pub fn content(content: impl Into<String>) -> Self {
        StoryEvent::Content {
            content: content.into(),
        }
    }

    pub fn suggestion(suggestion: impl Into<String>, suggestion_index: usize) -> Self {
        StoryEvent::Suggestion {
            suggestion: suggestion.into(),
            suggestion_index,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        StoryEvent::Error {
            error: error.into(),
        }
    }

    /// `complete` and `error` end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StoryEvent::Complete(_) | StoryEvent::Error { .. })
    }
}

/// The final result of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedStory {
    pub content: String,
    pub suggestions: Vec<String>,
    pub word_count: usize,
}

impl DecodedStory {
    pub fn new(content: impl Into<String>, suggestions: Vec<String>) -> Self {
        let content = content.into();
        Self {
            word_count: word_count(&content),
            content,
            suggestions,
        }
    }
}

/// Number of whitespace-delimited tokens in `text`.
///
/// ```rust
/// assert_eq!(storyweave_decoder::word_count("Once upon a time"), 4);
/// assert_eq!(storyweave_decoder::word_count("  spaced\n\tout  "), 2);
/// ```
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialise_with_type_tag() {
        let cases = [
            (
                StoryEvent::content("Once"),
                json!({ "type": "content", "content": "Once" }),
            ),
            (
                StoryEvent::GeneratingSuggestions,
                json!({ "type": "generating_suggestions" }),
            ),
            (
                StoryEvent::suggestion("Run away", 1),
                json!({ "type": "suggestion", "suggestion": "Run away", "suggestionIndex": 1 }),
            ),
            (
                StoryEvent::Complete(DecodedStory::new("Once upon a time", vec!["Go".into()])),
                json!({
                    "type": "complete",
                    "content": "Once upon a time",
                    "suggestions": ["Go"],
                    "wordCount": 4
                }),
            ),
            (
                StoryEvent::error("Failed to generate story"),
                json!({ "type": "error", "error": "Failed to generate story" }),
            ),
        ];

        for (event, expected) in cases {
            assert_eq!(serde_json::to_value(&event).unwrap(), expected);
        }
    }

    #[test]
    fn complete_event_parses_back() {
        let event: StoryEvent = serde_json::from_str(
            r#"{"type":"complete","content":"Hi there","suggestions":[],"wordCount":2}"#,
        )
        .unwrap();
        assert_eq!(event, StoryEvent::Complete(DecodedStory::new("Hi there", vec![])));
        assert!(event.is_terminal());
    }

    #[test]
    fn only_complete_and_error_are_terminal() {
        assert!(!StoryEvent::content("x").is_terminal());
        assert!(!StoryEvent::GeneratingSuggestions.is_terminal());
        assert!(!StoryEvent::suggestion("x", 0).is_terminal());
        assert!(StoryEvent::error("x").is_terminal());
    }
}
