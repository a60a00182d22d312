//! The two prompts of a co-writing session.
//!
//! * [`InitialStoryPrompt`] – opens a story from the writer's idea.
//! * [`ContinuationPrompt`] – extends an existing story in the direction the
//!   writer picked or typed.
//!
//! Both ask the model for a single JSON object with a `content` string
//! followed by a `suggestions` array. The field order matters: the streaming
//! decoder forwards suggestions only once `content` has closed.

use storyweave_core::{
    error::{Result, StoryError},
    generic::{GenericMessage, GenericRole},
    template::{IntoPrompt, PromptTemplate},
};

use crate::{builder::PromptBuilder, chain::PromptChain};

pub const STORY_TEMPERATURE: f64 = 0.8;
pub const INITIAL_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_MAX_WORDS: u32 = 150;
pub const MIN_MAX_WORDS: u32 = 50;
pub const MAX_MAX_WORDS: u32 = 500;

const RESPONSE_SHAPE: [&str; 4] = [
    "{",
    "  \"content\": \"the story content here\",",
    "  \"suggestions\": [\"suggestion 1\", \"suggestion 2\", \"suggestion 3\", \"suggestion 4\", \"suggestion 5\"]",
    "}",
];

fn with_response_contract(builder: PromptBuilder) -> PromptBuilder {
    RESPONSE_SHAPE
        .iter()
        .fold(
            builder
                .add_blank_line()
                .add_line("IMPORTANT: You MUST format your response as valid JSON with this exact structure:"),
            |b, line| b.add_line(line),
        )
        .add_blank_line()
        .add_line(
            "Do not include any markdown code blocks or additional text outside the JSON. \
             Make the suggestions specific and engaging, giving the user clear direction \
             options for the story.",
        )
}

/// Opens a new story from the writer's idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialStoryPrompt {
    idea: String,
}

impl InitialStoryPrompt {
    /// # Errors
    ///
    /// [`StoryError::InvalidRequest`] if `idea` is blank.
    pub fn new(idea: impl Into<String>) -> Result<Self> {
        let idea = idea.into();
        if idea.trim().is_empty() {
            return Err(StoryError::InvalidRequest(
                "initial prompt is required".into(),
            ));
        }
        Ok(Self { idea })
    }

    pub fn idea(&self) -> &str {
        &self.idea
    }

    fn system_prompt() -> String {
        let builder = PromptBuilder::new()
            .add_line(
                "You are a creative story writer. Generate the beginning of a story based on the user's prompt.",
            )
            .add_line(
                "The story should be 200-300 words long. After the story, provide 3-5 suggestions \
                 for how the user might want to continue the story.",
            );
        with_response_contract(builder).finalize()
    }
}

impl IntoPrompt for InitialStoryPrompt {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        PromptChain::new()
            .with(GenericMessage::new(Self::system_prompt(), GenericRole::System))
            .with(GenericMessage::new(self.idea, GenericRole::User))
            .build()
    }
}

impl PromptTemplate for InitialStoryPrompt {
    fn temperature(&self) -> Option<f64> {
        Some(STORY_TEMPERATURE)
    }

    fn max_tokens(&self) -> Option<u32> {
        Some(INITIAL_MAX_TOKENS)
    }
}

/// How the writer chose the next direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// One of the model's own suggestions.
    #[default]
    Suggestion,
    /// Free-form text typed by the writer.
    Custom,
}

impl Direction {
    fn noun(self) -> &'static str {
        match self {
            Direction::Suggestion => "chosen suggestion",
            Direction::Custom => "direction",
        }
    }

    fn opening(self) -> &'static str {
        match self {
            Direction::Suggestion => {
                "You are a creative story writer. The user has chosen a suggestion for how the story should continue."
            }
            Direction::Custom => {
                "You are a creative story writer. The user has provided a custom direction for how the story should continue."
            }
        }
    }
}

/// Extends an existing story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationPrompt {
    previous_content: String,
    user_choice: String,
    direction: Direction,
    max_words: u32,
}

impl ContinuationPrompt {
    /// # Errors
    ///
    /// [`StoryError::InvalidRequest`] if the story so far or the writer's
    /// choice is blank.
    pub fn new(
        previous_content: impl Into<String>,
        user_choice: impl Into<String>,
        direction: Direction,
    ) -> Result<Self> {
        let previous_content = previous_content.into();
        let user_choice = user_choice.into();

        if previous_content.trim().is_empty() {
            return Err(StoryError::InvalidRequest(
                "previous story content is required".into(),
            ));
        }
        if user_choice.trim().is_empty() {
            return Err(StoryError::InvalidRequest("user choice is required".into()));
        }

        Ok(Self {
            previous_content,
            user_choice,
            direction,
            max_words: DEFAULT_MAX_WORDS,
        })
    }

    /// Build from the segments written so far, separated by a blank line.
    pub fn from_segments<I, S>(
        segments: I,
        user_choice: impl Into<String>,
        direction: Direction,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let previous = segments
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n\n");
        Self::new(previous, user_choice, direction)
    }

    /// Target length of the continuation, clamped into
    /// [`MIN_MAX_WORDS`]`..=`[`MAX_MAX_WORDS`].
    pub fn with_max_words(mut self, max_words: u32) -> Self {
        self.max_words = max_words.clamp(MIN_MAX_WORDS, MAX_MAX_WORDS);
        self
    }

    pub fn max_words(&self) -> u32 {
        self.max_words
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn system_prompt(&self) -> String {
        let noun = self.direction.noun();
        let rules = [
            format!(
                "The user's {noun} is NOT already part of the story. You must incorporate it into your continuation."
            ),
            format!(
                "Stay focused ONLY on the {noun}. Do not introduce new characters, locations, or major plot \
                 elements unless they are directly implied by it."
            ),
            format!("Keep the continuation simple and directly related to the {noun}."),
            format!("Do not expand the scope beyond what the {noun} implies."),
            format!(
                "Write a natural continuation that flows from the previous content and incorporates the {noun}."
            ),
        ];

        let low = self.max_words * 4 / 5;
        let high = self.max_words * 6 / 5;

        let builder = PromptBuilder::new()
            .add_line(self.direction.opening())
            .add_blank_line()
            .add_line("IMPORTANT RULES:")
            .add_numbered_list(rules)
            .add_blank_line()
            .add_key_value(
                "Target length",
                format!(
                    "around {} words (aim for {low} to {high} words)",
                    self.max_words
                ),
            )
            .add_line(
                "After the story continuation, provide 3-5 suggestions for how the user might \
                 want to continue the story next.",
            );
        with_response_contract(builder).finalize()
    }

    fn user_prompt(&self) -> String {
        PromptBuilder::new()
            .add_line("Previous story content:")
            .add_line(&self.previous_content)
            .add_blank_line()
            .add_line(format!(
                "User's direction for continuation: {}",
                self.user_choice
            ))
            .add_blank_line()
            .add_line(
                "Please write the next part of the story that incorporates this direction \
                 and moves the story forward.",
            )
            .finalize()
    }
}

impl IntoPrompt for ContinuationPrompt {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        PromptChain::new()
            .with(GenericMessage::new(self.system_prompt(), GenericRole::System))
            .with(GenericMessage::new(self.user_prompt(), GenericRole::User))
            .build()
    }
}

impl PromptTemplate for ContinuationPrompt {
    fn temperature(&self) -> Option<f64> {
        Some(STORY_TEMPERATURE)
    }

    fn max_tokens(&self) -> Option<u32> {
        Some((self.max_words * 2).max(500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_idea_is_rejected() {
        assert!(matches!(
            InitialStoryPrompt::new("   "),
            Err(StoryError::InvalidRequest(_))
        ));
    }

    #[test]
    fn initial_prompt_is_system_then_user() {
        let prompt = InitialStoryPrompt::new("A dragon who is afraid of heights").unwrap();
        assert_eq!(prompt.max_tokens(), Some(INITIAL_MAX_TOKENS));

        let messages = prompt.into_prompt();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, GenericRole::System);
        assert!(messages[0].content.contains("\"suggestions\""));
        assert!(messages[0].content.contains("200-300 words"));
        assert_eq!(messages[1].content, "A dragon who is afraid of heights");
    }

    #[test]
    fn continuation_requires_a_choice() {
        assert!(ContinuationPrompt::new("Once upon a time.", "", Direction::Custom).is_err());
        assert!(ContinuationPrompt::new("", "Go left", Direction::Custom).is_err());
    }

    #[test]
    fn max_words_is_clamped_and_drives_max_tokens() {
        let prompt = ContinuationPrompt::new("Once.", "Go on", Direction::Suggestion).unwrap();
        assert_eq!(prompt.max_words(), DEFAULT_MAX_WORDS);
        assert_eq!(prompt.max_tokens(), Some(500));

        let long = prompt.clone().with_max_words(400);
        assert_eq!(long.max_tokens(), Some(800));

        assert_eq!(prompt.clone().with_max_words(10).max_words(), MIN_MAX_WORDS);
        assert_eq!(prompt.with_max_words(10_000).max_words(), MAX_MAX_WORDS);
    }

    #[test]
    fn direction_changes_the_system_prompt() {
        let custom = ContinuationPrompt::new("Once.", "A storm hits", Direction::Custom)
            .unwrap()
            .into_prompt();
        let chosen = ContinuationPrompt::new("Once.", "A storm hits", Direction::Suggestion)
            .unwrap()
            .into_prompt();

        assert!(custom[0].content.contains("custom direction"));
        assert!(chosen[0].content.contains("chosen a suggestion"));
        assert!(chosen[0].content.contains("around 150 words (aim for 120 to 180 words)"));
    }

    #[test]
    fn segments_are_joined_with_blank_lines() {
        let messages =
            ContinuationPrompt::from_segments(["First part.", "Second part."], "Go on", Direction::Custom)
                .unwrap()
                .into_prompt();

        assert!(
            messages[1]
                .content
                .starts_with("Previous story content:\nFirst part.\n\nSecond part.\n\n")
        );
        assert!(
            messages[1]
                .content
                .contains("User's direction for continuation: Go on")
        );
    }
}
