use tracing::{debug, warn};

use crate::{
    event::StoryEvent,
    scan::{ArrayScanner, FieldSeeker, Separator, StringScanner, separator_after},
    validate,
};

const CONTENT_LABEL: &str = "\"content\"";
const SUGGESTIONS_LABEL: &str = "\"suggestions\"";

/// Message of the `error` event when the model produced nothing usable.
pub const EMPTY_RESPONSE_MESSAGE: &str = "The model returned an empty response";

/// Progress of the incremental recognition. Only ever moves forward.
#[derive(Debug)]
enum Phase {
    /// Looking for `"content": "`.
    SeekContent,
    /// Inside the content string.
    Content(StringScanner),
    /// Content string closed at the given offset; waiting for the comma.
    ContentSeparator(usize),
    /// Looking for `"suggestions": [`.
    SeekSuggestions(FieldSeeker),
    /// Inside the suggestions array.
    Suggestions(ArrayScanner),
    /// Nothing more to recognise; only the final validation remains.
    Settled,
}

/// Read-only view of how far recognition got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderState {
    pub content_field_opened: bool,
    pub content_field_closed: bool,
    pub last_emitted_content_length: usize,
    pub suggestions_field_opened: bool,
    pub suggestions_array_opened: bool,
    pub emitted_suggestion_count: usize,
}

/// Incremental decoder for one model response.
///
/// Expects the fields in the order the story prompts request them:
/// `content` first, then `suggestions`. When the model deviates, progress
/// events simply stop and the terminal [`finish`](Self::finish) result is
/// taken from the full text instead.
///
/// One decoder serves exactly one session. [`finish`](Self::finish) and
/// [`fail`](Self::fail) consume it, so a second terminal event cannot be
/// produced.
#[derive(Debug)]
pub struct StoryDecoder {
    raw: String,
    phase: Phase,
    content_seeker: FieldSeeker,
    state: DecoderState,
}

impl Default for StoryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryDecoder {
    pub fn new() -> Self {
        Self {
            raw: String::new(),
            phase: Phase::SeekContent,
            content_seeker: FieldSeeker::new(CONTENT_LABEL, b'"', 0),
            state: DecoderState::default(),
        }
    }

    /// Everything received so far.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Append `chunk` and return the progress events it unlocked, in order.
    pub fn feed(&mut self, chunk: &str) -> Vec<StoryEvent> {
        let mut events = Vec::new();
        if chunk.is_empty() {
            return events;
        }

        self.raw.push_str(chunk);
        loop {
            let phase = std::mem::replace(&mut self.phase, Phase::Settled);
            let (next, progressed) = self.step(phase, &mut events);
            self.phase = next;
            if !progressed {
                break;
            }
        }
        events
    }

    /// Terminal event for a source that ended normally.
    ///
    /// The result is recovered from the full text: a well-formed payload is
    /// used as is, anything else becomes plain prose with the default
    /// suggestions. A response with no text at all yields an `error` event.
    pub fn finish(self) -> StoryEvent {
        match validate::recover(&self.raw) {
            Some(story) => {
                debug!(
                    words = story.word_count,
                    suggestions = story.suggestions.len(),
                    "story decoded"
                );
                StoryEvent::Complete(story)
            }
            None => {
                warn!("model response was empty");
                StoryEvent::error(EMPTY_RESPONSE_MESSAGE)
            }
        }
    }

    /// Terminal event for a source that failed.
    pub fn fail(self, message: impl Into<String>) -> StoryEvent {
        StoryEvent::error(message)
    }

    /// Run one phase; report whether the next phase should run right away.
    fn step(&mut self, phase: Phase, events: &mut Vec<StoryEvent>) -> (Phase, bool) {
        match phase {
            Phase::SeekContent => match self.content_seeker.seek(&self.raw) {
                Some(start) => {
                    debug!(offset = start, "content field opened");
                    self.state.content_field_opened = true;
                    (Phase::Content(StringScanner::starting_at(start)), true)
                }
                None => (Phase::SeekContent, false),
            },

            Phase::Content(mut scanner) => {
                let end = scanner.advance(&self.raw);
                let decoded = scanner.decoded();
                if decoded.len() > self.state.last_emitted_content_length {
                    self.state.last_emitted_content_length = decoded.len();
                    events.push(StoryEvent::content(decoded));
                }
                match end {
                    Some(end) => (Phase::ContentSeparator(end), true),
                    None => (Phase::Content(scanner), false),
                }
            }

            Phase::ContentSeparator(after) => match separator_after(&self.raw, after) {
                Separator::Comma(resume) => {
                    debug!("content field closed");
                    self.state.content_field_closed = true;
                    events.push(StoryEvent::GeneratingSuggestions);
                    let seeker = FieldSeeker::new(SUGGESTIONS_LABEL, b'[', resume);
                    (Phase::SeekSuggestions(seeker), true)
                }
                Separator::Pending => (Phase::ContentSeparator(after), false),
                Separator::Other => {
                    debug!("content field not followed by another field");
                    (Phase::Settled, false)
                }
            },

            Phase::SeekSuggestions(mut seeker) => match seeker.seek(&self.raw) {
                Some(start) => {
                    debug!(offset = start, "suggestions array opened");
                    self.state.suggestions_field_opened = true;
                    self.state.suggestions_array_opened = true;
                    (Phase::Suggestions(ArrayScanner::starting_at(start)), true)
                }
                None => (Phase::SeekSuggestions(seeker), false),
            },

            Phase::Suggestions(mut array) => {
                for suggestion in array.advance(&self.raw) {
                    let index = self.state.emitted_suggestion_count;
                    events.push(StoryEvent::suggestion(suggestion, index));
                    self.state.emitted_suggestion_count += 1;
                }
                if array.is_closed() {
                    debug!(
                        count = self.state.emitted_suggestion_count,
                        "suggestions array closed"
                    );
                    (Phase::Settled, false)
                } else {
                    (Phase::Suggestions(array), false)
                }
            }

            Phase::Settled => (Phase::Settled, false),
        }
    }
}
