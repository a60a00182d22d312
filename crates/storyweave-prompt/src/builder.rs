//! Builder-style helper for assembling system prompts line by line.
//!
//! ```rust
//! use storyweave_prompt::builder::PromptBuilder;
//!
//! let text = PromptBuilder::new()
//!     .add_line("You are a creative story writer.")
//!     .add_blank_line()
//!     .add_line("IMPORTANT RULES:")
//!     .add_numbered(1, "Stay on topic.")
//!     .finalize();
//!
//! assert_eq!(text, "You are a creative story writer.\n\nIMPORTANT RULES:\n1. Stay on topic.\n");
//! ```
//!
//! Newlines and whitespace are emitted exactly as requested; nothing is
//! reflowed.

use std::fmt::{Display, Write as _};

/// Fluent helper that owns a growing `String` buffer.
pub struct PromptBuilder {
    buffer: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Add a plain line of text and a trailing newline.
    pub fn add_line(mut self, line: impl Display) -> Self {
        writeln!(self.buffer, "{line}").expect("failed to write buffer");
        self
    }

    /// Add `n. text`.
    pub fn add_numbered(mut self, n: usize, line: impl Display) -> Self {
        writeln!(self.buffer, "{n}. {line}").expect("failed to write buffer");
        self
    }

    /// Add every item of `lines` as a numbered list starting at 1.
    pub fn add_numbered_list<I, T>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        lines
            .into_iter()
            .enumerate()
            .fold(self, |builder, (i, line)| builder.add_numbered(i + 1, line))
    }

    /// Add a bold key–value pair: `**Key**: Value`.
    pub fn add_key_value(mut self, key: impl Display, value: impl Display) -> Self {
        writeln!(self.buffer, "**{key}**: {value}").expect("failed to write buffer");
        self
    }

    pub fn add_blank_line(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Retrieve the accumulated text and consume the builder.
    pub fn finalize(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_list_starts_at_one() {
        let text = PromptBuilder::new()
            .add_numbered_list(["first", "second"])
            .finalize();
        assert_eq!(text, "1. first\n2. second\n");
    }

    #[test]
    fn key_value_is_bold() {
        let text = PromptBuilder::new()
            .add_key_value("Target length", "150 words")
            .add_blank_line()
            .finalize();
        assert_eq!(text, "**Target length**: 150 words\n\n");
    }

    #[test]
    fn display_values_are_written_verbatim() {
        let text = PromptBuilder::new()
            .add_line(300)
            .add_numbered(7, "seventh")
            .finalize();
        assert_eq!(text, "300\n7. seventh\n");
    }
}
