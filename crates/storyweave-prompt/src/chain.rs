//! Concatenates the messages of several [`IntoPrompt`] values in order.
//!
//! ```rust
//! use storyweave_prompt::chain::PromptChain;
//! use storyweave_core::generic::{GenericMessage, GenericRole};
//!
//! let messages = PromptChain::new()
//!     .with(GenericMessage::new("You are a creative story writer.", GenericRole::System))
//!     .with(GenericMessage::new("A lighthouse keeper finds a letter.", GenericRole::User))
//!     .build();
//!
//! assert_eq!(messages.len(), 2);
//! ```
use storyweave_core::template::IntoPrompt;

pub struct PromptChain<Message>(Vec<Message>);

impl<Message> Default for PromptChain<Message> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Message> PromptChain<Message> {
    pub fn new() -> Self {
        Self(vec![])
    }

    /// Append the messages produced by `with` to the chain.
    pub fn with(mut self, with: impl IntoPrompt<Message = Message>) -> Self {
        self.0.append(&mut with.into_prompt());
        self
    }

    /// Consume the chain and return the accumulated messages.
    pub fn build(self) -> Vec<Message> {
        self.0
    }
}
