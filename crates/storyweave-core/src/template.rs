//! Abstractions that turn a value into a ready-to-send prompt.
//!
//! 1. [`IntoPrompt`] – turns a value into an ordered list of chat messages.
//! 2. [`PromptTemplate`] – adds the sampling hints the backend should use.
//!
//! ```rust
//! use storyweave_core::generic::{GenericMessage, GenericRole};
//! use storyweave_core::template::{IntoPrompt, PromptTemplate};
//!
//! struct Haiku;
//!
//! impl IntoPrompt for Haiku {
//!     type Message = GenericMessage;
//!     fn into_prompt(self) -> Vec<Self::Message> {
//!         vec![GenericMessage::new("Write a haiku about rust.", GenericRole::User)]
//!     }
//! }
//!
//! impl PromptTemplate for Haiku {
//!     fn temperature(&self) -> Option<f64> {
//!         Some(1.0)
//!     }
//! }
//!
//! assert_eq!(Haiku.temperature(), Some(1.0));
//! assert_eq!(Haiku.into_prompt().len(), 1);
//! ```

/// Converts a value into a series of chat messages.
///
/// The `Message` type is an associated type so a backend with a richer wire
/// struct can still be fed without dynamic dispatch.
pub trait IntoPrompt {
    type Message: Send + Sync + 'static;

    /// Consume `self` and return **all** messages in the desired order.
    fn into_prompt(self) -> Vec<Self::Message>;
}

/// Sampling hints attached to a prompt. `None` leaves the provider default.
pub trait PromptTemplate: IntoPrompt {
    fn temperature(&self) -> Option<f64> {
        None
    }

    fn max_tokens(&self) -> Option<u32> {
        None
    }
}

/// A single [`GenericMessage`](crate::generic::GenericMessage) is a complete
/// prompt on its own.
impl IntoPrompt for crate::generic::GenericMessage {
    type Message = crate::generic::GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![self]
    }
}
