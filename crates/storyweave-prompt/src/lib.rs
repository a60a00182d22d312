pub mod builder;
pub mod chain;
pub mod story;

pub use story::{ContinuationPrompt, Direction, InitialStoryPrompt};
