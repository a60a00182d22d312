//! Model identifiers used throughout the **storyweave** workspace.
//!
//! Application code picks an enum variant; each backend crate maps the
//! variant onto its own naming scheme (`"deepseek-chat"`, `"gpt-4o-mini"`, …).
//!
//! ```rust
//! use storyweave_core::model::{DeepSeekModel, Model, OpenAiModel};
//!
//! assert_eq!(Model::default(), Model::DeepSeek(DeepSeekModel::Chat));
//! assert_eq!(Model::from(OpenAiModel::Gpt4oMini), Model::OpenAi(OpenAiModel::Gpt4oMini));
//! ```

/// Universal identifier for an LLM model.
///
/// * `DeepSeek` / `OpenAi` – models served behind an OpenAI-compatible API.
/// * `Custom` – any model name not covered by a dedicated enum, passed through
///   verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    DeepSeek(DeepSeekModel),
    OpenAi(OpenAiModel),
    Custom(String),
}

impl Default for Model {
    fn default() -> Self {
        Model::DeepSeek(DeepSeekModel::Chat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeepSeekModel {
    Chat,
    Reasoner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt4o,
    Gpt4oMini,
}

impl From<DeepSeekModel> for Model {
    fn from(val: DeepSeekModel) -> Self {
        Model::DeepSeek(val)
    }
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}
