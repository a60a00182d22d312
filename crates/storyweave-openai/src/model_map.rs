use std::borrow::Cow;

use storyweave_core::model::{DeepSeekModel, Model, OpenAiModel};

pub const DEEPSEEK_CHAT: &str = "deepseek-chat";
pub const DEEPSEEK_REASONER: &str = "deepseek-reasoner";
pub const GPT4_O_MINI: &str = "gpt-4o-mini";
pub const GPT4_O: &str = "gpt-4o";

/// Wire name of `model`; `None` for a blank custom name.
pub(crate) fn map_model(model: &Model) -> Option<Cow<'static, str>> {
    match model {
        Model::Custom(custom) if custom.trim().is_empty() => None,
        Model::Custom(custom) => Some(Cow::Owned(custom.clone())),
        Model::DeepSeek(DeepSeekModel::Chat) => Some(DEEPSEEK_CHAT.into()),
        Model::DeepSeek(DeepSeekModel::Reasoner) => Some(DEEPSEEK_REASONER.into()),
        Model::OpenAi(OpenAiModel::Gpt4o) => Some(GPT4_O.into()),
        Model::OpenAi(OpenAiModel::Gpt4oMini) => Some(GPT4_O_MINI.into()),
    }
}
