use crate::domain::food_analysis::ports::LLMClient;

/// Holds the adapters every domain service needs. Domain traits are
/// implemented on this type in their own modules.
#[derive(Clone, Debug)]
pub struct Service<LLM>
where
    LLM: LLMClient,
{
    pub(crate) llm_client: LLM,
    pub(crate) inline_system_prompt: bool,
}

impl<LLM> Service<LLM>
where
    LLM: LLMClient,
{
    pub fn new(llm_client: LLM, inline_system_prompt: bool) -> Self {
        Self {
            llm_client,
            inline_system_prompt,
        }
    }
}
