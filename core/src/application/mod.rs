use tracing::info;

use crate::{
    domain::common::{AllergyAgentsConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::llm::GeminiLLMClient,
};

pub type AllergyAgentsService = Service<GeminiLLMClient>;

pub fn create_service(config: &AllergyAgentsConfig) -> Result<AllergyAgentsService, CoreError> {
    if config.llm.gemini_api_key.trim().is_empty() {
        return Err(CoreError::InvalidConfiguration(
            "a Gemini API key is required".to_string(),
        ));
    }

    let llm_client = GeminiLLMClient::new(&config.llm)?;

    info!(
        model = %config.llm.gemini_model,
        timeout_ms = config.llm.request_timeout.as_millis() as u64,
        "Analysis service ready"
    );

    Ok(Service::new(llm_client, config.llm.inline_system_prompt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::LLMConfig;

    #[test]
    fn test_create_service_requires_api_key() {
        let config = AllergyAgentsConfig {
            llm: LLMConfig::new("  ".to_string()),
            site: Default::default(),
        };

        assert!(matches!(
            create_service(&config),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_create_service() {
        let config = AllergyAgentsConfig {
            llm: LLMConfig::new("test-key".to_string()),
            site: Default::default(),
        };

        assert!(create_service(&config).is_ok());
    }
}
