use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::{NoContext, Timestamp};

pub mod entities;
pub mod services;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct AllergyAgentsConfig {
    pub llm: LLMConfig,
    pub site: SiteConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
    /// Send the system message inside the user turn for models that reject
    /// `system_instruction`.
    pub inline_system_prompt: bool,
}

impl LLMConfig {
    pub fn new(gemini_api_key: String) -> Self {
        Self {
            gemini_api_key,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            inline_system_prompt: false,
        }
    }
}

/// Public site metadata. Built once at start-up and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub version: String,
    pub contact: ContactInfo,
    pub legal: LegalInfo,
    pub safety_notice: SafetyNotice,
    pub limits: AppLimits,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContactInfo {
    pub general: String,
    pub support: String,
    pub emergency: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct LegalInfo {
    pub company: String,
    pub copyright: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct SafetyNotice {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct AppLimits {
    pub max_image_bytes: usize,
    pub supported_formats: Vec<String>,
    pub analysis_timeout_ms: u64,
    pub allergies_storage_key: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Allergy Agents".to_string(),
            tagline: "AI-powered food safety dashboard".to_string(),
            description: "AI-powered food safety analysis to help you identify potential \
                          allergens in packaged foods. Use as a helpful tool, but always \
                          verify ingredients yourself."
                .to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact: ContactInfo {
                general: "info@allergyagents.com".to_string(),
                support: "support@allergyagents.com".to_string(),
                emergency: "For medical emergencies, call your local emergency services \
                            immediately."
                    .to_string(),
            },
            legal: LegalInfo {
                company: "Allergy Agents Inc.".to_string(),
                copyright: "This tool is for informational purposes only and should not \
                            replace professional medical advice."
                    .to_string(),
            },
            safety_notice: SafetyNotice {
                title: "Important Safety Notice".to_string(),
                description: "This tool is designed to assist with ingredient analysis but \
                              should NEVER be your only method of checking food safety. \
                              Always read ingredient labels carefully yourself and consult \
                              healthcare providers for medical advice."
                    .to_string(),
            },
            limits: AppLimits {
                max_image_bytes: 10 * 1024 * 1024,
                supported_formats: ["jpg", "jpeg", "png", "webp"]
                    .iter()
                    .map(|f| f.to_string())
                    .collect(),
                analysis_timeout_ms: DEFAULT_ANALYSIS_TIMEOUT.as_millis() as u64,
                allergies_storage_key: crate::domain::preferences::ALLERGIES_STORAGE_KEY
                    .to_string(),
            },
        }
    }
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}
