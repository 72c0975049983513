use std::{path::PathBuf, time::Duration};

use allergy_agents_core::domain::common::{
    AllergyAgentsConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, LLMConfig, SiteConfig,
};
use clap::{Parser, Subcommand};
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(name = "allergy-agents", version, about = "Food label allergen analysis")]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve(Args),
    /// Analyze one label photo from the terminal.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long = "root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long = "tls-cert", env = "SERVER_TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    #[arg(long = "tls-key", env = "SERVER_TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long = "analysis-timeout-ms", env = "ANALYSIS_TIMEOUT_MS", default_value_t = 30_000)]
    pub analysis_timeout_ms: u64,

    /// Put the system message in the user turn instead of `system_instruction`.
    #[arg(long = "inline-system-prompt", env = "GEMINI_INLINE_SYSTEM_PROMPT")]
    pub inline_system_prompt: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(
        long = "log-filter",
        env = "RUST_LOG",
        default_value = "info",
        global = true
    )]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", global = true)]
    pub json: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct AnalyzeArgs {
    /// Photo of the ingredient label.
    #[arg(long = "image")]
    pub image: PathBuf,

    /// Allergy list. The last saved list is used when omitted.
    #[arg(long = "allergies")]
    pub allergies: Option<String>,

    #[arg(
        long = "server-url",
        env = "ALLERGY_AGENTS_URL",
        default_value = "http://localhost:3333/"
    )]
    pub server_url: Url,

    #[arg(
        long = "preferences",
        env = "ALLERGY_AGENTS_PREFERENCES",
        default_value = ".allergy-agents/preferences.json"
    )]
    pub preferences: PathBuf,

    /// Run the analysis in-process against Gemini instead of calling a server.
    #[arg(long = "local")]
    pub local: bool,

    #[command(flatten)]
    pub llm: LlmArgs,
}

impl From<LlmArgs> for LLMConfig {
    fn from(args: LlmArgs) -> Self {
        LLMConfig {
            gemini_api_key: args.gemini_api_key.unwrap_or_default(),
            gemini_model: args.gemini_model,
            gemini_base_url: args.gemini_base_url,
            request_timeout: Duration::from_millis(args.analysis_timeout_ms),
            inline_system_prompt: args.inline_system_prompt,
        }
    }
}

impl From<LlmArgs> for AllergyAgentsConfig {
    fn from(args: LlmArgs) -> Self {
        let mut site = SiteConfig::default();
        site.limits.analysis_timeout_ms = args.analysis_timeout_ms;

        AllergyAgentsConfig {
            llm: args.into(),
            site,
        }
    }
}

impl From<Args> for AllergyAgentsConfig {
    fn from(args: Args) -> Self {
        args.llm.into()
    }
}
