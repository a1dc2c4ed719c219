use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::observability::LoggingConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default outbound timeout for the completion API.
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 120;

#[derive(Debug)]
pub struct EmailConfig {
    pub common: core_config::Config,
    pub openai: OpenAiSettings,
    pub prompt: PromptSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug)]
pub struct OpenAiSettings {
    pub api_key: Secret<String>,
    /// Model identifier sent with every completion request (e.g., gpt-4o-mini)
    pub model: String,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PromptSettings {
    /// Plain-text system prompt, read once at startup
    pub system_prompt_path: PathBuf,
}

impl EmailConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let timeout = parse_timeout(&get_env(
            "OPENAI_TIMEOUT_SECS",
            Some(&DEFAULT_OPENAI_TIMEOUT_SECS.to_string()),
            is_prod,
        )?)?;

        Ok(EmailConfig {
            common: common_config,
            openai: OpenAiSettings {
                api_key: Secret::new(require_non_blank(
                    "OPENAI_API_KEY",
                    get_env("OPENAI_API_KEY", None, is_prod)?,
                )?),
                model: get_env("OPENAI_API_MODEL", Some("gpt-4o-mini"), is_prod)?,
                base_url: get_env(
                    "OPENAI_BASE_URL",
                    Some("https://api.openai.com/v1"),
                    is_prod,
                )?,
                timeout,
            },
            prompt: PromptSettings {
                system_prompt_path: get_env(
                    "EMAIL_SYSTEM_PROMPT_PATH",
                    Some("prompts/email.system.txt"),
                    is_prod,
                )?
                .into(),
            },
            logging: LoggingConfig {
                level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
                dir: Some(get_env("LOG_DIR", Some("logs"), is_prod)?.into()),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }
}

/// Reject values that are set but blank, e.g. `KEY=` left in a `.env` template.
fn require_non_blank(key: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is set but empty",
            key
        )));
    }
    Ok(value)
}

/// Whole seconds, greater than zero.
fn parse_timeout(raw: &str) -> Result<Duration, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "OPENAI_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
            raw
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
