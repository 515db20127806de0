use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub custom_model: CustomModelConfig,
    #[serde(default)]
    pub verdict: VerdictConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default = "default_evidence_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_result_limit")]
    pub news_limit: usize,
    #[serde(default = "default_result_limit")]
    pub search_limit: usize,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_evidence_timeout(),
            news_limit: default_result_limit(),
            search_limit: default_result_limit(),
        }
    }
}

fn default_evidence_timeout() -> u64 {
    10
}
fn default_result_limit() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_provider")]
    pub provider: String,
    #[serde(default = "default_inference_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_ner_model")]
    pub ner_model: String,
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,
    #[serde(default = "default_fake_news_model")]
    pub fake_news_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: default_inference_provider(),
            endpoint: default_inference_endpoint(),
            ner_model: default_ner_model(),
            sentiment_model: default_sentiment_model(),
            fake_news_model: default_fake_news_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_inference_timeout(),
        }
    }
}

fn default_inference_provider() -> String {
    "disabled".to_string()
}
fn default_inference_endpoint() -> String {
    "https://api-inference.huggingface.co".to_string()
}
fn default_ner_model() -> String {
    "Davlan/bert-base-multilingual-cased-ner-hrl".to_string()
}
fn default_sentiment_model() -> String {
    "cardiffnlp/twitter-xlm-roberta-base-sentiment-multilingual".to_string()
}
fn default_fake_news_model() -> String {
    "Thegame1161/tiny-bert-detect-fake-news".to_string()
}
fn default_embedding_model() -> String {
    "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2".to_string()
}
fn default_inference_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            endpoint: default_gemini_endpoint(),
            timeout_secs: default_inference_timeout(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CustomModelConfig {
    #[serde(default = "default_custom_model_timeout")]
    pub timeout_secs: u64,
}

impl Default for CustomModelConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_custom_model_timeout(),
        }
    }
}

fn default_custom_model_timeout() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct VerdictConfig {
    #[serde(default = "default_verdict_strategy")]
    pub strategy: String,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            strategy: default_verdict_strategy(),
        }
    }
}

fn default_verdict_strategy() -> String {
    "api".to_string()
}

/// API credentials resolved from the process environment. A missing key
/// leaves the corresponding provider unconfigured; it is never a startup
/// error.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub gemini_api_key: Option<String>,
    pub factcheck_api_key: Option<String>,
    pub newsdata_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub custom_model_url: Option<String>,
    pub custom_model_api_key: Option<String>,
    pub hf_api_token: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        fn env_nonempty(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        Self {
            gemini_api_key: env_nonempty("GEMINI_API_KEY"),
            factcheck_api_key: env_nonempty("GOOGLE_FACTCHECK_KEY"),
            newsdata_api_key: env_nonempty("NEWSDATA_API_KEY"),
            serpapi_api_key: env_nonempty("SERPAPI_KEY"),
            custom_model_url: env_nonempty("CUSTOM_MODEL_URL"),
            custom_model_api_key: env_nonempty("CUSTOM_MODEL_API_KEY"),
            hf_api_token: env_nonempty("HF_API_TOKEN"),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.providers.timeout_secs == 0 {
        anyhow::bail!("providers.timeout_secs must be > 0");
    }
    if config.providers.news_limit == 0 || config.providers.search_limit == 0 {
        anyhow::bail!("providers.news_limit and providers.search_limit must be >= 1");
    }
    if config.inference.timeout_secs == 0 || config.gemini.timeout_secs == 0 {
        anyhow::bail!("inference.timeout_secs and gemini.timeout_secs must be > 0");
    }
    if config.custom_model.timeout_secs == 0 {
        anyhow::bail!("custom_model.timeout_secs must be > 0");
    }

    match config.inference.provider.as_str() {
        "disabled" | "hf-api" => {}
        other => anyhow::bail!(
            "Unknown inference provider: '{}'. Must be disabled or hf-api.",
            other
        ),
    }

    match config.verdict.strategy.as_str() {
        "api" | "custom-model" => {}
        other => anyhow::bail!(
            "Unknown verdict strategy: '{}'. Must be api or custom-model.",
            other
        ),
    }

    Ok(config)
}
