use std::env;
use std::path::PathBuf;

use anyhow::bail;

/// Namespace the chat route and the ingest binary use unless overridden.
pub const DEFAULT_NAMESPACE: &str = "avengers-bot";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_PINECONE_ENVIRONMENT: &str = "us-east-1-aws";
const DEFAULT_TRANSCRIPTS_DIR: &str = "transcripts";
const DEFAULT_PORT: u16 = 8000;

/// Environment-sourced settings, validated once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub pinecone_api_key: String,
    pub pinecone_index_name: String,
    pub pinecone_environment: String,
    pub namespace: String,
    pub transcripts_dir: PathBuf,
    pub port: u16,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment. Fails if any required
    /// variable is missing so misconfiguration surfaces at startup rather
    /// than on the first request.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Settings {
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_base_url: var_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            pinecone_api_key: require("PINECONE_API_KEY")?,
            pinecone_index_name: require("PINECONE_INDEX_NAME")?,
            pinecone_environment: var_or("PINECONE_ENVIRONMENT", DEFAULT_PINECONE_ENVIRONMENT),
            namespace: var_or("RAG_NAMESPACE", DEFAULT_NAMESPACE),
            transcripts_dir: PathBuf::from(var_or("TRANSCRIPTS_DIR", DEFAULT_TRANSCRIPTS_DIR)),
            port: env::var("PORT")
                .ok()
                .and_then(|val| val.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            log_dir: env::var("LOG_DIR").ok().map(PathBuf::from),
        })
    }
}

fn require(name: &str) -> anyhow::Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("Missing required env variable: {}", name),
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
