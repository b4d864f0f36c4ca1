use clap::Parser;

use crate::config::{
    DEFAULT_MAX_TOKENS,
    DEFAULT_OLLAMA_URL,
    DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Inference Service Args ---
    /// Base URL of the local Ollama server.
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_url: String,

    /// Seconds to wait for the /api/version liveness check.
    #[arg(long, env = "PROBE_TIMEOUT_SECS", default_value = "2")]
    pub probe_timeout_secs: u64,

    /// Seconds to wait for a full (non-streaming) completion.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    // --- Generation Settings ---
    /// Model used for completions (deepseek, llama3.2:3b)
    #[arg(long, env = "CHAT_MODEL", default_value = "deepseek")]
    pub model: String,

    /// System prompt sent with every completion. Empty disables it.
    #[arg(long, env = "SYSTEM_PROMPT", default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system_prompt: String,

    /// Sampling temperature (0.1 to 1.0).
    #[arg(long, env = "TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Maximum number of tokens in the response (100 to 4000).
    #[arg(long, env = "MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}
