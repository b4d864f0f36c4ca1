pub mod ollama;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::cli::Args;
use crate::config::{ ConfigError, RequestConfig };
use self::ollama::OllamaClient;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("Ollama is not running. Please start Ollama first.")]
    ServiceUnavailable,
    #[error("Error communicating with Ollama: {0}")]
    RequestFailed(String),
}

/// Text of one completion plus the wall-clock time spent waiting for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult {
    pub text: String,
    pub elapsed: Duration,
}

impl ResponseResult {
    /// Elapsed seconds rounded to two decimals, as shown under a reply.
    pub fn elapsed_seconds(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 100.0).round() / 100.0
    }
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Cheap preflight check. Transport errors count as "not live".
    async fn probe_liveness(&self) -> bool;

    async fn complete(
        &self,
        prompt: &str,
        config: &RequestConfig
    ) -> Result<ResponseResult, InferenceError>;
}

#[async_trait]
impl<T: InferenceClient + ?Sized> InferenceClient for Arc<T> {
    async fn probe_liveness(&self) -> bool {
        (**self).probe_liveness().await
    }

    async fn complete(
        &self,
        prompt: &str,
        config: &RequestConfig
    ) -> Result<ResponseResult, InferenceError> {
        (**self).complete(prompt, config).await
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e|
            ConfigError::InvalidUrl(base_url.to_string(), e.to_string())
        )?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(
                ConfigError::InvalidUrl(base_url.to_string(), "expected an http(s) URL".into())
            );
        }
        Ok(Self {
            base_url: parsed,
            probe_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(60),
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Self::new(&args.ollama_url)?;
        config.probe_timeout = Duration::from_secs(args.probe_timeout_secs);
        config.request_timeout = Duration::from_secs(args.request_timeout_secs);
        Ok(config)
    }

    /// Joins an API route onto the base URL, keeping any path prefix.
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), route)
    }
}

pub fn new_client(config: &ClientConfig) -> Arc<dyn InferenceClient> {
    Arc::new(OllamaClient::new(config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_seconds_rounds_to_two_decimals() {
        let result = ResponseResult {
            text: String::new(),
            elapsed: Duration::from_millis(1236),
        };
        assert_eq!(result.elapsed_seconds(), 1.24);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ClientConfig::new("http://localhost:11434/").unwrap();
        assert_eq!(config.endpoint("/api/version"), "http://localhost:11434/api/version");
        let proxied = ClientConfig::new("http://gateway/ollama").unwrap();
        assert_eq!(proxied.endpoint("/api/generate"), "http://gateway/ollama/api/generate");
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(ClientConfig::new("not a url"), Err(ConfigError::InvalidUrl(..))));
        assert!(matches!(ClientConfig::new("ftp://host"), Err(ConfigError::InvalidUrl(..))));
    }
}
