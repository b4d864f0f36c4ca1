use async_trait::async_trait;
use log::{ debug, info, warn };
use reqwest::{ Client as HttpClient, StatusCode };
use serde::{ Deserialize, Serialize };
use std::time::Instant;

use super::{ ClientConfig, InferenceClient, InferenceError, ResponseResult };
use crate::config::RequestConfig;

const VERSION_ROUTE: &str = "/api/version";
const GENERATE_ROUTE: &str = "/api/generate";

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    config: ClientConfig,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
    /// Left out of the body entirely when there is no system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: &str, config: &RequestConfig) -> Self {
        let system = Some(config.system_prompt())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            model: config.model().as_str().to_string(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: config.temperature(),
                num_predict: config.max_tokens(),
            },
            system,
        }
    }
}

#[derive(Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

impl OllamaClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, reqwest::Error> {
        let url = self.config.endpoint(GENERATE_ROUTE);
        let resp = self.http
            .post(&url)
            .timeout(self.config.request_timeout)
            .json(req)
            .send().await?
            .error_for_status()?;
        resp.json::<GenerateResponse>().await
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn probe_liveness(&self) -> bool {
        let url = self.config.endpoint(VERSION_ROUTE);
        match self.http.get(&url).timeout(self.config.probe_timeout).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => true,
            Ok(resp) => {
                debug!("Liveness check {} returned {}", url, resp.status());
                false
            }
            Err(e) => {
                debug!("Liveness check {} failed: {}", url, e);
                false
            }
        }
    }

    async fn complete(
        &self,
        prompt: &str,
        config: &RequestConfig
    ) -> Result<ResponseResult, InferenceError> {
        if !self.probe_liveness().await {
            warn!("Ollama at {} is not reachable", self.config.base_url);
            return Err(InferenceError::ServiceUnavailable);
        }

        let req = GenerateRequest::new(prompt, config);
        let started = Instant::now();
        let data = self.generate(&req).await.map_err(|e| {
            warn!("Completion request to {} failed: {}", self.config.base_url, e);
            InferenceError::RequestFailed(e.to_string())
        })?;
        let elapsed = started.elapsed();

        info!("Completion from '{}' in {:.2}s", req.model, elapsed.as_secs_f64());
        Ok(ResponseResult { text: data.response, elapsed })
    }
}
