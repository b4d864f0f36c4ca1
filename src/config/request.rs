use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{
    DEFAULT_MAX_TOKENS,
    DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE,
    MAX_MAX_TOKENS,
    MAX_TEMPERATURE,
    MIN_MAX_TOKENS,
    MIN_TEMPERATURE,
};
use crate::cli::Args;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Temperature {0} is outside {}..={}", MIN_TEMPERATURE, MAX_TEMPERATURE)]
    TemperatureOutOfRange(f32),
    #[error("Max tokens {0} is outside {}..={}", MIN_MAX_TOKENS, MAX_MAX_TOKENS)]
    MaxTokensOutOfRange(u32),
    #[error("Unsupported model '{0}' (expected one of: {})", ChatModel::ids().join(", "))]
    UnsupportedModel(String),
    #[error("Invalid Ollama URL '{0}': {1}")]
    InvalidUrl(String, String),
}

/// Models offered in the settings surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ChatModel {
    #[default]
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "llama3.2:3b")]
    Llama32_3b,
}

impl ChatModel {
    pub const ALL: [ChatModel; 2] = [ChatModel::DeepSeek, ChatModel::Llama32_3b];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::DeepSeek => "deepseek",
            ChatModel::Llama32_3b => "llama3.2:3b",
        }
    }

    pub fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.as_str()).collect()
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChatModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" => Ok(ChatModel::DeepSeek),
            "llama3.2:3b" => Ok(ChatModel::Llama32_3b),
            _ => Err(ConfigError::UnsupportedModel(s.to_string())),
        }
    }
}

/// Per-call sampling settings. Fields are private so every instance has
/// passed range validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    model: ChatModel,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            model: ChatModel::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl RequestConfig {
    pub fn new(
        model: ChatModel,
        system_prompt: impl Into<String>,
        temperature: f32,
        max_tokens: u32
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            model,
            system_prompt: system_prompt.into(),
            temperature: check_temperature(temperature)?,
            max_tokens: check_max_tokens(max_tokens)?,
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Self::new(args.model.parse()?, args.system_prompt.clone(), args.temperature, args.max_tokens)
    }

    pub fn model(&self) -> ChatModel {
        self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn set_model(&mut self, model: ChatModel) {
        self.model = model;
    }

    pub fn set_system_prompt(&mut self, system_prompt: impl Into<String>) {
        self.system_prompt = system_prompt.into();
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<(), ConfigError> {
        self.temperature = check_temperature(temperature)?;
        Ok(())
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) -> Result<(), ConfigError> {
        self.max_tokens = check_max_tokens(max_tokens)?;
        Ok(())
    }
}

fn check_temperature(temperature: f32) -> Result<f32, ConfigError> {
    // NaN is never contained and lands in the error arm.
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(ConfigError::TemperatureOutOfRange(temperature))
    }
}

fn check_max_tokens(max_tokens: u32) -> Result<u32, ConfigError> {
    if (MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&max_tokens) {
        Ok(max_tokens)
    } else {
        Err(ConfigError::MaxTokensOutOfRange(max_tokens))
    }
}
