mod memory;

pub use memory::ConversationStore;

use chrono::{ DateTime, Utc };
use thiserror::Error;
use crate::models::chat::ChatMessage;

pub const DEFAULT_CONVERSATION: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Conversation '{0}' not found")]
    NotFound(String),
}

#[derive(Clone, Debug)]
pub struct Conversation {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }
}
