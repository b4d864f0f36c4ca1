use std::fmt;
use uuid::Uuid;

use super::chat::ChatMessage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceStatus {
    Online,
    Offline,
}

impl From<bool> for ServiceStatus {
    fn from(live: bool) -> Self {
        if live { ServiceStatus::Online } else { ServiceStatus::Offline }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Online => write!(f, "Online"),
            ServiceStatus::Offline => write!(f, "Offline"),
        }
    }
}

/// Read-only snapshot of a session, handed to the shell after every action.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub session_id: Uuid,
    pub active: String,
    pub names: Vec<String>,
    pub messages: Vec<ChatMessage>,
    pub turn: TurnState,
    pub notice: Option<String>,
}
