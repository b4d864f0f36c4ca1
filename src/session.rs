use log::{ debug, error, info, warn };
use thiserror::Error;
use uuid::Uuid;

use crate::config::RequestConfig;
use crate::history::{ ConversationStore, StoreError };
use crate::llm::{ InferenceClient, InferenceError, ResponseResult };
use crate::models::chat::ChatMessage;
use crate::models::view::{ ServiceStatus, TurnState, ViewState };

const NEW_CHAT_LABEL: &str = "Chat";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Still waiting for the previous reply")]
    TurnInProgress,
    #[error("No prompt is waiting for a reply")]
    NoPendingPrompt,
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// One user's chat session: the conversation store, the working buffer of the
/// active conversation, and the client that answers prompts.
///
/// Every handler takes `&mut self`, so actions on a session are processed one
/// at a time. Serving several users means one controller per user.
pub struct ConversationController<C: InferenceClient> {
    client: C,
    store: ConversationStore,
    buffer: Vec<ChatMessage>,
    session_id: Uuid,
    turn: TurnState,
    /// Prompt awaiting a reply and the conversation it was sent from.
    pending: Option<(String, String)>,
    notice: Option<String>,
}

impl<C: InferenceClient> ConversationController<C> {
    pub fn new(client: C) -> Self {
        Self::with_store(client, ConversationStore::new())
    }

    /// Starts a session over an existing store, loading its active conversation.
    pub fn with_store(client: C, store: ConversationStore) -> Self {
        let buffer = store
            .messages(store.active())
            .map(|m| m.to_vec())
            .unwrap_or_default();
        let session_id = Uuid::new_v4();
        info!("Session {} started on '{}'", session_id, store.active());

        Self {
            client,
            store,
            buffer,
            session_id,
            turn: TurnState::Idle,
            pending: None,
            notice: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.buffer
    }

    pub fn active(&self) -> &str {
        self.store.active()
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            session_id: self.session_id,
            active: self.store.active().to_string(),
            names: self.store.list_names(),
            messages: self.buffer.clone(),
            turn: self.turn,
            notice: self.notice.clone(),
        }
    }

    fn persist_buffer(&mut self) {
        let active = self.store.active().to_string();
        if let Err(e) = self.store.replace_messages(&active, self.buffer.clone()) {
            // The active pointer always names a stored conversation.
            error!("Session {}: failed to persist '{}': {}", self.session_id, active, e);
        }
    }

    pub fn new_chat(&mut self) -> ViewState {
        self.persist_buffer();
        let name = self.store.create_conversation(NEW_CHAT_LABEL);
        if let Err(e) = self.store.set_active(&name) {
            error!("Session {}: new conversation '{}' missing: {}", self.session_id, name, e);
        }
        self.buffer.clear();
        self.notice = None;
        info!("Session {}: started conversation '{}'", self.session_id, name);
        self.view()
    }

    pub fn switch_to(&mut self, name: &str) -> Result<ViewState, StoreError> {
        let messages = self.store.messages(name)?.to_vec();
        self.store.set_active(name)?;
        self.buffer = messages;
        self.notice = None;
        info!(
            "Session {}: switched to '{}' ({} messages)",
            self.session_id,
            name,
            self.buffer.len()
        );
        Ok(self.view())
    }

    pub fn clear_current(&mut self) -> ViewState {
        self.buffer.clear();
        self.persist_buffer();
        self.notice = None;
        info!("Session {}: cleared '{}'", self.session_id, self.store.active());
        self.view()
    }

    /// Records `prompt` as a user turn and moves the session to
    /// `AwaitingResponse`. The returned view is what the user sees while the
    /// reply is outstanding; `await_reply` finishes the turn.
    pub fn submit_prompt(&mut self, prompt: &str) -> Result<ViewState, SendError> {
        if prompt.trim().is_empty() {
            return Err(SendError::EmptyPrompt);
        }
        if self.turn == TurnState::AwaitingResponse {
            return Err(SendError::TurnInProgress);
        }

        self.buffer.push(ChatMessage::user(prompt));
        self.persist_buffer();
        self.turn = TurnState::AwaitingResponse;
        self.pending = Some((prompt.to_string(), self.store.active().to_string()));
        self.notice = None;
        debug!("Session {}: submitted prompt on '{}'", self.session_id, self.store.active());
        Ok(self.view())
    }

    /// Asks the inference service for a reply to the submitted prompt. Only a
    /// successful call adds an assistant turn, to the conversation the prompt
    /// came from. No retries.
    pub async fn await_reply(
        &mut self,
        config: &RequestConfig
    ) -> Result<ResponseResult, SendError> {
        let (prompt, origin) = self.pending.take().ok_or(SendError::NoPendingPrompt)?;
        debug!("Session {}: awaiting '{}' on '{}'", self.session_id, config.model(), origin);

        let outcome = self.client.complete(&prompt, config).await;
        self.turn = TurnState::Idle;

        match outcome {
            Ok(result) => {
                let reply = ChatMessage::assistant(result.text.clone());
                if origin == self.store.active() {
                    self.buffer.push(reply);
                    self.persist_buffer();
                } else if let Err(e) = self.store.append_message(&origin, reply) {
                    error!("Session {}: reply for '{}' dropped: {}", self.session_id, origin, e);
                }
                Ok(result)
            }
            Err(e) => {
                warn!("Session {}: turn failed on '{}': {}", self.session_id, origin, e);
                self.notice = Some(e.to_string());
                self.persist_buffer();
                Err(SendError::from(e))
            }
        }
    }

    /// Submits `prompt` and waits for the reply in one step. The user turn is
    /// kept even when the call fails.
    pub async fn send_prompt(
        &mut self,
        prompt: &str,
        config: &RequestConfig
    ) -> Result<ResponseResult, SendError> {
        self.submit_prompt(prompt)?;
        self.await_reply(config).await
    }

    pub async fn service_status(&self) -> ServiceStatus {
        ServiceStatus::from(self.client.probe_liveness().await)
    }
}
