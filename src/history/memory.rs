use log::debug;

use super::{ Conversation, StoreError, DEFAULT_CONVERSATION };
use crate::models::chat::ChatMessage;

/// Process-lifetime registry of named conversations.
///
/// Conversations are kept in creation order. The store always holds at least
/// one conversation and `active` always names one of them.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active: String,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: vec![Conversation::new(DEFAULT_CONVERSATION)],
            active: DEFAULT_CONVERSATION.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conversations.iter().any(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Result<&Conversation, StoreError> {
        self.conversations
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Conversation, StoreError> {
        self.conversations
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn messages(&self, name: &str) -> Result<&[ChatMessage], StoreError> {
        self.get(name).map(|c| c.messages.as_slice())
    }

    /// Inserts an empty conversation named `"{base_label} {n}"` where `n`
    /// starts at the current count plus one. The active pointer is left alone.
    pub fn create_conversation(&mut self, base_label: &str) -> String {
        let mut n = self.conversations.len() + 1;
        let mut name = format!("{} {}", base_label, n);
        while self.contains(&name) {
            n += 1;
            name = format!("{} {}", base_label, n);
        }
        let conversation = Conversation::new(name.clone());
        debug!("Created conversation '{}' at {}", name, conversation.created_at.to_rfc3339());
        self.conversations.push(conversation);
        name
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), StoreError> {
        if !self.contains(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.active = name.to_string();
        Ok(())
    }

    pub fn append_message(&mut self, name: &str, message: ChatMessage) -> Result<(), StoreError> {
        self.get_mut(name)?.messages.push(message);
        Ok(())
    }

    pub fn replace_messages(
        &mut self,
        name: &str,
        messages: Vec<ChatMessage>
    ) -> Result<(), StoreError> {
        self.get_mut(name)?.messages = messages;
        Ok(())
    }

    pub fn list_names(&self) -> Vec<String> {
        self.conversations
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_default_conversation_active() {
        let store = ConversationStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.active(), DEFAULT_CONVERSATION);
        assert!(store.messages(DEFAULT_CONVERSATION).unwrap().is_empty());
    }

    #[test]
    fn create_conversation_numbers_from_count_and_keeps_active() {
        let mut store = ConversationStore::new();
        let second = store.create_conversation("Chat");
        let third = store.create_conversation("Chat");
        assert_eq!(second, "Chat 2");
        assert_eq!(third, "Chat 3");
        assert_eq!(store.active(), DEFAULT_CONVERSATION);
        assert_eq!(store.list_names(), vec!["New Chat", "Chat 2", "Chat 3"]);
    }

    #[test]
    fn create_conversation_skips_taken_names() {
        let mut store = ConversationStore::new();
        // With two conversations the next candidate is "Chat 3"; occupy it first.
        store.conversations.push(Conversation::new("Chat 3"));
        assert_eq!(store.create_conversation("Chat"), "Chat 4");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn set_active_unknown_name_is_not_found() {
        let mut store = ConversationStore::new();
        let err = store.set_active("missing").unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".to_string()));
        assert_eq!(store.active(), DEFAULT_CONVERSATION);
    }

    #[test]
    fn append_and_replace_only_touch_named_conversation() {
        let mut store = ConversationStore::new();
        let other = store.create_conversation("Chat");
        store.append_message(DEFAULT_CONVERSATION, ChatMessage::user("a")).unwrap();
        store.append_message(&other, ChatMessage::user("b")).unwrap();

        store.replace_messages(DEFAULT_CONVERSATION, Vec::new()).unwrap();

        assert!(store.messages(DEFAULT_CONVERSATION).unwrap().is_empty());
        assert_eq!(store.messages(&other).unwrap(), &[ChatMessage::user("b")]);
        assert!(store.append_message("nope", ChatMessage::user("c")).is_err());
        assert!(store.replace_messages("nope", Vec::new()).is_err());
    }
}
