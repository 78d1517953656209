//! Persistent conversation store abstraction

use crate::view::{ConversationId, StateId};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Per-conversation state marker plus a key/value data bag.
///
/// `state` is the externally visible "current position" used for routing;
/// the data bag holds serialized contexts keyed by context kind.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get_state(&self, conversation: &ConversationId) -> Result<Option<StateId>, StoreError>;

    async fn set_state(
        &self,
        conversation: &ConversationId,
        state: Option<&StateId>,
    ) -> Result<(), StoreError>;

    async fn get_data(
        &self,
        conversation: &ConversationId,
    ) -> Result<HashMap<String, Value>, StoreError>;

    /// Insert or replace one key of the conversation's data bag
    async fn set_data(
        &self,
        conversation: &ConversationId,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ConversationStore + ?Sized> ConversationStore for Arc<T> {
    async fn get_state(&self, conversation: &ConversationId) -> Result<Option<StateId>, StoreError> {
        (**self).get_state(conversation).await
    }

    async fn set_state(
        &self,
        conversation: &ConversationId,
        state: Option<&StateId>,
    ) -> Result<(), StoreError> {
        (**self).set_state(conversation, state).await
    }

    async fn get_data(
        &self,
        conversation: &ConversationId,
    ) -> Result<HashMap<String, Value>, StoreError> {
        (**self).get_data(conversation).await
    }

    async fn set_data(
        &self,
        conversation: &ConversationId,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        (**self).set_data(conversation, key, value).await
    }
}

#[derive(Debug, Default)]
struct MemoryRecord {
    state: Option<StateId>,
    data: HashMap<String, Value>,
}

/// In-process store. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<ConversationId, MemoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state without going through the async trait
    pub fn state_of(&self, conversation: &ConversationId) -> Option<StateId> {
        self.records
            .lock()
            .unwrap()
            .get(conversation)
            .and_then(|r| r.state.clone())
    }

    pub fn value_of(&self, conversation: &ConversationId, key: &str) -> Option<Value> {
        self.records
            .lock()
            .unwrap()
            .get(conversation)
            .and_then(|r| r.data.get(key).cloned())
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn get_state(&self, conversation: &ConversationId) -> Result<Option<StateId>, StoreError> {
        Ok(self.state_of(conversation))
    }

    async fn set_state(
        &self,
        conversation: &ConversationId,
        state: Option<&StateId>,
    ) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .entry(conversation.clone())
            .or_default()
            .state = state.cloned();
        Ok(())
    }

    async fn get_data(
        &self,
        conversation: &ConversationId,
    ) -> Result<HashMap<String, Value>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(conversation)
            .map(|r| r.data.clone())
            .unwrap_or_default())
    }

    async fn set_data(
        &self,
        conversation: &ConversationId,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .entry(conversation.clone())
            .or_default()
            .data
            .insert(key.to_string(), value);
        Ok(())
    }
}
