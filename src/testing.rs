//! Mock implementations for testing
//!
//! These mocks enable navigation tests without a real chat API.

use crate::context::{Context, ContextData};
use crate::registry::ViewRegistry;
use crate::transport::{EditOutcome, Transport, TransportError};
use crate::view::{ConversationId, Response, ViewHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// Mock Transport
// ============================================================================

/// Record of one transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Sent {
        view: ViewHandle,
        text: String,
        reply_to: Option<ViewHandle>,
    },
    Edited {
        view: ViewHandle,
        text: String,
    },
    Deleted {
        view: ViewHandle,
    },
}

/// Transport that keeps messages in memory and records every call.
///
/// Behaves like a chat API: editing with identical text fails with
/// "not modified", editing or deleting a missing message fails with
/// "not found".
#[derive(Default)]
pub struct MockTransport {
    next_id: Mutex<i64>,
    messages: Mutex<HashMap<ViewHandle, String>>,
    calls: Mutex<Vec<TransportCall>>,
    edit_errors: Mutex<VecDeque<TransportError>>,
    send_errors: Mutex<VecDeque<TransportError>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> ViewHandle {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        ViewHandle::new(*next)
    }

    /// Simulate a message written by the user
    pub fn incoming(&self, text: &str) -> ViewHandle {
        let view = self.allocate();
        self.messages.lock().unwrap().insert(view, text.to_string());
        view
    }

    pub fn queue_edit_error(&self, error: TransportError) {
        self.edit_errors.lock().unwrap().push_back(error);
    }

    pub fn queue_send_error(&self, error: TransportError) {
        self.send_errors.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, TransportCall::Sent { .. }))
            .count()
    }

    pub fn deleted(&self) -> Vec<ViewHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Deleted { view } => Some(view),
                _ => None,
            })
            .collect()
    }

    /// Current text of a message still in the chat
    pub fn text_of(&self, view: ViewHandle) -> Option<String> {
        self.messages.lock().unwrap().get(&view).cloned()
    }

    /// Messages still in the chat, oldest first
    pub fn live_views(&self) -> Vec<ViewHandle> {
        let mut views: Vec<_> = self.messages.lock().unwrap().keys().copied().collect();
        views.sort();
        views
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_new(
        &self,
        _conversation: &ConversationId,
        response: &Response,
        reply_to: Option<ViewHandle>,
    ) -> Result<ViewHandle, TransportError> {
        if let Some(error) = self.send_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        let view = self.allocate();
        let text = response.payload.text().to_string();
        self.messages.lock().unwrap().insert(view, text.clone());
        self.calls.lock().unwrap().push(TransportCall::Sent {
            view,
            text,
            reply_to,
        });
        Ok(view)
    }

    async fn edit_existing(
        &self,
        _conversation: &ConversationId,
        view: ViewHandle,
        response: &Response,
    ) -> Result<EditOutcome, TransportError> {
        if let Some(error) = self.edit_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        let text = response.payload.text().to_string();
        let mut messages = self.messages.lock().unwrap();
        let Some(current) = messages.get_mut(&view) else {
            return Err(TransportError::not_found("message to edit not found"));
        };
        if *current == text {
            return Err(TransportError::not_modified("message is not modified"));
        }
        current.clone_from(&text);
        drop(messages);
        self.calls
            .lock()
            .unwrap()
            .push(TransportCall::Edited { view, text });
        Ok(EditOutcome::Edited(view))
    }

    async fn delete(
        &self,
        _conversation: &ConversationId,
        view: ViewHandle,
    ) -> Result<(), TransportError> {
        if self.messages.lock().unwrap().remove(&view).is_none() {
            return Err(TransportError::not_found("message to delete not found"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(TransportCall::Deleted { view });
        Ok(())
    }
}

// ============================================================================
// Demo Context
// ============================================================================

/// Small context kind used across tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoData {
    pub name: String,
}

impl Default for DemoData {
    fn default() -> Self {
        Self {
            name: "Anonymous".to_string(),
        }
    }
}

impl ContextData for DemoData {
    const KIND: &'static str = "Demo";
}

/// Views for the `main`, `settings` and `name` states of [`DemoData`]
pub fn demo_views() -> ViewRegistry<DemoData> {
    ViewRegistry::new()
        .with("main", |ctx: &Context<DemoData>| {
            Ok(Response::text(format!("You are {}", ctx.data().name)))
        })
        .and_then(|views| {
            views.with("settings", |_: &Context<DemoData>| {
                Ok(Response::text("Settings"))
            })
        })
        .and_then(|views| {
            views.with("name", |_: &Context<DemoData>| {
                Ok(Response::text("Please input your name"))
            })
        })
        .unwrap()
}
