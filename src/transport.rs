//! Message transport abstraction
//!
//! The navigation stack never talks to a chat API directly. It sends, edits
//! and deletes views through this trait so bots can plug in their client and
//! tests can record calls.

use crate::view::{ConversationId, Response, ViewHandle};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Transport error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_modified(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::NotModified, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::BadRequest, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unknown, message)
    }
}

/// Error classification deciding what the stack may ignore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Edit would not change the message
    NotModified,
    /// Target message no longer exists
    NotFound,
    /// Request rejected by the chat API
    BadRequest,
    /// Network issues, timeouts
    Network,
    Unknown,
}

impl TransportErrorKind {
    /// Failures of an edit that are expected races and need no compensation
    pub fn is_benign_for_edit(self) -> bool {
        matches!(self, Self::NotModified | Self::NotFound | Self::BadRequest)
    }

    /// Failures of a delete that mean the view is already gone
    pub fn is_benign_for_delete(self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Result of an edit request that reached the chat API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Edited(ViewHandle),
    /// The API reported the content as identical and did nothing
    Unchanged,
}

/// Delivery of rendered views to a conversation
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a new message, optionally as a reply to an existing one
    async fn send_new(
        &self,
        conversation: &ConversationId,
        response: &Response,
        reply_to: Option<ViewHandle>,
    ) -> Result<ViewHandle, TransportError>;

    /// Replace the content of an existing message
    async fn edit_existing(
        &self,
        conversation: &ConversationId,
        view: ViewHandle,
        response: &Response,
    ) -> Result<EditOutcome, TransportError>;

    async fn delete(&self, conversation: &ConversationId, view: ViewHandle)
        -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send_new(
        &self,
        conversation: &ConversationId,
        response: &Response,
        reply_to: Option<ViewHandle>,
    ) -> Result<ViewHandle, TransportError> {
        (**self).send_new(conversation, response, reply_to).await
    }

    async fn edit_existing(
        &self,
        conversation: &ConversationId,
        view: ViewHandle,
        response: &Response,
    ) -> Result<EditOutcome, TransportError> {
        (**self).edit_existing(conversation, view, response).await
    }

    async fn delete(
        &self,
        conversation: &ConversationId,
        view: ViewHandle,
    ) -> Result<(), TransportError> {
        (**self).delete(conversation, view).await
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: Transport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

fn log_outcome<V>(
    operation: &'static str,
    conversation: &ConversationId,
    started: Instant,
    result: &Result<V, TransportError>,
) {
    let duration = started.elapsed();
    match result {
        Ok(_) => tracing::debug!(
            conversation_id = %conversation,
            operation,
            duration_ms = %duration.as_millis(),
            "Transport call completed"
        ),
        Err(e) => tracing::warn!(
            conversation_id = %conversation,
            operation,
            duration_ms = %duration.as_millis(),
            kind = ?e.kind,
            error = %e.message,
            "Transport call failed"
        ),
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn send_new(
        &self,
        conversation: &ConversationId,
        response: &Response,
        reply_to: Option<ViewHandle>,
    ) -> Result<ViewHandle, TransportError> {
        let started = Instant::now();
        let result = self.inner.send_new(conversation, response, reply_to).await;
        log_outcome("send_new", conversation, started, &result);
        result
    }

    async fn edit_existing(
        &self,
        conversation: &ConversationId,
        view: ViewHandle,
        response: &Response,
    ) -> Result<EditOutcome, TransportError> {
        let started = Instant::now();
        let result = self.inner.edit_existing(conversation, view, response).await;
        log_outcome("edit_existing", conversation, started, &result);
        result
    }

    async fn delete(
        &self,
        conversation: &ConversationId,
        view: ViewHandle,
    ) -> Result<(), TransportError> {
        let started = Instant::now();
        let result = self.inner.delete(conversation, view).await;
        log_outcome("delete", conversation, started, &result);
        result
    }
}
