//! Top-level error type for navigation and lifecycle operations

use crate::codec::CodecError;
use crate::pagination::PaginationError;
use crate::store::StoreError;
use crate::transport::TransportError;
use crate::view::StateId;
use thiserror::Error;

/// Errors surfaced by [`Context`](crate::Context) and [`Navigator`](crate::Navigator).
///
/// The first group are usage errors that abort the current turn. The wrapped
/// errors come from the store, the transport or the token codec.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("Context used before the entry point or after the context has finished")]
    EmptyContext,
    #[error("Context can only be driven from a context-injected handler")]
    OutOfScope,
    #[error("No responder found for state {0}")]
    NoResponderFound(StateId),
    #[error("Duplicate responder for state {0}")]
    DuplicateResponder(StateId),
    #[error("Context {0} was not bound to a menu router")]
    UnboundContext(&'static str),
    #[error("State {0} was not found in history during backoff")]
    HistoricalStateNotFound(StateId),
    #[error("Navigation stack is empty")]
    EmptyStack,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Callback token error: {0}")]
    Codec(#[from] CodecError),
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),
    #[error("Context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Handler failed: {0}")]
    Handler(String),
}

impl NavError {
    /// Wrap an application-level failure raised inside a handler.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// True for errors caused by misuse of the navigation API rather than I/O.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyContext
                | Self::OutOfScope
                | Self::NoResponderFound(_)
                | Self::DuplicateResponder(_)
                | Self::UnboundContext(_)
                | Self::HistoricalStateNotFound(_)
                | Self::EmptyStack
        )
    }
}

pub type NavResult<T> = Result<T, NavError>;
