//! Inbound events handed to handlers

use crate::codec::CallbackToken;
use crate::view::{ConversationId, ViewHandle};

/// Something the user did in a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub conversation: ConversationId,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A message written by the user
    Message {
        view: ViewHandle,
        text: Option<String>,
    },
    /// A button press
    Callback {
        token: CallbackToken,
        /// Message carrying the pressed button, if still accessible
        view: Option<ViewHandle>,
    },
}

impl Event {
    pub fn message(
        conversation: impl Into<ConversationId>,
        view: ViewHandle,
        text: impl Into<String>,
    ) -> Self {
        Self {
            conversation: conversation.into(),
            kind: EventKind::Message {
                view,
                text: Some(text.into()),
            },
        }
    }

    pub fn callback(
        conversation: impl Into<ConversationId>,
        token: CallbackToken,
        view: Option<ViewHandle>,
    ) -> Self {
        Self {
            conversation: conversation.into(),
            kind: EventKind::Callback { token, view },
        }
    }

    pub fn token(&self) -> Option<&CallbackToken> {
        match &self.kind {
            EventKind::Callback { token, .. } => Some(token),
            EventKind::Message { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Message { text, .. } => text.as_deref(),
            EventKind::Callback { .. } => None,
        }
    }

    /// Message the event originates from
    pub fn view(&self) -> Option<ViewHandle> {
        match &self.kind {
            EventKind::Message { view, .. } => Some(*view),
            EventKind::Callback { view, .. } => *view,
        }
    }
}
