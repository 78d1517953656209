//! Identifiers and render output shared by the registry, the stack and the transport

use crate::keyboard::Keyboard;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of one conversation (a chat).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Names a point in the view registry and the persisted "current state" of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque reference to a message already shown in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewHandle(i64);

impl ViewHandle {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn id(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Markup dialect of formatted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    Html,
    MarkdownV2,
}

/// Text part of a rendered view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Plain { text: String },
    Formatted { text: String, mode: ParseMode },
}

impl Payload {
    pub fn text(&self) -> &str {
        match self {
            Payload::Plain { text } | Payload::Formatted { text, .. } => text,
        }
    }

    pub fn parse_mode(&self) -> Option<ParseMode> {
        match self {
            Payload::Plain { .. } => None,
            Payload::Formatted { mode, .. } => Some(*mode),
        }
    }
}

/// Output of a render function: what a view should display.
///
/// Built fresh on every render because it may depend on mutable context data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: Payload::Plain { text: text.into() },
            keyboard: None,
        }
    }

    pub fn formatted(text: impl Into<String>, mode: ParseMode) -> Self {
        Self {
            payload: Payload::Formatted {
                text: text.into(),
                mode,
            },
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
