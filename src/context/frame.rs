//! Stack frames and send strategies

use crate::view::{StateId, ViewHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of the navigation stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuFrame {
    /// Message currently showing this frame
    pub view: ViewHandle,
    pub state: StateId,
    /// The view was sent for this frame (not reused by an edit) and is deleted on unwind
    pub fresh: bool,
    /// Inbound message that caused the frame, deleted together with a fresh frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<ViewHandle>,
}

/// How a state is put on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStrategy {
    /// Replace the content of the view on top of the stack
    Edit,
    /// Send a new message
    #[default]
    New,
}

impl fmt::Display for SendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendStrategy::Edit => f.write_str("edit"),
            SendStrategy::New => f.write_str("new"),
        }
    }
}

impl FromStr for SendStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edit" => Ok(SendStrategy::Edit),
            "new" => Ok(SendStrategy::New),
            other => Err(format!("unknown send strategy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("edit".parse::<SendStrategy>(), Ok(SendStrategy::Edit));
        assert_eq!(" NEW ".parse::<SendStrategy>(), Ok(SendStrategy::New));
        assert!("reply".parse::<SendStrategy>().is_err());
        assert_eq!(SendStrategy::default(), SendStrategy::New);
    }

    #[test]
    fn test_frame_without_cause_omits_field() {
        let frame = MenuFrame {
            view: ViewHandle::new(7),
            state: StateId::new("main"),
            fresh: true,
            cause: None,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"view": 7, "state": "main", "fresh": true})
        );
    }
}
