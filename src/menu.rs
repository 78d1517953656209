//! Built-in BACK / FINISH menu controls

use crate::codec::{CallbackToken, CodecError, Namespace, TokenPayload};
use crate::keyboard::{Button, Labels};
use serde::{Deserialize, Serialize};

/// Navigation action carried by a menu button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    Back,
    Finish,
}

impl MenuAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuAction::Back => "back",
            MenuAction::Finish => "finish",
        }
    }

    pub fn label(self, labels: &Labels) -> &str {
        match self {
            MenuAction::Back => &labels.menu_back,
            MenuAction::Finish => &labels.menu_close,
        }
    }
}

/// Decoded menu button payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCallback {
    pub action: MenuAction,
}

impl TokenPayload for MenuCallback {
    fn to_fields(&self) -> Vec<String> {
        vec![self.action.as_str().to_string()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, CodecError> {
        let action = match fields {
            ["back"] => MenuAction::Back,
            ["finish"] => MenuAction::Finish,
            [other] => return Err(CodecError::UnknownAction((*other).to_string())),
            _ => return Err(CodecError::Malformed(fields.join(":"))),
        };
        Ok(Self { action })
    }
}

/// Namespace of the menu tokens of one context kind
pub fn namespace(kind: &str) -> Result<Namespace, CodecError> {
    Namespace::new(format!("menu-{kind}"))
}

pub fn token(namespace: &Namespace, action: MenuAction) -> Result<CallbackToken, CodecError> {
    namespace.encode(&MenuCallback { action })
}

pub fn button(
    namespace: &Namespace,
    action: MenuAction,
    labels: &Labels,
) -> Result<Button, CodecError> {
    Ok(Button::new(action.label(labels), token(namespace, action)?))
}
