//! Inline keyboard layout: buttons, rows and the builder paginators write into

use crate::codec::CallbackToken;
use serde::{Deserialize, Serialize};

/// Maximum number of button rows a chat keyboard can carry
pub const MAX_BUTTON_ROWS: usize = 8;
/// Maximum number of buttons in one keyboard row
pub const MAX_BUTTON_COLUMNS: usize = 8;

/// Token carried by buttons that must do nothing when pressed
pub const IGNORE_TOKEN: &str = "ignore-me";

/// One actionable button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub token: CallbackToken,
}

impl Button {
    pub fn new(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }

    /// A placeholder button whose token is ignored by every router.
    pub fn inert(label: impl Into<String>) -> Self {
        Self::new(label, CallbackToken::from_raw(IGNORE_TOKEN))
    }

    pub fn is_inert(&self) -> bool {
        self.token.as_str() == IGNORE_TOKEN
    }
}

/// Finished keyboard attached to a [`Response`](crate::Response)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// Accumulates keyboard rows in display order
#[derive(Debug, Clone, Default)]
pub struct KeyboardBuilder {
    rows: Vec<Vec<Button>>,
}

impl KeyboardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Empty rows are skipped.
    pub fn row(&mut self, buttons: impl IntoIterator<Item = Button>) -> &mut Self {
        let row: Vec<Button> = buttons.into_iter().collect();
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    pub fn build(self) -> Keyboard {
        Keyboard { rows: self.rows }
    }
}

/// Captions for navigation controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub page_up: String,
    pub page_down: String,
    pub page_left: String,
    pub page_right: String,
    pub stub: String,
    pub disabled: String,
    pub menu_back: String,
    pub menu_close: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            page_up: "\u{2b06} Up".to_string(),
            page_down: "\u{2b07} Down".to_string(),
            page_left: "\u{2b05} Left".to_string(),
            page_right: "Right \u{27a1}".to_string(),
            stub: "\u{25ab}".to_string(),
            disabled: "\u{23f8}".to_string(),
            menu_back: "\u{2196} Back".to_string(),
            menu_close: "\u{23cf} Close".to_string(),
        }
    }
}
