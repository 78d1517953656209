//! chatnav - menu navigation for chat bots
//!
//! A [`Context`] keeps a per-conversation stack of menus. Handlers move
//! forward with [`Context::advance`] and back with [`Context::back`],
//! [`Context::backoff_until`] or [`Context::finish`]; the stack decides which
//! chat messages to send, edit or delete. A [`Navigator`] loads the context
//! before each handler and stores it afterwards.
//!
//! Views are plain render functions registered per state in a
//! [`ViewRegistry`]. Long lists are split into pages with the
//! [`VerticalPaginator`] and [`HorizontalPaginator`].
//!
//! The chat API and the storage backend are abstracted behind the
//! [`Transport`] and [`ConversationStore`] traits.

pub mod codec;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod keyboard;
pub mod logging;
pub mod menu;
pub mod navigator;
pub mod pagination;
pub mod registry;
pub mod store;
pub mod transport;
pub mod view;

#[cfg(test)]
mod testing;

pub use codec::{CallbackToken, CodecError, Namespace, PageDelta, TokenPayload};
pub use config::NavConfig;
pub use context::{Context, ContextData, MenuFrame, SendStrategy};
pub use db::{Database, DatabaseStore};
pub use error::{NavError, NavResult};
pub use keyboard::{Button, Keyboard, KeyboardBuilder, Labels};
pub use menu::MenuAction;
pub use navigator::{Event, EventKind, HandlerFuture, Navigator};
pub use pagination::{
    HorizontalPaginator, PageChannel, PaginationError, Paginator, RowReservation,
    VerticalPaginator,
};
pub use registry::ViewRegistry;
pub use store::{ConversationStore, MemoryStore, StoreError};
pub use transport::{EditOutcome, LoggingTransport, Transport, TransportError, TransportErrorKind};
pub use view::{ConversationId, ParseMode, Payload, Response, StateId, ViewHandle};
