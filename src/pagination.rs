//! Paginated keyboards over long item lists
//!
//! A paginator owns the items and the current offset. Rendering appends the
//! visible page plus navigation controls to a [`KeyboardBuilder`]; pressing a
//! control yields a page-delta token that [`Paginator::advance`] applies.
//! Paginators are plain serde values, so they usually live inside the context
//! data and survive between turns.

mod horizontal;
mod vertical;

#[cfg(test)]
mod proptests;

pub use horizontal::HorizontalPaginator;
pub use vertical::{RowReservation, VerticalLayout, VerticalPaginator};

use crate::codec::{CallbackToken, CodecError, Namespace, PageDelta};
use crate::keyboard::{Button, KeyboardBuilder, Labels, MAX_BUTTON_COLUMNS, MAX_BUTTON_ROWS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_ROWS: usize = 8;
pub const DEFAULT_ROW_ITEMS: usize = 1;

/// Length of the generated instance id of a unique paginator
const INSTANCE_ID_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("max_rows must be within {min}..={max}, got {got}")]
    RowsOutOfRange { min: usize, max: usize, got: usize },
    #[error("row_items must be within 1..={max}, got {got}")]
    ColumnsOutOfRange { max: usize, got: usize },
    #[error("Offset {offset} cannot move by {delta}")]
    OffsetOutOfRange { offset: usize, delta: i64 },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Where a paginator's control tokens are minted and recognized.
///
/// The namespace names the paginator kind. The instance separates several
/// paginators of one kind shown at once; it is empty for a shared channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageChannel {
    namespace: Namespace,
    instance: String,
}

impl PageChannel {
    /// Channel shared by every paginator of `kind`
    pub fn shared(kind: &str) -> Result<Self, PaginationError> {
        Ok(Self {
            namespace: Namespace::new(kind)?,
            instance: String::new(),
        })
    }

    /// Channel with a freshly generated instance id
    pub fn unique(kind: &str) -> Result<Self, PaginationError> {
        let mut instance = uuid::Uuid::new_v4().simple().to_string();
        instance.truncate(INSTANCE_ID_LEN);
        Self::shared(kind)?.with_instance(instance)
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Result<Self, PaginationError> {
        let instance = instance.into();
        if instance.contains(':') {
            return Err(CodecError::ReservedSeparator(instance).into());
        }
        self.instance = instance;
        Ok(self)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn token(&self, delta: i64) -> Result<CallbackToken, PaginationError> {
        Ok(self.namespace.encode(&PageDelta {
            instance: self.instance.clone(),
            delta,
        })?)
    }

    /// Page delta carried by `token`
    pub fn decode(&self, token: &CallbackToken) -> Result<i64, PaginationError> {
        let payload: PageDelta = self.namespace.decode(token.as_str())?;
        if payload.instance != self.instance {
            return Err(CodecError::InstanceMismatch {
                expected: self.instance.clone(),
                found: payload.instance,
            }
            .into());
        }
        Ok(payload.delta)
    }

    /// True if `token` was minted by this channel
    pub fn owns(&self, token: &CallbackToken) -> bool {
        self.namespace.owns(token.as_str()) && self.decode(token).is_ok()
    }
}

/// Items, offset and geometry shared by both paginator layouts.
///
/// Geometry is fixed at construction. Paginators re-check it when they are
/// deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow<T> {
    items: Vec<T>,
    offset: usize,
    max_rows: usize,
    row_items: usize,
    channel: PageChannel,
}

impl<T> PageWindow<T> {
    pub(crate) fn new(
        channel: PageChannel,
        items: Vec<T>,
        max_rows: usize,
        min_rows: usize,
        row_items: usize,
    ) -> Result<Self, PaginationError> {
        let window = Self {
            items,
            offset: 0,
            max_rows,
            row_items,
            channel,
        };
        window.check_geometry(min_rows)?;
        Ok(window)
    }

    pub(crate) fn check_geometry(&self, min_rows: usize) -> Result<(), PaginationError> {
        if !(min_rows..=MAX_BUTTON_ROWS).contains(&self.max_rows) {
            return Err(PaginationError::RowsOutOfRange {
                min: min_rows,
                max: MAX_BUTTON_ROWS,
                got: self.max_rows,
            });
        }
        if !(1..=MAX_BUTTON_COLUMNS).contains(&self.row_items) {
            return Err(PaginationError::ColumnsOutOfRange {
                max: MAX_BUTTON_COLUMNS,
                got: self.row_items,
            });
        }
        Ok(())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Jump to `offset`. Past the end shows an empty page.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn row_items(&self) -> usize {
        self.row_items
    }

    pub fn channel(&self) -> &PageChannel {
        &self.channel
    }

    /// Apply the delta carried by `token`. No clamping past the end; moving
    /// before the first item is an error.
    pub fn advance(&mut self, token: &CallbackToken) -> Result<usize, PaginationError> {
        let delta = self.channel.decode(token)?;
        let out_of_range = PaginationError::OffsetOutOfRange {
            offset: self.offset,
            delta,
        };
        let offset = i64::try_from(self.offset)
            .ok()
            .and_then(|offset| offset.checked_add(delta))
            .and_then(|offset| usize::try_from(offset).ok())
            .ok_or(out_of_range)?;
        self.offset = offset;
        Ok(offset)
    }

    /// Items from the offset on, at most `count` of them
    pub(crate) fn visible(&self, count: usize) -> &[T] {
        let start = self.offset.min(self.items.len());
        let end = self.offset.saturating_add(count).min(self.items.len());
        &self.items[start..end]
    }
}

/// A keyboard section that pages through a list of items
pub trait Paginator {
    type Item;

    fn window(&self) -> &PageWindow<Self::Item>;

    fn window_mut(&mut self) -> &mut PageWindow<Self::Item>;

    /// Append the current page and its controls to `keyboard`.
    fn to_builder<F>(
        &self,
        keyboard: &mut KeyboardBuilder,
        labels: &Labels,
        make_button: F,
    ) -> Result<(), PaginationError>
    where
        F: FnMut(&Self::Item) -> Button;

    fn offset(&self) -> usize {
        self.window().offset
    }

    fn items(&self) -> &[Self::Item] {
        &self.window().items
    }

    /// True if `token` is one of this paginator's controls
    fn owns(&self, token: &CallbackToken) -> bool {
        self.window().channel.owns(token)
    }

    /// Move by the delta carried by `token` and return the new offset
    fn advance(&mut self, token: &CallbackToken) -> Result<usize, PaginationError> {
        self.window_mut().advance(token)
    }
}
