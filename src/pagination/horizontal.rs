//! Horizontal paginator: one item per row, flipped a page at a time

use super::{PageChannel, PageWindow, PaginationError, Paginator};
use crate::keyboard::{Button, KeyboardBuilder, Labels};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HorizontalRepr<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct HorizontalPaginator<T> {
    window: PageWindow<T>,
}

/// Unchecked serialized form
#[derive(Deserialize)]
struct HorizontalRepr<T> {
    window: PageWindow<T>,
}

impl<T> TryFrom<HorizontalRepr<T>> for HorizontalPaginator<T> {
    type Error = PaginationError;

    fn try_from(repr: HorizontalRepr<T>) -> Result<Self, Self::Error> {
        repr.window.check_geometry(Self::MIN_ROWS)?;
        Ok(Self {
            window: repr.window,
        })
    }
}

impl<T> HorizontalPaginator<T> {
    /// One control row plus at least one item
    pub const MIN_ROWS: usize = 2;

    pub fn new(
        channel: PageChannel,
        items: Vec<T>,
        max_rows: usize,
    ) -> Result<Self, PaginationError> {
        Ok(Self {
            window: PageWindow::new(channel, items, max_rows, Self::MIN_ROWS, 1)?,
        })
    }

    /// Items per page; the last row belongs to the controls
    pub fn page_size(&self) -> usize {
        self.window.max_rows - 1
    }

    pub fn has_left(&self) -> bool {
        self.window.offset > 0
    }

    pub fn has_right(&self) -> bool {
        self.window.offset.saturating_add(self.page_size()) < self.window.items.len()
    }

    /// Pages before the current one
    pub fn pages_left(&self) -> usize {
        let size = self.page_size();
        self.window.offset.saturating_add(size - 1) / size
    }

    /// Pages after the current one
    pub fn pages_right(&self) -> usize {
        self.window
            .items
            .len()
            .saturating_sub(self.window.offset.saturating_add(1))
            / self.page_size()
    }

    fn control(
        &self,
        enabled: bool,
        caption: &str,
        pages: usize,
        delta: i64,
        labels: &Labels,
    ) -> Result<Button, PaginationError> {
        if enabled {
            let label = format!("{caption} ({pages})");
            Ok(Button::new(label, self.window.channel.token(delta)?))
        } else {
            Ok(Button::new(
                labels.disabled.clone(),
                self.window.channel.token(0)?,
            ))
        }
    }
}

impl<T> Paginator for HorizontalPaginator<T> {
    type Item = T;

    fn window(&self) -> &PageWindow<T> {
        &self.window
    }

    fn window_mut(&mut self) -> &mut PageWindow<T> {
        &mut self.window
    }

    fn to_builder<F>(
        &self,
        keyboard: &mut KeyboardBuilder,
        labels: &Labels,
        mut make_button: F,
    ) -> Result<(), PaginationError>
    where
        F: FnMut(&T) -> Button,
    {
        let size = self.page_size();
        for item in self.window.visible(size) {
            keyboard.row([make_button(item)]);
        }

        let (left, right) = (self.has_left(), self.has_right());
        if !left && !right {
            return Ok(());
        }
        let step = i64::try_from(size).unwrap_or(i64::MAX);
        keyboard.row([
            self.control(left, &labels.page_left, self.pages_left(), -step, labels)?,
            self.control(right, &labels.page_right, self.pages_right(), step, labels)?,
        ]);
        Ok(())
    }
}
