//! Vertical paginator: items in rows, scrolled one row at a time

use super::{PageChannel, PageWindow, PaginationError, Paginator};
use crate::keyboard::{Button, KeyboardBuilder, Labels};
use serde::{Deserialize, Serialize};

/// How many rows the up/down controls take from `max_rows`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowReservation {
    /// Always keep two rows for the controls, shown or not
    #[default]
    Fixed,
    /// Only the controls actually shown take a row
    Adaptive,
}

/// Rows computed for the current offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalLayout {
    pub up: bool,
    pub content_rows: usize,
    pub down: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "VerticalRepr<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct VerticalPaginator<T> {
    window: PageWindow<T>,
    stub_incomplete_row: bool,
    reservation: RowReservation,
}

/// Unchecked serialized form
#[derive(Deserialize)]
struct VerticalRepr<T> {
    window: PageWindow<T>,
    #[serde(default = "stub_by_default")]
    stub_incomplete_row: bool,
    #[serde(default)]
    reservation: RowReservation,
}

fn stub_by_default() -> bool {
    true
}

impl<T> TryFrom<VerticalRepr<T>> for VerticalPaginator<T> {
    type Error = PaginationError;

    fn try_from(repr: VerticalRepr<T>) -> Result<Self, Self::Error> {
        repr.window.check_geometry(Self::MIN_ROWS)?;
        Ok(Self {
            window: repr.window,
            stub_incomplete_row: repr.stub_incomplete_row,
            reservation: repr.reservation,
        })
    }
}

impl<T> VerticalPaginator<T> {
    /// Two control rows plus at least one content row
    pub const MIN_ROWS: usize = 3;

    pub fn new(
        channel: PageChannel,
        items: Vec<T>,
        max_rows: usize,
        row_items: usize,
    ) -> Result<Self, PaginationError> {
        Ok(Self {
            window: PageWindow::new(channel, items, max_rows, Self::MIN_ROWS, row_items)?,
            stub_incomplete_row: stub_by_default(),
            reservation: RowReservation::default(),
        })
    }

    /// Pad a short last row with inert stub buttons (on by default)
    pub fn with_stub_incomplete_row(mut self, stub: bool) -> Self {
        self.stub_incomplete_row = stub;
        self
    }

    pub fn with_reservation(mut self, reservation: RowReservation) -> Self {
        self.reservation = reservation;
        self
    }

    pub fn layout(&self) -> VerticalLayout {
        let PageWindow {
            items,
            offset,
            max_rows,
            row_items,
            ..
        } = &self.window;
        let covers = |rows: usize| offset.saturating_add(rows * row_items) < items.len();

        let up = *offset > 0;
        match self.reservation {
            RowReservation::Fixed => {
                let content_rows = max_rows - 2;
                VerticalLayout {
                    up,
                    content_rows,
                    down: covers(content_rows),
                }
            }
            RowReservation::Adaptive => {
                let available = max_rows - usize::from(up);
                let down = covers(available);
                VerticalLayout {
                    up,
                    content_rows: available - usize::from(down),
                    down,
                }
            }
        }
    }

    /// Items below the current page
    pub fn remaining(&self) -> usize {
        let shown = self.layout().content_rows * self.window.row_items;
        self.window
            .items
            .len()
            .saturating_sub(self.window.offset.saturating_add(shown))
    }
}

impl<T> Paginator for VerticalPaginator<T> {
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
        let layout = self.layout();
        let row_items = self.window.row_items;
        let step = i64::try_from(row_items).unwrap_or(i64::MAX);

        if layout.up {
            let label = format!("{} ({})", labels.page_up, self.window.offset);
            keyboard.row([Button::new(label, self.window.channel.token(-step)?)]);
        }

        for chunk in self
            .window
            .visible(layout.content_rows * row_items)
            .chunks(row_items)
        {
            let mut row: Vec<Button> = chunk.iter().map(&mut make_button).collect();
            if self.stub_incomplete_row {
                row.resize_with(row_items, || Button::inert(labels.stub.clone()));
            }
            keyboard.row(row);
        }

        if layout.down {
            let label = format!("{} ({})", labels.page_down, self.remaining());
            keyboard.row([Button::new(label, self.window.channel.token(step)?)]);
        }
        Ok(())
    }
}
