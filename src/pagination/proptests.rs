//! Property-based tests for paginator arithmetic

use super::*;
use crate::codec::CallbackToken;
use proptest::prelude::*;

fn pick(item: &usize) -> Button {
    Button::new(item.to_string(), CallbackToken::from_raw(format!("pick:{item}")))
}

fn picked(keyboard: &KeyboardBuilder) -> Vec<usize> {
    keyboard
        .rows()
        .iter()
        .flatten()
        .filter_map(|b| b.token.as_str().strip_prefix("pick:"))
        .filter_map(|n| n.parse().ok())
        .collect()
}

fn arb_reservation() -> impl Strategy<Value = RowReservation> {
    prop_oneof![Just(RowReservation::Fixed), Just(RowReservation::Adaptive)]
}

proptest! {
    #[test]
    fn prop_vertical_fits_the_grid(
        count in 0usize..60,
        max_rows in 3usize..=8,
        row_items in 1usize..=8,
        offset in 0usize..60,
        reservation in arb_reservation(),
        stub in any::<bool>(),
    ) {
        let channel = PageChannel::shared("v").unwrap();
        let mut p = VerticalPaginator::new(channel, (0..count).collect(), max_rows, row_items)
            .unwrap()
            .with_reservation(reservation)
            .with_stub_incomplete_row(stub);
        p.window_mut().set_offset(offset);

        let mut keyboard = KeyboardBuilder::new();
        p.to_builder(&mut keyboard, &Labels::default(), pick).unwrap();

        prop_assert!(keyboard.rows().len() <= max_rows);
        prop_assert!(keyboard.rows().iter().all(|r| r.len() <= row_items));

        // The page is a contiguous run starting at the offset
        let shown = picked(&keyboard);
        let expected: Vec<usize> = (offset..count).take(shown.len()).collect();
        prop_assert_eq!(&shown, &expected);

        // Either the page reaches the end or a down control is offered
        let layout = p.layout();
        prop_assert_eq!(layout.down, offset + shown.len() < count);
        prop_assert_eq!(layout.up, offset > 0);
    }

    #[test]
    fn prop_horizontal_pages_cover_every_item_once(
        count in 0usize..40,
        max_rows in 2usize..=8,
    ) {
        let channel = PageChannel::shared("h").unwrap();
        let mut p = HorizontalPaginator::new(channel, (0..count).collect(), max_rows).unwrap();
        let step = i64::try_from(p.page_size()).unwrap();
        let right = p.window().channel().token(step).unwrap();

        let mut seen = Vec::new();
        loop {
            let mut keyboard = KeyboardBuilder::new();
            p.to_builder(&mut keyboard, &Labels::default(), pick).unwrap();
            prop_assert!(keyboard.rows().len() <= max_rows);
            seen.extend(picked(&keyboard));
            if !p.has_right() {
                break;
            }
            p.advance(&right).unwrap();
        }
        prop_assert_eq!(seen, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn prop_horizontal_counters_add_up(
        count in 1usize..40,
        max_rows in 2usize..=8,
        page in 0usize..20,
    ) {
        let channel = PageChannel::shared("h").unwrap();
        let mut p = HorizontalPaginator::new(channel, (0..count).collect(), max_rows).unwrap();
        let size = p.page_size();
        prop_assume!(page * size < count);
        p.window_mut().set_offset(page * size);

        let total = count.div_ceil(size);
        prop_assert_eq!(p.pages_left(), page);
        prop_assert_eq!(p.pages_left() + 1 + p.pages_right(), total);
    }

    #[test]
    fn prop_delta_tokens_round_trip(size in 1i64..=7, unique in any::<bool>()) {
        let channel = if unique {
            PageChannel::unique("shoplist").unwrap()
        } else {
            PageChannel::shared("shoplist").unwrap()
        };
        for delta in [-size, 0, size] {
            let token = channel.token(delta).unwrap();
            prop_assert!(token.as_str().len() <= crate::codec::MAX_TOKEN_BYTES);
            prop_assert_eq!(channel.decode(&token).unwrap(), delta);
        }
    }
}
