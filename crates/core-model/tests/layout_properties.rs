//! Layout and scroll properties exercised through the public model API.

use core_model::wrap::{LayoutRequest, WrapMode, layout};
use core_model::{DisplayCursor, EditorModel};
use core_state::{EditorState, Options};
use core_text::{TextStore, char_width};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => proptest::char::range('a', 'z'),
            1 => Just('\n'),
            1 => Just('漢'),
        ],
        0..120,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn no_wrap_model(text: &str) -> EditorModel {
    let options = Options {
        word_wrap: false,
        ..Options::default()
    };
    EditorModel::new(EditorState::new(TextStore::from_text(text), options))
}

#[test]
fn wrap_example_layout() {
    let req = LayoutRequest::new(10, 3, WrapMode::Wrap);
    let store = TextStore::from_text("abcdefghijKLMNO");
    let out = layout(&req, store.chars_before(), store.chars_after());
    assert_eq!(out.rows, vec!["abcdefghij", "KLMNO"]);
    assert_eq!(out.cursor, DisplayCursor::new(1, 5));
}

#[test]
fn full_width_line_then_break_is_a_single_row() {
    let req = LayoutRequest::new(10, 5, WrapMode::Wrap);
    let store = TextStore::from_text("abcdefghij\nxyz");
    let out = layout(&req, store.chars_before(), store.chars_after());
    assert_eq!(out.rows, vec!["abcdefghij", "xyz"]);
}

#[test]
fn long_line_scrolls_out_and_back() {
    let mut model = no_wrap_model(&"a".repeat(1000));
    model.resize(20, 5);
    let check = |model: &EditorModel| {
        let column = model.cursor_xy().column;
        let left = model.view().hscroll.left();
        assert!(left <= column && column - left <= 20, "column {column} left {left}");
    };
    model.set_cursor_index(0);
    check(&model);
    model.set_cursor_index(999);
    check(&model);
    assert!(model.view().hscroll.left() > 0);
    for _ in 0..999 {
        model.move_left();
        check(&model);
    }
    assert_eq!(model.cursor_index(), 0);
    assert_eq!(model.view().hscroll.left(), 0);
}

proptest! {
    // rows are a function of the text alone, not of where the cursor splits it
    #[test]
    fn rows_independent_of_split(
        text in text_strategy(),
        width in 1usize..12,
        height in 1usize..30,
        split_seed in 0usize..200,
    ) {
        let chars: Vec<char> = text.chars().collect();
        let split = split_seed % (chars.len() + 1);
        let req = LayoutRequest::new(width, height, WrapMode::Wrap);
        let split_out = layout(&req, chars[..split].iter().copied(), chars[split..].iter().copied());
        let whole_out = layout(&req, chars.iter().copied(), std::iter::empty());
        prop_assert_eq!(split_out.rows, whole_out.rows);
    }

    // every row fits the width and the window never exceeds the height
    #[test]
    fn rows_fit_geometry(
        text in text_strategy(),
        width in 1usize..12,
        height in 1usize..10,
        top_row in 0usize..10,
        left_offset in 0usize..10,
        wrap in any::<bool>(),
    ) {
        let req = LayoutRequest {
            width,
            height,
            top_row,
            left_offset,
            mode: WrapMode::from_word_wrap(wrap),
        };
        let out = layout(&req, text.chars(), std::iter::empty());
        prop_assert!(out.rows.len() <= height);
        for row in &out.rows {
            prop_assert!(row.chars().count() <= width);
            if wrap && row.chars().count() > 1 {
                let cells: usize = row.chars().map(char_width).sum();
                prop_assert!(cells <= width, "row {:?} is {} cells wide", row, cells);
            }
        }
        prop_assert!(out.cursor.row < height);
        prop_assert!(out.cursor.col < width);
    }

    // after display_layout the cursor is always inside the window
    #[test]
    fn model_keeps_cursor_visible(
        text in text_strategy(),
        width in 1usize..12,
        height in 1usize..8,
        cursor_seed in 0usize..200,
        wrap in any::<bool>(),
    ) {
        let options = Options { word_wrap: wrap, ..Options::default() };
        let mut model = EditorModel::new(EditorState::new(TextStore::from_text(&text), options));
        let len = model.state().store.len();
        model.set_cursor_index((cursor_seed % (len + 1)) as isize);
        let out = model.display_layout(width, height);
        prop_assert!(out.cursor_visible);
    }
}
