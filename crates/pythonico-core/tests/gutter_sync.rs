//! Gutter/buffer consistency.
//!
//! After every edit the gutter must show exactly one number per block, and the block count
//! announced to subscribers must match the buffer.

use pythonico_core::{BufferEvent, Editor, PlainText, Position, count_words};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

fn record_counts(editor: &mut Editor) -> Rc<RefCell<Vec<usize>>> {
    let counts = Rc::new(RefCell::new(Vec::new()));
    let sink = counts.clone();
    editor.subscribe(move |change| {
        if let BufferEvent::BlockCountChanged { count } = change.event {
            sink.borrow_mut().push(count);
        }
    });
    counts
}

#[test]
fn test_120_pass_lines() {
    let text = "pass\n".repeat(120);
    let editor = Editor::new(text.trim_end_matches('\n'), PlainText);

    let gutter = editor.gutter();
    assert_eq!(gutter.digit_width(), 3);
    assert_eq!(gutter.line_count(), 120);

    let rendered = gutter.text();
    assert_eq!(rendered.lines().count(), 120);
    assert_eq!(rendered.lines().last(), Some("120"));
    assert_eq!(rendered.lines().next(), Some("  1"));
}

#[test]
fn test_trailing_newline_adds_a_gutter_line() {
    let editor = Editor::new(&"pass\n".repeat(120), PlainText);
    assert_eq!(editor.block_count(), 121);
    assert_eq!(editor.gutter().line_count(), 121);
}

#[test]
fn test_typing_newlines_grows_digit_width() {
    let mut editor = Editor::new("", PlainText);
    let counts = record_counts(&mut editor);

    let mut transitions = Vec::new();
    let mut last_width = editor.gutter().digit_width();
    for _ in 0..999 {
        editor.insert_newline();
        let width = editor.gutter().digit_width();
        if width != last_width {
            transitions.push((editor.block_count(), width));
            last_width = width;
        }
    }

    assert_eq!(editor.block_count(), 1000);
    assert_eq!(transitions, vec![(10, 2), (100, 3), (1000, 4)]);

    let counts = counts.borrow();
    assert_eq!(counts.len(), 999);
    assert_eq!(counts.first(), Some(&2));
    assert_eq!(counts.last(), Some(&1000));
}

#[test]
fn test_digit_width_at_nine_lines() {
    let editor = Editor::new(&"\n".repeat(8), PlainText);
    assert_eq!(editor.block_count(), 9);
    assert_eq!(editor.gutter().digit_width(), 1);
}

#[test]
fn test_undo_shrinks_gutter() {
    let mut editor = Editor::new("a", PlainText);
    editor.move_document_end(false);
    editor.paste(&"x\n".repeat(20));
    assert_eq!(editor.gutter().line_count(), 21);
    assert_eq!(editor.gutter().digit_width(), 2);

    assert!(editor.undo());
    assert_eq!(editor.gutter().line_count(), 1);
    assert_eq!(editor.gutter().digit_width(), 1);
}

#[test]
fn test_events_arrive_after_derived_state_is_updated() {
    let mut editor = Editor::new("", PlainText);
    let counts = record_counts(&mut editor);

    editor.insert_text("a\nb\nc");
    assert_eq!(counts.borrow().as_slice(), &[3]);
    assert_eq!(editor.gutter().line_count(), 3);

    editor.select_all();
    editor.backspace();
    assert_eq!(counts.borrow().as_slice(), &[3, 1]);
    assert_eq!(editor.gutter().text(), "1\n");
}

#[test]
fn test_random_edits_keep_gutter_and_word_count_in_sync() {
    let mut editor = Editor::new("def f():\n    return 1\n", PlainText);
    let counts = record_counts(&mut editor);
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        match rng.gen_range(0..8) {
            0 => editor.insert_text(["x", " ", "if ", "你好", "\t"][rng.gen_range(0..5)]),
            1 => editor.insert_newline(),
            2 => editor.paste("a b\nc\r\nd  e\n"),
            3 => editor.backspace(),
            4 => editor.delete_forward(),
            5 => {
                let line = rng.gen_range(0..editor.block_count());
                let column = rng.gen_range(0..=editor.buffer().block_char_len(line));
                editor.move_cursor_to(Position::new(line, column), rng.gen_bool(0.3));
            }
            6 => {
                editor.undo();
            }
            _ => {
                editor.redo();
            }
        }

        assert_eq!(editor.gutter().line_count(), editor.block_count());
        assert_eq!(editor.status().block_count(), editor.block_count());
        assert_eq!(editor.status().word_count(), count_words(&editor.text()));
        if let Some(last) = counts.borrow().last() {
            assert_eq!(*last, editor.block_count());
        }
        for line in 0..editor.block_count() {
            assert!(editor.spans(line).is_empty());
        }
    }
}
