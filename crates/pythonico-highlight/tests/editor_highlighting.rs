//! Python highlighting driven through the editing core.

use pretty_assertions::assert_eq;
use pythonico_core::{BufferEvent, Editor, HighlightSpan, Position, style_at};
use pythonico_highlight::{
    PYTHON_STYLE_COMMENT, PYTHON_STYLE_KEYWORD, PYTHON_STYLE_STRING, PythonStyles,
    RegexHighlighter,
};
use std::cell::RefCell;
use std::rc::Rc;

fn editor(text: &str) -> Editor {
    let highlighter = RegexHighlighter::python(PythonStyles::default()).unwrap();
    Editor::new(text, highlighter)
}

#[test]
fn test_if_return_document() {
    let mut editor = editor("if x == 1:\n    return None\n");
    assert_eq!(editor.block_count(), 3);
    assert_eq!(
        editor.spans(0),
        &[HighlightSpan::new(0, 2, PYTHON_STYLE_KEYWORD)]
    );
    assert_eq!(
        editor.spans(1),
        &[
            HighlightSpan::new(4, 6, PYTHON_STYLE_KEYWORD),
            HighlightSpan::new(11, 4, PYTHON_STYLE_KEYWORD),
        ]
    );
    assert!(editor.spans(2).is_empty());

    editor.move_cursor_to(Position::new(1, 15), false);
    assert_eq!(
        editor.status().status_line(),
        "Line: 2/3  Column: 16    Words: 6"
    );
}

#[test]
fn test_unterminated_string_document() {
    let editor = editor("'unterminated\n");
    assert!(editor.spans(0).is_empty());
    assert!(editor.spans(1).is_empty());
}

#[test]
fn test_typing_closes_a_string_and_rehighlights() {
    let mut editor = editor("x = 'abc");
    assert!(editor.spans(0).is_empty());

    editor.move_document_end(false);
    editor.insert_text("'");
    assert_eq!(
        editor.spans(0),
        &[HighlightSpan::new(4, 5, PYTHON_STYLE_STRING)]
    );

    editor.insert_text(" # done");
    assert_eq!(style_at(editor.spans(0), 10), Some(PYTHON_STYLE_COMMENT));
    assert_eq!(style_at(editor.spans(0), 2), None);

    assert!(editor.undo());
    assert_eq!(editor.text(), "x = 'abc'");
    assert!(editor.undo());
    assert_eq!(editor.text(), "x = 'abc");
    assert!(editor.spans(0).is_empty());
}

#[test]
fn test_splitting_a_line_rehighlights_both_halves() {
    let mut editor = editor("import os # comment");
    editor.move_cursor_to(Position::new(0, 9), false);
    editor.insert_newline();

    assert_eq!(editor.text(), "import os\n# comment");
    assert_eq!(
        editor.spans(0),
        &[HighlightSpan::new(0, 6, PYTHON_STYLE_KEYWORD)]
    );
    assert_eq!(
        editor.spans(1),
        &[HighlightSpan::new(0, 9, PYTHON_STYLE_COMMENT)]
    );
}

#[test]
fn test_content_events_name_rehighlighted_blocks() {
    let mut editor = editor("a\nb\nc");
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = lines.clone();
    editor.subscribe(move |change| {
        if let BufferEvent::BlockContentChanged { line } = change.event {
            sink.borrow_mut().push(line);
        }
    });

    editor.move_cursor_to(Position::new(1, 1), false);
    editor.paste(" if\nelse");
    assert_eq!(editor.text(), "a\nb if\nelse\nc");
    assert_eq!(lines.borrow().as_slice(), &[1, 2]);
    assert_eq!(
        editor.spans(1),
        &[HighlightSpan::new(2, 2, PYTHON_STYLE_KEYWORD)]
    );
    assert_eq!(
        editor.spans(2),
        &[HighlightSpan::new(0, 4, PYTHON_STYLE_KEYWORD)]
    );
}

#[test]
fn test_bulk_load_highlights_every_block() {
    let mut editor = editor("");
    editor.set_text("def f():\r\n    pass\r\n");
    assert_eq!(editor.block_count(), 3);
    assert_eq!(
        editor.spans(0),
        &[HighlightSpan::new(0, 3, PYTHON_STYLE_KEYWORD)]
    );
    assert_eq!(
        editor.spans(1),
        &[HighlightSpan::new(4, 4, PYTHON_STYLE_KEYWORD)]
    );
}
