//! Rendering.
//!
//! Screen layout, top to bottom: menu bar, gutter + editor, status bar. Menus and dialogs are
//! drawn over the editor.

use crate::app::App;
use crate::config::AppConfig;
use crate::dialog::{ABOUT_TEXT, Dialog, PathPrompt};
use crate::menu::MENUS;
use pythonico_core::{HighlightSpan, Position, StyleId, style_at};
use pythonico_highlight::python_style;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
};
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cells taken by `ch` when it starts at display column `x`.
fn cell_width(ch: char, x: usize, tab_stop: usize) -> usize {
    if ch == '\t' {
        let tab_stop = tab_stop.max(1);
        tab_stop - x % tab_stop
    } else if ch.is_control() {
        1
    } else {
        ch.width().unwrap_or(1)
    }
}

/// Display column of character `column` in `text`, with tabs expanded.
pub fn display_column(text: &str, column: usize, tab_stop: usize) -> usize {
    text.chars()
        .take(column)
        .fold(0, |x, ch| x + cell_width(ch, x, tab_stop))
}

/// Terminal style for a highlight style id.
pub fn highlight_style(style_id: StyleId) -> Style {
    match python_style(style_id) {
        Some(text_style) => {
            let fg = text_style.foreground;
            let style = Style::new().fg(Color::Rgb(fg.0, fg.1, fg.2));
            if text_style.bold {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        }
        None => Style::new(),
    }
}

/// Accumulates same-style runs into spans.
struct LineBuilder {
    spans: Vec<Span<'static>>,
    run: String,
    style: Style,
}

impl LineBuilder {
    fn new(style: Style) -> Self {
        Self {
            spans: Vec::new(),
            run: String::new(),
            style,
        }
    }

    fn push(&mut self, ch: char, style: Style) {
        if style != self.style && !self.run.is_empty() {
            self.spans
                .push(Span::styled(std::mem::take(&mut self.run), self.style));
        }
        self.style = style;
        self.run.push(ch);
    }

    fn push_blank(&mut self, count: usize, style: Style) {
        for _ in 0..count {
            self.push(' ', style);
        }
    }

    fn finish(mut self) -> Line<'static> {
        if !self.run.is_empty() {
            self.spans.push(Span::styled(self.run, self.style));
        }
        Line::from(self.spans)
    }
}

/// Render one block clipped to display columns `scroll_left..scroll_left + width`.
///
/// `selection` is in characters; an end past the block's length marks the line break as
/// selected and draws one extra selected cell.
pub fn render_line(
    text: &str,
    spans: &[HighlightSpan],
    selection: Option<Range<usize>>,
    scroll_left: usize,
    width: usize,
    config: &AppConfig,
) -> Line<'static> {
    let base = Style::new()
        .fg(config.editor_foreground)
        .bg(config.editor_background);
    let right = scroll_left + width;
    let selected = |col: usize| selection.as_ref().is_some_and(|r| r.contains(&col));

    let mut builder = LineBuilder::new(base);
    let mut x = 0;
    for (col, ch) in text.chars().enumerate() {
        if x >= right {
            break;
        }

        let mut style = base;
        if let Some(style_id) = style_at(spans, col) {
            style = style.patch(highlight_style(style_id));
        }
        if selected(col) {
            style = style.bg(config.selection_background);
        }

        let w = cell_width(ch, x, config.tab_stop);
        if w == 0 {
            if (scroll_left..right).contains(&x) {
                builder.push(ch, style);
            }
            continue;
        }

        let visible_start = x.max(scroll_left);
        let visible_end = (x + w).min(right);
        if visible_end > visible_start {
            let clipped = x < scroll_left || x + w > right;
            if ch == '\t' || clipped {
                builder.push_blank(visible_end - visible_start, style);
            } else if ch.is_control() {
                builder.push('\u{FFFD}', style);
            } else {
                builder.push(ch, style);
            }
        }
        x += w;
    }

    let len = text.chars().count();
    if x < right && x >= scroll_left && selection.as_ref().is_some_and(|r| r.end > len) {
        builder.push(' ', base.bg(config.selection_background));
    }

    builder.finish()
}

/// Selected character range of `line`, given ordered selection bounds.
fn line_selection(line: usize, start: Position, end: Position, len: usize) -> Option<Range<usize>> {
    if line < start.line || line > end.line {
        return None;
    }
    let from = if line == start.line { start.column } else { 0 };
    let to = if line == end.line { end.column } else { len + 1 };
    (from < to).then_some(from..to)
}

/// A `width` x `height` rectangle centered in `area` (clamped to it).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draw the whole application.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let (min_cols, min_rows) = app.config().min_size_cells();
    if area.width < min_cols || area.height < min_rows {
        draw_too_small(frame, area, min_cols, min_rows);
        return;
    }

    let [menu_area, body, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let gutter_width = app.editor().gutter().width(1) as u16;
    let [gutter_area, editor_area] =
        Layout::horizontal([Constraint::Length(gutter_width), Constraint::Min(1)]).areas(body);

    app.set_viewport(editor_area.height as usize, editor_area.width as usize);

    draw_gutter(frame, gutter_area, app);
    draw_editor(frame, editor_area, app);
    draw_status(frame, status_area, app);
    draw_menu_bar(frame, menu_area, app);

    if let Some(open) = app.menu().open_menu() {
        draw_menu_dropdown(frame, menu_area, open, app.menu().selected_item());
    }
    if let Some(dialog) = app.dialog() {
        draw_dialog(frame, area, dialog);
    }
}

fn draw_too_small(frame: &mut Frame, area: Rect, min_cols: u16, min_rows: u16) {
    let text = format!(
        "Window too small\n{}x{} (need at least {}x{})",
        area.width, area.height, min_cols, min_rows
    );
    let rect = centered_rect(area.width, 2, area);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rect,
    );
}

fn draw_gutter(frame: &mut Frame, area: Rect, app: &App) {
    let config = app.config();
    let style = Style::new()
        .fg(config.gutter_foreground)
        .bg(config.gutter_background);
    let lines: Vec<Line> = app
        .editor()
        .gutter()
        .visible_labels()
        .map(|(_, label)| Line::from(label))
        .collect();
    frame.render_widget(Paragraph::new(lines).style(style), area);
}

fn draw_editor(frame: &mut Frame, area: Rect, app: &App) {
    let config = app.config();
    let editor = app.editor();
    let buffer = editor.buffer();
    let (scroll_top, scroll_left) = app.scroll();
    let selection = editor.selection();
    let width = area.width as usize;

    let lines: Vec<Line> = (scroll_top..editor.block_count())
        .take(area.height as usize)
        .map(|line| {
            let text = buffer.block_text(line).unwrap_or_default();
            let selected = selection.and_then(|(start, end)| {
                line_selection(line, start, end, buffer.block_char_len(line))
            });
            render_line(&text, editor.spans(line), selected, scroll_left, width, config)
        })
        .collect();

    let base = Style::new()
        .fg(config.editor_foreground)
        .bg(config.editor_background);
    frame.render_widget(Paragraph::new(lines).style(base), area);

    if app.menu().is_open() || app.dialog().is_some() {
        return;
    }
    let cursor = editor.cursor();
    if cursor.line < scroll_top || cursor.line >= scroll_top + area.height as usize {
        return;
    }
    let text = buffer.block_text(cursor.line).unwrap_or_default();
    let x = display_column(&text, cursor.column, config.tab_stop);
    if x < scroll_left || x >= scroll_left + width {
        return;
    }
    frame.set_cursor_position((
        area.x + (x - scroll_left) as u16,
        area.y + (cursor.line - scroll_top) as u16,
    ));
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let config = app.config();
    let style = Style::new()
        .fg(config.editor_foreground)
        .bg(config.gutter_background);
    let status = app.editor().status().status_line();

    let mut spans = vec![Span::raw(format!(" {status}"))];
    if let Some(notice) = app.notice() {
        let used = status.width() + 1;
        let gap = (area.width as usize).saturating_sub(used + notice.width() + 1);
        spans.push(Span::raw(" ".repeat(gap.max(2))));
        spans.push(Span::styled(
            notice.to_string(),
            Style::new().add_modifier(Modifier::ITALIC),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

/// Start column of each menu title in the menu bar.
fn menu_title_offsets() -> Vec<u16> {
    let mut x = 1;
    MENUS
        .iter()
        .map(|menu| {
            let at = x;
            x += menu.title.len() as u16 + 2;
            at
        })
        .collect()
}

fn draw_menu_bar(frame: &mut Frame, area: Rect, app: &App) {
    let base = Style::new().fg(Color::Black).bg(Color::Rgb(0xe4, 0xe4, 0xe4));
    let open = app.menu().open_menu();

    let mut spans = vec![Span::raw(" ")];
    for (idx, menu) in MENUS.iter().enumerate() {
        let style = if open == Some(idx) {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        };
        spans.push(Span::styled(format!(" {} ", menu.title), style));
    }

    let title = app.window_title();
    let used: usize = spans.iter().map(|span| span.content.width()).sum();
    let gap = (area.width as usize).saturating_sub(used + title.width() + 1);
    spans.push(Span::raw(" ".repeat(gap)));
    spans.push(Span::styled(title, base.add_modifier(Modifier::BOLD)));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}

fn draw_menu_dropdown(frame: &mut Frame, menu_area: Rect, open: usize, selected: usize) {
    let menu = &MENUS[open];
    let label_width = menu.items.iter().map(|i| i.label.len()).max().unwrap_or(0);
    let accel_width = menu
        .items
        .iter()
        .map(|i| i.accelerator.len())
        .max()
        .unwrap_or(0);
    let inner_width = label_width + accel_width + 4;

    let x = menu_area.x + menu_title_offsets()[open];
    let rect = Rect::new(
        x,
        menu_area.y + 1,
        inner_width as u16 + 2,
        menu.items.len() as u16 + 2,
    )
    .intersection(frame.area());

    let base = Style::new().fg(Color::Black).bg(Color::Rgb(0xf8, 0xf8, 0xf8));
    let lines: Vec<Line> = menu
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let text = format!(
                " {:<label_width$}  {:>accel_width$} ",
                item.label, item.accelerator
            );
            let style = if idx == selected {
                base.add_modifier(Modifier::REVERSED)
            } else {
                base
            };
            Line::styled(text, style)
        })
        .collect();

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).style(base).block(Block::bordered()),
        rect,
    );
}

fn draw_dialog(frame: &mut Frame, area: Rect, dialog: &Dialog) {
    let style = Style::new().fg(Color::Black).bg(Color::Rgb(0xf8, 0xf8, 0xf8));
    let block = Block::bordered().title(format!(" {} ", dialog.title()));

    match dialog {
        Dialog::About => {
            let rect = centered_rect(56, 10, area);
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(ABOUT_TEXT)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: false })
                    .style(style)
                    .block(block),
                rect,
            );
        }
        Dialog::Message { text, .. } => {
            let rect = centered_rect(60, 8, area);
            let body = format!("{text}\n\n[ OK ]");
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(body)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .style(style)
                    .block(block),
                rect,
            );
        }
        Dialog::Prompt(prompt) => {
            let rect = centered_rect(64, 5, area);
            let inner_width = rect.width.saturating_sub(2) as usize;
            let label = "Path: ";
            let field_width = inner_width.saturating_sub(label.len() + 1);
            let (visible, cursor_x) = prompt_view(prompt, field_width);
            let lines = vec![
                Line::from(format!("{label}{visible}")),
                Line::from(""),
                Line::from("Enter: confirm   Esc: cancel"),
            ];
            frame.render_widget(Clear, rect);
            frame.render_widget(Paragraph::new(lines).style(style).block(block), rect);
            frame.set_cursor_position((
                rect.x + 1 + (label.len() + cursor_x) as u16,
                rect.y + 1,
            ));
        }
    }
}

/// Tail of the prompt input that keeps the cursor within `width` cells, plus the cursor's
/// cell offset inside it.
fn prompt_view(prompt: &PathPrompt, width: usize) -> (String, usize) {
    let chars: Vec<char> = prompt.input().chars().collect();
    let cursor = prompt.cursor().min(chars.len());
    let mut start = 0;
    let prefix_width = |from: usize| -> usize {
        chars[from..cursor]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    };
    while start < cursor && prefix_width(start) >= width.max(1) {
        start += 1;
    }
    (chars[start..].iter().collect(), prefix_width(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardBridge;
    use crate::dialog::PromptPurpose;
    use pretty_assertions::assert_eq;
    use pythonico_highlight::{
        PYTHON_STYLE_COMMENT, PYTHON_STYLE_KEYWORD, PythonStyles, RegexHighlighter,
    };
    use ratatui::{Terminal, backend::TestBackend};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_display_column_expands_tabs_and_wide_chars() {
        assert_eq!(display_column("\tx", 1, 4), 4);
        assert_eq!(display_column("ab\tx", 3, 4), 4);
        assert_eq!(display_column("你好x", 2, 4), 4);
        assert_eq!(display_column("abc", 10, 4), 3);
    }

    #[test]
    fn test_highlight_styles() {
        let keyword = highlight_style(PYTHON_STYLE_KEYWORD);
        assert_eq!(keyword.fg, Some(Color::Rgb(0, 0, 0xFF)));
        assert!(keyword.add_modifier.contains(Modifier::BOLD));
        assert_eq!(
            highlight_style(PYTHON_STYLE_COMMENT).fg,
            Some(Color::Rgb(0xD8, 0xBF, 0xD8))
        );
        assert_eq!(highlight_style(0), Style::new());
    }

    #[test]
    fn test_render_line_styles_runs() {
        let config = AppConfig::default();
        let spans = [HighlightSpan::new(0, 2, PYTHON_STYLE_KEYWORD)];
        let line = render_line("if x:", &spans, None, 0, 80, &config);
        assert_eq!(line_text(&line), "if x:");
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "if");
        assert_eq!(line.spans[0].style.fg, Some(Color::Rgb(0, 0, 0xFF)));
        assert_eq!(line.spans[1].style.bg, Some(config.editor_background));
    }

    #[test]
    fn test_render_line_tabs_and_selection() {
        let config = AppConfig::default();
        let line = render_line("\tab", &[], Some(1..4), 0, 80, &config);
        assert_eq!(line_text(&line), "    ab ");
        let last = line.spans.last().unwrap();
        assert_eq!(last.content, "ab ");
        assert_eq!(last.style.bg, Some(config.selection_background));
    }

    #[test]
    fn test_render_line_horizontal_clip() {
        let config = AppConfig::default();
        let line = render_line("a你好bcdef", &[], None, 2, 4, &config);
        // '你' straddles the left edge and is blanked.
        assert_eq!(line_text(&line), " 好b");
        let line = render_line("abcdef", &[], None, 0, 3, &config);
        assert_eq!(line_text(&line), "abc");
    }

    #[test]
    fn test_line_selection_ranges() {
        let start = Position::new(1, 2);
        let end = Position::new(3, 1);
        assert_eq!(line_selection(0, start, end, 5), None);
        assert_eq!(line_selection(1, start, end, 5), Some(2..6));
        assert_eq!(line_selection(2, start, end, 0), Some(0..1));
        assert_eq!(line_selection(3, start, end, 5), Some(0..1));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 80, 25);
        assert_eq!(centered_rect(40, 5, area), Rect::new(20, 10, 40, 5));
        assert_eq!(centered_rect(100, 50, area), area);
    }

    #[test]
    fn test_prompt_view_keeps_cursor_visible() {
        let prompt = PathPrompt::new(PromptPurpose::Open, "/a/very/long/path.py");
        let (visible, cursor_x) = prompt_view(&prompt, 10);
        assert_eq!(visible, "g/path.py");
        assert_eq!(cursor_x, 9);
    }

    fn test_app() -> App {
        let highlighter = RegexHighlighter::python(PythonStyles::default()).unwrap();
        App::new(AppConfig::default(), highlighter, ClipboardBridge::local())
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_draw_full_screen() {
        let mut terminal = Terminal::new(TestBackend::new(80, 25)).unwrap();
        let mut app = test_app();
        for c in "import os".chars() {
            app.handle_key_event(crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char(c),
                crossterm::event::KeyModifiers::NONE,
            ));
        }
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        assert!(row(&terminal, 0).starts_with("  File  Edit  Help "));
        assert!(row(&terminal, 0).trim_end().ends_with("Pythonico*"));
        assert!(row(&terminal, 1).starts_with("1 import os"));
        assert!(row(&terminal, 24).starts_with(" Line: 1/1  Column: 10    Words: 2"));

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 1)].bg, Color::Rgb(0xf0, 0xf0, 0xf0));
        assert_eq!(buffer[(2, 1)].fg, Color::Rgb(0, 0, 0xFF));
        assert_eq!(buffer[(20, 5)].bg, Color::Rgb(253, 246, 227));
    }

    #[test]
    fn test_draw_too_small() {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let mut app = test_app();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        let screen: String = (0..10).map(|y| row(&terminal, y)).collect();
        assert!(screen.contains("Window too small"));
    }
}
