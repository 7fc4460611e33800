//! Application state and input dispatch.

use crate::clipboard::ClipboardBridge;
use crate::config::AppConfig;
use crate::dialog::{Dialog, PathPrompt, PromptOutcome, PromptPurpose};
use crate::menu::{MenuAction, MenuBar, MenuOutcome};
use crate::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pythonico_core::{Editor, load_document, save_document};
use pythonico_highlight::RegexHighlighter;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct App {
    config: AppConfig,
    editor: Editor,
    file_path: Option<PathBuf>,
    menu: MenuBar,
    dialog: Option<Dialog>,
    clipboard: ClipboardBridge,
    /// First visible block.
    scroll_top: usize,
    /// First visible display column.
    scroll_left: usize,
    viewport_height: usize,
    viewport_width: usize,
    /// Short message shown next to the status text until the next key.
    notice: Option<String>,
    last_insert_time: Option<Instant>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, highlighter: RegexHighlighter, clipboard: ClipboardBridge) -> Self {
        Self {
            config,
            editor: Editor::new("", highlighter),
            file_path: None,
            menu: MenuBar::default(),
            dialog: None,
            clipboard,
            scroll_top: 0,
            scroll_left: 0,
            viewport_height: 0,
            viewport_width: 0,
            notice: None,
            last_insert_time: None,
            should_quit: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn menu(&self) -> &MenuBar {
        &self.menu
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn scroll(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_left)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// `Pythonico`, plus the file name and a `*` while there are unsaved changes.
    pub fn window_title(&self) -> String {
        let modified = if self.editor.is_modified() { "*" } else { "" };
        match self
            .file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy())
        {
            Some(name) => format!("{} - {name}{modified}", self.config.title),
            None => format!("{}{modified}", self.config.title),
        }
    }

    /// Record the editor area size (in cells) and keep the cursor visible.
    pub fn set_viewport(&mut self, height: usize, width: usize) {
        self.viewport_height = height;
        self.viewport_width = width;
        self.adjust_scroll();
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.dialog.is_some() {
            self.handle_dialog_key(key);
            return;
        }

        if self.menu.is_open() {
            if let MenuOutcome::Activate(action) = self.menu.handle_key(key) {
                self.run_action(action);
            }
            return;
        }

        self.notice = None;
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let page = self.page_size();

        match (key.modifiers, key.code) {
            (_, KeyCode::F(10)) => self.menu.open(0),
            (mods, KeyCode::Char(c)) if mods.contains(KeyModifiers::ALT) && !ctrl => {
                if let Some(menu) = MenuBar::menu_for_mnemonic(c) {
                    self.menu.open(menu);
                }
            }

            (KeyModifiers::CONTROL, KeyCode::Char('o')) => self.run_action(MenuAction::Open),
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.run_action(MenuAction::Save),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => self.run_action(MenuAction::Exit),
            (KeyModifiers::CONTROL, KeyCode::Char('z')) => self.run_action(MenuAction::Undo),
            (KeyModifiers::CONTROL, KeyCode::Char('y')) => self.run_action(MenuAction::Redo),
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => self.run_action(MenuAction::Cut),
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.run_action(MenuAction::Copy),
            (KeyModifiers::CONTROL, KeyCode::Char('v')) => self.run_action(MenuAction::Paste),
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => self.run_action(MenuAction::SelectAll),

            (_, KeyCode::Left) => self.editor.move_left(shift),
            (_, KeyCode::Right) => self.editor.move_right(shift),
            (_, KeyCode::Up) => self.editor.move_up(shift),
            (_, KeyCode::Down) => self.editor.move_down(shift),
            (_, KeyCode::Home) if ctrl => self.editor.move_document_start(shift),
            (_, KeyCode::End) if ctrl => self.editor.move_document_end(shift),
            (_, KeyCode::Home) => self.editor.move_home(shift),
            (_, KeyCode::End) => self.editor.move_end(shift),
            (_, KeyCode::PageUp) => self.editor.move_page(-page, shift),
            (_, KeyCode::PageDown) => self.editor.move_page(page, shift),

            (_, KeyCode::Backspace) => self.editor.backspace(),
            (_, KeyCode::Delete) => self.editor.delete_forward(),
            (_, KeyCode::Enter) => self.editor.insert_newline(),
            (_, KeyCode::Tab) => self.type_char('\t'),
            // AltGr arrives as Ctrl+Alt on Windows.
            (mods, KeyCode::Char(c)) if !ctrl || mods.contains(KeyModifiers::ALT) => {
                self.type_char(c)
            }

            _ => {}
        }

        self.adjust_scroll();
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self.dialog.as_mut() {
            Some(Dialog::Prompt(prompt)) => prompt.paste(text),
            Some(_) => {}
            None => {
                self.editor.paste(text);
                self.adjust_scroll();
            }
        }
    }

    /// Close the open undo group after a typing pause.
    pub fn maybe_end_undo_group_after_idle(&mut self) {
        if let Some(last) = self.last_insert_time
            && last.elapsed() >= self.config.undo_group_idle
        {
            self.editor.end_undo_group();
            self.last_insert_time = None;
        }
    }

    fn type_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.editor.insert_text(c.encode_utf8(&mut buf));
        self.last_insert_time = Some(Instant::now());
    }

    fn page_size(&self) -> isize {
        self.viewport_height.saturating_sub(1).max(1) as isize
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        match dialog {
            Dialog::About | Dialog::Message { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.dialog = None;
                }
            }
            Dialog::Prompt(prompt) => {
                let purpose = prompt.purpose();
                match prompt.handle_key(key) {
                    PromptOutcome::Pending => {}
                    PromptOutcome::Cancelled => self.dialog = None,
                    PromptOutcome::Submitted(path) => {
                        self.dialog = None;
                        match purpose {
                            PromptPurpose::Open => self.open_file(&path),
                            PromptPurpose::Save => self.save_file(&path),
                        }
                    }
                }
            }
        }
    }

    pub fn run_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Open => {
                let initial = self.prompt_default_path();
                self.dialog = Some(Dialog::Prompt(PathPrompt::new(PromptPurpose::Open, &initial)));
            }
            MenuAction::Save => match self.file_path.clone() {
                Some(path) => self.save_file(&path),
                None => {
                    let initial = self.prompt_default_path();
                    self.dialog =
                        Some(Dialog::Prompt(PathPrompt::new(PromptPurpose::Save, &initial)));
                }
            },
            MenuAction::Exit => {
                tracing::info!(modified = self.editor.is_modified(), "exit requested");
                self.should_quit = true;
            }
            MenuAction::Undo => {
                self.editor.undo();
            }
            MenuAction::Redo => {
                self.editor.redo();
            }
            MenuAction::Cut => {
                if let Some(text) = self.editor.cut() {
                    self.clipboard.set_text(&text);
                }
            }
            MenuAction::Copy => {
                if let Some(text) = self.editor.selected_text() {
                    self.clipboard.set_text(&text);
                }
            }
            MenuAction::Paste => {
                let text = self.clipboard.get_text();
                if !text.is_empty() {
                    self.editor.paste(&text);
                }
            }
            MenuAction::SelectAll => self.editor.select_all(),
            MenuAction::About => self.dialog = Some(Dialog::About),
        }
        self.adjust_scroll();
    }

    /// Current file path, or empty.
    fn prompt_default_path(&self) -> String {
        match self.file_path() {
            Some(path) => path.display().to_string(),
            None => String::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------------

    /// Load `path` into the editor. On failure the buffer is left untouched.
    pub fn open_file(&mut self, path: &Path) {
        match load_document(path) {
            Ok(doc) => {
                self.editor.set_text(&doc.text);
                self.file_path = Some(path.to_path_buf());
                self.scroll_top = 0;
                self.scroll_left = 0;
                self.last_insert_time = None;
                self.notice = Some(format!("Opened {}", path.display()));
                tracing::info!(
                    path = %path.display(),
                    blocks = self.editor.block_count(),
                    line_ending = doc.original_line_ending.label(),
                    "file opened"
                );
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "open failed");
                self.dialog = Some(Dialog::error("Open failed", err.to_string()));
            }
        }
    }

    /// Write the buffer to `path`. On failure the file on disk is left untouched.
    pub fn save_file(&mut self, path: &Path) {
        match save_document(path, &self.editor.text()) {
            Ok(()) => {
                self.editor.mark_saved();
                self.file_path = Some(path.to_path_buf());
                self.notice = Some(format!("Saved {}", path.display()));
                tracing::info!(path = %path.display(), "file saved");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "save failed");
                self.dialog = Some(Dialog::error("Save failed", err.to_string()));
            }
        }
    }

    // ---------------------------------------------------------------------
    // Scrolling
    // ---------------------------------------------------------------------

    /// Scroll only as far as needed to bring the cursor into view.
    fn adjust_scroll(&mut self) {
        let cursor = self.editor.cursor();

        if self.viewport_height > 0 {
            if cursor.line < self.scroll_top {
                self.scroll_top = cursor.line;
            }
            if cursor.line >= self.scroll_top + self.viewport_height {
                self.scroll_top = cursor.line + 1 - self.viewport_height;
            }
            let max_scroll_top = self
                .editor
                .block_count()
                .saturating_sub(self.viewport_height);
            self.scroll_top = self.scroll_top.min(max_scroll_top);
        }

        if self.viewport_width > 0 {
            let text = self
                .editor
                .buffer()
                .block_text(cursor.line)
                .unwrap_or_default();
            let x = ui::display_column(&text, cursor.column, self.config.tab_stop);
            if x < self.scroll_left {
                self.scroll_left = x;
            }
            if x >= self.scroll_left + self.viewport_width {
                self.scroll_left = x + 1 - self.viewport_width;
            }
        }

        let last_visible = (self.scroll_top + self.viewport_height.max(1)).saturating_sub(1);
        self.editor.set_viewport(self.scroll_top, last_visible);
    }
}
