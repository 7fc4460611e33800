//! Modal dialogs: About, error messages and the path prompt used for Open/Save.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

pub const ABOUT_TITLE: &str = "About Pythonico";

pub const ABOUT_TEXT: &str = concat!(
    "Pythonico ",
    env!("CARGO_PKG_VERSION"),
    "\n\nA small editor for Python source files.\n",
    "Line numbers, syntax highlighting, undo/redo and word count.\n\n",
    "Press Enter or Esc to close."
);

/// What the path prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    Open,
    Save,
}

impl PromptPurpose {
    pub fn title(self) -> &'static str {
        match self {
            Self::Open => "Open File",
            Self::Save => "Save File",
        }
    }
}

/// Single-line path input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrompt {
    purpose: PromptPurpose,
    input: String,
    /// Cursor as a char index into `input`.
    cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Cancelled,
    Submitted(PathBuf),
}

impl PathPrompt {
    pub fn new(purpose: PromptPurpose, initial: &str) -> Self {
        Self {
            purpose,
            input: initial.to_string(),
            cursor: initial.chars().count(),
        }
    }

    pub fn purpose(&self) -> PromptPurpose {
        self.purpose
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map_or(self.input.len(), |(idx, _)| idx)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        let len = self.input.chars().count();
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return PromptOutcome::Cancelled,
            (_, KeyCode::Enter) => {
                let path = self.input.trim();
                if !path.is_empty() {
                    return PromptOutcome::Submitted(PathBuf::from(path));
                }
            }
            (_, KeyCode::Left) => self.cursor = self.cursor.saturating_sub(1),
            (_, KeyCode::Right) => self.cursor = (self.cursor + 1).min(len),
            (_, KeyCode::Home) => self.cursor = 0,
            (_, KeyCode::End) => self.cursor = len,
            (_, KeyCode::Backspace) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                }
            }
            (_, KeyCode::Delete) => {
                if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                }
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.input.clear();
                self.cursor = 0;
            }
            (mods, KeyCode::Char(c)) if !mods.contains(KeyModifiers::CONTROL) => {
                let at = self.byte_index(self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
            }
            _ => {}
        }
        PromptOutcome::Pending
    }

    /// Insert pasted text (newlines dropped).
    pub fn paste(&mut self, text: &str) {
        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            let at = self.byte_index(self.cursor);
            self.input.insert(at, c);
            self.cursor += 1;
        }
    }
}

/// The modal currently covering the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    About,
    Message { title: String, text: String },
    Prompt(PathPrompt),
}

impl Dialog {
    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::About => ABOUT_TITLE,
            Self::Message { title, .. } => title,
            Self::Prompt(prompt) => prompt.purpose().title(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(prompt: &mut PathPrompt, text: &str) {
        for c in text.chars() {
            assert_eq!(prompt.handle_key(key(KeyCode::Char(c))), PromptOutcome::Pending);
        }
    }

    #[test]
    fn test_prompt_editing() {
        let mut prompt = PathPrompt::new(PromptPurpose::Open, "");
        type_str(&mut prompt, "mian.py");
        for _ in 0..5 {
            prompt.handle_key(key(KeyCode::Left));
        }
        prompt.handle_key(key(KeyCode::Backspace));
        prompt.handle_key(key(KeyCode::Right));
        type_str(&mut prompt, "i");
        assert_eq!(prompt.input(), "main.py");
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptOutcome::Submitted(PathBuf::from("main.py"))
        );
    }

    #[test]
    fn test_prompt_unicode_backspace() {
        let mut prompt = PathPrompt::new(PromptPurpose::Save, "文件.py");
        assert_eq!(prompt.cursor(), 5);
        prompt.handle_key(key(KeyCode::Home));
        prompt.handle_key(key(KeyCode::Right));
        prompt.handle_key(key(KeyCode::Right));
        prompt.handle_key(key(KeyCode::Backspace));
        assert_eq!(prompt.input(), "文.py");
        assert_eq!(prompt.cursor(), 1);
    }

    #[test]
    fn test_empty_prompt_does_not_submit() {
        let mut prompt = PathPrompt::new(PromptPurpose::Open, "  ");
        assert_eq!(prompt.handle_key(key(KeyCode::Enter)), PromptOutcome::Pending);
        assert_eq!(prompt.handle_key(key(KeyCode::Esc)), PromptOutcome::Cancelled);
    }

    #[test]
    fn test_paste_drops_newlines() {
        let mut prompt = PathPrompt::new(PromptPurpose::Open, "");
        prompt.paste("/tmp/a.py\r\n");
        assert_eq!(prompt.input(), "/tmp/a.py");
    }

    #[test]
    fn test_dialog_titles() {
        assert_eq!(Dialog::About.title(), ABOUT_TITLE);
        assert_eq!(Dialog::error("Open failed", "nope").title(), "Open failed");
        assert_eq!(
            Dialog::Prompt(PathPrompt::new(PromptPurpose::Save, "")).title(),
            "Save File"
        );
    }
}
