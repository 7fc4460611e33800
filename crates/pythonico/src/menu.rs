//! Keyboard-driven menu bar.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Commands reachable from the menu bar (and their accelerators).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    Save,
    Exit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    About,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub accelerator: &'static str,
    pub action: MenuAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    /// Letter that opens the menu together with `Alt`.
    pub mnemonic: char,
    pub items: &'static [MenuItem],
}

const fn item(label: &'static str, accelerator: &'static str, action: MenuAction) -> MenuItem {
    MenuItem {
        label,
        accelerator,
        action,
    }
}

/// File, Edit and Help, in display order.
pub const MENUS: [Menu; 3] = [
    Menu {
        title: "File",
        mnemonic: 'f',
        items: &[
            item("Open...", "Ctrl+O", MenuAction::Open),
            item("Save", "Ctrl+S", MenuAction::Save),
            item("Exit", "Ctrl+Q", MenuAction::Exit),
        ],
    },
    Menu {
        title: "Edit",
        mnemonic: 'e',
        items: &[
            item("Undo", "Ctrl+Z", MenuAction::Undo),
            item("Redo", "Ctrl+Y", MenuAction::Redo),
            item("Cut", "Ctrl+X", MenuAction::Cut),
            item("Copy", "Ctrl+C", MenuAction::Copy),
            item("Paste", "Ctrl+V", MenuAction::Paste),
            item("Select All", "Ctrl+A", MenuAction::SelectAll),
        ],
    },
    Menu {
        title: "Help",
        mnemonic: 'h',
        items: &[item("About", "", MenuAction::About)],
    },
];

/// What a key press did to the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The key was consumed; the menu stays open.
    Consumed,
    /// The menu was dismissed.
    Closed,
    /// An item was activated (the menu is closed).
    Activate(MenuAction),
}

/// Open/closed state of the menu bar.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MenuBar {
    open: Option<usize>,
    selected: usize,
}

impl MenuBar {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Index of the open menu, if any.
    pub fn open_menu(&self) -> Option<usize> {
        self.open
    }

    /// Highlighted item of the open menu.
    pub fn selected_item(&self) -> usize {
        self.selected
    }

    pub fn open(&mut self, menu: usize) {
        self.open = Some(menu % MENUS.len());
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open = None;
        self.selected = 0;
    }

    /// Menu opened by `Alt+<letter>`, if any.
    pub fn menu_for_mnemonic(letter: char) -> Option<usize> {
        let letter = letter.to_ascii_lowercase();
        MENUS.iter().position(|menu| menu.mnemonic == letter)
    }

    /// Handle a key while the menu bar is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> MenuOutcome {
        let Some(open) = self.open else {
            return MenuOutcome::Closed;
        };
        let items = MENUS[open].items;

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) | (_, KeyCode::F(10)) => {
                self.close();
                MenuOutcome::Closed
            }
            (_, KeyCode::Left) => {
                self.open(open + MENUS.len() - 1);
                MenuOutcome::Consumed
            }
            (_, KeyCode::Right) => {
                self.open(open + 1);
                MenuOutcome::Consumed
            }
            (_, KeyCode::Up) => {
                self.selected = (self.selected + items.len() - 1) % items.len();
                MenuOutcome::Consumed
            }
            (_, KeyCode::Down) => {
                self.selected = (self.selected + 1) % items.len();
                MenuOutcome::Consumed
            }
            (_, KeyCode::Enter) => {
                let action = items[self.selected].action;
                self.close();
                MenuOutcome::Activate(action)
            }
            (mods, KeyCode::Char(c)) if mods.contains(KeyModifiers::ALT) => {
                if let Some(menu) = Self::menu_for_mnemonic(c) {
                    self.open(menu);
                }
                MenuOutcome::Consumed
            }
            // First letter of an item label activates it.
            (_, KeyCode::Char(c)) => {
                let c = c.to_ascii_lowercase();
                match items
                    .iter()
                    .find(|item| item.label.to_ascii_lowercase().starts_with(c))
                {
                    Some(item) => {
                        let action = item.action;
                        self.close();
                        MenuOutcome::Activate(action)
                    }
                    None => MenuOutcome::Consumed,
                }
            }
            _ => MenuOutcome::Consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_menu_layout() {
        let titles: Vec<_> = MENUS.iter().map(|m| m.title).collect();
        assert_eq!(titles, ["File", "Edit", "Help"]);
        let file: Vec<_> = MENUS[0].items.iter().map(|i| i.action).collect();
        assert_eq!(
            file,
            [MenuAction::Open, MenuAction::Save, MenuAction::Exit]
        );
        assert_eq!(MENUS[1].items.len(), 6);
        assert_eq!(MENUS[2].items[0].action, MenuAction::About);
    }

    #[test]
    fn test_navigation_wraps_and_activates() {
        let mut bar = MenuBar::default();
        bar.open(1);
        assert_eq!(bar.handle_key(key(KeyCode::Up)), MenuOutcome::Consumed);
        assert_eq!(bar.selected_item(), 5);
        assert_eq!(
            bar.handle_key(key(KeyCode::Enter)),
            MenuOutcome::Activate(MenuAction::SelectAll)
        );
        assert!(!bar.is_open());
    }

    #[test]
    fn test_left_right_switch_menus() {
        let mut bar = MenuBar::default();
        bar.open(0);
        bar.handle_key(key(KeyCode::Left));
        assert_eq!(bar.open_menu(), Some(2));
        bar.handle_key(key(KeyCode::Right));
        assert_eq!(bar.open_menu(), Some(0));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(MenuBar::menu_for_mnemonic('F'), Some(0));
        assert_eq!(MenuBar::menu_for_mnemonic('e'), Some(1));
        assert_eq!(MenuBar::menu_for_mnemonic('h'), Some(2));
        assert_eq!(MenuBar::menu_for_mnemonic('x'), None);

        let mut bar = MenuBar::default();
        bar.open(0);
        assert_eq!(
            bar.handle_key(key(KeyCode::Char('e'))),
            MenuOutcome::Activate(MenuAction::Exit)
        );
    }

    #[test]
    fn test_escape_closes() {
        let mut bar = MenuBar::default();
        bar.open(2);
        assert_eq!(bar.handle_key(key(KeyCode::Esc)), MenuOutcome::Closed);
        assert_eq!(bar.open_menu(), None);
    }
}
