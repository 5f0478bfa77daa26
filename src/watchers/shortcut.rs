use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key chord matched before any mode-specific handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    modifiers: KeyModifiers,
    /// Codes that terminals report for the chord
    codes: Vec<KeyCode>,
}

impl Shortcut {
    pub fn new(modifiers: KeyModifiers, codes: Vec<KeyCode>) -> Self {
        Self { modifiers, codes }
    }

    /// Ctrl+/ (most terminals send it as Ctrl+7 or Ctrl+_)
    pub fn focus_search() -> Self {
        Self::new(
            KeyModifiers::CONTROL,
            vec![KeyCode::Char('/'), KeyCode::Char('7'), KeyCode::Char('_')],
        )
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.modifiers.contains(self.modifiers) && self.codes.contains(&key.code)
    }
}

/// Global shortcut listener; only reports matches while started
#[derive(Debug)]
pub struct ShortcutWatcher {
    shortcut: Shortcut,
    active: bool,
}

impl ShortcutWatcher {
    pub fn new(shortcut: Shortcut) -> Self {
        Self {
            shortcut,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// True when the key is the chord and should be consumed
    pub fn observe(&self, key: &KeyEvent) -> bool {
        self.active && self.shortcut.matches(key)
    }
}
