//! Key bindings: normal and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Pop the group under the cursor; confirms in menus.
    Pop,
    Pause,
    Restart,
    Quit,
    None,
}

/// Map key event to game action. Supports both normal (arrows, space) and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p' | 'P') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Left | KeyCode::Char('h') => Action::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::CursorRight,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Pop,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_and_vim_keys_agree() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::CursorLeft);
        assert_eq!(key_to_action(key(KeyCode::Char('h'))), Action::CursorLeft);
        assert_eq!(key_to_action(key(KeyCode::Down)), Action::CursorDown);
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), Action::CursorDown);
    }

    #[test]
    fn test_pop_keys() {
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Pop);
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::Pop);
    }

    #[test]
    fn test_modifiers() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
        let alt_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_r), Action::None);
        let shift_r = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shift_r), Action::Restart);
    }
}
