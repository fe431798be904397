//! KeyTranslator: key -> Action translation by focus.
//!
//! Global chords are resolved first and apply whichever element has focus:
//! * Ctrl-S save, Ctrl-W quit, Ctrl-C force quit.
//! * Esc returns focus to the text box.
//! * Alt-Z toggles word wrap; any other Alt+letter focuses the menu bar.
//!
//! Remaining keys go to the focused element. Keys with no meaning there
//! translate to `None`.

use crate::{Action, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_model::Focus;

#[derive(Debug, Default, Clone, Copy)]
pub struct KeyTranslator;

impl KeyTranslator {
    pub fn new() -> Self {
        Self
    }

    pub fn translate(&self, focus: Focus, key: &KeyEvent) -> Option<Action> {
        if let Some(action) = global_chord(key) {
            return Some(action);
        }
        if key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            return None;
        }
        match focus {
            Focus::Text => text_key(key.code),
            Focus::Menu => menu_key(key.code),
        }
    }
}

fn global_chord(key: &KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return Some(Action::FocusText);
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let c = c.to_ascii_lowercase();
    if key.mods.contains(KeyModifiers::CTRL) {
        return match c {
            's' => Some(Action::Save),
            'w' => Some(Action::Quit),
            _ => None,
        };
    }
    if key.mods.contains(KeyModifiers::ALT) {
        return match c {
            'z' => Some(Action::ToggleWrap),
            c if c.is_ascii_alphabetic() => Some(Action::FocusMenu(c)),
            _ => None,
        };
    }
    None
}

fn text_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char(c) if !c.is_control() => Action::Insert(c),
        KeyCode::Enter => Action::Insert('\n'),
        KeyCode::Tab => Action::Insert('\t'),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Home => Action::Motion(MotionKind::LineStart),
        KeyCode::End => Action::Motion(MotionKind::LineEnd),
        _ => return None,
    };
    Some(action)
}

fn menu_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left => Some(Action::MenuMove(-1)),
        KeyCode::Right | KeyCode::Tab => Some(Action::MenuMove(1)),
        KeyCode::Enter => Some(Action::MenuActivate),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => Some(Action::FocusMenu(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kt() -> KeyTranslator {
        KeyTranslator::new()
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    fn alt(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    #[test]
    fn global_chords_apply_in_both_focus_states() {
        for focus in [Focus::Text, Focus::Menu] {
            assert_eq!(kt().translate(focus, &ctrl('s')), Some(Action::Save));
            assert_eq!(kt().translate(focus, &ctrl('w')), Some(Action::Quit));
            // Ctrl-C reaches the runtime as its own input event, never as a key.
            assert_eq!(kt().translate(focus, &ctrl('c')), None);
            assert_eq!(kt().translate(focus, &alt('z')), Some(Action::ToggleWrap));
            assert_eq!(
                kt().translate(focus, &KeyEvent::plain(KeyCode::Esc)),
                Some(Action::FocusText)
            );
        }
    }

    #[test]
    fn alt_letter_focuses_menu_with_hotkey() {
        assert_eq!(
            kt().translate(Focus::Text, &alt('F')),
            Some(Action::FocusMenu('f'))
        );
        assert_eq!(kt().translate(Focus::Text, &alt('1')), None);
    }

    #[test]
    fn text_focus_editing_keys() {
        let t = kt();
        assert_eq!(
            t.translate(Focus::Text, &KeyEvent::plain(KeyCode::Char('é'))),
            Some(Action::Insert('é'))
        );
        assert_eq!(
            t.translate(
                Focus::Text,
                &KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)
            ),
            Some(Action::Insert('A'))
        );
        assert_eq!(
            t.translate(Focus::Text, &KeyEvent::plain(KeyCode::Enter)),
            Some(Action::Insert('\n'))
        );
        assert_eq!(
            t.translate(Focus::Text, &KeyEvent::plain(KeyCode::Tab)),
            Some(Action::Insert('\t'))
        );
        assert_eq!(
            t.translate(Focus::Text, &KeyEvent::plain(KeyCode::Backspace)),
            Some(Action::Backspace)
        );
        assert_eq!(
            t.translate(Focus::Text, &KeyEvent::plain(KeyCode::Home)),
            Some(Action::Motion(MotionKind::LineStart))
        );
        assert_eq!(t.translate(Focus::Text, &ctrl('x')), None);
    }

    #[test]
    fn menu_focus_navigation() {
        let t = kt();
        assert_eq!(
            t.translate(Focus::Menu, &KeyEvent::plain(KeyCode::Left)),
            Some(Action::MenuMove(-1))
        );
        assert_eq!(
            t.translate(Focus::Menu, &KeyEvent::plain(KeyCode::Right)),
            Some(Action::MenuMove(1))
        );
        assert_eq!(
            t.translate(Focus::Menu, &KeyEvent::plain(KeyCode::Enter)),
            Some(Action::MenuActivate)
        );
        assert_eq!(
            t.translate(Focus::Menu, &KeyEvent::plain(KeyCode::Char('o'))),
            Some(Action::FocusMenu('o'))
        );
        assert_eq!(
            t.translate(Focus::Menu, &KeyEvent::plain(KeyCode::Backspace)),
            None
        );
    }
}
