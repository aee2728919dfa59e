//! Terminal events to state-machine events.

use ratatui::crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracker_core::nav::{Event, Key};

/// `None` for events the state machine has no use for, including key
/// releases and repeats.
pub fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) => translate_key(key).map(Event::Key),
        TermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Key::CtrlC);
    }
    let key = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert!(matches!(
            translate(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::Key(Key::CtrlC))
        ));
    }

    #[test]
    fn test_other_ctrl_chords_ignored() {
        assert!(translate(press(KeyCode::Char('x'), KeyModifiers::CONTROL)).is_none());
    }

    #[test]
    fn test_shifted_chars_pass_through() {
        assert!(matches!(
            translate(press(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(Event::Key(Key::Char('Q')))
        ));
    }

    #[test]
    fn test_releases_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(translate(TermEvent::Key(release)).is_none());
    }

    #[test]
    fn test_resize() {
        assert!(matches!(
            translate(TermEvent::Resize(160, 40)),
            Some(Event::Resize {
                width: 160,
                height: 40
            })
        ));
    }
}
