use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

/// Converts a crossterm event. Key releases, mouse and resize events map to `None`.
pub fn from_crossterm(ev: crossterm::event::Event) -> Option<InputEvent> {
    use crossterm::event::Event;
    use crossterm::event::KeyEventKind;

    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            key_from_crossterm(key).map(InputEvent::Key)
        }
        Event::Paste(s) => Some(InputEvent::Paste(s)),
        _ => None,
    }
}

fn key_from_crossterm(key: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    use crossterm::event::KeyCode as Ct;
    use crossterm::event::KeyModifiers as CtMods;

    let code = match key.code {
        Ct::Char(c) => KeyCode::Char(c),
        Ct::Enter => KeyCode::Enter,
        Ct::Backspace => KeyCode::Backspace,
        Ct::Delete => KeyCode::Delete,
        Ct::Tab => KeyCode::Tab,
        Ct::BackTab => KeyCode::BackTab,
        Ct::Esc => KeyCode::Esc,
        Ct::Left => KeyCode::Left,
        Ct::Right => KeyCode::Right,
        Ct::Up => KeyCode::Up,
        Ct::Down => KeyCode::Down,
        Ct::Home => KeyCode::Home,
        Ct::End => KeyCode::End,
        Ct::PageUp => KeyCode::PageUp,
        Ct::PageDown => KeyCode::PageDown,
        _ => return None,
    };

    // Shift is already folded into the character and into BackTab.
    let shift = key.modifiers.contains(CtMods::SHIFT)
        && !matches!(code, KeyCode::Char(_) | KeyCode::BackTab);

    Some(KeyEvent {
        code,
        modifiers: KeyModifiers {
            shift,
            ctrl: key.modifiers.contains(CtMods::CONTROL),
            alt: key.modifiers.contains(CtMods::ALT),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossterm_keys_convert_and_releases_drop() {
        let mut key = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('e'),
            crossterm::event::KeyModifiers::NONE,
        );
        assert_eq!(
            from_crossterm(crossterm::event::Event::Key(key)),
            Some(InputEvent::Key(KeyEvent::new(KeyCode::Char('e'))))
        );
        let upper = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('G'),
            crossterm::event::KeyModifiers::SHIFT,
        );
        assert_eq!(
            from_crossterm(crossterm::event::Event::Key(upper)),
            Some(InputEvent::Key(KeyEvent::new(KeyCode::Char('G'))))
        );
        key.kind = crossterm::event::KeyEventKind::Release;
        assert_eq!(from_crossterm(crossterm::event::Event::Key(key)), None);
    }
}
