use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use log::warn;
use std::time::Duration;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global
    ForceQuit,   // Ctrl+C
    Escape,      // dismiss error, otherwise quit
    FocusNext,   // Tab
    ToggleCode,  // Ctrl+T
    Resize,

    // Editing / selection
    Submit,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,

    // Code viewer
    ScrollPageUp,
    ScrollPageDown,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Failed to poll terminal events: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => map_event(event),
        Err(e) => {
            warn!("Failed to read terminal event: {}", e);
            None
        }
    }
}

fn map_event(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Key release events arrive when keyboard enhancement is on
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (KeyModifiers::CONTROL, KeyCode::Char('t')) => Some(TuiEvent::ToggleCode),
                // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
                (KeyModifiers::CONTROL, KeyCode::Char('j')) => Some(TuiEvent::InputChar('\n')),
                (KeyModifiers::CONTROL, _) => None,
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Tab) | (_, KeyCode::BackTab) => Some(TuiEvent::FocusNext),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollPageUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollPageDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Option<TuiEvent> {
        map_event(Event::Key(KeyEvent::new(code, modifiers)))
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(key(KeyModifiers::CONTROL, KeyCode::Char('c')), Some(TuiEvent::ForceQuit));
        assert_eq!(key(KeyModifiers::CONTROL, KeyCode::Char('t')), Some(TuiEvent::ToggleCode));
        assert_eq!(
            key(KeyModifiers::CONTROL, KeyCode::Char('j')),
            Some(TuiEvent::InputChar('\n'))
        );
        assert_eq!(key(KeyModifiers::CONTROL, KeyCode::Char('x')), None);
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(key(KeyModifiers::NONE, KeyCode::Char('t')), Some(TuiEvent::InputChar('t')));
        assert_eq!(key(KeyModifiers::SHIFT, KeyCode::Char('T')), Some(TuiEvent::InputChar('T')));
        assert_eq!(key(KeyModifiers::NONE, KeyCode::Tab), Some(TuiEvent::FocusNext));
        assert_eq!(key(KeyModifiers::NONE, KeyCode::Esc), Some(TuiEvent::Escape));
        assert_eq!(key(KeyModifiers::NONE, KeyCode::Enter), Some(TuiEvent::Submit));
    }

    #[test]
    fn test_resize_and_paste() {
        assert_eq!(map_event(Event::Resize(80, 24)), Some(TuiEvent::Resize));
        assert_eq!(
            map_event(Event::Paste("a\nb".into())),
            Some(TuiEvent::Paste("a\nb".into()))
        );
    }
}
