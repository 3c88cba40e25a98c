//! # Example Gallery Component
//!
//! Selectable list of quick-start prompts. Picking one copies its prompt into
//! the input box and submits it.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ExampleGalleryState` lives in `TuiState`
//! - `ExampleGallery` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding};

use crate::core::gallery::{EXAMPLES, Example};
use crate::tui::event::TuiEvent;

pub struct ExampleGalleryState {
    pub examples: &'static [Example],
    pub selected: usize,
    pub list_state: ListState,
}

impl ExampleGalleryState {
    pub fn new() -> Self {
        Self::with_examples(EXAMPLES)
    }

    pub fn with_examples(examples: &'static [Example]) -> Self {
        let mut list_state = ListState::default();
        if !examples.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            examples,
            selected: 0,
            list_state,
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<GalleryEvent> {
        match event {
            TuiEvent::CursorUp => {
                if !self.examples.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if !self.examples.is_empty() {
                    self.selected = (self.selected + 1).min(self.examples.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => self
                .examples
                .get(self.selected)
                .map(|example| GalleryEvent::Pick(example.prompt)),
            _ => None,
        }
    }
}

impl Default for ExampleGalleryState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// Prompt text of the chosen example
    Pick(&'static str),
}

pub struct ExampleGallery<'a> {
    state: &'a mut ExampleGalleryState,
    focused: bool,
}

impl<'a> ExampleGallery<'a> {
    pub fn new(state: &'a mut ExampleGalleryState, focused: bool) -> Self {
        Self { state, focused }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Examples ")
            .title_bottom(Line::from(" ↑↓ select  Enter generate ").centered())
            .padding(Padding::horizontal(1));

        // borders + padding
        let inner_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .state
            .examples
            .iter()
            .enumerate()
            .map(|(i, example)| {
                let highlighted = self.focused && i == self.state.selected;
                let title_style = if highlighted {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::White)
                };
                let tag = format!("[{}] ", example.category);
                let title_width = inner_width.saturating_sub(tag.chars().count());
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(tag, Style::default().fg(Color::Magenta)),
                        Span::styled(truncate_str(example.title, title_width), title_style),
                    ]),
                    Line::styled(
                        truncate_str(example.description, inner_width),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Truncate to `max_width` chars, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_navigation_clamps_and_picks_prompt() {
        let mut state = ExampleGalleryState::new();
        assert_eq!(state.handle_event(&TuiEvent::CursorUp), None);
        assert_eq!(state.selected, 0);

        for _ in 0..10 {
            state.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(state.selected, EXAMPLES.len() - 1);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(GalleryEvent::Pick(EXAMPLES[EXAMPLES.len() - 1].prompt))
        );
    }

    #[test]
    fn test_empty_gallery_ignores_keys() {
        let mut state = ExampleGalleryState::with_examples(&[]);
        assert_eq!(state.handle_event(&TuiEvent::CursorDown), None);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn test_truncate_str_is_char_safe() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("ααααααα", 5), "αα...");
        assert_eq!(truncate_str("abcdef", 2), "..");
    }

    #[test]
    fn test_render_lists_examples() {
        let mut state = ExampleGalleryState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| ExampleGallery::new(&mut state, true).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Examples"));
        assert!(text.contains("Mathematical Function"));
        assert!(text.contains("[Geometry]"));
    }
}
