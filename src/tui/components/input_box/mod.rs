//! # InputBox Component
//!
//! Multi-line description field with a character counter.
//!
//! ## Responsibilities
//!
//! - Capture text input, capped at [`MAX_DESCRIPTION_CHARS`]
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Emit `Submit` on Enter when the text is not blank
//! - Show an `n/500` counter and the submit hint
//!
//! The buffer is internal state. `focused` and `busy` are props set by the
//! parent each frame. Cursor position and scroll live in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::api::MAX_DESCRIPTION_CHARS;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary,
    wrap_line_count, wrap_options,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed on a non-blank description
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether keystrokes go here (Prop)
    pub focused: bool,
    /// A submission is in flight (Prop)
    pub busy: bool,
    cursor: CursorState,
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            focused: true,
            busy: false,
            cursor: CursorState::new(),
        }
    }

    /// Replaces the buffer, e.g. with a gallery prompt. Truncated to the cap.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        self.cursor.reset();
        self.cursor.pos = self.buffer.len();
    }

    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn remaining(&self) -> usize {
        MAX_DESCRIPTION_CHARS.saturating_sub(self.char_count())
    }

    /// Height needed for the current text, clamped to the visible window.
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let lines = wrap_line_count(&self.buffer, inner_width(content_width));
        lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn visible_text(&self, content_width: u16) -> String {
        let width = inner_width(content_width);
        if self.cursor.scroll_offset == 0 || width == 0 {
            return self.buffer.clone();
        }
        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        let accepted: String = text.chars().take(self.remaining()).collect();
        if accepted.is_empty() {
            return None;
        }
        self.buffer.insert_str(self.cursor.pos, &accepted);
        self.cursor.pos += accepted.len();
        Some(InputEvent::ContentChanged)
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_content_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let count = self.char_count();
        let counter_style = if count >= MAX_DESCRIPTION_CHARS {
            Style::default().fg(Color::Red)
        } else if count * 10 >= MAX_DESCRIPTION_CHARS * 9 {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let hint = if self.busy { " Enter: restart " } else { " Enter: generate " };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Describe your animation ")
            .title_bottom(Line::styled(hint, Style::default().fg(Color::DarkGray)).left_aligned())
            .title_bottom(
                Line::styled(format!(" {count}/{MAX_DESCRIPTION_CHARS} "), counter_style)
                    .right_aligned(),
            )
            .padding(Padding::horizontal(1));

        let input = Paragraph::new(self.visible_text(area.width))
            .block(block)
            .style(Style::default().fg(Color::White));
        frame.render_widget(input, area);

        if self.focused {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(text),
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor.pos + i);
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1, self.cursor.last_content_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1, self.cursor.last_content_width)
                .then_some(InputEvent::ContentChanged),
            // The text stays in the box so it can be tweaked and resubmitted.
            TuiEvent::Submit => {
                (!self.buffer.trim().is_empty()).then(|| InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(input: &mut InputBox, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = InputBox::new();
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('é'));
        assert_eq!(input.buffer, "aé");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "a");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "ba");
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "b");
    }

    #[test]
    fn test_input_is_capped() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("x".repeat(MAX_DESCRIPTION_CHARS - 2)));
        let res = input.handle_event(&TuiEvent::Paste("abcdef".into()));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.char_count(), MAX_DESCRIPTION_CHARS);
        assert!(input.buffer.ends_with("ab"));
        assert_eq!(input.handle_event(&TuiEvent::InputChar('z')), None);
        assert_eq!(input.char_count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_submit_keeps_text_and_ignores_blank() {
        let mut input = InputBox::new();
        input.buffer = "   ".into();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);

        input.set_text("bouncing ball");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("bouncing ball".into()))
        );
        assert_eq!(input.buffer, "bouncing ball");
    }

    #[test]
    fn test_set_text_truncates_and_moves_cursor_to_end() {
        let mut input = InputBox::new();
        input.set_text(&"y".repeat(MAX_DESCRIPTION_CHARS + 20));
        assert_eq!(input.char_count(), MAX_DESCRIPTION_CHARS);
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.char_count(), MAX_DESCRIPTION_CHARS - 1);
    }

    #[test]
    fn test_render_shows_counter() {
        let mut input = InputBox::new();
        input.set_text("spin a cube");
        let text = render_text(&mut input, 50, 4);
        assert!(text.contains("Describe your animation"));
        assert!(text.contains("11/500"));
        assert!(text.contains("spin a cube"));
    }

    #[test]
    fn test_height_grows_then_clamps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        input.set_text("1\n2\n3");
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);
        input.set_text(&"line\n".repeat(20));
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }
}
