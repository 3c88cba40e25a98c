//! # TitleBar Component
//!
//! Top status line: app name, lifecycle phase, status text and the gateway
//! the client talks to.
//!
//! Purely presentational. Every field is a prop copied from `SessionState`
//! each frame, so tests can build one with a struct literal.
//!
//! ```text
//! Genimate | Rendering | Rendering animation... 40% | http://127.0.0.1:3000
//! ```

use crate::core::state::Phase;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar<'a> {
    pub phase: Phase,
    pub status_message: &'a str,
    pub gateway_url: &'a str,
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let phase_color = match self.phase {
            Phase::Idle => Color::Gray,
            Phase::Submitting | Phase::Polling => Color::Yellow,
            Phase::Completed => Color::Green,
            Phase::Failed => Color::Red,
        };
        let separator = Span::styled(" | ", Style::default().fg(Color::DarkGray));

        let mut spans = vec![
            Span::styled(
                "Genimate",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            separator.clone(),
            Span::styled(self.phase.label(), Style::default().fg(phase_color)),
        ];
        if !self.status_message.is_empty() {
            spans.push(separator.clone());
            spans.push(Span::raw(self.status_message));
        }
        spans.push(separator);
        spans.push(Span::styled(
            self.gateway_url,
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(Line::from(spans), area);
    }
}
