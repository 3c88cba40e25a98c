//! # Preview Component
//!
//! Right-hand result panel. What it shows depends on the session, checked in
//! this order:
//!
//! 1. an error, with a hint to dismiss it
//! 2. progress while generating or rendering
//! 3. the finished video with timings
//! 4. an idle placeholder

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Gauge, Padding, Paragraph, Wrap};

use crate::core::state::{Phase, SessionState};
use crate::tui::component::Component;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Preview<'a> {
    pub state: &'a SessionState,
    pub spinner_frame: usize,
}

impl Preview<'_> {
    fn block(&self) -> Block<'static> {
        let border_color = match self.state.phase {
            Phase::Failed => Color::Red,
            Phase::Completed => Color::Green,
            _ => Color::DarkGray,
        };
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(" Preview ")
            .padding(Padding::new(2, 2, 1, 1))
    }

    fn error_lines(error: &str) -> Vec<Line<'static>> {
        vec![
            Line::styled(
                "Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::styled(error.to_owned(), Style::default().fg(Color::Red)),
            Line::default(),
            Line::styled("Esc to dismiss", Style::default().fg(Color::DarkGray)),
        ]
    }

    fn loading_lines(&self) -> Vec<Line<'static>> {
        let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{glyph} "), Style::default().fg(Color::Yellow)),
            Span::raw(self.state.status_message.clone()),
        ])];
        if let Some(job_id) = &self.state.job_id {
            lines.push(Line::styled(
                format!("Job {job_id}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(elapsed) = self.state.elapsed_seconds() {
            lines.push(Line::styled(
                format!("Elapsed: {elapsed:.1}s"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines
    }

    fn completed_lines(&self) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::styled(
                "Animation ready",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
        ];
        if let Some(path) = &self.state.video_path {
            lines.push(Line::from(vec![
                Span::styled("Video: ", label),
                Span::styled(path.clone(), Style::default().fg(Color::Cyan)),
            ]));
        }
        if let Some(secs) = self.state.render_duration_seconds {
            lines.push(Line::raw(format!("Backend rendering time: {secs:.2} seconds.")));
        }
        if let Some(secs) = self.state.total_duration_seconds {
            lines.push(Line::raw(format!("Total time to display: {secs:.2} seconds.")));
        }
        lines.push(Line::default());
        lines.push(Line::styled("Ctrl+T toggles the code view", label));
        lines
    }

    fn idle_lines() -> Vec<Line<'static>> {
        vec![
            Line::styled(
                "Ready to Create",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::styled(
                "Describe an animation and press Enter, or pick an example.",
                Style::default().fg(Color::DarkGray),
            ),
        ]
    }
}

impl Component for Preview<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = if let Some(error) = &self.state.error {
            Self::error_lines(error)
        } else if self.state.is_loading {
            self.loading_lines()
        } else if self.state.phase == Phase::Completed {
            self.completed_lines()
        } else {
            Self::idle_lines()
        };

        let show_gauge = self.state.error.is_none() && self.state.is_loading;
        let [text_area, gauge_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(show_gauge as u16)])
                .areas(inner);

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            text_area,
        );

        if show_gauge {
            let gauge = match self.state.progress {
                Some(percent) => Gauge::default()
                    .percent(u16::from(percent.min(100)))
                    .label(format!("{percent}%")),
                None => Gauge::default().percent(0).label("waiting for renderer"),
            };
            frame.render_widget(
                gauge.gauge_style(Style::default().fg(Color::Yellow).bg(Color::Black)),
                gauge_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(state: &SessionState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
        terminal
            .draw(|f| {
                Preview {
                    state,
                    spinner_frame: 0,
                }
                .render(f, f.area())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_idle_placeholder() {
        let text = render_text(&SessionState::new());
        assert!(text.contains("Ready to Create"));
    }

    #[test]
    fn test_error_wins_over_everything() {
        let state = SessionState {
            phase: Phase::Failed,
            error: Some("Failed to render animation".into()),
            video_path: Some("/videos/old.mp4".into()),
            ..SessionState::new()
        };
        let text = render_text(&state);
        assert!(text.contains("Failed to render animation"));
        assert!(text.contains("Esc to dismiss"));
        assert!(!text.contains("/videos/old.mp4"));
    }

    #[test]
    fn test_loading_shows_status_and_progress() {
        let state = SessionState {
            phase: Phase::Polling,
            is_loading: true,
            job_id: Some("abc123".into()),
            progress: Some(40),
            status_message: "Rendering animation...".into(),
            ..SessionState::new()
        };
        let text = render_text(&state);
        assert!(text.contains("Rendering animation..."));
        assert!(text.contains("Job abc123"));
        assert!(text.contains("40%"));
    }

    #[test]
    fn test_completed_shows_video_and_timings() {
        let state = SessionState {
            phase: Phase::Completed,
            video_path: Some("/videos/abc123.mp4".into()),
            render_duration_seconds: Some(12.4),
            total_duration_seconds: Some(15.0),
            ..SessionState::new()
        };
        let text = render_text(&state);
        assert!(text.contains("/videos/abc123.mp4"));
        assert!(text.contains("Backend rendering time: 12.40 seconds."));
        assert!(text.contains("Total time to display: 15.00 seconds."));
    }
}
