//! # Code View Component
//!
//! Scrollable, syntax-highlighted view of the generated Manim script.
//! Highlighting runs once per distinct script and is cached in
//! `CodeViewState`.

use std::sync::LazyLock;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::tui::event::TuiEvent;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

/// Lines moved per PageUp/PageDown or wheel tick
const SCROLL_STEP: u16 = 5;

#[derive(Default)]
pub struct CodeViewState {
    pub scroll: u16,
    source: String,
    lines: Vec<Line<'static>>,
}

impl CodeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    pub fn handle_event(&mut self, event: &TuiEvent) {
        let max = self.max_scroll();
        match event {
            TuiEvent::ScrollPageUp => self.scroll = self.scroll.saturating_sub(SCROLL_STEP),
            TuiEvent::ScrollPageDown => {
                self.scroll = self.scroll.saturating_add(SCROLL_STEP).min(max)
            }
            _ => {}
        }
    }

    /// Last line index, capped to what a `u16` scroll offset can reach.
    fn max_scroll(&self) -> u16 {
        u16::try_from(self.lines.len().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn sync(&mut self, code: &str) {
        if self.source != code {
            self.source = code.to_string();
            self.lines = highlight_python(code);
            self.scroll = self.scroll.min(self.max_scroll());
        }
    }
}

/// Highlights `code` as Python, falling back to plain lines when the syntax
/// or theme is unavailable.
pub fn highlight_python(code: &str) -> Vec<Line<'static>> {
    let code = code.replace('\t', "    ");

    let (Some(syntax), Some(theme)) = (
        SYNTAX_SET.find_syntax_by_token("python"),
        THEME_SET.themes.get(THEME),
    ) else {
        return plain_lines(&code);
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(&code) {
        let Ok(ranges) = highlighter.highlight_line(line, &SYNTAX_SET) else {
            return plain_lines(&code);
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, fragment)| {
                let content = fragment.trim_end_matches(['\n', '\r']);
                if content.is_empty() {
                    return None;
                }
                let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn plain_lines(code: &str) -> Vec<Line<'static>> {
    code.lines()
        .map(|l| Line::styled(l.to_owned(), Style::default().fg(Color::White)))
        .collect()
}

pub struct CodeView<'a> {
    state: &'a mut CodeViewState,
    code: &'a str,
}

impl<'a> CodeView<'a> {
    pub fn new(state: &'a mut CodeViewState, code: &'a str) -> Self {
        Self { state, code }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.code);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Generated Code ")
            .title_bottom(Line::from(" PgUp/PgDn scroll  Ctrl+T hide ").centered());

        let body = if self.state.lines.is_empty() {
            Paragraph::new(Line::styled(
                "No code yet.",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.state.lines.clone()).scroll((self.state.scroll, 0))
        };
        frame.render_widget(body.block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const SCRIPT: &str = "from manim import *\n\nclass Ball(Scene):\n    def construct(self):\n        self.play(Create(Circle()))\n";

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlight_keeps_every_line() {
        let lines = highlight_python(SCRIPT);
        assert_eq!(lines.len(), SCRIPT.lines().count());
        assert_eq!(line_text(&lines[0]), "from manim import *");
        assert!(lines[1].spans.is_empty());
        assert_eq!(line_text(&lines[3]), "    def construct(self):");
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = CodeViewState::new();
        state.sync(SCRIPT);
        state.handle_event(&TuiEvent::ScrollPageUp);
        assert_eq!(state.scroll, 0);
        for _ in 0..5 {
            state.handle_event(&TuiEvent::ScrollPageDown);
        }
        assert_eq!(state.scroll, (SCRIPT.lines().count() - 1) as u16);
    }

    #[test]
    fn test_scroll_saturates_on_huge_scripts() {
        let mut state = CodeViewState::new();
        state.lines = vec![Line::default(); 70_000];
        state.scroll = u16::MAX - 2;
        state.handle_event(&TuiEvent::ScrollPageDown);
        assert_eq!(state.scroll, u16::MAX);
        state.handle_event(&TuiEvent::ScrollPageDown);
        assert_eq!(state.scroll, u16::MAX);
    }

    #[test]
    fn test_render_shows_code_and_title() {
        let mut state = CodeViewState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| CodeView::new(&mut state, SCRIPT).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Generated Code"));
        assert!(text.contains("class Ball(Scene):"));
    }
}
