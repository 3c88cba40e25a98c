use crate::core::state::SessionState;
use crate::tui::component::Component;
use crate::tui::components::{CodeView, ExampleGallery, Preview, TitleBar};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

const HELP: &str = " Enter generate · Tab switch focus · Ctrl+T code · PgUp/PgDn scroll · Esc dismiss/quit ";

/// Draws one frame.
///
/// ```text
/// ┌ title ───────────────────────────────────────────┐
/// │ input           │ preview                        │
/// │ gallery         │ code (Ctrl+T, once available)  │
/// └ help ────────────────────────────────────────────┘
/// ```
pub fn draw_ui(
    frame: &mut Frame,
    state: &SessionState,
    gateway_url: &str,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    use Constraint::{Length, Min, Percentage};

    let [title_area, body_area, help_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());
    let [left_area, right_area] =
        Layout::horizontal([Percentage(45), Percentage(55)]).areas(body_area);

    TitleBar {
        phase: state.phase,
        status_message: &state.status_message,
        gateway_url,
    }
    .render(frame, title_area);

    // Left column: description form above the gallery
    tui.input_box.focused = tui.focus == Focus::Input;
    tui.input_box.busy = state.is_loading;
    let input_height = tui.input_box.calculate_height(left_area.width);
    let [input_area, gallery_area] =
        Layout::vertical([Length(input_height), Min(0)]).areas(left_area);
    tui.input_box.render(frame, input_area);
    ExampleGallery::new(&mut tui.gallery, tui.focus == Focus::Gallery).render(frame, gallery_area);

    // Right column: preview, with the code below it when toggled on
    let mut preview = Preview {
        state,
        spinner_frame,
    };
    if tui.show_code && !state.code.is_empty() {
        let [preview_area, code_area] =
            Layout::vertical([Percentage(40), Percentage(60)]).areas(right_area);
        preview.render(frame, preview_area);
        CodeView::new(&mut tui.code_view, &state.code).render(frame, code_area);
    } else {
        preview.render(frame, right_area);
    }

    frame.render_widget(
        Line::styled(HELP, Style::default().fg(Color::DarkGray)),
        help_area,
    );
}
