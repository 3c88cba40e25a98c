//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI and
//! translates keyboard events into `core::Action` values for the [`Session`].
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (generating or rendering): draws every ~80ms so the spinner and
//!   elapsed time move.
//! - **Idle**: sleeps up to 500ms, only redraws on input or when a background
//!   result arrives.
//!
//! A `SteadyBlock` cursor is used because `set_cursor_position` resets the
//! terminal's blink timer on every `draw()`.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect};
use crate::core::session::Session;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    CodeViewState, ExampleGalleryState, GalleryEvent, InputBox, InputEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which panel receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Gallery,
}

/// TUI-specific presentation state (not part of the session)
pub struct TuiState {
    pub input_box: InputBox,
    pub gallery: ExampleGalleryState,
    pub focus: Focus,
    /// Code panel visibility, Ctrl+T
    pub show_code: bool,
    pub code_view: CodeViewState,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input_box: InputBox::new(),
            gallery: ExampleGalleryState::new(),
            focus: Focus::Input, // User expects to type immediately
            show_code: true,
            code_view: CodeViewState::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Runs the interactive client until the user quits.
///
/// Must be called from inside a tokio runtime: submissions spawn tasks.
pub fn run(mut session: Session) -> std::io::Result<()> {
    let gateway_url = session.gateway_url().to_string();
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    let start_time = Instant::now();
    let mut needs_redraw = true;

    let result = loop {
        let animating = session.state.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            if let Err(e) = terminal
                .draw(|f| ui::draw_ui(f, &session.state, &gateway_url, &mut tui, spinner_frame))
            {
                break Err(e);
            }
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut session, &mut tui, event) {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break Ok(());
        }

        // Results from the generate and poll tasks
        if session.try_drain() {
            needs_redraw = true;
        }
    };

    ratatui::restore();
    result
}

/// Routes one terminal event. Returns true when the app should exit.
fn handle_event(session: &mut Session, tui: &mut TuiState, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => session.dispatch(Action::Quit) == Effect::Quit,
        TuiEvent::Escape => {
            if session.state.error.is_some() {
                session.dispatch(Action::DismissError);
                false
            } else {
                session.dispatch(Action::Quit) == Effect::Quit
            }
        }
        TuiEvent::FocusNext => {
            tui.focus = match tui.focus {
                Focus::Input => Focus::Gallery,
                Focus::Gallery => Focus::Input,
            };
            false
        }
        TuiEvent::ToggleCode => {
            tui.show_code = !tui.show_code;
            false
        }
        TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown => {
            tui.code_view.handle_event(&event);
            false
        }
        // Typing while the gallery is focused goes to the input box
        TuiEvent::InputChar(_) | TuiEvent::Paste(_) if tui.focus == Focus::Gallery => {
            tui.focus = Focus::Input;
            tui.input_box.handle_event(&event);
            false
        }
        _ => {
            match tui.focus {
                Focus::Input => {
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        submit(session, tui, text);
                    }
                }
                Focus::Gallery => {
                    if let Some(GalleryEvent::Pick(prompt)) = tui.gallery.handle_event(&event) {
                        debug!("Example picked: {}", prompt);
                        tui.input_box.set_text(prompt);
                        tui.focus = Focus::Input;
                        submit(session, tui, prompt.to_string());
                    }
                }
            }
            false
        }
    }
}

fn submit(session: &mut Session, tui: &mut TuiState, text: String) {
    if let Effect::SpawnGenerate { submission, .. } = session.dispatch(Action::Submit(text)) {
        debug!("Submission {} dispatched from TUI", submission);
        tui.show_code = true;
        tui.code_view.reset_scroll();
    }
}
