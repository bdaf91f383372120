use super::BrowserLayout;
use crate::domain::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// What a key press or mouse event asks the browser to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application
    Quit,
    /// Show the next image
    Next,
    /// Show the previous image
    Previous,
    /// Jump to the first image
    First,
    /// Jump to the last image
    Last,
    /// Show the image at this list index
    Select(usize),
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => Action::Quit,

        // Previous
        (KeyCode::Left | KeyCode::Up | KeyCode::PageUp, KeyModifiers::NONE) => Action::Previous,
        (KeyCode::Char('h' | 'k' | 'p'), KeyModifiers::NONE) => Action::Previous,

        // Next
        (KeyCode::Right | KeyCode::Down | KeyCode::PageDown, KeyModifiers::NONE) => Action::Next,
        (KeyCode::Char('l' | 'j' | 'n' | ' '), KeyModifiers::NONE) => Action::Next,

        // Ends of the list
        (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => Action::First,
        (KeyCode::End, _) => Action::Last,
        (KeyCode::Char('G'), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::Last,

        // Help: ? (some terminals report the shift)
        (KeyCode::Char('?'), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::Help,

        _ => Action::None,
    }
}

/// Maps mouse events to actions using the layout of the last drawn frame
pub fn handle_mouse_event(mouse: MouseEvent, layout: &BrowserLayout, state: &AppState) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => layout.hit_test(mouse.column, mouse.row, state),
        MouseEventKind::ScrollDown => Action::Next,
        MouseEventKind::ScrollUp => Action::Previous,
        _ => Action::None,
    }
}

/// Maps keys while the help overlay is open: anything that would quit or toggle help closes it
pub fn handle_help_input(key: KeyEvent) -> bool {
    matches!(
        handle_key_event(key),
        Action::Help | Action::Quit | Action::None
    )
}
