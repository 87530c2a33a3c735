use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use forcedeck_core::Direction;

/// Approximate pixel size of one terminal cell, so drag thresholds read the
/// same as on a touch screen.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    ToggleLog,
    CloseOverlay,
    Tap,
    Activate,
    Retry,
    Swipe(Direction),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Press { x: f64, y: f64 },
    Release { x: f64, y: f64 },
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::CloseOverlay,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Char(' ') => InputAction::Tap,
        KeyCode::Up => InputAction::Swipe(Direction::Up),
        KeyCode::Down => InputAction::Swipe(Direction::Down),
        KeyCode::Left => InputAction::Swipe(Direction::Left),
        KeyCode::Right => InputAction::Swipe(Direction::Right),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Reset,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Char('r') => InputAction::Retry,
        KeyCode::Char('l') => InputAction::ToggleLog,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        _ => InputAction::None,
    }
}

pub fn map_mouse(mouse: MouseEvent) -> Option<PointerAction> {
    let x = f64::from(mouse.column) * CELL_WIDTH_PX;
    let y = f64::from(mouse.row) * CELL_HEIGHT_PX;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerAction::Press { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerAction::Release { x, y }),
        _ => None,
    }
}
