use crate::app::App;
use crate::input::{InputAction, PointerAction};

pub fn dispatch(app: &mut App, action: InputAction) {
    let now = app.now();
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::ToggleLog => app.show_log = !app.show_log,
        InputAction::CloseOverlay => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.show_log = false;
            }
        }
        InputAction::Tap => app.tap(now),
        InputAction::Activate => app.activate(now),
        InputAction::Retry => app.retry(now),
        InputAction::Swipe(direction) => app.swipe(direction, now),
        InputAction::Reset => app.reset(now),
    }
}

pub fn dispatch_pointer(app: &mut App, action: PointerAction) {
    let now = app.now();
    match action {
        PointerAction::Press { x, y } => app.pointer_down(x, y, now),
        PointerAction::Release { x, y } => app.pointer_up(x, y, now),
    }
}
