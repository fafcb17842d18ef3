use crate::app::state::App;
use crossterm::event::KeyCode;
use market_core::Route;

mod calendar;
mod detail;
mod help;
mod list;
mod map;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    // The modal takes all input while an edition is open.
    if app.selection.is_open() {
        detail::handle_detail_input(app, key);
        return;
    }

    if handle_navigation_input(app, key) {
        return;
    }

    match app.route {
        Route::Map => map::handle_map_input(app, key),
        Route::Calendar => calendar::handle_calendar_input(app, key),
        Route::List => list::handle_list_input(app, key),
    }
}

/// Keys shared by every view. Returns whether the key was consumed.
fn handle_navigation_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Tab => app.navigate(app.route.next()),
        KeyCode::BackTab => app.navigate(app.route.previous()),
        KeyCode::Char(digit @ '1'..='3') => {
            let index = digit as usize - '1' as usize;
            if let Some(route) = Route::from_index(index) {
                app.navigate(route);
            }
        }
        KeyCode::Char('r') => app.reload(),
        _ => return false,
    }
    true
}
