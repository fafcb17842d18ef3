use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_calendar_input(app: &mut App, key: KeyCode) {
    let visible = app.visible_calendar_events().len();

    match key {
        KeyCode::Left | KeyCode::Char('h') => {
            app.set_calendar_cursor(app.calendar_cursor.previous());
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.set_calendar_cursor(app.calendar_cursor.next());
        }
        KeyCode::Char('t') => {
            let today = app.today();
            app.set_calendar_cursor(app.calendar_cursor.today(today));
        }
        KeyCode::Char('w') => app.set_calendar_cursor(app.calendar_cursor.toggle_mode()),
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected_event_index = wrap_decrement(app.selected_event_index, visible);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.selected_event_index = wrap_increment(app.selected_event_index, visible);
        }
        KeyCode::Enter => app.open_selected_event(),
        _ => {}
    }
}
