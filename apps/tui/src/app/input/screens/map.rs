use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    let markers = app.markers().len();

    match key {
        // Marker selection; the map follows the highlighted marker.
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_marker(wrap_decrement(app.selected_marker_index, markers));
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_marker(wrap_increment(app.selected_marker_index, markers));
        }
        KeyCode::Enter => app.open_selected_marker(),

        // Viewport
        KeyCode::Char('+' | '=') => app.viewport = app.viewport.zoom_in(),
        KeyCode::Char('-') => app.viewport = app.viewport.zoom_out(),
        KeyCode::Char('w') => app.viewport = app.viewport.pan(1, 0),
        KeyCode::Char('s') => app.viewport = app.viewport.pan(-1, 0),
        KeyCode::Char('a') => app.viewport = app.viewport.pan(0, -1),
        KeyCode::Char('d') => app.viewport = app.viewport.pan(0, 1),
        KeyCode::Char('c') => app.viewport = market_core::Viewport::default(),

        // Date window
        KeyCode::Char('[') => app.shift_window_start(-1),
        KeyCode::Char(']') => app.shift_window_start(1),
        KeyCode::Char('{') => app.shift_window_end(-1),
        KeyCode::Char('}') => app.shift_window_end(1),
        KeyCode::Char('0') => app.reset_window(),
        _ => {}
    }
}
