use crate::app::input::helpers::step_clamped;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_list_input(app: &mut App, key: KeyCode) {
    let total_rows = app.list_rows().len();

    match key {
        KeyCode::Enter => app.open_selected_list_row(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected_list_index = step_clamped(app.selected_list_index, -1, total_rows);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.selected_list_index = step_clamped(app.selected_list_index, 1, total_rows);
        }
        KeyCode::PageUp => {
            app.selected_list_index = step_clamped(app.selected_list_index, -5, total_rows);
        }
        KeyCode::PageDown => {
            app.selected_list_index = step_clamped(app.selected_list_index, 5, total_rows);
        }
        KeyCode::Home => app.selected_list_index = 0,
        KeyCode::End => app.selected_list_index = total_rows.saturating_sub(1),
        _ => {}
    }
}
