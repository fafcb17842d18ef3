use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_detail_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Char('q' | 'x') | KeyCode::Backspace => app.close_detail(),
        KeyCode::Up | KeyCode::Char('k') => app.detail_scroll = app.detail_scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => app.detail_scroll = app.detail_scroll.saturating_add(1),
        KeyCode::PageUp => app.detail_scroll = app.detail_scroll.saturating_sub(5),
        KeyCode::PageDown => app.detail_scroll = app.detail_scroll.saturating_add(5),
        KeyCode::Home => app.detail_scroll = 0,
        _ => {}
    }
}
