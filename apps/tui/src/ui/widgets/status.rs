use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, ThrobberState};

/// Spinner with a label, centred in `area`.
pub fn render_loading(f: &mut Frame<'_>, area: Rect, state: &ThrobberState, label: &str) {
    let [row] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    let width = u16::try_from(label.chars().count() + 2).unwrap_or(u16::MAX);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let throbber = Throbber::default()
        .label(label.to_string())
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    // Rendering advances nothing; the app ticks the shared state.
    let mut state = state.clone();
    f.render_stateful_widget(throbber, cell, &mut state);
}

/// Centred one-paragraph message for empty and error states.
pub fn render_message(f: &mut Frame<'_>, area: Rect, message: &str, color: Color) {
    let [row] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::Center)
        .areas(area);
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, row);
}

pub fn render_error(f: &mut Frame<'_>, area: Rect, what: &str, message: &str) {
    render_message(
        f,
        area,
        &format!("Could not load {what}: {message}"),
        Color::LightRed,
    );
}
