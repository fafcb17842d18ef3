use crate::app::App;
use crate::ui::widgets::map_canvas::render_map_canvas;
use crate::ui::widgets::status::{render_error, render_loading, render_message};
use crate::ui::widgets::tables::scroll_offset;
use market_core::dates::{format_long, format_long_raw};
use market_core::{Load, MapMarker};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn render_map_view(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(area);

    render_window_bar(app, f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    let selected = (!app.markers().is_empty()).then_some(app.selected_marker_index);
    render_map_canvas(f, body[0], &app.viewport, app.markers(), selected);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(10)])
        .split(body[1]);

    render_marker_list(app, f, side[0]);
    if let Some(marker) = app.selected_marker() {
        render_marker_popup(marker, f, side[1]);
    }
}

fn render_window_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let line = TextLine::from(vec![
        Span::styled("From ", label),
        Span::styled(format_long(app.map_window.start()), value),
        Span::styled("   To ", label),
        Span::styled(format_long(app.map_window.end()), value),
    ]);

    let paragraph = Paragraph::new(line)
        .block(
            Block::default()
                .title("Date range")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_marker_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default().title("Markets").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.map.state() {
        Load::Idle | Load::Loading => {
            render_loading(f, inner, &app.throbber, "Loading...");
            return;
        }
        Load::Failed(message) => {
            render_error(f, inner, "markets", message);
            return;
        }
        Load::Ready(markers) if markers.is_empty() => {
            render_message(f, inner, "No markets in this date range.", Color::Gray);
            return;
        }
        Load::Ready(_) => {}
    }

    let markers = app.markers();
    let max_visible_rows = inner.height as usize;
    let offset = scroll_offset(markers.len(), max_visible_rows, app.selected_marker_index);

    let rows = markers
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, marker)| {
            let style = if index == app.selected_marker_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(marker.market_name.clone()),
                Cell::from(marker.start_date.clone()),
            ])
            .style(style)
        });

    let table = Table::new(rows, [Constraint::Min(12), Constraint::Length(10)]).column_spacing(1);
    f.render_widget(table, inner);
}

fn render_marker_popup(marker: &MapMarker, f: &mut Frame<'_>, area: Rect) {
    let badge = Style::default().fg(Color::Black).bg(Color::Cyan);
    let mut lines = vec![
        TextLine::from(Span::styled(
            marker.market_name.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(marker.name.clone()),
    ];
    if let Some(description) = &marker.description {
        lines.push(TextLine::from(Span::styled(
            description.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(TextLine::from(vec![
        Span::styled(format!(" Start: {} ", format_long_raw(&marker.start_date)), badge),
        Span::raw(" "),
        Span::styled(format!(" End: {} ", format_long_raw(&marker.end_date)), badge),
    ]));
    lines.push(TextLine::from(vec![
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(": See details"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
