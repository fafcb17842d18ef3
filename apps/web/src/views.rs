use market_core::calendar::{grid, CalendarMode};
use market_core::dates::{format_long, format_long_raw};
use market_core::{DetailPane, EditionSummary, Load, MarketDetails, Route};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Points},
        Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};

use crate::shell::Shell;

const ACCENT: Color = Color::Rgb(0, 0, 238);

pub fn render(shell: &Shell, f: &mut Frame<'_>) {
    let block = Block::default()
        .title("Market Maker")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let area = f.area();
    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    render_tabs(shell, f, layout[0]);
    render_route(shell, f, layout[1]);
    render_footer(shell, f, layout[2]);

    if shell.selection.is_open() {
        render_detail(shell.selection.pane(), f, inner);
    }
}

fn render_tabs(shell: &Shell, f: &mut Frame<'_>, area: Rect) {
    let titles = Route::ALL
        .iter()
        .map(|route| TextLine::from(route.label()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(shell.route.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, area);
}

fn render_footer(shell: &Shell, f: &mut Frame<'_>, area: Rect) {
    let keys = match shell.route {
        Route::Map => "+/- zoom  [ ] { } dates  c centre",
        Route::Calendar => "←/→ move  t today  w week/month",
        Route::List => "↑/↓ select",
    };
    let line = TextLine::from(vec![
        Span::styled("Tab/1-3", Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled("Enter details  Esc close", Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(keys, Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_route(shell: &Shell, f: &mut Frame<'_>, area: Rect) {
    if let Some(error) = &shell.source_error {
        render_message(f, area, &format!("No data source: {error}"), Color::Red);
        return;
    }
    if let Some(error) = shell.route_error() {
        render_message(f, area, &format!("Error: {error}"), Color::Red);
        return;
    }

    match shell.route {
        Route::Map => render_map(shell, f, area),
        Route::Calendar => render_calendar(shell, f, area),
        Route::List => render_list(shell, f, area),
    }
}

fn render_message(f: &mut Frame<'_>, area: Rect, message: &str, color: Color) {
    let paragraph = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn loading<T>(state: &Load<T>) -> bool {
    matches!(state, Load::Idle | Load::Loading)
}

fn render_map(shell: &Shell, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let window = shell.window;
    let title = format!(
        "Map · {} to {} · zoom {}",
        format_long(window.start()),
        format_long(window.end()),
        shell.viewport.zoom()
    );
    let bounds = shell.viewport.visible();
    let markers = shell.markers();
    let points = markers
        .iter()
        .map(|m| (m.location.longitude, m.location.latitude))
        .collect::<Vec<_>>();
    let selected = markers.get(shell.row);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &points,
                color: Color::Yellow,
            });
            if let Some(marker) = selected {
                let (lat_span, _) = shell.viewport.span();
                ctx.draw(&Circle {
                    x: marker.location.longitude,
                    y: marker.location.latitude,
                    radius: lat_span / 40.0,
                    color: Color::White,
                });
                ctx.print(
                    marker.location.longitude,
                    marker.location.latitude,
                    Span::styled(marker.market_name.clone(), Style::default().fg(Color::White)),
                );
            }
        });
    f.render_widget(canvas, columns[0]);

    if loading(shell.map.state()) {
        render_message(f, columns[1], "Loading markets...", Color::Gray);
        return;
    }
    if markers.is_empty() {
        render_message(f, columns[1], "No markets in this date range.", Color::Gray);
        return;
    }

    let rows = markers.iter().enumerate().map(|(index, marker)| {
        let style = if index == shell.row {
            Style::default().fg(Color::White).bg(ACCENT)
        } else {
            Style::default().fg(Color::White)
        };
        Row::new(vec![
            Cell::from(marker.market_name.clone()),
            Cell::from(format_long_raw(&marker.start_date)),
        ])
        .style(style)
    });
    let table = Table::new(rows, [Constraint::Percentage(55), Constraint::Percentage(45)])
        .header(header_row(&["Market", "Starts"]))
        .block(Block::default().title("Markers").borders(Borders::ALL))
        .column_spacing(1);
    f.render_widget(table, columns[1]);
}

fn render_calendar(shell: &Shell, f: &mut Frame<'_>, area: Rect) {
    let weeks = shell.cursor.weeks().len();
    let cell_height = match shell.cursor.mode() {
        CalendarMode::Month => 2,
        CalendarMode::Week => 4,
    };
    let grid_height = u16::try_from(weeks * cell_height + 3).unwrap_or(u16::MAX);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(grid_height), Constraint::Min(3)])
        .split(area);

    let events = shell.calendar.state().ready().map(Vec::as_slice).unwrap_or(&[]);
    let today = shell.today();
    let rows = grid(&shell.cursor, events).into_iter().map(|week| {
        let cells = week.into_iter().map(|day| {
            let mut style = Style::default().fg(if day.in_focus_month {
                Color::White
            } else {
                Color::DarkGray
            });
            if day.date == today {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            let mut lines = vec![TextLine::styled(day.date.format("%d").to_string(), style)];
            if !day.events.is_empty() {
                lines.push(TextLine::styled(
                    format!("● {}", day.events.len()),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Cell::from(Text::from(lines))
        });
        Row::new(cells.collect::<Vec<_>>())
            .height(u16::try_from(cell_height).unwrap_or(1))
    });
    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header_row(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]))
        .block(
            Block::default()
                .title(shell.cursor.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(table, layout[0]);

    if loading(shell.calendar.state()) {
        render_message(f, layout[1], "Loading calendar...", Color::Gray);
        return;
    }
    let visible = shell.visible_events();
    if visible.is_empty() {
        render_message(f, layout[1], "No markets in this range.", Color::Gray);
        return;
    }
    let rows = visible.iter().enumerate().map(|(index, event)| {
        let style = if index == shell.row {
            Style::default().fg(Color::White).bg(ACCENT)
        } else {
            Style::default().fg(Color::White)
        };
        Row::new(vec![
            Cell::from(format_long_raw(&event.start)),
            Cell::from(event.extended_props.market_name.clone()),
            Cell::from(event.title.clone()),
        ])
        .style(style)
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Percentage(35),
            Constraint::Min(10),
        ],
    )
    .block(Block::default().title("Events").borders(Borders::ALL));
    f.render_widget(table, layout[1]);
}

fn render_list(shell: &Shell, f: &mut Frame<'_>, area: Rect) {
    if loading(shell.list.state()) {
        render_message(f, area, "Loading markets...", Color::Gray);
        return;
    }

    let sections = shell.list_sections();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let upcoming = ListSection {
        title: "Upcoming Markets",
        empty: "No upcoming markets scheduled.",
        first_row: 0,
    };
    let past = ListSection {
        title: "Past Markets",
        empty: "No past markets found.",
        first_row: sections.upcoming.len(),
    };
    render_section(&upcoming, &sections.upcoming, shell.row, f, layout[0]);
    render_section(&past, &sections.past, shell.row, f, layout[1]);
}

struct ListSection {
    title: &'static str,
    empty: &'static str,
    /// Row index of the section's first edition in the combined list.
    first_row: usize,
}

fn render_section(
    section: &ListSection,
    editions: &[EditionSummary],
    selected: usize,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let block = Block::default()
        .title(section.title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    if editions.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        render_message(f, inner, section.empty, Color::Gray);
        return;
    }

    let rows = editions.iter().enumerate().map(|(index, edition)| {
        let style = if section.first_row + index == selected {
            Style::default().fg(Color::White).bg(ACCENT)
        } else {
            Style::default().fg(Color::White)
        };
        Row::new(vec![
            Cell::from(edition.market_name.clone()),
            Cell::from(edition.edition_name.clone()),
            Cell::from(format_long_raw(&edition.start_date)),
            Cell::from(format_long_raw(&edition.end_date)),
        ])
        .style(style)
    });
    let table = Table::new(rows, [Constraint::Percentage(25); 4])
        .header(header_row(&["Market", "Edition", "Starts", "Ends"]))
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn header_row(labels: &[&'static str]) -> Row<'static> {
    Row::new(labels.iter().map(|label| Cell::from(*label)).collect::<Vec<_>>()).style(
        Style::default()
            .fg(ACCENT)
            .bg(Color::Rgb(200, 200, 200))
            .add_modifier(Modifier::BOLD),
    )
}

fn render_detail(pane: &DetailPane, f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title("Market details · Esc to close")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let text = match pane {
        DetailPane::Hidden => Text::default(),
        DetailPane::Loading(_) => Text::from("Loading market details..."),
        DetailPane::NotFound(_) => Text::from("Market not found."),
        DetailPane::Failed { message, .. } => Text::from(TextLine::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red),
        )),
        DetailPane::Ready(details) => detail_text(details),
    };

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup);
}

fn detail_text(details: &MarketDetails) -> Text<'static> {
    let mut lines = vec![
        TextLine::styled(
            details.market_name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        TextLine::from(details.edition_name.clone()),
        TextLine::styled(
            format!(
                "{} to {}",
                format_long_raw(&details.start_date),
                format_long_raw(&details.end_date)
            ),
            Style::default().fg(Color::Gray),
        ),
        TextLine::from(""),
    ];
    if let Some(description) = &details.description {
        lines.push(TextLine::from(description.clone()));
        lines.push(TextLine::from(""));
    }

    lines.push(TextLine::styled(
        "Participating Makers",
        Style::default().fg(Color::Cyan),
    ));
    if details.makers.is_empty() {
        lines.push(TextLine::from("No makers registered for this market yet."));
    }
    for maker in &details.makers {
        let mut spans = vec![Span::raw(format!("• {}", maker.name))];
        if let Some(website) = &maker.website {
            spans.push(Span::styled(format!("  {website}"), Style::default().fg(ACCENT)));
        }
        if let Some(url) = maker.social_url() {
            spans.push(Span::styled(format!("  {url}"), Style::default().fg(ACCENT)));
        }
        lines.push(TextLine::from(spans));
    }
    Text::from(lines)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
