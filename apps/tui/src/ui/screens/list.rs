use crate::app::App;
use crate::ui::widgets::status::{render_error, render_loading, render_message};
use crate::ui::widgets::tables::scroll_offset;
use market_core::dates::format_long_raw;
use market_core::{EditionSummary, Load};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

pub const NO_UPCOMING: &str = "No upcoming markets scheduled.";
pub const NO_PAST: &str = "No past markets found.";

pub fn render_list_view(app: &App, f: &mut Frame<'_>, area: Rect) {
    match app.list.state() {
        Load::Idle | Load::Loading => {
            render_loading(f, area, &app.throbber, "Loading...");
            return;
        }
        Load::Failed(message) => {
            render_error(f, area, "markets", message);
            return;
        }
        Load::Ready(_) => {}
    }

    let sections = app.list_sections();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    // The cursor runs through upcoming rows first, then past ones.
    let upcoming_len = sections.upcoming.len();
    let past_cursor = app.selected_list_index.checked_sub(upcoming_len);
    let upcoming_cursor = (app.selected_list_index < upcoming_len).then_some(app.selected_list_index);

    render_section(
        f,
        chunks[0],
        "Upcoming Markets",
        &sections.upcoming,
        upcoming_cursor,
        NO_UPCOMING,
    );
    render_section(
        f,
        chunks[1],
        "Past Markets",
        &sections.past,
        past_cursor,
        NO_PAST,
    );
}

fn render_section(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    editions: &[EditionSummary],
    selected: Option<usize>,
    empty_message: &str,
) {
    let block = Block::default()
        .title(format!("{title} ({})", editions.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if editions.is_empty() {
        render_message(f, inner, empty_message, Color::Gray);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Market"),
        Cell::from("Edition"),
        Cell::from("Starts"),
        Cell::from("Ends"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let max_visible_rows = inner.height.saturating_sub(1) as usize;
    let offset = scroll_offset(editions.len(), max_visible_rows, selected.unwrap_or(0));

    let rows = editions
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, edition)| {
            let style = if Some(index) == selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(edition.market_name.clone()),
                Cell::from(edition.edition_name.clone()),
                Cell::from(format_long_raw(&edition.start_date)),
                Cell::from(format_long_raw(&edition.end_date)),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(28),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
    ];
    let table = Table::new(rows, widths).header(header).column_spacing(1);
    f.render_widget(table, inner);
}
