use crate::ui::widgets::popup::centered_fixed;
use market_core::Route;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const GLOBAL_KEYS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "Next / previous view"),
    ("1 2 3", "Map, Calendar, Markets"),
    ("Enter", "Open market details"),
    ("Esc", "Close details or help"),
    ("r", "Reload this view"),
    ("F1 / ?", "Toggle help"),
    ("q", "Quit"),
];

const fn route_keys(route: Route) -> &'static [(&'static str, &'static str)] {
    match route {
        Route::Map => &[
            ("↑/↓", "Select marker"),
            ("+ / -", "Zoom in / out"),
            ("w a s d", "Pan"),
            ("c", "Recentre"),
            ("[ / ]", "Move start date"),
            ("{ / }", "Move end date"),
            ("0", "Next 30 days"),
        ],
        Route::Calendar => &[
            ("←/→", "Previous / next period"),
            ("t", "Today"),
            ("w", "Month / week"),
            ("↑/↓", "Select event"),
        ],
        Route::List => &[
            ("↑/↓", "Select market"),
            ("PgUp/PgDn", "Jump 5 rows"),
            ("Home/End", "First / last"),
        ],
    }
}

pub fn render_help(route: Route, f: &mut Frame<'_>) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let section = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let entry = |(key, action): &(&'static str, &'static str)| {
        TextLine::from(vec![
            Span::styled(format!("{key:>16}  "), key_style),
            Span::raw(*action),
        ])
    };

    let mut lines = vec![TextLine::from(Span::styled("Everywhere", section))];
    lines.extend(GLOBAL_KEYS.iter().map(entry));
    lines.push(TextLine::default());
    lines.push(TextLine::from(Span::styled(route.label(), section)));
    lines.extend(route_keys(route).iter().map(entry));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = centered_fixed(56, height, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        area,
    );
}
