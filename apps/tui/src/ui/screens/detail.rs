use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use crate::ui::widgets::status::{render_loading, render_message};
use market_core::dates::format_long_raw;
use market_core::{DetailPane, MakerView, MarketDetails};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub const NOT_FOUND: &str = "Market not found";
pub const NO_MAKERS: &str = "No makers registered for this market yet.";

pub fn render_detail_modal(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let title = match app.selection.pane() {
        DetailPane::Ready(details) => details.market_name.clone(),
        _ => "Market Details".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    match app.selection.pane() {
        DetailPane::Hidden => {}
        DetailPane::Loading(_) => render_loading(f, chunks[0], &app.throbber, "Loading..."),
        DetailPane::NotFound(_) => render_message(f, chunks[0], NOT_FOUND, Color::Gray),
        DetailPane::Failed { message, .. } => render_message(
            f,
            chunks[0],
            &format!("Could not load market: {message}"),
            Color::LightRed,
        ),
        DetailPane::Ready(details) => {
            let paragraph = Paragraph::new(detail_lines(details))
                .wrap(Wrap { trim: false })
                .scroll((app.detail_scroll, 0));
            f.render_widget(paragraph, chunks[0]);
        }
    }

    render_footer(f, chunks[1]);
}

fn heading(text: &str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn detail_lines(details: &MarketDetails) -> Vec<TextLine<'static>> {
    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![TextLine::from(Span::styled(
        details.edition_name.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];

    if let Some(description) = &details.description {
        lines.push(TextLine::from(description.clone()));
    }
    lines.push(TextLine::default());
    lines.push(TextLine::from(vec![
        Span::styled("From: ", label),
        Span::raw(format_long_raw(&details.start_date)),
    ]));
    lines.push(TextLine::from(vec![
        Span::styled("To:   ", label),
        Span::raw(format_long_raw(&details.end_date)),
    ]));
    lines.push(TextLine::default());
    lines.push(heading("Makers"));

    if details.makers.is_empty() {
        lines.push(TextLine::from(Span::styled(
            NO_MAKERS,
            Style::default().fg(Color::Gray),
        )));
        return lines;
    }

    for maker in &details.makers {
        lines.extend(maker_lines(maker));
    }
    lines
}

fn maker_lines(maker: &MakerView) -> Vec<TextLine<'static>> {
    let link = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED);
    let mut lines = vec![TextLine::from(Span::styled(
        format!("• {}", maker.name),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(description) = &maker.description {
        lines.push(TextLine::from(format!("  {description}")));
    }
    if let Some(website) = &maker.website {
        lines.push(TextLine::from(vec![
            Span::raw("  "),
            Span::styled(website.clone(), link),
        ]));
    }
    if let (Some(handle), Some(url)) = (&maker.social_media, maker.social_url()) {
        lines.push(TextLine::from(vec![
            Span::raw(format!("  {handle} ")),
            Span::styled(url, link),
        ]));
    }
    lines
}

fn render_footer(f: &mut Frame<'_>, area: Rect) {
    let footer = Paragraph::new(crate::ui::widgets::hints::key_hints(&[
        ("Esc", "Close"),
        ("↑/↓", "Scroll"),
    ]));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::RecordId;

    fn text(lines: &[TextLine<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn details(makers: Vec<MakerView>) -> MarketDetails {
        MarketDetails {
            id: RecordId::from(1),
            edition_name: "Winter Edition".to_string(),
            market_name: "Jean-Talon".to_string(),
            description: Some("Open-air market".to_string()),
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-16".to_string(),
            makers,
        }
    }

    #[test]
    fn empty_roster_shows_placeholder() {
        let rendered = text(&detail_lines(&details(Vec::new())));
        assert!(rendered.contains(NO_MAKERS));
        assert!(rendered.contains("January 15th, 2025"));
        assert!(rendered.contains("January 16th, 2025"));
    }

    #[test]
    fn makers_show_links() {
        let maker = MakerView {
            id: RecordId::from(9),
            name: "Bee Happy".to_string(),
            description: None,
            website: Some("https://bee.example".to_string()),
            social_media: Some("@beehappy".to_string()),
        };

        let rendered = text(&detail_lines(&details(vec![maker])));

        assert!(rendered.contains("• Bee Happy"));
        assert!(rendered.contains("https://bee.example"));
        assert!(rendered.contains("https://instagram.com/beehappy"));
        assert!(!rendered.contains(NO_MAKERS));
    }
}
