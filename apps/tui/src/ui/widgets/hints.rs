use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// `key: action` pairs rendered the way every help bar shows them.
pub fn key_hints(pairs: &[(&'static str, &'static str)]) -> TextLine<'static> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (index, (key, action)) in pairs.iter().enumerate() {
        spans.push(Span::styled(*key, key_style));
        let separator = if index + 1 == pairs.len() { "" } else { "   " };
        spans.push(Span::raw(format!(": {action}{separator}")));
    }
    TextLine::from(spans)
}

pub fn render_help_bar(f: &mut Frame<'_>, area: Rect, pairs: &[(&'static str, &'static str)]) {
    let paragraph = Paragraph::new(key_hints(pairs))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
