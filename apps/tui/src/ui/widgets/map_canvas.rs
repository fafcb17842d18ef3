use market_core::viewport::MARKET_BOUNDS;
use market_core::{MapMarker, Viewport};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points, Rectangle};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

const MARKER_COLOR: Color = Color::Cyan;
const SELECTED_COLOR: Color = Color::Yellow;

/// Plots markers inside the viewport, with the market area outlined and the
/// selected marker ringed and labelled.
pub fn render_map_canvas(
    f: &mut Frame<'_>,
    area: Rect,
    viewport: &Viewport,
    markers: &[MapMarker],
    selected: Option<usize>,
) {
    let visible = viewport.visible();
    let (lat_span, _) = viewport.span();

    let title = format!(
        "Map ({:.4}, {:.4}) zoom {}",
        viewport.center().latitude,
        viewport.center().longitude,
        viewport.zoom()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let points: Vec<(f64, f64)> = markers
        .iter()
        .enumerate()
        .filter(|(index, marker)| Some(*index) != selected && visible.contains(marker.location))
        .map(|(_, marker)| (marker.location.longitude, marker.location.latitude))
        .collect();
    let highlighted = selected.and_then(|index| markers.get(index));

    f.render_widget(
        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([visible.west, visible.east])
            .y_bounds([visible.south, visible.north])
            .paint(|ctx| {
                ctx.draw(&Rectangle {
                    x: MARKET_BOUNDS.west,
                    y: MARKET_BOUNDS.south,
                    width: MARKET_BOUNDS.east - MARKET_BOUNDS.west,
                    height: MARKET_BOUNDS.north - MARKET_BOUNDS.south,
                    color: Color::DarkGray,
                });

                let center = viewport.center();
                let tick = lat_span / 40.0;
                ctx.draw(&CanvasLine {
                    x1: center.longitude - tick,
                    y1: center.latitude,
                    x2: center.longitude + tick,
                    y2: center.latitude,
                    color: Color::DarkGray,
                });
                ctx.draw(&CanvasLine {
                    x1: center.longitude,
                    y1: center.latitude - tick,
                    x2: center.longitude,
                    y2: center.latitude + tick,
                    color: Color::DarkGray,
                });

                ctx.draw(&Points {
                    coords: &points,
                    color: MARKER_COLOR,
                });

                if let Some(marker) = highlighted {
                    let (x, y) = (marker.location.longitude, marker.location.latitude);
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: lat_span / 30.0,
                        color: SELECTED_COLOR,
                    });
                    ctx.draw(&Points {
                        coords: &[(x, y)],
                        color: SELECTED_COLOR,
                    });
                    ctx.print(
                        x,
                        y + lat_span / 20.0,
                        Span::styled(
                            marker.market_name.clone(),
                            Style::default()
                                .fg(SELECTED_COLOR)
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            }),
        area,
    );
}
