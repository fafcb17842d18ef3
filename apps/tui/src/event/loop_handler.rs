use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use market_core::dates::{format_long_raw, partition_by_start};
use market_core::source::{load_active_editions, load_list, load_map};
use market_core::{DateWindow, EditionSummary, MarketSource, QueryError};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::app::{handle_input, run_job, App, FetchOutcome};
use crate::db::Backend;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);
const HEADLESS_UPCOMING: usize = 5;

/// Run the application in headless mode (no UI)
pub async fn run_headless<S: MarketSource>(
    source: &S,
    backend: &str,
    today: chrono::NaiveDate,
    window: DateWindow,
    json: bool,
) -> Result<()> {
    let summary = build_headless_summary(source, backend, today, window).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_headless_summary(&summary);
    }

    Ok(())
}

fn print_headless_summary(summary: &HeadlessSummary) {
    println!("\nMarket Maker");
    println!("============");
    println!("Backend: {}", summary.backend);
    println!("Today: {}", format_long_raw(&summary.today));
    println!("Upcoming editions: {}", summary.upcoming_editions);
    println!("Past editions: {}", summary.past_editions);
    println!(
        "Markers between {} and {}: {}",
        format_long_raw(&summary.window.from),
        format_long_raw(&summary.window.to),
        summary.markers_in_window
    );
    println!(
        "Active editions with a location: {}",
        summary.located_editions
    );

    println!("\nNext up:");
    if summary.next_up.is_empty() {
        println!("- No upcoming markets scheduled.");
    }
    for edition in &summary.next_up {
        println!(
            "- {} | {} | {}",
            edition.market,
            edition.edition,
            format_long_raw(&edition.starts)
        );
    }
}

async fn build_headless_summary<S: MarketSource>(
    source: &S,
    backend: &str,
    today: chrono::NaiveDate,
    window: DateWindow,
) -> Result<HeadlessSummary, QueryError> {
    let editions = load_list(source).await?;
    let markers = load_map(source, window).await?;
    let located = load_active_editions(source, today).await?;

    let mut sections = partition_by_start(&editions, today, EditionSummary::starts_on);
    sections.upcoming.sort_by_key(EditionSummary::starts_on);

    let next_up = sections
        .upcoming
        .iter()
        .take(HEADLESS_UPCOMING)
        .map(|edition| HeadlessEdition {
            market: edition.market_name.clone(),
            edition: edition.edition_name.clone(),
            starts: edition.start_date.clone(),
        })
        .collect();

    Ok(HeadlessSummary {
        backend: backend.to_string(),
        today: today.to_string(),
        upcoming_editions: sections.upcoming.len(),
        past_editions: sections.past.len(),
        window: HeadlessWindow {
            from: window.start().to_string(),
            to: window.end().to_string(),
        },
        markers_in_window: markers.len(),
        located_editions: located.len(),
        next_up,
    })
}

#[derive(Debug, serde::Serialize)]
struct HeadlessSummary {
    backend: String,
    today: String,
    upcoming_editions: usize,
    past_editions: usize,
    window: HeadlessWindow,
    markers_in_window: usize,
    located_editions: usize,
    next_up: Vec<HeadlessEdition>,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessWindow {
    from: String,
    to: String,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessEdition {
    market: String,
    edition: String,
    starts: String,
}

/// Hands queued fetches to background tasks that report back on `tx`.
fn dispatch_jobs(app: &mut App, backend: &Backend, tx: &UnboundedSender<FetchOutcome>) {
    for job in app.take_jobs() {
        tracing::debug!(?job, "dispatching fetch");
        let backend = backend.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = run_job(&backend, job).await;
            if tx.send(outcome).is_err() {
                tracing::debug!("event loop closed before fetch finished");
            }
        });
    }
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    backend: Backend,
) -> Result<()> {
    let (tx, mut rx) = unbounded_channel::<FetchOutcome>();
    app.backend_label = format!("{} backend", backend.describe());
    app.request_route_data();

    while app.running {
        dispatch_jobs(app, &backend, &tx);

        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }
        app.tick();

        terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| eyre!("Terminal draw error: {e}"))?;

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.status_message.clear();
                handle_input(app, key.code);
            }
            // Resizes redraw on the next pass.
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::SnapshotSource;

    const SNAPSHOT: &str = r#"{
        "editions": [
            {"id": 1, "name": "Old", "start_date": "2024-06-01", "end_date": "2024-06-02",
             "place_id": 1, "market": {"name": "Atwater"}},
            {"id": 2, "name": "Soon", "start_date": "2025-01-10", "end_date": "2025-01-11",
             "place_id": 1, "location": "45.48,-73.57", "market": {"name": "Jean-Talon"}},
            {"id": 3, "name": "Later", "start_date": "2025-03-01", "end_date": "2025-03-01",
             "place_id": 1, "market": null}
        ],
        "places": [{"id": 1, "latitude": 45.48, "longitude": -73.57}]
    }"#;

    #[tokio::test]
    async fn summary_counts_sections_and_markers() -> Result<(), Box<dyn std::error::Error>> {
        let source = SnapshotSource::from_json(SNAPSHOT)?;
        let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad date")?;

        let summary =
            build_headless_summary(&source, "snapshot", today, DateWindow::starting(today))
                .await?;

        assert_eq!(summary.upcoming_editions, 2);
        assert_eq!(summary.past_editions, 1);
        assert_eq!(summary.markers_in_window, 1);
        assert_eq!(summary.located_editions, 1);
        assert_eq!(summary.next_up[0].edition, "Soon");
        assert_eq!(summary.next_up[1].market, "Unknown Market");

        let json = serde_json::to_value(&summary)?;
        assert_eq!(json["window"]["to"], "2025-01-31");
        Ok(())
    }
}
