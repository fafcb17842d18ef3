use clap::Parser;
use color_eyre::Result;
use market_maker_tui::cli::CliArgs;
use market_maker_tui::config::init_app_config;
use market_maker_tui::logging::init_logging;
use market_maker_tui::{db, event, terminal, App, Clock};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    init_logging(&config)?;
    tracing::info!(log_file = %config.log_file.display(), "starting market-maker");

    let backend = db::connect(&config.backend).await?;
    let today = Clock::System.today();
    let window = args.map_window(today);

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        return event::run_headless(&backend, backend.describe(), today, window, args.json).await;
    }

    let mut app = App::new(Clock::System);
    app.set_map_window(window);
    app.navigate(args.initial_route());

    let mut terminal = terminal::setup_terminal()?;

    let result = event::run(&mut terminal, &mut app, backend).await;

    // Restore terminal
    terminal::cleanup_terminal_state(true, true);

    if let Err(error) = &result {
        tracing::error!(%error, "event loop exited with an error");
    }
    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
