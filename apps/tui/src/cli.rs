use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use market_core::{DateWindow, Route};

#[derive(Debug, Parser)]
#[command(name = "market-maker", version, about = "Browse local markets from the terminal")]
pub struct CliArgs {
    /// Print a summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Hosted backend URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Anonymous API key for the hosted backend
    #[arg(long = "anon-key", value_name = "KEY")]
    pub anon_key: Option<String>,

    /// Read from a local SQLite database instead of the hosted backend
    #[arg(long, value_name = "PATH")]
    pub sqlite: Option<String>,

    /// Log file location
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// First day of the map window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day of the map window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// View to open first: /, /calendar or /markets
    #[arg(long, value_name = "PATH", default_value = "/")]
    pub route: String,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.url {
            std::env::set_var("SUPABASE_URL", url);
        }
        if let Some(key) = &self.anon_key {
            std::env::set_var("SUPABASE_ANON_KEY", key);
        }
        if let Some(path) = &self.sqlite {
            std::env::set_var("MARKET_DB", path);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("MARKET_LOG", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    /// The map window from `--from`/`--to`, defaulting to a month from today.
    pub fn map_window(&self, today: NaiveDate) -> DateWindow {
        let start = self.from.unwrap_or(today);
        self.to
            .map_or_else(|| DateWindow::starting(start), |end| DateWindow::new(start, end))
    }

    pub fn initial_route(&self) -> Route {
        Route::from_path(&self.route)
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
