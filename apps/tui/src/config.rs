use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_LOG_FILE: &str = "market-maker.log";

/// Where market data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Hosted PostgREST-style backend.
    Rest { url: String, anon_key: String },
    /// Local SQLite database, as an `sqlite://` URL.
    Sqlite { database_url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub log_file: PathBuf,
    pub debug: bool,
}

/// Initializes the application configuration from the environment and an
/// optional `.env` file.
pub fn init_app_config() -> Result<AppConfig> {
    dotenv().ok();

    let base_dir = env::current_dir()?;
    let backend = backend_from(|name| env::var(name).ok(), &base_dir)?;
    let log_file = env::var("MARKET_LOG").map_or_else(
        |_| base_dir.join(DEFAULT_LOG_FILE),
        PathBuf::from,
    );
    let debug = env::var("DEBUG").is_ok_and(|value| value != "0" && !value.is_empty());

    Ok(AppConfig {
        backend,
        log_file,
        debug,
    })
}

/// Picks the backend. A local database wins over hosted credentials; the
/// hosted backend needs both its URL and key.
pub fn backend_from<F>(lookup: F, base_dir: &Path) -> Result<BackendConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let first = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| lookup(*name).filter(|value| !value.trim().is_empty()))
    };

    if let Some(path) = first(&["MARKET_DB"]) {
        let database_path = base_dir.join(path);
        return Ok(BackendConfig::Sqlite {
            database_url: sqlite_url(&database_path)?,
        });
    }

    let url = first(&["SUPABASE_URL", "VITE_SUPABASE_URL"]);
    let anon_key = first(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]);
    match (url, anon_key) {
        (Some(url), Some(anon_key)) => Ok(BackendConfig::Rest {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        }),
        (Some(_), None) => Err(eyre!("SUPABASE_ANON_KEY is not set")),
        (None, Some(_)) => Err(eyre!("SUPABASE_URL is not set")),
        (None, None) => Err(eyre!(
            "No backend configured. Set SUPABASE_URL and SUPABASE_ANON_KEY, or MARKET_DB for a local database"
        )),
    }
}

/// Formats a path the way SQLx expects: `sqlite:///abs/path` for absolute
/// paths and `sqlite://rel/path` otherwise.
pub fn sqlite_url(database_path: &Path) -> Result<String> {
    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    if database_path.is_absolute() {
        Ok(format!("sqlite:///{clean_path}"))
    } else {
        Ok(format!("sqlite://{clean_path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn local_database_takes_precedence() {
        let backend = backend_from(
            lookup(&[("MARKET_DB", "markets.db"), ("SUPABASE_URL", "https://x")]),
            Path::new("/srv/app"),
        )
        .unwrap();

        assert_eq!(
            backend,
            BackendConfig::Sqlite {
                database_url: "sqlite:///srv/app/markets.db".to_string()
            }
        );
    }

    #[test]
    fn vite_names_are_accepted() {
        let backend = backend_from(
            lookup(&[
                ("VITE_SUPABASE_URL", "https://demo.supabase.co/"),
                ("VITE_SUPABASE_ANON_KEY", "anon"),
            ]),
            Path::new("/"),
        )
        .unwrap();

        assert_eq!(
            backend,
            BackendConfig::Rest {
                url: "https://demo.supabase.co".to_string(),
                anon_key: "anon".to_string()
            }
        );
    }

    #[test]
    fn missing_key_is_an_error() {
        let result = backend_from(lookup(&[("SUPABASE_URL", "https://x")]), Path::new("/"));
        assert!(result.unwrap_err().to_string().contains("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn nothing_configured_is_an_error() {
        assert!(backend_from(lookup(&[]), Path::new("/")).is_err());
    }

    #[test]
    fn relative_sqlite_urls_use_two_slashes() {
        assert_eq!(
            sqlite_url(Path::new("data/markets.db")).unwrap(),
            "sqlite://data/markets.db"
        );
    }
}
