use crate::db::models::{NewEdition, NewMaker, NewMarket, NewPlace};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use sqlx::{
    migrate::MigrateDatabase, query, query_scalar, sqlite::SqlitePoolOptions, Sqlite, SqlitePool,
};

/// Creates the market tables if they don't exist
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS markets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS places (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            latitude REAL,
            longitude REAL
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS makers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            website TEXT,
            social_media TEXT
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS market_editions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            market_id INTEGER REFERENCES markets(id),
            name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            place_id INTEGER REFERENCES places(id)
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS market_edition_makers (
            market_edition_id INTEGER NOT NULL REFERENCES market_editions(id),
            maker_id INTEGER NOT NULL REFERENCES makers(id),
            PRIMARY KEY (market_edition_id, maker_id)
        )",
    )
    .execute(pool)
    .await?;

    // Older exports still carry the free-text coordinate column.
    ensure_column_exists(
        pool,
        "market_editions",
        "location",
        "ALTER TABLE market_editions ADD COLUMN location TEXT",
    )
    .await?;

    Ok(())
}

async fn ensure_column_exists(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    alter_statement: &str,
) -> Result<(), sqlx::Error> {
    let count: i64 = query_scalar(&format!(
        "SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?",
    ))
    .bind(column)
    .fetch_one(pool)
    .await?;

    if count == 0 {
        tracing::info!(table, column, "adding missing column");
        query(alter_statement).execute(pool).await?;
    }

    Ok(())
}

/// Opens (creating if needed) the database at `database_url` and makes sure
/// the schema is in place.
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    let db_path = extract_db_path_from_url(database_url)?;
    tracing::info!(path = %db_path, "opening SQLite database");

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::debug!(dir = %parent.display(), "creating database directory");
            std::fs::create_dir_all(parent)
                .map_err(|e| eyre!("Failed to create database directory: {e}"))?;
        }
    }

    let db_exists = Sqlite::database_exists(database_url)
        .await
        .map_err(|e| eyre!("Error checking database: {e}"))?;
    if !db_exists {
        tracing::info!("database does not exist, creating it");
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| eyre!("Failed to create SQLite database: {e}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| eyre!("Failed to connect to SQLite database: {e}"))?;

    setup_database(&pool)
        .await
        .map_err(|e| eyre!("Failed to set up database schema: {e}"))?;

    tracing::debug!("database ready");
    Ok(pool)
}

/// Extracts the file path from a SQLite URL
fn extract_db_path_from_url(url: &str) -> Result<String> {
    let Some(path_part) = url.strip_prefix("sqlite://") else {
        return Err(eyre!("Not a valid SQLite URL: {url}"));
    };

    if cfg!(windows) {
        // sqlite:///C:/path or sqlite://C:/path
        if let Some(drive_idx) = path_part.find(':') {
            if drive_idx > 0 {
                return Ok(path_part
                    .strip_prefix('/')
                    .unwrap_or(path_part)
                    .to_string());
            }
        }
    }

    if path_part.starts_with('/') {
        return Ok(format!("/{}", path_part.trim_start_matches('/')));
    }

    Ok(path_part.to_string())
}

pub async fn insert_market(pool: &SqlitePool, market: &NewMarket) -> Result<i64, sqlx::Error> {
    let result = query("INSERT INTO markets (name, description) VALUES (?, ?)")
        .bind(&market.name)
        .bind(&market.description)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_place(pool: &SqlitePool, place: &NewPlace) -> Result<i64, sqlx::Error> {
    let result =
        query("INSERT INTO places (name, is_active, latitude, longitude) VALUES (?, ?, ?, ?)")
            .bind(&place.name)
            .bind(place.is_active)
            .bind(place.latitude)
            .bind(place.longitude)
            .execute(pool)
            .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_maker(pool: &SqlitePool, maker: &NewMaker) -> Result<i64, sqlx::Error> {
    let result = query(
        "INSERT INTO makers (name, description, website, social_media) VALUES (?, ?, ?, ?)",
    )
    .bind(&maker.name)
    .bind(&maker.description)
    .bind(&maker.website)
    .bind(&maker.social_media)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_edition(pool: &SqlitePool, edition: &NewEdition) -> Result<i64, sqlx::Error> {
    let result = query(
        "INSERT INTO market_editions
            (market_id, name, start_date, end_date, is_active, place_id, location)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(edition.market_id)
    .bind(&edition.name)
    .bind(&edition.start_date)
    .bind(&edition.end_date)
    .bind(edition.is_active)
    .bind(edition.place_id)
    .bind(&edition.location)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn link_maker(
    pool: &SqlitePool,
    edition_id: i64,
    maker_id: i64,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT OR IGNORE INTO market_edition_makers (market_edition_id, maker_id) VALUES (?, ?)",
    )
    .bind(edition_id)
    .bind(maker_id)
    .execute(pool)
    .await?;
    Ok(())
}
