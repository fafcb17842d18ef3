use color_eyre::eyre::eyre;
use color_eyre::Result;
use dotenv::dotenv;
use market_maker_tui::config::sqlite_url;
use market_maker_tui::db::queries::count_editions;
use market_maker_tui::db::{create_database_pool, seed_sample_data};
use market_maker_tui::Clock;
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("MARKET_DB").ok())
        .map_or_else(|| PathBuf::from("markets.db"), PathBuf::from);
    let database_path = env::current_dir()?.join(path);

    println!("Seeding {}...", database_path.display());

    let database_url = sqlite_url(&database_path)?;
    let pool = create_database_pool(&database_url).await?;

    let editions = seed_sample_data(&pool, Clock::System.today())
        .await
        .map_err(|e| eyre!("Failed to seed database: {e}"))?;

    let total = count_editions(&pool)
        .await
        .map_err(|e| eyre!("Failed to count editions: {e}"))?;
    println!("Inserted {editions} market editions ({total} in the database).");
    println!("Run `market-maker --sqlite {}` to browse them.", database_path.display());

    Ok(())
}
