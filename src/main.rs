mod config;
mod console;
mod db;
mod entities;
mod error;
mod models;
mod store;
mod templates;

use jiff::tz::TimeZone;
use tokio::io::BufReader;

use crate::{config::Config, console::Console, store::WatchlistStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "warn,movie_watchlist=info,sqlx=warn".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let db = db::connect(&config).await?;
    let store = WatchlistStore::new(db);
    let mut console =
        Console::new(store, BufReader::new(tokio::io::stdin()), tokio::io::stdout(), TimeZone::system());
    console.run().await?;

    Ok(())
}
