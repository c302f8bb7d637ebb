use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://watchlist.db?mode=rwc".to_string());

        let acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .context("DB_ACQUIRE_TIMEOUT_SECS")?;

        Ok(Self { database_url, acquire_timeout_secs })
    }
}
