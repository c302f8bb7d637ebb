use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement,
    sea_query::{ColumnDef, ForeignKey, Index, Table},
};
use tracing::{debug, info};

use crate::{
    config::Config,
    entities::{movie, user, watched},
    error::AppResult,
};

pub const RELEASE_INDEX: &str = "idx_movies_release";

/// Opens the store with a single pooled connection; every statement runs
/// on it in auto-commit mode.
pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;

    if db.get_database_backend() == DbBackend::Sqlite {
        db.execute(Statement::from_string(
            DbBackend::Sqlite,
            "PRAGMA foreign_keys = ON".to_string(),
        ))
        .await?;
    }

    info!(backend = ?db.get_database_backend(), "connected to store");
    Ok(db)
}

pub async fn create_tables(db: &DatabaseConnection) -> AppResult<()> {
    let backend = db.get_database_backend();

    let movies = Table::create()
        .table(movie::Entity)
        .if_not_exists()
        .col(ColumnDef::new(movie::Column::Id).integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(movie::Column::Title).text().not_null())
        .col(ColumnDef::new(movie::Column::ReleaseTimestamp).double().not_null())
        .to_owned();

    let users = Table::create()
        .table(user::Entity)
        .if_not_exists()
        .col(ColumnDef::new(user::Column::Username).text().not_null().primary_key())
        .to_owned();

    let watched = Table::create()
        .table(watched::Entity)
        .if_not_exists()
        .col(ColumnDef::new(watched::Column::UserUsername).text().not_null())
        .col(ColumnDef::new(watched::Column::MovieId).integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_watched_user")
                .from(watched::Entity, watched::Column::UserUsername)
                .to(user::Entity, user::Column::Username),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_watched_movie")
                .from(watched::Entity, watched::Column::MovieId)
                .to(movie::Entity, movie::Column::Id),
        )
        .to_owned();

    let release_index = Index::create()
        .if_not_exists()
        .name(RELEASE_INDEX)
        .table(movie::Entity)
        .col(movie::Column::ReleaseTimestamp)
        .to_owned();

    db.execute(backend.build(&movies)).await?;
    db.execute(backend.build(&users)).await?;
    db.execute(backend.build(&watched)).await?;
    db.execute(backend.build(&release_index)).await?;

    debug!(backend = ?backend, "schema ready");
    Ok(())
}

#[cfg(test)]
pub(crate) fn memory_config() -> Config {
    Config { database_url: "sqlite::memory:".to_string(), acquire_timeout_secs: 8 }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn count(db: &DatabaseConnection, kind: &str, names: &str) -> i64 {
        let sql = format!(
            "SELECT count(*) AS n FROM sqlite_master WHERE type = '{kind}' AND name IN ({names})"
        );
        let row = db
            .query_one(Statement::from_string(DbBackend::Sqlite, sql))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn create_tables_is_idempotent() {
        let db = connect(&memory_config()).await.unwrap();

        for _ in 0..3 {
            create_tables(&db).await.unwrap();
        }

        assert_eq!(count(&db, "table", "'movies', 'users', 'watched'").await, 3);
        assert_eq!(count(&db, "index", "'idx_movies_release'").await, 1);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = connect(&memory_config()).await.unwrap();
        let row = db
            .query_one(Statement::from_string(DbBackend::Sqlite, "PRAGMA foreign_keys".to_string()))
            .await
            .unwrap()
            .unwrap();
        let enabled: i32 = row.try_get_by_index(0).unwrap();
        assert_eq!(enabled, 1);
    }
}
